//! Session routes. Sign-in belongs to the external identity provider; this
//! side only ends sessions.

use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;

use crate::middleware::RequestContext;
use crate::middleware::context::expired_session_cookie;
use crate::state::AppState;

/// `POST /auth/signout`: forget the session, expire the cookie, `303` home.
pub async fn signout(State(state): State<AppState>, ctx: RequestContext) -> Response {
    if let Err(e) = state.sessions.remove(&ctx.session).await {
        tracing::error!(error = %e, "error removing session");
    }

    let jar = CookieJar::new().add(expired_session_cookie(state.cookie_secure));
    (jar, Redirect::to("/")).into_response()
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
