//! Per-request context: request id, session cookie, request span.
//!
//! DESIGN
//! ======
//! The outermost middleware. It resolves the session id from the
//! `garrettdavisdev-session` cookie (minting one when absent), assigns a
//! request id, and stores both as a [`RequestContext`] request extension.
//! Handlers and inner middleware read it back with the extractor instead of
//! looking values up by key. All logging for the request happens inside the
//! `request` span opened here.

use axum::extract::{FromRequestParts, Request};
use axum::http::StatusCode;
use axum::http::header::SET_COOKIE;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;
use tracing::Instrument;
use uuid::Uuid;

use crate::mux::{Next, SharedMiddleware, from_fn};
use crate::services::session::new_session_id;

pub const SESSION_COOKIE: &str = "garrettdavisdev-session";

/// Values every handler may rely on once [`request_context`] has run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub request_id: Uuid,
    pub session: String,
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Self>().cloned().ok_or_else(|| {
            tracing::error!("request context missing; is the context middleware installed?");
            StatusCode::INTERNAL_SERVER_ERROR
        })
    }
}

/// Session cookie carrying `value`. An empty value with zero max-age clears it.
#[must_use]
pub fn session_cookie(value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

/// Expired session cookie, used on sign-out.
#[must_use]
pub fn expired_session_cookie(secure: bool) -> Cookie<'static> {
    let mut cookie = session_cookie(String::new(), secure);
    cookie.set_max_age(Duration::ZERO);
    cookie
}

/// Outermost middleware: session, request id, span, request/response logs.
#[must_use]
pub fn request_context(cookie_secure: bool) -> SharedMiddleware {
    from_fn(move |mut req: Request, next: Next| async move {
        let jar = CookieJar::from_headers(req.headers());
        let existing = jar.get(SESSION_COOKIE).map(Cookie::value).filter(|v| !v.is_empty());
        let (session, minted) = match existing {
            Some(session) => (session.to_owned(), false),
            None => (new_session_id(), true),
        };

        let context = RequestContext { request_id: Uuid::new_v4(), session };
        let span = tracing::info_span!(
            "request",
            request_id = %context.request_id,
            method = %req.method(),
            uri = %req.uri(),
            session = %context.session,
        );

        async move {
            if minted {
                tracing::debug!("new session cookie issued");
            }
            tracing::info!("request received");

            let session = context.session.clone();
            req.extensions_mut().insert(context);
            let res = next.run(req).await;

            tracing::info!(status = res.status().as_u16(), "response sent");
            if minted { with_cookie(res, session_cookie(session, cookie_secure)) } else { res }
        }
        .instrument(span)
        .await
    })
}

/// Attach `cookie` unless the handler already set the session cookie.
fn with_cookie(res: Response, cookie: Cookie<'static>) -> Response {
    let prefix = format!("{SESSION_COOKIE}=");
    let already_set = res
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .any(|value| value.to_str().is_ok_and(|v| v.starts_with(&prefix)));
    if already_set {
        return res;
    }
    (CookieJar::new().add(cookie), res).into_response()
}

#[cfg(test)]
#[path = "context_test.rs"]
mod tests;
