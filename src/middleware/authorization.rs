//! Access control for protected route groups.
//!
//! DESIGN
//! ======
//! Runs inside [`super::context::request_context`], so the session id is
//! already on the request. The session is resolved to a user, the user is
//! checked against the [`Policy`] for the request path and method, and on
//! success the [`CurrentUser`] is attached as a request extension for the
//! handler.
//!
//! | outcome                      | status |
//! |------------------------------|--------|
//! | no request context           | 500    |
//! | session store error          | 500    |
//! | no user behind the session   | 401    |
//! | policy denies                | 403    |

use std::sync::Arc;

use axum::extract::Request;
use axum::http::{Method, StatusCode};
use axum::response::IntoResponse;

use super::RequestContext;
use crate::mux::{Next, SharedMiddleware, from_fn};
use crate::services::policy::Policy;
use crate::services::session::{CurrentUser, SessionStore};

#[must_use]
pub fn authorization(sessions: Arc<dyn SessionStore>, policy: Arc<Policy>) -> SharedMiddleware {
    from_fn(move |mut req: Request, next: Next| {
        let sessions = Arc::clone(&sessions);
        let policy = Arc::clone(&policy);
        async move {
            let session = req.extensions().get::<RequestContext>().map(|ctx| ctx.session.clone());
            let path = req.uri().path().to_owned();
            let method = req.method().clone();

            match authorize(session, &path, &method, sessions.as_ref(), &policy).await {
                Ok(user) => {
                    req.extensions_mut().insert(user);
                    next.run(req).await
                }
                Err(status) => status.into_response(),
            }
        }
    })
}

async fn authorize(
    session: Option<String>,
    path: &str,
    method: &Method,
    sessions: &dyn SessionStore,
    policy: &Policy,
) -> Result<CurrentUser, StatusCode> {
    let Some(session) = session else {
        tracing::error!("authorization ran without a request context");
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    };

    let user = match sessions.user(&session).await {
        Ok(Some(user)) => user,
        Ok(None) => return Err(StatusCode::UNAUTHORIZED),
        Err(e) => {
            tracing::error!(error = %e, "session lookup failed");
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    if !policy.enforce(&user.login, path, method.as_str()) {
        tracing::warn!(login = %user.login, path, %method, "access denied");
        return Err(StatusCode::FORBIDDEN);
    }

    Ok(user)
}

#[cfg(test)]
#[path = "authorization_test.rs"]
mod tests;
