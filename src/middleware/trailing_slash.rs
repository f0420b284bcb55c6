//! Canonical URLs: paths never end in `/` except the root.

use axum::extract::Request;
use axum::http::StatusCode;
use axum::http::header::LOCATION;
use axum::response::IntoResponse;

use crate::mux::{Next, SharedMiddleware, from_fn};

/// Redirect `/foo/` to `/foo` with `301 Moved Permanently`. The query string
/// is not carried over.
#[must_use]
pub fn trailing_slash() -> SharedMiddleware {
    from_fn(|req: Request, next: Next| async move {
        match canonical_path(req.uri().path()) {
            Some(target) => {
                tracing::debug!(from = req.uri().path(), to = target, "trailing slash redirect");
                (StatusCode::MOVED_PERMANENTLY, [(LOCATION, target.to_owned())]).into_response()
            }
            None => next.run(req).await,
        }
    })
}

/// `Some(trimmed)` when `path` needs a redirect.
fn canonical_path(path: &str) -> Option<&str> {
    if path == "/" {
        return None;
    }
    path.strip_suffix('/')
}

#[cfg(test)]
#[path = "trailing_slash_test.rs"]
mod tests;
