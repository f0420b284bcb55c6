//! Static asset serving under a cache-busting prefix.
//!
//! Assets live at `{prefix}/{path}` where the prefix embeds a cache id, so
//! every response may be cached forever.

use std::path::Path;
use std::sync::Arc;

use axum::extract::Request;
use axum::http::header::CACHE_CONTROL;
use axum::http::uri::PathAndQuery;
use axum::http::{HeaderValue, StatusCode, Uri};
use axum::response::IntoResponse;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::mux::{Handler, Next, SharedMiddleware, from_fn, from_layer};

pub const IMMUTABLE: &str = "max-age=31536000, immutable";

/// Remove `prefix` from the request path before the inner handler sees it.
/// Requests outside the prefix get `404`.
#[must_use]
pub fn strip_prefix(prefix: &str) -> SharedMiddleware {
    let prefix: Arc<str> = prefix.into();
    from_fn(move |mut req: Request, next: Next| {
        let prefix = Arc::clone(&prefix);
        async move {
            match stripped_uri(req.uri(), &prefix) {
                Some(uri) => {
                    *req.uri_mut() = uri;
                    next.run(req).await
                }
                None => StatusCode::NOT_FOUND.into_response(),
            }
        }
    })
}

fn stripped_uri(uri: &Uri, prefix: &str) -> Option<Uri> {
    let rest = uri.path().strip_prefix(prefix)?;
    let path = match rest {
        "" => "/",
        rest if rest.starts_with('/') => rest,
        _ => return None,
    };
    let path_and_query: PathAndQuery = match uri.query() {
        Some(query) => format!("{path}?{query}").parse().ok()?,
        None => path.parse().ok()?,
    };

    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(path_and_query);
    Uri::from_parts(parts).ok()
}

/// `Cache-Control: max-age=31536000, immutable` on every response.
#[must_use]
pub fn immutable_cache() -> SharedMiddleware {
    from_layer(SetResponseHeaderLayer::overriding(CACHE_CONTROL, HeaderValue::from_static(IMMUTABLE)))
}

/// File server rooted at `dir`.
#[must_use]
pub fn static_handler(dir: &Path) -> Handler {
    Handler::from_service(ServeDir::new(dir))
}

#[cfg(test)]
#[path = "static_files_test.rs"]
mod tests;
