//! The 404 page.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::render::html::{el, text};
use crate::render::layout::{HeaderVariant, Page, Shell, margins};

/// Fallback for unmatched routes.
pub async fn show(shell: Shell) -> Response {
    page(&shell)
}

/// `404` with the not-found page, for handlers that miss a lookup.
pub fn page(shell: &Shell) -> Response {
    let body = Page::new()
        .title("Not Found")
        .body(shell.header(HeaderVariant::Floating, None))
        .body(margins([text("I don't exist yet. "), el("code").child("¯\\_(ツ)_/¯").into()]));
    (StatusCode::NOT_FOUND, shell.render(body)).into_response()
}
