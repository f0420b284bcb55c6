//! Blog post pages.

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};

use super::not_found;
use crate::render::html::{Node, el};
use crate::render::layout::{HeaderVariant, Page, Shell, margins};
use crate::state::AppState;

/// `GET /blog/{slug}`. Drafts are reachable by slug; only the home page
/// filters on `live`.
pub async fn show(State(state): State<AppState>, shell: Shell, Path(slug): Path<String>) -> Response {
    let Some(post) = state.blog.get(&slug) else {
        tracing::debug!(%slug, "unknown blog post");
        return not_found::page(&shell);
    };

    let fm = &post.frontmatter;
    let dates = match fm.updated_at {
        Some(updated) => format!("{} (updated {updated})", fm.created_at),
        None => fm.created_at.to_string(),
    };
    let byline = el("p")
        .class("byline")
        .child(Node::when(!fm.author.is_empty(), format!("{} · ", fm.author)))
        .child(el("time").attr("datetime", fm.created_at.to_string()).child(dates));

    shell
        .render(
            Page::new()
                .title(&fm.title)
                .description(&fm.description)
                .body(shell.header(HeaderVariant::Floating, Some(fm.title.as_str())))
                .body(margins([byline, el("div").class("markdown").child(Node::Raw(post.html.clone()))])),
        )
        .into_response()
}

#[cfg(test)]
#[path = "blog_test.rs"]
mod tests;
