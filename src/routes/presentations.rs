//! Slide decks.
//!
//! A deck renders as its title content followed by one full-height section
//! per slide. Sections are numbered from 1 and link to their neighbours, so
//! the deck can be stepped through with plain anchors.

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};

use super::not_found;
use crate::render::html::{Node, el};
use crate::render::layout::{HeaderVariant, Page, Shell, margins};
use crate::services::presentations::Slide;
use crate::state::AppState;

/// `GET /presentations/{slug}`.
pub async fn show(State(state): State<AppState>, shell: Shell, Path(slug): Path<String>) -> Response {
    let Some(deck) = state.presentations.get(&slug) else {
        tracing::debug!(%slug, "unknown presentation");
        return not_found::page(&shell);
    };

    let total = deck.slides.len();
    let main = el("main")
        .class("presentation")
        .child(
            el("div")
                .class("presentation-title")
                .child(shell.header(HeaderVariant::Static, None))
                .child(margins([el("div").class("markdown").child(Node::Raw(deck.html.clone()))])),
        )
        .children(deck.slides.iter().enumerate().map(|(idx, slide)| slide_section(slide, idx + 1, total)));

    shell
        .render(
            Page::new()
                .title(deck.title())
                .head(el("link").attr("rel", "stylesheet").attr("href", shell.asset("/css/presentation.css")))
                .body(main),
        )
        .into_response()
}

/// Section for slide `number` (1-based) of `total`.
fn slide_section(slide: &Slide, number: usize, total: usize) -> Node {
    let nav = |target: usize, class: &'static str, label: &'static str| {
        el("a").attr("href", format!("#{target}")).class(class).attr("aria-label", label).child(label)
    };

    let class = match slide.frontmatter.class.as_str() {
        "" => "presentation".to_owned(),
        extra => format!("presentation {extra}"),
    };

    el("section")
        .class("slide-frame")
        .id(number.to_string())
        .child(el("div").class("slide").child(el("div").class(class).child(Node::Raw(slide.html.clone()))))
        .child(el("span").class("slide-counter").child(format!("{number}/{total}")))
        .child(Node::when(number > 1, nav(number - 1, "slide-prev", "previous")))
        .child(Node::when(number < total, nav(number + 1, "slide-next", "next")))
        .into()
}

#[cfg(test)]
#[path = "presentations_test.rs"]
mod tests;
