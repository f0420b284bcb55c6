//! The résumé page.

use axum::extract::State;
use axum::response::Html;

use crate::render::html::{Node, el};
use crate::render::layout::{Page, SITE_NAME, Shell};
use crate::services::resume::{ItemContent, ResumeDoc, ResumeItem, ResumeSection};
use crate::state::AppState;

pub const LOCATION: &str = "Hillsboro, Oregon";

/// `GET /resume`.
pub async fn show(State(state): State<AppState>, shell: Shell) -> Html<String> {
    let print = el("div").class("print-controls").child(
        el("button")
            .attr("type", "button")
            .attr("onclick", "window.print()")
            .attr("title", "Print this page.")
            .child("print"),
    );

    let grid = el("div")
        .class("resume")
        .child(el("div").class("resume-name").child(el("h1").child(SITE_NAME)))
        .child(document(&state.resume));

    shell.render(
        Page::new()
            .title(format!("Resume - {SITE_NAME}"))
            .description(format!("{SITE_NAME}' resume"))
            .body(print)
            .body(grid),
    )
}

fn document(doc: &ResumeDoc) -> Node {
    let contact = el("ul")
        .child(el("li").child("Email: ").child(el("a").attr("href", "/contact").child("contact form")))
        .child(el("li").child(format!("Location: {LOCATION}")));

    Node::List(vec![
        el("p").class("preface").child(&doc.preface).into(),
        el("h2").child("Contact").into(),
        contact.into(),
        doc.sections.iter().map(section).collect(),
    ])
}

fn section(section: &ResumeSection) -> Node {
    Node::List(vec![
        el("h2").child(&section.title).into(),
        el("div").children(section.items.iter().map(item)).into(),
    ])
}

fn item(item: &ResumeItem) -> Node {
    let heading = el("h3").child(&item.title).child(Node::when(
        !item.annotation.is_empty(),
        el("span").class("annotation").child(&item.annotation),
    ));

    let content = match item.content() {
        Some(ItemContent::Block(block)) => el("p").child(block).into(),
        Some(ItemContent::List(list)) => el("ul").class("tags").children(list.iter().map(|s| el("li").child(s))).into(),
        None => Node::empty(),
    };

    el("div")
        .class("resume-item")
        .child(heading)
        .child(Node::when(!item.subtitle.is_empty(), el("h4").child(&item.subtitle)))
        .child(content)
        .into()
}

#[cfg(test)]
#[path = "resume_test.rs"]
mod tests;
