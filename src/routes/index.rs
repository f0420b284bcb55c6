//! Home page.

use axum::extract::State;
use axum::response::Html;

use crate::render::html::{Node, el};
use crate::render::layout::{HeaderVariant, Page, Shell, SITE_NAME, margins};
use crate::services::blog::Post;
use crate::state::AppState;

const DESCRIPTION: &str =
    "Garrett Davis is a young software developer who cares deeply about creating great software for people.";

const QUALITIES: &[(&str, &str)] = &[
    ("enjoyable to use", "quality-yellow"),
    ("reliable", "quality-red"),
    ("maintainable", "quality-blue"),
    ("simple", "quality-green"),
];

pub async fn show(State(state): State<AppState>, shell: Shell) -> Html<String> {
    let posts: Node = state.blog.live().flat_map(|post| [summary(post), el("hr").into()]).collect();

    let main = el("main")
        .class("home")
        .child(el("p").class("intro").child("hello! i'm garrett. i'm learning a lot. and i plan to keep at it. "))
        .child(
            el("div")
                .class("qualities")
                .child("i love making software that is: ")
                .child(el("ul").children(QUALITIES.iter().map(|(adjective, class)| el("li").class(*class).child(*adjective)))),
        )
        .child(
            el("div")
                .class("profiles")
                .child(profile("https://github.com/Gardego5", "View Garrett's GitHub Profile", "github"))
                .child(el("span").child("<-- find me here -->"))
                .child(profile(
                    "https://www.linkedin.com/in/garrett-davis-8793a721b/",
                    "View Garrett's LinkedIn Profile",
                    "linkedin",
                )),
        )
        .child(el("hr"))
        .child(posts);

    shell.render(
        Page::new()
            .title(SITE_NAME)
            .description(DESCRIPTION)
            .body(shell.header(HeaderVariant::Floating, None))
            .body(margins([main])),
    )
}

fn profile(href: &str, label: &str, name: &str) -> Node {
    el("a")
        .attr("href", href)
        .attr("target", "_blank")
        .attr("rel", "noopener noreferrer")
        .attr("aria-label", label)
        .class("profile")
        .child(name)
        .into()
}

/// Title link and description for the post list.
pub(crate) fn summary(post: &Post) -> Node {
    el("div")
        .class("post-summary")
        .child(el("h2").child(el("a").attr("href", format!("/blog/{}", post.slug)).child(&post.frontmatter.title)))
        .child(el("p").class("post-description").child(&post.frontmatter.description))
        .into()
}

#[cfg(test)]
#[path = "index_test.rs"]
mod tests;
