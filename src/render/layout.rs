//! Page shell and shared page components.
//!
//! DESIGN
//! ======
//! Handlers build a [`Page`] (head extras plus body nodes) and hand it to the
//! [`Shell`] extractor, which knows the per-request bits every page needs:
//! the static asset prefix, whether htmx is boosting the request, and who is
//! signed in. Boosted requests skip the static head entries because htmx
//! keeps the ones it already has.

use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::response::Html;

use super::html::{Node, el};
use crate::middleware::RequestContext;
use crate::services::session::CurrentUser;
use crate::state::AppState;

pub const SITE_NAME: &str = "Garrett Davis";

const STYLESHEETS: &[&str] = &["/css/site.css"];

/// htmx and the extensions named in the body's `hx-ext`, in load order.
pub const SCRIPTS: &[&str] = &[
    "https://unpkg.com/htmx.org@2.0.1/dist/htmx.min.js",
    "https://unpkg.com/htmx-ext-response-targets@2.0.0/response-targets.js",
    "https://unpkg.com/htmx-ext-head-support@2.0.1/head-support.js",
];

// =============================================================================
// SHELL
// =============================================================================

/// Per-request layout context, extracted in handlers.
#[derive(Debug, Clone)]
pub struct Shell {
    static_prefix: Arc<str>,
    boosted: bool,
    user: Option<CurrentUser>,
}

impl<S> FromRequestParts<S> for Shell
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let boosted = parts.headers.get("hx-boosted").is_some_and(|v| v.as_bytes() == b"true");

        let session = parts.extensions.get::<RequestContext>().map(|ctx| ctx.session.clone());
        let user = match session {
            Some(session) => app_state.sessions.user(&session).await.unwrap_or_else(|e| {
                tracing::warn!(error = %e, "session lookup failed while rendering");
                None
            }),
            None => None,
        };

        Ok(Self { static_prefix: app_state.static_prefix, boosted, user })
    }
}

impl Shell {
    #[must_use]
    pub fn new(static_prefix: impl Into<Arc<str>>, boosted: bool, user: Option<CurrentUser>) -> Self {
        Self { static_prefix: static_prefix.into(), boosted, user }
    }

    /// URL of a static asset, e.g. `asset("/css/site.css")`.
    #[must_use]
    pub fn asset(&self, path: &str) -> String {
        format!("{}{path}", self.static_prefix)
    }

    #[must_use]
    pub fn user(&self) -> Option<&CurrentUser> {
        self.user.as_ref()
    }

    /// Serialize `page` as a complete HTML document.
    #[must_use]
    pub fn render(&self, page: Page) -> Html<String> {
        let head = el("head")
            .child(Node::when(!self.boosted, self.static_head()))
            .child(match page.title {
                Some(title) => el("title").child(title).into(),
                None => Node::empty(),
            })
            .child(match page.description {
                Some(description) => el("meta").attr("name", "description").attr("content", description).into(),
                None => Node::empty(),
            })
            .children(page.head);

        let body = el("body")
            .attr("hx-boost", "true")
            .attr("hx-ext", "response-targets,head-support")
            .child(el("div").class("page").children(page.body));

        let mut out = String::from("<!DOCTYPE html>");
        Node::from(el("html").attr("lang", "en").child(head).child(body)).write_to(&mut out);
        Html(out)
    }

    fn static_head(&self) -> Node {
        let mut nodes = vec![
            el("meta").attr("charset", "utf-8").attr("hx-preserve", "true").into(),
            el("meta")
                .attr("name", "viewport")
                .attr("content", "width=device-width, initial-scale=1")
                .attr("hx-preserve", "true")
                .into(),
        ];
        nodes.extend(STYLESHEETS.iter().map(|href| {
            Node::from(el("link").attr("rel", "stylesheet").attr("href", self.asset(href)).attr("hx-preserve", "true"))
        }));
        nodes.extend(
            SCRIPTS.iter().map(|src| Node::from(el("script").attr("src", *src).attr("hx-preserve", "true"))),
        );
        Node::List(nodes)
    }

    /// Site header. With a title the page heading sits beside a link home;
    /// without one the site name is the heading.
    #[must_use]
    pub fn header(&self, variant: HeaderVariant, title: Option<&str>) -> Node {
        let heading = match title {
            Some(title) => el("div")
                .class("header-text header-titled")
                .child(el("h1").child(title))
                .child(el("a").attr("href", "/").class("header-home").child("Garrett").child(el("br")).child("Davis")),
            None => el("div").class("header-text").child(el("a").attr("href", "/").child(SITE_NAME)),
        };

        el("header")
            .class(match variant {
                HeaderVariant::Floating => "site-header sticky",
                HeaderVariant::Static => "site-header",
            })
            .child(heading)
            .child(self.nav())
            .into()
    }

    fn nav(&self) -> Node {
        let account = match &self.user {
            Some(user) => {
                let identifier = if user.login.is_empty() { "user" } else { user.login.as_str() };
                Node::List(vec![
                    el("form")
                        .attr("method", "POST")
                        .attr("action", "/auth/signout")
                        .child(el("button").child("signout"))
                        .into(),
                    el("menu")
                        .class("account-menu")
                        .child(el("li").child(el("a").attr("href", "/admin/user").child(identifier)))
                        .child(el("li").child(el("a").attr("href", "/admin/messages").child("messages")))
                        .into(),
                ])
            }
            None => Node::empty(),
        };

        el("nav")
            .child(account)
            .child(el("a").attr("href", "/contact").child("contact"))
            .child(el("a").attr("href", "/resume").child("resume"))
            .into()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderVariant {
    /// Sticks to the top of the viewport.
    Floating,
    Static,
}

// =============================================================================
// PAGE
// =============================================================================

/// Head extras and body content for one page.
#[derive(Debug, Clone, Default)]
pub struct Page {
    title: Option<String>,
    description: Option<String>,
    head: Vec<Node>,
    body: Vec<Node>,
}

impl Page {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = (!description.is_empty()).then_some(description);
        self
    }

    #[must_use]
    pub fn head(mut self, node: impl Into<Node>) -> Self {
        self.head.push(node.into());
        self
    }

    #[must_use]
    pub fn body(mut self, node: impl Into<Node>) -> Self {
        self.body.push(node.into());
        self
    }
}

/// Centered content column.
pub fn margins<I>(children: I) -> Node
where
    I: IntoIterator,
    I::Item: Into<Node>,
{
    el("div").class("margins").children(children).into()
}

#[cfg(test)]
#[path = "layout_test.rs"]
mod tests;
