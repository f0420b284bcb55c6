//! Admin pages. Every route here sits behind the authorization middleware,
//! which attaches the signed-in [`CurrentUser`].
//!
//! The message list is htmx-driven: the first visit renders the full page,
//! later refreshes from the sort and limit controls swap in only the list
//! and the count, and push the new query into the address bar.

use axum::Extension;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use serde::Deserialize;

use crate::render::html::{Element, Node, el, text};
use crate::render::layout::{HeaderVariant, Page, Shell, margins};
use crate::services::messages::{ContactMessage, ListQuery, MAX_LIMIT, MessageError, SortOrder};
use crate::services::session::CurrentUser;
use crate::state::AppState;

pub const HX_CURRENT_URL: &str = "hx-current-url";
pub const HX_PUSH_URL: &str = "hx-push-url";

const LIMIT_CHOICES: &[usize] = &[10, 25, 100];

// =============================================================================
// MESSAGES
// =============================================================================

/// Raw `?sort=&limit=&offset=` parameters.
#[derive(Debug, Default, Deserialize)]
pub struct MessagesParams {
    sort: Option<SortOrder>,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl MessagesParams {
    /// Apply defaults and range checks.
    ///
    /// # Errors
    ///
    /// Returns a description of the first out-of-range value.
    pub fn into_query(self) -> Result<ListQuery, &'static str> {
        let defaults = ListQuery::default();
        let limit = match self.limit {
            None => defaults.limit,
            Some(limit) => usize::try_from(limit)
                .ok()
                .filter(|l| (1..=MAX_LIMIT).contains(l))
                .ok_or("limit must be between 1 and 100")?,
        };
        let offset = match self.offset {
            None => defaults.offset,
            Some(offset) => usize::try_from(offset).map_err(|_| "offset must not be negative")?,
        };
        Ok(ListQuery { sort: self.sort.unwrap_or(defaults.sort), limit, offset })
    }
}

/// `GET /admin/messages`.
pub async fn list_messages(
    State(state): State<AppState>,
    shell: Shell,
    uri: Uri,
    headers: HeaderMap,
    params: Result<Query<MessagesParams>, QueryRejection>,
) -> Response {
    let query = match params.map_err(|e| e.body_text()).and_then(|Query(p)| p.into_query().map_err(str::to_owned)) {
        Ok(query) => query,
        Err(reason) => {
            tracing::error!(%reason, "invalid message list query");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };
    tracing::info!(sort = query.sort.as_str(), query.limit, query.offset, "listing messages");

    let (messages, count) = match load_page(&state, query).await {
        Ok(page) => page,
        Err(e) => {
            tracing::error!(error = %e, "error listing messages");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let list = message_list(&messages);
    let counter = count_display(query.offset, messages.len(), count);

    if is_first_render(&headers, uri.path()) {
        let controls = el("form")
            .class("message-controls")
            .attr("method", "GET")
            .attr("action", "/admin/messages")
            .attr("hx-params", "*")
            .attr("hx-swap", "outerHTML swap:0.1s")
            .attr("hx-target", "next ul")
            .attr("hx-trigger", "submit, change delay:500ms")
            .child(sort_select(query.sort))
            .child(limit_select(query.limit))
            .child(counter);

        return shell
            .render(
                Page::new()
                    .title("Messages")
                    .body(shell.header(HeaderVariant::Floating, Some("Messages")))
                    .body(margins([Node::from(controls), list])),
            )
            .into_response();
    }

    let fragment = Node::List(vec![list, counter.attr("hx-swap-oob", "true").into()]);
    ([(HX_PUSH_URL, uri.to_string())], Html(fragment.render())).into_response()
}

async fn load_page(state: &AppState, query: ListQuery) -> Result<(Vec<ContactMessage>, usize), MessageError> {
    let messages = state.messages.list(query).await?;
    let count = state.messages.count().await?;
    Ok((messages, count))
}

/// Whether this request should get the full page rather than a fragment:
/// true unless htmx reports it is already showing this path.
fn is_first_render(headers: &HeaderMap, path: &str) -> bool {
    let Some(current) = headers.get(HX_CURRENT_URL) else {
        return true;
    };
    match current.to_str().ok().and_then(|v| v.parse::<Uri>().ok()) {
        Some(current) => current.path() != path,
        None => {
            tracing::warn!(header = ?current, "unparsable current url");
            true
        }
    }
}

fn message_list(messages: &[ContactMessage]) -> Node {
    el("ul")
        .class("messages")
        .attr("hx-target", "closest li")
        .attr("hx-swap", "outerHTML swap:0.1s")
        .children(messages.iter().map(message_item))
        .into()
}

fn message_item(msg: &ContactMessage) -> Node {
    el("li")
        .class("message")
        .child(
            el("div")
                .class("message-from")
                .child(el("span").child(&msg.name))
                .child(el("a").attr("href", format!("mailto:{}", msg.email)).attr("target", "_blank").child(&msg.email)),
        )
        .child(el("pre").child(&msg.message))
        .child(
            el("div")
                .class("message-actions")
                .child(el("p").child(msg.created_at.to_rfc2822()))
                .child(
                    el("button")
                        .attr("hx-delete", format!("/admin/messages/{}", msg.id))
                        .attr("aria-label", "delete")
                        .child("delete"),
                ),
        )
        .into()
}

/// "Showing a-b of n", or "Showing 0 of n" past the last message. Built as an
/// element so the fragment can mark it for an out-of-band swap.
fn count_display(offset: usize, shown: usize, total: usize) -> Element {
    let display = el("div").id("messages-count").child("Showing ");
    if shown == 0 {
        return display.child("0 of ").child(el("span").id("messages-count.total").child(total.to_string()));
    }
    display
        .child(el("span").id("messages-count.range-start").child((offset + 1).to_string()))
        .child("-")
        .child(el("span").id("messages-count.range-end").child((offset + shown).to_string()))
        .child(" of ")
        .child(el("span").id("messages-count.total").child(total.to_string()))
}

fn sort_select(sort: SortOrder) -> Node {
    let option = |value: SortOrder, label: &'static str| {
        el("option").attr("value", value.as_str()).flag_if(sort == value, "selected").child(label)
    };
    el("div")
        .child(el("label").attr("for", "messages-sort").child("Sort: "))
        .child(
            el("select")
                .id("messages-sort")
                .attr("name", "sort")
                .attr("hx-get", "/admin/messages")
                .child(option(SortOrder::Asc, "Oldest First"))
                .child(option(SortOrder::Desc, "Newest First")),
        )
        .into()
}

fn limit_select(limit: usize) -> Node {
    el("div")
        .child(el("label").attr("for", "messages-limit").child("Limit: "))
        .child(
            el("select").id("messages-limit").attr("name", "limit").attr("hx-get", "/admin/messages").children(
                LIMIT_CHOICES.iter().map(|choice| {
                    el("option").attr("value", choice.to_string()).flag_if(limit == *choice, "selected").child(choice.to_string())
                }),
            ),
        )
        .into()
}

/// `DELETE /admin/messages/{id}`.
pub async fn delete_message(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    let Ok(id) = id.parse::<u64>() else {
        tracing::error!(%id, "error parsing message id");
        return StatusCode::BAD_REQUEST;
    };

    match state.messages.delete(id).await {
        Ok(()) => {
            tracing::info!(id, "message deleted");
            StatusCode::OK
        }
        Err(MessageError::NotFound(_)) => {
            tracing::warn!(id, "message already gone");
            StatusCode::NOT_FOUND
        }
        Err(e) => {
            tracing::error!(error = %e, id, "error deleting message");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

// =============================================================================
// USER
// =============================================================================

/// `GET /admin/user`: the signed-in user as JSON.
pub async fn user(shell: Shell, Extension(user): Extension<CurrentUser>) -> Response {
    let json = match serde_json::to_string_pretty(&user) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!(error = %e, "error encoding user");
            let page = Page::new()
                .body(shell.header(HeaderVariant::Floating, None))
                .body(margins([el("p").child("An error has occurred.")]));
            return (StatusCode::INTERNAL_SERVER_ERROR, shell.render(page)).into_response();
        }
    };

    shell
        .render(
            Page::new()
                .title("User")
                .body(shell.header(HeaderVariant::Floating, Some("User")))
                .body(margins([el("pre").child(el("code").child(text(json)))])),
        )
        .into_response()
}

#[cfg(test)]
#[path = "admin_test.rs"]
mod tests;
