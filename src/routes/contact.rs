//! Contact form.
//!
//! DESIGN
//! ======
//! The form posts through htmx and swaps the response into itself. Field
//! errors come back as out-of-band swaps targeting the `*-error` paragraphs
//! under each input, with a general message in the main swap target.
//!
//! Without htmx the form is an ordinary `POST /contact`; the answer is then
//! the whole page, with errors filled into the same slots or the thanks
//! message in place of the form.

use axum::Form;
use axum::extract::State;
use axum::extract::rejection::FormRejection;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use rand::Rng;

use crate::render::html::{Element, Node, el};
use crate::render::layout::{HeaderVariant, Page, Shell, margins};
use crate::services::messages::{FieldErrors, NewMessage};
use crate::state::AppState;

pub const HX_REQUEST: &str = "hx-request";

/// Placeholder identities for the name and email inputs.
pub const PLACEHOLDERS: &[(&str, &str)] = &[
    ("John Doe", "john.doe@mail.com"),
    ("Jane Doe", "jane.doe@gmail.com"),
    ("Mark Smith", "mark.smith@missivemark.dev"),
    ("Sara Clay", "sara@clay.dev"),
];

const MESSAGE_PLACEHOLDER: &str = "¡Hej! ¿What do you think about this?";
const UNKNOWN_ERROR: &str = "Some unknown error occurred. Please try again.";
const FIX_ERRORS: &str = "Please fix these errors.";

/// `GET /contact`.
pub async fn form(shell: Shell) -> Html<String> {
    page(&shell, contact_form(None, &FieldErrors::default()).into())
}

fn page(shell: &Shell, content: Node) -> Html<String> {
    shell.render(
        Page::new()
            .title("Contact Garrett")
            .body(shell.header(HeaderVariant::Floating, None))
            .body(margins([content])),
    )
}

/// The form, with `general` and `fields` already written into the error
/// slots when re-rendering a rejected submission.
fn contact_form(general: Option<&str>, fields: &FieldErrors) -> Element {
    let (name, email) = PLACEHOLDERS[rand::rng().random_range(0..PLACEHOLDERS.len())];

    el("form")
        .class("contact-form")
        .attr("method", "POST")
        .attr("action", "/contact")
        .attr("hx-post", "/contact")
        .attr("hx-swap", "innerHTML")
        .attr("hx-target-error", "#form-error")
        .child(el("h2").child("I'd love to hear from you!"))
        .child(field(
            "Name",
            el("input").attr("name", "name").flag("required").attr("type", "text").attr("placeholder", name),
            fields.name,
        ))
        .child(field(
            "Email",
            el("input").attr("name", "email").flag("required").attr("type", "email").attr("placeholder", email),
            fields.email,
        ))
        .child(field(
            "Message",
            el("textarea").attr("name", "message").flag("required").attr("placeholder", MESSAGE_PLACEHOLDER),
            fields.message,
        ))
        .child(el("p").class("form-error").id("form-error").child(general.unwrap_or_default()))
        .child(el("button").attr("type", "submit").child("Send"))
}

fn field(label: &str, input: Element, error: Option<&str>) -> Node {
    let name = label.to_lowercase();
    el("div")
        .class("field")
        .child(el("label").attr("for", name.clone()).child(label))
        .child(input.id(name.clone()))
        .child(el("p").class("field-error").id(format!("{name}-error")).child(error.unwrap_or_default()))
        .into()
}

/// What became of a submission.
enum Outcome {
    Stored { name: String },
    Rejected { status: StatusCode, general: String, fields: FieldErrors },
}

/// `POST /contact`.
pub async fn submit(
    State(state): State<AppState>,
    shell: Shell,
    headers: HeaderMap,
    form: Result<Form<NewMessage>, FormRejection>,
) -> Response {
    let outcome = store(&state, form).await;
    let htmx = headers.get(HX_REQUEST).is_some_and(|v| v.as_bytes() == b"true");

    match (outcome, htmx) {
        (Outcome::Stored { name }, true) => Html(thanks(&name).render()).into_response(),
        (Outcome::Stored { name }, false) => page(&shell, thanks(&name)).into_response(),
        (Outcome::Rejected { status, general, fields }, true) => {
            (status, Html(errors(&general, &fields).render())).into_response()
        }
        (Outcome::Rejected { status, general, fields }, false) => {
            (status, page(&shell, contact_form(Some(&general), &fields).into())).into_response()
        }
    }
}

async fn store(state: &AppState, form: Result<Form<NewMessage>, FormRejection>) -> Outcome {
    let rejected = |status, general: &str, fields| Outcome::Rejected { status, general: general.to_owned(), fields };

    let submitted = match form {
        Ok(Form(submitted)) => submitted,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "unreadable contact form");
            return rejected(StatusCode::BAD_REQUEST, UNKNOWN_ERROR, FieldErrors::default());
        }
    };

    let message = match submitted.validate() {
        Ok(message) => message,
        Err(fields) => {
            tracing::warn!(?fields, "contact form validation failed");
            return rejected(StatusCode::BAD_REQUEST, FIX_ERRORS, fields);
        }
    };

    match state.messages.create(message).await {
        Ok(stored) => {
            tracing::info!(id = stored.id, "contact message stored");
            Outcome::Stored { name: stored.name }
        }
        Err(e) => {
            tracing::error!(error = %e, "error storing contact message");
            rejected(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string(), FieldErrors::default())
        }
    }
}

fn thanks(name: &str) -> Node {
    el("div").class("form-success").child(format!("Thanks {name}, I'll get back to you soon.")).into()
}

/// General message plus out-of-band updates for every field error slot.
fn errors(general: &str, fields: &FieldErrors) -> Node {
    let slot = |id: &str, error: Option<&'static str>| -> Node {
        el("div")
            .attr("hx-swap-oob", format!("innerHTML:#{id}-error"))
            .child(el("span").child(error.unwrap_or_default()))
            .into()
    };

    Node::List(vec![
        el("span").child(general).into(),
        slot("name", fields.name),
        slot("email", fields.email),
        slot("message", fields.message),
    ])
}

#[cfg(test)]
#[path = "contact_test.rs"]
mod tests;
