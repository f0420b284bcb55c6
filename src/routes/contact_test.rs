use async_trait::async_trait;
use axum::http::Method;

use super::*;
use crate::routes::test_support::TestApp;
use crate::services::messages::{ContactMessage, ListQuery, MessageError, MessageStore};

#[tokio::test]
async fn form_uses_a_known_placeholder() {
    let app = TestApp::new().await;
    let res = app.get("/contact").await;

    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.contains("<title>Contact Garrett</title>"));
    assert!(res.body.contains("method=\"POST\" action=\"/contact\" hx-post=\"/contact\""));
    assert!(res.body.contains("htmx.org@2.0.1"));
    assert!(res.body.contains("id=\"email-error\""));
    assert!(
        PLACEHOLDERS
            .iter()
            .any(|(name, email)| res.body.contains(&format!("placeholder=\"{name}\""))
                && res.body.contains(&format!("placeholder=\"{email}\"")))
    );
}

#[tokio::test]
async fn valid_submission_is_stored_and_thanked() {
    let app = TestApp::new().await;
    let res = app.post_htmx_form("/contact", "name=Ada+%3Cb%3E&email=ada%40example.com&message=Hello").await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(
        res.body,
        "<div class=\"form-success\">Thanks Ada &lt;b&gt;, I'll get back to you soon.</div>"
    );

    let stored = app.state.messages.list(ListQuery::default()).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].name, "Ada <b>");
    assert_eq!(stored[0].email, "ada@example.com");
}

#[tokio::test]
async fn invalid_submission_reports_field_errors() {
    let app = TestApp::new().await;
    let res = app.post_htmx_form("/contact", "name=&email=nope&message=hi").await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.body.starts_with("<span>Please fix these errors.</span>"));
    assert!(res.body.contains(
        "<div hx-swap-oob=\"innerHTML:#name-error\"><span>Name is required.</span></div>"
    ));
    assert!(res.body.contains(
        "<div hx-swap-oob=\"innerHTML:#email-error\"><span>Email must be a valid address.</span></div>"
    ));
    assert!(res.body.contains("<div hx-swap-oob=\"innerHTML:#message-error\"><span></span></div>"));
    assert_eq!(app.state.messages.count().await.unwrap(), 0);
}

#[tokio::test]
async fn unreadable_form_is_bad_request() {
    let app = TestApp::new().await;
    let req = TestApp::request(Method::POST, "/contact")
        .header(HX_REQUEST, "true")
        .body(axum::body::Body::from("{}"))
        .unwrap();
    let res = app.send(req).await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.body.contains("Some unknown error occurred. Please try again."));
}

struct FullStore;

#[async_trait]
impl MessageStore for FullStore {
    async fn create(&self, _message: NewMessage) -> Result<ContactMessage, MessageError> {
        Err(MessageError::Unavailable("disk full".into()))
    }

    async fn list(&self, _query: ListQuery) -> Result<Vec<ContactMessage>, MessageError> {
        Ok(Vec::new())
    }

    async fn count(&self) -> Result<usize, MessageError> {
        Ok(0)
    }

    async fn delete(&self, id: u64) -> Result<(), MessageError> {
        Err(MessageError::NotFound(id))
    }
}

#[tokio::test]
async fn store_failure_is_reported() {
    let app = TestApp::new().await;
    let mut state = app.state.clone();
    state.messages = std::sync::Arc::new(FullStore);

    let form = NewMessage { name: "Ada".into(), email: "ada@example.com".into(), message: "hi".into() };
    let mut headers = HeaderMap::new();
    headers.insert(HX_REQUEST, "true".parse().unwrap());
    let shell = Shell::new("/static/test", false, None);
    let res = submit(State(state), shell, headers, Ok(Form(form))).await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let body = String::from_utf8(body.to_vec()).unwrap();
    assert!(body.starts_with("<span>message store unavailable: disk full</span>"));
}

// =============================================================================
// WITHOUT HTMX
// =============================================================================

#[tokio::test]
async fn plain_post_is_stored_and_answered_with_a_page() {
    let app = TestApp::new().await;
    let res = app.post_form("/contact", "name=Ada&email=ada%40example.com&message=Hello").await;

    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.starts_with("<!DOCTYPE html>"));
    assert!(res.body.contains("<div class=\"form-success\">Thanks Ada, I'll get back to you soon.</div>"));
    assert!(!res.body.contains("<form class=\"contact-form\""));
    assert_eq!(app.state.messages.count().await.unwrap(), 1);
}

#[tokio::test]
async fn plain_post_with_errors_re_renders_the_form() {
    let app = TestApp::new().await;
    let res = app.post_form("/contact", "name=&email=nope&message=hi").await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.body.starts_with("<!DOCTYPE html>"));
    assert!(res.body.contains("<p class=\"field-error\" id=\"name-error\">Name is required.</p>"));
    assert!(res.body.contains("<p class=\"field-error\" id=\"email-error\">Email must be a valid address.</p>"));
    assert!(res.body.contains("<p class=\"field-error\" id=\"message-error\"></p>"));
    assert!(res.body.contains("<p class=\"form-error\" id=\"form-error\">Please fix these errors.</p>"));
    assert!(!res.body.contains("hx-swap-oob"));
    assert_eq!(app.state.messages.count().await.unwrap(), 0);
}
