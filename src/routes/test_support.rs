//! Drive the assembled router in tests.

use axum::Router;
use axum::body::Body;
use axum::extract::Request;
use axum::http::header::{CONTENT_TYPE, COOKIE};
use axum::http::{HeaderMap, Method, StatusCode};
use tempfile::TempDir;
use tower::ServiceExt;

use crate::middleware::context::SESSION_COOKIE;
use crate::state::AppState;
use crate::state::test_helpers::{ADMIN_LOGIN, sign_in, test_app_state};

pub const ADMIN_SESSION: &str = "admin-session";

/// A router over the test content plus the temp dir backing its static files.
pub struct TestApp {
    pub state: AppState,
    pub router: Router,
    _static_dir: TempDir,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestApp {
    pub async fn new() -> Self {
        let static_dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(static_dir.path().join("css")).unwrap();
        std::fs::write(static_dir.path().join("css/site.css"), "body{}").unwrap();

        let state = test_app_state(static_dir.path());
        sign_in(&state, ADMIN_SESSION, ADMIN_LOGIN).await;
        let router = super::app(state.clone()).unwrap();
        Self { state, router, _static_dir: static_dir }
    }

    pub fn request(method: Method, uri: &str) -> axum::http::request::Builder {
        Request::builder().method(method).uri(uri)
    }

    pub async fn send(&self, req: Request) -> TestResponse {
        let res = self.router.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let headers = res.headers().clone();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        TestResponse { status, headers, body: String::from_utf8(bytes.to_vec()).unwrap() }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Self::request(Method::GET, uri).body(Body::empty()).unwrap()).await
    }

    /// `method uri` as the signed-in admin.
    pub async fn as_admin(&self, method: Method, uri: &str) -> TestResponse {
        self.as_session(ADMIN_SESSION, method, uri).await
    }

    pub async fn as_session(&self, session: &str, method: Method, uri: &str) -> TestResponse {
        let req = Self::request(method, uri)
            .header(COOKIE, format!("{SESSION_COOKIE}={session}"))
            .body(Body::empty())
            .unwrap();
        self.send(req).await
    }

    /// URL-encoded form POST, as a browser without htmx sends it.
    pub async fn post_form(&self, uri: &str, form: &str) -> TestResponse {
        let req = Self::request(Method::POST, uri)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_owned()))
            .unwrap();
        self.send(req).await
    }

    /// URL-encoded form POST issued by htmx.
    pub async fn post_htmx_form(&self, uri: &str, form: &str) -> TestResponse {
        let req = Self::request(Method::POST, uri)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header("hx-request", "true")
            .body(Body::from(form.to_owned()))
            .unwrap();
        self.send(req).await
    }
}
