use axum::http::StatusCode;
use axum::http::header::{CACHE_CONTROL, LOCATION, SET_COOKIE};

use super::test_support::TestApp;
use super::*;
use crate::state::test_helpers::test_app_state;

#[test]
fn route_table_keys() {
    let dir = tempfile::tempdir().unwrap();
    let keys = mux(test_app_state(dir.path())).unwrap().dispatch_keys();

    assert_eq!(
        keys,
        [
            "GET /admin/messages",
            "DELETE /admin/messages/{id}",
            "GET /admin/user",
            "POST /auth/signout",
            "GET /blog/{slug}",
            "GET /contact",
            "POST /contact",
            "GET /presentations/{slug}",
            "GET /resume",
            "GET /static/test/{*path}",
            "GET /",
        ]
    );
}

#[tokio::test]
async fn unknown_path_renders_not_found_page() {
    let app = TestApp::new().await;
    let res = app.get("/nope").await;

    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert!(res.body.contains("I don't exist yet. "));
    assert!(res.body.contains("<code>¯\\_(ツ)_/¯</code>"));
}

#[tokio::test]
async fn trailing_slash_redirects_before_routing() {
    let app = TestApp::new().await;
    let res = app.get("/resume/?print=1").await;

    assert_eq!(res.status, StatusCode::MOVED_PERMANENTLY);
    assert_eq!(res.headers[LOCATION], "/resume");
}

#[tokio::test]
async fn first_visit_gets_a_session_cookie() {
    let app = TestApp::new().await;
    let res = app.get("/").await;

    assert_eq!(res.status, StatusCode::OK);
    let cookie = res.headers[SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with("garrettdavisdev-session="));
}

#[tokio::test]
async fn static_assets_are_served_immutable() {
    let app = TestApp::new().await;
    let res = app.get("/static/test/css/site.css").await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.headers[CACHE_CONTROL], "max-age=31536000, immutable");
    assert_eq!(res.body, "body{}");
}

#[tokio::test]
async fn stale_cache_id_is_not_found() {
    let app = TestApp::new().await;
    let res = app.get("/static/old/css/site.css").await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn wrong_method_is_rejected() {
    let app = TestApp::new().await;
    let res = app.send(TestApp::request(axum::http::Method::PUT, "/resume").body(axum::body::Body::empty()).unwrap()).await;
    assert_eq!(res.status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn configured_admin_session_reaches_admin_pages() {
    use tower::ServiceExt;

    use crate::config::AppConfig;
    use crate::middleware::context::SESSION_COOKIE;
    use crate::state::test_helpers::test_content;

    let dir = tempfile::tempdir().unwrap();
    let static_dir = dir.path().display().to_string();
    let config = AppConfig::from_lookup(|key| match key {
        "ADMIN_LOGINS" => Some("octocat".to_owned()),
        "ADMIN_SESSIONS" => Some("seeded-session:octocat".to_owned()),
        "STATIC_DIR" => Some(static_dir.clone()),
        _ => None,
    })
    .unwrap();
    let router = app(AppState::in_memory(&config, test_content())).unwrap();

    let req = |session: &str| {
        axum::http::Request::get("/admin/user")
            .header(axum::http::header::COOKIE, format!("{SESSION_COOKIE}={session}"))
            .body(axum::body::Body::empty())
            .unwrap()
    };

    let res = router.clone().oneshot(req("seeded-session")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = router.oneshot(req("someone-else")).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}
