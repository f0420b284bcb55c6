use axum::http::header::{LOCATION, SET_COOKIE};
use axum::http::{Method, StatusCode};

use super::*;
use crate::routes::test_support::{ADMIN_SESSION, TestApp};

#[tokio::test]
async fn signout_clears_session_and_redirects_home() {
    let app = TestApp::new().await;

    let res = app.as_admin(Method::POST, "/auth/signout").await;

    assert_eq!(res.status, StatusCode::SEE_OTHER);
    assert_eq!(res.headers[LOCATION], "/");
    let cookies: Vec<_> = res.headers.get_all(SET_COOKIE).iter().collect();
    assert_eq!(cookies.len(), 1);
    let cookie = cookies[0].to_str().unwrap();
    assert!(cookie.starts_with("garrettdavisdev-session=;"));
    assert!(cookie.contains("Max-Age=0"));

    assert!(app.state.sessions.user(ADMIN_SESSION).await.unwrap().is_none());
    assert_eq!(app.as_admin(Method::GET, "/admin/user").await.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn signout_without_cookie_still_expires_it() {
    let app = TestApp::new().await;
    let req = TestApp::request(Method::POST, "/auth/signout").body(axum::body::Body::empty()).unwrap();

    let res = app.send(req).await;

    assert_eq!(res.status, StatusCode::SEE_OTHER);
    assert_eq!(res.headers.get_all(SET_COOKIE).iter().count(), 1);
}

#[tokio::test]
async fn signout_requires_post() {
    let app = TestApp::new().await;
    assert_eq!(app.get("/auth/signout").await.status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn signout_handler_marks_cookie_secure_when_configured() {
    let app = TestApp::new().await;
    let mut state = app.state.clone();
    state.cookie_secure = true;
    let ctx = RequestContext { request_id: uuid::Uuid::new_v4(), session: ADMIN_SESSION.to_owned() };

    let res = signout(State(state), ctx).await;

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert!(res.headers()[SET_COOKIE].to_str().unwrap().contains("Secure"));
}
