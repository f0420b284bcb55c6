use axum::body::Body;
use axum::http::header::COOKIE;

use super::*;
use crate::mux::{Handler, Stack};

fn echo_session() -> Handler {
    let handler = |ctx: RequestContext| async move { ctx.session };
    Stack::new().with([request_context(false)]).apply(Handler::from_axum(handler, ()))
}

async fn body_text(res: Response) -> String {
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn existing_session_cookie_is_reused() {
    let req = Request::builder()
        .uri("/")
        .header(COOKIE, format!("{SESSION_COOKIE}=abc-123; other=x"))
        .body(Body::empty())
        .unwrap();

    let res = echo_session().run(req).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().get(SET_COOKIE).is_none());
    assert_eq!(body_text(res).await, "abc-123");
}

#[tokio::test]
async fn missing_session_cookie_is_minted() {
    let req = Request::builder().uri("/").body(Body::empty()).unwrap();

    let res = echo_session().run(req).await;

    let set_cookie = res.headers().get(SET_COOKIE).unwrap().to_str().unwrap().to_owned();
    let session = body_text(res).await;
    assert!(Uuid::parse_str(&session).is_ok());
    assert!(set_cookie.starts_with(&format!("{SESSION_COOKIE}={session}")));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));
    assert!(set_cookie.contains("Path=/"));
    assert!(!set_cookie.contains("Secure"));
}

#[tokio::test]
async fn extractor_fails_without_middleware() {
    let handler = |ctx: RequestContext| async move { ctx.session };
    let req = Request::builder().uri("/").body(Body::empty()).unwrap();

    let res = Handler::from_axum(handler, ()).run(req).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn expired_cookie_clears_the_session() {
    let cookie = expired_session_cookie(true);
    assert_eq!(cookie.name(), SESSION_COOKIE);
    assert_eq!(cookie.value(), "");
    assert_eq!(cookie.max_age(), Some(Duration::ZERO));
    assert_eq!(cookie.secure(), Some(true));
}

#[tokio::test]
async fn handler_session_cookie_wins_over_minted_one() {
    let handler = |_ctx: RequestContext| async move {
        (CookieJar::new().add(expired_session_cookie(false)), "bye")
    };
    let app = Stack::new().with([request_context(false)]).apply(Handler::from_axum(handler, ()));

    let res = app.run(Request::builder().uri("/").body(Body::empty()).unwrap()).await;

    let cookies: Vec<_> = res.headers().get_all(SET_COOKIE).iter().collect();
    assert_eq!(cookies.len(), 1);
    assert!(cookies[0].to_str().unwrap().contains("Max-Age=0"));
}
