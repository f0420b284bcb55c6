use axum::body::Body;

use super::*;
use crate::mux::{Handler, Stack};

fn app() -> Handler {
    Stack::new()
        .with([trailing_slash()])
        .apply(Handler::from_fn(|req: Request| async move { req.uri().path().to_owned() }))
}

async fn get(uri: &str) -> axum::response::Response {
    app().run(Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

#[test]
fn canonical_path_rules() {
    assert_eq!(canonical_path("/"), None);
    assert_eq!(canonical_path("/blog"), None);
    assert_eq!(canonical_path("/blog/"), Some("/blog"));
    assert_eq!(canonical_path("/blog/post/"), Some("/blog/post"));
}

#[tokio::test]
async fn root_passes_through() {
    let res = get("/").await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn trailing_slash_redirects_permanently() {
    let res = get("/resume/").await;
    assert_eq!(res.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(res.headers()[LOCATION], "/resume");
}

#[tokio::test]
async fn redirect_drops_query() {
    let res = get("/admin/messages/?sort=DESC").await;
    assert_eq!(res.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(res.headers()[LOCATION], "/admin/messages");
}

#[tokio::test]
async fn clean_path_reaches_handler() {
    let res = get("/blog/hello?x=1").await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"/blog/hello");
}
