use axum::http::StatusCode;

use super::*;
use crate::routes::test_support::TestApp;
use crate::state::test_helpers::test_content;

#[test]
fn summary_links_to_post() {
    let content = test_content();
    let post = content.blog.get("hello-world").unwrap();
    assert_eq!(
        summary(post).render(),
        "<div class=\"post-summary\"><h2><a href=\"/blog/hello-world\">Hello World</a></h2><p class=\"post-description\">first post</p></div>"
    );
}

#[tokio::test]
async fn home_lists_only_live_posts() {
    let app = TestApp::new().await;
    let res = app.get("/").await;

    assert_eq!(res.status, StatusCode::OK);
    assert!(res.body.contains("<title>Garrett Davis</title>"));
    assert!(res.body.contains("<a href=\"/blog/hello-world\">Hello World</a>"));
    assert!(res.body.contains("first post"));
    assert!(!res.body.contains("Secret Draft"));
}

#[tokio::test]
async fn boosted_home_omits_static_head() {
    let app = TestApp::new().await;
    let req = TestApp::request(axum::http::Method::GET, "/")
        .header("hx-boosted", "true")
        .body(axum::body::Body::empty())
        .unwrap();
    let res = app.send(req).await;

    assert_eq!(res.status, StatusCode::OK);
    assert!(!res.body.contains("stylesheet"));
}
