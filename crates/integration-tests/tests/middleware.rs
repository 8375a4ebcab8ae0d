//! Health check, response headers and rate limiting.

use axum::http::StatusCode;
use bookshelf_integration_tests::TestApp;
use bookshelf_storefront::middleware::REQUEST_ID_HEADER;
use serde_json::json;
use wiremock::{
    Mock, ResponseTemplate,
    matchers::{method, path},
};

#[tokio::test]
async fn test_health_carries_request_id_and_security_headers() {
    let app = TestApp::start().await;

    let response = app.get("/health").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "ok");
    assert!(response.header(REQUEST_ID_HEADER).is_some_and(|id| !id.is_empty()));
    assert!(
        response
            .header("content-security-policy")
            .is_some_and(|csp| csp.contains("default-src"))
    );
    assert_eq!(response.header("x-content-type-options"), Some("nosniff"));
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let app = TestApp::start().await;

    let response = app.get("/no-such-page").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_login_posts_are_rate_limited() {
    let app = TestApp::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/sign-in"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"message": "Invalid credentials"})),
        )
        .mount(&app.api)
        .await;

    for _ in 0..5 {
        let response = app
            .post_form("/LogIn", &[("username", "reader"), ("password", "wrong")])
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }

    let limited = app
        .post_form("/LogIn", &[("username", "reader"), ("password", "wrong")])
        .await;
    assert_eq!(limited.status, StatusCode::TOO_MANY_REQUESTS);

    // browsing stays open
    assert_eq!(app.get("/LogIn").await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_forwarded_for_does_not_open_new_buckets() {
    let app = TestApp::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/sign-in"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"message": "Invalid credentials"})),
        )
        .mount(&app.api)
        .await;

    let mut statuses = Vec::new();
    for n in 1..=6 {
        let spoofed = format!("203.0.113.{n}");
        let response = app
            .post_form_with(
                "/LogIn",
                &[("username", "reader"), ("password", "wrong")],
                &[("x-forwarded-for", spoofed.as_str())],
            )
            .await;
        statuses.push(response.status);
    }

    assert_eq!(statuses.last(), Some(&StatusCode::TOO_MANY_REQUESTS));
}
