//! Login, logout and role-based access.

use axum::http::StatusCode;
use bookshelf_integration_tests::{TestApp, book_json, envelope, message};
use serde_json::json;
use wiremock::{
    Mock, ResponseTemplate,
    matchers::{method, path},
};

#[tokio::test]
async fn test_login_with_blank_username_never_calls_api() {
    let app = TestApp::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/sign-in"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.api)
        .await;

    let response = app
        .post_form("/LogIn", &[("username", "  "), ("password", "secret")])
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Username is required"));
    assert!(response.body.contains("Missing Information"));
}

#[tokio::test]
async fn test_rejected_credentials_show_api_message() {
    let app = TestApp::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/sign-in"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"message": "Invalid credentials"})),
        )
        .mount(&app.api)
        .await;

    let response = app
        .post_form("/LogIn", &[("username", "reader"), ("password", "wrong")])
        .await;

    assert!(response.location().is_none());
    assert!(response.body.contains("Invalid credentials"));
}

#[tokio::test]
async fn test_login_shows_username_and_avatar() {
    let app = TestApp::start().await;
    app.sign_in_as("user").await;
    Mock::given(method("GET"))
        .and(path("/api/v1/get-recent-books"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([]))))
        .mount(&app.api)
        .await;

    let profile = app.get("/").await;
    assert!(profile.body.contains("Login Successful"));
    assert!(profile.body.contains("https://img.example/reader.png"));

    // the flash is shown once
    let again = app.get("/").await;
    assert!(!again.body.contains("Login Successful"));
}

#[tokio::test]
async fn test_logout_resets_session() {
    let app = TestApp::start().await;
    app.sign_in_as("user").await;
    Mock::given(method("GET"))
        .and(path("/api/v1/get-user-cart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([]))))
        .mount(&app.api)
        .await;
    assert_eq!(app.get("/cart").await.status, StatusCode::OK);

    let logout = app.post_form("/logout", &[]).await;
    assert_eq!(logout.location(), Some("/"));

    let cart = app.get("/cart").await;
    assert_eq!(cart.location(), Some("/LogIn"));
}

#[tokio::test]
async fn test_logged_in_visitor_skips_login_page() {
    let app = TestApp::start().await;
    app.sign_in_as("user").await;

    assert_eq!(app.get("/LogIn").await.location(), Some("/profile"));
    assert_eq!(app.get("/SignUp").await.location(), Some("/profile"));
}

#[tokio::test]
async fn test_guest_is_sent_to_login() {
    let app = TestApp::start().await;

    assert_eq!(app.get("/profile").await.location(), Some("/LogIn"));
    assert_eq!(app.get("/cart").await.location(), Some("/LogIn"));
}

#[tokio::test]
async fn test_admin_cannot_open_cart() {
    let app = TestApp::start().await;
    app.sign_in_as("admin").await;

    assert_eq!(app.get("/cart").await.location(), Some("/profile"));
}

#[tokio::test]
async fn test_user_cannot_add_books() {
    let app = TestApp::start().await;
    app.sign_in_as("user").await;

    assert_eq!(app.get("/profile/add-book").await.location(), Some("/profile"));
}

#[tokio::test]
async fn test_sign_up_redirects_to_login() {
    let app = TestApp::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/sign-up"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Signup successful"})))
        .expect(1)
        .mount(&app.api)
        .await;

    let response = app
        .post_form(
            "/SignUp",
            &[
                ("username", "newreader"),
                ("email", "new@example.com"),
                ("password", "secret123"),
                ("address", "1 Library Lane"),
            ],
        )
        .await;

    assert_eq!(response.location(), Some("/LogIn"));
    assert!(app.get("/LogIn").await.body.contains("Sign Up Successful"));
}

#[tokio::test]
async fn test_relogin_starts_from_empty_session() {
    let app = TestApp::start().await;
    app.sign_in_as("user").await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/add-to-cart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(message("Book added to cart")))
        .mount(&app.api)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/get-book-by-id/b1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(book_json("b1", "Dune", 499))))
        .mount(&app.api)
        .await;
    app.post_form("/view-book-details/b1/cart", &[]).await;
    assert_eq!(app.get("/cart/count").await.body.trim(), "1");

    app.api.reset().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/sign-in"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u2",
            "role": "user",
            "token": "token-u2",
        })))
        .mount(&app.api)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/get-user-information"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "username": "second",
            "email": "second@example.com",
            "address": "4 Privet Drive",
            "role": "user",
        })))
        .mount(&app.api)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/get-recent-books"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([]))))
        .mount(&app.api)
        .await;

    let relogin = app
        .post_form("/LogIn", &[("username", "second"), ("password", "secret")])
        .await;
    assert_eq!(relogin.location(), Some("/profile"));

    let home = app.get("/").await;
    assert!(home.body.contains(r#"avatar-placeholder">S</span>"#));
    assert!(!home.body.contains("https://img.example/reader.png"));
    assert_eq!(app.get("/cart/count").await.body.trim(), "0");
}

#[tokio::test]
async fn test_flash_survives_a_page_with_its_own_alert() {
    let app = TestApp::start().await;
    app.sign_in_as("user").await;

    let invalid = app.post_form("/profile/settings", &[("address", "  ")]).await;
    assert!(invalid.body.contains("Missing Information"));
    assert!(!invalid.body.contains("Login Successful"));

    let settings = app.get("/profile/settings").await;
    assert!(settings.body.contains("Login Successful"));
}
