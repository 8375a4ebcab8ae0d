//! Cart, favourites and order management.

use axum::http::StatusCode;
use bookshelf_integration_tests::{TestApp, book_json, envelope, message, png};
use serde_json::json;
use wiremock::{
    Mock, ResponseTemplate,
    matchers::{body_json, body_partial_json, header, method, path},
};

#[tokio::test]
async fn test_cart_total_counts_nested_and_bare_entries() {
    let app = TestApp::start().await;
    app.sign_in_as("user").await;
    Mock::given(method("GET"))
        .and(path("/api/v1/get-user-cart"))
        .and(header("id", "u1"))
        .and(header("authorization", "Bearer token-u1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            {"book": book_json("b1", "Dune", 499), "quantity": 2},
            book_json("b2", "Emma", 250),
        ]))))
        .mount(&app.api)
        .await;

    let cart = app.get("/cart").await;
    assert_eq!(cart.status, StatusCode::OK);
    assert!(cart.body.contains("Dune"));
    assert!(cart.body.contains("Emma"));
    assert!(cart.body.contains("₹1248"));

    let count = app.get("/cart/count").await;
    assert_eq!(count.body.trim(), "3");
}

#[tokio::test]
async fn test_add_to_cart_updates_badge() {
    let app = TestApp::start().await;
    app.sign_in_as("user").await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/add-to-cart"))
        .and(header("bookid", "b1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(message("Book added to cart")))
        .expect(1)
        .mount(&app.api)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/get-book-by-id/b1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(book_json("b1", "Dune", 499))))
        .mount(&app.api)
        .await;

    assert_eq!(app.get("/cart/count").await.body.trim(), "0");

    let response = app.post_form("/view-book-details/b1/cart", &[]).await;
    assert_eq!(response.location(), Some("/view-book-details/b1"));

    assert_eq!(app.get("/cart/count").await.body.trim(), "1");
    let details = app.get("/view-book-details/b1").await;
    assert!(details.body.contains("Added to Cart"));
}

#[tokio::test]
async fn test_guest_cart_badge_is_zero() {
    let app = TestApp::start().await;

    let count = app.get("/cart/count").await;
    assert_eq!(count.status, StatusCode::OK);
    assert_eq!(count.body.trim(), "0");
}

#[tokio::test]
async fn test_htmx_remove_from_cart_returns_items_and_trigger() {
    let app = TestApp::start().await;
    app.sign_in_as("user").await;
    Mock::given(method("GET"))
        .and(path("/api/v1/get-user-cart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            {"book": book_json("b1", "Dune", 499), "quantity": 1},
            book_json("b2", "Emma", 250),
        ]))))
        .mount(&app.api)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/remove-from-cart/b1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(message("Book removed from cart")))
        .expect(1)
        .mount(&app.api)
        .await;
    app.get("/cart").await;

    let response = app.post_form_htmx("/cart/remove/b1", &[]).await;

    assert_eq!(response.header("hx-trigger"), Some("cart-updated"));
    assert!(!response.body.contains("<html"));
    assert!(response.body.contains("Emma"));
    assert!(!response.body.contains("/view-book-details/b1\""));
    assert_eq!(app.get("/cart/count").await.body.trim(), "1");
}

#[tokio::test]
async fn test_place_order_sends_lines_and_clears_cart() {
    let app = TestApp::start().await;
    app.sign_in_as("user").await;
    Mock::given(method("GET"))
        .and(path("/api/v1/get-user-cart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            {"book": book_json("b1", "Dune", 499), "quantity": 2},
        ]))))
        .mount(&app.api)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/place-order"))
        .and(body_partial_json(json!({
            "order": [{"_id": "b1", "title": "Dune", "quantity": 2}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(message("Order placed successfully")))
        .expect(1)
        .mount(&app.api)
        .await;
    app.get("/cart").await;

    let response = app.post_form("/cart/place-order", &[]).await;

    assert_eq!(response.location(), Some("/profile/orderHistory"));
    assert_eq!(app.get("/cart/count").await.body.trim(), "0");
}

#[tokio::test]
async fn test_empty_cart_is_not_ordered() {
    let app = TestApp::start().await;
    app.sign_in_as("user").await;
    Mock::given(method("POST"))
        .and(path("/api/v1/place-order"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.api)
        .await;

    let response = app.post_form("/cart/place-order", &[]).await;
    assert_eq!(response.location(), Some("/cart"));
}

#[tokio::test]
async fn test_htmx_favourite_removal_returns_empty_body() {
    let app = TestApp::start().await;
    app.sign_in_as("user").await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/remove-book-from-favourite"))
        .and(header("bookid", "b1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(message("Book removed from favourites")))
        .expect(1)
        .mount(&app.api)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/get-favourite-books"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([]))))
        .expect(0)
        .mount(&app.api)
        .await;

    let response = app.post_form_htmx("/profile/favourites/b1/remove", &[]).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.is_empty());
}

#[tokio::test]
async fn test_admin_status_update_returns_row() {
    let app = TestApp::start().await;
    app.sign_in_as("admin").await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/update-status/o1"))
        .and(body_json(json!({"status": "Delivered"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(message("Status updated")))
        .expect(1)
        .mount(&app.api)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/get-all-orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([{
            "_id": "o1",
            "book": book_json("b1", "Dune", 499),
            "user": {"username": "reader", "email": "reader@example.com", "address": "12 Baker Street"},
            "status": "Delivered",
        }]))))
        .mount(&app.api)
        .await;

    let response = app
        .post_form_htmx("/profile/orders/o1/status", &[("status", "Delivered")])
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.trim_start().starts_with("<tr"));
    assert!(response.body.contains(r#"value="Delivered" selected"#));
    assert!(response.body.contains("12 Baker Street"));
}

#[tokio::test]
async fn test_unknown_status_is_rejected_before_api() {
    let app = TestApp::start().await;
    app.sign_in_as("admin").await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/update-status/o1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.api)
        .await;

    let response = app
        .post_form("/profile/orders/o1/status", &[("status", "Lost")])
        .await;

    assert_eq!(response.location(), Some("/profile"));
}

#[tokio::test]
async fn test_avatar_without_returned_url_warns_and_keeps_old_one() {
    let app = TestApp::start().await;
    app.sign_in_as("user").await;

    app.api.reset().await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/update-avatar"))
        .respond_with(ResponseTemplate::new(200).set_body_json(message("Avatar updated")))
        .expect(1)
        .mount(&app.api)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/get-user-information"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "username": "reader",
            "email": "reader@example.com",
            "address": "12 Baker Street",
            "role": "user",
        })))
        .mount(&app.api)
        .await;

    let response = app.post_png("/profile/settings/avatar", "avatar", &png(64)).await;
    assert_eq!(response.location(), Some("/profile/settings"));

    let settings = app.get("/profile/settings").await;
    assert!(settings.body.contains("Avatar Pending"));
    assert!(!settings.body.contains("Avatar Updated"));
    assert!(settings.body.contains("https://img.example/reader.png"));
}
