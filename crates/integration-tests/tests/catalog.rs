//! Catalog browsing and search-as-you-type.

use axum::http::StatusCode;
use bookshelf_integration_tests::{TestApp, book_json, envelope};
use serde_json::json;
use wiremock::{
    Mock, ResponseTemplate,
    matchers::{method, path},
};

const CATALOG: [(&str, &str, u32); 10] = [
    ("b1", "Dune", 499),
    ("b2", "Dune Messiah", 399),
    ("b3", "Emma", 250),
    ("b4", "Children of DUNE", 450),
    ("b5", "Middlemarch", 320),
    ("b6", "The Dunwich Horror", 199),
    ("b7", "Persuasion", 240),
    ("b8", "God Emperor of Dune", 520),
    ("b9", "Beloved", 380),
    ("b10", "Redundant Systems", 610),
];

async fn mount_catalog(app: &TestApp, expected_calls: u64) {
    let books: Vec<_> = CATALOG
        .iter()
        .map(|&(id, title, price)| book_json(id, title, price))
        .collect();
    Mock::given(method("GET"))
        .and(path("/api/v1/get-all-books"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!(books))))
        .expect(expected_calls)
        .mount(&app.api)
        .await;
}

/// Ids of the book links in a rendered grid, in order.
fn listed_ids(body: &str) -> Vec<&str> {
    body.split("/view-book-details/")
        .skip(1)
        .filter_map(|rest| rest.split('"').next())
        .fold(Vec::new(), |mut ids, id| {
            if ids.last() != Some(&id) {
                ids.push(id);
            }
            ids
        })
}

#[tokio::test]
async fn test_search_returns_fragment_and_reuses_cached_catalog() {
    let app = TestApp::start().await;
    mount_catalog(&app, 1).await;

    let first = app.get_htmx("/all-books?search=dune").await;
    assert_eq!(first.status, StatusCode::OK);
    assert!(!first.body.contains("<html"));
    assert_eq!(listed_ids(&first.body), ["b1", "b2", "b4", "b8"]);

    let second = app.get_htmx("/all-books?search=EMMA").await;
    assert_eq!(listed_ids(&second.body), ["b3"]);

    let cleared = app.get_htmx("/all-books?search=").await;
    assert_eq!(listed_ids(&cleared.body).len(), CATALOG.len());
}

#[tokio::test]
async fn test_full_page_lists_every_book() {
    let app = TestApp::start().await;
    mount_catalog(&app, 1).await;

    let page = app.get("/all-books").await;
    assert!(page.body.contains("<html"));
    assert_eq!(listed_ids(&page.body).len(), CATALOG.len());
}

#[tokio::test]
async fn test_unreachable_api_shows_no_response_alert() {
    let app = TestApp::with_api_url("http://127.0.0.1:1").await;

    let page = app.get("/all-books").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("No Response"));
}

#[tokio::test]
async fn test_book_details_offer_cart_to_users_only() {
    let app = TestApp::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/get-book-by-id/b1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(book_json("b1", "Dune", 499))))
        .mount(&app.api)
        .await;

    let guest = app.get("/view-book-details/b1").await;
    assert!(guest.body.contains("Dune"));
    assert!(!guest.body.contains("/view-book-details/b1/cart"));

    app.sign_in_as("user").await;
    let user = app.get("/view-book-details/b1").await;
    assert!(user.body.contains("/view-book-details/b1/cart"));
}
