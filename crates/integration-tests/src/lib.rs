//! Integration tests for the Bookshelf storefront.
//!
//! Each test builds the real storefront router against a [`MockServer`]
//! standing in for the bookstore REST API, then drives it with
//! `tower::ServiceExt::oneshot`. The session cookie is carried between
//! requests, so multi-step flows (sign in, add to cart, log out) behave as
//! they would in a browser.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bookshelf-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `auth` - login, sign-up, logout and role redirects
//! - `catalog` - search-as-you-type and catalog caching
//! - `shopping` - cart, favourites and orders
//! - `middleware` - health, security headers, request ids, rate limiting

#![allow(clippy::missing_panics_doc)]

use std::sync::Mutex;

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
};
use bookshelf_storefront::{
    config::StorefrontConfig, middleware::SESSION_COOKIE_NAME as SESSION_COOKIE, router,
    state::AppState,
};
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

/// A response with its body read to a string.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// Target of a redirect, if this is one.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }

    /// Value of `name`, if present and ASCII.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// The storefront wired to a mock bookstore API, plus a one-cookie jar.
pub struct TestApp {
    pub api: MockServer,
    router: Router,
    cookie: Mutex<Option<String>>,
}

impl TestApp {
    /// Start a mock API and a storefront pointed at it.
    pub async fn start() -> Self {
        let api = MockServer::start().await;
        let router = storefront_for(&api.uri());
        Self {
            api,
            router,
            cookie: Mutex::new(None),
        }
    }

    /// A storefront whose API lives at `api_url` instead of the mock.
    ///
    /// The mock server still starts so the struct stays uniform; it simply
    /// receives nothing.
    pub async fn with_api_url(api_url: &str) -> Self {
        let api = MockServer::start().await;
        Self {
            api,
            router: storefront_for(api_url),
            cookie: Mutex::new(None),
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Request::get(uri), Body::empty()).await
    }

    /// GET as htmx would issue it.
    pub async fn get_htmx(&self, uri: &str) -> TestResponse {
        self.send(Request::get(uri).header("HX-Request", "true"), Body::empty())
            .await
    }

    pub async fn post_form(&self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        self.send(form_request(uri), Body::from(encode_form(fields)))
            .await
    }

    /// Form POST with extra request headers.
    pub async fn post_form_with(
        &self,
        uri: &str,
        fields: &[(&str, &str)],
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let builder = headers
            .iter()
            .fold(form_request(uri), |builder, (name, value)| builder.header(*name, *value));
        self.send(builder, Body::from(encode_form(fields))).await
    }

    /// Form POST as htmx would issue it.
    pub async fn post_form_htmx(&self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        self.send(
            form_request(uri).header("HX-Request", "true"),
            Body::from(encode_form(fields)),
        )
        .await
    }

    /// Multipart POST carrying `file` as a PNG upload in `field`.
    pub async fn post_png(&self, uri: &str, field: &str, file: &[u8]) -> TestResponse {
        const BOUNDARY: &str = "bookshelf-test-boundary";
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; \
             filename=\"upload.png\"\r\nContent-Type: image/png\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(file);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        self.send(
            Request::post(uri).header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            ),
            Body::from(body),
        )
        .await
    }

    async fn send(&self, builder: axum::http::request::Builder, body: Body) -> TestResponse {
        let mut builder = builder;
        if let Some(cookie) = self.cookie.lock().expect("cookie jar poisoned").clone() {
            builder = builder.header(header::COOKIE, format!("{SESSION_COOKIE}={cookie}"));
        }
        let request = builder.body(body).expect("valid request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        self.remember_cookie(&headers);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    fn remember_cookie(&self, headers: &HeaderMap) {
        for value in headers.get_all(header::SET_COOKIE) {
            let Ok(value) = value.to_str() else { continue };
            let Some(pair) = value.split(';').next() else { continue };
            let Some((name, id)) = pair.split_once('=') else { continue };
            if name.trim() != SESSION_COOKIE {
                continue;
            }
            let expired = value.to_ascii_lowercase().contains("max-age=0") || id.is_empty();
            let mut jar = self.cookie.lock().expect("cookie jar poisoned");
            *jar = if expired { None } else { Some(id.to_owned()) };
        }
    }

    /// Mount sign-in and profile mocks for `role`, then log in through the form.
    pub async fn sign_in_as(&self, role: &str) -> TestResponse {
        Mock::given(method("POST"))
            .and(path("/api/v1/sign-in"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "u1",
                "role": role,
                "token": "token-u1",
            })))
            .mount(&self.api)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/get-user-information"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "username": "reader",
                "email": "reader@example.com",
                "address": "12 Baker Street",
                "avatar": "https://img.example/reader.png",
                "role": role,
            })))
            .mount(&self.api)
            .await;

        let response = self
            .post_form("/LogIn", &[("username", "reader"), ("password", "secret")])
            .await;
        assert_eq!(response.location(), Some("/profile"), "login should succeed");
        response
    }
}

fn storefront_for(api_url: &str) -> Router {
    let config = StorefrontConfig::for_api(api_url).expect("valid API URL");
    router(AppState::new(config))
}

fn form_request(uri: &str) -> axum::http::request::Builder {
    Request::post(uri).header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
}

fn encode_form(fields: &[(&str, &str)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(fields)
        .finish()
}

/// A solid square PNG, `side` pixels wide.
#[must_use]
pub fn png(side: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(side, side, image::Rgba([40, 90, 160, 255]));
    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
        .expect("encode test png");
    out
}

/// A book record as the API sends it.
#[must_use]
pub fn book_json(id: &str, title: &str, price: u32) -> Value {
    json!({
        "_id": id,
        "url": format!("https://covers.example/{id}.jpg"),
        "title": title,
        "author": "Some Author",
        "price": price,
        "desc": format!("About {title}."),
        "language": "English",
    })
}

/// `{status, data}` envelope around `data`.
#[must_use]
pub fn envelope(data: Value) -> Value {
    json!({ "status": "Success", "data": data })
}

/// `{status, message}` mutation reply.
#[must_use]
pub fn message(text: &str) -> Value {
    json!({ "status": "Success", "message": text })
}
