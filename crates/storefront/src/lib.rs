//! Bookshelf Storefront library.
//!
//! This crate provides the storefront as a library so the full router can
//! be driven in tests without binding a socket. The binary in `main.rs`
//! adds Sentry and tracing initialisation on top of [`router`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod alert;
pub mod api;
pub mod avatar;
pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod page;
pub mod routes;
pub mod state;
pub mod stores;

use axum::{Router, middleware as axum_middleware, routing::get};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::error::AppError;
use crate::state::AppState;

/// Build the storefront router with its full middleware stack.
///
/// Sentry layers are left to the caller: they only make sense once a client
/// has been initialised.
pub fn router(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .merge(routes::routes(state.config()))
        .nest_service("/static", ServeDir::new("crates/storefront/static"))
        .fallback(not_found)
        .layer(session_layer)
        .layer(axum_middleware::from_fn(
            middleware::security_headers_middleware,
        ))
        .layer(axum_middleware::from_fn(middleware::request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the bookstore API.
async fn health() -> &'static str {
    "ok"
}

async fn not_found() -> AppError {
    AppError::NotFound("page".to_string())
}
