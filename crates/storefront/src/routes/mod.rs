//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                                    - Recently added books
//! GET  /health                              - Health check
//!
//! # Catalog
//! GET  /all-books?search=                   - Catalog grid (grid fragment for HTMX)
//! GET  /view-book-details/{id}              - Book detail
//! POST /view-book-details/{id}/favourite    - Add to favourites (user)
//! POST /view-book-details/{id}/cart         - Add to cart (user)
//! POST /view-book-details/{id}/delete       - Delete book (admin)
//! GET  /updateBook/{id}                     - Edit form (admin)
//! POST /updateBook/{id}                     - Save edits (admin)
//!
//! # Cart (user)
//! GET  /cart                                - Cart page
//! POST /cart/remove/{id}                    - Remove line (cart fragment for HTMX)
//! POST /cart/place-order                    - Place order
//! GET  /cart/count                          - Cart count badge (fragment)
//!
//! # Profile (signed in)
//! GET  /profile                             - Favourites (user) or all orders (admin)
//! POST /profile/favourites/{id}/remove      - Remove favourite (empty fragment)
//! GET  /profile/orderHistory                - Order history
//! GET  /profile/settings                    - Account details
//! POST /profile/settings                    - Update address
//! POST /profile/settings/avatar             - Upload avatar (multipart)
//! GET  /profile/add-book                    - New book form (admin)
//! POST /profile/add-book                    - Create book (admin)
//! POST /profile/orders/{id}/status          - Change order status (admin, row fragment)
//!
//! # Auth
//! GET  /LogIn                               - Login page
//! POST /LogIn                               - Login action (rate limited)
//! GET  /SignUp                              - Sign-up page
//! POST /SignUp                              - Sign-up action (rate limited)
//! POST /logout                              - Logout action
//! ```

pub mod auth;
pub mod books;
pub mod cart;
pub mod home;
pub mod profile;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderMap,
    routing::{get, post},
};

use crate::avatar::MAX_UPLOAD_BYTES;
use crate::config::StorefrontConfig;
use crate::middleware::auth_rate_limiter;
use crate::state::AppState;

/// Room for the multipart framing and crop fields around the image itself.
const AVATAR_FORM_OVERHEAD: usize = 64 * 1024;

/// Whether the request was issued by htmx and wants a fragment.
pub(crate) fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get("HX-Request")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

/// Create the catalog routes router.
pub fn book_routes() -> Router<AppState> {
    Router::new()
        .route("/all-books", get(books::index))
        .route("/view-book-details/{id}", get(books::show))
        .route("/view-book-details/{id}/favourite", post(books::favourite))
        .route("/view-book-details/{id}/cart", post(books::add_to_cart))
        .route("/view-book-details/{id}/delete", post(books::delete))
        .route("/updateBook/{id}", get(books::edit).post(books::update))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/remove/{id}", post(cart::remove))
        .route("/place-order", post(cart::place_order))
        .route("/count", get(cart::count))
}

/// Create the profile routes router.
pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(profile::index))
        .route(
            "/favourites/{id}/remove",
            post(profile::remove_favourite),
        )
        .route("/orderHistory", get(profile::order_history))
        .route(
            "/settings",
            get(profile::settings).post(profile::update_address),
        )
        .route(
            "/settings/avatar",
            post(profile::update_avatar)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + AVATAR_FORM_OVERHEAD)),
        )
        .route(
            "/add-book",
            get(profile::add_book_page).post(profile::add_book),
        )
        .route("/orders/{id}/status", post(profile::update_status))
}

/// Create the auth routes router.
///
/// Only the credential-submitting POSTs sit behind the rate limiter.
pub fn auth_routes(config: &StorefrontConfig) -> Router<AppState> {
    let limited = Router::new()
        .route("/LogIn", post(auth::login))
        .route("/SignUp", post(auth::sign_up))
        .layer(auth_rate_limiter(config.trust_proxy_headers));

    Router::new()
        .route("/LogIn", get(auth::login_page))
        .route("/SignUp", get(auth::sign_up_page))
        .route("/logout", post(auth::logout))
        .merge(limited)
}

/// Create all routes for the storefront.
pub fn routes(config: &StorefrontConfig) -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .merge(book_routes())
        .merge(auth_routes(config))
        .nest("/cart", cart_routes())
        .nest("/profile", profile_routes())
}
