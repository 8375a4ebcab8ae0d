//! Cart route handlers.
//!
//! The cart page reloads the server's cart into the cart store on every
//! visit. Removing a line uses HTMX to swap the cart body in place and
//! fires `cart-updated` so the header badge refreshes itself.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use bookshelf_core::{BookId, Cart, CartItem};
use tracing::instrument;

use crate::alert::Alert;
use crate::filters;
use crate::middleware::RequireUser;
use crate::page::PageContext;
use crate::routes::{books::book_href, is_htmx};
use crate::state::AppState;
use crate::stores::Stores;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartLineView {
    pub href: String,
    pub remove_action: String,
    pub title: String,
    pub author: String,
    pub cover_url: String,
    pub price: String,
    pub quantity: u32,
    pub line_total: String,
}

impl From<&CartItem> for CartLineView {
    fn from(item: &CartItem) -> Self {
        Self {
            href: book_href(&item.book_id),
            remove_action: format!(
                "/cart/remove/{}",
                urlencoding::encode(item.book_id.as_str())
            ),
            title: item.title.clone(),
            author: item.author.clone(),
            cover_url: item.cover_url.clone(),
            price: item.price.display(),
            quantity: item.quantity,
            line_total: item.line_total().display(),
        }
    }
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub total: String,
    pub item_count: u32,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items().iter().map(CartLineView::from).collect(),
            total: cart.total_price().display(),
            item_count: cart.total_quantity(),
        }
    }
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub page: PageContext,
    pub cart: CartView,
    pub notice: Option<Alert>,
    pub load_failed: bool,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
    /// Swapped into the page's alert area out of band.
    pub notice: Option<Alert>,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Display the cart page.
///
/// The server's cart replaces the local one. If it cannot be fetched the
/// page shows a retry placeholder instead of a stale cart.
#[instrument(skip(state, stores, viewer))]
pub async fn show(
    State(state): State<AppState>,
    stores: Stores,
    RequireUser(viewer): RequireUser,
) -> impl IntoResponse {
    match state.api().user_cart(&viewer.auth).await {
        Ok(entries) => {
            let cart = match stores.update_cart(|cart| cart.set_cart(entries)).await {
                Ok(cart) => cart,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to store cart");
                    stores.cart().await
                }
            };
            CartShowTemplate {
                page: PageContext::load(&stores, &state).await,
                cart: CartView::from(&cart),
                notice: None,
                load_failed: false,
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to fetch cart");
            let alert = Alert::error("Error", "Failed to fetch cart data.");
            let page = PageContext::load_with_alert(&stores, &state, Some(alert)).await;
            CartShowTemplate {
                page,
                cart: CartView::from(&Cart::default()),
                notice: None,
                load_failed: true,
            }
        }
    }
}

/// Remove a book from the cart.
///
/// htmx requests get the updated cart body; plain form posts are redirected
/// back to the cart page.
#[instrument(skip(state, stores, viewer, headers))]
pub async fn remove(
    State(state): State<AppState>,
    stores: Stores,
    RequireUser(viewer): RequireUser,
    headers: HeaderMap,
    Path(id): Path<BookId>,
) -> Response {
    let (cart, alert) = match state.api().remove_from_cart(&viewer.auth, &id).await {
        Ok(message) => {
            let cart = match stores.update_cart(|cart| cart.remove_from_cart(&id)).await {
                Ok(cart) => cart,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to store cart");
                    stores.cart().await
                }
            };
            (
                cart,
                Alert::success_or("Removed", message, "Book removed from cart."),
            )
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to remove from cart");
            (stores.cart().await, Alert::from_api_error("Remove", &e))
        }
    };

    if is_htmx(&headers) {
        return (
            AppendHeaders([("HX-Trigger", "cart-updated")]),
            CartItemsTemplate {
                cart: CartView::from(&cart),
                notice: Some(alert),
            },
        )
            .into_response();
    }

    stores.flash(alert).await;
    Redirect::to("/cart").into_response()
}

/// Place an order for everything in the cart.
#[instrument(skip(state, stores, viewer))]
pub async fn place_order(
    State(state): State<AppState>,
    stores: Stores,
    RequireUser(viewer): RequireUser,
) -> Redirect {
    let cart = stores.cart().await;
    if cart.is_empty() {
        stores
            .flash(Alert::warning("Empty Cart", "Add a book before placing an order."))
            .await;
        return Redirect::to("/cart");
    }

    match state.api().place_order(&viewer.auth, cart.items()).await {
        Ok(message) => {
            if let Err(e) = stores.update_cart(Cart::clear_cart).await {
                tracing::error!(error = %e, "Failed to clear cart");
            }
            stores
                .flash(Alert::success_or("Order Placed", message, "Your order has been placed."))
                .await;
            Redirect::to("/profile/orderHistory")
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to place order");
            stores.flash(Alert::from_api_error("Order", &e)).await;
            Redirect::to("/cart")
        }
    }
}

/// Get cart count badge (HTMX).
#[instrument(skip(stores))]
pub async fn count(stores: Stores) -> impl IntoResponse {
    let role = stores.session_state().await.audience();
    let count = if role.can_shop() {
        stores.cart().await.total_quantity()
    } else {
        0
    };
    CartCountTemplate { count }
}
