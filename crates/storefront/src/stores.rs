//! Per-visitor stores kept in the session record.
//!
//! [`Stores`] is the one container handlers use to read and mutate the
//! session store, the cart store and the pending alert. All three live in
//! the same tower-sessions record, so the identity used for API calls and
//! the identity shown in the UI cannot drift apart.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use bookshelf_core::{Cart, SessionState};
use tower_sessions::Session;

use crate::alert::Alert;

/// Session keys.
pub mod keys {
    /// The session store ([`bookshelf_core::SessionState`]).
    pub const SESSION_STATE: &str = "session_state";

    /// The cart store ([`bookshelf_core::Cart`]).
    pub const CART: &str = "cart";

    /// Alert to show on the next rendered page.
    pub const FLASH: &str = "flash";
}

pub type StoreResult<T> = Result<T, tower_sessions::session::Error>;

/// Extractor giving typed access to the visitor's stores.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(stores: Stores) -> impl IntoResponse {
///     let cart = stores.cart().await;
///     format!("{} items", cart.total_quantity())
/// }
/// ```
#[derive(Clone)]
pub struct Stores {
    session: Session,
}

impl<S> FromRequestParts<S> for Stores
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state).await?;
        Ok(Self { session })
    }
}

impl Stores {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }

    /// Current session state; the signed-out default when none is stored.
    pub async fn session_state(&self) -> SessionState {
        match self.session.get(keys::SESSION_STATE).await {
            Ok(state) => state.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read session state");
                SessionState::default()
            }
        }
    }

    /// Apply `update` to the session state and store the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the session record cannot be written.
    pub async fn update_session(
        &self,
        update: impl FnOnce(&mut SessionState),
    ) -> StoreResult<SessionState> {
        let mut state = self.session_state().await;
        update(&mut state);
        self.session.insert(keys::SESSION_STATE, &state).await?;
        Ok(state)
    }

    /// Current cart; empty when none is stored.
    pub async fn cart(&self) -> Cart {
        match self.session.get(keys::CART).await {
            Ok(cart) => cart.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read cart");
                Cart::default()
            }
        }
    }

    /// Apply `update` to the cart and store the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the session record cannot be written.
    pub async fn update_cart(&self, update: impl FnOnce(&mut Cart)) -> StoreResult<Cart> {
        let mut cart = self.cart().await;
        update(&mut cart);
        self.session.insert(keys::CART, &cart).await?;
        Ok(cart)
    }

    /// Queue an alert for the next page render.
    pub async fn flash(&self, alert: Alert) {
        if let Err(e) = self.session.insert(keys::FLASH, &alert).await {
            tracing::warn!(error = %e, title = %alert.title, "Failed to store flash alert");
        }
    }

    /// Take the pending alert, if any.
    pub async fn take_alert(&self) -> Option<Alert> {
        self.session.remove(keys::FLASH).await.ok().flatten()
    }

    /// Fresh session id after sign-in.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn cycle_id(&self) -> StoreResult<()> {
        self.session.cycle_id().await
    }

    /// Drop every store: the next request sees the empty default session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session record cannot be deleted.
    pub async fn reset(&self) -> StoreResult<()> {
        self.session.flush().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use bookshelf_core::{Book, BookId, Price, Role, UserId, UserPatch};
    use tower_sessions::MemoryStore;

    use super::*;

    fn stores() -> Stores {
        let store = Arc::new(MemoryStore::default());
        Stores::new(Session::new(None, store, None))
    }

    fn book() -> Book {
        Book {
            id: BookId::new("b1"),
            url: String::new(),
            title: "Dune".into(),
            author: "Frank Herbert".into(),
            price: Price::from_rupees(499),
            desc: String::new(),
            language: "English".into(),
        }
    }

    #[tokio::test]
    async fn test_empty_session_reads_defaults() {
        let stores = stores();
        assert_eq!(stores.session_state().await, SessionState::default());
        assert!(stores.cart().await.is_empty());
        assert!(stores.take_alert().await.is_none());
    }

    #[tokio::test]
    async fn test_updates_persist() {
        let stores = stores();
        stores
            .update_session(|s| {
                s.change_role(Role::Admin);
                s.set_user(UserPatch {
                    id: Some(UserId::new("u1")),
                    ..UserPatch::default()
                });
            })
            .await
            .unwrap();
        stores.update_cart(|c| c.add_to_cart(&book())).await.unwrap();

        let state = stores.session_state().await;
        assert_eq!(state.audience(), Role::Admin);
        assert_eq!(stores.cart().await.total_quantity(), 1);
    }

    #[tokio::test]
    async fn test_flash_is_taken_once() {
        let stores = stores();
        stores.flash(Alert::success("Saved", "Done")).await;
        assert_eq!(stores.take_alert().await.unwrap().title, "Saved");
        assert!(stores.take_alert().await.is_none());
    }

    #[tokio::test]
    async fn test_reset_returns_to_default() {
        let stores = stores();
        stores.update_session(|s| s.login()).await.unwrap();
        stores.update_cart(|c| c.add_to_cart(&book())).await.unwrap();

        stores.reset().await.unwrap();
        assert_eq!(stores.session_state().await, SessionState::default());
        assert!(stores.cart().await.is_empty());
    }
}
