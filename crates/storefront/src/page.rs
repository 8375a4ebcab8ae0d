//! Data every full page needs: navigation, identity, alert, cart badge.

use bookshelf_core::{NavEntry, Role};

use crate::alert::Alert;
use crate::state::AppState;
use crate::stores::Stores;

/// Layout context rendered by `base.html`.
#[derive(Debug, Clone)]
pub struct PageContext {
    pub nav: &'static [NavEntry],
    pub role: Role,
    pub logged_in: bool,
    pub is_admin: bool,
    pub can_shop: bool,
    pub username: Option<String>,
    pub avatar: Option<String>,
    pub alert: Option<Alert>,
    pub cart_count: u32,
    pub search_debounce_ms: u128,
}

impl PageContext {
    /// Build the layout context, consuming any flashed alert.
    pub async fn load(stores: &Stores, state: &AppState) -> Self {
        Self::load_with_alert(stores, state, None).await
    }

    /// Build the layout context showing `alert`.
    ///
    /// A flashed alert is only consumed when `alert` is `None`, so it
    /// survives until a render that can show it.
    pub async fn load_with_alert(stores: &Stores, state: &AppState, alert: Option<Alert>) -> Self {
        let session = stores.session_state().await;
        let role = session.audience();
        let cart_count = if role.can_shop() {
            stores.cart().await.total_quantity()
        } else {
            0
        };
        let alert = match alert {
            Some(alert) => Some(alert),
            None => stores.take_alert().await,
        };

        Self {
            nav: NavEntry::for_role(role),
            role,
            logged_in: session.is_logged_in,
            is_admin: role.can_manage_catalog(),
            can_shop: role.can_shop(),
            username: session.username,
            avatar: session.avatar,
            alert,
            cart_count,
            search_debounce_ms: state.config().search_debounce.as_millis(),
        }
    }
}
