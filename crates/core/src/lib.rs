//! Bookshelf Core - domain types and client-side stores.
//!
//! Shared by the `storefront` binary and the integration tests:
//!
//! - [`types`] - ids, prices, roles, order statuses, emails
//! - [`book`] - read-only projections of books, profiles and orders
//! - [`session`] - the session store (login state, role, identity)
//! - [`cart`] - the cart store and its derived totals
//! - [`nav`] - navigation entries and profile sections per role
//! - [`catalog`] - catalog search
//! - [`validation`] - form checks run before any API request
//!
//! # Architecture
//!
//! No I/O lives here. Every operation is a synchronous data transform; the
//! storefront crate owns HTTP, sessions and rendering.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod book;
pub mod cart;
pub mod catalog;
pub mod nav;
pub mod session;
pub mod types;
pub mod validation;

pub use book::{Book, Order, UserProfile};
pub use cart::{Cart, CartEntry, CartItem};
pub use nav::{NavEntry, ProfileSection};
pub use session::{SessionState, UserPatch};
pub use types::*;
pub use validation::FieldErrors;
