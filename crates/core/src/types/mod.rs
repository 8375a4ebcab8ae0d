//! Core types for the storefront.
//!
//! Type-safe wrappers for ids, prices, roles and order statuses.

pub mod email;
pub mod id;
pub mod price;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::{CURRENCY_SYMBOL, Price};
pub use status::*;
