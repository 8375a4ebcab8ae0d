//! Read-only projections of server records: books, user profiles, orders.
//!
//! These mirror what the bookstore API returns. The storefront never
//! mutates them locally; they are displayed and then thrown away.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{BookId, OrderId, OrderStatus, Price, Role};

/// A book in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    #[serde(rename = "_id")]
    pub id: BookId,
    /// Cover image URL.
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub price: Price,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub language: String,
}

impl Book {
    /// First `max_chars` characters of the description, with `...` appended
    /// when anything was cut.
    #[must_use]
    pub fn excerpt(&self, max_chars: usize) -> String {
        excerpt(&self.desc, max_chars)
    }
}

/// Truncate `text` to `max_chars` characters on a char boundary.
#[must_use]
pub fn excerpt(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", text.split_at(cut).0),
        None => text.to_owned(),
    }
}

/// Profile returned by `get-user-information`, also embedded in orders.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub role: Role,
}

/// An order line as the API reports it: one book per order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: OrderId,
    /// `None` when the book was deleted after the order was placed.
    #[serde(default)]
    pub book: Option<Book>,
    #[serde(default)]
    pub user: Option<UserProfile>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default, rename = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Drop orders whose book no longer exists.
    #[must_use]
    pub fn displayable(orders: Vec<Self>) -> Vec<Self> {
        orders.into_iter().filter(|o| o.book.is_some()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_from_api_json() {
        let book: Book = serde_json::from_value(serde_json::json!({
            "_id": "b1",
            "url": "https://covers.example/dune.jpg",
            "title": "Dune",
            "author": "Frank Herbert",
            "price": 499,
            "desc": "Desert planet.",
            "language": "English",
            "__v": 0
        }))
        .unwrap();

        assert_eq!(book.id.as_str(), "b1");
        assert_eq!(book.price, Price::from_rupees(499));
    }

    #[test]
    fn test_book_missing_fields_default() {
        let book: Book = serde_json::from_str(r#"{"_id":"b2","title":"Sparse"}"#).unwrap();
        assert_eq!(book.author, "");
        assert_eq!(book.price, Price::ZERO);
    }

    #[test]
    fn test_excerpt() {
        assert_eq!(excerpt("short", 50), "short");
        assert_eq!(excerpt("abcdef", 3), "abc...");
        // multi-byte characters are not split
        assert_eq!(excerpt("ééééé", 2), "éé...");
    }

    #[test]
    fn test_displayable_skips_orders_without_book() {
        let orders: Vec<Order> = serde_json::from_value(serde_json::json!([
            {"_id": "o1", "book": {"_id": "b1", "title": "Dune"}, "status": "Delivered"},
            {"_id": "o2", "book": null, "status": "Order Placed"}
        ]))
        .unwrap();

        let shown = Order::displayable(orders);
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].status, OrderStatus::Delivered);
    }
}
