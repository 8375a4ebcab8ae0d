//! Cart store: line items held for the current visitor.
//!
//! The server owns the real cart; this is the local copy rendered by the
//! storefront. It is replaced wholesale from `get-user-cart` and adjusted
//! optimistically after add/remove requests succeed.

use serde::{Deserialize, Serialize};

use crate::book::Book;
use crate::types::{BookId, Price};

/// One book in the cart with its quantity (always at least 1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(rename = "_id")]
    pub book_id: BookId,
    pub title: String,
    pub author: String,
    pub price: Price,
    #[serde(rename = "url")]
    pub cover_url: String,
    #[serde(default)]
    pub desc: String,
    pub quantity: u32,
}

impl CartItem {
    fn from_book(book: Book, quantity: u32) -> Self {
        Self {
            book_id: book.id,
            title: book.title,
            author: book.author,
            price: book.price,
            cover_url: book.url,
            desc: book.desc,
            quantity,
        }
    }

    /// `price * quantity` for this line.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price * self.quantity
    }
}

/// A cart entry as the server sends it.
///
/// Either a `{book, quantity}` pair or a bare book record, which counts as
/// a single copy.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CartEntry {
    Nested {
        book: Book,
        #[serde(default = "one")]
        quantity: u32,
    },
    Bare(Book),
}

const fn one() -> u32 {
    1
}

impl CartEntry {
    fn into_item(self) -> Option<CartItem> {
        let (book, quantity) = match self {
            Self::Nested { book, quantity } => (book, quantity),
            Self::Bare(book) => (book, 1),
        };
        (quantity > 0).then(|| CartItem::from_book(book, quantity))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Replace every item with the server's view of the cart.
    pub fn set_cart(&mut self, entries: Vec<CartEntry>) {
        self.items = entries.into_iter().filter_map(CartEntry::into_item).collect();
    }

    /// Add one copy of `book`.
    pub fn add_to_cart(&mut self, book: &Book) {
        if let Some(item) = self.items.iter_mut().find(|i| i.book_id == book.id) {
            item.quantity = item.quantity.saturating_add(1);
        } else {
            self.items.push(CartItem::from_book(book.clone(), 1));
        }
    }

    /// Remove one copy of the book; the line disappears at zero.
    pub fn remove_from_cart(&mut self, book_id: &BookId) {
        let Some(item) = self.items.iter_mut().find(|i| &i.book_id == book_id) else {
            return;
        };
        if item.quantity > 1 {
            item.quantity -= 1;
        } else {
            self.items.retain(|i| &i.book_id != book_id);
        }
    }

    pub fn clear_cart(&mut self) {
        self.items.clear();
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn total_price(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }

    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
