//! Cache types for catalog reads.

use bookshelf_core::{Book, BookId};

/// Cache key for catalog responses.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    AllBooks,
    RecentBooks,
    Book(BookId),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Books(Vec<Book>),
    Book(Box<Book>),
}
