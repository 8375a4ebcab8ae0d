//! Catalog search.

use crate::book::Book;

/// Books whose title contains `query`, ignoring case and surrounding
/// whitespace. An empty query matches everything; order is preserved.
#[must_use]
pub fn filter_by_title<'a>(books: &'a [Book], query: &str) -> Vec<&'a Book> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return books.iter().collect();
    }
    books
        .iter()
        .filter(|b| b.title.to_lowercase().contains(&needle))
        .collect()
}
