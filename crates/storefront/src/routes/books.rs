//! Catalog route handlers.
//!
//! The catalog grid supports search-as-you-type: the search box issues an
//! htmx GET after the configured debounce and receives only the grid
//! fragment. Searching filters the cached catalog, so typing never costs
//! more than one `get-all-books` per cache lifetime.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
};
use bookshelf_core::{
    Book, BookId, FieldErrors, catalog::filter_by_title, validation::BookForm,
};
use serde::Deserialize;
use tracing::instrument;

use crate::alert::Alert;
use crate::filters;
use crate::middleware::{RequireAdmin, RequireUser};
use crate::page::PageContext;
use crate::routes::is_htmx;
use crate::state::AppState;
use crate::stores::Stores;

/// Link to a book's detail page.
pub fn book_href(id: &BookId) -> String {
    format!("/view-book-details/{}", urlencoding::encode(id.as_str()))
}

/// Link to a book's edit form.
pub fn edit_href(id: &BookId) -> String {
    format!("/updateBook/{}", urlencoding::encode(id.as_str()))
}

// =============================================================================
// Views
// =============================================================================

/// Book card display data for templates.
#[derive(Clone)]
pub struct BookCardView {
    /// Percent-encoded id, safe to splice into a path.
    pub id: String,
    pub href: String,
    pub title: String,
    pub author: String,
    pub price: String,
    pub cover_url: String,
}

impl From<&Book> for BookCardView {
    fn from(book: &Book) -> Self {
        Self {
            id: urlencoding::encode(book.id.as_str()).into_owned(),
            href: book_href(&book.id),
            title: book.title.clone(),
            author: book.author.clone(),
            price: book.price.display(),
            cover_url: book.url.clone(),
        }
    }
}

/// Book detail display data for templates.
#[derive(Clone)]
pub struct BookDetailView {
    pub href: String,
    pub edit_href: String,
    pub title: String,
    pub author: String,
    pub price: String,
    pub cover_url: String,
    pub desc: String,
    pub language: String,
}

impl From<&Book> for BookDetailView {
    fn from(book: &Book) -> Self {
        Self {
            href: book_href(&book.id),
            edit_href: edit_href(&book.id),
            title: book.title.clone(),
            author: book.author.clone(),
            price: book.price.display(),
            cover_url: book.url.clone(),
            desc: book.desc.clone(),
            language: book.language.clone(),
        }
    }
}

/// The catalog grid, shared by the full page and the htmx fragment.
#[derive(Clone)]
pub struct BookGrid {
    pub books: Vec<BookCardView>,
    pub query: String,
    pub load_failed: bool,
}

impl BookGrid {
    fn new<'a>(books: impl IntoIterator<Item = &'a Book>, query: &str) -> Self {
        Self {
            books: books.into_iter().map(BookCardView::from).collect(),
            query: query.to_owned(),
            load_failed: false,
        }
    }

    fn failed(query: &str) -> Self {
        Self {
            books: Vec::new(),
            query: query.to_owned(),
            load_failed: true,
        }
    }
}

// =============================================================================
// Query / Form Types
// =============================================================================

/// Search query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub search: String,
}

// =============================================================================
// Templates
// =============================================================================

/// All-books page template.
#[derive(Template, WebTemplate)]
#[template(path = "books/index.html")]
pub struct BooksIndexTemplate {
    pub page: PageContext,
    pub grid: BookGrid,
}

/// Catalog grid fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/book_grid.html")]
pub struct BookGridTemplate {
    pub grid: BookGrid,
}

/// Book detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "books/show.html")]
pub struct BookShowTemplate {
    pub page: PageContext,
    pub book: Option<BookDetailView>,
}

/// Book edit page template.
#[derive(Template, WebTemplate)]
#[template(path = "books/edit.html")]
pub struct BookEditTemplate {
    pub page: PageContext,
    pub action: String,
    pub back_href: String,
    pub form: BookForm,
    pub errors: FieldErrors,
}

// =============================================================================
// Catalog
// =============================================================================

/// Display the catalog, filtered by `?search=`.
///
/// htmx requests get only the grid fragment.
#[instrument(skip(state, stores, headers))]
pub async fn index(
    State(state): State<AppState>,
    stores: Stores,
    headers: HeaderMap,
    Query(query): Query<SearchQuery>,
) -> Response {
    let (grid, alert) = match state.api().all_books().await {
        Ok(books) => (
            BookGrid::new(filter_by_title(&books, &query.search), &query.search),
            None,
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to fetch catalog");
            (
                BookGrid::failed(&query.search),
                Some(Alert::from_api_error("Loading Books", &e)),
            )
        }
    };

    if is_htmx(&headers) {
        return BookGridTemplate { grid }.into_response();
    }

    let page = PageContext::load_with_alert(&stores, &state, alert).await;
    BooksIndexTemplate { page, grid }.into_response()
}

/// Display a single book.
#[instrument(skip(state, stores))]
pub async fn show(
    State(state): State<AppState>,
    stores: Stores,
    Path(id): Path<BookId>,
) -> impl IntoResponse {
    match state.api().book_by_id(&id).await {
        Ok(book) => BookShowTemplate {
            page: PageContext::load(&stores, &state).await,
            book: Some(BookDetailView::from(&book)),
        },
        Err(e) => {
            tracing::warn!(error = %e, "Failed to fetch book");
            let alert = Alert::from_api_error("Loading Book", &e);
            BookShowTemplate {
                page: PageContext::load_with_alert(&stores, &state, Some(alert)).await,
                book: None,
            }
        }
    }
}

// =============================================================================
// Shopper Actions
// =============================================================================

/// Add a book to the visitor's favourites.
#[instrument(skip(state, stores, viewer))]
pub async fn favourite(
    State(state): State<AppState>,
    stores: Stores,
    RequireUser(viewer): RequireUser,
    Path(id): Path<BookId>,
) -> Redirect {
    let alert = match state.api().add_favourite(&viewer.auth, &id).await {
        Ok(message) => Alert::success_or("Added to Favourites", message, "Book added to favourites."),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to add favourite");
            Alert::from_api_error("Favourite", &e)
        }
    };
    stores.flash(alert).await;
    Redirect::to(&book_href(&id))
}

/// Add a book to the visitor's cart.
///
/// The cart store is updated locally once the API accepts the book, so the
/// badge is right before the cart page is ever reloaded.
#[instrument(skip(state, stores, viewer))]
pub async fn add_to_cart(
    State(state): State<AppState>,
    stores: Stores,
    RequireUser(viewer): RequireUser,
    Path(id): Path<BookId>,
) -> Redirect {
    let alert = match state.api().add_to_cart(&viewer.auth, &id).await {
        Ok(message) => {
            match state.api().book_by_id(&id).await {
                Ok(book) => {
                    if let Err(e) = stores.update_cart(|cart| cart.add_to_cart(&book)).await {
                        tracing::error!(error = %e, "Failed to store cart");
                    }
                }
                Err(e) => tracing::warn!(error = %e, "Added to cart but could not load book"),
            }
            Alert::success_or("Added to Cart", message, "Book added to cart.")
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to add to cart");
            Alert::from_api_error("Add to Cart", &e)
        }
    };
    stores.flash(alert).await;
    Redirect::to(&book_href(&id))
}

// =============================================================================
// Admin Actions
// =============================================================================

/// Delete a book from the catalog.
#[instrument(skip(state, stores, viewer))]
pub async fn delete(
    State(state): State<AppState>,
    stores: Stores,
    RequireAdmin(viewer): RequireAdmin,
    Path(id): Path<BookId>,
) -> Redirect {
    match state.api().delete_book(&viewer.auth, &id).await {
        Ok(message) => {
            stores
                .flash(Alert::success_or("Book Deleted", message, "The book was removed."))
                .await;
            Redirect::to("/all-books")
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to delete book");
            stores.flash(Alert::from_api_error("Delete", &e)).await;
            Redirect::to(&book_href(&id))
        }
    }
}

/// Display the edit form, prefilled from the current book.
#[instrument(skip(state, stores, _viewer))]
pub async fn edit(
    State(state): State<AppState>,
    stores: Stores,
    RequireAdmin(_viewer): RequireAdmin,
    Path(id): Path<BookId>,
) -> impl IntoResponse {
    let (alert, form) = match state.api().book_by_id(&id).await {
        Ok(book) => (None, BookForm::from(&book)),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to fetch book for editing");
            (
                Some(Alert::error("Error", "Failed to fetch book details.")),
                BookForm::default(),
            )
        }
    };
    let page = PageContext::load_with_alert(&stores, &state, alert).await;

    BookEditTemplate {
        page,
        action: edit_href(&id),
        back_href: book_href(&id),
        form,
        errors: FieldErrors::default(),
    }
}

/// Save the edit form.
///
/// Invalid input re-renders the form without calling the API.
#[instrument(skip(state, stores, viewer, form))]
pub async fn update(
    State(state): State<AppState>,
    stores: Stores,
    RequireAdmin(viewer): RequireAdmin,
    Path(id): Path<BookId>,
    Form(form): Form<BookForm>,
) -> Response {
    let rerender = |page: PageContext, form: BookForm, errors: FieldErrors| BookEditTemplate {
        page,
        action: edit_href(&id),
        back_href: book_href(&id),
        form,
        errors,
    };

    let book = match form.validate() {
        Ok(book) => book,
        Err(errors) => {
            let alert = Alert::invalid_form(&errors);
            let page = PageContext::load_with_alert(&stores, &state, Some(alert)).await;
            return rerender(page, form, errors).into_response();
        }
    };

    match state.api().update_book(&viewer.auth, &id, &book).await {
        Ok(message) => {
            stores
                .flash(Alert::success_or("Book Updated", message, "Book details saved."))
                .await;
            Redirect::to(&book_href(&id)).into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to update book");
            let alert = Alert::from_api_error("Update", &e);
            let page = PageContext::load_with_alert(&stores, &state, Some(alert)).await;
            rerender(page, form, FieldErrors::default()).into_response()
        }
    }
}
