//! Bookstore API client implementation.
//!
//! Uses `reqwest` 0.13 for HTTP. Catalog reads (all books, recent books,
//! single book) are cached using `moka` with a configurable TTL.

use std::sync::Arc;

use bookshelf_core::validation::{Credentials, NewAccount, NewBook};
use bookshelf_core::{Book, BookId, CartEntry, CartItem, Order, OrderId, OrderStatus, UserProfile};
use moka::future::Cache;
use reqwest::{Method, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::ApiError;
use super::cache::{CacheKey, CacheValue};
use super::types::{
    ApiAuth, AvatarData, Envelope, MessageBody, SignInBody, SignedIn, error_message,
};
use crate::config::StorefrontConfig;

// =============================================================================
// BookstoreClient
// =============================================================================

/// Client for the bookstore REST API.
///
/// Cheap to clone; all clones share one connection pool and one cache.
#[derive(Clone)]
pub struct BookstoreClient {
    inner: Arc<BookstoreClientInner>,
}

struct BookstoreClientInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Cache<CacheKey, CacheValue>,
}

impl BookstoreClient {
    /// Create a new API client.
    #[must_use]
    pub fn new(config: &StorefrontConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.catalog_cache_ttl)
            .build();

        Self {
            inner: Arc::new(BookstoreClientInner {
                client: reqwest::Client::new(),
                base_url: config.api_base_url.clone(),
                cache,
            }),
        }
    }

    /// Build `<base>/api/v1/<segments...>`, escaping each segment.
    fn endpoint(&self, name: &'static str, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(name))?
            .pop_if_empty()
            .extend(["api", "v1"])
            .extend(segments);
        Ok(url)
    }

    fn request(
        &self,
        method: Method,
        name: &'static str,
        segments: &[&str],
        auth: Option<&ApiAuth>,
    ) -> Result<RequestBuilder, ApiError> {
        let url = self.endpoint(name, segments)?;
        let mut builder = self.inner.client.request(method, url);
        if let Some(auth) = auth {
            builder = builder
                .bearer_auth(auth.token.expose_secret())
                .header("id", auth.id.as_str());
        }
        Ok(builder)
    }

    /// Send a request and return the raw body of a successful response.
    async fn send(&self, name: &'static str, builder: RequestBuilder) -> Result<String, ApiError> {
        let response = builder.send().await.map_err(ApiError::from_transport)?;
        let status = response.status();
        let body = response.text().await.map_err(ApiError::from_transport)?;

        if !status.is_success() {
            tracing::warn!(
                endpoint = name,
                status = %status,
                body = %body.chars().take(200).collect::<String>(),
                "Bookstore API returned non-success status"
            );
            return Err(ApiError::Rejected {
                status,
                message: error_message(&body),
            });
        }

        Ok(body)
    }

    /// Send and decode `body` directly as `T`.
    async fn fetch<T: DeserializeOwned>(
        &self,
        name: &'static str,
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        let body = self.send(name, builder).await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                endpoint = name,
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse bookstore API response"
            );
            ApiError::Parse(e)
        })
    }

    /// Send and unwrap the `data` field of a `{data, message}` envelope.
    async fn fetch_data<T: DeserializeOwned>(
        &self,
        name: &'static str,
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        let envelope: Envelope<T> = self.fetch(name, builder).await?;
        envelope.data.ok_or(ApiError::MissingData(name))
    }

    /// Send a mutation and return the server's message, if any.
    ///
    /// Success bodies that are not JSON are accepted; only the status matters.
    async fn mutate(&self, name: &'static str, builder: RequestBuilder) -> Result<Option<String>, ApiError> {
        let body = self.send(name, builder).await?;
        Ok(serde_json::from_str::<MessageBody>(&body)
            .ok()
            .and_then(|b| b.message))
    }

    // =========================================================================
    // Account
    // =========================================================================

    /// `POST sign-in`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the credentials are rejected.
    #[instrument(skip_all, fields(username = %credentials.username))]
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<SignedIn, ApiError> {
        let builder = self
            .request(Method::POST, "sign-in", &["sign-in"], None)?
            .json(credentials);
        let body: SignInBody = self.fetch("sign-in", builder).await?;
        Ok(SignedIn {
            id: body.id,
            role: body.role,
            token: SecretString::from(body.token),
        })
    }

    /// `POST sign-up`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the account is rejected.
    #[instrument(skip_all, fields(username = %account.username))]
    pub async fn sign_up(&self, account: &NewAccount) -> Result<Option<String>, ApiError> {
        let builder = self
            .request(Method::POST, "sign-up", &["sign-up"], None)?
            .json(account);
        self.mutate("sign-up", builder).await
    }

    /// `GET get-user-information`. The profile is returned unwrapped.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip_all, fields(user_id = %auth.id))]
    pub async fn user_information(&self, auth: &ApiAuth) -> Result<UserProfile, ApiError> {
        let builder = self.request(
            Method::GET,
            "get-user-information",
            &["get-user-information"],
            Some(auth),
        )?;
        self.fetch("get-user-information", builder).await
    }

    /// `PUT update-address`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip_all, fields(user_id = %auth.id))]
    pub async fn update_address(&self, auth: &ApiAuth, address: &str) -> Result<Option<String>, ApiError> {
        #[derive(Serialize)]
        struct Body<'a> {
            address: &'a str,
        }

        let builder = self
            .request(Method::PUT, "update-address", &["update-address"], Some(auth))?
            .json(&Body { address });
        self.mutate("update-address", builder).await
    }

    /// `PUT update-avatar` with a PNG in the `avatar` multipart field.
    ///
    /// Returns the new avatar URL when the API reports it.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip_all, fields(user_id = %auth.id, bytes = png.len()))]
    pub async fn update_avatar(&self, auth: &ApiAuth, png: Vec<u8>) -> Result<Option<String>, ApiError> {
        let part = reqwest::multipart::Part::bytes(png)
            .file_name("avatar.png")
            .mime_str("image/png")?;
        let form = reqwest::multipart::Form::new().part("avatar", part);

        let builder = self
            .request(Method::PUT, "update-avatar", &["update-avatar"], Some(auth))?
            .multipart(form);
        let body = self.send("update-avatar", builder).await?;
        Ok(serde_json::from_str::<Envelope<AvatarData>>(&body)
            .ok()
            .and_then(|e| e.data)
            .and_then(|d| d.avatar)
            .filter(|url| !url.is_empty()))
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// `GET get-all-books` (cached).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn all_books(&self) -> Result<Vec<Book>, ApiError> {
        self.cached_books(CacheKey::AllBooks, "get-all-books").await
    }

    /// `GET get-recent-books` (cached).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn recent_books(&self) -> Result<Vec<Book>, ApiError> {
        self.cached_books(CacheKey::RecentBooks, "get-recent-books").await
    }

    async fn cached_books(&self, key: CacheKey, name: &'static str) -> Result<Vec<Book>, ApiError> {
        if let Some(CacheValue::Books(books)) = self.inner.cache.get(&key).await {
            debug!(endpoint = name, "Cache hit");
            return Ok(books);
        }

        let builder = self.request(Method::GET, name, &[name], None)?;
        let books: Vec<Book> = self.fetch_data(name, builder).await?;

        self.inner
            .cache
            .insert(key, CacheValue::Books(books.clone()))
            .await;

        Ok(books)
    }

    /// `GET get-book-by-id/:id` (cached).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the book does not exist.
    #[instrument(skip(self), fields(book_id = %id))]
    pub async fn book_by_id(&self, id: &BookId) -> Result<Book, ApiError> {
        let key = CacheKey::Book(id.clone());
        if let Some(CacheValue::Book(book)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for book");
            return Ok(*book);
        }

        let builder = self.request(
            Method::GET,
            "get-book-by-id",
            &["get-book-by-id", id.as_str()],
            None,
        )?;
        let book: Book = self.fetch_data("get-book-by-id", builder).await?;

        self.inner
            .cache
            .insert(key, CacheValue::Book(Box::new(book.clone())))
            .await;

        Ok(book)
    }

    /// `POST add-book`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip_all, fields(title = %book.title))]
    pub async fn add_book(&self, auth: &ApiAuth, book: &NewBook) -> Result<Option<String>, ApiError> {
        let builder = self
            .request(Method::POST, "add-book", &["add-book"], Some(auth))?
            .json(book);
        let message = self.mutate("add-book", builder).await?;
        self.invalidate_catalog();
        Ok(message)
    }

    /// `PUT update-book` for the book named in the `bookid` header.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip_all, fields(book_id = %id))]
    pub async fn update_book(
        &self,
        auth: &ApiAuth,
        id: &BookId,
        book: &NewBook,
    ) -> Result<Option<String>, ApiError> {
        let builder = self
            .request(Method::PUT, "update-book", &["update-book"], Some(auth))?
            .header("bookid", id.as_str())
            .json(book);
        let message = self.mutate("update-book", builder).await?;
        self.invalidate_catalog();
        Ok(message)
    }

    /// `DELETE delete-book`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip_all, fields(book_id = %id))]
    pub async fn delete_book(&self, auth: &ApiAuth, id: &BookId) -> Result<Option<String>, ApiError> {
        let builder = self
            .request(Method::DELETE, "delete-book", &["delete-book"], Some(auth))?
            .header("bookid", id.as_str());
        let message = self.mutate("delete-book", builder).await?;
        self.invalidate_catalog();
        Ok(message)
    }

    /// Drop every cached catalog read.
    pub fn invalidate_catalog(&self) {
        debug!("Invalidating catalog cache");
        self.inner.cache.invalidate_all();
    }

    // =========================================================================
    // Favourites
    // =========================================================================

    /// `PUT add-book-to-favourite`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip_all, fields(book_id = %id))]
    pub async fn add_favourite(&self, auth: &ApiAuth, id: &BookId) -> Result<Option<String>, ApiError> {
        self.book_scoped_put(auth, "add-book-to-favourite", id).await
    }

    /// `PUT remove-book-from-favourite`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip_all, fields(book_id = %id))]
    pub async fn remove_favourite(&self, auth: &ApiAuth, id: &BookId) -> Result<Option<String>, ApiError> {
        self.book_scoped_put(auth, "remove-book-from-favourite", id).await
    }

    /// `GET get-favourite-books`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip_all)]
    pub async fn favourite_books(&self, auth: &ApiAuth) -> Result<Vec<Book>, ApiError> {
        let builder = self.request(
            Method::GET,
            "get-favourite-books",
            &["get-favourite-books"],
            Some(auth),
        )?;
        self.fetch_data("get-favourite-books", builder).await
    }

    async fn book_scoped_put(
        &self,
        auth: &ApiAuth,
        name: &'static str,
        id: &BookId,
    ) -> Result<Option<String>, ApiError> {
        let builder = self
            .request(Method::PUT, name, &[name], Some(auth))?
            .header("bookid", id.as_str());
        self.mutate(name, builder).await
    }

    // =========================================================================
    // Cart & orders
    // =========================================================================

    /// `PUT add-to-cart`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip_all, fields(book_id = %id))]
    pub async fn add_to_cart(&self, auth: &ApiAuth, id: &BookId) -> Result<Option<String>, ApiError> {
        self.book_scoped_put(auth, "add-to-cart", id).await
    }

    /// `GET get-user-cart`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip_all)]
    pub async fn user_cart(&self, auth: &ApiAuth) -> Result<Vec<CartEntry>, ApiError> {
        let builder = self.request(Method::GET, "get-user-cart", &["get-user-cart"], Some(auth))?;
        self.fetch_data("get-user-cart", builder).await
    }

    /// `PUT remove-from-cart/:id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip_all, fields(book_id = %id))]
    pub async fn remove_from_cart(&self, auth: &ApiAuth, id: &BookId) -> Result<Option<String>, ApiError> {
        let builder = self.request(
            Method::PUT,
            "remove-from-cart",
            &["remove-from-cart", id.as_str()],
            Some(auth),
        )?;
        self.mutate("remove-from-cart", builder).await
    }

    /// `POST place-order` with the current cart lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip_all, fields(lines = items.len()))]
    pub async fn place_order(&self, auth: &ApiAuth, items: &[CartItem]) -> Result<Option<String>, ApiError> {
        #[derive(Serialize)]
        struct Body<'a> {
            order: &'a [CartItem],
        }

        let builder = self
            .request(Method::POST, "place-order", &["place-order"], Some(auth))?
            .json(&Body { order: items });
        self.mutate("place-order", builder).await
    }

    /// `GET get-order-history`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip_all)]
    pub async fn order_history(&self, auth: &ApiAuth) -> Result<Vec<Order>, ApiError> {
        let builder = self.request(
            Method::GET,
            "get-order-history",
            &["get-order-history"],
            Some(auth),
        )?;
        self.fetch_data("get-order-history", builder).await
    }

    /// `GET get-all-orders` (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip_all)]
    pub async fn all_orders(&self, auth: &ApiAuth) -> Result<Vec<Order>, ApiError> {
        let builder = self.request(Method::GET, "get-all-orders", &["get-all-orders"], Some(auth))?;
        self.fetch_data("get-all-orders", builder).await
    }

    /// `PUT update-status/:id` (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip_all, fields(order_id = %id, status = %status))]
    pub async fn update_status(
        &self,
        auth: &ApiAuth,
        id: &OrderId,
        status: &OrderStatus,
    ) -> Result<Option<String>, ApiError> {
        #[derive(Serialize)]
        struct Body<'a> {
            status: &'a OrderStatus,
        }

        let builder = self
            .request(
                Method::PUT,
                "update-status",
                &["update-status", id.as_str()],
                Some(auth),
            )?
            .json(&Body { status });
        self.mutate("update-status", builder).await
    }
}
