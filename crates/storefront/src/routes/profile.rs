//! Profile route handlers.
//!
//! Every profile page renders inside a shell with a role-specific sidebar.
//! Shoppers land on their favourites, admins on the list of all orders.
//! Removing a favourite and changing an order status are HTMX swaps that
//! avoid refetching the whole section.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Multipart, Path, State, multipart::MultipartError},
    http::HeaderMap,
    response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
};
use bookshelf_core::{
    BookId, FieldErrors, Order, OrderId, OrderStatus, ProfileSection, UserPatch, UserProfile,
    validation::{AddressForm, BookForm, StatusForm},
};
use tracing::instrument;

use crate::alert::Alert;
use crate::avatar::{self, CropSquare};
use crate::filters;
use crate::middleware::{RequireAdmin, RequireAuth, RequireUser, Viewer};
use crate::page::PageContext;
use crate::routes::{books::BookCardView, books::book_href, is_htmx};
use crate::state::AppState;
use crate::stores::Stores;

/// Characters of the description shown in order tables.
const ORDER_DESC_CHARS: usize = 50;

// =============================================================================
// Views
// =============================================================================

/// A sidebar link.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionLink {
    pub title: &'static str,
    pub href: &'static str,
    pub active: bool,
}

/// Sidebar data shared by every profile page.
#[derive(Clone)]
pub struct ProfileShell {
    pub links: Vec<SectionLink>,
    pub username: String,
    pub email: String,
    pub avatar: Option<String>,
}

impl ProfileShell {
    fn new(viewer: &Viewer, profile: Option<&UserProfile>, active: ProfileSection) -> Self {
        let username = profile
            .map(|p| p.username.clone())
            .filter(|name| !name.is_empty())
            .or_else(|| viewer.state.username.clone())
            .unwrap_or_default();
        Self {
            links: ProfileSection::for_role(viewer.role())
                .iter()
                .map(|&section| SectionLink {
                    title: section.title(),
                    href: section.href(),
                    active: section == active,
                })
                .collect(),
            username,
            email: profile.map(|p| p.email.clone()).unwrap_or_default(),
            avatar: profile
                .and_then(|p| p.avatar.clone())
                .or_else(|| viewer.state.avatar.clone()),
        }
    }
}

/// Customer details embedded in an admin order row.
#[derive(Clone)]
pub struct CustomerView {
    pub username: String,
    pub email: String,
    pub address: String,
}

/// An entry of the admin status menu.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusOption {
    pub label: String,
    pub selected: bool,
}

/// One order table row.
#[derive(Clone)]
pub struct OrderRowView {
    pub position: usize,
    pub row_id: String,
    pub status_action: String,
    pub book_title: String,
    pub book_href: String,
    pub desc: String,
    pub price: String,
    pub status: String,
    pub tone_class: &'static str,
    pub status_options: Vec<StatusOption>,
    pub placed_on: Option<String>,
    pub customer: Option<CustomerView>,
}

impl OrderRowView {
    fn new(position: usize, order: &Order) -> Self {
        let (book_title, book_href, desc, price) = order.book.as_ref().map_or_else(
            || (String::new(), String::new(), String::new(), String::new()),
            |book| {
                (
                    book.title.clone(),
                    book_href(&book.id),
                    book.excerpt(ORDER_DESC_CHARS),
                    book.price.display(),
                )
            },
        );
        Self {
            position,
            row_id: Self::row_id(&order.id),
            status_action: format!(
                "/profile/orders/{}/status",
                urlencoding::encode(order.id.as_str())
            ),
            book_title,
            book_href,
            desc,
            price,
            status: order.status.label().to_owned(),
            tone_class: order.status.tone().css_class(),
            status_options: status_options(&order.status),
            placed_on: order.created_at.map(|at| at.format("%d %b %Y").to_string()),
            customer: order.user.as_ref().map(|user| CustomerView {
                username: user.username.clone(),
                email: user.email.clone(),
                address: user.address.clone(),
            }),
        }
    }

    /// DOM id of the row for `id`.
    fn row_id(id: &OrderId) -> String {
        format!("order-{}", urlencoding::encode(id.as_str()))
    }

    /// Rows for displayable orders, numbered from 1.
    fn list(orders: Vec<Order>) -> Vec<Self> {
        Order::displayable(orders)
            .iter()
            .enumerate()
            .map(|(i, order)| Self::new(i + 1, order))
            .collect()
    }
}

/// The admin status menu with `current` selected.
fn status_options(current: &OrderStatus) -> Vec<StatusOption> {
    OrderStatus::ALL
        .iter()
        .map(|status| StatusOption {
            label: status.label().to_owned(),
            selected: status == current,
        })
        .collect()
}

// =============================================================================
// Templates
// =============================================================================

/// Favourites section template.
#[derive(Template, WebTemplate)]
#[template(path = "profile/favourites.html")]
pub struct FavouritesTemplate {
    pub page: PageContext,
    pub shell: ProfileShell,
    pub books: Vec<BookCardView>,
    pub load_failed: bool,
}

/// Order history section template.
#[derive(Template, WebTemplate)]
#[template(path = "profile/order_history.html")]
pub struct OrderHistoryTemplate {
    pub page: PageContext,
    pub shell: ProfileShell,
    pub orders: Vec<OrderRowView>,
    pub load_failed: bool,
}

/// Settings section template.
#[derive(Template, WebTemplate)]
#[template(path = "profile/settings.html")]
pub struct SettingsTemplate {
    pub page: PageContext,
    pub shell: ProfileShell,
    pub address: String,
    pub errors: FieldErrors,
    pub load_failed: bool,
}

/// All-orders section template (admin).
#[derive(Template, WebTemplate)]
#[template(path = "profile/all_orders.html")]
pub struct AllOrdersTemplate {
    pub page: PageContext,
    pub shell: ProfileShell,
    pub orders: Vec<OrderRowView>,
    pub load_failed: bool,
}

/// Add-book section template (admin).
#[derive(Template, WebTemplate)]
#[template(path = "profile/add_book.html")]
pub struct AddBookTemplate {
    pub page: PageContext,
    pub shell: ProfileShell,
    pub form: BookForm,
    pub errors: FieldErrors,
}

/// Admin order row fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/order_row.html")]
pub struct OrderRowTemplate {
    pub order: OrderRowView,
}

// =============================================================================
// Helpers
// =============================================================================

/// The viewer's profile for the sidebar; `None` (logged) if it cannot be fetched.
async fn sidebar_profile(state: &AppState, viewer: &Viewer) -> Option<UserProfile> {
    match state.api().user_information(&viewer.auth).await {
        Ok(profile) => Some(profile),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to fetch user information");
            None
        }
    }
}

/// Reload the page for htmx requests, redirect plain form posts.
fn reload_or_redirect(headers: &HeaderMap, to: &str) -> Response {
    if is_htmx(headers) {
        AppendHeaders([("HX-Refresh", "true")]).into_response()
    } else {
        Redirect::to(to).into_response()
    }
}

async fn favourites_page(state: &AppState, stores: &Stores, viewer: &Viewer) -> FavouritesTemplate {
    let (profile, favourites) = tokio::join!(
        sidebar_profile(state, viewer),
        state.api().favourite_books(&viewer.auth)
    );
    let shell = ProfileShell::new(viewer, profile.as_ref(), ProfileSection::Favourites);

    match favourites {
        Ok(books) => FavouritesTemplate {
            page: PageContext::load(stores, state).await,
            shell,
            books: books.iter().map(BookCardView::from).collect(),
            load_failed: false,
        },
        Err(e) => {
            tracing::warn!(error = %e, "Failed to fetch favourites");
            let alert = Alert::from_api_error("Loading Favourites", &e);
            FavouritesTemplate {
                page: PageContext::load_with_alert(stores, state, Some(alert)).await,
                shell,
                books: Vec::new(),
                load_failed: true,
            }
        }
    }
}

async fn all_orders_page(state: &AppState, stores: &Stores, viewer: &Viewer) -> AllOrdersTemplate {
    let (profile, orders) = tokio::join!(
        sidebar_profile(state, viewer),
        state.api().all_orders(&viewer.auth)
    );
    let shell = ProfileShell::new(viewer, profile.as_ref(), ProfileSection::AllOrders);

    match orders {
        Ok(orders) => AllOrdersTemplate {
            page: PageContext::load(stores, state).await,
            shell,
            orders: OrderRowView::list(orders),
            load_failed: false,
        },
        Err(e) => {
            tracing::warn!(error = %e, "Failed to fetch all orders");
            AllOrdersTemplate {
                page: PageContext::load_with_alert(
                    stores,
                    state,
                    Some(Alert::error("Error", "Failed to fetch orders.")),
                )
                .await,
                shell,
                orders: Vec::new(),
                load_failed: true,
            }
        }
    }
}

async fn settings_page(
    state: &AppState,
    stores: &Stores,
    viewer: &Viewer,
    alert: Option<Alert>,
    errors: FieldErrors,
    submitted: Option<String>,
) -> SettingsTemplate {
    let profile = sidebar_profile(state, viewer).await;
    let shell = ProfileShell::new(viewer, profile.as_ref(), ProfileSection::Settings);
    let load_failed = profile.is_none();
    let alert = alert.or_else(|| {
        load_failed.then(|| Alert::error("Error", "Failed to fetch user data."))
    });
    let page = PageContext::load_with_alert(stores, state, alert).await;

    SettingsTemplate {
        page,
        shell,
        address: submitted
            .or_else(|| profile.map(|p| p.address))
            .unwrap_or_default(),
        errors,
        load_failed,
    }
}

// =============================================================================
// Profile Index
// =============================================================================

/// Display the profile with the role's index section.
#[instrument(skip(state, stores, viewer))]
pub async fn index(
    State(state): State<AppState>,
    stores: Stores,
    RequireAuth(viewer): RequireAuth,
) -> Response {
    match ProfileSection::index_for(viewer.role()) {
        Some(ProfileSection::AllOrders) => {
            all_orders_page(&state, &stores, &viewer).await.into_response()
        }
        Some(_) => favourites_page(&state, &stores, &viewer).await.into_response(),
        None => Redirect::to("/LogIn").into_response(),
    }
}

// =============================================================================
// Favourites
// =============================================================================

/// Remove a favourite.
///
/// htmx requests get an empty body on success so the card is swapped out
/// without reloading the list.
#[instrument(skip(state, stores, viewer, headers))]
pub async fn remove_favourite(
    State(state): State<AppState>,
    stores: Stores,
    RequireUser(viewer): RequireUser,
    headers: HeaderMap,
    Path(id): Path<BookId>,
) -> Response {
    match state.api().remove_favourite(&viewer.auth, &id).await {
        Ok(message) => {
            if is_htmx(&headers) {
                return Html("").into_response();
            }
            stores
                .flash(Alert::success_or("Removed", message, "Book removed from favourites."))
                .await;
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to remove favourite");
            stores.flash(Alert::from_api_error("Remove", &e)).await;
        }
    }
    reload_or_redirect(&headers, "/profile")
}

// =============================================================================
// Order History
// =============================================================================

/// Display the visitor's past orders.
#[instrument(skip(state, stores, viewer))]
pub async fn order_history(
    State(state): State<AppState>,
    stores: Stores,
    RequireAuth(viewer): RequireAuth,
) -> impl IntoResponse {
    let (profile, orders) = tokio::join!(
        sidebar_profile(&state, &viewer),
        state.api().order_history(&viewer.auth)
    );
    let shell = ProfileShell::new(&viewer, profile.as_ref(), ProfileSection::OrderHistory);

    match orders {
        Ok(orders) => OrderHistoryTemplate {
            page: PageContext::load(&stores, &state).await,
            shell,
            orders: OrderRowView::list(orders),
            load_failed: false,
        },
        Err(e) => {
            tracing::warn!(error = %e, "Failed to fetch order history");
            let alert = Alert::from_api_error("Loading Orders", &e);
            OrderHistoryTemplate {
                page: PageContext::load_with_alert(&stores, &state, Some(alert)).await,
                shell,
                orders: Vec::new(),
                load_failed: true,
            }
        }
    }
}

// =============================================================================
// Settings
// =============================================================================

/// Display account details and the address form.
#[instrument(skip(state, stores, viewer))]
pub async fn settings(
    State(state): State<AppState>,
    stores: Stores,
    RequireAuth(viewer): RequireAuth,
) -> impl IntoResponse {
    settings_page(&state, &stores, &viewer, None, FieldErrors::default(), None).await
}

/// Save a new address.
#[instrument(skip(state, stores, viewer, form))]
pub async fn update_address(
    State(state): State<AppState>,
    stores: Stores,
    RequireAuth(viewer): RequireAuth,
    Form(form): Form<AddressForm>,
) -> Response {
    let address = match form.validate() {
        Ok(address) => address,
        Err(errors) => {
            let alert = Alert::invalid_form(&errors);
            return settings_page(&state, &stores, &viewer, Some(alert), errors, Some(form.address))
                .await
                .into_response();
        }
    };

    match state.api().update_address(&viewer.auth, &address).await {
        Ok(message) => {
            stores
                .flash(Alert::success_or("Updated", message, "Address updated successfully!"))
                .await;
            Redirect::to("/profile/settings").into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to update address");
            let alert = Alert::error("Error", "Failed to update the address. Please try again.");
            settings_page(
                &state,
                &stores,
                &viewer,
                Some(alert),
                FieldErrors::default(),
                Some(address),
            )
            .await
            .into_response()
        }
    }
}

/// Image plus optional crop square posted by the avatar form.
#[derive(Debug, Default)]
struct AvatarUpload {
    image: Vec<u8>,
    x: Option<u32>,
    y: Option<u32>,
    size: Option<u32>,
}

impl AvatarUpload {
    async fn read(multipart: &mut Multipart) -> Result<Self, MultipartError> {
        let mut upload = Self::default();
        while let Some(field) = multipart.next_field().await? {
            match field.name() {
                Some("avatar") => upload.image = field.bytes().await?.to_vec(),
                Some("x") => upload.x = field.text().await?.trim().parse().ok(),
                Some("y") => upload.y = field.text().await?.trim().parse().ok(),
                Some("size") => upload.size = field.text().await?.trim().parse().ok(),
                _ => {}
            }
        }
        Ok(upload)
    }

    fn crop(&self) -> Option<CropSquare> {
        Some(CropSquare {
            x: self.x?,
            y: self.y?,
            size: self.size?,
        })
    }
}

/// Crop and upload a new avatar, then show it in the session.
///
/// When the API does not echo the stored URL, the profile is re-read to
/// pick it up; if that has none either, the session keeps the old avatar
/// and the visitor is warned.
#[instrument(skip(state, stores, viewer, multipart))]
pub async fn update_avatar(
    State(state): State<AppState>,
    stores: Stores,
    RequireAuth(viewer): RequireAuth,
    mut multipart: Multipart,
) -> Redirect {
    let upload = match AvatarUpload::read(&mut multipart).await {
        Ok(upload) => upload,
        Err(e) => {
            tracing::warn!(error = %e, "Malformed avatar upload");
            stores
                .flash(Alert::warning("Invalid Upload", "The avatar form could not be read."))
                .await;
            return Redirect::to("/profile/settings");
        }
    };

    let crop = upload.crop();
    let png = match avatar::process(upload.image, crop).await {
        Ok(png) => png,
        Err(e) => {
            tracing::info!(error = %e, "Rejected avatar image");
            stores.flash(Alert::warning("Invalid Image", e.to_string())).await;
            return Redirect::to("/profile/settings");
        }
    };

    let url = match state.api().update_avatar(&viewer.auth, png).await {
        Ok(Some(url)) => Some(url),
        Ok(None) => sidebar_profile(&state, &viewer).await.and_then(|p| p.avatar),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to upload avatar");
            stores.flash(Alert::from_api_error("Upload", &e)).await;
            return Redirect::to("/profile/settings");
        }
    };
    let Some(url) = url.filter(|url| !url.is_empty()) else {
        tracing::warn!("Avatar uploaded but no URL came back");
        stores
            .flash(Alert::warning(
                "Avatar Pending",
                "The upload was accepted but the new avatar could not be loaded yet.",
            ))
            .await;
        return Redirect::to("/profile/settings");
    };

    let patch = UserPatch {
        avatar: Some(url),
        ..UserPatch::default()
    };
    if let Err(e) = stores.update_session(|session| session.set_user(patch)).await {
        tracing::error!(error = %e, "Failed to store avatar in session");
    }
    stores
        .flash(Alert::success("Avatar Updated", "Your new avatar is saved."))
        .await;
    Redirect::to("/profile/settings")
}

// =============================================================================
// Admin: Add Book
// =============================================================================

async fn add_book_template(
    state: &AppState,
    stores: &Stores,
    viewer: &Viewer,
    form: BookForm,
    errors: FieldErrors,
    alert: Option<Alert>,
) -> AddBookTemplate {
    let profile = sidebar_profile(state, viewer).await;
    AddBookTemplate {
        page: PageContext::load_with_alert(stores, state, alert).await,
        shell: ProfileShell::new(viewer, profile.as_ref(), ProfileSection::AddBook),
        form,
        errors,
    }
}

/// Display the empty add-book form.
#[instrument(skip(state, stores, viewer))]
pub async fn add_book_page(
    State(state): State<AppState>,
    stores: Stores,
    RequireAdmin(viewer): RequireAdmin,
) -> impl IntoResponse {
    add_book_template(
        &state,
        &stores,
        &viewer,
        BookForm::default(),
        FieldErrors::default(),
        None,
    )
    .await
}

/// Create a book.
///
/// Invalid input re-renders the form without calling the API.
#[instrument(skip(state, stores, viewer, form))]
pub async fn add_book(
    State(state): State<AppState>,
    stores: Stores,
    RequireAdmin(viewer): RequireAdmin,
    Form(form): Form<BookForm>,
) -> Response {
    let book = match form.validate() {
        Ok(book) => book,
        Err(errors) => {
            let alert = Alert::invalid_form(&errors);
            return add_book_template(&state, &stores, &viewer, form, errors, Some(alert))
                .await
                .into_response();
        }
    };

    match state.api().add_book(&viewer.auth, &book).await {
        Ok(message) => {
            stores
                .flash(Alert::success_or("Book Added", message, "The book is now in the catalog."))
                .await;
            Redirect::to("/profile/add-book").into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to add book");
            let alert = Alert::from_api_error("Add Book", &e);
            add_book_template(
                &state,
                &stores,
                &viewer,
                form,
                FieldErrors::default(),
                Some(alert),
            )
            .await
            .into_response()
        }
    }
}

// =============================================================================
// Admin: Order Status
// =============================================================================

/// Change an order's status.
///
/// htmx requests get the refreshed table row. If the row cannot be rebuilt
/// the page is reloaded instead.
#[instrument(skip(state, stores, viewer, headers, form))]
pub async fn update_status(
    State(state): State<AppState>,
    stores: Stores,
    RequireAdmin(viewer): RequireAdmin,
    headers: HeaderMap,
    Path(id): Path<OrderId>,
    Form(form): Form<StatusForm>,
) -> Response {
    let status = match form.validate() {
        Ok(status) => status,
        Err(errors) => {
            stores
                .flash(Alert::warning("Select status", errors.summary()))
                .await;
            return reload_or_redirect(&headers, "/profile");
        }
    };

    if let Err(e) = state.api().update_status(&viewer.auth, &id, &status).await {
        tracing::warn!(error = %e, "Failed to update order status");
        stores
            .flash(Alert::error("Error", "Failed to update the order status."))
            .await;
        return reload_or_redirect(&headers, "/profile");
    }

    if is_htmx(&headers) {
        match state.api().all_orders(&viewer.auth).await {
            Ok(orders) => {
                let row_id = OrderRowView::row_id(&id);
                let row = OrderRowView::list(orders)
                    .into_iter()
                    .find(|row| row.row_id == row_id);
                if let Some(order) = row {
                    return OrderRowTemplate { order }.into_response();
                }
            }
            Err(e) => tracing::warn!(error = %e, "Failed to reload orders after status change"),
        }
    }

    stores
        .flash(Alert::success("Updated", format!("Order status set to {status}.")))
        .await;
    reload_or_redirect(&headers, "/profile")
}

#[cfg(test)]
mod tests {
    use bookshelf_core::{Book, Price, Role, SessionState, UserId};
    use secrecy::SecretString;

    use super::*;
    use crate::api::ApiAuth;

    fn viewer(role: Role) -> Viewer {
        let state = SessionState {
            is_logged_in: true,
            role,
            id: Some(UserId::new("u1")),
            token: Some("tok".into()),
            username: Some("reader".into()),
            avatar: None,
        };
        Viewer {
            state,
            auth: ApiAuth {
                id: UserId::new("u1"),
                token: SecretString::from("tok"),
            },
        }
    }

    fn order(id: &str, book: Option<Book>, status: OrderStatus) -> Order {
        Order {
            id: OrderId::new(id),
            book,
            user: Some(UserProfile {
                username: "buyer".into(),
                email: "buyer@example.com".into(),
                address: "12 Baker St".into(),
                ..UserProfile::default()
            }),
            status,
            created_at: None,
        }
    }

    fn book() -> Book {
        Book {
            id: BookId::new("b1"),
            url: String::new(),
            title: "Dune".into(),
            author: "Frank Herbert".into(),
            price: Price::from_rupees(499),
            desc: "A desert planet, a noble family and the spice that binds an empire.".into(),
            language: "English".into(),
        }
    }

    #[test]
    fn test_shell_prefers_fetched_profile() {
        let viewer = viewer(Role::User);
        let profile = UserProfile {
            username: "Reader One".into(),
            email: "reader@example.com".into(),
            avatar: Some("https://img.example/a.png".into()),
            ..UserProfile::default()
        };
        let shell = ProfileShell::new(&viewer, Some(&profile), ProfileSection::Favourites);
        assert_eq!(shell.username, "Reader One");
        assert_eq!(shell.avatar.as_deref(), Some("https://img.example/a.png"));
        let active: Vec<_> = shell.links.iter().filter(|l| l.active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].title, "Favourites");

        let fallback = ProfileShell::new(&viewer, None, ProfileSection::Settings);
        assert_eq!(fallback.username, "reader");
        assert!(fallback.email.is_empty());
    }

    #[test]
    fn test_admin_shell_sections() {
        let shell = ProfileShell::new(&viewer(Role::Admin), None, ProfileSection::AllOrders);
        let titles: Vec<_> = shell.links.iter().map(|l| l.title).collect();
        assert_eq!(titles, ["All Orders", "Add Book"]);
    }

    #[test]
    fn test_order_rows_skip_deleted_books() {
        let rows = OrderRowView::list(vec![
            order("o1", None, OrderStatus::OrderPlaced),
            order("o2", Some(book()), OrderStatus::Cancelled),
        ]);
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.position, 1);
        assert_eq!(row.row_id, "order-o2");
        assert_eq!(row.status_action, "/profile/orders/o2/status");
        assert_eq!(row.tone_class, "status-cancelled");
        assert!(row.desc.ends_with("..."));
        assert_eq!(row.customer.as_ref().map(|c| c.address.as_str()), Some("12 Baker St"));
    }

    #[test]
    fn test_crop_needs_all_fields() {
        let partial = AvatarUpload {
            x: Some(1),
            y: Some(2),
            ..AvatarUpload::default()
        };
        assert_eq!(partial.crop(), None);

        let full = AvatarUpload {
            size: Some(50),
            ..partial
        };
        assert_eq!(full.crop(), Some(CropSquare { x: 1, y: 2, size: 50 }));
    }

    #[test]
    fn test_status_options_select_current() {
        let options = status_options(&OrderStatus::Delivered);
        let labels: Vec<_> = options.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, ["Order Placed", "Out for delivery", "Delivered", "Cancelled"]);
        let selected: Vec<_> = options
            .iter()
            .filter(|o| o.selected)
            .map(|o| o.label.as_str())
            .collect();
        assert_eq!(selected, ["Delivered"]);

        let custom = status_options(&OrderStatus::parse("Returned"));
        assert!(custom.iter().all(|o| !o.selected));
    }
}
