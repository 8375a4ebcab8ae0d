//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::alert::Alert;
use crate::filters;
use crate::page::PageContext;
use crate::routes::books::BookCardView;
use crate::state::AppState;
use crate::stores::Stores;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub page: PageContext,
    pub recent_books: Vec<BookCardView>,
    pub load_failed: bool,
}

/// Display the home page with recently added books.
#[instrument(skip(state, stores))]
pub async fn home(State(state): State<AppState>, stores: Stores) -> impl IntoResponse {
    match state.api().recent_books().await {
        Ok(books) => HomeTemplate {
            page: PageContext::load(&stores, &state).await,
            recent_books: books.iter().map(BookCardView::from).collect(),
            load_failed: false,
        },
        Err(e) => {
            tracing::warn!(error = %e, "Failed to fetch recent books");
            let alert = Alert::from_api_error("Loading Books", &e);
            HomeTemplate {
                page: PageContext::load_with_alert(&stores, &state, Some(alert)).await,
                recent_books: Vec::new(),
                load_failed: true,
            }
        }
    }
}
