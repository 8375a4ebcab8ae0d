//! Authentication extractors.
//!
//! Provides extractors for requiring a signed-in visitor, optionally with a
//! specific role, in route handlers.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use bookshelf_core::{Role, SessionState};

use crate::api::ApiAuth;
use crate::stores::Stores;

/// A signed-in visitor: their session state plus API credentials.
#[derive(Debug, Clone)]
pub struct Viewer {
    pub state: SessionState,
    pub auth: ApiAuth,
}

impl Viewer {
    #[must_use]
    pub const fn role(&self) -> Role {
        self.state.audience()
    }
}

/// Error returned when a route's access rule is not met.
#[derive(Debug)]
pub enum AuthRejection {
    /// Not signed in: go to the login page.
    RedirectToLogin,
    /// Signed in with the wrong role: go back to the profile.
    RedirectToProfile,
    /// The session layer is missing.
    Unavailable,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/LogIn").into_response(),
            Self::RedirectToProfile => Redirect::to("/profile").into_response(),
            Self::Unavailable => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

async fn viewer<S: Send + Sync>(parts: &mut Parts, state: &S) -> Result<Viewer, AuthRejection> {
    let stores = Stores::from_request_parts(parts, state)
        .await
        .map_err(|_| AuthRejection::Unavailable)?;
    let session = stores.session_state().await;
    let auth = ApiAuth::from_session(&session).ok_or(AuthRejection::RedirectToLogin)?;
    Ok(Viewer {
        state: session,
        auth,
    })
}

/// Extractor that requires a signed-in visitor of any role.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireAuth(viewer): RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", viewer.state.username.unwrap_or_default())
/// }
/// ```
pub struct RequireAuth(pub Viewer);

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        viewer(parts, state).await.map(Self)
    }
}

/// Extractor that requires a signed-in shopper (`Role::User`).
pub struct RequireUser(pub Viewer);

impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let viewer = viewer(parts, state).await?;
        if viewer.role().can_shop() {
            Ok(Self(viewer))
        } else {
            Err(AuthRejection::RedirectToProfile)
        }
    }
}

/// Extractor that requires a signed-in admin.
pub struct RequireAdmin(pub Viewer);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let viewer = viewer(parts, state).await?;
        if viewer.role().can_manage_catalog() {
            Ok(Self(viewer))
        } else {
            Err(AuthRejection::RedirectToProfile)
        }
    }
}
