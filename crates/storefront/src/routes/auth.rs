//! Authentication route handlers.
//!
//! Handles login, sign-up and logout against the bookstore API. Sign-in
//! starts from an empty session and cart, stores id, token and role, and
//! then fetches the profile so the header can show the username and avatar.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use bookshelf_core::{
    Cart, FieldErrors, UserPatch,
    validation::{LoginForm, SignUpForm},
};
use secrecy::ExposeSecret;
use tracing::instrument;

use crate::alert::Alert;
use crate::api::ApiAuth;
use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::RequireAuth;
use crate::page::PageContext;
use crate::state::AppState;
use crate::stores::Stores;

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub page: PageContext,
    pub username: String,
    pub errors: FieldErrors,
}

/// Sign-up page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/signup.html")]
pub struct SignUpTemplate {
    pub page: PageContext,
    pub username: String,
    pub email: String,
    pub address: String,
    pub errors: FieldErrors,
}

impl SignUpTemplate {
    /// Re-render `form` without the password.
    fn refill(page: PageContext, form: SignUpForm, errors: FieldErrors) -> Self {
        Self {
            page,
            username: form.username,
            email: form.email,
            address: form.address,
            errors,
        }
    }
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
#[instrument(skip(state, stores))]
pub async fn login_page(State(state): State<AppState>, stores: Stores) -> Response {
    if stores.session_state().await.is_logged_in {
        return Redirect::to("/profile").into_response();
    }
    LoginTemplate {
        page: PageContext::load(&stores, &state).await,
        username: String::new(),
        errors: FieldErrors::default(),
    }
    .into_response()
}

/// Handle login form submission.
///
/// An incomplete form is rejected before any request is made.
#[instrument(skip(state, stores, form))]
pub async fn login(
    State(state): State<AppState>,
    stores: Stores,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let rerender = |page: PageContext, errors: FieldErrors| LoginTemplate {
        page,
        username: form.username.clone(),
        errors,
    };

    let credentials = match form.validate() {
        Ok(credentials) => credentials,
        Err(errors) => {
            let alert = Alert::invalid_form(&errors);
            let page = PageContext::load_with_alert(&stores, &state, Some(alert)).await;
            return Ok(rerender(page, errors).into_response());
        }
    };

    let signed_in = match state.api().sign_in(&credentials).await {
        Ok(signed_in) => signed_in,
        Err(e) => {
            tracing::warn!(error = %e, username = %credentials.username, "Login failed");
            let alert = Alert::from_api_error("Login", &e);
            let page = PageContext::load_with_alert(&stores, &state, Some(alert)).await;
            return Ok(rerender(page, FieldErrors::default()).into_response());
        }
    };

    // A re-login over a live session must not inherit the previous
    // visitor's avatar or cart.
    stores.cycle_id().await?;
    stores.update_cart(Cart::clear_cart).await?;
    let patch = UserPatch {
        id: Some(signed_in.id.clone()),
        token: Some(signed_in.token.expose_secret().to_owned()),
        ..UserPatch::default()
    };
    stores
        .update_session(|session| {
            session.logout();
            session.login();
            session.change_role(signed_in.role);
            session.set_user(patch);
        })
        .await?;

    let auth = ApiAuth {
        id: signed_in.id,
        token: signed_in.token,
    };
    let username = match state.api().user_information(&auth).await {
        Ok(profile) => {
            let patch = UserPatch {
                username: Some(profile.username.clone()),
                avatar: profile.avatar,
                ..UserPatch::default()
            };
            stores.update_session(|session| session.set_user(patch)).await?;
            Some(profile.username)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Signed in but could not fetch profile");
            None
        }
    };

    set_sentry_user(&auth.id, username.as_deref());
    tracing::info!(user_id = %auth.id, role = %signed_in.role, "Signed in");
    stores
        .flash(Alert::success("Login Successful", "Welcome back!"))
        .await;
    Ok(Redirect::to("/profile").into_response())
}

// =============================================================================
// Sign-up Routes
// =============================================================================

/// Display the sign-up page.
#[instrument(skip(state, stores))]
pub async fn sign_up_page(State(state): State<AppState>, stores: Stores) -> Response {
    if stores.session_state().await.is_logged_in {
        return Redirect::to("/profile").into_response();
    }
    SignUpTemplate::refill(
        PageContext::load(&stores, &state).await,
        SignUpForm::default(),
        FieldErrors::default(),
    )
    .into_response()
}

/// Handle sign-up form submission.
#[instrument(skip(state, stores, form))]
pub async fn sign_up(
    State(state): State<AppState>,
    stores: Stores,
    Form(form): Form<SignUpForm>,
) -> Response {
    let account = match form.validate() {
        Ok(account) => account,
        Err(errors) => {
            let alert = Alert::invalid_form(&errors);
            let page = PageContext::load_with_alert(&stores, &state, Some(alert)).await;
            return SignUpTemplate::refill(page, form, errors).into_response();
        }
    };

    match state.api().sign_up(&account).await {
        Ok(message) => {
            stores
                .flash(Alert::success_or(
                    "Sign Up Successful",
                    message,
                    "Your account has been created!",
                ))
                .await;
            Redirect::to("/LogIn").into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, username = %account.username, "Sign-up failed");
            let alert = Alert::from_api_error("Sign Up", &e);
            let page = PageContext::load_with_alert(&stores, &state, Some(alert)).await;
            SignUpTemplate::refill(page, form, FieldErrors::default()).into_response()
        }
    }
}

// =============================================================================
// Logout
// =============================================================================

/// Handle logout.
///
/// Drops the whole session record, so the next request starts from the
/// signed-out default with an empty cart.
#[instrument(skip(stores, viewer))]
pub async fn logout(stores: Stores, RequireAuth(viewer): RequireAuth) -> Result<Redirect> {
    stores.reset().await?;
    clear_sentry_user();
    tracing::info!(user_id = %viewer.auth.id, "Signed out");
    Ok(Redirect::to("/"))
}
