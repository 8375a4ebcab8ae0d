//! Notice dialogs shown at the top of a page.
//!
//! An [`Alert`] is flashed into the session before a redirect and taken out
//! by the next page render, so it shows exactly once.

use bookshelf_core::FieldErrors;
use serde::{Deserialize, Serialize};

use crate::api::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Success,
    Warning,
    Error,
}

impl AlertKind {
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Success => "alert-success",
            Self::Warning => "alert-warning",
            Self::Error => "alert-error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub title: String,
    pub text: String,
}

pub const NO_RESPONSE_TEXT: &str = "No response received from server. Please try again.";

impl Alert {
    pub fn success(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Success,
            title: title.into(),
            text: text.into(),
        }
    }

    pub fn warning(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Warning,
            title: title.into(),
            text: text.into(),
        }
    }

    pub fn error(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Error,
            title: title.into(),
            text: text.into(),
        }
    }

    /// Success alert using the server's message, or `fallback` when it sent none.
    pub fn success_or(title: impl Into<String>, message: Option<String>, fallback: &str) -> Self {
        Self::success(title, message.unwrap_or_else(|| fallback.to_owned()))
    }

    /// Alert for a form that failed validation before any request was made.
    #[must_use]
    pub fn invalid_form(errors: &FieldErrors) -> Self {
        Self::warning("Missing Information", errors.summary())
    }

    /// Map an API failure onto the dialog the visitor sees.
    ///
    /// `action` names what was attempted, e.g. `"Login"`.
    #[must_use]
    pub fn from_api_error(action: &str, err: &ApiError) -> Self {
        match err {
            ApiError::Rejected { message, .. } => Self::error(
                format!("{action} Failed"),
                message
                    .clone()
                    .unwrap_or_else(|| "Something went wrong. Please try again.".to_owned()),
            ),
            ApiError::Unreachable(_) => Self::error("No Response", NO_RESPONSE_TEXT),
            ApiError::Http(_)
            | ApiError::Parse(_)
            | ApiError::MissingData(_)
            | ApiError::InvalidUrl(_) => Self::error(
                "Unexpected Error",
                "An unexpected error occurred. Please try again later.",
            ),
        }
    }
}
