//! Wire shapes of the bookstore API.

use bookshelf_core::{Role, SessionState, UserId};
use secrecy::SecretString;
use serde::Deserialize;

/// Credentials sent with every authenticated request.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct ApiAuth {
    pub id: UserId,
    pub token: SecretString,
}

impl ApiAuth {
    /// Credentials from a signed-in session, `None` for guests.
    #[must_use]
    pub fn from_session(session: &SessionState) -> Option<Self> {
        session.credentials().map(|(id, token)| Self {
            id: id.clone(),
            token: SecretString::from(token.to_owned()),
        })
    }
}

impl std::fmt::Debug for ApiAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiAuth")
            .field("id", &self.id)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Result of `sign-in`.
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub id: UserId,
    pub role: Role,
    pub token: SecretString,
}

/// `sign-in` answers with its fields at the top level, not in an envelope.
#[derive(Deserialize)]
pub(super) struct SignInBody {
    pub id: UserId,
    #[serde(default)]
    pub role: Role,
    pub token: String,
}

/// The `{data, message}` envelope used by most endpoints.
#[derive(Deserialize)]
pub(super) struct Envelope<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Only the `message` part of a response, for mutations.
#[derive(Deserialize)]
pub(super) struct MessageBody {
    #[serde(default)]
    pub message: Option<String>,
}

/// `data` of `update-avatar`.
#[derive(Deserialize)]
pub(super) struct AvatarData {
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Pull a human-readable message out of an error body.
pub(super) fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .find_map(|key| value.get(key).and_then(serde_json::Value::as_str))
        .map(str::trim)
        .filter(|msg| !msg.is_empty())
        .map(ToOwned::to_owned)
}
