//! Session store: who the visitor is and what the UI shows for them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{Role, UserId};

/// Login state, role and display fields of the current visitor.
///
/// `Default` is the signed-out state and [`SessionState::logout`] always
/// returns to exactly that value.
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionState {
    pub is_logged_in: bool,
    pub role: Role,
    pub id: Option<UserId>,
    pub token: Option<String>,
    pub username: Option<String>,
    pub avatar: Option<String>,
}

/// Partial update for [`SessionState::set_user`].
///
/// Fields left as `None` (or set to an empty string) keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub id: Option<UserId>,
    pub token: Option<String>,
    pub username: Option<String>,
    pub avatar: Option<String>,
}

impl SessionState {
    pub const fn login(&mut self) {
        self.is_logged_in = true;
    }

    pub fn logout(&mut self) {
        *self = Self::default();
    }

    pub const fn change_role(&mut self, role: Role) {
        self.role = role;
    }

    /// Merge `patch` into the session and mark it logged in.
    pub fn set_user(&mut self, patch: UserPatch) {
        if let Some(id) = patch.id.filter(|id| !id.is_empty()) {
            self.id = Some(id);
        }
        merge(&mut self.token, patch.token);
        merge(&mut self.username, patch.username);
        merge(&mut self.avatar, patch.avatar);
        self.is_logged_in = true;
    }

    /// Role used to compose views: `Guest` until signed in.
    #[must_use]
    pub const fn audience(&self) -> Role {
        if self.is_logged_in { self.role } else { Role::Guest }
    }

    /// Credentials for authenticated API calls, when both are known.
    #[must_use]
    pub fn credentials(&self) -> Option<(&UserId, &str)> {
        match (&self.id, &self.token) {
            (Some(id), Some(token)) if self.is_logged_in => Some((id, token.as_str())),
            _ => None,
        }
    }
}

fn merge(slot: &mut Option<String>, value: Option<String>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        *slot = Some(value);
    }
}

impl fmt::Debug for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionState")
            .field("is_logged_in", &self.is_logged_in)
            .field("role", &self.role)
            .field("id", &self.id)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("username", &self.username)
            .field("avatar", &self.avatar)
            .finish()
    }
}
