//! The signed-in user as seen by the backend's auth endpoints.

use serde::{Deserialize, Serialize};

use super::email::Email;
use super::id::UserId;
use super::wire::{flag, list};

/// Current user record.
///
/// Owned by the backend's auth service; the application only reads it and
/// patches the onboarding fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    pub email: Email,
    #[serde(default, deserialize_with = "list::deserialize")]
    pub style_preferences: Vec<String>,
    #[serde(default, deserialize_with = "flag::deserialize")]
    pub onboarding_completed: bool,
}

impl User {
    /// Name to greet the user with.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| self.email.as_str())
    }
}

/// Partial update of the current user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_preferences: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub onboarding_completed: Option<bool>,
}

impl UserUpdate {
    /// Update carrying the chosen style preferences.
    #[must_use]
    pub const fn style_preferences(tags: Vec<String>) -> Self {
        Self {
            style_preferences: Some(tags),
            onboarding_completed: None,
        }
    }

    /// Update marking onboarding as finished.
    #[must_use]
    pub const fn onboarding_completed() -> Self {
        Self {
            style_preferences: None,
            onboarding_completed: Some(true),
        }
    }
}
