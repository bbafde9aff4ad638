//! Session-related types.
//!
//! Per-browser UI state kept between requests. The backend never sees any
//! of it until the user confirms an action.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use kiova_core::ItemId;
use kiova_core::styling::OutfitSelection;

/// Style Me picks for one anchor listing.
///
/// Opening the modal for a different listing starts a fresh selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleSession {
    /// Marketplace item the look is built around.
    pub anchor: ItemId,
    pub selection: OutfitSelection,
}

/// Session keys for UI state.
pub mod keys {
    /// Style moods picked on the first onboarding step.
    pub const MOOD_SELECTION: &str = "mood_selection";

    /// Uploaded items awaiting confirmation on the wardrobe upload step.
    pub const UPLOAD_DRAFTS: &str = "upload_drafts";

    /// Add-item dialog form state.
    pub const ITEM_DRAFT: &str = "item_draft";

    /// Style Me selection.
    pub const STYLE_SESSION: &str = "style_session";

    /// One-shot notice shown on the next page render.
    pub const FLASH: &str = "flash";
}

/// Read a value from the session; missing or undecodable values read as `None`.
pub async fn read<T: DeserializeOwned>(session: &Session, key: &str) -> Option<T> {
    session.get::<T>(key).await.ok().flatten()
}

/// Store a value in the session, logging (not failing) on store errors.
pub async fn write<T: Serialize + Send + Sync + ?Sized>(session: &Session, key: &str, value: &T) {
    if let Err(e) = session.insert(key, value).await {
        tracing::error!(key, "Failed to save session state: {e}");
    }
}

/// Remove a value from the session.
pub async fn clear(session: &Session, key: &str) {
    if let Err(e) = session.remove_value(key).await {
        tracing::error!(key, "Failed to clear session state: {e}");
    }
}

/// Queue a notice for the next rendered page.
pub async fn flash(session: &Session, message: impl Into<String>) {
    write(session, keys::FLASH, &message.into()).await;
}

/// Take the queued notice, if any.
pub async fn take_flash(session: &Session) -> Option<String> {
    session.remove::<String>(keys::FLASH).await.ok().flatten()
}
