//! Logout route handler.

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::clear_sentry_user;
use crate::state::AppState;

/// Log out of the backend and drop all local UI state.
///
/// The backend call is best effort; the cached user and the browser session
/// are cleared either way.
#[instrument(skip(state, session))]
pub async fn logout(State(state): State<AppState>, session: Session) -> Response {
    if let Err(e) = state.current_user().logout().await {
        tracing::warn!("Backend logout failed: {e}");
    }
    clear_sentry_user();

    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {e}");
    }

    Redirect::to("/").into_response()
}
