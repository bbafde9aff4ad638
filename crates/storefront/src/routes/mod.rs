//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                                 - Home page (redirects into onboarding)
//! GET  /health                           - Health check
//!
//! # Onboarding
//! GET  /onboarding                       - Style mood selection
//! POST /onboarding/moods/{mood}          - Toggle a mood
//! POST /onboarding/moods                 - Save moods as style preferences
//! GET  /onboarding/upload                - Wardrobe upload page
//! POST /onboarding/upload                - Upload photos (multipart)
//! POST /onboarding/upload/{draft}/remove - Remove a draft
//! POST /onboarding/finish                - Create drafts, complete onboarding
//! POST /onboarding/skip                  - Complete onboarding without items
//!
//! # Wardrobe
//! GET  /wardrobe                         - Owned items (q, category)
//! GET  /wardrobe/new                     - Add-item form
//! POST /wardrobe/new/photo               - Upload and extract one photo
//! POST /wardrobe/new                     - Create item
//!
//! # Marketplace
//! GET  /marketplace                      - Listings (q, category, price, condition, sort)
//! GET  /marketplace/{id}/style           - Style Me
//! POST /marketplace/{id}/style/select    - Toggle a slot selection
//! POST /marketplace/{id}/style/save      - Save look as an outfit
//!
//! # Outfits
//! GET  /outfits                          - Saved outfits
//!
//! # Auth
//! POST /logout                           - Logout
//! ```

pub mod auth;
pub mod home;
pub mod marketplace;
pub mod onboarding;
pub mod outfits;
pub mod style_me;
pub mod views;
pub mod wardrobe;

use axum::{
    Router,
    extract::{DefaultBodyLimit, Multipart},
    routing::{get, post},
};

use crate::error::{AppError, Result};
use crate::services::UploadedPhoto;
use crate::state::AppState;

/// Request body cap for photo uploads.
const UPLOAD_BODY_LIMIT: usize = 20 * 1024 * 1024;

/// Collect the files posted under `field`.
///
/// Parts without a file name or without content are ignored, which is what
/// browsers send for an untouched file input.
pub(crate) async fn read_photos(mut multipart: Multipart, field: &str) -> Result<Vec<UploadedPhoto>> {
    let mut photos = Vec::new();

    while let Some(part) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("invalid upload: {e}")))?
    {
        if part.name() != Some(field) {
            continue;
        }
        let Some(file_name) = part.file_name().map(String::from) else {
            continue;
        };
        if file_name.is_empty() {
            continue;
        }
        let content_type = part.content_type().map(String::from);
        let bytes = part
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("invalid upload: {e}")))?;
        if bytes.is_empty() {
            continue;
        }

        photos.push(UploadedPhoto {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    Ok(photos)
}

/// Create the onboarding routes router.
pub fn onboarding_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(onboarding::moods))
        .route("/moods", post(onboarding::save_moods))
        .route("/moods/{mood}", post(onboarding::toggle_mood))
        .route(
            "/upload",
            get(onboarding::upload_page)
                .post(onboarding::upload)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/upload/{draft}/remove", post(onboarding::remove_draft))
        .route("/finish", post(onboarding::finish))
        .route("/skip", post(onboarding::skip))
}

/// Create the wardrobe routes router.
pub fn wardrobe_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wardrobe::index))
        .route("/new", get(wardrobe::new_item).post(wardrobe::create))
        .route(
            "/new/photo",
            post(wardrobe::upload_photo).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
}

/// Create the marketplace routes router.
pub fn marketplace_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(marketplace::index))
        .route("/{id}/style", get(style_me::show))
        .route("/{id}/style/select", post(style_me::select))
        .route("/{id}/style/save", post(style_me::save))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Onboarding flow
        .nest("/onboarding", onboarding_routes())
        // Wardrobe
        .nest("/wardrobe", wardrobe_routes())
        // Marketplace and Style Me
        .nest("/marketplace", marketplace_routes())
        // Saved outfits
        .route("/outfits", get(outfits::index))
        // Auth
        .route("/logout", post(auth::logout))
}
