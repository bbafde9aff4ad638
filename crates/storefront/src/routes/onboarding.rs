//! Onboarding route handlers.
//!
//! Step one collects style moods in the session until the user has picked
//! enough; step two collects uploaded photos as drafts until the user
//! confirms or skips. Nothing reaches the backend before those confirmations.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Multipart, Path, State},
    response::{IntoResponse, Redirect},
};
use kiova_core::onboarding::{
    MIN_STYLE_MOODS, MoodSelection, OnboardingEvent, OnboardingStage, StyleMood, transition,
};
use kiova_core::{DraftId, ItemDraft, UserUpdate};
use tower_sessions::Session;
use tracing::instrument;

use super::read_photos;
use super::views::DraftView;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::models::session::{self as session_state, keys};
use crate::services::wardrobe;
use crate::state::AppState;

/// Multipart field carrying wardrobe photos.
const PHOTOS_FIELD: &str = "photos";

/// Mood tile display data.
#[derive(Clone)]
pub struct MoodView {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// Style mood selection page.
#[derive(Template, WebTemplate)]
#[template(path = "onboarding/moods.html")]
pub struct MoodsTemplate {
    pub moods: Vec<MoodView>,
    pub progress: String,
    pub continue_label: String,
    pub can_continue: bool,
    pub min_moods: usize,
    pub flash: Option<String>,
}

/// Wardrobe upload page.
#[derive(Template, WebTemplate)]
#[template(path = "onboarding/upload.html")]
pub struct UploadTemplate {
    pub drafts: Vec<DraftView>,
    pub flash: Option<String>,
}

// =============================================================================
// Session Helpers
// =============================================================================

async fn get_moods(session: &Session) -> MoodSelection {
    session_state::read(session, keys::MOOD_SELECTION)
        .await
        .unwrap_or_default()
}

async fn get_drafts(session: &Session) -> Vec<ItemDraft> {
    session_state::read(session, keys::UPLOAD_DRAFTS)
        .await
        .unwrap_or_default()
}

async fn set_drafts(session: &Session, drafts: &[ItemDraft]) {
    session_state::write(session, keys::UPLOAD_DRAFTS, drafts).await;
}

/// Stage to apply a wardrobe event to; a user who already finished stays
/// finished.
fn wardrobe_step(stage: OnboardingStage, event: OnboardingEvent) -> Result<OnboardingStage> {
    match stage {
        OnboardingStage::Complete => Ok(OnboardingStage::Complete),
        stage => Ok(transition(stage, event)?),
    }
}

// =============================================================================
// Step One: Style Moods
// =============================================================================

/// Display the mood grid.
#[instrument(skip(session))]
pub async fn moods(session: Session) -> impl IntoResponse {
    let selection = get_moods(&session).await;

    MoodsTemplate {
        moods: StyleMood::ALL
            .into_iter()
            .map(|mood| MoodView {
                value: mood.as_str().to_string(),
                label: mood.label().to_string(),
                selected: selection.contains(mood),
            })
            .collect(),
        progress: selection.progress(),
        continue_label: selection.continue_label(),
        can_continue: selection.can_continue(),
        min_moods: MIN_STYLE_MOODS,
        flash: session_state::take_flash(&session).await,
    }
}

/// Toggle one mood.
#[instrument(skip(session))]
pub async fn toggle_mood(session: Session, Path(mood): Path<String>) -> Result<Redirect> {
    let mood: StyleMood = mood
        .parse()
        .map_err(|e: kiova_core::UnknownValue| AppError::BadRequest(e.to_string()))?;

    let mut selection = get_moods(&session).await;
    selection.toggle(mood);
    session_state::write(&session, keys::MOOD_SELECTION, &selection).await;

    Ok(Redirect::to("/onboarding"))
}

/// Save the picked moods as style preferences and move to the upload step.
///
/// The mood page always acts as the style-selection step, so a user who
/// revisits it can replace their preferences.
#[instrument(skip(state, session))]
pub async fn save_moods(State(state): State<AppState>, session: Session) -> Result<Redirect> {
    let selection = get_moods(&session).await;
    let next = transition(
        OnboardingStage::NeedsStyleSelection,
        OnboardingEvent::StylesSaved(selection.len()),
    )?;

    state
        .current_user()
        .update(&UserUpdate::style_preferences(selection.tags()))
        .await?;
    session_state::clear(&session, keys::MOOD_SELECTION).await;
    add_breadcrumb("onboarding", "Style moods saved", None);

    Ok(Redirect::to(next.path()))
}

// =============================================================================
// Step Two: Wardrobe Upload
// =============================================================================

/// Display uploaded drafts.
#[instrument(skip(session))]
pub async fn upload_page(session: Session) -> impl IntoResponse {
    let drafts = get_drafts(&session).await;

    UploadTemplate {
        drafts: drafts.iter().map(DraftView::from).collect(),
        flash: session_state::take_flash(&session).await,
    }
}

/// Upload photos and add a draft for each one that imports.
#[instrument(skip(state, session, multipart))]
pub async fn upload(
    State(state): State<AppState>,
    session: Session,
    multipart: Multipart,
) -> Result<Redirect> {
    let photos = read_photos(multipart, PHOTOS_FIELD).await?;
    if photos.is_empty() {
        return Ok(Redirect::to("/onboarding/upload"));
    }

    let submitted = photos.len();
    let imported = wardrobe::import_photos(state.base44(), photos).await;
    if imported.len() < submitted {
        session_state::flash(
            &session,
            format!(
                "{} of {submitted} photos could not be uploaded",
                submitted - imported.len()
            ),
        )
        .await;
    }

    let mut drafts = get_drafts(&session).await;
    drafts.extend(imported);
    set_drafts(&session, &drafts).await;

    Ok(Redirect::to("/onboarding/upload"))
}

/// Drop one draft.
#[instrument(skip(session))]
pub async fn remove_draft(session: Session, Path(draft): Path<String>) -> Result<Redirect> {
    let draft: DraftId = draft
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid draft id: {draft}")))?;

    let mut drafts = get_drafts(&session).await;
    drafts.retain(|d| d.id != draft);
    set_drafts(&session, &drafts).await;

    Ok(Redirect::to("/onboarding/upload"))
}

/// Create every draft as a wardrobe item and complete onboarding.
///
/// Creation stops at the first failure. Items already created stay, their
/// drafts are dropped, and onboarding is left incomplete so the user can
/// retry the rest.
#[instrument(skip(state, session))]
pub async fn finish(State(state): State<AppState>, session: Session) -> Result<Redirect> {
    let mut drafts = get_drafts(&session).await;
    if drafts.is_empty() {
        return Ok(Redirect::to("/onboarding/upload"));
    }

    let user = state.current_user().get().await?;
    let stage = OnboardingStage::from_user(&user);
    let next = wardrobe_step(stage, OnboardingEvent::WardrobeConfirmed)?;

    match wardrobe::create_items(state.base44(), &user.email, &drafts).await {
        Ok(created) => {
            tracing::info!(count = created.len(), "Wardrobe upload saved");
            session_state::clear(&session, keys::UPLOAD_DRAFTS).await;
        }
        Err(e) => {
            tracing::error!("Failed to save wardrobe upload: {e}");
            let saved = e.created.min(drafts.len());
            drafts.drain(..saved);
            set_drafts(&session, &drafts).await;
            session_state::flash(
                &session,
                format!(
                    "Saved {} of {} items. Please try again.",
                    e.created, e.total
                ),
            )
            .await;
            return Ok(Redirect::to("/onboarding/upload"));
        }
    }

    if stage != OnboardingStage::Complete {
        state
            .current_user()
            .update(&UserUpdate::onboarding_completed())
            .await?;
    }
    add_breadcrumb("onboarding", "Onboarding completed", None);

    Ok(Redirect::to(next.path()))
}

/// Complete onboarding without uploading anything.
#[instrument(skip(state, session))]
pub async fn skip(State(state): State<AppState>, session: Session) -> Result<Redirect> {
    let user = state.current_user().get().await?;
    let stage = OnboardingStage::from_user(&user);
    let next = wardrobe_step(stage, OnboardingEvent::Skipped)?;

    if stage != OnboardingStage::Complete {
        state
            .current_user()
            .update(&UserUpdate::onboarding_completed())
            .await?;
    }
    session_state::clear(&session, keys::UPLOAD_DRAFTS).await;
    add_breadcrumb("onboarding", "Onboarding skipped", None);

    Ok(Redirect::to(next.path()))
}
