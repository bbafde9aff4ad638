//! Style Me route handlers.
//!
//! A look is composed around one marketplace listing. The selection lives in
//! the session and is keyed to that listing; opening Style Me for another
//! listing starts over with the new anchor already placed.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};
use kiova_core::styling::{OutfitSelection, Slot, SlotGroup, group_wardrobe, recommend};
use kiova_core::{ClothingItem, ItemId, NewOutfit};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::views::ItemView;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::models::StyleSession;
use crate::models::session::{self as session_state, keys};
use crate::state::AppState;

/// Name given to a saved look when the user leaves the name blank.
const DEFAULT_OUTFIT_NAME: &str = "My Look";

// =============================================================================
// Form Types
// =============================================================================

/// Slot selection toggle.
#[derive(Debug, Deserialize)]
pub struct SelectForm {
    pub slot: String,
    pub item_id: String,
}

/// Save-look submission.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SaveForm {
    pub name: String,
}

// =============================================================================
// View Types
// =============================================================================

/// An item offered for a slot.
#[derive(Clone)]
pub struct ChoiceView {
    pub item: ItemView,
    pub selected: bool,
}

/// One slot heading with its choices.
#[derive(Clone)]
pub struct SlotView {
    pub slot: String,
    pub label: String,
    pub choices: Vec<ChoiceView>,
}

impl SlotView {
    fn from_group(group: &SlotGroup<'_>, selection: &OutfitSelection) -> Self {
        Self {
            slot: group.slot.as_str().to_string(),
            label: group.slot.label().to_string(),
            choices: group
                .items
                .iter()
                .map(|item| ChoiceView {
                    item: ItemView::from(*item),
                    selected: selection.is_selected(group.slot, &item.id),
                })
                .collect(),
        }
    }
}

/// A selected item with the slot it fills.
#[derive(Clone)]
pub struct PickView {
    pub slot: String,
    pub slot_label: String,
    pub item: ItemView,
}

fn picks(selection: &OutfitSelection) -> Vec<PickView> {
    Slot::ALL
        .into_iter()
        .flat_map(|slot| {
            selection.in_slot(slot).into_iter().map(move |item| PickView {
                slot: slot.as_str().to_string(),
                slot_label: slot.label().to_string(),
                item: ItemView::from(item),
            })
        })
        .collect()
}

/// Style Me page template.
#[derive(Template, WebTemplate)]
#[template(path = "marketplace/style.html")]
pub struct StyleTemplate {
    pub anchor: ItemView,
    pub recommendations: Vec<SlotView>,
    pub wardrobe: Vec<SlotView>,
    pub picks: Vec<PickView>,
    pub total: String,
    pub can_save: bool,
    pub flash: Option<String>,
}

// =============================================================================
// Helpers
// =============================================================================

/// The stored look for `anchor`, or a fresh one built around it.
async fn style_session(session: &Session, anchor: &ClothingItem) -> StyleSession {
    session_state::read::<StyleSession>(session, keys::STYLE_SESSION)
        .await
        .filter(|stored| stored.anchor == anchor.id)
        .unwrap_or_else(|| StyleSession {
            anchor: anchor.id.clone(),
            selection: OutfitSelection::for_anchor(anchor),
        })
}

/// A listing that is still for sale.
fn find_listing(items: &[ClothingItem], id: &ItemId) -> Result<ClothingItem> {
    items
        .iter()
        .find(|item| &item.id == id && item.is_listed())
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("listing {id}")))
}

/// The current user's items other than the anchor. Load failures are logged
/// and leave the wardrobe empty.
async fn load_wardrobe(state: &AppState, anchor: &ItemId) -> Vec<ClothingItem> {
    let user = match state.current_user().get().await {
        Ok(user) => user,
        Err(e) => {
            tracing::error!("Failed to load current user: {e}");
            return Vec::new();
        }
    };

    match state.base44().clothing_items().owned_by(&user.email).await {
        Ok(mut items) => {
            items.retain(|item| &item.id != anchor);
            items
        }
        Err(e) => {
            tracing::error!("Failed to load wardrobe: {e}");
            Vec::new()
        }
    }
}

/// The item offered in `slot` under `id`, if the page offers one.
///
/// The anchor is only offered in its own slot; other items come from the
/// recommendation and wardrobe groups shown for that slot.
fn offered<'a>(
    anchor: &'a ClothingItem,
    groups: &[SlotGroup<'a>],
    slot: Slot,
    id: &ItemId,
) -> Option<&'a ClothingItem> {
    if &anchor.id == id {
        return (slot == Slot::for_anchor(anchor.category)).then_some(anchor);
    }
    groups
        .iter()
        .filter(|group| group.slot == slot)
        .flat_map(|group| group.items.iter().copied())
        .find(|item| &item.id == id)
}

fn style_path(id: &ItemId) -> String {
    format!("/marketplace/{id}/style")
}

// =============================================================================
// Handlers
// =============================================================================

/// Display Style Me for a listing.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let id = ItemId::new(id);
    let marketplace = state.base44().clothing_items().list().await?;
    let anchor = find_listing(&marketplace, &id)?;
    let wardrobe = load_wardrobe(&state, &anchor.id).await;

    let look = style_session(&session, &anchor).await;
    session_state::write(&session, keys::STYLE_SESSION, &look).await;
    let selection = &look.selection;

    Ok(StyleTemplate {
        anchor: ItemView::from(&anchor),
        recommendations: recommend(&anchor.id, &marketplace)
            .iter()
            .map(|group| SlotView::from_group(group, selection))
            .collect(),
        wardrobe: group_wardrobe(&wardrobe)
            .iter()
            .map(|group| SlotView::from_group(group, selection))
            .collect(),
        picks: picks(selection),
        total: selection.total_price().display(),
        can_save: !selection.is_empty(),
        flash: session_state::take_flash(&session).await,
    })
}

/// Select or deselect an item in a slot.
#[instrument(skip(state, session))]
pub async fn select(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Form(form): Form<SelectForm>,
) -> Result<Redirect> {
    let slot: Slot = form
        .slot
        .parse()
        .map_err(|e: kiova_core::UnknownValue| AppError::BadRequest(e.to_string()))?;
    let id = ItemId::new(id);

    let marketplace = state.base44().clothing_items().list().await?;
    let anchor = find_listing(&marketplace, &id)?;
    let wardrobe = load_wardrobe(&state, &anchor.id).await;

    let mut groups = recommend(&anchor.id, &marketplace);
    groups.extend(group_wardrobe(&wardrobe));
    let item = offered(&anchor, &groups, slot, &ItemId::new(form.item_id.as_str()))
        .cloned()
        .ok_or_else(|| {
            AppError::BadRequest(format!("item {} is not offered for {slot}", form.item_id))
        })?;

    let mut look = style_session(&session, &anchor).await;
    look.selection.toggle(slot, item);
    session_state::write(&session, keys::STYLE_SESSION, &look).await;

    Ok(Redirect::to(&style_path(&id)))
}

/// Save the composed look as an outfit.
#[instrument(skip(state, session, form))]
pub async fn save(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Form(form): Form<SaveForm>,
) -> Result<Redirect> {
    let id = ItemId::new(id);
    let Some(look) = session_state::read::<StyleSession>(&session, keys::STYLE_SESSION)
        .await
        .filter(|look| look.anchor == id && !look.selection.is_empty())
    else {
        session_state::flash(&session, "Pick at least one item for your look.").await;
        return Ok(Redirect::to(&style_path(&id)));
    };

    let user = state.current_user().get().await?;
    let name = form.name.trim();
    let outfit = NewOutfit {
        owner_id: user.email.clone(),
        name: Some(if name.is_empty() { DEFAULT_OUTFIT_NAME } else { name }.to_string()),
        item_ids: look.selection.item_ids(),
        total_price: Some(look.selection.total_price().amount),
    };

    match state.base44().outfits().create(&outfit).await {
        Ok(saved) => {
            session_state::clear(&session, keys::STYLE_SESSION).await;
            session_state::flash(&session, "Outfit saved.").await;
            add_breadcrumb("outfits", "Outfit saved", Some(&[("outfit_id", saved.id.as_str())]));
            Ok(Redirect::to("/outfits"))
        }
        Err(e) => {
            tracing::error!("Failed to save outfit: {e}");
            session_state::flash(&session, "The outfit could not be saved. Please try again.")
                .await;
            Ok(Redirect::to(&style_path(&id)))
        }
    }
}
