//! Wardrobe route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Multipart, Query, State},
    response::{IntoResponse, Redirect},
};
use kiova_core::listing::{CategoryFilter, ItemQuery, WardrobeStats, wardrobe_tabs};
use kiova_core::price::amount;
use kiova_core::{Category, ClothingItem, Condition, NewClothingItem};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::read_photos;
use super::views::{ItemView, OptionView, TabView};
use crate::error::{Result, add_breadcrumb};
use crate::models::session::{self as session_state, keys};
use crate::services::wardrobe as wardrobe_service;
use crate::state::AppState;

/// Multipart field carrying the add-item photo.
const PHOTO_FIELD: &str = "photo";

// =============================================================================
// Query and Form Types
// =============================================================================

/// Wardrobe listing query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct WardrobeQuery {
    #[serde(default)]
    pub q: String,
    pub category: Option<String>,
}

impl WardrobeQuery {
    /// Category tab; unknown values fall back to all items.
    fn category(&self) -> CategoryFilter {
        self.category
            .as_deref()
            .and_then(|c| c.parse().ok())
            .unwrap_or_default()
    }
}

/// Add-item form submission.
///
/// The image reference is not part of the form; it comes from the photo
/// step and lives in the session draft.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ItemForm {
    pub name: String,
    pub category: String,
    pub subcategory: String,
    pub color: String,
    pub brand: String,
    pub size: String,
    pub condition: String,
    /// Checkbox; present only when ticked.
    pub is_for_sale: Option<String>,
    pub price: String,
}

fn non_blank(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

impl ItemForm {
    /// Apply the submitted fields to the session draft.
    ///
    /// Returns the first validation problem, leaving every valid field
    /// applied so the form can be shown again as typed.
    fn apply_to(&self, draft: &mut NewClothingItem) -> std::result::Result<(), String> {
        draft.name = non_blank(&self.name);
        draft.category = self.category.parse().ok();
        draft.subcategory = non_blank(&self.subcategory);
        draft.color = non_blank(&self.color);
        draft.brand = non_blank(&self.brand);
        draft.size = non_blank(&self.size);
        draft.condition = Some(self.condition.parse().unwrap_or_default());
        draft.is_for_sale = self.is_for_sale.is_some();

        let price = non_blank(&self.price);
        draft.price = price.as_deref().and_then(amount::parse);

        if draft.name.is_none() {
            return Err("Please enter a name.".to_string());
        }
        if draft.category.is_none() {
            return Err("Please choose a category.".to_string());
        }
        if draft.image_url.is_none() {
            return Err("Please upload a photo first.".to_string());
        }
        if price.is_some() && draft.price.is_none() {
            return Err("Price must be a number.".to_string());
        }
        Ok(())
    }
}

// =============================================================================
// View Types
// =============================================================================

/// Figures shown above the wardrobe grid.
#[derive(Clone)]
pub struct StatsView {
    pub total_items: usize,
    pub listed_for_sale: usize,
    pub categories: usize,
    pub for_sale_value: String,
}

impl From<WardrobeStats> for StatsView {
    fn from(stats: WardrobeStats) -> Self {
        Self {
            total_items: stats.total_items,
            listed_for_sale: stats.listed_for_sale,
            categories: stats.categories,
            for_sale_value: stats.for_sale_value.display_whole(),
        }
    }
}

/// Add-item form values as typed.
#[derive(Clone, Default)]
pub struct ItemFormView {
    pub name: String,
    pub subcategory: String,
    pub color: String,
    pub brand: String,
    pub size: String,
    pub image_url: Option<String>,
    pub is_for_sale: bool,
    pub price: String,
}

impl From<&NewClothingItem> for ItemFormView {
    fn from(draft: &NewClothingItem) -> Self {
        Self {
            name: draft.name.clone().unwrap_or_default(),
            subcategory: draft.subcategory.clone().unwrap_or_default(),
            color: draft.color.clone().unwrap_or_default(),
            brand: draft.brand.clone().unwrap_or_default(),
            size: draft.size.clone().unwrap_or_default(),
            image_url: draft.image_url.clone(),
            is_for_sale: draft.is_for_sale,
            price: draft.price.map(|p| p.to_string()).unwrap_or_default(),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Wardrobe page template.
#[derive(Template, WebTemplate)]
#[template(path = "wardrobe/index.html")]
pub struct WardrobeTemplate {
    pub user_name: Option<String>,
    pub search: String,
    pub tabs: Vec<TabView>,
    pub stats: StatsView,
    pub items: Vec<ItemView>,
    pub flash: Option<String>,
}

/// Add-item form template.
#[derive(Template, WebTemplate)]
#[template(path = "wardrobe/new.html")]
pub struct NewItemTemplate {
    pub form: ItemFormView,
    pub categories: Vec<OptionView>,
    pub conditions: Vec<OptionView>,
    pub flash: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the current user's wardrobe.
///
/// Load failures are logged and the page renders empty.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<WardrobeQuery>,
) -> impl IntoResponse {
    let (user_name, items) = match state.current_user().get().await {
        Ok(user) => {
            let items = match state.base44().clothing_items().owned_by(&user.email).await {
                Ok(items) => items,
                Err(e) => {
                    tracing::error!("Failed to load wardrobe: {e}");
                    Vec::new()
                }
            };
            (Some(user.display_name().to_string()), items)
        }
        Err(e) => {
            tracing::error!("Failed to load current user: {e}");
            (None, Vec::new())
        }
    };

    let category = query.category();
    let filter = ItemQuery::wardrobe(query.q.as_str(), category);
    let search = query.q.clone();

    WardrobeTemplate {
        user_name,
        tabs: TabView::from_tabs(wardrobe_tabs(&items), category, |tab| {
            wardrobe_href(&search, tab)
        }),
        stats: WardrobeStats::from_items(&items).into(),
        items: filter.apply(&items).into_iter().map(ItemView::from).collect(),
        search: query.q,
        flash: session_state::take_flash(&session).await,
    }
}

fn wardrobe_href(search: &str, category: CategoryFilter) -> String {
    let mut url = format!("/wardrobe?category={}", category.as_str());
    if !search.trim().is_empty() {
        url.push_str("&q=");
        url.extend(url::form_urlencoded::byte_serialize(search.as_bytes()));
    }
    url
}

async fn get_draft(session: &Session) -> NewClothingItem {
    session_state::read(session, keys::ITEM_DRAFT)
        .await
        .unwrap_or_default()
}

/// Display the add-item form with whatever has been entered so far.
#[instrument(skip(session))]
pub async fn new_item(session: Session) -> impl IntoResponse {
    let draft = get_draft(&session).await;
    let category = draft.category;
    let condition = draft.condition.unwrap_or_default();

    NewItemTemplate {
        form: ItemFormView::from(&draft),
        categories: Category::ALL
            .into_iter()
            .map(|c| OptionView::new(c.as_str(), c.label(), category == Some(c)))
            .collect(),
        conditions: Condition::ALL
            .into_iter()
            .map(|c| OptionView::new(c.as_str(), c.label(), c == condition))
            .collect(),
        flash: session_state::take_flash(&session).await,
    }
}

/// Upload one photo and prefill the form from its extracted attributes.
///
/// When extraction does not succeed only the image is set.
#[instrument(skip(state, session, multipart))]
pub async fn upload_photo(
    State(state): State<AppState>,
    session: Session,
    multipart: Multipart,
) -> Result<Redirect> {
    let Some(photo) = read_photos(multipart, PHOTO_FIELD).await?.into_iter().next() else {
        session_state::flash(&session, "Choose a photo to upload.").await;
        return Ok(Redirect::to("/wardrobe/new"));
    };

    let mut draft = get_draft(&session).await;
    match wardrobe_service::import_form_photo(state.base44(), photo).await {
        Ok(import) => {
            import.apply_to(&mut draft);
            session_state::write(&session, keys::ITEM_DRAFT, &draft).await;
        }
        Err(e) => {
            tracing::error!("Failed to import photo: {e}");
            session_state::flash(&session, "The photo could not be uploaded. Please try again.")
                .await;
        }
    }

    Ok(Redirect::to("/wardrobe/new"))
}

/// Create an item from the form.
#[instrument(skip(state, session, form))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ItemForm>,
) -> Result<Redirect> {
    let mut draft = get_draft(&session).await;
    if let Err(message) = form.apply_to(&mut draft) {
        session_state::write(&session, keys::ITEM_DRAFT, &draft).await;
        session_state::flash(&session, message).await;
        return Ok(Redirect::to("/wardrobe/new"));
    }

    let user = state.current_user().get().await?;
    let item: ClothingItem = match state
        .base44()
        .clothing_items()
        .create(&draft.clone().owned_by(&user.email))
        .await
    {
        Ok(item) => item,
        Err(e) => {
            tracing::error!("Failed to create item: {e}");
            session_state::write(&session, keys::ITEM_DRAFT, &draft).await;
            session_state::flash(&session, "The item could not be saved. Please try again.")
                .await;
            return Ok(Redirect::to("/wardrobe/new"));
        }
    };

    session_state::clear(&session, keys::ITEM_DRAFT).await;
    add_breadcrumb("wardrobe", "Item created", Some(&[("item_id", item.id.as_str())]));

    Ok(Redirect::to("/wardrobe"))
}
