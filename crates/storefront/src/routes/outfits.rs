//! Saved outfits route handler.

use std::collections::HashMap;

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use kiova_core::{ClothingItem, ItemId, Outfit, Price};
use tower_sessions::Session;
use tracing::instrument;

use super::views::ItemView;
use crate::models::session as session_state;
use crate::state::AppState;

/// Saved outfit display data.
#[derive(Clone)]
pub struct OutfitView {
    pub name: String,
    pub items: Vec<ItemView>,
    /// Item IDs that no longer resolve to an item.
    pub missing: usize,
    pub total: String,
}

impl OutfitView {
    /// Resolve an outfit's items against the loaded catalogue.
    ///
    /// The stored total wins; outfits saved without one are totalled from
    /// the items that still exist.
    fn resolve(outfit: &Outfit, catalogue: &HashMap<&ItemId, &ClothingItem>) -> Self {
        let items: Vec<&ClothingItem> = outfit
            .item_ids
            .iter()
            .filter_map(|id| catalogue.get(id).copied())
            .collect();
        let total = outfit.total_price.map_or_else(
            || Price::total(items.iter().map(|item| item.price.as_ref())),
            Price::usd,
        );

        Self {
            name: outfit.name.clone().unwrap_or_else(|| "Untitled look".to_string()),
            missing: outfit.item_ids.len() - items.len(),
            items: items.into_iter().map(ItemView::from).collect(),
            total: total.display(),
        }
    }
}

/// Saved outfits page template.
#[derive(Template, WebTemplate)]
#[template(path = "outfits/index.html")]
pub struct OutfitsTemplate {
    pub outfits: Vec<OutfitView>,
    pub flash: Option<String>,
}

/// Display the current user's saved outfits.
///
/// Load failures are logged and the page renders empty.
#[instrument(skip(state, session))]
pub async fn index(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let outfits = match state.current_user().get().await {
        Ok(user) => match state.base44().outfits().owned_by(&user.email).await {
            Ok(outfits) => outfits,
            Err(e) => {
                tracing::error!("Failed to load outfits: {e}");
                Vec::new()
            }
        },
        Err(e) => {
            tracing::error!("Failed to load current user: {e}");
            Vec::new()
        }
    };

    let items = if outfits.is_empty() {
        Vec::new()
    } else {
        state
            .base44()
            .clothing_items()
            .list()
            .await
            .unwrap_or_else(|e| {
                tracing::error!("Failed to load outfit items: {e}");
                Vec::new()
            })
    };
    let catalogue: HashMap<&ItemId, &ClothingItem> =
        items.iter().map(|item| (&item.id, item)).collect();

    OutfitsTemplate {
        outfits: outfits
            .iter()
            .map(|outfit| OutfitView::resolve(outfit, &catalogue))
            .collect(),
        flash: session_state::take_flash(&session).await,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(id: &str, price: u32) -> ClothingItem {
        serde_json::from_value(serde_json::json!({"id": id, "price": price})).unwrap()
    }

    #[test]
    fn test_resolve_totals_existing_items_when_unpriced() {
        let items = vec![item("a", 20), item("b", 35)];
        let catalogue = items.iter().map(|i| (&i.id, i)).collect();
        let outfit: Outfit = serde_json::from_value(serde_json::json!({
            "id": "o1",
            "item_ids": ["a", "b", "gone"]
        }))
        .unwrap();

        let view = OutfitView::resolve(&outfit, &catalogue);
        assert_eq!(view.items.len(), 2);
        assert_eq!(view.missing, 1);
        assert_eq!(view.total, "$55.00");
        assert_eq!(view.name, "Untitled look");
    }

    #[test]
    fn test_resolve_prefers_stored_total() {
        let items = vec![item("a", 20)];
        let catalogue = items.iter().map(|i| (&i.id, i)).collect();
        let outfit: Outfit = serde_json::from_value(serde_json::json!({
            "id": "o1",
            "name": "Friday",
            "item_ids": ["a"],
            "total_price": 18.5
        }))
        .unwrap();

        let view = OutfitView::resolve(&outfit, &catalogue);
        assert_eq!(view.total, "$18.50");
        assert_eq!(view.name, "Friday");
    }
}
