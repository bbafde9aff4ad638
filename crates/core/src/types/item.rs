//! Clothing item records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::category::{Category, Condition, lenient};
use super::email::Email;
use super::id::{DraftId, ItemId};
use super::price::{Price, amount};
use super::wire::{flag, timestamp};

/// Name given to items whose photo could not be tagged automatically.
pub const PLACEHOLDER_ITEM_NAME: &str = "Clothing Item";

/// A clothing item as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClothingItem {
    pub id: ItemId,
    /// Owner's email; the backend keys ownership by email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<Email>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, with = "lenient", skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, with = "lenient", skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "flag::deserialize")]
    pub is_for_sale: bool,
    #[serde(default, with = "amount", skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(default, deserialize_with = "flag::deserialize")]
    pub sold: bool,
    #[serde(default, with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub created_date: Option<DateTime<Utc>>,
}

impl ClothingItem {
    /// Whether the item may appear in the marketplace: for sale and not sold.
    #[must_use]
    pub const fn is_listed(&self) -> bool {
        self.is_for_sale && !self.sold
    }

    /// Price used for sorting, bucketing and totals; missing counts as zero.
    #[must_use]
    pub fn price_or_zero(&self) -> Decimal {
        self.price.unwrap_or(Decimal::ZERO)
    }

    /// Formatted price, if the item has one.
    #[must_use]
    pub fn display_price(&self) -> Option<String> {
        self.price.map(|p| Price::usd(p).display())
    }

    /// Name to show, falling back to the placeholder name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(PLACEHOLDER_ITEM_NAME)
    }

    /// Brand if known, otherwise the category label.
    #[must_use]
    pub fn byline(&self) -> Option<&str> {
        self.brand
            .as_deref()
            .filter(|b| !b.is_empty())
            .or_else(|| self.category.map(Category::label))
    }
}

/// Fields of an item that has not been persisted yet.
///
/// Used as the create payload, as the add-item form draft, and as the
/// decoded output of attribute extraction (hence every field is optional
/// and unknown enum values are dropped).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClothingItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<Email>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, with = "lenient", skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, with = "lenient", skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "flag::deserialize")]
    pub is_for_sale: bool,
    #[serde(default, with = "amount", skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
}

impl NewClothingItem {
    /// Minimal draft used when extraction does not succeed.
    #[must_use]
    pub fn placeholder(image_url: impl Into<String>) -> Self {
        Self {
            name: Some(PLACEHOLDER_ITEM_NAME.to_owned()),
            category: Some(Category::Tops),
            image_url: Some(image_url.into()),
            ..Self::default()
        }
    }

    /// Overlay every field the other draft sets onto this one.
    ///
    /// Ownership is never taken from `other`; the owner is stamped at
    /// submission time.
    pub fn merge(&mut self, other: Self) {
        fn overlay<T>(slot: &mut Option<T>, value: Option<T>) {
            if value.is_some() {
                *slot = value;
            }
        }

        overlay(&mut self.name, other.name);
        overlay(&mut self.category, other.category);
        overlay(&mut self.subcategory, other.subcategory);
        overlay(&mut self.color, other.color);
        overlay(&mut self.brand, other.brand);
        overlay(&mut self.size, other.size);
        overlay(&mut self.condition, other.condition);
        overlay(&mut self.image_url, other.image_url);
        overlay(&mut self.price, other.price);
        self.is_for_sale |= other.is_for_sale;
    }

    /// Stamp the owner on the payload.
    #[must_use]
    pub fn owned_by(mut self, owner: &Email) -> Self {
        self.owner_id = Some(owner.clone());
        self
    }

    /// Name to show, falling back to the placeholder name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(PLACEHOLDER_ITEM_NAME)
    }
}

/// An uploaded item waiting for the user to confirm the wardrobe upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDraft {
    pub id: DraftId,
    pub item: NewClothingItem,
}

impl ItemDraft {
    /// Wrap an item under a fresh draft ID.
    #[must_use]
    pub fn new(item: NewClothingItem) -> Self {
        Self {
            id: DraftId::generate(),
            item,
        }
    }
}
