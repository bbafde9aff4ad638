//! Saved outfit records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::email::Email;
use super::id::{ItemId, OutfitId};
use super::price::amount;
use super::wire::{list, timestamp};

/// An outfit as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outfit {
    pub id: OutfitId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<Email>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "list::deserialize")]
    pub item_ids: Vec<ItemId>,
    /// Price of the look when it was saved.
    #[serde(default, with = "amount", skip_serializing_if = "Option::is_none")]
    pub total_price: Option<Decimal>,
    #[serde(default, with = "timestamp", skip_serializing_if = "Option::is_none")]
    pub created_date: Option<DateTime<Utc>>,
}

/// Create payload for an outfit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOutfit {
    pub owner_id: Email,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub item_ids: Vec<ItemId>,
    #[serde(default, with = "amount", skip_serializing_if = "Option::is_none")]
    pub total_price: Option<Decimal>,
}
