//! Outfit composition ("Style Me").
//!
//! A look is built around one marketplace item (the anchor) from the user's
//! own wardrobe and a handful of recommended listings. Each single slot holds
//! at most one item; the accessories slot holds up to [`MAX_ACCESSORIES`].

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::{Category, ClothingItem, ItemId, Price, UnknownValue};

/// Most accessories a look can carry.
pub const MAX_ACCESSORIES: usize = 2;

/// How many listings are considered for recommendations.
pub const RECOMMENDATION_POOL: usize = 8;

/// Recommendations shown per slot.
pub const RECOMMENDATIONS_PER_SLOT: usize = 2;

/// A position in a look.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    Tops,
    Bottoms,
    Outerwear,
    Shoes,
    Accessories,
}

impl Slot {
    pub const ALL: [Self; 5] = [
        Self::Tops,
        Self::Bottoms,
        Self::Outerwear,
        Self::Shoes,
        Self::Accessories,
    ];

    /// Slots holding exactly one item.
    pub const SINGLE: [Self; 4] = [Self::Tops, Self::Bottoms, Self::Outerwear, Self::Shoes];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tops => "tops",
            Self::Bottoms => "bottoms",
            Self::Outerwear => "outerwear",
            Self::Shoes => "shoes",
            Self::Accessories => "accessories",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Tops => "Tops",
            Self::Bottoms => "Bottoms",
            Self::Outerwear => "Outerwear",
            Self::Shoes => "Shoes",
            Self::Accessories => "Accessories",
        }
    }

    /// Slot a category is worn in. Dresses have none.
    #[must_use]
    pub const fn for_category(category: Category) -> Option<Self> {
        match category {
            Category::Tops => Some(Self::Tops),
            Category::Bottoms => Some(Self::Bottoms),
            Category::Outerwear => Some(Self::Outerwear),
            Category::Shoes => Some(Self::Shoes),
            Category::Accessories | Category::Bags | Category::Jewelry => Some(Self::Accessories),
            Category::Dresses => None,
        }
    }

    /// Single slot the anchor item is placed in: its own when it has one,
    /// otherwise tops.
    #[must_use]
    pub const fn for_anchor(category: Option<Category>) -> Self {
        match category {
            Some(Category::Bottoms) => Self::Bottoms,
            Some(Category::Outerwear) => Self::Outerwear,
            Some(Category::Shoes) => Self::Shoes,
            _ => Self::Tops,
        }
    }

    const fn matches_exactly(self, category: Option<Category>) -> bool {
        matches!(
            (self, category),
            (Self::Tops, Some(Category::Tops))
                | (Self::Bottoms, Some(Category::Bottoms))
                | (Self::Outerwear, Some(Category::Outerwear))
                | (Self::Shoes, Some(Category::Shoes))
        )
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Slot {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|slot| slot.as_str() == normalized)
            .ok_or_else(|| UnknownValue::new("slot", s))
    }
}

/// The items currently chosen for a look.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutfitSelection {
    tops: Option<ClothingItem>,
    bottoms: Option<ClothingItem>,
    outerwear: Option<ClothingItem>,
    shoes: Option<ClothingItem>,
    /// Oldest pick first.
    accessories: Vec<ClothingItem>,
}

impl OutfitSelection {
    /// A fresh selection with the anchor already placed.
    #[must_use]
    pub fn for_anchor(anchor: &ClothingItem) -> Self {
        let mut selection = Self::default();
        selection.assign_anchor(anchor);
        selection
    }

    /// Put the anchor into its slot, replacing whatever was there.
    pub fn assign_anchor(&mut self, anchor: &ClothingItem) {
        if let Some(slot) = self.single_mut(Slot::for_anchor(anchor.category)) {
            *slot = Some(anchor.clone());
        }
    }

    const fn single_mut(&mut self, slot: Slot) -> Option<&mut Option<ClothingItem>> {
        match slot {
            Slot::Tops => Some(&mut self.tops),
            Slot::Bottoms => Some(&mut self.bottoms),
            Slot::Outerwear => Some(&mut self.outerwear),
            Slot::Shoes => Some(&mut self.shoes),
            Slot::Accessories => None,
        }
    }

    fn remove(&mut self, slot: Slot, id: &ItemId) {
        match self.single_mut(slot) {
            Some(current) => {
                if current.as_ref().is_some_and(|c| &c.id == id) {
                    *current = None;
                }
            }
            None => self.accessories.retain(|a| &a.id != id),
        }
    }

    const fn single(&self, slot: Slot) -> Option<&ClothingItem> {
        match slot {
            Slot::Tops => self.tops.as_ref(),
            Slot::Bottoms => self.bottoms.as_ref(),
            Slot::Outerwear => self.outerwear.as_ref(),
            Slot::Shoes => self.shoes.as_ref(),
            Slot::Accessories => None,
        }
    }

    /// Select or deselect an item in a slot.
    ///
    /// For a single slot, choosing the item already there empties the slot
    /// and any other item replaces it. For accessories, membership is
    /// toggled; adding beyond [`MAX_ACCESSORIES`] drops the oldest pick.
    /// An item placed in one slot leaves any other slot it was in.
    pub fn toggle(&mut self, slot: Slot, item: ClothingItem) {
        if self.is_selected(slot, &item.id) {
            self.remove(slot, &item.id);
            return;
        }

        for other in Slot::ALL.into_iter().filter(|other| *other != slot) {
            self.remove(other, &item.id);
        }
        if let Some(current) = self.single_mut(slot) {
            *current = Some(item);
        } else {
            self.accessories.push(item);
            let excess = self.accessories.len().saturating_sub(MAX_ACCESSORIES);
            self.accessories.drain(..excess);
        }
    }

    /// Items in a slot.
    #[must_use]
    pub fn in_slot(&self, slot: Slot) -> Vec<&ClothingItem> {
        match slot {
            Slot::Accessories => self.accessories.iter().collect(),
            single => self.single(single).into_iter().collect(),
        }
    }

    /// Whether the item is selected in the slot.
    #[must_use]
    pub fn is_selected(&self, slot: Slot, id: &ItemId) -> bool {
        self.in_slot(slot).iter().any(|item| &item.id == id)
    }

    /// Every selected item: single slots in order, then accessories.
    #[must_use]
    pub fn selected_items(&self) -> Vec<&ClothingItem> {
        Slot::ALL
            .into_iter()
            .flat_map(|slot| self.in_slot(slot))
            .collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected_items().is_empty()
    }

    /// Running total; items without a price count as zero.
    #[must_use]
    pub fn total_price(&self) -> Price {
        Price::total(self.selected_items().into_iter().map(|i| i.price.as_ref()))
    }

    /// IDs to store on a saved outfit.
    #[must_use]
    pub fn item_ids(&self) -> Vec<ItemId> {
        self.selected_items()
            .into_iter()
            .map(|i| i.id.clone())
            .collect()
    }
}

/// Items shown under one slot heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotGroup<'a> {
    pub slot: Slot,
    pub items: Vec<&'a ClothingItem>,
}

/// Recommended listings for a look around `anchor`.
///
/// Takes the first [`RECOMMENDATION_POOL`] listed items other than the
/// anchor, groups them by exact single-slot category and keeps
/// [`RECOMMENDATIONS_PER_SLOT`] per slot. Slots without picks are omitted.
#[must_use]
pub fn recommend<'a>(anchor: &ItemId, marketplace: &'a [ClothingItem]) -> Vec<SlotGroup<'a>> {
    let pool: Vec<&ClothingItem> = marketplace
        .iter()
        .filter(|item| item.is_listed() && &item.id != anchor)
        .take(RECOMMENDATION_POOL)
        .collect();

    Slot::SINGLE
        .into_iter()
        .map(|slot| SlotGroup {
            slot,
            items: pool
                .iter()
                .copied()
                .filter(|item| slot.matches_exactly(item.category))
                .take(RECOMMENDATIONS_PER_SLOT)
                .collect(),
        })
        .filter(|group| !group.items.is_empty())
        .collect()
}

/// The user's wardrobe grouped into all five slots.
#[must_use]
pub fn group_wardrobe(wardrobe: &[ClothingItem]) -> Vec<SlotGroup<'_>> {
    Slot::ALL
        .into_iter()
        .map(|slot| SlotGroup {
            slot,
            items: wardrobe
                .iter()
                .filter(|item| item.category.and_then(Slot::for_category) == Some(slot))
                .collect(),
        })
        .collect()
}
