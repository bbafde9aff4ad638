//! In-memory filtering and sorting of item collections.
//!
//! Wardrobe and marketplace pages fetch a whole collection and narrow it
//! here. Filters never reorder; only an explicit [`SortOrder`] does, and
//! every sort is stable so ties keep their fetch order.

use core::cmp::Reverse;
use core::fmt;
use core::str::FromStr;
use std::collections::BTreeSet;

use rust_decimal::Decimal;

use crate::types::{Category, ClothingItem, Condition, Price, UnknownValue};

const FIFTY: Decimal = Decimal::from_parts(50, 0, 0, false, 0);
const ONE_HUNDRED: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// Category tab selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    /// Whether the item's category equals the selected one.
    #[must_use]
    pub fn admits(self, item: &ClothingItem) -> bool {
        match self {
            Self::All => true,
            Self::Only(category) => item.category == Some(category),
        }
    }

    /// Query-string value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only(category) => category.as_str(),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

/// Condition filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConditionFilter {
    #[default]
    All,
    Only(Condition),
}

impl ConditionFilter {
    /// Whether the item's condition equals the selected one.
    #[must_use]
    pub fn admits(self, item: &ClothingItem) -> bool {
        match self {
            Self::All => true,
            Self::Only(condition) => item.condition == Some(condition),
        }
    }

    /// Query-string value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only(condition) => condition.as_str(),
        }
    }
}

impl FromStr for ConditionFilter {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

/// Price range buckets offered by the marketplace filter menu.
///
/// The three bounded buckets partition the non-negative prices. A missing
/// price counts as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriceBucket {
    #[default]
    All,
    /// price < 50
    Under50,
    /// 50 <= price < 100
    From50To100,
    /// price >= 100
    Over100,
}

impl PriceBucket {
    /// Every bucket, in menu order.
    pub const ALL: [Self; 4] = [Self::All, Self::Under50, Self::From50To100, Self::Over100];

    /// Whether a price falls in the bucket.
    #[must_use]
    pub fn contains(self, price: Decimal) -> bool {
        match self {
            Self::All => true,
            Self::Under50 => price < FIFTY,
            Self::From50To100 => price >= FIFTY && price < ONE_HUNDRED,
            Self::Over100 => price >= ONE_HUNDRED,
        }
    }

    /// Whether the item's price falls in the bucket.
    #[must_use]
    pub fn admits(self, item: &ClothingItem) -> bool {
        self.contains(item.price_or_zero())
    }

    /// Query-string value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Under50 => "under50",
            Self::From50To100 => "50-100",
            Self::Over100 => "over100",
        }
    }

    /// Menu label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All Prices",
            Self::Under50 => "Under $50",
            Self::From50To100 => "$50 - $100",
            Self::Over100 => "Over $100",
        }
    }
}

impl FromStr for PriceBucket {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|b| b.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownValue::new("price range", s))
    }
}

/// Marketplace sort orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Newest creation timestamp first; items without one go last.
    #[default]
    Newest,
    PriceLowToHigh,
    PriceHighToLow,
    /// Offered in the menu but not backed by any ranking: keeps fetch order.
    Popular,
}

impl SortOrder {
    /// Every sort order, in menu order.
    pub const ALL: [Self; 4] = [
        Self::Newest,
        Self::PriceLowToHigh,
        Self::PriceHighToLow,
        Self::Popular,
    ];

    /// Query-string value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::PriceLowToHigh => "price-low",
            Self::PriceHighToLow => "price-high",
            Self::Popular => "popular",
        }
    }

    /// Menu label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Newest => "Newest First",
            Self::PriceLowToHigh => "Price: Low to High",
            Self::PriceHighToLow => "Price: High to Low",
            Self::Popular => "Most Popular",
        }
    }

    /// Stable in-place sort.
    pub fn sort(self, items: &mut [&ClothingItem]) {
        match self {
            Self::Newest => items.sort_by_key(|item| Reverse(item.created_date)),
            Self::PriceLowToHigh => items.sort_by_key(|item| item.price_or_zero()),
            Self::PriceHighToLow => items.sort_by_key(|item| Reverse(item.price_or_zero())),
            Self::Popular => {}
        }
    }
}

impl FromStr for SortOrder {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|o| o.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownValue::new("sort order", s))
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive substring match of `term` against name or brand.
///
/// A blank term matches every item.
#[must_use]
pub fn matches_search(item: &ClothingItem, term: &str) -> bool {
    let term = term.trim();
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    [item.name.as_deref(), item.brand.as_deref()]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// A complete view query: search, filters and optional sort.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemQuery {
    pub search: String,
    pub category: CategoryFilter,
    pub price: PriceBucket,
    pub condition: ConditionFilter,
    /// `None` keeps fetch order.
    pub sort: Option<SortOrder>,
}

impl ItemQuery {
    /// Query used by the wardrobe page: search and category only, unsorted.
    #[must_use]
    pub fn wardrobe(search: impl Into<String>, category: CategoryFilter) -> Self {
        Self {
            search: search.into(),
            category,
            ..Self::default()
        }
    }

    /// Whether an item passes every filter.
    #[must_use]
    pub fn matches(&self, item: &ClothingItem) -> bool {
        matches_search(item, &self.search)
            && self.category.admits(item)
            && self.condition.admits(item)
            && self.price.admits(item)
    }

    /// Filter, then sort, borrowing from the fetched collection.
    #[must_use]
    pub fn apply<'a>(&self, items: &'a [ClothingItem]) -> Vec<&'a ClothingItem> {
        let mut matched: Vec<&ClothingItem> =
            items.iter().filter(|item| self.matches(item)).collect();
        if let Some(order) = self.sort {
            order.sort(&mut matched);
        }
        matched
    }
}

/// Keep only items eligible for the marketplace (for sale and not sold).
#[must_use]
pub fn listed(items: Vec<ClothingItem>) -> Vec<ClothingItem> {
    items.into_iter().filter(ClothingItem::is_listed).collect()
}

/// A category tab with the number of items it represents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTab {
    pub filter: CategoryFilter,
    pub label: &'static str,
    pub count: usize,
}

/// Marketplace tabs.
///
/// The accessories tab counts the whole accessories family (accessories,
/// bags, jewelry) while selecting it filters on `accessories` alone.
#[must_use]
pub fn marketplace_tabs(items: &[ClothingItem]) -> Vec<CategoryTab> {
    let count = |pred: &dyn Fn(Category) -> bool| {
        items
            .iter()
            .filter(|item| item.category.is_some_and(pred))
            .count()
    };

    let mut tabs = vec![CategoryTab {
        filter: CategoryFilter::All,
        label: "All Items",
        count: items.len(),
    }];
    for category in [
        Category::Tops,
        Category::Bottoms,
        Category::Shoes,
        Category::Outerwear,
    ] {
        tabs.push(CategoryTab {
            filter: CategoryFilter::Only(category),
            label: category.label(),
            count: count(&|c| c == category),
        });
    }
    tabs.push(CategoryTab {
        filter: CategoryFilter::Only(Category::Accessories),
        label: Category::Accessories.label(),
        count: count(&Category::is_accessory),
    });
    tabs
}

/// Wardrobe tabs: all, then every category.
#[must_use]
pub fn wardrobe_tabs(items: &[ClothingItem]) -> Vec<CategoryTab> {
    core::iter::once(CategoryTab {
        filter: CategoryFilter::All,
        label: "All",
        count: items.len(),
    })
    .chain(Category::ALL.into_iter().map(|category| CategoryTab {
        filter: CategoryFilter::Only(category),
        label: category.label(),
        count: items
            .iter()
            .filter(|item| item.category == Some(category))
            .count(),
    }))
    .collect()
}

/// Summary figures shown above the wardrobe grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WardrobeStats {
    pub total_items: usize,
    /// Items currently listed (for sale and not sold).
    pub listed_for_sale: usize,
    /// Distinct known categories.
    pub categories: usize,
    /// Sum of prices of every item flagged for sale, sold or not.
    pub for_sale_value: Price,
}

impl WardrobeStats {
    /// Compute stats over the unfiltered wardrobe.
    #[must_use]
    pub fn from_items(items: &[ClothingItem]) -> Self {
        let categories: BTreeSet<Category> =
            items.iter().filter_map(|item| item.category).collect();
        Self {
            total_items: items.len(),
            listed_for_sale: items.iter().filter(|item| item.is_listed()).count(),
            categories: categories.len(),
            for_sale_value: Price::total(
                items
                    .iter()
                    .filter(|item| item.is_for_sale)
                    .map(|item| item.price.as_ref()),
            ),
        }
    }
}
