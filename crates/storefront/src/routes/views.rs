//! Display data shared by several pages.
//!
//! Templates only see preformatted strings; all formatting decisions are
//! made here.

use kiova_core::listing::{CategoryFilter, CategoryTab};
use kiova_core::{ClothingItem, ItemDraft, User};

/// Clothing item display data for templates.
#[derive(Clone)]
pub struct ItemView {
    pub id: String,
    pub name: String,
    /// Brand, or the category label when no brand is known.
    pub byline: Option<String>,
    pub price: Option<String>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub condition: Option<String>,
    pub size: Option<String>,
    pub listed: bool,
    pub sold: bool,
}

impl From<&ClothingItem> for ItemView {
    fn from(item: &ClothingItem) -> Self {
        Self {
            id: item.id.to_string(),
            name: item.display_name().to_string(),
            byline: item.byline().map(String::from),
            price: item.display_price(),
            image_url: item.image_url.clone(),
            category: item.category.map(|c| c.label().to_string()),
            condition: item.condition.map(|c| c.label().to_string()),
            size: item.size.clone(),
            listed: item.is_listed(),
            sold: item.sold,
        }
    }
}

/// Upload draft display data.
#[derive(Clone)]
pub struct DraftView {
    pub id: String,
    pub name: String,
    pub category: Option<String>,
    pub image_url: Option<String>,
}

impl From<&ItemDraft> for DraftView {
    fn from(draft: &ItemDraft) -> Self {
        Self {
            id: draft.id.to_string(),
            name: draft.item.display_name().to_string(),
            category: draft.item.category.map(|c| c.label().to_string()),
            image_url: draft.item.image_url.clone(),
        }
    }
}

/// Category tab display data.
#[derive(Clone)]
pub struct TabView {
    pub href: String,
    pub label: String,
    pub count: usize,
    pub active: bool,
}

impl TabView {
    /// Build tab views, linking each tab through `href_for`.
    pub fn from_tabs(
        tabs: Vec<CategoryTab>,
        active: CategoryFilter,
        href_for: impl Fn(CategoryFilter) -> String,
    ) -> Vec<Self> {
        tabs.into_iter()
            .map(|tab| Self {
                href: href_for(tab.filter),
                label: tab.label.to_string(),
                count: tab.count,
                active: tab.filter == active,
            })
            .collect()
    }
}

/// A `<select>` option.
#[derive(Clone)]
pub struct OptionView {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl OptionView {
    pub fn new(value: &str, label: &str, selected: bool) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
            selected,
        }
    }
}

/// Signed-in user summary for page headers.
#[derive(Clone)]
pub struct UserView {
    pub name: String,
    pub style_tags: Vec<String>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            name: user.display_name().to_string(),
            style_tags: user.style_preferences.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_item_view_formats_fields() {
        let item: ClothingItem = serde_json::from_value(serde_json::json!({
            "id": "68f1",
            "name": "Cargo pants",
            "category": "bottoms",
            "condition": "like-new",
            "is_for_sale": true,
            "price": 45
        }))
        .unwrap();

        let view = ItemView::from(&item);
        assert_eq!(view.name, "Cargo pants");
        assert_eq!(view.byline.as_deref(), Some("Bottoms"));
        assert_eq!(view.price.as_deref(), Some("$45.00"));
        assert_eq!(view.condition.as_deref(), Some("Like New"));
        assert!(view.listed);
    }

    #[test]
    fn test_tab_views_mark_active() {
        let tabs = vec![
            CategoryTab {
                filter: CategoryFilter::All,
                label: "All",
                count: 3,
            },
            CategoryTab {
                filter: CategoryFilter::Only(kiova_core::Category::Shoes),
                label: "Shoes",
                count: 1,
            },
        ];
        let views = TabView::from_tabs(tabs, CategoryFilter::All, |f| {
            format!("/wardrobe?category={}", f.as_str())
        });
        assert!(views[0].active);
        assert!(!views[1].active);
        assert_eq!(views[1].href, "/wardrobe?category=shoes");
    }
}
