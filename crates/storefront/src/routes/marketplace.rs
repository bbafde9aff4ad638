//! Marketplace route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use kiova_core::listing::{
    ConditionFilter, ItemQuery, PriceBucket, SortOrder, listed, marketplace_tabs,
};
use kiova_core::{Condition, User};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::views::{ItemView, OptionView, TabView, UserView};
use crate::models::session as session_state;
use crate::state::AppState;

/// Marketplace query parameters.
///
/// Every parameter is optional; values that do not parse fall back to their
/// defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct MarketplaceQuery {
    #[serde(default)]
    pub q: String,
    pub category: Option<String>,
    pub price: Option<String>,
    pub condition: Option<String>,
    pub sort: Option<String>,
}

fn parse_or_default<T: std::str::FromStr + Default>(value: Option<&str>) -> T {
    value.and_then(|v| v.parse().ok()).unwrap_or_default()
}

impl MarketplaceQuery {
    /// The filters and sort this request asks for.
    #[must_use]
    pub fn item_query(&self) -> ItemQuery {
        ItemQuery {
            search: self.q.clone(),
            category: parse_or_default(self.category.as_deref()),
            price: parse_or_default(self.price.as_deref()),
            condition: parse_or_default(self.condition.as_deref()),
            sort: Some(parse_or_default(self.sort.as_deref())),
        }
    }
}

/// Link to the marketplace with `query` applied.
fn marketplace_href(query: &ItemQuery) -> String {
    let mut params = url::form_urlencoded::Serializer::new(String::new());
    if !query.search.trim().is_empty() {
        params.append_pair("q", &query.search);
    }
    params.append_pair("category", query.category.as_str());
    params.append_pair("price", query.price.as_str());
    params.append_pair("condition", query.condition.as_str());
    params.append_pair("sort", query.sort.unwrap_or_default().as_str());
    format!("/marketplace?{}", params.finish())
}

/// Marketplace page template.
#[derive(Template, WebTemplate)]
#[template(path = "marketplace/index.html")]
pub struct MarketplaceTemplate {
    pub user: Option<UserView>,
    pub search: String,
    pub category: String,
    pub tabs: Vec<TabView>,
    pub prices: Vec<OptionView>,
    pub conditions: Vec<OptionView>,
    pub sorts: Vec<OptionView>,
    pub items: Vec<ItemView>,
    pub result_count: usize,
    pub flash: Option<String>,
}

/// Display marketplace listings.
///
/// Load failures are logged and the page renders empty.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<MarketplaceQuery>,
) -> impl IntoResponse {
    let items = match state.base44().clothing_items().list().await {
        Ok(items) => listed(items),
        Err(e) => {
            tracing::error!("Failed to load marketplace: {e}");
            Vec::new()
        }
    };
    let user: Option<User> = match state.current_user().get().await {
        Ok(user) => Some(user),
        Err(e) => {
            tracing::warn!("Failed to load current user: {e}");
            None
        }
    };

    let item_query = query.item_query();
    let matched = item_query.apply(&items);
    let sort = item_query.sort.unwrap_or_default();

    MarketplaceTemplate {
        user: user.as_ref().map(UserView::from),
        search: item_query.search.clone(),
        category: item_query.category.as_str().to_string(),
        tabs: TabView::from_tabs(marketplace_tabs(&items), item_query.category, |category| {
            marketplace_href(&ItemQuery {
                category,
                ..item_query.clone()
            })
        }),
        prices: PriceBucket::ALL
            .into_iter()
            .map(|b| OptionView::new(b.as_str(), b.label(), b == item_query.price))
            .collect(),
        conditions: condition_options(item_query.condition),
        sorts: SortOrder::ALL
            .into_iter()
            .map(|o| OptionView::new(o.as_str(), o.label(), o == sort))
            .collect(),
        result_count: matched.len(),
        items: matched.into_iter().map(ItemView::from).collect(),
        flash: session_state::take_flash(&session).await,
    }
}

fn condition_options(selected: ConditionFilter) -> Vec<OptionView> {
    std::iter::once(OptionView::new(
        "all",
        "All Conditions",
        selected == ConditionFilter::All,
    ))
    .chain(Condition::ALL.into_iter().map(|c| {
        OptionView::new(
            c.as_str(),
            c.label(),
            selected == ConditionFilter::Only(c),
        )
    }))
    .collect()
}
