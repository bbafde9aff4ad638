//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use kiova_core::onboarding::OnboardingStage;
use tracing::instrument;

use super::views::UserView;
use crate::error::set_sentry_user;
use crate::state::AppState;

/// Landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub user: Option<UserView>,
    pub flash: Option<String>,
}

/// Send users who have not finished onboarding to their step; everyone
/// else sees the landing page.
///
/// If the user cannot be loaded the landing page is shown without a
/// greeting.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> Response {
    let user = match state.current_user().get().await {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!("Failed to load current user: {e}");
            return HomeTemplate {
                user: None,
                flash: None,
            }
            .into_response();
        }
    };
    set_sentry_user(&user.id, Some(user.email.as_str()));

    match OnboardingStage::from_user(&user) {
        OnboardingStage::Complete => HomeTemplate {
            user: Some(UserView::from(&user)),
            flash: None,
        }
        .into_response(),
        stage => Redirect::to(stage.path()).into_response(),
    }
}
