//! Application state shared across handlers.

use std::sync::Arc;

use crate::base44::Base44Client;
use crate::config::StorefrontConfig;
use crate::current_user::CurrentUserContext;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the backend client, the current-user context and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    base44: Base44Client,
    current_user: CurrentUserContext,
}

impl AppState {
    /// Create a new application state from configuration.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let base44 = Base44Client::new(&config.base44);
        let current_user = CurrentUserContext::new(base44.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                base44,
                current_user,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the Base44 API client.
    #[must_use]
    pub fn base44(&self) -> &Base44Client {
        &self.inner.base44
    }

    /// Get a reference to the shared current-user context.
    #[must_use]
    pub fn current_user(&self) -> &CurrentUserContext {
        &self.inner.current_user
    }
}
