//! Shared current-user context.
//!
//! Every page needs the signed-in user. The record is fetched once and
//! shared: concurrent requests arriving while the fetch is in flight wait
//! on the same call instead of issuing their own. Writes go through this
//! context so the cached copy is dropped as soon as it goes stale.

use std::sync::Arc;
use std::time::Duration;

use kiova_core::{User, UserUpdate};
use moka::future::Cache;
use tracing::{debug, instrument};

use crate::base44::{Base44Client, Base44Error};

/// How long a fetched user is trusted without an explicit invalidation.
const USER_TTL: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
enum CacheKey {
    Me,
}

/// Handle to the shared current-user record.
#[derive(Clone)]
pub struct CurrentUserContext {
    client: Base44Client,
    cache: Cache<CacheKey, User>,
}

impl CurrentUserContext {
    #[must_use]
    pub fn new(client: Base44Client) -> Self {
        let cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(USER_TTL)
            .build();
        Self { client, cache }
    }

    /// The signed-in user, fetched on first use.
    ///
    /// # Errors
    ///
    /// Returns the fetch error shared by every caller that waited on it.
    #[instrument(skip(self))]
    pub async fn get(&self) -> Result<User, Arc<Base44Error>> {
        self.cache
            .try_get_with(CacheKey::Me, async {
                debug!("Fetching current user");
                self.client.me().await
            })
            .await
    }

    /// Patch the user record and drop the cached copy.
    ///
    /// # Errors
    ///
    /// Returns an error if the update call fails; the cache is dropped
    /// either way since the backend may have applied part of it.
    ///
    /// The cache is dropped before and after the call so a fetch that was
    /// in flight during the update cannot leave the old record behind.
    #[instrument(skip(self, update))]
    pub async fn update(&self, update: &UserUpdate) -> Result<User, Base44Error> {
        self.invalidate().await;
        let result = self.client.update_me(update).await;
        self.invalidate().await;
        result
    }

    /// Forget the cached user.
    pub async fn invalidate(&self) {
        self.cache.invalidate(&CacheKey::Me).await;
    }

    /// End the backend session and forget the user.
    ///
    /// # Errors
    ///
    /// Returns an error if the logout call cannot be sent.
    pub async fn logout(&self) -> Result<(), Base44Error> {
        self.invalidate().await;
        let result = self.client.logout().await;
        self.invalidate().await;
        result
    }
}
