//! Typed access to backend entity collections.

use std::marker::PhantomData;

use kiova_core::{ClothingItem, Email, NewClothingItem, NewOutfit, Outfit};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::instrument;

use super::client::decode;
use super::{Base44Client, Base44Error, RequestOptions};

/// A record type stored as a backend entity.
pub trait Entity: DeserializeOwned {
    /// Entity name used in endpoint paths.
    const NAME: &'static str;

    /// Create payload.
    type New: Serialize;
}

impl Entity for ClothingItem {
    const NAME: &'static str = "ClothingItem";
    type New = NewClothingItem;
}

impl Entity for Outfit {
    const NAME: &'static str = "Outfit";
    type New = NewOutfit;
}

/// Accessor for one entity collection.
///
/// No caching, pagination or validation: every call goes to the backend.
pub struct EntityClient<'a, E> {
    client: &'a Base44Client,
    _entity: PhantomData<E>,
}

impl<E: Entity> EntityClient<'_, E> {
    fn collection_path() -> String {
        format!("entities/{}", E::NAME)
    }

    fn record_path(id: &str) -> String {
        format!("entities/{}/{id}", E::NAME)
    }

    /// Fetch every record.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a record list.
    #[instrument(skip(self), fields(entity = E::NAME))]
    pub async fn list(&self) -> Result<Vec<E>, Base44Error> {
        let value = self
            .client
            .request(&Self::collection_path(), RequestOptions::get())
            .await?;
        decode(E::NAME, value)
    }

    /// Fetch records whose fields equal every entry of `filter`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a record list.
    #[instrument(skip(self, filter), fields(entity = E::NAME))]
    pub async fn filter(&self, filter: &Map<String, Value>) -> Result<Vec<E>, Base44Error> {
        let query = serde_json::to_string(filter)?;
        let value = self
            .client
            .request(&Self::collection_path(), RequestOptions::get().query("q", query))
            .await?;
        decode(E::NAME, value)
    }

    /// Fetch records owned by the given user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a record list.
    pub async fn owned_by(&self, owner: &Email) -> Result<Vec<E>, Base44Error> {
        let mut filter = Map::new();
        filter.insert("owner_id".to_string(), Value::from(owner.as_str()));
        self.filter(&filter).await
    }

    /// Create a record and return it as stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a record.
    #[instrument(skip(self, record), fields(entity = E::NAME))]
    pub async fn create(&self, record: &E::New) -> Result<E, Base44Error> {
        let body = serde_json::to_value(record)?;
        let value = self
            .client
            .request(&Self::collection_path(), RequestOptions::post(body))
            .await?;
        decode(E::NAME, value)
    }

    /// Apply a partial update to a record and return the backend's reply.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not JSON.
    #[instrument(skip(self, patch), fields(entity = E::NAME, id = %id))]
    pub async fn update<P>(&self, id: &str, patch: &P) -> Result<Value, Base44Error>
    where
        P: Serialize + ?Sized,
    {
        let body = serde_json::to_value(patch)?;
        self.client
            .request(&Self::record_path(id), RequestOptions::put(body))
            .await
    }
}

impl EntityClient<'_, ClothingItem> {
    /// Fetch the JSON schema describing clothing items, used to seed
    /// attribute extraction.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not JSON.
    #[instrument(skip(self))]
    pub async fn schema(&self) -> Result<Value, Base44Error> {
        self.client
            .request(
                &format!("{}/schema", Self::collection_path()),
                RequestOptions::get(),
            )
            .await
    }
}

impl Base44Client {
    /// Accessor for any entity collection.
    #[must_use]
    pub const fn entity<E: Entity>(&self) -> EntityClient<'_, E> {
        EntityClient {
            client: self,
            _entity: PhantomData,
        }
    }

    /// Accessor for clothing items.
    #[must_use]
    pub const fn clothing_items(&self) -> EntityClient<'_, ClothingItem> {
        self.entity()
    }

    /// Accessor for outfits.
    #[must_use]
    pub const fn outfits(&self) -> EntityClient<'_, Outfit> {
        self.entity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(
            EntityClient::<'_, ClothingItem>::collection_path(),
            "entities/ClothingItem"
        );
        assert_eq!(
            EntityClient::<'_, Outfit>::record_path("o-9"),
            "entities/Outfit/o-9"
        );
    }
}
