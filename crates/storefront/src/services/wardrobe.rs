//! Wardrobe photo import and item creation.
//!
//! A photo becomes an item in two backend round trips: the file is
//! uploaded, then the extraction service is asked to fill in the item
//! schema from the image. Extraction is best effort; a photo it cannot
//! read still yields a draft the user can keep.

use kiova_core::{ClothingItem, Email, ItemDraft, NewClothingItem};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::base44::{Base44Client, Base44Error, ExtractionResult};

/// A photo received from a browser upload.
#[derive(Debug, Clone)]
pub struct UploadedPhoto {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Result of importing one photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoImport {
    /// Extraction succeeded; the fields carry the uploaded image URL.
    Extracted(NewClothingItem),
    /// Upload succeeded but extraction did not.
    Unrecognized { image_url: String },
}

impl PhotoImport {
    /// Draft for the wardrobe upload step: unrecognized photos become the
    /// placeholder item.
    #[must_use]
    pub fn into_draft(self) -> NewClothingItem {
        match self {
            Self::Extracted(item) => item,
            Self::Unrecognized { image_url } => NewClothingItem::placeholder(image_url),
        }
    }

    /// Apply to the add-item form: extracted fields are merged in,
    /// otherwise only the image is set.
    pub fn apply_to(self, form: &mut NewClothingItem) {
        match self {
            Self::Extracted(item) => form.merge(item),
            Self::Unrecognized { image_url } => form.image_url = Some(image_url),
        }
    }
}

/// Failure part-way through creating a batch of items.
///
/// Items created before the failure are kept by the backend.
#[derive(Debug, Error)]
#[error("created {created} of {total} items before failing: {source}")]
pub struct BatchCreateError {
    pub created: usize,
    pub total: usize,
    #[source]
    pub source: Base44Error,
}

/// Fetch the clothing-item schema used to seed extraction.
///
/// # Errors
///
/// Returns an error if the schema request fails.
pub async fn extraction_schema(client: &Base44Client) -> Result<Value, Base44Error> {
    client.clothing_items().schema().await
}

/// Upload one photo and run extraction against `schema`.
///
/// # Errors
///
/// Returns an error if the upload or extraction call fails. An extraction
/// that reports failure is not an error.
#[instrument(skip(client, schema, photo), fields(file = %photo.file_name))]
pub async fn import_photo(
    client: &Base44Client,
    schema: &Value,
    photo: UploadedPhoto,
) -> Result<PhotoImport, Base44Error> {
    let image_url = upload(client, photo).await?;
    let result = client.extract_data(&image_url, schema).await?;
    Ok(recognize(result, image_url))
}

/// Upload a photo for the add-item form and try to fill in its attributes.
///
/// Only the upload has to succeed. A schema or extraction call that errors
/// leaves the photo unrecognized, so the form still gets its image.
///
/// # Errors
///
/// Returns an error if the upload fails.
#[instrument(skip(client, photo), fields(file = %photo.file_name))]
pub async fn import_form_photo(
    client: &Base44Client,
    photo: UploadedPhoto,
) -> Result<PhotoImport, Base44Error> {
    let image_url = upload(client, photo).await?;
    let extracted = match extraction_schema(client).await {
        Ok(schema) => client.extract_data(&image_url, &schema).await,
        Err(e) => Err(e),
    };

    Ok(match extracted {
        Ok(result) => recognize(result, image_url),
        Err(e) => {
            warn!(error = %e, "Extraction unavailable; keeping the uploaded image only");
            PhotoImport::Unrecognized { image_url }
        }
    })
}

async fn upload(client: &Base44Client, photo: UploadedPhoto) -> Result<String, Base44Error> {
    client
        .upload_file(&photo.file_name, photo.content_type.as_deref(), photo.bytes)
        .await
}

fn recognize(result: ExtractionResult, image_url: String) -> PhotoImport {
    match result.into_item() {
        Some(mut item) => {
            item.image_url = Some(image_url);
            PhotoImport::Extracted(item)
        }
        None => PhotoImport::Unrecognized { image_url },
    }
}

/// Import a batch of photos one after another.
///
/// The schema is fetched once for the whole batch. A photo whose upload or
/// extraction call errors is logged and left out; the rest still import.
/// If the schema itself cannot be fetched, photos are uploaded without
/// extraction and become placeholder drafts.
#[instrument(skip(client, photos), fields(count = photos.len()))]
pub async fn import_photos(client: &Base44Client, photos: Vec<UploadedPhoto>) -> Vec<ItemDraft> {
    let schema = match extraction_schema(client).await {
        Ok(schema) => Some(schema),
        Err(e) => {
            warn!(error = %e, "Item schema unavailable; importing photos without extraction");
            None
        }
    };

    let mut drafts = Vec::with_capacity(photos.len());
    for photo in photos {
        let file_name = photo.file_name.clone();
        let imported = match &schema {
            Some(schema) => import_photo(client, schema, photo).await,
            None => upload(client, photo)
                .await
                .map(|image_url| PhotoImport::Unrecognized { image_url }),
        };

        match imported {
            Ok(import) => drafts.push(ItemDraft::new(import.into_draft())),
            Err(e) => warn!(file = %file_name, error = %e, "Skipping photo that failed to import"),
        }
    }

    info!(imported = drafts.len(), "Photo batch imported");
    drafts
}

/// Create every draft as an item owned by `owner`, in order.
///
/// Stops at the first failure; nothing already created is rolled back.
///
/// # Errors
///
/// Returns [`BatchCreateError`] with the number of items created so far.
#[instrument(skip(client, drafts), fields(owner = %owner, total = drafts.len()))]
pub async fn create_items(
    client: &Base44Client,
    owner: &Email,
    drafts: &[ItemDraft],
) -> Result<Vec<ClothingItem>, BatchCreateError> {
    let mut created = Vec::with_capacity(drafts.len());
    for draft in drafts {
        let payload = draft.item.clone().owned_by(owner);
        match client.clothing_items().create(&payload).await {
            Ok(item) => created.push(item),
            Err(source) => {
                return Err(BatchCreateError {
                    created: created.len(),
                    total: drafts.len(),
                    source,
                });
            }
        }
    }
    Ok(created)
}
