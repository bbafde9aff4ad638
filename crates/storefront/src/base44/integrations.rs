//! File storage and AI attribute extraction.

use kiova_core::NewClothingItem;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, instrument};

use super::client::decode;
use super::{Base44Client, Base44Error};

const UPLOAD_FILE_PATH: &str = "integration-endpoints/Core/UploadFile";
const EXTRACT_DATA_PATH: &str = "integration-endpoints/Core/ExtractDataFromUploadedFile";

/// Status reported by a successful extraction.
pub const EXTRACTION_SUCCESS: &str = "success";

#[derive(Debug, Deserialize)]
struct UploadedFile {
    file_url: String,
}

/// Reply from attribute extraction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExtractionResult {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub output: Option<Value>,
    #[serde(default)]
    pub details: Option<String>,
}

impl ExtractionResult {
    /// Extracted item fields, when the status is success and output is present.
    ///
    /// Output that does not look like an item yields `None`, the same as an
    /// unsuccessful extraction.
    #[must_use]
    pub fn into_item(self) -> Option<NewClothingItem> {
        if self.status.as_deref() != Some(EXTRACTION_SUCCESS) {
            debug!(status = ?self.status, details = ?self.details, "Extraction unsuccessful");
            return None;
        }
        let output = self.output.filter(|o| !o.is_null())?;
        serde_json::from_value(output)
            .inspect_err(|e| debug!(error = %e, "Extraction output is not an item"))
            .ok()
    }
}

impl Base44Client {
    /// Upload a file and return its URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the upload fails or the reply carries no URL.
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn upload_file(
        &self,
        file_name: &str,
        content_type: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<String, Base44Error> {
        let mut part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        if let Some(mime) = content_type {
            part = part.mime_str(mime)?;
        }
        let form = reqwest::multipart::Form::new().part("file", part);

        let value = self.request_multipart(UPLOAD_FILE_PATH, form).await?;
        let uploaded: UploadedFile = decode("UploadFile", value)?;
        Ok(uploaded.file_url)
    }

    /// Run attribute extraction over an uploaded file.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the reply is not an
    /// extraction result. An unsuccessful extraction is not an error.
    #[instrument(skip(self, json_schema))]
    pub async fn extract_data(
        &self,
        file_url: &str,
        json_schema: &Value,
    ) -> Result<ExtractionResult, Base44Error> {
        let body = json!({
            "file_url": file_url,
            "json_schema": json_schema,
        });
        let value = self
            .request(EXTRACT_DATA_PATH, super::RequestOptions::post(body))
            .await?;
        decode("ExtractDataFromUploadedFile", value)
    }
}
