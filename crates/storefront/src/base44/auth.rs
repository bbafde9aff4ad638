//! Current-user endpoints.

use kiova_core::{User, UserUpdate};
use reqwest::Method;
use tracing::{info, instrument};

use super::client::decode;
use super::{Base44Client, Base44Error, RequestOptions};

const ME_PATH: &str = "entities/User/me";
const LOGOUT_PATH: &str = "auth/logout";

impl Base44Client {
    /// Fetch the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a user.
    #[instrument(skip(self))]
    pub async fn me(&self) -> Result<User, Base44Error> {
        let value = self.request(ME_PATH, RequestOptions::get()).await?;
        decode("User", value)
    }

    /// Patch the signed-in user and return the updated record.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a user.
    #[instrument(skip(self, update))]
    pub async fn update_me(&self, update: &UserUpdate) -> Result<User, Base44Error> {
        let body = serde_json::to_value(update)?;
        let value = self.request(ME_PATH, RequestOptions::put(body)).await?;
        decode("User", value)
    }

    /// End the backend session.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), Base44Error> {
        let options = RequestOptions {
            method: Method::POST,
            ..RequestOptions::get()
        };
        self.request(LOGOUT_PATH, options).await?;
        info!("Logged out of backend session");
        Ok(())
    }
}
