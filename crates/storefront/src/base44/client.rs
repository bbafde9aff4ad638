use std::sync::Arc;

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, instrument, warn};
use url::Url;

use super::Base44Error;
use crate::config::Base44Config;

/// Header carrying the static API key.
const API_KEY_HEADER: &str = "api_key";

/// Longest body excerpt written to logs.
const LOG_BODY_LIMIT: usize = 500;

/// Options for a single backend request.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<Value>,
    /// Extra headers; these replace defaults of the same name.
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::get()
    }
}

impl RequestOptions {
    #[must_use]
    pub const fn get() -> Self {
        Self {
            method: Method::GET,
            body: None,
            headers: Vec::new(),
            query: Vec::new(),
        }
    }

    #[must_use]
    pub fn post(body: Value) -> Self {
        Self {
            method: Method::POST,
            body: Some(body),
            ..Self::get()
        }
    }

    #[must_use]
    pub fn put(body: Value) -> Self {
        Self {
            method: Method::PUT,
            body: Some(body),
            ..Self::get()
        }
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }
}

/// Client for the Base44 REST API.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct Base44Client {
    inner: Arc<Base44ClientInner>,
}

struct Base44ClientInner {
    http: reqwest::Client,
    base_url: Url,
    api_key: SecretString,
    access_token: Option<SecretString>,
}

impl std::fmt::Debug for Base44Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Base44Client")
            .field("base_url", &self.inner.base_url.as_str())
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl Base44Client {
    /// Create a new client.
    #[must_use]
    pub fn new(config: &Base44Config) -> Self {
        Self {
            inner: Arc::new(Base44ClientInner {
                http: reqwest::Client::new(),
                base_url: config.base_url.clone(),
                api_key: config.api_key.clone(),
                access_token: config.access_token.clone(),
            }),
        }
    }

    /// Issue a request and return the parsed JSON body.
    ///
    /// A non-2xx status is logged and its body returned like any other;
    /// callers decide what a failure body means. An empty body is `null`.
    ///
    /// # Errors
    ///
    /// Returns an error if the path or a header is invalid, the request
    /// cannot be sent, or the body is not JSON.
    #[instrument(skip(self, options), fields(method = %options.method))]
    pub async fn request(&self, path: &str, options: RequestOptions) -> Result<Value, Base44Error> {
        let mut url = self.endpoint(path)?;
        if !options.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&options.query);
        }

        let mut headers = self.auth_headers()?;
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in &options.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| Base44Error::Header(name.clone()))?;
            let value =
                HeaderValue::from_str(value).map_err(|_| Base44Error::Header(name.to_string()))?;
            headers.insert(name, value);
        }

        let mut builder = self
            .inner
            .http
            .request(options.method, url)
            .headers(headers);
        if let Some(body) = &options.body {
            builder = builder.body(serde_json::to_vec(body)?);
        }

        let response = builder.send().await?;
        read_body(response).await
    }

    /// Send a multipart form (file uploads). No JSON content type is set so
    /// the form's own boundary header is used.
    pub(super) async fn request_multipart(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<Value, Base44Error> {
        let url = self.endpoint(path)?;
        let response = self
            .inner
            .http
            .post(url)
            .headers(self.auth_headers()?)
            .multipart(form)
            .send()
            .await?;
        read_body(response).await
    }

    /// Resolve a relative endpoint path against the app URL.
    fn endpoint(&self, path: &str) -> Result<Url, Base44Error> {
        self.inner
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|source| Base44Error::Endpoint {
                path: path.to_string(),
                source,
            })
    }

    fn auth_headers(&self) -> Result<HeaderMap, Base44Error> {
        let mut headers = HeaderMap::new();
        let mut api_key = HeaderValue::from_str(self.inner.api_key.expose_secret())
            .map_err(|_| Base44Error::Header(API_KEY_HEADER.to_string()))?;
        api_key.set_sensitive(true);
        headers.insert(API_KEY_HEADER, api_key);

        if let Some(token) = &self.inner.access_token {
            let mut bearer = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|_| Base44Error::Header(AUTHORIZATION.to_string()))?;
            bearer.set_sensitive(true);
            headers.insert(AUTHORIZATION, bearer);
        }
        Ok(headers)
    }
}

/// Decode a JSON value into a typed record, naming what was expected.
pub(super) fn decode<T: DeserializeOwned>(
    what: &'static str,
    value: Value,
) -> Result<T, Base44Error> {
    serde_json::from_value(value).map_err(|source| {
        debug!(what, error = %source, "Backend response did not decode");
        Base44Error::Decode { what, source }
    })
}

async fn read_body(response: reqwest::Response) -> Result<Value, Base44Error> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        warn!(
            status = %status,
            body = %excerpt(&text),
            "Base44 returned non-success status"
        );
    }

    if text.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(&text).map_err(|e| {
        error!(
            error = %e,
            body = %excerpt(&text),
            "Failed to parse Base44 response"
        );
        Base44Error::Parse(e)
    })
}

fn excerpt(text: &str) -> String {
    text.chars().take(LOG_BODY_LIMIT).collect()
}
