//! Integration tests for Kiova.
//!
//! The backend is replaced by a `wiremock` server and the storefront router
//! is driven in-process with `tower::ServiceExt::oneshot`, so no network
//! services are needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p kiova-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `base44_client` - Request shape and reply handling of the backend client
//! - `current_user` - Sharing and invalidation of the current-user record
//! - `storefront_routes` - Page flows through the full router
//! - `wardrobe_upload` - Photo import, drafts and item creation

use std::net::{IpAddr, Ipv4Addr};

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, Response, header};
use kiova_storefront::base44::Base44Client;
use kiova_storefront::config::{Base44Config, StorefrontConfig};
use kiova_storefront::state::AppState;
use serde_json::{Value, json};
use url::Url;
use wiremock::MockServer;

/// API key the mock backend expects.
pub const TEST_API_KEY: &str = "kv_test_9f2c7a41d8e3b6";

/// Email of the mock signed-in user.
pub const TEST_EMAIL: &str = "ada@kiova.test";

/// Backend configuration pointing at the mock server.
///
/// # Panics
///
/// Panics if the mock server URI is not a URL.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn backend_config(server: &MockServer) -> Base44Config {
    Base44Config::new(Url::parse(&server.uri()).unwrap(), TEST_API_KEY)
}

/// Backend client pointing at the mock server.
#[must_use]
pub fn backend_client(server: &MockServer) -> Base44Client {
    Base44Client::new(&backend_config(server))
}

/// Storefront configuration pointing at the mock server.
#[must_use]
pub fn storefront_config(server: &MockServer) -> StorefrontConfig {
    StorefrontConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        base_url: "http://localhost:3000".to_string(),
        base44: backend_config(server),
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// Full storefront router backed by the mock server.
#[must_use]
pub fn test_app(server: &MockServer) -> Router {
    kiova_storefront::app(AppState::new(storefront_config(server)))
}

/// A user record as the backend returns it.
#[must_use]
pub fn user_json(style_preferences: &[&str], onboarding_completed: bool) -> Value {
    json!({
        "id": "u_1",
        "full_name": "Ada Lovelace",
        "email": TEST_EMAIL,
        "style_preferences": style_preferences,
        "onboarding_completed": onboarding_completed,
    })
}

/// A clothing item record as the backend returns it.
#[must_use]
pub fn item_json(id: &str, name: &str, category: &str, price: u32) -> Value {
    json!({
        "id": id,
        "name": name,
        "category": category,
        "condition": "good",
        "is_for_sale": true,
        "sold": false,
        "price": price,
        "owner_id": "seller@kiova.test",
        "image_url": format!("https://files.kiova.test/{id}.jpg"),
    })
}

/// A GET request with an optional session cookie.
///
/// # Panics
///
/// Panics if the request cannot be built.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

/// A url-encoded form POST with an optional session cookie.
///
/// # Panics
///
/// Panics if the request cannot be built.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn post_form(uri: &str, form: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(form.to_string())).unwrap()
}

/// Multipart boundary used by [`post_multipart`].
const BOUNDARY: &str = "kiova-test-boundary";

/// A multipart POST carrying `files` as `(file name, contents)` under `field`.
///
/// # Panics
///
/// Panics if the request cannot be built.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn post_multipart(
    uri: &str,
    field: &str,
    files: &[(&str, &str)],
    cookie: Option<&str>,
) -> Request<Body> {
    let mut body = Vec::new();
    for (file_name, contents) in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; \
                 filename=\"{file_name}\"\r\nContent-Type: image/jpeg\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(contents.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let mut builder = Request::builder().method("POST").uri(uri).header(
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={BOUNDARY}"),
    );
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body)).unwrap()
}

/// The `name=value` pair of the session cookie set by a response.
#[must_use]
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .find(|pair| pair.starts_with("kiova_session="))
        .map(String::from)
}

/// The redirect target of a response.
#[must_use]
pub fn location(response: &Response<Body>) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
}

/// Read a response body as text.
///
/// # Panics
///
/// Panics if the body cannot be read or is not UTF-8.
#[allow(clippy::unwrap_used)]
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
