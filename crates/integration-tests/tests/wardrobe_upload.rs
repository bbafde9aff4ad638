//! Photo import, upload drafts and item creation through the router.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use kiova_integration_tests::{
    TEST_EMAIL, body_text, get, location, post_form, post_multipart, session_cookie, test_app,
    user_json,
};
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{body_json, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const UPLOAD_PATH: &str = "/integration-endpoints/Core/UploadFile";
const EXTRACT_PATH: &str = "/integration-endpoints/Core/ExtractDataFromUploadedFile";

async fn mount_schema(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/entities/ClothingItem/schema"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "object",
            "properties": {"name": {"type": "string"}, "category": {"type": "string"}}
        })))
        .mount(server)
        .await;
}

async fn mount_upload(server: &MockServer, file_name: &str) {
    Mock::given(method("POST"))
        .and(path(UPLOAD_PATH))
        .and(body_string_contains(format!(r#"filename="{file_name}""#)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "file_url": format!("https://files.kiova.test/{file_name}")
        })))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_user(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/entities/User/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(&["vintage"], false)))
        .mount(server)
        .await;
}

/// The id of the first draft rendered on the upload page.
fn first_draft_id(page: &str) -> String {
    let prefix = "/onboarding/upload/";
    let start = page.find(prefix).unwrap() + prefix.len();
    let rest = page.get(start..).unwrap();
    rest.get(..rest.find('/').unwrap()).unwrap().to_string()
}

// ============================================================================
// Onboarding Upload
// ============================================================================

#[tokio::test]
async fn test_upload_keeps_order_and_skips_failed_photos() {
    let server = MockServer::start().await;
    mount_schema(&server).await;
    mount_upload(&server, "shirt.jpg").await;
    mount_upload(&server, "blurry.jpg").await;
    Mock::given(method("POST"))
        .and(path(UPLOAD_PATH))
        .and(body_string_contains(r#"filename="broken.jpg""#))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad gateway</html>"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(EXTRACT_PATH))
        .and(body_string_contains("shirt.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "output": {"name": "Linen shirt", "category": "tops"}
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(EXTRACT_PATH))
        .and(body_string_contains("blurry.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "error",
            "details": "no clothing found"
        })))
        .mount(&server)
        .await;

    let app = test_app(&server);
    let response = app
        .clone()
        .oneshot(post_multipart(
            "/onboarding/upload",
            "photos",
            &[
                ("shirt.jpg", "shirt bytes"),
                ("broken.jpg", "broken bytes"),
                ("blurry.jpg", "blurry bytes"),
            ],
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/onboarding/upload"));
    let cookie = session_cookie(&response).unwrap();

    let page = body_text(
        app.oneshot(get("/onboarding/upload", Some(&cookie)))
            .await
            .unwrap(),
    )
    .await;
    assert!(page.contains("2 items ready"));
    assert!(page.contains("1 of 3 photos could not be uploaded"));
    let shirt = page.find("Linen shirt").unwrap();
    let placeholder = page.find("Clothing Item").unwrap();
    assert!(shirt < placeholder);
    assert!(!page.contains("broken.jpg"));
}

#[tokio::test]
async fn test_remove_drops_one_draft() {
    let server = MockServer::start().await;
    mount_schema(&server).await;
    mount_upload(&server, "shirt.jpg").await;
    Mock::given(method("POST"))
        .and(path(EXTRACT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "error"})))
        .mount(&server)
        .await;

    let app = test_app(&server);
    let response = app
        .clone()
        .oneshot(post_multipart(
            "/onboarding/upload",
            "photos",
            &[("shirt.jpg", "shirt bytes")],
            None,
        ))
        .await
        .unwrap();
    let cookie = session_cookie(&response).unwrap();

    let page = body_text(
        app.clone()
            .oneshot(get("/onboarding/upload", Some(&cookie)))
            .await
            .unwrap(),
    )
    .await;
    assert!(page.contains("1 items ready"));
    let draft = first_draft_id(&page);

    let response = app
        .clone()
        .oneshot(post_form(
            &format!("/onboarding/upload/{draft}/remove"),
            "",
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(location(&response), Some("/onboarding/upload"));

    let page = body_text(
        app.oneshot(get("/onboarding/upload", Some(&cookie)))
            .await
            .unwrap(),
    )
    .await;
    assert!(!page.contains("items ready"));
}

#[tokio::test]
async fn test_remove_rejects_malformed_draft_id() {
    let server = MockServer::start().await;
    let response = test_app(&server)
        .oneshot(post_form("/onboarding/upload/not-a-draft/remove", "", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_finish_stops_at_first_failed_create() {
    let server = MockServer::start().await;
    mount_user(&server).await;
    // Without a schema every photo becomes a placeholder draft.
    Mock::given(method("GET"))
        .and(path("/entities/ClothingItem/schema"))
        .respond_with(ResponseTemplate::new(500).set_body_string("unavailable"))
        .mount(&server)
        .await;
    mount_upload(&server, "coat.jpg").await;
    mount_upload(&server, "boots.jpg").await;
    Mock::given(method("POST"))
        .and(path("/entities/ClothingItem"))
        .and(body_string_contains("coat.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "c1",
            "name": "Clothing Item",
            "owner_id": TEST_EMAIL
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/entities/ClothingItem"))
        .and(body_string_contains("boots.jpg"))
        .respond_with(ResponseTemplate::new(503).set_body_string("try later"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/entities/User/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(&["vintage"], true)))
        .expect(0)
        .mount(&server)
        .await;

    let app = test_app(&server);
    let response = app
        .clone()
        .oneshot(post_multipart(
            "/onboarding/upload",
            "photos",
            &[("coat.jpg", "coat bytes"), ("boots.jpg", "boots bytes")],
            None,
        ))
        .await
        .unwrap();
    let cookie = session_cookie(&response).unwrap();

    let response = app
        .clone()
        .oneshot(post_form("/onboarding/finish", "", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(location(&response), Some("/onboarding/upload"));

    let page = body_text(
        app.oneshot(get("/onboarding/upload", Some(&cookie)))
            .await
            .unwrap(),
    )
    .await;
    assert!(page.contains("Saved 1 of 2 items"));
    assert!(page.contains("1 items ready"));
    assert!(page.contains("boots.jpg"));
    assert!(!page.contains("coat.jpg"));
}

// ============================================================================
// Add-Item Dialog
// ============================================================================

#[tokio::test]
async fn test_failed_extraction_keeps_uploaded_image() {
    let server = MockServer::start().await;
    mount_user(&server).await;
    mount_schema(&server).await;
    mount_upload(&server, "shirt.jpg").await;
    Mock::given(method("POST"))
        .and(path(EXTRACT_PATH))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad gateway</html>"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/entities/ClothingItem"))
        .and(body_json(json!({
            "name": "Linen shirt",
            "category": "tops",
            "condition": "good",
            "image_url": "https://files.kiova.test/shirt.jpg",
            "is_for_sale": true,
            "price": 30.0,
            "owner_id": TEST_EMAIL
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "n1",
            "name": "Linen shirt",
            "owner_id": TEST_EMAIL
        })))
        .expect(1)
        .mount(&server)
        .await;

    let app = test_app(&server);
    let response = app
        .clone()
        .oneshot(post_multipart(
            "/wardrobe/new/photo",
            "photo",
            &[("shirt.jpg", "shirt bytes")],
            None,
        ))
        .await
        .unwrap();
    assert_eq!(location(&response), Some("/wardrobe/new"));
    let cookie = session_cookie(&response).unwrap();

    let page = body_text(
        app.clone()
            .oneshot(get("/wardrobe/new", Some(&cookie)))
            .await
            .unwrap(),
    )
    .await;
    assert!(page.contains("Replace photo"));
    assert!(!page.contains("could not be uploaded"));

    let response = app
        .oneshot(post_form(
            "/wardrobe/new",
            "name=Linen+shirt&category=tops&condition=good&is_for_sale=on&price=30",
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(location(&response), Some("/wardrobe"));
}

#[tokio::test]
async fn test_missing_schema_still_sets_image() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/entities/ClothingItem/schema"))
        .respond_with(ResponseTemplate::new(500).set_body_string("unavailable"))
        .mount(&server)
        .await;
    mount_upload(&server, "shirt.jpg").await;
    Mock::given(method("POST"))
        .and(path(EXTRACT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
        .expect(0)
        .mount(&server)
        .await;

    let app = test_app(&server);
    let response = app
        .clone()
        .oneshot(post_multipart(
            "/wardrobe/new/photo",
            "photo",
            &[("shirt.jpg", "shirt bytes")],
            None,
        ))
        .await
        .unwrap();
    let cookie = session_cookie(&response).unwrap();

    let page = body_text(app.oneshot(get("/wardrobe/new", Some(&cookie))).await.unwrap()).await;
    assert!(page.contains("Replace photo"));
}

#[tokio::test]
async fn test_extracted_fields_prefill_form() {
    let server = MockServer::start().await;
    mount_schema(&server).await;
    mount_upload(&server, "coat.jpg").await;
    Mock::given(method("POST"))
        .and(path(EXTRACT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "output": {"name": "Wool coat", "category": "outerwear", "brand": "Arket"}
        })))
        .mount(&server)
        .await;

    let app = test_app(&server);
    let response = app
        .clone()
        .oneshot(post_multipart(
            "/wardrobe/new/photo",
            "photo",
            &[("coat.jpg", "coat bytes")],
            None,
        ))
        .await
        .unwrap();
    let cookie = session_cookie(&response).unwrap();

    let page = body_text(app.oneshot(get("/wardrobe/new", Some(&cookie))).await.unwrap()).await;
    assert!(page.contains(r#"value="Wool coat""#));
    assert!(page.contains(r#"value="Arket""#));
}

#[tokio::test]
async fn test_create_without_photo_is_refused() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/entities/ClothingItem"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "n1"})))
        .expect(0)
        .mount(&server)
        .await;

    let app = test_app(&server);
    let response = app
        .clone()
        .oneshot(post_form(
            "/wardrobe/new",
            "name=Linen+shirt&category=tops",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(location(&response), Some("/wardrobe/new"));
    let cookie = session_cookie(&response).unwrap();

    let page = body_text(app.oneshot(get("/wardrobe/new", Some(&cookie))).await.unwrap()).await;
    assert!(page.contains("Please upload a photo first."));
    assert!(page.contains(r#"value="Linen shirt""#));
}
