//! Backend client tests against a mock Base44 server.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use kiova_core::{Category, ClothingItem, Email, ItemId, NewClothingItem, NewOutfit, UserUpdate};
use kiova_integration_tests::{TEST_API_KEY, TEST_EMAIL, backend_client, item_json, user_json};
use kiova_storefront::base44::{Base44Error, RequestOptions};
use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Raw Requests
// ============================================================================

#[tokio::test]
async fn test_request_sends_api_key_and_json_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/entities/ClothingItem"))
        .and(header("api_key", TEST_API_KEY))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let value = backend_client(&server)
        .request("entities/ClothingItem", RequestOptions::get())
        .await
        .unwrap();
    assert_eq!(value, json!([]));
}

#[tokio::test]
async fn test_request_headers_override_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/entities/ClothingItem"))
        .and(header("content-type", "text/plain"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    backend_client(&server)
        .request(
            "/entities/ClothingItem",
            RequestOptions::get().header("Content-Type", "text/plain"),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_empty_body_reads_as_null() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    backend_client(&server).logout().await.unwrap();
}

#[tokio::test]
async fn test_error_status_returns_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/entities/Outfit"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"message": "forbidden"})))
        .mount(&server)
        .await;

    let value = backend_client(&server)
        .request("entities/Outfit", RequestOptions::get())
        .await
        .unwrap();
    assert_eq!(value["message"], "forbidden");
}

#[tokio::test]
async fn test_non_json_body_is_a_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/entities/Outfit"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad gateway</html>"))
        .mount(&server)
        .await;

    let err = backend_client(&server)
        .request("entities/Outfit", RequestOptions::get())
        .await
        .unwrap_err();
    assert!(matches!(err, Base44Error::Parse(_)));
}

// ============================================================================
// Entities
// ============================================================================

#[tokio::test]
async fn test_list_decodes_items() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/entities/ClothingItem"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            item_json("i1", "Linen shirt", "tops", 30),
            item_json("i2", "Wool coat", "outerwear", 80),
        ])))
        .mount(&server)
        .await;

    let items: Vec<ClothingItem> = backend_client(&server).clothing_items().list().await.unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[1].category, Some(Category::Outerwear));
}

#[tokio::test]
async fn test_owned_by_sends_json_filter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/entities/Outfit"))
        .and(query_param("q", format!(r#"{{"owner_id":"{TEST_EMAIL}"}}"#)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "o1", "name": "Friday", "item_ids": ["i1"], "owner_id": TEST_EMAIL}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let owner = Email::parse(TEST_EMAIL).unwrap();
    let outfits = backend_client(&server).outfits().owned_by(&owner).await.unwrap();
    assert_eq!(outfits.len(), 1);
    assert_eq!(outfits[0].item_ids, [ItemId::new("i1")]);
}

#[tokio::test]
async fn test_list_rejects_non_list_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/entities/ClothingItem"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "boom"})))
        .mount(&server)
        .await;

    let err = backend_client(&server)
        .clothing_items()
        .list()
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Base44Error::Decode {
            what: "ClothingItem",
            ..
        }
    ));
}

#[tokio::test]
async fn test_create_posts_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/entities/Outfit"))
        .and(body_json(json!({
            "owner_id": TEST_EMAIL,
            "name": "Weekend",
            "item_ids": ["i1", "i2"],
            "total_price": 110.0
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "o9",
            "name": "Weekend",
            "item_ids": ["i1", "i2"],
            "total_price": 110
        })))
        .expect(1)
        .mount(&server)
        .await;

    let outfit = NewOutfit {
        owner_id: Email::parse(TEST_EMAIL).unwrap(),
        name: Some("Weekend".to_string()),
        item_ids: vec![ItemId::new("i1"), ItemId::new("i2")],
        total_price: Some(110.into()),
    };
    let saved = backend_client(&server).outfits().create(&outfit).await.unwrap();
    assert_eq!(saved.id.as_str(), "o9");
}

#[tokio::test]
async fn test_update_puts_patch() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/entities/ClothingItem/i1"))
        .and(body_json(json!({"sold": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "i1", "sold": true})))
        .expect(1)
        .mount(&server)
        .await;

    let reply = backend_client(&server)
        .clothing_items()
        .update("i1", &json!({"sold": true}))
        .await
        .unwrap();
    assert_eq!(reply["sold"], true);
}

// ============================================================================
// Current User
// ============================================================================

#[tokio::test]
async fn test_update_me_puts_preferences() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/entities/User/me"))
        .and(body_json(json!({"style_preferences": ["minimalist", "vintage"]})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(user_json(&["minimalist", "vintage"], false)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let user = backend_client(&server)
        .update_me(&UserUpdate::style_preferences(vec![
            "minimalist".to_string(),
            "vintage".to_string(),
        ]))
        .await
        .unwrap();
    assert_eq!(user.style_preferences, ["minimalist", "vintage"]);
}

// ============================================================================
// Integrations
// ============================================================================

#[tokio::test]
async fn test_upload_file_sends_multipart_file_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/integration-endpoints/Core/UploadFile"))
        .and(header("api_key", TEST_API_KEY))
        .and(body_string_contains(r#"name="file"; filename="shirt.jpg""#))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"file_url": "https://files.kiova.test/shirt.jpg"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let url = backend_client(&server)
        .upload_file("shirt.jpg", Some("image/jpeg"), b"jpeg bytes".to_vec())
        .await
        .unwrap();
    assert_eq!(url, "https://files.kiova.test/shirt.jpg");
}

#[tokio::test]
async fn test_extract_data_sends_file_and_schema() {
    let server = MockServer::start().await;
    let schema = json!({"type": "object", "properties": {"name": {"type": "string"}}});
    Mock::given(method("POST"))
        .and(path("/integration-endpoints/Core/ExtractDataFromUploadedFile"))
        .and(body_json(json!({
            "file_url": "https://files.kiova.test/shirt.jpg",
            "json_schema": schema,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "output": {"name": "Linen shirt", "category": "tops", "brand": "Arket"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = backend_client(&server)
        .extract_data("https://files.kiova.test/shirt.jpg", &schema)
        .await
        .unwrap();
    let item: NewClothingItem = result.into_item().unwrap();
    assert_eq!(item.brand.as_deref(), Some("Arket"));
}

#[tokio::test]
async fn test_failed_extraction_is_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/integration-endpoints/Core/ExtractDataFromUploadedFile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "error",
            "details": "no clothing found"
        })))
        .mount(&server)
        .await;

    let result = backend_client(&server)
        .extract_data("https://files.kiova.test/cat.jpg", &json!({}))
        .await
        .unwrap();
    assert_eq!(result.details.as_deref(), Some("no clothing found"));
    assert!(result.into_item().is_none());
}
