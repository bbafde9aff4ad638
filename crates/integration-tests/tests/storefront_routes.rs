//! Page flows through the full storefront router with a mock backend.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use kiova_integration_tests::{
    TEST_EMAIL, body_text, get, item_json, location, post_form, session_cookie, test_app,
    user_json,
};
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_user(server: &MockServer, style_preferences: &[&str], completed: bool) {
    Mock::given(method("GET"))
        .and(path("/entities/User/me"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(user_json(style_preferences, completed)),
        )
        .mount(server)
        .await;
}

async fn mount_items(server: &MockServer) {
    let mut sold = item_json("i4", "Silk scarf", "accessories", 40);
    sold["sold"] = json!(true);
    let mut unlisted = item_json("i5", "Grey hoodie", "tops", 25);
    unlisted["is_for_sale"] = json!(false);

    Mock::given(method("GET"))
        .and(path("/entities/ClothingItem"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            item_json("i1", "Linen shirt", "tops", 30),
            item_json("i2", "Wool coat", "outerwear", 80),
            item_json("i3", "Leather boots", "shoes", 150),
            sold,
            unlisted,
        ])))
        .mount(server)
        .await;
}

// ============================================================================
// Health and Home
// ============================================================================

#[tokio::test]
async fn test_health() {
    let server = MockServer::start().await;
    let response = test_app(&server).oneshot(get("/health", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn test_home_sends_new_users_to_style_selection() {
    let server = MockServer::start().await;
    mount_user(&server, &[], false).await;

    let response = test_app(&server).oneshot(get("/", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/onboarding"));
}

#[tokio::test]
async fn test_home_sends_styled_users_to_upload() {
    let server = MockServer::start().await;
    mount_user(&server, &["minimalist"], false).await;

    let response = test_app(&server).oneshot(get("/", None)).await.unwrap();
    assert_eq!(location(&response), Some("/onboarding/upload"));
}

#[tokio::test]
async fn test_home_greets_onboarded_users() {
    let server = MockServer::start().await;
    mount_user(&server, &["vintage"], true).await;

    let response = test_app(&server).oneshot(get("/", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Welcome back, Ada Lovelace"));
}

// ============================================================================
// Onboarding
// ============================================================================

#[tokio::test]
async fn test_mood_toggle_is_kept_in_session() {
    let server = MockServer::start().await;
    let app = test_app(&server);

    let response = app
        .clone()
        .oneshot(post_form("/onboarding/moods/vintage", "", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let cookie = session_cookie(&response).unwrap();

    let response = app
        .oneshot(get("/onboarding", Some(&cookie)))
        .await
        .unwrap();
    let body = body_text(response).await;
    assert!(body.contains("1 / 5 selected"));
    assert!(body.contains("Select 4 more"));
}

#[tokio::test]
async fn test_unknown_mood_is_rejected() {
    let server = MockServer::start().await;
    let response = test_app(&server)
        .oneshot(post_form("/onboarding/moods/sparkly", "", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_saving_too_few_moods_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/entities/User/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(&[], false)))
        .expect(0)
        .mount(&server)
        .await;

    let response = test_app(&server)
        .oneshot(post_form("/onboarding/moods", "", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_saving_five_moods_persists_preferences() {
    let server = MockServer::start().await;
    let moods = ["minimalist", "streetwear", "vintage", "formal", "casual"];
    Mock::given(method("PUT"))
        .and(path("/entities/User/me"))
        .and(body_json(json!({"style_preferences": moods})))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(&moods, false)))
        .expect(1)
        .mount(&server)
        .await;

    let app = test_app(&server);
    let mut cookie: Option<String> = None;
    for mood in moods {
        let response = app
            .clone()
            .oneshot(post_form(
                &format!("/onboarding/moods/{mood}"),
                "",
                cookie.as_deref(),
            ))
            .await
            .unwrap();
        cookie = cookie.or_else(|| session_cookie(&response));
    }

    let response = app
        .oneshot(post_form("/onboarding/moods", "", cookie.as_deref()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/onboarding/upload"));
}

#[tokio::test]
async fn test_skip_completes_onboarding() {
    let server = MockServer::start().await;
    mount_user(&server, &["vintage"], false).await;
    Mock::given(method("PUT"))
        .and(path("/entities/User/me"))
        .and(body_json(json!({"onboarding_completed": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(&["vintage"], true)))
        .expect(1)
        .mount(&server)
        .await;

    let response = test_app(&server)
        .oneshot(post_form("/onboarding/skip", "", None))
        .await
        .unwrap();
    assert_eq!(location(&response), Some("/marketplace"));
}

// ============================================================================
// Marketplace
// ============================================================================

#[tokio::test]
async fn test_marketplace_shows_only_listed_items() {
    let server = MockServer::start().await;
    mount_user(&server, &["vintage"], true).await;
    mount_items(&server).await;

    let response = test_app(&server)
        .oneshot(get("/marketplace", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("Linen shirt"));
    assert!(body.contains("Leather boots"));
    assert!(!body.contains("Silk scarf"));
    assert!(!body.contains("Grey hoodie"));
    assert!(body.contains("3 items"));
}

#[tokio::test]
async fn test_marketplace_price_bucket_filter() {
    let server = MockServer::start().await;
    mount_user(&server, &[], true).await;
    mount_items(&server).await;

    let response = test_app(&server)
        .oneshot(get("/marketplace?price=50-100&sort=price-low", None))
        .await
        .unwrap();
    let body = body_text(response).await;

    assert!(body.contains("Wool coat"));
    assert!(!body.contains("Linen shirt"));
    assert!(!body.contains("Leather boots"));
}

#[tokio::test]
async fn test_marketplace_renders_empty_when_backend_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/entities/ClothingItem"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let response = test_app(&server)
        .oneshot(get("/marketplace", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("No listings match"));
}

// ============================================================================
// Wardrobe
// ============================================================================

#[tokio::test]
async fn test_wardrobe_lists_owned_items() {
    let server = MockServer::start().await;
    mount_user(&server, &[], true).await;
    Mock::given(method("GET"))
        .and(path("/entities/ClothingItem"))
        .and(query_param("q", format!(r#"{{"owner_id":"{TEST_EMAIL}"}}"#)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            item_json("w1", "Denim jacket", "outerwear", 60),
            item_json("w2", "White sneakers", "shoes", 45),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let response = test_app(&server)
        .oneshot(get("/wardrobe?category=shoes", None))
        .await
        .unwrap();
    let body = body_text(response).await;

    assert!(body.contains("White sneakers"));
    assert!(!body.contains("Denim jacket"));
    assert!(body.contains("$105"));
}

// ============================================================================
// Style Me
// ============================================================================

#[tokio::test]
async fn test_style_me_unknown_listing_is_not_found() {
    let server = MockServer::start().await;
    mount_user(&server, &[], true).await;
    mount_items(&server).await;

    let response = test_app(&server)
        .oneshot(get("/marketplace/nope/style", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_style_me_places_anchor_and_totals_look() {
    let server = MockServer::start().await;
    mount_user(&server, &[], true).await;
    mount_items(&server).await;
    let app = test_app(&server);

    let response = app
        .clone()
        .oneshot(get("/marketplace/i2/style", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie(&response).unwrap();
    assert!(body_text(response).await.contains("Total: $80.00"));

    let response = app
        .clone()
        .oneshot(post_form(
            "/marketplace/i2/style/select",
            "slot=shoes&item_id=i3",
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(location(&response), Some("/marketplace/i2/style"));

    let response = app
        .oneshot(get("/marketplace/i2/style", Some(&cookie)))
        .await
        .unwrap();
    assert!(body_text(response).await.contains("Total: $230.00"));
}

#[tokio::test]
async fn test_style_me_refuses_items_it_does_not_offer() {
    let server = MockServer::start().await;
    mount_user(&server, &[], true).await;
    // Mounted first so the owner-filtered wardrobe query takes precedence.
    Mock::given(method("GET"))
        .and(path("/entities/ClothingItem"))
        .and(query_param("q", format!(r#"{{"owner_id":"{TEST_EMAIL}"}}"#)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    mount_items(&server).await;
    let app = test_app(&server);

    let response = app
        .clone()
        .oneshot(get("/marketplace/i4/style", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(get("/marketplace/i2/style", None))
        .await
        .unwrap();
    let cookie = session_cookie(&response).unwrap();

    for form in [
        "slot=accessories&item_id=i4",
        "slot=tops&item_id=i2",
        "slot=accessories&item_id=i3",
    ] {
        let response = app
            .clone()
            .oneshot(post_form("/marketplace/i2/style/select", form, Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{form}");
    }

    let response = app
        .oneshot(get("/marketplace/i2/style", Some(&cookie)))
        .await
        .unwrap();
    assert!(body_text(response).await.contains("Total: $80.00"));
}

#[tokio::test]
async fn test_style_me_saves_look_as_outfit() {
    let server = MockServer::start().await;
    mount_user(&server, &[], true).await;
    mount_items(&server).await;
    Mock::given(method("POST"))
        .and(path("/entities/Outfit"))
        .and(body_json(json!({
            "owner_id": TEST_EMAIL,
            "name": "Weekend",
            "item_ids": ["i2", "i3"],
            "total_price": 230.0
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "o1",
            "name": "Weekend",
            "item_ids": ["i2", "i3"],
            "total_price": 230
        })))
        .expect(1)
        .mount(&server)
        .await;
    let app = test_app(&server);

    let response = app
        .clone()
        .oneshot(get("/marketplace/i2/style", None))
        .await
        .unwrap();
    let cookie = session_cookie(&response).unwrap();
    app.clone()
        .oneshot(post_form(
            "/marketplace/i2/style/select",
            "slot=shoes&item_id=i3",
            Some(&cookie),
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(post_form(
            "/marketplace/i2/style/save",
            "name=Weekend",
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert_eq!(location(&response), Some("/outfits"));
}

// ============================================================================
// Logout
// ============================================================================

#[tokio::test]
async fn test_logout_redirects_home() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let response = test_app(&server)
        .oneshot(post_form("/logout", "", None))
        .await
        .unwrap();
    assert_eq!(location(&response), Some("/"));
}
