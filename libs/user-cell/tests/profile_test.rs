use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shared_database::AppState;
use shared_utils::test_utils::TestConfig;
use user_cell::models::{UpdateProfileRequest, UserError};
use user_cell::services::ProfileService;

async fn seed_user(state: &Arc<AppState>) -> Uuid {
    let id = Uuid::new_v4();
    let doc = json!({
        "id": id,
        "name": "Jane Doe",
        "email": format!("{}@example.com", id),
        "password_hash": "unused-hash",
        "phone": "000000000",
        "address": null,
        "dob": "Not Selected",
        "gender": "Not Selected",
        "image": "",
        "created_at": Utc::now(),
    });
    state.store.users.insert(id, doc).await;
    id
}

fn update_request() -> UpdateProfileRequest {
    UpdateProfileRequest {
        name: "Jane A. Doe".to_string(),
        phone: "555-0100".to_string(),
        dob: "1990-04-12".to_string(),
        gender: "Female".to_string(),
        address: Some(json!({ "line1": "12 Harley Street", "line2": "London" })),
        image: None,
    }
}

#[tokio::test]
async fn profile_is_served_without_the_password_hash() {
    let state = TestConfig::default().to_state();
    let service = ProfileService::new(state.clone());
    let user_id = seed_user(&state).await;

    let profile = service.get_profile(user_id).await.unwrap();

    assert_eq!(profile["name"], "Jane Doe");
    assert!(profile.get("password_hash").is_none());
}

#[tokio::test]
async fn profile_for_unknown_user_is_not_found() {
    let state = TestConfig::default().to_state();
    let service = ProfileService::new(state.clone());

    let result = service.get_profile(Uuid::new_v4()).await;

    assert_matches!(result, Err(UserError::NotFound));
}

#[tokio::test]
async fn update_rewrites_the_profile_fields() {
    let state = TestConfig::default().to_state();
    let service = ProfileService::new(state.clone());
    let user_id = seed_user(&state).await;

    let profile = service.update_profile(user_id, update_request()).await.unwrap();

    assert_eq!(profile["name"], "Jane A. Doe");
    assert_eq!(profile["phone"], "555-0100");
    assert_eq!(profile["dob"], "1990-04-12");
    assert_eq!(profile["gender"], "Female");
    assert_eq!(profile["address"]["line1"], "12 Harley Street");
    assert!(profile.get("password_hash").is_none());

    // The stored record keeps its credential material
    let stored = state.store.users.find(user_id).await.unwrap();
    assert_eq!(stored["password_hash"], "unused-hash");
}

#[tokio::test]
async fn update_with_blank_required_field_is_rejected() {
    let state = TestConfig::default().to_state();
    let service = ProfileService::new(state.clone());
    let user_id = seed_user(&state).await;

    let result = service
        .update_profile(
            user_id,
            UpdateProfileRequest {
                phone: "  ".to_string(),
                ..update_request()
            },
        )
        .await;

    assert_matches!(result, Err(UserError::DataMissing));

    let stored = state.store.users.find(user_id).await.unwrap();
    assert_eq!(stored["name"], "Jane Doe");
}

#[tokio::test]
async fn update_for_unknown_user_is_not_found() {
    let state = TestConfig::default().to_state();
    let service = ProfileService::new(state.clone());

    let result = service.update_profile(Uuid::new_v4(), update_request()).await;

    assert_matches!(result, Err(UserError::NotFound));
}

#[tokio::test]
async fn attached_image_is_uploaded_and_its_url_stored() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/images"))
        .and(header("apikey", "test-api-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "secure_url": "https://cdn.example.com/images/jane.png"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let state = TestConfig::with_media_storage(&mock_server.uri()).to_state();
    let service = ProfileService::new(state.clone());
    let user_id = seed_user(&state).await;

    let profile = service
        .update_profile(
            user_id,
            UpdateProfileRequest {
                image: Some("aGVsbG8=".to_string()),
                ..update_request()
            },
        )
        .await
        .unwrap();

    assert_eq!(profile["image"], "https://cdn.example.com/images/jane.png");
}

#[tokio::test]
async fn failed_image_upload_leaves_the_profile_untouched() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/images"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&mock_server)
        .await;

    let state = TestConfig::with_media_storage(&mock_server.uri()).to_state();
    let service = ProfileService::new(state.clone());
    let user_id = seed_user(&state).await;

    let result = service
        .update_profile(
            user_id,
            UpdateProfileRequest {
                image: Some("aGVsbG8=".to_string()),
                ..update_request()
            },
        )
        .await;

    assert_matches!(result, Err(UserError::ImageUpload(_)));

    let stored = state.store.users.find(user_id).await.unwrap();
    assert_eq!(stored["name"], "Jane Doe");
    assert_eq!(stored["image"], "");
}
