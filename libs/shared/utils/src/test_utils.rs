use std::sync::Arc;

use base64::{engine::general_purpose, Engine as _};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::AppState;
use shared_models::auth::Role;

pub struct TestConfig {
    pub jwt_secret: String,
    pub admin_email: String,
    pub admin_password: String,
    pub media_storage_url: String,
    pub media_storage_api_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            admin_email: "admin@example.com".to_string(),
            admin_password: "admin-password-1".to_string(),
            media_storage_url: String::new(),
            media_storage_api_key: String::new(),
        }
    }
}

impl TestConfig {
    pub fn with_media_storage(url: &str) -> Self {
        Self {
            media_storage_url: url.to_string(),
            media_storage_api_key: "test-api-key".to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            port: 0,
            jwt_secret: self.jwt_secret.clone(),
            admin_email: self.admin_email.clone(),
            admin_password: self.admin_password.clone(),
            media_storage_url: self.media_storage_url.clone(),
            media_storage_api_key: self.media_storage_api_key.clone(),
        }
    }

    /// Fresh state backed by an empty in-memory store.
    pub fn to_state(&self) -> Arc<AppState> {
        Arc::new(AppState::new(self.to_app_config()))
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(
        subject: Uuid,
        role: Role,
        secret: &str,
        exp_hours: Option<i64>,
    ) -> String {
        let now = Utc::now();
        let exp = now + Duration::hours(exp_hours.unwrap_or(1));

        let header = json!({
            "alg": "HS256",
            "typ": "JWT"
        });

        let payload = json!({
            "sub": subject,
            "role": role.as_str(),
            "iat": now.timestamp(),
            "exp": exp.timestamp()
        });

        let header_encoded = general_purpose::URL_SAFE_NO_PAD.encode(header.to_string());
        let payload_encoded = general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string());

        let signing_input = format!("{}.{}", header_encoded, payload_encoded);

        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(signing_input.as_bytes());
        let signature = mac.finalize().into_bytes();
        let signature_encoded = general_purpose::URL_SAFE_NO_PAD.encode(signature);

        format!("{}.{}", signing_input, signature_encoded)
    }

    pub fn create_expired_token(subject: Uuid, role: Role, secret: &str) -> String {
        Self::create_test_token(subject, role, secret, Some(-1))
    }

    pub fn create_invalid_signature_token(subject: Uuid, role: Role) -> String {
        Self::create_test_token(subject, role, "wrong-secret", Some(1))
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }
}
