use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use shared_models::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: String,
    pub address: Option<Value>,
    pub dob: String,
    pub gender: String,
    pub image: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Public representation: never exposes the password hash.
    pub fn sanitized(&self) -> Value {
        let mut doc = serde_json::to_value(self).unwrap_or(Value::Null);
        if let Some(map) = doc.as_object_mut() {
            map.remove("password_hash");
        }
        doc
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: String,
    pub phone: String,
    pub dob: String,
    pub gender: String,
    pub address: Option<Value>,
    /// Optional base64-encoded profile image, uploaded to the CDN.
    pub image: Option<String>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum UserError {
    #[error("User does not exist")]
    NotFound,

    #[error("Data Missing")]
    DataMissing,

    #[error("Image upload failed: {0}")]
    ImageUpload(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match &err {
            UserError::NotFound => AppError::NotFound(err.to_string()),
            UserError::DataMissing => AppError::ValidationError(err.to_string()),
            UserError::ImageUpload(msg) => AppError::ExternalService(msg.clone()),
            UserError::DatabaseError(msg) => AppError::Database(msg.clone()),
        }
    }
}
