use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_database::store::StoreError;
use shared_database::AppState;

use crate::models::{UpdateProfileRequest, User, UserError};

pub struct ProfileService {
    state: Arc<AppState>,
}

impl ProfileService {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    pub async fn get_profile(&self, user_id: Uuid) -> Result<Value, UserError> {
        debug!("Fetching profile for user {}", user_id);

        let doc = self
            .state
            .store
            .users
            .find(user_id)
            .await
            .ok_or(UserError::NotFound)?;

        let user: User =
            serde_json::from_value(doc).map_err(|e| UserError::DatabaseError(e.to_string()))?;

        Ok(user.sanitized())
    }

    /// Update profile fields; an attached image is pushed to the CDN first
    /// and only its URL is stored.
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        request: UpdateProfileRequest,
    ) -> Result<Value, UserError> {
        info!("Profile update request for user {}", user_id);

        if request.name.trim().is_empty()
            || request.phone.trim().is_empty()
            || request.dob.trim().is_empty()
            || request.gender.trim().is_empty()
        {
            warn!("Missing data for profile update: user {}", user_id);
            return Err(UserError::DataMissing);
        }

        let image_url = match &request.image {
            Some(image_base64) => {
                info!("Uploading profile image for user {}", user_id);
                let url = self
                    .state
                    .media
                    .upload_image(user_id, image_base64)
                    .await
                    .map_err(|e| UserError::ImageUpload(e.to_string()))?;
                info!("Profile image uploaded for user {}: {}", user_id, url);
                Some(url)
            }
            None => None,
        };

        let updated = self
            .state
            .store
            .users
            .update(user_id, move |doc| {
                doc["name"] = Value::String(request.name);
                doc["phone"] = Value::String(request.phone);
                doc["dob"] = Value::String(request.dob);
                doc["gender"] = Value::String(request.gender);
                doc["address"] = request.address.unwrap_or(Value::Null);
                if let Some(url) = image_url {
                    doc["image"] = Value::String(url);
                }
                Ok(())
            })
            .await
            .map_err(|e| match e {
                StoreError::NotFound => UserError::NotFound,
                other => UserError::DatabaseError(other.to_string()),
            })?;

        let user: User =
            serde_json::from_value(updated).map_err(|e| UserError::DatabaseError(e.to_string()))?;

        info!("Profile updated successfully for user {}", user_id);
        Ok(user.sanitized())
    }
}
