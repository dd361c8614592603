use anyhow::{anyhow, Result};
use reqwest::{
    header::{HeaderMap, HeaderValue, CONTENT_TYPE},
    Client,
};
use serde_json::{json, Value};
use tracing::{debug, error};
use uuid::Uuid;

use shared_config::AppConfig;

/// Client for the image CDN: uploads return a public URL that gets stored
/// on the owning record.
pub struct MediaStorageClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl MediaStorageClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.media_storage_url.clone(),
            api_key: config.media_storage_api_key.clone(),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.base_url.is_empty() && !self.api_key.is_empty()
    }

    fn get_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(&self.api_key) {
            headers.insert("apikey", value);
        }
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    /// Upload a base64-encoded image and return its public URL.
    pub async fn upload_image(&self, owner_id: Uuid, image_base64: &str) -> Result<String> {
        if !self.is_configured() {
            return Err(anyhow!("Media storage is not configured"));
        }

        let url = format!("{}/v1/images", self.base_url);
        debug!("Uploading image for owner {} to {}", owner_id, url);

        let body = json!({
            "owner_id": owner_id,
            "content": image_base64,
            "resource_type": "image",
        });

        let response = self
            .client
            .post(&url)
            .headers(self.get_headers())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("Media storage error ({}): {}", status, error_text);

            return Err(match status.as_u16() {
                401 | 403 => anyhow!("Media storage authentication error: {}", error_text),
                _ => anyhow!("Media storage error ({}): {}", status, error_text),
            });
        }

        let data = response.json::<Value>().await?;
        data.get("secure_url")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| anyhow!("Media storage response missing secure_url"))
    }
}
