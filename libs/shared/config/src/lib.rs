use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub jwt_secret: String,
    pub admin_email: String,
    pub admin_password: String,
    pub media_storage_url: String,
    pub media_storage_api_key: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(4000),
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| {
                    warn!("JWT_SECRET not set, using empty value");
                    String::new()
                }),
            admin_email: env::var("ADMIN_EMAIL")
                .unwrap_or_else(|_| {
                    warn!("ADMIN_EMAIL not set, using empty value");
                    String::new()
                }),
            admin_password: env::var("ADMIN_PASSWORD")
                .unwrap_or_else(|_| {
                    warn!("ADMIN_PASSWORD not set, using empty value");
                    String::new()
                }),
            media_storage_url: env::var("MEDIA_STORAGE_URL")
                .unwrap_or_else(|_| {
                    warn!("MEDIA_STORAGE_URL not set, using empty value");
                    String::new()
                }),
            media_storage_api_key: env::var("MEDIA_STORAGE_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("MEDIA_STORAGE_API_KEY not set, using empty value");
                    String::new()
                }),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.jwt_secret.is_empty()
            && !self.admin_email.is_empty()
            && !self.admin_password.is_empty()
    }

    pub fn is_media_storage_configured(&self) -> bool {
        !self.media_storage_url.is_empty() && !self.media_storage_api_key.is_empty()
    }
}
