pub mod media;
pub mod store;

use shared_config::AppConfig;

use crate::media::MediaStorageClient;
use crate::store::DocumentStore;

/// Shared application state handed to every router.
pub struct AppState {
    pub config: AppConfig,
    pub store: DocumentStore,
    pub media: MediaStorageClient,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let media = MediaStorageClient::new(&config);
        Self {
            config,
            store: DocumentStore::new(),
            media,
        }
    }
}
