use crate::config::Config;
use crate::storage::{IdentityStore, JsonFileStore, KeyValueStore, ResultCache};
use crate::summary::Summarizer;
use crate::uploader::Uploader;
use crate::webhook::WebhookClient;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    pub cache: ResultCache,
    pub identity: IdentityStore,
    pub uploader: Arc<Uploader>,
    pub summarizer: Arc<Summarizer>,
}

impl AppState {
    pub fn new(store: Arc<dyn KeyValueStore>, webhook: WebhookClient, redirect_delay: Duration) -> Self {
        let cache = ResultCache::new(Arc::clone(&store));
        let identity = IdentityStore::new(store);
        let uploader = Uploader::new(webhook.clone(), cache.clone(), identity.clone(), redirect_delay);
        let summarizer = Summarizer::new(webhook, cache.clone(), identity.clone());
        Self {
            cache,
            identity,
            uploader: Arc::new(uploader),
            summarizer: Arc::new(summarizer),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let store: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::new(&config.data_path));
        Self::new(store, WebhookClient::from_config(config), config.redirect_delay)
    }
}
