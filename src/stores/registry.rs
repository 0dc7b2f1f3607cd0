use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use url::Url;

use super::app_store::AppStorePage;
use super::app_store_api::AppStoreCatalog;
use super::traits::StoreExtractor;
use crate::config::StoreConfig;

pub type StoreExtractorBox = Arc<dyn StoreExtractor>;

pub const APP_STORE_HOST: &str = "apps.apple.com";
pub const ITUNES_HOST: &str = "itunes.apple.com";

/// Maps a storefront hostname to the extractor responsible for it.
#[derive(Clone, Default)]
pub struct StoreRegistry {
    stores: HashMap<String, StoreExtractorBox>,
}

impl StoreRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The supported App Store hosts. Legacy `itunes.apple.com` links go
    /// through the catalog API; `apps.apple.com` pages are scraped unless
    /// `prefer_api` is set.
    pub fn with_defaults(client: Client, config: &StoreConfig) -> Self {
        let page: StoreExtractorBox = Arc::new(AppStorePage::from_config(client.clone(), config));
        let catalog: StoreExtractorBox = Arc::new(AppStoreCatalog::from_config(client, config));

        let mut registry = Self::new();
        if config.prefer_api {
            registry.register(APP_STORE_HOST, Arc::clone(&catalog));
        } else {
            registry.register(APP_STORE_HOST, page);
        }
        registry.register(ITUNES_HOST, catalog);
        registry
    }

    /// Register an extractor for a hostname, replacing any previous one
    pub fn register(&mut self, host: impl Into<String>, extractor: StoreExtractorBox) {
        self.stores.insert(host.into().to_lowercase(), extractor);
    }

    pub fn get(&self, host: &str) -> Option<StoreExtractorBox> {
        self.stores.get(&host.to_lowercase()).cloned()
    }

    pub fn supports(&self, host: &str) -> bool {
        self.stores.contains_key(&host.to_lowercase())
    }

    /// Looks up the extractor for a full URL.
    pub fn resolve(&self, url: &str) -> Option<StoreExtractorBox> {
        let parsed = Url::parse(url).ok()?;
        self.get(parsed.host_str()?)
    }

    pub fn hosts(&self) -> Vec<String> {
        let mut hosts: Vec<String> = self.stores.keys().cloned().collect();
        hosts.sort();
        hosts
    }
}
