//! App Store extractor backed by the public, server-rendered product page.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};
use url::Url;

use crate::config::StoreConfig;
use crate::stores::traits::{AppRecord, StoreExtractor};
use crate::{AppError, Result};

pub mod record;

pub use record::AppStorePageInfo;

pub struct AppStorePage {
    client: Client,
    normalize_region: bool,
}

impl AppStorePage {
    pub fn new(client: Client, normalize_region: bool) -> Self {
        Self {
            client,
            normalize_region,
        }
    }

    pub fn from_config(client: Client, config: &StoreConfig) -> Self {
        Self::new(client, config.normalize_region)
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}

/// Rewrites a regional storefront URL to the default (US) storefront by
/// dropping the leading region segment: `/gb/app/x/id1` becomes `/app/x/id1`.
pub fn us_store(url: &str) -> Result<String> {
    let parsed = Url::parse(url)?;
    let host = parsed
        .host_str()
        .ok_or_else(|| AppError::parse(format!("URL has no host: {}", url)))?;

    let path = parsed.path();
    let path = if path == "/app" || path.starts_with("/app/") {
        path.trim_start_matches('/')
    } else {
        path.splitn(3, '/').nth(2).unwrap_or_default()
    };

    Ok(format!("https://{}/{}", host, path))
}

#[async_trait]
impl StoreExtractor for AppStorePage {
    fn name(&self) -> &str {
        "App Store"
    }

    async fn extract(&self, url: &str) -> Result<Box<dyn AppRecord>> {
        let target = if self.normalize_region {
            us_store(url)?
        } else {
            url.to_string()
        };
        debug!(url = %url, target = %target, "Fetching App Store page");

        let html = self.fetch(&target).await?;
        let record = AppStorePageInfo::parse(&html, &target)?;

        info!(title = %record.title, store = self.name(), "Parsed App Store page");
        Ok(Box::new(record))
    }
}
