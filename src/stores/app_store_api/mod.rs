//! App Store extractor backed by the private catalog JSON API that powers the
//! web storefront.

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue, ORIGIN, REFERER, USER_AGENT};
use std::sync::{Arc, LazyLock};
use tracing::{debug, info};
use url::Url;

use crate::config::StoreConfig;
use crate::stores::traits::{AppRecord, StoreExtractor};
use crate::{AppError, Result};

pub mod credentials;
pub mod record;
pub mod response;

pub use credentials::{CredentialProvider, StaticToken};
pub use record::CatalogAppInfo;

pub const PLATFORMS: &[&str] = &["appletv", "ipad", "iphone", "mac"];

pub const EXTEND: &[&str] = &[
    "description",
    "developerInfo",
    "distributionKind",
    "editorialVideo",
    "fileSizeByDevice",
    "messagesScreenshots",
    "platformAttributes",
    "privacy",
    "privacyPolicyUrl",
    "privacyPolicyText",
    "promotionalText",
    "screenshotsByType",
    "supportURLForLanguage",
    "versionHistory",
    "videoPreviewsByType",
    "websiteUrl",
];

pub const INCLUDE: &[&str] = &[
    "genres",
    "developer",
    "reviews",
    "merchandised-in-apps",
    "customers-also-bought-apps",
    "developer-other-apps",
    "app-bundles",
    "top-in-apps",
];

static APP_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:id)?(\d+)$").expect("app id pattern is valid"));

/// Extracts the numeric app id from the last path segment (`.../id904237743`).
pub fn app_id(url: &str) -> Result<String> {
    let parsed = Url::parse(url)?;
    let segment = parsed
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .unwrap_or_default();

    APP_ID
        .captures(segment)
        .and_then(|captures| captures.get(1))
        .map(|id| id.as_str().to_string())
        .ok_or_else(|| AppError::parse(format!("No app id in URL: {}", url)))
}

/// Fixed query parameters requesting extended fields and related entities.
pub fn query_params() -> Vec<(&'static str, String)> {
    vec![
        ("platform", "web".to_string()),
        ("additionalPlatforms", PLATFORMS.join(",")),
        ("extend", EXTEND.join(",")),
        ("include", INCLUDE.join(",")),
        ("l", "en-us".to_string()),
        ("limit[merchandised-in-apps]", "20".to_string()),
    ]
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(
        USER_AGENT,
        HeaderValue::from_static("Mozilla/5.0 (Macintosh; Intel Mac OS X 11_1_0)"),
    );
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("application/x-www-form-urlencoded; charset=UTF-8"),
    );
    headers.insert(ORIGIN, HeaderValue::from_static("https://apps.apple.com"));
    headers.insert(REFERER, HeaderValue::from_static("https://apps.apple.com/"));
    headers
}

pub struct AppStoreCatalog {
    client: Client,
    base_url: String,
    credentials: Arc<dyn CredentialProvider>,
    attribution: String,
}

impl AppStoreCatalog {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        credentials: Arc<dyn CredentialProvider>,
        attribution: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            credentials,
            attribution: attribution.into(),
        }
    }

    pub fn from_config(client: Client, config: &StoreConfig) -> Self {
        Self::new(
            client,
            config.catalog_url.clone(),
            Arc::new(StaticToken::new(config.catalog_token.clone())),
            config.github_url.clone(),
        )
    }

    async fn fetch(&self, id: &str) -> Result<String> {
        let endpoint = format!("{}/{}", self.base_url.trim_end_matches('/'), id);
        let token = self.credentials.bearer_token().await?;

        let response = self
            .client
            .get(&endpoint)
            .headers(browser_headers())
            .bearer_auth(token)
            .query(&query_params())
            .send()
            .await?
            .error_for_status()?;

        Ok(response.text().await?)
    }
}

#[async_trait]
impl StoreExtractor for AppStoreCatalog {
    fn name(&self) -> &str {
        "App Store API"
    }

    async fn extract(&self, url: &str) -> Result<Box<dyn AppRecord>> {
        let id = app_id(url)?;
        debug!(url = %url, app_id = %id, "Fetching catalog entry");

        let body = self.fetch(&id).await?;
        let record = CatalogAppInfo::from_json(&body, &self.attribution)?;

        info!(title = %record.title, store = self.name(), "Parsed catalog entry");
        Ok(Box::new(record))
    }
}
