use async_trait::async_trait;
use std::fmt;

use crate::Result;

/// A normalized application record. `Display` renders the Markdown reply body.
pub trait AppRecord: fmt::Display + fmt::Debug + Send + Sync {
    /// Human readable storefront name.
    fn store(&self) -> &str;
    fn title(&self) -> &str;
    fn url(&self) -> &str;

    fn render(&self) -> String {
        self.to_string()
    }
}

/// Turns a storefront URL into an application record.
#[async_trait]
pub trait StoreExtractor: Send + Sync {
    /// Extractor metadata
    fn name(&self) -> &str;

    /// Fetches and parses `url`. Transport and decode failures propagate.
    async fn extract(&self, url: &str) -> Result<Box<dyn AppRecord>>;
}
