//! Typed view of the catalog API response. Every field listed here is
//! required unless documented otherwise: a missing key fails decoding instead
//! of being defaulted.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogResponse {
    pub data: Vec<CatalogApp>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogApp {
    pub attributes: Attributes,
    pub relationships: Relationships,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attributes {
    pub name: String,
    pub url: String,
    pub genre_display_name: String,
    pub device_families: Vec<String>,
    pub content_ratings_by_system: ContentRatings,
    pub user_rating: UserRating,
    pub file_size_by_device: BTreeMap<String, u64>,
    /// Keyed by platform (`ios`, `osx`, ...), kept in response order.
    pub platform_attributes: Map<String, Value>,
    pub privacy: Privacy,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRatings {
    pub apps_apple: ContentRating,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentRating {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRating {
    pub aria_label_for_ratings: String,
    pub rating_count: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformAttributes {
    pub description: Description,
    /// The only optional platform key: apps without a subtitle omit it for
    /// every platform, and some platforms (`osx`) never carry one.
    #[serde(default)]
    pub subtitle: Option<String>,
    pub privacy_policy_url: String,
    pub offers: Vec<Offer>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Description {
    pub standard: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    #[serde(rename = "type")]
    pub kind: String,
    pub price: f64,
    pub price_formatted: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Privacy {
    pub privacy_types: Vec<PrivacyType>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivacyType {
    pub privacy_type: String,
    pub data_categories: Vec<DataCategory>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataCategory {
    pub data_category: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Relationships {
    pub developer: Related<DeveloperAttributes>,
    #[serde(rename = "top-in-apps")]
    pub top_in_apps: Related<InAppAttributes>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Related<T> {
    pub data: Vec<Resource<T>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Resource<T> {
    pub attributes: T,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeveloperAttributes {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InAppAttributes {
    pub name: String,
    pub offers: Vec<InAppOffer>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InAppOffer {
    pub price_formatted: String,
}

impl Attributes {
    /// Decodes each platform entry, preserving response order.
    pub fn platforms(&self) -> serde_json::Result<Vec<(String, PlatformAttributes)>> {
        self.platform_attributes
            .iter()
            .map(|(platform, value)| {
                let attributes = PlatformAttributes::deserialize(value)?;
                Ok((platform.clone(), attributes))
            })
            .collect()
    }
}
