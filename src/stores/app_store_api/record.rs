use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use super::response::{CatalogApp, CatalogResponse};
use crate::models::{Developer, InAppPurchase, PlatformAttribute, PrivacyCard, Rating};
use crate::stores::render::{
    INFO_HEADING, LINE_SEPARATOR, PRICING_HEADING, PRIVACY_HEADING, header_lines,
    iap_count_label, natural_join, privacy_card_line,
};
use crate::stores::traits::AppRecord;
use crate::{AppError, Result};

const LISTED_IAPS: usize = 5;

/// Application record built from the catalog API. Fields that differ per
/// device family are kept as one [`PlatformAttribute`] per platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogAppInfo {
    pub title: String,
    pub url: String,
    pub age: String,
    pub category: String,
    pub developer: Developer,
    pub platforms: Vec<String>,
    pub rating: Rating,
    pub size: String,
    pub descriptions: Vec<PlatformAttribute>,
    pub subtitles: Vec<PlatformAttribute>,
    pub prices: Vec<PlatformAttribute>,
    pub iaps: Vec<InAppPurchase>,
    pub privacy_policies: Vec<PlatformAttribute>,
    pub privacy_cards: Vec<PrivacyCard>,
    pub attribution: String,
}

/// Mean size across devices in whole megabytes.
pub fn average_size_mb(sizes: &BTreeMap<String, u64>) -> Result<u64> {
    if sizes.is_empty() {
        return Err(AppError::parse("fileSizeByDevice is empty"));
    }
    let total: u64 = sizes.values().sum();
    Ok(total / sizes.len() as u64 / 1024 / 1024)
}

impl CatalogAppInfo {
    pub fn from_json(body: &str, attribution: &str) -> Result<Self> {
        let response: CatalogResponse = serde_json::from_str(body)?;
        Self::from_response(response, attribution)
    }

    pub fn from_response(response: CatalogResponse, attribution: &str) -> Result<Self> {
        let app = response.data.into_iter().next().ok_or_else(|| AppError::NotFound {
            resource: "catalog app".to_string(),
        })?;
        Self::from_app(app, attribution)
    }

    fn from_app(app: CatalogApp, attribution: &str) -> Result<Self> {
        let CatalogApp {
            attributes,
            relationships,
        } = app;

        let developer = relationships
            .developer
            .data
            .into_iter()
            .next()
            .map(|resource| Developer {
                name: resource.attributes.name,
                url: resource.attributes.url,
            })
            .ok_or_else(|| AppError::NotFound {
                resource: "developer".to_string(),
            })?;

        let iaps = relationships
            .top_in_apps
            .data
            .into_iter()
            .map(|resource| {
                let iap = resource.attributes;
                let price = iap
                    .offers
                    .into_iter()
                    .next()
                    .ok_or_else(|| AppError::parse(format!("in-app purchase '{}' has no offers", iap.name)))?
                    .price_formatted;
                Ok(InAppPurchase::new(iap.name, price))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut descriptions = Vec::new();
        let mut subtitles = Vec::new();
        let mut prices = Vec::new();
        let mut privacy_policies = Vec::new();

        for (platform, data) in attributes.platforms()? {
            descriptions.push(PlatformAttribute::new(&platform, "description", data.description.standard));
            if let Some(subtitle) = data.subtitle {
                subtitles.push(PlatformAttribute::new(&platform, "subtitle", subtitle));
            }
            privacy_policies.push(PlatformAttribute::new(&platform, "policy", data.privacy_policy_url));

            for offer in data.offers.into_iter().filter(|offer| offer.kind == "get") {
                let value = if offer.price > 0.0 {
                    offer.price_formatted
                } else {
                    "Free".to_string()
                };
                prices.push(PlatformAttribute::new(&platform, "price", value));
            }
        }

        let privacy_cards = attributes
            .privacy
            .privacy_types
            .into_iter()
            .map(|privacy_type| PrivacyCard {
                title: privacy_type.privacy_type,
                items: privacy_type
                    .data_categories
                    .into_iter()
                    .map(|category| category.data_category)
                    .collect(),
            })
            .collect();

        Ok(Self {
            size: format!("{} MB", average_size_mb(&attributes.file_size_by_device)?),
            title: attributes.name,
            url: attributes.url,
            age: attributes.content_ratings_by_system.apps_apple.name,
            category: attributes.genre_display_name,
            developer,
            platforms: attributes.device_families,
            rating: Rating {
                value: attributes.user_rating.aria_label_for_ratings,
                count: attributes.user_rating.rating_count.to_string(),
            },
            descriptions,
            subtitles,
            prices,
            iaps,
            privacy_policies,
            privacy_cards,
            attribution: attribution.to_string(),
        })
    }
}

impl fmt::Display for CatalogAppInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines = header_lines(&self.title, &self.url, &self.developer);

        lines.push(INFO_HEADING.to_string());
        lines.push(format!("**Age**: {}.", self.age));
        lines.push(format!("**Category**: {}.", self.category));
        lines.push(format!("**Platforms**: {}.", natural_join(&self.platforms)));
        lines.push(format!("**Rating**: {} ({} ratings).", self.rating.value, self.rating.count));
        lines.push(format!("**Size**: {}.", self.size));

        lines.push(PRICING_HEADING.to_string());
        lines.push("**Prices**:".to_string());
        for price in &self.prices {
            lines.push(format!(" * {}: {}", price.platform, price.value));
        }
        lines.push(format!(
            "**In-App Purchases**: {}",
            iap_count_label(self.iaps.len(), LISTED_IAPS, "5+")
        ));
        for iap in self.iaps.iter().take(LISTED_IAPS) {
            lines.push(format!(" * {}: {}", iap.name, iap.price));
        }

        lines.push(PRIVACY_HEADING.to_string());
        lines.push("**Policy**:".to_string());
        for policy in &self.privacy_policies {
            lines.push(format!(" * {}: {}", policy.platform, policy.value));
        }
        lines.push("**Specification**:".to_string());
        lines.extend(self.privacy_cards.iter().map(privacy_card_line));

        lines.push(String::new());
        lines.push("---".to_string());
        lines.push(String::new());
        lines.push(format!("^[github]({})", self.attribution));

        f.write_str(&lines.join(LINE_SEPARATOR))
    }
}

impl AppRecord for CatalogAppInfo {
    fn store(&self) -> &str {
        "App Store"
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn url(&self) -> &str {
        &self.url
    }
}
