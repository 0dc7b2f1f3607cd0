//! Value types shared by every storefront extractor.
//!
//! These are plain immutable aggregates: no identity beyond structural
//! equality, built once per extraction and dropped after the reply is sent.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Developer {
    pub name: String,
    pub url: String,
}

/// Average score and number of ratings, both as display strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rating {
    pub value: String,
    pub count: String,
}

/// An in-app purchase line item. An empty `price` means a free or bundled item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InAppPurchase {
    pub name: String,
    pub price: String,
}

/// A privacy disclosure category and the data labels listed under it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrivacyCard {
    pub title: String,
    pub items: Vec<String>,
}

/// One value of a field that varies per device family (`iphone`, `mac`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlatformAttribute {
    pub platform: String,
    pub name: String,
    pub value: String,
}

impl InAppPurchase {
    pub fn new(name: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price: price.into(),
        }
    }
}

impl PlatformAttribute {
    pub fn new(
        platform: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            platform: platform.into(),
            name: name.into(),
            value: value.into(),
        }
    }
}
