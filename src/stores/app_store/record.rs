use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use std::fmt;

use crate::models::{Developer, InAppPurchase, PrivacyCard, Rating};
use crate::stores::render::{
    INFO_HEADING, LINE_SEPARATOR, PRICING_HEADING, PRIVACY_HEADING, header_lines,
    iap_count_label, natural_join, privacy_card_line,
};
use crate::stores::traits::AppRecord;
use crate::utils::text::or_dash;
use crate::{AppError, Result};

const TITLE: &str = "h1[data-test-product-name]";
const SUBTITLE: &str = "h2[data-test-product-subtitle]";
const CANONICAL: &str = r#"link[rel="canonical"]"#;
const DEVELOPER: &str = "a[data-test-developer-link]";
const CATEGORY: &str = "dd[data-test-app-info-category]";
const COMPATIBILITY: &str = "dd[data-test-app-info-compatibility]";
const PLATFORMS: &str = "a[data-test-app-platform-link]";
const AVERAGE_RATING: &str = "div[data-test-average-rating]";
const RATING_COUNT: &str = "p[data-test-rating-count]";
const SIZE: &str = "dd[data-test-app-info-size]";
const PRICE: &str = "li.app-header__list__item--price";
const IAP: &str = "li[data-test-app-info-iap]";
const PRIVACY_POLICY: &str = "a[data-test-app-info-links-privacy]";
const PRIVACY_CARD: &str = "div.app-privacy__card";
const PRIVACY_CARD_HEADING: &str = "h3.privacy-type__heading";
const PRIVACY_CARD_ITEM: &str = "span.privacy-type__data-category-heading";
const DESCRIPTION: &str = "div[data-test-description] p";
const LAST_UPDATE: &str = "time[data-test-we-datetime]";

/// Application record parsed from a rendered App Store page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppStorePageInfo {
    pub title: String,
    pub url: String,
    pub subtitle: Option<String>,
    pub developer: Developer,
    pub category: Option<String>,
    pub compatibility: Option<String>,
    pub platforms: Vec<String>,
    pub rating: Option<Rating>,
    pub size: Option<String>,
    pub price: Option<String>,
    pub iaps: Vec<InAppPurchase>,
    pub privacy_policy: Option<String>,
    pub privacy_cards: Vec<PrivacyCard>,
    pub description: Vec<String>,
    pub last_update: Option<String>,
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| AppError::parse(format!("Invalid CSS selector '{}': {:?}", css, e)))
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Thin wrapper that answers "find the first/all nodes matching X" queries.
struct Page<'a> {
    document: &'a Html,
}

impl<'a> Page<'a> {
    fn first(&self, css: &str) -> Result<Option<ElementRef<'a>>> {
        Ok(self.document.select(&selector(css)?).next())
    }

    fn all(&self, css: &str) -> Result<Vec<ElementRef<'a>>> {
        Ok(self.document.select(&selector(css)?).collect())
    }

    fn text(&self, css: &str) -> Result<Option<String>> {
        Ok(self.first(css)?.map(element_text))
    }

    fn attr(&self, css: &str, name: &str) -> Result<Option<String>> {
        Ok(self
            .first(css)?
            .and_then(|element| element.value().attr(name))
            .map(str::to_owned))
    }

    fn required(&self, css: &str) -> Result<ElementRef<'a>> {
        self.first(css)?.ok_or_else(|| AppError::ElementNotFound {
            selector: css.to_string(),
        })
    }
}

/// Splits an in-app purchase row into name and price. A row with a single
/// line is a free item.
fn parse_iap(text: &str) -> Option<InAppPurchase> {
    let mut lines = text.lines().map(str::trim).filter(|line| !line.is_empty());
    let name = lines.next()?;
    let price = lines.next().unwrap_or("");
    Some(InAppPurchase::new(name, price))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl AppStorePageInfo {
    /// Parses a storefront page. `fetched_url` is used when the page has no
    /// canonical link.
    pub fn parse(html: &str, fetched_url: &str) -> Result<Self> {
        let document = Html::parse_document(html);
        let page = Page { document: &document };

        // First text node only, so badges like "4+" stay out of the title.
        let title = page
            .required(TITLE)?
            .text()
            .map(str::trim)
            .find(|t| !t.is_empty())
            .map(str::to_owned)
            .ok_or_else(|| AppError::ElementNotFound {
                selector: TITLE.to_string(),
            })?;

        let developer_link = page.required(DEVELOPER)?;
        let developer = Developer {
            name: element_text(developer_link),
            url: developer_link.value().attr("href").unwrap_or_default().to_string(),
        };

        let url = page
            .attr(CANONICAL, "href")?
            .unwrap_or_else(|| fetched_url.to_string());

        let compatibility = page.text(COMPATIBILITY)?.map(|text| {
            text.split(". ").next().unwrap_or_default().to_string()
        });

        let platforms = page
            .all(PLATFORMS)?
            .into_iter()
            .map(element_text)
            .collect();

        let score = non_empty(page.text(AVERAGE_RATING)?);
        let count = non_empty(page.text(RATING_COUNT)?).map(|c| c.to_lowercase());
        let rating = match (score, count) {
            (Some(value), Some(count)) => Some(Rating { value, count }),
            _ => None,
        };

        let iaps = page
            .all(IAP)?
            .into_iter()
            .filter_map(|li| parse_iap(&element_text(li)))
            .collect();

        let heading = selector(PRIVACY_CARD_HEADING)?;
        let item = selector(PRIVACY_CARD_ITEM)?;
        let privacy_cards = page
            .all(PRIVACY_CARD)?
            .into_iter()
            .filter_map(|card| {
                let title = element_text(card.select(&heading).next()?);
                let items = card.select(&item).map(element_text).collect();
                Some(PrivacyCard { title, items })
            })
            .collect();

        let description = page
            .all(DESCRIPTION)?
            .into_iter()
            .map(element_text)
            .filter(|p| !p.is_empty())
            .collect();

        Ok(Self {
            title,
            url,
            subtitle: non_empty(page.text(SUBTITLE)?),
            developer,
            category: non_empty(page.text(CATEGORY)?),
            compatibility: non_empty(compatibility),
            platforms,
            rating,
            size: non_empty(page.text(SIZE)?),
            price: non_empty(page.text(PRICE)?),
            iaps,
            privacy_policy: page.attr(PRIVACY_POLICY, "href")?,
            privacy_cards,
            description,
            last_update: non_empty(page.text(LAST_UPDATE)?),
        })
    }
}

impl fmt::Display for AppStorePageInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines = header_lines(&self.title, &self.url, &self.developer);

        lines.push(INFO_HEADING.to_string());
        lines.push(format!("**Category**: {}.", or_dash(self.category.as_deref())));
        lines.push(format!("**Compatibility**: {}.", or_dash(self.compatibility.as_deref())));
        lines.push(format!("**Platforms**: {}.", natural_join(&self.platforms)));
        match &self.rating {
            Some(rating) => lines.push(format!("**Rating**: {} ({}).", rating.value, rating.count)),
            None => lines.push("**Rating**: -.".to_string()),
        }
        lines.push(format!("**Size**: {}.", or_dash(self.size.as_deref())));

        lines.push(PRICING_HEADING.to_string());
        lines.push(format!("**Price**: {}", or_dash(self.price.as_deref())));
        lines.push(format!("**In-App Purchases**: {}", iap_count_label(self.iaps.len(), 2, "3+")));
        for iap in &self.iaps {
            if iap.price.is_empty() {
                lines.push(format!(" * {}", iap.name));
            } else {
                lines.push(format!(" * {}: {}", iap.name, iap.price));
            }
        }

        lines.push(PRIVACY_HEADING.to_string());
        lines.push(format!("**Policy**: {}", or_dash(self.privacy_policy.as_deref())));
        lines.push("**Specification**:".to_string());
        lines.extend(self.privacy_cards.iter().map(privacy_card_line));

        f.write_str(&lines.join(LINE_SEPARATOR))
    }
}

impl AppRecord for AppStorePageInfo {
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
