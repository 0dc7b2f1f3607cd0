//! Markdown building blocks shared by the record renderers.

use crate::models::{Developer, PrivacyCard};
use crate::utils::fancy_join;

/// Reddit renders a trailing double space as a hard line break.
pub const LINE_SEPARATOR: &str = "  \n";

pub const INFO_HEADING: &str = "#### ℹ️ **App Info**";
pub const PRICING_HEADING: &str = "#### 💸 **Pricing**";
pub const PRIVACY_HEADING: &str = "#### 🔒️ **Privacy**";

pub fn natural_join<S: AsRef<str>>(items: &[S]) -> String {
    fancy_join(", ", items, " & ")
}

pub fn header_lines(title: &str, url: &str, developer: &Developer) -> Vec<String> {
    vec![
        format!("## [**{}**]({})", title, url),
        format!(" > by [{}]({})", developer.name, developer.url),
        "\n____\n".to_string(),
    ]
}

pub fn privacy_card_line(card: &PrivacyCard) -> String {
    if card.items.is_empty() {
        format!(" * {}.", card.title)
    } else {
        format!(" * {}: {}.", card.title, natural_join(&card.items))
    }
}

/// Bucketed in-app purchase count: `None`, the exact count up to `max`,
/// then `<cap>+`.
pub fn iap_count_label(count: usize, max: usize, cap: &str) -> String {
    match count {
        0 => "None".to_string(),
        n if n <= max => n.to_string(),
        _ => cap.to_string(),
    }
}
