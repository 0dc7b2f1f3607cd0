use serde::{Deserialize, Serialize};
use url::Url;

/// A forum post as returned by a subreddit listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Submission {
    pub id: String,
    /// Fullname (`t3_<id>`), used as the reply target.
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subreddit: String,
    pub url: String,
    pub is_self: bool,
    pub created_utc: f64,
    pub permalink: String,
}

impl Submission {
    /// Hostname of the linked URL, if it parses.
    pub fn host(&self) -> Option<String> {
        Url::parse(&self.url)
            .ok()
            .and_then(|url| url.host_str().map(str::to_owned))
    }

    /// Creation time in whole seconds since the epoch.
    pub fn created_timestamp(&self) -> i64 {
        self.created_utc.floor() as i64
    }
}
