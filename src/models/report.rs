use serde::{Deserialize, Serialize};

/// Why a listed post was not processed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    SelfPost,
    Unsupported,
    Old,
    Analyzed,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkipCounts {
    pub self_post: usize,
    pub unsupported: usize,
    pub old: usize,
    pub analyzed: usize,
}

impl SkipCounts {
    pub fn record(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::SelfPost => self.self_post += 1,
            SkipReason::Unsupported => self.unsupported += 1,
            SkipReason::Old => self.old += 1,
            SkipReason::Analyzed => self.analyzed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.self_post + self.unsupported + self.old + self.analyzed
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FailedPost {
    pub url: String,
    pub permalink: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubredditReport {
    pub subreddit: String,
    pub listed: usize,
    pub replied: Vec<String>,
    pub skipped: SkipCounts,
    pub failed: Vec<FailedPost>,
}

/// Outcome of one full run, returned by the trigger endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunReport {
    pub subreddits: Vec<SubredditReport>,
}

impl SubredditReport {
    pub fn new(subreddit: impl Into<String>) -> Self {
        Self {
            subreddit: subreddit.into(),
            ..Default::default()
        }
    }
}

impl RunReport {
    pub fn replied(&self) -> usize {
        self.subreddits.iter().map(|s| s.replied.len()).sum()
    }

    pub fn failed(&self) -> usize {
        self.subreddits.iter().map(|s| s.failed.len()).sum()
    }
}
