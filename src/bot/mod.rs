//! Run orchestration: list, filter, extract, reply.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::{AppError, Result};
use crate::config::{AppConfig, BotConfig};
use crate::models::{FailedPost, RunReport, SkipReason, SubredditReport, Submission};
use crate::reddit::ForumClient;
use crate::stores::StoreRegistry;

pub mod filters;

pub struct Bot {
    forum: Arc<dyn ForumClient>,
    registry: StoreRegistry,
    config: BotConfig,
    subreddits: Vec<String>,
    username: String,
}

impl Bot {
    pub fn new(
        forum: Arc<dyn ForumClient>,
        registry: StoreRegistry,
        config: BotConfig,
        subreddits: Vec<String>,
        username: impl Into<String>,
    ) -> Self {
        Self {
            forum,
            registry,
            config,
            subreddits,
            username: username.into(),
        }
    }

    pub fn from_config(forum: Arc<dyn ForumClient>, registry: StoreRegistry, config: &AppConfig) -> Self {
        Self::new(
            forum,
            registry,
            config.bot.clone(),
            config.reddit.subreddits.clone(),
            config.reddit.username.clone(),
        )
    }

    /// One pass over every configured subreddit, in order.
    pub async fn run(&self) -> Result<RunReport> {
        let mut report = RunReport::default();

        for subreddit in &self.subreddits {
            report.subreddits.push(self.process_subreddit(subreddit).await?);
        }

        info!(
            subreddits = report.subreddits.len(),
            replied = report.replied(),
            failed = report.failed(),
            "Run finished"
        );
        Ok(report)
    }

    async fn process_subreddit(&self, subreddit: &str) -> Result<SubredditReport> {
        info!(subreddit = %subreddit, "Processing subreddit");

        let posts = self.forum.new_posts(subreddit, self.config.post_limit).await?;
        let mut report = SubredditReport::new(subreddit);
        report.listed = posts.len();

        for post in &posts {
            let outcome = match self.skip_reason(post).await {
                Ok(Some(reason)) => {
                    debug!(post = %post.permalink, reason = ?reason, "Skipping post");
                    report.skipped.record(reason);
                    continue;
                }
                Ok(None) => self.process_post(post).await,
                Err(e) => Err(e),
            };

            match outcome {
                Ok(()) => {
                    info!(post = %post.permalink, url = %post.url, "Replied");
                    report.replied.push(post.permalink.clone());

                    if self.config.reply_delay_ms > 0 {
                        tokio::time::sleep(Duration::from_millis(self.config.reply_delay_ms)).await;
                    }
                }
                Err(e) => {
                    error!(post = %post.permalink, url = %post.url, error = %e, "Failed to process post");
                    report.failed.push(FailedPost {
                        url: post.url.clone(),
                        permalink: post.permalink.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            subreddit = %subreddit,
            listed = report.listed,
            skipped = report.skipped.total(),
            replied = report.replied.len(),
            failed = report.failed.len(),
            "Subreddit processed"
        );
        Ok(report)
    }

    async fn skip_reason(&self, post: &Submission) -> Result<Option<SkipReason>> {
        if let Some(reason) = filters::precheck(post, &self.registry, self.config.cutoff_utc) {
            return Ok(Some(reason));
        }

        if self.config.skip_analyzed {
            let authors = self.forum.comment_authors(post).await?;
            if filters::was_analyzed(&authors, &self.username) {
                return Ok(Some(SkipReason::Analyzed));
            }
        }

        Ok(None)
    }

    async fn process_post(&self, post: &Submission) -> Result<()> {
        let extractor = self
            .registry
            .resolve(&post.url)
            .ok_or_else(|| AppError::UnsupportedStore {
                host: post.host().unwrap_or_default(),
            })?;

        debug!(post = %post.permalink, extractor = extractor.name(), "Extracting app info");
        let record = extractor.extract(&post.url).await?;
        info!(title = %record.title(), store = record.store(), "Fetched app information");

        self.forum.reply(post, &record.render()).await
    }
}
