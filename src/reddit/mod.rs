//! Forum access. The bot only talks to the forum through [`ForumClient`].

use async_trait::async_trait;

use crate::Result;
use crate::models::Submission;

pub mod client;
pub mod listing;

pub use client::RedditClient;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ForumClient: Send + Sync {
    /// Name of the authenticated account.
    async fn me(&self) -> Result<String>;

    /// Newest posts of a forum, newest first.
    async fn new_posts(&self, subreddit: &str, limit: u32) -> Result<Vec<Submission>>;

    /// Authors of the top-level comments of a post. Deleted authors are left out.
    async fn comment_authors(&self, post: &Submission) -> Result<Vec<String>>;

    async fn reply(&self, post: &Submission, body: &str) -> Result<()>;
}
