use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::header::USER_AGENT;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::ForumClient;
use super::listing::{ApiResponse, CommentData, Listing, Me, TokenResponse};
use crate::config::RedditConfig;
use crate::models::Submission;
use crate::{AppError, Result};

/// Tokens are renewed this long before reddit says they expire.
const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    fn is_fresh(&self) -> bool {
        Utc::now() + Duration::seconds(EXPIRY_MARGIN_SECS) < self.expires_at
    }
}

/// Script-app client for reddit's OAuth API (password grant).
pub struct RedditClient {
    client: Client,
    config: RedditConfig,
    token: RwLock<Option<AccessToken>>,
}

impl RedditClient {
    pub fn new(client: Client, config: RedditConfig) -> Self {
        Self {
            client,
            config,
            token: RwLock::new(None),
        }
    }

    /// Authenticates and checks that the account is the configured one.
    pub async fn login(client: Client, config: RedditConfig) -> Result<Self> {
        let reddit = Self::new(client, config);
        let name = reddit.me().await?;

        if !name.eq_ignore_ascii_case(&reddit.config.username) {
            return Err(AppError::Authentication(format!(
                "logged in as '{}' but expected '{}'",
                name, reddit.config.username
            )));
        }

        info!(username = %name, "Authenticated with reddit");
        Ok(reddit)
    }

    pub fn username(&self) -> &str {
        &self.config.username
    }

    async fn request_token(&self) -> Result<AccessToken> {
        let url = format!("{}/api/v1/access_token", self.config.auth_url.trim_end_matches('/'));
        debug!(url = %url, "Requesting reddit access token");

        let response: TokenResponse = self
            .client
            .post(&url)
            .header(USER_AGENT, &self.config.user_agent)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[
                ("grant_type", "password"),
                ("username", self.config.username.as_str()),
                ("password", self.config.password.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        match response.access_token {
            Some(value) => Ok(AccessToken {
                value,
                expires_at: Utc::now() + Duration::seconds(response.expires_in.unwrap_or(3600)),
            }),
            None => Err(AppError::Authentication(
                response.error.unwrap_or_else(|| "no access token in response".to_string()),
            )),
        }
    }

    async fn access_token(&self) -> Result<String> {
        if let Some(token) = self.token.read().await.as_ref() {
            if token.is_fresh() {
                return Ok(token.value.clone());
            }
        }

        let mut guard = self.token.write().await;
        if let Some(token) = guard.as_ref() {
            if token.is_fresh() {
                return Ok(token.value.clone());
            }
        }

        let token = self.request_token().await?;
        let value = token.value.clone();
        *guard = Some(token);
        Ok(value)
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_url.trim_end_matches('/'), path)
    }

    async fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        let token = self.access_token().await?;
        Ok(request
            .header(USER_AGENT, &self.config.user_agent)
            .bearer_auth(token))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let request = self.client.get(self.api_url(path)).query(query);
        let response = self
            .authorized(request)
            .await?
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }
}

#[async_trait]
impl ForumClient for RedditClient {
    async fn me(&self) -> Result<String> {
        let me: Me = self.get_json("/api/v1/me", &[]).await?;
        Ok(me.name)
    }

    async fn new_posts(&self, subreddit: &str, limit: u32) -> Result<Vec<Submission>> {
        let listing: Listing<Submission> = self
            .get_json(
                &format!("/r/{}/new", subreddit),
                &[("limit", limit.to_string()), ("raw_json", "1".to_string())],
            )
            .await?;

        let posts: Vec<Submission> = listing.into_items().collect();
        debug!(subreddit = %subreddit, count = posts.len(), "Listed new posts");
        Ok(posts)
    }

    async fn comment_authors(&self, post: &Submission) -> Result<Vec<String>> {
        // [0] is the post itself, [1] its top-level comments.
        let listings: Vec<Listing<CommentData>> = self
            .get_json(&format!("/comments/{}", post.id), &[("raw_json", "1".to_string())])
            .await?;

        let authors = listings
            .into_iter()
            .nth(1)
            .map(|comments| comments.into_items_of_kind("t1"))
            .unwrap_or_default()
            .into_iter()
            .filter_map(|comment| comment.author)
            .filter(|author| author != "[deleted]")
            .collect();

        Ok(authors)
    }

    async fn reply(&self, post: &Submission, body: &str) -> Result<()> {
        let request = self.client.post(self.api_url("/api/comment")).form(&[
            ("api_type", "json"),
            ("thing_id", post.name.as_str()),
            ("text", body),
        ]);

        let response: ApiResponse = self
            .authorized(request)
            .await?
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if !response.json.errors.is_empty() {
            warn!(post = %post.permalink, errors = ?response.json.errors, "Reddit rejected reply");
            return Err(AppError::Reddit(format!(
                "reply to {} rejected: {}",
                post.name,
                serde_json::Value::Array(response.json.errors)
            )));
        }

        Ok(())
    }
}
