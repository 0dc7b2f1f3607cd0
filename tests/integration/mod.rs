// Shared helpers for the integration tests.

pub mod bot_tests;

use std::collections::HashMap;
use std::sync::Arc;

use app_info_bot::{
    AppConfig, AppError, Bot, ForumClient, Result, StoreRegistry, Submission,
    config::{BotConfig, RedditConfig, SecurityConfig, ServerConfig, StoreConfig},
    stores::AppStorePage,
    web::{AppState, create_router},
};
use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use tokio::sync::Mutex;
use tower::ServiceExt;

pub const PAGE_FIXTURE: &str = include_str!("../fixtures/app_store_page.html");
pub const CATALOG_FIXTURE: &str = include_str!("../fixtures/catalog_response.json");
pub const USERNAME: &str = "app-info-bot";

/// Test configuration for integration tests
pub fn get_test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 6000,
        },
        security: SecurityConfig {
            api_key: "integration-key".to_string(),
        },
        reddit: RedditConfig {
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
            username: USERNAME.to_string(),
            password: "hunter2".to_string(),
            user_agent: "app-info-bot/integration".to_string(),
            subreddits: vec!["iosapps".to_string(), "apple".to_string()],
            auth_url: "https://www.reddit.com".to_string(),
            api_url: "https://oauth.reddit.com".to_string(),
        },
        bot: BotConfig {
            post_limit: 25,
            reply_delay_ms: 0,
            cutoff_utc: 1_610_150_400,
            skip_analyzed: true,
        },
        store: StoreConfig {
            normalize_region: false,
            prefer_api: false,
            catalog_url: "https://amp-api.apps.apple.com/v1/catalog/US/apps".to_string(),
            catalog_token: "test-token".to_string(),
            github_url: "https://github.com/fedecalendino/app-info-bot".to_string(),
        },
    }
}

/// In-memory forum: canned listings and comment authors, replies recorded.
#[derive(Default)]
pub struct FakeForum {
    pub posts: HashMap<String, Vec<Submission>>,
    pub authors: HashMap<String, Vec<String>>,
    pub replies: Mutex<Vec<(String, String)>>,
}

impl FakeForum {
    pub fn with_posts(subreddit: &str, posts: Vec<Submission>) -> Self {
        let mut forum = Self::default();
        forum.posts.insert(subreddit.to_string(), posts);
        forum
    }

    pub async fn replies(&self) -> Vec<(String, String)> {
        self.replies.lock().await.clone()
    }
}

#[async_trait]
impl ForumClient for FakeForum {
    async fn me(&self) -> Result<String> {
        Ok(USERNAME.to_string())
    }

    async fn new_posts(&self, subreddit: &str, limit: u32) -> Result<Vec<Submission>> {
        match self.posts.get(subreddit) {
            Some(posts) => Ok(posts.iter().take(limit as usize).cloned().collect()),
            None => Err(AppError::Reddit(format!("unknown subreddit {}", subreddit))),
        }
    }

    async fn comment_authors(&self, post: &Submission) -> Result<Vec<String>> {
        Ok(self.authors.get(&post.id).cloned().unwrap_or_default())
    }

    async fn reply(&self, post: &Submission, body: &str) -> Result<()> {
        self.replies
            .lock()
            .await
            .push((post.name.clone(), body.to_string()));
        Ok(())
    }
}

pub fn link_post(id: &str, subreddit: &str, url: &str) -> Submission {
    Submission {
        id: id.to_string(),
        name: format!("t3_{}", id),
        title: format!("Post {}", id),
        subreddit: subreddit.to_string(),
        url: url.to_string(),
        is_self: false,
        created_utc: 1_700_000_000.0,
        permalink: format!("/r/{}/comments/{}/post/", subreddit, id),
    }
}

/// Registry that scrapes pages served by a local mock server.
pub fn local_registry(host: &str) -> StoreRegistry {
    let mut registry = StoreRegistry::new();
    registry.register(host, Arc::new(AppStorePage::new(reqwest::Client::new(), false)));
    registry
}

pub fn create_test_bot(forum: Arc<dyn ForumClient>, registry: StoreRegistry, config: &AppConfig) -> Bot {
    Bot::from_config(forum, registry, config)
}

pub fn create_test_app(forum: Arc<dyn ForumClient>, registry: StoreRegistry, config: AppConfig) -> Router {
    let stores = registry.hosts();
    let bot = create_test_bot(forum, registry, &config);
    create_router(AppState::new(bot, config, stores))
}

/// Helper to make GET requests to the test app
pub async fn get(app: Router, uri: &str) -> anyhow::Result<(Response<Body>, serde_json::Value)> {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty())?)
        .await?;

    let (parts, body) = response.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX).await?;
    let json = serde_json::from_slice(&bytes)?;

    Ok((Response::from_parts(parts, Body::empty()), json))
}
