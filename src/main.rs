use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use app_info_bot::web::{self, AppState};
use app_info_bot::{AppConfig, Bot, RedditClient, StoreRegistry};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("app_info_bot=info".parse()?),
        )
        .init();

    info!("Starting App Info Bot...");

    let config = AppConfig::from_env()?;
    let client = reqwest::Client::builder()
        .user_agent(config.reddit.user_agent.clone())
        .build()?;

    let reddit = RedditClient::login(client.clone(), config.reddit.clone()).await?;

    if config.store.catalog_token.is_empty() {
        warn!("APP_STORE_API_TOKEN is not set, catalog lookups will be rejected");
    }

    let registry = StoreRegistry::with_defaults(client, &config.store);
    let stores = registry.hosts();
    info!(
        subreddits = ?config.reddit.subreddits,
        stores = ?stores,
        "Bot configured"
    );

    let bot = Bot::from_config(Arc::new(reddit), registry, &config);
    let state = AppState::new(bot, config.clone(), stores);

    web::serve(&config, state).await
}
