use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use url::Url;

pub const DEFAULT_PORT: u16 = 6000;
pub const DEFAULT_CUTOFF_UTC: i64 = 1_610_150_400; // 2021-01-09T00:00:00Z
pub const DEFAULT_CATALOG_URL: &str = "https://amp-api.apps.apple.com/v1/catalog/US/apps";
pub const DEFAULT_GITHUB_URL: &str = "https://github.com/fedecalendino/app-info-bot";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub security: SecurityConfig,
    pub reddit: RedditConfig,
    pub bot: BotConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub api_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditConfig {
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
    pub user_agent: String,
    pub subreddits: Vec<String>,
    pub auth_url: String,
    pub api_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    pub post_limit: u32,
    pub reply_delay_ms: u64,
    pub cutoff_utc: i64,
    pub skip_analyzed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub normalize_region: bool,
    pub prefer_api: bool,
    pub catalog_url: String,
    pub catalog_token: String,
    pub github_url: String,
}

/// Flat view of the process environment, one field per variable.
#[derive(Debug, Deserialize)]
struct EnvSettings {
    #[serde(default = "default_port")]
    port: u16,
    #[serde(default = "default_api_key")]
    api_key: String,
    #[serde(default)]
    reddit_clientid: String,
    #[serde(default)]
    reddit_clientsecret: String,
    #[serde(default)]
    reddit_username: String,
    #[serde(default)]
    reddit_password: String,
    #[serde(default = "default_user_agent")]
    reddit_useragent: String,
    #[serde(default = "default_subreddits")]
    reddit_subreddits: String,
    #[serde(default = "default_auth_url")]
    reddit_auth_url: String,
    #[serde(default = "default_api_url")]
    reddit_api_url: String,
    #[serde(default = "default_post_limit")]
    bot_post_limit: u32,
    #[serde(default = "default_reply_delay_ms")]
    bot_reply_delay_ms: u64,
    #[serde(default = "default_cutoff_utc")]
    bot_cutoff_utc: i64,
    #[serde(default = "default_true")]
    bot_skip_analyzed: bool,
    #[serde(default = "default_true")]
    store_normalize_region: bool,
    #[serde(default)]
    store_prefer_api: bool,
    #[serde(default = "default_catalog_url")]
    app_store_api_url: String,
    #[serde(default)]
    app_store_api_token: String,
    #[serde(default = "default_github_url")]
    github_url: String,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_api_key() -> String {
    "test".into()
}

fn default_user_agent() -> String {
    format!("app-info-bot/{}", env!("CARGO_PKG_VERSION"))
}

fn default_subreddits() -> String {
    "test,test2".into()
}

fn default_auth_url() -> String {
    "https://www.reddit.com".into()
}

fn default_api_url() -> String {
    "https://oauth.reddit.com".into()
}

fn default_post_limit() -> u32 {
    25
}

fn default_reply_delay_ms() -> u64 {
    1000
}

fn default_cutoff_utc() -> i64 {
    DEFAULT_CUTOFF_UTC
}

fn default_true() -> bool {
    true
}

fn default_catalog_url() -> String {
    DEFAULT_CATALOG_URL.into()
}

fn default_github_url() -> String {
    DEFAULT_GITHUB_URL.into()
}

/// Loopback for the default port, all interfaces otherwise.
pub fn bind_host(port: u16) -> &'static str {
    if port == DEFAULT_PORT {
        "127.0.0.1"
    } else {
        "0.0.0.0"
    }
}

/// Splits a comma-separated subreddit list, dropping blanks.
pub fn parse_subreddits(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

impl From<EnvSettings> for AppConfig {
    fn from(env: EnvSettings) -> Self {
        AppConfig {
            server: ServerConfig {
                host: bind_host(env.port).to_string(),
                port: env.port,
            },
            security: SecurityConfig {
                api_key: env.api_key,
            },
            reddit: RedditConfig {
                client_id: env.reddit_clientid,
                client_secret: env.reddit_clientsecret,
                username: env.reddit_username,
                password: env.reddit_password,
                user_agent: env.reddit_useragent,
                subreddits: parse_subreddits(&env.reddit_subreddits),
                auth_url: env.reddit_auth_url,
                api_url: env.reddit_api_url,
            },
            bot: BotConfig {
                post_limit: env.bot_post_limit,
                reply_delay_ms: env.bot_reply_delay_ms,
                cutoff_utc: env.bot_cutoff_utc,
                skip_analyzed: env.bot_skip_analyzed,
            },
            store: StoreConfig {
                normalize_region: env.store_normalize_region,
                prefer_api: env.store_prefer_api,
                catalog_url: env.app_store_api_url,
                catalog_token: env.app_store_api_token,
                github_url: env.github_url,
            },
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let s = Config::builder()
            // Local overrides (ignored by git), same keys as the environment
            .add_source(File::with_name("config/local").required(false))
            .add_source(Environment::default())
            .build()?;

        Self::from_config(s)
    }

    fn from_config(s: Config) -> Result<Self, ConfigError> {
        let env: EnvSettings = s.try_deserialize()?;
        let config = AppConfig::from(env);
        config.validate()?;
        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Message("Server port must be greater than 0".into()));
        }

        if self.security.api_key.is_empty() {
            return Err(ConfigError::Message("API key must not be empty".into()));
        }

        if self.reddit.subreddits.is_empty() {
            return Err(ConfigError::Message("At least one subreddit must be configured".into()));
        }

        if self.reddit.user_agent.trim().is_empty() {
            return Err(ConfigError::Message("Reddit user agent must not be empty".into()));
        }

        for (name, value) in [
            ("reddit auth URL", &self.reddit.auth_url),
            ("reddit API URL", &self.reddit.api_url),
            ("catalog URL", &self.store.catalog_url),
            ("GitHub URL", &self.store.github_url),
        ] {
            if Url::parse(value).is_err() {
                return Err(ConfigError::Message(format!("Invalid {} format", name)));
            }
        }

        if !(1..=100).contains(&self.bot.post_limit) {
            return Err(ConfigError::Message("Bot post_limit must be between 1 and 100".into()));
        }

        Ok(())
    }
}
