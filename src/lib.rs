pub mod bot;
pub mod config;
pub mod models;
pub mod reddit;
pub mod stores;
pub mod utils;
pub mod web;

// Re-export commonly used types
pub use bot::Bot;
pub use config::AppConfig;
pub use models::{RunReport, Submission};
pub use reddit::{ForumClient, RedditClient};
pub use stores::{AppRecord, StoreExtractor, StoreRegistry};
pub use utils::error::{AppError, Result};
