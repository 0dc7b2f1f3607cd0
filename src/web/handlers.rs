use axum::{extract::State, response::Json};
use serde_json::{json, Value};
use tracing::info;

use super::AppState;
use crate::models::RunReport;
use crate::AppError;

/// Runs the bot once. Concurrent triggers wait for the running pass.
pub async fn run_bot(State(state): State<AppState>) -> Result<Json<RunReport>, AppError> {
    let bot = state.bot.lock().await;
    info!("Run triggered");

    let report = bot.run().await?;
    Ok(Json(report))
}

pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now(),
        "version": env!("CARGO_PKG_VERSION"),
        "service": "app-info-bot",
        "subreddits": state.config.reddit.subreddits,
        "stores": state.stores,
    }))
}
