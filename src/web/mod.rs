use axum::{middleware::from_fn_with_state, routing::get, Router};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::bot::Bot;
use crate::AppConfig;

pub mod handlers;
pub mod middleware;
pub mod responses;

pub use handlers::{health_check, run_bot};
pub use responses::ErrorBody;

#[derive(Clone)]
pub struct AppState {
    pub bot: Arc<Mutex<Bot>>,
    pub config: AppConfig,
    /// Hosts with a registered extractor, reported by `/health`.
    pub stores: Vec<String>,
}

impl AppState {
    pub fn new(bot: Bot, config: AppConfig, stores: Vec<String>) -> Self {
        Self {
            bot: Arc::new(Mutex::new(bot)),
            config,
            stores,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let run = Router::new()
        .route("/run", get(run_bot))
        .route_layer(from_fn_with_state(state.clone(), middleware::require_api_key));

    Router::new()
        .route("/health", get(health_check))
        .merge(run)
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn serve(config: &AppConfig, state: AppState) -> anyhow::Result<()> {
    let app = create_router(state);
    let address = config.bind_address();

    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
        })
        .await?;

    Ok(())
}
