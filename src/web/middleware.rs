use axum::{
    extract::{Query, Request, State},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use super::AppState;
use super::responses::invalid_api_key;

/// First `api_key` value of the query string; later repeats are ignored.
pub fn api_key(params: &[(String, String)]) -> Option<&str> {
    params
        .iter()
        .find(|(name, _)| name == "api_key")
        .map(|(_, value)| value.as_str())
}

/// Rejects requests whose `api_key` query parameter does not match.
pub async fn require_api_key(
    State(state): State<AppState>,
    params: Option<Query<Vec<(String, String)>>>,
    request: Request,
    next: Next,
) -> Response {
    let params = params.map(|Query(params)| params).unwrap_or_default();

    match api_key(&params) {
        Some(key) if key == state.config.security.api_key => next.run(request).await,
        _ => {
            warn!(uri = %request.uri().path(), "Rejected request with invalid api_key");
            invalid_api_key()
        }
    }
}
