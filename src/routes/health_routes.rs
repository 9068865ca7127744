use axum::{Json, Router, extract::State, routing::get};

use crate::error::ApiError;
use crate::models::AppState;

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub store: &'static str,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

/// Liveness plus a store round trip; an unreachable store surfaces as a 500.
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    state.store.ping().await?;

    Ok(Json(HealthResponse {
        status: "ok",
        store: "reachable",
    }))
}
