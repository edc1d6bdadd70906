//! Health check endpoint

use api_types::health::HealthResponse;
use axum::{Json, extract::State, http::StatusCode};

use crate::server::ServerState;

pub async fn health(State(state): State<ServerState>) -> (StatusCode, Json<HealthResponse>) {
    match state.db.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy".to_string(),
                reason: None,
            }),
        ),
        Err(err) => {
            tracing::warn!("health check failed: {err}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unhealthy".to_string(),
                    reason: Some("database ping failed".to_string()),
                }),
            )
        }
    }
}
