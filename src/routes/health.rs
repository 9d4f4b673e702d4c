//! Health check endpoint

use axum::{extract::State, http::StatusCode, Json};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub services: ServicesHealth,
}

#[derive(Debug, Serialize)]
pub struct ServicesHealth {
    pub gotenberg: &'static str,
}

/// GET /health
///
/// 200 when the rendering service answers, 503 otherwise.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let gotenberg_ok = state.engine().is_healthy().await;

    let (code, status, gotenberg) = if gotenberg_ok {
        (StatusCode::OK, "ok", "ok")
    } else {
        tracing::warn!("Health check degraded: Gotenberg unavailable");
        (StatusCode::SERVICE_UNAVAILABLE, "degraded", "unavailable")
    };

    (
        code,
        Json(HealthResponse {
            status,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            services: ServicesHealth { gotenberg },
        }),
    )
}
