//! Health check endpoints
//!
//! - /health: process is up
//! - /health/ready: database reachable (503 otherwise)
//! - /health/live: liveness check

use crate::{db, state::AppState};
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

const HEALTHY: &str = "healthy";
const UNHEALTHY: &str = "unhealthy";

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<HealthChecks>,
}

/// Individual health checks
#[derive(Serialize)]
pub struct HealthChecks {
    pub database: &'static str,
}

impl HealthResponse {
    fn new(status: &'static str) -> Self {
        Self {
            status,
            version: env!("CARGO_PKG_VERSION"),
            checks: None,
        }
    }
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::new(HEALTHY))
}

/// Readiness check
///
/// Failure details are logged by `db::health_check`, not returned.
pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    match db::health_check(&state.db).await {
        Ok(()) => Ok(Json(HealthResponse {
            checks: Some(HealthChecks { database: HEALTHY }),
            ..HealthResponse::new("ready")
        })),
        Err(_) => Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                checks: Some(HealthChecks { database: UNHEALTHY }),
                ..HealthResponse::new("not_ready")
            }),
        )),
    }
}

pub async fn liveness_check() -> Json<HealthResponse> {
    Json(HealthResponse::new("alive"))
}
