//! Health check endpoints

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppResult, AppState};

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Current status of the service
    pub status: String,
    pub message: String,
}

#[derive(Serialize, ToSchema)]
pub struct WelcomeResponse {
    pub message: String,
    pub version: String,
    /// Resource collections served under `/api`
    pub endpoints: Vec<String>,
}

/// Liveness check
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is running", body = HealthResponse)
    )
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        message: "Oruma API Server is running".to_string(),
    })
}

/// Readiness check endpoint (checks database connectivity)
#[utoipa::path(
    get,
    path = "/ready",
    tag = "health",
    responses(
        (status = 200, description = "Service is ready", body = HealthResponse),
        (status = 500, description = "Database unreachable", body = crate::error::ErrorResponse)
    )
)]
pub async fn readiness_check(State(state): State<AppState>) -> AppResult<Json<HealthResponse>> {
    state.repository.ping().await?;
    Ok(Json(HealthResponse {
        status: "OK".to_string(),
        message: "Database connection is healthy".to_string(),
    }))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses(
        (status = 200, description = "API overview", body = WelcomeResponse)
    )
)]
pub async fn welcome() -> Json<WelcomeResponse> {
    let endpoints = [
        "/api/auth",
        "/api/patients",
        "/api/home-visits",
        "/api/equipment",
        "/api/equipment-supplies",
        "/api/medicine-supplies",
    ];
    Json(WelcomeResponse {
        message: "Welcome to the Oruma API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: endpoints.iter().map(|e| e.to_string()).collect(),
    })
}
