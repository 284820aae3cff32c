//! Authentication endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::AppResult,
    models::user::{AuthResponse, LoginRequest, MeResponse, RegisterRequest},
    AppState,
};

use super::{ApiJson, AuthenticatedUser};

/// Create an account and return a token for it
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = AuthResponse),
        (status = 400, description = "Missing fields or email already in use", body = crate::error::ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(data): ApiJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let response = state.services.auth.register(data).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(data): ApiJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let response = state.services.auth.login(data).await?;
    Ok(Json(response))
}

/// Current user profile
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = MeResponse),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorResponse)
    )
)]
pub async fn me(AuthenticatedUser(user): AuthenticatedUser) -> Json<MeResponse> {
    Json(MeResponse::from(&user))
}
