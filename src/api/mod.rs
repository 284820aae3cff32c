//! API handlers for Oruma REST endpoints

pub mod auth;
pub mod equipment;
pub mod equipment_supplies;
pub mod health;
pub mod home_visits;
pub mod medicine_supplies;
pub mod openapi;
pub mod patients;

use std::any::Any;

use axum::{
    async_trait,
    body::Body,
    extract::{FromRequest, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::{Any as AnyOrigin, CorsLayer},
    trace::TraceLayer,
};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::{AppError, ErrorResponse, INTERNAL_ERROR_MESSAGE},
    models::user::User,
    AppState,
};

/// Extractor for the user behind a valid bearer token
pub struct AuthenticatedUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AppError::Authentication("Not authorized, no token".to_string()))?;

        let user_id = state.services.auth.verify_token(token)?;
        let user = state.services.auth.get_user(user_id).await?;

        Ok(AuthenticatedUser(user))
    }
}

/// JSON body extractor whose rejections use the API error shape
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Query string extractor whose rejections use the API error shape
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

/// Parse a path id. Anything that is not a UUID cannot name a record.
pub fn parse_id(raw: &str, entity: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(format!("{} not found", entity)))
}

/// Body returned by delete endpoints
#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn deleted(entity: &str) -> Json<Self> {
        Json(Self {
            message: format!("{} deleted successfully", entity),
        })
    }
}

async fn route_not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!("Handler panicked: {}", detail);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: INTERNAL_ERROR_MESSAGE.to_string(),
        }),
    )
        .into_response()
}

/// Build the application router with all routes and middleware
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods(AnyOrigin)
        .allow_headers(AnyOrigin);

    let api = Router::new()
        // Authentication
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        // Patients
        .route("/patients", get(patients::list_patients).post(patients::create_patient))
        .route(
            "/patients/:id",
            get(patients::get_patient)
                .put(patients::update_patient)
                .delete(patients::delete_patient),
        )
        // Home visits
        .route("/home-visits", get(home_visits::list_home_visits).post(home_visits::create_home_visit))
        .route(
            "/home-visits/:id",
            get(home_visits::get_home_visit)
                .put(home_visits::update_home_visit)
                .delete(home_visits::delete_home_visit),
        )
        // Equipment
        .route("/equipment", get(equipment::list_equipment).post(equipment::create_equipment))
        .route("/equipment/summary/available", get(equipment::available_summary))
        .route("/equipment/unique/:unique_id", get(equipment::get_equipment_by_unique_id))
        .route(
            "/equipment/:id",
            get(equipment::get_equipment)
                .put(equipment::update_equipment)
                .delete(equipment::delete_equipment),
        )
        .route("/equipment/:id/status", patch(equipment::update_equipment_status))
        // Equipment supplies
        .route(
            "/equipment-supplies",
            get(equipment_supplies::list_supplies).post(equipment_supplies::create_supply),
        )
        .route("/equipment-supplies/active", get(equipment_supplies::list_active_supplies))
        .route(
            "/equipment-supplies/:id",
            get(equipment_supplies::get_supply)
                .put(equipment_supplies::update_supply)
                .delete(equipment_supplies::delete_supply),
        )
        // Medicine supplies
        .route(
            "/medicine-supplies",
            get(medicine_supplies::list_medicine_supplies).post(medicine_supplies::create_medicine_supply),
        )
        .route(
            "/medicine-supplies/:id",
            get(medicine_supplies::get_medicine_supply)
                .put(medicine_supplies::update_medicine_supply)
                .delete(medicine_supplies::delete_medicine_supply),
        );

    Router::new()
        .route("/", get(health::welcome))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .nest("/api", api)
        .merge(openapi::create_openapi_router())
        .fallback(route_not_found)
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
