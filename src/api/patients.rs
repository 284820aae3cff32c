//! Patient API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::patient::{CreatePatient, Patient, UpdatePatient},
    AppState,
};

use super::{parse_id, ApiJson, AuthenticatedUser, MessageResponse};

const ENTITY: &str = "Patient";

/// List all patients, most recent first
#[utoipa::path(
    get,
    path = "/api/patients",
    tag = "patients",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Patient list", body = Vec<Patient>)
    )
)]
pub async fn list_patients(
    State(state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
) -> AppResult<Json<Vec<Patient>>> {
    let patients = state.services.patients.list().await?;
    Ok(Json(patients))
}

#[utoipa::path(
    get,
    path = "/api/patients/{id}",
    tag = "patients",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Patient ID")),
    responses(
        (status = 200, description = "Patient details", body = Patient),
        (status = 404, description = "Patient not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_patient(
    State(state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<Patient>> {
    let patient = state.services.patients.get_by_id(parse_id(&id, ENTITY)?).await?;
    Ok(Json(patient))
}

/// Register a patient; the register id is assigned by the server
#[utoipa::path(
    post,
    path = "/api/patients",
    tag = "patients",
    security(("bearer_auth" = [])),
    request_body = CreatePatient,
    responses(
        (status = 201, description = "Patient created", body = Patient),
        (status = 400, description = "Missing required fields", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_patient(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    ApiJson(data): ApiJson<CreatePatient>,
) -> AppResult<(StatusCode, Json<Patient>)> {
    let patient = state.services.patients.create(&data, Some(user.id)).await?;
    Ok((StatusCode::CREATED, Json(patient)))
}

#[utoipa::path(
    put,
    path = "/api/patients/{id}",
    tag = "patients",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Patient ID")),
    request_body = UpdatePatient,
    responses(
        (status = 200, description = "Patient updated", body = Patient),
        (status = 404, description = "Patient not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_patient(
    State(state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    Path(id): Path<String>,
    ApiJson(data): ApiJson<UpdatePatient>,
) -> AppResult<Json<Patient>> {
    let patient = state.services.patients.update(parse_id(&id, ENTITY)?, &data).await?;
    Ok(Json(patient))
}

#[utoipa::path(
    delete,
    path = "/api/patients/{id}",
    tag = "patients",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Patient ID")),
    responses(
        (status = 200, description = "Patient deleted", body = MessageResponse),
        (status = 404, description = "Patient not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_patient(
    State(state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state.services.patients.delete(parse_id(&id, ENTITY)?).await?;
    Ok(MessageResponse::deleted(ENTITY))
}
