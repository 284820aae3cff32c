//! Equipment API endpoints

use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::equipment::{
        CreateEquipment, CreateEquipmentResponse, Equipment, EquipmentQuery, UpdateEquipment,
        UpdateEquipmentStatus,
    },
    AppState,
};

use super::{parse_id, ApiJson, ApiQuery, AuthenticatedUser, MessageResponse};

const ENTITY: &str = "Equipment";

/// List equipment, optionally filtered by status
#[utoipa::path(
    get,
    path = "/api/equipment",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(EquipmentQuery),
    responses(
        (status = 200, description = "Equipment list", body = Vec<Equipment>),
        (status = 400, description = "Unknown status", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_equipment(
    State(state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    ApiQuery(query): ApiQuery<EquipmentQuery>,
) -> AppResult<Json<Vec<Equipment>>> {
    let equipment = state.services.equipment.list(query.status.as_deref()).await?;
    Ok(Json(equipment))
}

/// Number of available units per equipment name
#[utoipa::path(
    get,
    path = "/api/equipment/summary/available",
    tag = "equipment",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Available units keyed by equipment name")
    )
)]
pub async fn available_summary(
    State(state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
) -> AppResult<Json<BTreeMap<String, i64>>> {
    Ok(Json(state.services.equipment.available_summary().await?))
}

#[utoipa::path(
    get,
    path = "/api/equipment/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Equipment details", body = Equipment),
        (status = 404, description = "Equipment not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_equipment(
    State(state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<Equipment>> {
    let equipment = state.services.equipment.get_by_id(parse_id(&id, ENTITY)?).await?;
    Ok(Json(equipment))
}

/// Look up equipment by its human-readable id (e.g. `WH-001`)
#[utoipa::path(
    get,
    path = "/api/equipment/unique/{unique_id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("unique_id" = String, Path, description = "Unique ID, e.g. WH-001")),
    responses(
        (status = 200, description = "Equipment details", body = Equipment),
        (status = 404, description = "Equipment not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_equipment_by_unique_id(
    State(state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    Path(unique_id): Path<String>,
) -> AppResult<Json<Equipment>> {
    let equipment = state.services.equipment.get_by_unique_id(&unique_id).await?;
    Ok(Json(equipment))
}

/// Register new equipment. One record is created per unit of `quantity`.
#[utoipa::path(
    post,
    path = "/api/equipment",
    tag = "equipment",
    security(("bearer_auth" = [])),
    request_body = CreateEquipment,
    responses(
        (status = 201, description = "Equipment created", body = CreateEquipmentResponse),
        (status = 400, description = "Missing required fields", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_equipment(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    ApiJson(data): ApiJson<CreateEquipment>,
) -> AppResult<(StatusCode, Json<CreateEquipmentResponse>)> {
    let equipment = state.services.equipment.intake(data, Some(user.id)).await?;
    let response = CreateEquipmentResponse {
        message: format!("{} equipment item(s) created successfully", equipment.len()),
        count: equipment.len(),
        equipment,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    put,
    path = "/api/equipment/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Equipment ID")),
    request_body = UpdateEquipment,
    responses(
        (status = 200, description = "Equipment updated", body = Equipment),
        (status = 404, description = "Equipment not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_equipment(
    State(state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    Path(id): Path<String>,
    ApiJson(data): ApiJson<UpdateEquipment>,
) -> AppResult<Json<Equipment>> {
    let equipment = state.services.equipment.update(parse_id(&id, ENTITY)?, &data).await?;
    Ok(Json(equipment))
}

#[utoipa::path(
    patch,
    path = "/api/equipment/{id}/status",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Equipment ID")),
    request_body = UpdateEquipmentStatus,
    responses(
        (status = 200, description = "Status updated", body = Equipment),
        (status = 400, description = "Invalid status", body = crate::error::ErrorResponse),
        (status = 404, description = "Equipment not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_equipment_status(
    State(state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    Path(id): Path<String>,
    ApiJson(data): ApiJson<UpdateEquipmentStatus>,
) -> AppResult<Json<Equipment>> {
    let equipment = state
        .services
        .equipment
        .set_status(parse_id(&id, ENTITY)?, data.status.as_deref())
        .await?;
    Ok(Json(equipment))
}

#[utoipa::path(
    delete,
    path = "/api/equipment/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Equipment deleted", body = MessageResponse),
        (status = 404, description = "Equipment not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_equipment(
    State(state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state.services.equipment.delete(parse_id(&id, ENTITY)?).await?;
    Ok(MessageResponse::deleted(ENTITY))
}
