//! Equipment supply (loan) API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::equipment_supply::{CreateEquipmentSupply, EquipmentSupply, UpdateEquipmentSupply},
    AppState,
};

use super::{parse_id, ApiJson, AuthenticatedUser, MessageResponse};

const ENTITY: &str = "Equipment supply";

#[utoipa::path(
    get,
    path = "/api/equipment-supplies",
    tag = "equipment-supplies",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All loans", body = Vec<EquipmentSupply>)
    )
)]
pub async fn list_supplies(
    State(state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
) -> AppResult<Json<Vec<EquipmentSupply>>> {
    Ok(Json(state.services.equipment_supplies.list().await?))
}

/// Loans whose equipment has not come back yet
#[utoipa::path(
    get,
    path = "/api/equipment-supplies/active",
    tag = "equipment-supplies",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Active loans", body = Vec<EquipmentSupply>)
    )
)]
pub async fn list_active_supplies(
    State(state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
) -> AppResult<Json<Vec<EquipmentSupply>>> {
    Ok(Json(state.services.equipment_supplies.list_active().await?))
}

#[utoipa::path(
    get,
    path = "/api/equipment-supplies/{id}",
    tag = "equipment-supplies",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Equipment supply ID")),
    responses(
        (status = 200, description = "Loan details", body = EquipmentSupply),
        (status = 404, description = "Equipment supply not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_supply(
    State(state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<EquipmentSupply>> {
    let supply = state.services.equipment_supplies.get_by_id(parse_id(&id, ENTITY)?).await?;
    Ok(Json(supply))
}

/// Lend available equipment to a recipient
#[utoipa::path(
    post,
    path = "/api/equipment-supplies",
    tag = "equipment-supplies",
    security(("bearer_auth" = [])),
    request_body = CreateEquipmentSupply,
    responses(
        (status = 201, description = "Loan created, equipment marked supplied", body = EquipmentSupply),
        (status = 400, description = "Missing fields or equipment not available", body = crate::error::ErrorResponse),
        (status = 404, description = "Equipment not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_supply(
    State(state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    ApiJson(data): ApiJson<CreateEquipmentSupply>,
) -> AppResult<(StatusCode, Json<EquipmentSupply>)> {
    let supply = state.services.equipment_supplies.create(data).await?;
    Ok((StatusCode::CREATED, Json(supply)))
}

/// Update a loan. Setting `status` to `returned` on an active loan releases
/// the equipment and stamps `actualReturnDate`.
#[utoipa::path(
    put,
    path = "/api/equipment-supplies/{id}",
    tag = "equipment-supplies",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Equipment supply ID")),
    request_body = UpdateEquipmentSupply,
    responses(
        (status = 200, description = "Loan updated", body = EquipmentSupply),
        (status = 404, description = "Equipment supply not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_supply(
    State(state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    Path(id): Path<String>,
    ApiJson(data): ApiJson<UpdateEquipmentSupply>,
) -> AppResult<Json<EquipmentSupply>> {
    let supply = state
        .services
        .equipment_supplies
        .update(parse_id(&id, ENTITY)?, data)
        .await?;
    Ok(Json(supply))
}

#[utoipa::path(
    delete,
    path = "/api/equipment-supplies/{id}",
    tag = "equipment-supplies",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Equipment supply ID")),
    responses(
        (status = 200, description = "Loan deleted", body = MessageResponse),
        (status = 404, description = "Equipment supply not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_supply(
    State(state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state.services.equipment_supplies.delete(parse_id(&id, ENTITY)?).await?;
    Ok(MessageResponse::deleted(ENTITY))
}
