//! Medicine supply API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::medicine_supply::{CreateMedicineSupply, MedicineSupply, UpdateMedicineSupply},
    AppState,
};

use super::{parse_id, ApiJson, AuthenticatedUser, MessageResponse};

const ENTITY: &str = "Medicine supply";

#[utoipa::path(
    get,
    path = "/api/medicine-supplies",
    tag = "medicine-supplies",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Medicine supply list", body = Vec<MedicineSupply>)
    )
)]
pub async fn list_medicine_supplies(
    State(state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
) -> AppResult<Json<Vec<MedicineSupply>>> {
    Ok(Json(state.services.medicine_supplies.list().await?))
}

#[utoipa::path(
    get,
    path = "/api/medicine-supplies/{id}",
    tag = "medicine-supplies",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Medicine supply ID")),
    responses(
        (status = 200, description = "Medicine supply details", body = MedicineSupply),
        (status = 404, description = "Medicine supply not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_medicine_supply(
    State(state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<MedicineSupply>> {
    let supply = state.services.medicine_supplies.get_by_id(parse_id(&id, ENTITY)?).await?;
    Ok(Json(supply))
}

/// Record a dispensation (quantity defaults to 1)
#[utoipa::path(
    post,
    path = "/api/medicine-supplies",
    tag = "medicine-supplies",
    security(("bearer_auth" = [])),
    request_body = CreateMedicineSupply,
    responses(
        (status = 201, description = "Medicine supply recorded", body = MedicineSupply),
        (status = 400, description = "Missing required fields", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_medicine_supply(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    ApiJson(data): ApiJson<CreateMedicineSupply>,
) -> AppResult<(StatusCode, Json<MedicineSupply>)> {
    let supply = state.services.medicine_supplies.create(data, Some(user.id)).await?;
    Ok((StatusCode::CREATED, Json(supply)))
}

#[utoipa::path(
    put,
    path = "/api/medicine-supplies/{id}",
    tag = "medicine-supplies",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Medicine supply ID")),
    request_body = UpdateMedicineSupply,
    responses(
        (status = 200, description = "Medicine supply updated", body = MedicineSupply),
        (status = 404, description = "Medicine supply not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_medicine_supply(
    State(state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    Path(id): Path<String>,
    ApiJson(data): ApiJson<UpdateMedicineSupply>,
) -> AppResult<Json<MedicineSupply>> {
    let supply = state
        .services
        .medicine_supplies
        .update(parse_id(&id, ENTITY)?, &data)
        .await?;
    Ok(Json(supply))
}

#[utoipa::path(
    delete,
    path = "/api/medicine-supplies/{id}",
    tag = "medicine-supplies",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Medicine supply ID")),
    responses(
        (status = 200, description = "Medicine supply deleted", body = MessageResponse),
        (status = 404, description = "Medicine supply not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_medicine_supply(
    State(state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state.services.medicine_supplies.delete(parse_id(&id, ENTITY)?).await?;
    Ok(MessageResponse::deleted(ENTITY))
}
