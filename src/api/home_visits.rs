//! Home visit API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::home_visit::{CreateHomeVisit, HomeVisit, UpdateHomeVisit},
    AppState,
};

use super::{parse_id, ApiJson, AuthenticatedUser, MessageResponse};

const ENTITY: &str = "Home visit";

#[utoipa::path(
    get,
    path = "/api/home-visits",
    tag = "home-visits",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Home visit list", body = Vec<HomeVisit>)
    )
)]
pub async fn list_home_visits(
    State(state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
) -> AppResult<Json<Vec<HomeVisit>>> {
    Ok(Json(state.services.home_visits.list().await?))
}

#[utoipa::path(
    get,
    path = "/api/home-visits/{id}",
    tag = "home-visits",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Home visit ID")),
    responses(
        (status = 200, description = "Home visit details", body = HomeVisit),
        (status = 404, description = "Home visit not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_home_visit(
    State(state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<HomeVisit>> {
    let visit = state.services.home_visits.get_by_id(parse_id(&id, ENTITY)?).await?;
    Ok(Json(visit))
}

#[utoipa::path(
    post,
    path = "/api/home-visits",
    tag = "home-visits",
    security(("bearer_auth" = [])),
    request_body = CreateHomeVisit,
    responses(
        (status = 201, description = "Home visit recorded", body = HomeVisit),
        (status = 400, description = "Missing required fields", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_home_visit(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    ApiJson(data): ApiJson<CreateHomeVisit>,
) -> AppResult<(StatusCode, Json<HomeVisit>)> {
    let visit = state.services.home_visits.create(&data, Some(user.id)).await?;
    Ok((StatusCode::CREATED, Json(visit)))
}

#[utoipa::path(
    put,
    path = "/api/home-visits/{id}",
    tag = "home-visits",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Home visit ID")),
    request_body = UpdateHomeVisit,
    responses(
        (status = 200, description = "Home visit updated", body = HomeVisit),
        (status = 404, description = "Home visit not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_home_visit(
    State(state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    Path(id): Path<String>,
    ApiJson(data): ApiJson<UpdateHomeVisit>,
) -> AppResult<Json<HomeVisit>> {
    let visit = state.services.home_visits.update(parse_id(&id, ENTITY)?, &data).await?;
    Ok(Json(visit))
}

#[utoipa::path(
    delete,
    path = "/api/home-visits/{id}",
    tag = "home-visits",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Home visit ID")),
    responses(
        (status = 200, description = "Home visit deleted", body = MessageResponse),
        (status = 404, description = "Home visit not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_home_visit(
    State(state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state.services.home_visits.delete(parse_id(&id, ENTITY)?).await?;
    Ok(MessageResponse::deleted(ENTITY))
}
