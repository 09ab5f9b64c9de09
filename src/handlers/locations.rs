// src/handlers/locations.rs

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::location::{LocationDetail, LocationWithGrant},
};

// GET /api/locations
#[utoipa::path(
    get,
    path = "/api/locations",
    tag = "Locations",
    responses(
        (status = 200, description = "Lojas que o usuário pode visualizar", body = Vec<LocationWithGrant>),
        (status = 401, description = "Não autenticado")
    )
)]
pub async fn list_locations(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<Vec<LocationWithGrant>>, AppError> {
    let locations = app_state
        .location_service
        .list_user_locations(user.id)
        .await?;

    Ok(Json(locations))
}

// GET /api/locations/{id}
#[utoipa::path(
    get,
    path = "/api/locations/{id}",
    tag = "Locations",
    params(
        ("id" = i32, Path, description = "ID da loja")
    ),
    responses(
        (status = 200, description = "Loja com distribuições e fornecedores ativos", body = LocationDetail),
        (status = 401, description = "Não autenticado"),
        (status = 403, description = "Sem permissão de visualização"),
        (status = 404, description = "Loja não encontrada")
    )
)]
pub async fn get_location(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(location_id): Path<i32>,
) -> Result<Json<LocationDetail>, AppError> {
    let detail = app_state
        .location_service
        .get_location_detail(user.id, location_id)
        .await?;

    Ok(Json(detail))
}
