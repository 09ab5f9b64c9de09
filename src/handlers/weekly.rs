// src/handlers/weekly.rs

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::NaiveDate;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::weekly::{
        DailyActual, UpdateDailyActualPayload, UpdateForecastPayload, WeeklyData, WeeklyDataDetail,
    },
};

// GET /api/locations/{id}/weeks/{week_start}
#[utoipa::path(
    get,
    path = "/api/locations/{id}/weeks/{week_start}",
    tag = "Weekly",
    params(
        ("id" = i32, Path, description = "ID da loja"),
        ("week_start" = String, Path, description = "Segunda-feira da semana (AAAA-MM-DD)")
    ),
    responses(
        (status = 200, description = "Semana com os sete lançamentos diários (criada se não existir)", body = WeeklyDataDetail),
        (status = 400, description = "A data não é uma segunda-feira válida"),
        (status = 401, description = "Não autenticado"),
        (status = 403, description = "Sem permissão de visualização"),
        (status = 404, description = "Loja não encontrada")
    )
)]
pub async fn get_week(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path((location_id, week_start)): Path<(i32, NaiveDate)>,
) -> Result<Json<WeeklyDataDetail>, AppError> {
    let week = app_state
        .weekly_service
        .get_week(user.id, location_id, week_start)
        .await?;

    Ok(Json(week))
}

// PUT /api/weekly-data/{id}/forecast
#[utoipa::path(
    put,
    path = "/api/weekly-data/{id}/forecast",
    tag = "Weekly",
    params(
        ("id" = i32, Path, description = "ID da semana")
    ),
    request_body = UpdateForecastPayload,
    responses(
        (status = 200, description = "Previsão atualizada", body = WeeklyData),
        (status = 400, description = "Valor inválido"),
        (status = 401, description = "Não autenticado"),
        (status = 403, description = "Sem permissão de edição"),
        (status = 404, description = "Semana não encontrada")
    )
)]
pub async fn update_forecast(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(weekly_data_id): Path<i32>,
    Json(payload): Json<UpdateForecastPayload>,
) -> Result<Json<WeeklyData>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let week = app_state
        .weekly_service
        .update_forecast(user.id, weekly_data_id, payload.forecast)
        .await?;

    Ok(Json(week))
}

// PUT /api/daily-actuals/{id}
#[utoipa::path(
    put,
    path = "/api/daily-actuals/{id}",
    tag = "Weekly",
    params(
        ("id" = i32, Path, description = "ID do lançamento diário")
    ),
    request_body = UpdateDailyActualPayload,
    responses(
        (status = 200, description = "Valores reais atualizados", body = DailyActual),
        (status = 400, description = "Valor inválido"),
        (status = 401, description = "Não autenticado"),
        (status = 403, description = "Sem permissão de edição"),
        (status = 404, description = "Lançamento não encontrado")
    )
)]
pub async fn update_daily_actual(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(daily_actual_id): Path<i32>,
    Json(payload): Json<UpdateDailyActualPayload>,
) -> Result<Json<DailyActual>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let actual = app_state
        .weekly_service
        .update_daily_actual(
            user.id,
            daily_actual_id,
            payload.actual_sales,
            payload.actual_purchasing,
        )
        .await?;

    Ok(Json(actual))
}
