// src/services/weekly_service.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{LocationRepository, WeeklyRepository},
    models::{
        location::Access,
        weekly::{is_week_start, week_days, DailyActual, DayOfWeek, WeeklyData, WeeklyDataDetail},
    },
    services::location_service::LocationService,
};

// Semanas que terminariam depois do último dia representável são recusadas.
fn checked_week_days(week_start: NaiveDate) -> Result<[(DayOfWeek, NaiveDate); 7], AppError> {
    week_days(week_start).ok_or(AppError::InvalidWeekStart(week_start))
}

#[derive(Clone)]
pub struct WeeklyService {
    weekly_repo: WeeklyRepository,
    location_repo: LocationRepository,
    location_service: LocationService,
    pool: PgPool, // Usamos a pool para iniciar transações
}

impl WeeklyService {
    pub fn new(
        weekly_repo: WeeklyRepository,
        location_repo: LocationRepository,
        location_service: LocationService,
        pool: PgPool,
    ) -> Self {
        Self { weekly_repo, location_repo, location_service, pool }
    }

    /// Busca a semana (loja, segunda-feira) ou cria-a com os sete lançamentos
    /// diários. Exige permissão de visualização na loja.
    pub async fn get_week(
        &self,
        user_id: i32,
        location_id: i32,
        week_start: NaiveDate,
    ) -> Result<WeeklyDataDetail, AppError> {
        if !is_week_start(week_start) {
            return Err(AppError::InvalidWeekStart(week_start));
        }
        checked_week_days(week_start)?;

        self.location_service
            .require_grant(user_id, location_id, Access::View)
            .await?;

        self.get_or_create_week(location_id, week_start, user_id).await
    }

    /// LÓGICA DE NEGÓCIO: get-or-create idempotente.
    /// A semana e os seus sete dias nascem na mesma transação; se outra
    /// requisição criar a mesma semana primeiro, relemos a versão já gravada.
    pub async fn get_or_create_week(
        &self,
        location_id: i32,
        week_start: NaiveDate,
        user_id: i32,
    ) -> Result<WeeklyDataDetail, AppError> {
        let days = checked_week_days(week_start)?;

        if let Some(existing) = self.load_week(location_id, week_start).await? {
            return Ok(existing);
        }

        // 1. Inicia a transação
        let mut tx = self.pool.begin().await?;

        // 2. Meta semanal padrão da loja
        let target = self.location_repo
            .find_weekly_sales_target(&mut *tx, location_id)
            .await?
            .ok_or(AppError::LocationNotFound)?;

        // 3. Cria a semana (ou descobre que alguém já criou)
        let Some(week) = self.weekly_repo
            .insert_week(&mut *tx, location_id, week_start, target, user_id)
            .await?
        else {
            // A transação está abortada; o drop faz o rollback.
            drop(tx);
            tracing::debug!(location_id, %week_start, "Semana criada por requisição concorrente, relendo");
            return self.load_week(location_id, week_start)
                .await?
                .ok_or_else(|| anyhow::anyhow!("semana {} da loja {} sumiu após conflito", week_start, location_id).into());
        };

        // 4. Os sete dias, Segunda primeiro
        let mut daily_actuals = Vec::with_capacity(7);
        for (day, date) in days {
            let actual = self.weekly_repo
                .insert_daily_actual(&mut *tx, week.id, day, date)
                .await?;
            daily_actuals.push(actual);
        }

        // 5. Commit
        tx.commit().await?;

        tracing::info!(location_id, %week_start, weekly_data_id = week.id, "📅 Semana criada");

        Ok(WeeklyDataDetail { week, daily_actuals })
    }

    async fn load_week(
        &self,
        location_id: i32,
        week_start: NaiveDate,
    ) -> Result<Option<WeeklyDataDetail>, AppError> {
        let Some(week) = self.weekly_repo
            .find_by_location_week(&self.pool, location_id, week_start)
            .await?
        else {
            return Ok(None);
        };

        let daily_actuals = self.weekly_repo
            .find_daily_actuals(&self.pool, week.id)
            .await?;

        Ok(Some(WeeklyDataDetail { week, daily_actuals }))
    }

    /// Sobrescreve a previsão da semana. Exige permissão de edição na loja dona.
    pub async fn update_forecast(
        &self,
        user_id: i32,
        weekly_data_id: i32,
        forecast: Decimal,
    ) -> Result<WeeklyData, AppError> {
        let location_id = self.weekly_repo
            .find_location_of_week(weekly_data_id)
            .await?
            .ok_or(AppError::WeeklyDataNotFound)?;

        self.location_service
            .require_grant(user_id, location_id, Access::Edit)
            .await?;

        self.weekly_repo
            .update_forecast(weekly_data_id, forecast, user_id)
            .await?
            .ok_or(AppError::WeeklyDataNotFound)
    }

    /// Sobrescreve os valores reais de um dia. Exige permissão de edição.
    pub async fn update_daily_actual(
        &self,
        user_id: i32,
        daily_actual_id: i32,
        actual_sales: Option<Decimal>,
        actual_purchasing: Option<Decimal>,
    ) -> Result<DailyActual, AppError> {
        let location_id = self.weekly_repo
            .find_location_of_daily_actual(daily_actual_id)
            .await?
            .ok_or(AppError::DailyActualNotFound)?;

        self.location_service
            .require_grant(user_id, location_id, Access::Edit)
            .await?;

        self.weekly_repo
            .update_daily_actual(daily_actual_id, actual_sales, actual_purchasing, user_id)
            .await?
            .ok_or(AppError::DailyActualNotFound)
    }
}
