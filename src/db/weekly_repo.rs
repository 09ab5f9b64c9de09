// src/db/weekly_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use crate::{
    common::error::AppError,
    models::weekly::{DailyActual, DayOfWeek, WeeklyData},
};

// Nome da constraint UNIQUE (location_id, week_start) criada na migration
const WEEK_UNIQUE_CONSTRAINT: &str = "weekly_data_location_week_key";

const WEEKLY_COLUMNS: &str = "id, location_id, week_start, weekly_sales_forecast, created_by, created_at, updated_by, updated_at";
const DAILY_COLUMNS: &str = "id, weekly_data_id, day_of_week, date, actual_sales, actual_purchasing, updated_by, updated_at";

#[derive(Clone)]
pub struct WeeklyRepository {
    pool: PgPool,
}

impl WeeklyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  SEMANAS
    // =========================================================================

    pub async fn find_by_location_week<'e, E>(
        &self,
        executor: E,
        location_id: i32,
        week_start: NaiveDate,
    ) -> Result<Option<WeeklyData>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {WEEKLY_COLUMNS} FROM weekly_data WHERE location_id = $1 AND week_start = $2"
        );

        let week = sqlx::query_as::<_, WeeklyData>(&sql)
            .bind(location_id)
            .bind(week_start)
            .fetch_optional(executor)
            .await?;

        Ok(week)
    }

    /// Insere a semana. Devolve `None` quando outra requisição já criou a
    /// mesma (loja, semana): a transação atual fica abortada e deve ser descartada.
    pub async fn insert_week<'e, E>(
        &self,
        executor: E,
        location_id: i32,
        week_start: NaiveDate,
        forecast: Decimal,
        created_by: i32,
    ) -> Result<Option<WeeklyData>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO weekly_data (location_id, week_start, weekly_sales_forecast, created_by)
            VALUES ($1, $2, $3, $4)
            RETURNING {WEEKLY_COLUMNS}
            "#
        );

        let result = sqlx::query_as::<_, WeeklyData>(&sql)
            .bind(location_id)
            .bind(week_start)
            .bind(forecast)
            .bind(created_by)
            .fetch_one(executor)
            .await;

        match result {
            Ok(week) => Ok(Some(week)),
            Err(sqlx::Error::Database(db_err))
                if db_err.is_unique_violation()
                    && db_err.constraint() == Some(WEEK_UNIQUE_CONSTRAINT) =>
            {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn find_location_of_week(&self, weekly_data_id: i32) -> Result<Option<i32>, AppError> {
        let location_id = sqlx::query_scalar::<_, i32>(
            "SELECT location_id FROM weekly_data WHERE id = $1",
        )
            .bind(weekly_data_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(location_id)
    }

    // Sobrescrita incondicional; só guarda o último autor.
    pub async fn update_forecast(
        &self,
        weekly_data_id: i32,
        forecast: Decimal,
        user_id: i32,
    ) -> Result<Option<WeeklyData>, AppError> {
        let sql = format!(
            r#"
            UPDATE weekly_data
            SET weekly_sales_forecast = $2, updated_by = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING {WEEKLY_COLUMNS}
            "#
        );

        let week = sqlx::query_as::<_, WeeklyData>(&sql)
            .bind(weekly_data_id)
            .bind(forecast)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(week)
    }

    // =========================================================================
    //  LANÇAMENTOS DIÁRIOS
    // =========================================================================

    pub async fn insert_daily_actual<'e, E>(
        &self,
        executor: E,
        weekly_data_id: i32,
        day_of_week: DayOfWeek,
        date: NaiveDate,
    ) -> Result<DailyActual, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO daily_actuals (weekly_data_id, day_of_week, date)
            VALUES ($1, $2, $3)
            RETURNING {DAILY_COLUMNS}
            "#
        );

        let actual = sqlx::query_as::<_, DailyActual>(&sql)
            .bind(weekly_data_id)
            .bind(day_of_week)
            .bind(date)
            .fetch_one(executor)
            .await?;

        Ok(actual)
    }

    pub async fn find_daily_actuals<'e, E>(
        &self,
        executor: E,
        weekly_data_id: i32,
    ) -> Result<Vec<DailyActual>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {DAILY_COLUMNS} FROM daily_actuals WHERE weekly_data_id = $1 ORDER BY day_of_week"
        );

        let actuals = sqlx::query_as::<_, DailyActual>(&sql)
            .bind(weekly_data_id)
            .fetch_all(executor)
            .await?;

        Ok(actuals)
    }

    pub async fn find_location_of_daily_actual(
        &self,
        daily_actual_id: i32,
    ) -> Result<Option<i32>, AppError> {
        let location_id = sqlx::query_scalar::<_, i32>(
            r#"
            SELECT w.location_id
            FROM daily_actuals d
            JOIN weekly_data w ON d.weekly_data_id = w.id
            WHERE d.id = $1
            "#,
        )
            .bind(daily_actual_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(location_id)
    }

    pub async fn update_daily_actual(
        &self,
        daily_actual_id: i32,
        actual_sales: Option<Decimal>,
        actual_purchasing: Option<Decimal>,
        user_id: i32,
    ) -> Result<Option<DailyActual>, AppError> {
        let sql = format!(
            r#"
            UPDATE daily_actuals
            SET actual_sales = $2, actual_purchasing = $3, updated_by = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING {DAILY_COLUMNS}
            "#
        );

        let actual = sqlx::query_as::<_, DailyActual>(&sql)
            .bind(daily_actual_id)
            .bind(actual_sales)
            .bind(actual_purchasing)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(actual)
    }
}
