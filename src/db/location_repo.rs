// src/db/location_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use crate::{
    common::error::AppError,
    models::location::{DayDistribution, Location, LocationWithGrant, UserLocationGrant, VendorShare},
};

/// As duas tabelas de distribuição têm o mesmo formato.
#[derive(Debug, Clone, Copy)]
pub enum DistributionKind {
    Sales,
    Purchasing,
}

impl DistributionKind {
    fn table(self) -> &'static str {
        match self {
            DistributionKind::Sales => "sales_distribution",
            DistributionKind::Purchasing => "purchasing_distribution",
        }
    }
}

#[derive(Clone)]
pub struct LocationRepository {
    pool: PgPool,
}

impl LocationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Busca a permissão (grant) de um usuário numa loja.
    /// Esta é a verificação de autorização mais importante do sistema.
    pub async fn find_grant(
        &self,
        user_id: i32,
        location_id: i32,
    ) -> Result<Option<UserLocationGrant>, AppError> {
        let grant = sqlx::query_as::<_, UserLocationGrant>(
            r#"
            SELECT user_id, location_id, can_view, can_edit
            FROM user_locations
            WHERE user_id = $1 AND location_id = $2
            "#,
        )
            .bind(user_id)
            .bind(location_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(grant)
    }

    pub async fn find_by_id(&self, location_id: i32) -> Result<Option<Location>, AppError> {
        let location = sqlx::query_as::<_, Location>(
            r#"
            SELECT id, name, code, weekly_sales_target, food_cost_target, food_sales_ratio
            FROM locations
            WHERE id = $1
            "#,
        )
            .bind(location_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(location)
    }

    /// Todas as lojas em que o usuário tem alguma permissão, com as flags.
    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<LocationWithGrant>, AppError> {
        let locations = sqlx::query_as::<_, LocationWithGrant>(
            r#"
            SELECT
                l.id, l.name, l.code,
                l.weekly_sales_target, l.food_cost_target, l.food_sales_ratio,
                ul.can_view, ul.can_edit
            FROM user_locations ul
            JOIN locations l ON ul.location_id = l.id
            WHERE ul.user_id = $1
            ORDER BY l.name
            "#,
        )
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(locations)
    }

    /// Distribuição por dia da semana, sempre Segunda..Domingo.
    /// O enum `day_of_week` do Postgres ordena pela ordem de declaração.
    pub async fn find_distribution(
        &self,
        kind: DistributionKind,
        location_id: i32,
    ) -> Result<Vec<DayDistribution>, AppError> {
        let sql = format!(
            "SELECT day_of_week, percentage FROM {} WHERE location_id = $1 ORDER BY day_of_week",
            kind.table()
        );

        let rows = sqlx::query_as::<_, DayDistribution>(&sql)
            .bind(location_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    // Fornecedores ativos (sem ordem definida)
    pub async fn find_active_vendors(&self, location_id: i32) -> Result<Vec<VendorShare>, AppError> {
        let vendors = sqlx::query_as::<_, VendorShare>(
            r#"
            SELECT vendor_name, percentage
            FROM vendor_config
            WHERE location_id = $1 AND is_active = true
            "#,
        )
            .bind(location_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(vendors)
    }

    /// Meta semanal padrão da loja, usada para semear uma semana nova.
    pub async fn find_weekly_sales_target<'e, E>(
        &self,
        executor: E,
        location_id: i32,
    ) -> Result<Option<Decimal>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let target = sqlx::query_scalar::<_, Decimal>(
            "SELECT weekly_sales_target FROM locations WHERE id = $1",
        )
            .bind(location_id)
            .fetch_optional(executor)
            .await?;

        Ok(target)
    }
}
