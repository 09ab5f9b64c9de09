// src/models/location.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::models::weekly::DayOfWeek;

// ---
// 1. Location (A "Loja")
// ---
// Dado de referência: metas da loja
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[schema(example = 5)]
    pub id: i32,
    #[schema(example = "Loja Centro")]
    pub name: String,
    #[schema(example = "CTR")]
    pub code: String,
    #[schema(value_type = f64, example = 42000.0)]
    pub weekly_sales_target: Decimal,
    #[schema(value_type = f64, example = 31.5)]
    pub food_cost_target: Decimal,
    #[schema(value_type = f64, example = 0.3)]
    pub food_sales_ratio: Decimal,
}

// ---
// 2. UserLocationGrant (A "Ponte" Usuário-Loja)
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserLocationGrant {
    pub user_id: i32,
    pub location_id: i32,
    pub can_view: bool,
    pub can_edit: bool,
}

/// O tipo de acesso que uma operação exige sobre a loja.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    View,
    Edit,
}

impl UserLocationGrant {
    pub fn permits(&self, access: Access) -> bool {
        match access {
            Access::View => self.can_view,
            Access::Edit => self.can_edit,
        }
    }
}

// Loja + as flags de permissão do usuário (resposta do login e da listagem)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationWithGrant {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub location: Location,
    pub can_view: bool,
    pub can_edit: bool,
}

// ---
// 3. Distribuições e fornecedores
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DayDistribution {
    pub day_of_week: DayOfWeek,
    #[schema(value_type = f64, example = 14.5)]
    pub percentage: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VendorShare {
    #[schema(example = "Distribuidora Sul")]
    pub vendor_name: String,
    #[schema(value_type = f64, example = 60.0)]
    pub percentage: Decimal,
}

// O agregado devolvido por GET /api/locations/{id}
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationDetail {
    #[serde(flatten)]
    pub location: Location,
    pub sales_distribution: Vec<DayDistribution>,
    pub purchasing_distribution: Vec<DayDistribution>,
    pub vendors: Vec<VendorShare>,
}
