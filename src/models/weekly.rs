// src/models/weekly.rs

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc, Weekday};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

// ---
// Dia da semana
// ---
// A ordem das variantes é a ordem do negócio (Segunda=1 ... Domingo=7),
// igual à ordem do enum `day_of_week` no Postgres.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "day_of_week", rename_all = "PascalCase")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    /// Posição fixa do dia: Monday=1 ... Sunday=7.
    pub fn position(self) -> u8 {
        self as u8 + 1
    }
}

/// Uma semana só começa numa segunda-feira.
pub fn is_week_start(date: NaiveDate) -> bool {
    date.weekday() == Weekday::Mon
}

/// Os sete dias da semana, na ordem Segunda-primeiro, com as datas de calendário
/// calculadas a partir do início da semana (+0 .. +6 dias).
/// `None` quando a semana passa do último dia representável.
pub fn week_days(week_start: NaiveDate) -> Option<[(DayOfWeek, NaiveDate); 7]> {
    let mut days = [(DayOfWeek::Monday, week_start); 7];
    for (slot, day) in days.iter_mut().zip(DayOfWeek::ALL) {
        let date = week_start.checked_add_days(Days::new(u64::from(day.position() - 1)))?;
        *slot = (day, date);
    }
    Some(days)
}

// ---
// Linhas do banco
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyData {
    pub id: i32,
    pub location_id: i32,
    #[schema(value_type = String, example = "2025-03-03")]
    pub week_start: NaiveDate,
    #[schema(value_type = f64, example = 42000.0)]
    pub weekly_sales_forecast: Decimal,
    pub created_by: i32,
    pub created_at: DateTime<Utc>,
    pub updated_by: Option<i32>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyActual {
    pub id: i32,
    pub weekly_data_id: i32,
    pub day_of_week: DayOfWeek,
    #[schema(value_type = String, example = "2025-03-04")]
    pub date: NaiveDate,
    #[schema(value_type = Option<f64>)]
    pub actual_sales: Option<Decimal>,
    #[schema(value_type = Option<f64>)]
    pub actual_purchasing: Option<Decimal>,
    pub updated_by: Option<i32>,
    pub updated_at: Option<DateTime<Utc>>,
}

// A semana com os seus sete lançamentos diários
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyDataDetail {
    #[serde(flatten)]
    pub week: WeeklyData,
    pub daily_actuals: Vec<DailyActual>,
}

// ---
// Payloads
// ---
// As colunas de valores são NUMERIC(12, 2): no máximo 10 dígitos inteiros.
const AMOUNT_SCALE: u32 = 2;
const AMOUNT_LIMIT: Decimal = Decimal::from_parts(1_410_065_408, 2, 0, false, 0); // 10^10

fn validate_amount(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    // O Postgres arredonda para 2 casas antes de checar a precisão
    let stored = val.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero);
    if stored >= AMOUNT_LIMIT {
        let mut err = ValidationError::new("range");
        err.message = Some("O valor deve ser menor que 10.000.000.000.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateForecastPayload {
    #[validate(custom(function = "validate_amount"))]
    #[schema(value_type = f64, example = 45000.0)]
    pub forecast: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDailyActualPayload {
    // `None` apaga o valor lançado
    #[validate(custom(function = "validate_amount"))]
    #[schema(value_type = Option<f64>, example = 6100.5)]
    pub actual_sales: Option<Decimal>,

    #[validate(custom(function = "validate_amount"))]
    #[schema(value_type = Option<f64>, example = 1800.0)]
    pub actual_purchasing: Option<Decimal>,
}
