// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use crate::handlers;
use crate::middleware::auth::AUTH_COOKIE;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::logout,

        // --- Users ---
        handlers::auth::get_me,

        // --- Locations ---
        handlers::locations::list_locations,
        handlers::locations::get_location,

        // --- Weekly ---
        handlers::weekly::get_week,
        handlers::weekly::update_forecast,
        handlers::weekly::update_daily_actual,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::SessionUser,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Locations ---
            models::location::Location,
            models::location::LocationWithGrant,
            models::location::DayDistribution,
            models::location::VendorShare,
            models::location::LocationDetail,

            // --- Weekly ---
            models::weekly::DayOfWeek,
            models::weekly::WeeklyData,
            models::weekly::DailyActual,
            models::weekly::WeeklyDataDetail,
            models::weekly::UpdateForecastPayload,
            models::weekly::UpdateDailyActualPayload,
        )
    ),
    tags(
        (name = "Auth", description = "Login e Logout"),
        (name = "Users", description = "Dados do Usuário da sessão"),
        (name = "Locations", description = "Lojas, Distribuições e Fornecedores"),
        (name = "Weekly", description = "Previsão Semanal e Lançamentos Diários")
    ),
    security(
        ("session_cookie" = [])
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "session_cookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(AUTH_COOKIE))),
        );
    }
}
