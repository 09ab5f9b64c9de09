// src/routes.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    config::AppState,
    docs::ApiDoc,
    handlers,
    middleware::auth::session_guard,
};

pub fn router(app_state: AppState) -> Router {
    // Define as rotas de autenticação
    let auth_routes = Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/logout", post(handlers::auth::logout));

    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me));

    let location_routes = Router::new()
        .route("/", get(handlers::locations::list_locations))
        .route("/{id}", get(handlers::locations::get_location))
        .route("/{id}/weeks/{week_start}", get(handlers::weekly::get_week));

    // Combina tudo no router principal.
    // A guarda de sessão cobre tudo; a lista de caminhos públicos fica nela.
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/login", get(handlers::pages::login_page))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/locations", location_routes)
        .route("/api/weekly-data/{id}/forecast", put(handlers::weekly::update_forecast))
        .route("/api/daily-actuals/{id}", put(handlers::weekly::update_daily_actual))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            session_guard,
        ))
        .with_state(app_state)
}
