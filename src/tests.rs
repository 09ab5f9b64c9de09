// src/tests.rs
//
// Testes que precisam de um Postgres de verdade (DATABASE_URL).
// Rodam com `cargo test -- --ignored`; o `sqlx::test` cria um banco
// descartável por teste e aplica as migrações.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use chrono::NaiveDate;
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tower::ServiceExt;

use crate::{
    common::error::AppError,
    config::{tests::test_config, AppState},
    middleware::auth::AUTH_COOKIE,
    models::weekly::DayOfWeek,
    routes,
};

const PASSWORD: &str = "senha-correta";

fn state(pool: PgPool) -> AppState {
    AppState::from_parts(test_config(), pool)
}

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()
}

async fn seed_user(pool: &PgPool, username: &str, is_active: bool) -> i32 {
    let hash = bcrypt::hash(PASSWORD, 4).unwrap();
    sqlx::query_scalar(
        r#"
        INSERT INTO users (username, email, password_hash, role, is_active)
        VALUES ($1, $2, $3, 'manager', $4)
        RETURNING id
        "#,
    )
    .bind(username)
    .bind(format!("{username}@exemplo.com"))
    .bind(hash)
    .bind(is_active)
    .fetch_one(pool)
    .await
    .unwrap()
}

async fn seed_location(pool: &PgPool, id: i32) {
    sqlx::query(
        r#"
        INSERT INTO locations (id, name, code, weekly_sales_target, food_cost_target, food_sales_ratio)
        VALUES ($1, $2, $3, 42000.00, 31.5, 0.30)
        "#,
    )
    .bind(id)
    .bind(format!("Loja {id}"))
    .bind(format!("L{id}"))
    .execute(pool)
    .await
    .unwrap();
}

async fn grant(pool: &PgPool, user_id: i32, location_id: i32, can_view: bool, can_edit: bool) {
    sqlx::query(
        "INSERT INTO user_locations (user_id, location_id, can_view, can_edit) VALUES ($1, $2, $3, $4)",
    )
    .bind(user_id)
    .bind(location_id)
    .bind(can_view)
    .bind(can_edit)
    .execute(pool)
    .await
    .unwrap();
}

async fn count(pool: &PgPool, sql: &str) -> i64 {
    sqlx::query_scalar(sql).fetch_one(pool).await.unwrap()
}

// ---
// Autenticação
// ---

#[sqlx::test]
#[ignore = "requer DATABASE_URL apontando para um Postgres"]
async fn inactive_or_absent_users_never_log_in(pool: PgPool) {
    seed_user(&pool, "desligado", false).await;
    let auth = state(pool).auth_service;

    let result = auth.login_user("desligado", PASSWORD).await;
    assert!(matches!(result, Err(AppError::InvalidCredentials)));

    let result = auth.login_user("fantasma", PASSWORD).await;
    assert!(matches!(result, Err(AppError::InvalidCredentials)));
}

#[sqlx::test]
#[ignore = "requer DATABASE_URL apontando para um Postgres"]
async fn wrong_password_is_invalid_credentials(pool: PgPool) {
    seed_user(&pool, "ana", true).await;
    let auth = state(pool).auth_service;

    let result = auth.login_user("ana", "senha-errada").await;
    assert!(matches!(result, Err(AppError::InvalidCredentials)));
}

#[sqlx::test]
#[ignore = "requer DATABASE_URL apontando para um Postgres"]
async fn valid_login_token_carries_the_stored_user(pool: PgPool) {
    let user_id = seed_user(&pool, "ana", true).await;
    seed_location(&pool, 5).await;
    grant(&pool, user_id, 5, true, false).await;
    let auth = state(pool).auth_service;

    let response = auth.login_user("ana", PASSWORD).await.unwrap();
    let decoded = auth.validate_token(&response.token).unwrap();

    assert_eq!(decoded, response.user);
    assert_eq!(decoded.id, user_id);
    assert_eq!(decoded.username, "ana");
    assert_eq!(decoded.email, "ana@exemplo.com");
    assert_eq!(decoded.role, "manager");
    assert_eq!(response.locations.len(), 1);
    assert!(response.locations[0].can_view);
    assert!(!response.locations[0].can_edit);
}

// ---
// Acesso às lojas
// ---

#[sqlx::test]
#[ignore = "requer DATABASE_URL apontando para um Postgres"]
async fn location_detail_requires_view_grant(pool: PgPool) {
    let user_id = seed_user(&pool, "ana", true).await;
    seed_location(&pool, 5).await;
    seed_location(&pool, 6).await;
    // Grant sem can_view na loja 6, nenhum grant na loja 5
    grant(&pool, user_id, 6, false, true).await;
    let locations = state(pool).location_service;

    let result = locations.get_location_detail(user_id, 5).await;
    assert!(matches!(result, Err(AppError::AccessDenied)));

    let result = locations.get_location_detail(user_id, 6).await;
    assert!(matches!(result, Err(AppError::AccessDenied)));
}

#[sqlx::test]
#[ignore = "requer DATABASE_URL apontando para um Postgres"]
async fn distributions_come_back_monday_first(pool: PgPool) {
    let user_id = seed_user(&pool, "ana", true).await;
    seed_location(&pool, 5).await;
    grant(&pool, user_id, 5, true, false).await;

    // Inserção fora de ordem
    for (day, pct) in [
        (DayOfWeek::Sunday, 20),
        (DayOfWeek::Wednesday, 12),
        (DayOfWeek::Monday, 10),
        (DayOfWeek::Saturday, 22),
        (DayOfWeek::Friday, 16),
        (DayOfWeek::Tuesday, 9),
        (DayOfWeek::Thursday, 11),
    ] {
        for table in ["sales_distribution", "purchasing_distribution"] {
            sqlx::query(&format!(
                "INSERT INTO {table} (location_id, day_of_week, percentage) VALUES (5, $1, $2)"
            ))
            .bind(day)
            .bind(Decimal::from(pct))
            .execute(&pool)
            .await
            .unwrap();
        }
    }
    sqlx::query(
        r#"
        INSERT INTO vendor_config (location_id, vendor_name, percentage, is_active)
        VALUES (5, 'Distribuidora Sul', 60, true), (5, 'Hortifruti', 40, true), (5, 'Antigo', 100, false)
        "#,
    )
    .execute(&pool)
    .await
    .unwrap();

    let detail = state(pool).location_service.get_location_detail(user_id, 5).await.unwrap();

    let sales: Vec<DayOfWeek> = detail.sales_distribution.iter().map(|d| d.day_of_week).collect();
    let purchasing: Vec<DayOfWeek> = detail.purchasing_distribution.iter().map(|d| d.day_of_week).collect();
    assert_eq!(sales, DayOfWeek::ALL.to_vec());
    assert_eq!(purchasing, DayOfWeek::ALL.to_vec());
    assert_eq!(detail.sales_distribution[0].percentage, Decimal::from(10));

    let mut vendors: Vec<&str> = detail.vendors.iter().map(|v| v.vendor_name.as_str()).collect();
    vendors.sort();
    assert_eq!(vendors, ["Distribuidora Sul", "Hortifruti"]);
}

// ---
// Bootstrap semanal
// ---

#[sqlx::test]
#[ignore = "requer DATABASE_URL apontando para um Postgres"]
async fn bootstrap_is_idempotent(pool: PgPool) {
    let user_id = seed_user(&pool, "ana", true).await;
    seed_location(&pool, 5).await;
    let weekly = state(pool.clone()).weekly_service;

    let first = weekly.get_or_create_week(5, monday(), user_id).await.unwrap();
    let second = weekly.get_or_create_week(5, monday(), user_id).await.unwrap();

    assert_eq!(first.week.id, second.week.id);
    assert_eq!(first.week.weekly_sales_forecast, Decimal::new(4200000, 2));
    assert_eq!(first.week.created_by, user_id);
    assert_eq!(second.daily_actuals.len(), 7);
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM weekly_data").await, 1);
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM daily_actuals").await, 7);

    for (i, actual) in second.daily_actuals.iter().enumerate() {
        assert_eq!(actual.day_of_week, DayOfWeek::ALL[i]);
        assert_eq!(actual.date, monday() + chrono::Duration::days(i as i64));
        assert!(actual.actual_sales.is_none());
        assert!(actual.actual_purchasing.is_none());
    }
}

#[sqlx::test]
#[ignore = "requer DATABASE_URL apontando para um Postgres"]
async fn concurrent_bootstraps_create_a_single_week(pool: PgPool) {
    let user_id = seed_user(&pool, "ana", true).await;
    seed_location(&pool, 5).await;
    let weekly = state(pool.clone()).weekly_service;

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let weekly = weekly.clone();
            tokio::spawn(async move { weekly.get_or_create_week(5, monday(), user_id).await })
        })
        .collect();

    let mut ids = Vec::new();
    for handle in handles {
        let week = handle.await.unwrap().unwrap();
        assert_eq!(week.daily_actuals.len(), 7);
        ids.push(week.week.id);
    }

    ids.dedup();
    assert_eq!(ids.len(), 1);
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM weekly_data").await, 1);
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM daily_actuals").await, 7);
}

#[sqlx::test]
#[ignore = "requer DATABASE_URL apontando para um Postgres"]
async fn bootstrap_for_missing_location_creates_nothing(pool: PgPool) {
    let user_id = seed_user(&pool, "ana", true).await;
    let weekly = state(pool.clone()).weekly_service;

    let result = weekly.get_or_create_week(99, monday(), user_id).await;

    assert!(matches!(result, Err(AppError::LocationNotFound)));
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM weekly_data").await, 0);
}

#[sqlx::test]
#[ignore = "requer DATABASE_URL apontando para um Postgres"]
async fn writes_require_edit_grant_and_record_the_writer(pool: PgPool) {
    let viewer = seed_user(&pool, "ana", true).await;
    let editor = seed_user(&pool, "bruno", true).await;
    seed_location(&pool, 5).await;
    grant(&pool, viewer, 5, true, false).await;
    grant(&pool, editor, 5, true, true).await;
    let weekly = state(pool).weekly_service;

    let week = weekly.get_week(viewer, 5, monday()).await.unwrap();
    let tuesday = week.daily_actuals[1].id;

    let denied = weekly
        .update_daily_actual(viewer, tuesday, Some(Decimal::from(100)), None)
        .await;
    assert!(matches!(denied, Err(AppError::AccessDenied)));
    let denied = weekly.update_forecast(viewer, week.week.id, Decimal::from(1)).await;
    assert!(matches!(denied, Err(AppError::AccessDenied)));

    let updated = weekly
        .update_daily_actual(editor, tuesday, Some(Decimal::new(61005, 1)), Some(Decimal::from(1800)))
        .await
        .unwrap();
    assert_eq!(updated.actual_sales, Some(Decimal::new(61005, 1)));
    assert_eq!(updated.updated_by, Some(editor));
    assert!(updated.updated_at.is_some());

    let forecast = weekly
        .update_forecast(editor, week.week.id, Decimal::from(45000))
        .await
        .unwrap();
    assert_eq!(forecast.weekly_sales_forecast, Decimal::from(45000));
    assert_eq!(forecast.updated_by, Some(editor));

    let missing = weekly.update_daily_actual(editor, 999_999, None, None).await;
    assert!(matches!(missing, Err(AppError::DailyActualNotFound)));
}

// ---
// Fim a fim pelo router
// ---

#[sqlx::test]
#[ignore = "requer DATABASE_URL apontando para um Postgres"]
async fn view_only_user_reads_location_but_cannot_edit_actuals(pool: PgPool) {
    let user_id = seed_user(&pool, "ana", true).await;
    seed_location(&pool, 5).await;
    grant(&pool, user_id, 5, true, false).await;
    let app = routes::router(state(pool));

    // 1. Login pela API
    let response = app
        .clone()
        .oneshot(
            Request::post("/api/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(format!(r#"{{"username":"ana","password":"{PASSWORD}"}}"#)))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap().to_owned();
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Strict"));
    assert!(set_cookie.contains("Max-Age=86400"));
    let cookie = set_cookie.split(';').next().unwrap().to_owned();
    assert!(cookie.starts_with(&format!("{AUTH_COOKIE}=")));

    let send = |method: Method, uri: &str, body: Option<&str>| {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::COOKIE, cookie.clone());
        if body.is_some() {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
        }
        builder
            .body(body.map(|b| Body::from(b.to_owned())).unwrap_or_else(Body::empty))
            .unwrap()
    };

    // 2. Leitura permitida
    let response = app.clone().oneshot(send(Method::GET, "/api/locations/5", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // 3. Semana criada no primeiro acesso
    let response = app
        .clone()
        .oneshot(send(Method::GET, "/api/locations/5/weeks/2025-03-03", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let week: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    let daily_id = week["dailyActuals"][0]["id"].as_i64().unwrap();

    // 4. Escrita negada
    let response = app
        .oneshot(send(
            Method::PUT,
            &format!("/api/daily-actuals/{daily_id}"),
            Some(r#"{"actualSales": 5000, "actualPurchasing": 1200}"#),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
