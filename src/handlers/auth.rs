// src/handlers/auth.rs

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::{AuthenticatedUser, AUTH_COOKIE},
    models::auth::{AuthResponse, LoginUserPayload, SessionUser},
    services::auth::SESSION_TTL_SECONDS,
};

// O cookie de sessão: http-only, same-site strict, válido no site inteiro.
fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, token))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict)
        .max_age(time::Duration::seconds(SESSION_TTL_SECONDS))
        .path("/")
        .build()
}

// Handler de login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginUserPayload,
    responses(
        (status = 200, description = "Login efetuado; o cookie auth-token também é definido", body = AuthResponse),
        (status = 400, description = "Payload inválido"),
        (status = 401, description = "Credenciais inválidas"),
        (status = 500, description = "Falha inesperada")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginUserPayload>,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let response = app_state
        .auth_service
        .login_user(&payload.username, &payload.password)
        .await?;

    let cookie = session_cookie(response.token.clone(), app_state.config.secure_cookies);

    Ok((jar.add(cookie), Json(response)))
}

// Handler de logout: o token é a sessão, então basta apagar o cookie.
// Não exige sessão válida, senão um token expirado nunca sairia do navegador.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Auth",
    responses(
        (status = 204, description = "Cookie de sessão removido")
    )
)]
pub async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    let removal = Cookie::build((AUTH_COOKIE, "")).path("/").build();
    (jar.remove(removal), StatusCode::NO_CONTENT)
}

// Handler da rota protegida /me
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    responses(
        (status = 200, description = "Usuário da sessão", body = SessionUser),
        (status = 401, description = "Não autenticado")
    )
)]
pub async fn get_me(AuthenticatedUser(user): AuthenticatedUser) -> Json<SessionUser> {
    Json(user)
}
