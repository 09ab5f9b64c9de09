// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::{common::error::AppError, config::AppState, models::auth::SessionUser};

/// Nome do cookie de sessão.
pub const AUTH_COOKIE: &str = "auth-token";

pub const LOGIN_PAGE: &str = "/login";

// Caminhos que não exigem sessão. O logout fica aberto para que um
// cookie expirado ainda possa ser apagado.
const PUBLIC_PATHS: &[&str] = &[
    LOGIN_PAGE,
    "/api/auth/login",
    "/api/auth/logout",
    "/api/health",
    "/swagger-ui",
    "/api-docs",
];

/// Um caminho é público quando é igual a um item da lista ou está aninhado
/// sob ele. `/loginx` não é público.
pub fn is_public_path(path: &str) -> bool {
    PUBLIC_PATHS.iter().any(|public| {
        path == *public
            || path
                .strip_prefix(public)
                .is_some_and(|rest| rest.starts_with('/'))
    })
}

// O middleware em si: a única guarda de sessão da aplicação.
// Política fail-closed: qualquer falha na verificação nega a requisição.
pub async fn session_guard(
    State(app_state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();

    if is_public_path(&path) {
        return next.run(request).await;
    }

    let verified = jar
        .get(AUTH_COOKIE)
        .ok_or(AppError::Unauthorized)
        .and_then(|cookie| app_state.auth_service.validate_token(cookie.value()));

    match verified {
        Ok(user) => {
            // Insere o usuário nos "extensions" da requisição
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => deny(&path, e),
    }
}

// API responde 401 em JSON; páginas são redirecionadas para o login.
fn deny(path: &str, error: AppError) -> Response {
    tracing::debug!(path, "Sessão recusada: {}", error);

    if path == "/api" || path.starts_with("/api/") {
        AppError::Unauthorized.into_response()
    } else {
        Redirect::to(LOGIN_PAGE).into_response()
    }
}

// Extrator para obter o usuário autenticado diretamente nos handlers
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub SessionUser);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionUser>()
            .cloned()
            .map(AuthenticatedUser)
            .ok_or(AppError::Unauthorized)
    }
}
