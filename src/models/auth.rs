// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::location::LocationWithGrant;

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    pub password_hash: String,

    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

// O usuário da sessão: exatamente o que viaja dentro do token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SessionUser {
    #[schema(example = 7)]
    pub id: i32,
    #[schema(example = "gerente.centro")]
    pub username: String,
    #[schema(example = "gerente@exemplo.com")]
    pub email: String,
    #[schema(example = "manager")]
    pub role: String,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
        }
    }
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[validate(length(min = 1, message = "O usuário é obrigatório."))]
    #[schema(example = "gerente.centro")]
    pub username: String,
    #[validate(length(min = 1, message = "A senha é obrigatória."))]
    pub password: String,
}

// Resposta do login: usuário, lojas permitidas e o token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub user: SessionUser,
    pub locations: Vec<LocationWithGrant>,
    pub token: String,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(flatten)]
    pub user: SessionUser,
    pub iat: i64, // Issued At (quando o token foi criado)
    pub exp: i64, // Expiration time (quando o token expira)
}
