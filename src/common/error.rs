// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Data de início de semana inválida: {0}")]
    InvalidWeekStart(NaiveDate),

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Sessão ausente ou inválida")]
    Unauthorized,

    #[error("Acesso negado")]
    AccessDenied,

    #[error("Loja não encontrada")]
    LocationNotFound,

    #[error("Semana não encontrada")]
    WeeklyDataNotFound,

    #[error("Lançamento diário não encontrado")]
    DailyActualNotFound,

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::InvalidWeekStart(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::AccessDenied => StatusCode::FORBIDDEN,
            AppError::LocationNotFound
            | AppError::WeeklyDataNotFound
            | AppError::DailyActualNotFound => StatusCode::NOT_FOUND,
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let error_message = match self {
            // Retorna todos os detalhes da validação.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (status, body).into_response();
            }
            AppError::InvalidWeekStart(date) => {
                format!("{} não é o início de uma semana válida (segunda-feira dentro do calendário).", date)
            }
            AppError::InvalidCredentials => "Usuário ou senha inválidos.".to_string(),
            AppError::Unauthorized => "Token de autenticação inválido ou ausente.".to_string(),
            AppError::AccessDenied => "Você não tem acesso a esta loja.".to_string(),
            AppError::LocationNotFound => "Loja não encontrada.".to_string(),
            AppError::WeeklyDataNotFound => "Semana não encontrada.".to_string(),
            AppError::DailyActualNotFound => "Lançamento diário não encontrado.".to_string(),

            // Todos os outros erros viram 500. O detalhe vai só para o log.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                "Ocorreu um erro inesperado.".to_string()
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
