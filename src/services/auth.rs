// src/services/auth.rs

use bcrypt::verify;
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::{
    common::error::AppError,
    db::{LocationRepository, UserRepository},
    models::auth::{AuthResponse, Claims, SessionUser},
};

/// Validade do token (e do cookie): 24 horas.
pub const SESSION_TTL_SECONDS: i64 = 24 * 60 * 60;

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    location_repo: LocationRepository,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        location_repo: LocationRepository,
        jwt_secret: String,
    ) -> Self {
        Self { user_repo, location_repo, jwt_secret }
    }

    pub async fn login_user(&self, username: &str, password: &str) -> Result<AuthResponse, AppError> {
        // Usuário ausente ou desativado: mesma resposta que senha errada
        let user = self.user_repo
            .find_active_by_username(username)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid = tokio::task::spawn_blocking(move || {
            verify(&password_clone, &password_hash_clone)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))?
        ?;

        if !is_password_valid {
            tracing::info!(username, "Login recusado: senha inválida");
            return Err(AppError::InvalidCredentials);
        }

        let session_user = SessionUser::from(&user);
        let token = self.create_token(&session_user, Utc::now())?;
        let locations = self.location_repo.list_for_user(user.id).await?;

        tracing::info!(user_id = user.id, locations = locations.len(), "✅ Login efetuado");

        Ok(AuthResponse { user: session_user, locations, token })
    }

    /// Verifica assinatura e expiração. Qualquer falha vira `Unauthorized`.
    pub fn validate_token(&self, token: &str) -> Result<SessionUser, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|e| {
            tracing::debug!("Token rejeitado: {}", e);
            AppError::Unauthorized
        })?;

        Ok(token_data.claims.user)
    }

    pub fn create_token(&self, user: &SessionUser, now: DateTime<Utc>) -> Result<String, AppError> {
        let claims = Claims {
            user: user.clone(),
            iat: now.timestamp(),
            exp: now.timestamp() + SESSION_TTL_SECONDS,
        };

        Ok(encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}
