// src/config.rs

use anyhow::{bail, Context};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    db::{LocationRepository, UserRepository, WeeklyRepository},
    services::{auth::AuthService, location_service::LocationService, weekly_service::WeeklyService},
};

// Segredos conhecidos que nunca podem assinar tokens em produção.
const PLACEHOLDER_SECRETS: &[&str] = &["secret", "changeme", "change-me"];
const MIN_SECRET_LEN: usize = 32;

// ---
// Configuração lida do ambiente
// ---
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    // `true` quando APP_ENV=production: o cookie ganha a flag Secure
    pub secure_cookies: bool,
    pub db_max_connections: u32,
    pub db_connect_attempts: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Monta a configuração a partir de uma função de busca (facilita os testes).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = lookup("JWT_SECRET").context("JWT_SECRET deve ser definido")?;
        validate_secret(&jwt_secret)?;

        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let secure_cookies = lookup("APP_ENV").is_some_and(|v| v.eq_ignore_ascii_case("production"));

        let db_max_connections = parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?;
        let db_connect_attempts = parse_or(&lookup, "DATABASE_CONNECT_ATTEMPTS", 5)?;
        if db_connect_attempts == 0 {
            bail!("DATABASE_CONNECT_ATTEMPTS deve ser pelo menos 1");
        }

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr,
            secure_cookies,
            db_max_connections,
            db_connect_attempts,
        })
    }
}

fn parse_or(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u32) -> anyhow::Result<u32> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} inválido: {raw:?}")),
        None => Ok(default),
    }
}

// Sem segredo explícito e forte, a aplicação não sobe.
fn validate_secret(secret: &str) -> anyhow::Result<()> {
    let trimmed = secret.trim();
    if trimmed.is_empty() {
        bail!("JWT_SECRET está vazio");
    }
    if PLACEHOLDER_SECRETS.iter().any(|p| trimmed.eq_ignore_ascii_case(p)) {
        bail!("JWT_SECRET usa um valor de exemplo conhecido; defina um segredo real");
    }
    if trimmed.len() < MIN_SECRET_LEN {
        bail!("JWT_SECRET deve ter pelo menos {MIN_SECRET_LEN} caracteres");
    }
    Ok(())
}

// Banco fora do ar ou lento: vale tentar de novo. Credencial errada,
// banco inexistente ou URL malformada falham na primeira tentativa.
fn is_transient(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut)
}

/// Conecta ao banco com backoff exponencial (500ms, 1s, 2s, ...).
/// Só falhas de conectividade são repetidas.
pub async fn connect_with_retry(config: &Config) -> anyhow::Result<PgPool> {
    let mut delay = Duration::from_millis(500);
    let mut attempt = 1;

    loop {
        let result = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await;

        match result {
            Ok(pool) => return Ok(pool),
            Err(e) if is_transient(&e) && attempt < config.db_connect_attempts => {
                tracing::warn!(attempt, "Falha ao conectar ao banco de dados: {}. Nova tentativa em {:?}", e, delay);
                tokio::time::sleep(delay).await;
                delay *= 2;
                attempt += 1;
            }
            Err(e) => {
                return Err(e).context(format!(
                    "Falha ao conectar ao banco de dados após {attempt} tentativa(s)"
                ));
            }
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Config,
    pub auth_service: AuthService,
    pub location_service: LocationService,
    pub weekly_service: WeeklyService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config::from_env()?;

        let db_pool = connect_with_retry(&config).await?;
        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::from_parts(config, db_pool))
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_parts(config: Config, db_pool: PgPool) -> Self {
        let user_repo = UserRepository::new(db_pool.clone());
        let location_repo = LocationRepository::new(db_pool.clone());
        let weekly_repo = WeeklyRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo, location_repo.clone(), config.jwt_secret.clone());
        let location_service = LocationService::new(location_repo.clone());
        let weekly_service = WeeklyService::new(
            weekly_repo,
            location_repo,
            location_service.clone(),
            db_pool.clone(),
        );

        Self {
            db_pool,
            config,
            auth_service,
            location_service,
            weekly_service,
        }
    }
}
