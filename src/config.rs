// src/config.rs

use std::{env, str::FromStr, time::Duration};

use anyhow::{anyhow, Context};
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    common::{
        error::AppError,
        hashing::{BcryptHasher, PasswordHasher},
    },
    db::{
        CustomerRepository, ManagerRepository, PgCredentialRepository, PgSalesRepository,
        PgTokenRepository, ProductRepository,
    },
    services::{credentials::CredentialVerifier, sales::SaleProcessor, tokens::TokenService},
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:9999";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 3;
const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;
const DEFAULT_ADMIN_NAME: &str = "Administrador";

pub type AppTokenService = TokenService<PgTokenRepository, PgCredentialRepository, BcryptHasher>;
pub type AppSaleProcessor = SaleProcessor<PgSalesRepository>;

// Gerente admin criado na subida, se ainda não existir
#[derive(Clone)]
pub struct AdminSeed {
    pub name: String,
    pub phone: String,
    pub password: String,
}

// Configuração lida do ambiente (e do .env, se existir)
#[derive(Clone)]
pub struct Settings {
    pub database_url: String,
    pub bind_addr: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub token_ttl: chrono::Duration,
    pub admin: Option<AdminSeed>,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL deve ser definida")?;

        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let max_connections = parse_or(&lookup, "DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;
        let acquire_timeout_secs = parse_or(&lookup, "DB_ACQUIRE_TIMEOUT_SECS", DEFAULT_ACQUIRE_TIMEOUT_SECS)?;
        let token_ttl_secs = parse_or(&lookup, "TOKEN_TTL_SECS", DEFAULT_TOKEN_TTL_SECS)?;

        if token_ttl_secs <= 0 {
            return Err(anyhow!("TOKEN_TTL_SECS deve ser maior que zero"));
        }

        // ADMIN_PHONE e ADMIN_PASSWORD andam juntos
        let admin = match (lookup("ADMIN_PHONE"), lookup("ADMIN_PASSWORD")) {
            (Some(phone), Some(password)) => Some(AdminSeed {
                name: lookup("ADMIN_NAME").unwrap_or_else(|| DEFAULT_ADMIN_NAME.to_string()),
                phone,
                password,
            }),
            (None, None) => None,
            _ => return Err(anyhow!("ADMIN_PHONE e ADMIN_PASSWORD devem ser definidos juntos")),
        };

        Ok(Self {
            database_url,
            bind_addr,
            admin,
            max_connections,
            acquire_timeout: Duration::from_secs(acquire_timeout_secs),
            token_ttl: chrono::Duration::seconds(token_ttl_secs),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} inválido: {:?}", key, raw)),
        None => Ok(default),
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub hasher: BcryptHasher,
    pub token_service: AppTokenService,
    pub sale_processor: AppSaleProcessor,
    pub customer_repo: CustomerRepository,
    pub product_repo: ProductRepository,
    pub manager_repo: ManagerRepository,
}

impl AppState {
    pub async fn new(settings: &Settings) -> anyhow::Result<Self> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(settings.acquire_timeout)
            .connect(&settings.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let hasher = BcryptHasher::new();
        let verifier = CredentialVerifier::new(PgCredentialRepository::new(db_pool.clone()), hasher.clone()).await?;
        let token_service = TokenService::new(
            PgTokenRepository::new(db_pool.clone()),
            verifier,
            settings.token_ttl,
        );
        let sale_processor = SaleProcessor::new(PgSalesRepository::new(db_pool.clone()));

        Ok(Self {
            hasher,
            token_service,
            sale_processor,
            customer_repo: CustomerRepository::new(db_pool.clone()),
            product_repo: ProductRepository::new(db_pool.clone()),
            manager_repo: ManagerRepository::new(db_pool.clone()),
            db_pool,
        })
    }

    /// Garante o gerente admin inicial. Telefone já cadastrado fica como
    /// está (a senha não é sobrescrita).
    pub async fn bootstrap_admin(&self, seed: &AdminSeed) -> Result<(), AppError> {
        let password_hash = self.hasher.hash(&seed.password).await?;

        match self
            .manager_repo
            .insert_admin_if_absent(&seed.name, &seed.phone, &password_hash)
            .await?
        {
            Some(id) => tracing::info!(manager_id = id, "Gerente admin inicial criado"),
            None => tracing::debug!("Gerente admin inicial já existe"),
        }

        Ok(())
    }
}
