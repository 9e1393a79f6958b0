// src/db/credential_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::auth::{Principal, StoredCredentials},
};

// Porta de leitura das credenciais (id + hash) por telefone.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_credentials(
        &self,
        principal: Principal,
        phone: &str,
    ) -> Result<Option<StoredCredentials>, AppError>;
}

#[derive(Clone)]
pub struct PgCredentialRepository {
    pool: PgPool,
}

impl PgCredentialRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialRepository {
    async fn find_credentials(
        &self,
        principal: Principal,
        phone: &str,
    ) -> Result<Option<StoredCredentials>, AppError> {
        // Tabela escolhida por match, nunca por texto vindo do usuário
        let sql = match principal {
            Principal::Customer => "SELECT id, password AS digest FROM customers WHERE phone = $1",
            Principal::Manager => "SELECT id, password AS digest FROM managers WHERE phone = $1",
        };

        let creds = sqlx::query_as::<_, StoredCredentials>(sql)
            .bind(phone)
            .fetch_optional(&self.pool)
            .await?;

        Ok(creds)
    }
}
