// src/db/token_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::auth::{Principal, Token},
};

// Porta de persistência dos tokens. Clientes e gerentes ficam em tabelas separadas.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn insert_token(&self, principal: Principal, token: &Token) -> Result<(), AppError>;

    async fn find_token(&self, principal: Principal, value: &str) -> Result<Option<Token>, AppError>;
}

#[derive(Clone)]
pub struct PgTokenRepository {
    pool: PgPool,
}

impl PgTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenStore for PgTokenRepository {
    async fn insert_token(&self, principal: Principal, token: &Token) -> Result<(), AppError> {
        let sql = match principal {
            Principal::Customer => {
                "INSERT INTO customers_tokens (token, customer_id, issued_at, expires_at) VALUES ($1, $2, $3, $4)"
            }
            Principal::Manager => {
                "INSERT INTO managers_tokens (token, manager_id, issued_at, expires_at) VALUES ($1, $2, $3, $4)"
            }
        };

        sqlx::query(sql)
            .bind(&token.value)
            .bind(token.subject_id)
            .bind(token.issued_at)
            .bind(token.expires_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn find_token(&self, principal: Principal, value: &str) -> Result<Option<Token>, AppError> {
        let sql = match principal {
            Principal::Customer => {
                r#"
                SELECT token AS value, customer_id AS subject_id, issued_at, expires_at
                FROM customers_tokens
                WHERE token = $1
                "#
            }
            Principal::Manager => {
                r#"
                SELECT token AS value, manager_id AS subject_id, issued_at, expires_at
                FROM managers_tokens
                WHERE token = $1
                "#
            }
        };

        let token = sqlx::query_as::<_, Token>(sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        Ok(token)
    }
}
