// src/db/manager_repo.rs

use sqlx::PgPool;

use crate::{common::error::AppError, models::managers::Manager};

#[derive(Clone)]
pub struct ManagerRepository {
    pool: PgPool,
}

impl ManagerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        name: &str,
        phone: &str,
        password_hash: &str,
        is_admin: bool,
    ) -> Result<Manager, AppError> {
        sqlx::query_as::<_, Manager>(
            r#"
            INSERT INTO managers (name, phone, password, is_admin)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, phone, is_admin, created
            "#,
        )
        .bind(name)
        .bind(phone)
        .bind(password_hash)
        .bind(is_admin)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::PhoneAlreadyRegistered;
                }
            }
            e.into()
        })
    }

    // Idempotente: devolve o id só quando insere
    pub async fn insert_admin_if_absent(
        &self,
        name: &str,
        phone: &str,
        password_hash: &str,
    ) -> Result<Option<i64>, AppError> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO managers (name, phone, password, is_admin)
            VALUES ($1, $2, $3, TRUE)
            ON CONFLICT (phone) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(name)
        .bind(phone)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(id)
    }

    // Gerente inexistente conta como "não admin"
    pub async fn is_admin(&self, id: i64) -> Result<bool, AppError> {
        let is_admin = sqlx::query_scalar::<_, bool>("SELECT is_admin FROM managers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(is_admin.unwrap_or(false))
    }
}
