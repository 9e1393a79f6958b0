// src/db/customer_repo.rs

use sqlx::PgPool;

use crate::{common::error::AppError, models::customers::Customer};

const CUSTOMER_COLUMNS: &str = "id, name, phone, password, active, created";

// O repositório de clientes, responsável pela tabela 'customers'
#[derive(Clone)]
pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn all(&self) -> Result<Vec<Customer>, AppError> {
        let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customers ORDER BY id");
        let items = sqlx::query_as::<_, Customer>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    pub async fn all_active(&self) -> Result<Vec<Customer>, AppError> {
        let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE active ORDER BY id");
        let items = sqlx::query_as::<_, Customer>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    pub async fn by_id(&self, id: i64) -> Result<Customer, AppError> {
        let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = $1");
        sqlx::query_as::<_, Customer>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::NotFound)
    }

    // Bloqueia (false) ou desbloqueia (true) o cliente
    pub async fn change_active(&self, id: i64, active: bool) -> Result<Customer, AppError> {
        let sql = format!("UPDATE customers SET active = $2 WHERE id = $1 RETURNING {CUSTOMER_COLUMNS}");
        sqlx::query_as::<_, Customer>(&sql)
            .bind(id)
            .bind(active)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn delete(&self, id: i64) -> Result<Customer, AppError> {
        let sql = format!("DELETE FROM customers WHERE id = $1 RETURNING {CUSTOMER_COLUMNS}");
        sqlx::query_as::<_, Customer>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::NotFound)
    }

    /// Cadastra (id == 0) ou atualiza o cliente. A senha já chega com hash.
    pub async fn save(
        &self,
        id: i64,
        name: &str,
        phone: &str,
        password_hash: &str,
    ) -> Result<Customer, AppError> {
        let result = if id == 0 {
            let sql = format!(
                "INSERT INTO customers (name, phone, password) VALUES ($1, $2, $3) RETURNING {CUSTOMER_COLUMNS}"
            );
            sqlx::query_as::<_, Customer>(&sql)
                .bind(name)
                .bind(phone)
                .bind(password_hash)
                .fetch_optional(&self.pool)
                .await
        } else {
            let sql = format!(
                "UPDATE customers SET name = $1, phone = $2, password = $3 WHERE id = $4 RETURNING {CUSTOMER_COLUMNS}"
            );
            sqlx::query_as::<_, Customer>(&sql)
                .bind(name)
                .bind(phone)
                .bind(password_hash)
                .bind(id)
                .fetch_optional(&self.pool)
                .await
        };

        result
            .map_err(|e| {
                // Converte erro de violação de chave única em um erro mais amigável
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_unique_violation() {
                        return AppError::PhoneAlreadyRegistered;
                    }
                }
                e.into()
            })?
            .ok_or(AppError::NotFound)
    }
}
