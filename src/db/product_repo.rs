// src/db/product_repo.rs

use sqlx::PgPool;

use crate::{common::error::AppError, models::products::Product};

// Limite de itens devolvidos na listagem de produtos
const PRODUCTS_PAGE_LIMIT: i64 = 500;

#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Cria (id == 0) ou atualiza o produto.
    ///
    /// Esta escrita define o saldo de forma absoluta; a baixa por venda
    /// passa sempre pela reserva transacional do `InventoryLedger`.
    pub async fn save(&self, id: i64, name: &str, price: i64, qty: i64) -> Result<Product, AppError> {
        let product = if id == 0 {
            sqlx::query_as::<_, Product>(
                r#"
                INSERT INTO products (name, price, qty)
                VALUES ($1, $2, $3)
                RETURNING id, name, price, qty, active, created
                "#,
            )
            .bind(name)
            .bind(price)
            .bind(qty)
            .fetch_optional(&self.pool)
            .await?
        } else {
            sqlx::query_as::<_, Product>(
                r#"
                UPDATE products SET name = $1, price = $2, qty = $3
                WHERE id = $4
                RETURNING id, name, price, qty, active, created
                "#,
            )
            .bind(name)
            .bind(price)
            .bind(qty)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
        };

        product.ok_or(AppError::NotFound)
    }

    pub async fn list_active(&self) -> Result<Vec<Product>, AppError> {
        let items = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price, qty, active, created
            FROM products
            WHERE active = TRUE
            ORDER BY id
            LIMIT $1
            "#,
        )
        .bind(PRODUCTS_PAGE_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    pub async fn remove(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}
