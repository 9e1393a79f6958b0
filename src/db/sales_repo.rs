// src/db/sales_repo.rs

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use crate::{
    common::error::AppError,
    models::sales::{NewSalePosition, SaleHeader, SalePosition, StockLevel},
};

// ---
// Portas de armazenamento da venda
// ---

/// Leitura e escrita de saldo dentro de uma transação aberta.
///
/// `stock_for_update` precisa travar a linha do produto até o fim da
/// transação, para que nenhuma outra reserva leia um saldo já vencido
/// entre a leitura e a escrita.
#[async_trait]
pub trait StockLedger: Send {
    async fn stock_for_update(&mut self, product_id: i64) -> Result<Option<StockLevel>, AppError>;

    async fn write_stock(&mut self, product_id: i64, qty: i64) -> Result<(), AppError>;
}

/// Unidade de trabalho de uma venda. Se for descartada sem `commit`,
/// nada do que foi escrito nela fica visível.
#[async_trait]
pub trait SaleTransaction: StockLedger + Sized {
    async fn insert_sale(&mut self, manager_id: i64, customer_id: i64) -> Result<SaleHeader, AppError>;

    async fn insert_position(
        &mut self,
        sale_id: i64,
        position: &NewSalePosition,
    ) -> Result<SalePosition, AppError>;

    async fn commit(self) -> Result<(), AppError>;
}

#[async_trait]
pub trait SalesStore: Send + Sync {
    type Tx: SaleTransaction;

    async fn begin(&self) -> Result<Self::Tx, AppError>;

    /// Soma `qty * price` de todas as posições das vendas do gerente (0 se não houver).
    async fn total_sales(&self, manager_id: i64) -> Result<i64, AppError>;
}

// ---
// Implementação Postgres
// ---

#[derive(Clone)]
pub struct PgSalesRepository {
    pool: PgPool,
}

impl PgSalesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// A transação do sqlx faz rollback sozinha no Drop, inclusive quando a
// requisição é cancelada no meio da venda.
pub struct PgSaleTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl SalesStore for PgSalesRepository {
    type Tx = PgSaleTransaction;

    async fn begin(&self) -> Result<Self::Tx, AppError> {
        let tx = self.pool.begin().await?;
        Ok(PgSaleTransaction { tx })
    }

    async fn total_sales(&self, manager_id: i64) -> Result<i64, AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COALESCE(SUM(sp.qty::NUMERIC * sp.price), 0)::BIGINT
            FROM sales s
            JOIN sales_positions sp ON sp.sale_id = s.id
            WHERE s.manager_id = $1
            "#,
        )
        .bind(manager_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }
}

#[async_trait]
impl StockLedger for PgSaleTransaction {
    async fn stock_for_update(&mut self, product_id: i64) -> Result<Option<StockLevel>, AppError> {
        // FOR UPDATE: vendas concorrentes do mesmo produto fazem fila nesta linha
        let level = sqlx::query_as::<_, StockLevel>(
            "SELECT qty, active FROM products WHERE id = $1 FOR UPDATE",
        )
        .bind(product_id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(level)
    }

    async fn write_stock(&mut self, product_id: i64, qty: i64) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE products SET qty = $1 WHERE id = $2")
            .bind(qty)
            .bind(product_id)
            .execute(&mut *self.tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}

#[async_trait]
impl SaleTransaction for PgSaleTransaction {
    async fn insert_sale(&mut self, manager_id: i64, customer_id: i64) -> Result<SaleHeader, AppError> {
        sqlx::query_as::<_, SaleHeader>(
            r#"
            INSERT INTO sales (manager_id, customer_id)
            VALUES ($1, $2)
            RETURNING id, manager_id, customer_id, created
            "#,
        )
        .bind(manager_id)
        .bind(customer_id)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| {
            // Gerente ou cliente inexistente
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_foreign_key_violation() {
                    return AppError::NotFound;
                }
            }
            e.into()
        })
    }

    async fn insert_position(
        &mut self,
        sale_id: i64,
        position: &NewSalePosition,
    ) -> Result<SalePosition, AppError> {
        // Uma linha por INSERT, sempre com parâmetros
        let inserted = sqlx::query_as::<_, SalePosition>(
            r#"
            INSERT INTO sales_positions (sale_id, product_id, qty, price)
            VALUES ($1, $2, $3, $4)
            RETURNING id, sale_id, product_id, qty, price, created
            "#,
        )
        .bind(sale_id)
        .bind(position.product_id)
        .bind(position.qty)
        .bind(position.price)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(inserted)
    }

    async fn commit(self) -> Result<(), AppError> {
        self.tx.commit().await?;
        Ok(())
    }
}
