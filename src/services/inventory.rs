// src/services/inventory.rs

use crate::{
    common::error::AppError,
    db::StockLedger,
    models::sales::Reservation,
};

/// Baixa de estoque de um produto dentro da transação da venda.
#[derive(Debug, Clone, Copy, Default)]
pub struct InventoryLedger;

impl InventoryLedger {
    pub fn new() -> Self {
        Self
    }

    /// Reserva `qty` unidades do produto.
    ///
    /// Produto inexistente, inativo ou com saldo insuficiente devolve
    /// `Rejected` e o saldo fica intacto. Só `Err` para falha de armazenamento.
    pub async fn reserve<L>(&self, ledger: &mut L, product_id: i64, qty: i64) -> Result<Reservation, AppError>
    where
        L: StockLedger + ?Sized,
    {
        if qty <= 0 {
            return Err(AppError::InvalidSalePosition(format!(
                "Quantidade inválida para o produto {}.",
                product_id
            )));
        }

        let Some(level) = ledger.stock_for_update(product_id).await? else {
            tracing::debug!(product_id, "Produto não encontrado na reserva");
            return Ok(Reservation::Rejected);
        };

        if !level.active || level.qty < qty {
            tracing::debug!(product_id, available = level.qty, requested = qty, active = level.active, "Reserva recusada");
            return Ok(Reservation::Rejected);
        }

        ledger.write_stock(product_id, level.qty - qty).await?;
        Ok(Reservation::Applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryStore, SaleTransaction, SalesStore};

    async fn reserve_and_commit(store: &MemoryStore, product_id: i64, qty: i64) -> Reservation {
        let mut tx = store.begin().await.unwrap();
        let outcome = InventoryLedger::new().reserve(&mut tx, product_id, qty).await.unwrap();
        tx.commit().await.unwrap();
        outcome
    }

    #[tokio::test]
    async fn applies_when_stock_is_enough() {
        let store = MemoryStore::new();
        let id = store.add_product("Café", 1000, 10, true).await;

        assert_eq!(reserve_and_commit(&store, id, 4).await, Reservation::Applied);
        assert_eq!(store.product(id).await.unwrap().qty, 6);
    }

    #[tokio::test]
    async fn exact_quantity_leaves_zero() {
        let store = MemoryStore::new();
        let id = store.add_product("Café", 1000, 3, true).await;

        assert_eq!(reserve_and_commit(&store, id, 3).await, Reservation::Applied);
        assert_eq!(store.product(id).await.unwrap().qty, 0);
    }

    #[tokio::test]
    async fn rejects_insufficient_stock_without_touching_it() {
        let store = MemoryStore::new();
        let id = store.add_product("Café", 1000, 2, true).await;

        assert_eq!(reserve_and_commit(&store, id, 3).await, Reservation::Rejected);
        assert_eq!(store.product(id).await.unwrap().qty, 2);
    }

    #[tokio::test]
    async fn rejects_inactive_product() {
        let store = MemoryStore::new();
        let id = store.add_product("Café", 1000, 50, false).await;

        assert_eq!(reserve_and_commit(&store, id, 1).await, Reservation::Rejected);
        assert_eq!(store.product(id).await.unwrap().qty, 50);
    }

    #[tokio::test]
    async fn rejects_missing_product() {
        let store = MemoryStore::new();
        assert_eq!(reserve_and_commit(&store, 404, 1).await, Reservation::Rejected);
    }

    #[tokio::test]
    async fn non_positive_quantity_is_an_error() {
        let store = MemoryStore::new();
        let id = store.add_product("Café", 1000, 5, true).await;

        let mut tx = store.begin().await.unwrap();
        for qty in [0, -1] {
            let err = InventoryLedger::new().reserve(&mut tx, id, qty).await.unwrap_err();
            assert!(matches!(err, AppError::InvalidSalePosition(_)));
        }
    }
}
