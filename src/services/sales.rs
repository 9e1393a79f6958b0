// src/services/sales.rs

use crate::{
    common::error::AppError,
    db::{SaleTransaction, SalesStore},
    models::sales::{checked_sum, NewSalePosition, Reservation, Sale, MAX_POSITION_QTY, MAX_UNIT_PRICE},
    services::inventory::InventoryLedger,
};

#[derive(Clone)]
pub struct SaleProcessor<S> {
    store: S,
    ledger: InventoryLedger,
}

impl<S: SalesStore> SaleProcessor<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            ledger: InventoryLedger::new(),
        }
    }

    /// Registra a venda inteira numa única transação.
    ///
    /// Ou tudo é gravado (cabeçalho, todas as posições e as baixas de
    /// estoque) ou nada é. Qualquer reserva recusada devolve
    /// `InsufficientStock` e a transação é descartada.
    pub async fn create_sale(
        &self,
        manager_id: i64,
        customer_id: i64,
        positions: &[NewSalePosition],
    ) -> Result<Sale, AppError> {
        validate_positions(positions)?;

        let mut tx = self.store.begin().await?;

        let header = tx.insert_sale(manager_id, customer_id).await?;

        // Posições com o mesmo produto disputam o mesmo saldo, uma de cada vez
        for position in positions {
            match self.ledger.reserve(&mut tx, position.product_id, position.qty).await? {
                Reservation::Applied => {}
                Reservation::Rejected => {
                    tracing::warn!(
                        manager_id,
                        customer_id,
                        product_id = position.product_id,
                        qty = position.qty,
                        "Venda recusada por falta de estoque"
                    );
                    // `tx` sai de escopo sem commit: rollback
                    return Err(AppError::InsufficientStock);
                }
            }
        }

        let mut saved = Vec::with_capacity(positions.len());
        for position in positions {
            saved.push(tx.insert_position(header.id, position).await?);
        }

        tx.commit().await?;

        let sale = Sale::from_header(header, saved);
        tracing::info!(
            sale_id = sale.id,
            manager_id,
            customer_id,
            positions = sale.positions.len(),
            total = ?sale.checked_total(),
            "Venda registrada"
        );

        Ok(sale)
    }

    pub async fn total_sales(&self, manager_id: i64) -> Result<i64, AppError> {
        self.store.total_sales(manager_id).await
    }
}

// Checagem feita antes de abrir a transação
fn validate_positions(positions: &[NewSalePosition]) -> Result<(), AppError> {
    for (index, position) in positions.iter().enumerate() {
        if position.qty <= 0 || position.qty > MAX_POSITION_QTY {
            return Err(AppError::InvalidSalePosition(format!(
                "Posição {}: a quantidade deve estar entre 1 e {}.",
                index, MAX_POSITION_QTY
            )));
        }
        if position.price < 0 || position.price > MAX_UNIT_PRICE {
            return Err(AppError::InvalidSalePosition(format!(
                "Posição {}: o preço deve estar entre 0 e {}.",
                index, MAX_UNIT_PRICE
            )));
        }
    }

    if checked_sum(positions.iter().map(|p| (p.qty, p.price))).is_none() {
        return Err(AppError::InvalidSalePosition(
            "O total da venda excede o limite suportado.".to_string(),
        ));
    }

    Ok(())
}
