// src/models/sales.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

// Cabeçalho gravado antes das posições (id e data gerados pelo banco)
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct SaleHeader {
    pub id: i64,
    pub manager_id: i64,
    pub customer_id: i64,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalePosition {
    pub id: i64,
    pub sale_id: i64,
    pub product_id: i64,
    pub qty: i64,
    // Preço unitário capturado no momento da venda
    pub price: i64,
    pub created: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: i64,
    pub manager_id: i64,
    pub customer_id: i64,
    pub created: DateTime<Utc>,
    pub positions: Vec<SalePosition>,
}

impl Sale {
    pub fn from_header(header: SaleHeader, positions: Vec<SalePosition>) -> Self {
        Self {
            id: header.id,
            manager_id: header.manager_id,
            customer_id: header.customer_id,
            created: header.created,
            positions,
        }
    }

    /// Soma de `qty * price`. `None` se passar de `i64`.
    pub fn checked_total(&self) -> Option<i64> {
        checked_sum(self.positions.iter().map(|p| (p.qty, p.price)))
    }
}

// Limites de uma posição: qty * price nunca estoura i64
pub const MAX_POSITION_QTY: i64 = 1_000_000;
pub const MAX_UNIT_PRICE: i64 = 1_000_000_000_000;

pub fn checked_sum<I>(lines: I) -> Option<i64>
where
    I: IntoIterator<Item = (i64, i64)>,
{
    lines
        .into_iter()
        .try_fold(0i64, |acc, (qty, price)| acc.checked_add(qty.checked_mul(price)?))
}

// Linha pedida pelo cliente da API
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewSalePosition {
    pub product_id: i64,
    #[validate(range(min = 1, max = MAX_POSITION_QTY, message = "A quantidade deve estar entre 1 e 1000000."))]
    pub qty: i64,
    #[validate(range(min = 0, max = MAX_UNIT_PRICE, message = "O preço deve estar entre 0 e 1000000000000."))]
    pub price: i64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSalePayload {
    pub customer_id: i64,
    #[serde(default)]
    #[validate(nested)]
    pub positions: Vec<NewSalePosition>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesTotal {
    pub manager_id: i64,
    pub total: i64,
}

// Saldo lido sob lock para a reserva
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow)]
pub struct StockLevel {
    pub qty: i64,
    pub active: bool,
}

// Resultado da reserva de estoque de uma posição
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reservation {
    Applied,
    Rejected,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checked_sum_detects_overflow() {
        assert_eq!(checked_sum([(2, 100), (3, 50)]), Some(350));
        assert_eq!(checked_sum([]), Some(0));
        assert_eq!(checked_sum([(2, i64::MAX / 2 + 1)]), None);
        assert_eq!(checked_sum([(1, i64::MAX), (1, 1)]), None);
    }

    #[test]
    fn position_bounds_are_validated() {
        let ok = NewSalePosition { product_id: 1, qty: MAX_POSITION_QTY, price: MAX_UNIT_PRICE };
        assert!(ok.validate().is_ok());

        let huge_price = NewSalePosition { product_id: 1, qty: 2, price: i64::MAX / 2 + 1 };
        assert!(huge_price.validate().is_err());

        let huge_qty = NewSalePosition { product_id: 1, qty: MAX_POSITION_QTY + 1, price: 1 };
        assert!(huge_qty.validate().is_err());
    }
}
