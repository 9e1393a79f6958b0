// src/models/products.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::sales::MAX_UNIT_PRICE;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    // Centavos (menor unidade da moeda)
    pub price: i64,
    pub qty: i64,
    pub active: bool,
    pub created: DateTime<Utc>,
}

// id == 0 cria, qualquer outro valor atualiza
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveProductPayload {
    #[serde(default)]
    pub id: i64,
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    #[validate(range(min = 0, max = MAX_UNIT_PRICE, message = "O preço deve estar entre 0 e 1000000000000."))]
    pub price: i64,
    #[validate(range(min = 0, message = "A quantidade não pode ser negativa."))]
    pub qty: i64,
}
