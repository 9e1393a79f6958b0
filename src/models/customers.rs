// src/models/customers.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub phone: String,
    #[serde(skip_serializing)] // IMPORTANTE para segurança
    #[schema(ignore)]
    pub password: String,
    pub active: bool,
    pub created: DateTime<Utc>,
}

// id == 0 cadastra, qualquer outro valor atualiza
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveCustomerPayload {
    #[serde(default)]
    pub id: i64,
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    #[validate(length(min = 1, message = "O telefone é obrigatório."))]
    pub phone: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
}
