// src/models/auth.rs

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

// Os dois "espaços de nomes" de credenciais e tokens.
// Tokens de cliente nunca servem para gerente e vice-versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Principal {
    Customer,
    Manager,
}

impl Principal {
    pub fn label(self) -> &'static str {
        match self {
            Principal::Customer => "customer",
            Principal::Manager => "manager",
        }
    }
}

// Linha de token. Não implementa Serialize: o valor é a própria credencial.
#[derive(Clone, PartialEq, Eq, FromRow)]
pub struct Token {
    pub value: String,
    pub subject_id: i64,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Token {
    /// Válido enquanto `now <= expires_at`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("value", &"**redacted**")
            .field("subject_id", &self.subject_id)
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

// Id + hash guardado para um telefone.
#[derive(Clone, FromRow)]
pub struct StoredCredentials {
    pub id: i64,
    pub digest: String,
}

impl fmt::Debug for StoredCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredCredentials")
            .field("id", &self.id)
            .field("digest", &"**redacted**")
            .finish()
    }
}

// Dados para login do cliente (o "login" é o telefone)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CustomerTokenPayload {
    #[validate(length(min = 1, message = "O login é obrigatório."))]
    pub login: String,
    #[validate(length(min = 1, message = "A senha é obrigatória."))]
    pub password: String,
}

// Dados para login do gerente
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ManagerTokenPayload {
    #[validate(length(min = 1, message = "O telefone é obrigatório."))]
    pub phone: String,
    #[validate(length(min = 1, message = "A senha é obrigatória."))]
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ValidateTokenPayload {
    pub token: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    pub status: String,
    pub token: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidateTokenResponse {
    pub status: String,
    pub customer_id: i64,
}
