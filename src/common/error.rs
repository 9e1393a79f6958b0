// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Conjunto fechado de falhas. Cada fronteira (serviços, HTTP) faz `match`
// exaustivo nele em vez de comparar erros "sentinela".
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Registro não encontrado")]
    NotFound,

    // Identificador ou token desconhecido. Token malformado cai aqui também.
    #[error("Usuário não encontrado")]
    NoSuchUser,

    #[error("Senha inválida")]
    InvalidPassword,

    #[error("Token expirado")]
    ExpiredToken,

    // Reserva recusada: estoque insuficiente, produto inativo ou inexistente.
    #[error("Estoque insuficiente")]
    InsufficientStock,

    #[error("Posição de venda inválida: {0}")]
    InvalidSalePosition(String),

    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Autenticação necessária")]
    Unauthenticated,

    #[error("Acesso negado")]
    Forbidden,

    #[error("Telefone já cadastrado")]
    PhoneAlreadyRegistered,

    // Falha de infraestrutura. O detalhe vai só para o log, nunca para o cliente.
    #[error("Erro interno: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(e: bcrypt::BcryptError) -> Self {
        AppError::Internal(format!("bcrypt: {}", e))
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(e: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("task: {}", e))
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound | AppError::NoSuchUser => StatusCode::NOT_FOUND,
            AppError::InvalidPassword | AppError::ExpiredToken | AppError::Unauthenticated => {
                StatusCode::UNAUTHORIZED
            }
            AppError::InsufficientStock | AppError::PhoneAlreadyRegistered => StatusCode::CONFLICT,
            AppError::InvalidSalePosition(_) | AppError::ValidationError(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let error_message = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors.iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (status, body).into_response();
            }
            AppError::NotFound => "Registro não encontrado.".to_string(),
            AppError::NoSuchUser => "Usuário ou token não encontrado.".to_string(),
            AppError::InvalidPassword => "Senha inválida.".to_string(),
            AppError::ExpiredToken => "Token expirado.".to_string(),
            AppError::InsufficientStock => "Estoque insuficiente para a venda.".to_string(),
            AppError::InvalidSalePosition(reason) => format!("Posição de venda inválida: {}", reason),
            AppError::Unauthenticated => "Token de autenticação inválido ou ausente.".to_string(),
            AppError::Forbidden => "Acesso restrito a administradores.".to_string(),
            AppError::PhoneAlreadyRegistered => "Este telefone já está em uso.".to_string(),
            AppError::Internal(detail) => {
                tracing::error!("Erro Interno do Servidor: {}", detail);
                "Ocorreu um erro inesperado.".to_string()
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_failures_keep_distinct_statuses() {
        assert_eq!(AppError::NoSuchUser.status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::ExpiredToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::InvalidPassword.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn storage_faults_become_internal() {
        let err: AppError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, AppError::Internal(_)));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn internal_detail_is_not_sent_to_client() {
        let response = AppError::Internal("senha do banco: hunter2".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn insufficient_stock_is_a_conflict() {
        assert_eq!(AppError::InsufficientStock.status(), StatusCode::CONFLICT);
    }
}
