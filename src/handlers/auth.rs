// src/handlers/auth.rs

use axum::{extract::State, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::auth::{
        CustomerTokenPayload, ManagerTokenPayload, Principal, TokenResponse, ValidateTokenPayload,
        ValidateTokenResponse,
    },
};

const STATUS_OK: &str = "ok";

// ---
// Handler: login do cliente
// ---
#[utoipa::path(
    post,
    path = "/api/customers/token",
    tag = "Auth",
    request_body = CustomerTokenPayload,
    responses(
        (status = 200, description = "Token emitido", body = TokenResponse),
        (status = 401, description = "Senha inválida"),
        (status = 404, description = "Cliente não encontrado")
    )
)]
pub async fn customer_token(
    State(app_state): State<AppState>,
    Json(payload): Json<CustomerTokenPayload>,
) -> Result<Json<TokenResponse>, AppError> {
    payload.validate()?;

    let token = app_state
        .token_service
        .issue(Principal::Customer, &payload.login, &payload.password)
        .await?;

    Ok(Json(TokenResponse {
        status: STATUS_OK.to_string(),
        token,
    }))
}

// ---
// Handler: validação do token do cliente
// Aqui o token desconhecido NÃO é anônimo: responde 404, e o expirado 401.
// ---
#[utoipa::path(
    post,
    path = "/api/customers/token/validate",
    tag = "Auth",
    request_body = ValidateTokenPayload,
    responses(
        (status = 200, description = "Token válido", body = ValidateTokenResponse),
        (status = 401, description = "Token expirado"),
        (status = 404, description = "Token desconhecido")
    )
)]
pub async fn validate_customer_token(
    State(app_state): State<AppState>,
    Json(payload): Json<ValidateTokenPayload>,
) -> Result<Json<ValidateTokenResponse>, AppError> {
    let customer_id = app_state
        .token_service
        .resolve(Principal::Customer, &payload.token)
        .await?;

    Ok(Json(ValidateTokenResponse {
        status: STATUS_OK.to_string(),
        customer_id,
    }))
}

// ---
// Handler: login do gerente
// ---
#[utoipa::path(
    post,
    path = "/api/managers/token",
    tag = "Auth",
    request_body = ManagerTokenPayload,
    responses(
        (status = 200, description = "Token emitido", body = TokenResponse),
        (status = 401, description = "Senha inválida"),
        (status = 404, description = "Gerente não encontrado")
    )
)]
pub async fn manager_token(
    State(app_state): State<AppState>,
    Json(payload): Json<ManagerTokenPayload>,
) -> Result<Json<TokenResponse>, AppError> {
    payload.validate()?;

    let token = app_state
        .token_service
        .issue(Principal::Manager, &payload.phone, &payload.password)
        .await?;

    Ok(Json(TokenResponse {
        status: STATUS_OK.to_string(),
        token,
    }))
}
