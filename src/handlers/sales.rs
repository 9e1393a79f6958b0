// src/handlers/sales.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedManager,
    models::sales::{CreateSalePayload, Sale, SalesTotal},
};

// ---
// Handler: registra a venda com o gerente autenticado como vendedor
// ---
#[utoipa::path(
    post,
    path = "/api/managers/sales",
    tag = "Sales",
    request_body = CreateSalePayload,
    responses(
        (status = 201, description = "Venda registrada", body = Sale),
        (status = 400, description = "Posição inválida"),
        (status = 404, description = "Cliente não encontrado"),
        (status = 409, description = "Estoque insuficiente")
    ),
    security(("api_token" = []))
)]
pub async fn create_sale(
    State(app_state): State<AppState>,
    AuthenticatedManager(manager_id): AuthenticatedManager,
    Json(payload): Json<CreateSalePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let sale = app_state
        .sale_processor
        .create_sale(manager_id, payload.customer_id, &payload.positions)
        .await?;

    Ok((StatusCode::CREATED, Json(sale)))
}

#[utoipa::path(
    get,
    path = "/api/managers/sales",
    tag = "Sales",
    responses(
        (status = 200, description = "Total vendido pelo gerente", body = SalesTotal)
    ),
    security(("api_token" = []))
)]
pub async fn total_sales(
    State(app_state): State<AppState>,
    AuthenticatedManager(manager_id): AuthenticatedManager,
) -> Result<Json<SalesTotal>, AppError> {
    let total = app_state.sale_processor.total_sales(manager_id).await?;
    Ok(Json(SalesTotal { manager_id, total }))
}
