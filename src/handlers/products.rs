// src/handlers/products.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedManager,
    models::products::{Product, SaveProductPayload},
};

#[utoipa::path(
    post,
    path = "/api/managers/products",
    tag = "Products",
    request_body = SaveProductPayload,
    responses(
        (status = 200, description = "Produto salvo", body = Product),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Produto não encontrado (atualização)")
    ),
    security(("api_token" = []))
)]
pub async fn save_product(
    State(app_state): State<AppState>,
    AuthenticatedManager(manager_id): AuthenticatedManager,
    Json(payload): Json<SaveProductPayload>,
) -> Result<Json<Product>, AppError> {
    payload.validate()?;

    let product = app_state
        .product_repo
        .save(payload.id, &payload.name, payload.price, payload.qty)
        .await?;

    tracing::info!(product_id = product.id, manager_id, qty = product.qty, "Produto salvo");
    Ok(Json(product))
}

#[utoipa::path(
    get,
    path = "/api/managers/products",
    tag = "Products",
    responses(
        (status = 200, description = "Produtos ativos", body = Vec<Product>)
    ),
    security(("api_token" = []))
)]
pub async fn list_products(
    State(app_state): State<AppState>,
    _manager: AuthenticatedManager,
) -> Result<Json<Vec<Product>>, AppError> {
    let products = app_state.product_repo.list_active().await?;
    Ok(Json(products))
}

#[utoipa::path(
    delete,
    path = "/api/managers/products/{id}",
    tag = "Products",
    params(("id" = i64, Path, description = "ID do produto")),
    responses(
        (status = 204, description = "Produto removido"),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_token" = []))
)]
pub async fn remove_product(
    State(app_state): State<AppState>,
    AuthenticatedManager(manager_id): AuthenticatedManager,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    app_state.product_repo.remove(id).await?;
    tracing::info!(product_id = id, manager_id, "Produto removido");
    Ok(StatusCode::NO_CONTENT)
}
