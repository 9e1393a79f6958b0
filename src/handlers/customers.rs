// src/handlers/customers.rs

use axum::{
    extract::{Path, State},
    Json,
};
use validator::Validate;

use crate::{
    common::{error::AppError, hashing::PasswordHasher},
    config::AppState,
    middleware::auth::{AuthenticatedManager, ManagerIdentity},
    models::customers::{Customer, SaveCustomerPayload},
};

// Cadastro (id == 0) é público; atualizar um cliente existente exige gerente
fn authorize_customer_save(id: i64, identity: ManagerIdentity) -> Result<(), AppError> {
    match (id, identity) {
        (0, _) => Ok(()),
        (_, ManagerIdentity(Some(_))) => Ok(()),
        (_, ManagerIdentity(None)) => Err(AppError::Unauthenticated),
    }
}

// ---
// Handler: cadastro (público) / atualização (gerente) de cliente
// ---
#[utoipa::path(
    post,
    path = "/api/customers",
    tag = "Customers",
    request_body = SaveCustomerPayload,
    responses(
        (status = 200, description = "Cliente salvo", body = Customer),
        (status = 400, description = "Dados inválidos"),
        (status = 401, description = "Atualização sem gerente autenticado"),
        (status = 404, description = "Cliente não encontrado (atualização)"),
        (status = 409, description = "Telefone já cadastrado")
    ),
    security((), ("api_token" = []))
)]
pub async fn save_customer(
    State(app_state): State<AppState>,
    identity: ManagerIdentity,
    Json(payload): Json<SaveCustomerPayload>,
) -> Result<Json<Customer>, AppError> {
    authorize_customer_save(payload.id, identity)?;
    payload.validate()?;

    let password_hash = app_state.hasher.hash(&payload.password).await?;

    let customer = app_state
        .customer_repo
        .save(payload.id, &payload.name, &payload.phone, &password_hash)
        .await?;

    tracing::info!(customer_id = customer.id, manager_id = ?identity.0, "Cliente salvo");
    Ok(Json(customer))
}

#[utoipa::path(
    get,
    path = "/api/customers",
    tag = "Customers",
    responses(
        (status = 200, description = "Todos os clientes", body = Vec<Customer>),
        (status = 401, description = "Gerente não autenticado")
    ),
    security(("api_token" = []))
)]
pub async fn list_customers(
    State(app_state): State<AppState>,
    _manager: AuthenticatedManager,
) -> Result<Json<Vec<Customer>>, AppError> {
    let customers = app_state.customer_repo.all().await?;
    Ok(Json(customers))
}

#[utoipa::path(
    get,
    path = "/api/customers/active",
    tag = "Customers",
    responses(
        (status = 200, description = "Clientes ativos", body = Vec<Customer>),
        (status = 401, description = "Gerente não autenticado")
    ),
    security(("api_token" = []))
)]
pub async fn list_active_customers(
    State(app_state): State<AppState>,
    _manager: AuthenticatedManager,
) -> Result<Json<Vec<Customer>>, AppError> {
    let customers = app_state.customer_repo.all_active().await?;
    Ok(Json(customers))
}

#[utoipa::path(
    get,
    path = "/api/customers/{id}",
    tag = "Customers",
    params(("id" = i64, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente", body = Customer),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_token" = []))
)]
pub async fn get_customer(
    State(app_state): State<AppState>,
    _manager: AuthenticatedManager,
    Path(id): Path<i64>,
) -> Result<Json<Customer>, AppError> {
    let customer = app_state.customer_repo.by_id(id).await?;
    Ok(Json(customer))
}

#[utoipa::path(
    delete,
    path = "/api/customers/{id}",
    tag = "Customers",
    params(("id" = i64, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente removido", body = Customer),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_token" = []))
)]
pub async fn delete_customer(
    State(app_state): State<AppState>,
    AuthenticatedManager(manager_id): AuthenticatedManager,
    Path(id): Path<i64>,
) -> Result<Json<Customer>, AppError> {
    let customer = app_state.customer_repo.delete(id).await?;
    tracing::info!(customer_id = id, manager_id, "Cliente removido");
    Ok(Json(customer))
}

#[utoipa::path(
    post,
    path = "/api/customers/{id}/block",
    tag = "Customers",
    params(("id" = i64, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente bloqueado", body = Customer),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_token" = []))
)]
pub async fn block_customer(
    State(app_state): State<AppState>,
    AuthenticatedManager(manager_id): AuthenticatedManager,
    Path(id): Path<i64>,
) -> Result<Json<Customer>, AppError> {
    let customer = app_state.customer_repo.change_active(id, false).await?;
    tracing::info!(customer_id = id, manager_id, "Cliente bloqueado");
    Ok(Json(customer))
}

#[utoipa::path(
    delete,
    path = "/api/customers/{id}/block",
    tag = "Customers",
    params(("id" = i64, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente desbloqueado", body = Customer),
        (status = 404, description = "Cliente não encontrado")
    ),
    security(("api_token" = []))
)]
pub async fn unblock_customer(
    State(app_state): State<AppState>,
    AuthenticatedManager(manager_id): AuthenticatedManager,
    Path(id): Path<i64>,
) -> Result<Json<Customer>, AppError> {
    let customer = app_state.customer_repo.change_active(id, true).await?;
    tracing::info!(customer_id = id, manager_id, "Cliente desbloqueado");
    Ok(Json(customer))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anyone_can_register_a_new_customer() {
        assert!(authorize_customer_save(0, ManagerIdentity(None)).is_ok());
        assert!(authorize_customer_save(0, ManagerIdentity(Some(1))).is_ok());
    }

    #[test]
    fn updating_an_existing_customer_needs_a_manager() {
        let err = authorize_customer_save(42, ManagerIdentity(None)).unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated));

        assert!(authorize_customer_save(42, ManagerIdentity(Some(1))).is_ok());
    }
}
