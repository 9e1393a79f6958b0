// src/handlers/managers.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::{error::AppError, hashing::PasswordHasher},
    config::AppState,
    middleware::auth::AuthenticatedManager,
    models::{
        auth::{Principal, TokenResponse},
        managers::CreateManagerPayload,
    },
};

// ---
// Handler: cadastro de gerente (só um gerente admin pode)
// Devolve o primeiro token do novo gerente.
// ---
#[utoipa::path(
    post,
    path = "/api/managers",
    tag = "Managers",
    request_body = CreateManagerPayload,
    responses(
        (status = 201, description = "Gerente criado", body = TokenResponse),
        (status = 401, description = "Gerente não autenticado"),
        (status = 403, description = "Gerente sem permissão de admin"),
        (status = 409, description = "Telefone já cadastrado")
    ),
    security(("api_token" = []))
)]
pub async fn create_manager(
    State(app_state): State<AppState>,
    AuthenticatedManager(caller_id): AuthenticatedManager,
    Json(payload): Json<CreateManagerPayload>,
) -> Result<impl IntoResponse, AppError> {
    if !app_state.manager_repo.is_admin(caller_id).await? {
        return Err(AppError::Forbidden);
    }

    payload.validate()?;

    let password_hash = app_state.hasher.hash(&payload.password).await?;

    let manager = app_state
        .manager_repo
        .create(&payload.name, &payload.phone, &password_hash, payload.is_admin)
        .await?;

    tracing::info!(manager_id = manager.id, created_by = caller_id, is_admin = manager.is_admin, "Gerente criado");

    let token = app_state
        .token_service
        .issue_for(Principal::Manager, manager.id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(TokenResponse {
            status: "ok".to_string(),
            token,
        }),
    ))
}
