// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};

use crate::{common::error::AppError, config::AppState, models::auth::Principal};

// Resultado da identificação do gerente, guardado nos "extensions".
// `None` = requisição anônima.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManagerIdentity(pub Option<i64>);

// Lê "Authorization: Bearer <token>". Cabeçalho ausente ou em outro formato vira None.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .typed_get::<Authorization<Bearer>>()
        .map(|auth| auth.token().to_string())
}

// Middleware de identificação. Não barra anônimos: quem exige gerente é o
// extrator `AuthenticatedManager`. Token expirado é recusado aqui mesmo.
pub async fn identify_manager(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers());

    let manager_id = app_state
        .token_service
        .identify(Principal::Manager, token.as_deref())
        .await?;

    request.extensions_mut().insert(ManagerIdentity(manager_id));
    Ok(next.run(request).await)
}

// Rotas que aceitam anônimo leem a identidade direto; sem o middleware na
// rota, a requisição conta como anônima.
impl<S> FromRequestParts<S> for ManagerIdentity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<ManagerIdentity>()
            .copied()
            .unwrap_or(ManagerIdentity(None)))
    }
}

// Extrator para obter o gerente autenticado diretamente nos handlers
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedManager(pub i64);

impl<S> FromRequestParts<S> for AuthenticatedManager
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<ManagerIdentity>() {
            Some(ManagerIdentity(Some(id))) => Ok(AuthenticatedManager(*id)),
            _ => Err(AppError::Unauthenticated),
        }
    }
}
