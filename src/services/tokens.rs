// src/services/tokens.rs

use chrono::{DateTime, Duration, Utc};
use rand::{RngCore, rngs::OsRng};

use crate::{
    common::{error::AppError, hashing::PasswordHasher},
    db::{CredentialStore, TokenStore},
    models::auth::{Principal, Token},
    services::credentials::CredentialVerifier,
};

// 32 bytes aleatórios = 64 caracteres hex
pub const TOKEN_BYTES: usize = 32;

pub fn generate_token_value() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Emissão e resolução de tokens opacos com prazo de validade.
#[derive(Clone)]
pub struct TokenService<T, C, H> {
    tokens: T,
    verifier: CredentialVerifier<C, H>,
    ttl: Duration,
}

impl<T, C, H> TokenService<T, C, H>
where
    T: TokenStore,
    C: CredentialStore,
    H: PasswordHasher,
{
    pub fn new(tokens: T, verifier: CredentialVerifier<C, H>, ttl: Duration) -> Self {
        Self { tokens, verifier, ttl }
    }

    /// Confere as credenciais e emite um token novo. Os tokens anteriores
    /// do mesmo sujeito continuam válidos até expirar.
    pub async fn issue(&self, principal: Principal, phone: &str, secret: &str) -> Result<String, AppError> {
        let subject_id = self.verifier.verify(principal, phone, secret).await?;
        self.issue_for(principal, subject_id).await
    }

    /// Emite um token para um sujeito já autenticado por outro caminho
    /// (por exemplo, logo após o cadastro do gerente).
    pub async fn issue_for(&self, principal: Principal, subject_id: i64) -> Result<String, AppError> {
        let issued_at = Utc::now();
        let token = Token {
            value: generate_token_value(),
            subject_id,
            issued_at,
            expires_at: issued_at + self.ttl,
        };

        self.tokens.insert_token(principal, &token).await?;

        tracing::info!(
            principal = principal.label(),
            subject_id,
            expires_at = %token.expires_at,
            "Token emitido"
        );

        Ok(token.value)
    }

    pub async fn resolve(&self, principal: Principal, value: &str) -> Result<i64, AppError> {
        self.resolve_at(principal, value, Utc::now()).await
    }

    pub async fn resolve_at(
        &self,
        principal: Principal,
        value: &str,
        now: DateTime<Utc>,
    ) -> Result<i64, AppError> {
        let token = self
            .tokens
            .find_token(principal, value)
            .await?
            .ok_or(AppError::NoSuchUser)?;

        if token.is_expired_at(now) {
            tracing::debug!(principal = principal.label(), subject_id = token.subject_id, "Token expirado");
            return Err(AppError::ExpiredToken);
        }

        Ok(token.subject_id)
    }

    /// Identificação usada pelo middleware: sem token, ou token
    /// desconhecido, a requisição segue como anônima (`Ok(None)`).
    /// Token expirado ou falha de armazenamento barram a requisição.
    pub async fn identify(&self, principal: Principal, value: Option<&str>) -> Result<Option<i64>, AppError> {
        let Some(value) = value else {
            return Ok(None);
        };

        match self.resolve(principal, value).await {
            Ok(subject_id) => Ok(Some(subject_id)),
            Err(AppError::NoSuchUser) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::{
        common::hashing::BcryptHasher,
        db::{MemoryStore, MockTokenStore},
    };

    const PHONE: &str = "+992000000001";
    const PASSWORD: &str = "secret";

    type MemoryTokenService = TokenService<MemoryStore, MemoryStore, BcryptHasher>;

    async fn service(ttl: Duration) -> (MemoryTokenService, MemoryStore, i64) {
        let hasher = BcryptHasher::with_cost(4);
        let store = MemoryStore::new();
        let digest = hasher.hash(PASSWORD).await.unwrap();
        let id = store.add_credentials(Principal::Customer, PHONE, &digest).await;

        let verifier = CredentialVerifier::new(store.clone(), hasher).await.unwrap();
        (TokenService::new(store.clone(), verifier, ttl), store, id)
    }

    #[test]
    fn token_value_is_64_hex_chars() {
        let value = generate_token_value();
        assert_eq!(value.len(), TOKEN_BYTES * 2);
        assert!(value.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn issue_then_resolve() {
        let (svc, _, id) = service(Duration::hours(1)).await;

        let token = svc.issue(Principal::Customer, PHONE, PASSWORD).await.unwrap();
        assert_eq!(svc.resolve(Principal::Customer, &token).await.unwrap(), id);
    }

    #[tokio::test]
    async fn failed_login_does_not_create_token() {
        let (svc, store, _) = service(Duration::hours(1)).await;

        let err = svc.issue(Principal::Customer, PHONE, "errada").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidPassword));

        let err = svc.issue(Principal::Customer, "+992123", PASSWORD).await.unwrap_err();
        assert!(matches!(err, AppError::NoSuchUser));

        assert_eq!(store.token_count(Principal::Customer).await, 0);
    }

    #[tokio::test]
    async fn customer_token_is_not_a_manager_token() {
        let (svc, _, _) = service(Duration::hours(1)).await;

        let token = svc.issue(Principal::Customer, PHONE, PASSWORD).await.unwrap();
        let err = svc.resolve(Principal::Manager, &token).await.unwrap_err();
        assert!(matches!(err, AppError::NoSuchUser));
    }

    #[tokio::test]
    async fn unknown_token_is_no_such_user() {
        let (svc, _, _) = service(Duration::hours(1)).await;

        let err = svc.resolve(Principal::Customer, &generate_token_value()).await.unwrap_err();
        assert!(matches!(err, AppError::NoSuchUser));
    }

    #[tokio::test]
    async fn every_issue_returns_a_fresh_token() {
        let (svc, store, id) = service(Duration::hours(1)).await;

        let mut seen = HashSet::new();
        for _ in 0..5 {
            let token = svc.issue(Principal::Customer, PHONE, PASSWORD).await.unwrap();
            assert!(seen.insert(token));
        }

        // Os anteriores continuam válidos
        for token in &seen {
            assert_eq!(svc.resolve(Principal::Customer, token).await.unwrap(), id);
        }
        assert_eq!(store.token_count(Principal::Customer).await, 5);
    }

    #[tokio::test]
    async fn token_expires_after_ttl() {
        let (svc, _, _) = service(Duration::seconds(1)).await;

        let token = svc.issue(Principal::Customer, PHONE, PASSWORD).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_secs(2)).await;

        let err = svc.resolve(Principal::Customer, &token).await.unwrap_err();
        assert!(matches!(err, AppError::ExpiredToken));
    }

    #[tokio::test]
    async fn expired_token_stays_expired() {
        let (svc, _, id) = service(Duration::minutes(10)).await;
        let token = svc.issue(Principal::Customer, PHONE, PASSWORD).await.unwrap();

        let now = Utc::now();
        assert_eq!(svc.resolve_at(Principal::Customer, &token, now).await.unwrap(), id);

        let later = now + Duration::minutes(11);
        for step in 0..3 {
            let at = later + Duration::minutes(step);
            let err = svc.resolve_at(Principal::Customer, &token, at).await.unwrap_err();
            assert!(matches!(err, AppError::ExpiredToken));
        }
    }

    #[tokio::test]
    async fn identify_treats_missing_and_unknown_tokens_as_anonymous() {
        let (svc, _, id) = service(Duration::hours(1)).await;

        assert_eq!(svc.identify(Principal::Customer, None).await.unwrap(), None);
        assert_eq!(svc.identify(Principal::Customer, Some("desconhecido")).await.unwrap(), None);

        let token = svc.issue(Principal::Customer, PHONE, PASSWORD).await.unwrap();
        assert_eq!(svc.identify(Principal::Customer, Some(&token)).await.unwrap(), Some(id));
    }

    #[tokio::test]
    async fn identify_rejects_expired_token() {
        let (svc, _, _) = service(Duration::seconds(-1)).await;

        let token = svc.issue(Principal::Customer, PHONE, PASSWORD).await.unwrap();
        let err = svc.identify(Principal::Customer, Some(&token)).await.unwrap_err();
        assert!(matches!(err, AppError::ExpiredToken));
    }

    #[tokio::test]
    async fn storage_fault_is_internal() {
        let mut tokens = MockTokenStore::new();
        tokens
            .expect_find_token()
            .returning(|_, _| Err(AppError::Internal("timeout".into())));

        let verifier = CredentialVerifier::new(MemoryStore::new(), BcryptHasher::with_cost(4))
            .await
            .unwrap();
        let svc = TokenService::new(tokens, verifier, Duration::hours(1));

        let err = svc.resolve(Principal::Manager, "x").await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));

        let err = svc.identify(Principal::Manager, Some("x")).await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }
}
