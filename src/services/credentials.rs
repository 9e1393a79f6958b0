// src/services/credentials.rs

use std::sync::Arc;

use crate::{
    common::{error::AppError, hashing::PasswordHasher},
    db::CredentialStore,
    models::auth::Principal,
};

// Segredo usado só para gerar o hash "isca" (o sal do bcrypt é aleatório).
const DECOY_SECRET: &str = "decoy-secret-never-matches";

/// Confere telefone + senha contra o hash guardado.
///
/// Telefone desconhecido responde `NoSuchUser`; senha errada responde
/// `InvalidPassword`. No primeiro caso ainda roda uma verificação contra um
/// hash isca, gerado já na construção, para os dois caminhos custarem o
/// mesmo tempo desde o primeiro login.
#[derive(Clone)]
pub struct CredentialVerifier<C, H> {
    store: C,
    hasher: H,
    decoy: Arc<str>,
}

impl<C, H> CredentialVerifier<C, H>
where
    C: CredentialStore,
    H: PasswordHasher,
{
    pub async fn new(store: C, hasher: H) -> Result<Self, AppError> {
        let decoy = hasher.hash(DECOY_SECRET).await?;
        Ok(Self {
            store,
            hasher,
            decoy: Arc::from(decoy),
        })
    }

    pub async fn verify(
        &self,
        principal: Principal,
        phone: &str,
        secret: &str,
    ) -> Result<i64, AppError> {
        let credentials = self.store.find_credentials(principal, phone).await?;

        let Some(credentials) = credentials else {
            let _ = self.hasher.verify(secret, &self.decoy).await?;
            tracing::debug!(principal = principal.label(), "Login com telefone desconhecido");
            return Err(AppError::NoSuchUser);
        };

        if !self.hasher.verify(secret, &credentials.digest).await? {
            tracing::debug!(principal = principal.label(), subject_id = credentials.id, "Senha inválida");
            return Err(AppError::InvalidPassword);
        }

        Ok(credentials.id)
    }
}
