// src/common/hashing.rs

use async_trait::async_trait;

use crate::common::error::AppError;

/// Capacidade de hash de mão única injetada nos serviços.
///
/// `verify` devolve `Ok(false)` tanto para senha errada quanto para um
/// digest que o algoritmo não consegue interpretar. `Err` fica reservado
/// para falhas de infraestrutura.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, secret: &str) -> Result<String, AppError>;
    async fn verify(&self, secret: &str, digest: &str) -> Result<bool, AppError>;
}

#[derive(Debug, Clone)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new() -> Self {
        Self { cost: bcrypt::DEFAULT_COST }
    }

    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PasswordHasher for BcryptHasher {
    async fn hash(&self, secret: &str) -> Result<String, AppError> {
        // bcrypt é pesado para a CPU: roda fora das threads do runtime.
        let secret = secret.to_owned();
        let cost = self.cost;
        let digest = tokio::task::spawn_blocking(move || bcrypt::hash(&secret, cost)).await??;
        Ok(digest)
    }

    async fn verify(&self, secret: &str, digest: &str) -> Result<bool, AppError> {
        let secret = secret.to_owned();
        let digest = digest.to_owned();

        let outcome = tokio::task::spawn_blocking(move || bcrypt::verify(&secret, &digest)).await?;

        match outcome {
            Ok(valid) => Ok(valid),
            Err(e) => {
                tracing::debug!("Digest armazenado ilegível: {}", e);
                Ok(false)
            }
        }
    }
}
