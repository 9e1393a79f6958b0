pub mod credential_repo;
pub use credential_repo::{CredentialStore, PgCredentialRepository};
pub mod token_repo;
pub use token_repo::{PgTokenRepository, TokenStore};
pub mod sales_repo;
pub use sales_repo::{PgSalesRepository, SaleTransaction, SalesStore, StockLedger};
pub mod customer_repo;
pub use customer_repo::CustomerRepository;
pub mod product_repo;
pub use product_repo::ProductRepository;
pub mod manager_repo;
pub use manager_repo::ManagerRepository;

#[cfg(test)]
pub mod memory;
#[cfg(test)]
pub use memory::MemoryStore;

#[cfg(test)]
pub use credential_repo::MockCredentialStore;
#[cfg(test)]
pub use token_repo::MockTokenStore;
