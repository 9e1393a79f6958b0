pub mod credentials;
pub mod inventory;
pub mod sales;
pub mod tokens;
