pub mod error;
pub mod hashing;
