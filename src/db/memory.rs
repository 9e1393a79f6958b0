// src/db/memory.rs
//
// Armazenamento em memória para os testes. Implementa as mesmas portas do
// Postgres. Uma transação segura o mutex do estado inteiro até o commit (ou
// o drop) e trabalha numa cópia: sem commit, a cópia é descartada.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::{
    common::error::AppError,
    db::{CredentialStore, SaleTransaction, SalesStore, StockLedger, TokenStore},
    models::{
        auth::{Principal, StoredCredentials, Token},
        products::Product,
        sales::{checked_sum, NewSalePosition, SaleHeader, SalePosition, StockLevel},
    },
};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    credentials: HashMap<(Principal, String), StoredCredentials>,
    tokens: HashMap<(Principal, String), Token>,
    products: BTreeMap<i64, Product>,
    sales: Vec<SaleHeader>,
    positions: Vec<SalePosition>,
    last_id: i64,
}

impl MemoryState {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_credentials(&self, principal: Principal, phone: &str, digest: &str) -> i64 {
        let mut state = self.state.lock().await;
        let id = state.next_id();
        state.credentials.insert(
            (principal, phone.to_string()),
            StoredCredentials { id, digest: digest.to_string() },
        );
        id
    }

    pub async fn add_product(&self, name: &str, price: i64, qty: i64, active: bool) -> i64 {
        let mut state = self.state.lock().await;
        let id = state.next_id();
        state.products.insert(
            id,
            Product {
                id,
                name: name.to_string(),
                price,
                qty,
                active,
                created: Utc::now(),
            },
        );
        id
    }

    pub async fn product(&self, id: i64) -> Option<Product> {
        self.state.lock().await.products.get(&id).cloned()
    }

    pub async fn sale_count(&self) -> usize {
        self.state.lock().await.sales.len()
    }

    pub async fn position_count(&self) -> usize {
        self.state.lock().await.positions.len()
    }

    pub async fn token_count(&self, principal: Principal) -> usize {
        self.state
            .lock()
            .await
            .tokens
            .keys()
            .filter(|(p, _)| *p == principal)
            .count()
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn find_credentials(
        &self,
        principal: Principal,
        phone: &str,
    ) -> Result<Option<StoredCredentials>, AppError> {
        let state = self.state.lock().await;
        Ok(state.credentials.get(&(principal, phone.to_string())).cloned())
    }
}

#[async_trait]
impl TokenStore for MemoryStore {
    async fn insert_token(&self, principal: Principal, token: &Token) -> Result<(), AppError> {
        let mut state = self.state.lock().await;
        let key = (principal, token.value.clone());
        if state.tokens.contains_key(&key) {
            return Err(AppError::Internal("token duplicado".into()));
        }
        state.tokens.insert(key, token.clone());
        Ok(())
    }

    async fn find_token(&self, principal: Principal, value: &str) -> Result<Option<Token>, AppError> {
        let state = self.state.lock().await;
        Ok(state.tokens.get(&(principal, value.to_string())).cloned())
    }
}

pub struct MemoryTransaction {
    guard: OwnedMutexGuard<MemoryState>,
    working: MemoryState,
}

#[async_trait]
impl SalesStore for MemoryStore {
    type Tx = MemoryTransaction;

    async fn begin(&self) -> Result<Self::Tx, AppError> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let working = (*guard).clone();
        Ok(MemoryTransaction { guard, working })
    }

    async fn total_sales(&self, manager_id: i64) -> Result<i64, AppError> {
        let state = self.state.lock().await;
        let lines = state
            .sales
            .iter()
            .filter(|s| s.manager_id == manager_id)
            .flat_map(|s| state.positions.iter().filter(move |p| p.sale_id == s.id))
            .map(|p| (p.qty, p.price));

        checked_sum(lines).ok_or_else(|| AppError::Internal("total de vendas excede i64".into()))
    }
}

#[async_trait]
impl StockLedger for MemoryTransaction {
    async fn stock_for_update(&mut self, product_id: i64) -> Result<Option<StockLevel>, AppError> {
        Ok(self
            .working
            .products
            .get(&product_id)
            .map(|p| StockLevel { qty: p.qty, active: p.active }))
    }

    async fn write_stock(&mut self, product_id: i64, qty: i64) -> Result<(), AppError> {
        let product = self
            .working
            .products
            .get_mut(&product_id)
            .ok_or(AppError::NotFound)?;
        product.qty = qty;
        Ok(())
    }
}

#[async_trait]
impl SaleTransaction for MemoryTransaction {
    async fn insert_sale(&mut self, manager_id: i64, customer_id: i64) -> Result<SaleHeader, AppError> {
        let header = SaleHeader {
            id: self.working.next_id(),
            manager_id,
            customer_id,
            created: Utc::now(),
        };
        self.working.sales.push(header.clone());
        Ok(header)
    }

    async fn insert_position(
        &mut self,
        sale_id: i64,
        position: &NewSalePosition,
    ) -> Result<SalePosition, AppError> {
        let inserted = SalePosition {
            id: self.working.next_id(),
            sale_id,
            product_id: position.product_id,
            qty: position.qty,
            price: position.price,
            created: Utc::now(),
        };
        self.working.positions.push(inserted.clone());
        Ok(inserted)
    }

    async fn commit(self) -> Result<(), AppError> {
        let MemoryTransaction { mut guard, working } = self;
        *guard = working;
        Ok(())
    }
}
