//! In-memory products gateway.
//!
//! Backs tests and offline runs. Insertion order is preserved so list
//! results are deterministic. Each operation can be forced to fail and is
//! counted, which lets callers assert that a code path never reached the
//! network.

use super::{FieldViolation, GatewayError, GatewayOp, GatewayResult, ProductsGateway};
use crate::model::product::{Product, ProductUpdate};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct MemoryState {
    products: Vec<Product>,
    failures: BTreeMap<GatewayOp, GatewayError>,
    calls: BTreeMap<GatewayOp, usize>,
}

/// Mutex-guarded product store implementing [`ProductsGateway`].
#[derive(Default)]
pub struct InMemoryProductsGateway {
    state: Mutex<MemoryState>,
}

impl InMemoryProductsGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a gateway pre-populated with `products`.
    pub fn with_products(products: Vec<Product>) -> Self {
        let gateway = Self::default();
        gateway.lock().products = products;
        gateway
    }

    /// Replaces the stored catalog.
    pub fn set_products(&self, products: Vec<Product>) {
        self.lock().products = products;
    }

    /// Returns a snapshot of the stored catalog.
    pub fn products(&self) -> Vec<Product> {
        self.lock().products.clone()
    }

    /// Forces every subsequent call of `op` to fail with `error`.
    pub fn fail(&self, op: GatewayOp, error: GatewayError) {
        self.lock().failures.insert(op, error);
    }

    /// Removes all injected failures.
    pub fn clear_failures(&self) {
        self.lock().failures.clear();
    }

    /// Number of times `op` was invoked, failed calls included.
    pub fn calls(&self, op: GatewayOp) -> usize {
        self.lock().calls.get(&op).copied().unwrap_or(0)
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        // A poisoned store only means a test panicked mid-call; the data is
        // still a plain Vec and safe to reuse.
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn enter(&self, op: GatewayOp) -> GatewayResult<MutexGuard<'_, MemoryState>> {
        let mut state = self.lock();
        *state.calls.entry(op).or_insert(0) += 1;
        if let Some(error) = state.failures.get(&op) {
            return Err(error.clone());
        }
        Ok(state)
    }
}

#[async_trait]
impl ProductsGateway for InMemoryProductsGateway {
    async fn list(&self) -> GatewayResult<Vec<Product>> {
        let state = self.enter(GatewayOp::List)?;
        Ok(state.products.clone())
    }

    async fn create(&self, product: &Product) -> GatewayResult<Product> {
        let mut state = self.enter(GatewayOp::Create)?;
        if state.products.iter().any(|stored| stored.id == product.id) {
            return Err(GatewayError::rejected_with(vec![FieldViolation::new(
                "id",
                "id already exists",
            )]));
        }
        state.products.push(product.clone());
        Ok(product.clone())
    }

    async fn update(&self, id: &str, update: &ProductUpdate) -> GatewayResult<()> {
        let mut state = self.enter(GatewayOp::Update)?;
        let slot = state
            .products
            .iter_mut()
            .find(|stored| stored.id == id)
            .ok_or_else(|| GatewayError::NotFound(id.to_string()))?;
        *slot = update.clone().with_id(id);
        Ok(())
    }

    async fn delete(&self, id: &str) -> GatewayResult<()> {
        let mut state = self.enter(GatewayOp::Delete)?;
        let before = state.products.len();
        state.products.retain(|stored| stored.id != id);
        if state.products.len() == before {
            return Err(GatewayError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn verify_id_exists(&self, id: &str) -> GatewayResult<bool> {
        let state = self.enter(GatewayOp::VerifyId)?;
        Ok(state.products.iter().any(|stored| stored.id == id))
    }
}
