//! Order lookup by serial number.

use std::collections::HashMap;
use std::sync::RwLock;

use loyalty_core::OrderSn;
use loyalty_points::{OrderDirectory, OrderLookupError, OrderSnapshot};

/// In-memory order directory (tests/dev/replay).
#[derive(Debug, Default)]
pub struct InMemoryOrderDirectory {
    orders: RwLock<HashMap<OrderSn, OrderSnapshot>>,
}

impl InMemoryOrderDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an order.
    pub fn upsert(&self, order: OrderSnapshot) -> Result<(), OrderLookupError> {
        let mut orders = self
            .orders
            .write()
            .map_err(|_| OrderLookupError::Unavailable("lock poisoned".to_string()))?;
        orders.insert(order.sn.clone(), order);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.orders.read().map(|o| o.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl OrderDirectory for InMemoryOrderDirectory {
    fn find_by_sn(&self, sn: &OrderSn) -> Result<OrderSnapshot, OrderLookupError> {
        let orders = self
            .orders
            .read()
            .map_err(|_| OrderLookupError::Unavailable("lock poisoned".to_string()))?;
        orders
            .get(sn)
            .cloned()
            .ok_or_else(|| OrderLookupError::NotFound(sn.clone()))
    }
}
