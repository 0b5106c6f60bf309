//! Bill number generation
//!
//! The next number is derived from the most recently created bill. Reading
//! the latest bill and computing its successor is not atomic: two concurrent
//! creations can draw the same number, and the store's uniqueness constraint
//! rejects the second insert.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::bill_number::BillNumber;
use crate::error::BillingError;
use crate::ports::BillStore;

/// Supplies the bill number for the next created bill
#[async_trait]
pub trait BillNumberSource: Send + Sync {
    /// Returns a fresh bill number without reserving it
    async fn next_bill_number(&self) -> Result<BillNumber, BillingError>;
}

/// Derives the next bill number from the latest stored bill
#[derive(Clone)]
pub struct StoreSequence {
    store: Arc<dyn BillStore>,
}

impl StoreSequence {
    pub fn new(store: Arc<dyn BillStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BillNumberSource for StoreSequence {
    async fn next_bill_number(&self) -> Result<BillNumber, BillingError> {
        let latest = self
            .store
            .find_latest()
            .await
            .map_err(|e| BillingError::internal(format!("Failed to read latest bill: {}", e)))?;

        let last_number = latest.as_ref().map(|bill| &bill.bill_number);
        let next = BillNumber::following(last_number)?;

        debug!(last = ?last_number.map(ToString::to_string), next = %next, "Generated bill number");
        Ok(next)
    }
}
