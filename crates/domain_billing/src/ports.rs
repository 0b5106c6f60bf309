//! Billing Domain Ports
//!
//! The `BillStore` trait is everything the billing service needs from
//! persistence. Two implementations exist:
//!
//! - **PostgreSQL adapter** (`infra_db::adapters::PostgresBillAdapter`)
//! - **Mock store** (this module, `mock` feature) for tests
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_billing::{BillService, BillStore};
//! use std::sync::Arc;
//!
//! let store: Arc<dyn BillStore> = Arc::new(PostgresBillAdapter::new(pool));
//! let service = BillService::new(store);
//! ```
//!
//! Stores must reject a second bill with an existing bill number with
//! `PortError::Conflict`; that constraint is the only guard against two
//! concurrent creations drawing the same number.

use async_trait::async_trait;

use core_kernel::{BillId, DomainPort, HealthCheckable, PortError};

use crate::bill::{Bill, NewBill};

/// Persistence port for bills
#[async_trait]
pub trait BillStore: DomainPort + HealthCheckable {
    /// Returns the bill with the highest key, if any
    async fn find_latest(&self) -> Result<Option<Bill>, PortError>;

    /// Inserts a bill and returns it with its assigned key
    ///
    /// Fails with `Conflict` when the bill number already exists.
    async fn insert(&self, bill: NewBill) -> Result<Bill, PortError>;

    /// Fetches a bill, failing with `NotFound` when absent
    async fn get(&self, id: BillId) -> Result<Bill, PortError>;

    /// Returns all bills
    async fn list(&self) -> Result<Vec<Bill>, PortError>;

    /// Replaces a stored bill in full, failing with `NotFound` when absent
    async fn replace(&self, bill: &Bill) -> Result<Bill, PortError>;

    /// Removes a bill permanently, failing with `NotFound` when nothing matched
    async fn delete(&self, id: BillId) -> Result<(), PortError>;
}

/// Mock implementation of BillStore for testing
///
/// Keeps bills in memory and enforces the same key and uniqueness rules as
/// the database.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use chrono::Utc;
    use tokio::sync::RwLock;

    use core_kernel::{AdapterHealth, HealthCheckResult};

    #[derive(Debug, Default)]
    struct MockState {
        bills: BTreeMap<BillId, Bill>,
        last_id: i64,
    }

    /// In-memory mock implementation of BillStore
    #[derive(Debug, Default, Clone)]
    pub struct MockBillStore {
        state: Arc<RwLock<MockState>>,
        unavailable: Arc<AtomicBool>,
    }

    impl MockBillStore {
        /// Creates a new empty store
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with bills, keeping their keys
        pub async fn with_bills(bills: Vec<Bill>) -> Self {
            let store = Self::new();
            {
                let mut state = store.state.write().await;
                for bill in bills {
                    state.last_id = state.last_id.max(bill.id.value());
                    state.bills.insert(bill.id, bill);
                }
            }
            store
        }

        /// Makes every subsequent call fail with a connection error
        pub fn set_unavailable(&self, unavailable: bool) {
            self.unavailable.store(unavailable, Ordering::SeqCst);
        }

        /// Number of stored bills
        pub async fn len(&self) -> usize {
            self.state.read().await.bills.len()
        }

        /// Returns true when no bill is stored
        pub async fn is_empty(&self) -> bool {
            self.len().await == 0
        }

        fn check_available(&self) -> Result<(), PortError> {
            if self.unavailable.load(Ordering::SeqCst) {
                Err(PortError::connection("mock bill store unavailable"))
            } else {
                Ok(())
            }
        }
    }

    impl DomainPort for MockBillStore {}

    #[async_trait]
    impl HealthCheckable for MockBillStore {
        async fn health_check(&self) -> HealthCheckResult {
            let status = if self.unavailable.load(Ordering::SeqCst) {
                AdapterHealth::Unhealthy
            } else {
                AdapterHealth::Healthy
            };

            HealthCheckResult {
                adapter_id: "mock-bill-store".to_string(),
                status,
                latency_ms: 0,
                message: None,
                checked_at: Utc::now(),
            }
        }
    }

    #[async_trait]
    impl BillStore for MockBillStore {
        async fn find_latest(&self) -> Result<Option<Bill>, PortError> {
            self.check_available()?;
            Ok(self.state.read().await.bills.values().next_back().cloned())
        }

        async fn insert(&self, bill: NewBill) -> Result<Bill, PortError> {
            self.check_available()?;
            let mut state = self.state.write().await;

            if state.bills.values().any(|b| b.bill_number == bill.bill_number) {
                return Err(PortError::conflict(format!(
                    "Bill with bill_number '{}' already exists",
                    bill.bill_number
                )));
            }

            state.last_id += 1;
            let bill = bill.into_bill(BillId::new(state.last_id));
            state.bills.insert(bill.id, bill.clone());
            Ok(bill)
        }

        async fn get(&self, id: BillId) -> Result<Bill, PortError> {
            self.check_available()?;
            self.state
                .read()
                .await
                .bills
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found(BillId::entity(), id))
        }

        async fn list(&self) -> Result<Vec<Bill>, PortError> {
            self.check_available()?;
            Ok(self.state.read().await.bills.values().cloned().collect())
        }

        async fn replace(&self, bill: &Bill) -> Result<Bill, PortError> {
            self.check_available()?;
            let mut state = self.state.write().await;

            if state
                .bills
                .values()
                .any(|b| b.id != bill.id && b.bill_number == bill.bill_number)
            {
                return Err(PortError::conflict(format!(
                    "Bill with bill_number '{}' already exists",
                    bill.bill_number
                )));
            }

            let stored = state
                .bills
                .get_mut(&bill.id)
                .ok_or_else(|| PortError::not_found(BillId::entity(), bill.id))?;
            *stored = bill.clone();
            Ok(bill.clone())
        }

        async fn delete(&self, id: BillId) -> Result<(), PortError> {
            self.check_available()?;
            self.state
                .write()
                .await
                .bills
                .remove(&id)
                .map(|_| ())
                .ok_or_else(|| PortError::not_found(BillId::entity(), id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::mock::MockBillStore;
    use crate::bill::BillContent;
    use crate::bill_number::BillNumber;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn new_bill(number: BillNumber) -> NewBill {
        let now = Utc::now();
        NewBill {
            bill_number: number,
            content: BillContent::default(),
            total: Decimal::ZERO,
            bill_date: now,
            created_by: "tester".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_mock_insert_assigns_increasing_keys() {
        let store = MockBillStore::new();
        let first = store.insert(new_bill(BillNumber::FIRST)).await.unwrap();
        let second = store
            .insert(new_bill(BillNumber::new(1, 2).unwrap()))
            .await
            .unwrap();

        assert!(second.id > first.id);
        let latest = store.find_latest().await.unwrap().unwrap();
        assert_eq!(latest.id, second.id);
    }

    #[tokio::test]
    async fn test_mock_insert_rejects_duplicate_number() {
        let store = MockBillStore::new();
        store.insert(new_bill(BillNumber::FIRST)).await.unwrap();

        let err = store.insert(new_bill(BillNumber::FIRST)).await.unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_mock_delete_missing() {
        let store = MockBillStore::new();
        let err = store.delete(BillId::new(9)).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_mock_unavailable() {
        let store = MockBillStore::new();
        store.set_unavailable(true);

        assert!(store.list().await.unwrap_err().is_transient());
        assert!(!store.health_check().await.is_operational());
    }
}
