//! PostgreSQL Bill Adapter
//!
//! Implements the billing domain's `BillStore` port on top of
//! [`BillRepository`]. It converts rows into domain bills and translates
//! database errors into port errors:
//!
//! - duplicate bill number (`23505`) -> `PortError::Conflict`
//! - missing row / zero rows affected -> `PortError::NotFound`
//! - pool and I/O failures -> `PortError::Connection`
//! - anything else -> `PortError::Internal`

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::{debug, instrument};

use core_kernel::{AdapterHealth, BillId, DomainPort, HealthCheckResult, HealthCheckable, PortError};
use domain_billing::{Bill, BillNumber, BillStore, NewBill};

use crate::error::DatabaseError;
use crate::repositories::bill::{BillRepository, BillRow};

const ADAPTER_ID: &str = "postgres-bill-adapter";

/// PostgreSQL-backed implementation of the BillStore port
#[derive(Debug, Clone)]
pub struct PostgresBillAdapter {
    repository: BillRepository,
    pool: PgPool,
}

impl PostgresBillAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: BillRepository::new(pool.clone()),
            pool,
        }
    }

    /// Returns a reference to the underlying repository
    pub fn repository(&self) -> &BillRepository {
        &self.repository
    }
}

impl DomainPort for PostgresBillAdapter {}

#[async_trait]
impl HealthCheckable for PostgresBillAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        let start = std::time::Instant::now();

        let result = sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await;

        let latency_ms = start.elapsed().as_millis() as u64;
        let (status, message) = match result {
            Ok(_) => (AdapterHealth::Healthy, None),
            Err(e) => (AdapterHealth::Unhealthy, Some(format!("Database error: {}", e))),
        };

        HealthCheckResult {
            adapter_id: ADAPTER_ID.to_string(),
            status,
            latency_ms,
            message,
            checked_at: Utc::now(),
        }
    }
}

#[async_trait]
impl BillStore for PostgresBillAdapter {
    #[instrument(skip(self))]
    async fn find_latest(&self) -> Result<Option<Bill>, PortError> {
        let row = self.repository.find_latest().await.map_err(db_to_port_error)?;
        row.map(row_to_bill).transpose()
    }

    #[instrument(skip(self, bill), fields(bill_number = %bill.bill_number))]
    async fn insert(&self, bill: NewBill) -> Result<Bill, PortError> {
        let row = self.repository.insert(&bill).await.map_err(db_to_port_error)?;
        debug!(bill_id = row.id, "Inserted bill");
        row_to_bill(row)
    }

    #[instrument(skip(self), fields(bill_id = %id))]
    async fn get(&self, id: BillId) -> Result<Bill, PortError> {
        self.repository
            .find_by_id(id.value())
            .await
            .map_err(db_to_port_error)?
            .map(row_to_bill)
            .unwrap_or_else(|| Err(PortError::not_found(BillId::entity(), id)))
    }

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Bill>, PortError> {
        let rows = self.repository.find_all().await.map_err(db_to_port_error)?;
        debug!(count = rows.len(), "Fetched bills");
        rows.into_iter().map(row_to_bill).collect()
    }

    #[instrument(skip(self, bill), fields(bill_id = %bill.id))]
    async fn replace(&self, bill: &Bill) -> Result<Bill, PortError> {
        self.repository
            .update(
                bill.id.value(),
                &bill.content,
                bill.total,
                bill.bill_date,
                bill.updated_at,
            )
            .await
            .map_err(db_to_port_error)?
            .map(row_to_bill)
            .unwrap_or_else(|| Err(PortError::not_found(BillId::entity(), bill.id)))
    }

    #[instrument(skip(self), fields(bill_id = %id))]
    async fn delete(&self, id: BillId) -> Result<(), PortError> {
        let affected = self.repository.delete(id.value()).await.map_err(db_to_port_error)?;
        if affected == 0 {
            return Err(PortError::not_found(BillId::entity(), id));
        }
        Ok(())
    }
}

/// Converts a database error to a port error
fn db_to_port_error(e: DatabaseError) -> PortError {
    match e {
        DatabaseError::DuplicateEntry(message) => PortError::conflict(message),
        DatabaseError::NotFound(message) => PortError::NotFound {
            entity_type: BillId::entity().to_string(),
            id: message,
        },
        DatabaseError::ConnectionFailed(_) | DatabaseError::PoolExhausted => PortError::Connection {
            message: e.to_string(),
            source: Some(Box::new(e)),
        },
        other => PortError::Internal {
            message: other.to_string(),
            source: Some(Box::new(other)),
        },
    }
}

/// Converts a bill row to a domain bill
///
/// The integer prefix/sequence columns are authoritative. A row whose
/// columns are out of range or disagree with its display string is
/// reported, never repaired.
fn row_to_bill(row: BillRow) -> Result<Bill, PortError> {
    let bill_number = BillNumber::from_parts(row.bill_prefix, i64::from(row.bill_seq))
        .map_err(|e| PortError::transformation(format!("bill {}: {}", row.id, e)))?;

    if bill_number.to_string() != row.bill_number {
        return Err(PortError::transformation(format!(
            "bill {}: stored number '{}' does not match {}",
            row.id, row.bill_number, bill_number
        )));
    }

    Ok(Bill {
        id: BillId::new(row.id),
        bill_number,
        content: row.content,
        total: row.total,
        bill_date: row.bill_date,
        created_by: row.created_by,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_billing::BillContent;
    use rust_decimal_macros::dec;

    fn row(prefix: i64, seq: i16, number: &str) -> BillRow {
        let now = Utc::now();
        BillRow {
            id: 3,
            bill_prefix: prefix,
            bill_seq: seq,
            bill_number: number.to_string(),
            content: BillContent::default(),
            total: dec!(120.50),
            bill_date: now,
            created_by: "staff-1".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_row_to_bill() {
        let bill = row_to_bill(row(2, 15, "2/0015")).unwrap();
        assert_eq!(bill.id, BillId::new(3));
        assert_eq!(bill.bill_number, BillNumber::new(2, 15).unwrap());
        assert_eq!(bill.total, dec!(120.50));
    }

    #[test]
    fn test_row_to_bill_rejects_out_of_range_parts() {
        let err = row_to_bill(row(0, 1, "0/0001")).unwrap_err();
        assert!(matches!(err, PortError::Transformation { .. }));
    }

    #[test]
    fn test_row_to_bill_rejects_mismatched_display() {
        let err = row_to_bill(row(2, 15, "2/0016")).unwrap_err();
        assert!(matches!(err, PortError::Transformation { .. }));
    }

    #[test]
    fn test_duplicate_maps_to_conflict() {
        let err = db_to_port_error(DatabaseError::DuplicateEntry("bills_bill_number_key".into()));
        assert!(err.is_conflict());
    }

    #[test]
    fn test_pool_exhausted_is_transient() {
        assert!(db_to_port_error(DatabaseError::PoolExhausted).is_transient());
        assert!(!db_to_port_error(DatabaseError::QueryFailed("syntax".into())).is_transient());
    }
}
