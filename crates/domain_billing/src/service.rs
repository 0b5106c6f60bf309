//! Bill service
//!
//! Orchestrates bill creation, retrieval, update and deletion over a
//! [`BillStore`]. Errors are never retried here; a `Conflict` from a racing
//! creation is returned to the caller as-is.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument, warn};

use core_kernel::BillId;

use crate::bill::{Bill, CreateBill, NewBill};
use crate::error::BillingError;
use crate::patch::BillPatch;
use crate::ports::BillStore;
use crate::sequence::{BillNumberSource, StoreSequence};
use crate::total::compute_total;

/// Application service for bills
#[derive(Clone)]
pub struct BillService {
    store: Arc<dyn BillStore>,
    numbers: Arc<dyn BillNumberSource>,
}

impl BillService {
    /// Creates a service that numbers bills from the store's latest bill
    pub fn new(store: Arc<dyn BillStore>) -> Self {
        let numbers = Arc::new(StoreSequence::new(store.clone()));
        Self { store, numbers }
    }

    /// Creates a service with an explicit bill number source
    pub fn with_number_source(store: Arc<dyn BillStore>, numbers: Arc<dyn BillNumberSource>) -> Self {
        Self { store, numbers }
    }

    /// Returns the underlying store
    pub fn store(&self) -> &Arc<dyn BillStore> {
        &self.store
    }

    /// Creates a bill
    ///
    /// # Arguments
    ///
    /// * `caller` - Identity of the authenticated caller, if any
    /// * `request` - Bill content as submitted
    ///
    /// # Errors
    ///
    /// - `Unauthorized` if no usable caller identity was supplied
    /// - `Validation` if the first line item has no name or a zero amount,
    ///   or an amount or the total is outside the storable range
    /// - `Internal` if the latest bill cannot be read
    /// - `Conflict` if the generated number is already taken
    #[instrument(skip(self, request))]
    pub async fn create(&self, caller: Option<&str>, request: CreateBill) -> Result<Bill, BillingError> {
        let created_by = match caller.map(str::trim) {
            Some(identity) if !identity.is_empty() => identity.to_string(),
            _ => return Err(BillingError::unauthorized("caller identity missing")),
        };

        let CreateBill { mut content, bill_date } = request;
        content.validate_for_creation()?;

        let bill_number = self.numbers.next_bill_number().await?;

        content.apply_creation_defaults();
        let total = compute_total(&content)?;
        let now = Utc::now();

        let new_bill = NewBill {
            bill_number,
            content,
            total,
            bill_date: bill_date.unwrap_or(now),
            created_by,
            created_at: now,
            updated_at: now,
        };

        let bill = self.store.insert(new_bill).await.map_err(|e| {
            warn!(bill_number = %bill_number, error = %e, "Failed to insert bill");
            BillingError::from(e)
        })?;

        info!(
            bill_id = %bill.id,
            bill_number = %bill.bill_number,
            total = %bill.total,
            "Bill created"
        );
        Ok(bill)
    }

    /// Fetches a bill by key
    #[instrument(skip(self))]
    pub async fn get(&self, id: BillId) -> Result<Bill, BillingError> {
        Ok(self.store.get(id).await?)
    }

    /// Lists all bills
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Bill>, BillingError> {
        Ok(self.store.list().await?)
    }

    /// Applies a partial update and recomputes the total
    ///
    /// # Errors
    ///
    /// - `NotFound` if the bill does not exist
    /// - `Validation` if the patch sets the first-slot amount to zero, or an
    ///   amount or the new total is outside the storable range
    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: BillId, patch: BillPatch) -> Result<Bill, BillingError> {
        let mut bill = self.store.get(id).await?;
        patch.validate()?;

        patch.apply_to(&mut bill);
        bill.recalculate_total()?;
        bill.touch();

        let bill = self.store.replace(&bill).await?;

        info!(bill_id = %bill.id, total = %bill.total, "Bill updated");
        Ok(bill)
    }

    /// Deletes a bill permanently
    #[instrument(skip(self))]
    pub async fn delete(&self, id: BillId) -> Result<(), BillingError> {
        self.store.delete(id).await?;
        info!(bill_id = %id, "Bill deleted");
        Ok(())
    }
}
