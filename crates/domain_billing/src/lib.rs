//! Billing Domain - Vehicle-Service Bills
//!
//! This crate holds the billing rules of the service:
//!
//! - **Bill numbers**: `<prefix>/<seq>` identifiers issued in sequence,
//!   rolling to the next prefix after `9999`
//! - **Totals**: slot amounts plus slot taxes; pass-through, check and
//!   extension amounts are stored but never totalled
//! - **Partial updates**: present, non-empty fields overwrite; everything
//!   else is left as stored
//! - **Bill service**: create / get / list / update / delete over a
//!   [`BillStore`] port
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_billing::{BillService, CreateBill};
//!
//! let service = BillService::new(store);
//! let bill = service.create(Some("staff-7"), CreateBill::new(content)).await?;
//! assert_eq!(bill.bill_number.to_string(), "1/0001");
//! ```

pub mod bill;
pub mod bill_number;
pub mod error;
pub mod patch;
pub mod ports;
pub mod sequence;
pub mod service;
pub mod total;

pub use bill::{
    Bill, BillContent, CreateBill, Extension, LineItem, NewBill, Reference,
    EXTENSION_SLOTS, LINE_ITEM_SLOTS,
};
pub use bill_number::{BillNumber, BillNumberError, MAX_SEQ};
pub use error::BillingError;
pub use patch::{BillPatch, ExtensionPatch, LineItemPatch};
pub use ports::BillStore;
pub use sequence::{BillNumberSource, StoreSequence};
pub use service::BillService;
pub use total::compute_total;

#[cfg(any(test, feature = "mock"))]
pub use ports::mock::MockBillStore;
