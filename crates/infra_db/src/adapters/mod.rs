//! Domain Adapters
//!
//! Adapter implementations connecting domain ports to PostgreSQL.
//!
//! # Usage
//!
//! ```rust,ignore
//! use infra_db::adapters::PostgresBillAdapter;
//! use domain_billing::BillService;
//! use std::sync::Arc;
//!
//! let service = BillService::new(Arc::new(PostgresBillAdapter::new(pool)));
//! ```

pub mod bill;

pub use bill::PostgresBillAdapter;
