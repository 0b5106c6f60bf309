//! Repository implementations
//!
//! Repositories own the SQL and map between database rows and the
//! column-level types they return. They report `DatabaseError`; translation
//! to domain port errors happens in the adapters.

pub mod bill;

pub use bill::{BillRepository, BillRow};
