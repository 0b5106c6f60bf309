//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! billing service test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built bills and timestamps
//! - `builders`: Builder for bill content with sensible defaults
//! - `database`: PostgreSQL testcontainer management
//! - `assertions`: Assertion helpers for bills and bill numbers
//! - `generators`: Property-based test data generators

pub mod assertions;
pub mod builders;
pub mod database;
pub mod fixtures;
pub mod generators;

pub use assertions::*;
pub use builders::*;
pub use database::*;
pub use fixtures::*;
pub use generators::*;
