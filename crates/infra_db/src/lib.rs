//! Infrastructure Database Layer
//!
//! PostgreSQL persistence for the billing service using SQLx:
//!
//! - `pool`: connection pool creation, embedded migrations, shutdown
//! - `repositories`: SQL for the `bills` table
//! - `adapters`: the `BillStore` port implementation over the repository
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig, PostgresBillAdapter};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/carservice")).await?;
//! run_migrations(&pool).await?;
//! let store = PostgresBillAdapter::new(pool);
//! ```

pub mod adapters;
pub mod error;
pub mod pool;
pub mod repositories;

pub use adapters::PostgresBillAdapter;
pub use error::DatabaseError;
pub use pool::{close_pool, create_pool, run_migrations, DatabaseConfig, DatabasePool};
