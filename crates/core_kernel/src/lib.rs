//! Core Kernel - Foundational types shared by the billing service crates
//!
//! This crate provides the building blocks used across the domain and
//! infrastructure layers:
//! - Strongly-typed numeric identifiers for persisted entities
//! - Port plumbing (error type, marker traits, health checks) for the
//!   hexagonal architecture between the domain and its adapters

pub mod identifiers;
pub mod ports;

pub use identifiers::BillId;
pub use ports::{AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, PortError};
