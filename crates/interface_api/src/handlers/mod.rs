//! Request handlers

pub mod bill;
pub mod health;
