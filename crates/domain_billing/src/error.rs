//! Billing domain errors

use core_kernel::PortError;
use thiserror::Error;

use crate::bill_number::BillNumberError;

/// Errors surfaced by the billing service
///
/// Every variant carries the underlying message so callers can tell a
/// retry-worthy failure (`Internal`, `Conflict`) from one that needs a
/// corrected request.
#[derive(Debug, Error)]
pub enum BillingError {
    /// Malformed or missing required input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Missing or unusable caller identity
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Referenced bill does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bill number uniqueness violation
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Persistence or unexpected failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BillingError {
    pub fn validation(message: impl Into<String>) -> Self {
        BillingError::Validation(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        BillingError::Unauthorized(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        BillingError::Internal(message.into())
    }

    /// Returns true if resubmitting the same request may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, BillingError::Internal(_) | BillingError::Conflict(_))
    }
}

impl From<PortError> for BillingError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound { entity_type, id } => {
                BillingError::NotFound(format!("{} with id {} not found", entity_type, id))
            }
            PortError::Conflict { message } => BillingError::Conflict(message),
            other => BillingError::Internal(other.to_string()),
        }
    }
}

impl From<BillNumberError> for BillingError {
    fn from(err: BillNumberError) -> Self {
        BillingError::Internal(err.to_string())
    }
}
