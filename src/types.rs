//! Shared error types for the mock ledger
//!
//! Every ledger operation fails with one of four conditions. Failures
//! are request-local and synchronous: the store is never left half
//! modified, and no error terminates the process.

use hyper::StatusCode;
use thiserror::Error;

/// Result alias used throughout the ledger core
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Failure conditions of the three ledger operations
///
/// The display strings are the wire messages clients match on, so they
/// stay byte-for-byte stable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Missing or malformed template identifier
    #[error("Invalid template identifier")]
    InvalidTemplate,

    /// Create attempted on an entity kind the mock does not create
    #[error("Mock server only supports ReceivableAsset create")]
    UnsupportedOperation,

    /// Contract id absent from the expected source sequence
    #[error("Contract not found in mock state")]
    ContractNotFound,

    /// (entity kind, choice) pair outside the transition table
    #[error("Unsupported mock exercise {choice} on {entity}")]
    UnsupportedChoice { choice: String, entity: String },
}

impl LedgerError {
    /// HTTP status the error maps to at the API boundary
    pub fn status_code(&self) -> StatusCode {
        match self {
            LedgerError::ContractNotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_messages_are_stable() {
        assert_eq!(
            LedgerError::InvalidTemplate.to_string(),
            "Invalid template identifier"
        );
        assert_eq!(
            LedgerError::UnsupportedOperation.to_string(),
            "Mock server only supports ReceivableAsset create"
        );
        assert_eq!(
            LedgerError::ContractNotFound.to_string(),
            "Contract not found in mock state"
        );
        assert_eq!(
            LedgerError::UnsupportedChoice {
                choice: "Cancel".to_string(),
                entity: "FinancingAgreement".to_string(),
            }
            .to_string(),
            "Unsupported mock exercise Cancel on FinancingAgreement"
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            LedgerError::ContractNotFound.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            LedgerError::InvalidTemplate.status_code(),
            StatusCode::BAD_REQUEST
        );
    }
}
