//! # Error Types
//!
//! Domain-specific error types for vendo-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  vendo-core errors (this file)                                         │
//! │  ├── CoreError        - Domain / transaction errors                    │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  Request layer (out of tree)                                           │
//! │  └── ApiError         - What the frontend sees (serialized)            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Frontend               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product name, ID, quantities)
//! 3. Errors are enum variants, never String
//! 4. Every failure path returns a distinguishable kind - nothing is
//!    collapsed into a generic failure, nothing is silently swallowed

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or transaction failures.
/// They should be caught and translated to user-friendly messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Customer cannot be found.
    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    /// Seller (system user) cannot be found.
    #[error("Seller not found: {0}")]
    SellerNotFound(String),

    /// Sale not found.
    #[error("Sale not found: {0}")]
    SaleNotFound(String),

    /// Insufficient stock discovered during validation.
    ///
    /// ## When This Occurs
    /// - A sale request asks for more units than are currently in stock
    /// - A manual adjustment would take stock below zero
    ///
    /// Validation-phase check: no stock has been touched when this is
    /// returned.
    #[error("Insufficient stock for {name}: available {available}, requested {requested}")]
    InsufficientStock {
        name: String,
        available: i64,
        requested: i64,
    },

    /// Stock changed between validation and commit.
    ///
    /// ## When This Occurs
    /// Two requests race for the same product: both pass validation against
    /// the same snapshot, one commits first, and the loser's per-product
    /// compare-and-adjust fails. All of the loser's already-applied line
    /// adjustments have been compensated when this is returned.
    #[error("Concurrent stock conflict for {name}: stock changed between validation and commit")]
    ConcurrentStockConflict { name: String },

    /// Sale is not in a state that allows the requested operation.
    ///
    /// ## When This Occurs
    /// - Cancelling a sale that is already being cancelled by another request
    #[error("Sale {sale_id} is {current_status}, cannot perform operation")]
    InvalidSaleState {
        sale_id: String,
        current_status: String,
    },

    /// Backing storage is unavailable.
    ///
    /// Reserved for persistence-backed implementations of the stateful
    /// components; the in-memory ones never construct it. Fatal and never
    /// retried here; retry policy, if any, belongs to the caller.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be zero.
    #[error("{field} must not be zero")]
    MustBeNonZero { field: String },

    /// Two fields disagree (e.g., movement kind vs. delta sign).
    #[error("{field} is inconsistent: {reason}")]
    Inconsistent { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            name: "Coca-Cola 330ml".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Coca-Cola 330ml: available 3, requested 5"
        );
    }

    #[test]
    fn test_conflict_message_names_the_product() {
        let err = CoreError::ConcurrentStockConflict {
            name: "Widget".to_string(),
        };
        assert!(err.to_string().contains("Widget"));
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "reason".to_string(),
        };
        assert_eq!(err.to_string(), "reason is required");

        let err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity must be positive");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "reason".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
