//! # Validation Module
//!
//! Input validation utilities for Vendo POS.
//!
//! ## Validation Strategy
//! Early, cheap checks on caller input before any business logic runs.
//! The engine and the ledger call these before touching state; by the time
//! a request reaches the stock write or the movement log, quantities are
//! positive, prices are non-negative, and free-text fields are bounded.
//!
//! ## Usage
//! ```rust
//! use vendo_core::validation::{validate_quantity, validate_reason};
//!
//! validate_quantity(5).unwrap();
//! validate_reason("Damaged in transit").unwrap();
//! ```

use crate::error::ValidationError;
use crate::{MAX_LINE_QUANTITY, MAX_SALE_LINES};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - Must be between 1 and 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a movement reason.
///
/// ## Rules
/// - Must not be empty (every stock change is auditable with a reason)
/// - Maximum 500 characters
pub fn validate_reason(reason: &str) -> ValidationResult<()> {
    let reason = reason.trim();

    if reason.is_empty() {
        return Err(ValidationError::Required {
            field: "reason".to_string(),
        });
    }

    if reason.len() > 500 {
        return Err(ValidationError::TooLong {
            field: "reason".to_string(),
            max: 500,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line-item quantity.
///
/// ## Rules
/// - Must be positive (>= 1)
/// - Must not exceed MAX_LINE_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a stock-adjustment delta.
///
/// ## Rules
/// - May be negative (consumption) or positive (restock)
/// - Must not be zero - a zero delta is a caller bug, not a no-op
pub fn validate_delta(delta: i64) -> ValidationResult<()> {
    if delta == 0 {
        return Err(ValidationError::MustBeNonZero {
            field: "delta".to_string(),
        });
    }

    Ok(())
}

/// Validates a price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items)
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates the number of line items in a sale request.
///
/// ## Rules
/// - Must have at least one line
/// - Must not exceed MAX_SALE_LINES (100)
pub fn validate_line_count(count: usize) -> ValidationResult<()> {
    if count == 0 {
        return Err(ValidationError::Required {
            field: "lines".to_string(),
        });
    }

    if count > MAX_SALE_LINES {
        return Err(ValidationError::OutOfRange {
            field: "lines".to_string(),
            min: 1,
            max: MAX_SALE_LINES as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
