//! # vendo-core: Pure Business Logic for Vendo POS
//!
//! This crate is the **heart** of Vendo POS. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Vendo POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Request Layer (out of tree)                        │   │
//! │  │    CreateSale ──► CancelSale ──► AdjustStock ──► Queries       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    vendo-engine                                 │   │
//! │  │    SaleEngine, ProductLedger, MovementLog, InvoiceSequencer    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ vendo-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  invoice  │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │  F-number │  │   rules   │  │   │
//! │  │   │   Sale    │  │  TaxCalc  │  │  format   │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO SHARED STATE • PURE FUNCTIONS      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, InventoryMovement, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`invoice`] - Invoice number formatting
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use vendo_core::money::Money;
//! use vendo_core::types::TaxRate;
//! use vendo_core::TAX_RATE_BPS;
//!
//! // Create money from cents (never from floats!)
//! let subtotal = Money::from_cents(15000); // $150.00
//!
//! // Sale tax is a fixed 10%
//! let tax = subtotal.calculate_tax(TaxRate::from_bps(TAX_RATE_BPS));
//! assert_eq!(tax.cents(), 1500); // $15.00
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod invoice;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use vendo_core::Money` instead of
// `use vendo_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Sale tax rate in basis points (1000 bps = 10%).
///
/// ## Why a constant?
/// The business charges a single flat tax on every sale. Making it a
/// crate-level constant keeps every totals computation in agreement;
/// per-product rates can be introduced later without touching callers.
pub const TAX_RATE_BPS: u32 = 1000;

/// Maximum line items allowed in a single sale
///
/// ## Business Reason
/// Prevents runaway requests and ensures reasonable transaction sizes.
pub const MAX_SALE_LINES: usize = 100;

/// Maximum quantity of a single line item
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10)
pub const MAX_LINE_QUANTITY: i64 = 999;

/// Width of the zero-padded invoice sequence suffix (F20230515000001).
pub const INVOICE_SEQ_DIGITS: usize = 6;
