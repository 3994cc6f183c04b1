//! # Invoice Number Formatting
//!
//! Pure formatting of invoice numbers. The stateful sequence itself lives in
//! `vendo-engine` (`InvoiceSequencer`); this module only turns a date and a
//! sequence value into the business identifier printed on invoices.
//!
//! ## Format
//! ```text
//! F 20230515 000001
//! │ └──┬───┘ └──┬──┘
//! │    │        └── 6-digit zero-padded global sale sequence
//! │    └─────────── commit date (YYYYMMDD, UTC)
//! └──────────────── fixed "F" (factura) prefix
//! ```
//!
//! The sequence is a single global counter of sales created so far, not a
//! per-day counter: the suffix does not restart at 000001 each morning. The
//! date prefix alone makes the number self-describing, and uniqueness comes
//! from the monotonic sequence.

use chrono::{DateTime, Utc};

use crate::INVOICE_SEQ_DIGITS;

/// Formats an invoice number for the given commit time and sequence value.
///
/// ## Example
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use vendo_core::invoice::invoice_number;
///
/// let when = Utc.with_ymd_and_hms(2023, 5, 15, 10, 30, 0).unwrap();
/// assert_eq!(invoice_number(when, 1), "F20230515000001");
/// assert_eq!(invoice_number(when, 42), "F20230515000042");
/// ```
///
/// Sequences beyond 6 digits widen the suffix rather than wrap: uniqueness
/// is never sacrificed to keep the fixed width.
pub fn invoice_number(when: DateTime<Utc>, sequence: u64) -> String {
    format!(
        "F{}{:0width$}",
        when.format("%Y%m%d"),
        sequence,
        width = INVOICE_SEQ_DIGITS
    )
}
