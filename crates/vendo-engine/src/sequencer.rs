//! # Invoice Sequencer
//!
//! A single atomic counter behind invoice number assignment.
//!
//! ## Why Atomic?
//! Deriving the next number from "count of stored sales + 1" is racy: two
//! concurrent sales read the same count and mint the same invoice number,
//! and cancellation shrinks the count so numbers get reused. A fetch-add on
//! an [`AtomicU64`] hands out each sequence value exactly once, and values
//! are never returned to the pool - a cancelled sale's invoice number stays
//! burned.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};

use vendo_core::invoice::invoice_number;

// =============================================================================
// Invoice Sequencer
// =============================================================================

/// Process-wide monotonic invoice sequence.
#[derive(Debug, Default)]
pub struct InvoiceSequencer {
    counter: AtomicU64,
}

impl InvoiceSequencer {
    /// Creates a sequencer whose first issued sequence is 1.
    pub fn new() -> Self {
        InvoiceSequencer {
            counter: AtomicU64::new(0),
        }
    }

    /// Creates a sequencer resuming after `last_issued` (for rehydrating
    /// from an existing sale history).
    pub fn starting_after(last_issued: u64) -> Self {
        InvoiceSequencer {
            counter: AtomicU64::new(last_issued),
        }
    }

    /// Issues the next sequence value and formats it as an invoice number
    /// for the given commit time.
    pub fn next(&self, when: DateTime<Utc>) -> String {
        let sequence = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        invoice_number(when, sequence)
    }

    /// How many sequence values have been issued so far.
    pub fn issued(&self) -> u64 {
        self.counter.load(Ordering::SeqCst)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
