//! # Vendo Engine
//!
//! Stateful components and the sale transaction engine for Vendo POS.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         vendo-engine                                    │
//! │                                                                         │
//! │                      ┌────────────────┐                                 │
//! │   request thread ──▶ │   SaleEngine   │  ◀── request thread             │
//! │                      └───────┬────────┘                                 │
//! │          ┌───────────┬───────┴────┬────────────┬─────────────┐          │
//! │          ▼           ▼            ▼            ▼             ▼          │
//! │   ┌───────────┐ ┌──────────┐ ┌─────────┐ ┌───────────┐ ┌──────────┐    │
//! │   │ Product   │ │ Movement │ │  Sale   │ │  Party    │ │ Invoice  │    │
//! │   │ Ledger    │ │ Log      │ │ Archive │ │Directories│ │Sequencer │    │
//! │   │(per-prod. │ │(append-  │ │(atomic  │ │(customer, │ │(atomic   │    │
//! │   │ locks)    │ │ only)    │ │ cancel) │ │ seller)   │ │ counter) │    │
//! │   └───────────┘ └──────────┘ └─────────┘ └───────────┘ └──────────┘    │
//! │                                                                         │
//! │   Pure math and domain types come from vendo-core.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Consistency Model
//! No ambient transaction: atomicity is built from per-product locks,
//! atomic counters, one atomic state transition for cancellation, and
//! explicit compensation when a multi-line commit loses a race.

pub mod engine;
pub mod ledger;
pub mod movements;
pub mod parties;
pub mod sales;
pub mod sequencer;

pub use engine::{
    AdjustStockRequest, CreateSaleRequest, LineRequest, ReceiptLine, SaleEngine, SaleReceipt,
};
pub use ledger::ProductLedger;
pub use movements::{MovementDraft, MovementLog};
pub use parties::{CustomerDirectory, SellerDirectory};
pub use sales::SaleArchive;
pub use sequencer::InvoiceSequencer;
