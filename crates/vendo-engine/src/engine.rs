//! # Sale Transaction Engine
//!
//! Orchestrates the two business transactions - sale creation and sale
//! cancellation - plus manual stock adjustments and read queries.
//!
//! ## Create-Sale Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Phase 1: VALIDATE (no state touched)                                   │
//! │    shape checks → resolve customer/seller → snapshot each product,      │
//! │    reject on missing product or insufficient stock                      │
//! │                                                                         │
//! │  Phase 2: PRICE (pure)                                                  │
//! │    freeze lines from snapshots → compute_totals → mint invoice number   │
//! │                                                                         │
//! │  Phase 3: COMMIT (ordered for the append-only log)                      │
//! │    1. decrement stock per line (per-product atomic check-and-apply)     │
//! │       └─ on conflict: restock already-applied lines, return error;      │
//! │          nothing was logged, the sale never existed                     │
//! │    2. append one Outbound movement per line                             │
//! │    3. store the sale aggregate                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All stock decrements happen before any movement is appended: a commit
//! that fails midway compensates through the ledger alone and leaves the
//! append-only movement log untouched.
//!
//! ## Cancellation
//! Wins the `Committed → Cancelled` transition atomically, restocks each
//! line, appends compensating `Inbound` movements (the original `Outbound`
//! ones stay in the log), then removes the aggregate.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use vendo_core::validation::{
    validate_delta, validate_line_count, validate_quantity, validate_reason,
};
use vendo_core::{
    compute_totals, CoreError, CoreResult, InventoryMovement, MovementKind, Product, Sale,
    SaleLine, SaleStatus, ValidationError,
};

use crate::ledger::ProductLedger;
use crate::movements::{MovementDraft, MovementLog};
use crate::parties::{CustomerDirectory, SellerDirectory};
use crate::sales::SaleArchive;
use crate::sequencer::InvoiceSequencer;

// =============================================================================
// Request / Response Types
// =============================================================================

/// One requested line of a sale.
///
/// Deliberately carries no price: unit prices come from the product ledger
/// at commit time, never from the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineRequest {
    pub product_id: String,
    pub quantity: i64,
}

/// A request to create (commit) a sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSaleRequest {
    pub customer_id: String,
    pub seller_id: String,
    pub lines: Vec<LineRequest>,
}

/// A request to manually adjust stock outside any sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustStockRequest {
    pub product_id: String,
    /// Signed delta: positive adds stock, negative removes it.
    pub delta: i64,
    pub kind: MovementKind,
    pub reason: String,
    pub seller_id: Option<String>,
}

/// One line of a printable receipt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptLine {
    pub product_name: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub line_subtotal_cents: i64,
}

/// A sale rendered for presentation, with party names resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleReceipt {
    pub sale_id: String,
    pub invoice_number: String,
    pub occurred_at: DateTime<Utc>,
    pub customer_name: String,
    pub seller_name: String,
    pub lines: Vec<ReceiptLine>,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
}

// =============================================================================
// Sale Engine
// =============================================================================

/// The transaction engine tying the stateful components together.
///
/// Cheap to share: every component is behind an `Arc`, and all methods take
/// `&self`, so one engine serves any number of concurrent request threads.
#[derive(Debug, Clone)]
pub struct SaleEngine {
    ledger: Arc<ProductLedger>,
    movements: Arc<MovementLog>,
    sales: Arc<SaleArchive>,
    customers: Arc<CustomerDirectory>,
    sellers: Arc<SellerDirectory>,
    sequencer: Arc<InvoiceSequencer>,
}

impl SaleEngine {
    pub fn new(
        ledger: Arc<ProductLedger>,
        movements: Arc<MovementLog>,
        sales: Arc<SaleArchive>,
        customers: Arc<CustomerDirectory>,
        sellers: Arc<SellerDirectory>,
        sequencer: Arc<InvoiceSequencer>,
    ) -> Self {
        SaleEngine {
            ledger,
            movements,
            sales,
            customers,
            sellers,
            sequencer,
        }
    }

    // =========================================================================
    // Sale Creation
    // =========================================================================

    /// Creates and commits a sale.
    ///
    /// ## Atomicity
    /// On success: stock decremented per line, one `Outbound` movement per
    /// line, aggregate stored, invoice number assigned. On any failure: no
    /// stock change survives, no movement is logged, no sale is stored.
    /// A minted invoice number is burned either way and never reissued.
    ///
    /// ## Errors
    /// - Validation errors for malformed requests
    /// - [`CoreError::CustomerNotFound`] / [`CoreError::SellerNotFound`] /
    ///   [`CoreError::ProductNotFound`] for unknown references
    /// - [`CoreError::InsufficientStock`] when validation sees too little
    ///   stock
    /// - [`CoreError::ConcurrentStockConflict`] when stock changed between
    ///   validation and commit (the whole sale is rolled back)
    pub fn create_sale(&self, request: &CreateSaleRequest) -> CoreResult<Sale> {
        // ---- Phase 1: validate, touching nothing ----
        validate_line_count(request.lines.len())?;
        for line in &request.lines {
            validate_quantity(line.quantity)?;
        }

        let customer = self.customers.resolve(&request.customer_id)?;
        let seller = self.sellers.resolve(&request.seller_id)?;

        let mut snapshots: Vec<(Product, i64)> = Vec::with_capacity(request.lines.len());
        for line in &request.lines {
            let product = self
                .ledger
                .get(&line.product_id)
                .ok_or_else(|| CoreError::ProductNotFound(line.product_id.clone()))?;

            if !product.can_fulfill(line.quantity) {
                return Err(CoreError::InsufficientStock {
                    name: product.name,
                    available: product.stock,
                    requested: line.quantity,
                });
            }

            snapshots.push((product, line.quantity));
        }

        // ---- Phase 2: pure pricing from the snapshots ----
        let lines: Vec<SaleLine> = snapshots
            .iter()
            .map(|(product, quantity)| SaleLine::snapshot(product, *quantity))
            .collect();
        let totals = compute_totals(&lines);

        let occurred_at = Utc::now();
        let invoice_number = self.sequencer.next(occurred_at);
        let sale_id = Uuid::new_v4().to_string();

        // ---- Phase 3: commit ----
        // All stock decrements first. A conflict here compensates through
        // the ledger alone; the movement log has not been touched yet.
        let mut applied: Vec<&SaleLine> = Vec::with_capacity(lines.len());
        for line in &lines {
            match self.ledger.adjust_stock(&line.product_id, -line.quantity) {
                Ok(_) => applied.push(line),
                Err(err) => {
                    self.compensate(&applied);
                    return Err(match err {
                        CoreError::InsufficientStock { name, .. } => {
                            warn!(
                                invoice_number = %invoice_number,
                                product = %name,
                                "stock changed between validation and commit, sale rolled back"
                            );
                            CoreError::ConcurrentStockConflict { name }
                        }
                        other => other,
                    });
                }
            }
        }

        // Decrements done; now the audit trail, one Outbound per line.
        for line in &lines {
            self.movements.append(MovementDraft {
                product_id: line.product_id.clone(),
                kind: MovementKind::Outbound,
                quantity: line.quantity,
                reason: format!("Sale {}", invoice_number),
                seller_id: Some(seller.id.clone()),
                sale_id: Some(sale_id.clone()),
            });
        }

        let sale = Sale {
            id: sale_id,
            invoice_number,
            status: SaleStatus::Committed,
            occurred_at,
            customer_id: customer.id,
            seller_id: seller.id,
            lines,
            subtotal_cents: totals.subtotal_cents,
            tax_cents: totals.tax_cents,
            total_cents: totals.total_cents,
        };
        self.sales.insert(sale.clone());

        info!(
            sale_id = %sale.id,
            invoice_number = %sale.invoice_number,
            lines = sale.lines.len(),
            total_cents = sale.total_cents,
            "sale committed"
        );

        Ok(sale)
    }

    /// Restocks already-decremented lines after a mid-commit conflict.
    ///
    /// Positive deltas cannot trip the non-negativity guard and products
    /// cannot be deregistered, so failure here would mean the ledger itself
    /// is broken; it is logged rather than masking the original conflict.
    fn compensate(&self, applied: &[&SaleLine]) {
        for line in applied {
            if let Err(err) = self.ledger.adjust_stock(&line.product_id, line.quantity) {
                warn!(
                    product_id = %line.product_id,
                    quantity = line.quantity,
                    error = %err,
                    "compensating restock failed"
                );
            }
        }
    }

    // =========================================================================
    // Sale Cancellation
    // =========================================================================

    /// Cancels a committed sale, reversing its inventory effect.
    ///
    /// Each line is restocked and a compensating `Inbound` movement is
    /// appended; the original `Outbound` movements remain in the log. The
    /// aggregate is removed once compensation completes.
    ///
    /// ## Errors
    /// - [`CoreError::SaleNotFound`] if no sale has this id
    /// - [`CoreError::InvalidSaleState`] if a concurrent cancellation
    ///   already won the `Committed → Cancelled` transition
    pub fn cancel_sale(&self, sale_id: &str) -> CoreResult<()> {
        let sale = self.sales.begin_cancel(sale_id)?;

        for line in &sale.lines {
            // Restock is a positive delta; the guard cannot reject it.
            self.ledger.adjust_stock(&line.product_id, line.quantity)?;
            self.movements.append(MovementDraft {
                product_id: line.product_id.clone(),
                kind: MovementKind::Inbound,
                quantity: line.quantity,
                reason: format!("Cancelled sale {}", sale.invoice_number),
                seller_id: Some(sale.seller_id.clone()),
                sale_id: Some(sale.id.clone()),
            });
        }

        self.sales.remove(sale_id);

        info!(
            sale_id = %sale.id,
            invoice_number = %sale.invoice_number,
            lines = sale.lines.len(),
            "sale cancelled"
        );

        Ok(())
    }

    // =========================================================================
    // Manual Stock Adjustment
    // =========================================================================

    /// Applies a manual stock adjustment and logs it.
    ///
    /// The movement kind must agree with the delta's sign: `Inbound` needs a
    /// positive delta, `Outbound` a negative one, `Adjustment` accepts
    /// either. Returns the new stock level.
    pub fn adjust_stock(&self, request: &AdjustStockRequest) -> CoreResult<i64> {
        validate_delta(request.delta)?;
        validate_reason(&request.reason)?;
        Self::check_kind_sign(request.kind, request.delta)?;

        if let Some(seller_id) = &request.seller_id {
            self.sellers.resolve(seller_id)?;
        }

        let new_stock = self.ledger.adjust_stock(&request.product_id, request.delta)?;

        self.movements.append(MovementDraft {
            product_id: request.product_id.clone(),
            kind: request.kind,
            quantity: request.delta.abs(),
            reason: request.reason.clone(),
            seller_id: request.seller_id.clone(),
            sale_id: None,
        });

        info!(
            product_id = %request.product_id,
            delta = request.delta,
            kind = ?request.kind,
            new_stock,
            "manual stock adjustment"
        );

        Ok(new_stock)
    }

    fn check_kind_sign(kind: MovementKind, delta: i64) -> CoreResult<()> {
        let consistent = match kind {
            MovementKind::Inbound => delta > 0,
            MovementKind::Outbound => delta < 0,
            MovementKind::Adjustment => true,
        };

        if consistent {
            Ok(())
        } else {
            Err(ValidationError::Inconsistent {
                field: "kind".to_string(),
                reason: "movement kind does not match delta sign".to_string(),
            }
            .into())
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Renders a sale as a receipt, resolving party display names.
    pub fn receipt(&self, sale_id: &str) -> CoreResult<SaleReceipt> {
        let sale = self
            .sales
            .get(sale_id)
            .ok_or_else(|| CoreError::SaleNotFound(sale_id.to_string()))?;

        let customer = self.customers.resolve(&sale.customer_id)?;
        let seller = self.sellers.resolve(&sale.seller_id)?;

        Ok(SaleReceipt {
            sale_id: sale.id,
            invoice_number: sale.invoice_number,
            occurred_at: sale.occurred_at,
            customer_name: customer.display_name(),
            seller_name: seller.display_name(),
            lines: sale
                .lines
                .iter()
                .map(|line| ReceiptLine {
                    product_name: line.product_name.clone(),
                    quantity: line.quantity,
                    unit_price_cents: line.unit_price_cents,
                    line_subtotal_cents: line.line_subtotal_cents,
                })
                .collect(),
            subtotal_cents: sale.subtotal_cents,
            tax_cents: sale.tax_cents,
            total_cents: sale.total_cents,
        })
    }

    /// All sales for one customer, oldest first. Fails if the customer is
    /// unknown, distinguishing "no such customer" from "no sales yet".
    pub fn sales_by_customer(&self, customer_id: &str) -> CoreResult<Vec<Sale>> {
        self.customers.resolve(customer_id)?;
        Ok(self.sales.by_customer(customer_id))
    }

    /// All sales committed in the inclusive range, oldest first.
    pub fn sales_by_date_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<Sale> {
        self.sales.by_date_range(start, end)
    }

    /// Movement history for one product, timestamp ascending. Fails if the
    /// product is unknown.
    pub fn movements_by_product(&self, product_id: &str) -> CoreResult<Vec<InventoryMovement>> {
        if self.ledger.get(product_id).is_none() {
            return Err(CoreError::ProductNotFound(product_id.to_string()));
        }
        Ok(self.movements.by_product(product_id))
    }

    /// All movements of one kind, timestamp ascending.
    pub fn movements_by_kind(&self, kind: MovementKind) -> Vec<InventoryMovement> {
        self.movements.by_kind(kind)
    }

    /// All movements in the inclusive range, timestamp ascending.
    pub fn movements_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<InventoryMovement> {
        self.movements.by_date_range(start, end)
    }

    /// Products at or below their minimum stock threshold.
    pub fn low_stock_products(&self) -> Vec<Product> {
        self.ledger.low_stock()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
