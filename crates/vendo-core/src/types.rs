//! # Domain Types
//!
//! Core domain types used throughout Vendo POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │InventoryMovement│       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (u64, log)  │       │
//! │  │  name           │   │  invoice_number │   │  product_id     │       │
//! │  │  price_cents    │   │  lines          │   │  kind           │       │
//! │  │  stock          │   │  totals         │   │  quantity (>0)  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    TaxRate      │   │   SaleStatus    │   │  MovementKind   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  Committed      │   │  Inbound        │       │
//! │  │  1000 = 10%     │   │  Cancelled      │   │  Outbound       │       │
//! │  └─────────────────┘   └─────────────────┘   │  Adjustment     │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for cross-entity references
//! - Business ID where one exists (invoice_number, barcode) - human-readable

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::TAX_RATE_BPS;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1000 bps = 10.00% (the fixed sale tax, [`TAX_RATE_BPS`])
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// The fixed sale tax rate (10%).
    #[inline]
    pub const fn sale_tax() -> Self {
        TaxRate(TAX_RATE_BPS)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::sale_tax()
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
///
/// ## Stock Invariant
/// `stock >= 0` at all observable times. The field is read-only outside the
/// product ledger: only `ProductLedger::adjust_stock` in vendo-engine may
/// change it, and that operation rejects any delta that would take it below
/// zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown on invoices and line-item snapshots.
    pub name: String,

    /// Optional description for product details.
    pub description: Option<String>,

    /// Unit price in cents (smallest currency unit).
    pub price_cents: i64,

    /// Current stock level. Never negative.
    pub stock: i64,

    /// Minimum stock threshold; at or below it the product is "low stock".
    pub min_stock: i64,

    /// Barcode (EAN-13, UPC-A, etc.).
    pub barcode: Option<String>,

    /// Category this product belongs to.
    pub category_id: String,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Checks if the requested quantity can currently be fulfilled.
    ///
    /// This is a point-in-time answer; the ledger re-checks under its
    /// per-product lock before actually decrementing.
    #[inline]
    pub fn can_fulfill(&self, quantity: i64) -> bool {
        self.stock >= quantity
    }

    /// Checks if stock is at or below the minimum threshold.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.min_stock
    }
}

// =============================================================================
// Parties: Customer & Seller
// =============================================================================

/// A registered customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl Customer {
    /// Display name as shown on invoices ("first last").
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A seller (cashier / system user) acting on sales and stock.
///
/// Credentials and roles live in the excluded auth layer; the core only
/// needs identity and a display name for invoices and movement records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seller {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
}

impl Seller {
    /// Display name as shown on invoices ("first last").
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

// =============================================================================
// Sale Status
// =============================================================================

/// The status of a sale aggregate.
///
/// Only `Committed` sales are ever stored; `Cancelled` exists as a
/// transient guard state during cancellation so that two concurrent
/// cancellations of the same sale cannot both restock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    /// Sale was committed atomically: stock decremented, movements logged.
    Committed,
    /// Sale is being (or has been) reversed; terminal state before removal.
    Cancelled,
}

// =============================================================================
// Sale Line
// =============================================================================

/// A line item in a sale.
/// Uses snapshot pattern to freeze product data at time of sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleLine {
    /// Product this line refers to.
    pub product_id: String,
    /// Product name at time of sale (frozen).
    pub product_name: String,
    /// Unit price in cents at time of sale (frozen; taken from the ledger,
    /// never from client input).
    pub unit_price_cents: i64,
    /// Quantity sold. Always >= 1.
    pub quantity: i64,
    /// Line subtotal (unit_price × quantity).
    pub line_subtotal_cents: i64,
}

impl SaleLine {
    /// Builds a line by snapshotting the product's current name and price.
    ///
    /// ## Price Freezing
    /// The price is captured at this moment. If the product price changes
    /// later, this line retains the price that was actually charged.
    pub fn snapshot(product: &Product, quantity: i64) -> Self {
        SaleLine {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            unit_price_cents: product.price_cents,
            quantity,
            line_subtotal_cents: product
                .price()
                .multiply_quantity(quantity)
                .cents(),
        }
    }

    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the line subtotal as Money.
    #[inline]
    pub fn line_subtotal(&self) -> Money {
        Money::from_cents(self.line_subtotal_cents)
    }
}

// =============================================================================
// Sale Totals
// =============================================================================

/// Derived monetary totals of a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleTotals {
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
}

/// Recomputes sale totals from a set of lines.
///
/// This is a pure function: the engine calls it once the line set is final,
/// and the resulting values are stored on the sale verbatim. Totals are
/// never mutated independently of the lines they derive from.
///
/// - `subtotal = Σ line_subtotal`
/// - `tax = subtotal × 10%` (integer bps math, see [`Money::calculate_tax`])
/// - `total = subtotal + tax`
pub fn compute_totals(lines: &[SaleLine]) -> SaleTotals {
    let subtotal = lines
        .iter()
        .map(SaleLine::line_subtotal)
        .fold(Money::zero(), |acc, m| acc + m);
    let tax = subtotal.calculate_tax(TaxRate::sale_tax());

    SaleTotals {
        subtotal_cents: subtotal.cents(),
        tax_cents: tax.cents(),
        total_cents: (subtotal + tax).cents(),
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A committed sale transaction.
///
/// ## Lifecycle
/// Created only by the sale transaction engine, which commits it atomically
/// (stock decremented + movements logged + aggregate stored). Immutable once
/// committed; the only further operation is cancellation, which reverses the
/// inventory effects and removes the aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    /// Unique identifier (UUID v4).
    pub id: String,
    /// Business identifier: `F<YYYYMMDD><6-digit sequence>`, unique,
    /// assigned once, never reused.
    pub invoice_number: String,
    pub status: SaleStatus,
    /// When the sale was committed.
    pub occurred_at: DateTime<Utc>,
    pub customer_id: String,
    pub seller_id: String,
    /// Line items in insertion order (order is not semantically significant).
    pub lines: Vec<SaleLine>,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
}

impl Sale {
    /// Returns the stored totals.
    #[inline]
    pub fn totals(&self) -> SaleTotals {
        SaleTotals {
            subtotal_cents: self.subtotal_cents,
            tax_cents: self.tax_cents,
            total_cents: self.total_cents,
        }
    }
}

// =============================================================================
// Inventory Movement
// =============================================================================

/// Direction/reason class of an inventory movement.
///
/// Quantity on a movement is always positive; the direction is carried by
/// the kind, not by the sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    /// Stock entering (restock, sale cancellation compensation).
    Inbound,
    /// Stock leaving (sale, breakage write-off).
    Outbound,
    /// Manual correction (e.g. after a physical count).
    Adjustment,
}

/// An immutable, timestamped record of a stock change.
///
/// ## Append-Only
/// Movements are never updated or deleted once logged - even when the sale
/// that caused one is cancelled. Cancellation appends a compensating
/// `Inbound` movement instead of erasing history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryMovement {
    /// Log-assigned sequence id; also encodes insertion order.
    pub id: u64,
    pub product_id: String,
    pub occurred_at: DateTime<Utc>,
    pub kind: MovementKind,
    /// Units moved. Always positive; direction is in `kind`.
    pub quantity: i64,
    /// Free-text reason ("Sale F20230515000001", "Damaged in transit", ...).
    pub reason: String,
    /// Seller who caused the movement, when known.
    pub seller_id: Option<String>,
    /// Sale this movement belongs to, when it was caused by one.
    pub sale_id: Option<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_product(price_cents: i64, stock: i64) -> Product {
        Product {
            id: "p-1".to_string(),
            name: "Widget".to_string(),
            description: None,
            price_cents,
            stock,
            min_stock: 5,
            barcode: None,
            category_id: "c-1".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_tax_rate_sale_tax_is_ten_percent() {
        let rate = TaxRate::sale_tax();
        assert_eq!(rate.bps(), 1000);
        assert!((rate.percentage() - 10.0).abs() < 0.001);
    }

    #[test]
    fn test_product_can_fulfill() {
        let product = test_product(1000, 3);
        assert!(product.can_fulfill(3));
        assert!(!product.can_fulfill(4));
    }

    #[test]
    fn test_product_low_stock() {
        let mut product = test_product(1000, 3);
        assert!(product.is_low_stock()); // 3 <= 5

        product.stock = 6;
        assert!(!product.is_low_stock());
    }

    #[test]
    fn test_sale_line_snapshot_freezes_price_and_name() {
        let product = test_product(250, 10);
        let line = SaleLine::snapshot(&product, 4);

        assert_eq!(line.product_id, "p-1");
        assert_eq!(line.product_name, "Widget");
        assert_eq!(line.unit_price_cents, 250);
        assert_eq!(line.quantity, 4);
        assert_eq!(line.line_subtotal_cents, 1000);
    }

    #[test]
    fn test_compute_totals() {
        let product_a = test_product(1000, 10); // $10.00
        let product_b = Product {
            id: "p-2".to_string(),
            price_cents: 250, // $2.50
            ..test_product(0, 10)
        };

        let lines = vec![
            SaleLine::snapshot(&product_a, 2), // $20.00
            SaleLine::snapshot(&product_b, 4), // $10.00
        ];

        let totals = compute_totals(&lines);
        assert_eq!(totals.subtotal_cents, 3000); // $30.00
        assert_eq!(totals.tax_cents, 300); // 10% = $3.00
        assert_eq!(totals.total_cents, 3300); // $33.00
    }

    #[test]
    fn test_compute_totals_empty_is_zero() {
        let totals = compute_totals(&[]);
        assert_eq!(totals.subtotal_cents, 0);
        assert_eq!(totals.tax_cents, 0);
        assert_eq!(totals.total_cents, 0);
    }

    #[test]
    fn test_compute_totals_is_deterministic() {
        let product = test_product(333, 100);
        let lines = vec![SaleLine::snapshot(&product, 3)];

        let a = compute_totals(&lines);
        let b = compute_totals(&lines);
        assert_eq!(a, b);
        assert_eq!(a.total_cents, a.subtotal_cents + a.tax_cents);
    }

    #[test]
    fn test_display_names() {
        let customer = Customer {
            id: "c-1".to_string(),
            first_name: "Juan".to_string(),
            last_name: "Pérez".to_string(),
            address: None,
            phone: None,
            email: None,
        };
        assert_eq!(customer.display_name(), "Juan Pérez");

        let seller = Seller {
            id: "u-1".to_string(),
            first_name: "Ana".to_string(),
            last_name: "Martínez".to_string(),
            username: "ana".to_string(),
        };
        assert_eq!(seller.display_name(), "Ana Martínez");
    }
}
