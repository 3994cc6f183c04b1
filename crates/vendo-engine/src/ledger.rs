//! # Product Ledger
//!
//! The single authority for product stock. Every stock read-then-write in
//! the system goes through [`ProductLedger::adjust_stock`], which holds that
//! product's lock for the whole check-and-apply sequence.
//!
//! ## Concurrency Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      ProductLedger                                      │
//! │                                                                         │
//! │  RwLock<HashMap<product_id, Arc<Mutex<Product>>>>                       │
//! │  └──┬───┘                   └─────┬──────┘                              │
//! │     │                             │                                     │
//! │     │ map lock: held only to      │ per-product lock: held for the      │
//! │     │ look up / insert entries    │ whole check-and-apply sequence      │
//! │     │ (microseconds)              │ on ONE product                      │
//! │                                                                         │
//! │  Two sales touching different products never contend.                   │
//! │  Two sales touching the same product serialize on its Mutex, so the     │
//! │  non-negativity check and the decrement are one atomic step.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why Two Lock Levels?
//! A single map-wide lock would serialize unrelated sales. Locking per
//! product keeps the hot path (adjust one product) independent of every
//! other product while still making check+apply atomic where it matters.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use chrono::Utc;
use tracing::debug;

use vendo_core::validation::{validate_price_cents, validate_product_name};
use vendo_core::{CoreError, CoreResult, Product, ValidationError};

// =============================================================================
// Product Ledger
// =============================================================================

/// In-memory authority for products and their stock.
#[derive(Debug, Default)]
pub struct ProductLedger {
    products: RwLock<HashMap<String, Arc<Mutex<Product>>>>,
}

impl ProductLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        ProductLedger {
            products: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a product. Replaces any existing entry with the same id.
    ///
    /// Rejects empty or over-long names and negative prices before anything
    /// is stored.
    pub fn insert(&self, product: Product) -> CoreResult<()> {
        validate_product_name(&product.name)?;
        validate_price_cents(product.price_cents)?;

        let mut map = self.products.write().expect("product ledger lock poisoned");
        map.insert(product.id.clone(), Arc::new(Mutex::new(product)));
        Ok(())
    }

    /// Returns a point-in-time snapshot of a product.
    ///
    /// The snapshot is a clone: stock read from it may be stale by the time
    /// the caller acts on it. Decisions that must be exact (the
    /// non-negativity guard) happen inside [`adjust_stock`](Self::adjust_stock),
    /// not against snapshots.
    pub fn get(&self, product_id: &str) -> Option<Product> {
        let entry = self.entry(product_id)?;
        let product = entry.lock().expect("product entry lock poisoned");
        Some(product.clone())
    }

    /// Returns the current stock of a product.
    pub fn stock(&self, product_id: &str) -> CoreResult<i64> {
        self.get(product_id)
            .map(|p| p.stock)
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))
    }

    /// Applies a signed stock delta atomically and returns the new stock.
    ///
    /// ## Atomicity
    /// The non-negativity check and the write happen under the product's own
    /// lock. Concurrent adjustments to the same product serialize here; the
    /// loser of a race sees the winner's stock, not the snapshot it
    /// validated against.
    ///
    /// ## Errors
    /// - [`CoreError::ProductNotFound`] if the product is not registered
    /// - [`CoreError::InsufficientStock`] if `stock + delta < 0`; stock is
    ///   left untouched
    /// - A validation error if `stock + delta` overflows `i64`; stock is
    ///   left untouched
    pub fn adjust_stock(&self, product_id: &str, delta: i64) -> CoreResult<i64> {
        let entry = self
            .entry(product_id)
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;

        let mut product = entry.lock().expect("product entry lock poisoned");

        let new_stock = product.stock.checked_add(delta).ok_or_else(|| {
            ValidationError::OutOfRange {
                field: "stock".to_string(),
                min: 0,
                max: i64::MAX,
            }
        })?;
        if new_stock < 0 {
            return Err(CoreError::InsufficientStock {
                name: product.name.clone(),
                available: product.stock,
                requested: -delta,
            });
        }

        product.stock = new_stock;
        product.updated_at = Utc::now();

        debug!(
            product_id = %product.id,
            delta,
            new_stock,
            "stock adjusted"
        );

        Ok(new_stock)
    }

    /// Updates a product's unit price.
    ///
    /// Committed sale lines are unaffected: they carry the price snapshot
    /// taken when the sale was made. Negative prices are rejected before
    /// the lookup.
    pub fn update_price(&self, product_id: &str, price_cents: i64) -> CoreResult<()> {
        validate_price_cents(price_cents)?;

        let entry = self
            .entry(product_id)
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;

        let mut product = entry.lock().expect("product entry lock poisoned");
        product.price_cents = price_cents;
        product.updated_at = Utc::now();
        Ok(())
    }

    /// Returns snapshots of all products at or below their minimum stock.
    pub fn low_stock(&self) -> Vec<Product> {
        let map = self.products.read().expect("product ledger lock poisoned");
        let mut low: Vec<Product> = map
            .values()
            .map(|entry| entry.lock().expect("product entry lock poisoned").clone())
            .filter(Product::is_low_stock)
            .collect();
        low.sort_by(|a, b| a.name.cmp(&b.name));
        low
    }

    /// Number of registered products.
    pub fn count(&self) -> usize {
        let map = self.products.read().expect("product ledger lock poisoned");
        map.len()
    }

    /// Clones the Arc for a product entry, holding the map lock only for
    /// the lookup.
    fn entry(&self, product_id: &str) -> Option<Arc<Mutex<Product>>> {
        let map = self.products.read().expect("product ledger lock poisoned");
        map.get(product_id).cloned()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn test_product(id: &str, stock: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            description: None,
            price_cents: 1000,
            stock,
            min_stock: 5,
            barcode: None,
            category_id: "cat-1".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_insert_and_get() {
        let ledger = ProductLedger::new();
        ledger.insert(test_product("p-1", 10)).unwrap();

        let product = ledger.get("p-1").unwrap();
        assert_eq!(product.stock, 10);
        assert!(ledger.get("p-missing").is_none());
    }

    #[test]
    fn test_adjust_stock_applies_signed_deltas() {
        let ledger = ProductLedger::new();
        ledger.insert(test_product("p-1", 10)).unwrap();

        assert_eq!(ledger.adjust_stock("p-1", -3).unwrap(), 7);
        assert_eq!(ledger.adjust_stock("p-1", 5).unwrap(), 12);
        assert_eq!(ledger.stock("p-1").unwrap(), 12);
    }

    #[test]
    fn test_adjust_stock_rejects_negative_result() {
        let ledger = ProductLedger::new();
        ledger.insert(test_product("p-1", 3)).unwrap();

        let err = ledger.adjust_stock("p-1", -5).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InsufficientStock {
                available: 3,
                requested: 5,
                ..
            }
        ));

        // Stock untouched after the rejected adjustment.
        assert_eq!(ledger.stock("p-1").unwrap(), 3);
    }

    #[test]
    fn test_adjust_stock_to_exactly_zero_is_allowed() {
        let ledger = ProductLedger::new();
        ledger.insert(test_product("p-1", 4)).unwrap();

        assert_eq!(ledger.adjust_stock("p-1", -4).unwrap(), 0);
    }

    #[test]
    fn test_adjust_stock_rejects_overflowing_delta() {
        let ledger = ProductLedger::new();
        ledger.insert(test_product("p-1", 10)).unwrap();

        let err = ledger.adjust_stock("p-1", i64::MAX).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));

        // Stock untouched after the rejected adjustment.
        assert_eq!(ledger.stock("p-1").unwrap(), 10);
    }

    #[test]
    fn test_insert_validates_name_and_price() {
        let ledger = ProductLedger::new();

        let mut unnamed = test_product("p-1", 10);
        unnamed.name = "   ".to_string();
        assert!(matches!(
            ledger.insert(unnamed).unwrap_err(),
            CoreError::Validation(_)
        ));

        let mut negative = test_product("p-2", 10);
        negative.price_cents = -500;
        assert!(matches!(
            ledger.insert(negative).unwrap_err(),
            CoreError::Validation(_)
        ));

        assert_eq!(ledger.count(), 0);
    }

    #[test]
    fn test_adjust_stock_unknown_product() {
        let ledger = ProductLedger::new();
        let err = ledger.adjust_stock("ghost", -1).unwrap_err();
        assert!(matches!(err, CoreError::ProductNotFound(_)));
    }

    #[test]
    fn test_update_price() {
        let ledger = ProductLedger::new();
        ledger.insert(test_product("p-1", 10)).unwrap();

        ledger.update_price("p-1", 2500).unwrap();
        assert_eq!(ledger.get("p-1").unwrap().price_cents, 2500);
    }

    #[test]
    fn test_update_price_rejects_negative() {
        let ledger = ProductLedger::new();
        ledger.insert(test_product("p-1", 10)).unwrap();

        let err = ledger.update_price("p-1", -100).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(ledger.get("p-1").unwrap().price_cents, 1000);
    }

    #[test]
    fn test_low_stock_sorted_by_name() {
        let ledger = ProductLedger::new();

        let mut a = test_product("p-a", 2); // low (2 <= 5)
        a.name = "Beta".to_string();
        let mut b = test_product("p-b", 100); // fine
        b.name = "Alpha".to_string();
        let mut c = test_product("p-c", 5); // low (5 <= 5, boundary)
        c.name = "Alpha Prime".to_string();

        ledger.insert(a).unwrap();
        ledger.insert(b).unwrap();
        ledger.insert(c).unwrap();

        let low = ledger.low_stock();
        let names: Vec<&str> = low.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha Prime", "Beta"]);
    }

    #[test]
    fn test_concurrent_adjustments_never_go_negative() {
        let ledger = Arc::new(ProductLedger::new());
        ledger.insert(test_product("p-1", 50)).unwrap();

        // 20 threads each try to take 5 units; only 10 can succeed.
        let handles: Vec<_> = (0..20)
            .map(|_| {
                let ledger = Arc::clone(&ledger);
                thread::spawn(move || ledger.adjust_stock("p-1", -5).is_ok())
            })
            .collect();

        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();

        assert_eq!(successes, 10);
        assert_eq!(ledger.stock("p-1").unwrap(), 0);
    }

    #[test]
    fn test_concurrent_mixed_deltas_balance() {
        let ledger = Arc::new(ProductLedger::new());
        ledger.insert(test_product("p-1", 1000)).unwrap();

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let ledger = Arc::clone(&ledger);
                let delta = if i % 2 == 0 { -7 } else { 7 };
                thread::spawn(move || {
                    for _ in 0..50 {
                        ledger.adjust_stock("p-1", delta).unwrap();
                    }
                })
            })
            .collect();

        for h in handles {
            h.join().unwrap();
        }

        // Equal numbers of +7 and -7: back where we started.
        assert_eq!(ledger.stock("p-1").unwrap(), 1000);
    }
}
