//! # Sale Archive
//!
//! Store of committed sale aggregates.
//!
//! ## Cancellation Guard
//! Cancellation must restock each line exactly once, even when two requests
//! cancel the same sale concurrently. [`SaleArchive::begin_cancel`] performs
//! the `Committed → Cancelled` transition atomically under the archive's
//! write lock: exactly one caller wins the transition and gets the sale back
//! for compensation, every other caller gets a state error.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};

use vendo_core::{CoreError, CoreResult, Sale, SaleStatus};

// =============================================================================
// Sale Archive
// =============================================================================

/// In-memory store of committed sales, keyed by sale id.
#[derive(Debug, Default)]
pub struct SaleArchive {
    sales: RwLock<HashMap<String, Sale>>,
}

impl SaleArchive {
    pub fn new() -> Self {
        SaleArchive {
            sales: RwLock::new(HashMap::new()),
        }
    }

    /// Stores a committed sale.
    pub fn insert(&self, sale: Sale) {
        let mut map = self.sales.write().expect("sale archive lock poisoned");
        map.insert(sale.id.clone(), sale);
    }

    /// Returns a sale by id.
    pub fn get(&self, sale_id: &str) -> Option<Sale> {
        let map = self.sales.read().expect("sale archive lock poisoned");
        map.get(sale_id).cloned()
    }

    /// Atomically transitions a sale from `Committed` to `Cancelled` and
    /// returns it for compensation.
    ///
    /// ## Errors
    /// - [`CoreError::SaleNotFound`] if no sale has this id
    /// - [`CoreError::InvalidSaleState`] if the sale is already `Cancelled`
    ///   (another cancellation won the race)
    pub fn begin_cancel(&self, sale_id: &str) -> CoreResult<Sale> {
        let mut map = self.sales.write().expect("sale archive lock poisoned");

        let sale = map
            .get_mut(sale_id)
            .ok_or_else(|| CoreError::SaleNotFound(sale_id.to_string()))?;

        if sale.status != SaleStatus::Committed {
            return Err(CoreError::InvalidSaleState {
                sale_id: sale_id.to_string(),
                current_status: "cancelled".to_string(),
            });
        }

        sale.status = SaleStatus::Cancelled;
        Ok(sale.clone())
    }

    /// Removes a sale after its cancellation completed.
    pub fn remove(&self, sale_id: &str) -> Option<Sale> {
        let mut map = self.sales.write().expect("sale archive lock poisoned");
        map.remove(sale_id)
    }

    /// All sales for one customer, oldest first.
    pub fn by_customer(&self, customer_id: &str) -> Vec<Sale> {
        self.filtered(|s| s.customer_id == customer_id)
    }

    /// All sales committed in the inclusive `[start, end]` range, oldest
    /// first.
    pub fn by_date_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<Sale> {
        self.filtered(|s| s.occurred_at >= start && s.occurred_at <= end)
    }

    /// Number of stored sales.
    pub fn count(&self) -> usize {
        self.sales.read().expect("sale archive lock poisoned").len()
    }

    fn filtered<F>(&self, keep: F) -> Vec<Sale>
    where
        F: Fn(&Sale) -> bool,
    {
        let map = self.sales.read().expect("sale archive lock poisoned");
        let mut hits: Vec<Sale> = map.values().filter(|s| keep(s)).cloned().collect();
        hits.sort_by(|a, b| {
            a.occurred_at
                .cmp(&b.occurred_at)
                .then_with(|| a.invoice_number.cmp(&b.invoice_number))
        });
        hits
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
