//! # Inventory Movement Log
//!
//! Append-only audit trail of every stock change.
//!
//! ## Append-Only Contract
//! Movements are never updated or deleted once logged. Sale cancellation does
//! not erase the original `Outbound` movements; it appends compensating
//! `Inbound` ones. The log is the system's audit history: what it says
//! happened, happened.
//!
//! ## Ordering
//! Every query returns movements sorted by timestamp ascending; ties (same
//! timestamp) fall back to the log-assigned id, which encodes insertion
//! order. Two movements appended in the same clock tick still come back in
//! the order they were appended.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use tracing::debug;

use vendo_core::{InventoryMovement, MovementKind};

// =============================================================================
// Movement Draft
// =============================================================================

/// Everything the caller supplies for a new movement; the log assigns the
/// id and the timestamp.
#[derive(Debug, Clone)]
pub struct MovementDraft {
    pub product_id: String,
    pub kind: MovementKind,
    /// Units moved. Always positive; callers convert signed deltas before
    /// logging.
    pub quantity: i64,
    pub reason: String,
    pub seller_id: Option<String>,
    pub sale_id: Option<String>,
}

// =============================================================================
// Movement Log
// =============================================================================

/// In-memory append-only movement log.
#[derive(Debug, Default)]
pub struct MovementLog {
    entries: Mutex<Vec<InventoryMovement>>,
    next_id: AtomicU64,
}

impl MovementLog {
    /// Creates an empty log. Ids start at 1.
    pub fn new() -> Self {
        MovementLog {
            entries: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Appends a movement and returns its log-assigned id.
    ///
    /// Append is infallible for the in-memory log; the id sequence is atomic
    /// so concurrent appends never collide.
    pub fn append(&self, draft: MovementDraft) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let movement = InventoryMovement {
            id,
            product_id: draft.product_id,
            occurred_at: Utc::now(),
            kind: draft.kind,
            quantity: draft.quantity,
            reason: draft.reason,
            seller_id: draft.seller_id,
            sale_id: draft.sale_id,
        };

        debug!(
            movement_id = id,
            product_id = %movement.product_id,
            kind = ?movement.kind,
            quantity = movement.quantity,
            "movement logged"
        );

        let mut entries = self.entries.lock().expect("movement log lock poisoned");
        entries.push(movement);
        id
    }

    /// All movements for one product, timestamp ascending.
    pub fn by_product(&self, product_id: &str) -> Vec<InventoryMovement> {
        self.filtered(|m| m.product_id == product_id)
    }

    /// All movements of one kind, timestamp ascending.
    pub fn by_kind(&self, kind: MovementKind) -> Vec<InventoryMovement> {
        self.filtered(|m| m.kind == kind)
    }

    /// All movements in the inclusive `[start, end]` range, timestamp
    /// ascending.
    pub fn by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<InventoryMovement> {
        self.filtered(|m| m.occurred_at >= start && m.occurred_at <= end)
    }

    /// All movements attached to one sale, timestamp ascending.
    pub fn by_sale(&self, sale_id: &str) -> Vec<InventoryMovement> {
        self.filtered(|m| m.sale_id.as_deref() == Some(sale_id))
    }

    /// Total number of movements logged.
    pub fn len(&self) -> usize {
        self.entries.lock().expect("movement log lock poisoned").len()
    }

    /// `true` if nothing has been logged yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn filtered<F>(&self, keep: F) -> Vec<InventoryMovement>
    where
        F: Fn(&InventoryMovement) -> bool,
    {
        let entries = self.entries.lock().expect("movement log lock poisoned");
        let mut hits: Vec<InventoryMovement> =
            entries.iter().filter(|m| keep(m)).cloned().collect();
        // Ids break timestamp ties in insertion order.
        hits.sort_by_key(|m| (m.occurred_at, m.id));
        hits
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn draft(product_id: &str, kind: MovementKind, quantity: i64) -> MovementDraft {
        MovementDraft {
            product_id: product_id.to_string(),
            kind,
            quantity,
            reason: "test movement".to_string(),
            seller_id: None,
            sale_id: None,
        }
    }

    #[test]
    fn test_append_assigns_sequential_ids() {
        let log = MovementLog::new();
        assert_eq!(log.append(draft("p-1", MovementKind::Inbound, 10)), 1);
        assert_eq!(log.append(draft("p-1", MovementKind::Outbound, 3)), 2);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_by_product_filters_and_orders() {
        let log = MovementLog::new();
        log.append(draft("p-1", MovementKind::Inbound, 10));
        log.append(draft("p-2", MovementKind::Inbound, 5));
        log.append(draft("p-1", MovementKind::Outbound, 2));

        let hits = log.by_product("p-1");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, 1);
        assert_eq!(hits[1].id, 3);
    }

    #[test]
    fn test_by_kind() {
        let log = MovementLog::new();
        log.append(draft("p-1", MovementKind::Inbound, 10));
        log.append(draft("p-1", MovementKind::Outbound, 2));
        log.append(draft("p-1", MovementKind::Adjustment, 1));

        assert_eq!(log.by_kind(MovementKind::Outbound).len(), 1);
        assert_eq!(log.by_kind(MovementKind::Adjustment).len(), 1);
    }

    #[test]
    fn test_by_date_range_is_inclusive() {
        let log = MovementLog::new();
        log.append(draft("p-1", MovementKind::Inbound, 1));
        let all = log.by_product("p-1");
        let when = all[0].occurred_at;

        assert_eq!(log.by_date_range(when, when).len(), 1);
        assert!(log
            .by_date_range(when + chrono::Duration::seconds(1), when + chrono::Duration::seconds(2))
            .is_empty());
    }

    #[test]
    fn test_by_sale() {
        let log = MovementLog::new();
        let mut d = draft("p-1", MovementKind::Outbound, 2);
        d.sale_id = Some("s-1".to_string());
        log.append(d);
        log.append(draft("p-1", MovementKind::Inbound, 5));

        assert_eq!(log.by_sale("s-1").len(), 1);
        assert!(log.by_sale("s-2").is_empty());
    }

    #[test]
    fn test_same_timestamp_ties_break_by_insertion_order() {
        // Appends in a tight loop frequently share a timestamp; the query
        // must still return them in append order.
        let log = MovementLog::new();
        for _ in 0..50 {
            log.append(draft("p-1", MovementKind::Inbound, 1));
        }

        let hits = log.by_product("p-1");
        let ids: Vec<u64> = hits.iter().map(|m| m.id).collect();
        let expected: Vec<u64> = (1..=50).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_concurrent_appends_get_distinct_ids() {
        let log = Arc::new(MovementLog::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let log = Arc::clone(&log);
                thread::spawn(move || {
                    (0..25)
                        .map(|_| log.append(draft("p-1", MovementKind::Inbound, 1)))
                        .collect::<Vec<u64>>()
                })
            })
            .collect();

        let mut ids: Vec<u64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        ids.sort_unstable();
        ids.dedup();

        assert_eq!(ids.len(), 200);
        assert_eq!(log.len(), 200);
    }
}
