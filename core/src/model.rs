//! Shared data model (spec.md §3): order-line items, residual demand, and
//! the picklists the builder emits.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

/// Key identifying one distinct (order, sku) demand line.
pub type OrderSku = (String, String);

/// One order line as handed to the core by the loader collaborator.
///
/// `bin`, `floor`, `aisle`, `rack` are optional lexicographic tie-break
/// keys; a missing value defaults to an empty string so the builder's
/// sort is total.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub order_id: String,
    pub sku: String,
    pub store_id: String,
    pub zone: String,
    pub bin: String,
    pub bin_rank: i64,
    pub floor: String,
    pub aisle: String,
    pub rack: String,
    pub order_qty: u32,
    pub weight_in_grams: u64,
    pub pod_priority: String,
    pub abs_cutoff: DateTime<Utc>,
    pub pods_per_picklist_in_that_zone: usize,
}

/// Owns the residual demand for one zone's builder invocation.
///
/// `by_order_sku` tracks remaining units per `(order_id, sku)` key;
/// `by_order` tracks remaining units per `order_id`, used to detect
/// order-completing picks. Invariant: every value is non-negative and
/// decreases monotonically as items are committed to picklists.
#[derive(Debug, Default)]
pub struct ResidualDemand {
    by_order_sku: HashMap<OrderSku, u32>,
    by_order: HashMap<String, u32>,
}

impl ResidualDemand {
    /// Aggregates duplicate `(order_id, sku)` rows at prep time (spec.md §4.3
    /// edge policy).
    pub fn from_items(items: &[Item]) -> Self {
        let mut by_order_sku = HashMap::new();
        let mut by_order = HashMap::new();

        for item in items {
            let key = (item.order_id.clone(), item.sku.clone());
            *by_order_sku.entry(key).or_insert(0) += item.order_qty;
            *by_order.entry(item.order_id.clone()).or_insert(0) += item.order_qty;
        }

        Self { by_order_sku, by_order }
    }

    pub fn remaining(&self, key: &OrderSku) -> u32 {
        self.by_order_sku.get(key).copied().unwrap_or(0)
    }

    pub fn order_remaining(&self, order_id: &str) -> u32 {
        self.by_order.get(order_id).copied().unwrap_or(0)
    }

    /// True iff committing this key's full residual would zero out the
    /// order (spec.md §4.3 step 1, `is_completing`).
    pub fn is_completing(&self, key: &OrderSku) -> bool {
        self.order_remaining(&key.0) == self.remaining(key)
    }

    pub fn has_any_positive(&self) -> bool {
        self.by_order_sku.values().any(|&q| q > 0)
    }

    /// Decrements residual for `key` and its owning order by `qty`.
    pub fn commit(&mut self, key: &OrderSku, qty: u32) {
        if let Some(v) = self.by_order_sku.get_mut(key) {
            *v = v.saturating_sub(qty);
        }
        if let Some(v) = self.by_order.get_mut(&key.0) {
            *v = v.saturating_sub(qty);
        }
    }

    /// Zeroes a single key out, e.g. when a seed is pathologically
    /// infeasible (spec.md §4.3 step 3).
    pub fn zero_out(&mut self, key: &OrderSku) {
        if let Some(v) = self.by_order_sku.get_mut(key) {
            let prev = *v;
            *v = 0;
            if let Some(o) = self.by_order.get_mut(&key.0) {
                *o = o.saturating_sub(prev);
            }
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &OrderSku> {
        self.by_order_sku.keys()
    }
}

/// Picklist type, derived from zone membership in `FRAGILE_ZONES`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PicklistType {
    Standard,
    Fragile,
}

/// One committed pick: the source item plus how many units of it were
/// taken onto this picklist.
#[derive(Debug, Clone, PartialEq)]
pub struct PickCommitment {
    pub item: Item,
    pub picked_qty: u32,
}

/// An ordered bundle of pick commitments one picker completes as a unit
/// (spec.md §3, Picklist).
#[derive(Debug, Clone)]
pub struct Picklist {
    pub picklist_no: String,
    pub zone: String,
    pub kind: PicklistType,
    pub items: Vec<PickCommitment>,
    pub duration_sec: u64,
    pub deadline: DateTime<Utc>,
    pub total_units: u32,
    pub store_count: usize,
}

impl Picklist {
    pub fn distinct_stores(items: &[PickCommitment]) -> usize {
        items
            .iter()
            .map(|c| c.item.store_id.as_str())
            .collect::<std::collections::HashSet<_>>()
            .len()
    }

    pub fn total_weight_grams(items: &[PickCommitment]) -> u64 {
        items
            .iter()
            .map(|c| c.item.weight_in_grams * c.picked_qty as u64)
            .sum()
    }

    pub fn min_cutoff(items: &[PickCommitment]) -> Option<DateTime<Utc>> {
        items.iter().map(|c| c.item.abs_cutoff).min()
    }
}
