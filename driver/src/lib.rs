//! Parallel Builder Driver (spec.md §4.4): partitions demand by zone and
//! runs one builder per zone concurrently, using a worker pool sized to
//! available CPU cores.
//!
//! Each worker operates exclusively on its own zone slice — residuals are
//! zone-local, so there is no shared mutable state and no coordination
//! beyond result collection (spec.md §5).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use core_lib::{Config, Item, Picklist};
use rayon::prelude::*;
use tracing::{info, instrument};

/// Splits `items` into one slice per distinct zone, builds each zone
/// concurrently, and concatenates results in zone-name order so that the
/// dense `picklist_no` assigned afterward is reproducible across runs
/// (spec.md §9 Open Question 4).
#[instrument(skip(items, config), fields(item_count = items.len()))]
pub fn build_all(items: Vec<Item>, now: DateTime<Utc>, config: &Config) -> Vec<Picklist> {
    let mut by_zone: BTreeMap<String, Vec<Item>> = BTreeMap::new();
    for item in items {
        by_zone.entry(item.zone.clone()).or_default().push(item);
    }

    info!(zones = by_zone.len(), "partitioned demand by zone");

    let zones: Vec<(String, Vec<Item>)> = by_zone.into_iter().collect();

    let mut per_zone: Vec<(String, Vec<Picklist>)> = zones
        .into_par_iter()
        .map(|(zone, zone_items)| {
            let picklists = core_lib::builder::build_zone(&zone, &zone_items, now, config);
            (zone, picklists)
        })
        .collect();

    // Deterministic concat order: zone name ascending (already the
    // BTreeMap order, but the parallel collect does not preserve it).
    per_zone.sort_by(|a, b| a.0.cmp(&b.0));

    let mut out = Vec::new();
    let mut counter = 1u64;
    for (_, picklists) in per_zone {
        for mut pl in picklists {
            pl.picklist_no = format!("PL_{counter:06}");
            counter += 1;
            out.push(pl);
        }
    }

    info!(picklists = out.len(), "build complete");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn item(zone: &str, order_id: &str) -> Item {
        Item {
            order_id: order_id.to_string(),
            sku: "SKU1".to_string(),
            store_id: "S1".to_string(),
            zone: zone.to_string(),
            bin: String::new(),
            bin_rank: 1,
            floor: "1".to_string(),
            aisle: "1".to_string(),
            rack: "1".to_string(),
            order_qty: 10,
            weight_in_grams: 100,
            pod_priority: "P1".to_string(),
            abs_cutoff: Utc::now() + Duration::seconds(36_000),
            pods_per_picklist_in_that_zone: 2,
        }
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let now = Utc::now();
        let config = Config::default();
        assert!(build_all(vec![], now, &config).is_empty());
    }

    #[test]
    fn picklist_numbers_are_dense_and_zone_ordered() {
        let now = Utc::now();
        let config = Config::default();
        let items = vec![item("B", "O1"), item("A", "O2")];

        let picklists = build_all(items, now, &config);

        assert_eq!(picklists.len(), 2);
        assert_eq!(picklists[0].zone, "A");
        assert_eq!(picklists[0].picklist_no, "PL_000001");
        assert_eq!(picklists[1].zone, "B");
        assert_eq!(picklists[1].picklist_no, "PL_000002");
    }

    #[test]
    fn every_picklist_items_share_its_zone() {
        let now = Utc::now();
        let config = Config::default();
        let items = vec![item("A", "O1"), item("B", "O2")];

        for pl in build_all(items, now, &config) {
            for c in &pl.items {
                assert_eq!(c.item.zone, pl.zone);
            }
        }
    }
}
