//! Picklist Builder (spec.md §4.3): per-zone greedy construction of
//! picklists from a residual demand pool, driven by the ATC scoring model.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, instrument, trace};

use crate::config::Config;
use crate::duration;
use crate::model::{Item, OrderSku, PickCommitment, Picklist, PicklistType, ResidualDemand};
use crate::scoring;

struct Candidate<'a> {
    key: OrderSku,
    item: &'a Item,
    qty: u32,
    score: f64,
    is_completing: bool,
}

/// Builds every picklist for one zone's items. `items` must all share
/// `zone`; `now` is the loop-invariant operation-start instant (spec.md
/// §4.3 edge policy — the builder never advances it between emissions).
/// Picklist numbers are zone-local placeholders (`"{zone}#{n}"`); the
/// driver renumbers densely after concatenating across zones.
#[instrument(skip(items, config), fields(zone = %zone, item_count = items.len()))]
pub fn build_zone(zone: &str, items: &[Item], now: DateTime<Utc>, config: &Config) -> Vec<Picklist> {
    let mut residual = ResidualDemand::from_items(items);
    let max_weight = config.max_weight_for_zone(zone);
    let kind = config.picklist_type_for_zone(zone);

    // First item seen for a given (order_id, sku) stands in as the
    // representative row: duplicates are assumed to share every
    // attribute but quantity, which `ResidualDemand` already aggregated.
    let mut representative: HashMap<OrderSku, &Item> = HashMap::new();
    for item in items {
        representative
            .entry((item.order_id.clone(), item.sku.clone()))
            .or_insert(item);
    }

    let mut picklists = Vec::new();
    let mut local_no = 1usize;

    while residual.has_any_positive() {
        let mut candidates: Vec<Candidate> = representative
            .iter()
            .filter_map(|(key, item)| {
                let qty = residual.remaining(key);
                if qty == 0 {
                    return None;
                }
                let score = scoring::score(qty, item.abs_cutoff, now, &config.duration, config.atc_k);
                let is_completing = residual.is_completing(key);
                Some(Candidate {
                    key: key.clone(),
                    item,
                    qty,
                    score,
                    is_completing,
                })
            })
            .collect();

        if candidates.is_empty() {
            break;
        }

        candidates.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.is_completing.cmp(&a.is_completing))
                .then_with(|| a.item.floor.cmp(&b.item.floor))
                .then_with(|| a.item.aisle.cmp(&b.item.aisle))
                .then_with(|| a.item.rack.cmp(&b.item.rack))
                .then_with(|| a.item.bin_rank.cmp(&b.item.bin_rank))
                // Final deterministic tiebreak: spec.md §5 requires emission
                // order to be deterministic given the input slice, but the
                // listed keys alone may still tie (e.g. identical bins).
                .then_with(|| a.key.cmp(&b.key))
        });

        let seed = &candidates[0];
        let max_qty_by_weight = if seed.item.weight_in_grams > 0 {
            (max_weight / seed.item.weight_in_grams) as u32
        } else {
            config.max_items_per_picklist
        };
        let seed_qty = seed.qty.min(config.max_items_per_picklist).min(max_qty_by_weight);

        if seed_qty == 0 {
            // Defensive: a single unit of this row exceeds the zone's
            // weight cap. Drop it and retry the loop with it gone.
            trace!(order_id = %seed.item.order_id, sku = %seed.item.sku, "seed infeasible, zeroing residual");
            residual.zero_out(&seed.key);
            continue;
        }

        let seed_key = seed.key.clone();
        let seed_item = seed.item;

        let mut picklist_items = vec![PickCommitment {
            item: seed_item.clone(),
            picked_qty: seed_qty,
        }];
        residual.commit(&seed_key, seed_qty);

        let mut current_weight = seed_qty as u64 * seed_item.weight_in_grams;
        let mut current_units = seed_qty;
        let mut current_stores: HashSet<String> = HashSet::new();
        current_stores.insert(seed_item.store_id.clone());
        let mut min_cutoff = seed_item.abs_cutoff;
        let max_pods = seed_item.pods_per_picklist_in_that_zone;

        for candidate in &candidates[1..] {
            if residual.remaining(&candidate.key) == 0 {
                continue;
            }
            if current_stores.len() >= max_pods && !current_stores.contains(&candidate.item.store_id) {
                continue;
            }

            let max_qty_by_items = config.max_items_per_picklist - current_units;
            let max_qty_by_weight = if candidate.item.weight_in_grams > 0 {
                ((max_weight - current_weight) / candidate.item.weight_in_grams) as u32
            } else {
                max_qty_by_items
            };
            let pick_qty = residual
                .remaining(&candidate.key)
                .min(max_qty_by_items)
                .min(max_qty_by_weight);

            if pick_qty == 0 {
                continue;
            }

            let proposed_min_cutoff = min_cutoff.min(candidate.item.abs_cutoff);
            let mut tentative = picklist_items.clone();
            tentative.push(PickCommitment {
                item: candidate.item.clone(),
                picked_qty: pick_qty,
            });
            let tentative_duration = duration::estimate(&tentative, &config.duration);
            let finish = now + Duration::seconds(tentative_duration as i64);

            if finish <= proposed_min_cutoff {
                picklist_items = tentative;
                current_weight += pick_qty as u64 * candidate.item.weight_in_grams;
                current_units += pick_qty;
                current_stores.insert(candidate.item.store_id.clone());
                min_cutoff = proposed_min_cutoff;
                residual.commit(&candidate.key, pick_qty);
            }
        }

        let final_duration = duration::estimate(&picklist_items, &config.duration);
        let store_count = Picklist::distinct_stores(&picklist_items);

        picklists.push(Picklist {
            picklist_no: format!("{zone}#{local_no}"),
            zone: zone.to_string(),
            kind,
            items: picklist_items,
            duration_sec: final_duration,
            deadline: min_cutoff,
            total_units: current_units,
            store_count,
        });
        local_no += 1;
    }

    debug!(picklists = picklists.len(), "zone build complete");
    picklists
}

impl PicklistType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PicklistType::Standard => "Standard",
            PicklistType::Fragile => "Fragile",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn base_item(order_id: &str, sku: &str, store: &str, qty: u32, weight: u64, cutoff_secs: i64) -> Item {
        Item {
            order_id: order_id.to_string(),
            sku: sku.to_string(),
            store_id: store.to_string(),
            zone: "A".to_string(),
            bin: String::new(),
            bin_rank: 1,
            floor: "1".to_string(),
            aisle: "1".to_string(),
            rack: "1".to_string(),
            order_qty: qty,
            weight_in_grams: weight,
            pod_priority: "P1".to_string(),
            abs_cutoff: Utc::now() + Duration::seconds(cutoff_secs),
            pods_per_picklist_in_that_zone: 2,
        }
    }

    #[test]
    fn single_urgent_item_emits_one_picklist() {
        let now = Utc::now();
        let config = Config::default();
        let item = Item {
            abs_cutoff: now + Duration::seconds(600),
            ..base_item("O1", "SKU1", "S1", 10, 100, 600)
        };

        let picklists = build_zone("A", &[item], now, &config);

        assert_eq!(picklists.len(), 1);
        assert_eq!(picklists[0].total_units, 10);
        assert_eq!(picklists[0].duration_sec, 350);
        assert_eq!(picklists[0].store_count, 1);
    }

    #[test]
    fn weight_cap_splits_into_two_picklists() {
        let now = Utc::now();
        let config = Config::default();
        let item = base_item("O1", "SKU1", "S1", 3000, 100, 36_000);

        let picklists = build_zone("A", &[item], now, &config);

        assert_eq!(picklists.len(), 2);
        assert_eq!(picklists[0].total_units, 2000);
        assert_eq!(picklists[1].total_units, 1000);
    }

    #[test]
    fn fragile_zone_uses_lower_weight_cap() {
        let now = Utc::now();
        let config = Config::default();
        let mut item = base_item("O1", "SKU1", "S1", 3000, 100, 36_000);
        item.zone = "FRAGILE_FD".to_string();

        let picklists = build_zone("FRAGILE_FD", &[item], now, &config);

        assert_eq!(picklists.len(), 6);
        for pl in &picklists {
            assert_eq!(pl.total_units, 500);
            assert_eq!(pl.kind, PicklistType::Fragile);
        }
    }

    #[test]
    fn store_diversity_cap_forces_a_new_picklist() {
        let now = Utc::now();
        let config = Config::default();
        let far_cutoff = 36_000;

        let mut i1 = base_item("O1", "SKU1", "S1", 10, 100, far_cutoff);
        i1.pods_per_picklist_in_that_zone = 2;
        let mut i2 = base_item("O2", "SKU2", "S2", 10, 100, far_cutoff);
        i2.pods_per_picklist_in_that_zone = 2;
        let mut i3 = base_item("O3", "SKU3", "S3", 10, 100, far_cutoff);
        i3.pods_per_picklist_in_that_zone = 2;

        let picklists = build_zone("A", &[i1, i2, i3], now, &config);

        assert_eq!(picklists.len(), 2);
        assert!(picklists[0].store_count <= 2);
        assert_eq!(picklists[1].total_units, 10);
    }

    #[test]
    fn zero_weight_item_is_unbounded_by_weight() {
        let now = Utc::now();
        let config = Config::default();
        let item = base_item("O1", "SKU1", "S1", 2500, 0, 36_000);

        let picklists = build_zone("A", &[item], now, &config);

        // Capped by MAX_ITEMS_PER_PICKLIST (2000), not by weight.
        assert_eq!(picklists.len(), 2);
        assert_eq!(picklists[0].total_units, 2000);
        assert_eq!(picklists[1].total_units, 500);
    }

    #[test]
    fn duplicate_rows_for_same_order_sku_are_aggregated() {
        let now = Utc::now();
        let config = Config::default();
        let i1 = base_item("O1", "SKU1", "S1", 6, 100, 36_000);
        let i2 = base_item("O1", "SKU1", "S1", 4, 100, 36_000);

        let picklists = build_zone("A", &[i1, i2], now, &config);

        assert_eq!(picklists.len(), 1);
        assert_eq!(picklists[0].total_units, 10);
    }

    #[test]
    fn items_every_picklist_shares_zone_and_respects_caps() {
        let now = Utc::now();
        let config = Config::default();
        let item = base_item("O1", "SKU1", "S1", 50, 100, 36_000);

        let picklists = build_zone("A", &[item], now, &config);

        for pl in &picklists {
            assert!(pl.total_units <= config.max_items_per_picklist);
            assert!(Picklist::total_weight_grams(&pl.items) <= config.max_weight_std);
            for c in &pl.items {
                assert_eq!(c.item.zone, pl.zone);
            }
        }
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use chrono::{Duration, Utc};
    use proptest::prelude::*;

    fn item_strategy() -> impl Strategy<Value = (String, String, String, u32, u64, i64)> {
        (
            prop::sample::select(vec!["O1", "O2", "O3", "O4"]).prop_map(String::from),
            prop::sample::select(vec!["SKU1", "SKU2", "SKU3"]).prop_map(String::from),
            prop::sample::select(vec!["S1", "S2", "S3"]).prop_map(String::from),
            1u32..50,
            1u64..500,
            3_600i64..36_000,
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        /// Every picklist the builder emits respects the zone's weight and
        /// item-count caps, and every committed item belongs to the zone it
        /// was built for (spec.md §8 invariants).
        #[test]
        fn every_picklist_respects_its_caps(rows in prop::collection::vec(item_strategy(), 1..15)) {
            let now = Utc::now();
            let config = Config::default();

            let items: Vec<Item> = rows
                .into_iter()
                .enumerate()
                .map(|(i, (order_id, sku, store_id, qty, weight, cutoff_secs))| Item {
                    order_id,
                    sku,
                    store_id,
                    zone: "A".to_string(),
                    bin: String::new(),
                    bin_rank: (i % 3) as i64,
                    floor: String::new(),
                    aisle: String::new(),
                    rack: String::new(),
                    order_qty: qty,
                    weight_in_grams: weight,
                    pod_priority: "P1".to_string(),
                    abs_cutoff: now + Duration::seconds(cutoff_secs),
                    pods_per_picklist_in_that_zone: 3,
                })
                .collect();

            let picklists = build_zone("A", &items, now, &config);

            for pl in &picklists {
                prop_assert!(pl.total_units <= config.max_items_per_picklist);
                prop_assert!(Picklist::total_weight_grams(&pl.items) <= config.max_weight_std);
                for c in &pl.items {
                    prop_assert_eq!(&c.item.zone, &pl.zone);
                }
            }
        }

        /// Residual demand is conserved: every unit of input quantity is
        /// accounted for across the emitted picklists, since the builder
        /// always commits its seed unconditionally (spec.md §4.3 step 2).
        #[test]
        fn residual_demand_is_conserved(rows in prop::collection::vec(item_strategy(), 1..15)) {
            let now = Utc::now();
            let config = Config::default();

            let items: Vec<Item> = rows
                .into_iter()
                .enumerate()
                .map(|(i, (order_id, sku, store_id, qty, weight, cutoff_secs))| Item {
                    order_id,
                    sku,
                    store_id,
                    zone: "A".to_string(),
                    bin: String::new(),
                    bin_rank: (i % 3) as i64,
                    floor: String::new(),
                    aisle: String::new(),
                    rack: String::new(),
                    order_qty: qty,
                    weight_in_grams: weight,
                    pod_priority: "P1".to_string(),
                    abs_cutoff: now + Duration::seconds(cutoff_secs),
                    pods_per_picklist_in_that_zone: 3,
                })
                .collect();

            let input_total: u64 = items.iter().map(|i| i.order_qty as u64).sum();
            let picklists = build_zone("A", &items, now, &config);
            let output_total: u64 = picklists.iter().map(|pl| pl.total_units as u64).sum();

            prop_assert_eq!(input_total, output_total);
        }
    }
}
