//! Duration Model (spec.md §4.1): pure function, items → estimated seconds.

use std::collections::HashSet;

use crate::config::DurationConstants;
use crate::model::PickCommitment;

/// `duration = START_TO_ZONE + |distinct bin_rank| * BIN_TO_BIN
///   + (sum picked_qty) * PICK_PER_UNIT + |distinct order_id| * UNLOAD_PER_ORDER
///   + ZONE_TO_STAGING`. Empty input returns 0.
pub fn estimate(items: &[PickCommitment], constants: &DurationConstants) -> u64 {
    if items.is_empty() {
        return 0;
    }

    let distinct_bins: HashSet<i64> = items.iter().map(|c| c.item.bin_rank).collect();
    let distinct_orders: HashSet<&str> = items.iter().map(|c| c.item.order_id.as_str()).collect();
    let total_units: u64 = items.iter().map(|c| c.picked_qty as u64).sum();

    constants.start_to_zone
        + distinct_bins.len() as u64 * constants.bin_to_bin
        + total_units * constants.pick_per_unit
        + distinct_orders.len() as u64 * constants.unload_per_order
        + constants.zone_to_staging
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Item;
    use chrono::Utc;

    fn item(order_id: &str, bin_rank: i64) -> Item {
        Item {
            order_id: order_id.to_string(),
            sku: "SKU1".to_string(),
            store_id: "S1".to_string(),
            zone: "A".to_string(),
            bin: String::new(),
            bin_rank,
            floor: String::new(),
            aisle: String::new(),
            rack: String::new(),
            order_qty: 10,
            weight_in_grams: 100,
            pod_priority: "P1".to_string(),
            abs_cutoff: Utc::now(),
            pods_per_picklist_in_that_zone: 2,
        }
    }

    #[test]
    fn empty_input_is_zero() {
        assert_eq!(estimate(&[], &DurationConstants::default()), 0);
    }

    #[test]
    fn single_item_matches_scenario_one() {
        let commitments = vec![PickCommitment {
            item: item("O1", 1),
            picked_qty: 10,
        }];

        // 120 + 1*30 + 10*5 + 1*30 + 120 = 350
        assert_eq!(estimate(&commitments, &DurationConstants::default()), 350);
    }

    #[test]
    fn distinct_bins_and_orders_are_counted_once() {
        let commitments = vec![
            PickCommitment {
                item: item("O1", 1),
                picked_qty: 5,
            },
            PickCommitment {
                item: item("O1", 1),
                picked_qty: 5,
            },
            PickCommitment {
                item: item("O2", 2),
                picked_qty: 5,
            },
        ];

        // 120 + 2*30 + 15*5 + 2*30 + 120 = 495
        assert_eq!(estimate(&commitments, &DurationConstants::default()), 495);
    }
}
