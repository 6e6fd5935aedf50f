//! Picklist Scheduler (spec.md §4.6): assigns picklists to pickers using
//! the earliest-available priority queue, truncating and re-queueing the
//! remainder when a picklist cannot fit into a picker's remaining shift.
//!
//! Strictly sequential and single-threaded: it mutates one priority queue
//! and emits an ordered assignment stream (spec.md §5). Implements the
//! strict-as-specified variant of spec.md §9 Open Question 1 — a picker
//! popped during an unsuccessful attempt is never restored for later
//! picklists in the same run.

use chrono::{DateTime, Duration, Utc};
use core_lib::config::DurationConstants;
use core_lib::{PickCommitment, Picklist};
use tracing::{debug, instrument, warn};

use crate::pool::PickerPool;
use crate::types::{Assignment, AssignmentStatus, Picker};

/// Runs the scheduler over `picklists` in input order (no re-sorting),
/// draining `pool`. Returns the emitted assignments and the picklists
/// that could never be placed on any picker.
#[instrument(skip(picklists, pool, constants), fields(picklist_count = picklists.len()))]
pub fn assign(
    mut picklists: Vec<Picklist>,
    mut pool: PickerPool,
    global_op_start_time: DateTime<Utc>,
    constants: &DurationConstants,
) -> (Vec<Assignment>, Vec<Picklist>) {
    let mut assignments = Vec::new();
    let mut unassigned = Vec::new();
    let mut split_counter = 1u64;

    let mut idx = 0;
    while idx < picklists.len() {
        let pl = picklists[idx].clone();
        let mut assigned = false;

        while let Some(picker) = pool.pop() {
            let start_time = picker.next_available.max(global_op_start_time);
            let finish_time = start_time + Duration::seconds(pl.duration_sec as i64);

            if finish_time <= picker.shift_end {
                let status = if finish_time <= pl.deadline {
                    AssignmentStatus::OnTime
                } else {
                    AssignmentStatus::Late
                };

                if status == AssignmentStatus::Late {
                    warn!(picklist_no = %pl.picklist_no, picker_id = %picker.picker_id, "assignment is late");
                }

                assignments.push(Assignment {
                    picklist_no: pl.picklist_no.clone(),
                    picker_id: picker.picker_id.clone(),
                    start_time,
                    end_time: finish_time,
                    duration_sec: pl.duration_sec,
                    items: pl.items.clone(),
                    status,
                });

                pool.push(Picker {
                    picker_id: picker.picker_id,
                    next_available: finish_time,
                    shift_end: picker.shift_end,
                });

                assigned = true;
                break;
            }

            // Does not fit: try a truncate-and-requeue split.
            let remaining_shift = (picker.shift_end - start_time).num_seconds();
            if remaining_shift <= 0 {
                // Picker's shift is already over; discard it for this picklist.
                continue;
            }

            let prefix = truncate_prefix(&pl.items, remaining_shift as u64, constants);
            if prefix.is_empty() {
                continue;
            }

            let partial_duration = core_lib::duration::estimate(&prefix, constants);
            let partial_finish = start_time + Duration::seconds(partial_duration as i64);
            let partial_deadline = Picklist::min_cutoff(&prefix).expect("prefix is non-empty");

            if partial_finish <= partial_deadline {
                assignments.push(Assignment {
                    picklist_no: format!("{}_S{split_counter}", pl.picklist_no),
                    picker_id: picker.picker_id.clone(),
                    start_time,
                    end_time: partial_finish,
                    duration_sec: partial_duration,
                    items: prefix.clone(),
                    status: AssignmentStatus::OnTime,
                });

                pool.push(Picker {
                    picker_id: picker.picker_id,
                    next_available: partial_finish,
                    shift_end: picker.shift_end,
                });

                let remainder_items: Vec<PickCommitment> = pl.items[prefix.len()..].to_vec();
                if !remainder_items.is_empty() {
                    let remainder_duration = core_lib::duration::estimate(&remainder_items, constants);
                    let remainder_deadline =
                        Picklist::min_cutoff(&remainder_items).expect("remainder is non-empty");
                    let remainder = Picklist {
                        picklist_no: format!("{}_R{split_counter}", pl.picklist_no),
                        zone: pl.zone.clone(),
                        kind: pl.kind,
                        total_units: remainder_items.iter().map(|c| c.picked_qty).sum(),
                        store_count: Picklist::distinct_stores(&remainder_items),
                        items: remainder_items,
                        duration_sec: remainder_duration,
                        deadline: remainder_deadline,
                    };
                    picklists.insert(idx + 1, remainder);
                }

                split_counter += 1;
                assigned = true;
                break;
            }

            // Partial would miss its own deadline; discard this picker too.
        }

        if !assigned {
            debug!(picklist_no = %pl.picklist_no, "no picker could take this picklist");
            unassigned.push(pl);
        }

        idx += 1;
    }

    (assignments, unassigned)
}

/// Greedily takes items in order, stopping just before the running
/// duration would exceed `max_seconds` (spec.md §4.6 truncation).
fn truncate_prefix(items: &[PickCommitment], max_seconds: u64, constants: &DurationConstants) -> Vec<PickCommitment> {
    let mut subset = Vec::new();
    for item in items {
        subset.push(item.clone());
        if core_lib::duration::estimate(&subset, constants) > max_seconds {
            subset.pop();
            break;
        }
    }
    subset
}
