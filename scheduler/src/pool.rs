//! Picker Pool (spec.md §4.5): builds picker availability from shift
//! definitions into a priority queue keyed by next-available time, with a
//! stable `picker_id` tiebreak.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use chrono::{DateTime, Days, NaiveDate, NaiveTime, TimeZone, Utc};
use core_lib::config::ShiftDef;

use crate::types::Picker;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct HeapEntry {
    next_available: DateTime<Utc>,
    picker_id: String,
    shift_end: DateTime<Utc>,
}

/// Min-heap of picker availability, ordered by next-available time with
/// `picker_id` as a deterministic tiebreaker (spec.md §9 design notes).
#[derive(Debug, Default)]
pub struct PickerPool {
    heap: BinaryHeap<Reverse<HeapEntry>>,
}

impl PickerPool {
    pub fn new() -> Self {
        Self { heap: BinaryHeap::new() }
    }

    /// Builds a pool from `base_date` and the ordered shift definitions.
    /// `count` picker entries are emitted per shift, each initially
    /// available at that shift's start.
    pub fn build(base_date: NaiveDate, shifts: &[ShiftDef]) -> Self {
        let mut pool = Self::new();
        let mut pid = 1u64;

        for shift in shifts {
            let start_time = NaiveTime::parse_from_str(&shift.start_hhmm, "%H:%M")
                .expect("shift start must be HH:MM");
            let end_time = NaiveTime::parse_from_str(&shift.end_hhmm, "%H:%M")
                .expect("shift end must be HH:MM");

            let shift_date = if shift.day_offset >= 0 {
                base_date + Days::new(shift.day_offset as u64)
            } else {
                base_date - Days::new((-shift.day_offset) as u64)
            };

            let shift_start = Utc.from_utc_datetime(&shift_date.and_time(start_time));
            let mut shift_end = Utc.from_utc_datetime(&shift_date.and_time(end_time));

            if shift_end <= shift_start {
                shift_end += chrono::Duration::days(1);
            }

            for _ in 0..shift.count {
                let picker_id = format!("{}_{pid}", shift.name);
                pid += 1;
                pool.push(Picker {
                    picker_id,
                    next_available: shift_start,
                    shift_end,
                });
            }
        }

        pool
    }

    /// Inserts or reinserts a picker at its current next-available time.
    pub fn push(&mut self, picker: Picker) {
        self.heap.push(Reverse(HeapEntry {
            next_available: picker.next_available,
            picker_id: picker.picker_id,
            shift_end: picker.shift_end,
        }));
    }

    /// Pops the earliest-available picker, if any.
    pub fn pop(&mut self) -> Option<Picker> {
        self.heap.pop().map(|Reverse(e)| Picker {
            picker_id: e.picker_id,
            next_available: e.next_available,
            shift_end: e.shift_end,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }
}
