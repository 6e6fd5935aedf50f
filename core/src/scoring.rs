//! ATC Scoring Model (spec.md §4.2): apparent-tardiness-cost priority,
//! pick density times exponential urgency in slack. Pure, CPU-bound.
//!
//! This implements the raw-slack form (spec.md §9 Open Question 2): slack
//! is not normalized by `time_until_cutoff` before the exponential, since
//! that yields a time-invariant urgency curve.

use chrono::{DateTime, Utc};

use crate::config::DurationConstants;

/// Scores a residual quantity of `qty` units due at `abs_cutoff`, as seen
/// from `now`. Returns 0.0 for anything already infeasible as a solo pick
/// (negative slack) — such items are still considered via the
/// seed-completion path, never outright discarded.
pub fn score(qty: u32, abs_cutoff: DateTime<Utc>, now: DateTime<Utc>, constants: &DurationConstants, atc_k: f64) -> f64 {
    let process_time = constants.bin_to_bin as f64 + qty as f64 * constants.pick_per_unit as f64;
    let pick_density = qty as f64 / process_time;

    let time_until_cutoff = (abs_cutoff - now).num_milliseconds() as f64 / 1000.0;
    let overhead = (constants.start_to_zone + constants.zone_to_staging) as f64;
    let slack = time_until_cutoff - process_time - overhead;

    if slack < 0.0 {
        return 0.0;
    }

    let urgency = (-slack / atc_k).exp();
    pick_density * urgency
}
