//! Shared types used by the scheduler subsystem.

use chrono::{DateTime, Utc};
use core_lib::PickCommitment;

/// A picker popped from the pool: its stable id, its current
/// next-available time (initially `shift_start`, monotonically
/// non-decreasing thereafter), and the hard shift boundary it must not
/// cross except by truncation (spec.md §4.5).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picker {
    pub picker_id: String,
    pub next_available: DateTime<Utc>,
    pub shift_end: DateTime<Utc>,
}

/// Whether an assignment finished within the picklist's deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentStatus {
    OnTime,
    Late,
}

/// One unit of work performed by one picker (spec.md §3, Assignment).
#[derive(Debug, Clone)]
pub struct Assignment {
    pub picklist_no: String,
    pub picker_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_sec: u64,
    pub items: Vec<PickCommitment>,
    pub status: AssignmentStatus,
}
