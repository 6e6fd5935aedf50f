//! Evaluation metrics (spec.md §4.4 / original `utils.print_metrics`):
//! five summary numbers computed once per run.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use core_lib::config::ShiftDef;
use core_lib::Picklist;
use scheduler::{Assignment, AssignmentStatus};

#[derive(Debug, Clone, Copy)]
pub struct Metrics {
    pub total_units_picked: u64,
    pub total_units_available: u64,
    pub completed_orders: usize,
    pub total_orders: usize,
    pub wasted_effort_sec: u64,
    pub picker_utilization_pct: f64,
    pub runtime_sec: f64,
}

impl Metrics {
    pub fn compute(assignments: &[Assignment], unassigned: &[Picklist], shifts: &[ShiftDef], runtime: Duration) -> Self {
        let total_units_picked: u64 = assignments
            .iter()
            .flat_map(|a| a.items.iter())
            .map(|c| c.picked_qty as u64)
            .sum();

        let unassigned_units: u64 = unassigned
            .iter()
            .flat_map(|p| p.items.iter())
            .map(|c| c.picked_qty as u64)
            .sum();

        let total_units_available = total_units_picked + unassigned_units;

        let mut total_demand: HashMap<&str, u64> = HashMap::new();
        for item in assignments.iter().flat_map(|a| a.items.iter()).chain(unassigned.iter().flat_map(|p| p.items.iter())) {
            *total_demand.entry(item.item.order_id.as_str()).or_insert(0) += item.picked_qty as u64;
        }

        let mut picked_demand: HashMap<&str, u64> = HashMap::new();
        for item in assignments.iter().flat_map(|a| a.items.iter()) {
            *picked_demand.entry(item.item.order_id.as_str()).or_insert(0) += item.picked_qty as u64;
        }

        let completed_orders = total_demand
            .iter()
            .filter(|(oid, &total)| picked_demand.get(*oid).copied().unwrap_or(0) >= total)
            .count();

        let wasted_effort_sec: u64 = assignments
            .iter()
            .filter(|a| a.status != AssignmentStatus::OnTime)
            .map(|a| a.duration_sec)
            .sum();

        let total_worked_sec: u64 = assignments.iter().map(|a| a.duration_sec).sum();
        let total_capacity_sec = total_shift_capacity_sec(shifts);

        let picker_utilization_pct = if total_capacity_sec > 0 {
            total_worked_sec as f64 / total_capacity_sec as f64 * 100.0
        } else {
            0.0
        };

        Self {
            total_units_picked,
            total_units_available,
            completed_orders,
            total_orders: total_demand.len(),
            wasted_effort_sec,
            picker_utilization_pct,
            runtime_sec: runtime.as_secs_f64(),
        }
    }

    pub fn pick_percentage(&self) -> f64 {
        if self.total_units_available > 0 {
            self.total_units_picked as f64 / self.total_units_available as f64 * 100.0
        } else {
            0.0
        }
    }
}

fn total_shift_capacity_sec(shifts: &[ShiftDef]) -> u64 {
    use chrono::NaiveTime;

    shifts
        .iter()
        .map(|shift| {
            let start = NaiveTime::parse_from_str(&shift.start_hhmm, "%H:%M").expect("valid HH:MM");
            let end = NaiveTime::parse_from_str(&shift.end_hhmm, "%H:%M").expect("valid HH:MM");
            let mut duration = end.signed_duration_since(start);
            if end <= start {
                duration = duration + chrono::Duration::days(1);
            }
            duration.num_seconds() as u64 * shift.count as u64
        })
        .sum()
}

impl fmt::Display for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", "-".repeat(25))?;
        writeln!(f, "Evaluation Metrics")?;
        writeln!(f, "{}", "-".repeat(25))?;
        writeln!(
            f,
            "1. Total units successfully picked before cutoff: {} / {} ({:.1}%)",
            self.total_units_picked,
            self.total_units_available,
            self.pick_percentage()
        )?;
        writeln!(f, "2. Number of Completed Orders: {} / {}", self.completed_orders, self.total_orders)?;
        writeln!(f, "3. Wasted picking effort (late picklists): {} sec", self.wasted_effort_sec)?;
        writeln!(f, "4. Picker utilization: {:.2}%", self.picker_utilization_pct)?;
        writeln!(f, "5. Scalability and runtime: {:.2} sec", self.runtime_sec)?;
        writeln!(f, "{}", "=".repeat(40))
    }
}
