//! Configuration surface (spec.md §6). Every value here is a default,
//! overridable by the collaborator that constructs the `Config`.

use std::collections::{HashMap, HashSet};

/// Duration Model constants (spec.md §4.1), all in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationConstants {
    pub start_to_zone: u64,
    pub bin_to_bin: u64,
    pub pick_per_unit: u64,
    pub unload_per_order: u64,
    pub zone_to_staging: u64,
}

impl Default for DurationConstants {
    fn default() -> Self {
        Self {
            start_to_zone: 120,
            bin_to_bin: 30,
            pick_per_unit: 5,
            unload_per_order: 30,
            zone_to_staging: 120,
        }
    }
}

/// One shift definition: `(name, start_hhmm, end_hhmm, picker_count, day_offset)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ShiftDef {
    pub name: String,
    pub start_hhmm: String,
    pub end_hhmm: String,
    pub count: usize,
    pub day_offset: i64,
}

impl ShiftDef {
    fn new(name: &str, start: &str, end: &str, count: usize, day_offset: i64) -> Self {
        Self {
            name: name.to_string(),
            start_hhmm: start.to_string(),
            end_hhmm: end.to_string(),
            count,
            day_offset,
        }
    }
}

fn default_shifts() -> Vec<ShiftDef> {
    vec![
        ShiftDef::new("Night_1", "20:00", "05:00", 45, 0),
        ShiftDef::new("Night_2", "21:00", "07:00", 35, 0),
        ShiftDef::new("Morning", "08:00", "17:00", 40, 1),
        ShiftDef::new("General", "10:00", "19:00", 30, 1),
    ]
}

fn default_cutoff_map() -> HashMap<String, String> {
    [
        ("P1", "23:30"),
        ("P2", "02:00"),
        ("P3", "04:00"),
        ("P4", "06:00"),
        ("P5", "07:00"),
        ("P6", "09:00"),
        ("P9", "11:00"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// Full optimizer configuration. `Config::default()` reproduces the
/// original's constants; `Config::from_env()` applies the handful of
/// knobs worth overriding at deploy time.
#[derive(Debug, Clone)]
pub struct Config {
    pub max_items_per_picklist: u32,
    pub max_weight_std: u64,
    pub max_weight_fragile: u64,
    pub fragile_zones: HashSet<String>,
    pub duration: DurationConstants,
    pub atc_k: f64,
    /// "HH:MM" time-of-day the global operation starts, on the base date.
    pub global_start_time: String,
    pub shifts: Vec<ShiftDef>,
    pub cutoff_map: HashMap<String, String>,
    /// Fallback time-of-day cutoff for an unrecognized priority code.
    pub default_cutoff: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_items_per_picklist: 2_000,
            max_weight_std: 200_000,
            max_weight_fragile: 50_000,
            fragile_zones: ["FRAGILE_FD".to_string()].into_iter().collect(),
            duration: DurationConstants::default(),
            atc_k: 2.0,
            global_start_time: "21:00".to_string(),
            shifts: default_shifts(),
            cutoff_map: default_cutoff_map(),
            default_cutoff: "11:00".to_string(),
        }
    }
}

impl Config {
    /// Applies environment overrides on top of `Config::default()`.
    /// Unset or unparsable variables fall back to the default silently —
    /// this is a convenience surface, not an input-validation boundary.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("WH_MAX_ITEMS_PER_PICKLIST") {
            if let Ok(parsed) = v.parse() {
                cfg.max_items_per_picklist = parsed;
            }
        }
        if let Ok(v) = std::env::var("WH_ATC_K") {
            if let Ok(parsed) = v.parse() {
                cfg.atc_k = parsed;
            }
        }
        if let Ok(v) = std::env::var("WH_GLOBAL_START_TIME") {
            cfg.global_start_time = v;
        }

        cfg
    }

    pub fn max_weight_for_zone(&self, zone: &str) -> u64 {
        if self.fragile_zones.contains(zone) {
            self.max_weight_fragile
        } else {
            self.max_weight_std
        }
    }

    pub fn picklist_type_for_zone(&self, zone: &str) -> crate::model::PicklistType {
        if self.fragile_zones.contains(zone) {
            crate::model::PicklistType::Fragile
        } else {
            crate::model::PicklistType::Standard
        }
    }
}
