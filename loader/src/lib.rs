//! CSV ingestion: reads raw order-line rows, normalizes them, and derives
//! each row's absolute cutoff from its priority code (spec.md §4.2 /
//! original `DataLoader.load_and_clean`).

use chrono::{DateTime, Duration, NaiveDateTime, NaiveTime, TimeZone, Utc};
use common::error::OptimizerError;
use core_lib::{Config, Item};
use serde::Deserialize;
use tracing::{info, instrument, warn};

/// One raw CSV row, column names normalized to lowercase by the writer
/// (spec.md §9: the original lowercases and strips headers at load time;
/// here the contract is pushed onto the CSV producer instead, since
/// `csv`'s header matching is already case-sensitive-exact by design).
#[derive(Debug, Deserialize)]
struct Row {
    order_id: String,
    sku: String,
    store_id: String,
    zone: String,
    #[serde(default)]
    bin: String,
    #[serde(default)]
    bin_rank: i64,
    #[serde(default)]
    floor: String,
    #[serde(default)]
    aisle: String,
    #[serde(default)]
    rack: String,
    order_qty: u32,
    #[serde(default)]
    weight_in_grams: u64,
    pod_priority: String,
    dt: String,
    #[serde(default = "default_pods_per_picklist")]
    pods_per_picklist_in_that_zone: usize,
}

fn default_pods_per_picklist() -> usize {
    1
}

const DT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Reads `path`, parses every row, and attaches each item's derived
/// absolute cutoff. Malformed rows are reported with their 1-based row
/// number (spec.md ambient error handling).
#[instrument(skip(config))]
pub fn load(path: &str, config: &Config) -> Result<Vec<Item>, OptimizerError> {
    info!(path, "loading input csv");
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_path(path)?;

    let mut items = Vec::new();
    for (idx, result) in reader.deserialize::<Row>().enumerate() {
        let row_no = idx + 1;
        let row = result?;

        let order_dt = NaiveDateTime::parse_from_str(&row.dt, DT_FORMAT).map_err(|e| {
            OptimizerError::MalformedRow {
                row: row_no,
                reason: format!("unparseable dt {:?}: {e}", row.dt),
            }
        })?;
        let order_dt = Utc.from_utc_datetime(&order_dt);

        if row.order_qty == 0 {
            warn!(row = row_no, order_id = %row.order_id, "zero order_qty row");
        }

        let abs_cutoff = absolute_cutoff(&row.pod_priority, order_dt, config);

        items.push(Item {
            order_id: row.order_id,
            sku: row.sku,
            store_id: row.store_id,
            zone: row.zone,
            bin: row.bin,
            bin_rank: row.bin_rank,
            floor: row.floor,
            aisle: row.aisle,
            rack: row.rack,
            order_qty: row.order_qty,
            weight_in_grams: row.weight_in_grams,
            pod_priority: row.pod_priority,
            abs_cutoff,
            pods_per_picklist_in_that_zone: row.pods_per_picklist_in_that_zone,
        });
    }

    info!(rows = items.len(), "input loaded");
    Ok(items)
}

/// Derives the absolute cutoff timestamp from a priority code and the
/// order's own timestamp (original `_get_absolute_cutoff`): early-morning
/// cutoffs (before noon) are assumed to land on the following day, and a
/// cutoff that would otherwise land at or before the order time is pushed
/// a day forward so every cutoff is strictly in the order's future.
fn absolute_cutoff(priority: &str, order_dt: DateTime<Utc>, config: &Config) -> DateTime<Utc> {
    let time_str = config
        .cutoff_map
        .get(priority)
        .unwrap_or(&config.default_cutoff);

    let cutoff_time = NaiveTime::parse_from_str(time_str, "%H:%M")
        .unwrap_or_else(|_| NaiveTime::from_hms_opt(11, 0, 0).unwrap());

    let base_date = order_dt.date_naive();
    let mut cutoff_dt = Utc.from_utc_datetime(&base_date.and_time(cutoff_time));

    if cutoff_time.hour_lt_noon() || cutoff_dt <= order_dt {
        cutoff_dt += Duration::days(1);
    }

    cutoff_dt
}

trait HourBeforeNoon {
    fn hour_lt_noon(&self) -> bool;
}

impl HourBeforeNoon for NaiveTime {
    fn hour_lt_noon(&self) -> bool {
        use chrono::Timelike;
        self.hour() < 12
    }
}
