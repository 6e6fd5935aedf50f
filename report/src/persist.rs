//! Output persistence (spec.md §4.4 / original `utils.save_results`):
//! one detail CSV per assignment plus a run-wide summary CSV.

use std::path::Path;

use chrono::NaiveDate;
use common::error::OptimizerError;
use core_lib::Config;
use scheduler::Assignment;
use serde::Serialize;
use tracing::{info, instrument};

#[derive(Debug, Serialize)]
struct DetailRow<'a> {
    #[serde(rename = "SKU")]
    sku: &'a str,
    #[serde(rename = "Store")]
    store: &'a str,
    #[serde(rename = "Bin")]
    bin: &'a str,
    #[serde(rename = "Bin Rank")]
    bin_rank: i64,
}

#[derive(Debug, Serialize)]
struct SummaryRow {
    #[serde(rename = "Picklist_date")]
    picklist_date: NaiveDate,
    picklist_no: String,
    picklist_type: String,
    stores_in_picklist: String,
}

/// Writes one `{base_date}_{picklist_no}.csv` detail file per assignment
/// under `out_dir/picklists/`, plus `out_dir/Summary.csv`.
#[instrument(skip(assignments, config), fields(count = assignments.len()))]
pub fn write_output(
    out_dir: &Path,
    base_date: NaiveDate,
    assignments: &[Assignment],
    config: &Config,
) -> Result<(), OptimizerError> {
    let picklists_dir = out_dir.join("picklists");
    std::fs::create_dir_all(&picklists_dir)?;

    let mut summary_rows = Vec::with_capacity(assignments.len());

    for job in assignments {
        let fname = picklists_dir.join(format!("{base_date}_{}.csv", job.picklist_no));
        let mut writer = csv::Writer::from_path(&fname)?;
        for commitment in &job.items {
            writer.serialize(DetailRow {
                sku: &commitment.item.sku,
                store: &commitment.item.store_id,
                bin: &commitment.item.bin,
                bin_rank: commitment.item.bin_rank,
            })?;
        }
        writer.flush()?;

        let zone = job.items.first().map(|c| c.item.zone.as_str()).unwrap_or("");
        let distinct_skus: std::collections::HashSet<&str> =
            job.items.iter().map(|c| c.item.sku.as_str()).collect();

        let picklist_type = if config.fragile_zones.contains(zone) {
            "fragile"
        } else if distinct_skus.len() == 1 {
            "bulk"
        } else {
            "multi order"
        };

        let mut stores: Vec<&str> = job
            .items
            .iter()
            .map(|c| c.item.store_id.as_str())
            .collect::<std::collections::HashSet<_>>()
            .into_iter()
            .collect();
        stores.sort_unstable();

        summary_rows.push(SummaryRow {
            picklist_date: base_date,
            picklist_no: job.picklist_no.clone(),
            picklist_type: picklist_type.to_string(),
            stores_in_picklist: stores.join(","),
        });
    }

    let mut summary_writer = csv::Writer::from_path(out_dir.join("Summary.csv"))?;
    for row in &summary_rows {
        summary_writer.serialize(row)?;
    }
    summary_writer.flush()?;

    info!(dir = %out_dir.display(), "wrote output");
    Ok(())
}
