mod cli;

use std::time::Instant;

use chrono::{NaiveTime, TimeZone, Utc};
use clap::Parser;
use cli::{Cli, Commands};
use common::logger::{init_tracing, RunId};
use core_lib::Config;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    match cli.command {
        Commands::Run { input, out_dir, base_date } => run(&input, &out_dir, base_date),
    }
}

#[tracing::instrument(skip(input, out_dir), fields(run_id = %RunId::new(), input = %input.display()))]
fn run(input: &std::path::Path, out_dir: &std::path::Path, base_date: Option<chrono::NaiveDate>) -> anyhow::Result<()> {
    let perf_start = Instant::now();
    let config = Config::from_env();

    tracing::info!(path = %input.display(), "loading input");
    let items = loader::load(input.to_str().ok_or_else(|| anyhow::anyhow!("input path is not valid UTF-8"))?, &config)?;

    let base_date = base_date.unwrap_or_else(|| Utc::now().date_naive());
    let start_hhmm = NaiveTime::parse_from_str(&config.global_start_time, "%H:%M")?;
    let start_time = Utc.from_utc_datetime(&base_date.and_time(start_hhmm));

    tracing::info!("building picklists");
    let picklists = driver::build_all(items, start_time, &config);
    tracing::info!(count = picklists.len(), "picklists built");

    tracing::info!("assigning to pickers");
    let pool = scheduler::PickerPool::build(base_date, &config.shifts);
    let (assignments, unassigned) = scheduler::assign(picklists, pool, start_time, &config.duration);
    tracing::info!(assigned = assignments.len(), unassigned = unassigned.len(), "scheduling complete");

    report::persist::write_output(out_dir, base_date, &assignments, &config)?;

    let metrics = report::Metrics::compute(&assignments, &unassigned, &config.shifts, perf_start.elapsed());
    println!("{metrics}");

    Ok(())
}
