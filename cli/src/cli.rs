use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[clap(name = "warehouse-optimizer", version)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,

    /// Emit logs as JSON instead of the default human-readable format.
    #[clap(long, global = true)]
    pub json_logs: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build picklists from an input CSV, schedule them to pickers, and
    /// write assignment/summary output.
    Run {
        /// Path to the input order-line CSV.
        input: PathBuf,

        /// Directory to write picklist detail files and Summary.csv into.
        #[clap(long, default_value = "output")]
        out_dir: PathBuf,

        /// Calendar date the run operates on (YYYY-MM-DD). Order
        /// timestamps and shift definitions are anchored to this date.
        #[clap(long)]
        base_date: Option<NaiveDate>,
    },
}
