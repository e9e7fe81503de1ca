use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::config::AppConfig;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// COVID-19 case-count ingestion and statistics pipeline
#[derive(Parser, Debug, Clone)]
#[command(
    name = "covid-stats",
    about = "COVID-19 case-count ingestion and statistics pipeline",
    version
)]
pub struct Settings {
    /// Directory holding daily snapshot CSVs (overrides the saved config)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Base directory for reports, exports, charts and the store
    #[arg(long, global = true)]
    pub output_dir: Option<PathBuf>,

    /// Write the result as a formatted text report to this file
    #[arg(long, global = true)]
    pub report: Option<PathBuf>,

    /// Export the result as a CSV file to this path
    #[arg(long, global = true)]
    pub export: Option<PathBuf>,

    /// Logging level
    #[arg(long, global = true, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// One pipeline operation per invocation.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Ingest daily snapshot files, clean them and insert into the store
    Ingest,

    /// Delete all records from the store
    Truncate,

    /// Cumulative case totals grouped by country, month or year
    Stats {
        /// Grouping level
        #[arg(long, default_value = "country", value_parser = ["country", "month", "year"])]
        by: String,
    },

    /// Case-count change between two dates (inclusive)
    Range {
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        end: NaiveDate,
    },

    /// Per-day totals with optional year / month / country predicates
    Filter {
        /// Restrict to one calendar year
        #[arg(long)]
        year: Option<i32>,

        /// Restrict to one calendar month (1-12)
        #[arg(long)]
        month: Option<u32>,

        /// Restrict to one country
        #[arg(long)]
        country: Option<String>,
    },

    /// Year-over-year wave intensity comparison
    Wave,

    /// Average fatality and recovery rates per country
    Rates,

    /// Descriptive statistics over the count columns
    Describe,

    /// Maximum confirmed cases pivoted country by year
    Pivot,

    /// Render chart images from the stored records
    Chart {
        /// Chart type
        #[arg(long, default_value = "bar", value_parser = ["bar", "trend", "scatter", "box"])]
        kind: String,
    },
}

impl Settings {
    /// Overlay CLI path overrides onto the persisted config. CLI always wins.
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(dir) = &self.data_dir {
            config.data_dir = Some(dir.clone());
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = Some(dir.clone());
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
