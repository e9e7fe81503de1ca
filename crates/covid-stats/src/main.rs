mod bootstrap;

use anyhow::{anyhow, Result};
use clap::Parser;
use covid_core::config::AppConfig;
use covid_core::models::CaseRecord;
use covid_core::settings::{Command, Settings};
use covid_core::table::Table;
use covid_data::store::{CaseStore, CsvStore};
use covid_data::{aggregate, clean, filter, ingest, metrics};
use covid_report::{chart, export, report};

fn main() -> Result<()> {
    let settings = Settings::parse();
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    let mut config = AppConfig::load();
    settings.apply_to(&mut config);
    // Persist CLI path overrides so subsequent invocations pick them up.
    if settings.data_dir.is_some() || settings.output_dir.is_some() {
        config.save()?;
    }
    bootstrap::ensure_directories(&config)?;

    tracing::info!("covid-stats v{} starting", env!("CARGO_PKG_VERSION"));

    let mut store = CsvStore::new(config.store_path());

    match &settings.command {
        Command::Ingest => {
            let data_dir = config
                .data_dir
                .clone()
                .ok_or_else(|| anyhow!("no snapshot directory configured; pass --data-dir"))?;
            let raw = ingest::load_snapshots(&data_dir, &config)?;
            let records = clean::clean(raw);
            let inserted = store.insert_all(&records)?;
            println!(
                "Inserted {} records into {}",
                inserted,
                config.store_path().display()
            );
        }

        Command::Truncate => {
            store.truncate()?;
            println!("All records deleted from {}", config.store_path().display());
        }

        Command::Chart { kind } => {
            let records = store.load_all()?;
            let path = match kind.as_str() {
                "trend" => {
                    let path = config.graphics_dir().join("line_trend_by_country.svg");
                    chart::line_trend_by_country(&records, &path)?;
                    path
                }
                "scatter" => {
                    let path = config.graphics_dir().join("scatter_deaths_vs_cases.svg");
                    chart::scatter_deaths_vs_cases(&records, &path)?;
                    path
                }
                "box" => {
                    let path = config.graphics_dir().join("boxplot_cases_by_month.svg");
                    chart::boxplot_cases_by_month(&records, &path)?;
                    path
                }
                _ => {
                    let path = config.graphics_dir().join("bar_total_cases.svg");
                    chart::bar_total_cases(&records, &path)?;
                    path
                }
            };
            println!("Chart saved to {}", path.display());
        }

        command => {
            let records = store.load_all()?;
            let (table, title, description) = run_analysis(command, &records)?;
            emit(&table, &title, description.as_deref(), &settings)?;
        }
    }

    Ok(())
}

/// Run one read-only analysis command over the stored records.
fn run_analysis(
    command: &Command,
    records: &[CaseRecord],
) -> Result<(Table, String, Option<String>)> {
    let result = match command {
        Command::Stats { by } => match by.as_str() {
            "month" => (
                Table::from_rows(&aggregate::stats_by_month(records)),
                "Statistics by Month".to_string(),
                Some("Cumulative totals per country and calendar month.".to_string()),
            ),
            "year" => (
                Table::from_rows(&aggregate::stats_by_year(records)),
                "Statistics by Year".to_string(),
                Some("Cumulative totals per country and calendar year.".to_string()),
            ),
            _ => (
                Table::from_rows(&aggregate::stats_by_country(records)),
                "Statistics by Country".to_string(),
                Some("Final cumulative totals per country.".to_string()),
            ),
        },

        Command::Range { start, end } => {
            if start >= end {
                return Err(anyhow!("start date must precede end date"));
            }
            (
                Table::from_rows(&aggregate::stats_by_date_range(records, *start, *end)),
                format!("Case Change {} to {}", start, end),
                None,
            )
        }

        Command::Filter {
            year,
            month,
            country,
        } => {
            let options = filter::FilterOptions {
                year: *year,
                month: *month,
                country: country.clone(),
            };
            (
                Table::from_rows(&filter::filter_cases(records, &options)),
                "Filtered Daily Cases".to_string(),
                None,
            )
        }

        Command::Wave => (
            Table::from_rows(&metrics::compare_wave_intensity(records)),
            "Wave Intensity Comparison".to_string(),
            Some("Year-end cumulative confirmed cases and year-over-year change.".to_string()),
        ),

        Command::Rates => (
            Table::from_rows(&metrics::calculate_rates(records)),
            "Fatality and Recovery Rates".to_string(),
            Some("Mean of per-report fatality and recovery ratios.".to_string()),
        ),

        Command::Describe => (
            Table::from_rows(&metrics::describe_cases(records)),
            "Descriptive Statistics".to_string(),
            None,
        ),

        Command::Pivot => (
            metrics::generate_pivot(records).to_table(),
            "Confirmed Cases by Country and Year".to_string(),
            None,
        ),

        Command::Ingest | Command::Truncate | Command::Chart { .. } => {
            unreachable!("handled in main")
        }
    };

    Ok(result)
}

/// Print the result and honour the `--report` / `--export` output options.
fn emit(table: &Table, title: &str, description: Option<&str>, settings: &Settings) -> Result<()> {
    println!("{}", title);
    print!("{}", report::render_table(table));
    if table.is_empty() {
        println!("(no rows)");
    }

    if let Some(path) = &settings.report {
        report::save_report(table, path, title, description)?;
        println!("Report saved to {}", path.display());
    }
    if let Some(path) = &settings.export {
        export::export_to_csv(table, path)?;
        println!("Export saved to {}", path.display());
    }

    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
