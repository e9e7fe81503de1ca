//! Formatted text reports.
//!
//! A report is a title, a generation timestamp, an optional description, the
//! rendered result table and, for country-level total tables only, an
//! appended summary block with overall totals and the top-3 countries by
//! confirmed cases.

use std::path::Path;

use covid_core::formatting::format_count;
use covid_core::table::Table;
use covid_core::Result;
use tracing::info;

/// Columns that must all be present for the summary block.
const SUMMARY_REQUIRED: [&str; 4] = [
    "country",
    "confirmed_cases",
    "deaths_cases",
    "recovered_cases",
];

/// Columns whose presence marks a per-period table; those get no summary.
const SUMMARY_EXCLUDED: [&str; 3] = ["month_year", "year", "date"];

// ── Rendering ─────────────────────────────────────────────────────────────────

/// Render a table as a pipe-delimited text block.
///
/// Text columns are left-aligned, numeric columns right-aligned; floats keep
/// two decimals and non-finite values render as `inf` / `NaN`.
pub fn render_table(table: &Table) -> String {
    let column_count = table.columns().len();

    // Pre-render every cell, then size columns off the rendered text.
    let rendered: Vec<Vec<String>> = table
        .rows()
        .iter()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect();

    let mut widths: Vec<usize> = table.columns().iter().map(|c| c.len()).collect();
    for row in &rendered {
        for (idx, value) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(value.len());
        }
    }

    // A column is right-aligned when every cell in it is numeric.
    let numeric: Vec<bool> = (0..column_count)
        .map(|idx| {
            !table.rows().is_empty()
                && table.rows().iter().all(|row| row[idx].is_numeric())
        })
        .collect();

    let mut out = String::new();

    out.push('|');
    for (idx, name) in table.columns().iter().enumerate() {
        out.push_str(&format!(" {:<width$} |", name, width = widths[idx]));
    }
    out.push('\n');

    out.push('|');
    for width in &widths {
        out.push_str(&format!("{}|", "-".repeat(width + 2)));
    }
    out.push('\n');

    for row in &rendered {
        out.push('|');
        for (idx, value) in row.iter().enumerate() {
            if numeric[idx] {
                out.push_str(&format!(" {:>width$} |", value, width = widths[idx]));
            } else {
                out.push_str(&format!(" {:<width$} |", value, width = widths[idx]));
            }
        }
        out.push('\n');
    }

    out
}

/// Build the summary block, or `None` when the table shape does not qualify.
pub fn summary_block(table: &Table) -> Option<String> {
    let qualifies = SUMMARY_REQUIRED.iter().all(|c| table.has_column(c))
        && SUMMARY_EXCLUDED.iter().all(|c| !table.has_column(c));
    if !qualifies {
        return None;
    }

    let total = |column: &str| table.column_sum(column).unwrap_or(0.0) as i64;

    let mut block = String::new();
    block.push('\n');
    block.push_str(&"-".repeat(60));
    block.push('\n');
    block.push_str(&format!(
        "Total Confirmed Cases:  {}\n",
        format_count(total("confirmed_cases"))
    ));
    block.push_str(&format!(
        "Total Deaths:           {}\n",
        format_count(total("deaths_cases"))
    ));
    block.push_str(&format!(
        "Total Recoveries:       {}\n",
        format_count(total("recovered_cases"))
    ));

    let country_idx = table.column_index("country")?;
    let confirmed_idx = table.column_index("confirmed_cases")?;
    let mut by_confirmed: Vec<(String, i64)> = table
        .rows()
        .iter()
        .filter_map(|row| {
            Some((
                row[country_idx].to_string(),
                row[confirmed_idx].as_i64()?,
            ))
        })
        .collect();
    by_confirmed.sort_by(|a, b| b.1.cmp(&a.1));

    block.push_str("\nTop 3 countries by confirmed cases:\n");
    for (rank, (country, confirmed)) in by_confirmed.iter().take(3).enumerate() {
        block.push_str(&format!(
            "{}. {:<12} - {}\n",
            rank + 1,
            country,
            format_count(*confirmed)
        ));
    }

    Some(block)
}

/// Write a report file: title, timestamp, optional description, rendered
/// table and the conditional summary block.
pub fn save_report(
    table: &Table,
    path: &Path,
    title: &str,
    description: Option<&str>,
) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = build_report(table, title, description, chrono::Local::now().naive_local());

    std::fs::write(path, content)?;

    info!("Report saved to {}", path.display());
    Ok(())
}

/// Assemble the full report text. Split from [`save_report`] so tests can
/// pin the timestamp.
pub fn build_report(
    table: &Table,
    title: &str,
    description: Option<&str>,
    generated_at: chrono::NaiveDateTime,
) -> String {
    let mut content = format!(
        "{}\nGenerated on: {}\n",
        title,
        generated_at.format("%Y-%m-%d %H:%M")
    );
    if let Some(description) = description {
        content.push_str(&format!("\n{}\n", description));
    }
    content.push('\n');
    content.push_str(&render_table(table));
    if let Some(summary) = summary_block(table) {
        content.push_str(&summary);
    }
    content
}

// ── Tests ─────────────────────────────────────────────────────────────────────
