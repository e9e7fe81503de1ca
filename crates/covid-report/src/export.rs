//! Delimited-file export of result tables.

use std::path::Path;

use covid_core::table::Table;
use covid_core::Result;
use tracing::info;

/// Write a result table as a UTF-8 CSV file; the header row carries the
/// column names.
///
/// Exporting and re-reading preserves row count and column set; cell values
/// come back as text.
pub fn export_to_csv(table: &Table, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(|cell| cell.to_string()))?;
    }
    writer.flush()?;

    info!("CSV export saved to {}", path.display());
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use covid_core::table::Cell;
    use tempfile::TempDir;

    fn sample_table() -> Table {
        let mut table = Table::new(
            ["country", "confirmed_cases", "fatality_rate (%)"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
        );
        table.push_row(vec![
            Cell::text("India"),
            Cell::Int(1_000_000),
            Cell::Float(1.25),
        ]);
        table.push_row(vec![
            Cell::text("Brazil"),
            Cell::Int(2_000_000),
            Cell::Float(3.0),
        ]);
        table
    }

    #[test]
    fn test_export_round_trip_shape() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("exports").join("stats.csv");

        let table = sample_table();
        export_to_csv(&table, &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, table.columns());

        let rows: Vec<csv::StringRecord> =
            reader.records().collect::<std::result::Result<_, _>>().unwrap();
        assert_eq!(rows.len(), table.len());
        assert_eq!(rows[0].get(0), Some("India"));
        assert_eq!(rows[0].get(1), Some("1000000"));
        // Floats keep their two-decimal rendering.
        assert_eq!(rows[1].get(2), Some("3.00"));
    }

    #[test]
    fn test_export_empty_table_writes_header_only() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.csv");

        let table = Table::new(vec!["country".to_string()]);
        export_to_csv(&table, &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        assert_eq!(reader.headers().unwrap().len(), 1);
        assert_eq!(reader.records().count(), 0);
    }
}
