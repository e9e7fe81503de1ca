//! Daily snapshot discovery and normalization.
//!
//! Snapshot files are named with an embedded `MM-DD-YYYY` date token
//! (e.g. `03-15-2021.csv`). Column headers drift across days: early reports
//! use `Province/State` / `Country/Region` and omit the geolocation columns,
//! later ones use underscores and carry `Lat` / `Long_`. Normalization folds
//! every day onto one canonical column set before the rows are combined.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use covid_core::config::AppConfig;
use covid_core::models::RawCaseRecord;
use covid_core::Result;
use tracing::{debug, info, warn};

/// Date token embedded in snapshot filenames.
pub const DATE_TOKEN_FORMAT: &str = "%m-%d-%Y";

/// Header names after normalization.
const COL_PROVINCE: &str = "Province_State";
const COL_COUNTRY: &str = "Country_Region";
const COL_CONFIRMED: &str = "Confirmed";
const COL_DEATHS: &str = "Deaths";
const COL_RECOVERED: &str = "Recovered";
const COL_LAT: &str = "Lat";
const COL_LONG: &str = "Long_";

// ── Public API ────────────────────────────────────────────────────────────────

/// Parse the report date from a snapshot file name.
///
/// Returns `None` for anything that is not a `.csv` file whose stem is a
/// valid `MM-DD-YYYY` token; such files are treated as "not a data file".
pub fn parse_report_date(file_name: &str) -> Option<NaiveDate> {
    let path = Path::new(file_name);
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);
    if !is_csv {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    NaiveDate::parse_from_str(stem, DATE_TOKEN_FORMAT).ok()
}

/// Find all snapshot files under `data_dir` whose date token falls inside the
/// configured year window, sorted by report date.
pub fn find_snapshot_files(data_dir: &Path, config: &AppConfig) -> Vec<(NaiveDate, PathBuf)> {
    if !data_dir.exists() {
        warn!("Data path does not exist: {}", data_dir.display());
        return Vec::new();
    }

    let mut files: Vec<(NaiveDate, PathBuf)> = walkdir::WalkDir::new(data_dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let name = entry.file_name().to_str()?;
            let date = parse_report_date(name)?;
            Some((date, entry.into_path()))
        })
        .filter(|(date, path)| {
            let keep = config.year_in_range(date.year());
            if !keep {
                debug!("Skipping out-of-window snapshot {}", path.display());
            }
            keep
        })
        .collect();

    files.sort();
    files
}

/// Load every in-window snapshot under `data_dir` into one combined record
/// set, tagged with the per-file report date.
///
/// Zero matching files is a valid-but-empty result, not an error.
pub fn load_snapshots(data_dir: &Path, config: &AppConfig) -> Result<Vec<RawCaseRecord>> {
    let files = find_snapshot_files(data_dir, config);
    if files.is_empty() {
        warn!("No snapshot files found in {}", data_dir.display());
        return Ok(Vec::new());
    }

    let mut all_records: Vec<RawCaseRecord> = Vec::new();
    for (date, path) in &files {
        let records = read_snapshot(path, *date, config)?;
        debug!(
            "Snapshot {}: {} rows retained",
            path.display(),
            records.len()
        );
        all_records.extend(records);
    }

    info!(
        "Loaded {} records from {} snapshot files",
        all_records.len(),
        files.len()
    );

    Ok(all_records)
}

/// Read one snapshot file, restricting rows to the configured allowlist.
pub fn read_snapshot(
    path: &Path,
    report_date: NaiveDate,
    config: &AppConfig,
) -> Result<Vec<RawCaseRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let columns: HashMap<String, usize> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(idx, header)| (normalize_header(header), idx))
        .collect();

    // A file without the mandatory columns is not a usable snapshot.
    let Some(&country_idx) = columns.get(COL_COUNTRY) else {
        warn!(
            "Snapshot {} lacks a {} column; skipping",
            path.display(),
            COL_COUNTRY
        );
        return Ok(Vec::new());
    };
    let province_idx = columns.get(COL_PROVINCE).copied();
    let confirmed_idx = columns.get(COL_CONFIRMED).copied();
    let deaths_idx = columns.get(COL_DEATHS).copied();
    let recovered_idx = columns.get(COL_RECOVERED).copied();
    // Geolocation columns are absent in early snapshots; the cleaner fills
    // the default.
    let lat_idx = columns.get(COL_LAT).copied();
    let long_idx = columns.get(COL_LONG).copied();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;

        let Some(country) = row.get(country_idx).filter(|c| !c.is_empty()) else {
            continue;
        };
        if !config.is_target_country(country) {
            continue;
        }

        records.push(RawCaseRecord {
            country: country.to_string(),
            province: province_idx
                .and_then(|idx| row.get(idx))
                .filter(|p| !p.is_empty())
                .map(|p| p.to_string()),
            report_date,
            confirmed: parse_count(&row, confirmed_idx),
            deaths: parse_count(&row, deaths_idx),
            recovered: parse_count(&row, recovered_idx),
            latitude: parse_count(&row, lat_idx),
            longitude: parse_count(&row, long_idx),
        });
    }

    Ok(records)
}

/// Fold a raw header onto the canonical form: trim whitespace, replace `/`
/// and space with underscore.
pub fn normalize_header(header: &str) -> String {
    header.trim().replace(['/', ' '], "_")
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Parse a numeric field. Absent columns, empty fields and unparseable text
/// all map to `None`; counts may legitimately arrive as floats.
fn parse_count(row: &csv::StringRecord, idx: Option<usize>) -> Option<f64> {
    idx.and_then(|i| row.get(i))
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<f64>().ok())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_snapshot(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "{}", content).unwrap();
        path
    }

    const MODERN_HEADER: &str = "FIPS,Admin2,Province_State,Country_Region,Last_Update,Lat,Long_,Confirmed,Deaths,Recovered,Active";

    fn modern_row(province: &str, country: &str, confirmed: &str) -> String {
        format!(",,{province},{country},2021-03-16 04:22:00,20.59,78.96,{confirmed},1000,9000,100")
    }

    // ── parse_report_date ─────────────────────────────────────────────────────

    #[test]
    fn test_parse_report_date_valid() {
        assert_eq!(
            parse_report_date("03-15-2021.csv"),
            Some(NaiveDate::from_ymd_opt(2021, 3, 15).unwrap())
        );
    }

    #[test]
    fn test_parse_report_date_rejects_non_data_files() {
        assert!(parse_report_date("README.md").is_none());
        assert!(parse_report_date("notes.csv").is_none());
        // ISO ordering is not the snapshot convention.
        assert!(parse_report_date("2021-03-15.csv").is_none());
        assert!(parse_report_date("13-45-2021.csv").is_none());
    }

    // ── normalize_header ──────────────────────────────────────────────────────

    #[test]
    fn test_normalize_header_variants() {
        assert_eq!(normalize_header("Province/State"), "Province_State");
        assert_eq!(normalize_header("Country/Region"), "Country_Region");
        assert_eq!(normalize_header(" Last Update "), "Last_Update");
        assert_eq!(normalize_header("Confirmed"), "Confirmed");
    }

    // ── find_snapshot_files ───────────────────────────────────────────────────

    #[test]
    fn test_find_snapshot_files_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::default();
        write_snapshot(dir.path(), "06-01-2021.csv", "Country_Region\n");
        write_snapshot(dir.path(), "01-15-2021.csv", "Country_Region\n");
        // Out of window.
        write_snapshot(dir.path(), "05-01-2020.csv", "Country_Region\n");
        // Not a data file.
        write_snapshot(dir.path(), "README.md", "hello\n");

        let files = find_snapshot_files(dir.path(), &config);
        let dates: Vec<NaiveDate> = files.iter().map(|(d, _)| *d).collect();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2021, 1, 15).unwrap(),
                NaiveDate::from_ymd_opt(2021, 6, 1).unwrap(),
            ]
        );
    }

    #[test]
    fn test_find_snapshot_files_missing_dir_is_empty() {
        let config = AppConfig::default();
        let files = find_snapshot_files(Path::new("/tmp/covid-stats-no-such-dir"), &config);
        assert!(files.is_empty());
    }

    // ── read_snapshot ─────────────────────────────────────────────────────────

    #[test]
    fn test_read_snapshot_restricts_to_allowlist() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::default();
        let content = format!(
            "{MODERN_HEADER}\n{}\n{}\n{}\n",
            modern_row("", "India", "100000"),
            modern_row("", "France", "50000"),
            modern_row("Sao Paulo", "Brazil", "200000"),
        );
        let path = write_snapshot(dir.path(), "03-15-2021.csv", &content);

        let date = NaiveDate::from_ymd_opt(2021, 3, 15).unwrap();
        let records = read_snapshot(&path, date, &config).unwrap();

        let countries: Vec<&str> = records.iter().map(|r| r.country.as_str()).collect();
        assert_eq!(countries, vec!["India", "Brazil"]);
        assert!(records.iter().all(|r| r.report_date == date));
    }

    #[test]
    fn test_read_snapshot_legacy_headers_without_geolocation() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::default();
        let content = "Province/State,Country/Region,Last Update,Confirmed,Deaths,Recovered\n\
                       ,Italy,2021-01-02 23:00:00,150000,3000,\n";
        let path = write_snapshot(dir.path(), "01-02-2021.csv", content);

        let date = NaiveDate::from_ymd_opt(2021, 1, 2).unwrap();
        let records = read_snapshot(&path, date, &config).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].country, "Italy");
        assert!(records[0].province.is_none());
        assert_eq!(records[0].confirmed, Some(150_000.0));
        assert!(records[0].recovered.is_none());
        assert!(records[0].latitude.is_none());
        assert!(records[0].longitude.is_none());
    }

    #[test]
    fn test_read_snapshot_float_counts_survive() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::default();
        let content = "Country_Region,Confirmed,Deaths,Recovered\nEgypt,1234.0,56.0,1000.0\n";
        let path = write_snapshot(dir.path(), "07-01-2022.csv", content);

        let records = read_snapshot(
            &path,
            NaiveDate::from_ymd_opt(2022, 7, 1).unwrap(),
            &config,
        )
        .unwrap();
        assert_eq!(records[0].confirmed, Some(1234.0));
    }

    #[test]
    fn test_read_snapshot_without_country_column_is_skipped() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::default();
        let path = write_snapshot(dir.path(), "03-15-2021.csv", "a,b,c\n1,2,3\n");

        let records = read_snapshot(
            &path,
            NaiveDate::from_ymd_opt(2021, 3, 15).unwrap(),
            &config,
        )
        .unwrap();
        assert!(records.is_empty());
    }

    // ── load_snapshots ────────────────────────────────────────────────────────

    #[test]
    fn test_load_snapshots_combines_days() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::default();
        write_snapshot(
            dir.path(),
            "03-15-2021.csv",
            &format!("{MODERN_HEADER}\n{}\n", modern_row("", "India", "100")),
        );
        write_snapshot(
            dir.path(),
            "03-16-2021.csv",
            &format!("{MODERN_HEADER}\n{}\n", modern_row("", "India", "180")),
        );

        let records = load_snapshots(dir.path(), &config).unwrap();
        assert_eq!(records.len(), 2);

        let dates: Vec<NaiveDate> = records.iter().map(|r| r.report_date).collect();
        assert!(dates.contains(&NaiveDate::from_ymd_opt(2021, 3, 15).unwrap()));
        assert!(dates.contains(&NaiveDate::from_ymd_opt(2021, 3, 16).unwrap()));
    }

    #[test]
    fn test_load_snapshots_empty_dir_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::default();
        let records = load_snapshots(dir.path(), &config).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_load_snapshots_only_allowlist_and_window_survive() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::default();
        // In-window file mixing allowlisted and other countries.
        write_snapshot(
            dir.path(),
            "05-10-2022.csv",
            &format!(
                "{MODERN_HEADER}\n{}\n{}\n",
                modern_row("", "Russia", "900"),
                modern_row("", "Germany", "800"),
            ),
        );
        // Out-of-window file with an allowlisted country.
        write_snapshot(
            dir.path(),
            "05-10-2020.csv",
            &format!("{MODERN_HEADER}\n{}\n", modern_row("", "Russia", "100")),
        );

        let records = load_snapshots(dir.path(), &config).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].country, "Russia");
        assert_eq!(records[0].report_date.year(), 2022);
    }
}
