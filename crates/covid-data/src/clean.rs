//! Normalization of the raw combined record set.
//!
//! Fills missing values with defaults, coerces counts to integers and
//! establishes the canonical (country, report_date) sort order. No further
//! validation happens here: out-of-range or mutually inconsistent counts
//! pass through as-is.

use covid_core::models::{CaseRecord, RawCaseRecord, UNKNOWN_PROVINCE};

/// Clean the combined raw record set.
///
/// * missing province → `"Unknown"`
/// * missing counts → 0, truncated to integer (upstream null representation
///   promotes counts to float)
/// * missing coordinates → 0.0
/// * stable ascending sort by (country, report_date)
///
/// Cleaning is idempotent: feeding the output back through (via
/// `RawCaseRecord::from`) yields the same records.
pub fn clean(raw: Vec<RawCaseRecord>) -> Vec<CaseRecord> {
    let mut records: Vec<CaseRecord> = raw.into_iter().map(clean_record).collect();
    records.sort_by(|a, b| {
        a.country
            .cmp(&b.country)
            .then(a.report_date.cmp(&b.report_date))
    });
    records
}

fn clean_record(raw: RawCaseRecord) -> CaseRecord {
    CaseRecord {
        country: raw.country,
        province: raw
            .province
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| UNKNOWN_PROVINCE.to_string()),
        report_date: raw.report_date,
        confirmed: raw.confirmed.unwrap_or(0.0) as i64,
        deaths: raw.deaths.unwrap_or(0.0) as i64,
        recovered: raw.recovered.unwrap_or(0.0) as i64,
        latitude: raw.latitude.unwrap_or(0.0),
        longitude: raw.longitude.unwrap_or(0.0),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
