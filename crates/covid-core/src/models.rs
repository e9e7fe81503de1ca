use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Fill-in value for a missing province in the source data.
pub const UNKNOWN_PROVINCE: &str = "Unknown";

/// A single row as read from a daily snapshot file, before cleaning.
///
/// Counts are kept as `Option<f64>` because upstream null representation
/// promotes integer columns to floating point, and early snapshots omit the
/// geolocation columns entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCaseRecord {
    /// Country name as reported (already restricted to the allowlist).
    pub country: String,
    /// Province or state, absent in country-level rows.
    pub province: Option<String>,
    /// Report date parsed from the snapshot filename.
    pub report_date: NaiveDate,
    /// Cumulative confirmed cases to date.
    pub confirmed: Option<f64>,
    /// Cumulative deaths to date.
    pub deaths: Option<f64>,
    /// Cumulative recoveries to date.
    pub recovered: Option<f64>,
    /// Latitude of the reporting region.
    pub latitude: Option<f64>,
    /// Longitude of the reporting region.
    pub longitude: Option<f64>,
}

/// A cleaned case record: one row per country + province + report date.
///
/// Counts carry cumulative-to-date semantics; each day's value is the running
/// total, not a daily delta. Records are never mutated after cleaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseRecord {
    /// Country name from the configured allowlist.
    pub country: String,
    /// Province or state, `"Unknown"` when the source omitted it.
    pub province: String,
    /// Report date parsed from the snapshot filename.
    pub report_date: NaiveDate,
    /// Cumulative confirmed cases to date.
    pub confirmed: i64,
    /// Cumulative deaths to date.
    pub deaths: i64,
    /// Cumulative recoveries to date.
    pub recovered: i64,
    /// Latitude of the reporting region, 0.0 when the source omitted it.
    pub latitude: f64,
    /// Longitude of the reporting region, 0.0 when the source omitted it.
    pub longitude: f64,
}

impl From<CaseRecord> for RawCaseRecord {
    /// Re-wrap a cleaned record as a raw one. Used to feed already-cleaned
    /// data back through the cleaner.
    fn from(record: CaseRecord) -> Self {
        RawCaseRecord {
            country: record.country,
            province: Some(record.province),
            report_date: record.report_date,
            confirmed: Some(record.confirmed as f64),
            deaths: Some(record.deaths as f64),
            recovered: Some(record.recovered as f64),
            latitude: Some(record.latitude),
            longitude: Some(record.longitude),
        }
    }
}

/// Accumulated confirmed/deaths/recovered counts for one group.
///
/// The two accumulators make the aggregation semantics explicit: cumulative
/// counters roll up with [`CaseCounts::observe_max`] (latest observed running
/// total), while same-day rows across provinces combine with
/// [`CaseCounts::add`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseCounts {
    /// Confirmed cases.
    pub confirmed: i64,
    /// Deaths.
    pub deaths: i64,
    /// Recoveries.
    pub recovered: i64,
}

impl CaseCounts {
    /// Keep the maximum observed value per column.
    pub fn observe_max(&mut self, record: &CaseRecord) {
        self.confirmed = self.confirmed.max(record.confirmed);
        self.deaths = self.deaths.max(record.deaths);
        self.recovered = self.recovered.max(record.recovered);
    }

    /// Sum the record's counts into the running totals.
    pub fn add(&mut self, record: &CaseRecord) {
        self.confirmed += record.confirmed;
        self.deaths += record.deaths;
        self.recovered += record.recovered;
    }
}
