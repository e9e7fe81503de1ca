//! Per-country and per-period rollups over the cleaned record set.
//!
//! All counts carry cumulative-to-date semantics, so "total for a group" is
//! the maximum observed running total within that group, never a sum across
//! report days. The one exception is the date-range delta, which sums across
//! provinces on a single day before differencing.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use covid_core::models::{CaseCounts, CaseRecord};
use covid_core::table::{Cell, Tabular};

// ── Result rows ───────────────────────────────────────────────────────────────

/// Final cumulative totals for one country.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryStats {
    pub country: String,
    pub counts: CaseCounts,
}

impl Tabular for CountryStats {
    fn columns() -> Vec<String> {
        vec![
            "country".to_string(),
            "confirmed_cases".to_string(),
            "deaths_cases".to_string(),
            "recovered_cases".to_string(),
        ]
    }

    fn row(&self) -> Vec<Cell> {
        vec![
            Cell::text(&self.country),
            Cell::Int(self.counts.confirmed),
            Cell::Int(self.counts.deaths),
            Cell::Int(self.counts.recovered),
        ]
    }
}

/// Cumulative totals for one country within one calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyStats {
    pub country: String,
    /// Month key in `"%Y-%m"` form.
    pub month_year: String,
    pub counts: CaseCounts,
}

impl Tabular for MonthlyStats {
    fn columns() -> Vec<String> {
        vec![
            "country".to_string(),
            "month_year".to_string(),
            "confirmed_cases".to_string(),
            "deaths_cases".to_string(),
            "recovered_cases".to_string(),
        ]
    }

    fn row(&self) -> Vec<Cell> {
        vec![
            Cell::text(&self.country),
            Cell::text(&self.month_year),
            Cell::Int(self.counts.confirmed),
            Cell::Int(self.counts.deaths),
            Cell::Int(self.counts.recovered),
        ]
    }
}

/// Cumulative totals for one country within one calendar year.
#[derive(Debug, Clone, PartialEq)]
pub struct YearlyStats {
    pub country: String,
    pub year: i32,
    pub counts: CaseCounts,
}

impl Tabular for YearlyStats {
    fn columns() -> Vec<String> {
        vec![
            "country".to_string(),
            "year".to_string(),
            "confirmed_cases".to_string(),
            "deaths_cases".to_string(),
            "recovered_cases".to_string(),
        ]
    }

    fn row(&self) -> Vec<Cell> {
        vec![
            Cell::text(&self.country),
            Cell::Int(i64::from(self.year)),
            Cell::Int(self.counts.confirmed),
            Cell::Int(self.counts.deaths),
            Cell::Int(self.counts.recovered),
        ]
    }
}

/// Case-count change for one country between two report dates.
#[derive(Debug, Clone, PartialEq)]
pub struct DateRangeDelta {
    pub country: String,
    /// End-minus-start difference per count column; may be negative.
    pub counts: CaseCounts,
}

impl Tabular for DateRangeDelta {
    fn columns() -> Vec<String> {
        CountryStats::columns()
    }

    fn row(&self) -> Vec<Cell> {
        vec![
            Cell::text(&self.country),
            Cell::Int(self.counts.confirmed),
            Cell::Int(self.counts.deaths),
            Cell::Int(self.counts.recovered),
        ]
    }
}

// ── Operations ────────────────────────────────────────────────────────────────

/// Final cumulative totals per country (max-as-of over all report dates).
pub fn stats_by_country(records: &[CaseRecord]) -> Vec<CountryStats> {
    max_by_group(records, |r| r.country.clone())
        .into_iter()
        .map(|(country, counts)| CountryStats { country, counts })
        .collect()
}

/// Cumulative totals per (country, calendar month).
pub fn stats_by_month(records: &[CaseRecord]) -> Vec<MonthlyStats> {
    max_by_group(records, |r| {
        (r.country.clone(), r.report_date.format("%Y-%m").to_string())
    })
    .into_iter()
    .map(|((country, month_year), counts)| MonthlyStats {
        country,
        month_year,
        counts,
    })
    .collect()
}

/// Cumulative totals per (country, calendar year).
pub fn stats_by_year(records: &[CaseRecord]) -> Vec<YearlyStats> {
    max_by_group(records, |r| (r.country.clone(), r.report_date.year()))
        .into_iter()
        .map(|((country, year), counts)| YearlyStats {
            country,
            year,
            counts,
        })
        .collect()
}

/// Case-count change per country between `start` and `end` (inclusive).
///
/// Rows on each date are summed per country (multiple provinces report on
/// the same day), then differenced. Inner-join semantics: a country missing
/// rows on either date is silently absent from the result.
pub fn stats_by_date_range(
    records: &[CaseRecord],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<DateRangeDelta> {
    let start_totals = sum_on_date(records, start);
    let end_totals = sum_on_date(records, end);

    end_totals
        .into_iter()
        .filter_map(|(country, end_counts)| {
            let start_counts = start_totals.get(&country)?;
            Some(DateRangeDelta {
                country,
                counts: CaseCounts {
                    confirmed: end_counts.confirmed - start_counts.confirmed,
                    deaths: end_counts.deaths - start_counts.deaths,
                    recovered: end_counts.recovered - start_counts.recovered,
                },
            })
        })
        .collect()
}

// ── Private ───────────────────────────────────────────────────────────────────

/// Generic max-as-of driver: group records by `key_fn`, keeping the maximum
/// observed value per count column. BTreeMap keys give sorted output.
fn max_by_group<K: Ord>(
    records: &[CaseRecord],
    key_fn: impl Fn(&CaseRecord) -> K,
) -> BTreeMap<K, CaseCounts> {
    let mut map: BTreeMap<K, CaseCounts> = BTreeMap::new();
    for record in records {
        map.entry(key_fn(record)).or_default().observe_max(record);
    }
    map
}

/// Per-country sums over the rows reported on exactly `date`.
fn sum_on_date(records: &[CaseRecord], date: NaiveDate) -> BTreeMap<String, CaseCounts> {
    let mut map: BTreeMap<String, CaseCounts> = BTreeMap::new();
    for record in records.iter().filter(|r| r.report_date == date) {
        map.entry(record.country.clone()).or_default().add(record);
    }
    map
}

// ── Tests ─────────────────────────────────────────────────────────────────────
