//! Predicate filtering with per-day re-aggregation.
//!
//! Filtered views always collapse provinces: counts are summed per
//! (country, date) and coordinates averaged, so per-province detail is never
//! surfaced past this point.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use covid_core::models::{CaseCounts, CaseRecord};
use covid_core::table::{Cell, Tabular};

/// Optional year / month / country predicates. Any predicate left unset is a
/// pass-through.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub country: Option<String>,
}

impl FilterOptions {
    fn matches(&self, record: &CaseRecord) -> bool {
        if let Some(year) = self.year {
            if record.report_date.year() != year {
                return false;
            }
        }
        if let Some(month) = self.month {
            if record.report_date.month() != month {
                return false;
            }
        }
        if let Some(country) = &self.country {
            if &record.country != country {
                return false;
            }
        }
        true
    }
}

/// All-province totals for one country on one report date.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyCases {
    pub country: String,
    pub date: NaiveDate,
    /// Counts summed across provinces.
    pub counts: CaseCounts,
    /// Coordinates averaged across provinces.
    pub latitude: f64,
    pub longitude: f64,
}

impl Tabular for DailyCases {
    fn columns() -> Vec<String> {
        vec![
            "country".to_string(),
            "date".to_string(),
            "confirmed_cases".to_string(),
            "deaths_cases".to_string(),
            "recovered_cases".to_string(),
            "latitude".to_string(),
            "longitude".to_string(),
        ]
    }

    fn row(&self) -> Vec<Cell> {
        vec![
            Cell::text(&self.country),
            Cell::text(self.date.to_string()),
            Cell::Int(self.counts.confirmed),
            Cell::Int(self.counts.deaths),
            Cell::Int(self.counts.recovered),
            Cell::Float(self.latitude),
            Cell::Float(self.longitude),
        ]
    }
}

/// Apply the predicates, then re-aggregate by (country, date): counts are
/// summed, coordinates averaged. With no predicates set this is a plain
/// per-day rollup of the whole table.
pub fn filter_cases(records: &[CaseRecord], options: &FilterOptions) -> Vec<DailyCases> {
    struct DayGroup {
        counts: CaseCounts,
        lat_sum: f64,
        long_sum: f64,
        rows: u64,
    }

    let mut groups: BTreeMap<(String, NaiveDate), DayGroup> = BTreeMap::new();
    for record in records.iter().filter(|r| options.matches(r)) {
        let group = groups
            .entry((record.country.clone(), record.report_date))
            .or_insert(DayGroup {
                counts: CaseCounts::default(),
                lat_sum: 0.0,
                long_sum: 0.0,
                rows: 0,
            });
        group.counts.add(record);
        group.lat_sum += record.latitude;
        group.long_sum += record.longitude;
        group.rows += 1;
    }

    groups
        .into_iter()
        .map(|((country, date), group)| DailyCases {
            country,
            date,
            counts: group.counts,
            latitude: group.lat_sum / group.rows as f64,
            longitude: group.long_sum / group.rows as f64,
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        country: &str,
        province: &str,
        date: (i32, u32, u32),
        confirmed: i64,
        lat: f64,
    ) -> CaseRecord {
        CaseRecord {
            country: country.to_string(),
            province: province.to_string(),
            report_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            confirmed,
            deaths: confirmed / 10,
            recovered: confirmed / 2,
            latitude: lat,
            longitude: lat * 2.0,
        }
    }

    #[test]
    fn test_no_predicates_preserves_total_counts() {
        let records = vec![
            record("India", "A", (2021, 3, 15), 100, 10.0),
            record("India", "B", (2021, 3, 15), 50, 20.0),
            record("Brazil", "Unknown", (2021, 3, 15), 250, -10.0),
        ];

        let daily = filter_cases(&records, &FilterOptions::default());

        let input_total: i64 = records.iter().map(|r| r.confirmed).sum();
        let output_total: i64 = daily.iter().map(|d| d.counts.confirmed).sum();
        assert_eq!(input_total, output_total);
        // Provinces collapse into one row per (country, date).
        assert_eq!(daily.len(), 2);
    }

    #[test]
    fn test_provinces_sum_counts_and_average_coordinates() {
        let records = vec![
            record("India", "A", (2021, 3, 15), 100, 10.0),
            record("India", "B", (2021, 3, 15), 50, 20.0),
        ];

        let daily = filter_cases(&records, &FilterOptions::default());
        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].counts.confirmed, 150);
        assert_eq!(daily[0].latitude, 15.0);
        assert_eq!(daily[0].longitude, 30.0);
    }

    #[test]
    fn test_year_predicate() {
        let records = vec![
            record("India", "Unknown", (2021, 3, 15), 100, 0.0),
            record("India", "Unknown", (2022, 3, 15), 200, 0.0),
        ];

        let daily = filter_cases(
            &records,
            &FilterOptions {
                year: Some(2022),
                ..Default::default()
            },
        );
        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].counts.confirmed, 200);
    }

    #[test]
    fn test_month_predicate() {
        let records = vec![
            record("India", "Unknown", (2021, 3, 15), 100, 0.0),
            record("India", "Unknown", (2021, 4, 15), 200, 0.0),
        ];

        let daily = filter_cases(
            &records,
            &FilterOptions {
                month: Some(4),
                ..Default::default()
            },
        );
        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].date.month(), 4);
    }

    #[test]
    fn test_country_predicate() {
        let records = vec![
            record("India", "Unknown", (2021, 3, 15), 100, 0.0),
            record("Brazil", "Unknown", (2021, 3, 15), 250, 0.0),
        ];

        let daily = filter_cases(
            &records,
            &FilterOptions {
                country: Some("Brazil".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].country, "Brazil");
    }

    #[test]
    fn test_combined_predicates_can_yield_empty() {
        let records = vec![record("India", "Unknown", (2021, 3, 15), 100, 0.0)];

        let daily = filter_cases(
            &records,
            &FilterOptions {
                year: Some(2021),
                month: Some(12),
                country: Some("India".to_string()),
            },
        );
        // Empty result is valid, not an error.
        assert!(daily.is_empty());
    }

    #[test]
    fn test_output_sorted_by_country_then_date() {
        let records = vec![
            record("India", "Unknown", (2021, 3, 16), 180, 0.0),
            record("Brazil", "Unknown", (2021, 3, 15), 250, 0.0),
            record("India", "Unknown", (2021, 3, 15), 100, 0.0),
        ];

        let daily = filter_cases(&records, &FilterOptions::default());
        let keys: Vec<(&str, u32)> = daily
            .iter()
            .map(|d| (d.country.as_str(), d.date.day()))
            .collect();
        assert_eq!(keys, vec![("Brazil", 15), ("India", 15), ("India", 16)]);
    }
}
