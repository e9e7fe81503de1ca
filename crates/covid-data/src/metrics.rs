//! Derived metrics: wave-intensity comparison, fatality/recovery rates,
//! descriptive statistics and the country-by-year pivot.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Datelike;
use covid_core::formatting::{pct_change, round2};
use covid_core::models::CaseRecord;
use covid_core::table::{Cell, Table, Tabular};

/// The three wave years compared against each other.
pub const WAVE_YEARS: [i32; 3] = [2021, 2022, 2023];

// ── Wave intensity ────────────────────────────────────────────────────────────

/// Year-end cumulative confirmed totals plus year-over-year change for one
/// country.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveIntensity {
    pub country: String,
    /// Max confirmed observed per wave year; 0 when the year has no rows.
    pub cases_2021: i64,
    pub cases_2022: i64,
    pub cases_2023: i64,
    /// Percentage changes, rounded to two decimals. A zero baseline year
    /// leaves the value non-finite.
    pub change_2021_2022: f64,
    pub change_2022_2023: f64,
    pub change_2021_2023: f64,
}

impl Tabular for WaveIntensity {
    fn columns() -> Vec<String> {
        vec![
            "country".to_string(),
            "2021".to_string(),
            "2022".to_string(),
            "2023".to_string(),
            "2021->2022 (%)".to_string(),
            "2022->2023 (%)".to_string(),
            "2021->2023 (%)".to_string(),
        ]
    }

    fn row(&self) -> Vec<Cell> {
        vec![
            Cell::text(&self.country),
            Cell::Int(self.cases_2021),
            Cell::Int(self.cases_2022),
            Cell::Int(self.cases_2023),
            Cell::Float(self.change_2021_2022),
            Cell::Float(self.change_2022_2023),
            Cell::Float(self.change_2021_2023),
        ]
    }
}

/// Compare wave intensity across 2021, 2022 and 2023.
///
/// The maximum confirmed value observed within a year approximates the
/// year-end cumulative total.
pub fn compare_wave_intensity(records: &[CaseRecord]) -> Vec<WaveIntensity> {
    let mut yearly: BTreeMap<String, BTreeMap<i32, i64>> = BTreeMap::new();
    for record in records {
        let per_year = yearly.entry(record.country.clone()).or_default();
        let max = per_year.entry(record.report_date.year()).or_insert(0);
        *max = (*max).max(record.confirmed);
    }

    yearly
        .into_iter()
        .map(|(country, per_year)| {
            let year_total = |y: i32| per_year.get(&y).copied().unwrap_or(0);
            let (y1, y2, y3) = (
                year_total(WAVE_YEARS[0]),
                year_total(WAVE_YEARS[1]),
                year_total(WAVE_YEARS[2]),
            );
            WaveIntensity {
                country,
                cases_2021: y1,
                cases_2022: y2,
                cases_2023: y3,
                change_2021_2022: pct_change(y1 as f64, y2 as f64),
                change_2022_2023: pct_change(y2 as f64, y3 as f64),
                change_2021_2023: pct_change(y1 as f64, y3 as f64),
            }
        })
        .collect()
}

// ── Rates ─────────────────────────────────────────────────────────────────────

/// Average fatality and recovery rates for one country.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseRates {
    pub country: String,
    /// Mean of per-record deaths/confirmed ratios, in percent.
    pub fatality_rate: f64,
    /// Mean of per-record recovered/confirmed ratios, in percent.
    pub recovery_rate: f64,
}

impl Tabular for CaseRates {
    fn columns() -> Vec<String> {
        vec![
            "country".to_string(),
            "fatality_rate (%)".to_string(),
            "recovery_rate (%)".to_string(),
        ]
    }

    fn row(&self) -> Vec<Cell> {
        vec![
            Cell::text(&self.country),
            Cell::Float(self.fatality_rate),
            Cell::Float(self.recovery_rate),
        ]
    }
}

/// Per-country mean of row-wise fatality and recovery ratios.
///
/// Rows with zero confirmed cases are excluded from the mean, not counted as
/// zero. A country with no qualifying rows is absent from the result.
pub fn calculate_rates(records: &[CaseRecord]) -> Vec<CaseRates> {
    struct RateSums {
        fatality: f64,
        recovery: f64,
        rows: u64,
    }

    let mut sums: BTreeMap<String, RateSums> = BTreeMap::new();
    for record in records.iter().filter(|r| r.confirmed > 0) {
        let confirmed = record.confirmed as f64;
        let entry = sums.entry(record.country.clone()).or_insert(RateSums {
            fatality: 0.0,
            recovery: 0.0,
            rows: 0,
        });
        entry.fatality += record.deaths as f64 / confirmed * 100.0;
        entry.recovery += record.recovered as f64 / confirmed * 100.0;
        entry.rows += 1;
    }

    sums.into_iter()
        .map(|(country, s)| CaseRates {
            country,
            fatality_rate: round2(s.fatality / s.rows as f64),
            recovery_rate: round2(s.recovery / s.rows as f64),
        })
        .collect()
}

// ── Descriptive statistics ────────────────────────────────────────────────────

/// One summary statistic across the three count columns.
#[derive(Debug, Clone, PartialEq)]
pub struct DescribeRow {
    /// Statistic label: count, mean, std, min, 25%, 50%, 75%, max.
    pub statistic: String,
    pub confirmed: f64,
    pub deaths: f64,
    pub recovered: f64,
}

impl Tabular for DescribeRow {
    fn columns() -> Vec<String> {
        vec![
            "statistic".to_string(),
            "confirmed_cases".to_string(),
            "deaths_cases".to_string(),
            "recovered_cases".to_string(),
        ]
    }

    fn row(&self) -> Vec<Cell> {
        vec![
            Cell::text(&self.statistic),
            Cell::Float(self.confirmed),
            Cell::Float(self.deaths),
            Cell::Float(self.recovered),
        ]
    }
}

/// Standard distribution summary of the count columns, rounded to two
/// decimals: count, mean, sample std, min, quartiles (linear interpolation)
/// and max.
pub fn describe_cases(records: &[CaseRecord]) -> Vec<DescribeRow> {
    let confirmed = sorted_column(records, |r| r.confirmed);
    let deaths = sorted_column(records, |r| r.deaths);
    let recovered = sorted_column(records, |r| r.recovered);

    const STATISTICS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

    STATISTICS
        .iter()
        .map(|&statistic| DescribeRow {
            statistic: statistic.to_string(),
            confirmed: round2(summary_stat(&confirmed, statistic)),
            deaths: round2(summary_stat(&deaths, statistic)),
            recovered: round2(summary_stat(&recovered, statistic)),
        })
        .collect()
}

fn sorted_column(records: &[CaseRecord], field: impl Fn(&CaseRecord) -> i64) -> Vec<f64> {
    let mut values: Vec<f64> = records.iter().map(|r| field(r) as f64).collect();
    values.sort_by(|a, b| a.total_cmp(b));
    values
}

fn summary_stat(sorted: &[f64], statistic: &str) -> f64 {
    match statistic {
        "count" => sorted.len() as f64,
        "mean" => mean(sorted),
        "std" => sample_std(sorted),
        "min" => sorted.first().copied().unwrap_or(f64::NAN),
        "25%" => percentile(sorted, 0.25),
        "50%" => percentile(sorted, 0.50),
        "75%" => percentile(sorted, 0.75),
        "max" => sorted.last().copied().unwrap_or(f64::NAN),
        _ => f64::NAN,
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator); NaN below two values.
fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    (sum_sq / (values.len() - 1) as f64).sqrt()
}

/// Quantile with linear interpolation between the two nearest ranks.
fn percentile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        sorted[lo] + (pos - lo as f64) * (sorted[hi] - sorted[lo])
    }
}

// ── Pivot ─────────────────────────────────────────────────────────────────────

/// Country rows by observed-year columns, max confirmed per cell.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotByYear {
    /// Years present in the data, ascending; one output column each.
    pub years: Vec<i32>,
    /// One row per country with max confirmed per year; `None` when the
    /// country has no rows for that year.
    pub rows: Vec<(String, Vec<Option<i64>>)>,
}

impl PivotByYear {
    /// Lay the pivot out as a display table; missing cells render empty.
    pub fn to_table(&self) -> Table {
        let mut columns = vec!["country".to_string()];
        columns.extend(self.years.iter().map(|y| y.to_string()));

        let mut table = Table::new(columns);
        for (country, cells) in &self.rows {
            let mut row = vec![Cell::text(country)];
            row.extend(cells.iter().map(|cell| match cell {
                Some(v) => Cell::Int(*v),
                None => Cell::text(""),
            }));
            table.push_row(row);
        }
        table
    }
}

/// Pivot the record set: one row per country, one column per observed year,
/// max confirmed cases per cell.
pub fn generate_pivot(records: &[CaseRecord]) -> PivotByYear {
    let years: Vec<i32> = records
        .iter()
        .map(|r| r.report_date.year())
        .collect::<BTreeSet<i32>>()
        .into_iter()
        .collect();

    let mut per_country: BTreeMap<String, BTreeMap<i32, i64>> = BTreeMap::new();
    for record in records {
        let per_year = per_country.entry(record.country.clone()).or_default();
        let max = per_year.entry(record.report_date.year()).or_insert(0);
        *max = (*max).max(record.confirmed);
    }

    let rows = per_country
        .into_iter()
        .map(|(country, per_year)| {
            let cells = years.iter().map(|y| per_year.get(y).copied()).collect();
            (country, cells)
        })
        .collect();

    PivotByYear { years, rows }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
