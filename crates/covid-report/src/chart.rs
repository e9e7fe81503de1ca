//! Chart images rendered from the cleaned record set.
//!
//! Output is SVG so the charts need no system font or raster libraries.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::Datelike;
use covid_core::models::CaseRecord;
use covid_core::{CovidError, Result};
use covid_data::aggregate::{stats_by_country, stats_by_month};
use plotters::prelude::*;
use tracing::{info, warn};

const CHART_SIZE: (u32, u32) = (1024, 640);

/// Bar chart of the final cumulative confirmed total per country,
/// descending.
pub fn bar_total_cases(records: &[CaseRecord], path: &Path) -> Result<()> {
    let mut totals = stats_by_country(records);
    totals.sort_by(|a, b| b.counts.confirmed.cmp(&a.counts.confirmed));

    if totals.is_empty() {
        warn!("No records to chart; skipping {}", path.display());
        return Ok(());
    }
    ensure_parent(path)?;

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let y_max = totals[0].counts.confirmed.max(1);
    let mut chart = ChartBuilder::on(&root)
        .caption("Total Confirmed Cases by Country", ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(90)
        .build_cartesian_2d(
            (0..totals.len() as i32).into_segmented(),
            0i64..y_max,
        )
        .map_err(chart_err)?;

    let labels: Vec<String> = totals.iter().map(|t| t.country.clone()).collect();
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len())
        .x_label_formatter(&|x| match x {
            SegmentValue::CenterOf(i) => labels
                .get(*i as usize)
                .cloned()
                .unwrap_or_default(),
            _ => String::new(),
        })
        .y_desc("confirmed cases")
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(totals.iter().enumerate().map(|(i, stat)| {
            Rectangle::new(
                [
                    (SegmentValue::Exact(i as i32), 0i64),
                    (SegmentValue::Exact(i as i32 + 1), stat.counts.confirmed),
                ],
                BLUE.filled(),
            )
        }))
        .map_err(chart_err)?;

    root.present().map_err(chart_err)?;
    info!("Chart saved to {}", path.display());
    Ok(())
}

/// Per-country monthly trend lines of cumulative confirmed cases.
pub fn line_trend_by_country(records: &[CaseRecord], path: &Path) -> Result<()> {
    let monthly = stats_by_month(records);
    if monthly.is_empty() {
        warn!("No records to chart; skipping {}", path.display());
        return Ok(());
    }
    ensure_parent(path)?;

    // Shared month axis: every month observed anywhere, ascending.
    let months: Vec<String> = monthly
        .iter()
        .map(|m| m.month_year.clone())
        .collect::<std::collections::BTreeSet<String>>()
        .into_iter()
        .collect();
    let month_index: BTreeMap<&str, i32> = months
        .iter()
        .enumerate()
        .map(|(i, m)| (m.as_str(), i as i32))
        .collect();

    let mut by_country: BTreeMap<String, Vec<(i32, i64)>> = BTreeMap::new();
    for entry in &monthly {
        by_country
            .entry(entry.country.clone())
            .or_default()
            .push((month_index[entry.month_year.as_str()], entry.counts.confirmed));
    }

    let y_max = monthly.iter().map(|m| m.counts.confirmed).max().unwrap_or(1).max(1);
    let x_max = (months.len() as i32 - 1).max(1);

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Confirmed Case Trend by Country", ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(90)
        .build_cartesian_2d(0..x_max, 0i64..y_max)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .x_labels(months.len().min(12))
        .x_label_formatter(&|x| {
            months
                .get(*x as usize)
                .cloned()
                .unwrap_or_default()
        })
        .y_desc("confirmed cases")
        .draw()
        .map_err(chart_err)?;

    for (idx, (country, mut points)) in by_country.into_iter().enumerate() {
        points.sort();
        let color = Palette99::pick(idx).mix(0.9);
        chart
            .draw_series(LineSeries::new(points, color.stroke_width(2)))
            .map_err(chart_err)?
            .label(country)
            .legend(move |(x, y)| {
                Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
            });
    }

    chart
        .configure_series_labels()
        .border_style(&BLACK)
        .background_style(&WHITE.mix(0.8))
        .draw()
        .map_err(chart_err)?;

    root.present().map_err(chart_err)?;
    info!("Chart saved to {}", path.display());
    Ok(())
}

/// Scatter of final cumulative deaths against confirmed cases, one point per
/// country.
pub fn scatter_deaths_vs_cases(records: &[CaseRecord], path: &Path) -> Result<()> {
    let totals = stats_by_country(records);
    if totals.is_empty() {
        warn!("No records to chart; skipping {}", path.display());
        return Ok(());
    }
    ensure_parent(path)?;

    let x_max = totals
        .iter()
        .map(|t| t.counts.confirmed)
        .max()
        .unwrap_or(1)
        .max(1);
    let y_max = totals
        .iter()
        .map(|t| t.counts.deaths)
        .max()
        .unwrap_or(1)
        .max(1);

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Deaths vs Confirmed Cases by Country", ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(90)
        .build_cartesian_2d(0i64..x_max, 0i64..y_max)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .x_desc("confirmed cases")
        .y_desc("deaths")
        .draw()
        .map_err(chart_err)?;

    for (idx, stat) in totals.iter().enumerate() {
        let color = Palette99::pick(idx).mix(0.9);
        chart
            .draw_series(std::iter::once(Circle::new(
                (stat.counts.confirmed, stat.counts.deaths),
                6,
                color.filled(),
            )))
            .map_err(chart_err)?
            .label(stat.country.clone())
            .legend(move |(x, y)| Circle::new((x + 5, y), 5, color.filled()));
    }

    chart
        .configure_series_labels()
        .border_style(&BLACK)
        .background_style(&WHITE.mix(0.8))
        .draw()
        .map_err(chart_err)?;

    root.present().map_err(chart_err)?;
    info!("Chart saved to {}", path.display());
    Ok(())
}

/// Boxplot of the confirmed-cases distribution per calendar month (all
/// countries and years pooled).
pub fn boxplot_cases_by_month(records: &[CaseRecord], path: &Path) -> Result<()> {
    if records.is_empty() {
        warn!("No records to chart; skipping {}", path.display());
        return Ok(());
    }
    ensure_parent(path)?;

    let mut by_month: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
    for record in records {
        by_month
            .entry(record.report_date.month() as i32)
            .or_default()
            .push(record.confirmed as f64);
    }

    let y_max = records
        .iter()
        .map(|r| r.confirmed)
        .max()
        .unwrap_or(1)
        .max(1) as f32;

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Distribution of Confirmed Cases by Month",
            ("sans-serif", 28),
        )
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(90)
        .build_cartesian_2d((1..13).into_segmented(), 0f32..y_max)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(12)
        .x_label_formatter(&|x: &SegmentValue<i32>| match x {
            SegmentValue::CenterOf(m) => m.to_string(),
            _ => String::new(),
        })
        .x_desc("month")
        .y_desc("confirmed cases")
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(by_month.iter().map(|(month, values)| {
            Boxplot::new_vertical(SegmentValue::CenterOf(*month), &Quartiles::new(values))
                .width(24)
                .style(BLUE.stroke_width(2))
        }))
        .map_err(chart_err)?;

    root.present().map_err(chart_err)?;
    info!("Chart saved to {}", path.display());
    Ok(())
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn chart_err(err: impl std::fmt::Display) -> CovidError {
    CovidError::Chart(err.to_string())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn record(country: &str, date: (i32, u32, u32), confirmed: i64) -> CaseRecord {
        CaseRecord {
            country: country.to_string(),
            province: "Unknown".to_string(),
            report_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            confirmed,
            deaths: confirmed / 10,
            recovered: confirmed / 2,
            latitude: 0.0,
            longitude: 0.0,
        }
    }

    fn sample_records() -> Vec<CaseRecord> {
        vec![
            record("India", (2021, 3, 15), 100),
            record("India", (2021, 4, 15), 180),
            record("Brazil", (2021, 3, 15), 250),
            record("Brazil", (2021, 4, 15), 300),
        ]
    }

    #[test]
    fn test_bar_chart_writes_svg() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("graphics").join("bar_total_cases.svg");

        bar_total_cases(&sample_records(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<svg"));
    }

    #[test]
    fn test_line_trend_writes_svg() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("line_trend_by_country.svg");

        line_trend_by_country(&sample_records(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<svg"));
    }

    #[test]
    fn test_scatter_writes_svg() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scatter_deaths_vs_cases.svg");

        scatter_deaths_vs_cases(&sample_records(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<svg"));
    }

    #[test]
    fn test_boxplot_writes_svg() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("boxplot_cases_by_month.svg");

        boxplot_cases_by_month(&sample_records(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<svg"));
    }

    #[test]
    fn test_boxplot_single_record_per_month() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("boxplot.svg");

        boxplot_cases_by_month(&[record("India", (2021, 3, 15), 100)], &path).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_charts_skip_empty_input() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.svg");

        bar_total_cases(&[], &path).unwrap();
        line_trend_by_country(&[], &path).unwrap();
        scatter_deaths_vs_cases(&[], &path).unwrap();
        boxplot_cases_by_month(&[], &path).unwrap();

        assert!(!path.exists());
    }
}
