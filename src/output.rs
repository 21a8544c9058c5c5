use crate::chart::ChartData;
use crate::dashboard::DashboardView;
use crate::error::DashboardError;
use crate::narrative::{Narrative, SectorDelta};
use crate::summary::Summary;
use crate::types::{DetailRow, Period, Record, SummaryRow};
use crate::util::format_number;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};
use tracing::info;

pub const NO_DATA_MESSAGE: &str = "No data is available for this filter combination.";

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), DashboardError> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), DashboardError> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

pub fn render_table_rows<T>(rows: &[T], max_rows: usize) -> String
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        return "(no rows)".to_string();
    }
    Table::new(slice).with(Style::markdown()).to_string()
}

pub fn summary_row(summary: &Summary<'_>) -> Option<SummaryRow> {
    match summary {
        Summary::NoData => None,
        Summary::Latest(s) => Some(SummaryRow {
            period: s.time_label.clone(),
            sector_count: s.sector_count,
            median: format_number(s.median, 2),
        }),
    }
}

pub fn detail_rows(rows: &[&Record]) -> Vec<DetailRow> {
    rows.iter()
        .map(|r| DetailRow {
            time_label: r.time_label.clone(),
            sector: r.sector.clone(),
            metric: r.metric.clone(),
            value: format_number(r.value, 2),
        })
        .collect()
}

/// Render every panel as console text.
pub fn render_dashboard(dash: &DashboardView<'_>, preview_rows: usize) -> String {
    let mut out = String::new();
    out.push_str("### Latest Summary\n\n");
    match summary_row(&dash.summary) {
        Some(row) => out.push_str(&render_table_rows(&[row], 1)),
        None => out.push_str(NO_DATA_MESSAGE),
    }
    out.push_str(&format!("\n\n### {} Trend\n\n", dash.view.metric()));
    match &dash.chart {
        Some(chart) => out.push_str(&chart.to_table()),
        None => out.push_str("Change the filters to display the chart."),
    }
    if let Some(narrative) = &dash.narrative {
        out.push_str("\n\n");
        out.push_str(&narrative.to_string());
    }
    out.push_str("\n\n### Detail Table\n\n");
    if dash.view.is_empty() {
        out.push_str(NO_DATA_MESSAGE);
    } else {
        out.push_str(&render_table_rows(&detail_rows(dash.view.rows()), preview_rows));
        if dash.view.len() > preview_rows {
            out.push_str(&format!(
                "\n({} of {} rows shown)",
                preview_rows,
                dash.view.len()
            ));
        }
    }
    out.push('\n');
    out
}

#[derive(Debug, Serialize)]
struct SummaryExport<'a> {
    period: Period,
    time_label: String,
    sectors: Vec<&'a str>,
    sector_count: usize,
    median: f64,
}

#[derive(Debug, Serialize)]
struct DashboardExport<'a> {
    generated_at: DateTime<Utc>,
    metric: &'a str,
    sectors: Vec<&'a str>,
    summary: Option<SummaryExport<'a>>,
    chart: Option<&'a ChartData>,
    narrative: Option<String>,
    deltas: Option<&'a [SectorDelta]>,
}

/// Write `filtered_rows.csv` and `dashboard.json` into `dir`.
pub fn export(dash: &DashboardView<'_>, dir: &Path) -> Result<Vec<PathBuf>, DashboardError> {
    std::fs::create_dir_all(dir)?;

    let rows_path = dir.join("filtered_rows.csv");
    let rows: Vec<&Record> = dash.view.rows().to_vec();
    write_csv(&rows_path, &rows)?;

    let summary = match &dash.summary {
        Summary::NoData => None,
        Summary::Latest(s) => Some(SummaryExport {
            period: s.period,
            time_label: s.time_label.clone(),
            sectors: s.rows.iter().map(|r| r.sector.as_str()).collect(),
            sector_count: s.sector_count,
            median: s.median,
        }),
    };
    let bundle = DashboardExport {
        generated_at: Utc::now(),
        metric: dash.view.metric(),
        sectors: dash.view.sectors(),
        summary,
        chart: dash.chart.as_ref(),
        narrative: dash.narrative.as_ref().map(|n| n.to_string()),
        deltas: match &dash.narrative {
            Some(Narrative::Comparison(c)) => Some(c.deltas.as_slice()),
            _ => None,
        },
    };
    let json_path = dir.join("dashboard.json");
    write_json(&json_path, &bundle)?;

    info!(
        rows = rows.len(),
        csv = %rows_path.display(),
        json = %json_path.display(),
        "dashboard exported"
    );
    Ok(vec![rows_path, json_path])
}
