// Orchestration: one selection in, every dashboard panel out.
//
// Each call is a full recomputation over the read-only table; nothing is
// cached between selections.
use crate::chart::{chart_data, ChartData};
use crate::dataset::Dataset;
use crate::error::DashboardError;
use crate::filter::{filter, FilteredView};
use crate::narrative::{narrate, Narrative};
use crate::summary::{summarize, Summary};
use crate::types::Record;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub metric: String,
    pub sectors: Vec<String>,
}

impl Selection {
    /// Default metric by discovery index, every sector selected.
    pub fn defaults(ds: &Dataset, metric_index: usize) -> Option<Self> {
        let metric = ds.default_metric(metric_index)?.to_string();
        Some(Self {
            metric,
            sectors: ds.sectors().to_vec(),
        })
    }

    pub fn validate(&self, ds: &Dataset) -> Result<(), DashboardError> {
        if !ds.has_metric(&self.metric) {
            return Err(DashboardError::UnknownMetric(self.metric.clone()));
        }
        if let Some(s) = self.sectors.iter().find(|s| !ds.has_sector(s)) {
            return Err(DashboardError::UnknownSector(s.clone()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct DashboardView<'a> {
    pub view: FilteredView<'a>,
    pub summary: Summary<'a>,
    pub chart: Option<ChartData>,
    /// Not computed for an empty view.
    pub narrative: Option<Narrative>,
}

pub fn compute<'a>(
    records: &'a [Record],
    selection: &Selection,
) -> Result<DashboardView<'a>, DashboardError> {
    let view = filter(records, &selection.metric, &selection.sectors);
    debug!(
        metric = %selection.metric,
        sectors = selection.sectors.len(),
        rows = view.len(),
        "selection applied"
    );
    let summary = summarize(&view);
    let chart = chart_data(&view);
    let narrative = if view.is_empty() {
        None
    } else {
        Some(narrate(&view)?)
    };
    Ok(DashboardView {
        view,
        summary,
        chart,
        narrative,
    })
}

/// Parse a 1-based metric choice from the menu.
pub fn parse_metric_choice(input: &str, metrics: &[String]) -> Option<String> {
    let idx: usize = input.trim().parse().ok()?;
    metrics.get(idx.checked_sub(1)?).cloned()
}

/// Parse a sector selection: comma-separated 1-based indices, `all`, or an
/// empty line for every sector. `none` clears the selection.
pub fn parse_sector_selection(input: &str, sectors: &[String]) -> Result<Vec<String>, String> {
    let input = input.trim();
    if input.is_empty() || input.eq_ignore_ascii_case("all") {
        return Ok(sectors.to_vec());
    }
    if input.eq_ignore_ascii_case("none") {
        return Ok(Vec::new());
    }
    let mut picked: Vec<String> = Vec::new();
    for part in input.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let idx: usize = part
            .parse()
            .map_err(|_| format!("'{}' is not a number", part))?;
        let sector = idx
            .checked_sub(1)
            .and_then(|i| sectors.get(i))
            .ok_or_else(|| format!("no sector number {}", idx))?;
        if !picked.contains(sector) {
            picked.push(sector.clone());
        }
    }
    Ok(picked)
}
