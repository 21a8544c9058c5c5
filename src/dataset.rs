// Process-wide handle to the loaded statistics table.
//
// The table is loaded once at startup, before the menu loop, and only
// read afterwards. It lives until the process exits.
use crate::error::DashboardError;
use crate::loader::{self, LoadReport};
use crate::types::Record;
use once_cell::sync::OnceCell;
use std::collections::HashSet;
use std::path::Path;

static DATASET: OnceCell<Dataset> = OnceCell::new();

#[derive(Debug)]
pub struct Dataset {
    records: Vec<Record>,
    metrics: Vec<String>,
    sectors: Vec<String>,
    report: LoadReport,
}

impl Dataset {
    /// Build from records already sorted by period. Metrics and sectors are
    /// listed in order of first appearance.
    pub fn new(records: Vec<Record>, report: LoadReport) -> Self {
        let metrics = discover(records.iter().map(|r| r.metric.as_str()));
        let sectors = discover(records.iter().map(|r| r.sector.as_str()));
        Self {
            records,
            metrics,
            sectors,
            report,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn metrics(&self) -> &[String] {
        &self.metrics
    }

    pub fn sectors(&self) -> &[String] {
        &self.sectors
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    /// The metric shown before the user picks one. Falls back to the first
    /// metric when the table has fewer than `index + 1` of them.
    pub fn default_metric(&self, index: usize) -> Option<&str> {
        self.metrics
            .get(index)
            .or_else(|| self.metrics.first())
            .map(String::as_str)
    }

    pub fn has_metric(&self, metric: &str) -> bool {
        self.metrics.iter().any(|m| m == metric)
    }

    pub fn has_sector(&self, sector: &str) -> bool {
        self.sectors.iter().any(|s| s == sector)
    }
}

fn discover<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = Vec::new();
    for v in values {
        if seen.insert(v) {
            out.push(v.to_string());
        }
    }
    out
}

/// Load the table from `path` and install it as the process-wide dataset.
/// A second call fails instead of reloading.
pub fn init(path: &Path) -> Result<&'static Dataset, DashboardError> {
    if DATASET.get().is_some() {
        return Err(DashboardError::AlreadyInitialized);
    }
    let (records, report) = loader::load(path)?;
    DATASET
        .set(Dataset::new(records, report))
        .map_err(|_| DashboardError::AlreadyInitialized)?;
    get()
}

pub fn get() -> Result<&'static Dataset, DashboardError> {
    DATASET.get().ok_or(DashboardError::NotInitialized)
}
