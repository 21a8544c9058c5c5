use crate::types::{Period, Record};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Rows of one metric restricted to a set of sectors. Borrowed from the
/// loaded table and rebuilt on every selection change.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    metric: String,
    rows: Vec<&'a Record>,
}

/// Keep rows whose metric equals `metric` and whose sector is in `sectors`.
/// Input order is preserved.
pub fn filter<'a>(records: &'a [Record], metric: &str, sectors: &[String]) -> FilteredView<'a> {
    let wanted: HashSet<&str> = sectors.iter().map(String::as_str).collect();
    let rows = records
        .iter()
        .filter(|r| r.metric == metric && wanted.contains(r.sector.as_str()))
        .collect();
    FilteredView {
        metric: metric.to_string(),
        rows,
    }
}

impl<'a> FilteredView<'a> {
    pub fn metric(&self) -> &str {
        &self.metric
    }

    pub fn rows(&self) -> &[&'a Record] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct periods in ascending order, each with its time label.
    pub fn periods(&self) -> Vec<(Period, &'a str)> {
        let mut by_period: BTreeMap<Period, &'a str> = BTreeMap::new();
        for r in &self.rows {
            by_period.entry(r.period()).or_insert(r.time_label.as_str());
        }
        by_period.into_iter().collect()
    }

    pub fn rows_at(&self, period: Period) -> Vec<&'a Record> {
        self.rows
            .iter()
            .copied()
            .filter(|r| r.period() == period)
            .collect()
    }

    /// Sectors that actually have rows in the view, sorted.
    pub fn sectors(&self) -> Vec<&'a str> {
        let set: BTreeSet<&'a str> = self.rows.iter().map(|r| r.sector.as_str()).collect();
        set.into_iter().collect()
    }
}
