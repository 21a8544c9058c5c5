use crate::error::LoadError;
use crate::types::{Period, RawRow, Record, REQUIRED_COLUMNS};
use crate::util::{parse_f64_strict, parse_i32_strict, parse_u32_strict};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub metrics: usize,
    pub sectors: usize,
    pub periods: usize,
}

/// Load the statistics table from `path`, validate it and sort it by
/// `(year, quarter_order)`.
pub fn load(path: &Path) -> Result<(Vec<Record>, LoadReport), LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let (records, report) = load_from_reader(file)?;
    info!(
        path = %path.display(),
        rows = report.total_rows,
        metrics = report.metrics,
        sectors = report.sectors,
        periods = report.periods,
        "statistics table loaded"
    );
    Ok((records, report))
}

pub fn load_from_reader<R: Read>(reader: R) -> Result<(Vec<Record>, LoadReport), LoadError> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let names: HashSet<&str> = headers.iter().collect();
    for col in REQUIRED_COLUMNS {
        if !names.contains(col) {
            return Err(LoadError::MissingColumn(col.to_string()));
        }
    }

    let mut records: Vec<Record> = Vec::new();
    let mut raw = StringRecord::new();
    while rdr.read_record(&mut raw)? {
        // Physical line where the record starts; quoted fields may span lines.
        let line = raw.position().map(|p| p.line()).unwrap_or_default();
        let row: RawRow = raw.deserialize(Some(&headers))?;
        records.push(parse_row(row, line)?);
    }
    if records.is_empty() {
        return Err(LoadError::Empty);
    }

    // Stable: rows sharing a period keep their file order.
    records.sort_by_key(|r| r.period());

    check_unique(&records)?;
    let periods = check_labels(&records)?;

    let metrics: HashSet<&str> = records.iter().map(|r| r.metric.as_str()).collect();
    let sectors: HashSet<&str> = records.iter().map(|r| r.sector.as_str()).collect();
    let report = LoadReport {
        total_rows: records.len(),
        metrics: metrics.len(),
        sectors: sectors.len(),
        periods,
    };
    Ok((records, report))
}

fn parse_row(row: RawRow, line: u64) -> Result<Record, LoadError> {
    let malformed = |reason: String| LoadError::Malformed { line, reason };

    let year = row
        .year
        .as_deref()
        .and_then(parse_i32_strict)
        .ok_or_else(|| malformed(format!("invalid year {:?}", row.year)))?;
    let quarter_order = row
        .quarter_order
        .as_deref()
        .and_then(parse_u32_strict)
        .ok_or_else(|| malformed(format!("invalid quarter order {:?}", row.quarter_order)))?;
    let value = row
        .value
        .as_deref()
        .and_then(parse_f64_strict)
        .ok_or_else(|| malformed(format!("invalid value {:?}", row.value)))?;
    let metric = required_text(row.metric, "metric").map_err(malformed)?;
    let sector = required_text(row.sector, "sector").map_err(malformed)?;
    let time_label = required_text(row.time_label, "time label").map_err(malformed)?;

    Ok(Record {
        year,
        quarter_order,
        metric,
        sector,
        time_label,
        value,
    })
}

fn required_text(cell: Option<String>, what: &str) -> Result<String, String> {
    match cell.map(|s| s.trim().to_string()) {
        Some(s) if !s.is_empty() => Ok(s),
        _ => Err(format!("empty {}", what)),
    }
}

/// One value per (metric, sector, period).
fn check_unique(records: &[Record]) -> Result<(), LoadError> {
    let mut seen: HashSet<(&str, &str, Period)> = HashSet::new();
    for r in records {
        if !seen.insert((r.metric.as_str(), r.sector.as_str(), r.period())) {
            return Err(LoadError::DuplicateRow {
                metric: r.metric.clone(),
                sector: r.sector.clone(),
                period: r.period(),
            });
        }
    }
    Ok(())
}

/// Each period has exactly one label and each label names exactly one
/// period. Returns the number of distinct periods.
fn check_labels(records: &[Record]) -> Result<usize, LoadError> {
    let mut by_period: HashMap<Period, &str> = HashMap::new();
    let mut by_label: HashMap<&str, Period> = HashMap::new();
    for r in records {
        let period = r.period();
        let label = r.time_label.as_str();
        if let Some(existing) = by_period.insert(period, label) {
            if existing != label {
                return Err(LoadError::InconsistentLabel(format!(
                    "{} is labelled both '{}' and '{}'",
                    period, existing, label
                )));
            }
        }
        if let Some(existing) = by_label.insert(label, period) {
            if existing != period {
                return Err(LoadError::InconsistentLabel(format!(
                    "'{}' is used for both {} and {}",
                    label, existing, period
                )));
            }
        }
    }
    debug!(periods = by_period.len(), "time labels validated");
    Ok(by_period.len())
}
