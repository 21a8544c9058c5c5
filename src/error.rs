use std::io;

use thiserror::Error;

use crate::types::Period;

/// Failures while reading the statistics table. All of them are fatal at
/// startup; nothing is partially loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing required column: {0}")]
    MissingColumn(String),
    #[error("line {line}: {reason}")]
    Malformed { line: u64, reason: String },
    #[error("duplicate row for metric '{metric}', sector '{sector}' at {period}")]
    DuplicateRow {
        metric: String,
        sector: String,
        period: Period,
    },
    #[error("inconsistent time label: {0}")]
    InconsistentLabel(String),
    #[error("source contains no data rows")]
    Empty,
}

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("load failed: {0}")]
    Load(#[from] LoadError),
    #[error("duplicate row for sector '{sector}' at {period}")]
    DuplicateRow { sector: String, period: Period },
    #[error("unknown metric: {0}")]
    UnknownMetric(String),
    #[error("unknown sector: {0}")]
    UnknownSector(String),
    #[error("dataset already initialized")]
    AlreadyInitialized,
    #[error("dataset not initialized")]
    NotInitialized,
    #[error("config error: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
