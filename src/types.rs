use serde::{Deserialize, Serialize};
use std::fmt;
use tabled::Tabled;

/// Column names of the long-format PDRB table.
pub const COL_YEAR: &str = "Tahun";
pub const COL_QUARTER_ORDER: &str = "Quarter_Order";
pub const COL_METRIC: &str = "Metrik";
pub const COL_SECTOR: &str = "LAPANGAN USAHA";
pub const COL_TIME_LABEL: &str = "Time_Label";
pub const COL_VALUE: &str = "Nilai";

pub const REQUIRED_COLUMNS: [&str; 6] = [
    COL_YEAR,
    COL_QUARTER_ORDER,
    COL_METRIC,
    COL_SECTOR,
    COL_TIME_LABEL,
    COL_VALUE,
];

/// One CSV row as read from disk, before validation.
#[derive(Debug, Deserialize)]
pub struct RawRow {
    #[serde(rename = "Tahun")]
    pub year: Option<String>,
    #[serde(rename = "Quarter_Order")]
    pub quarter_order: Option<String>,
    #[serde(rename = "Metrik")]
    pub metric: Option<String>,
    #[serde(rename = "LAPANGAN USAHA")]
    pub sector: Option<String>,
    #[serde(rename = "Time_Label")]
    pub time_label: Option<String>,
    #[serde(rename = "Nilai")]
    pub value: Option<String>,
}

/// One reporting interval. Ordering is lexicographic on
/// `(year, quarter_order)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Period {
    pub year: i32,
    pub quarter_order: u32,
}

impl Period {
    pub fn new(year: i32, quarter_order: u32) -> Self {
        Self {
            year,
            quarter_order,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Q{}", self.year, self.quarter_order)
    }
}

/// A validated row of the statistics table. Never mutated after load.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    #[serde(rename = "Tahun")]
    pub year: i32,
    #[serde(rename = "Quarter_Order")]
    pub quarter_order: u32,
    #[serde(rename = "Metrik")]
    pub metric: String,
    #[serde(rename = "LAPANGAN USAHA")]
    pub sector: String,
    #[serde(rename = "Time_Label")]
    pub time_label: String,
    #[serde(rename = "Nilai")]
    pub value: f64,
}

impl Record {
    pub fn period(&self) -> Period {
        Period::new(self.year, self.quarter_order)
    }
}

/// Detail-table row with the value pre-formatted for display.
#[derive(Debug, Tabled, Clone)]
pub struct DetailRow {
    #[tabled(rename = "Time_Label")]
    pub time_label: String,
    #[tabled(rename = "LAPANGAN USAHA")]
    pub sector: String,
    #[tabled(rename = "Metrik")]
    pub metric: String,
    #[tabled(rename = "Nilai")]
    pub value: String,
}

#[derive(Debug, Tabled, Clone)]
pub struct SummaryRow {
    #[tabled(rename = "Latest Period")]
    pub period: String,
    #[tabled(rename = "Sectors")]
    pub sector_count: usize,
    #[tabled(rename = "Median Value")]
    pub median: String,
}
