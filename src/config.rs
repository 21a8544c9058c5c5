use crate::error::DashboardError;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data_path: String,
    pub output_dir: String,
    /// Position of the default metric in discovery order.
    pub default_metric_index: usize,
    /// Rows shown in the detail-table preview.
    pub preview_rows: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: "pdrb_data_long_format.csv".to_string(),
            output_dir: ".".to_string(),
            default_metric_index: 2,
            preview_rows: 10,
        }
    }
}

/// Read the JSON config at `path`. A missing file means defaults; any other
/// read or parse failure is an error.
pub fn load_config(path: &Path) -> Result<AppConfig, DashboardError> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!(path = %path.display(), "no config file, using defaults");
            return Ok(AppConfig::default());
        }
        Err(e) => {
            return Err(DashboardError::Config(format!(
                "cannot read {}: {}",
                path.display(),
                e
            )))
        }
    };
    serde_json::from_str(&content)
        .map_err(|e| DashboardError::Config(format!("invalid {}: {}", path.display(), e)))
}
