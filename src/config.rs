// ⚙️ Configuration - folders, database, and classification tables
// Loaded from JSON; every field has a default so a partial file is fine.

use anyhow::{Context as AnyhowContext, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Cost report gating + profit-centre lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostReportConfig {
    /// Text that must appear on the title line
    pub title: String,

    /// Profit centres recognised on the profit-centre header line
    pub profit_centers: Vec<String>,
}

impl Default for CostReportConfig {
    fn default() -> Self {
        CostReportConfig {
            title: "Plant Cost Report".to_string(),
            profit_centers: [
                "8101-S20",
                "8101-S22",
                "8101-S36",
                "8101-S30",
                "8101-S31",
                "8101-S33",
                "1515-PCR_N",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Accepted files that request routing end up here
    pub processed_dir: PathBuf,

    /// Rejected files end up here
    pub rejected_dir: PathBuf,

    /// SQLite database used by `import`
    pub database: PathBuf,

    /// Plant code stamped onto routing exports
    pub routing_plant: String,

    pub cost_report: CostReportConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            processed_dir: PathBuf::from("Done"),
            rejected_dir: PathBuf::from("Garbage"),
            database: PathBuf::from("vp_ingest.db"),
            routing_plant: "8101".to_string(),
            cost_report: CostReportConfig::default(),
        }
    }
}

impl Config {
    /// Load from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    /// Load from `path` if given, defaults otherwise
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Config::from_file(p),
            None => Ok(Config::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.routing_plant, "8101");
        assert_eq!(config.cost_report.title, "Plant Cost Report");
        assert_eq!(config.cost_report.profit_centers.len(), 7);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut tmp = NamedTempFile::new().unwrap();
        write!(
            tmp,
            r#"{{"rejected_dir": "/data/rejected", "cost_report": {{"profit_centers": ["9000-A1"]}}}}"#
        )
        .unwrap();

        let config = Config::from_file(tmp.path()).unwrap();

        assert_eq!(config.rejected_dir, PathBuf::from("/data/rejected"));
        assert_eq!(config.processed_dir, PathBuf::from("Done"));
        assert_eq!(config.cost_report.profit_centers, vec!["9000-A1"]);
        assert_eq!(config.cost_report.title, "Plant Cost Report");
    }

    #[test]
    fn test_invalid_json_is_error() {
        let mut tmp = NamedTempFile::new().unwrap();
        write!(tmp, "not json").unwrap();
        assert!(Config::from_file(tmp.path()).is_err());
    }

    #[test]
    fn test_load_without_path() {
        assert_eq!(Config::load(None).unwrap(), Config::default());
    }
}
