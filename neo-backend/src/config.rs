use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

use crate::filters::FilterCriteria;

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "NEODB_CONFIG";

const DEFAULT_CONFIG_PATH: &str = "config.toml";

pub static CONFIG: OnceLock<NeoConfig> = OnceLock::new();

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeoConfig {
    #[serde(default = "default_neo_csv_path")]
    pub neo_csv_path: String,

    #[serde(default = "default_cad_json_path")]
    pub cad_json_path: String,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Query to run once the database is loaded
    #[serde(default)]
    pub query: Option<QueryConfig>,
}

/// A saved query: filter criteria plus an optional result limit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryConfig {
    #[serde(flatten)]
    pub criteria: FilterCriteria,

    #[serde(default)]
    pub limit: Option<usize>,
}

fn default_neo_csv_path() -> String {
    "data/neos.csv".to_string()
}

fn default_cad_json_path() -> String {
    "data/cad.json".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for NeoConfig {
    fn default() -> Self {
        Self {
            neo_csv_path: default_neo_csv_path(),
            cad_json_path: default_cad_json_path(),
            log_dir: default_log_dir(),
            log_level: default_log_level(),
            query: None,
        }
    }
}

impl NeoConfig {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load from `path`, or use defaults when the file does not exist
    pub fn load_or_default(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }
}

/// Read the config named by `NEODB_CONFIG` (default `config.toml`) into [`CONFIG`].
pub fn read_config() -> anyhow::Result<&'static NeoConfig> {
    let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = NeoConfig::load_or_default(&path)?;
    Ok(CONFIG.get_or_init(|| config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = NeoConfig::from_toml("").unwrap();
        assert_eq!(config.neo_csv_path, "data/neos.csv");
        assert_eq!(config.cad_json_path, "data/cad.json");
        assert_eq!(config.log_dir, "logs");
        assert_eq!(config.log_level, "info");
        assert!(config.query.is_none());
    }

    #[test]
    fn test_query_section() {
        let config = NeoConfig::from_toml(
            r#"
            neo_csv_path = "neos.csv"
            log_level = "debug"

            [query]
            date = "1969-07-29"
            distance_max = 0.5
            hazardous = false
            limit = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.neo_csv_path, "neos.csv");
        assert_eq!(config.log_level, "debug");

        let query = config.query.unwrap();
        assert_eq!(query.limit, Some(10));
        assert_eq!(query.criteria.date.as_deref(), Some("1969-07-29"));
        assert_eq!(query.criteria.distance_max.as_deref(), Some("0.5"));
        assert_eq!(query.criteria.hazardous, Some(false));
        assert_eq!(query.criteria.velocity_min, None);
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "cad_json_path = \"/tmp/cad.json\"").unwrap();

        let config = NeoConfig::from_file(file.path()).unwrap();
        assert_eq!(config.cad_json_path, "/tmp/cad.json");
        assert_eq!(config.neo_csv_path, "data/neos.csv");
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "log_level = [").unwrap();
        assert!(NeoConfig::from_file(file.path()).is_err());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = NeoConfig::load_or_default("/nonexistent/neodb.toml").unwrap();
        assert_eq!(config.log_level, "info");
    }
}
