use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::data::export::DEFAULT_EXPORT_FILE;

/// Config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "dashboard.toml";
/// Environment variable pointing at an alternative config file.
pub const CONFIG_ENV_VAR: &str = "HAPPINESS_DASHBOARD_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Dashboard settings. Every field is optional in the TOML file.
///
/// ```toml
/// data_source = "countries_csv"
/// world_boundaries = "ne_110m_admin_0_countries.geojson"
/// export_file_name = "global_happiness_data.csv"
/// top_regions = 10
/// top_subregions = 15
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Pre-joined table: a DuckDB file, a CSV folder or a single file.
    pub data_source: PathBuf,
    /// GeoJSON with country outlines for the map tab.
    pub world_boundaries: PathBuf,
    pub export_file_name: String,
    pub top_regions: usize,
    pub top_subregions: usize,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for Config {
    fn default() -> Self {
        let data_source = if cfg!(feature = "duckdb") {
            "countries.ddb"
        } else {
            "countries_csv"
        };
        Self {
            data_source: PathBuf::from(data_source),
            world_boundaries: PathBuf::from("ne_110m_admin_0_countries.geojson"),
            export_file_name: DEFAULT_EXPORT_FILE.to_string(),
            top_regions: 10,
            top_subregions: 15,
            window_width: 1400.0,
            window_height: 900.0,
        }
    }
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        Self::from_toml_str(&text)
    }
}

/// Resolve the configuration: an explicit file named by
/// [`CONFIG_ENV_VAR`] must exist; the default file is optional.
pub fn load() -> Result<Config, ConfigError> {
    match std::env::var_os(CONFIG_ENV_VAR) {
        Some(path) => {
            let path = PathBuf::from(path);
            log::info!("Reading config from {}", path.display());
            Config::from_path(&path)
        }
        None => match Config::from_path(Path::new(DEFAULT_CONFIG_FILE)) {
            Err(ConfigError::NotFound(_)) => {
                log::debug!("No {DEFAULT_CONFIG_FILE}; using defaults");
                Ok(Config::default())
            }
            other => other,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = Config::from_toml_str("data_source = \"data/joined.parquet\"\ntop_regions = 5\n")
            .unwrap();
        assert_eq!(config.data_source, PathBuf::from("data/joined.parquet"));
        assert_eq!(config.top_regions, 5);
        assert_eq!(config.top_subregions, 15);
        assert_eq!(config.export_file_name, "global_happiness_data.csv");
    }

    #[test]
    fn empty_file_is_default() {
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = Config::from_toml_str("colour = \"blue\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::from_path(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }
}
