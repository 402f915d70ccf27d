//! Config Loader Module
//! Reads the graph config file (YAML, or JSON by extension) and validates each entry.

use super::schema::{GraphSpec, RawConfig, RawGraphSpec, ValidationError};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file '{0}' not found")]
    FileNotFound(PathBuf),
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("Failed to parse config file '{path}': {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Ordered graph entries, each either valid or carrying its validation error.
#[derive(Debug, Clone)]
pub struct Config {
    pub graphs: Vec<Result<GraphSpec, ValidationError>>,
}

impl Config {
    /// Load a config file. `.json` files are read as JSON, everything else as YAML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        let config = if is_json {
            Self::from_json(&text).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            Self::from_yaml(&text).map_err(|source| ConfigError::Yaml {
                path: path.to_path_buf(),
                source,
            })?
        };

        info!(
            "Loaded {} ({} graphs, {} invalid)",
            path.display(),
            config.graphs.len(),
            config.invalid_count()
        );
        Ok(config)
    }

    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        let raw = serde_yaml::from_str::<RawConfig<serde_yaml::Value>>(text)?;
        Ok(Self::from_raw(raw, |entry| {
            serde_yaml::from_value(entry).map_err(|e| e.to_string())
        }))
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let raw = serde_json::from_str::<RawConfig<serde_json::Value>>(text)?;
        Ok(Self::from_raw(raw, |entry| {
            serde_json::from_value(entry).map_err(|e| e.to_string())
        }))
    }

    /// Convert and validate every entry; a mistyped entry fails alone.
    fn from_raw<V>(
        raw: RawConfig<V>,
        convert: impl Fn(V) -> Result<RawGraphSpec, String>,
    ) -> Self {
        let graphs = raw
            .graphs
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                let result = convert(entry)
                    .map_err(ValidationError::InvalidEntry)
                    .and_then(RawGraphSpec::validate);
                if let Err(err) = &result {
                    debug!("Graph #{} failed validation: {}", index + 1, err);
                }
                result
            })
            .collect();
        Self { graphs }
    }

    /// Number of entries that failed validation.
    pub fn invalid_count(&self) -> usize {
        self.graphs.iter().filter(|g| g.is_err()).count()
    }
}
