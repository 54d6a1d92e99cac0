//! Run configuration
//!
//! Settings are layered, lowest precedence first: built-in defaults, an
//! optional TOML file, `GEOTALLY_*` environment variables, then explicit
//! command-line flags. The merged result is validated once, before any file
//! is opened for scanning.

use crate::error::{common, ErrorCode, GeoTallyError, Result};
use crate::ingest::parser::DEFAULT_UNDEFINED_LANGUAGE;
use crate::mapreduce::planning::default_worker_count;
use crate::report::OutputFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_LANGUAGE_PATH: &str = "data/language.json";
pub const DEFAULT_TOP_N: usize = 10;

/// Fully resolved settings for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub events: PathBuf,
    pub grid: PathBuf,
    pub languages: PathBuf,
    pub workers: usize,
    pub top_n: usize,
    pub output_dir: Option<PathBuf>,
    pub format: OutputFormat,
    pub undefined_language: String,
}

impl RunConfig {
    /// Fill unset values with defaults and validate
    pub fn resolve(layer: ConfigLayer) -> Result<Self> {
        let events = layer
            .events
            .ok_or_else(|| missing_value("events file path"))?;
        let grid = layer.grid.ok_or_else(|| missing_value("grid file path"))?;

        let config = Self {
            events,
            grid,
            languages: layer
                .languages
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LANGUAGE_PATH)),
            workers: layer.workers.unwrap_or_else(default_worker_count),
            top_n: layer.top_n.unwrap_or(DEFAULT_TOP_N),
            output_dir: layer.output_dir,
            format: layer.format.unwrap_or_default(),
            undefined_language: layer
                .undefined_language
                .unwrap_or_else(|| DEFAULT_UNDEFINED_LANGUAGE.to_string()),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(GeoTallyError::config_with_code(
                ErrorCode::CONFIG_NO_WORKERS,
                "worker count must be at least 1",
            ));
        }
        if self.top_n == 0 {
            return Err(GeoTallyError::config_with_code(
                ErrorCode::CONFIG_INVALID_VALUE,
                "top_n must be at least 1",
            ));
        }
        Ok(())
    }
}

fn missing_value(what: &str) -> GeoTallyError {
    GeoTallyError::config_with_code(
        ErrorCode::CONFIG_INVALID_VALUE,
        format!("no {} given", what),
    )
}

/// One source of settings; unset fields defer to lower layers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigLayer {
    pub events: Option<PathBuf>,
    pub grid: Option<PathBuf>,
    pub languages: Option<PathBuf>,
    pub workers: Option<usize>,
    pub top_n: Option<usize>,
    pub output_dir: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub undefined_language: Option<String>,
}

impl ConfigLayer {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            GeoTallyError::config_with_code(ErrorCode::CONFIG_INVALID_TOML, "invalid config file")
                .with_source(e)
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(common::input_not_found(path));
        }
        let content = std::fs::read_to_string(path).map_err(|e| common::read_failed(path, e))?;
        Self::from_toml_str(&content).map_err(|e| e.with_path(path))
    }

    /// Read `GEOTALLY_*` variables from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Read `GEOTALLY_*` variables through `lookup`
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut layer = Self::default();

        if let Some(value) = lookup("GEOTALLY_WORKERS") {
            layer.workers = Some(parse_number("GEOTALLY_WORKERS", &value)?);
        }
        if let Some(value) = lookup("GEOTALLY_TOP_N") {
            layer.top_n = Some(parse_number("GEOTALLY_TOP_N", &value)?);
        }
        if let Some(value) = lookup("GEOTALLY_OUTPUT_DIR") {
            layer.output_dir = Some(PathBuf::from(value));
        }
        if let Some(value) = lookup("GEOTALLY_UNDEFINED_LANGUAGE") {
            layer.undefined_language = Some(value);
        }

        Ok(layer)
    }

    /// Values set in `higher` win over values in `self`
    pub fn overlay(self, higher: ConfigLayer) -> Self {
        Self {
            events: higher.events.or(self.events),
            grid: higher.grid.or(self.grid),
            languages: higher.languages.or(self.languages),
            workers: higher.workers.or(self.workers),
            top_n: higher.top_n.or(self.top_n),
            output_dir: higher.output_dir.or(self.output_dir),
            format: higher.format.or(self.format),
            undefined_language: higher.undefined_language.or(self.undefined_language),
        }
    }
}

fn parse_number(key: &str, value: &str) -> Result<usize> {
    value.trim().parse().map_err(|e| {
        GeoTallyError::config_with_code(
            ErrorCode::CONFIG_INVALID_VALUE,
            format!("{}={} is not a non-negative integer", key, value),
        )
        .with_source(e)
    })
}

/// Merge the config file, environment and command-line layers
pub fn load_config(config_file: Option<&Path>, cli: ConfigLayer) -> Result<RunConfig> {
    let file_layer = match config_file {
        Some(path) => {
            debug!("Loading configuration from {}", path.display());
            ConfigLayer::load(path)?
        }
        None => ConfigLayer::default(),
    };

    let merged = file_layer.overlay(ConfigLayer::from_env()?).overlay(cli);
    RunConfig::resolve(merged)
}
