//! # Configuration Module
//!
//! Settings for the command-line shell: where to find the food catalog, the
//! user's portion overrides and custom ranker weights, plus output limits.
//! Values come from `NUTRIPARSE_*` environment variables (a `.env` file is
//! loaded first by the binary); anything unset keeps its default.

use crate::candidate_ranker::RankerWeights;
use crate::errors::ConfigError;
use crate::food_model::{CandidateFood, UserPortionOverride};
use log::debug;
use serde::de::DeserializeOwned;
use std::env;
use std::path::{Path, PathBuf};

// Environment variable names
pub const CATALOG_PATH_VAR: &str = "NUTRIPARSE_CATALOG_PATH";
pub const OVERRIDES_PATH_VAR: &str = "NUTRIPARSE_OVERRIDES_PATH";
pub const WEIGHTS_PATH_VAR: &str = "NUTRIPARSE_WEIGHTS_PATH";
pub const LOW_CONFIDENCE_VAR: &str = "NUTRIPARSE_LOW_CONFIDENCE";
pub const MAX_CANDIDATES_VAR: &str = "NUTRIPARSE_MAX_CANDIDATES";

// Defaults
pub const DEFAULT_LOW_CONFIDENCE: f64 = 0.5;
pub const DEFAULT_MAX_CANDIDATES: usize = 3;

/// Configuration for the command-line shell
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// JSON array of `CandidateFood`
    pub catalog_path: Option<PathBuf>,
    /// JSON array of `UserPortionOverride`
    pub overrides_path: Option<PathBuf>,
    /// `RankerWeights` JSON; missing fields keep their defaults
    pub weights_path: Option<PathBuf>,
    /// Results below this confidence are logged at info level
    pub low_confidence_threshold: f64,
    /// Ranked candidates printed per line
    pub max_candidates: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            overrides_path: None,
            weights_path: None,
            low_confidence_threshold: DEFAULT_LOW_CONFIDENCE,
            max_candidates: DEFAULT_MAX_CANDIDATES,
        }
    }
}

impl AppConfig {
    /// Read settings from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through `lookup`, which maps a variable name to its value
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        };

        let mut config = Self {
            catalog_path: path(CATALOG_PATH_VAR),
            overrides_path: path(OVERRIDES_PATH_VAR),
            weights_path: path(WEIGHTS_PATH_VAR),
            ..Self::default()
        };

        if let Some(raw) = lookup(LOW_CONFIDENCE_VAR) {
            config.low_confidence_threshold = raw.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!("{} is not a number: '{}'", LOW_CONFIDENCE_VAR, raw))
            })?;
        }
        if let Some(raw) = lookup(MAX_CANDIDATES_VAR) {
            config.max_candidates = raw.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!("{} is not a count: '{}'", MAX_CANDIDATES_VAR, raw))
            })?;
        }

        config.validate()?;
        debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.low_confidence_threshold) {
            return Err(ConfigError::Invalid(format!(
                "low confidence threshold must be within [0, 1], got {}",
                self.low_confidence_threshold
            )));
        }
        if self.max_candidates == 0 {
            return Err(ConfigError::Invalid(
                "max candidates must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// The configured catalog, or an empty one
    pub fn load_catalog(&self) -> Result<Vec<CandidateFood>, ConfigError> {
        match &self.catalog_path {
            Some(path) => load_catalog(path),
            None => Ok(Vec::new()),
        }
    }

    /// The configured user overrides, or none
    pub fn load_overrides(&self) -> Result<Vec<UserPortionOverride>, ConfigError> {
        match &self.overrides_path {
            Some(path) => load_overrides(path),
            None => Ok(Vec::new()),
        }
    }

    /// The configured ranker weights, or the defaults
    pub fn load_weights(&self) -> Result<RankerWeights, ConfigError> {
        match &self.weights_path {
            Some(path) => load_weights(path),
            None => Ok(RankerWeights::default()),
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

pub fn load_catalog(path: &Path) -> Result<Vec<CandidateFood>, ConfigError> {
    let catalog: Vec<CandidateFood> = read_json(path)?;
    debug!("Loaded {} foods from {}", catalog.len(), path.display());
    Ok(catalog)
}

pub fn load_overrides(path: &Path) -> Result<Vec<UserPortionOverride>, ConfigError> {
    let overrides: Vec<UserPortionOverride> = read_json(path)?;
    debug!("Loaded {} portion overrides from {}", overrides.len(), path.display());
    Ok(overrides)
}

pub fn load_weights(path: &Path) -> Result<RankerWeights, ConfigError> {
    let weights: RankerWeights = read_json(path)?;
    weights.validate().map_err(ConfigError::Invalid)?;
    Ok(weights)
}
