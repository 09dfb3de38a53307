//! Trace attribution settings and their YAML persistence.

use crate::error::ConfigError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Settings shared by the stack rewriter and the fatal error reporter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TraceConfig {
    /// Literal prefix of synthetic markers (`<prefix>_<id>:<line>:<column>`)
    #[serde(default = "crate::defaults::marker_prefix")]
    pub marker_prefix: String,

    /// File name used when the bundle frame of a captured error cannot be parsed
    #[serde(default = "crate::defaults::unknown_file")]
    pub unknown_file: String,

    /// Type tag placed on reconstructed errors
    #[serde(default = "crate::defaults::error_name")]
    pub error_name: String,

    /// Engine tag placed on reconstructed errors
    #[serde(default = "crate::defaults::js_engine")]
    pub js_engine: String,

    /// Log a warning for every marker whose fragment id is not registered (default: true)
    #[serde(default = "crate::defaults::bool_true")]
    pub warn_unresolved: bool,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            marker_prefix: crate::defaults::marker_prefix(),
            unknown_file: crate::defaults::unknown_file(),
            error_name: crate::defaults::error_name(),
            js_engine: crate::defaults::js_engine(),
            warn_unresolved: crate::defaults::bool_true(),
        }
    }
}

impl TraceConfig {
    /// Parse and validate a YAML document. Missing keys take their defaults.
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: TraceConfig = serde_yaml_ng::from_str(contents).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file, or defaults when the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            log::info!("Trace config {:?} not found, using defaults", path);
            return Ok(Self::default());
        }

        log::info!("Loading trace config from {:?}", path);
        let contents = fs::read_to_string(path)
            .map_err(ConfigError::from)
            .with_context(|| format!("Failed to read trace config {:?}", path))?;
        let config = Self::from_yaml_str(&contents)
            .with_context(|| format!("Invalid trace config {:?}", path))?;
        Ok(config)
    }

    /// Render this configuration as YAML.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml_ng::to_string(self).map_err(ConfigError::Serialize)
    }

    /// Check field values that serde cannot express.
    ///
    /// The marker prefix must stay a single `:`/`_`-free token so that
    /// splitting a marker on those delimiters yields exactly
    /// `[prefix, id, line, column]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.marker_prefix.is_empty() {
            return Err(ConfigError::Validation(
                "marker_prefix must not be empty".to_string(),
            ));
        }
        if let Some(c) = self
            .marker_prefix
            .chars()
            .find(|c| *c == ':' || *c == '_' || c.is_whitespace())
        {
            return Err(ConfigError::Validation(format!(
                "marker_prefix '{}' contains forbidden character {:?}",
                self.marker_prefix, c
            )));
        }

        for (field, value) in [
            ("unknown_file", &self.unknown_file),
            ("error_name", &self.error_name),
            ("js_engine", &self.js_engine),
        ] {
            if value.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "{field} must not be empty"
                )));
            }
        }

        Ok(())
    }
}
