//! Configuration management and validation.
//!
//! Provides configuration structures for document construction, address
//! tagging and address extraction. Every section has sensible defaults so a
//! configuration file only needs to name the values it changes.

use crate::constants::{
    DEFAULT_HOUSE_NUMBER_DELIMITER, DEFAULT_LAYER, DEFAULT_SOURCE_NAME, LAYER_PATTERN,
    SOURCE_PATTERN,
};
use crate::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Settings for building documents from raw records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Provenance tag stamped on every document
    pub source_name: String,

    /// Layer used when a raw record carries no `type`
    pub default_layer: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            source_name: DEFAULT_SOURCE_NAME.to_string(),
            default_layer: DEFAULT_LAYER.to_string(),
        }
    }
}

/// Settings for applying upstream name/address tags to documents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaggingConfig {
    /// Copy `name` and `address` from raw records onto documents
    pub enabled: bool,
}

impl Default for TaggingConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Settings for splitting address documents off their parents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Run the address extractor; when disabled documents pass through as-is
    pub enabled: bool,

    /// Separator between house numbers of multi-unit addresses
    pub house_number_delimiter: char,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            house_number_delimiter: DEFAULT_HOUSE_NUMBER_DELIMITER,
        }
    }
}

/// Complete pipeline configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub document: DocumentConfig,
    pub tagging: TaggingConfig,
    pub extraction: ExtractionConfig,
}

impl Config {
    /// Load configuration from a JSON file
    ///
    /// Missing sections and keys fall back to their defaults. The loaded
    /// configuration is validated before it is returned.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::io(
                format!("Failed to read configuration file {}", path.display()),
                e,
            )
        })?;

        let config: Config = serde_json::from_str(&contents).map_err(|e| {
            Error::json(
                format!("Failed to parse configuration file {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        debug!("Loaded configuration from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Validate values that the document model would otherwise reject per record
    pub fn validate(&self) -> Result<()> {
        let source_re = Regex::new(SOURCE_PATTERN)
            .map_err(|e| Error::configuration(format!("Invalid source pattern: {}", e)))?;
        if !source_re.is_match(&self.document.source_name) {
            return Err(Error::configuration(format!(
                "Source name '{}' must match {}",
                self.document.source_name, SOURCE_PATTERN
            )));
        }

        let layer_re = Regex::new(LAYER_PATTERN)
            .map_err(|e| Error::configuration(format!("Invalid layer pattern: {}", e)))?;
        if !layer_re.is_match(&self.document.default_layer) {
            return Err(Error::configuration(format!(
                "Default layer '{}' must match {}",
                self.document.default_layer, LAYER_PATTERN
            )));
        }

        let delimiter = self.extraction.house_number_delimiter;
        if delimiter.is_whitespace() || delimiter.is_alphanumeric() {
            return Err(Error::configuration(format!(
                "House number delimiter {:?} must be a punctuation character",
                delimiter
            )));
        }

        Ok(())
    }

    /// Create configuration with a custom provenance tag
    pub fn with_source_name(mut self, source_name: impl Into<String>) -> Self {
        self.document.source_name = source_name.into();
        self
    }

    /// Create configuration with a custom fallback layer
    pub fn with_default_layer(mut self, layer: impl Into<String>) -> Self {
        self.document.default_layer = layer.into();
        self
    }

    /// Create configuration with a custom house number delimiter
    pub fn with_house_number_delimiter(mut self, delimiter: char) -> Self {
        self.extraction.house_number_delimiter = delimiter;
        self
    }

    /// Disable address extraction
    pub fn without_address_extraction(mut self) -> Self {
        self.extraction.enabled = false;
        self
    }

    /// Disable copying of raw name/address tags
    pub fn without_tagging(mut self) -> Self {
        self.tagging.enabled = false;
        self
    }
}
