//! OSM Processor Library
//!
//! A Rust library for turning raw OpenStreetMap-derived records into canonical
//! geodata documents ready for search indexing.
//!
//! This library provides tools for:
//! - Building validated documents from loosely structured raw records
//! - Resolving centroids and carrying auxiliary node/tag metadata through
//! - Applying name, address and admin fields produced by an upstream tagger
//! - Splitting documents with house numbers into standalone address documents
//! - Deriving stable, collision-free identifiers for those address documents
//! - Isolating per-record and per-field failures so a stream never aborts

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod record_processor;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{AddressField, AdminField, Centroid, Document, RawRecord};
pub use config::Config;

/// Result type alias for the OSM processor
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for document construction and pipeline operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Document identity (source, layer or id) rejected by the model
    #[error("Invalid document identity ({field}): {message}")]
    InvalidIdentity { field: String, message: String },

    /// A document field value rejected by the model
    #[error("Invalid value for field '{field}': {message}")]
    InvalidField { field: String, message: String },

    /// Coordinates outside the WGS84 range or not finite
    #[error("Invalid centroid: lat = {lat}, lon = {lon}")]
    InvalidCentroid { lat: f64, lon: f64 },

    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON encoding or decoding failed
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Processing interrupted
    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

impl Error {
    /// Create an invalid identity error
    pub fn invalid_identity(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidIdentity {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an invalid field error
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an invalid centroid error
    pub fn invalid_centroid(lat: f64, lon: f64) -> Self {
        Self::InvalidCentroid { lat, lon }
    }

    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a JSON error with context
    pub fn json(message: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a processing interrupted error
    pub fn processing_interrupted(reason: impl Into<String>) -> Self {
        Self::ProcessingInterrupted {
            reason: reason.into(),
        }
    }

    /// Whether this error comes from model validation and only affects one record
    pub fn is_record_level(&self) -> bool {
        matches!(
            self,
            Self::InvalidIdentity { .. } | Self::InvalidField { .. } | Self::InvalidCentroid { .. }
        )
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Json {
            message: "JSON processing failed".to_string(),
            source: error,
        }
    }
}
