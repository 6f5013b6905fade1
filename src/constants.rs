//! Application constants for the OSM processor
//!
//! This module contains the provenance tags, layer names, field names and
//! default values used throughout the document pipeline.

// =============================================================================
// Provenance and Layers
// =============================================================================

/// Provenance tag stamped on every document built from OpenStreetMap records
pub const DEFAULT_SOURCE_NAME: &str = "openstreetmap";

/// Layer assigned to raw records that carry no `type`
pub const DEFAULT_LAYER: &str = "venue";

/// Document layer names produced by the address extractor
pub mod layers {
    /// Address split from a record without a display name
    pub const ADDRESS: &str = "address";

    /// Address split from a named point-of-interest
    pub const POI_ADDRESS: &str = "poi-address";
}

// =============================================================================
// House Numbers
// =============================================================================

/// Separator between house numbers of multi-unit addresses (e.g. "12;14")
pub const DEFAULT_HOUSE_NUMBER_DELIMITER: char = ';';

/// Separator used when joining the parts of a derived document identifier
pub const DERIVED_ID_SEPARATOR: char = '-';

/// Prefix of derived-id bases drawn from the id sequence
///
/// Keeps a drawn `100` apart from a parent whose upstream id is `100`. OSM ids
/// are numeric or `n`/`w`/`r` prefixed, so they never start with it.
pub const SYNTHETIC_ID_PREFIX: &str = "seq";

// =============================================================================
// Document Field Names
// =============================================================================

/// Name key that marks a record as a named point-of-interest
pub const DEFAULT_NAME_KEY: &str = "default";

/// Metadata keys carried on every document
pub mod meta_keys {
    pub const ID: &str = "id";
    pub const TYPE: &str = "type";
    pub const NODES: &str = "nodes";
    pub const TAGS: &str = "tags";
}

// =============================================================================
// Model Validation Limits
// =============================================================================

/// Pattern accepted for the provenance tag
pub const SOURCE_PATTERN: &str = r"^[a-z0-9_]+$";

/// Pattern accepted for the document layer
pub const LAYER_PATTERN: &str = r"^[a-z0-9_-]+$";

/// Pattern accepted for postal codes
pub const ZIP_PATTERN: &str = r"^[A-Za-z0-9][A-Za-z0-9 -]{0,15}$";

/// Pattern accepted for ISO 3166-1 alpha-3 country codes
pub const ALPHA3_PATTERN: &str = r"^[A-Z]{3}$";

/// Latitude bounds in WGS84 decimal degrees
pub const LATITUDE_RANGE: (f64, f64) = (-90.0, 90.0);

/// Longitude bounds in WGS84 decimal degrees
pub const LONGITUDE_RANGE: (f64, f64) = (-180.0, 180.0);

// =============================================================================
// Logging
// =============================================================================

/// Stage tags attached to structured error events
pub mod stages {
    pub const DOCUMENT_CONSTRUCTOR: &str = "document_constructor";
    pub const ADDRESS_TAGGING: &str = "address_tagging";
    pub const ADDRESS_EXTRACTOR: &str = "address_extractor";
    pub const INPUT: &str = "input";
}

/// Maximum number of error messages retained in processing statistics
pub const MAX_RETAINED_ERROR_MESSAGES: usize = 100;

/// Records between progress spinner updates in the CLI
pub const PROGRESS_UPDATE_INTERVAL: u64 = 1_000;
