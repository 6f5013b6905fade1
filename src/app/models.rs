//! Data models for OSM document processing
//!
//! This module contains the raw record shape read from the upstream extract and
//! the canonical document handed to the indexer. Documents validate every value
//! on the way in: constructors and setters return `Result` and never leave a
//! document with a malformed identity.

use crate::constants::{self, meta_keys};
use crate::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static SOURCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(constants::SOURCE_PATTERN).expect("source pattern compiles"));
static LAYER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(constants::LAYER_PATTERN).expect("layer pattern compiles"));
static ZIP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(constants::ZIP_PATTERN).expect("zip pattern compiles"));
static ALPHA3_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(constants::ALPHA3_PATTERN).expect("alpha3 pattern compiles"));

// =============================================================================
// Raw Record Structure
// =============================================================================

/// Loosely structured record as produced by the upstream OSM extract
///
/// Every field is optional; an empty JSON object is a valid raw record. Values
/// are kept as raw JSON so that a badly typed field only fails the part of the
/// pipeline that reads it instead of the whole line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Upstream identifier (OSM ids arrive as numbers, synthetic ids as strings)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    /// Record category, used as the document layer
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub record_type: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub lon: Option<Value>,

    /// Precomputed centroid (e.g. for ways), used when `lat`/`lon` are absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub centroid: Option<Value>,

    /// Ordered node references of a way
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nodes: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Value>,

    /// Names keyed by language or kind (`default`, `en`, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,

    /// Address and admin fields keyed by their document field name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Value>,
}

impl RawRecord {
    /// Upstream identifier rendered as a string
    ///
    /// Numbers are rendered in decimal. Any other JSON type is not an id.
    pub fn upstream_id(&self) -> Option<String> {
        match self.id.as_ref()? {
            Value::String(id) => Some(id.clone()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        }
    }

    /// Record type when present and not blank
    ///
    /// A `type` that is not a string is an error, not an absent type.
    pub fn layer(&self) -> Result<Option<&str>> {
        match &self.record_type {
            None => Ok(None),
            Some(Value::String(layer)) => Ok(Some(layer.trim()).filter(|layer| !layer.is_empty())),
            Some(other) => Err(Error::invalid_identity(
                "source_type",
                format!("expected a string, found {}", value_kind(other)),
            )),
        }
    }

    /// Resolve the centroid of this record
    ///
    /// Explicit `lat`/`lon` win over a precomputed `centroid`. Zero is a valid
    /// coordinate, not an absence marker. Coordinates that are not JSON numbers
    /// are rejected rather than parsed.
    pub fn resolve_centroid(&self) -> Result<Option<Centroid>> {
        if let (Some(lat), Some(lon)) = (&self.lat, &self.lon) {
            let lat = coordinate("lat", lat)?;
            let lon = coordinate("lon", lon)?;
            return Ok(Some(Centroid::new(lat, lon)));
        }

        match &self.centroid {
            None => Ok(None),
            Some(centroid) => serde_json::from_value(centroid.clone())
                .map(Some)
                .map_err(|e| Error::invalid_field("centroid", e.to_string())),
        }
    }

    /// Entries of the `name` object, see [`text_entries`]
    pub fn name_entries(&self) -> Result<Vec<(&str, Result<&str>)>> {
        text_entries("name", self.name.as_ref())
    }

    /// Entries of the `address` object, see [`text_entries`]
    pub fn address_entries(&self) -> Result<Vec<(&str, Result<&str>)>> {
        text_entries("address", self.address.as_ref())
    }
}

/// Flatten an object of text values into `(key, value)` pairs
///
/// Each value is checked on its own: a non-string value yields an error for
/// that key only. A field that is not an object is an error as a whole.
fn text_entries<'a>(
    field: &str,
    value: Option<&'a Value>,
) -> Result<Vec<(&'a str, Result<&'a str>)>> {
    let entries = match value {
        None => return Ok(Vec::new()),
        Some(Value::Object(entries)) => entries,
        Some(other) => {
            return Err(Error::invalid_field(
                field,
                format!("expected an object, found {}", value_kind(other)),
            ));
        }
    };

    Ok(entries
        .iter()
        .map(|(key, value)| {
            let text = value.as_str().ok_or_else(|| {
                Error::invalid_field(
                    format!("{}.{}", field, key),
                    format!("expected a string, found {}", value_kind(value)),
                )
            });
            (key.as_str(), text)
        })
        .collect())
}

fn coordinate(field: &str, value: &Value) -> Result<f64> {
    value.as_f64().ok_or_else(|| {
        Error::invalid_field(
            field,
            format!("expected a number, found {}", value_kind(value)),
        )
    })
}

/// JSON type name used in error messages
fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// =============================================================================
// Centroid
// =============================================================================

/// Point location in WGS84 decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Centroid {
    pub lat: f64,
    pub lon: f64,
}

impl Centroid {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Validate that both coordinates are finite and within WGS84 bounds
    pub fn validate(&self) -> Result<()> {
        let (min_lat, max_lat) = constants::LATITUDE_RANGE;
        let (min_lon, max_lon) = constants::LONGITUDE_RANGE;

        if !self.lat.is_finite()
            || !self.lon.is_finite()
            || !(min_lat..=max_lat).contains(&self.lat)
            || !(min_lon..=max_lon).contains(&self.lon)
        {
            return Err(Error::invalid_centroid(self.lat, self.lon));
        }

        Ok(())
    }
}

// =============================================================================
// Field Enumerations
// =============================================================================

/// Structured address fields of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressField {
    Name,
    Number,
    Street,
    Zip,
}

impl AddressField {
    pub const ALL: [AddressField; 4] = [
        AddressField::Name,
        AddressField::Number,
        AddressField::Street,
        AddressField::Zip,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AddressField::Name => "name",
            AddressField::Number => "number",
            AddressField::Street => "street",
            AddressField::Zip => "zip",
        }
    }
}

impl FromStr for AddressField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        AddressField::ALL
            .into_iter()
            .find(|field| field.as_str() == s.trim())
            .ok_or_else(|| Error::invalid_field(s, "unknown address field"))
    }
}

impl fmt::Display for AddressField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Administrative hierarchy fields, from country code down to neighborhood
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminField {
    Alpha3,
    Admin0,
    Admin1,
    Admin1Abbr,
    Admin2,
    LocalAdmin,
    Locality,
    Neighborhood,
}

impl AdminField {
    pub const ALL: [AdminField; 8] = [
        AdminField::Alpha3,
        AdminField::Admin0,
        AdminField::Admin1,
        AdminField::Admin1Abbr,
        AdminField::Admin2,
        AdminField::LocalAdmin,
        AdminField::Locality,
        AdminField::Neighborhood,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AdminField::Alpha3 => "alpha3",
            AdminField::Admin0 => "admin0",
            AdminField::Admin1 => "admin1",
            AdminField::Admin1Abbr => "admin1_abbr",
            AdminField::Admin2 => "admin2",
            AdminField::LocalAdmin => "local_admin",
            AdminField::Locality => "locality",
            AdminField::Neighborhood => "neighborhood",
        }
    }
}

impl FromStr for AdminField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        AdminField::ALL
            .into_iter()
            .find(|field| field.as_str() == s.trim())
            .ok_or_else(|| Error::invalid_field(s, "unknown admin field"))
    }
}

impl fmt::Display for AdminField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Canonical Document
// =============================================================================

/// Canonical geodata document shared by every pipeline stage
///
/// Fields are private so that every value passes through validation, including
/// on deserialization. The `meta` object always mirrors the document identity
/// under `id` and `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DocumentRepr")]
pub struct Document {
    source: String,
    source_type: String,
    id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    source_id: Option<String>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    name: BTreeMap<String, String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    centroid: Option<Centroid>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    address: BTreeMap<AddressField, String>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    admin: BTreeMap<AdminField, String>,

    meta: Map<String, Value>,
}

/// Serialized shape of a [`Document`] before validation
#[derive(Debug, Deserialize)]
struct DocumentRepr {
    source: String,
    source_type: String,
    id: String,

    #[serde(default)]
    source_id: Option<String>,

    #[serde(default)]
    name: BTreeMap<String, String>,

    #[serde(default)]
    centroid: Option<Centroid>,

    #[serde(default)]
    address: BTreeMap<AddressField, String>,

    #[serde(default)]
    admin: BTreeMap<AdminField, String>,

    #[serde(default)]
    meta: Map<String, Value>,
}

impl TryFrom<DocumentRepr> for Document {
    type Error = Error;

    /// Rebuild a document through its constructor and setters
    fn try_from(repr: DocumentRepr) -> Result<Self> {
        let mut document = Document::new(repr.source, repr.source_type, repr.id)?;

        if let Some(source_id) = &repr.source_id {
            document.set_source_id(source_id)?;
        }
        for (key, value) in &repr.name {
            document.set_name(key, value)?;
        }
        if let Some(centroid) = repr.centroid {
            document.set_centroid(centroid)?;
        }
        for (&field, value) in &repr.address {
            document.set_address(field, value)?;
        }
        for (&field, value) in &repr.admin {
            document.set_admin(field, value)?;
        }

        for (key, value) in repr.meta {
            if key == meta_keys::ID || key == meta_keys::TYPE {
                // Identity keys are regenerated and must agree with the identity
                if document.meta.get(&key) != Some(&value) {
                    return Err(Error::invalid_identity(
                        format!("meta.{}", key),
                        "does not match the document identity",
                    ));
                }
                continue;
            }
            document.set_meta(key, value)?;
        }

        Ok(document)
    }
}

#[cfg(test)]
impl Document {
    /// Build a document from its JSON shape without any validation
    ///
    /// Lets tests hand the extractor documents that a buggy upstream stage
    /// might produce.
    pub(crate) fn from_json_unchecked(value: Value) -> Self {
        let repr: DocumentRepr =
            serde_json::from_value(value).expect("test document should match the document shape");
        Self {
            source: repr.source,
            source_type: repr.source_type,
            id: repr.id,
            source_id: repr.source_id,
            name: repr.name,
            centroid: repr.centroid,
            address: repr.address,
            admin: repr.admin,
            meta: repr.meta,
        }
    }
}

impl Document {
    /// Create a new document with a validated identity
    ///
    /// # Arguments
    ///
    /// * `source` - Provenance tag (e.g. "openstreetmap")
    /// * `source_type` - Layer the document belongs to (e.g. "venue")
    /// * `id` - Identifier, unique within source and layer
    pub fn new(
        source: impl Into<String>,
        source_type: impl Into<String>,
        id: impl Into<String>,
    ) -> Result<Self> {
        let source = source.into();
        let source_type = source_type.into();
        let id = id.into();

        if !SOURCE_RE.is_match(&source) {
            return Err(Error::invalid_identity(
                "source",
                format!("'{}' does not match {}", source, constants::SOURCE_PATTERN),
            ));
        }

        if !LAYER_RE.is_match(&source_type) {
            return Err(Error::invalid_identity(
                "source_type",
                format!("'{}' does not match {}", source_type, constants::LAYER_PATTERN),
            ));
        }

        let id = clean_text(&id).map_err(|message| Error::invalid_identity("id", message))?;

        let mut meta = Map::new();
        meta.insert(meta_keys::ID.to_string(), Value::String(id.clone()));
        meta.insert(meta_keys::TYPE.to_string(), Value::String(source_type.clone()));

        Ok(Self {
            source,
            source_type,
            id,
            source_id: None,
            name: BTreeMap::new(),
            centroid: None,
            address: BTreeMap::new(),
            admin: BTreeMap::new(),
            meta,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn source_type(&self) -> &str {
        &self.source_type
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Original upstream identifier, if known
    pub fn source_id(&self) -> Option<&str> {
        self.source_id.as_deref()
    }

    pub fn set_source_id(&mut self, source_id: impl AsRef<str>) -> Result<()> {
        let source_id = clean_text(source_id.as_ref())
            .map_err(|message| Error::invalid_identity("source_id", message))?;
        self.source_id = Some(source_id);
        Ok(())
    }

    pub fn name(&self, key: &str) -> Option<&str> {
        self.name.get(key).map(String::as_str)
    }

    pub fn names(&self) -> &BTreeMap<String, String> {
        &self.name
    }

    pub fn set_name(&mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Result<()> {
        let key = key.as_ref().trim();
        if key.is_empty() {
            return Err(Error::invalid_field("name", "name key cannot be empty"));
        }

        let value = clean_text(value.as_ref())
            .map_err(|message| Error::invalid_field(format!("name.{}", key), message))?;
        self.name.insert(key.to_string(), value);
        Ok(())
    }

    pub fn centroid(&self) -> Option<Centroid> {
        self.centroid
    }

    pub fn set_centroid(&mut self, centroid: Centroid) -> Result<()> {
        centroid.validate()?;
        self.centroid = Some(centroid);
        Ok(())
    }

    pub fn address(&self, field: AddressField) -> Option<&str> {
        self.address.get(&field).map(String::as_str)
    }

    pub fn set_address(&mut self, field: AddressField, value: impl AsRef<str>) -> Result<()> {
        let field_name = format!("address.{}", field);
        let value = clean_text(value.as_ref())
            .map_err(|message| Error::invalid_field(&field_name, message))?;

        if field == AddressField::Zip && !ZIP_RE.is_match(&value) {
            return Err(Error::invalid_field(
                field_name,
                format!("'{}' is not a valid postal code", value),
            ));
        }

        self.address.insert(field, value);
        Ok(())
    }

    pub fn admin(&self, field: AdminField) -> Option<&str> {
        self.admin.get(&field).map(String::as_str)
    }

    pub fn set_admin(&mut self, field: AdminField, value: impl AsRef<str>) -> Result<()> {
        let field_name = format!("admin.{}", field);
        let value = clean_text(value.as_ref())
            .map_err(|message| Error::invalid_field(&field_name, message))?;

        if field == AdminField::Alpha3 && !ALPHA3_RE.is_match(&value) {
            return Err(Error::invalid_field(
                field_name,
                format!("'{}' is not an ISO 3166-1 alpha-3 code", value),
            ));
        }

        self.admin.insert(field, value);
        Ok(())
    }

    pub fn meta(&self, key: &str) -> Option<&Value> {
        self.meta.get(key)
    }

    pub fn meta_map(&self) -> &Map<String, Value> {
        &self.meta
    }

    /// Attach auxiliary metadata
    ///
    /// `id` and `type` are reserved: they always mirror the document identity.
    pub fn set_meta(&mut self, key: impl Into<String>, value: Value) -> Result<()> {
        let key = key.into();
        if key == meta_keys::ID || key == meta_keys::TYPE {
            return Err(Error::invalid_field(
                format!("meta.{}", key),
                "reserved for the document identity",
            ));
        }

        self.meta.insert(key, value);
        Ok(())
    }

    /// Replace metadata with a copy of `parent`'s, keeping this document's identity
    pub fn inherit_meta(&mut self, parent: &Document) {
        self.meta = parent.meta.clone();
        self.meta
            .insert(meta_keys::ID.to_string(), Value::String(self.id.clone()));
        self.meta.insert(
            meta_keys::TYPE.to_string(),
            Value::String(self.source_type.clone()),
        );
    }
}

/// Trim a text value and reject empty or control-character content
fn clean_text(value: &str) -> std::result::Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("value cannot be empty".to_string());
    }
    if trimmed.chars().any(char::is_control) {
        return Err(format!("'{}' contains control characters", trimmed.escape_debug()));
    }
    Ok(trimmed.to_string())
}
