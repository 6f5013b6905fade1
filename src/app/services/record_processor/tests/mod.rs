//! Comprehensive tests for record processor module
//!
//! This module provides unit and integration tests for all record processing components.

pub mod address_extractor_tests;
pub mod house_number_tests;

// Test helper functions and fixtures
use crate::app::models::{AddressField, AdminField, Centroid, Document, RawRecord};
use crate::app::services::record_processor::{AddressExtractor, AtomicSequence, RecordProcessor};
use crate::config::{Config, ExtractionConfig};
use serde_json::Value;
use std::sync::Arc;

/// First value handed out by test id sequences
pub const TEST_SEQUENCE_START: u64 = 100;

/// Build a raw record from a JSON literal
pub fn raw(value: Value) -> RawRecord {
    serde_json::from_value(value).expect("test record should deserialize")
}

/// Build a document that skips model validation
///
/// Stands in for a document from an upstream stage that was not built through
/// the validating setters.
pub fn unchecked_document(value: Value) -> Document {
    Document::from_json_unchecked(value)
}

/// Create a venue document with an upstream id
pub fn create_test_document(id: &str) -> Document {
    let mut document = Document::new("openstreetmap", "venue", id).unwrap();
    document.set_source_id(id).unwrap();
    document
}

/// Create a named venue document
pub fn create_named_poi(id: &str, name: &str) -> Document {
    let mut document = create_test_document(id);
    document.set_name("default", name).unwrap();
    document
}

/// Add a house number and street to a document
pub fn with_address(mut document: Document, number: &str, street: &str) -> Document {
    document.set_address(AddressField::Number, number).unwrap();
    document.set_address(AddressField::Street, street).unwrap();
    document
}

/// Create a fully populated named POI with address, admin, centroid and meta
pub fn create_full_poi(id: &str) -> Document {
    let mut document = with_address(create_named_poi(id, "Corner Cafe"), "12", "Main St");
    document.set_address(AddressField::Zip, "N1 9GU").unwrap();
    document.set_address(AddressField::Name, "Corner House").unwrap();
    document.set_admin(AdminField::Alpha3, "GBR").unwrap();
    document.set_admin(AdminField::Admin0, "United Kingdom").unwrap();
    document.set_admin(AdminField::Admin1, "England").unwrap();
    document.set_admin(AdminField::Locality, "London").unwrap();
    document.set_admin(AdminField::Neighborhood, "Islington").unwrap();
    document.set_centroid(Centroid::new(51.5362, -0.1033)).unwrap();
    document
        .set_meta("tags", serde_json::json!(["amenity=cafe"]))
        .unwrap();
    document
}

/// Create an extractor with a deterministic id sequence
pub fn create_test_extractor() -> (AddressExtractor, Arc<AtomicSequence>) {
    let sequence = Arc::new(AtomicSequence::starting_at(TEST_SEQUENCE_START));
    let extractor = AddressExtractor::new(ExtractionConfig::default(), sequence.clone());
    (extractor, sequence)
}

/// Create a processor with default configuration and a deterministic sequence
pub fn create_test_processor() -> RecordProcessor {
    create_processor_with_config(Config::default())
}

pub fn create_processor_with_config(config: Config) -> RecordProcessor {
    RecordProcessor::new(
        config,
        Arc::new(AtomicSequence::starting_at(TEST_SEQUENCE_START)),
    )
}
