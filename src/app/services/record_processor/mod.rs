//! Record processing module for OSM-derived records
//!
//! This module provides the complete per-record pipeline that turns raw records
//! into canonical documents and splits address documents off them.
//!
//! # Architecture
//!
//! The module is organized into logical components:
//! - [`processor`] - Main RecordProcessor struct and pipeline orchestration
//! - [`stream`] - Lazy iterator adapter over raw records
//! - [`document_constructor`] - Raw record to document construction
//! - [`address_tagging`] - Application of upstream name/address tags
//! - [`address_extractor`] - Decision table and address document construction
//! - [`house_numbers`] - Multi-unit house number splitting
//! - [`identity`] - Derived identifiers and the synthetic id sequence
//! - [`field_copy`] - Fault-tolerant field copying
//! - [`stats`] - Processing statistics and result structures
//!
//! # Processing Pipeline
//!
//! 1. **Document Construction**: Build a validated document or drop the record
//! 2. **Address Tagging**: Apply name, address and admin fields
//! 3. **Address Extraction**: Emit address documents, the original, both, or nothing
//!
//! # Failure Isolation
//!
//! No record-level failure ends a run. A record the model rejects produces no
//! output, a rejected field is left out of its document, and an address
//! component that cannot be built is skipped without affecting its siblings.
//!
//! # Example Usage
//!
//! ```rust
//! use osm_processor::app::services::record_processor::RecordProcessor;
//! use osm_processor::{Config, RawRecord};
//!
//! let processor = RecordProcessor::with_process_sequence(Config::default());
//! let records: Vec<RawRecord> = vec![
//!     serde_json::from_str(r#"{"id": 7, "address": {"number": "12;14", "street": "Main St"}}"#).unwrap(),
//!     serde_json::from_str("{}").unwrap(),
//! ];
//!
//! let mut stream = processor.stream(records);
//! let names: Vec<String> = stream
//!     .by_ref()
//!     .filter_map(|doc| doc.name("default").map(str::to_string))
//!     .collect();
//!
//! assert_eq!(names, vec!["12 Main St", "14 Main St"]);
//! assert_eq!(stream.stats().records_dropped, 1);
//! ```

pub mod address_extractor;
pub mod address_tagging;
pub mod document_constructor;
pub mod field_copy;
pub mod house_numbers;
pub mod identity;
pub mod processor;
pub mod stats;
pub mod stream;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use address_extractor::{AddressExtractor, ExtractionDecision};
pub use address_tagging::{AddressTagger, NoopTagger, RawFieldTagger};
pub use document_constructor::DocumentConstructor;
pub use field_copy::{FieldCopyFailure, FieldCopyReport};
pub use identity::{AtomicSequence, IdSequence};
pub use processor::RecordProcessor;
pub use stats::{ProcessingResult, ProcessingStats};
pub use stream::RecordStream;

// Re-export utility functions that might be useful externally
pub use address_extractor::{has_valid_address, is_named_poi};
pub use house_numbers::split_house_numbers;
