//! Processing statistics and result structures for the document pipeline
//!
//! This module provides types for tracking how many records were turned into
//! documents, how many were dropped, and how many address documents were split
//! off, along with the retained error messages for debugging.

use crate::app::models::Document;
use crate::constants::MAX_RETAINED_ERROR_MESSAGES;
use serde::Serialize;

/// Statistics for record processing operations
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ProcessingStats {
    /// Number of raw records accepted by the pipeline
    pub records_read: usize,
    /// Number of input lines that could not be decoded as raw records
    pub malformed_lines: usize,
    /// Number of documents successfully built from raw records
    pub documents_constructed: usize,
    /// Number of raw records dropped because the model rejected them
    pub records_dropped: usize,
    /// Number of documents dropped for having neither a name nor an address
    pub unsearchable_dropped: usize,
    /// Number of named documents forwarded downstream
    pub poi_forwarded: usize,
    /// Number of address documents split off their parents
    pub address_documents: usize,
    /// Number of individual field copies rejected by the model
    pub field_copy_failures: usize,
    /// Number of address components that could not be built at all
    pub component_failures: usize,
    /// Total number of documents emitted downstream
    pub documents_emitted: usize,
    /// Number of errors encountered during processing
    pub errors: usize,
    /// Most recent error messages, capped to keep memory bounded
    pub error_messages: Vec<String>,
}

impl ProcessingStats {
    /// Create new empty processing statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an error to the statistics
    ///
    /// The counter always increments; only the first
    /// `MAX_RETAINED_ERROR_MESSAGES` messages are kept.
    pub fn add_error(&mut self, message: String) {
        self.errors += 1;
        if self.error_messages.len() < MAX_RETAINED_ERROR_MESSAGES {
            self.error_messages.push(message);
        }
    }

    /// Percentage of raw records that failed to become documents
    pub fn drop_rate(&self) -> f64 {
        if self.records_read == 0 {
            0.0
        } else {
            (self.records_dropped as f64 / self.records_read as f64) * 100.0
        }
    }

    /// Output documents per input record
    pub fn expansion_ratio(&self) -> f64 {
        if self.records_read == 0 {
            0.0
        } else {
            self.documents_emitted as f64 / self.records_read as f64
        }
    }

    /// Check if processing was mostly successful (<10% of records dropped)
    pub fn is_successful(&self) -> bool {
        self.drop_rate() < 10.0
    }

    /// Fold another set of statistics into this one
    pub fn merge(&mut self, other: &ProcessingStats) {
        self.records_read += other.records_read;
        self.malformed_lines += other.malformed_lines;
        self.documents_constructed += other.documents_constructed;
        self.records_dropped += other.records_dropped;
        self.unsearchable_dropped += other.unsearchable_dropped;
        self.poi_forwarded += other.poi_forwarded;
        self.address_documents += other.address_documents;
        self.field_copy_failures += other.field_copy_failures;
        self.component_failures += other.component_failures;
        self.documents_emitted += other.documents_emitted;
        self.errors += other.errors;

        let room = MAX_RETAINED_ERROR_MESSAGES.saturating_sub(self.error_messages.len());
        self.error_messages
            .extend(other.error_messages.iter().take(room).cloned());
    }

    /// Get summary of processing pipeline statistics
    pub fn summary(&self) -> String {
        format!(
            "Processing Summary: {} records -> {} documents | \
             Dropped: {} invalid, {} unsearchable ({:.1}% invalid) | \
             Addresses: {} | POIs: {} | Malformed lines: {} | Errors: {}",
            self.records_read,
            self.documents_emitted,
            self.records_dropped,
            self.unsearchable_dropped,
            self.drop_rate(),
            self.address_documents,
            self.poi_forwarded,
            self.malformed_lines,
            self.errors
        )
    }
}

/// Result of batch record processing
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    /// Documents in emission order
    pub documents: Vec<Document>,
    /// Processing statistics and error information
    pub stats: ProcessingStats,
}

impl ProcessingResult {
    /// Create a new processing result
    pub fn new(documents: Vec<Document>, stats: ProcessingStats) -> Self {
        Self { documents, stats }
    }

    /// Get the number of emitted documents
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Check if processing was successful based on statistics
    pub fn is_successful(&self) -> bool {
        self.stats.is_successful()
    }

    /// Get summary string for logging
    pub fn summary(&self) -> String {
        self.stats.summary()
    }
}
