//! Main record processor implementation and pipeline orchestration
//!
//! This module contains the RecordProcessor struct, which chains document
//! construction, address tagging and address extraction for one raw record at
//! a time.

use crate::app::models::{Document, RawRecord};
use crate::config::Config;
use crate::constants::stages;
use std::sync::Arc;
use tracing::{debug, info};

use super::{
    address_extractor::AddressExtractor,
    address_tagging::{AddressTagger, NoopTagger, RawFieldTagger},
    document_constructor::DocumentConstructor,
    identity::{AtomicSequence, IdSequence},
    stats::{ProcessingResult, ProcessingStats},
    stream::RecordStream,
};

/// Record processor for raw OSM records
///
/// Each raw record is fully processed, producing zero or more documents,
/// before the next one is looked at. The only state shared between records is
/// the synthetic id sequence.
///
/// # Example
///
/// ```rust
/// use osm_processor::app::services::record_processor::RecordProcessor;
/// use osm_processor::{Config, RawRecord};
///
/// let processor = RecordProcessor::with_process_sequence(Config::default());
/// let record: RawRecord = serde_json::from_str(
///     r#"{"id": 1, "name": {"default": "Cafe"}, "address": {"number": "12", "street": "Main St"}}"#,
/// ).unwrap();
///
/// let result = processor.process_records(vec![record]);
/// assert_eq!(result.document_count(), 2);
/// ```
#[derive(Debug)]
pub struct RecordProcessor {
    config: Config,
    constructor: DocumentConstructor,
    tagger: Box<dyn AddressTagger>,
    extractor: AddressExtractor,
}

impl RecordProcessor {
    /// Create a new record processor
    ///
    /// # Arguments
    ///
    /// * `config` - Pipeline configuration
    /// * `sequence` - Source of synthetic ids for parents without an upstream id
    pub fn new(config: Config, sequence: Arc<dyn IdSequence>) -> Self {
        let tagger: Box<dyn AddressTagger> = if config.tagging.enabled {
            Box::new(RawFieldTagger)
        } else {
            Box::new(NoopTagger)
        };

        Self {
            constructor: DocumentConstructor::new(config.document.clone()),
            extractor: AddressExtractor::new(config.extraction.clone(), sequence),
            tagger,
            config,
        }
    }

    /// Create a processor sharing the process-wide id sequence
    pub fn with_process_sequence(config: Config) -> Self {
        Self::new(config, AtomicSequence::shared())
    }

    /// Replace the address tagger
    pub fn with_tagger(mut self, tagger: Box<dyn AddressTagger>) -> Self {
        self.tagger = tagger;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn constructor(&self) -> &DocumentConstructor {
        &self.constructor
    }

    pub fn extractor(&self) -> &AddressExtractor {
        &self.extractor
    }

    /// Process a single raw record through the full pipeline
    ///
    /// # Returns
    ///
    /// Documents in emission order; empty when the record was dropped
    pub fn process_record(&self, record: &RawRecord, stats: &mut ProcessingStats) -> Vec<Document> {
        stats.records_read += 1;

        let Some(mut document) = self.constructor.process(record, stats) else {
            return Vec::new();
        };

        let report = self.tagger.tag(record, &mut document);
        if !report.is_clean() {
            debug!(
                stage = stages::ADDRESS_TAGGING,
                id = document.id(),
                rejected = report.failure_count(),
                "Some tags were rejected by the document model"
            );
            stats.field_copy_failures += report.failure_count();
        }

        let output = if self.config.extraction.enabled {
            self.extractor.extract(document, stats)
        } else {
            vec![document]
        };

        stats.documents_emitted += output.len();
        output
    }

    /// Process a collection of raw records
    ///
    /// # Returns
    ///
    /// A `ProcessingResult` containing every emitted document and statistics
    pub fn process_records(&self, records: Vec<RawRecord>) -> ProcessingResult {
        let mut stats = ProcessingStats::new();

        info!(
            "Starting record processing pipeline for {} records",
            records.len()
        );

        let mut documents = Vec::with_capacity(records.len());
        for record in &records {
            documents.extend(self.process_record(record, &mut stats));
        }

        info!("{}", stats.summary());

        if !stats.is_successful() {
            debug!(
                "High drop rate in record processing: {:.1}% ({} errors)",
                stats.drop_rate(),
                stats.errors
            );
        }

        ProcessingResult::new(documents, stats)
    }

    /// Lazily process records, pulling the next one only once the current
    /// record's documents have been consumed
    pub fn stream<I>(&self, records: I) -> RecordStream<'_, I::IntoIter>
    where
        I: IntoIterator<Item = RawRecord>,
    {
        RecordStream::new(self, records.into_iter())
    }
}
