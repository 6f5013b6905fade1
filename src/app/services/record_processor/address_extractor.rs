//! Address extraction for named and unnamed documents
//!
//! Every document that reaches this stage is either dropped, forwarded, split
//! into standalone address documents, or both split and forwarded:
//!
//! | named | valid address | output |
//! |-------|---------------|--------|
//! | no    | no            | nothing (not searchable) |
//! | yes   | no            | the original |
//! | no    | yes           | N `address` documents |
//! | yes   | yes           | N `poi-address` documents, then the original |
//!
//! N is the number of house number components. Address documents always
//! precede their parent in the output.

use crate::app::models::{AddressField, Document};
use crate::config::ExtractionConfig;
use crate::constants::{DEFAULT_NAME_KEY, layers, stages};
use crate::Result;
use std::sync::Arc;
use tracing::{debug, error};

use super::field_copy::{FieldCopyReport, copy_address_fields, copy_admin_fields};
use super::house_numbers::{is_multi_unit, split_house_numbers};
use super::identity::{AtomicSequence, IdSequence, base_identifier, derived_id};
use super::stats::ProcessingStats;

/// Address fields copied verbatim from the parent; `number` is set per component
const COPIED_ADDRESS_FIELDS: [AddressField; 3] =
    [AddressField::Name, AddressField::Street, AddressField::Zip];

/// True when the document has a non-empty default name
pub fn is_named_poi(document: &Document) -> bool {
    document
        .name(DEFAULT_NAME_KEY)
        .is_some_and(|name| !name.trim().is_empty())
}

/// True when the document has both a house number and a street
pub fn has_valid_address(document: &Document) -> bool {
    let present = |field| {
        document
            .address(field)
            .is_some_and(|value: &str| !value.trim().is_empty())
    };

    present(AddressField::Number) && present(AddressField::Street)
}

/// What the extractor does with one document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionDecision {
    /// Neither named nor addressed
    Drop,
    /// Named, without a usable address
    ForwardOriginal,
    /// Addressed, without a name
    AddressesOnly,
    /// Named and addressed
    AddressesAndOriginal,
}

impl ExtractionDecision {
    pub fn for_document(document: &Document) -> Self {
        match (is_named_poi(document), has_valid_address(document)) {
            (false, false) => ExtractionDecision::Drop,
            (true, false) => ExtractionDecision::ForwardOriginal,
            (false, true) => ExtractionDecision::AddressesOnly,
            (true, true) => ExtractionDecision::AddressesAndOriginal,
        }
    }

    /// Layer of the address documents to build, if any
    pub fn derived_layer(self) -> Option<&'static str> {
        match self {
            ExtractionDecision::AddressesOnly => Some(layers::ADDRESS),
            ExtractionDecision::AddressesAndOriginal => Some(layers::POI_ADDRESS),
            ExtractionDecision::Drop | ExtractionDecision::ForwardOriginal => None,
        }
    }

    pub fn forwards_original(self) -> bool {
        matches!(
            self,
            ExtractionDecision::ForwardOriginal | ExtractionDecision::AddressesAndOriginal
        )
    }
}

/// Splits address documents off their parents
#[derive(Debug, Clone)]
pub struct AddressExtractor {
    config: ExtractionConfig,
    sequence: Arc<dyn IdSequence>,
}

impl AddressExtractor {
    /// Create an extractor drawing synthetic ids from `sequence`
    pub fn new(config: ExtractionConfig, sequence: Arc<dyn IdSequence>) -> Self {
        Self { config, sequence }
    }

    /// Create an extractor sharing the process-wide id sequence
    pub fn with_process_sequence(config: ExtractionConfig) -> Self {
        Self::new(config, AtomicSequence::shared())
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Run the decision table for one document
    ///
    /// # Returns
    ///
    /// Address documents first, then the original when it is forwarded.
    pub fn extract(&self, document: Document, stats: &mut ProcessingStats) -> Vec<Document> {
        let decision = ExtractionDecision::for_document(&document);

        let mut output = match decision.derived_layer() {
            Some(layer) => self.split_addresses(&document, layer, stats),
            None => Vec::new(),
        };

        if decision.forwards_original() {
            stats.poi_forwarded += 1;
            output.push(document);
        } else if decision == ExtractionDecision::Drop {
            debug!(id = document.id(), "Dropping document with no name and no address");
            stats.unsearchable_dropped += 1;
        }

        output
    }

    /// Build one address document per house number component of `parent`
    ///
    /// Components that fail to build are logged with the serialized parent and
    /// skipped; their siblings are unaffected.
    pub fn split_addresses(
        &self,
        parent: &Document,
        layer: &str,
        stats: &mut ProcessingStats,
    ) -> Vec<Document> {
        let (Some(number), Some(street)) = (
            parent.address(AddressField::Number),
            parent.address(AddressField::Street),
        ) else {
            return Vec::new();
        };

        let delimiter = self.config.house_number_delimiter;
        let house_numbers = split_house_numbers(number, delimiter);
        if is_multi_unit(number, delimiter) {
            debug!(
                id = parent.id(),
                components = house_numbers.len(),
                "Splitting multi-unit house number '{}'",
                number
            );
        }

        let base = base_identifier(parent, self.sequence.as_ref());
        let mut documents = Vec::with_capacity(house_numbers.len());

        for (index, house_number) in house_numbers.iter().enumerate() {
            match self.build_address_document(parent, layer, &base, house_number, street, index) {
                Ok((document, report)) => {
                    stats.field_copy_failures += report.failure_count();
                    stats.address_documents += 1;
                    documents.push(document);
                }
                Err(e) => {
                    error!(
                        stage = stages::ADDRESS_EXTRACTOR,
                        error = %e,
                        document = %serialize_for_log(parent),
                        "Failed to build address document for house number '{}'",
                        house_number
                    );
                    stats.component_failures += 1;
                    stats.add_error(format!(
                        "Address component '{}' of {} failed: {}",
                        house_number,
                        parent.id(),
                        e
                    ));
                }
            }
        }

        documents
    }

    /// Build the `index`-th address document of `parent`
    ///
    /// Identity, name, centroid and source id must succeed. Address and admin
    /// fields are copied one by one; rejections land in the returned report.
    pub fn build_address_document(
        &self,
        parent: &Document,
        layer: &str,
        base: &str,
        house_number: &str,
        street: &str,
        index: usize,
    ) -> Result<(Document, FieldCopyReport)> {
        let id = derived_id(parent, layer, base, house_number, index);
        let mut document = Document::new(parent.source(), layer, id)?;

        document.set_name(DEFAULT_NAME_KEY, format!("{} {}", house_number, street))?;

        if let Some(centroid) = parent.centroid() {
            document.set_centroid(centroid)?;
        }

        if let Some(source_id) = parent.source_id() {
            document.set_source_id(source_id)?;
        }

        let mut report = FieldCopyReport::new();
        report.record(
            "address.number",
            document.set_address(AddressField::Number, house_number),
        );
        report.merge(copy_address_fields(
            parent,
            &mut document,
            &COPIED_ADDRESS_FIELDS,
        ));
        report.merge(copy_admin_fields(parent, &mut document));

        document.inherit_meta(parent);

        Ok((document, report))
    }
}

fn serialize_for_log(document: &Document) -> String {
    serde_json::to_string(document)
        .unwrap_or_else(|e| format!("<unserializable document {}: {}>", document.id(), e))
}
