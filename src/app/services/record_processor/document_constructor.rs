//! Document construction from raw records
//!
//! This is the first stage of the pipeline. It builds a canonical document from
//! a raw attribute bag: identity from `type`/`id`, centroid from `lat`/`lon` or
//! a precomputed `centroid`, and `nodes`/`tags` carried into `meta` verbatim.
//! Records the model rejects are dropped and logged; they never fail the stream.

use crate::app::models::{Document, RawRecord};
use crate::config::DocumentConfig;
use crate::constants::{meta_keys, stages};
use crate::{Error, Result};
use tracing::warn;

use super::stats::ProcessingStats;

/// Builds canonical documents from raw records
#[derive(Debug, Clone)]
pub struct DocumentConstructor {
    config: DocumentConfig,
}

impl DocumentConstructor {
    /// Create a constructor stamping documents with the configured provenance
    pub fn new(config: DocumentConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DocumentConfig {
        &self.config
    }

    /// Build a document from a raw record
    ///
    /// # Returns
    ///
    /// The document, or the first model error. Any failing setter fails the
    /// whole record so no partially built document escapes.
    pub fn construct(&self, record: &RawRecord) -> Result<Document> {
        let id = record
            .upstream_id()
            .ok_or_else(|| Error::invalid_identity("id", "record has no usable id"))?;
        let layer = record
            .layer()?
            .unwrap_or(self.config.default_layer.as_str());

        let mut document = Document::new(&self.config.source_name, layer, &id)?;
        document.set_source_id(&id)?;

        if let Some(centroid) = record.resolve_centroid()? {
            document.set_centroid(centroid)?;
        }

        if let Some(nodes) = &record.nodes {
            document.set_meta(meta_keys::NODES, nodes.clone())?;
        }

        if let Some(tags) = &record.tags {
            document.set_meta(meta_keys::TAGS, tags.clone())?;
        }

        Ok(document)
    }

    /// Build a document, absorbing any failure
    ///
    /// Failures are logged with the stage tag and counted in `stats`; the
    /// record simply produces no output.
    pub fn process(&self, record: &RawRecord, stats: &mut ProcessingStats) -> Option<Document> {
        match self.construct(record) {
            Ok(document) => {
                stats.documents_constructed += 1;
                Some(document)
            }
            Err(e) => {
                warn!(
                    stage = stages::DOCUMENT_CONSTRUCTOR,
                    error = %e,
                    id = ?record.id,
                    "Dropping record that failed document construction"
                );
                stats.records_dropped += 1;
                stats.add_error(format!("Document construction failed: {}", e));
                None
            }
        }
    }
}
