//! Pull-based streaming over raw records
//!
//! [`RecordStream`] holds at most the documents of the record currently being
//! drained, so memory stays bounded no matter how large the input is and flow
//! control is left to whoever pulls from it.

use crate::app::models::{Document, RawRecord};
use std::collections::VecDeque;

use super::processor::RecordProcessor;
use super::stats::ProcessingStats;

/// Iterator adapter turning raw records into documents
#[derive(Debug)]
pub struct RecordStream<'a, I> {
    processor: &'a RecordProcessor,
    records: I,
    pending: VecDeque<Document>,
    stats: ProcessingStats,
}

impl<'a, I> RecordStream<'a, I>
where
    I: Iterator<Item = RawRecord>,
{
    pub fn new(processor: &'a RecordProcessor, records: I) -> Self {
        Self {
            processor,
            records,
            pending: VecDeque::new(),
            stats: ProcessingStats::new(),
        }
    }

    /// Statistics for the records pulled so far
    pub fn stats(&self) -> &ProcessingStats {
        &self.stats
    }

    pub fn into_stats(self) -> ProcessingStats {
        self.stats
    }

    /// Documents of the current record not yet handed out
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl<I> Iterator for RecordStream<'_, I>
where
    I: Iterator<Item = RawRecord>,
{
    type Item = Document;

    fn next(&mut self) -> Option<Document> {
        loop {
            if let Some(document) = self.pending.pop_front() {
                return Some(document);
            }

            let record = self.records.next()?;
            self.pending
                .extend(self.processor.process_record(&record, &mut self.stats));
        }
    }
}
