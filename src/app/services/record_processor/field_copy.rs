//! Fault-tolerant field copying between documents
//!
//! Each field is copied independently. A value the model rejects is recorded
//! in a [`FieldCopyReport`] and the remaining fields are still copied.

use crate::Result;
use crate::app::models::{AddressField, AdminField, Document};
use tracing::debug;

/// A single field the target document refused
#[derive(Debug, Clone, PartialEq)]
pub struct FieldCopyFailure {
    pub field: String,
    pub message: String,
}

/// Outcome of copying a group of fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldCopyReport {
    /// Fields written to the target
    pub copied: usize,
    /// Fields the source did not have
    pub skipped: usize,
    /// Fields the target rejected
    pub failures: Vec<FieldCopyFailure>,
}

impl FieldCopyReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the result of one setter call
    pub fn record(&mut self, field: impl Into<String>, result: Result<()>) {
        match result {
            Ok(()) => self.copied += 1,
            Err(e) => {
                let field = field.into();
                debug!(field = %field, error = %e, "Field copy rejected");
                self.failures.push(FieldCopyFailure {
                    field,
                    message: e.to_string(),
                });
            }
        }
    }

    /// Record a field that was absent on the source
    pub fn skip(&mut self) {
        self.skipped += 1;
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// True when no field was rejected
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn merge(&mut self, other: FieldCopyReport) {
        self.copied += other.copied;
        self.skipped += other.skipped;
        self.failures.extend(other.failures);
    }
}

/// Copy the given address fields from `source` to `target`
pub fn copy_address_fields(
    source: &Document,
    target: &mut Document,
    fields: &[AddressField],
) -> FieldCopyReport {
    let mut report = FieldCopyReport::new();

    for &field in fields {
        match source.address(field) {
            Some(value) => report.record(
                format!("address.{}", field),
                target.set_address(field, value),
            ),
            None => report.skip(),
        }
    }

    report
}

/// Copy the country code and every admin level from `source` to `target`
pub fn copy_admin_fields(source: &Document, target: &mut Document) -> FieldCopyReport {
    let mut report = FieldCopyReport::new();

    for field in AdminField::ALL {
        match source.admin(field) {
            Some(value) => report.record(format!("admin.{}", field), target.set_admin(field, value)),
            None => report.skip(),
        }
    }

    report
}
