//! Application of upstream name and address tags
//!
//! Mapping OSM tags (`addr:housenumber`, `name:en`, ...) onto document fields
//! happens before this crate sees a record. The [`AddressTagger`] trait is the
//! seam where that output is applied to a freshly built document; the default
//! [`RawFieldTagger`] reads the already-mapped `name` and `address` objects
//! of the raw record.

use crate::app::models::{AddressField, AdminField, Document, RawRecord};
use std::fmt;
use tracing::trace;

use super::field_copy::FieldCopyReport;

/// Applies name, address and admin fields to a document
pub trait AddressTagger: Send + Sync + fmt::Debug {
    /// Copy fields from `raw` onto `document`, one field at a time
    fn tag(&self, raw: &RawRecord, document: &mut Document) -> FieldCopyReport;
}

/// Copies `raw.name` and `raw.address` onto the document
///
/// Address keys that name an admin level (`alpha3`, `admin0`, `locality`, ...)
/// go to the admin hierarchy. Unknown keys are ignored. A value that is not a
/// string is reported as a failed field; the document keeps everything else.
#[derive(Debug, Default, Clone, Copy)]
pub struct RawFieldTagger;

impl AddressTagger for RawFieldTagger {
    fn tag(&self, raw: &RawRecord, document: &mut Document) -> FieldCopyReport {
        let mut report = FieldCopyReport::new();

        match raw.name_entries() {
            Ok(entries) => {
                for (key, value) in entries {
                    report.record(
                        format!("name.{}", key),
                        value.and_then(|value| document.set_name(key, value)),
                    );
                }
            }
            Err(e) => report.record("name", Err(e)),
        }

        let entries = match raw.address_entries() {
            Ok(entries) => entries,
            Err(e) => {
                report.record("address", Err(e));
                return report;
            }
        };

        for (key, value) in entries {
            if let Ok(field) = key.parse::<AddressField>() {
                report.record(
                    format!("address.{}", field),
                    value.and_then(|value| document.set_address(field, value)),
                );
            } else if let Ok(field) = key.parse::<AdminField>() {
                report.record(
                    format!("admin.{}", field),
                    value.and_then(|value| document.set_admin(field, value)),
                );
            } else {
                trace!(key = %key, id = document.id(), "Ignoring unknown address key");
                report.skip();
            }
        }

        report
    }
}

/// Leaves documents untouched
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTagger;

impl AddressTagger for NoopTagger {
    fn tag(&self, _raw: &RawRecord, _document: &mut Document) -> FieldCopyReport {
        FieldCopyReport::new()
    }
}
