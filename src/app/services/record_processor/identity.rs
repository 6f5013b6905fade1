//! Identifier derivation for address documents
//!
//! Address documents need identities that never collide with their parent or
//! with siblings split from the same parent. The base of a derived identity is
//! the parent's upstream id; parents without one draw a value from an
//! [`IdSequence`] instead, which is injected so tests can make it
//! deterministic. Drawn values carry [`SYNTHETIC_ID_PREFIX`] so they cannot
//! equal a numeric upstream id.

use crate::app::models::Document;
use crate::constants::{DERIVED_ID_SEPARATOR, SYNTHETIC_ID_PREFIX};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Source of strictly increasing synthetic identifiers
pub trait IdSequence: Send + Sync + fmt::Debug {
    /// Return the next value; never returns the same value twice
    fn next_id(&self) -> u64;
}

/// Lock-free sequence safe to share between concurrently running stages
#[derive(Debug, Default)]
pub struct AtomicSequence {
    next: AtomicU64,
}

static PROCESS_SEQUENCE: AtomicSequence = AtomicSequence::new();

impl AtomicSequence {
    pub const fn new() -> Self {
        Self::starting_at(0)
    }

    pub const fn starting_at(start: u64) -> Self {
        Self {
            next: AtomicU64::new(start),
        }
    }

    /// Sequence shared by every extractor in this process
    pub fn process() -> &'static AtomicSequence {
        &PROCESS_SEQUENCE
    }

    /// Process-wide sequence as an injectable handle
    pub fn shared() -> Arc<dyn IdSequence> {
        Arc::new(Self::process())
    }
}

impl IdSequence for AtomicSequence {
    fn next_id(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

impl IdSequence for &'static AtomicSequence {
    fn next_id(&self) -> u64 {
        (**self).next_id()
    }
}

/// Base identifier shared by all address documents split from `parent`
///
/// Draws from `sequence` only when the parent has no upstream id, so one
/// parent consumes at most one sequence value.
pub fn base_identifier(parent: &Document, sequence: &dyn IdSequence) -> String {
    match parent.source_id() {
        Some(source_id) => source_id.to_string(),
        None => format!("{}{}", SYNTHETIC_ID_PREFIX, sequence.next_id()),
    }
}

/// Identifier of the `index`-th address document split from `parent`
///
/// Format is `{source}-{source_type}-{derived_layer}-{base}`; every component
/// after the first appends its house number to stay unique among siblings.
pub fn derived_id(
    parent: &Document,
    derived_layer: &str,
    base: &str,
    house_number: &str,
    index: usize,
) -> String {
    let mut parts = vec![parent.source(), parent.source_type(), derived_layer, base];
    if index > 0 {
        parts.push(house_number);
    }

    parts.join(&DERIVED_ID_SEPARATOR.to_string())
}
