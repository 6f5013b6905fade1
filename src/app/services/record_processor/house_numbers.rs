//! House number splitting for multi-unit addresses
//!
//! OSM mappers record buildings with several entrances as `addr:housenumber=12;14`.
//! Each component becomes its own address document.

use std::collections::HashSet;

/// Split a raw house number into its trimmed components
///
/// Empty components are discarded, as are repeats of an earlier component
/// (the first occurrence keeps its position).
pub fn split_house_numbers(raw: &str, delimiter: char) -> Vec<String> {
    let mut seen = HashSet::new();

    raw.split(delimiter)
        .map(str::trim)
        .filter(|component| !component.is_empty())
        .filter(|component| seen.insert(*component))
        .map(str::to_string)
        .collect()
}

/// Check whether a raw house number holds more than one component
pub fn is_multi_unit(raw: &str, delimiter: char) -> bool {
    split_house_numbers(raw, delimiter).len() > 1
}
