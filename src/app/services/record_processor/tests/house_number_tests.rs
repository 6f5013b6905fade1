//! Tests for multi-unit house number splitting

use crate::app::services::record_processor::house_numbers::{is_multi_unit, split_house_numbers};

#[test]
fn test_single_house_number() {
    assert_eq!(split_house_numbers("12", ';'), vec!["12"]);
    assert!(!is_multi_unit("12", ';'));
}

#[test]
fn test_multi_unit_preserves_order() {
    assert_eq!(split_house_numbers("12;14;10", ';'), vec!["12", "14", "10"]);
    assert!(is_multi_unit("12;14", ';'));
}

#[test]
fn test_components_are_trimmed() {
    assert_eq!(split_house_numbers(" 12 ;  14a", ';'), vec!["12", "14a"]);
}

#[test]
fn test_empty_components_are_discarded() {
    assert_eq!(split_house_numbers("12;;14;", ';'), vec!["12", "14"]);
    assert!(split_house_numbers(";", ';').is_empty());
    assert!(split_house_numbers("  ", ';').is_empty());
    assert!(!is_multi_unit(";12;", ';'));
}

#[test]
fn test_duplicates_keep_first_occurrence() {
    assert_eq!(split_house_numbers("14;12;14", ';'), vec!["14", "12"]);
    assert_eq!(split_house_numbers("12; 12", ';'), vec!["12"]);
}

#[test]
fn test_inner_spaces_are_kept() {
    assert_eq!(split_house_numbers("12 A;12 B", ';'), vec!["12 A", "12 B"]);
}

#[test]
fn test_other_delimiters() {
    assert_eq!(split_house_numbers("1,3", ','), vec!["1", "3"]);
    assert_eq!(split_house_numbers("1,3", ';'), vec!["1,3"]);
}
