//! Tests for the address extraction decision table and address documents

use super::*;
use crate::app::services::record_processor::address_extractor::{
    ExtractionDecision, has_valid_address, is_named_poi,
};
use crate::app::services::record_processor::identity::IdSequence;
use crate::app::services::record_processor::stats::ProcessingStats;
use serde_json::json;

mod predicate_tests {
    use super::*;

    #[test]
    fn test_is_named_poi() {
        assert!(!is_named_poi(&create_test_document("1")));
        assert!(is_named_poi(&create_named_poi("1", "Cafe")));

        let mut other_name = create_test_document("1");
        other_name.set_name("en", "Cafe").unwrap();
        assert!(!is_named_poi(&other_name));

        let blank = unchecked_document(json!({
            "source": "openstreetmap", "source_type": "venue", "id": "1",
            "name": { "default": "  " }
        }));
        assert!(!is_named_poi(&blank));
    }

    #[test]
    fn test_has_valid_address() {
        assert!(!has_valid_address(&create_test_document("1")));
        assert!(has_valid_address(&with_address(
            create_test_document("1"),
            "12",
            "Main St"
        )));

        let mut number_only = create_test_document("1");
        number_only.set_address(AddressField::Number, "12").unwrap();
        assert!(!has_valid_address(&number_only));

        let mut street_only = create_test_document("1");
        street_only.set_address(AddressField::Street, "Main St").unwrap();
        assert!(!has_valid_address(&street_only));

        let empty_number = unchecked_document(json!({
            "source": "openstreetmap", "source_type": "venue", "id": "1",
            "address": { "number": "", "street": "Main St" }
        }));
        assert!(!has_valid_address(&empty_number));
    }

    #[test]
    fn test_decision_table() {
        let plain = create_test_document("1");
        let named = create_named_poi("1", "Cafe");
        let addressed = with_address(create_test_document("1"), "12", "Main St");
        let both = with_address(create_named_poi("1", "Cafe"), "12", "Main St");

        assert_eq!(ExtractionDecision::for_document(&plain), ExtractionDecision::Drop);
        assert_eq!(
            ExtractionDecision::for_document(&named),
            ExtractionDecision::ForwardOriginal
        );
        assert_eq!(
            ExtractionDecision::for_document(&addressed),
            ExtractionDecision::AddressesOnly
        );
        assert_eq!(
            ExtractionDecision::for_document(&both),
            ExtractionDecision::AddressesAndOriginal
        );

        assert_eq!(ExtractionDecision::AddressesOnly.derived_layer(), Some("address"));
        assert_eq!(
            ExtractionDecision::AddressesAndOriginal.derived_layer(),
            Some("poi-address")
        );
        assert_eq!(ExtractionDecision::Drop.derived_layer(), None);
        assert!(!ExtractionDecision::AddressesOnly.forwards_original());
        assert!(ExtractionDecision::ForwardOriginal.forwards_original());
    }
}

#[test]
fn test_unnamed_without_address_emits_nothing() {
    let (extractor, _) = create_test_extractor();
    let mut stats = ProcessingStats::new();

    let output = extractor.extract(create_test_document("1"), &mut stats);

    assert!(output.is_empty());
    assert_eq!(stats.unsearchable_dropped, 1);
}

#[test]
fn test_named_without_address_forwards_original_unchanged() {
    let (extractor, _) = create_test_extractor();
    let mut stats = ProcessingStats::new();
    let poi = create_named_poi("1", "Cafe");

    let output = extractor.extract(poi.clone(), &mut stats);

    assert_eq!(output, vec![poi]);
    assert_eq!(stats.poi_forwarded, 1);
    assert_eq!(stats.address_documents, 0);
}

#[test]
fn test_unnamed_with_address_emits_address_document() {
    let (extractor, _) = create_test_extractor();
    let mut stats = ProcessingStats::new();

    let output = extractor.extract(
        with_address(create_test_document("42"), "12", "Main St"),
        &mut stats,
    );

    assert_eq!(output.len(), 1);
    let address = &output[0];
    assert_eq!(address.source_type(), "address");
    assert_eq!(address.name("default"), Some("12 Main St"));
    assert_eq!(address.id(), "openstreetmap-venue-address-42");
    assert_eq!(address.source_id(), Some("42"));
    assert_eq!(address.address(AddressField::Number), Some("12"));
    assert_eq!(address.address(AddressField::Street), Some("Main St"));
    assert_eq!(stats.address_documents, 1);
    assert_eq!(stats.poi_forwarded, 0);
}

#[test]
fn test_named_with_multi_unit_address() {
    let (extractor, _) = create_test_extractor();
    let mut stats = ProcessingStats::new();
    let poi = with_address(create_named_poi("7", "Cafe"), "12;14", "Main St");

    let output = extractor.extract(poi.clone(), &mut stats);

    assert_eq!(output.len(), 3);
    assert_eq!(output[0].source_type(), "poi-address");
    assert_eq!(output[0].name("default"), Some("12 Main St"));
    assert_eq!(output[0].id(), "openstreetmap-venue-poi-address-7");
    assert_eq!(output[1].source_type(), "poi-address");
    assert_eq!(output[1].name("default"), Some("14 Main St"));
    assert_eq!(output[1].id(), "openstreetmap-venue-poi-address-7-14");
    assert_eq!(output[1].address(AddressField::Number), Some("14"));
    assert_eq!(output[2], poi);

    assert_eq!(stats.address_documents, 2);
    assert_eq!(stats.poi_forwarded, 1);
}

#[test]
fn test_house_number_components_are_trimmed() {
    let (extractor, _) = create_test_extractor();
    let mut stats = ProcessingStats::new();

    let output = extractor.extract(
        with_address(create_test_document("7"), " 12 ; 14a ;", "Main St"),
        &mut stats,
    );

    let names: Vec<_> = output.iter().filter_map(|d| d.name("default")).collect();
    assert_eq!(names, vec!["12 Main St", "14a Main St"]);
    assert_eq!(output[1].id(), "openstreetmap-venue-address-7-14a");
}

#[test]
fn test_derived_documents_copy_parent_fields() {
    let (extractor, _) = create_test_extractor();
    let mut stats = ProcessingStats::new();
    let parent = create_full_poi("99");

    let output = extractor.extract(parent.clone(), &mut stats);
    assert_eq!(output.len(), 2);

    let address = &output[0];
    assert_eq!(address.centroid(), parent.centroid());
    assert_eq!(address.source_id(), Some("99"));
    assert_eq!(address.address(AddressField::Zip), Some("N1 9GU"));
    assert_eq!(address.address(AddressField::Name), Some("Corner House"));
    for field in AdminField::ALL {
        assert_eq!(address.admin(field), parent.admin(field), "admin field {}", field);
    }
    assert_eq!(stats.field_copy_failures, 0);
}

#[test]
fn test_derived_meta_is_a_copy_with_own_identity() {
    let (extractor, _) = create_test_extractor();
    let mut stats = ProcessingStats::new();
    let parent = create_full_poi("99");

    let output = extractor.extract(parent.clone(), &mut stats);
    let address = &output[0];

    assert_eq!(address.meta("tags"), Some(&json!(["amenity=cafe"])));
    assert_eq!(address.meta("id"), Some(&json!(address.id())));
    assert_eq!(address.meta("type"), Some(&json!("poi-address")));

    let original = &output[1];
    assert_eq!(original.meta("id"), Some(&json!("99")));
    assert_eq!(original.meta("type"), Some(&json!("venue")));
    assert_eq!(original, &parent);
}

#[test]
fn test_derived_identities_never_collide_with_parent_or_siblings() {
    let (extractor, _) = create_test_extractor();
    let mut stats = ProcessingStats::new();
    let parent = with_address(create_named_poi("5", "Flats"), "1;2;3;2", "High St");

    let output = extractor.extract(parent, &mut stats);
    let ids: Vec<&str> = output.iter().map(Document::id).collect();

    let mut unique = ids.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), ids.len());
    assert_eq!(output.len(), 4);
}

#[test]
fn test_parents_without_upstream_id_draw_from_sequence() {
    let (extractor, sequence) = create_test_extractor();
    let mut stats = ProcessingStats::new();

    let parent = |id: &str| {
        unchecked_document(json!({
            "source": "openstreetmap", "source_type": "venue", "id": id,
            "address": { "number": "1;3", "street": "Main St" }
        }))
    };

    let first = extractor.extract(parent("a"), &mut stats);
    let second = extractor.extract(parent("b"), &mut stats);

    assert_eq!(first[0].id(), "openstreetmap-venue-address-seq100");
    assert_eq!(first[1].id(), "openstreetmap-venue-address-seq100-3");
    assert_eq!(second[0].id(), "openstreetmap-venue-address-seq101");
    assert!(first[0].source_id().is_none());

    // one draw per parent, not per component
    assert_eq!(sequence.next_id(), 102);
}

#[test]
fn test_parents_with_upstream_id_do_not_draw_from_sequence() {
    let (extractor, sequence) = create_test_extractor();
    let mut stats = ProcessingStats::new();

    extractor.extract(
        with_address(create_test_document("8"), "1", "Main St"),
        &mut stats,
    );

    assert_eq!(sequence.next_id(), TEST_SEQUENCE_START);
}

#[test]
fn test_malformed_zip_does_not_block_document() {
    let (extractor, _) = create_test_extractor();
    let mut stats = ProcessingStats::new();
    let parent = unchecked_document(json!({
        "source": "openstreetmap", "source_type": "venue", "id": "3", "source_id": "3",
        "address": { "number": "12", "street": "Main St", "zip": "##bad##", "name": "The Lodge" },
        "admin": { "alpha3": "gbr", "locality": "London" }
    }));

    let output = extractor.extract(parent, &mut stats);

    assert_eq!(output.len(), 1);
    let address = &output[0];
    assert!(address.address(AddressField::Zip).is_none());
    assert!(address.admin(AdminField::Alpha3).is_none());
    assert_eq!(address.address(AddressField::Name), Some("The Lodge"));
    assert_eq!(address.admin(AdminField::Locality), Some("London"));
    assert_eq!(stats.field_copy_failures, 2);
    assert_eq!(stats.component_failures, 0);
}

#[test]
fn test_failed_component_is_skipped_without_affecting_siblings() {
    let (extractor, _) = create_test_extractor();
    let mut stats = ProcessingStats::new();
    let parent = unchecked_document(json!({
        "source": "openstreetmap", "source_type": "venue", "id": "4", "source_id": "4",
        "name": { "default": "Cafe" },
        "address": { "number": "12;1\u{7}4;16", "street": "Main St" }
    }));

    let output = extractor.extract(parent.clone(), &mut stats);

    let names: Vec<_> = output.iter().filter_map(|d| d.name("default")).collect();
    assert_eq!(names, vec!["12 Main St", "16 Main St", "Cafe"]);
    assert_eq!(output.last(), Some(&parent));
    assert_eq!(stats.component_failures, 1);
    assert_eq!(stats.address_documents, 2);
    assert_eq!(stats.errors, 1);
}

#[test]
fn test_invalid_parent_centroid_fails_every_component() {
    let (extractor, _) = create_test_extractor();
    let mut stats = ProcessingStats::new();
    let parent = unchecked_document(json!({
        "source": "openstreetmap", "source_type": "venue", "id": "4", "source_id": "4",
        "name": { "default": "Cafe" },
        "centroid": { "lat": 200.0, "lon": 0.0 },
        "address": { "number": "12;14", "street": "Main St" }
    }));

    let output = extractor.extract(parent.clone(), &mut stats);

    assert_eq!(output, vec![parent]);
    assert_eq!(stats.component_failures, 2);
    assert_eq!(stats.poi_forwarded, 1);
}

#[test]
fn test_delimiter_only_house_number_yields_no_addresses() {
    let (extractor, _) = create_test_extractor();
    let mut stats = ProcessingStats::new();
    let named = unchecked_document(json!({
        "source": "openstreetmap", "source_type": "venue", "id": "4", "source_id": "4",
        "name": { "default": "Cafe" },
        "address": { "number": ";", "street": "Main St" }
    }));

    let output = extractor.extract(named.clone(), &mut stats);

    assert_eq!(output, vec![named]);
    assert_eq!(stats.address_documents, 0);
}

#[test]
fn test_custom_delimiter() {
    let extractor = AddressExtractor::new(
        ExtractionConfig {
            house_number_delimiter: ',',
            ..ExtractionConfig::default()
        },
        Arc::new(AtomicSequence::new()),
    );
    let mut stats = ProcessingStats::new();

    let output = extractor.extract(
        with_address(create_test_document("9"), "1,3", "Main St"),
        &mut stats,
    );

    assert_eq!(output.len(), 2);
}
