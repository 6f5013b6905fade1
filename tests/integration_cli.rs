//! Integration tests for the process command with real files
//!
//! These tests run the command end to end on temporary files and check the
//! newline-delimited JSON it writes.

use osm_processor::cli::args::{Args, Commands, ProcessArgs};
use osm_processor::cli::commands;
use osm_processor::{Document, Error};
use std::fs;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

const RECORDS: &str = r#"{"id": 10, "name": {"default": "Town Hall"}, "address": {"number": "1;1;2", "street": "Market Sq"}}
{"id": 11, "address": {"number": "8", "street": "Station Rd", "zip": "not a zip!"}}
{broken
{"id": 12}
"#;

fn read_documents(path: &std::path::Path) -> Vec<Document> {
    fs::read_to_string(path)
        .expect("output should exist")
        .lines()
        .map(|line| serde_json::from_str(line).expect("output line should be a document"))
        .collect()
}

/// Test a full command run from file to file
///
/// Purpose: Validate argument parsing, processing and output together
/// Benefit: Catches wiring errors between the CLI and the pipeline
#[tokio::test]
async fn test_process_command_file_to_file() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("records.jsonl");
    let output = temp_dir.path().join("documents.jsonl");
    fs::write(&input, RECORDS).unwrap();

    let args = <Args as clap::Parser>::try_parse_from([
        "osm-processor",
        "process",
        "--input",
        input.to_str().unwrap(),
        "--output",
        output.to_str().unwrap(),
        "--quiet",
    ])
    .unwrap();

    let stats = commands::run(args).await.unwrap();

    let documents = read_documents(&output);
    let names: Vec<_> = documents.iter().filter_map(|d| d.name("default")).collect();
    assert_eq!(
        names,
        vec!["1 Market Sq", "2 Market Sq", "Town Hall", "8 Station Rd"]
    );
    assert!(documents[3].address(osm_processor::AddressField::Zip).is_none());

    assert_eq!(stats.records_read, 3);
    assert_eq!(stats.malformed_lines, 1);
    assert_eq!(stats.unsearchable_dropped, 1);
    assert_eq!(stats.field_copy_failures, 1);
}

/// Test the config file and flag layering
///
/// Purpose: Validate that a JSON config is read and flags override it
/// Benefit: Ensures operators can pin settings per extract
#[tokio::test]
async fn test_process_command_with_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("records.jsonl");
    let output = temp_dir.path().join("documents.jsonl");
    fs::write(&input, RECORDS).unwrap();

    let mut config = NamedTempFile::new().unwrap();
    write!(config, r#"{{"document": {{"source_name": "osm_uk"}}}}"#).unwrap();

    let args = ProcessArgs {
        input_path: input,
        output_path: output.clone(),
        config_file: Some(config.path().to_path_buf()),
        no_address_extraction: true,
        quiet: true,
        ..Default::default()
    };

    let stats = commands::run(Args {
        command: Some(Commands::Process(args)),
    })
    .await
    .unwrap();

    let documents = read_documents(&output);
    assert_eq!(documents.len(), 3);
    assert!(documents.iter().all(|d| d.source() == "osm_uk"));
    assert!(documents.iter().all(|d| d.source_type() == "venue"));
    assert_eq!(stats.address_documents, 0);
}

/// Test that a broken config file ends the run
///
/// Purpose: Validate that configuration errors are fatal, unlike record errors
/// Benefit: Prevents a misconfigured import from silently using defaults
#[tokio::test]
async fn test_process_command_rejects_invalid_config() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("records.jsonl");
    fs::write(&input, RECORDS).unwrap();

    let mut config = NamedTempFile::new().unwrap();
    write!(config, r#"{{"document": {{"source_name": "Not Valid"}}}}"#).unwrap();

    let args = ProcessArgs {
        input_path: input,
        output_path: temp_dir.path().join("documents.jsonl"),
        config_file: Some(config.path().to_path_buf()),
        quiet: true,
        ..Default::default()
    };

    let result = commands::run(Args {
        command: Some(Commands::Process(args)),
    })
    .await;

    assert!(matches!(result, Err(Error::Configuration { .. })));
}
