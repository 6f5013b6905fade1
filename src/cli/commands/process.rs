//! Process command implementation for the OSM processor CLI
//!
//! Reads newline-delimited raw records, runs each one through the record
//! pipeline and writes the resulting documents as newline-delimited JSON.
//! Records are handled one at a time, so memory use does not grow with the
//! size of the input.

use super::shared::{create_spinner, load_configuration, setup_logging};
use crate::app::models::{Document, RawRecord};
use crate::app::services::record_processor::{ProcessingStats, RecordProcessor};
use crate::cli::args::{OutputFormat, ProcessArgs};
use crate::constants::{PROGRESS_UPDATE_INTERVAL, stages};
use crate::{Error, Result};
use colored::*;
use indicatif::{HumanDuration, ProgressBar};
use std::time::{Duration, Instant};
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};
use tracing::{debug, info, warn};

/// Process command runner
///
/// This function orchestrates the whole run:
/// 1. Set up logging and configuration
/// 2. Open the input and output streams
/// 3. Process records with progress reporting
/// 4. Print the summary to stderr
pub async fn run_process(args: ProcessArgs) -> Result<ProcessingStats> {
    let start_time = Instant::now();

    // Set up logging
    setup_logging(&args)?;

    info!("Starting OSM processor");
    debug!("Command line arguments: {:?}", args);

    // Validate arguments
    args.validate()?;

    let config = load_configuration(&args)?;
    debug!("Loaded configuration: {:?}", config);

    let processor = RecordProcessor::with_process_sequence(config);
    let reader = open_input(&args).await?;

    let spinner = args
        .show_progress()
        .then(|| create_spinner("Processing records..."));

    let stats = if args.dry_run {
        info!("Performing dry run - no documents will be written");
        process_stream(&processor, reader, None::<&mut tokio::io::Sink>, spinner.as_ref()).await?
    } else {
        let mut writer = BufWriter::new(open_output(&args).await?);
        process_stream(&processor, reader, Some(&mut writer), spinner.as_ref()).await?
    };

    if let Some(spinner) = &spinner {
        spinner.finish_and_clear();
    }

    info!("{}", stats.summary());

    generate_final_report(&args, &stats, start_time.elapsed())?;

    Ok(stats)
}

/// Run every line of `reader` through `processor`
///
/// Blank lines are skipped. Lines that do not decode as a raw record are
/// counted, logged and skipped. Documents are written to `writer` in
/// emission order when one is given.
pub async fn process_stream<R, W>(
    processor: &RecordProcessor,
    reader: R,
    mut writer: Option<&mut W>,
    progress: Option<&ProgressBar>,
) -> Result<ProcessingStats>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut stats = ProcessingStats::new();
    let mut lines = reader.lines();
    let mut line_number = 0usize;

    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| Error::io(format!("Failed to read input line {}", line_number + 1), e))?
    {
        line_number += 1;

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let record: RawRecord = match serde_json::from_str(line) {
            Ok(record) => record,
            Err(e) => {
                warn!(
                    stage = stages::INPUT,
                    line = line_number,
                    error = %e,
                    "Skipping malformed input line"
                );
                stats.malformed_lines += 1;
                stats.add_error(format!("Line {}: {}", line_number, e));
                continue;
            }
        };

        let documents = processor.process_record(&record, &mut stats);

        if let Some(writer) = writer.as_deref_mut() {
            for document in &documents {
                write_document(writer, document).await?;
            }
        }

        if let Some(progress) = progress {
            progress.inc(1);
            if stats.records_read as u64 % PROGRESS_UPDATE_INTERVAL == 0 {
                progress.set_message(format!(
                    "Processed {} records -> {} documents",
                    stats.records_read, stats.documents_emitted
                ));
            }
        }
    }

    if let Some(writer) = writer {
        writer
            .flush()
            .await
            .map_err(|e| Error::io("Failed to flush output", e))?;
    }

    Ok(stats)
}

async fn write_document<W>(writer: &mut W, document: &Document) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut line = serde_json::to_vec(document)
        .map_err(|e| Error::json(format!("Failed to serialize document {}", document.id()), e))?;
    line.push(b'\n');

    writer
        .write_all(&line)
        .await
        .map_err(|e| Error::io("Failed to write document", e))
}

async fn open_input(args: &ProcessArgs) -> Result<Box<dyn AsyncBufRead + Unpin + Send>> {
    if args.reads_stdin() {
        info!("Reading records from stdin");
        return Ok(Box::new(BufReader::new(tokio::io::stdin())));
    }

    let file = File::open(&args.input_path).await.map_err(|e| {
        Error::io(
            format!("Failed to open input file {}", args.input_path.display()),
            e,
        )
    })?;

    info!("Reading records from {}", args.input_path.display());
    Ok(Box::new(BufReader::new(file)))
}

async fn open_output(args: &ProcessArgs) -> Result<Box<dyn AsyncWrite + Unpin + Send>> {
    if args.writes_stdout() {
        info!("Writing documents to stdout");
        return Ok(Box::new(tokio::io::stdout()));
    }

    let file = File::create(&args.output_path).await.map_err(|e| {
        Error::io(
            format!("Failed to create output file {}", args.output_path.display()),
            e,
        )
    })?;

    info!("Writing documents to {}", args.output_path.display());
    Ok(Box::new(file))
}

/// Generate final processing report on stderr
fn generate_final_report(args: &ProcessArgs, stats: &ProcessingStats, elapsed: Duration) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            if !args.quiet {
                eprintln!("{}", human_report(stats, elapsed, args.dry_run));
            }
            Ok(())
        }
        OutputFormat::Json => {
            eprintln!("{}", json_report(stats, elapsed, args.dry_run)?);
            Ok(())
        }
    }
}

/// Render the human-readable summary
fn human_report(stats: &ProcessingStats, elapsed: Duration, dry_run: bool) -> String {
    let title = if dry_run {
        "Dry Run Summary (nothing written)"
    } else {
        "Processing Summary"
    };

    let mut lines = vec![
        format!("\n{}", title.bright_green().bold()),
        format!(
            "  {} {}",
            "Time elapsed:".bright_cyan(),
            HumanDuration(elapsed).to_string().bright_white()
        ),
        format!(
            "  {} {}",
            "Records read:".bright_cyan(),
            stats.records_read.to_string().bright_white()
        ),
        format!(
            "  {} {}",
            "Documents written:".bright_cyan(),
            stats.documents_emitted.to_string().bright_white().bold()
        ),
        format!(
            "  {} {}",
            "Address documents:".bright_cyan(),
            stats.address_documents.to_string().bright_white()
        ),
        format!(
            "  {} {}",
            "POIs forwarded:".bright_cyan(),
            stats.poi_forwarded.to_string().bright_white()
        ),
        format!(
            "  {} {}",
            "Unsearchable dropped:".bright_cyan(),
            stats.unsearchable_dropped.to_string().bright_white()
        ),
    ];

    if stats.records_dropped > 0 {
        lines.push(format!(
            "  {} {} ({:.1}%)",
            "Invalid records:".bright_red(),
            stats.records_dropped.to_string().bright_red().bold(),
            stats.drop_rate()
        ));
    }
    if stats.malformed_lines > 0 {
        lines.push(format!(
            "  {} {}",
            "Malformed lines:".bright_red(),
            stats.malformed_lines.to_string().bright_red().bold()
        ));
    }
    if stats.field_copy_failures + stats.component_failures > 0 {
        lines.push(format!(
            "  {} {} fields, {} address components",
            "Rejected:".bright_yellow(),
            stats.field_copy_failures,
            stats.component_failures
        ));
    }

    lines.join("\n")
}

/// Render the JSON summary for machine consumption
fn json_report(stats: &ProcessingStats, elapsed: Duration, dry_run: bool) -> Result<String> {
    let mut report = serde_json::to_value(stats)?;
    if let Some(object) = report.as_object_mut() {
        object.insert("dry_run".to_string(), dry_run.into());
        object.insert("drop_rate".to_string(), stats.drop_rate().into());
        object.insert(
            "processing_time_seconds".to_string(),
            elapsed.as_secs_f64().into(),
        );
    }

    Ok(serde_json::to_string_pretty(&report)?)
}
