use clap::Parser;
use osm_processor::cli::{args::Args, commands};
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    // Create async runtime and run the main command logic with signal handling
    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        tokio::select! {
            result = commands::run(args) => result,
            signal = tokio::signal::ctrl_c() => {
                let reason = match signal {
                    Ok(()) => "Processing interrupted by user".to_string(),
                    Err(e) => format!("Failed to listen for CTRL+C: {}", e),
                };
                eprintln!("\nReceived CTRL+C, shutting down...");
                Err(osm_processor::Error::processing_interrupted(reason))
            }
        }
    });

    match result {
        Ok(_stats) => {
            // Success - the summary has already been reported by the command
            process::exit(0);
        }
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("OSM Processor - Geodata Document Builder");
    println!("========================================");
    println!();
    println!("Turn raw OpenStreetMap records into canonical geodata documents and");
    println!("split multi-unit addresses into standalone address documents.");
    println!();
    println!("USAGE:");
    println!("    osm-processor <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    process     Process newline-delimited raw records into documents");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Process a file of records:");
    println!("    osm-processor process --input records.jsonl --output documents.jsonl");
    println!();
    println!("    # Stream through a pipe with a custom house number delimiter:");
    println!("    cat records.jsonl | osm-processor process --delimiter ',' > documents.jsonl");
    println!();
    println!("    # Count what a run would produce without writing anything:");
    println!("    osm-processor process -i records.jsonl --dry-run --output-format json");
    println!();
    println!("For detailed help on any command, use:");
    println!("    osm-processor <COMMAND> --help");
}
