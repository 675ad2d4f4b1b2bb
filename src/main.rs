use clap::Parser;
use mlife_processor::cli::{args::Args, commands};
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    // Create async runtime and run the main command logic
    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(commands::run(args));

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
    println!("m.life Processor - ICU Export Normalizer");
    println!("========================================");
    println!();
    println!("Consolidate heterogeneous m.life ICU export records into one normalized");
    println!("long-format table, optionally de-identifying text fields.");
    println!();
    println!("USAGE:");
    println!("    mlife-processor <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    process     Process an export into the normalized table (main command)");
    println!("    check       Validate an export and print diagnostics");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Normalize an export:");
    println!("    mlife-processor process patient_4711.txt -o patient_4711_table.csv");
    println!();
    println!("    # Normalize and de-identify with a blacklist:");
    println!("    mlife-processor process patient_4711.txt --deidentify \\");
    println!("                            --model de_clinical_lexicon.json --blacklist blacklist.txt");
    println!();
    println!("    # Validate an export without writing output:");
    println!("    mlife-processor check patient_4711.txt");
    println!();
    println!("For detailed help on any command, use:");
    println!("    mlife-processor <COMMAND> --help");
}
