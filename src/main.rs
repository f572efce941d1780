use anyhow::Context;
use clap::Parser;
use clinic_panel_processor::cli::{args::Args, commands};
use std::process;
use tokio_util::sync::CancellationToken;

/// Exit code when the run finished but some files or lookups failed
const EXIT_INCOMPLETE: i32 = 2;

fn main() {
    let args = Args::parse();

    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    match run(args) {
        Ok(summary) if summary.is_clean() => process::exit(0),
        Ok(_) => process::exit(EXIT_INCOMPLETE),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

fn run(args: Args) -> anyhow::Result<commands::RunSummary> {
    let runtime = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;

    runtime.block_on(async {
        let cancellation_token = CancellationToken::new();

        // Ctrl-C cancels the batch; in-flight files are reported as interrupted
        let token = cancellation_token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("\nReceived CTRL+C, cancelling batch...");
                token.cancel();
            }
        });

        commands::run(args, cancellation_token)
            .await
            .context("Command failed")
    })
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Clinic Panel Processor");
    println!("======================");
    println!();
    println!("Normalize clinic-panel spreadsheets from different insurers into one");
    println!("geocoded record layout.");
    println!();
    println!("USAGE:");
    println!("    clinic-panel-processor <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    process     Process a batch of panel spreadsheets");
    println!("    geocode     Resolve a postal code or address to coordinates");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("EXAMPLES:");
    println!("    # Process every spreadsheet in a folder with 4 workers:");
    println!("    clinic-panel-processor process ./panels -o ./processed -j 4");
    println!();
    println!("    # Apply an extra termination list and print JSON:");
    println!("    clinic-panel-processor process gp.xlsx --termination removed.xlsx --json");
    println!();
    println!("    # Look up a postal code:");
    println!("    clinic-panel-processor geocode --postal-code 238823");
    println!();
    println!("For detailed help on any command, use:");
    println!("    clinic-panel-processor <COMMAND> --help");
}
