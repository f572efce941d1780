//! Process command implementation
//!
//! Loads configuration, discovers input files, runs them as one batch and
//! reports the result either as a colored summary or as JSON.

use super::shared::{create_spinner, discover_input_files, load_configuration, setup_logging};
use super::RunSummary;
use crate::app::services::batch::{BatchOrchestrator, BatchResult, FileResult, FileResultStatus};
use crate::cli::args::ProcessArgs;
use crate::config::Config;
use crate::{Error, Result};
use colored::Colorize;
use indicatif::HumanDuration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Process command runner
///
/// 1. Set up logging and validate arguments
/// 2. Load layered configuration and apply CLI overrides
/// 3. Discover input files and submit them as one batch
/// 4. Print the batch result
pub async fn run_process(args: ProcessArgs, cancellation: CancellationToken) -> Result<RunSummary> {
    setup_logging(args.get_log_level(), args.quiet)?;
    info!("Starting clinic panel processor");
    debug!("Command line arguments: {:?}", args);

    args.validate()?;

    let mut config = load_configuration(args.config_file.as_deref())?;
    apply_cli_overrides(&mut config, &args);
    config.validate()?;
    debug!("Loaded configuration: {:?}", config);

    let files = discover_input_files(&args.inputs)?;
    if files.is_empty() {
        return Err(Error::configuration(
            "No spreadsheet files found in the given inputs",
        ));
    }

    let orchestrator = tokio::task::spawn_blocking(move || BatchOrchestrator::from_config(config))
        .await
        .map_err(|e| Error::processing_interrupted(format!("Setup task failed: {}", e)))??
        .with_cancellation(cancellation);

    let spinner = args
        .show_progress()
        .then(|| create_spinner(&format!("Processing {} files", files.len())));
    let outcome = orchestrator.submit(files, args.batch_id.clone()).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let result = outcome?;

    if args.json {
        let json = serde_json::to_string_pretty(&result).map_err(|e| {
            Error::output_writing("Failed to serialize batch result", Box::new(e))
        })?;
        println!("{}", json);
    } else if !args.quiet {
        print_summary(&result);
    }

    Ok(RunSummary::from_batch(&result))
}

/// Apply CLI argument overrides to configuration
pub fn apply_cli_overrides(config: &mut Config, args: &ProcessArgs) {
    if let Some(output_dir) = &args.output_dir {
        config.processing.output_dir = output_dir.clone();
    }
    if let Some(workers) = args.workers {
        config.limits.workers = workers;
    }
    if let Some(format) = args.format {
        config.processing.output_format = format.into();
    }
    config
        .processing
        .termination_files
        .extend(args.termination.iter().cloned());
}

fn status_label(status: FileResultStatus) -> colored::ColoredString {
    match status {
        FileResultStatus::Success => "success".green().bold(),
        FileResultStatus::Partial => "partial".yellow().bold(),
        FileResultStatus::Failed => "failed".red().bold(),
    }
}

fn print_file(file: &FileResult) {
    println!(
        "  {} {} ({} records)",
        status_label(file.status),
        file.file.bright_white(),
        file.records_processed()
    );

    if let Some(error) = &file.error {
        println!("      {}", error.message.red());
    }
    for sheet in &file.sheets {
        match (&sheet.error, &sheet.geocoding_stats) {
            (Some(error), _) => println!(
                "      {} {}: {}",
                "x".red(),
                sheet.sheet_name,
                error.message
            ),
            (None, Some(geocoding)) => println!(
                "      {} {} [{}]: {} records, {} terminated, geocoded {}",
                "+".green(),
                sheet.sheet_name,
                sheet.format.map(|f| f.to_string()).unwrap_or_default(),
                sheet.records_processed,
                sheet.terminated_clinics_filtered,
                geocoding.success_rate
            ),
            (None, None) => {}
        }
    }
}

fn print_summary(result: &BatchResult) {
    let duration = result.duration().to_std().unwrap_or_default();

    println!();
    println!("{} {}", "Batch".bright_green().bold(), result.batch_id.bright_cyan());
    println!("{}", "━".repeat(48).bright_black());
    for file in &result.results {
        print_file(file);
    }
    println!("{}", "━".repeat(48).bright_black());
    println!(
        "  {} succeeded, {} partial, {} failed, {} records in {}",
        result.count(FileResultStatus::Success).to_string().green(),
        result.count(FileResultStatus::Partial).to_string().yellow(),
        result.count(FileResultStatus::Failed).to_string().red(),
        result.records_processed(),
        HumanDuration(duration)
    );

    let outputs: Vec<_> = result.results.iter().flat_map(FileResult::output_files).collect();
    if !outputs.is_empty() {
        println!("\n  {}", "Output files:".bright_white());
        for path in outputs {
            println!("    {}", path.display());
        }
    }
    println!();
}
