//! AML Reporting Engine CLI
//!
//! Command-line interface for ingesting fixed-width AML master and
//! transaction files and producing the authority submission file.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- --config filer.toml --merchants merchants.txt --transactions tx.txt
//! cargo run -- --config filer.toml --transactions tx.txt --merchants m.txt --strategy sync
//! cargo run -- --config filer.toml --subjects subjects.txt --output out/submission.txt
//! cargo run -- --config filer.toml --transactions tx.txt --merchants m.txt \
//!     --error-report audit.csv --summary summary.json --batch-size 2000
//! ```
//!
//! The program ingests every input file it is given, resolving POS
//! transactions against the merchant master data, then writes the
//! fixed-width submission file (when the workflow status calls for output),
//! the CSV audit report of failed rows, and a JSON ingestion summary.
//!
//! # Ingestion Strategies
//!
//! - **sync**: Synchronous single-threaded streaming
//! - **async**: Asynchronous batch ingestion with multi-threaded resolution (default)
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (missing arguments, file not found, invalid configuration, etc.)

use aml_reporting_engine::cli;
use aml_reporting_engine::config::FilerConfig;
use aml_reporting_engine::io::{render_submission, write_error_report, LineEnding};
use aml_reporting_engine::strategy;
use aml_reporting_engine::types::{ReportError, SubmissionStatus};
use std::process;

fn main() {
    env_logger::init();

    let args = cli::parse_args();
    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: cli::CliArgs) -> Result<(), ReportError> {
    let filer = FilerConfig::load(&args.config)?;
    let status = SubmissionStatus::from_order(args.status)?;

    let inputs = args.to_input_set();
    let strategy = {
        let config = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_batch_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy, config)
    };

    let report = strategy.ingest(&inputs)?;
    log::info!(
        "ingestion finished: status {}, {} records collected, {} rows flagged",
        report.status,
        report.batch.record_count(),
        report.failed.len()
    );

    // The audit trail covers both ingestion failures and any truncation
    // warnings raised while rendering.
    let mut audit = report.failed.records.clone();

    if status.is_output_required() {
        let submission = render_submission(&report.batch, &filer, LineEnding::platform());
        std::fs::write(&args.output, &submission.content).map_err(|e| {
            ReportError::io(format!("failed to write '{}': {}", args.output.display(), e))
        })?;
        log::info!(
            "submission written to {} ({} lines)",
            args.output.display(),
            submission.line_count()
        );
        audit.extend(submission.warnings);
    } else {
        log::info!(
            "workflow status {} does not require output; submission not written",
            status
        );
    }

    if let Some(path) = &args.error_report {
        let file = std::fs::File::create(path).map_err(|e| {
            ReportError::report_write(format!("failed to create '{}': {}", path.display(), e))
        })?;
        write_error_report(&audit, file)?;
        log::info!("audit report written to {} ({} rows)", path.display(), audit.len());
    }

    let summary = serde_json::to_string_pretty(&report.summary())
        .map_err(|e| ReportError::report_write(e.to_string()))?;
    match &args.summary {
        Some(path) => std::fs::write(path, summary + "\n").map_err(|e| {
            ReportError::report_write(format!("failed to write '{}': {}", path.display(), e))
        })?,
        None => println!("{}", summary),
    }

    Ok(())
}
