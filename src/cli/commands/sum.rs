//! Sum command implementation
//!
//! Resolves settings, runs the parallel sum, and hands the report to the
//! reporter matching the requested output format.

use crate::cli::Output;
use crate::config::{CliOverrides, OutputFormat, ParsumConfig};
use crate::parallel::ExecutionStrategy;
use crate::sum::{JsonReporter, ParallelSum, SumReporter, TextReporter, TracingReporter};
use anyhow::{Context, Result};
use clap::Args;

/// Default workload, numbers 0..99,999,999
pub const DEFAULT_TOTAL: u64 = 100_000_000;

#[derive(Args, Debug)]
pub struct SumArgs {
    /// Exclusive upper bound: sums every integer in [0, TOTAL)
    #[arg(short, long, default_value_t = DEFAULT_TOTAL)]
    pub total: u64,

    /// Number of workers (default: detected CPU cores)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// How workers are executed
    #[arg(short, long, value_enum)]
    pub strategy: Option<ExecutionStrategy>,

    /// Show a progress bar while workers complete
    #[arg(long)]
    pub progress: bool,

    /// Report format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
}

/// Execute the sum command
pub fn execute(args: SumArgs, config_path: Option<&str>, output: &Output) -> Result<()> {
    let overrides = CliOverrides {
        workers: args.workers,
        strategy: args.strategy,
        progress: args.progress,
        format: args.format,
    };
    let settings = ParsumConfig::load_with(config_path, Some(&overrides))?.settings()?;
    let format = settings.output.format;

    let orchestrator = ParallelSum::new(settings.parallel.clone())
        .with_progress(settings.output.progress && format == OutputFormat::Text && !output.is_quiet());
    output.verbose(&format!(
        "Requesting {} workers ({} detected cores, strategy {})",
        orchestrator.degree(),
        orchestrator.detected_concurrency(),
        settings.parallel.strategy
    ));

    let report = orchestrator
        .run(args.total)
        .with_context(|| format!("Failed to sum numbers 0..{}", args.total))?;

    TracingReporter.report(&report)?;
    match format {
        OutputFormat::Json => JsonReporter::stdout().report(&report)?,
        // Quiet text output is just the number, for scripts
        OutputFormat::Text if output.is_quiet() => println!("{}", report.result),
        OutputFormat::Text => TextReporter::stdout().report(&report)?,
    }

    Ok(())
}
