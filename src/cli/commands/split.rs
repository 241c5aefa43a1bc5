//! Split command implementation
//!
//! Prints the ranges `sum` would hand to its workers, without running
//! any of them.

use super::sum::DEFAULT_TOTAL;
use crate::cli::Output;
use crate::config::{CliOverrides, OutputFormat, ParsumConfig};
use crate::parallel::ExecutionStrategy;
use crate::sum::ParallelSum;
use anyhow::Result;
use clap::Args;

#[derive(Args, Debug)]
pub struct SplitArgs {
    /// Exclusive upper bound of the workload
    #[arg(short, long, default_value_t = DEFAULT_TOTAL)]
    pub total: u64,

    /// Number of workers (default: detected CPU cores)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Execution strategy to partition for (sequential uses one range)
    #[arg(short, long, value_enum)]
    pub strategy: Option<ExecutionStrategy>,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
}

/// Execute the split command
pub fn execute(args: SplitArgs, config_path: Option<&str>, output: &Output) -> Result<()> {
    let overrides = CliOverrides {
        workers: args.workers,
        strategy: args.strategy,
        format: args.format,
        ..CliOverrides::default()
    };
    let settings = ParsumConfig::load_with(config_path, Some(&overrides))?.settings()?;
    let (strategy, ranges) = ParallelSum::new(settings.parallel).ranges(args.total)?;

    if settings.output.format == OutputFormat::Json {
        println!("{}", serde_json::to_string(&ranges)?);
        return Ok(());
    }

    output.header(&format!(
        "Partition of [0, {}) into {} ranges (strategy: {strategy})",
        args.total,
        ranges.len()
    ));
    if ranges.is_empty() {
        output.info("Nothing to split");
        return Ok(());
    }
    for (index, range) in ranges.iter().enumerate() {
        output.table_row(&format!("worker {index}"), &format!("{range}  ({} items)", range.len()));
    }
    output.blank_line();
    output.key_value("Ranges:", &ranges.len().to_string(), true);

    Ok(())
}
