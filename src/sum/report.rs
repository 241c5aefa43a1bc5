use crate::parallel::ExecutionStrategy;
use console::style;
use serde::Serialize;
use std::io::{self, Write};

/// Outcome of one summation run, handed to a [`SumReporter`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SumReport {
    /// Exclusive upper bound of the summed domain
    pub total: u64,
    /// Number of workers (ranges) actually used
    pub workers_used: usize,
    pub detected_concurrency: usize,
    pub strategy: ExecutionStrategy,
    pub result: u64,
    pub elapsed_ms: u128,
}

/// Receives a finished run's report
pub trait SumReporter {
    fn report(&mut self, report: &SumReport) -> io::Result<()>;
}

/// Human-readable report
pub struct TextReporter<W: Write> {
    out: W,
}

impl<W: Write> TextReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl TextReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> SumReporter for TextReporter<W> {
    fn report(&mut self, report: &SumReport) -> io::Result<()> {
        if report.total == 0 {
            writeln!(self.out, "{} Nothing to sum", style("ℹ").blue())?;
        } else {
            writeln!(self.out, "Summed numbers 0..{}", report.total - 1)?;
        }
        writeln!(
            self.out,
            "Workers used: {} (detected cores: {}, strategy: {})",
            style(report.workers_used).bold(),
            report.detected_concurrency,
            report.strategy
        )?;
        writeln!(self.out, "Result: {}", style(report.result).green().bold())?;
        writeln!(self.out, "{}", style(format!("Took {} ms", report.elapsed_ms)).dim())
    }
}

/// Single-line JSON report
pub struct JsonReporter<W: Write> {
    out: W,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl JsonReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> SumReporter for JsonReporter<W> {
    fn report(&mut self, report: &SumReport) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, report)?;
        writeln!(self.out)
    }
}

/// Emits the report as a structured `tracing` event
pub struct TracingReporter;

impl SumReporter for TracingReporter {
    fn report(&mut self, report: &SumReport) -> io::Result<()> {
        tracing::info!(
            total = report.total,
            workers_used = report.workers_used,
            detected_concurrency = report.detected_concurrency,
            strategy = %report.strategy,
            result = report.result,
            elapsed_ms = report.elapsed_ms as u64,
            "Parallel sum finished"
        );
        Ok(())
    }
}
