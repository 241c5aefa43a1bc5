//! Configuration management for parsum
//!
//! Settings are layered with figment: embedded defaults, user and project
//! files in TOML, JSON or YAML, `PARSUM_*` environment variables, and
//! finally command line overrides. See [`core::ParsumConfig`].

pub mod core;
pub mod overrides;
pub mod smart_load;

pub use self::core::ParsumConfig;
pub use overrides::CliOverrides;

use crate::parallel::ExecutionStrategy;
use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

/// Fully resolved configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub parallel: ParallelSettings,
    #[serde(default)]
    pub output: OutputSettings,
}

/// How work is fanned out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallelSettings {
    pub strategy: ExecutionStrategy,

    /// Explicit parallelism degree; overrides core detection when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workers: Option<usize>,

    /// Upper bound on detected workers (0 = no limit)
    pub max_threads: usize,

    /// Percentage of detected cores to use (1-100)
    pub thread_percentage: u8,

    /// Workloads smaller than this run sequentially
    pub min_parallel_total: u64,
}

impl Default for ParallelSettings {
    fn default() -> Self {
        Self {
            strategy: ExecutionStrategy::Threads,
            workers: None,
            max_threads: 0,
            thread_percentage: 100,
            min_parallel_total: 0,
        }
    }
}

/// Report rendering
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub progress: bool,
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl Settings {
    /// Reject values the executor cannot honour
    pub fn validate(&self) -> Result<()> {
        let parallel = &self.parallel;
        if !(1..=100).contains(&parallel.thread_percentage) {
            bail!(
                "parallel.thread_percentage must be between 1 and 100, got {}",
                parallel.thread_percentage
            );
        }
        if parallel.workers == Some(0) {
            bail!("parallel.workers must be at least 1");
        }
        Ok(())
    }
}
