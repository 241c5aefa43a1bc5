//! Configuration command implementations
//!
//! Commands for inspecting and validating the merged parsum configuration.

use crate::cli::Output;
use crate::config::ParsumConfig;
use anyhow::Result;
use clap::{Subcommand, ValueEnum};

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the merged configuration
    Show {
        /// Output format
        #[arg(long, value_enum, default_value_t = ShowFormat::Toml)]
        format: ShowFormat,
    },
    /// Validate the merged configuration
    Validate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ShowFormat {
    Toml,
    Json,
}

/// Execute config commands
pub fn execute(cmd: ConfigCommands, config_path: Option<&str>, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show { format } => show(format, config_path),
        ConfigCommands::Validate => validate(config_path, output),
    }
}

fn show(format: ShowFormat, config_path: Option<&str>) -> Result<()> {
    let settings = ParsumConfig::load_with(config_path, None)?.settings()?;
    let rendered = match format {
        ShowFormat::Toml => toml::to_string_pretty(&settings)?,
        ShowFormat::Json => serde_json::to_string_pretty(&settings)?,
    };
    println!("{}", rendered.trim_end());
    Ok(())
}

fn validate(config_path: Option<&str>, output: &Output) -> Result<()> {
    output.header("✅ Validating Configuration");

    let config = ParsumConfig::load_with(config_path, None)?;
    match config.settings() {
        Ok(settings) => {
            output.success("Configuration is valid");
            output.category("Configuration Summary");
            output.table_row("Strategy", &settings.parallel.strategy.to_string());
            let workers = settings
                .parallel
                .workers
                .map_or_else(|| "auto".to_string(), |w| w.to_string());
            output.table_row("Workers", &workers);
            output.table_row("Thread percentage", &format!("{}%", settings.parallel.thread_percentage));
            output.table_row("Max threads", &settings.parallel.max_threads.to_string());
            Ok(())
        }
        Err(e) => {
            output.error(&format!("Configuration is invalid: {e:#}"));
            Err(e)
        }
    }
}
