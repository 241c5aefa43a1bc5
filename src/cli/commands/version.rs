//! Version command implementation

use crate::cli::Output;
use crate::parallel::detected_concurrency;
use anyhow::Result;

/// Execute the version command
pub fn execute(output: &Output) -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");
    let name = env!("CARGO_PKG_NAME");
    let description = env!("CARGO_PKG_DESCRIPTION");

    output.header(&format!("{name} v{version}"));
    output.key_value("Description:", description, false);

    output.category("Build Information");
    output.key_value("Rust edition:", "2024", false);
    output.key_value("Target:", std::env::consts::ARCH, false);
    output.key_value("Profile:", if cfg!(debug_assertions) { "debug" } else { "release" }, false);

    output.category("Host");
    output.key_value("Detected cores:", &detected_concurrency().to_string(), true);

    Ok(())
}
