//! Command implementations for the parsum CLI
//!
//! Each command is organized into its own module.

pub mod config;
pub mod split;
pub mod sum;
pub mod version;
