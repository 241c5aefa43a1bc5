use super::overrides::CliOverrides;
use super::{Settings, smart_load};
use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
};

// Embed the default config at compile time
const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

/// Environment variable prefix; nested keys use `__` (`PARSUM_PARALLEL__MAX_THREADS`)
pub const ENV_PREFIX: &str = "PARSUM_";

pub struct ParsumConfig {
    figment: Figment,
}

impl ParsumConfig {
    pub fn load() -> Result<Self> {
        Self::load_with(None, None)
    }

    /// Build the layered configuration
    ///
    /// A custom config file replaces the user and project files; defaults,
    /// environment variables and CLI overrides always apply.
    pub fn load_with(custom_config: Option<&str>, cli_overrides: Option<&CliOverrides>) -> Result<Self> {
        tracing::trace!("CONFIG LOAD: Starting");

        let mut figment = Figment::new().merge(Toml::string(DEFAULT_CONFIG)); // Embedded defaults

        if let Some(custom_path) = custom_config {
            if !std::path::Path::new(custom_path).exists() {
                anyhow::bail!("Config file not found: {custom_path}");
            }
            figment = figment.merge(smart_load::auto(custom_path));
        } else {
            let user = Self::user_config_base_path();
            figment = figment
                // User config - support multiple formats
                .merge(Toml::file(format!("{user}.toml")))
                .merge(Json::file(format!("{user}.json")))
                .merge(Yaml::file(format!("{user}.yaml")))
                .merge(Yaml::file(format!("{user}.yml")))
                // Project config - support multiple formats
                .merge(Toml::file("parsum.toml"))
                .merge(Json::file("parsum.json"))
                .merge(Yaml::file("parsum.yaml"))
                .merge(Yaml::file("parsum.yml"));
        }

        // Environment variables override files
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        // CLI flags have the highest priority
        if let Some(overrides) = cli_overrides {
            tracing::trace!("CONFIG LOAD: Applying CLI overrides");
            figment = figment.merge(Serialized::defaults(overrides.layer()));
        }

        Ok(ParsumConfig { figment })
    }

    /// Extract and validate typed settings
    pub fn settings(&self) -> Result<Settings> {
        let settings: Settings = self
            .figment
            .extract()
            .context("Failed to parse configuration")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Get a nested object/section as JSON
    pub fn get_section(&self, path: &str) -> Result<serde_json::Value> {
        Ok(self.figment.extract_inner(path)?)
    }

    /// Get the full merged configuration as a structured value
    pub fn get_full_config(&self) -> Result<serde_json::Value> {
        Ok(self.figment.extract()?)
    }

    fn user_config_base_path() -> String {
        match std::env::var("HOME") {
            Ok(home) => format!("{home}/.config/parsum/config"),
            Err(_) => "~/.config/parsum/config".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use crate::parallel::ExecutionStrategy;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_embedded_defaults_match_settings_default() {
        let figment = Figment::new().merge(Toml::string(DEFAULT_CONFIG));
        let settings: Settings = figment.extract().unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_custom_toml_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("custom.toml");
        fs::write(
            &path,
            "[parallel]\nstrategy = \"pool\"\nworkers = 3\n\n[output]\nformat = \"json\"\n",
        )
        .unwrap();

        let config = ParsumConfig::load_with(path.to_str(), None).unwrap();
        let settings = config.settings().unwrap();
        assert_eq!(settings.parallel.strategy, ExecutionStrategy::Pool);
        assert_eq!(settings.parallel.workers, Some(3));
        assert_eq!(settings.output.format, OutputFormat::Json);
        // Untouched keys keep their defaults
        assert_eq!(settings.parallel.thread_percentage, 100);
    }

    #[test]
    fn test_custom_yaml_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("custom.yaml");
        fs::write(&path, "parallel:\n  max_threads: 2\n  thread_percentage: 50\n").unwrap();

        let settings = ParsumConfig::load_with(path.to_str(), None)
            .unwrap()
            .settings()
            .unwrap();
        assert_eq!(settings.parallel.max_threads, 2);
        assert_eq!(settings.parallel.thread_percentage, 50);
    }

    #[test]
    fn test_cli_overrides_win_over_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("custom.json");
        fs::write(&path, r#"{"parallel": {"workers": 2, "strategy": "pool"}}"#).unwrap();

        let overrides = CliOverrides {
            workers: Some(6),
            strategy: Some(ExecutionStrategy::Sequential),
            ..CliOverrides::default()
        };
        let settings = ParsumConfig::load_with(path.to_str(), Some(&overrides))
            .unwrap()
            .settings()
            .unwrap();
        assert_eq!(settings.parallel.workers, Some(6));
        assert_eq!(settings.parallel.strategy, ExecutionStrategy::Sequential);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.toml");
        fs::write(&path, "[parallel]\nthread_percentage = 0\n").unwrap();

        let config = ParsumConfig::load_with(path.to_str(), None).unwrap();
        assert!(config.settings().is_err());
    }

    #[test]
    fn test_missing_custom_config_is_an_error() {
        assert!(ParsumConfig::load_with(Some("does/not/exist.toml"), None).is_err());
    }

    #[test]
    fn test_get_section() {
        let config = ParsumConfig::load().unwrap();
        let output = config.get_section("output").unwrap();
        assert!(output.get("format").is_some());
        assert!(config.get_full_config().unwrap().get("parallel").is_some());
    }
}
