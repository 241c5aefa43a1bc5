use figment::Provider;
use figment::providers::{Format, Json, Toml, Yaml};
use std::path::Path;

/// Configuration file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Toml,
    Json,
    Yaml,
}

/// Pick a provider for `path` from its extension, sniffing the content when
/// the extension is unknown
pub fn auto<P: AsRef<Path>>(path: P) -> impl Provider {
    let path = path.as_ref();
    let format = format_from_extension(path).unwrap_or_else(|| {
        let detected = std::fs::read_to_string(path)
            .ok()
            .and_then(|content| detect_format_from_content(&content));
        match detected {
            Some(format) => {
                tracing::debug!(?format, path = %path.display(), "Detected config format from content");
                format
            }
            None => {
                tracing::debug!(path = %path.display(), "Could not detect config format, defaulting to TOML");
                FileFormat::Toml
            }
        }
    });

    match format {
        FileFormat::Toml => SmartProvider::Toml(Toml::file(path)),
        FileFormat::Json => SmartProvider::Json(Json::file(path)),
        FileFormat::Yaml => SmartProvider::Yaml(Yaml::file(path)),
    }
}

fn format_from_extension(path: &Path) -> Option<FileFormat> {
    let extension = path.extension()?.to_str()?.to_lowercase();
    match extension.as_str() {
        "toml" => Some(FileFormat::Toml),
        "json" => Some(FileFormat::Json),
        "yaml" | "yml" => Some(FileFormat::Yaml),
        _ => None,
    }
}

/// Wrapper enum to handle different provider types
enum SmartProvider {
    Toml(figment::providers::Data<Toml>),
    Json(figment::providers::Data<Json>),
    Yaml(figment::providers::Data<Yaml>),
}

impl Provider for SmartProvider {
    fn metadata(&self) -> figment::Metadata {
        match self {
            SmartProvider::Toml(p) => p.metadata(),
            SmartProvider::Json(p) => p.metadata(),
            SmartProvider::Yaml(p) => p.metadata(),
        }
    }

    fn data(
        &self,
    ) -> Result<figment::value::Map<figment::Profile, figment::value::Dict>, figment::Error> {
        match self {
            SmartProvider::Toml(p) => p.data(),
            SmartProvider::Json(p) => p.data(),
            SmartProvider::Yaml(p) => p.data(),
        }
    }
}

/// Attempt to detect configuration format from file content
fn detect_format_from_content(content: &str) -> Option<FileFormat> {
    let trimmed = content.trim();

    // JSON: a single object or array
    if (trimmed.starts_with('{') && trimmed.ends_with('}'))
        || (trimmed.starts_with('[') && trimmed.ends_with(']'))
    {
        return Some(FileFormat::Json);
    }

    // TOML: table headers or `key = value` lines
    if trimmed.lines().any(|line| {
        let line = line.trim();
        (line.starts_with('[') && line.ends_with(']')) || (line.contains('=') && !line.contains(':'))
    }) {
        return Some(FileFormat::Toml);
    }

    // YAML: document separator or `key: value` lines
    if trimmed.starts_with("---") || trimmed.lines().any(|line| line.trim().contains(':')) {
        return Some(FileFormat::Yaml);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use figment::Figment;

    #[test]
    fn test_format_detection() {
        assert_eq!(detect_format_from_content(r#"{"key": "value"}"#), Some(FileFormat::Json));
        assert_eq!(detect_format_from_content("key: value"), Some(FileFormat::Yaml));
        assert_eq!(detect_format_from_content("[section]\nkey = 1"), Some(FileFormat::Toml));
        assert_eq!(detect_format_from_content("key = 1"), Some(FileFormat::Toml));
        assert_eq!(detect_format_from_content("plain words"), None);
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(format_from_extension(Path::new("a.TOML")), Some(FileFormat::Toml));
        assert_eq!(format_from_extension(Path::new("a.yml")), Some(FileFormat::Yaml));
        assert_eq!(format_from_extension(Path::new("a.json")), Some(FileFormat::Json));
        assert_eq!(format_from_extension(Path::new("parsumrc")), None);
    }

    #[test]
    fn test_unknown_extension_is_sniffed() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("parsumrc");
        std::fs::write(&path, "parallel:\n  workers: 5\n").unwrap();

        let settings: Settings = Figment::new().merge(auto(&path)).extract().unwrap();
        assert_eq!(settings.parallel.workers, Some(5));
    }
}
