use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::types::{AppConfig, JobSettings};
use crate::io::AppPaths;
use crate::{DocAssistError, Result};

/// Where the effective configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Path given with `--config`
    Explicit(PathBuf),
    /// Found in the platform config directory
    Discovered(PathBuf),
    /// No file, built-in defaults
    Defaults,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Explicit(path) => write!(f, "{}", path.display()),
            ConfigSource::Discovered(path) => write!(f, "{} (discovered)", path.display()),
            ConfigSource::Defaults => write!(f, "built-in defaults"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: AppConfig,
    pub source: ConfigSource,
}

/// Configuration loader
pub struct ConfigLoader {
    paths: AppPaths,
}

impl ConfigLoader {
    pub fn new(paths: AppPaths) -> Self {
        Self { paths }
    }

    /// Resolve the configuration: explicit path, then the discovered file,
    /// then defaults
    pub fn load(&self, explicit: Option<&Path>) -> Result<LoadedConfig> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(DocAssistError::Config(format!(
                    "Config file {} does not exist",
                    path.display()
                )));
            }
            let config = Self::load_file(path)?;
            info!(path = %path.display(), "Loaded configuration");
            return Ok(LoadedConfig {
                config,
                source: ConfigSource::Explicit(path.to_path_buf()),
            });
        }

        let discovered = self.paths.config_file();
        if discovered.exists() {
            let config = Self::load_file(&discovered)?;
            info!(path = %discovered.display(), "Loaded discovered configuration");
            return Ok(LoadedConfig {
                config,
                source: ConfigSource::Discovered(discovered),
            });
        }

        debug!(looked_at = %discovered.display(), "No config file, using defaults");
        Ok(LoadedConfig {
            config: AppConfig::default(),
            source: ConfigSource::Defaults,
        })
    }

    /// Read, parse and validate one YAML file
    pub fn load_file(path: &Path) -> Result<AppConfig> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            DocAssistError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<AppConfig> {
        let mut config: AppConfig = if contents.trim().is_empty() {
            AppConfig::default()
        } else {
            serde_yaml_ng::from_str(contents)?
        };

        config.upload.accepted_extensions = config
            .upload
            .accepted_extensions
            .iter()
            .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();

        validate_job("extraction", &config.extraction)?;
        validate_job("report", &config.report)?;

        if config.upload.strict_accept && config.upload.accepted_extensions.is_empty() {
            return Err(DocAssistError::Config(
                "upload.strict_accept requires at least one accepted extension".to_string(),
            ));
        }

        Ok(config)
    }
}

fn validate_job(section: &str, settings: &JobSettings) -> Result<()> {
    if settings.timeout_ms == 0 {
        return Err(DocAssistError::Config(format!("{}.timeout_ms must be greater than 0", section)));
    }
    if settings.latency_ms >= settings.timeout_ms {
        return Err(DocAssistError::Config(format!(
            "{}.latency_ms ({}) must be below {}.timeout_ms ({})",
            section, settings.latency_ms, section, settings.timeout_ms
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_document_gives_defaults() {
        assert_eq!(ConfigLoader::parse("").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_partial_document_keeps_other_defaults() {
        let config = ConfigLoader::parse("report:\n  latency_ms: 50\n").unwrap();
        assert_eq!(config.report.latency_ms, 50);
        assert_eq!(config.report.timeout_ms, 30_000);
        assert_eq!(config.extraction, AppConfig::default().extraction);
        assert_eq!(config.upload.accepted_extensions.len(), 6);
    }

    #[test]
    fn test_missing_latency_keeps_section_default() {
        let config = ConfigLoader::parse("extraction:\n  timeout_ms: 60000\n").unwrap();
        assert_eq!(config.extraction.latency_ms, 3000);
        assert_eq!(config.extraction.timeout_ms, 60_000);

        let config = ConfigLoader::parse("report:\n  timeout_ms: 45000\n").unwrap();
        assert_eq!(config.report.latency_ms, 2000);
        assert_eq!(config.report.timeout_ms, 45_000);
        assert_eq!(config.extraction, AppConfig::default().extraction);
    }

    #[test]
    fn test_extensions_are_normalized() {
        let yaml = "upload:\n  accepted_extensions: ['.PDF', ' csv ', '']\n";
        let config = ConfigLoader::parse(yaml).unwrap();
        assert_eq!(config.upload.accepted_extensions, vec!["pdf", "csv"]);
        assert_eq!(config.upload.accept_filter(), ".pdf,.csv");
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let err = ConfigLoader::parse("extraction:\n  latency_ms: 0\n  timeout_ms: 0\n").unwrap_err();
        assert!(matches!(err, DocAssistError::Config(ref m) if m.contains("timeout_ms")));
    }

    #[test]
    fn test_rejects_latency_not_below_timeout() {
        let err = ConfigLoader::parse("report:\n  latency_ms: 5000\n  timeout_ms: 5000\n").unwrap_err();
        assert!(matches!(err, DocAssistError::Config(_)));
    }

    #[test]
    fn test_malformed_yaml_is_a_yaml_error() {
        let err = ConfigLoader::parse("extraction: [1, 2").unwrap_err();
        assert!(matches!(err, DocAssistError::Yaml(_)));
    }
}
