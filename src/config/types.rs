use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Effective configuration of the assistant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ConfigFile")]
pub struct AppConfig {
    /// Extraction job timing
    pub extraction: JobSettings,
    /// Report job timing
    pub report: JobSettings,
    /// Upload hints
    pub upload: UploadSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            extraction: JobSettings::new(3000),
            report: JobSettings::new(2000),
            upload: UploadSettings::default(),
        }
    }
}

/// On-disk shape of [`AppConfig`]: every field may be left out
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    extraction: PartialJobSettings,
    report: PartialJobSettings,
    upload: UploadSettings,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PartialJobSettings {
    latency_ms: Option<u64>,
    timeout_ms: Option<u64>,
}

impl PartialJobSettings {
    fn or(self, defaults: JobSettings) -> JobSettings {
        JobSettings {
            latency_ms: self.latency_ms.unwrap_or(defaults.latency_ms),
            timeout_ms: self.timeout_ms.unwrap_or(defaults.timeout_ms),
        }
    }
}

impl From<ConfigFile> for AppConfig {
    fn from(file: ConfigFile) -> Self {
        let defaults = AppConfig::default();
        Self {
            extraction: file.extraction.or(defaults.extraction),
            report: file.report.or(defaults.report),
            upload: file.upload,
        }
    }
}

/// Latency of the simulated collaborator and the hard timeout of the job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct JobSettings {
    pub latency_ms: u64,
    pub timeout_ms: u64,
}

impl JobSettings {
    pub fn new(latency_ms: u64) -> Self {
        Self {
            latency_ms,
            timeout_ms: default_timeout_ms(),
        }
    }

    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn default_timeout_ms() -> u64 {
    30_000
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadSettings {
    /// Extensions offered as a hint in the file prompt
    pub accepted_extensions: Vec<String>,
    /// Reject files outside `accepted_extensions` instead of only warning
    pub strict_accept: bool,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            accepted_extensions: ["pdf", "doc", "docx", "png", "jpg", "jpeg"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            strict_accept: false,
        }
    }
}

impl UploadSettings {
    /// Accept filter in the `.pdf,.doc` form
    pub fn accept_filter(&self) -> String {
        self.accepted_extensions
            .iter()
            .map(|ext| format!(".{}", ext.trim_start_matches('.')))
            .collect::<Vec<_>>()
            .join(",")
    }
}
