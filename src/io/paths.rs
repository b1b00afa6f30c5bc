use crate::{DocAssistError, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Locations of the config file and log file
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Configuration directory
    pub config_dir: PathBuf,
    /// Data directory (logs)
    pub data_dir: PathBuf,
}

impl AppPaths {
    /// Create new paths instance using standard directories
    pub fn new() -> Result<Self> {
        let dirs = ProjectDirs::from("", "", "docassist").ok_or_else(|| {
            DocAssistError::Path("Failed to determine project directories".to_string())
        })?;

        Ok(Self {
            config_dir: dirs.config_dir().to_path_buf(),
            data_dir: dirs.data_dir().to_path_buf(),
        })
    }

    /// Paths rooted under a specific directory
    pub fn for_root(root: &Path) -> Self {
        let base = root.join(".docassist");
        Self {
            config_dir: base.clone(),
            data_dir: base.join("data"),
        }
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.yaml")
    }

    pub fn log_file(&self) -> PathBuf {
        self.data_dir.join("docassist.log")
    }

    /// Ensure all directories exist
    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.data_dir)?;
        Ok(())
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new().unwrap_or_else(|_| {
            // Fallback to current directory if platform directories fail
            let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            Self::for_root(&current_dir)
        })
    }
}
