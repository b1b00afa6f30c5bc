pub mod loader;
pub mod types;

pub use loader::{ConfigLoader, ConfigSource, LoadedConfig};
pub use types::{AppConfig, JobSettings, UploadSettings};
