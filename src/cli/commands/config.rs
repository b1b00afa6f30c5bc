use async_trait::async_trait;

use super::CommandHandler;
use crate::cli::app::OutputFormat;
use crate::config::LoadedConfig;
use crate::Result;

/// Handler for the `config` command
pub struct ConfigCommand {
    pub loaded: LoadedConfig,
    pub format: OutputFormat,
}

impl ConfigCommand {
    pub fn new(loaded: LoadedConfig, format: OutputFormat) -> Self {
        Self { loaded, format }
    }

    pub fn render(&self) -> Result<String> {
        let config = &self.loaded.config;
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(config)?),
            OutputFormat::Text => {
                let mut out = format!("# source: {}\n", self.loaded.source);
                out.push_str(&serde_yaml_ng::to_string(config)?);
                Ok(out)
            }
        }
    }
}

#[async_trait]
impl CommandHandler for ConfigCommand {
    async fn execute(&self) -> Result<()> {
        println!("{}", self.render()?);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "config"
    }
}
