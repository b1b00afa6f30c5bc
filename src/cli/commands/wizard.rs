use async_trait::async_trait;
use tracing::info;

use super::CommandHandler;
use crate::cli::tui;
use crate::config::AppConfig;
use crate::wizard::WizardController;
use crate::Result;

/// Handler for the `wizard` command
pub struct WizardCommand {
    pub config: AppConfig,
}

impl WizardCommand {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl CommandHandler for WizardCommand {
    async fn execute(&self) -> Result<()> {
        let (controller, job_rx) = WizardController::simulated(&self.config);
        info!(
            extraction_latency_ms = self.config.extraction.latency_ms,
            report_latency_ms = self.config.report.latency_ms,
            "Starting interactive wizard"
        );
        tui::run_wizard(controller, job_rx).await?;
        info!("Wizard closed");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "wizard"
    }
}
