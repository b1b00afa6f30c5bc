/// Terminal User Interface module for interactive commands
pub mod assistant;

use tokio::sync::mpsc::UnboundedReceiver;

use crate::jobs::JobEvent;
use crate::wizard::WizardController;
use crate::Result;

/// Run the interactive document assistant
pub async fn run_wizard(controller: WizardController, job_rx: UnboundedReceiver<JobEvent>) -> Result<()> {
    assistant::run(controller, job_rx).await
}
