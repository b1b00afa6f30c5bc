/// Interactive document assistant implementation
pub mod app;
pub mod events;
pub mod modal;
pub mod screens;
pub mod state;
pub mod theme;

use tokio::sync::mpsc::UnboundedReceiver;

use crate::jobs::JobEvent;
use crate::wizard::WizardController;
use crate::Result;

/// Entry point for the assistant
pub async fn run(controller: WizardController, job_rx: UnboundedReceiver<JobEvent>) -> Result<()> {
    let app = app::App::new(controller);
    app.run(job_rx).await
}
