use anyhow::Context;
use clap::Parser;
use tracing::{debug, error};

use docassist::{
    cli::commands::{config::ConfigCommand, process::ProcessCommand, CommandHandler},
    cli::{Cli, Commands},
    config::ConfigLoader,
    io::AppPaths,
    logging,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let paths = AppPaths::default();

    if cli.command.is_interactive() {
        paths
            .ensure_directories()
            .context("Failed to create the docassist directories")?;
        logging::init_file(cli.log_level, &paths.log_file())
            .context("Failed to open the log file")?;
    } else {
        logging::init_stderr(cli.log_level);
    }

    let loaded = ConfigLoader::new(paths).load(cli.config.as_deref())?;
    debug!(source = %loaded.source, "Configuration loaded");

    let handler: Box<dyn CommandHandler + Send + Sync> = match cli.command {
        #[cfg(feature = "tui")]
        Commands::Wizard => Box::new(docassist::cli::commands::wizard::WizardCommand::new(
            loaded.config,
        )),
        Commands::Process {
            file,
            query,
            format,
            skip_report,
            download,
        } => Box::new(ProcessCommand {
            config: loaded.config,
            file,
            query,
            format,
            skip_report,
            download,
        }),
        Commands::Config { format } => Box::new(ConfigCommand::new(loaded, format)),
    };

    if let Err(e) = handler.execute().await {
        error!(command = handler.name(), "Command failed: {}", e);
        return Err(e.into());
    }
    Ok(())
}
