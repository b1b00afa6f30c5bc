use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::logging::LogLevel;

/// docassist: extract what you need from a document and turn it into a report
#[derive(Parser)]
#[command(name = "docassist")]
#[command(version = "0.1.0")]
#[command(about = "Extract data from documents in plain English and generate reports")]
#[command(
    long_about = "docassist walks you through five steps: upload a document, describe the data you want, wait for extraction, preview the table and generate a report."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (overridden by DOCASSIST_LOG)
    #[arg(long, value_enum, default_value = "info", global = true)]
    pub log_level: LogLevel,
}

/// Output formats for headless commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive five-step wizard
    #[cfg(feature = "tui")]
    Wizard,

    /// Run the whole workflow without the interactive UI
    Process {
        /// Document to process
        #[arg(short, long)]
        file: PathBuf,

        /// What to extract, in plain English
        #[arg(short, long)]
        query: String,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Stop after the extraction preview
        #[arg(long)]
        skip_report: bool,

        /// Also trigger the download actions
        #[arg(long)]
        download: bool,
    },

    /// Show the effective configuration
    Config {
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl Commands {
    /// Get the command name as a string
    pub fn name(&self) -> &'static str {
        match self {
            #[cfg(feature = "tui")]
            Commands::Wizard => "wizard",
            Commands::Process { .. } => "process",
            Commands::Config { .. } => "config",
        }
    }

    /// Whether the command takes over the terminal
    pub fn is_interactive(&self) -> bool {
        match self {
            #[cfg(feature = "tui")]
            Commands::Wizard => true,
            _ => false,
        }
    }
}
