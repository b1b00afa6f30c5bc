use std::path::PathBuf;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};

use super::CommandHandler;
use crate::cli::app::OutputFormat;
use crate::config::AppConfig;
use crate::wizard::{Action, ExtractionResult, FileDescriptor, Notice, Report, WizardController};
use crate::{DocAssistError, Result};

/// Handler for the `process` command
pub struct ProcessCommand {
    pub config: AppConfig,
    pub file: PathBuf,
    pub query: String,
    pub format: OutputFormat,
    pub skip_report: bool,
    pub download: bool,
}

/// Everything the headless run produced
#[derive(Debug, Serialize)]
pub struct ProcessOutput {
    pub file: FileDescriptor,
    pub query: String,
    pub extraction: ExtractionResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<Report>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notices: Vec<Notice>,
}

impl ProcessCommand {
    /// Drive the wizard from upload to report without a UI
    pub async fn run(&self) -> Result<ProcessOutput> {
        let (mut controller, mut events) = WizardController::simulated(&self.config);
        let mut notices = controller.select_path(&self.file)?;

        controller.dispatch(Action::EditQuery(self.query.clone()))?;
        controller.dispatch(Action::SubmitQuery)?;
        controller.run_until_idle(&mut events).await?;
        if let Some(failure) = controller.state().failure.clone() {
            return Err(failure.into_error());
        }

        if self.download {
            notices.extend(controller.dispatch(Action::DownloadSpreadsheet)?);
        }

        if !self.skip_report {
            controller.dispatch(Action::RequestReport)?;
            controller.run_until_idle(&mut events).await?;
            if let Some(failure) = controller.state().failure.clone() {
                return Err(failure.into_error());
            }
            if self.download {
                notices.extend(controller.dispatch(Action::DownloadReport)?);
            }
        }

        let state = controller.state().clone();
        info!(step = state.step.index(), "Headless run finished");

        Ok(ProcessOutput {
            file: state
                .file
                .ok_or_else(|| anyhow::anyhow!("wizard finished without a file"))?,
            query: state.query,
            extraction: state
                .extraction
                .ok_or_else(|| anyhow::anyhow!("wizard finished without an extraction"))?,
            report: state.report,
            notices,
        })
    }
}

/// Render the headless output
pub fn render(output: &ProcessOutput, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(output)?);
    }

    let mut out = String::new();
    out.push_str(&format!("Document: {} ({})\n", output.file.name, output.file.display_size()));
    out.push_str(&format!("Query:    {}\n\n", output.query.trim()));

    out.push_str("Extracted Data Preview\n");
    out.push_str(&format!(
        "Rows: {}    Columns: {}\n",
        output.extraction.row_count,
        output.extraction.column_count()
    ));
    out.push_str(&format_table(&output.extraction.columns, &output.extraction.preview_rows));

    if let Some(report) = &output.report {
        out.push('\n');
        out.push_str(&format!("{}\n\n", report.title));
        out.push_str("Executive Summary\n");
        out.push_str(&format!("{}\n\n", report.summary));
        out.push_str("Key Metrics\n");
        for metric in &report.metrics {
            out.push_str(&format!("  • {}: {}\n", metric.label, metric.value));
        }
    }

    for notice in &output.notices {
        out.push_str(&format!("\n{}: {}", notice.title, notice.message));
    }

    Ok(out)
}

/// What the user can do about a failed headless run
pub fn error_hint(err: &DocAssistError) -> &'static str {
    if err.is_retryable() {
        "The job did not complete; run the command again or raise the timeout in the config file"
    } else {
        "Check the document path and query, then run the command again"
    }
}

/// Plain-text table with padded columns
pub fn format_table(columns: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
    for row in rows {
        for (idx, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(idx) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut out = line(columns);
    out.push('\n');
    out.push_str(
        &widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    out.push('\n');
    for row in rows {
        out.push_str(&line(row));
        out.push('\n');
    }
    out
}

#[async_trait]
impl CommandHandler for ProcessCommand {
    async fn execute(&self) -> Result<()> {
        let output = match self.run().await {
            Ok(output) => output,
            Err(e) => {
                warn!(retryable = e.is_retryable(), "{}", error_hint(&e));
                return Err(e);
            }
        };
        println!("{}", render(&output, self.format)?);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "process"
    }
}
