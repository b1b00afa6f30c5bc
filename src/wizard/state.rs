use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::jobs::{JobFailure, JobId};
use crate::{DocAssistError, Result};

/// Wizard steps, in the only order they can be visited
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Step {
    AwaitUpload,
    AwaitQuery,
    Extracting,
    PreviewReady,
    ReportReady,
}

impl Step {
    pub const ALL: [Step; 5] = [
        Step::AwaitUpload,
        Step::AwaitQuery,
        Step::Extracting,
        Step::PreviewReady,
        Step::ReportReady,
    ];

    /// 1-based step number
    pub fn index(&self) -> u8 {
        match self {
            Step::AwaitUpload => 1,
            Step::AwaitQuery => 2,
            Step::Extracting => 3,
            Step::PreviewReady => 4,
            Step::ReportReady => 5,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Step::AwaitUpload => "Upload Document",
            Step::AwaitQuery => "Describe Extraction",
            Step::Extracting => "Processing Document",
            Step::PreviewReady => "Extracted Data Preview",
            Step::ReportReady => "Actionable Report",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Step::ReportReady)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Step {}: {}", self.index(), self.name())
    }
}

/// The chosen document. Set once, never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    pub name: String,
    pub size_bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl FileDescriptor {
    pub fn new(name: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            name: name.into(),
            size_bytes,
            path: None,
        }
    }

    /// Describe a file on disk. Only metadata is read, never the content.
    pub fn from_path(path: &Path) -> Result<Self> {
        let metadata = std::fs::metadata(path).map_err(|e| DocAssistError::InvalidFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        if !metadata.is_file() {
            return Err(DocAssistError::InvalidFile {
                path: path.to_path_buf(),
                reason: "not a regular file".to_string(),
            });
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| DocAssistError::InvalidFile {
                path: path.to_path_buf(),
                reason: "path has no file name".to_string(),
            })?;

        Ok(Self {
            name,
            size_bytes: metadata.len(),
            path: Some(path.to_path_buf()),
        })
    }

    /// Lowercased extension without the dot
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
    }

    /// Whether the extension is in the accept list. Advisory only.
    pub fn matches_accept_filter(&self, accepted: &[String]) -> bool {
        match self.extension() {
            Some(ext) => accepted
                .iter()
                .any(|a| a.trim_start_matches('.').eq_ignore_ascii_case(&ext)),
            None => false,
        }
    }

    pub fn size_mb(&self) -> f64 {
        self.size_bytes as f64 / 1024.0 / 1024.0
    }

    /// Size as shown to the user, e.g. `1.25 MB`
    pub fn display_size(&self) -> String {
        format!("{:.2} MB", self.size_mb())
    }
}

/// Structured table produced by an extraction job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub row_count: usize,
    pub columns: Vec<String>,
    pub preview_rows: Vec<Vec<String>>,
}

impl ExtractionResult {
    /// Build a result, checking every preview row against the column count
    pub fn new(row_count: usize, columns: Vec<String>, preview_rows: Vec<Vec<String>>) -> Result<Self> {
        if columns.is_empty() {
            return Err(DocAssistError::InvalidExtraction("no columns".to_string()));
        }
        if let Some((idx, row)) = preview_rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != columns.len())
        {
            return Err(DocAssistError::InvalidExtraction(format!(
                "preview row {} has {} cells, expected {}",
                idx,
                row.len(),
                columns.len()
            )));
        }
        if preview_rows.len() > row_count {
            return Err(DocAssistError::InvalidExtraction(format!(
                "{} preview rows exceed row count {}",
                preview_rows.len(),
                row_count
            )));
        }

        Ok(Self {
            row_count,
            columns,
            preview_rows,
        })
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

/// One labelled figure in a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metric {
    pub label: String,
    pub value: String,
}

impl Metric {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Report produced from an extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub title: String,
    pub summary: String,
    pub metrics: Vec<Metric>,
    pub generated_at: DateTime<Utc>,
}

impl Report {
    pub fn metric(&self, label: &str) -> Option<&str> {
        self.metrics
            .iter()
            .find(|m| m.label == label)
            .map(|m| m.value.as_str())
    }
}

/// Confirmation surfaced to the user, e.g. after a download
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Immutable snapshot of the wizard. Transitions produce a new snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WizardState {
    pub step: Step,
    pub file: Option<FileDescriptor>,
    pub query: String,
    pub pending_job: Option<JobId>,
    pub extraction: Option<ExtractionResult>,
    pub report: Option<Report>,
    pub failure: Option<JobFailure>,
}

impl Default for WizardState {
    fn default() -> Self {
        Self {
            step: Step::AwaitUpload,
            file: None,
            query: String::new(),
            pending_job: None,
            extraction: None,
            report: None,
            failure: None,
        }
    }
}

impl WizardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// A job is in flight
    pub fn is_busy(&self) -> bool {
        self.pending_job.is_some()
    }

    pub fn report_ready(&self) -> bool {
        self.report.is_some()
    }

    /// Extraction control is enabled only for non-blank queries at step 2
    pub fn can_submit_query(&self) -> bool {
        self.step == Step::AwaitQuery && !self.query.trim().is_empty()
    }

    /// A failed, timed out or cancelled job can be restarted
    pub fn can_retry(&self) -> bool {
        !self.is_busy()
            && self.failure.is_some()
            && matches!(self.step, Step::Extracting | Step::ReportReady)
    }

    /// Whether the step indicator should show `step` as reached
    pub fn has_reached(&self, step: Step) -> bool {
        self.step >= step
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_step_order_and_index() {
        let indices: Vec<u8> = Step::ALL.iter().map(|s| s.index()).collect();
        assert_eq!(indices, vec![1, 2, 3, 4, 5]);
        assert!(Step::AwaitUpload < Step::ReportReady);
        assert!(Step::ReportReady.is_terminal());
        assert!(!Step::PreviewReady.is_terminal());
    }

    #[test]
    fn test_file_descriptor_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Contracts.PDF");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(&vec![0u8; 2048]).unwrap();

        let desc = FileDescriptor::from_path(&path).unwrap();
        assert_eq!(desc.name, "Contracts.PDF");
        assert_eq!(desc.size_bytes, 2048);
        assert_eq!(desc.extension().as_deref(), Some("pdf"));
    }

    #[test]
    fn test_file_descriptor_rejects_directory_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileDescriptor::from_path(dir.path()).unwrap_err();
        assert!(matches!(err, DocAssistError::InvalidFile { .. }));

        let err = FileDescriptor::from_path(&dir.path().join("missing.pdf")).unwrap_err();
        assert!(matches!(err, DocAssistError::InvalidFile { .. }));
    }

    #[test]
    fn test_accept_filter_is_case_insensitive() {
        let accepted = vec![".pdf".to_string(), "docx".to_string()];
        assert!(FileDescriptor::new("a.PDF", 1).matches_accept_filter(&accepted));
        assert!(FileDescriptor::new("b.docx", 1).matches_accept_filter(&accepted));
        assert!(!FileDescriptor::new("c.csv", 1).matches_accept_filter(&accepted));
        assert!(!FileDescriptor::new("noext", 1).matches_accept_filter(&accepted));
    }

    #[test]
    fn test_display_size() {
        assert_eq!(FileDescriptor::new("a.pdf", 1_310_720).display_size(), "1.25 MB");
        assert_eq!(FileDescriptor::new("a.pdf", 0).display_size(), "0.00 MB");
    }

    #[test]
    fn test_extraction_result_checks_row_width() {
        let columns = vec!["A".to_string(), "B".to_string()];
        let err = ExtractionResult::new(2, columns.clone(), vec![vec!["1".to_string()]]).unwrap_err();
        assert!(matches!(err, DocAssistError::InvalidExtraction(_)));

        let ok = ExtractionResult::new(2, columns, vec![vec!["1".to_string(), "2".to_string()]]).unwrap();
        assert_eq!(ok.column_count(), 2);
    }

    #[test]
    fn test_query_gate_ignores_whitespace() {
        let mut state = WizardState {
            step: Step::AwaitQuery,
            ..WizardState::default()
        };
        state.query = "   \t\n".to_string();
        assert!(!state.can_submit_query());
        state.query = "  revenue  ".to_string();
        assert!(state.can_submit_query());
    }
}
