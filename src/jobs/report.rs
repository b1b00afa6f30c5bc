//! Report generation collaborator

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use super::{simulate_latency, ProgressSink};
use crate::wizard::state::{ExtractionResult, Metric, Report};
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    pub extraction: ExtractionResult,
    pub query: String,
}

#[async_trait]
pub trait ReportGenerator: Send + Sync {
    async fn generate(&self, request: ReportRequest, progress: ProgressSink) -> Result<Report>;
}

/// Fixed-latency generator returning [`sample_report`]
#[derive(Debug, Clone)]
pub struct SimulatedReportGenerator {
    latency: Duration,
}

impl SimulatedReportGenerator {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

impl Default for SimulatedReportGenerator {
    fn default() -> Self {
        Self::new(Duration::from_millis(2000))
    }
}

#[async_trait]
impl ReportGenerator for SimulatedReportGenerator {
    async fn generate(&self, request: ReportRequest, progress: ProgressSink) -> Result<Report> {
        debug!(rows = request.extraction.row_count, "Simulating report generation");
        simulate_latency(self.latency, &progress).await;
        Ok(sample_report())
    }
}

pub fn sample_report() -> Report {
    Report {
        title: "Actionable Report".to_string(),
        summary: "Analysis of 15 records shows total revenue of $12.4M across active and pending contracts. \
                  Key insights include 80% active rate and Q1 2024 concentration."
            .to_string(),
        metrics: vec![
            Metric::new("Total Revenue", "$12.4M"),
            Metric::new("Active Contracts", "12 (80%)"),
            Metric::new("Pending Contracts", "3 (20%)"),
            Metric::new("Average Deal Size", "$826K"),
        ],
        generated_at: Utc::now(),
    }
}
