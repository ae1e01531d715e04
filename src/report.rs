use crate::methods::CleaningMethod;
use crate::runner::RunOutcome;
use crate::CleanerResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportStatus {
    Completed,
    Cancelled,
}

/// JSON record of one run, written with `--report`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub report_id: String,
    pub method: CleaningMethod,
    pub started_at: DateTime<Utc>,
    pub status: ReportStatus,
    pub passes_run: usize,
    pub total_passes: usize,
    pub failed_passes: usize,
    pub duration_seconds: u64,
    pub scratch_size_mb: Option<u64>,
    pub digest: String, // SHA-256 over the report with this field empty
}

impl RunReport {
    pub fn new(
        method: CleaningMethod,
        started_at: DateTime<Utc>,
        outcome: &RunOutcome,
        scratch_size_mb: Option<u64>,
    ) -> CleanerResult<Self> {
        let summary = outcome.summary();
        let status = if outcome.is_completed() {
            ReportStatus::Completed
        } else {
            ReportStatus::Cancelled
        };

        let mut report = Self {
            report_id: Uuid::new_v4().to_string(),
            method,
            started_at,
            status,
            passes_run: summary.passes_run,
            total_passes: summary.total_passes,
            failed_passes: summary.failed_passes,
            duration_seconds: summary.total_duration.as_secs(),
            scratch_size_mb,
            digest: String::new(),
        };

        report.digest = report.compute_digest()?;
        Ok(report)
    }

    fn compute_digest(&self) -> CleanerResult<String> {
        let mut body = self.clone();
        body.digest = String::new();

        let json_data = serde_json::to_string(&body)?;
        let mut hasher = Sha256::new();
        hasher.update(json_data.as_bytes());

        Ok(format!("{:x}", hasher.finalize()))
    }

    /// True when the stored digest matches the report body.
    pub fn verify(&self) -> CleanerResult<bool> {
        Ok(self.compute_digest()? == self.digest)
    }

    pub fn save(&self, path: &Path) -> CleanerResult<()> {
        let json_data = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json_data)?;
        tracing::info!(path = %path.display(), report_id = %self.report_id, "Run report written");
        Ok(())
    }

    pub fn load(path: &Path) -> CleanerResult<Self> {
        let json_data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json_data)?)
    }
}
