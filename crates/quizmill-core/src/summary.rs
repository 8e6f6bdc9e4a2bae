//! Finalized session summaries with JSON persistence.

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::results::ResultRecord;

/// Pass/fail outcome against the quiz threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PassStatus {
    Passed,
    Failed,
}

impl fmt::Display for PassStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassStatus::Passed => write!(f, "passed"),
            PassStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Aggregate statistics over one finished session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryStats {
    /// Total points earned.
    pub total_score: u32,
    /// Maximum achievable points.
    pub max_score: u32,
    /// Questions answered correctly.
    pub correct_count: u32,
    /// Questions answered incorrectly.
    pub wrong_count: u32,
    /// Questions advanced past without an answer.
    pub skipped_count: u32,
    /// Average time per question in milliseconds.
    pub avg_time_per_question_ms: u64,
    /// Total session time in milliseconds.
    pub total_time_ms: u64,
    /// Always 100: a finished session visited every question.
    pub completion_rate_percent: u32,
    /// Outcome against the pass threshold.
    pub pass_status: PassStatus,
    /// `round(correct / total * 100)`.
    pub percentage: u32,
}

/// The read-only artifact a finished session collapses into.
///
/// This is the exported payload; whatever persistence the presentation
/// layer wants (download, clipboard, local storage) receives this value
/// explicitly rather than reading a global.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Unique session identifier.
    pub session_id: Uuid,
    /// Quiz id.
    pub quiz_id: String,
    /// Quiz content version.
    pub quiz_version: String,
    /// Quiz author.
    pub author: String,
    /// Quiz content language.
    pub language: String,
    /// When the session finished.
    pub finished_at: DateTime<Utc>,
    /// Total number of questions.
    pub total_questions: usize,
    /// Maximum achievable points.
    pub max_points: u32,
    /// The full ordered result log.
    pub results: Vec<ResultRecord>,
    /// Aggregate statistics.
    pub stats: SummaryStats,
}

impl SessionSummary {
    /// Save the summary as pretty-printed JSON.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize summary")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write summary to {}", path.display()))?;
        Ok(())
    }

    /// Load a summary from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read summary from {}", path.display()))?;
        let summary: SessionSummary =
            serde_json::from_str(&content).context("failed to parse summary JSON")?;
        Ok(summary)
    }
}
