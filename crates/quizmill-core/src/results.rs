//! Per-question verdicts and result records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::SolutionKey;
use crate::response::ResponseValue;

/// What the evaluator decided about one answer.
///
/// Returned to the presentation layer after every submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// Whether the answer was fully correct.
    pub correct: bool,
    /// Points awarded for this answer (0 when incorrect).
    pub points_awarded: u32,
    /// For kinds with countable sub-parts (multi-hotspot, pairing,
    /// placement): how many sub-parts matched the solution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partial_match_count: Option<u32>,
}

/// The immutable record of one answered question.
///
/// Created exactly once per answered question, appended to the session's
/// ordered log, and never mutated afterward. The optional solution and
/// explanation fields are populated only when the session is configured
/// with `include_solution_detail`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Question id.
    pub question_id: String,
    /// 1-based question number.
    pub ordinal: u32,
    /// When the question was presented.
    pub started_at: DateTime<Utc>,
    /// When the answer was submitted.
    pub finished_at: DateTime<Utc>,
    /// Milliseconds spent on the question.
    pub elapsed_ms: u64,
    /// Points awarded.
    pub points_awarded: u32,
    /// The response as submitted.
    pub response: ResponseValue,
    /// Whether the answer was correct.
    pub correct: bool,
    /// `max(0, time_budget - elapsed)`; 0 when the question has no budget.
    pub time_remaining_ms: u64,
    /// Penalty applied (0 for a correct answer).
    pub penalty_points: u32,
    /// Cumulative points after this answer.
    pub cumulative_points: u32,
    /// Streak length after this answer.
    pub streak: u32,
    /// The question's solution, when detail is exposed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution: Option<SolutionKey>,
    /// The question's explanation, when detail is exposed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    /// The question's show-solution flag, when detail is exposed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_solution: Option<bool>,
}
