//! Core data model types for quizmill.
//!
//! These are the fundamental types the entire quizmill system uses to
//! represent quizzes, questions, and their solutions. Everything here is
//! fully normalized: option ids are always present, solutions are always
//! lists or explicit mappings, and no field needs re-inspection at
//! evaluation time.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A complete quiz definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quiz {
    /// Unique identifier for this quiz.
    pub id: String,
    /// Content version string.
    #[serde(default)]
    pub version: String,
    /// Author of the quiz content.
    #[serde(default)]
    pub author: String,
    /// Content language code (e.g. "en", "vi").
    #[serde(default)]
    pub language: String,
    /// Human-readable title.
    pub title: String,
    /// Description shown before the first question.
    #[serde(default)]
    pub description: String,
    /// Minimum percentage of correct answers for a "passed" outcome.
    pub pass_threshold_percent: u32,
    /// Maximum achievable points across all questions.
    pub max_total_points: u32,
    /// The ordered question sequence.
    pub questions: Vec<Question>,
}

impl Quiz {
    /// Number of questions in the quiz.
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }
}

/// A single question within a quiz.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Stable question identifier.
    pub id: String,
    /// 1-based position within the quiz, assigned at load time.
    pub ordinal: u32,
    /// The question text.
    pub prompt: String,
    /// Per-kind payload: options, targets, items, and the solution.
    pub body: QuestionBody,
    /// Points awarded for a correct answer.
    pub max_points: u32,
    /// Penalty recorded against an incorrect answer.
    #[serde(default)]
    pub penalty_points: u32,
    /// Informational time budget in milliseconds. Never enforced by the
    /// core; only used to compute the remaining-time field of a record.
    #[serde(default)]
    pub time_budget_ms: Option<u64>,
    /// Explanation shown after answering.
    #[serde(default)]
    pub explanation: Option<String>,
    /// Whether the presentation layer should reveal the correct answer.
    #[serde(default)]
    pub show_solution: bool,
}

impl Question {
    /// The kind tag for this question, derived from its body.
    pub fn kind(&self) -> QuestionKind {
        self.body.kind()
    }

    /// Normalized view of this question's solution, suitable for
    /// embedding into result records.
    pub fn solution_key(&self) -> SolutionKey {
        self.body.solution_key()
    }
}

/// The nine supported question kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    SingleChoice,
    MultiChoice,
    ImageSingleChoice,
    ImageMultiChoice,
    Hotspot,
    MultiHotspot,
    Ordering,
    Pairing,
    Placement,
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            QuestionKind::SingleChoice => "single_choice",
            QuestionKind::MultiChoice => "multi_choice",
            QuestionKind::ImageSingleChoice => "image_single_choice",
            QuestionKind::ImageMultiChoice => "image_multi_choice",
            QuestionKind::Hotspot => "hotspot",
            QuestionKind::MultiHotspot => "multi_hotspot",
            QuestionKind::Ordering => "ordering",
            QuestionKind::Pairing => "pairing",
            QuestionKind::Placement => "placement",
        };
        write!(f, "{s}")
    }
}

impl FromStr for QuestionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single_choice" => Ok(QuestionKind::SingleChoice),
            "multi_choice" => Ok(QuestionKind::MultiChoice),
            "image_single_choice" => Ok(QuestionKind::ImageSingleChoice),
            "image_multi_choice" => Ok(QuestionKind::ImageMultiChoice),
            "hotspot" => Ok(QuestionKind::Hotspot),
            "multi_hotspot" => Ok(QuestionKind::MultiHotspot),
            "ordering" => Ok(QuestionKind::Ordering),
            "pairing" => Ok(QuestionKind::Pairing),
            "placement" => Ok(QuestionKind::Placement),
            other => Err(format!("unknown question kind: {other}")),
        }
    }
}

/// A normalized answer option: a stable id plus text and/or an image URL.
///
/// Legacy quiz content carried bare strings here; the parser converts
/// those to id-carrying records exactly once at load time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerOption {
    /// Stable option identifier.
    pub id: String,
    /// Display text.
    #[serde(default)]
    pub text: Option<String>,
    /// Image URL.
    #[serde(default)]
    pub image: Option<String>,
}

/// A clickable target region on an image: center point and radius, in
/// source-image pixel space.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotspotTarget {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    /// Named location the target corresponds to, if any.
    #[serde(default)]
    pub location_id: Option<String>,
}

/// A selectable named point on an image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotspotPoint {
    pub id: String,
    pub x: f64,
    pub y: f64,
}

/// A draggable item and the zone it belongs in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DragItem {
    /// Stable item identifier.
    pub id: String,
    /// Display label.
    #[serde(default)]
    pub label: Option<String>,
    /// Image URL.
    #[serde(default)]
    pub image: Option<String>,
    /// The zone this item correctly belongs to.
    pub zone: String,
}

/// One correct (left, right) pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairSolution {
    pub left: String,
    pub right: String,
}

/// Per-kind question payload.
///
/// Carrying the solution next to the material it references keeps the
/// invariant checkable in one place: every solution reference must
/// resolve to an entry of the same body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuestionBody {
    SingleChoice {
        options: Vec<AnswerOption>,
        /// Normalized to a list; expected to hold exactly one id.
        solution: Vec<String>,
    },
    MultiChoice {
        options: Vec<AnswerOption>,
        solution: Vec<String>,
    },
    ImageSingleChoice {
        options: Vec<AnswerOption>,
        solution: Vec<String>,
    },
    ImageMultiChoice {
        options: Vec<AnswerOption>,
        solution: Vec<String>,
    },
    Hotspot {
        #[serde(default)]
        image: Option<String>,
        target: HotspotTarget,
    },
    MultiHotspot {
        #[serde(default)]
        image: Option<String>,
        points: Vec<HotspotPoint>,
        solution: Vec<String>,
    },
    Ordering {
        options: Vec<AnswerOption>,
        /// The correct order, as option ids.
        solution: Vec<String>,
    },
    Pairing {
        left: Vec<AnswerOption>,
        right: Vec<AnswerOption>,
        solution: Vec<PairSolution>,
    },
    Placement {
        items: Vec<DragItem>,
        zones: Vec<String>,
    },
}

impl QuestionBody {
    /// The kind tag for this body.
    pub fn kind(&self) -> QuestionKind {
        match self {
            QuestionBody::SingleChoice { .. } => QuestionKind::SingleChoice,
            QuestionBody::MultiChoice { .. } => QuestionKind::MultiChoice,
            QuestionBody::ImageSingleChoice { .. } => QuestionKind::ImageSingleChoice,
            QuestionBody::ImageMultiChoice { .. } => QuestionKind::ImageMultiChoice,
            QuestionBody::Hotspot { .. } => QuestionKind::Hotspot,
            QuestionBody::MultiHotspot { .. } => QuestionKind::MultiHotspot,
            QuestionBody::Ordering { .. } => QuestionKind::Ordering,
            QuestionBody::Pairing { .. } => QuestionKind::Pairing,
            QuestionBody::Placement { .. } => QuestionKind::Placement,
        }
    }

    /// Normalized view of the solution carried by this body.
    pub fn solution_key(&self) -> SolutionKey {
        match self {
            QuestionBody::SingleChoice { solution, .. }
            | QuestionBody::MultiChoice { solution, .. }
            | QuestionBody::ImageSingleChoice { solution, .. }
            | QuestionBody::ImageMultiChoice { solution, .. }
            | QuestionBody::MultiHotspot { solution, .. }
            | QuestionBody::Ordering { solution, .. } => SolutionKey::Ids {
                ids: solution.clone(),
            },
            QuestionBody::Hotspot { target, .. } => SolutionKey::Target {
                target: target.clone(),
            },
            QuestionBody::Pairing { solution, .. } => SolutionKey::Pairs {
                pairs: solution.clone(),
            },
            QuestionBody::Placement { items, .. } => SolutionKey::Zones {
                zones: items
                    .iter()
                    .map(|i| (i.id.clone(), i.zone.clone()))
                    .collect(),
            },
        }
    }
}

/// A question's solution in normalized form.
///
/// Embedded into result records when the session is configured to expose
/// solution detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SolutionKey {
    /// The correct id set (or, for ordering, the correct sequence).
    Ids { ids: Vec<String> },
    /// The correct click region.
    Target { target: HotspotTarget },
    /// The correct pairings.
    Pairs { pairs: Vec<PairSolution> },
    /// The correct zone per item id.
    Zones { zones: BTreeMap<String, String> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_display_and_parse() {
        assert_eq!(QuestionKind::SingleChoice.to_string(), "single_choice");
        assert_eq!(QuestionKind::MultiHotspot.to_string(), "multi_hotspot");
        assert_eq!(
            "pairing".parse::<QuestionKind>().unwrap(),
            QuestionKind::Pairing
        );
        assert_eq!(
            "image_multi_choice".parse::<QuestionKind>().unwrap(),
            QuestionKind::ImageMultiChoice
        );
        assert!("essay".parse::<QuestionKind>().is_err());
    }

    #[test]
    fn body_kind_matches_variant() {
        let body = QuestionBody::Ordering {
            options: vec![],
            solution: vec![],
        };
        assert_eq!(body.kind(), QuestionKind::Ordering);

        let body = QuestionBody::Hotspot {
            image: None,
            target: HotspotTarget {
                x: 1.0,
                y: 2.0,
                radius: 3.0,
                location_id: None,
            },
        };
        assert_eq!(body.kind(), QuestionKind::Hotspot);
    }

    #[test]
    fn placement_solution_key_maps_items_to_zones() {
        let body = QuestionBody::Placement {
            items: vec![
                DragItem {
                    id: "i1".into(),
                    label: None,
                    image: None,
                    zone: "safe".into(),
                },
                DragItem {
                    id: "i2".into(),
                    label: None,
                    image: None,
                    zone: "danger".into(),
                },
            ],
            zones: vec!["safe".into(), "danger".into()],
        };
        let SolutionKey::Zones { zones } = body.solution_key() else {
            panic!("expected zone mapping");
        };
        assert_eq!(zones.get("i1").map(String::as_str), Some("safe"));
        assert_eq!(zones.get("i2").map(String::as_str), Some("danger"));
    }

    #[test]
    fn question_serde_roundtrip() {
        let q = Question {
            id: "q1".into(),
            ordinal: 1,
            prompt: "Pick one".into(),
            body: QuestionBody::SingleChoice {
                options: vec![AnswerOption {
                    id: "opt_1".into(),
                    text: Some("Water".into()),
                    image: None,
                }],
                solution: vec!["opt_1".into()],
            },
            max_points: 10,
            penalty_points: 0,
            time_budget_ms: Some(30_000),
            explanation: None,
            show_solution: false,
        };
        let json = serde_json::to_string(&q).unwrap();
        let back: Question = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, "q1");
        assert_eq!(back.kind(), QuestionKind::SingleChoice);
    }
}
