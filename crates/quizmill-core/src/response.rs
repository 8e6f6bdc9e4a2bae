//! Structured user responses.
//!
//! The presentation layer turns gestures (clicks, drags, reorderings)
//! into one of these values and hands it to the session controller. One
//! variant exists per response shape; the evaluator dispatches on the
//! question kind and rejects mismatched variants.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One chosen (left, right) pairing as submitted by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairChoice {
    pub left: String,
    pub right: String,
}

/// A user response to a single question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseValue {
    /// One selected option id (single-choice kinds).
    Selected { option_id: String },
    /// A set of selected option ids (multi-choice kinds).
    SelectedMany { option_ids: Vec<String> },
    /// A click in source-image pixel space, optionally tagged with the
    /// location id the presentation layer matched it to.
    Click {
        x: f64,
        y: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        location_id: Option<String>,
    },
    /// Selected named points (multi-hotspot).
    SelectedPoints { point_ids: Vec<String> },
    /// Option ids in the order the user arranged them.
    Arrangement { option_ids: Vec<String> },
    /// Pairings the user formed.
    Pairs { pairs: Vec<PairChoice> },
    /// Zone assignment per item id.
    Placements { placements: BTreeMap<String, String> },
}

impl ResponseValue {
    /// Short name of the response shape, for error messages.
    pub fn shape(&self) -> &'static str {
        match self {
            ResponseValue::Selected { .. } => "selected",
            ResponseValue::SelectedMany { .. } => "selected_many",
            ResponseValue::Click { .. } => "click",
            ResponseValue::SelectedPoints { .. } => "selected_points",
            ResponseValue::Arrangement { .. } => "arrangement",
            ResponseValue::Pairs { .. } => "pairs",
            ResponseValue::Placements { .. } => "placements",
        }
    }
}
