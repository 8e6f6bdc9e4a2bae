//! The pure answer evaluator.
//!
//! `evaluate` decides correctness for one (question, response) pair and
//! nothing else: it never mutates session state and is fully
//! deterministic. Scoring bookkeeping (streaks, cumulative points,
//! records) lives in the session controller.

use std::collections::{BTreeSet, HashMap};

use crate::error::EvaluateError;
use crate::model::{AnswerOption, Question, QuestionBody};
use crate::response::ResponseValue;
use crate::results::Verdict;

/// Pairing questions fix the pair count at three.
pub const REQUIRED_PAIRS: usize = 3;

/// Evaluate a response against a question.
///
/// Returns `EvaluateError::ResponseMismatch` when the response variant
/// does not fit the question kind, and
/// `EvaluateError::MalformedSolution` when a solution reference fails to
/// resolve against the question's own material.
pub fn evaluate(question: &Question, response: &ResponseValue) -> Result<Verdict, EvaluateError> {
    let (correct, partial_match_count) = match (&question.body, response) {
        (
            QuestionBody::SingleChoice { options, solution }
            | QuestionBody::ImageSingleChoice { options, solution },
            ResponseValue::Selected { option_id },
        ) => {
            check_option_refs(question, solution, options)?;
            (solution.iter().any(|s| s == option_id), None)
        }

        (
            QuestionBody::MultiChoice { options, solution }
            | QuestionBody::ImageMultiChoice { options, solution },
            ResponseValue::SelectedMany { option_ids },
        ) => {
            check_option_refs(question, solution, options)?;
            let selected: BTreeSet<&str> = option_ids.iter().map(String::as_str).collect();
            let wanted: BTreeSet<&str> = solution.iter().map(String::as_str).collect();
            (selected == wanted, None)
        }

        (QuestionBody::Hotspot { target, .. }, ResponseValue::Click { x, y, .. }) => {
            let distance = (x - target.x).hypot(y - target.y);
            (distance <= target.radius, None)
        }

        (
            QuestionBody::MultiHotspot {
                points, solution, ..
            },
            ResponseValue::SelectedPoints { point_ids },
        ) => {
            check_refs(
                question,
                "hotspot point",
                solution,
                points.iter().map(|p| p.id.as_str()),
            )?;
            let selected: BTreeSet<&str> = point_ids.iter().map(String::as_str).collect();
            let wanted: BTreeSet<&str> = solution.iter().map(String::as_str).collect();
            let hits = selected.intersection(&wanted).count();
            let correct = hits == wanted.len() && selected.len() == wanted.len();
            (correct, Some(hits as u32))
        }

        (
            QuestionBody::Ordering { options, solution },
            ResponseValue::Arrangement { option_ids },
        ) => {
            check_option_refs(question, solution, options)?;
            (option_ids == solution, None)
        }

        (
            QuestionBody::Pairing {
                left,
                right,
                solution,
            },
            ResponseValue::Pairs { pairs },
        ) => {
            check_refs(
                question,
                "pair side",
                solution.iter().map(|p| p.left.clone()).collect::<Vec<_>>().as_slice(),
                left.iter().map(|o| o.id.as_str()),
            )?;
            check_refs(
                question,
                "pair side",
                solution.iter().map(|p| p.right.clone()).collect::<Vec<_>>().as_slice(),
                right.iter().map(|o| o.id.as_str()),
            )?;
            let mapping: HashMap<&str, &str> = solution
                .iter()
                .map(|p| (p.left.as_str(), p.right.as_str()))
                .collect();
            // Repeating a pair must not count it twice.
            let submitted: BTreeSet<(&str, &str)> = pairs
                .iter()
                .map(|p| (p.left.as_str(), p.right.as_str()))
                .collect();
            let matched = submitted
                .iter()
                .filter(|(left, right)| mapping.get(left) == Some(right))
                .count();
            let correct = submitted.len() == REQUIRED_PAIRS && matched == REQUIRED_PAIRS;
            (correct, Some(matched as u32))
        }

        (QuestionBody::Placement { items, zones }, ResponseValue::Placements { placements }) => {
            for item in items {
                if !zones.contains(&item.zone) {
                    return Err(EvaluateError::MalformedSolution {
                        question_id: question.id.clone(),
                        entity: "zone",
                        reference: item.zone.clone(),
                    });
                }
            }
            let placed = items
                .iter()
                .filter(|i| placements.get(&i.id) == Some(&i.zone))
                .count();
            (placed == items.len(), Some(placed as u32))
        }

        (_, response) => {
            return Err(EvaluateError::ResponseMismatch {
                question_id: question.id.clone(),
                kind: question.kind(),
                shape: response.shape(),
            })
        }
    };

    Ok(Verdict {
        correct,
        points_awarded: if correct { question.max_points } else { 0 },
        partial_match_count,
    })
}

fn check_option_refs(
    question: &Question,
    solution: &[String],
    options: &[AnswerOption],
) -> Result<(), EvaluateError> {
    check_refs(
        question,
        "option",
        solution,
        options.iter().map(|o| o.id.as_str()),
    )
}

fn check_refs<'a>(
    question: &Question,
    entity: &'static str,
    refs: &[String],
    known: impl Iterator<Item = &'a str>,
) -> Result<(), EvaluateError> {
    let known: BTreeSet<&str> = known.collect();
    for reference in refs {
        if !known.contains(reference.as_str()) {
            return Err(EvaluateError::MalformedSolution {
                question_id: question.id.clone(),
                entity,
                reference: reference.clone(),
            });
        }
    }
    Ok(())
}
