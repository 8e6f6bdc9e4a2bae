//! TOML quiz definition parser.
//!
//! Loads quiz files and response scripts, and validates them. All legacy
//! format tolerance lives here, decided once at load time: bare-string
//! options gain synthetic ids, scalar solutions become lists, and
//! solutions written as option text are resolved to option ids. The rest
//! of the crate only ever sees the normalized model.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::evaluator::REQUIRED_PAIRS;
use crate::model::{
    AnswerOption, DragItem, HotspotPoint, HotspotTarget, PairSolution, Question, QuestionBody,
    QuestionKind, Quiz,
};
use crate::session::ResponseScript;

/// Intermediate TOML structure for quiz files.
#[derive(Debug, Deserialize)]
struct TomlQuizFile {
    quiz: TomlQuizHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlQuizHeader {
    id: String,
    #[serde(default)]
    version: String,
    #[serde(default)]
    author: String,
    #[serde(default = "default_language")]
    language: String,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default = "default_threshold")]
    pass_threshold_percent: u32,
    #[serde(default)]
    max_total_points: Option<u32>,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_threshold() -> u32 {
    70
}

fn default_points() -> u32 {
    10
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: String,
    kind: String,
    prompt: String,
    #[serde(default = "default_points")]
    max_points: u32,
    #[serde(default)]
    penalty_points: u32,
    #[serde(default)]
    time_budget_ms: Option<u64>,
    #[serde(default)]
    explanation: Option<String>,
    #[serde(default)]
    show_solution: bool,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    options: Vec<TomlOption>,
    #[serde(default)]
    solution: Option<OneOrMany>,
    #[serde(default)]
    target: Option<TomlTarget>,
    #[serde(default)]
    points: Vec<TomlPoint>,
    #[serde(default)]
    left: Vec<TomlOption>,
    #[serde(default)]
    right: Vec<TomlOption>,
    #[serde(default)]
    pairs: Vec<TomlPair>,
    #[serde(default)]
    items: Vec<TomlItem>,
    #[serde(default)]
    zones: Vec<String>,
}

/// An option as written in a quiz file: either the legacy bare string or
/// a table carrying an explicit id.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TomlOption {
    Legacy(String),
    Full {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        text: Option<String>,
        #[serde(default)]
        image: Option<String>,
    },
}

/// A solution field: scalar or list, always normalized to a list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(s) => vec![s],
            OneOrMany::Many(v) => v,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TomlTarget {
    x: f64,
    y: f64,
    radius: f64,
    #[serde(default)]
    location_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TomlPoint {
    id: String,
    x: f64,
    y: f64,
}

#[derive(Debug, Deserialize)]
struct TomlPair {
    left: String,
    right: String,
}

#[derive(Debug, Deserialize)]
struct TomlItem {
    id: String,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    image: Option<String>,
    zone: String,
}

/// Parse a single TOML file into a `Quiz`.
pub fn parse_quiz(path: &Path) -> Result<Quiz> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read quiz file: {}", path.display()))?;
    parse_quiz_str(&content, path)
}

/// Parse a TOML string into a `Quiz` (useful for testing).
pub fn parse_quiz_str(content: &str, source_path: &Path) -> Result<Quiz> {
    let parsed: TomlQuizFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let questions = parsed
        .questions
        .into_iter()
        .enumerate()
        .map(|(i, q)| {
            build_question(q, i as u32 + 1)
                .with_context(|| format!("in quiz file {}", source_path.display()))
        })
        .collect::<Result<Vec<Question>>>()?;

    let max_total_points = parsed
        .quiz
        .max_total_points
        .unwrap_or_else(|| questions.iter().map(|q| q.max_points).sum());

    Ok(Quiz {
        id: parsed.quiz.id,
        version: parsed.quiz.version,
        author: parsed.quiz.author,
        language: parsed.quiz.language,
        title: parsed.quiz.title,
        description: parsed.quiz.description,
        pass_threshold_percent: parsed.quiz.pass_threshold_percent,
        max_total_points,
        questions,
    })
}

fn build_question(q: TomlQuestion, ordinal: u32) -> Result<Question> {
    let kind: QuestionKind = q
        .kind
        .parse()
        .map_err(|e: String| anyhow::anyhow!("question '{}': {}", q.id, e))?;

    let body = match kind {
        QuestionKind::SingleChoice
        | QuestionKind::MultiChoice
        | QuestionKind::ImageSingleChoice
        | QuestionKind::ImageMultiChoice
        | QuestionKind::Ordering => {
            let legacy_as_image = matches!(
                kind,
                QuestionKind::ImageSingleChoice | QuestionKind::ImageMultiChoice
            );
            if q.options.is_empty() {
                bail!("question '{}': {kind} requires options", q.id);
            }
            let options = normalize_options(q.options, "opt", legacy_as_image);
            let Some(raw) = q.solution else {
                bail!("question '{}': {kind} requires a solution", q.id);
            };
            let solution = resolve_solution(raw.into_vec(), &options);
            match kind {
                QuestionKind::SingleChoice => QuestionBody::SingleChoice { options, solution },
                QuestionKind::MultiChoice => QuestionBody::MultiChoice { options, solution },
                QuestionKind::ImageSingleChoice => {
                    QuestionBody::ImageSingleChoice { options, solution }
                }
                QuestionKind::ImageMultiChoice => {
                    QuestionBody::ImageMultiChoice { options, solution }
                }
                _ => QuestionBody::Ordering { options, solution },
            }
        }

        QuestionKind::Hotspot => {
            let Some(t) = q.target else {
                bail!("question '{}': hotspot requires a [questions.target] table", q.id);
            };
            QuestionBody::Hotspot {
                image: q.image,
                target: HotspotTarget {
                    x: t.x,
                    y: t.y,
                    radius: t.radius,
                    location_id: t.location_id,
                },
            }
        }

        QuestionKind::MultiHotspot => {
            if q.points.is_empty() {
                bail!("question '{}': multi_hotspot requires points", q.id);
            }
            let Some(raw) = q.solution else {
                bail!("question '{}': multi_hotspot requires a solution", q.id);
            };
            QuestionBody::MultiHotspot {
                image: q.image,
                points: q
                    .points
                    .into_iter()
                    .map(|p| HotspotPoint {
                        id: p.id,
                        x: p.x,
                        y: p.y,
                    })
                    .collect(),
                solution: raw.into_vec(),
            }
        }

        QuestionKind::Pairing => {
            if q.left.is_empty() || q.right.is_empty() {
                bail!("question '{}': pairing requires left and right options", q.id);
            }
            if q.pairs.is_empty() {
                bail!("question '{}': pairing requires solution pairs", q.id);
            }
            let left = normalize_options(q.left, "left", true);
            let right = normalize_options(q.right, "right", true);
            let solution = q
                .pairs
                .into_iter()
                .map(|p| PairSolution {
                    left: p.left,
                    right: p.right,
                })
                .collect();
            QuestionBody::Pairing {
                left,
                right,
                solution,
            }
        }

        QuestionKind::Placement => {
            if q.items.is_empty() {
                bail!("question '{}': placement requires items", q.id);
            }
            let items: Vec<DragItem> = q
                .items
                .into_iter()
                .map(|i| DragItem {
                    id: i.id,
                    label: i.label,
                    image: i.image,
                    zone: i.zone,
                })
                .collect();
            // Zones may be omitted; derive them from the items.
            let zones = if q.zones.is_empty() {
                let mut zones: Vec<String> = Vec::new();
                for item in &items {
                    if !zones.contains(&item.zone) {
                        zones.push(item.zone.clone());
                    }
                }
                zones
            } else {
                q.zones
            };
            QuestionBody::Placement { items, zones }
        }
    };

    Ok(Question {
        id: q.id,
        ordinal,
        prompt: q.prompt,
        body,
        max_points: q.max_points,
        penalty_points: q.penalty_points,
        time_budget_ms: q.time_budget_ms,
        explanation: q.explanation,
        show_solution: q.show_solution,
    })
}

/// Normalize raw options into id-carrying records. Legacy bare strings
/// become text (or image URL, for image kinds) with a synthetic id.
fn normalize_options(raw: Vec<TomlOption>, prefix: &str, legacy_as_image: bool) -> Vec<AnswerOption> {
    raw.into_iter()
        .enumerate()
        .map(|(i, opt)| match opt {
            TomlOption::Legacy(value) => {
                let (text, image) = if legacy_as_image {
                    (None, Some(value))
                } else {
                    (Some(value), None)
                };
                AnswerOption {
                    id: format!("{prefix}_{}", i + 1),
                    text,
                    image,
                }
            }
            TomlOption::Full { id, text, image } => AnswerOption {
                id: id.unwrap_or_else(|| format!("{prefix}_{}", i + 1)),
                text,
                image,
            },
        })
        .collect()
}

/// Resolve solution entries to option ids. Entries already matching an
/// id pass through; entries matching an option's text or image URL (the
/// legacy format) are replaced by that option's id. Anything else passes
/// through untouched and is caught by validation.
fn resolve_solution(raw: Vec<String>, options: &[AnswerOption]) -> Vec<String> {
    raw.into_iter()
        .map(|entry| {
            if options.iter().any(|o| o.id == entry) {
                return entry;
            }
            if let Some(by_value) = options.iter().find(|o| {
                o.text.as_deref() == Some(entry.as_str())
                    || o.image.as_deref() == Some(entry.as_str())
            }) {
                return by_value.id.clone();
            }
            entry
        })
        .collect()
}

/// Recursively load all `.toml` quiz files from a directory.
pub fn load_quiz_directory(dir: &Path) -> Result<Vec<Quiz>> {
    let mut quizzes = Vec::new();

    if !dir.is_dir() {
        bail!("not a directory: {}", dir.display());
    }

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            quizzes.extend(load_quiz_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_quiz(&path) {
                Ok(quiz) => quizzes.push(quiz),
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(quizzes)
}

/// Load a scripted response file.
pub fn parse_response_script(path: &Path) -> Result<ResponseScript> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read responses file: {}", path.display()))?;
    let script: ResponseScript = toml::from_str(&content)
        .with_context(|| format!("failed to parse responses TOML: {}", path.display()))?;
    Ok(script)
}

/// A warning from quiz validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question id, when the warning is question-scoped.
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn for_question(question_id: &str, message: String) -> Self {
        ValidationWarning {
            question_id: Some(question_id.to_string()),
            message,
        }
    }
}

/// Validate a quiz for content issues the parser tolerates.
pub fn validate_quiz(quiz: &Quiz) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let mut seen_ids = std::collections::HashSet::new();
    for q in &quiz.questions {
        let warn = |message: String| ValidationWarning::for_question(&q.id, message);

        if !seen_ids.insert(&q.id) {
            warnings.push(warn(format!("duplicate question id: {}", q.id)));
        }
        if q.prompt.trim().is_empty() {
            warnings.push(warn("prompt is empty".into()));
        }
        if q.max_points == 0 {
            warnings.push(warn("max_points is 0".into()));
        }

        match &q.body {
            QuestionBody::SingleChoice { options, solution }
            | QuestionBody::ImageSingleChoice { options, solution } => {
                check_unique_ids(&q.id, options, &mut warnings);
                check_id_refs(&q.id, solution, options, &mut warnings);
                if solution.len() != 1 {
                    warnings.push(warn(format!(
                        "single-choice solution must hold 1 id, found {}",
                        solution.len()
                    )));
                }
            }
            QuestionBody::MultiChoice { options, solution }
            | QuestionBody::ImageMultiChoice { options, solution } => {
                check_unique_ids(&q.id, options, &mut warnings);
                check_id_refs(&q.id, solution, options, &mut warnings);
            }
            QuestionBody::Hotspot { target, .. } => {
                if target.radius <= 0.0 {
                    warnings.push(warn("hotspot target radius must be positive".into()));
                }
            }
            QuestionBody::MultiHotspot {
                points, solution, ..
            } => {
                for s in solution {
                    if !points.iter().any(|p| &p.id == s) {
                        warnings.push(warn(format!(
                            "solution references unknown hotspot point '{s}'"
                        )));
                    }
                }
            }
            QuestionBody::Ordering { options, solution } => {
                check_unique_ids(&q.id, options, &mut warnings);
                check_id_refs(&q.id, solution, options, &mut warnings);
                if solution.len() != options.len() {
                    warnings.push(warn(format!(
                        "ordering solution lists {} of {} options",
                        solution.len(),
                        options.len()
                    )));
                }
            }
            QuestionBody::Pairing {
                left,
                right,
                solution,
            } => {
                if solution.len() != REQUIRED_PAIRS {
                    warnings.push(warn(format!(
                        "pairing requires exactly {REQUIRED_PAIRS} solution pairs, found {}",
                        solution.len()
                    )));
                }
                for pair in solution {
                    if !left.iter().any(|o| o.id == pair.left) {
                        warnings.push(warn(format!(
                            "solution references unknown left option '{}'",
                            pair.left
                        )));
                    }
                    if !right.iter().any(|o| o.id == pair.right) {
                        warnings.push(warn(format!(
                            "solution references unknown right option '{}'",
                            pair.right
                        )));
                    }
                }
            }
            QuestionBody::Placement { items, zones } => {
                for item in items {
                    if !zones.contains(&item.zone) {
                        warnings.push(warn(format!(
                            "item '{}' belongs to undeclared zone '{}'",
                            item.id, item.zone
                        )));
                    }
                }
            }
        }
    }

    warnings
}

fn check_unique_ids(
    question_id: &str,
    options: &[AnswerOption],
    warnings: &mut Vec<ValidationWarning>,
) {
    let mut seen = std::collections::HashSet::new();
    for o in options {
        if !seen.insert(&o.id) {
            warnings.push(ValidationWarning::for_question(
                question_id,
                format!("duplicate option id: {}", o.id),
            ));
        }
    }
}

fn check_id_refs(
    question_id: &str,
    refs: &[String],
    options: &[AnswerOption],
    warnings: &mut Vec<ValidationWarning>,
) {
    for r in refs {
        if !options.iter().any(|o| &o.id == r) {
            warnings.push(ValidationWarning::for_question(
                question_id,
                format!("solution references unknown option '{r}'"),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const VALID_TOML: &str = r#"
[quiz]
id = "fire-safety"
version = "1.0.0"
author = "safety team"
language = "en"
title = "Fire Safety Basics"
description = "Know your extinguishers"
pass_threshold_percent = 70

[[questions]]
id = "q1"
kind = "single_choice"
prompt = "What do you throw on a grease fire?"
max_points = 10
penalty_points = 2
time_budget_ms = 30000
explanation = "Water spreads burning grease."
show_solution = true
options = ["Water", "Baking soda", "Gasoline"]
solution = "Baking soda"

[[questions]]
id = "q2"
kind = "hotspot"
prompt = "Click the extinguisher"
max_points = 10
image = "kitchen.png"

[questions.target]
x = 100.0
y = 100.0
radius = 20.0
location_id = "extinguisher"

[[questions]]
id = "q3"
kind = "placement"
prompt = "Sort the items"
max_points = 10
items = [
    { id = "i1", label = "Candle", zone = "danger" },
    { id = "i2", label = "Smoke alarm", zone = "safe" },
]
"#;

    #[test]
    fn parse_valid_toml() {
        let quiz = parse_quiz_str(VALID_TOML, &PathBuf::from("test.toml")).unwrap();
        assert_eq!(quiz.id, "fire-safety");
        assert_eq!(quiz.questions.len(), 3);
        assert_eq!(quiz.max_total_points, 30);
        assert_eq!(quiz.questions[0].ordinal, 1);
        assert_eq!(quiz.questions[2].ordinal, 3);
        assert_eq!(quiz.questions[1].kind(), QuestionKind::Hotspot);
        assert!(validate_quiz(&quiz).is_empty());
    }

    #[test]
    fn legacy_options_gain_ids_and_text_solutions_resolve() {
        let quiz = parse_quiz_str(VALID_TOML, &PathBuf::from("test.toml")).unwrap();
        let QuestionBody::SingleChoice { options, solution } = &quiz.questions[0].body else {
            panic!("expected single choice");
        };
        assert_eq!(options[0].id, "opt_1");
        assert_eq!(options[1].text.as_deref(), Some("Baking soda"));
        // "Baking soda" resolved to the second option's synthetic id
        assert_eq!(solution, &vec!["opt_2".to_string()]);
    }

    #[test]
    fn legacy_image_solutions_resolve_to_ids() {
        let toml = r#"
[quiz]
id = "t"
title = "T"

[[questions]]
id = "q1"
kind = "image_single_choice"
prompt = "Which picture shows a smoke alarm?"
options = ["alarm.png", "clock.png"]
solution = "alarm.png"
"#;
        let quiz = parse_quiz_str(toml, &PathBuf::from("test.toml")).unwrap();
        let QuestionBody::ImageSingleChoice { options, solution } = &quiz.questions[0].body else {
            panic!("expected image single choice");
        };
        assert_eq!(options[0].image.as_deref(), Some("alarm.png"));
        assert_eq!(solution, &vec!["opt_1".to_string()]);
        assert!(validate_quiz(&quiz).is_empty());
    }

    #[test]
    fn placement_zones_are_derived_from_items() {
        let quiz = parse_quiz_str(VALID_TOML, &PathBuf::from("test.toml")).unwrap();
        let QuestionBody::Placement { zones, .. } = &quiz.questions[2].body else {
            panic!("expected placement");
        };
        assert_eq!(zones, &vec!["danger".to_string(), "safe".to_string()]);
    }

    #[test]
    fn scalar_and_list_solutions_both_normalize_to_lists() {
        let toml = r#"
[quiz]
id = "t"
title = "T"

[[questions]]
id = "q1"
kind = "multi_choice"
prompt = "Pick several"
options = [{ id = "a", text = "A" }, { id = "b", text = "B" }]
solution = ["a", "b"]

[[questions]]
id = "q2"
kind = "single_choice"
prompt = "Pick one"
options = [{ id = "a", text = "A" }, { id = "b", text = "B" }]
solution = "b"
"#;
        let quiz = parse_quiz_str(toml, &PathBuf::from("test.toml")).unwrap();
        let QuestionBody::MultiChoice { solution, .. } = &quiz.questions[0].body else {
            panic!("expected multi choice");
        };
        assert_eq!(solution.len(), 2);
        let QuestionBody::SingleChoice { solution, .. } = &quiz.questions[1].body else {
            panic!("expected single choice");
        };
        assert_eq!(solution, &vec!["b".to_string()]);
    }

    #[test]
    fn missing_header_fields_get_defaults() {
        let toml = r#"
[quiz]
id = "minimal"
title = "Minimal"
"#;
        let quiz = parse_quiz_str(toml, &PathBuf::from("test.toml")).unwrap();
        assert_eq!(quiz.pass_threshold_percent, 70);
        assert_eq!(quiz.language, "en");
        assert_eq!(quiz.max_total_points, 0);
        assert!(quiz.questions.is_empty());
    }

    #[test]
    fn hotspot_without_target_is_an_error() {
        let toml = r#"
[quiz]
id = "t"
title = "T"

[[questions]]
id = "q1"
kind = "hotspot"
prompt = "Click it"
"#;
        let err = parse_quiz_str(toml, &PathBuf::from("test.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("target"));
    }

    #[test]
    fn unknown_kind_is_an_error() {
        let toml = r#"
[quiz]
id = "t"
title = "T"

[[questions]]
id = "q1"
kind = "essay"
prompt = "Write at length"
"#;
        let err = parse_quiz_str(toml, &PathBuf::from("test.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("unknown question kind"));
    }

    #[test]
    fn parse_malformed_toml() {
        let bad = "this is not [valid toml }{";
        assert!(parse_quiz_str(bad, &PathBuf::from("bad.toml")).is_err());
    }

    #[test]
    fn validate_unresolved_solution() {
        let toml = r#"
[quiz]
id = "t"
title = "T"

[[questions]]
id = "q1"
kind = "single_choice"
prompt = "Pick one"
options = [{ id = "a", text = "A" }]
solution = "nope"
"#;
        let quiz = parse_quiz_str(toml, &PathBuf::from("test.toml")).unwrap();
        let warnings = validate_quiz(&quiz);
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("unknown option 'nope'")));
    }

    #[test]
    fn validate_duplicate_question_ids() {
        let toml = r#"
[quiz]
id = "t"
title = "T"

[[questions]]
id = "same"
kind = "single_choice"
prompt = "First"
options = [{ id = "a", text = "A" }]
solution = "a"

[[questions]]
id = "same"
kind = "single_choice"
prompt = "Second"
options = [{ id = "a", text = "A" }]
solution = "a"
"#;
        let quiz = parse_quiz_str(toml, &PathBuf::from("test.toml")).unwrap();
        let warnings = validate_quiz(&quiz);
        assert!(warnings.iter().any(|w| w.message.contains("duplicate question id")));
    }

    #[test]
    fn validate_pairing_pair_count() {
        let toml = r#"
[quiz]
id = "t"
title = "T"

[[questions]]
id = "q1"
kind = "pairing"
prompt = "Match them"
left = [{ id = "l1", image = "a.png" }]
right = [{ id = "r1", image = "b.png" }]
pairs = [{ left = "l1", right = "r1" }]
"#;
        let quiz = parse_quiz_str(toml, &PathBuf::from("test.toml")).unwrap();
        let warnings = validate_quiz(&quiz);
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("exactly 3 solution pairs")));
    }

    #[test]
    fn load_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("quiz.toml"), VALID_TOML).unwrap();
        std::fs::write(dir.path().join("broken.toml"), "not toml [").unwrap();

        let quizzes = load_quiz_directory(dir.path()).unwrap();
        assert_eq!(quizzes.len(), 1);
        assert_eq!(quizzes[0].id, "fire-safety");
    }

    #[test]
    fn parse_response_script_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("responses.toml");
        std::fs::write(
            &path,
            r#"
[[answers]]
question = "q1"
response = { type = "selected", option_id = "opt_2" }

[[answers]]
question = "q2"
response = { type = "click", x = 110.0, y = 105.0 }

[[answers]]
question = "q3"
response = { type = "placements", placements = { i1 = "danger", i2 = "safe" } }
"#,
        )
        .unwrap();

        let script = parse_response_script(&path).unwrap();
        assert_eq!(script.answers.len(), 3);
        assert_eq!(script.answers[0].question, "q1");
        assert_eq!(script.answers[1].response.shape(), "click");
    }
}
