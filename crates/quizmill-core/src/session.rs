//! The quiz session state machine.
//!
//! One `Session` owns one run of one quiz: the current index, the
//! score/streak counters, and the result log. The presentation layer
//! never mutates any of this directly; it calls `submit_answer` and
//! `advance` and reads back verdicts and the final summary.
//!
//! Phases: `NotStarted -> InProgress(index) -> Finished`. No transition
//! skips or repeats an index, and each question accepts at most one
//! submission.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SessionError;
use crate::evaluator::evaluate;
use crate::model::{Question, Quiz};
use crate::response::ResponseValue;
use crate::results::{ResultRecord, Verdict};
use crate::summary::{PassStatus, SessionSummary, SummaryStats};

/// Session behavior toggles.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionConfig {
    /// Embed each question's solution, explanation, and show-solution
    /// flag into its result record. Off by default: the exported payload
    /// then carries response ids only.
    pub include_solution_detail: bool,
}

/// Where a session currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    NotStarted,
    /// 0-based index of the question currently presented.
    InProgress(usize),
    Finished,
}

/// Presentation-layer boundary.
///
/// The core calls these hooks as the session moves; implementations
/// render widgets, print progress lines, or do nothing at all.
pub trait SessionObserver {
    fn on_question_presented(&self, question: &Question, index: usize, total: usize);
    fn on_verdict(&self, question: &Question, verdict: &Verdict);
    fn on_finished(&self, summary: &SessionSummary);
}

/// No-op observer.
pub struct NoopObserver;

impl SessionObserver for NoopObserver {
    fn on_question_presented(&self, _: &Question, _: usize, _: usize) {}
    fn on_verdict(&self, _: &Question, _: &Verdict) {}
    fn on_finished(&self, _: &SessionSummary) {}
}

/// A single in-memory quiz run.
pub struct Session {
    session_id: Uuid,
    quiz: Quiz,
    config: SessionConfig,
    phase: SessionPhase,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
    presented_at: Option<DateTime<Utc>>,
    answered_current: bool,
    correct_count: u32,
    cumulative_points: u32,
    streak: u32,
    records: Vec<ResultRecord>,
}

impl Session {
    pub fn new(quiz: Quiz, config: SessionConfig) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            quiz,
            config,
            phase: SessionPhase::NotStarted,
            started_at: None,
            finished_at: None,
            presented_at: None,
            answered_current: false,
            correct_count: 0,
            cumulative_points: 0,
            streak: 0,
            records: Vec::new(),
        }
    }

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// The result log so far.
    pub fn records(&self) -> &[ResultRecord] {
        &self.records
    }

    /// The question currently presented, if the session is in progress.
    pub fn current_question(&self) -> Option<&Question> {
        match self.phase {
            SessionPhase::InProgress(i) => self.quiz.questions.get(i),
            _ => None,
        }
    }

    /// Begin the session at question 0.
    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.quiz.questions.is_empty() {
            return Err(SessionError::EmptyQuiz(self.quiz.id.clone()));
        }
        if self.phase != SessionPhase::NotStarted {
            return Err(SessionError::AlreadyStarted);
        }
        let now = Utc::now();
        self.started_at = Some(now);
        self.presented_at = Some(now);
        self.phase = SessionPhase::InProgress(0);
        tracing::debug!(quiz = %self.quiz.id, session = %self.session_id, "session started");
        Ok(())
    }

    /// Evaluate a response for the current question, update score and
    /// streak, and append a result record.
    ///
    /// Either fully applies its effects or fails before mutating
    /// anything.
    pub fn submit_answer(&mut self, response: ResponseValue) -> Result<Verdict, SessionError> {
        let index = self.in_progress_index()?;
        let question = &self.quiz.questions[index];
        if self.answered_current {
            return Err(SessionError::AlreadyAnswered {
                ordinal: question.ordinal,
            });
        }

        let verdict = evaluate(question, &response)?;

        // No failure path below this line.
        let now = Utc::now();
        let presented = self.presented_at.unwrap_or(now);
        let elapsed_ms = (now - presented).num_milliseconds().max(0) as u64;
        let time_remaining_ms = question
            .time_budget_ms
            .unwrap_or(0)
            .saturating_sub(elapsed_ms);

        if verdict.correct {
            self.correct_count += 1;
            self.streak += 1;
        } else {
            self.streak = 0;
        }
        self.cumulative_points += verdict.points_awarded;
        let penalty_points = if verdict.correct {
            0
        } else {
            question.penalty_points
        };

        let (solution, explanation, show_solution) = if self.config.include_solution_detail {
            (
                Some(question.solution_key()),
                question.explanation.clone(),
                Some(question.show_solution),
            )
        } else {
            (None, None, None)
        };

        self.records.push(ResultRecord {
            question_id: question.id.clone(),
            ordinal: question.ordinal,
            started_at: presented,
            finished_at: now,
            elapsed_ms,
            points_awarded: verdict.points_awarded,
            response,
            correct: verdict.correct,
            time_remaining_ms,
            penalty_points,
            cumulative_points: self.cumulative_points,
            streak: self.streak,
            solution,
            explanation,
            show_solution,
        });
        self.answered_current = true;

        tracing::debug!(
            question = %question.id,
            correct = verdict.correct,
            streak = self.streak,
            "answer recorded"
        );
        Ok(verdict)
    }

    /// Move to the next question, or into `Finished` after the last one.
    ///
    /// Advancing past an unanswered question leaves no record; the
    /// summary counts it as skipped.
    pub fn advance(&mut self) -> Result<SessionPhase, SessionError> {
        let index = self.in_progress_index()?;
        if !self.answered_current {
            tracing::debug!(question = index, "advanced past unanswered question");
        }
        let next = index + 1;
        if next >= self.quiz.questions.len() {
            self.phase = SessionPhase::Finished;
            self.finished_at = Some(Utc::now());
            self.presented_at = None;
            tracing::debug!(session = %self.session_id, "session finished");
        } else {
            self.phase = SessionPhase::InProgress(next);
            self.presented_at = Some(Utc::now());
            self.answered_current = false;
        }
        Ok(self.phase)
    }

    /// Collapse a finished session into its read-only summary.
    ///
    /// Idempotent: the timestamps that feed it are frozen at the moment
    /// the session entered `Finished`.
    pub fn summarize(&self) -> Result<SessionSummary, SessionError> {
        if self.phase != SessionPhase::Finished {
            return Err(SessionError::NotFinished);
        }
        let (Some(started_at), Some(finished_at)) = (self.started_at, self.finished_at) else {
            return Err(SessionError::NotFinished);
        };

        let total = self.quiz.questions.len();
        let total_time_ms = (finished_at - started_at).num_milliseconds().max(0) as u64;
        let avg_time_per_question_ms = (total_time_ms as f64 / total as f64).round() as u64;
        let skipped_count = (total - self.records.len()) as u32;
        let wrong_count = total as u32 - self.correct_count - skipped_count;
        let percentage = (f64::from(self.correct_count) / total as f64 * 100.0).round() as u32;
        let pass_status = if percentage >= self.quiz.pass_threshold_percent {
            PassStatus::Passed
        } else {
            PassStatus::Failed
        };

        Ok(SessionSummary {
            session_id: self.session_id,
            quiz_id: self.quiz.id.clone(),
            quiz_version: self.quiz.version.clone(),
            author: self.quiz.author.clone(),
            language: self.quiz.language.clone(),
            finished_at,
            total_questions: total,
            max_points: self.quiz.max_total_points,
            results: self.records.clone(),
            stats: SummaryStats {
                total_score: self.cumulative_points,
                max_score: self.quiz.max_total_points,
                correct_count: self.correct_count,
                wrong_count,
                skipped_count,
                avg_time_per_question_ms,
                total_time_ms,
                completion_rate_percent: 100,
                pass_status,
                percentage,
            },
        })
    }

    fn in_progress_index(&self) -> Result<usize, SessionError> {
        match self.phase {
            SessionPhase::NotStarted => Err(SessionError::NotStarted),
            SessionPhase::Finished => Err(SessionError::AlreadyFinished),
            SessionPhase::InProgress(i) => Ok(i),
        }
    }
}

/// A scripted answer: which question, and the response to submit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptedAnswer {
    /// Question id the response belongs to.
    pub question: String,
    pub response: ResponseValue,
}

/// A full scripted run, as loaded from a responses file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseScript {
    #[serde(default)]
    pub answers: Vec<ScriptedAnswer>,
}

/// Drive a whole session from a response script.
///
/// Questions without a scripted answer are skipped. Observer hooks fire
/// for each presented question, each verdict, and the final summary.
pub fn replay(
    quiz: Quiz,
    config: SessionConfig,
    script: &ResponseScript,
    observer: &dyn SessionObserver,
) -> Result<SessionSummary, SessionError> {
    let by_id: HashMap<&str, &ResponseValue> = script
        .answers
        .iter()
        .map(|a| (a.question.as_str(), &a.response))
        .collect();

    let mut session = Session::new(quiz, config);
    session.start()?;
    let total = session.quiz().total_questions();

    while let SessionPhase::InProgress(index) = session.phase() {
        let Some(question) = session.current_question().cloned() else {
            break;
        };
        observer.on_question_presented(&question, index, total);
        if let Some(response) = by_id.get(question.id.as_str()) {
            let verdict = session.submit_answer((*response).clone())?;
            observer.on_verdict(&question, &verdict);
        } else {
            tracing::warn!(question = %question.id, "no scripted response, skipping");
        }
        session.advance()?;
    }

    let summary = session.summarize()?;
    observer.on_finished(&summary);
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnswerOption, QuestionBody};

    fn option(id: &str) -> AnswerOption {
        AnswerOption {
            id: id.into(),
            text: Some(id.to_uppercase()),
            image: None,
        }
    }

    fn choice_question(id: &str, ordinal: u32, solution: &str) -> Question {
        Question {
            id: id.into(),
            ordinal,
            prompt: format!("Question {ordinal}"),
            body: QuestionBody::SingleChoice {
                options: vec![option("a"), option("b")],
                solution: vec![solution.into()],
            },
            max_points: 10,
            penalty_points: 2,
            time_budget_ms: Some(30_000),
            explanation: Some("because".into()),
            show_solution: true,
        }
    }

    fn quiz(questions: Vec<Question>) -> Quiz {
        let max = questions.iter().map(|q| q.max_points).sum();
        Quiz {
            id: "test-quiz".into(),
            version: "1.0".into(),
            author: "tests".into(),
            language: "en".into(),
            title: "Test".into(),
            description: String::new(),
            pass_threshold_percent: 70,
            max_total_points: max,
            questions,
        }
    }

    fn three_question_quiz() -> Quiz {
        quiz(vec![
            choice_question("q1", 1, "a"),
            choice_question("q2", 2, "a"),
            choice_question("q3", 3, "a"),
        ])
    }

    fn pick(option_id: &str) -> ResponseValue {
        ResponseValue::Selected {
            option_id: option_id.into(),
        }
    }

    #[test]
    fn empty_quiz_cannot_start() {
        let mut session = Session::new(quiz(vec![]), SessionConfig::default());
        assert!(matches!(
            session.start(),
            Err(SessionError::EmptyQuiz(id)) if id == "test-quiz"
        ));
    }

    #[test]
    fn submit_before_start_is_rejected() {
        let mut session = Session::new(three_question_quiz(), SessionConfig::default());
        assert!(matches!(
            session.submit_answer(pick("a")),
            Err(SessionError::NotStarted)
        ));
    }

    #[test]
    fn double_submission_is_rejected_and_leaves_state_unchanged() {
        let mut session = Session::new(three_question_quiz(), SessionConfig::default());
        session.start().unwrap();
        session.submit_answer(pick("a")).unwrap();

        let before = session.records().len();
        assert!(matches!(
            session.submit_answer(pick("b")),
            Err(SessionError::AlreadyAnswered { ordinal: 1 })
        ));
        assert_eq!(session.records().len(), before);
    }

    #[test]
    fn two_correct_one_wrong_fails_a_seventy_percent_threshold() {
        let mut session = Session::new(three_question_quiz(), SessionConfig::default());
        session.start().unwrap();
        session.submit_answer(pick("a")).unwrap();
        session.advance().unwrap();
        session.submit_answer(pick("a")).unwrap();
        session.advance().unwrap();
        session.submit_answer(pick("b")).unwrap();
        assert_eq!(session.advance().unwrap(), SessionPhase::Finished);

        let summary = session.summarize().unwrap();
        assert_eq!(summary.stats.correct_count, 2);
        assert_eq!(summary.stats.percentage, 67);
        assert_eq!(summary.stats.pass_status, PassStatus::Failed);
        assert_eq!(summary.stats.total_score, 20);
        assert_eq!(summary.stats.wrong_count, 1);
        assert_eq!(summary.stats.skipped_count, 0);
        assert_eq!(summary.stats.completion_rate_percent, 100);
    }

    #[test]
    fn streak_increments_on_correct_and_resets_on_wrong() {
        let mut session = Session::new(
            quiz(vec![
                choice_question("q1", 1, "a"),
                choice_question("q2", 2, "a"),
                choice_question("q3", 3, "a"),
                choice_question("q4", 4, "a"),
            ]),
            SessionConfig::default(),
        );
        session.start().unwrap();

        session.submit_answer(pick("a")).unwrap();
        assert_eq!(session.records().last().unwrap().streak, 1);
        session.advance().unwrap();

        session.submit_answer(pick("a")).unwrap();
        assert_eq!(session.records().last().unwrap().streak, 2);
        session.advance().unwrap();

        session.submit_answer(pick("b")).unwrap();
        assert_eq!(session.records().last().unwrap().streak, 0);
        session.advance().unwrap();

        session.submit_answer(pick("a")).unwrap();
        assert_eq!(session.records().last().unwrap().streak, 1);
    }

    #[test]
    fn summarize_before_finish_is_rejected() {
        let mut session = Session::new(three_question_quiz(), SessionConfig::default());
        session.start().unwrap();
        session.submit_answer(pick("a")).unwrap();
        assert!(matches!(
            session.summarize(),
            Err(SessionError::NotFinished)
        ));
    }

    #[test]
    fn summarize_is_idempotent() {
        let mut session = Session::new(three_question_quiz(), SessionConfig::default());
        session.start().unwrap();
        for _ in 0..3 {
            session.submit_answer(pick("a")).unwrap();
            session.advance().unwrap();
        }
        let first = session.summarize().unwrap();
        let second = session.summarize().unwrap();
        assert_eq!(first.session_id, second.session_id);
        assert_eq!(first.finished_at, second.finished_at);
        assert_eq!(first.stats, second.stats);
    }

    #[test]
    fn skipped_questions_are_counted_without_records() {
        let mut session = Session::new(three_question_quiz(), SessionConfig::default());
        session.start().unwrap();
        session.submit_answer(pick("a")).unwrap();
        session.advance().unwrap();
        session.advance().unwrap(); // q2 skipped
        session.submit_answer(pick("b")).unwrap();
        session.advance().unwrap();

        let summary = session.summarize().unwrap();
        assert_eq!(summary.results.len(), 2);
        assert_eq!(summary.stats.skipped_count, 1);
        assert_eq!(summary.stats.correct_count, 1);
        assert_eq!(summary.stats.wrong_count, 1);
    }

    #[test]
    fn penalty_is_recorded_only_for_wrong_answers() {
        let mut session = Session::new(three_question_quiz(), SessionConfig::default());
        session.start().unwrap();
        session.submit_answer(pick("a")).unwrap();
        session.advance().unwrap();
        session.submit_answer(pick("b")).unwrap();

        assert_eq!(session.records()[0].penalty_points, 0);
        assert_eq!(session.records()[1].penalty_points, 2);
    }

    #[test]
    fn solution_detail_follows_config() {
        let mut bare = Session::new(three_question_quiz(), SessionConfig::default());
        bare.start().unwrap();
        bare.submit_answer(pick("a")).unwrap();
        assert!(bare.records()[0].solution.is_none());
        assert!(bare.records()[0].explanation.is_none());

        let mut detailed = Session::new(
            three_question_quiz(),
            SessionConfig {
                include_solution_detail: true,
            },
        );
        detailed.start().unwrap();
        detailed.submit_answer(pick("a")).unwrap();
        assert!(detailed.records()[0].solution.is_some());
        assert_eq!(detailed.records()[0].explanation.as_deref(), Some("because"));
        assert_eq!(detailed.records()[0].show_solution, Some(true));
    }

    #[test]
    fn operations_after_finish_are_rejected() {
        let mut session = Session::new(quiz(vec![choice_question("q1", 1, "a")]), SessionConfig::default());
        session.start().unwrap();
        session.submit_answer(pick("a")).unwrap();
        session.advance().unwrap();

        assert!(matches!(
            session.submit_answer(pick("a")),
            Err(SessionError::AlreadyFinished)
        ));
        assert!(matches!(
            session.advance(),
            Err(SessionError::AlreadyFinished)
        ));
    }

    #[test]
    fn replay_drives_a_full_session() {
        let script = ResponseScript {
            answers: vec![
                ScriptedAnswer {
                    question: "q1".into(),
                    response: pick("a"),
                },
                ScriptedAnswer {
                    question: "q3".into(),
                    response: pick("b"),
                },
            ],
        };
        let summary = replay(
            three_question_quiz(),
            SessionConfig::default(),
            &script,
            &NoopObserver,
        )
        .unwrap();

        assert_eq!(summary.stats.correct_count, 1);
        assert_eq!(summary.stats.skipped_count, 1);
        assert_eq!(summary.stats.wrong_count, 1);
        assert_eq!(summary.total_questions, 3);
    }
}
