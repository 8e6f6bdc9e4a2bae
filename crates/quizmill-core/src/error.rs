//! Session and evaluation error types.
//!
//! Every variant is a local validation failure: the offending call is
//! rejected and session state is left untouched. None of these are
//! recoverable by retrying the same call.

use thiserror::Error;

use crate::model::QuestionKind;

/// Errors from the pure answer evaluator.
#[derive(Debug, Clone, Error)]
pub enum EvaluateError {
    /// A solution reference does not resolve to any option, point, item,
    /// or zone of the question it belongs to.
    #[error("question '{question_id}': solution references unknown {entity} '{reference}'")]
    MalformedSolution {
        question_id: String,
        entity: &'static str,
        reference: String,
    },

    /// The response variant does not fit the question kind.
    #[error("question '{question_id}' ({kind}) cannot accept a '{shape}' response")]
    ResponseMismatch {
        question_id: String,
        kind: QuestionKind,
        shape: &'static str,
    },
}

/// Errors from the session controller.
#[derive(Debug, Error)]
pub enum SessionError {
    /// `start()` was called on a quiz with no questions.
    #[error("quiz '{0}' has no questions")]
    EmptyQuiz(String),

    /// An operation that requires a running session was called before
    /// `start()`.
    #[error("session has not been started")]
    NotStarted,

    /// `start()` was called a second time.
    #[error("session was already started")]
    AlreadyStarted,

    /// A second submission arrived for the same question index.
    #[error("question {ordinal} was already answered")]
    AlreadyAnswered { ordinal: u32 },

    /// An in-progress operation was called after the last question.
    #[error("session is already finished")]
    AlreadyFinished,

    /// `summarize()` was called before the session reached its end.
    #[error("summary requested before the session finished")]
    NotFinished,

    /// The evaluator rejected the (question, response) pair.
    #[error(transparent)]
    Evaluate(#[from] EvaluateError),
}
