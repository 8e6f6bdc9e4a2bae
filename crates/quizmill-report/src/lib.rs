//! quizmill-report — Markdown and HTML rendering of session summaries.

pub mod html;
pub mod markdown;
