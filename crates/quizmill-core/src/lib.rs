//! quizmill-core — Quiz session state machine, answer evaluation, and scoring.
//!
//! This crate defines the normalized quiz data model, the pure answer
//! evaluator, and the session controller that the rest of the quizmill
//! system builds on.

pub mod error;
pub mod evaluator;
pub mod model;
pub mod parser;
pub mod response;
pub mod results;
pub mod session;
pub mod summary;
