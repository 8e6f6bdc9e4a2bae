//! The `quizmill run` command.

use std::path::PathBuf;

use anyhow::Result;

use quizmill_core::model::Question;
use quizmill_core::parser;
use quizmill_core::results::Verdict;
use quizmill_core::session::{replay, SessionConfig, SessionObserver};
use quizmill_core::summary::SessionSummary;
use quizmill_report::html::write_html_report;
use quizmill_report::markdown::render_markdown;

/// Console progress observer.
struct ConsoleObserver;

impl SessionObserver for ConsoleObserver {
    fn on_question_presented(&self, question: &Question, index: usize, total: usize) {
        eprintln!("  Q{}/{}: {}", index + 1, total, question.prompt);
    }

    fn on_verdict(&self, question: &Question, verdict: &Verdict) {
        let icon = if verdict.correct { "CORRECT" } else { "WRONG" };
        let partial = match verdict.partial_match_count {
            Some(n) => format!(" ({n} matched)"),
            None => String::new(),
        };
        eprintln!(
            "  {} :: {} [{} pts]{}",
            question.id, icon, verdict.points_awarded, partial
        );
    }

    fn on_finished(&self, summary: &SessionSummary) {
        eprintln!(
            "\nFinished: {}/{} correct, {} skipped ({:.1}s)",
            summary.stats.correct_count,
            summary.total_questions,
            summary.stats.skipped_count,
            summary.stats.total_time_ms as f64 / 1000.0,
        );
    }
}

pub fn execute(
    quiz_path: PathBuf,
    responses_path: PathBuf,
    output: PathBuf,
    format: String,
    include_solution_detail: bool,
) -> Result<()> {
    let quizzes = if quiz_path.is_dir() {
        parser::load_quiz_directory(&quiz_path)?
    } else {
        vec![parser::parse_quiz(&quiz_path)?]
    };
    anyhow::ensure!(!quizzes.is_empty(), "no quizzes found at {}", quiz_path.display());

    let script = parser::parse_response_script(&responses_path)?;

    let config = SessionConfig {
        include_solution_detail,
    };
    let observer = ConsoleObserver;

    for quiz in quizzes {
        let quiz_id = quiz.id.clone();
        eprintln!(
            "quizmill — {} ({} questions, pass at {}%)",
            quiz.title,
            quiz.total_questions(),
            quiz.pass_threshold_percent
        );
        eprintln!();

        let summary = replay(quiz, config, &script, &observer)?;

        print_summary(&summary);

        std::fs::create_dir_all(&output)?;
        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");

        let formats: Vec<&str> = if format == "all" {
            vec!["json", "markdown", "html"]
        } else {
            format.split(',').collect()
        };

        for fmt in &formats {
            match *fmt {
                "json" => {
                    let path = output.join(format!("{quiz_id}-{timestamp}.json"));
                    summary.save_json(&path)?;
                    eprintln!("Results saved to: {}", path.display());
                }
                "markdown" | "md" => {
                    let path = output.join(format!("{quiz_id}-{timestamp}.md"));
                    std::fs::write(&path, render_markdown(&summary))?;
                    eprintln!("Markdown report: {}", path.display());
                }
                "html" => {
                    let path = output.join(format!("{quiz_id}-{timestamp}.html"));
                    write_html_report(&summary, &path)?;
                    eprintln!("HTML report: {}", path.display());
                }
                _ => {
                    eprintln!("Unknown format: {fmt}");
                }
            }
        }
    }

    Ok(())
}

fn print_summary(summary: &SessionSummary) {
    use comfy_table::{Cell, Table};

    let stats = &summary.stats;

    let mut table = Table::new();
    table.set_header(vec!["#", "Question", "Verdict", "Points", "Streak", "Time"]);

    for r in &summary.results {
        table.add_row(vec![
            Cell::new(r.ordinal),
            Cell::new(&r.question_id),
            Cell::new(if r.correct { "correct" } else { "wrong" }),
            Cell::new(format!("{}", r.points_awarded)),
            Cell::new(format!("{}", r.streak)),
            Cell::new(format!("{:.1}s", r.elapsed_ms as f64 / 1000.0)),
        ]);
    }

    eprintln!("\n{table}");
    eprintln!(
        "{} — {}% | {}/{} points | pass threshold met: {}",
        stats.pass_status,
        stats.percentage,
        stats.total_score,
        stats.max_score,
        matches!(
            stats.pass_status,
            quizmill_core::summary::PassStatus::Passed
        ),
    );
}
