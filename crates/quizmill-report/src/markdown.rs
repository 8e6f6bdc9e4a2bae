//! Markdown session report.

use quizmill_core::summary::SessionSummary;

/// Format a session summary as markdown.
pub fn render_markdown(summary: &SessionSummary) -> String {
    let mut md = String::new();
    let stats = &summary.stats;

    md.push_str(&format!("# Quiz result — {}\n\n", summary.quiz_id));
    md.push_str(&format!(
        "**{}** | {}% ({}/{} correct) | {} / {} points\n\n",
        stats.pass_status,
        stats.percentage,
        stats.correct_count,
        summary.total_questions,
        stats.total_score,
        stats.max_score,
    ));
    md.push_str(&format!(
        "Finished {} | total {:.1}s | avg {:.1}s per question\n\n",
        summary.finished_at.format("%Y-%m-%d %H:%M:%S UTC"),
        stats.total_time_ms as f64 / 1000.0,
        stats.avg_time_per_question_ms as f64 / 1000.0,
    ));

    if stats.wrong_count > 0 || stats.skipped_count > 0 {
        md.push_str(&format!(
            "{} wrong, {} skipped\n\n",
            stats.wrong_count, stats.skipped_count
        ));
    }

    if !summary.results.is_empty() {
        md.push_str("| # | Question | Verdict | Points | Streak | Time |\n");
        md.push_str("|---|----------|---------|--------|--------|------|\n");
        for r in &summary.results {
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} | {:.1}s |\n",
                r.ordinal,
                r.question_id,
                if r.correct { "correct" } else { "wrong" },
                r.points_awarded,
                r.streak,
                r.elapsed_ms as f64 / 1000.0,
            ));
        }
    }

    md
}
