//! HTML session report.
//!
//! Produces a self-contained HTML file with all CSS inlined.

use anyhow::Result;
use std::path::Path;

use quizmill_core::summary::{PassStatus, SessionSummary};

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate an HTML report from a session summary.
pub fn render_html(summary: &SessionSummary) -> String {
    let stats = &summary.stats;
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>quizmill report — {}</title>\n",
        html_escape(&summary.quiz_id)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>quizmill report</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Quiz: <strong>{}</strong> v{} | {} questions | {}</p>\n",
        html_escape(&summary.quiz_id),
        html_escape(&summary.quiz_version),
        summary.total_questions,
        summary.finished_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Score dashboard
    let verdict_class = match stats.pass_status {
        PassStatus::Passed => "pass",
        PassStatus::Failed => "fail",
    };
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Summary</h2>\n");
    html.push_str(&format!(
        "<p class=\"verdict {}\">{} — {}%</p>\n",
        verdict_class, stats.pass_status, stats.percentage
    ));
    html.push_str("<table class=\"summary\">\n");
    html.push_str("<thead><tr><th>Score</th><th>Correct</th><th>Wrong</th><th>Skipped</th><th>Completion</th><th>Avg Time</th></tr></thead>\n");
    html.push_str("<tbody>\n");
    html.push_str(&format!(
        "<tr><td>{} / {}</td><td>{}</td><td>{}</td><td>{}</td><td>{}%</td><td>{:.1}s</td></tr>\n",
        stats.total_score,
        stats.max_score,
        stats.correct_count,
        stats.wrong_count,
        stats.skipped_count,
        stats.completion_rate_percent,
        stats.avg_time_per_question_ms as f64 / 1000.0,
    ));
    html.push_str("</tbody></table>\n");
    html.push_str(&score_bar(stats.percentage));
    html.push_str("</section>\n");

    // Per-question results
    html.push_str("<section class=\"results\">\n");
    html.push_str("<h2>Results</h2>\n");
    html.push_str("<table class=\"results-table\">\n");
    html.push_str("<thead><tr><th>#</th><th>Question</th><th>Verdict</th><th>Points</th><th>Streak</th><th>Time</th></tr></thead>\n");
    html.push_str("<tbody>\n");

    for r in &summary.results {
        let row_class = if r.correct { "pass" } else { "fail" };
        let verdict_text = if r.correct { "CORRECT" } else { "WRONG" };
        html.push_str(&format!(
            "<tr class=\"{}\"><td>{}</td><td>{}</td><td class=\"{}\">{}</td><td>{}</td><td>{}</td><td>{:.1}s</td></tr>\n",
            row_class,
            r.ordinal,
            html_escape(&r.question_id),
            row_class,
            verdict_text,
            r.points_awarded,
            r.streak,
            r.elapsed_ms as f64 / 1000.0,
        ));
        if let Some(explanation) = &r.explanation {
            html.push_str(&format!(
                "<tr class=\"explanation\"><td></td><td colspan=\"5\">{}</td></tr>\n",
                html_escape(explanation)
            ));
        }
    }

    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(
        &serde_json::to_string_pretty(summary)
            .unwrap_or_default()
            .replace('<', "&lt;")
            .replace('>', "&gt;"),
    );
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(summary: &SessionSummary, path: &Path) -> Result<()> {
    let html = render_html(summary);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

fn score_bar(percentage: u32) -> String {
    let max_width = 400;
    let bar_height = 30;
    let width = (percentage.min(100) as usize * max_width) / 100;

    let color = if percentage >= 70 {
        "#22c55e"
    } else if percentage >= 40 {
        "#eab308"
    } else {
        "#ef4444"
    };

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        max_width + 60,
        bar_height
    );
    svg.push_str(&format!(
        "  <rect x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" fill=\"var(--border, #e5e7eb)\" rx=\"4\"/>\n",
        max_width, bar_height
    ));
    svg.push_str(&format!(
        "  <rect x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"4\"/>\n",
        width, bar_height, color
    ));
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"currentColor\" dominant-baseline=\"middle\">{}%</text>\n",
        max_width + 8,
        bar_height / 2,
        percentage
    ));
    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --fail: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --fail: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
.verdict { font-size: 1.5rem; font-weight: bold; padding: 0.5rem 1rem; border-radius: 8px; display: inline-block; text-transform: uppercase; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); }
.pass { background: var(--pass); }
.fail { background: var(--fail); }
.explanation td { font-style: italic; color: #6b7280; background: var(--bg); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;
