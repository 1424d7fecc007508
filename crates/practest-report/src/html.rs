//! HTML results page.
//!
//! Produces a self-contained HTML file with all CSS inlined.

use anyhow::Result;
use std::path::Path;

use practest_core::model::ExamDefinition;
use practest_core::scorer::ScoreResult;

use crate::graded_sections;
use crate::markup::html_escape;

/// Generate the results page for one submitted attempt.
pub fn render_results_html(exam: &ExamDefinition, result: &ScoreResult) -> String {
    let mut html = String::new();
    let feedback = result.feedback();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>Results: {}</title>\n",
        html_escape(&exam.title)
    ));
    html.push_str("<style>\n");
    html.push_str(crate::CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>Exam Results</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">{}</p>\n",
        html_escape(&exam.title)
    ));
    html.push_str("</header>\n");

    // Score summary
    let class = if feedback.passed() { "pass" } else { "fail" };
    html.push_str(&format!("<section class=\"summary {class}\">\n"));
    html.push_str(&format!(
        "<p class=\"score\">{} / {}</p>\n",
        result.score, result.total_marks
    ));
    html.push_str(&format!("<p>{}%</p>\n", result.percentage()));
    html.push_str(&format!("<p>{}</p>\n", html_escape(feedback.message())));
    html.push_str("</section>\n");

    // Per-section breakdown
    html.push_str("<section class=\"breakdown\">\n");
    html.push_str("<h2>Section Breakdown</h2>\n");
    html.push_str("<table>\n");
    html.push_str("<thead><tr><th>Section</th><th>Correct</th><th>Total</th><th>Score</th></tr></thead>\n");
    html.push_str("<tbody>\n");
    for (section, score) in graded_sections(exam, result) {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}%</td></tr>\n",
            html_escape(&section.title),
            score.correct,
            score.total,
            score.percentage()
        ));
    }
    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(result).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write the results page to a file.
pub fn write_results_html(exam: &ExamDefinition, result: &ScoreResult, path: &Path) -> Result<()> {
    let html = render_results_html(exam, result);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}
