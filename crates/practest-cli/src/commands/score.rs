//! The `practest score` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use practest_core::answers::UserAnswers;
use practest_core::scorer::score;
use practest_report::html::{render_results_html, write_results_html};
use practest_report::markdown::results_markdown;

pub fn execute(
    exam: Option<String>,
    answers_path: PathBuf,
    format: String,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = super::load_config(config_path)?;
    let loaded = super::resolve_exam(exam.as_deref(), &config)?;

    let content = std::fs::read_to_string(&answers_path)
        .with_context(|| format!("failed to read answers: {}", answers_path.display()))?;
    let mut answers: UserAnswers = toml::from_str(&content)
        .with_context(|| format!("failed to parse answers: {}", answers_path.display()))?;
    answers.fill_missing(&loaded.exam);

    let result = score(&answers, &loaded.key, &loaded.exam);
    tracing::info!(
        exam = %loaded.exam.id,
        score = result.score,
        total_marks = result.total_marks,
        "scored answers file"
    );

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&result)?),
        "markdown" | "md" => println!("{}", results_markdown(&loaded.exam, &result)),
        "html" => println!("{}", render_results_html(&loaded.exam, &result)),
        "text" => super::print_results(&loaded.exam, &result),
        other => anyhow::bail!("unknown format '{other}' (expected text, json, markdown or html)"),
    }

    if let Some(path) = output {
        write_results_html(&loaded.exam, &result, &path)
            .with_context(|| format!("failed to write results page: {}", path.display()))?;
        eprintln!("Results page written to {}", path.display());
    }

    Ok(())
}
