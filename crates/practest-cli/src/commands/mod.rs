//! CLI subcommands and the helpers they share.

pub mod grammar;
pub mod init;
pub mod list;
pub mod score;
pub mod show;
pub mod take;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use practest_core::catalog;
use practest_core::config::{load_config_from, PractestConfig};
use practest_core::model::ExamDefinition;
use practest_core::parser::{self, LoadedExam};
use practest_core::scorer::ScoreResult;

pub fn load_config(config_path: Option<PathBuf>) -> Result<PractestConfig> {
    load_config_from(config_path.as_deref())
}

/// Resolve `--exam` to a loaded exam.
///
/// Tries, in order: an exam file path, a built-in exam id, an exam id found
/// in the configured exam directories. Without `--exam` the configured
/// default exam is used.
pub fn resolve_exam(exam: Option<&str>, config: &PractestConfig) -> Result<LoadedExam> {
    let wanted = exam.unwrap_or(config.default_exam.as_str());
    let path = Path::new(wanted);

    let loaded = if path.is_file() {
        parser::parse_exam(path)?
    } else if let Some(found) = catalog::find(wanted)? {
        found
    } else {
        find_in_dirs(wanted, &config.exam_dirs)?
            .with_context(|| format!("no exam with id or path '{wanted}'"))?
    };

    if config.strict_totals {
        parser::check_totals(&loaded.exam)?;
    }
    tracing::debug!(exam = %loaded.exam.id, "resolved exam");
    Ok(loaded)
}

fn find_in_dirs(id: &str, dirs: &[PathBuf]) -> Result<Option<LoadedExam>> {
    for dir in dirs {
        if !dir.is_dir() {
            tracing::warn!("exam directory not found: {}", dir.display());
            continue;
        }
        if let Some(found) = parser::load_exam_directory(dir)?
            .into_iter()
            .find(|e| e.exam.id == id)
        {
            return Ok(Some(found));
        }
    }
    Ok(None)
}

/// Print the score summary and per-section breakdown.
pub fn print_results(exam: &ExamDefinition, result: &ScoreResult) {
    use comfy_table::{Cell, Table};

    println!(
        "Score: {} / {} ({}%)",
        result.score,
        result.total_marks,
        result.percentage()
    );
    println!("{}", result.feedback().message());

    let mut table = Table::new();
    table.set_header(vec!["Section", "Correct", "Total", "Score"]);

    for (section, score) in practest_report::graded_sections(exam, result) {
        let percentage = result.section_percentage(section.kind()).unwrap_or(0);
        table.add_row(vec![
            Cell::new(&section.title),
            Cell::new(score.correct),
            Cell::new(score.total),
            Cell::new(format!("{percentage}%")),
        ]);
    }

    println!("\n{table}");
}
