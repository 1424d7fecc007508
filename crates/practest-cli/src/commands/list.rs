//! The `practest list` command.

use std::path::PathBuf;

use anyhow::Result;

use practest_core::catalog;
use practest_core::parser::{self, LoadedExam};

pub fn execute(dir: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    let config = super::load_config(config_path)?;

    println!("Built-in exams:");
    for loaded in catalog::builtin()? {
        print_exam(&loaded);
    }

    let dirs = config.exam_dirs.iter().cloned().chain(dir);
    for dir in dirs {
        if !dir.is_dir() {
            tracing::warn!("exam directory not found: {}", dir.display());
            continue;
        }
        let exams = parser::load_exam_directory(&dir)?;
        println!("\n{}:", dir.display());
        if exams.is_empty() {
            println!("  (no exams)");
        }
        for loaded in &exams {
            print_exam(loaded);
        }
    }

    Ok(())
}

fn print_exam(loaded: &LoadedExam) {
    let exam = &loaded.exam;
    println!(
        "  {} — {} ({} sections, {} marks, {})",
        exam.id,
        exam.title,
        exam.sections.len(),
        exam.total_marks,
        exam.time_allowed
    );
}
