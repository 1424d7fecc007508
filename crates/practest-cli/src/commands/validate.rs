//! The `practest validate` command.

use std::path::{Path, PathBuf};

use anyhow::Result;

use practest_core::parser;

pub fn execute(exam: Option<String>, config_path: Option<PathBuf>) -> Result<()> {
    let config = super::load_config(config_path)?;

    let exams = match exam.as_deref() {
        Some(target) if Path::new(target).is_dir() => {
            parser::load_exam_directory(Path::new(target))?
        }
        Some(target) if Path::new(target).extension().is_some_and(|ext| ext == "toml") => {
            vec![parser::parse_exam(Path::new(target))?]
        }
        _ => vec![super::resolve_exam(exam.as_deref(), &config)?],
    };

    let mut total_warnings = 0;

    for loaded in &exams {
        println!(
            "Exam: {} ({} sections, {} marks)",
            loaded.exam.id,
            loaded.exam.sections.len(),
            loaded.exam.total_marks
        );

        let warnings = parser::validate_exam(&loaded.exam, &loaded.key);
        for w in &warnings {
            let prefix = w
                .section
                .map(|kind| format!("  [{kind}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All exams valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
