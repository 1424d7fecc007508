//! Built-in exams shipped with the binary.

use std::path::Path;

use anyhow::Result;

use crate::grammar::{parse_grammar_str, GrammarRule};
use crate::parser::{parse_exam_str, LoadedExam};

const FULL_PRACTICE_EXAM: &str = include_str!("../exams/full-practice-exam-1.toml");
const SPACE_READING_EXAM: &str = include_str!("../exams/space-reading-exam-1.toml");
const GRAMMAR_REFERENCE: &str = include_str!("../data/grammar.toml");

/// Id of the built-in exam used when nothing else is configured.
pub const DEFAULT_EXAM_ID: &str = "full-practice-exam-1";

/// The four-section grammar, translation and reading exam.
pub fn full_practice_exam() -> Result<LoadedExam> {
    parse_exam_str(FULL_PRACTICE_EXAM, Path::new("<builtin>/full-practice-exam-1.toml"))
}

/// The reading, open questions and writing exam.
pub fn space_reading_exam() -> Result<LoadedExam> {
    parse_exam_str(SPACE_READING_EXAM, Path::new("<builtin>/space-reading-exam-1.toml"))
}

/// Every built-in exam, in catalog order.
pub fn builtin() -> Result<Vec<LoadedExam>> {
    Ok(vec![full_practice_exam()?, space_reading_exam()?])
}

/// Look up a built-in exam by id.
pub fn find(id: &str) -> Result<Option<LoadedExam>> {
    Ok(builtin()?.into_iter().find(|e| e.exam.id == id))
}

/// The grammar reference, sorted by rule id.
pub fn grammar_rules() -> Result<Vec<GrammarRule>> {
    parse_grammar_str(GRAMMAR_REFERENCE, Path::new("<builtin>/grammar.toml"))
}
