//! TOML exam file parser.
//!
//! Loads exams and their answer keys from TOML files and directories, and
//! validates them.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::answers::AnswerKey;
use crate::error::ExamError;
use crate::model::{
    ChoiceQuestion, ExamDefinition, GapText, Passage, Section, SectionContent, SectionKind,
    WritingOption,
};
use crate::policy::ScoringPolicy;

/// An exam together with the key it is graded against.
#[derive(Debug, Clone)]
pub struct LoadedExam {
    pub exam: ExamDefinition,
    pub key: AnswerKey,
}

/// Intermediate TOML structure for parsing exam files.
#[derive(Debug, Deserialize)]
struct TomlExamFile {
    exam: TomlExamHeader,
    #[serde(default)]
    sections: Vec<TomlSection>,
    #[serde(default)]
    answer_key: AnswerKey,
}

#[derive(Debug, Deserialize)]
struct TomlExamHeader {
    id: String,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default = "default_time_allowed")]
    time_allowed: String,
    total_marks: u32,
}

fn default_time_allowed() -> String {
    "60 minutes".to_string()
}

/// One `[[sections]]` table. Which fields are required depends on `id`.
#[derive(Debug, Deserialize)]
struct TomlSection {
    id: String,
    title: String,
    #[serde(default)]
    description: Option<String>,
    marks: u32,
    #[serde(default)]
    scoring: Option<ScoringPolicy>,
    /// Choice questions (multiple choice, reading comprehension).
    #[serde(default)]
    questions: Vec<ChoiceQuestion>,
    /// Open question prompts.
    #[serde(default)]
    prompts: Vec<String>,
    #[serde(default)]
    text: Option<GapText>,
    #[serde(default)]
    into_arabic: Option<String>,
    #[serde(default)]
    into_english: Option<String>,
    #[serde(default)]
    passage: Option<Passage>,
    #[serde(default)]
    options: Vec<WritingOption>,
}

impl TomlSection {
    fn into_section(self) -> Result<Section> {
        let kind: SectionKind = self.id.parse().map_err(|e: String| anyhow::anyhow!(e))?;

        let content = match kind {
            SectionKind::MultipleChoice => SectionContent::MultipleChoice {
                questions: self.questions,
            },
            SectionKind::FillInTheGaps => SectionContent::FillInTheGaps {
                text: self
                    .text
                    .with_context(|| format!("{kind} section needs a [sections.text] table"))?,
            },
            SectionKind::Translation => SectionContent::Translation {
                into_arabic: self
                    .into_arabic
                    .with_context(|| format!("{kind} section needs `into_arabic`"))?,
                into_english: self
                    .into_english
                    .with_context(|| format!("{kind} section needs `into_english`"))?,
            },
            SectionKind::ReadingComprehension => SectionContent::ReadingComprehension {
                passage: self
                    .passage
                    .with_context(|| format!("{kind} section needs a [sections.passage] table"))?,
                questions: self.questions,
            },
            SectionKind::OpenQuestions => SectionContent::OpenQuestions {
                questions: self.prompts,
            },
            SectionKind::WritingTask => SectionContent::WritingTask {
                options: self.options,
            },
        };

        Ok(Section {
            title: self.title,
            description: self.description,
            marks: self.marks,
            scoring: self.scoring,
            content,
        })
    }
}

/// Parse a single TOML file into an exam and its key.
pub fn parse_exam(path: &Path) -> Result<LoadedExam> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read exam file: {}", path.display()))?;

    parse_exam_str(&content, path)
}

/// Parse a TOML string into an exam and its key.
pub fn parse_exam_str(content: &str, source_path: &Path) -> Result<LoadedExam> {
    let parsed: TomlExamFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let sections = parsed
        .sections
        .into_iter()
        .enumerate()
        .map(|(i, s)| {
            s.into_section()
                .with_context(|| format!("section {} in {}", i + 1, source_path.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    // Answers are stored per kind, so a second section of a kind would share
    // the first one's slots.
    let mut seen = HashSet::new();
    for (i, section) in sections.iter().enumerate() {
        if !seen.insert(section.kind()) {
            anyhow::bail!(
                "section {} in {}: duplicate {} section",
                i + 1,
                source_path.display(),
                section.kind()
            );
        }
    }

    Ok(LoadedExam {
        exam: ExamDefinition {
            id: parsed.exam.id,
            title: parsed.exam.title,
            description: parsed.exam.description,
            time_allowed: parsed.exam.time_allowed,
            total_marks: parsed.exam.total_marks,
            sections,
        },
        key: parsed.answer_key,
    })
}

/// Recursively load all `.toml` exam files from a directory.
pub fn load_exam_directory(dir: &Path) -> Result<Vec<LoadedExam>> {
    let mut exams = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            exams.extend(load_exam_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_exam(&path) {
                Ok(exam) => exams.push(exam),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(exams)
}

/// Fail if the declared total marks differ from what the sections can award.
pub fn check_totals(exam: &ExamDefinition) -> Result<(), ExamError> {
    let computed = exam.max_points();
    if computed != exam.total_marks {
        return Err(ExamError::TotalsMismatch {
            exam: exam.id.clone(),
            declared: exam.total_marks,
            computed,
        });
    }
    Ok(())
}

/// A warning from exam validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The section the warning is about, if any.
    pub section: Option<SectionKind>,
    pub message: String,
}

impl ValidationWarning {
    fn exam(message: impl Into<String>) -> Self {
        Self {
            section: None,
            message: message.into(),
        }
    }

    fn section(kind: SectionKind, message: impl Into<String>) -> Self {
        Self {
            section: Some(kind),
            message: message.into(),
        }
    }
}

/// Options beyond A..Z would repeat letters.
const MAX_OPTIONS: usize = 26;

/// Validate an exam and its key for authoring drift.
pub fn validate_exam(exam: &ExamDefinition, key: &AnswerKey) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    // Duplicate section kinds
    let mut seen = HashSet::new();
    for section in &exam.sections {
        if !seen.insert(section.kind()) {
            warnings.push(ValidationWarning::section(
                section.kind(),
                format!("duplicate {} section; only the first is answered", section.kind()),
            ));
        }
    }

    for section in &exam.sections {
        let kind = section.kind();

        if section.slot_count() == 0 {
            warnings.push(ValidationWarning::section(kind, "section has no questions"));
        }

        // Choice questions and their key letters
        if let SectionContent::MultipleChoice { questions }
        | SectionContent::ReadingComprehension { questions, .. } = &section.content
        {
            for (i, q) in questions.iter().enumerate() {
                if q.options.len() < 2 {
                    warnings.push(ValidationWarning::section(
                        kind,
                        format!("question {} has fewer than two options", i + 1),
                    ));
                }
                if q.options.len() > MAX_OPTIONS {
                    warnings.push(ValidationWarning::section(
                        kind,
                        format!(
                            "question {} has {} options; only {MAX_OPTIONS} get distinct letters",
                            i + 1,
                            q.options.len()
                        ),
                    ));
                }
            }
            for (i, (letter, q)) in key.expected(kind).iter().zip(questions).enumerate() {
                if !q.letters().iter().any(|l| l == letter) {
                    warnings.push(ValidationWarning::section(
                        kind,
                        format!("key answer '{letter}' for question {} is not an option", i + 1),
                    ));
                }
            }
        }

        // Key length against slot count
        let expected = key.expected(kind);
        let checks_length = match kind {
            SectionKind::MultipleChoice
            | SectionKind::FillInTheGaps
            | SectionKind::ReadingComprehension => true,
            SectionKind::OpenQuestions => !expected.is_empty(),
            SectionKind::Translation | SectionKind::WritingTask => false,
        };
        if checks_length && expected.len() != section.slot_count() {
            warnings.push(ValidationWarning::section(
                kind,
                format!(
                    "answer key has {} entries but the section has {} slots",
                    expected.len(),
                    section.slot_count()
                ),
            ));
        }

        if let SectionContent::WritingTask { options } = &section.content {
            if options.is_empty() {
                warnings.push(ValidationWarning::section(kind, "writing task offers no options"));
            }
            for option_id in key.writing_task.keys() {
                if !options.iter().any(|o| &o.id == option_id) {
                    warnings.push(ValidationWarning::section(
                        kind,
                        format!("answer key has an example for unknown option '{option_id}'"),
                    ));
                }
            }
        }

        let max = section.max_points();
        if max != section.marks {
            warnings.push(ValidationWarning::section(
                kind,
                format!(
                    "section shows {} marks but its scoring awards at most {max}",
                    section.marks
                ),
            ));
        }
    }

    // Key entries for sections the exam does not have
    for kind in SectionKind::ALL {
        let has_key = match kind {
            SectionKind::Translation => key.translation.is_some(),
            SectionKind::WritingTask => !key.writing_task.is_empty(),
            _ => !key.expected(kind).is_empty(),
        };
        if has_key && exam.section(kind).is_none() {
            warnings.push(ValidationWarning::section(
                kind,
                format!("answer key has a {kind} entry but the exam has no such section"),
            ));
        }
    }

    if let Err(e) = check_totals(exam) {
        warnings.push(ValidationWarning::exam(e.to_string()));
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const VALID_TOML: &str = r#"
[exam]
id = "mini"
title = "Mini Exam"
description = "A small exam"
time_allowed = "10 minutes"
total_marks = 8

[[sections]]
id = "multiple-choice"
title = "Multiple Choice"
marks = 2

[[sections.questions]]
prompt = "I am going to ___ my brother up from the airport."
options = ["pick", "stand", "leave", "sit"]

[[sections.questions]]
prompt = "This digital camera ___ to my friend Mai."
options = ["belongs", "belong", "have belonged", "has belonged"]

[[sections]]
id = "fill-in-the-gaps"
title = "Fill in the Gaps"
marks = 1

[sections.text]
segments = ["How are you? I'm ", " a great time here."]

[[sections]]
id = "reading-comprehension"
title = "Reading"
marks = 5

[sections.scoring]
policy = "key-match"
points = 5

[sections.passage]
title = "Taxis to the Moon"
paragraphs = ["In 1969, newspaper headlines told us that walking on the moon was possible."]

[[sections.questions]]
prompt = "In 1969, headlines told us that walking on the moon:"
options = ["was impossible", "would not happen in 1969", "was possible", "needed a special rocket"]

[answer_key]
multiple-choice = ["A", "A"]
fill-in-the-gaps = ["having"]
reading-comprehension = ["C"]
"#;

    #[test]
    fn parse_valid_toml() {
        let loaded = parse_exam_str(VALID_TOML, &PathBuf::from("mini.toml")).unwrap();
        let exam = &loaded.exam;
        assert_eq!(exam.id, "mini");
        assert_eq!(exam.sections.len(), 3);
        assert_eq!(exam.sections[0].kind(), SectionKind::MultipleChoice);
        assert_eq!(exam.sections[0].slot_count(), 2);
        assert_eq!(exam.sections[1].slot_count(), 1);
        assert_eq!(
            exam.sections[2].policy(),
            ScoringPolicy::KeyMatch {
                case_sensitive: true,
                points: 5
            }
        );
        assert_eq!(loaded.key.fill_in_the_gaps, vec!["having"]);
        assert!(validate_exam(exam, &loaded.key).is_empty());
        assert!(check_totals(exam).is_ok());
    }

    #[test]
    fn parse_missing_optional_fields() {
        let toml = r#"
[exam]
id = "minimal"
title = "Minimal"
total_marks = 0
"#;
        let loaded = parse_exam_str(toml, &PathBuf::from("minimal.toml")).unwrap();
        assert_eq!(loaded.exam.time_allowed, "60 minutes");
        assert!(loaded.exam.sections.is_empty());
        assert_eq!(loaded.key, AnswerKey::default());
    }

    #[test]
    fn unknown_section_kind_is_an_error() {
        let toml = r#"
[exam]
id = "bad"
title = "Bad"
total_marks = 1

[[sections]]
id = "essay"
title = "Essay"
marks = 1
"#;
        let err = parse_exam_str(toml, &PathBuf::from("bad.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("unknown section kind: essay"));
    }

    #[test]
    fn gaps_without_text_is_an_error() {
        let toml = r#"
[exam]
id = "bad"
title = "Bad"
total_marks = 1

[[sections]]
id = "fill-in-the-gaps"
title = "Gaps"
marks = 1
"#;
        let err = parse_exam_str(toml, &PathBuf::from("bad.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("[sections.text]"));
    }

    #[test]
    fn parse_malformed_toml() {
        let bad = "this is not [valid toml }{";
        assert!(parse_exam_str(bad, &PathBuf::from("bad.toml")).is_err());
    }

    #[test]
    fn validate_reports_key_drift() {
        let mut loaded = parse_exam_str(VALID_TOML, &PathBuf::from("mini.toml")).unwrap();
        loaded.key.multiple_choice = vec!["A".into(), "E".into(), "B".into()];
        loaded.key.open_questions = vec!["An example".into()];
        let warnings = validate_exam(&loaded.exam, &loaded.key);
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("3 entries but the section has 2 slots")));
        assert!(warnings.iter().any(|w| w.message.contains("'E'")));
        assert!(warnings
            .iter()
            .any(|w| w.section == Some(SectionKind::OpenQuestions)));
    }

    #[test]
    fn validate_warns_past_twenty_six_options() {
        let mut loaded = parse_exam_str(VALID_TOML, &PathBuf::from("mini.toml")).unwrap();
        if let SectionContent::MultipleChoice { questions } = &mut loaded.exam.sections[0].content
        {
            questions[1].options = (0..27).map(|i| format!("option {i}")).collect();
        }
        let warnings = validate_exam(&loaded.exam, &loaded.key);
        assert_eq!(warnings.len(), 1, "{warnings:?}");
        assert_eq!(
            warnings[0].message,
            "question 2 has 27 options; only 26 get distinct letters"
        );
    }

    #[test]
    fn totals_drift_is_a_warning_and_a_strict_error() {
        let drifted = VALID_TOML.replace("total_marks = 8", "total_marks = 10");
        let loaded = parse_exam_str(&drifted, &PathBuf::from("mini.toml")).unwrap();
        let warnings = validate_exam(&loaded.exam, &loaded.key);
        assert!(warnings
            .iter()
            .any(|w| w.section.is_none() && w.message.contains("declares 10")));
        assert_eq!(
            check_totals(&loaded.exam),
            Err(ExamError::TotalsMismatch {
                exam: "mini".into(),
                declared: 10,
                computed: 8
            })
        );
    }

    #[test]
    fn duplicate_section_kinds_are_rejected() {
        let doubled = format!(
            "{}\n{}",
            VALID_TOML,
            r#"
[[sections]]
id = "multiple-choice"
title = "More Multiple Choice"
marks = 0
"#
        );
        // The appended table lands after [answer_key]; TOML allows it.
        let err = parse_exam_str(&doubled, &PathBuf::from("dup.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("section 4 in dup.toml: duplicate multiple-choice section"));
    }

    #[test]
    fn validate_duplicate_sections() {
        let mut loaded = parse_exam_str(VALID_TOML, &PathBuf::from("mini.toml")).unwrap();
        let mut extra = loaded.exam.sections[0].clone();
        extra.content = SectionContent::MultipleChoice { questions: vec![] };
        extra.marks = 0;
        loaded.exam.sections.push(extra);

        let warnings = validate_exam(&loaded.exam, &loaded.key);
        assert!(warnings.iter().any(|w| w.message.contains("duplicate")));
        assert!(warnings.iter().any(|w| w.message.contains("no questions")));
    }

    #[test]
    fn load_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("mini.toml"), VALID_TOML).unwrap();
        std::fs::write(dir.path().join("broken.toml"), "not toml [").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let exams = load_exam_directory(dir.path()).unwrap();
        assert_eq!(exams.len(), 1);
        assert_eq!(exams[0].exam.id, "mini");
    }

    #[test]
    fn load_directory_rejects_files() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("mini.toml");
        std::fs::write(&file, VALID_TOML).unwrap();
        assert!(load_exam_directory(&file).is_err());
    }
}
