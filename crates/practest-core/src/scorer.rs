//! The scorer: answers + key + exam in, `ScoreResult` out.
//!
//! Pure and deterministic. Each section is graded by its policy; the exam
//! score is the plain sum. Declared total marks are copied, never derived.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::answers::{AnswerKey, UserAnswers};
use crate::model::{ExamDefinition, SectionKind};
use crate::policy::GradingInput;

/// Outcome of one submitted attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub score: u32,
    pub total_marks: u32,
    pub section_scores: BTreeMap<SectionKind, SectionScore>,
}

/// Breakdown for one section.
///
/// `correct`/`total` count matches or answered slots for most sections; for
/// translation they carry points, and for the writing task they are 0 or 1
/// out of 1 regardless of the points awarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionScore {
    pub correct: u32,
    pub total: u32,
}

impl SectionScore {
    pub fn percentage(&self) -> u32 {
        rounded_percent(self.correct, self.total)
    }
}

/// Grade `answers` against `key` for every section of `exam`.
///
/// A kind that appears more than once is graded for its first section only,
/// matching how answers are sized.
pub fn score(answers: &UserAnswers, key: &AnswerKey, exam: &ExamDefinition) -> ScoreResult {
    let mut total = 0u32;
    let mut section_scores = BTreeMap::new();

    for section in &exam.sections {
        let kind = section.kind();
        if section_scores.contains_key(&kind) {
            continue;
        }

        // One answer per slot the section defines, whatever the answers hold.
        let mut given = answers.slots(kind);
        given.resize(section.slot_count(), "");

        let input = GradingInput {
            answers: given,
            expected: key.expected(kind),
            option_selected: kind != SectionKind::WritingTask
                || answers.writing_task.option.is_some(),
        };
        let graded = section.policy().grade(&input);
        tracing::debug!(
            section = %kind,
            points = graded.points,
            correct = graded.correct,
            total = graded.total,
            "graded section"
        );

        total = total.saturating_add(graded.points);
        section_scores.insert(
            kind,
            SectionScore {
                correct: graded.correct,
                total: graded.total,
            },
        );
    }

    ScoreResult {
        score: total,
        total_marks: exam.total_marks,
        section_scores,
    }
}

impl ScoreResult {
    /// Score as a rounded percentage of the declared total marks.
    pub fn percentage(&self) -> u32 {
        rounded_percent(self.score, self.total_marks)
    }

    pub fn section(&self, kind: SectionKind) -> Option<&SectionScore> {
        self.section_scores.get(&kind)
    }

    /// Breakdown percentage for one section, `None` if it was not graded.
    pub fn section_percentage(&self, kind: SectionKind) -> Option<u32> {
        self.section(kind).map(SectionScore::percentage)
    }

    pub fn feedback(&self) -> Feedback {
        Feedback::for_percentage(self.percentage())
    }
}

fn rounded_percent(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((f64::from(part) / f64::from(whole)) * 100.0).round() as u32
}

/// Feedback band shown with the results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Feedback {
    Excellent,
    Great,
    Passed,
    NeedsPractice,
}

impl Feedback {
    pub fn for_percentage(percentage: u32) -> Self {
        match percentage {
            90.. => Feedback::Excellent,
            70..=89 => Feedback::Great,
            50..=69 => Feedback::Passed,
            _ => Feedback::NeedsPractice,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Feedback::Excellent => "Excellent! You've achieved a remarkable score.",
            Feedback::Great => "Great job! You've done well on this exam.",
            Feedback::Passed => "Good effort! You've passed the exam.",
            Feedback::NeedsPractice => "You need more practice. Keep studying!",
        }
    }

    pub fn passed(&self) -> bool {
        !matches!(self, Feedback::NeedsPractice)
    }
}
