//! Per-section scoring policies.
//!
//! Every section is graded by exactly one policy. The defaults reproduce the
//! built-in exam weights; an exam file can override them per section.
//!
//! The presence and length policies do not check correctness. They stand in
//! for a human grader on subjective sections.

use serde::{Deserialize, Serialize};

use crate::model::{Section, SectionKind};

/// Default scoring threshold for the writing task, in characters.
pub const WRITING_MIN_CHARS: usize = 50;
/// Default credit for a complete translation.
pub const TRANSLATION_POINTS: u32 = 10;
/// Default credit per answered open question.
pub const OPEN_QUESTION_POINTS: u32 = 3;
/// Default credit for a long-enough writing task.
pub const WRITING_POINTS: u32 = 10;

/// How a section turns answers into points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "kebab-case")]
pub enum ScoringPolicy {
    /// Compare each answer with the key entry at the same index.
    KeyMatch {
        #[serde(default = "default_true")]
        case_sensitive: bool,
        #[serde(default = "default_one")]
        points: u32,
    },
    /// Full credit iff every field is non-empty.
    AllFieldsPresent { points: u32 },
    /// Credit for each answer whose trimmed text is non-empty.
    EachPresent { points: u32 },
    /// Credit iff an option is selected and the trimmed text is longer than
    /// `min_chars` characters.
    LengthThreshold { points: u32, min_chars: usize },
}

fn default_true() -> bool {
    true
}

fn default_one() -> u32 {
    1
}

/// What a policy sees of one section's answers.
#[derive(Debug, Clone, Default)]
pub struct GradingInput<'a> {
    /// Learner answers in slot order, exactly one per slot.
    pub answers: Vec<&'a str>,
    /// Key entries in slot order; may be shorter than `answers`.
    pub expected: Vec<&'a str>,
    /// Whether a writing option was picked. Always true for other sections.
    pub option_selected: bool,
}

/// Raw outcome of grading one section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Graded {
    /// Points folded into the exam score.
    pub points: u32,
    /// Breakdown numerator.
    pub correct: u32,
    /// Breakdown denominator.
    pub total: u32,
}

impl ScoringPolicy {
    /// The policy a section of this shape gets when the exam names none.
    pub fn default_for(section: &Section) -> Self {
        match section.kind() {
            SectionKind::MultipleChoice => ScoringPolicy::KeyMatch {
                case_sensitive: true,
                points: 1,
            },
            SectionKind::FillInTheGaps => ScoringPolicy::KeyMatch {
                case_sensitive: false,
                points: 1,
            },
            SectionKind::Translation => ScoringPolicy::AllFieldsPresent {
                points: TRANSLATION_POINTS,
            },
            SectionKind::ReadingComprehension => {
                let questions = section.slot_count().max(1) as u32;
                ScoringPolicy::KeyMatch {
                    case_sensitive: true,
                    points: section.marks / questions,
                }
            }
            SectionKind::OpenQuestions => ScoringPolicy::EachPresent {
                points: OPEN_QUESTION_POINTS,
            },
            SectionKind::WritingTask => ScoringPolicy::LengthThreshold {
                points: WRITING_POINTS,
                min_chars: WRITING_MIN_CHARS,
            },
        }
    }

    /// Most points this policy can award for a section with `slots` slots.
    pub fn max_points(&self, slots: usize) -> u32 {
        match self {
            ScoringPolicy::KeyMatch { points, .. } | ScoringPolicy::EachPresent { points } => {
                points.saturating_mul(u32::try_from(slots).unwrap_or(u32::MAX))
            }
            ScoringPolicy::AllFieldsPresent { points }
            | ScoringPolicy::LengthThreshold { points, .. } => *points,
        }
    }

    pub fn grade(&self, input: &GradingInput<'_>) -> Graded {
        match self {
            ScoringPolicy::KeyMatch {
                case_sensitive,
                points,
            } => {
                let correct = input
                    .answers
                    .iter()
                    .enumerate()
                    .filter(|(i, answer)| {
                        input.expected.get(*i).is_some_and(|expected| {
                            if *case_sensitive {
                                *answer == expected
                            } else {
                                answer.to_lowercase() == expected.to_lowercase()
                            }
                        })
                    })
                    .count() as u32;
                Graded {
                    points: correct.saturating_mul(*points),
                    correct,
                    total: input.answers.len() as u32,
                }
            }
            ScoringPolicy::AllFieldsPresent { points } => {
                let complete =
                    !input.answers.is_empty() && input.answers.iter().all(|a| !a.is_empty());
                let awarded = if complete { *points } else { 0 };
                Graded {
                    points: awarded,
                    correct: awarded,
                    total: *points,
                }
            }
            ScoringPolicy::EachPresent { points } => {
                let answered = input
                    .answers
                    .iter()
                    .filter(|a| !a.trim().is_empty())
                    .count() as u32;
                Graded {
                    points: answered.saturating_mul(*points),
                    correct: answered,
                    total: input.answers.len() as u32,
                }
            }
            ScoringPolicy::LengthThreshold { points, min_chars } => {
                let long_enough = input
                    .answers
                    .first()
                    .is_some_and(|text| text.trim().chars().count() > *min_chars);
                let passed = input.option_selected && long_enough;
                Graded {
                    points: if passed { *points } else { 0 },
                    correct: u32::from(passed),
                    total: 1,
                }
            }
        }
    }
}
