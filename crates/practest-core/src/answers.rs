//! Answer key and learner answers.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ExamError;
use crate::model::{ExamDefinition, SectionContent, SectionKind};

/// Static reference answers, keyed by section id.
///
/// Curated alongside an exam but not structurally tied to it; see
/// `parser::validate_exam` for the consistency checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct AnswerKey {
    /// Expected choice letters.
    pub multiple_choice: Vec<String>,
    /// Expected words or phrases, compared case-insensitively by default.
    pub fill_in_the_gaps: Vec<String>,
    /// Model translations. Shown to the learner, never compared.
    pub translation: Option<TranslationAnswer>,
    /// Expected choice letters.
    pub reading_comprehension: Vec<String>,
    /// Example answers for the open questions.
    pub open_questions: Vec<String>,
    /// Example text per writing option id.
    pub writing_task: BTreeMap<String, String>,
}

impl AnswerKey {
    /// Key entries a section's slots are compared against.
    pub fn expected(&self, kind: SectionKind) -> Vec<&str> {
        match kind {
            SectionKind::MultipleChoice => as_strs(&self.multiple_choice),
            SectionKind::FillInTheGaps => as_strs(&self.fill_in_the_gaps),
            SectionKind::ReadingComprehension => as_strs(&self.reading_comprehension),
            SectionKind::OpenQuestions => as_strs(&self.open_questions),
            SectionKind::Translation => self
                .translation
                .as_ref()
                .map(|t| vec![t.arabic.as_str(), t.english.as_str()])
                .unwrap_or_default(),
            SectionKind::WritingTask => Vec::new(),
        }
    }
}

fn as_strs(values: &[String]) -> Vec<&str> {
    values.iter().map(String::as_str).collect()
}

/// The two translation directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationField {
    Arabic,
    English,
}

impl fmt::Display for TranslationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslationField::Arabic => write!(f, "arabic"),
            TranslationField::English => write!(f, "english"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationAnswer {
    #[serde(default)]
    pub arabic: String,
    #[serde(default)]
    pub english: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WritingAnswer {
    /// Id of the chosen writing option.
    #[serde(default)]
    pub option: Option<String>,
    #[serde(default)]
    pub content: String,
}

/// Addresses exactly one answer slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerSlot {
    MultipleChoice(usize),
    Gap(usize),
    Translation(TranslationField),
    Reading(usize),
    Open(usize),
    WritingOption,
    WritingContent,
}

impl AnswerSlot {
    pub fn section(&self) -> SectionKind {
        match self {
            AnswerSlot::MultipleChoice(_) => SectionKind::MultipleChoice,
            AnswerSlot::Gap(_) => SectionKind::FillInTheGaps,
            AnswerSlot::Translation(_) => SectionKind::Translation,
            AnswerSlot::Reading(_) => SectionKind::ReadingComprehension,
            AnswerSlot::Open(_) => SectionKind::OpenQuestions,
            AnswerSlot::WritingOption | AnswerSlot::WritingContent => SectionKind::WritingTask,
        }
    }
}

/// A learner's in-progress answers, one slot per gradable question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct UserAnswers {
    pub multiple_choice: Vec<String>,
    pub fill_in_the_gaps: Vec<String>,
    pub translation: TranslationAnswer,
    pub reading_comprehension: Vec<String>,
    pub open_questions: Vec<String>,
    pub writing_task: WritingAnswer,
}

impl UserAnswers {
    /// Empty answers with every slot list sized to the exam's questions.
    pub fn blank(exam: &ExamDefinition) -> Self {
        let mut answers = UserAnswers::default();
        for kind in SectionKind::ALL {
            let Some(section) = exam.section(kind) else {
                continue;
            };
            let slots = vec![String::new(); section.slot_count()];
            match kind {
                SectionKind::MultipleChoice => answers.multiple_choice = slots,
                SectionKind::FillInTheGaps => answers.fill_in_the_gaps = slots,
                SectionKind::ReadingComprehension => answers.reading_comprehension = slots,
                SectionKind::OpenQuestions => answers.open_questions = slots,
                SectionKind::Translation | SectionKind::WritingTask => {}
            }
        }
        answers
    }

    /// Resize every slot list to the exam's question counts.
    ///
    /// Answers loaded from a file may leave trailing questions out, which
    /// then count as unanswered. Entries past the last question are dropped.
    pub fn fill_missing(&mut self, exam: &ExamDefinition) {
        let blank = UserAnswers::blank(exam);
        for (list, sized) in [
            (&mut self.multiple_choice, blank.multiple_choice.len()),
            (&mut self.fill_in_the_gaps, blank.fill_in_the_gaps.len()),
            (
                &mut self.reading_comprehension,
                blank.reading_comprehension.len(),
            ),
            (&mut self.open_questions, blank.open_questions.len()),
        ] {
            list.resize(sized, String::new());
        }
    }

    /// Answers a section's policy grades, in slot order.
    pub fn slots(&self, kind: SectionKind) -> Vec<&str> {
        match kind {
            SectionKind::MultipleChoice => as_strs(&self.multiple_choice),
            SectionKind::FillInTheGaps => as_strs(&self.fill_in_the_gaps),
            SectionKind::ReadingComprehension => as_strs(&self.reading_comprehension),
            SectionKind::OpenQuestions => as_strs(&self.open_questions),
            SectionKind::Translation => {
                vec![
                    self.translation.arabic.as_str(),
                    self.translation.english.as_str(),
                ]
            }
            SectionKind::WritingTask => vec![self.writing_task.content.as_str()],
        }
    }

    /// Current value of one slot. Unknown slots read as `None`.
    pub fn get(&self, slot: AnswerSlot) -> Option<&str> {
        match slot {
            AnswerSlot::MultipleChoice(i) => self.multiple_choice.get(i).map(String::as_str),
            AnswerSlot::Gap(i) => self.fill_in_the_gaps.get(i).map(String::as_str),
            AnswerSlot::Reading(i) => self.reading_comprehension.get(i).map(String::as_str),
            AnswerSlot::Open(i) => self.open_questions.get(i).map(String::as_str),
            AnswerSlot::Translation(TranslationField::Arabic) => {
                Some(self.translation.arabic.as_str())
            }
            AnswerSlot::Translation(TranslationField::English) => {
                Some(self.translation.english.as_str())
            }
            AnswerSlot::WritingOption => self.writing_task.option.as_deref(),
            AnswerSlot::WritingContent => Some(self.writing_task.content.as_str()),
        }
    }

    /// Replace exactly one slot.
    ///
    /// The slot must exist in `exam`; writing options must be one the exam
    /// offers. On error nothing is changed.
    pub fn set(
        &mut self,
        exam: &ExamDefinition,
        slot: AnswerSlot,
        value: String,
    ) -> Result<(), ExamError> {
        let kind = slot.section();
        let section = exam
            .section(kind)
            .ok_or(ExamError::SectionNotInExam(kind))?;

        let indexed = match slot {
            AnswerSlot::MultipleChoice(i) => Some((&mut self.multiple_choice, i)),
            AnswerSlot::Gap(i) => Some((&mut self.fill_in_the_gaps, i)),
            AnswerSlot::Reading(i) => Some((&mut self.reading_comprehension, i)),
            AnswerSlot::Open(i) => Some((&mut self.open_questions, i)),
            _ => None,
        };
        if let Some((list, index)) = indexed {
            let len = list.len();
            let entry = list.get_mut(index).ok_or(ExamError::SlotOutOfRange {
                section: kind,
                index,
                len,
            })?;
            *entry = value;
            return Ok(());
        }

        match slot {
            AnswerSlot::Translation(TranslationField::Arabic) => self.translation.arabic = value,
            AnswerSlot::Translation(TranslationField::English) => {
                self.translation.english = value
            }
            AnswerSlot::WritingOption => {
                let offered = match &section.content {
                    SectionContent::WritingTask { options } => {
                        options.iter().any(|o| o.id == value)
                    }
                    _ => false,
                };
                if !offered {
                    return Err(ExamError::UnknownWritingOption(value));
                }
                self.writing_task.option = Some(value);
            }
            AnswerSlot::WritingContent => self.writing_task.content = value,
            _ => {}
        }
        Ok(())
    }
}
