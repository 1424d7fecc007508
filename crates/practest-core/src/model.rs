//! Core data model types for practest.
//!
//! An exam is a list of sections, each carrying structured question data.
//! Display markup is generated from these types by `practest-report`; nothing
//! here is ever re-derived from markup.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::policy::ScoringPolicy;

/// The fixed set of section kinds an exam can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionKind {
    MultipleChoice,
    FillInTheGaps,
    Translation,
    ReadingComprehension,
    OpenQuestions,
    WritingTask,
}

impl SectionKind {
    pub const ALL: [SectionKind; 6] = [
        SectionKind::MultipleChoice,
        SectionKind::FillInTheGaps,
        SectionKind::Translation,
        SectionKind::ReadingComprehension,
        SectionKind::OpenQuestions,
        SectionKind::WritingTask,
    ];

    /// Wire id of this kind (e.g. "fill-in-the-gaps").
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::MultipleChoice => "multiple-choice",
            SectionKind::FillInTheGaps => "fill-in-the-gaps",
            SectionKind::Translation => "translation",
            SectionKind::ReadingComprehension => "reading-comprehension",
            SectionKind::OpenQuestions => "open-questions",
            SectionKind::WritingTask => "writing-task",
        }
    }

    /// Whether the learner steps through this section one question at a time.
    pub fn has_enumerable_questions(&self) -> bool {
        matches!(
            self,
            SectionKind::MultipleChoice
                | SectionKind::ReadingComprehension
                | SectionKind::OpenQuestions
        )
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "multiple-choice" => Ok(SectionKind::MultipleChoice),
            "fill-in-the-gaps" => Ok(SectionKind::FillInTheGaps),
            "translation" => Ok(SectionKind::Translation),
            "reading-comprehension" => Ok(SectionKind::ReadingComprehension),
            "open-questions" => Ok(SectionKind::OpenQuestions),
            "writing-task" => Ok(SectionKind::WritingTask),
            other => Err(format!("unknown section kind: {other}")),
        }
    }
}

/// A complete exam as authored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamDefinition {
    /// Unique identifier (e.g. "full-practice-exam-1").
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Free-form duration shown to the learner (e.g. "60 minutes").
    pub time_allowed: String,
    /// Declared total marks. Never derived from the sections.
    pub total_marks: u32,
    pub sections: Vec<Section>,
}

impl ExamDefinition {
    /// Find the first section of the given kind.
    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|s| s.kind() == kind)
    }

    /// Whether the section at `index` is the one its kind's answers belong
    /// to, i.e. the first section of that kind.
    pub fn is_graded(&self, index: usize) -> bool {
        match self.sections.get(index) {
            Some(section) => self.sections[..index]
                .iter()
                .all(|earlier| earlier.kind() != section.kind()),
            None => false,
        }
    }

    /// Number of navigable positions across all sections.
    pub fn position_count(&self) -> usize {
        self.sections.iter().map(Section::positions).sum()
    }

    /// Sum of the maximum points each section's policy can award.
    pub fn max_points(&self) -> u32 {
        self.sections
            .iter()
            .map(Section::max_points)
            .fold(0, u32::saturating_add)
    }
}

/// One part of an exam.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Marks shown to the learner for this section.
    pub marks: u32,
    /// Explicit scoring policy; `None` uses the default for the kind.
    #[serde(default)]
    pub scoring: Option<ScoringPolicy>,
    pub content: SectionContent,
}

impl Section {
    pub fn kind(&self) -> SectionKind {
        self.content.kind()
    }

    /// Number of gradable answer slots.
    pub fn slot_count(&self) -> usize {
        match &self.content {
            SectionContent::MultipleChoice { questions }
            | SectionContent::ReadingComprehension { questions, .. } => questions.len(),
            SectionContent::FillInTheGaps { text } => text.gap_count(),
            SectionContent::Translation { .. } => 2,
            SectionContent::OpenQuestions { questions } => questions.len(),
            SectionContent::WritingTask { .. } => 1,
        }
    }

    /// Number of navigable positions. Sections without sub-questions, and
    /// enumerable sections that happen to be empty, still occupy one.
    pub fn positions(&self) -> usize {
        if self.kind().has_enumerable_questions() {
            self.slot_count().max(1)
        } else {
            1
        }
    }

    /// Last valid question index within this section.
    pub fn last_index(&self) -> usize {
        self.positions() - 1
    }

    /// The scoring policy in effect for this section.
    pub fn policy(&self) -> ScoringPolicy {
        self.scoring
            .clone()
            .unwrap_or_else(|| ScoringPolicy::default_for(self))
    }

    pub fn max_points(&self) -> u32 {
        self.policy().max_points(self.slot_count())
    }
}

/// Structured content of a section, one variant per kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "id", rename_all = "kebab-case")]
pub enum SectionContent {
    MultipleChoice {
        questions: Vec<ChoiceQuestion>,
    },
    FillInTheGaps {
        text: GapText,
    },
    Translation {
        /// English source text to translate into Arabic.
        into_arabic: String,
        /// Arabic source text to translate into English.
        into_english: String,
    },
    ReadingComprehension {
        passage: Passage,
        questions: Vec<ChoiceQuestion>,
    },
    OpenQuestions {
        questions: Vec<String>,
    },
    WritingTask {
        options: Vec<WritingOption>,
    },
}

impl SectionContent {
    pub fn kind(&self) -> SectionKind {
        match self {
            SectionContent::MultipleChoice { .. } => SectionKind::MultipleChoice,
            SectionContent::FillInTheGaps { .. } => SectionKind::FillInTheGaps,
            SectionContent::Translation { .. } => SectionKind::Translation,
            SectionContent::ReadingComprehension { .. } => SectionKind::ReadingComprehension,
            SectionContent::OpenQuestions { .. } => SectionKind::OpenQuestions,
            SectionContent::WritingTask { .. } => SectionKind::WritingTask,
        }
    }
}

/// A question answered by picking one lettered option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceQuestion {
    pub prompt: String,
    /// Option texts in display order; letters come from position.
    pub options: Vec<String>,
}

impl ChoiceQuestion {
    /// Letter for the option at `index` ("A" for 0).
    pub fn letter(index: usize) -> String {
        char::from(b'A' + (index % 26) as u8).to_string()
    }

    /// Letters this question accepts, in order.
    pub fn letters(&self) -> Vec<String> {
        (0..self.options.len()).map(Self::letter).collect()
    }

    /// `(letter, text)` pairs in display order.
    pub fn lettered_options(&self) -> impl Iterator<Item = (String, &str)> {
        self.options
            .iter()
            .enumerate()
            .map(|(i, text)| (Self::letter(i), text.as_str()))
    }
}

/// A text with gaps. Each gap sits between two consecutive segments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapText {
    #[serde(default)]
    pub heading: Option<String>,
    pub segments: Vec<String>,
    #[serde(default)]
    pub closing: Option<String>,
}

impl GapText {
    pub fn gap_count(&self) -> usize {
        self.segments.len().saturating_sub(1)
    }
}

/// A reading passage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
    pub title: String,
    pub paragraphs: Vec<String>,
}

/// One choosable writing prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WritingOption {
    /// Short id recorded as the learner's choice (e.g. "email").
    pub id: String,
    pub title: String,
    pub prompt: String,
    /// Suggested structure, one bullet per entry.
    #[serde(default)]
    pub structure: Vec<String>,
}
