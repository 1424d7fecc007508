//! Exam error types.
//!
//! These cover misuse of the session API and exam definitions that break an
//! enforced invariant. Navigation past the end of an exam is not an error;
//! it is clamped to "no further question".

use thiserror::Error;

use crate::model::SectionKind;

/// Errors that can occur while recording answers or loading exams.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExamError {
    /// An answer slot index is beyond the pre-sized slot list.
    #[error("{section} slot {index} out of range (section has {len} slots)")]
    SlotOutOfRange {
        section: SectionKind,
        index: usize,
        len: usize,
    },

    /// The exam has no section of this kind.
    #[error("exam has no {0} section")]
    SectionNotInExam(SectionKind),

    /// A writing option id that the writing task does not offer.
    #[error("unknown writing option: {0}")]
    UnknownWritingOption(String),

    /// The operation needs an exam in progress.
    #[error("no exam in progress")]
    NotTaking,

    /// Declared total marks differ from the sum of section maxima.
    #[error("exam '{exam}' declares {declared} total marks but its sections add up to {computed}")]
    TotalsMismatch {
        exam: String,
        declared: u32,
        computed: u32,
    },
}

impl ExamError {
    /// Returns `true` if the error comes from the caller addressing a slot
    /// that does not exist, as opposed to a session in the wrong mode.
    pub fn is_bad_slot(&self) -> bool {
        matches!(
            self,
            ExamError::SlotOutOfRange { .. }
                | ExamError::SectionNotInExam(_)
                | ExamError::UnknownWritingOption(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_section() {
        let err = ExamError::SlotOutOfRange {
            section: SectionKind::MultipleChoice,
            index: 16,
            len: 16,
        };
        assert_eq!(
            err.to_string(),
            "multiple-choice slot 16 out of range (section has 16 slots)"
        );
        assert!(err.is_bad_slot());
        assert!(!ExamError::NotTaking.is_bad_slot());
    }
}
