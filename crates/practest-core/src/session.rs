//! Exam session controller.
//!
//! A `Session` owns one learner's pass through an exam: the view / take /
//! results mode, the current position, and the answers. It delegates scoring
//! to [`crate::scorer::score`] and knows nothing about rendering.
//!
//! ```text
//! View --start--> Take --(next past the end | submit)--> Results
//!   ^                                                      |
//!   +------------------------return_to_view----------------+
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::answers::{AnswerKey, AnswerSlot, UserAnswers};
use crate::error::ExamError;
use crate::model::{
    ChoiceQuestion, ExamDefinition, GapText, Passage, Section, SectionContent, SectionKind,
    WritingOption,
};
use crate::scorer::{score, ScoreResult};

/// Minimum writing length, in characters, before the learner may move on.
pub const DEFAULT_WRITING_GATE_CHARS: usize = 10;

/// Session tunables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// Gate for leaving the writing task. Distinct from the scoring
    /// threshold in the writing policy.
    pub writing_gate_chars: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            writing_gate_chars: DEFAULT_WRITING_GATE_CHARS,
        }
    }
}

/// Where the session is in its lifecycle. Results exist only in `Results`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    View,
    Take,
    Results(ScoreResult),
}

impl Mode {
    pub fn name(&self) -> &'static str {
        match self {
            Mode::View => "view",
            Mode::Take => "take",
            Mode::Results(_) => "results",
        }
    }
}

/// Section index plus question index within that section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub section: usize,
    pub question: usize,
}

/// What a navigation call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Moved(Position),
    /// The exam was scored and the session is now in `Results`.
    Finished,
    /// Nothing changed.
    Stayed,
}

/// 1-based question number across the exam, out of all positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub current: usize,
    pub total: usize,
}

impl Progress {
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.current as f64 / self.total as f64 * 100.0
    }
}

/// Borrowed view of the question at the current position.
#[derive(Debug, Clone, Copy)]
pub enum CurrentQuestion<'a> {
    Choice {
        kind: SectionKind,
        index: usize,
        count: usize,
        question: &'a ChoiceQuestion,
        passage: Option<&'a Passage>,
    },
    Gaps(&'a GapText),
    Translation {
        into_arabic: &'a str,
        into_english: &'a str,
    },
    Open {
        index: usize,
        count: usize,
        prompt: &'a str,
    },
    Writing(&'a [WritingOption]),
}

/// One learner's exam session.
#[derive(Debug, Clone)]
pub struct Session {
    exam: Arc<ExamDefinition>,
    key: Arc<AnswerKey>,
    options: SessionOptions,
    mode: Mode,
    position: Position,
    answers: UserAnswers,
    last_result: Option<ScoreResult>,
}

impl Session {
    pub fn new(exam: Arc<ExamDefinition>, key: Arc<AnswerKey>) -> Self {
        let answers = UserAnswers::blank(&exam);
        Self {
            exam,
            key,
            options: SessionOptions::default(),
            mode: Mode::View,
            position: Position::default(),
            answers,
            last_result: None,
        }
    }

    pub fn with_options(mut self, options: SessionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn exam(&self) -> &ExamDefinition {
        &self.exam
    }

    pub fn key(&self) -> &AnswerKey {
        &self.key
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn is_taking(&self) -> bool {
        matches!(self.mode, Mode::Take)
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn answers(&self) -> &UserAnswers {
        &self.answers
    }

    /// Result of the submitted attempt while in `Results`.
    pub fn result(&self) -> Option<&ScoreResult> {
        match &self.mode {
            Mode::Results(result) => Some(result),
            _ => None,
        }
    }

    /// Most recent result, kept after `return_to_view` until the next `start`.
    pub fn last_result(&self) -> Option<&ScoreResult> {
        self.last_result.as_ref()
    }

    /// Begin a fresh attempt. Every answer slot is reset.
    pub fn start(&mut self) {
        self.answers = UserAnswers::blank(&self.exam);
        self.position = Position::default();
        self.last_result = None;
        self.mode = Mode::Take;
        tracing::debug!(exam = %self.exam.id, "exam started");
    }

    /// Replace exactly one answer slot. Navigation is untouched.
    pub fn record(&mut self, slot: AnswerSlot, value: impl Into<String>) -> Result<(), ExamError> {
        if !self.is_taking() {
            return Err(ExamError::NotTaking);
        }
        self.answers.set(&self.exam, slot, value.into())
    }

    /// Advance one question, crossing into the next section when the current
    /// one is done. Past the last question the exam is scored.
    pub fn next(&mut self) -> Step {
        if !self.is_taking() {
            return Step::Stayed;
        }

        let Some(section) = self.exam.sections.get(self.position.section) else {
            self.finish();
            return Step::Finished;
        };

        if self.position.question < section.last_index() {
            self.position.question += 1;
        } else if self.position.section + 1 < self.exam.sections.len() {
            self.position = Position {
                section: self.position.section + 1,
                question: 0,
            };
        } else {
            self.finish();
            return Step::Finished;
        }

        tracing::debug!(
            section = self.position.section,
            question = self.position.question,
            "moved forward"
        );
        Step::Moved(self.position)
    }

    /// Inverse of [`Session::next`]. A no-op on the very first question.
    pub fn prev(&mut self) -> Step {
        if !self.is_taking() {
            return Step::Stayed;
        }

        if self.position.question > 0 {
            self.position.question -= 1;
        } else if self.position.section > 0 {
            let section = self.position.section - 1;
            let question = self
                .exam
                .sections
                .get(section)
                .map(Section::last_index)
                .unwrap_or(0);
            self.position = Position { section, question };
        } else {
            return Step::Stayed;
        }

        tracing::debug!(
            section = self.position.section,
            question = self.position.question,
            "moved back"
        );
        Step::Moved(self.position)
    }

    /// Score the current answers and switch to `Results`.
    pub fn submit(&mut self) -> Result<ScoreResult, ExamError> {
        if !self.is_taking() {
            return Err(ExamError::NotTaking);
        }
        Ok(self.finish())
    }

    pub fn return_to_view(&mut self) {
        self.mode = Mode::View;
    }

    fn finish(&mut self) -> ScoreResult {
        let result = score(&self.answers, &self.key, &self.exam);
        tracing::info!(
            exam = %self.exam.id,
            score = result.score,
            total_marks = result.total_marks,
            "exam submitted"
        );
        self.last_result = Some(result.clone());
        self.mode = Mode::Results(result.clone());
        result
    }

    pub fn current_section(&self) -> Option<&Section> {
        self.exam.sections.get(self.position.section)
    }

    /// The question to render, or `None` when not taking the exam or the
    /// position addresses nothing ("no further question").
    pub fn current_question(&self) -> Option<CurrentQuestion<'_>> {
        if !self.is_taking() {
            return None;
        }
        let section = self.current_section()?;
        let index = self.position.question;
        let kind = section.kind();

        match &section.content {
            SectionContent::MultipleChoice { questions } => Some(CurrentQuestion::Choice {
                kind,
                index,
                count: questions.len(),
                question: questions.get(index)?,
                passage: None,
            }),
            SectionContent::ReadingComprehension { passage, questions } => {
                Some(CurrentQuestion::Choice {
                    kind,
                    index,
                    count: questions.len(),
                    question: questions.get(index)?,
                    passage: Some(passage),
                })
            }
            SectionContent::FillInTheGaps { text } => Some(CurrentQuestion::Gaps(text)),
            SectionContent::Translation {
                into_arabic,
                into_english,
            } => Some(CurrentQuestion::Translation {
                into_arabic,
                into_english,
            }),
            SectionContent::OpenQuestions { questions } => Some(CurrentQuestion::Open {
                index,
                count: questions.len(),
                prompt: questions.get(index)?,
            }),
            SectionContent::WritingTask { options } => Some(CurrentQuestion::Writing(options)),
        }
    }

    /// Whether answers given at the current position are stored and graded.
    /// A repeated section kind only shares the first section's slots.
    pub fn current_section_is_graded(&self) -> bool {
        self.exam.is_graded(self.position.section)
    }

    /// Slot answered at the current position for single-slot questions.
    pub fn current_slot(&self) -> Option<AnswerSlot> {
        if !self.current_section_is_graded() {
            return None;
        }
        let section = self.current_section()?;
        let index = self.position.question;
        match section.kind() {
            SectionKind::MultipleChoice => Some(AnswerSlot::MultipleChoice(index)),
            SectionKind::ReadingComprehension => Some(AnswerSlot::Reading(index)),
            SectionKind::OpenQuestions => Some(AnswerSlot::Open(index)),
            SectionKind::WritingTask => Some(AnswerSlot::WritingContent),
            SectionKind::FillInTheGaps | SectionKind::Translation => None,
        }
    }

    pub fn progress(&self) -> Progress {
        let before: usize = self
            .exam
            .sections
            .iter()
            .take(self.position.section)
            .map(Section::positions)
            .sum();
        Progress {
            current: before + self.position.question + 1,
            total: self.exam.position_count(),
        }
    }

    pub fn can_go_back(&self) -> bool {
        self.is_taking() && self.position != Position::default()
    }

    /// Whether the "next" control should be enabled. Only the writing task
    /// gates: an option must be picked and the text must reach the gate
    /// length. `next` itself does not check this.
    pub fn can_advance(&self) -> bool {
        if !self.is_taking() {
            return false;
        }
        match self.current_section().map(Section::kind) {
            Some(SectionKind::WritingTask) => {
                let writing = &self.answers.writing_task;
                writing.option.is_some()
                    && writing.content.chars().count() >= self.options.writing_gate_chars
            }
            _ => true,
        }
    }

    /// Whether `next` from here finishes the exam.
    pub fn is_last_position(&self) -> bool {
        let sections = self.exam.sections.len();
        match self.current_section() {
            Some(section) => {
                self.position.section + 1 == sections
                    && self.position.question >= section.last_index()
            }
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answers::TranslationField;
    use crate::catalog;
    use crate::parser::LoadedExam;

    fn session(entry: LoadedExam) -> Session {
        Session::new(Arc::new(entry.exam), Arc::new(entry.key))
    }

    fn full() -> Session {
        session(catalog::full_practice_exam().unwrap())
    }

    fn space() -> Session {
        session(catalog::space_reading_exam().unwrap())
    }

    #[test]
    fn new_session_is_in_view() {
        let s = full();
        assert_eq!(s.mode(), &Mode::View);
        assert!(s.result().is_none());
        assert!(s.current_question().is_none());
    }

    #[test]
    fn start_resets_everything() {
        let mut s = full();
        s.start();
        s.record(AnswerSlot::MultipleChoice(0), "A").unwrap();
        s.record(AnswerSlot::Gap(2), "doing").unwrap();
        s.next();
        s.next();
        s.submit().unwrap();

        s.start();
        assert_eq!(s.mode(), &Mode::Take);
        assert_eq!(s.position(), Position::default());
        assert_eq!(s.answers(), &UserAnswers::blank(s.exam()));
        assert!(s.last_result().is_none());
    }

    #[test]
    fn record_requires_take_mode() {
        let mut s = full();
        assert_eq!(
            s.record(AnswerSlot::MultipleChoice(0), "A"),
            Err(ExamError::NotTaking)
        );
    }

    #[test]
    fn record_does_not_move() {
        let mut s = full();
        s.start();
        s.record(
            AnswerSlot::Translation(TranslationField::English),
            "There are many advantages",
        )
        .unwrap();
        assert_eq!(s.position(), Position::default());
        assert_eq!(
            s.answers()
                .get(AnswerSlot::Translation(TranslationField::English)),
            Some("There are many advantages")
        );
    }

    #[test]
    fn next_walks_every_position_then_finishes() {
        let mut s = full();
        s.start();
        let total = s.exam().position_count();
        assert_eq!(total, 16 + 1 + 1 + 6);

        for step in 1..total {
            match s.next() {
                Step::Moved(_) => assert_eq!(s.progress().current, step + 1),
                other => panic!("unexpected {other:?} at step {step}"),
            }
            assert!(s.is_taking());
        }
        assert!(s.is_last_position());
        assert_eq!(s.next(), Step::Finished);
        assert!(s.result().is_some());
        assert_eq!(s.mode().name(), "results");
    }

    #[test]
    fn next_crosses_sections_at_the_right_index() {
        let mut s = full();
        s.start();
        for _ in 0..15 {
            s.next();
        }
        assert_eq!(
            s.position(),
            Position {
                section: 0,
                question: 15
            }
        );
        s.next();
        assert_eq!(
            s.position(),
            Position {
                section: 1,
                question: 0
            }
        );
        // Gaps and translation are single positions.
        s.next();
        assert_eq!(s.position().section, 2);
        s.next();
        assert_eq!(
            s.position(),
            Position {
                section: 3,
                question: 0
            }
        );
    }

    #[test]
    fn prev_inverts_next_everywhere_but_the_start() {
        for mut s in [full(), space()] {
            s.start();
            assert_eq!(s.prev(), Step::Stayed);

            let mut forward = vec![s.position()];
            while !s.is_last_position() {
                s.next();
                forward.push(s.position());
            }
            forward.pop();
            while let Some(expected) = forward.pop() {
                assert_eq!(s.prev(), Step::Moved(expected));
            }
            assert_eq!(s.position(), Position::default());
            assert_eq!(s.prev(), Step::Stayed);
        }
    }

    #[test]
    fn prev_lands_on_last_question_of_previous_section() {
        let mut s = space();
        s.start();
        for _ in 0..4 {
            s.next();
        }
        assert_eq!(
            s.position(),
            Position {
                section: 1,
                question: 0
            }
        );
        s.prev();
        assert_eq!(
            s.position(),
            Position {
                section: 0,
                question: 3
            }
        );
    }

    #[test]
    fn submit_only_while_taking() {
        let mut s = full();
        assert_eq!(s.submit(), Err(ExamError::NotTaking));
        s.start();
        let result = s.submit().unwrap();
        assert_eq!(result.total_marks, 50);
        assert_eq!(s.result(), Some(&result));
        assert_eq!(s.next(), Step::Stayed);
    }

    #[test]
    fn return_to_view_keeps_last_result() {
        let mut s = full();
        s.start();
        s.record(AnswerSlot::MultipleChoice(0), "A").unwrap();
        let result = s.submit().unwrap();
        s.return_to_view();
        assert_eq!(s.mode(), &Mode::View);
        assert!(s.result().is_none());
        assert_eq!(s.last_result(), Some(&result));
    }

    #[test]
    fn current_question_follows_position() {
        let mut s = space();
        s.start();
        match s.current_question() {
            Some(CurrentQuestion::Choice {
                kind,
                index,
                count,
                question,
                passage,
            }) => {
                assert_eq!(kind, SectionKind::ReadingComprehension);
                assert_eq!(index, 0);
                assert_eq!(count, 4);
                assert_eq!(question.prompt, "In the future we will...");
                assert!(passage.is_some());
            }
            other => panic!("unexpected {other:?}"),
        }
        for _ in 0..5 {
            s.next();
        }
        match s.current_question() {
            Some(CurrentQuestion::Open { index, prompt, .. }) => {
                assert_eq!(index, 1);
                assert!(prompt.contains("cheaper"));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(s.current_slot(), Some(AnswerSlot::Open(1)));
    }

    #[test]
    fn writing_gate_controls_advance() {
        let mut s = space();
        s.start();
        while !s.is_last_position() {
            assert!(s.can_advance());
            s.next();
        }
        assert!(!s.can_advance());
        s.record(AnswerSlot::WritingContent, "Short text").unwrap();
        assert!(!s.can_advance(), "option still missing");
        s.record(AnswerSlot::WritingOption, "email").unwrap();
        assert!(s.can_advance(), "10 characters reaches the gate");

        s.record(AnswerSlot::WritingContent, "Too short").unwrap();
        assert!(!s.can_advance());
    }

    #[test]
    fn custom_gate_is_respected() {
        let entry = catalog::space_reading_exam().unwrap();
        let mut s = Session::new(Arc::new(entry.exam), Arc::new(entry.key)).with_options(
            SessionOptions {
                writing_gate_chars: 0,
            },
        );
        s.start();
        while !s.is_last_position() {
            s.next();
        }
        s.record(AnswerSlot::WritingOption, "diary").unwrap();
        assert!(s.can_advance());
    }

    #[test]
    fn empty_exam_finishes_immediately() {
        let exam = ExamDefinition {
            id: "empty".into(),
            title: "Empty".into(),
            description: String::new(),
            time_allowed: "0 minutes".into(),
            total_marks: 0,
            sections: vec![],
        };
        let mut s = Session::new(Arc::new(exam), Arc::new(AnswerKey::default()));
        s.start();
        assert!(s.current_question().is_none());
        assert!(s.is_last_position());
        assert_eq!(s.next(), Step::Finished);
        assert_eq!(s.result().map(|r| r.score), Some(0));
    }

    #[test]
    fn repeated_section_kind_has_no_slot() {
        let mut exam = catalog::full_practice_exam().unwrap().exam;
        let repeat = exam.sections[0].clone();
        exam.sections.truncate(1);
        exam.sections.push(repeat);
        let mut s = Session::new(Arc::new(exam), Arc::new(AnswerKey::default()));
        s.start();

        assert!(s.current_section_is_graded());
        assert_eq!(s.current_slot(), Some(AnswerSlot::MultipleChoice(0)));
        s.record(AnswerSlot::MultipleChoice(0), "A").unwrap();

        for _ in 0..16 {
            s.next();
        }
        assert_eq!(
            s.position(),
            Position {
                section: 1,
                question: 0
            }
        );
        assert!(!s.current_section_is_graded());
        assert_eq!(s.current_slot(), None);
        assert_eq!(s.answers().multiple_choice[0], "A");
    }

    #[test]
    fn progress_counts_positions() {
        let mut s = space();
        s.start();
        assert_eq!(
            s.progress(),
            Progress {
                current: 1,
                total: 8
            }
        );
        for _ in 0..7 {
            s.next();
        }
        assert_eq!(s.progress().current, 8);
        assert!((s.progress().percentage() - 100.0).abs() < f64::EPSILON);
    }
}
