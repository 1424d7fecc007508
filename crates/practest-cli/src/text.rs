//! Plain-text rendering for the terminal.

use practest_core::answers::{AnswerKey, UserAnswers};
use practest_core::grammar::GrammarRule;
use practest_core::model::{
    ChoiceQuestion, ExamDefinition, GapText, Passage, Section, SectionContent, SectionKind,
    WritingOption,
};
use practest_core::session::CurrentQuestion;

const BLANK: &str = "___";

pub fn exam_header(exam: &ExamDefinition) -> String {
    let mut out = format!("{}\n", exam.title);
    if !exam.description.is_empty() {
        out.push_str(&format!("{}\n", exam.description));
    }
    out.push_str(&format!(
        "Time allowed: {} | Total marks: {}\n",
        exam.time_allowed, exam.total_marks
    ));
    out
}

pub fn section_heading(section: &Section) -> String {
    let mut out = format!("== {} ({} marks) ==\n", section.title, section.marks);
    if let Some(description) = &section.description {
        out.push_str(&format!("{description}\n"));
    }
    out
}

/// A whole section, as shown in view mode.
pub fn section_text(section: &Section) -> String {
    let mut out = section_heading(section);
    out.push('\n');
    match &section.content {
        SectionContent::MultipleChoice { questions } => {
            for (i, q) in questions.iter().enumerate() {
                out.push_str(&choice_text(i, q));
            }
        }
        SectionContent::FillInTheGaps { text } => out.push_str(&gap_text(text, None)),
        SectionContent::Translation {
            into_arabic,
            into_english,
        } => out.push_str(&translation_text(into_arabic, into_english)),
        SectionContent::ReadingComprehension { passage, questions } => {
            out.push_str(&passage_text(passage));
            out.push_str("Questions:\n");
            for (i, q) in questions.iter().enumerate() {
                out.push_str(&choice_text(i, q));
            }
        }
        SectionContent::OpenQuestions { questions } => {
            for (i, prompt) in questions.iter().enumerate() {
                out.push_str(&format!("{}. {prompt}\n", i + 1));
            }
        }
        SectionContent::WritingTask { options } => out.push_str(&writing_text(options)),
    }
    out
}

fn choice_text(index: usize, q: &ChoiceQuestion) -> String {
    let mut out = format!("{}. {}\n", index + 1, q.prompt);
    for (letter, option) in q.lettered_options() {
        out.push_str(&format!("   {letter}. {option}\n"));
    }
    out
}

/// Gap text with numbered blanks, filled in where `filled` has an answer.
fn gap_text(text: &GapText, filled: Option<&[String]>) -> String {
    let mut out = String::new();
    if let Some(heading) = &text.heading {
        out.push_str(&format!("{heading}\n"));
    }
    for (i, segment) in text.segments.iter().enumerate() {
        out.push_str(segment);
        if i + 1 < text.segments.len() {
            let answer = filled
                .and_then(|f| f.get(i))
                .filter(|a| !a.is_empty())
                .map(String::as_str)
                .unwrap_or(BLANK);
            out.push_str(&format!("({}) {answer}", i + 1));
        }
    }
    out.push('\n');
    if let Some(closing) = &text.closing {
        out.push_str(&format!("{closing}\n"));
    }
    out
}

fn translation_text(into_arabic: &str, into_english: &str) -> String {
    format!(
        "A. Translate the following into Arabic:\n   {into_arabic}\n\
         B. Translate the following into English:\n   {into_english}\n"
    )
}

fn passage_text(passage: &Passage) -> String {
    let mut out = format!("Text: {}\n\n", passage.title);
    for paragraph in &passage.paragraphs {
        out.push_str(&format!("{paragraph}\n\n"));
    }
    out
}

fn writing_text(options: &[WritingOption]) -> String {
    let mut out = String::new();
    for (i, option) in options.iter().enumerate() {
        out.push_str(&format!(
            "Option {} [{}]: {}\n{}\n",
            i + 1,
            option.id,
            option.title,
            option.prompt
        ));
        if !option.structure.is_empty() {
            out.push_str("Use this structure:\n");
            for step in &option.structure {
                out.push_str(&format!("  - {step}\n"));
            }
        }
        out.push('\n');
    }
    out
}

/// The question at the current position, with how to answer it.
pub fn question_text(question: &CurrentQuestion<'_>, answers: &UserAnswers) -> String {
    match question {
        CurrentQuestion::Choice {
            kind,
            index,
            count,
            question,
            passage,
        } => {
            let mut out = String::new();
            if *index == 0 {
                if let Some(passage) = passage {
                    out.push_str(&passage_text(passage));
                }
            }
            out.push_str(&format!("Question {} of {count}\n", index + 1));
            out.push_str(&choice_text(*index, question));
            let current = match kind {
                SectionKind::ReadingComprehension => answers.reading_comprehension.get(*index),
                _ => answers.multiple_choice.get(*index),
            };
            if let Some(answer) = current.filter(|a| !a.is_empty()) {
                out.push_str(&format!("Your answer: {answer}\n"));
            }
            out.push_str("Answer with a letter.\n");
            out
        }
        CurrentQuestion::Gaps(text) => {
            let mut out = gap_text(text, Some(&answers.fill_in_the_gaps));
            out.push_str("Fill a gap with `<number> <words>`, e.g. `1 having`.\n");
            out
        }
        CurrentQuestion::Translation {
            into_arabic,
            into_english,
        } => {
            let mut out = translation_text(into_arabic, into_english);
            out.push_str("Answer with `ar <text>` or `en <text>`.\n");
            out
        }
        CurrentQuestion::Open {
            index,
            count,
            prompt,
        } => {
            let mut out = format!("Question {} of {count}\n{prompt}\n", index + 1);
            if let Some(answer) = answers.open_questions.get(*index).filter(|a| !a.is_empty()) {
                out.push_str(&format!("Your answer: {answer}\n"));
            }
            out
        }
        CurrentQuestion::Writing(options) => {
            let mut out = writing_text(options);
            let writing = &answers.writing_task;
            match &writing.option {
                Some(option) => out.push_str(&format!(
                    "Chosen option: {option} ({} characters written)\n",
                    writing.content.chars().count()
                )),
                None => out.push_str("Choose with `:option <id>`, then type your text.\n"),
            }
            out
        }
    }
}

pub fn answer_key_text(exam: &ExamDefinition, key: &AnswerKey) -> String {
    let mut out = String::from("== Answer Key ==\n");
    for section in &exam.sections {
        let kind = section.kind();
        out.push_str(&format!("\n{}\n", section.title));
        match kind {
            SectionKind::Translation => {
                if let Some(t) = &key.translation {
                    out.push_str(&format!("Arabic: {}\nEnglish: {}\n", t.arabic, t.english));
                }
            }
            SectionKind::WritingTask => {
                for (option, example) in &key.writing_task {
                    out.push_str(&format!("Example ({option}):\n{}\n", example.trim()));
                }
            }
            _ => {
                for (i, answer) in key.expected(kind).iter().enumerate() {
                    out.push_str(&format!("{}. {answer}\n", i + 1));
                }
            }
        }
    }
    out
}

pub fn grammar_text(rule: &GrammarRule) -> String {
    format!(
        "{}. {}\n{}\n  When to use: {}\n  How to use:  {}\n  Example:     {}\n  Arabic:      {}\n",
        rule.id,
        rule.title,
        rule.definition,
        rule.when_to_use,
        rule.how_to_use,
        rule.example,
        rule.translation
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use practest_core::catalog;

    #[test]
    fn gap_text_numbers_blanks_and_fills_answers() {
        let exam = catalog::full_practice_exam().unwrap().exam;
        let Some(SectionContent::FillInTheGaps { text }) =
            exam.section(SectionKind::FillInTheGaps).map(|s| &s.content)
        else {
            panic!("exam has a gaps section");
        };
        let filled = vec!["having".to_string(), String::new()];
        let out = gap_text(text, Some(&filled));
        assert!(out.contains("I'm (1) having a great time"));
        assert!(out.contains("(2) ___"));
        assert!(out.contains("(6) ___"));
        assert!(out.ends_with("Lots of love,\nTaha\n"));
    }

    #[test]
    fn section_text_letters_options() {
        let exam = catalog::full_practice_exam().unwrap().exam;
        let out = section_text(&exam.sections[0]);
        assert!(out.starts_with("== Multiple Choice Questions (16 marks) =="));
        assert!(out.contains("16. This digital camera ___ to my friend Mai."));
        assert!(out.contains("   A. pick"));
    }

    #[test]
    fn grammar_text_labels_each_part() {
        let rules = catalog::grammar_rules().unwrap();
        let out = grammar_text(&rules[2]);
        assert!(out.starts_with("3. Future Perfect\n"));
        assert!(out.contains("  How to use:  will have + past participle\n"));
        assert!(out.contains("  Example:     By next year, I will have graduated.\n"));
    }

    #[test]
    fn answer_key_lists_expected_answers() {
        let loaded = catalog::full_practice_exam().unwrap();
        let out = answer_key_text(&loaded.exam, &loaded.key);
        assert!(out.contains("5. will have changed"));
        assert!(out.contains("English: There are many advantages"));
    }
}
