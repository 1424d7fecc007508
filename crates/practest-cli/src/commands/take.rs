//! The `practest take` command.
//!
//! Drives a [`Session`] from line commands. A line starting with `:` is a
//! command; any other line answers the current question.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use practest_core::answers::{AnswerSlot, TranslationField};
use practest_core::error::ExamError;
use practest_core::model::{Section, SectionKind};
use practest_core::session::{CurrentQuestion, Session, Step};

use crate::text;

const HELP: &str = "Commands: :next  :prev  :submit  :view  :option <id>  :quit";

/// How an interactive run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Submitted,
    Abandoned,
}

pub fn execute(exam: Option<String>, config_path: Option<PathBuf>) -> Result<()> {
    let config = super::load_config(config_path)?;
    let loaded = super::resolve_exam(exam.as_deref(), &config)?;

    let mut session = Session::new(Arc::new(loaded.exam), Arc::new(loaded.key))
        .with_options(config.session_options());

    let stdin = std::io::stdin();
    let outcome = run(&mut session, stdin.lock(), &mut std::io::stdout().lock())?;

    if outcome == Outcome::Submitted {
        if let Some(result) = session.result() {
            println!();
            super::print_results(session.exam(), result);
        }
    }

    Ok(())
}

/// Run one attempt, reading commands from `input` until the exam is
/// submitted, abandoned, or the input ends.
pub fn run<R: BufRead, W: Write>(session: &mut Session, input: R, out: &mut W) -> Result<Outcome> {
    write!(out, "{}", text::exam_header(session.exam()))?;
    writeln!(out, "{HELP}\n")?;

    session.start();
    show_current(session, out)?;

    for line in input.lines() {
        let line = line.context("failed to read input")?;
        let command = line.trim();

        match command {
            "" => {}
            ":next" | ":n" => {
                if !session.can_advance() {
                    writeln!(out, "Choose an option and write a little more before moving on.")?;
                    continue;
                }
                match session.next() {
                    Step::Finished => return Ok(Outcome::Submitted),
                    Step::Moved(_) => show_current(session, out)?,
                    Step::Stayed => {}
                }
            }
            ":prev" | ":p" => {
                if !session.can_go_back() {
                    writeln!(out, "Already at the first question.")?;
                    continue;
                }
                session.prev();
                show_current(session, out)?;
            }
            ":submit" => {
                if !session.can_advance() {
                    writeln!(out, "Choose an option and write a little more before submitting.")?;
                    continue;
                }
                session.submit()?;
                return Ok(Outcome::Submitted);
            }
            ":view" => {
                if let Some(section) = session.current_section() {
                    writeln!(out, "{}", text::section_text(section))?;
                }
            }
            ":quit" | ":q" => {
                session.return_to_view();
                writeln!(out, "Exam abandoned.")?;
                return Ok(Outcome::Abandoned);
            }
            _ => {
                let recorded = match command.strip_prefix(":option") {
                    Some(id) => select_option(session, id.trim()),
                    None if command.starts_with(':') => {
                        Err(anyhow::anyhow!("unknown command '{command}'. {HELP}"))
                    }
                    None => record_line(session, &line),
                };
                if let Err(e) = recorded {
                    // Only a bad answer is the learner's to fix; anything else
                    // means the session is no longer taking the exam.
                    if e
                        .downcast_ref::<ExamError>()
                        .is_some_and(|err| !err.is_bad_slot())
                    {
                        return Err(e);
                    }
                    writeln!(out, "{e:#}")?;
                }
            }
        }
    }

    session.return_to_view();
    writeln!(out, "Input ended before the exam was submitted.")?;
    Ok(Outcome::Abandoned)
}

fn show_current<W: Write>(session: &Session, out: &mut W) -> Result<()> {
    if let Some(section) = session.current_section() {
        if session.position().question == 0 {
            writeln!(out, "{}", text::section_heading(section))?;
        }
    }
    let progress = session.progress();
    writeln!(out, "[{}/{}]", progress.current, progress.total)?;
    if let Some(question) = session.current_question() {
        writeln!(out, "{}", text::question_text(&question, session.answers()))?;
    }
    Ok(())
}

fn select_option(session: &mut Session, id: &str) -> Result<()> {
    ensure_graded(session)?;
    session.record(AnswerSlot::WritingOption, id)?;
    Ok(())
}

fn ensure_graded(session: &Session) -> Result<()> {
    anyhow::ensure!(
        session.current_section_is_graded(),
        "this section repeats an earlier one and takes no answers"
    );
    Ok(())
}

/// Record a free-text line as the answer to the current question.
fn record_line(session: &mut Session, line: &str) -> Result<()> {
    let kind = session
        .current_section()
        .map(Section::kind)
        .context("no question to answer")?;
    ensure_graded(session)?;

    match kind {
        SectionKind::MultipleChoice | SectionKind::ReadingComprehension => {
            let letter = line.trim().to_uppercase();
            let letters = match session.current_question() {
                Some(CurrentQuestion::Choice { question, .. }) => question.letters(),
                _ => Vec::new(),
            };
            anyhow::ensure!(
                letters.contains(&letter),
                "'{letter}' is not an option (choose one of {})",
                letters.join(", ")
            );
            let slot = session.current_slot().context("no question to answer")?;
            session.record(slot, letter)?;
        }
        SectionKind::OpenQuestions => {
            let slot = session.current_slot().context("no question to answer")?;
            session.record(slot, line.trim())?;
        }
        SectionKind::WritingTask => {
            let mut content = session.answers().writing_task.content.clone();
            if !content.is_empty() {
                content.push('\n');
            }
            content.push_str(line);
            session.record(AnswerSlot::WritingContent, content)?;
        }
        SectionKind::FillInTheGaps => {
            let (number, words) = line
                .trim()
                .split_once(char::is_whitespace)
                .context("fill a gap with `<number> <words>`")?;
            let number: usize = number
                .parse()
                .with_context(|| format!("'{number}' is not a gap number"))?;
            anyhow::ensure!(number >= 1, "gaps are numbered from 1");
            session.record(AnswerSlot::Gap(number - 1), words.trim())?;
        }
        SectionKind::Translation => {
            let (field, translated) = line
                .trim()
                .split_once(char::is_whitespace)
                .context("answer with `ar <text>` or `en <text>`")?;
            let field = match field.to_lowercase().as_str() {
                "ar" | "arabic" => TranslationField::Arabic,
                "en" | "english" => TranslationField::English,
                other => anyhow::bail!("unknown translation field '{other}' (use ar or en)"),
            };
            session.record(AnswerSlot::Translation(field), translated.trim())?;
        }
    }
    Ok(())
}
