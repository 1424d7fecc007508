//! Exam view markup.
//!
//! Markup is generated from the structured exam model. Every piece of exam
//! text goes through [`html_escape`].

use practest_core::answers::AnswerKey;
use practest_core::grammar::GrammarRule;
use practest_core::model::{
    ChoiceQuestion, ExamDefinition, GapText, Passage, Section, SectionContent, SectionKind,
    WritingOption,
};

/// Escape a string for safe HTML insertion.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

const BLANK: &str = "<strong>___</strong>";

/// Render the body of one section.
pub fn render_section(section: &Section) -> String {
    match &section.content {
        SectionContent::MultipleChoice { questions } => render_choice_list(questions, false),
        SectionContent::FillInTheGaps { text } => render_gap_text(text),
        SectionContent::Translation {
            into_arabic,
            into_english,
        } => render_translation(into_arabic, into_english),
        SectionContent::ReadingComprehension { passage, questions } => {
            let mut html = render_passage(passage);
            html.push_str("<div class=\"questions\">\n<h4>Questions:</h4>\n");
            html.push_str(&render_choice_list(questions, true));
            html.push_str("</div>\n");
            html
        }
        SectionContent::OpenQuestions { questions } => {
            let mut html = String::from("<ol class=\"questions\">\n");
            for prompt in questions {
                html.push_str(&format!(
                    "<li><strong>{}</strong></li>\n",
                    html_escape(prompt)
                ));
            }
            html.push_str("</ol>\n");
            html
        }
        SectionContent::WritingTask { options } => render_writing_options(options),
    }
}

fn render_choice_list(questions: &[ChoiceQuestion], bold_prompt: bool) -> String {
    let mut html = String::from("<ol class=\"questions\">\n");
    for q in questions {
        if bold_prompt {
            html.push_str(&format!("<li><strong>{}</strong><br>\n", html_escape(&q.prompt)));
        } else {
            html.push_str(&format!("<li>{}<br>\n", html_escape(&q.prompt)));
        }
        let options: Vec<String> = q
            .lettered_options()
            .map(|(letter, text)| format!("  {letter}. {}", html_escape(text)))
            .collect();
        html.push_str(&options.join("<br>\n"));
        html.push_str("\n</li>\n");
    }
    html.push_str("</ol>\n");
    html
}

fn render_gap_text(text: &GapText) -> String {
    let mut html = String::from("<div class=\"gap-text\">\n");
    if let Some(heading) = &text.heading {
        html.push_str(&format!("<p><strong>{}</strong></p>\n", html_escape(heading)));
    }
    let body: Vec<String> = text.segments.iter().map(|s| html_escape(s)).collect();
    html.push_str(&format!("<p>{}</p>\n", body.join(BLANK)));
    if let Some(closing) = &text.closing {
        let lines: Vec<String> = closing.lines().map(html_escape).collect();
        html.push_str(&format!("<p>{}</p>\n", lines.join("<br>")));
    }
    html.push_str("</div>\n");
    html
}

fn render_translation(into_arabic: &str, into_english: &str) -> String {
    format!(
        "<div class=\"translation\">\n\
         <h4>A. Translate the following into <strong>Arabic</strong>:</h4>\n\
         <p class=\"source\">{}</p>\n\
         </div>\n\
         <div class=\"translation\">\n\
         <h4>B. Translate the following into <strong>English</strong>:</h4>\n\
         <p class=\"source\" dir=\"rtl\">{}</p>\n\
         </div>\n",
        html_escape(into_arabic),
        html_escape(into_english)
    )
}

fn render_passage(passage: &Passage) -> String {
    let mut html = format!(
        "<div class=\"passage\">\n<h4>Text: {}</h4>\n",
        html_escape(&passage.title)
    );
    for paragraph in &passage.paragraphs {
        html.push_str(&format!("<p>{}</p>\n", html_escape(paragraph)));
    }
    html.push_str("</div>\n");
    html
}

fn render_writing_options(options: &[WritingOption]) -> String {
    let mut html = String::from("<div class=\"writing-options\">\n");
    for (i, option) in options.iter().enumerate() {
        html.push_str(&format!(
            "<div class=\"writing-option\" id=\"option-{}\">\n<h4>Option {}: {}</h4>\n<p>{}</p>\n",
            html_escape(&option.id),
            i + 1,
            html_escape(&option.title),
            html_escape(&option.prompt)
        ));
        if !option.structure.is_empty() {
            html.push_str("<p>Use this structure:</p>\n<ul>\n");
            for step in &option.structure {
                html.push_str(&format!("<li>{}</li>\n", html_escape(step)));
            }
            html.push_str("</ul>\n");
        }
        html.push_str("</div>\n");
    }
    html.push_str("</div>\n");
    html
}

/// Render a whole exam as a self-contained HTML page.
pub fn render_exam(exam: &ExamDefinition) -> String {
    let mut html = page_head(&exam.title);

    html.push_str("<header>\n");
    html.push_str(&format!("<h1>{}</h1>\n", html_escape(&exam.title)));
    if !exam.description.is_empty() {
        html.push_str(&format!("<p>{}</p>\n", html_escape(&exam.description)));
    }
    html.push_str(&format!(
        "<p class=\"meta\">Time allowed: {} | Total marks: {}</p>\n",
        html_escape(&exam.time_allowed),
        exam.total_marks
    ));
    html.push_str("</header>\n");

    for section in &exam.sections {
        html.push_str(&format!("<section id=\"{}\">\n", section.kind()));
        html.push_str(&format!(
            "<h2>{} <span class=\"marks\">({} marks)</span></h2>\n",
            html_escape(&section.title),
            section.marks
        ));
        if let Some(description) = &section.description {
            html.push_str(&format!(
                "<p class=\"description\">{}</p>\n",
                html_escape(description)
            ));
        }
        html.push_str(&render_section(section));
        html.push_str("</section>\n");
    }

    html.push_str("</body>\n</html>");
    html
}

fn page_head(title: &str) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!("<title>{}</title>\n", html_escape(title)));
    html.push_str("<style>\n");
    html.push_str(crate::CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");
    html
}

/// Render one grammar rule as a card.
pub fn render_grammar_rule(rule: &GrammarRule) -> String {
    format!(
        "<article class=\"grammar-rule\" id=\"rule-{}\">\n\
         <h2>{}. {}</h2>\n\
         <p>{}</p>\n\
         <p><strong>When to use:</strong> {}</p>\n\
         <p><strong>How to use:</strong> <code>{}</code></p>\n\
         <p><strong>Example:</strong> <em>{}</em></p>\n\
         <p class=\"translation\" dir=\"rtl\" lang=\"ar\">{}</p>\n\
         </article>\n",
        rule.id,
        rule.id,
        html_escape(&rule.title),
        html_escape(&rule.definition),
        html_escape(&rule.when_to_use),
        html_escape(&rule.how_to_use),
        html_escape(&rule.example),
        html_escape(&rule.translation)
    )
}

/// Render the grammar reference as a self-contained HTML page.
pub fn render_grammar(rules: &[GrammarRule]) -> String {
    let mut html = page_head("Grammar Reference");
    html.push_str("<header>\n<h1>Grammar Reference</h1>\n</header>\n");
    for rule in rules {
        html.push_str(&render_grammar_rule(rule));
    }
    html.push_str("</body>\n</html>");
    html
}

/// Render the reference answers, in the exam's section order.
pub fn render_answer_key(exam: &ExamDefinition, key: &AnswerKey) -> String {
    let mut html = String::from("<section class=\"answer-key\">\n<h2>Answer Key</h2>\n");

    for section in &exam.sections {
        let kind = section.kind();
        html.push_str(&format!("<h3>{}</h3>\n", html_escape(&section.title)));
        match kind {
            SectionKind::Translation => match &key.translation {
                Some(t) => {
                    html.push_str(&format!(
                        "<p><strong>Arabic:</strong> {}</p>\n<p><strong>English:</strong> {}</p>\n",
                        html_escape(&t.arabic),
                        html_escape(&t.english)
                    ));
                }
                None => html.push_str("<p class=\"meta\">No model translation.</p>\n"),
            },
            SectionKind::WritingTask => {
                if key.writing_task.is_empty() {
                    html.push_str("<p class=\"meta\">No example texts.</p>\n");
                }
                for (option, example) in &key.writing_task {
                    html.push_str(&format!(
                        "<h4>Example: {}</h4>\n<pre>{}</pre>\n",
                        html_escape(option),
                        html_escape(example.trim())
                    ));
                }
            }
            _ => {
                let expected = key.expected(kind);
                if expected.is_empty() {
                    html.push_str("<p class=\"meta\">No answers.</p>\n");
                    continue;
                }
                html.push_str("<ol>\n");
                for answer in expected {
                    html.push_str(&format!("<li>{}</li>\n", html_escape(answer)));
                }
                html.push_str("</ol>\n");
            }
        }
    }

    html.push_str("</section>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use practest_core::catalog;

    #[test]
    fn escape_covers_markup_characters() {
        assert_eq!(
            html_escape("<b>\"Tom & Jerry's\"</b>"),
            "&lt;b&gt;&quot;Tom &amp; Jerry&#x27;s&quot;&lt;/b&gt;"
        );
    }

    #[test]
    fn choice_questions_have_lettered_options() {
        let exam = catalog::full_practice_exam().unwrap().exam;
        let html = render_section(&exam.sections[0]);
        assert_eq!(html.matches("<li>").count(), 16);
        assert!(html.contains("A. pick"));
        assert!(html.contains("D. sit"));
        assert!(html.contains("I&#x27;m sorry I can&#x27;t go to your party."));
    }

    #[test]
    fn gap_text_has_one_blank_per_gap() {
        let exam = catalog::full_practice_exam().unwrap().exam;
        let section = exam.section(SectionKind::FillInTheGaps).unwrap();
        let html = render_section(section);
        assert_eq!(html.matches(BLANK).count(), 6);
        assert!(html.contains("<strong>Dear Mum,</strong>"));
        assert!(html.contains("Lots of love,<br>Taha"));
    }

    #[test]
    fn translation_marks_arabic_source_rtl() {
        let exam = catalog::full_practice_exam().unwrap().exam;
        let html = render_section(exam.section(SectionKind::Translation).unwrap());
        assert!(html.contains("dir=\"rtl\""));
        assert!(html.contains("into <strong>English</strong>"));
    }

    #[test]
    fn writing_options_list_structure() {
        let exam = catalog::space_reading_exam().unwrap().exam;
        let html = render_section(exam.section(SectionKind::WritingTask).unwrap());
        assert!(html.contains("Option 1: Email to Local Government"));
        assert!(html.contains("Option 2: Diary Entry"));
        assert_eq!(html.matches("Use this structure:").count(), 2);
        assert!(html.contains("<li>Closing</li>"));
    }

    #[test]
    fn exam_page_has_header_and_every_section() {
        let exam = catalog::space_reading_exam().unwrap().exam;
        let html = render_exam(&exam);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Time allowed: 45 minutes | Total marks: 40"));
        assert_eq!(html.matches("<section id=").count(), 3);
        assert!(html.contains("Text: Space Exploration"));
        assert!(html.ends_with("</html>"));
    }

    #[test]
    fn grammar_page_lists_every_rule() {
        let rules = catalog::grammar_rules().unwrap();
        let html = render_grammar(&rules);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Grammar Reference</title>"));
        assert_eq!(html.matches("<article class=\"grammar-rule\"").count(), 11);
        assert!(html.contains("<h2>9. Tag Questions</h2>"));
        assert!(html.contains("You&#x27;re coming to the party, aren&#x27;t you?"));
        assert!(html.ends_with("</html>"));
    }

    #[test]
    fn grammar_rule_marks_translation_rtl() {
        let rules = catalog::grammar_rules().unwrap();
        let html = render_grammar_rule(&rules[5]);
        assert!(html.contains("id=\"rule-6\""));
        assert!(html.contains("<code>had + past participle</code>"));
        assert!(html.contains("dir=\"rtl\" lang=\"ar\">كانت قد غادرت قبل أن أصل</p>"));
    }

    #[test]
    fn answer_key_shows_letters_and_examples() {
        let loaded = catalog::space_reading_exam().unwrap();
        let html = render_answer_key(&loaded.exam, &loaded.key);
        assert!(html.contains("<li>A</li>"));
        assert!(html.contains("Example: diary"));
        assert!(html.contains("Dear Sir/Madam"));
    }
}
