//! The `practest show` command.

use std::path::PathBuf;

use anyhow::Result;

use practest_report::markup::{render_answer_key, render_exam};

use crate::text;

pub fn execute(
    exam: Option<String>,
    format: String,
    show_answers: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = super::load_config(config_path)?;
    let loaded = super::resolve_exam(exam.as_deref(), &config)?;

    match format.as_str() {
        "html" => {
            let mut html = render_exam(&loaded.exam);
            if show_answers {
                let key = render_answer_key(&loaded.exam, &loaded.key);
                html = html.replace("</body>", &format!("{key}</body>"));
            }
            println!("{html}");
        }
        "text" => {
            println!("{}", text::exam_header(&loaded.exam));
            for section in &loaded.exam.sections {
                println!("{}", text::section_text(section));
            }
            if show_answers {
                println!("{}", text::answer_key_text(&loaded.exam, &loaded.key));
            }
        }
        other => anyhow::bail!("unknown format '{other}' (expected text or html)"),
    }

    Ok(())
}
