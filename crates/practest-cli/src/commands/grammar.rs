//! The `practest grammar` command.

use anyhow::Result;

use practest_core::catalog;
use practest_core::grammar::find_rules;
use practest_report::markup::render_grammar;

use crate::text;

pub fn execute(rule: Option<String>, format: String) -> Result<()> {
    let rules = catalog::grammar_rules()?;

    let selected: Vec<_> = match rule.as_deref() {
        Some(query) => {
            let found = find_rules(&rules, query);
            if found.is_empty() {
                anyhow::bail!("no grammar rule matches '{query}'");
            }
            found.into_iter().cloned().collect()
        }
        None => rules,
    };

    match format.as_str() {
        "html" => println!("{}", render_grammar(&selected)),
        "text" => {
            for rule in &selected {
                println!("{}", text::grammar_text(rule));
            }
        }
        other => anyhow::bail!("unknown format '{other}' (expected text or html)"),
    }

    Ok(())
}
