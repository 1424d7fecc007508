//! Grammar reference rules.
//!
//! A short reference of the grammar points the exams test, each with a
//! worked example and its Arabic translation.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// One grammar point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrammarRule {
    /// 1-based number shown in the reference.
    pub id: u32,
    pub title: String,
    pub definition: String,
    pub when_to_use: String,
    /// The form, e.g. "had + past participle".
    pub how_to_use: String,
    pub example: String,
    /// Arabic translation of `example`.
    pub translation: String,
}

#[derive(Debug, Deserialize)]
struct TomlGrammarFile {
    #[serde(default)]
    rules: Vec<GrammarRule>,
}

/// Parse a grammar reference file. Rules come back sorted by id.
pub fn parse_grammar_str(content: &str, source_path: &Path) -> Result<Vec<GrammarRule>> {
    let parsed: TomlGrammarFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let mut seen = HashSet::new();
    for rule in &parsed.rules {
        if !seen.insert(rule.id) {
            anyhow::bail!(
                "duplicate grammar rule id {} in {}",
                rule.id,
                source_path.display()
            );
        }
    }

    let mut rules = parsed.rules;
    rules.sort_by_key(|r| r.id);
    Ok(rules)
}

/// Find rules by id, or by a case-insensitive fragment of the title.
pub fn find_rules<'a>(rules: &'a [GrammarRule], query: &str) -> Vec<&'a GrammarRule> {
    let query = query.trim();
    if let Ok(id) = query.parse::<u32>() {
        return rules.iter().filter(|r| r.id == id).collect();
    }
    let needle = query.to_lowercase();
    rules
        .iter()
        .filter(|r| r.title.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const RULES: &str = r#"
[[rules]]
id = 2
title = "Past Perfect Passive"
definition = "Focuses on the result of an earlier action."
when_to_use = "When emphasizing the recipient of an action."
how_to_use = "had been + past participle"
example = "The cake had been eaten before the guests arrived."
translation = "كانت الكعكة قد أُكلت قبل وصول الضيوف"

[[rules]]
id = 1
title = "Past Perfect"
definition = "Describes an action completed before another past action or time."
when_to_use = "For actions completed before another past action or time."
how_to_use = "had + past participle"
example = "She had left before I arrived."
translation = "كانت قد غادرت قبل أن أصل"
"#;

    #[test]
    fn parse_sorts_by_id() {
        let rules = parse_grammar_str(RULES, &PathBuf::from("grammar.toml")).unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].title, "Past Perfect");
        assert_eq!(rules[1].how_to_use, "had been + past participle");
    }

    #[test]
    fn duplicate_ids_are_an_error() {
        let doubled = RULES.replace("id = 2", "id = 1");
        let err = parse_grammar_str(&doubled, &PathBuf::from("grammar.toml")).unwrap_err();
        assert!(err.to_string().contains("duplicate grammar rule id 1"));
    }

    #[test]
    fn missing_field_is_an_error() {
        let toml = "[[rules]]\nid = 1\ntitle = \"Only a title\"\n";
        assert!(parse_grammar_str(toml, &PathBuf::from("grammar.toml")).is_err());
    }

    #[test]
    fn find_by_id_or_title() {
        let rules = parse_grammar_str(RULES, &PathBuf::from("grammar.toml")).unwrap();
        let by_id = find_rules(&rules, "2");
        assert_eq!(by_id.len(), 1);
        assert_eq!(by_id[0].id, 2);

        assert_eq!(find_rules(&rules, "past perfect").len(), 2);
        assert_eq!(find_rules(&rules, "PASSIVE")[0].id, 2);
        assert!(find_rules(&rules, "tag questions").is_empty());
        assert!(find_rules(&rules, "7").is_empty());
    }
}
