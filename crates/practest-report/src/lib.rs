//! practest-report — Exam markup and results rendering.

pub mod html;
pub mod markdown;
pub mod markup;

use std::collections::HashSet;

use practest_core::model::{ExamDefinition, Section};
use practest_core::scorer::{ScoreResult, SectionScore};

/// Graded sections paired with their breakdown, in the exam's section order.
pub fn graded_sections<'a>(
    exam: &'a ExamDefinition,
    result: &'a ScoreResult,
) -> Vec<(&'a Section, &'a SectionScore)> {
    let mut seen = HashSet::new();
    exam.sections
        .iter()
        .filter(|s| seen.insert(s.kind()))
        .filter_map(|s| result.section(s.kind()).map(|score| (s, score)))
        .collect()
}

pub(crate) const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --fail: #fde2e2; --muted: #6b7280; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --fail: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0 auto; max-width: 56rem; padding: 2rem; background: var(--bg); color: var(--fg); line-height: 1.5; }
h1, h2 { margin-top: 2rem; }
.meta, .description, .marks { color: var(--muted); }
ol.questions > li { margin-bottom: 1rem; }
.gap-text, .passage { background: var(--border); padding: 1rem; border-radius: 8px; }
.translation { margin-bottom: 1.5rem; }
.grammar-rule { border: 1px solid var(--border); border-radius: 8px; padding: 1rem; margin-bottom: 1rem; }
.writing-option { margin-bottom: 2rem; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); }
.pass { background: var(--pass); }
.fail { background: var(--fail); }
.score { font-size: 2.5rem; font-weight: bold; }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; white-space: pre-wrap; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use practest_core::answers::UserAnswers;
    use practest_core::catalog;
    use practest_core::model::SectionKind;
    use practest_core::scorer::score;

    #[test]
    fn graded_sections_follow_exam_order() {
        let loaded = catalog::space_reading_exam().unwrap();
        let result = score(
            &UserAnswers::blank(&loaded.exam),
            &loaded.key,
            &loaded.exam,
        );
        let kinds: Vec<_> = graded_sections(&loaded.exam, &result)
            .iter()
            .map(|(s, _)| s.kind())
            .collect();
        assert_eq!(
            kinds,
            vec![
                SectionKind::ReadingComprehension,
                SectionKind::OpenQuestions,
                SectionKind::WritingTask,
            ]
        );
    }
}
