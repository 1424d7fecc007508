//! Markdown results summary.

use practest_core::model::ExamDefinition;
use practest_core::scorer::ScoreResult;

use crate::graded_sections;

/// Render a results summary as a markdown document.
pub fn results_markdown(exam: &ExamDefinition, result: &ScoreResult) -> String {
    let mut md = String::new();

    md.push_str(&format!("# Results: {}\n\n", exam.title));
    md.push_str(&format!(
        "**Score:** {} / {} ({}%)\n\n",
        result.score,
        result.total_marks,
        result.percentage()
    ));
    md.push_str(&format!("{}\n\n", result.feedback().message()));

    md.push_str("| Section | Correct | Total | Score |\n");
    md.push_str("|---------|---------|-------|-------|\n");
    for (section, score) in graded_sections(exam, result) {
        md.push_str(&format!(
            "| {} | {} | {} | {}% |\n",
            section.title.replace('|', "\\|"),
            score.correct,
            score.total,
            score.percentage()
        ));
    }

    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use practest_core::answers::UserAnswers;
    use practest_core::catalog;
    use practest_core::scorer::score;

    #[test]
    fn markdown_summary_lists_sections() {
        let loaded = catalog::space_reading_exam().unwrap();
        let mut answers = UserAnswers::blank(&loaded.exam);
        answers.reading_comprehension = loaded.key.reading_comprehension.clone();
        answers.open_questions = vec!["Yes.".into(), "No.".into(), "Very.".into()];
        answers.writing_task.option = Some("diary".into());
        answers.writing_task.content = loaded.key.writing_task["diary"].clone();

        let result = score(&answers, &loaded.key, &loaded.exam);
        let md = results_markdown(&loaded.exam, &result);

        assert!(md.starts_with("# Results: Space Exploration Reading & Writing Exam"));
        assert!(md.contains("**Score:** 39 / 40 (98%)"));
        assert!(md.contains("Excellent!"));
        assert!(md.contains("| Reading Comprehension | 4 | 4 | 100% |"));
        assert!(md.contains("| Writing Task | 1 | 1 | 100% |"));
    }
}
