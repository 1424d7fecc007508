//! The `practest init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create practest.toml
    if std::path::Path::new("practest.toml").exists() {
        println!("practest.toml already exists, skipping.");
    } else {
        std::fs::write("practest.toml", SAMPLE_CONFIG)?;
        println!("Created practest.toml");
    }

    // Create example exam
    std::fs::create_dir_all("exams")?;
    let example_path = std::path::Path::new("exams/example.toml");
    if example_path.exists() {
        println!("exams/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_EXAM)?;
        println!("Created exams/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: practest validate --exam exams/example.toml");
    println!("  2. Run: practest take --exam example-exam");
    println!("  3. Run: practest list");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# practest configuration

exam_dirs = ["./exams"]
default_exam = "full-practice-exam-1"

# Characters the writing task needs before you can move on.
writing_gate_chars = 10

# Refuse exams whose total marks differ from what their sections award.
strict_totals = false
"#;

const EXAMPLE_EXAM: &str = r#"[exam]
id = "example-exam"
title = "Example Exam"
description = "A short exam to get started"
time_allowed = "10 minutes"
total_marks = 5

[[sections]]
id = "multiple-choice"
title = "Multiple Choice Questions"
description = "Choose the correct answer (A, B, C, or D)"
marks = 2

[[sections.questions]]
prompt = "I am going to ___ my brother up from the airport when he arrives."
options = ["pick", "stand", "leave", "sit"]

[[sections.questions]]
prompt = "By this time next week I ___ all my exams."
options = ["am finishing", "finished", "have finished", "will have finished"]

[[sections]]
id = "fill-in-the-gaps"
title = "Fill in the Gaps"
description = "Complete the sentence with one word in each space"
marks = 1

[sections.text]
segments = ["How are you? I'm ", " a great time here in London!"]

[[sections]]
id = "open-questions"
title = "Open-ended Questions"
description = "Answer with your own ideas"
marks = 2
prompts = ["Would you like to fly to the moon? Why?"]

[sections.scoring]
policy = "each-present"
points = 2

[answer_key]
multiple-choice = ["A", "D"]
fill-in-the-gaps = ["having"]
"#;
