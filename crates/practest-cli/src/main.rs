//! practest CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod text;

#[derive(Parser)]
#[command(name = "practest", version, about = "English practice exam runner and scorer")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List built-in exams and exams found in the configured directories
    List {
        /// Extra directory to scan for exam files
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Print an exam
    Show {
        /// Exam id or path to an exam file
        #[arg(long)]
        exam: Option<String>,

        /// Output format: text, html
        #[arg(long, default_value = "text")]
        format: String,

        /// Also print the answer key
        #[arg(long)]
        answers: bool,
    },

    /// Check exam files for authoring drift
    Validate {
        /// Exam id, exam file, or directory of exam files
        #[arg(long)]
        exam: Option<String>,
    },

    /// Take an exam interactively, reading answers from stdin
    Take {
        /// Exam id or path to an exam file
        #[arg(long)]
        exam: Option<String>,
    },

    /// Score an answers file against an exam
    Score {
        /// Exam id or path to an exam file
        #[arg(long)]
        exam: Option<String>,

        /// TOML file with the learner's answers
        #[arg(long)]
        answers: PathBuf,

        /// Output format: text, json, markdown, html
        #[arg(long, default_value = "text")]
        format: String,

        /// Also write an HTML results page to this path
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Print the grammar reference
    Grammar {
        /// Rule number or part of a rule title
        #[arg(long)]
        rule: Option<String>,

        /// Output format: text, html
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Create starter config and example exam
    Init,
}

fn main() {
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "practest=info".parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        Commands::List { dir } => commands::list::execute(dir, config),
        Commands::Show {
            exam,
            format,
            answers,
        } => commands::show::execute(exam, format, answers, config),
        Commands::Validate { exam } => commands::validate::execute(exam, config),
        Commands::Take { exam } => commands::take::execute(exam, config),
        Commands::Score {
            exam,
            answers,
            format,
            output,
        } => commands::score::execute(exam, answers, format, output, config),
        Commands::Grammar { rule, format } => commands::grammar::execute(rule, format),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
