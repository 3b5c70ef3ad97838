// Quizsmith - command-line entry point
//
// Results go to stdout; logs go to stderr so output can be piped.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use quizsmith::{
    load_schedule, CaseExpressionBuilder, DateRangeEntry, ExtractionPolicy, GeneratorConfig,
    IdentifierPolicy, OcrConfig, OverlapPolicy, QuestionCountPolicy, Quiz, QuizExtractor,
    QuizForm, QuizPrompt,
};
use quizsmith_quiz::prompt::DEFAULT_MAX_DOCUMENT_CHARS;
use quizsmith_sqlgen::builder::{DEFAULT_ALIAS, DEFAULT_COLUMN};

#[derive(Parser, Debug)]
#[command(name = "quizsmith", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract a quiz from model output and print it as JSON
    Extract {
        /// File holding the model output ("-" or omitted for stdin)
        input: Option<PathBuf>,

        /// Require exactly five questions
        #[arg(long)]
        exact: bool,

        /// Accept options without "a. ", "b. ", ... labels
        #[arg(long)]
        no_label_check: bool,

        /// Print the question/answer slots instead of the quiz
        #[arg(long)]
        form: bool,
    },

    /// Generate CASE WHEN statements from a schedule file
    Sql {
        /// Schedule file (.yaml, .yml, .toml or .json)
        schedule: PathBuf,

        /// Target table; requires a schedule with a single category
        #[arg(long)]
        table: Option<String>,

        /// Date column compared against the ranges
        #[arg(long, default_value = DEFAULT_COLUMN)]
        column: String,

        /// Name of the computed column
        #[arg(long, default_value = DEFAULT_ALIAS)]
        alias: String,

        /// What to do with overlapping ranges: allow, warn or reject
        #[arg(long, default_value = "allow")]
        overlap: OverlapPolicy,

        /// Name checking: verbatim (emit as given) or plain identifiers only
        #[arg(long, default_value = "verbatim")]
        identifiers: IdentifierPolicy,
    },

    /// Print the quiz-generation prompt for a source text
    Prompt {
        /// Source text file ("-" or omitted for stdin)
        input: Option<PathBuf>,

        /// Per-document character limit
        #[arg(long, default_value_t = DEFAULT_MAX_DOCUMENT_CHARS)]
        max_chars: usize,
    },

    /// Check that generator and OCR credentials are configured
    CheckConfig,
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) if p != Path::new("-") => std::fs::read_to_string(p)
            .with_context(|| format!("Failed to read '{}'", p.display())),
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

fn run_extract(input: Option<&Path>, exact: bool, no_label_check: bool, form: bool) -> Result<()> {
    let policy = ExtractionPolicy {
        question_count: if exact {
            QuestionCountPolicy::Exact
        } else {
            QuestionCountPolicy::AtLeastOne
        },
        require_option_labels: !no_label_check,
    };
    let raw = read_input(input)?;
    let report = QuizExtractor::with_policy(policy)
        .extract_with_report(&raw)
        .context("Model output did not contain a usable quiz")?;

    tracing::info!(
        questions = report.quiz.questions.len(),
        stage = ?report.stage,
        "quiz extracted"
    );

    println!("{}", render_quiz(&report.quiz, form)?);
    Ok(())
}

/// Canonical quiz JSON, or the form slots when `form` is set.
fn render_quiz(quiz: &Quiz, form: bool) -> Result<String> {
    if form {
        Ok(serde_json::to_string_pretty(&QuizForm::from_quiz(quiz))?)
    } else {
        Ok(quiz.to_json_pretty())
    }
}

struct SqlOptions {
    column: String,
    alias: String,
    overlap: OverlapPolicy,
    identifiers: IdentifierPolicy,
}

fn run_sql(schedule: &Path, table: Option<&str>, options: SqlOptions) -> Result<()> {
    let categories = load_schedule(schedule)
        .and_then(|s| s.into_entries())
        .with_context(|| format!("Invalid schedule '{}'", schedule.display()))?;

    let builder = CaseExpressionBuilder::new()
        .column(options.column)
        .alias(options.alias)
        .overlap_policy(options.overlap)
        .identifier_policy(options.identifiers);

    println!("{}", render_sql(&builder, &categories, table)?);
    Ok(())
}

/// One statement against `table` for a single-category schedule, otherwise
/// one statement per category.
fn render_sql(
    builder: &CaseExpressionBuilder,
    categories: &[(String, Vec<DateRangeEntry>)],
    table: Option<&str>,
) -> Result<String> {
    match table {
        Some(table) => {
            let [(_, entries)] = categories else {
                bail!(
                    "--table needs a schedule with exactly one category, found {}",
                    categories.len()
                );
            };
            Ok(builder.build(entries, table)?)
        }
        None => Ok(builder.build_grouped(categories)?),
    }
}

fn run_prompt(input: Option<&Path>, max_chars: usize) -> Result<()> {
    let text = read_input(input)?;
    let prompt = QuizPrompt::new()
        .with_max_document_chars(max_chars)
        .render(&[text]);
    println!("{}", prompt);
    Ok(())
}

fn run_check_config() -> Result<()> {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "loaded .env");
    }
    let generator = GeneratorConfig::from_env().context("Generator is not configured")?;
    let ocr = OcrConfig::from_env().context("OCR is not configured")?;

    println!("{}", config_summary(&generator, &ocr));
    Ok(())
}

/// Human-readable config report. Never includes the keys.
fn config_summary(generator: &GeneratorConfig, ocr: &OcrConfig) -> String {
    format!(
        "generator: {} via {}\nparams: {}\nocr: {}",
        generator.model,
        generator.api_base_url,
        generator.generation_kwargs(),
        ocr.endpoint
    )
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("quizsmith=info,quizsmith_quiz=info,quizsmith_sqlgen=info,quizsmith_core=info")
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Extract {
            input,
            exact,
            no_label_check,
            form,
        } => run_extract(input.as_deref(), exact, no_label_check, form),
        Command::Sql {
            schedule,
            table,
            column,
            alias,
            overlap,
            identifiers,
        } => run_sql(
            &schedule,
            table.as_deref(),
            SqlOptions {
                column,
                alias,
                overlap,
                identifiers,
            },
        ),
        Command::Prompt { input, max_chars } => run_prompt(input.as_deref(), max_chars),
        Command::CheckConfig => run_check_config(),
    }
}
