//! CLI binary for pdf-quizgen.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `GeneratorConfig` and prints the generated questions.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf_quizgen::{
    GenerationOutput, GenerationProgressCallback, GeneratorConfig, ProgressCallback,
    QuestionGenerator, QuestionSet, SourceDocument,
};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Spinner shown while the single upstream call is pending.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  ⏱ {elapsed}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Preparing");
        bar.set_message("Reading source text…");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl GenerationProgressCallback for CliProgressCallback {
    fn on_request_start(&self, prompt_chars: usize, truncated: bool) {
        if truncated {
            self.bar.println(format!(
                "{} {}",
                cyan("⚠"),
                dim("Source text exceeded the character cap and was truncated")
            ));
        }
        self.bar.set_prefix("Generating");
        self.bar
            .set_message(format!("waiting for model ({prompt_chars} prompt chars)"));
    }

    fn on_reply_received(&self, reply_chars: usize) {
        self.bar.set_prefix("Validating");
        self.bar.set_message(format!("{reply_chars} reply chars"));
    }

    fn on_generation_complete(&self, question_count: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} questions generated",
            green("✔"),
            bold(&question_count.to_string())
        );
    }

    fn on_generation_failed(&self, error: &str) {
        self.bar.finish_and_clear();
        // Truncate very long error messages to keep output tidy.
        let msg: String = if error.chars().count() > 120 {
            let head: String = error.chars().take(119).collect();
            format!("{head}\u{2026}")
        } else {
            error.to_string()
        };
        eprintln!("{} {}", red("✘"), red(&msg));
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Generate questions from extracted text (stdout)
  quizgen notes.txt

  # Read from stdin
  pdftotext lecture.pdf - | quizgen -

  # Save the question set for PDF 17 as JSON
  quizgen notes.txt --pdf-id 17 -o questions/17.json

  # JSON to stdout with stats
  quizgen --json notes.txt > output.json

  # Use a different model or endpoint
  quizgen --model anthropic/claude-3.5-haiku notes.txt
  quizgen --api-url https://api.openai.com/v1/chat/completions --model gpt-4o-mini notes.txt

ENVIRONMENT VARIABLES:
  QUIZGEN_API_KEY     Bearer token for the chat-completion service (required)
  QUIZGEN_API_URL     Chat-completion endpoint override
  QUIZGEN_MODEL       Model ID override
  APP_URL             Sent as HTTP-Referer
  RUST_LOG            Tracing filter, overrides -v / -q
"#;

/// Generate exam questions from extracted PDF text using an LLM.
#[derive(Parser, Debug)]
#[command(
    name = "quizgen",
    version,
    about = "Generate exam-style questions from extracted PDF text using an LLM",
    long_about = "Generate 1-, 2-, 3- and 10-mark exam questions with model answers from the \
plain text of a PDF. Works with any OpenAI-compatible chat-completion endpoint (OpenRouter, \
OpenAI, vLLM, LiteLLM, etc.).",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// UTF-8 text file with the extracted PDF text, or `-` for stdin.
    input: String,

    /// Identifier of the PDF record the questions belong to. Default: input file stem.
    #[arg(long, env = "QUIZGEN_PDF_ID")]
    pdf_id: Option<String>,

    /// Write the question set as JSON to this file.
    #[arg(short, long, env = "QUIZGEN_OUTPUT")]
    output: Option<PathBuf>,

    /// Print structured JSON (questions + stats) to stdout.
    #[arg(long, env = "QUIZGEN_JSON")]
    json: bool,

    /// API key for the chat-completion service.
    #[arg(long, env = "QUIZGEN_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Chat-completion endpoint URL.
    #[arg(long, env = "QUIZGEN_API_URL", default_value = pdf_quizgen::config::DEFAULT_API_URL)]
    api_url: String,

    /// Model ID.
    #[arg(long, env = "QUIZGEN_MODEL", default_value = pdf_quizgen::config::DEFAULT_MODEL)]
    model: String,

    /// Application URL sent as the HTTP-Referer header.
    #[arg(long, env = "APP_URL", default_value = "http://localhost")]
    app_url: String,

    /// Application title sent as the X-Title header.
    #[arg(long, env = "QUIZGEN_APP_TITLE", default_value = "pdf-quizgen")]
    app_title: String,

    /// Sampling temperature (0.0–2.0).
    #[arg(long, env = "QUIZGEN_TEMPERATURE", default_value_t = 0.7)]
    temperature: f32,

    /// Max output tokens.
    #[arg(long, env = "QUIZGEN_MAX_TOKENS", default_value_t = 4000)]
    max_tokens: usize,

    /// Request timeout in seconds.
    #[arg(long, env = "QUIZGEN_TIMEOUT", default_value_t = 120)]
    timeout: u64,

    /// Source text cap in characters.
    #[arg(long, env = "QUIZGEN_MAX_CHARS", default_value_t = pdf_quizgen::prompts::DEFAULT_MAX_SOURCE_CHARS)]
    max_chars: usize,

    /// Path to a text file containing a custom system prompt.
    #[arg(long, env = "QUIZGEN_SYSTEM_PROMPT")]
    system_prompt: Option<PathBuf>,

    /// Disable the spinner.
    #[arg(long, env = "QUIZGEN_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "QUIZGEN_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "QUIZGEN_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner provides the feedback that matters; keep INFO logs from
    // tearing through it unless the user asked for verbosity.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Read input ───────────────────────────────────────────────────────
    let text = read_input(&cli.input).await?;
    let pdf_id = cli
        .pdf_id
        .clone()
        .unwrap_or_else(|| default_pdf_id(&cli.input));
    let doc = SourceDocument::new(pdf_id, text);

    // ── Build generator ──────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as ProgressCallback)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb).await?;
    let generator = QuestionGenerator::new(config).context("Failed to create generator")?;

    // ── Run generation ───────────────────────────────────────────────────
    let output = match cli.output {
        Some(ref path) => generator
            .generate_to_file(&doc, path)
            .await
            .context("Question generation failed")?,
        None => generator
            .generate_for_document(&doc)
            .await
            .context("Question generation failed")?,
    };

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    } else if cli.output.is_none() {
        print_questions(&output);
    }

    if !cli.quiet && !cli.json {
        if let Some(ref path) = cli.output {
            eprintln!(
                "{}  {} questions  →  {}",
                green("✔"),
                output.questions.len(),
                bold(&path.display().to_string()),
            );
        }
        eprintln!(
            "   {} source chars{}  /  {}/{} candidates kept  —  {}ms total",
            dim(&output.stats.source_chars.to_string()),
            if output.stats.truncated {
                " (truncated)"
            } else {
                ""
            },
            output.stats.accepted,
            output.stats.candidates,
            output.stats.duration_ms,
        );
    }

    Ok(())
}

/// Map CLI args to `GeneratorConfig`.
async fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<GeneratorConfig> {
    let mut builder = GeneratorConfig::builder()
        .api_key(cli.api_key.clone())
        .api_url(cli.api_url.clone())
        .model(cli.model.clone())
        .app_url(cli.app_url.clone())
        .app_title(cli.app_title.clone())
        .temperature(cli.temperature)
        .max_tokens(cli.max_tokens)
        .api_timeout_secs(cli.timeout)
        .max_source_chars(cli.max_chars);

    if let Some(ref path) = cli.system_prompt {
        let prompt = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read system prompt from {:?}", path))?;
        builder = builder.system_prompt(prompt);
    }

    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Read the source text from a file, or from stdin when `input` is `-`.
async fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let text = tokio::task::spawn_blocking(|| {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).map(|_| buf)
        })
        .await
        .context("stdin reader panicked")?
        .context("Failed to read source text from stdin")?;
        Ok(text)
    } else {
        tokio::fs::read_to_string(input)
            .await
            .with_context(|| format!("Failed to read source text from '{input}'"))
    }
}

fn default_pdf_id(input: &str) -> String {
    if input == "-" {
        return "stdin".to_string();
    }
    Path::new(input)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.to_string())
}

/// Human-readable listing grouped by mark category.
fn print_questions(output: &GenerationOutput) {
    let set = QuestionSet::new(output.pdf_id.clone(), output.questions.clone());
    let mut number = 0usize;
    for (marks, questions) in set.by_marks() {
        println!("{}", bold(&format!("── {} ──", marks)));
        for q in questions {
            number += 1;
            println!("{}. {}", number, q.question_text);
            println!("   {} {}", dim("Answer:"), q.answer_text);
            println!();
        }
    }
    println!(
        "{}",
        dim(&format!(
            "{} questions, {} marks total",
            set.questions.len(),
            set.total_marks()
        ))
    );
}
