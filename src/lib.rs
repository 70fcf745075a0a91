//! # pdf-quizgen
//!
//! Generate exam-style questions from the extracted text of a PDF using a
//! chat-completion LLM.
//!
//! Study notes and textbooks make better revision material once they are
//! turned into questions with model answers, graded by weight. This crate
//! takes the plain text of an uploaded PDF, asks an OpenAI-compatible model
//! for a rubric of 1-, 2-, 3- and 10-mark questions, and returns only the
//! questions that survive strict validation.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF text
//!  │
//!  ├─ 1. Request   reject empty text, cap at 15 000 chars, render prompt
//!  ├─ 2. LLM       one authenticated POST, 120 s timeout, no retries
//!  ├─ 3. Extract   strip code fences and chatter around the JSON object
//!  ├─ 4. Validate  check shape, drop broken entries, coerce marks
//!  └─ 5. Output    non-empty list of validated questions
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf_quizgen::{GeneratorConfig, QuestionGenerator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GeneratorConfig::builder()
//!         .api_key(std::env::var("QUIZGEN_API_KEY")?)
//!         .build()?;
//!     let generator = QuestionGenerator::new(config)?;
//!     let questions = generator
//!         .generate_questions("Photosynthesis converts light into chemical energy…")
//!         .await?;
//!     for q in &questions {
//!         println!("[{}] {}", q.marks, q.question_text);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `quizgen` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdf-quizgen = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod generate;
pub mod output;
pub mod persist;
pub mod pipeline;
pub mod progress;
pub mod prompts;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{GeneratorConfig, GeneratorConfigBuilder};
pub use error::QuizGenError;
pub use generate::{generate_sync, QuestionGenerator};
pub use output::{
    CandidateQuestion, GenerationOutput, GenerationStats, Marks, SourceDocument, ValidatedQuestion,
};
pub use persist::{write_question_set, QuestionSet};
pub use pipeline::llm::{CompletionClient, HttpCompletionClient};
pub use progress::{GenerationProgressCallback, NoopProgressCallback, ProgressCallback};
