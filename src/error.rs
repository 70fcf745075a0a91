//! Error types for the pdf-quizgen library.
//!
//! A generation call is all-or-nothing: it either yields a non-empty list of
//! validated questions or fails with exactly one [`QuizGenError`]. There is no
//! partial-success type, unlike a multi-page conversion where one bad page can
//! be skipped. Each variant maps to one pipeline stage so callers (controllers,
//! the CLI) can translate it into a user-facing response without string
//! matching.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pdf-quizgen library.
#[derive(Debug, Error)]
pub enum QuizGenError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The source text was empty or whitespace-only. Raised before any
    /// network traffic.
    #[error("Source text is empty; nothing to generate questions from")]
    EmptyInput,

    // ── Upstream errors ───────────────────────────────────────────────────
    /// The chat-completion service answered with a non-success status.
    #[error("Upstream service returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    /// The service answered 2xx but the envelope lacked
    /// `choices[0].message.content`.
    #[error("Malformed upstream response: {detail}")]
    MalformedUpstreamResponse { detail: String },

    /// The request exceeded the configured timeout.
    #[error("Upstream request timed out after {secs}s\nIncrease --timeout.")]
    Timeout { secs: u64 },

    /// Connection, TLS or body-read failure before a status was available.
    #[error("Upstream request failed: {reason}")]
    Transport { reason: String },

    // ── Reply errors ──────────────────────────────────────────────────────
    /// The extracted reply text is not valid JSON.
    #[error("Model reply is not valid JSON: {source}")]
    JsonParse {
        #[source]
        source: serde_json::Error,
        content: String,
    },

    /// The JSON parsed but has no `questions` array at the top level.
    #[error("Model reply has an invalid shape: {detail}")]
    InvalidResponseShape { detail: String },

    /// Every candidate entry was dropped, or the array was empty.
    #[error("No valid questions in model reply ({candidates} candidates rejected)")]
    NoValidQuestions { candidates: usize },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the question-set file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl QuizGenError {
    /// True when the failure originated at the external chat-completion service
    /// rather than in local input or reply handling.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            QuizGenError::Upstream { .. }
                | QuizGenError::MalformedUpstreamResponse { .. }
                | QuizGenError::Timeout { .. }
                | QuizGenError::Transport { .. }
        )
    }
}
