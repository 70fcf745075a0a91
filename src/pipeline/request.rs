//! Request preparation: cap the source text and render the prompt.
//!
//! The cap is counted in characters, not bytes, so a cut never lands inside a
//! multi-byte UTF-8 sequence. Over-cap text keeps exactly `cap` characters and
//! gains [`TRUNCATION_MARKER`], so the model (and anyone reading the prompt)
//! can see that material was dropped.

use crate::error::QuizGenError;
use crate::prompts::{render_question_prompt, TRUNCATION_MARKER};
use std::borrow::Cow;
use tracing::{debug, warn};

/// The prepared input for one upstream call. Built per call and dropped after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Source text after capping, marker included when cut.
    pub source_text: String,
    /// Rendered user prompt.
    pub prompt: String,
    /// Whether the source exceeded the cap.
    pub truncated: bool,
    /// Character count of the source before capping.
    pub original_chars: usize,
}

impl GenerationRequest {
    /// Cap `text` at `max_chars` and render the prompt.
    ///
    /// # Errors
    /// [`QuizGenError::EmptyInput`] when `text` is empty or whitespace-only.
    pub fn new(text: &str, max_chars: usize) -> Result<Self, QuizGenError> {
        if text.trim().is_empty() {
            warn!("Refusing to generate questions from empty source text");
            return Err(QuizGenError::EmptyInput);
        }

        let original_chars = text.chars().count();
        let (source, truncated) = truncate_source(text, max_chars);
        if truncated {
            warn!(
                "Source text truncated from {} to {} characters",
                original_chars, max_chars
            );
        }

        let prompt = render_question_prompt(&source);
        debug!(
            "Prepared prompt: {} chars ({} source chars)",
            prompt.chars().count(),
            original_chars
        );

        Ok(Self {
            source_text: source.into_owned(),
            prompt,
            truncated,
            original_chars,
        })
    }
}

/// Cut `text` to `max_chars` characters, appending [`TRUNCATION_MARKER`].
///
/// Returns the text unchanged (borrowed) when it fits.
pub fn truncate_source(text: &str, max_chars: usize) -> (Cow<'_, str>, bool) {
    match text.char_indices().nth(max_chars) {
        None => (Cow::Borrowed(text), false),
        Some((cut, _)) => {
            let mut out = String::with_capacity(cut + TRUNCATION_MARKER.len());
            out.push_str(&text[..cut]);
            out.push_str(TRUNCATION_MARKER);
            (Cow::Owned(out), true)
        }
    }
}
