//! Input and output types of the generation pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Extracted text of one uploaded PDF, as supplied by the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDocument {
    /// Identifier of the owning PDF record.
    pub pdf_id: String,
    /// Plain text extracted from the PDF.
    pub text: String,
}

impl SourceDocument {
    pub fn new(pdf_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            pdf_id: pdf_id.into(),
            text: text.into(),
        }
    }
}

/// Point weight of a question. Only these four categories exist.
///
/// Serialises as the bare integer (`1`, `2`, `3`, `10`).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum Marks {
    #[default]
    One = 1,
    Two = 2,
    Three = 3,
    Ten = 10,
}

impl Marks {
    /// All categories in ascending order.
    pub const ALL: [Marks; 4] = [Marks::One, Marks::Two, Marks::Three, Marks::Ten];

    pub fn value(self) -> u8 {
        self as u8
    }

    /// Map an arbitrary integer onto a category; anything outside the allowed
    /// set becomes [`Marks::One`].
    pub fn from_coerced(value: i64) -> Self {
        match value {
            1 => Marks::One,
            2 => Marks::Two,
            3 => Marks::Three,
            10 => Marks::Ten,
            _ => Marks::One,
        }
    }
}

impl TryFrom<u8> for Marks {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Marks::One),
            2 => Ok(Marks::Two),
            3 => Ok(Marks::Three),
            10 => Ok(Marks::Ten),
            other => Err(format!("marks must be 1, 2, 3 or 10, got {other}")),
        }
    }
}

impl From<Marks> for u8 {
    fn from(m: Marks) -> Self {
        m.value()
    }
}

impl fmt::Display for Marks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Marks::One => write!(f, "1 mark"),
            other => write!(f, "{} marks", other.value()),
        }
    }
}

/// One entry of the model's `questions` array before validation.
///
/// Fields are `None` when the key was absent or held a value that cannot be
/// read as text (null, array, object).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateQuestion {
    pub question_text: Option<String>,
    pub answer_text: Option<String>,
    /// Integer-coerced `marks`, `None` when absent or uncoercible.
    pub marks: Option<i64>,
}

/// A generated question that passed validation.
///
/// Both text fields are trimmed and non-empty; `marks` is always an allowed
/// category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedQuestion {
    pub question_text: String,
    pub answer_text: String,
    pub marks: Marks,
}

/// Timing and size figures for one generation call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Characters in the source text as supplied.
    pub source_chars: usize,
    /// Whether the source was cut to the cap.
    pub truncated: bool,
    /// Characters in the rendered user prompt.
    pub prompt_chars: usize,
    /// Characters in the raw model reply.
    pub reply_chars: usize,
    /// Entries found in the reply's `questions` array.
    pub candidates: usize,
    /// Entries that survived validation.
    pub accepted: usize,
    /// Wall-clock time of the whole call.
    pub duration_ms: u64,
}

/// Result of [`crate::generate::QuestionGenerator::generate_for_document`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationOutput {
    pub pdf_id: String,
    pub questions: Vec<ValidatedQuestion>,
    pub stats: GenerationStats,
}
