//! Reply validation: parse the extracted JSON and normalise each question.
//!
//! The model's output is untrusted. It is parsed into a dynamic
//! [`serde_json::Value`] first, the top-level shape is checked explicitly, and
//! every array entry is read field by field into a [`CandidateQuestion`]
//! before it may become a [`ValidatedQuestion`].
//!
//! ## Entry rules
//!
//! | Situation | Outcome |
//! |-----------|---------|
//! | entry is not an object | dropped |
//! | `question_text` or `answer_text` absent, null, array or object | dropped |
//! | either text empty after trimming | dropped |
//! | `marks` absent or uncoercible | 1 |
//! | `marks` coerces to anything but 1, 2, 3, 10 | 1 |
//!
//! Numbers and booleans in the text fields are stringified. `marks` accepts
//! integers, floats (truncated toward zero), numeric strings (leading integer,
//! so `"3 marks"` is 3) and booleans (1 / 0).

use crate::error::QuizGenError;
use crate::output::{CandidateQuestion, Marks, ValidatedQuestion};
use crate::pipeline::extract::extract_json_payload;
use serde_json::{Map, Value};
use tracing::{debug, error, warn};

/// Outcome of validating one reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Number of entries in the `questions` array.
    pub candidates: usize,
    /// Surviving questions in source order. Never empty.
    pub questions: Vec<ValidatedQuestion>,
}

/// Parse extracted reply text as JSON.
pub fn parse_payload(text: &str) -> Result<Value, QuizGenError> {
    serde_json::from_str::<Value>(text).map_err(|e| {
        error!(content = %text, "Model reply is not valid JSON: {}", e);
        QuizGenError::JsonParse {
            source: e,
            content: text.to_string(),
        }
    })
}

/// Check the reply shape and normalise every usable question.
pub fn validate_questions(payload: &Value) -> Result<ValidationReport, QuizGenError> {
    let object = payload.as_object().ok_or_else(|| {
        shape_error(format!(
            "expected a JSON object at the top level, got {}",
            type_name(payload)
        ))
    })?;

    let entries = match object.get("questions") {
        Some(Value::Array(entries)) => entries,
        Some(other) => {
            return Err(shape_error(format!(
                "`questions` must be an array, got {}",
                type_name(other)
            )))
        }
        None => return Err(shape_error("missing `questions` field".to_string())),
    };

    let questions: Vec<ValidatedQuestion> = entries
        .iter()
        .enumerate()
        .filter_map(|(idx, entry)| {
            let candidate = read_candidate(entry);
            let validated = candidate.and_then(normalise_candidate);
            if validated.is_none() {
                debug!("Dropping question entry {}: missing or empty text", idx);
            }
            validated
        })
        .collect();

    if questions.is_empty() {
        error!(
            candidates = entries.len(),
            "No valid questions survived validation"
        );
        return Err(QuizGenError::NoValidQuestions {
            candidates: entries.len(),
        });
    }

    if questions.len() < entries.len() {
        warn!(
            "Kept {}/{} question entries from model reply",
            questions.len(),
            entries.len()
        );
    }

    Ok(ValidationReport {
        candidates: entries.len(),
        questions,
    })
}

/// Extract, parse and validate a raw model reply in one step.
pub fn normalise_reply(raw: &str) -> Result<ValidationReport, QuizGenError> {
    let payload = extract_json_payload(raw);
    let value = parse_payload(&payload)?;
    validate_questions(&value)
}

/// Read one array entry. `None` when the entry is not an object.
pub fn read_candidate(entry: &Value) -> Option<CandidateQuestion> {
    let fields: &Map<String, Value> = entry.as_object()?;
    Some(CandidateQuestion {
        question_text: fields.get("question_text").and_then(text_value),
        answer_text: fields.get("answer_text").and_then(text_value),
        marks: fields.get("marks").and_then(coerce_marks),
    })
}

/// Turn a candidate into a validated question, or `None` if either text field
/// is missing or blank.
pub fn normalise_candidate(candidate: CandidateQuestion) -> Option<ValidatedQuestion> {
    let question_text = non_blank(candidate.question_text?)?;
    let answer_text = non_blank(candidate.answer_text?)?;
    let marks = Marks::from_coerced(candidate.marks.unwrap_or(1));

    Some(ValidatedQuestion {
        question_text,
        answer_text,
        marks,
    })
}

fn non_blank(text: String) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == text.len() {
        Some(text)
    } else {
        Some(trimmed.to_string())
    }
}

fn text_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Integer view of a `marks` value.
pub fn coerce_marks(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite())
                .map(|f| f.trunc().clamp(i64::MIN as f64, i64::MAX as f64) as i64)
        }),
        Value::String(s) => leading_integer(s),
        Value::Bool(b) => Some(i64::from(*b)),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn leading_integer(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let magnitude: i64 = digits[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

fn shape_error(detail: String) -> QuizGenError {
    error!("Model reply has an invalid shape: {}", detail);
    QuizGenError::InvalidResponseShape { detail }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
