//! Hand-off to the persistence layer.
//!
//! The durable store (database rows keyed by PDF) lives outside this crate.
//! What crosses the boundary is a [`QuestionSet`]: the validated list bound
//! to the PDF it came from. [`write_question_set`] is the file-backed
//! hand-off the CLI uses.

use crate::error::QuizGenError;
use crate::output::{Marks, ValidatedQuestion};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// Validated questions for one PDF, in generation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSet {
    pub pdf_id: String,
    pub questions: Vec<ValidatedQuestion>,
}

impl QuestionSet {
    pub fn new(pdf_id: impl Into<String>, questions: Vec<ValidatedQuestion>) -> Self {
        Self {
            pdf_id: pdf_id.into(),
            questions,
        }
    }

    /// Questions grouped by mark category, ascending. Order within a group
    /// follows generation order. Empty categories are omitted.
    pub fn by_marks(&self) -> BTreeMap<Marks, Vec<&ValidatedQuestion>> {
        let mut groups: BTreeMap<Marks, Vec<&ValidatedQuestion>> = BTreeMap::new();
        for q in &self.questions {
            groups.entry(q.marks).or_default().push(q);
        }
        groups
    }

    /// Sum of all question weights.
    pub fn total_marks(&self) -> u32 {
        self.questions.iter().map(|q| u32::from(q.marks.value())).sum()
    }
}

/// Write `set` to `path` as pretty-printed JSON.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn write_question_set(set: &QuestionSet, path: &Path) -> Result<(), QuizGenError> {
    let json = serde_json::to_string_pretty(set)
        .map_err(|e| QuizGenError::Internal(format!("Failed to serialise question set: {e}")))?;

    let write_err = |e: std::io::Error| QuizGenError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
        }
    }

    let tmp_path = path.with_extension("json.tmp");
    tokio::fs::write(&tmp_path, json.as_bytes())
        .await
        .map_err(write_err)?;
    tokio::fs::rename(&tmp_path, path).await.map_err(write_err)?;

    info!(
        "Wrote {} questions for PDF {} to {}",
        set.questions.len(),
        set.pdf_id,
        path.display()
    );
    Ok(())
}
