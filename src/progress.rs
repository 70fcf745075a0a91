//! Progress-callback trait for generation events.
//!
//! Inject an [`Arc<dyn GenerationProgressCallback>`] via
//! [`crate::config::GeneratorConfigBuilder::progress_callback`] to observe a
//! generation call as it moves through the pipeline. A call spends nearly all
//! of its time waiting on the upstream service, so the events bracket that
//! wait: one when the request goes out, one when the reply arrives, and one
//! terminal event.
//!
//! # Example
//!
//! ```rust
//! use pdf_quizgen::{GenerationProgressCallback, GeneratorConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     generated: Arc<AtomicUsize>,
//! }
//!
//! impl GenerationProgressCallback for CountingCallback {
//!     fn on_generation_complete(&self, question_count: usize) {
//!         self.generated.fetch_add(question_count, Ordering::SeqCst);
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback {
//!     generated: Arc::new(AtomicUsize::new(0)),
//! });
//!
//! let config = GeneratorConfig::builder()
//!     .api_key("sk-test")
//!     .progress_callback(counter as Arc<dyn GenerationProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the generator at each pipeline milestone.
///
/// Implementations must be `Send + Sync`: one generator may serve concurrent
/// calls, and each call fires its own events. All methods have default no-op
/// implementations so callers only override what they care about.
pub trait GenerationProgressCallback: Send + Sync {
    /// Called just before the upstream request is sent.
    ///
    /// # Arguments
    /// * `prompt_chars` — character count of the rendered prompt
    /// * `truncated`    — whether the source text was cut to the cap
    fn on_request_start(&self, prompt_chars: usize, truncated: bool) {
        let _ = (prompt_chars, truncated);
    }

    /// Called when the upstream reply content has been received.
    fn on_reply_received(&self, reply_chars: usize) {
        let _ = reply_chars;
    }

    /// Called once with the number of validated questions.
    fn on_generation_complete(&self, question_count: usize) {
        let _ = question_count;
    }

    /// Called once when any stage fails.
    fn on_generation_failed(&self, error: &str) {
        let _ = error;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl GenerationProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::GeneratorConfig`].
pub type ProgressCallback = Arc<dyn GenerationProgressCallback>;
