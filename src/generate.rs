//! Generation entry points.
//!
//! [`QuestionGenerator`] owns an immutable [`GeneratorConfig`] and a
//! [`CompletionClient`]. It keeps no per-call state, so one generator can be
//! shared (behind an `Arc` or by reference) across concurrent requests; each
//! call builds its own request, makes its own upstream call and validates its
//! own reply.

use crate::config::GeneratorConfig;
use crate::error::QuizGenError;
use crate::output::{GenerationOutput, GenerationStats, SourceDocument, ValidatedQuestion};
use crate::persist::{write_question_set, QuestionSet};
use crate::pipeline::llm::{CompletionClient, HttpCompletionClient};
use crate::pipeline::request::GenerationRequest;
use crate::pipeline::validate::{normalise_reply, ValidationReport};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, info_span, Instrument};

/// Turns extracted PDF text into validated exam questions.
pub struct QuestionGenerator {
    config: GeneratorConfig,
    client: Arc<dyn CompletionClient>,
}

impl std::fmt::Debug for QuestionGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuestionGenerator")
            .field("config", &self.config)
            .field("client", &"<dyn CompletionClient>")
            .finish()
    }
}

/// Everything one successful pipeline run produced.
struct PipelineRun {
    request: GenerationRequest,
    reply_chars: usize,
    report: ValidationReport,
}

impl QuestionGenerator {
    /// Create a generator that talks HTTP to `config.api_url`.
    pub fn new(config: GeneratorConfig) -> Result<Self, QuizGenError> {
        let client = HttpCompletionClient::new(&config)?;
        Ok(Self::with_client(config, Arc::new(client)))
    }

    /// Create a generator around a caller-supplied client.
    pub fn with_client(config: GeneratorConfig, client: Arc<dyn CompletionClient>) -> Self {
        Self { config, client }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate questions from `pdf_text`.
    ///
    /// # Errors
    /// Fails as a unit: empty input, any upstream failure, an unparsable
    /// reply, a reply without a `questions` array, or a reply in which no
    /// question survives validation. No partial list is ever returned.
    pub async fn generate_questions(
        &self,
        pdf_text: &str,
    ) -> Result<Vec<ValidatedQuestion>, QuizGenError> {
        self.run(pdf_text).await.map(|run| run.report.questions)
    }

    /// Generate questions for a stored document, with stats.
    pub async fn generate_for_document(
        &self,
        doc: &SourceDocument,
    ) -> Result<GenerationOutput, QuizGenError> {
        let span = info_span!("generate", pdf_id = %doc.pdf_id);
        async {
            let start = Instant::now();
            let run = self.run(&doc.text).await?;

            let stats = GenerationStats {
                source_chars: run.request.original_chars,
                truncated: run.request.truncated,
                prompt_chars: run.request.prompt.chars().count(),
                reply_chars: run.reply_chars,
                candidates: run.report.candidates,
                accepted: run.report.questions.len(),
                duration_ms: start.elapsed().as_millis() as u64,
            };

            Ok(GenerationOutput {
                pdf_id: doc.pdf_id.clone(),
                questions: run.report.questions,
                stats,
            })
        }
        .instrument(span)
        .await
    }

    /// Generate questions for `doc` and write them as a [`QuestionSet`] to
    /// `output_path`.
    pub async fn generate_to_file(
        &self,
        doc: &SourceDocument,
        output_path: impl AsRef<Path>,
    ) -> Result<GenerationOutput, QuizGenError> {
        let output = self.generate_for_document(doc).await?;
        let set = QuestionSet::new(output.pdf_id.clone(), output.questions.clone());
        write_question_set(&set, output_path.as_ref()).await?;
        Ok(output)
    }

    async fn run(&self, pdf_text: &str) -> Result<PipelineRun, QuizGenError> {
        let result = self.run_stages(pdf_text).await;
        if let Some(ref cb) = self.config.progress_callback {
            match &result {
                Ok(run) => cb.on_generation_complete(run.report.questions.len()),
                Err(e) => cb.on_generation_failed(&e.to_string()),
            }
        }
        result
    }

    async fn run_stages(&self, pdf_text: &str) -> Result<PipelineRun, QuizGenError> {
        // ── Step 1: Cap source and render prompt ─────────────────────────
        let request = GenerationRequest::new(pdf_text, self.config.max_source_chars)?;

        if let Some(ref cb) = self.config.progress_callback {
            cb.on_request_start(request.prompt.chars().count(), request.truncated);
        }

        // ── Step 2: Upstream call ────────────────────────────────────────
        let reply = self.client.complete(&request.prompt).await?;
        let reply_chars = reply.chars().count();

        if let Some(ref cb) = self.config.progress_callback {
            cb.on_reply_received(reply_chars);
        }

        // ── Step 3: Extract, parse, validate ─────────────────────────────
        let report = normalise_reply(&reply)?;

        info!(
            "Generated {}/{} questions",
            report.questions.len(),
            report.candidates
        );

        Ok(PipelineRun {
            request,
            reply_chars,
            report,
        })
    }
}

/// Synchronous wrapper around [`QuestionGenerator::generate_questions`].
///
/// Creates a temporary tokio runtime internally; do not call from inside an
/// async context.
pub fn generate_sync(
    pdf_text: &str,
    config: &GeneratorConfig,
) -> Result<Vec<ValidatedQuestion>, QuizGenError> {
    let generator = QuestionGenerator::new(config.clone())?;
    tokio::runtime::Runtime::new()
        .map_err(|e| QuizGenError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(generator.generate_questions(pdf_text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::Marks;
    use crate::progress::GenerationProgressCallback;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct CannedClient {
        reply: Result<String, u16>,
        calls: AtomicUsize,
        prompts: Mutex<Vec<String>>,
    }

    impl CannedClient {
        fn ok(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(reply.to_string()),
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn failing(status: u16) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(status),
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl CompletionClient for CannedClient {
        async fn complete(&self, prompt: &str) -> Result<String, QuizGenError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.reply {
                Ok(r) => Ok(r.clone()),
                Err(status) => Err(QuizGenError::Upstream {
                    status: *status,
                    body: "boom".into(),
                }),
            }
        }
    }

    #[derive(Default)]
    struct Events {
        log: Mutex<Vec<String>>,
    }

    impl GenerationProgressCallback for Events {
        fn on_request_start(&self, _prompt_chars: usize, truncated: bool) {
            self.log.lock().unwrap().push(format!("start:{truncated}"));
        }
        fn on_reply_received(&self, _reply_chars: usize) {
            self.log.lock().unwrap().push("reply".into());
        }
        fn on_generation_complete(&self, n: usize) {
            self.log.lock().unwrap().push(format!("done:{n}"));
        }
        fn on_generation_failed(&self, _error: &str) {
            self.log.lock().unwrap().push("failed".into());
        }
    }

    fn config() -> GeneratorConfig {
        GeneratorConfig::builder().api_key("k").build().unwrap()
    }

    const GOOD_REPLY: &str = r#"```json
{"questions":[
  {"question_text":"What is a cell?","answer_text":"The basic unit of life.","marks":1},
  {"question_text":"Discuss mitosis.","answer_text":"Mitosis is ...","marks":10}
]}
```"#;

    #[test]
    fn happy_path_returns_questions_in_order() {
        let client = CannedClient::ok(GOOD_REPLY);
        let generator = QuestionGenerator::with_client(config(), client.clone());

        let questions =
            tokio_test::block_on(generator.generate_questions("Cells are the unit of life."))
                .unwrap();

        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].marks, Marks::One);
        assert_eq!(questions[1].marks, Marks::Ten);
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
        assert!(client.prompts.lock().unwrap()[0].contains("Cells are the unit of life."));
    }

    #[test]
    fn empty_input_never_calls_upstream() {
        let client = CannedClient::ok(GOOD_REPLY);
        let generator = QuestionGenerator::with_client(config(), client.clone());

        let err = tokio_test::block_on(generator.generate_questions("   ")).unwrap_err();
        assert!(matches!(err, QuizGenError::EmptyInput));
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn upstream_failure_is_terminal() {
        let client = CannedClient::failing(500);
        let generator = QuestionGenerator::with_client(config(), client.clone());

        let err = tokio_test::block_on(generator.generate_questions("text")).unwrap_err();
        assert!(matches!(err, QuizGenError::Upstream { status: 500, .. }));
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn prompt_sent_upstream_is_capped() {
        let client = CannedClient::ok(GOOD_REPLY);
        let cfg = GeneratorConfig::builder()
            .api_key("k")
            .max_source_chars(10)
            .build()
            .unwrap();
        let generator = QuestionGenerator::with_client(cfg, client.clone());

        let out = tokio_test::block_on(
            generator.generate_for_document(&SourceDocument::new("pdf-1", "0123456789abcdef")),
        )
        .unwrap();

        assert!(out.stats.truncated);
        assert_eq!(out.stats.source_chars, 16);
        let prompt = client.prompts.lock().unwrap()[0].clone();
        assert!(prompt.contains("0123456789"));
        assert!(!prompt.contains("0123456789a"));
    }

    #[test]
    fn document_stats_are_filled() {
        let client = CannedClient::ok(GOOD_REPLY);
        let generator = QuestionGenerator::with_client(config(), client);

        let out = tokio_test::block_on(
            generator.generate_for_document(&SourceDocument::new("42", "Some notes")),
        )
        .unwrap();

        assert_eq!(out.pdf_id, "42");
        assert_eq!(out.stats.candidates, 2);
        assert_eq!(out.stats.accepted, 2);
        assert_eq!(out.stats.reply_chars, GOOD_REPLY.chars().count());
        assert!(!out.stats.truncated);
    }

    #[test]
    fn progress_events_fire_in_order() {
        let events = Arc::new(Events::default());
        let cfg = GeneratorConfig::builder()
            .api_key("k")
            .progress_callback(events.clone())
            .build()
            .unwrap();
        let generator = QuestionGenerator::with_client(cfg, CannedClient::ok(GOOD_REPLY));

        tokio_test::block_on(generator.generate_questions("notes")).unwrap();
        assert_eq!(
            *events.log.lock().unwrap(),
            vec!["start:false", "reply", "done:2"]
        );
    }

    #[test]
    fn progress_reports_failure_once() {
        let events = Arc::new(Events::default());
        let cfg = GeneratorConfig::builder()
            .api_key("k")
            .progress_callback(events.clone())
            .build()
            .unwrap();
        let generator =
            QuestionGenerator::with_client(cfg, CannedClient::ok(r#"{"questions":[]}"#));

        let err = tokio_test::block_on(generator.generate_questions("notes")).unwrap_err();
        assert!(matches!(err, QuizGenError::NoValidQuestions { .. }));
        assert_eq!(
            *events.log.lock().unwrap(),
            vec!["start:false", "reply", "failed"]
        );
    }
}
