//! Configuration types for question generation.
//!
//! All generator behaviour is controlled through [`GeneratorConfig`], built
//! via its [`GeneratorConfigBuilder`]. The config is a plain value handed to
//! [`crate::generate::QuestionGenerator`] at construction; the library never
//! reads environment variables itself. The CLI maps its flags (and their
//! `env` fallbacks) onto the builder.

use crate::error::QuizGenError;
use crate::progress::ProgressCallback;
use crate::prompts::DEFAULT_MAX_SOURCE_CHARS;
use std::fmt;

/// Default OpenAI-compatible chat-completion endpoint.
pub const DEFAULT_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Default model identifier sent in the request body.
pub const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";

/// Configuration for a [`crate::generate::QuestionGenerator`].
///
/// # Example
/// ```rust
/// use pdf_quizgen::GeneratorConfig;
///
/// let config = GeneratorConfig::builder()
///     .api_key("sk-or-...")
///     .model("openai/gpt-4o-mini")
///     .api_timeout_secs(60)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct GeneratorConfig {
    /// Bearer token for the chat-completion service. Required.
    pub api_key: String,

    /// Full URL of the chat-completion endpoint.
    pub api_url: String,

    /// Model identifier, e.g. "openai/gpt-4o-mini".
    pub model: String,

    /// Sampling temperature. Default: 0.7.
    ///
    /// Question writing benefits from some variety; the validator absorbs
    /// whatever formatting drift that introduces.
    pub temperature: f32,

    /// Maximum tokens the model may generate. Default: 4000.
    ///
    /// A full rubric (up to 16 questions, two of them essay-length answers)
    /// fits comfortably; too low a value truncates the JSON mid-array and the
    /// reply fails to parse.
    pub max_tokens: usize,

    /// Per-request timeout in seconds. Default: 120.
    pub api_timeout_secs: u64,

    /// Source text cap in characters. Default: 15 000.
    pub max_source_chars: usize,

    /// Sent as the `HTTP-Referer` header.
    pub app_url: String,

    /// Sent as the `X-Title` header.
    pub app_title: String,

    /// Custom system prompt. If None, uses [`crate::prompts::SYSTEM_PROMPT`].
    pub system_prompt: Option<String>,

    /// Optional progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 4000,
            api_timeout_secs: 120,
            max_source_chars: DEFAULT_MAX_SOURCE_CHARS,
            app_url: "http://localhost".to_string(),
            app_title: "pdf-quizgen".to_string(),
            system_prompt: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorConfig")
            .field("api_key", &"[REDACTED]")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("max_source_chars", &self.max_source_chars)
            .field("app_url", &self.app_url)
            .field("app_title", &self.app_title)
            .field("system_prompt", &self.system_prompt.as_ref().map(|p| p.len()))
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn GenerationProgressCallback>"),
            )
            .finish()
    }
}

impl GeneratorConfig {
    /// Create a new builder for `GeneratorConfig`.
    pub fn builder() -> GeneratorConfigBuilder {
        GeneratorConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`GeneratorConfig`].
#[derive(Debug)]
pub struct GeneratorConfigBuilder {
    config: GeneratorConfig,
}

impl GeneratorConfigBuilder {
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn max_source_chars(mut self, n: usize) -> Self {
        self.config.max_source_chars = n;
        self
    }

    pub fn app_url(mut self, url: impl Into<String>) -> Self {
        self.config.app_url = url.into();
        self
    }

    pub fn app_title(mut self, title: impl Into<String>) -> Self {
        self.config.app_title = title.into();
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<GeneratorConfig, QuizGenError> {
        let c = &self.config;
        if c.api_key.trim().is_empty() {
            return Err(QuizGenError::InvalidConfig(
                "API key is required (set QUIZGEN_API_KEY or pass --api-key)".into(),
            ));
        }
        if !(c.api_url.starts_with("http://") || c.api_url.starts_with("https://")) {
            return Err(QuizGenError::InvalidConfig(format!(
                "API URL must be http(s), got '{}'",
                c.api_url
            )));
        }
        if c.model.trim().is_empty() {
            return Err(QuizGenError::InvalidConfig("Model must not be empty".into()));
        }
        if c.max_tokens == 0 {
            return Err(QuizGenError::InvalidConfig("max_tokens must be ≥ 1".into()));
        }
        if c.api_timeout_secs == 0 {
            return Err(QuizGenError::InvalidConfig(
                "Timeout must be ≥ 1 second".into(),
            ));
        }
        if c.max_source_chars == 0 {
            return Err(QuizGenError::InvalidConfig(
                "max_source_chars must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}
