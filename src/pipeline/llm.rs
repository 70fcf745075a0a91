//! Upstream interaction: one chat-completion request per generation call.
//!
//! [`CompletionClient`] is the seam between the pipeline and the network.
//! [`HttpCompletionClient`] speaks the OpenAI-compatible wire format with
//! `reqwest`; tests and embedders can supply their own implementation through
//! [`crate::generate::QuestionGenerator::with_client`].
//!
//! ## Failure policy
//!
//! A single attempt, no retries. The configured timeout bounds the whole
//! request. A non-success status is logged with its body and returned as
//! [`QuizGenError::Upstream`]; a 2xx reply without
//! `choices[0].message.content` is [`QuizGenError::MalformedUpstreamResponse`].

use crate::config::GeneratorConfig;
use crate::error::QuizGenError;
use crate::prompts::SYSTEM_PROMPT;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// Sends a rendered prompt upstream and returns the raw reply text.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Complete `prompt`. The prompt is already capped; implementations must
    /// not truncate it again.
    async fn complete(&self, prompt: &str) -> Result<String, QuizGenError>;
}

/// `reqwest`-backed client for OpenAI-compatible chat-completion endpoints.
pub struct HttpCompletionClient {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
    model: String,
    temperature: f32,
    max_tokens: usize,
    timeout_secs: u64,
    app_url: String,
    app_title: String,
    system_prompt: String,
}

impl std::fmt::Debug for HttpCompletionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCompletionClient")
            .field("api_key", &"[REDACTED]")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl HttpCompletionClient {
    /// Build a client from `config`. Fails only if the TLS backend cannot be
    /// initialised.
    pub fn new(config: &GeneratorConfig) -> Result<Self, QuizGenError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api_timeout_secs))
            .build()
            .map_err(|e| QuizGenError::Internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            api_url: config.api_url.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout_secs: config.api_timeout_secs,
            app_url: config.app_url.clone(),
            app_title: config.app_title.clone(),
            system_prompt: config
                .system_prompt
                .clone()
                .unwrap_or_else(|| SYSTEM_PROMPT.to_string()),
        })
    }

    fn build_request<'a>(&'a self, prompt: &'a str) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &self.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }

    fn map_send_error(&self, e: reqwest::Error) -> QuizGenError {
        if e.is_timeout() {
            error!(
                url = %self.api_url,
                timeout_secs = self.timeout_secs,
                "Upstream request timed out"
            );
            QuizGenError::Timeout {
                secs: self.timeout_secs,
            }
        } else {
            error!(url = %self.api_url, "Upstream request failed: {}", e);
            QuizGenError::Transport {
                reason: e.to_string(),
            }
        }
    }
}

#[async_trait]
impl CompletionClient for HttpCompletionClient {
    async fn complete(&self, prompt: &str) -> Result<String, QuizGenError> {
        info!(
            "Requesting questions from {} (model: {}, temperature: {})",
            self.api_url, self.model, self.temperature
        );
        let start = Instant::now();

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", &self.app_url)
            .header("X-Title", &self.app_title)
            .json(&self.build_request(prompt))
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.map_send_error(e))?;
        debug!(
            "Upstream replied HTTP {} with {} bytes in {:?}",
            status.as_u16(),
            body.len(),
            start.elapsed()
        );

        if !status.is_success() {
            error!(
                status = status.as_u16(),
                body = %body,
                "Upstream service returned an error status"
            );
            return Err(QuizGenError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        extract_reply_content(&body)
    }
}

/// Pull `choices[0].message.content` out of a success envelope.
pub fn extract_reply_content(body: &str) -> Result<String, QuizGenError> {
    let envelope: ChatCompletionResponse = serde_json::from_str(body).map_err(|e| {
        error!(body = %body, "Upstream success body is not a completion envelope: {}", e);
        QuizGenError::MalformedUpstreamResponse {
            detail: format!("undecodable body: {e}"),
        }
    })?;

    envelope
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .ok_or_else(|| {
            error!(body = %body, "Upstream envelope has no choices[0].message.content");
            QuizGenError::MalformedUpstreamResponse {
                detail: "missing choices[0].message.content".to_string(),
            }
        })
}

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: usize,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GeneratorConfig {
        GeneratorConfig::builder()
            .api_key("sk-test")
            .model("test/model")
            .temperature(0.3)
            .max_tokens(123)
            .build()
            .unwrap()
    }

    #[test]
    fn request_body_shape() {
        let client = HttpCompletionClient::new(&config()).unwrap();
        let body = serde_json::to_value(client.build_request("PROMPT")).unwrap();

        assert_eq!(body["model"], "test/model");
        assert_eq!(body["max_tokens"], 123);
        assert!((body["temperature"].as_f64().unwrap() - 0.3).abs() < 1e-6);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], SYSTEM_PROMPT);
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "PROMPT");
    }

    #[test]
    fn custom_system_prompt_is_used() {
        let mut cfg = config();
        cfg.system_prompt = Some("Be terse.".into());
        let client = HttpCompletionClient::new(&cfg).unwrap();
        let body = serde_json::to_value(client.build_request("p")).unwrap();
        assert_eq!(body["messages"][0]["content"], "Be terse.");
    }

    #[test]
    fn content_is_extracted_from_first_choice() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"first"}},{"message":{"content":"second"}}]}"#;
        assert_eq!(extract_reply_content(body).unwrap(), "first");
    }

    #[test]
    fn missing_content_is_malformed() {
        for body in [
            r#"{"choices":[]}"#,
            r#"{"id":"x"}"#,
            r#"{"choices":[{"finish_reason":"length"}]}"#,
            r#"{"choices":[{"message":{"content":null}}]}"#,
            "not json at all",
        ] {
            let err = extract_reply_content(body).unwrap_err();
            assert!(
                matches!(err, QuizGenError::MalformedUpstreamResponse { .. }),
                "body {body:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn debug_redacts_key() {
        let client = HttpCompletionClient::new(&config()).unwrap();
        assert!(!format!("{client:?}").contains("sk-test"));
    }
}
