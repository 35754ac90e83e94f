use anyhow::Result;
use async_trait::async_trait;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tokio::time::timeout;

pub mod gemini;

/// Reason reported when the service returns nothing and gives no feedback.
pub const UNKNOWN_BLOCK_REASON: &str = "unknown";

/// Longest block reason or failure message an outcome carries.
pub const MAX_NOTICE_CHARS: usize = 500;

const ELLIPSIS: char = '…';

#[derive(Debug, Clone)]
pub enum LLMProvider {
    Gemini(gemini::GeminiConfig),
}

/// Sampling controls sent alongside every prompt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParameters {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            temperature: 0.8,
            top_p: 0.95,
            top_k: 40,
            max_output_tokens: 250,
        }
    }
}

/// What a provider handed back, before classification.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderResponse {
    pub text: Option<String>,
    pub feedback: Option<String>,
}

/// The result of one generation attempt. Every call to [`LLMClient::generate`]
/// ends in exactly one of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum GenerationOutcome {
    Text(String),
    Blocked(String),
    Failed(String),
}

impl GenerationOutcome {
    /// Any non-empty text wins, even if it is only whitespace. Without text, a
    /// non-blank feedback string becomes the block reason.
    pub fn from_response(response: ProviderResponse) -> Self {
        match response.text {
            Some(text) if !text.is_empty() => GenerationOutcome::Text(text),
            _ => match response.feedback {
                Some(reason) if !reason.trim().is_empty() => GenerationOutcome::Blocked(reason),
                _ => GenerationOutcome::Blocked(UNKNOWN_BLOCK_REASON.to_string()),
            },
        }
    }

    /// Cuts the message down to `max_chars` characters, marking the cut with
    /// an ellipsis.
    pub fn truncated(self, max_chars: usize) -> Self {
        match self {
            GenerationOutcome::Text(message) => {
                GenerationOutcome::Text(truncate_chars(message, max_chars))
            }
            GenerationOutcome::Blocked(message) => {
                GenerationOutcome::Blocked(truncate_chars(message, max_chars))
            }
            GenerationOutcome::Failed(message) => {
                GenerationOutcome::Failed(truncate_chars(message, max_chars))
            }
        }
    }

    pub fn message(&self) -> &str {
        match self {
            GenerationOutcome::Text(message)
            | GenerationOutcome::Blocked(message)
            | GenerationOutcome::Failed(message) => message,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            GenerationOutcome::Text(_) => "text",
            GenerationOutcome::Blocked(_) => "blocked",
            GenerationOutcome::Failed(_) => "failed",
        }
    }
}

/// Boundary to an external text-generation service.
#[async_trait]
pub trait LLMService {
    async fn execute_prompt(
        &self,
        prompt: &str,
        parameters: &GenerationParameters,
    ) -> Result<ProviderResponse>;
}

pub struct LLMClientConfig {
    pub timeout: Duration,
}

impl Default for LLMClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
        }
    }
}

pub struct LLMClient {
    service: Box<dyn LLMService + Send + Sync>,
    config: LLMClientConfig,
}

impl LLMClient {
    pub fn new(provider: LLMProvider, config: Option<LLMClientConfig>) -> Result<Self> {
        let service: Box<dyn LLMService + Send + Sync> = match provider {
            LLMProvider::Gemini(gemini_config) => {
                Box::new(gemini::GeminiService::new(gemini_config)?)
            }
        };

        Ok(Self {
            service,
            config: config.unwrap_or_default(),
        })
    }

    pub fn from_service(service: Box<dyn LLMService + Send + Sync>) -> Self {
        Self {
            service,
            config: LLMClientConfig::default(),
        }
    }

    /// Calls the service once and classifies whatever comes back. Errors,
    /// timeouts and panics inside the service all become
    /// [`GenerationOutcome::Failed`].
    pub async fn generate(
        &self,
        prompt: &str,
        parameters: &GenerationParameters,
    ) -> GenerationOutcome {
        tracing::debug!(state = "requesting", prompt_len = prompt.len(), "generation started");

        let call = AssertUnwindSafe(self.service.execute_prompt(prompt, parameters)).catch_unwind();

        let outcome = match timeout(self.config.timeout, call).await {
            Ok(Ok(Ok(response))) => GenerationOutcome::from_response(response),
            Ok(Ok(Err(e))) => GenerationOutcome::Failed(format!("{:#}", e)),
            Ok(Err(panic)) => GenerationOutcome::Failed(format!(
                "generation service panicked: {}",
                panic_message(panic.as_ref())
            )),
            Err(_) => GenerationOutcome::Failed(format!(
                "generation timed out after {:?}",
                self.config.timeout
            )),
        };

        let outcome = match outcome {
            GenerationOutcome::Text(_) => outcome,
            notice => notice.truncated(MAX_NOTICE_CHARS),
        };

        match &outcome {
            GenerationOutcome::Text(_) => tracing::info!(state = "text", "generation finished"),
            GenerationOutcome::Blocked(reason) => {
                tracing::warn!(state = "blocked", reason = %reason, "generation blocked")
            }
            GenerationOutcome::Failed(message) => {
                tracing::error!(state = "failed", error = %message, "generation failed")
            }
        }

        outcome
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }
}

pub fn truncate_chars(message: String, max_chars: usize) -> String {
    if message.chars().count() <= max_chars {
        return message;
    }
    if max_chars == 0 {
        return String::new();
    }
    let mut cut: String = message.chars().take(max_chars - 1).collect();
    cut.push(ELLIPSIS);
    cut
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
