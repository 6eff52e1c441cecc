//! Summarizer collaborator: an OpenAI-compatible chat-completions client
//! that turns an assembled context payload into a structured [`Summary`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use repolens_protocol::{RepoRef, Summary};

pub mod prompt;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TIMEOUT_SECS: u64 = 120;
const TEMPERATURE: f32 = 0.2;
const MAX_TOKENS: usize = 4096;

/// Failures of the summarization stage. All are terminal for the request:
/// without a model response there is no summary to return.
#[derive(Error, Debug)]
pub enum SummarizerError {
    #[error("summarization request timed out")]
    Timeout,

    #[error("summarizer quota or rate limit exceeded; try again later")]
    QuotaExceeded,

    #[error("summarizer API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("model returned malformed output: {0}")]
    Malformed(String),
}

/// Configuration for the chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct SummarizerConfig {
    /// API key, sent as a bearer token. Required.
    pub api_key: String,
    /// Base URL of the OpenAI-compatible API.
    pub base_url: String,
    /// Model identifier.
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl SummarizerConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

/// Capability to produce a summary from an assembled payload. The server
/// depends on this seam so tests can substitute a canned model.
#[async_trait]
pub trait SummaryModel: Send + Sync {
    async fn summarize(&self, repo: &RepoRef, payload: &str) -> Result<Summary, SummarizerError>;
}

/// Chat-completions client for any OpenAI-compatible endpoint.
pub struct ChatCompletionsClient {
    config: SummarizerConfig,
    client: reqwest::Client,
}

impl ChatCompletionsClient {
    pub fn new(config: SummarizerConfig) -> Result<Self, SummarizerError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| SummarizerError::Http(err.to_string()))?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl SummaryModel for ChatCompletionsClient {
    async fn summarize(&self, repo: &RepoRef, payload: &str) -> Result<Summary, SummarizerError> {
        let request = ChatCompletionsRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: prompt::SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt::user_prompt(repo, payload),
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            response_format: ResponseFormat {
                format_type: "json_object".to_string(),
            },
        };

        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        log::debug!("summarizing {repo} with model {}", self.config.model);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    SummarizerError::Timeout
                } else {
                    SummarizerError::Http(err.to_string())
                }
            })?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(SummarizerError::QuotaExceeded);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SummarizerError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatCompletionsResponse = response
            .json()
            .await
            .map_err(|err| SummarizerError::Malformed(err.to_string()))?;
        parse_summary(&completion)
    }
}

fn parse_summary(completion: &ChatCompletionsResponse) -> Result<Summary, SummarizerError> {
    let content = completion
        .choices
        .first()
        .map(|choice| choice.message.content.as_str())
        .unwrap_or_default();
    if content.trim().is_empty() {
        return Err(SummarizerError::Malformed(
            "empty completion content".to_string(),
        ));
    }

    serde_json::from_str(content.trim()).map_err(|err| {
        log::error!(
            "failed to parse model output as a summary: {err}; head: {:.120}",
            content
        );
        SummarizerError::Malformed(format!("completion is not a valid summary object: {err}"))
    })
}

#[derive(Debug, Serialize)]
struct ChatCompletionsRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: usize,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionsResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}
