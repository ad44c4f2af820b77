//! Model access for cvforge's AI features.
//!
//! Every AI feature goes through this client; feature modules never talk
//! to the Anthropic API directly. Each call carries an explicit output
//! budget, and structured calls name the contract the reply must satisfy,
//! so a failed tailoring call reads differently from a failed analysis.

use std::time::Duration;

use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
/// One model for every call so analysis and tailoring never drift apart.
pub const MODEL: &str = "claude-sonnet-4-5";
const MAX_ATTEMPTS: u32 = 3;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Output budget per call shape. A tailored resume document is an order
/// of magnitude larger than an analysis object or a one-page letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenBudget {
    /// Structured job analysis.
    Analysis,
    /// A complete tailored JSON-Resume document.
    FullResume,
    /// A 250-350 word cover letter.
    Letter,
}

impl TokenBudget {
    fn max_tokens(self) -> u32 {
        match self {
            TokenBudget::Analysis => 2048,
            TokenBudget::FullResume => 8192,
            TokenBudget::Letter => 1024,
        }
    }
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("model reply did not match the {contract} contract: {source}")]
    Contract {
        contract: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("model returned no text content")]
    EmptyContent,
}

/// 429 and 5xx are transient; everything else fails the call outright.
fn retryable(error: &LlmError) -> bool {
    match error {
        LlmError::Http(_) => true,
        LlmError::Api { status, .. } => *status == 429 || *status >= 500,
        LlmError::Contract { .. } | LlmError::EmptyContent => false,
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'static str,
    max_tokens: u32,
    system: &'a str,
    messages: [UserMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct UserMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

impl MessagesResponse {
    fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.kind == "text" && !b.text.trim().is_empty())
            .map(|b| b.text.as_str())
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Anthropic Messages API wrapper with bounded retries. Cloned freely;
/// the inner reqwest client is reference-counted.
#[derive(Clone)]
pub struct LlmClient {
    http: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Self {
        Self {
            http: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("failed to build HTTP client"),
            api_key,
        }
    }

    /// Structured call: the reply must deserialize as `T`. `contract`
    /// names the expected shape in the error when it does not.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        prompt: &str,
        system: &str,
        budget: TokenBudget,
        contract: &'static str,
    ) -> Result<T, LlmError> {
        let text = self.call(prompt, system, budget).await?;
        let json = strip_fences(&text);
        serde_json::from_str(json).map_err(|source| LlmError::Contract { contract, source })
    }

    /// Plain-text call (cover letters).
    pub async fn call_text(
        &self,
        prompt: &str,
        system: &str,
        budget: TokenBudget,
    ) -> Result<String, LlmError> {
        self.call(prompt, system, budget).await
    }

    /// One logical call: up to `MAX_ATTEMPTS` tries with exponential
    /// backoff, retrying only transient failures.
    async fn call(
        &self,
        prompt: &str,
        system: &str,
        budget: TokenBudget,
    ) -> Result<String, LlmError> {
        let body = MessagesRequest {
            model: MODEL,
            max_tokens: budget.max_tokens(),
            system,
            messages: [UserMessage {
                role: "user",
                content: prompt,
            }],
        };

        let mut outcome = self.attempt(&body).await;
        for attempt in 2..=MAX_ATTEMPTS {
            match &outcome {
                Err(e) if retryable(e) => {
                    // 1s, 2s
                    let delay = Duration::from_secs(1 << (attempt - 2));
                    warn!("model call failed ({e}), retrying in {delay:?}");
                    tokio::time::sleep(delay).await;
                    outcome = self.attempt(&body).await;
                }
                _ => break,
            }
        }
        outcome
    }

    async fn attempt(&self, body: &MessagesRequest<'_>) -> Result<String, LlmError> {
        let response = self
            .http
            .post(API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorEnvelope>(&raw)
                .map(|e| e.error.message)
                .unwrap_or(raw);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: MessagesResponse = response.json().await?;
        debug!("model call succeeded (max_tokens={})", body.max_tokens);
        parsed
            .text()
            .map(|t| t.trim().to_string())
            .ok_or(LlmError::EmptyContent)
    }
}

/// Removes a surrounding markdown code fence (with or without a language
/// tag) from model output.
fn strip_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest).trim_start();
    rest.strip_suffix("```").map(str::trim_end).unwrap_or(rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_fences_tag_on_same_line() {
        assert_eq!(strip_fences("```json{\"a\":1}```"), "{\"a\":1}");
    }

    #[test]
    fn test_retryable_classification() {
        let api = |status| LlmError::Api {
            status,
            message: String::new(),
        };
        assert!(retryable(&api(429)));
        assert!(retryable(&api(500)));
        assert!(retryable(&api(503)));
        assert!(!retryable(&api(400)));
        assert!(!retryable(&api(401)));
        assert!(!retryable(&LlmError::EmptyContent));
    }

    #[test]
    fn test_contract_error_names_the_shape() {
        let err = serde_json::from_str::<u32>("not a number")
            .map_err(|source| LlmError::Contract {
                contract: "job analysis",
                source,
            })
            .unwrap_err();
        assert!(err.to_string().contains("job analysis"));
    }

    #[test]
    fn test_budgets_scale_with_output_shape() {
        assert!(TokenBudget::FullResume.max_tokens() > TokenBudget::Analysis.max_tokens());
        assert!(TokenBudget::Analysis.max_tokens() > TokenBudget::Letter.max_tokens());
    }
}
