//! Conversational fallback over a chat-completion HTTP API.
//!
//! The dispatcher forwards any utterance no other rule claims to this
//! client, together with the bounded conversation history. Failures never
//! propagate to the caller: a timeout, a transport error, or a malformed
//! response body each degrade to a fixed substitute string that is spoken
//! in place of a real reply.

use crate::config::LlmConfig;
use crate::error::{AssistantError, Result};
use crate::history::ConversationHistory;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{info, warn};

/// Substitute reply when the response body is missing the reply text.
pub const INVALID_RESPONSE_REPLY: &str = "API response structure was invalid or empty.";

/// Substitute reply when the request times out.
pub const TIMEOUT_REPLY: &str = "The AI model took too long to respond.";

/// Substitute reply for any other transport or server failure.
pub const CONNECT_FAILURE_REPLY: &str = "Sorry, I couldn't connect to the AI model right now.";

/// Seam for the conversational fallback, so the dispatcher can be exercised
/// without a live endpoint.
#[async_trait]
pub trait ConversationModel: Send {
    /// Produce a reply to `prompt`, recording the user turn (and, when the
    /// endpoint answered, the assistant turn) in `history`.
    ///
    /// Never fails; degraded replies come back as plain text.
    async fn reply(&self, history: &mut ConversationHistory, prompt: &str) -> String;
}

/// How a round-trip to the endpoint ended.
enum ReplyOutcome {
    /// The endpoint answered; the text belongs in the history.
    Answered(String),
    /// The endpoint was never reached (timeout or transport failure).
    Unreachable(&'static str),
}

/// HTTP client for the remote chat-completion endpoint.
pub struct ChatClient {
    config: LlmConfig,
    http: reqwest::Client,
}

impl ChatClient {
    /// Create a client with the configured request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AssistantError::Llm(format!("cannot build HTTP client: {e}")))?;

        info!(
            "chat client configured: {} model={}",
            config.api_url, config.api_model
        );

        Ok(Self {
            config: config.clone(),
            http,
        })
    }

    async fn request_reply(&self, history: &ConversationHistory) -> ReplyOutcome {
        let body = serde_json::json!({
            "model": self.config.api_model,
            "messages": history.turns(),
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
        });

        let mut request = self.http.post(&self.config.api_url).json(&body);
        if !self.config.api_key.is_empty() {
            request = request.bearer_auth(&self.config.api_key);
        }

        let response = match request.send().await {
            Ok(r) => r,
            Err(e) if e.is_timeout() => {
                warn!("chat request timed out: {e}");
                return ReplyOutcome::Unreachable(TIMEOUT_REPLY);
            }
            Err(e) => {
                warn!("chat request failed: {e}");
                return ReplyOutcome::Unreachable(CONNECT_FAILURE_REPLY);
            }
        };

        let response = match response.error_for_status() {
            Ok(r) => r,
            Err(e) => {
                warn!("chat endpoint returned error status: {e}");
                return ReplyOutcome::Unreachable(CONNECT_FAILURE_REPLY);
            }
        };

        let data: serde_json::Value = match response.json().await {
            Ok(v) => v,
            Err(e) if e.is_timeout() => {
                warn!("chat response body timed out: {e}");
                return ReplyOutcome::Unreachable(TIMEOUT_REPLY);
            }
            Err(e) => {
                warn!("chat response body unreadable: {e}");
                return ReplyOutcome::Unreachable(CONNECT_FAILURE_REPLY);
            }
        };

        match extract_reply(&data) {
            Some(text) => ReplyOutcome::Answered(text),
            None => {
                warn!("chat response missing reply text");
                ReplyOutcome::Answered(INVALID_RESPONSE_REPLY.to_owned())
            }
        }
    }
}

#[async_trait]
impl ConversationModel for ChatClient {
    async fn reply(&self, history: &mut ConversationHistory, prompt: &str) -> String {
        history.push_user(prompt);

        match self.request_reply(history).await {
            ReplyOutcome::Answered(text) => {
                history.push_assistant(text.clone());
                text
            }
            ReplyOutcome::Unreachable(substitute) => substitute.to_owned(),
        }
    }
}

/// Pull the reply text out of `choices[0].message.content`, trimmed.
/// Returns `None` when the structure is incomplete or the text is empty.
fn extract_reply(data: &serde_json::Value) -> Option<String> {
    let content = data["choices"][0]["message"]["content"].as_str()?;
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}
