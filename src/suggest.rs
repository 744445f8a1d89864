//! Best-effort suggestion enrichment through a chat-completion service
//!
//! Enrichment never fails the run. Without a credential it is skipped
//! entirely; any service failure keeps the original text and logs a warning.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::SuggestionConfig;
use crate::error::{Result, TodoError};

/// Role framing sent with every completion request
const SUGGESTION_SYSTEM: &str = "You are a personal task assistant. The user \
will give you a TODO item. Reply with one short, actionable suggestion that \
helps them get it done. Be concrete and direct. Do not repeat the TODO text \
back.";

/// Delimiter introducing the generated suggestion in the message body
const SUGGESTION_HEADER: &str = "--- Suggestion ---";

/// Chat-completion client for the suggestion service
pub struct SuggestionClient {
    client: Client,
    api_key: String,
    config: SuggestionConfig,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

impl SuggestionClient {
    pub fn new(api_key: String, config: SuggestionConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            api_key,
            config,
        })
    }

    /// Request one non-streaming suggestion for the item text
    pub async fn complete(&self, text: &str) -> Result<String> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SUGGESTION_SYSTEM.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: text.to_string(),
                },
            ],
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.api_base))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TodoError::from_response(status.as_u16(), body));
        }

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|e| TodoError::Suggestion(format!("malformed completion response: {}", e)))?;

        completion
            .choices
            .first()
            .map(|choice| choice.message.content.trim().to_string())
            .ok_or_else(|| TodoError::Suggestion("completion returned no choices".to_string()))
    }
}

/// Enrich the item text with a generated suggestion. Without a configured
/// client the text passes through unchanged.
pub async fn enrich(client: Option<&SuggestionClient>, text: String) -> String {
    let client = match client {
        Some(client) => client,
        None => {
            debug!("no completion credential configured, skipping suggestion");
            return text;
        }
    };

    match client.complete(&text).await {
        Ok(suggestion) if suggestion.is_empty() => {
            warn!("completion service returned an empty suggestion, sending without it");
            text
        }
        Ok(suggestion) => {
            debug!("appending {} byte suggestion", suggestion.len());
            append_suggestion(&text, &suggestion)
        }
        Err(error) => {
            warn!("suggestion request failed, sending without it: {}", error);
            text
        }
    }
}

/// Append a suggestion block under the delimited header
fn append_suggestion(text: &str, suggestion: &str) -> String {
    format!("{}\n\n{}\n{}", text, SUGGESTION_HEADER, suggestion)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_suggestion_delimits_block() {
        let body = append_suggestion("call mom\nthis evening", "Set a phone reminder for 7pm.");
        assert_eq!(
            body,
            "call mom\nthis evening\n\n--- Suggestion ---\nSet a phone reminder for 7pm."
        );
    }

    #[tokio::test]
    async fn test_enrich_without_client_is_identity() {
        let text = "todo: need to buy milk".to_string();
        let enriched = enrich(None, text.clone()).await;
        assert_eq!(enriched, text);
    }

    #[tokio::test]
    async fn test_enrich_without_client_preserves_every_byte() {
        let text = "weird  spacing\tand unicode: 変更\n\ntrailing".to_string();
        let enriched = enrich(None, text.clone()).await;
        assert_eq!(enriched.as_bytes(), text.as_bytes());
    }
}
