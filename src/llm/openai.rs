// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Mull App Developers

//! OpenAI-compatible completion client
//!
//! Single-shot, non-streaming calls against a `/chat/completions` endpoint.
//! Request parameters are fixed per client; the journaling UI never tunes
//! them per message.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, MullError, Result};
use crate::llm::client::{CompletionClient, CompletionMessage, CredentialStore};
use crate::session::Role;

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Credential-store key the client asks for
pub const API_KEY_CREDENTIAL: &str = "openai_api_key";

const MODEL: &str = "gpt-4o-mini";
const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 1024;

/// Completion client for OpenAI-compatible endpoints
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    credentials: Arc<dyn CredentialStore>,
}

impl OpenAiClient {
    /// Create a client against the default OpenAI endpoint
    pub fn new(credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            client: Client::new(),
            base_url: OPENAI_API_URL.to_string(),
            credentials,
        }
    }

    /// Create a client with a custom base URL
    pub fn with_base_url(credentials: Arc<dyn CredentialStore>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            credentials,
        }
    }

    /// Classify a non-success response
    fn parse_error(&self, status: u16, body: &str) -> ApiError {
        match status {
            401 => ApiError::AuthenticationFailed,
            429 => ApiError::RateLimited,
            _ => {
                if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
                    ApiError::Remote {
                        status,
                        message: envelope.error.message,
                    }
                } else {
                    ApiError::Status(status)
                }
            }
        }
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn send_message(
        &self,
        messages: &[CompletionMessage],
        system_prompt: Option<&str>,
    ) -> Result<String> {
        // Credential lookup happens before any request is built
        let api_key = self
            .credentials
            .get(API_KEY_CREDENTIAL)
            .ok_or(ApiError::MissingApiKey)?;

        let mut wire = Vec::with_capacity(messages.len() + 1);
        if let Some(system) = system_prompt {
            wire.push(CompletionMessage::new(Role::System, system));
        }
        wire.extend_from_slice(messages);

        let body = ChatCompletionRequest {
            model: MODEL,
            messages: &wire,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        tracing::debug!(
            target: "mull.llm",
            message_count = wire.len(),
            has_system = system_prompt.is_some(),
            "sending completion request"
        );

        let response = self
            .client
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status().as_u16();

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = self.parse_error(status, &body);
            tracing::warn!(target: "mull.llm", status, %err, "completion request failed");
            return Err(err.into());
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;

        let reply = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| {
                MullError::Api(ApiError::InvalidResponse(
                    "no choices in response".to_string(),
                ))
            })?
            .message
            .content
            .unwrap_or_default();

        if reply.is_empty() {
            return Err(ApiError::InvalidResponse("empty reply text".to_string()).into());
        }

        Ok(reply)
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [CompletionMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoKeys;

    impl CredentialStore for NoKeys {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_request() {
        // base_url points nowhere routable; the call must fail on the
        // credential lookup before a connection is ever attempted
        let client = OpenAiClient::with_base_url(Arc::new(NoKeys), "http://127.0.0.1:1");
        let result = client.send_message(&[], None).await;

        match result {
            Err(MullError::Api(ApiError::MissingApiKey)) => {}
            other => panic!("expected MissingApiKey, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_error_classifies_auth_and_rate_limit() {
        let client = OpenAiClient::with_base_url(Arc::new(NoKeys), "http://unused");

        assert!(matches!(
            client.parse_error(401, ""),
            ApiError::AuthenticationFailed
        ));
        assert!(matches!(client.parse_error(429, ""), ApiError::RateLimited));
    }

    #[test]
    fn test_parse_error_extracts_structured_message() {
        let client = OpenAiClient::with_base_url(Arc::new(NoKeys), "http://unused");
        let body = r#"{"error":{"message":"model overloaded","type":"server_error"}}"#;

        match client.parse_error(500, body) {
            ApiError::Remote { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "model overloaded");
            }
            other => panic!("expected Remote, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_error_falls_back_to_status() {
        let client = OpenAiClient::with_base_url(Arc::new(NoKeys), "http://unused");

        assert!(matches!(
            client.parse_error(503, "<html>bad gateway</html>"),
            ApiError::Status(503)
        ));
    }
}
