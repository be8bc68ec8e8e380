// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Mull App Developers

//! Completion client abstraction
//!
//! Defines the trait the controller sends conversations through, the wire
//! message type, and the credential-store collaborator.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;
use crate::session::{ChatMessage, Role};

/// A role/content pair as sent to the completion endpoint
///
/// Stored [`ChatMessage`]s carry timestamps; the wire format does not.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CompletionMessage {
    /// Message role
    pub role: Role,

    /// Message text
    pub content: String,
}

impl CompletionMessage {
    /// Create a wire message
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

impl From<&ChatMessage> for CompletionMessage {
    fn from(message: &ChatMessage) -> Self {
        Self {
            role: message.role,
            content: message.content.clone(),
        }
    }
}

/// Read access to stored credentials
///
/// Queried once per completion call; the engine never caches the key.
pub trait CredentialStore: Send + Sync {
    /// Fetch a stored credential by key
    fn get(&self, key: &str) -> Option<String>;
}

/// A single-shot chat-completion backend
///
/// One call, one reply, no retry; failures are classified by the
/// implementation into [`crate::error::ApiError`] variants.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send an ordered message list and return the assistant's reply text
    ///
    /// When `system_prompt` is given it is prepended as a system-role entry
    /// ahead of `messages`.
    async fn send_message(
        &self,
        messages: &[CompletionMessage],
        system_prompt: Option<&str>,
    ) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_message_from_chat_message() {
        let stored = ChatMessage::user("Hello");
        let wire = CompletionMessage::from(&stored);

        assert_eq!(wire.role, Role::User);
        assert_eq!(wire.content, "Hello");
    }

    #[test]
    fn test_completion_message_serializes_lowercase_role() {
        let wire = CompletionMessage::new(Role::System, "instructions");
        let json = serde_json::to_value(&wire).unwrap();

        assert_eq!(json["role"], "system");
        assert_eq!(json["content"], "instructions");
    }
}
