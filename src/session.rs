// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Mull App Developers

//! Chat session values
//!
//! Defines the session and message structures exchanged with the completion
//! service and persisted into journal entries, plus their factory
//! constructors. Construction is the only place invariants are enforced;
//! the records themselves are plain data.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::MullError;

/// The conversational mode a chat session was started with
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ChatIntention {
    /// Reflect on the entry together
    Reflect,
    /// Reframe the entry from another angle
    HelpSeeDifferently,
    /// Suggest concrete next steps
    Proactive,
    /// Spot cognitive distortions in the entry
    ThinkingTraps,
    /// User supplies their own instruction
    Custom,
}

impl ChatIntention {
    /// All intentions, in display order
    pub const ALL: [ChatIntention; 5] = [
        ChatIntention::Reflect,
        ChatIntention::HelpSeeDifferently,
        ChatIntention::Proactive,
        ChatIntention::ThinkingTraps,
        ChatIntention::Custom,
    ];

    /// The wire/storage name of this intention
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatIntention::Reflect => "reflect",
            ChatIntention::HelpSeeDifferently => "help-see-differently",
            ChatIntention::Proactive => "proactive",
            ChatIntention::ThinkingTraps => "thinking-traps",
            ChatIntention::Custom => "custom",
        }
    }
}

impl fmt::Display for ChatIntention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChatIntention {
    type Err = MullError;

    // Exact match only: no trimming, no case folding.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ChatIntention::ALL
            .into_iter()
            .find(|i| i.as_str() == s)
            .ok_or_else(|| MullError::Validation(format!("invalid chat intention: {s:?}")))
    }
}

/// Check whether a raw string names a known intention
pub fn is_valid_intention(value: &str) -> bool {
    ChatIntention::from_str(value).is_ok()
}

/// Role of a message sender
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instruction (wire-only, never stored in a session)
    System,
    /// User message
    User,
    /// Assistant response
    Assistant,
}

/// A single message within a chat session
///
/// Immutable once created; sessions keep messages in insertion order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    /// Who sent the message
    pub role: Role,

    /// Message text
    pub content: String,

    /// When the message was created
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a new user message stamped with the current time
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a new assistant message stamped with the current time
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// A chat conversation anchored to one journal entry
///
/// Lives transient in the controller until saved, at which point a detached
/// copy is appended to the owning entry's persisted session list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    /// Unique session id, generated at creation, never reused
    pub id: String,

    /// Id of the journal entry this conversation is about
    pub journal_entry_id: String,

    /// The conversational mode selected at start
    pub intention: ChatIntention,

    /// User-supplied instruction; present only for non-empty custom sessions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_prompt: Option<String>,

    /// When the session was started
    pub created_at: DateTime<Utc>,

    /// Completed exchanges, in order
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

impl ChatSession {
    /// Create a fresh session for an entry
    ///
    /// `custom_prompt` is attached only when the intention is `Custom` and
    /// the supplied value is non-empty; any prompt passed alongside another
    /// intention is dropped.
    pub fn new(
        journal_entry_id: impl Into<String>,
        intention: ChatIntention,
        custom_prompt: Option<&str>,
    ) -> Self {
        let custom_prompt = match intention {
            ChatIntention::Custom => custom_prompt
                .filter(|p| !p.is_empty())
                .map(|p| p.to_string()),
            _ => None,
        };

        Self {
            id: Uuid::new_v4().to_string(),
            journal_entry_id: journal_entry_id.into(),
            intention,
            custom_prompt,
            created_at: Utc::now(),
            messages: Vec::new(),
        }
    }

    /// Rebuild this session as a structurally independent snapshot
    ///
    /// Persisted data must never alias live controller state, so the copy is
    /// reconstructed field by field rather than handed out by reference.
    pub fn detached(&self) -> Self {
        Self {
            id: self.id.clone(),
            journal_entry_id: self.journal_entry_id.clone(),
            intention: self.intention,
            custom_prompt: self.custom_prompt.clone(),
            created_at: self.created_at,
            messages: self
                .messages
                .iter()
                .map(|m| ChatMessage {
                    role: m.role,
                    content: m.content.clone(),
                    timestamp: m.timestamp,
                })
                .collect(),
        }
    }

    /// Whether the session holds at least one full user/assistant exchange
    pub fn has_complete_exchange(&self) -> bool {
        self.messages.len() >= 2
            && self.messages.iter().any(|m| m.role == Role::User)
            && self.messages.iter().any(|m| m.role == Role::Assistant)
    }
}
