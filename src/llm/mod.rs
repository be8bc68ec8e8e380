// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Mull App Developers

//! Completion service layer
//!
//! Abstraction over the chat-completion endpoint, plus the HTTP and mock
//! implementations.

pub mod client;
pub mod mock_client;
pub mod openai;

pub use client::{CompletionClient, CompletionMessage, CredentialStore};
pub use mock_client::{MockCompletionClient, MockOutcome};
pub use openai::{OpenAiClient, API_KEY_CREDENTIAL};
