// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Mull App Developers

//! Mull - the chat engine behind the Mull journaling app.
//!
//! This crate implements the one genuinely stateful part of the app: an
//! ephemeral AI conversation anchored to a journal entry. Entries, tags, and
//! emotions are owned by the host application and reached through the traits
//! in [`journal`]; the engine decides when entry context is injected, when
//! messages become durable, and how persistence failures are survived
//! without corrupting the conversation.
//!
//! Architecture highlights:
//! - `chat`: the current-session state machine (start/send/save/discard)
//! - `session`: session and message values plus their factory invariants
//! - `prompts`: per-intention system prompts and the entry context block
//! - `llm`: completion client abstraction, HTTP and mock implementations
//! - `journal`: collaborator traits for the host application's stores
//! - `config`: settings file and API-key resolution

pub mod chat;
pub mod config;
pub mod error;
pub mod journal;
pub mod llm;
pub mod prompts;
pub mod session;

pub use error::{MullError, Result};
