// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Mull App Developers

//! Journal collaborator interfaces
//!
//! The chat engine does not own journal storage. Entries, emotions, and tags
//! live in the host application's stores; this module defines the record
//! shape and the traits the engine talks through. The engine only ever reads
//! entries and rewrites their `chatSessions` field.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{MullError, Result};
use crate::session::ChatSession;

/// A journal entry as seen by the chat engine
///
/// The host application stores more than this; unknown fields are simply not
/// modeled here because the engine never touches them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Entry id
    pub id: String,

    /// Entry title, absent for untitled entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Raw body text
    #[serde(default)]
    pub content: String,

    /// Ids of emotions logged on this entry
    #[serde(default)]
    pub emotion_ids: Vec<String>,

    /// Ids of people tags on this entry
    #[serde(default)]
    pub people_tag_ids: Vec<String>,

    /// Ids of context tags on this entry
    #[serde(default)]
    pub context_tag_ids: Vec<String>,

    /// Persisted chat sessions, absent until the first save
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_sessions: Option<Vec<ChatSession>>,
}

impl Entry {
    /// The persisted session list, treating an absent field as empty
    pub fn sessions(&self) -> &[ChatSession] {
        self.chat_sessions.as_deref().unwrap_or_default()
    }
}

/// Persistence gateway for journal entries
///
/// Implemented by the host application's entry store. `update` rewrites the
/// whole entry record and returns the stored result.
#[async_trait]
pub trait EntryGateway: Send + Sync {
    /// Fetch an entry by id; `None` when no such entry exists
    async fn get_by_id(&self, id: &str) -> Result<Option<Entry>>;

    /// Persist an updated entry
    async fn update(&self, entry: Entry) -> Result<Entry>;
}

/// Synchronous id-to-name lookup for emotions and tags
///
/// Used only to render the human-readable context block. Ids that no longer
/// resolve are omissions, not errors.
pub trait NameResolver: Send + Sync {
    /// Resolve an id to its display name, if the record still exists
    fn name_of(&self, id: &str) -> Option<String>;
}

impl<F> NameResolver for F
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn name_of(&self, id: &str) -> Option<String> {
        self(id)
    }
}

/// In-memory entry gateway
///
/// A recording implementation of [`EntryGateway`] used by the test suite in
/// place of the host application's store. Writes can be primed to fail so
/// persistence-error paths are reachable.
pub struct MemoryEntryGateway {
    entries: Mutex<HashMap<String, Entry>>,
    update_count: AtomicUsize,
    fail_next_update: Mutex<Option<String>>,
}

impl Default for MemoryEntryGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryEntryGateway {
    /// Create an empty gateway
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            update_count: AtomicUsize::new(0),
            fail_next_update: Mutex::new(None),
        }
    }

    /// Create a gateway seeded with one entry
    pub fn with_entry(entry: Entry) -> Self {
        let gateway = Self::new();
        gateway.insert(entry);
        gateway
    }

    /// Insert or replace an entry
    pub fn insert(&self, entry: Entry) {
        self.entries.lock().unwrap().insert(entry.id.clone(), entry);
    }

    /// Remove an entry, as if deleted elsewhere in the app
    pub fn remove(&self, id: &str) {
        self.entries.lock().unwrap().remove(id);
    }

    /// Fetch the stored copy of an entry
    pub fn stored(&self, id: &str) -> Option<Entry> {
        self.entries.lock().unwrap().get(id).cloned()
    }

    /// Number of successful writes so far
    pub fn update_count(&self) -> usize {
        self.update_count.load(Ordering::SeqCst)
    }

    /// Make the next `update` call fail with this message
    pub fn fail_next_update(&self, message: impl Into<String>) {
        *self.fail_next_update.lock().unwrap() = Some(message.into());
    }
}

#[async_trait]
impl EntryGateway for MemoryEntryGateway {
    async fn get_by_id(&self, id: &str) -> Result<Option<Entry>> {
        Ok(self.entries.lock().unwrap().get(id).cloned())
    }

    async fn update(&self, entry: Entry) -> Result<Entry> {
        if let Some(message) = self.fail_next_update.lock().unwrap().take() {
            return Err(MullError::Persistence(message));
        }

        self.update_count.fetch_add(1, Ordering::SeqCst);
        self.insert(entry.clone());
        Ok(entry)
    }
}
