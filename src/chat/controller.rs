// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Mull App Developers

//! Chat session controller
//!
//! Owns the single "current session" state machine. The controller is either
//! Idle (no current session) or Active (one transient, unsaved session); the
//! sending and saving flags mark in-flight async work and always collapse
//! back when it completes. Messages become durable only through `save`;
//! `discard` drops the session without trace.

use std::sync::Arc;

use crate::error::{MullError, Result};
use crate::journal::{Entry, EntryGateway};
use crate::llm::client::{CompletionClient, CompletionMessage};
use crate::prompts::{self, PromptResolver};
use crate::session::{ChatIntention, ChatMessage, ChatSession, Role};

/// Error-slot text when `load_session` misses
const SESSION_NOT_FOUND: &str = "Chat session not found";

/// Drives one journal-anchored conversation at a time
///
/// All collaborators are injected; the controller holds no global state and
/// a single instance assumes a single cooperative caller.
pub struct ChatController {
    gateway: Arc<dyn EntryGateway>,
    client: Arc<dyn CompletionClient>,
    prompts: PromptResolver,
    session: Option<ChatSession>,
    sending: bool,
    saving: bool,
    last_error: Option<String>,
}

impl ChatController {
    /// Create a controller over the given collaborators, starting Idle
    pub fn new(
        gateway: Arc<dyn EntryGateway>,
        client: Arc<dyn CompletionClient>,
        prompts: PromptResolver,
    ) -> Self {
        Self {
            gateway,
            client,
            prompts,
            session: None,
            sending: false,
            saving: false,
            last_error: None,
        }
    }

    /// The current transient session, if any
    pub fn current_session(&self) -> Option<&ChatSession> {
        self.session.as_ref()
    }

    /// Whether a current session exists
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Whether a completion call is in flight
    pub fn is_sending(&self) -> bool {
        self.sending
    }

    /// Whether a save is in flight
    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// The most recent failure message, if the last operation failed
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Start a new session for an entry, replacing any unsaved current one
    ///
    /// The intention arrives as its raw string form and is validated
    /// exactly. On a validation failure the prior current session is left
    /// untouched; on success it is unconditionally replaced, prior unsaved
    /// messages included.
    pub fn start(
        &mut self,
        entry_id: &str,
        intention: &str,
        custom_prompt: Option<&str>,
    ) -> Result<&ChatSession> {
        self.last_error = None;

        let intention: ChatIntention = match intention.parse() {
            Ok(i) => i,
            Err(err) => return Err(self.fail(err)),
        };

        let session = ChatSession::new(entry_id, intention, custom_prompt);
        tracing::info!(
            target: "mull.chat",
            session_id = %session.id,
            entry_id,
            intention = %session.intention,
            replaced = self.session.is_some(),
            "started chat session"
        );

        Ok(&*self.session.insert(session))
    }

    /// Send a user message and append the resulting exchange
    ///
    /// On the first exchange of a session the entry context block is
    /// prepended to the outgoing request; it is rebuilt from the freshly
    /// fetched entry whenever the stored list is empty and is never stored
    /// in the session itself. A failed call appends nothing: the stored list
    /// never contains an unanswered user message.
    pub async fn send(&mut self, user_text: &str) -> Result<String> {
        self.last_error = None;

        let (entry_id, intention, custom_prompt, stored, first_exchange) =
            match self.session.as_ref() {
                Some(session) if session.journal_entry_id.is_empty() => {
                    return Err(self.fail(MullError::Validation(
                        "no journal entry is bound to the current session".to_string(),
                    )));
                }
                Some(session) => (
                    session.journal_entry_id.clone(),
                    session.intention,
                    session.custom_prompt.clone(),
                    session
                        .messages
                        .iter()
                        .map(CompletionMessage::from)
                        .collect::<Vec<_>>(),
                    session.messages.is_empty(),
                ),
                None => {
                    return Err(self.fail(MullError::Validation(
                        "no active chat session".to_string(),
                    )));
                }
            };

        let entry = match self.fetch_entry(&entry_id).await {
            Ok(entry) => entry,
            Err(err) => return Err(self.fail(err)),
        };

        self.sending = true;

        let mut outgoing = Vec::with_capacity(stored.len() + 2);
        if first_exchange {
            outgoing.push(CompletionMessage::new(
                Role::User,
                self.prompts.entry_context(&entry),
            ));
        }
        outgoing.extend(stored);
        outgoing.push(CompletionMessage::new(Role::User, user_text));

        let system = prompts::system_prompt(intention, custom_prompt.as_deref());

        tracing::debug!(
            target: "mull.chat",
            entry_id,
            outgoing = outgoing.len(),
            first_exchange,
            "dispatching exchange"
        );

        let result = self.client.send_message(&outgoing, Some(&system)).await;
        self.sending = false;

        match result {
            Ok(reply) => {
                if let Some(session) = self.session.as_mut() {
                    session.messages.push(ChatMessage::user(user_text));
                    session.messages.push(ChatMessage::assistant(reply.clone()));
                }
                Ok(reply)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Merge the current session into its entry's persisted list
    ///
    /// Requires at least one complete exchange. The controller transitions
    /// to Idle only after the write succeeds; any failure leaves the session
    /// intact so nothing typed is lost.
    pub async fn save(&mut self) -> Result<()> {
        self.last_error = None;

        let snapshot = match self.session.as_ref() {
            Some(session) if session.has_complete_exchange() => session.detached(),
            Some(_) => {
                return Err(self.fail(MullError::Validation(
                    "insufficient exchange: at least one user and one assistant message are required"
                        .to_string(),
                )));
            }
            None => {
                return Err(self.fail(MullError::Validation(
                    "no active chat session to save".to_string(),
                )));
            }
        };

        self.saving = true;
        let result = self.persist(snapshot).await;
        self.saving = false;

        match result {
            Ok(()) => {
                tracing::info!(target: "mull.chat", "chat session saved");
                self.session = None;
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Drop the current session without persisting anything
    ///
    /// Always succeeds, from any state, and clears the error slot.
    pub fn discard(&mut self) {
        if self.session.is_some() {
            tracing::info!(target: "mull.chat", "discarded chat session");
        }
        self.session = None;
        self.last_error = None;
    }

    /// Read an entry's persisted session list
    ///
    /// Read-only: the current session and Idle/Active state are untouched.
    /// An absent list reads as empty.
    pub async fn sessions_for_entry(&mut self, entry_id: &str) -> Result<Vec<ChatSession>> {
        self.last_error = None;

        match self.fetch_entry(entry_id).await {
            Ok(entry) => Ok(entry.sessions().to_vec()),
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Install a persisted session as the current one, by id
    ///
    /// The installed session is a detached copy; editing it never writes
    /// through to the entry's stored record. A missing session id records
    /// the fixed not-found message and returns `Ok(None)` — an existing
    /// current session is preserved in that case.
    pub async fn load_session(
        &mut self,
        entry_id: &str,
        session_id: &str,
    ) -> Result<Option<ChatSession>> {
        self.last_error = None;

        let entry = match self.fetch_entry(entry_id).await {
            Ok(entry) => entry,
            Err(err) => return Err(self.fail(err)),
        };

        match entry.sessions().iter().find(|s| s.id == session_id) {
            Some(found) => {
                let copy = found.detached();
                self.session = Some(copy.detached());
                tracing::debug!(
                    target: "mull.chat",
                    session_id,
                    entry_id,
                    "loaded persisted session"
                );
                Ok(Some(copy))
            }
            None => {
                self.last_error = Some(SESSION_NOT_FOUND.to_string());
                Ok(None)
            }
        }
    }

    /// Remove a session from an entry's persisted list
    ///
    /// Removing an id that is not present is a no-op and performs no write.
    pub async fn delete_session(&mut self, entry_id: &str, session_id: &str) -> Result<()> {
        self.last_error = None;

        let mut entry = match self.fetch_entry(entry_id).await {
            Ok(entry) => entry,
            Err(err) => return Err(self.fail(err)),
        };

        let sessions = entry.sessions();
        if !sessions.iter().any(|s| s.id == session_id) {
            return Ok(());
        }

        let remaining: Vec<ChatSession> = sessions
            .iter()
            .filter(|s| s.id != session_id)
            .map(|s| s.detached())
            .collect();
        entry.chat_sessions = Some(remaining);

        match self.gateway.update(entry).await {
            Ok(_) => {
                tracing::info!(target: "mull.chat", session_id, entry_id, "deleted persisted session");
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    // -- Private helpers --

    /// Fetch an entry, mapping absence to NotFound
    async fn fetch_entry(&self, entry_id: &str) -> Result<Entry> {
        self.gateway
            .get_by_id(entry_id)
            .await?
            .ok_or_else(|| MullError::NotFound(format!("journal entry {entry_id} not found")))
    }

    /// Append a detached session snapshot to its entry's persisted list
    async fn persist(&self, snapshot: ChatSession) -> Result<()> {
        let mut entry = self.fetch_entry(&snapshot.journal_entry_id).await?;

        let mut sessions: Vec<ChatSession> =
            entry.sessions().iter().map(|s| s.detached()).collect();
        sessions.push(snapshot);
        entry.chat_sessions = Some(sessions);

        self.gateway.update(entry).await?;
        Ok(())
    }

    /// Record a failure in the shared error slot and hand it back
    fn fail(&mut self, err: MullError) -> MullError {
        tracing::warn!(target: "mull.chat", %err, "chat operation failed");
        self.last_error = Some(err.to_string());
        err
    }
}
