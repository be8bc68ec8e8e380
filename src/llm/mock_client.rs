// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Mull App Developers

//! Mock completion client for testing
//!
//! A configurable implementation of the CompletionClient trait that answers
//! from queued outcomes and records every request, so tests can drive the
//! controller without a network.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{ApiError, MullError, Result};
use crate::llm::client::{CompletionClient, CompletionMessage};

/// What the mock should do on one call
#[derive(Clone, Debug)]
pub enum MockOutcome {
    /// Return this reply text
    Reply(String),
    /// Fail with a remote API error carrying this message
    Fail(String),
}

/// A request as the mock received it
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    /// The ordered message list passed to the call
    pub messages: Vec<CompletionMessage>,
    /// The system prompt passed to the call
    pub system_prompt: Option<String>,
}

/// A mock completion client for tests
#[derive(Clone)]
pub struct MockCompletionClient {
    outcomes: Arc<Mutex<Vec<MockOutcome>>>,
    call_count: Arc<AtomicUsize>,
    recorded_requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl Default for MockCompletionClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCompletionClient {
    /// Create a mock that replies "Mock reply" to everything
    pub fn new() -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(vec![MockOutcome::Reply("Mock reply".to_string())])),
            call_count: Arc::new(AtomicUsize::new(0)),
            recorded_requests: Arc::new(Mutex::new(vec![])),
        }
    }

    /// Replace the queue with a single reply
    pub fn with_reply(self, text: impl Into<String>) -> Self {
        self.set_outcomes(vec![MockOutcome::Reply(text.into())]);
        self
    }

    /// Queue multiple replies, returned in order (last repeats)
    pub fn with_replies(self, texts: Vec<String>) -> Self {
        self.set_outcomes(texts.into_iter().map(MockOutcome::Reply).collect());
        self
    }

    /// Replace the queue with a single failure
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.set_outcomes(vec![MockOutcome::Fail(message.into())]);
        self
    }

    /// Queue explicit outcomes, returned in order (last repeats)
    pub fn with_outcomes(self, outcomes: Vec<MockOutcome>) -> Self {
        self.set_outcomes(outcomes);
        self
    }

    fn set_outcomes(&self, outcomes: Vec<MockOutcome>) {
        let mut queue = self.outcomes.lock().unwrap();
        *queue = outcomes;
    }

    /// Number of times send_message was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// All recorded requests, oldest first
    pub fn recorded_requests(&self) -> Vec<RecordedRequest> {
        self.recorded_requests.lock().unwrap().clone()
    }

    /// The most recent request, if any call was made
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.recorded_requests.lock().unwrap().last().cloned()
    }

    /// The error a queued failure will surface as
    ///
    /// Lets tests compare the controller's recorded error text against the
    /// exact rejection without restating the formatting.
    pub fn failure_error(message: impl Into<String>) -> MullError {
        MullError::Api(ApiError::Remote {
            status: 500,
            message: message.into(),
        })
    }

    fn next_outcome(&self) -> MockOutcome {
        let count = self.call_count.fetch_add(1, Ordering::SeqCst);
        let outcomes = self.outcomes.lock().unwrap();
        if outcomes.is_empty() {
            MockOutcome::Reply("Mock reply".to_string())
        } else {
            outcomes[count.min(outcomes.len() - 1)].clone()
        }
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    async fn send_message(
        &self,
        messages: &[CompletionMessage],
        system_prompt: Option<&str>,
    ) -> Result<String> {
        self.recorded_requests.lock().unwrap().push(RecordedRequest {
            messages: messages.to_vec(),
            system_prompt: system_prompt.map(|s| s.to_string()),
        });

        match self.next_outcome() {
            MockOutcome::Reply(text) => Ok(text),
            MockOutcome::Fail(message) => Err(Self::failure_error(message)),
        }
    }
}
