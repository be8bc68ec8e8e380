// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Mull App Developers

//! Error types for Mull
//!
//! This module defines all error types used throughout the chat engine.

use thiserror::Error;

/// Main error type for Mull operations
#[derive(Error, Debug)]
pub enum MullError {
    /// Completion API errors
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Input failed validation (bad intention, insufficient exchange, no active session)
    #[error("Validation error: {0}")]
    Validation(String),

    /// A referenced entry or session does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The persistence gateway failed to write
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Completion-call error classification
///
/// Each failure mode of a completion request maps to its own variant so
/// callers can react differently to a missing key, a revoked key, and a
/// throttled account.
#[derive(Error, Debug)]
pub enum ApiError {
    /// No API key is configured
    #[error("No API key configured")]
    MissingApiKey,

    /// Authentication failed (invalid API key)
    #[error("Authentication failed: invalid API key")]
    AuthenticationFailed,

    /// Rate limited by the API
    #[error("Rate limited: too many requests")]
    RateLimited,

    /// The API returned a structured error payload
    #[error("API error ({status}): {message}")]
    Remote { status: u16, message: String },

    /// Non-success status with no parseable error body
    #[error("Request failed with status {0}")]
    Status(u16),

    /// Network connectivity error, no response received
    #[error("Network error: {0}")]
    Network(String),

    /// The API answered 2xx but the payload is unusable
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

/// Result type alias for Mull operations
pub type Result<T> = std::result::Result<T, MullError>;
