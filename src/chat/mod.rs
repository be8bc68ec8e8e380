// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Mull App Developers

//! Chat session orchestration
//!
//! Owns the current-session state machine and drives message exchange
//! against the completion service and the entry persistence gateway.

mod controller;

pub use controller::ChatController;
