// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Mull App Developers

//! Configuration module for Mull
//!
//! Handles loading, saving, and managing user settings.

pub mod settings;

pub use settings::Settings;
