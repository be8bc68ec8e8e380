// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Mull App Developers

//! Settings management for Mull
//!
//! Handles loading and saving settings from ~/.mull/settings.json

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::llm::client::CredentialStore;
use crate::llm::openai::API_KEY_CREDENTIAL;

/// Main settings structure, stored in ~/.mull/settings.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// API key (if stored directly, not recommended)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Environment variable name for the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Base URL for the completion API (for custom endpoints)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            api_key_env: default_api_key_env(),
            base_url: None,
        }
    }
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

impl Settings {
    /// Get the Mull home directory (~/.mull)
    pub fn mull_home() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".mull")
    }

    /// Path to the settings file
    pub fn settings_path() -> PathBuf {
        Self::mull_home().join("settings.json")
    }

    /// Load settings from the default location
    ///
    /// A missing file yields defaults; a corrupt file is an error.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::settings_path())
    }

    /// Load settings from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(target: "mull.config", ?path, "no settings file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let settings = serde_json::from_str(&content)?;
        Ok(settings)
    }

    /// Save settings to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::settings_path())
    }

    /// Save settings to a specific path, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Resolve the API key: stored value first, then the environment
    pub fn resolve_api_key(&self) -> Option<String> {
        if let Some(ref key) = self.api_key {
            if !key.is_empty() {
                return Some(key.clone());
            }
        }

        std::env::var(&self.api_key_env)
            .ok()
            .filter(|v| !v.is_empty())
    }
}

impl CredentialStore for Settings {
    fn get(&self, key: &str) -> Option<String> {
        if key == API_KEY_CREDENTIAL {
            self.resolve_api_key()
        } else {
            None
        }
    }
}
