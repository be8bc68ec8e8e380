// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Mull App Developers

use mull::config::Settings;
use tempfile::TempDir;

#[test]
fn test_settings_default_values() {
    let settings = Settings::default();

    assert!(settings.api_key.is_none());
    assert_eq!(settings.api_key_env, "OPENAI_API_KEY");
    assert!(settings.base_url.is_none());
}

#[test]
fn test_settings_round_trip_through_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");

    let settings = Settings {
        api_key: Some("sk-round-trip".to_string()),
        api_key_env: "MULL_KEY".to_string(),
        base_url: Some("http://localhost:8080/v1/chat/completions".to_string()),
    };
    settings.save_to(&path).unwrap();

    let loaded = Settings::load_from(&path).unwrap();
    assert_eq!(loaded.api_key.as_deref(), Some("sk-round-trip"));
    assert_eq!(loaded.api_key_env, "MULL_KEY");
    assert_eq!(
        loaded.base_url.as_deref(),
        Some("http://localhost:8080/v1/chat/completions")
    );
}

#[test]
fn test_save_creates_parent_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("deeper").join("settings.json");

    Settings::default().save_to(&path).unwrap();
    assert!(path.exists());
}

#[test]
fn test_missing_file_loads_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.json");

    let loaded = Settings::load_from(&path).unwrap();
    assert!(loaded.api_key.is_none());
    assert_eq!(loaded.api_key_env, "OPENAI_API_KEY");
}

#[test]
fn test_corrupt_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, "{not json").unwrap();

    assert!(Settings::load_from(&path).is_err());
}

#[test]
fn test_api_key_resolution_priority() {
    // Use a custom env var name to avoid test pollution
    let settings = Settings {
        api_key: Some("config-key".to_string()),
        api_key_env: "MULL_TEST_API_KEY_12345".to_string(),
        base_url: None,
    };

    // Stored key wins even when the env var is set
    std::env::set_var("MULL_TEST_API_KEY_12345", "env-key");
    assert_eq!(settings.resolve_api_key().as_deref(), Some("config-key"));

    // Without a stored key the env var is used
    let settings = Settings {
        api_key: None,
        ..settings
    };
    assert_eq!(settings.resolve_api_key().as_deref(), Some("env-key"));
    std::env::remove_var("MULL_TEST_API_KEY_12345");
}
