// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI.
//!
//! Command-line flags take precedence over everything read here.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://graph.microsoft.com/v1.0";

/// Default log filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "herald=info";

fn non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.trim().is_empty())
}

/// Messaging API base URL (`HERALD_API_URL`)
pub fn api_url() -> String {
    non_empty("HERALD_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

/// Bearer token of the acting user (`HERALD_TOKEN`)
pub fn token() -> Option<String> {
    non_empty("HERALD_TOKEN")
}

pub fn team() -> Option<String> {
    non_empty("HERALD_TEAM")
}

pub fn channel() -> Option<String> {
    non_empty("HERALD_CHANNEL")
}

/// Comma-separated member emails to mention (`HERALD_PINGS`)
pub fn pings() -> Vec<String> {
    non_empty("HERALD_PINGS")
        .map(|s| {
            s.split(',').map(str::trim).filter(|p| !p.is_empty()).map(str::to_string).collect()
        })
        .unwrap_or_default()
}

/// SAS query string appended to blob uploads (`HERALD_STORAGE_SAS`)
pub fn storage_sas() -> Option<String> {
    non_empty("HERALD_STORAGE_SAS")
}

/// Engine store directory, relative to the working directory (`HERALD_STORE_DIR`)
pub fn store_dir() -> PathBuf {
    non_empty("HERALD_STORE_DIR").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("_targets"))
}

/// Override for the engine's run command (`HERALD_RUN_COMMAND`)
pub fn run_command() -> Option<String> {
    non_empty("HERALD_RUN_COMMAND")
}

/// Override for the engine's invalidate command (`HERALD_INVALIDATE_COMMAND`)
pub fn invalidate_command() -> Option<String> {
    non_empty("HERALD_INVALIDATE_COMMAND")
}

/// Folder uploaded as the run's validation outputs (`HERALD_VALIDATION_DIR`)
pub fn validation_dir() -> PathBuf {
    non_empty("HERALD_VALIDATION_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(herald_engine::DEFAULT_VALIDATION_DIR))
}

/// Pause before invalidation (default 5s, configurable via `HERALD_GRACE_MS`).
pub fn invalidate_grace() -> Duration {
    std::env::var("HERALD_GRACE_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(herald_engine::DEFAULT_INVALIDATE_GRACE)
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
