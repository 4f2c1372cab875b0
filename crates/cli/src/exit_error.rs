// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error carrying a process exit code.
//!
//! Commands return `ExitError` for outcomes that are not failures of the
//! command itself, and `main()` turns it into the process status.

use std::fmt;

/// Exit code of a run whose engine failed
pub const EXIT_RUN_FAILED: i32 = 1;

/// Exit code of any other error
pub const EXIT_ERROR: i32 = 2;

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ExitError {}

/// Process exit code for an error returned by a command.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<ExitError>().map(|e| e.code).unwrap_or(EXIT_ERROR)
}

#[cfg(test)]
#[path = "exit_error_tests.rs"]
mod tests;
