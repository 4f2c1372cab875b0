// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! herald-engine: run orchestration and channel notification

mod dispatch;
mod mention;
mod runner;

pub use dispatch::{DispatchError, DispatchOutcome, Dispatcher};
pub use mention::{resolve_mentions, MentionError};
pub use runner::{
    RunError, RunOutcome, RunPhase, Runner, RunnerConfig, DEFAULT_INVALIDATE_GRACE,
    DEFAULT_VALIDATION_DIR,
};
