// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! herald-adapters: collaborators of the run pipeline.
//!
//! Each collaborator is a trait with one production adapter and, behind the
//! `test-support` feature, an in-memory fake that records calls.

pub mod directory;
pub mod engine;
pub mod meta;
pub mod storage;
pub mod transport;

#[cfg(any(test, feature = "test-support"))]
pub mod stub_http;

pub use directory::{Channel, Directory, DirectoryError, GraphDirectory, Member, Session, Team};
pub use engine::{EngineError, ExecutionEngine, TargetsEngine};
pub use meta::MetaError;
pub use storage::{BlobStorage, StorageAdapter, StorageError};
pub use transport::{ChannelTransport, HttpReply, HttpTransport, TransportError};

#[cfg(any(test, feature = "test-support"))]
pub use directory::FakeDirectory;
#[cfg(any(test, feature = "test-support"))]
pub use engine::{EngineCall, FakeEngine};
#[cfg(any(test, feature = "test-support"))]
pub use storage::{FakeStorage, StoreCall};
#[cfg(any(test, feature = "test-support"))]
pub use transport::{FakeTransport, PostCall};
