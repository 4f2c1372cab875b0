// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared harness for the end-to-end tests.

pub use herald_adapters::{FakeDirectory, FakeEngine, FakeStorage, FakeTransport};
pub use herald_core::test_support::report;
pub use herald_core::{CardDocument, CardItem, NotifyTarget, Payload, RunContext, StatusLabel};
pub use herald_engine::{DispatchOutcome, Dispatcher, RunOutcome, RunPhase, Runner, RunnerConfig};
pub use std::time::Duration;

pub const TEAM: &str = "Data";
pub const CHANNEL: &str = "runs";

pub type FakeRunner = Runner<FakeEngine, FakeStorage, FakeDirectory, FakeTransport>;

/// Runner over fakes, with the collaborators kept for inspection.
pub struct Pipeline {
    pub runner: FakeRunner,
    pub engine: FakeEngine,
    pub storage: FakeStorage,
    pub transport: FakeTransport,
}

impl Pipeline {
    pub fn new(engine: FakeEngine) -> Self {
        Self::with_pings(engine, &[])
    }

    pub fn with_pings(engine: FakeEngine, pings: &[&str]) -> Self {
        let storage = FakeStorage::new();
        let transport = FakeTransport::new();
        let directory = FakeDirectory::new()
            .with_channel(TEAM, CHANNEL)
            .with_member(TEAM, "ada@x.com", "Ada Lovelace", "uid-ada")
            .with_member(TEAM, "bob@x.com", "Bob", "uid-bob");
        let config = RunnerConfig::new(NotifyTarget::new(TEAM, CHANNEL).pings(pings.iter().copied()))
            .invalidate_grace(Duration::ZERO);
        let runner = Runner::new(
            engine.clone(),
            storage.clone(),
            Dispatcher::new(directory, transport.clone(), "https://graph.test/v1.0"),
            config,
        );
        Self { runner, engine, storage, transport }
    }

    /// Payload of the only posted message.
    pub fn posted(&self) -> Payload {
        let calls = self.transport.calls();
        assert_eq!(calls.len(), 1, "expected exactly one post");
        serde_json::from_str(&calls[0].body).unwrap()
    }
}

pub fn context() -> herald_core::RunContextBuilder {
    RunContext::builder("nightly", "pk", "https://blob.test/outputs")
}

/// Text blocks of a card in document order, descending into containers and columns.
pub fn card_texts(document: &CardDocument) -> Vec<String> {
    fn walk(items: &[CardItem], out: &mut Vec<String>) {
        for item in items {
            match item {
                CardItem::TextBlock(block) => out.push(block.text.clone()),
                CardItem::Container(container) => walk(&container.items, out),
                CardItem::ColumnSet(set) => walk(&set.columns, out),
                CardItem::Column(column) => walk(&column.items, out),
            }
        }
    }
    let mut out = Vec::new();
    walk(&document.body, &mut out);
    out
}
