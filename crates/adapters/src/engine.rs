// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Execution engine that runs the computation graph.

use crate::meta::{self, MetaError};
use async_trait::async_trait;
use herald_core::RunReport;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from engine operations
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{command}` exited with {}: {stderr}", exit_label(.code))]
    CommandFailed { command: String, code: Option<i32>, stderr: String },
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no stored artifact for step {0}")]
    MissingArtifact(String),
    #[error("malformed engine metadata: {0}")]
    Meta(#[from] MetaError),
    #[error("{0}")]
    Failed(String),
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "signal".to_string(),
    }
}

/// Adapter for the dependency-graph execution engine
#[async_trait]
pub trait ExecutionEngine: Clone + Send + Sync + 'static {
    /// Mark every cached step result as outdated
    async fn invalidate_all(&self) -> Result<(), EngineError>;

    /// Run the graph to completion
    async fn run(&self) -> Result<(), EngineError>;

    /// Per-step outcome of the most recent run
    async fn progress(&self) -> Result<RunReport, EngineError>;

    /// Raw stored value of a step
    async fn read_artifact(&self, step: &str) -> Result<Vec<u8>, EngineError>;
}

pub const DEFAULT_RUN_COMMAND: &str = "Rscript -e 'targets::tar_make()'";
pub const DEFAULT_INVALIDATE_COMMAND: &str = "Rscript -e 'targets::tar_invalidate(everything())'";

/// Engine driven through shell commands, read back from its store directory.
///
/// Store layout:
///
/// ```text
/// {store}/meta/progress   pipe table: name|...|progress
/// {store}/meta/meta       pipe table: name|...|seconds
/// {store}/objects/{step}  stored step values
/// ```
#[derive(Clone, Debug)]
pub struct TargetsEngine {
    workdir: PathBuf,
    store: PathBuf,
    run_command: String,
    invalidate_command: String,
}

impl TargetsEngine {
    /// `store` is resolved relative to `workdir` when not absolute.
    pub fn new(workdir: impl Into<PathBuf>, store: impl AsRef<Path>) -> Self {
        let workdir = workdir.into();
        let store = workdir.join(store);
        Self {
            workdir,
            store,
            run_command: DEFAULT_RUN_COMMAND.to_string(),
            invalidate_command: DEFAULT_INVALIDATE_COMMAND.to_string(),
        }
    }

    herald_core::setters! {
        into {
            run_command: String,
            invalidate_command: String,
        }
    }

    pub fn store(&self) -> &Path {
        &self.store
    }

    async fn shell(&self, command: &str) -> Result<(), EngineError> {
        tracing::info!(%command, workdir = %self.workdir.display(), "running engine command");
        let output = tokio::process::Command::new("sh")
            .arg("-c")
            .arg(command)
            .current_dir(&self.workdir)
            .output()
            .await
            .map_err(|source| EngineError::Spawn { command: command.to_string(), source })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(EngineError::CommandFailed {
                command: command.to_string(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }

    async fn read_table(&self, name: &str) -> Result<Option<String>, EngineError> {
        let path = self.store.join("meta").join(name);
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(EngineError::Read { path, source }),
        }
    }
}

#[async_trait]
impl ExecutionEngine for TargetsEngine {
    async fn invalidate_all(&self) -> Result<(), EngineError> {
        self.shell(&self.invalidate_command).await
    }

    async fn run(&self) -> Result<(), EngineError> {
        self.shell(&self.run_command).await
    }

    async fn progress(&self) -> Result<RunReport, EngineError> {
        // An engine that never ran has no progress table yet
        let Some(progress) = self.read_table("progress").await? else {
            return Ok(RunReport::default());
        };
        let meta = self.read_table("meta").await?;
        Ok(meta::parse_report(&progress, meta.as_deref())?)
    }

    async fn read_artifact(&self, step: &str) -> Result<Vec<u8>, EngineError> {
        let path = self.store.join("objects").join(step);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(EngineError::MissingArtifact(step.to_string()))
            }
            Err(source) => Err(EngineError::Read { path, source }),
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{EngineError, ExecutionEngine};
    use async_trait::async_trait;
    use herald_core::RunReport;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::Arc;

    /// Recorded engine call
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum EngineCall {
        InvalidateAll,
        Run,
        Progress,
        ReadArtifact(String),
    }

    struct FakeEngineState {
        calls: Vec<EngineCall>,
        report: RunReport,
        run_error: Option<String>,
        invalidate_error: Option<String>,
        artifacts: HashMap<String, Vec<u8>>,
    }

    /// Fake engine for testing; reports a fixed run report
    #[derive(Clone)]
    pub struct FakeEngine {
        inner: Arc<Mutex<FakeEngineState>>,
    }

    impl Default for FakeEngine {
        fn default() -> Self {
            Self {
                inner: Arc::new(Mutex::new(FakeEngineState {
                    calls: Vec::new(),
                    report: RunReport::default(),
                    run_error: None,
                    invalidate_error: None,
                    artifacts: HashMap::new(),
                })),
            }
        }
    }

    impl FakeEngine {
        pub fn new() -> Self {
            Self::default()
        }

        /// Report returned by `progress()`
        pub fn with_report(self, report: RunReport) -> Self {
            self.inner.lock().report = report;
            self
        }

        /// Make `run()` fail with `message`
        pub fn failing_run(self, message: &str) -> Self {
            self.inner.lock().run_error = Some(message.to_string());
            self
        }

        /// Make `invalidate_all()` fail with `message`
        pub fn failing_invalidate(self, message: &str) -> Self {
            self.inner.lock().invalidate_error = Some(message.to_string());
            self
        }

        /// Stored value of `step`
        pub fn with_artifact(self, step: &str, bytes: &[u8]) -> Self {
            self.inner.lock().artifacts.insert(step.to_string(), bytes.to_vec());
            self
        }

        /// Get all recorded calls
        pub fn calls(&self) -> Vec<EngineCall> {
            self.inner.lock().calls.clone()
        }
    }

    #[async_trait]
    impl ExecutionEngine for FakeEngine {
        async fn invalidate_all(&self) -> Result<(), EngineError> {
            let mut inner = self.inner.lock();
            inner.calls.push(EngineCall::InvalidateAll);
            match &inner.invalidate_error {
                Some(message) => Err(EngineError::Failed(message.clone())),
                None => Ok(()),
            }
        }

        async fn run(&self) -> Result<(), EngineError> {
            let mut inner = self.inner.lock();
            inner.calls.push(EngineCall::Run);
            match &inner.run_error {
                Some(message) => Err(EngineError::Failed(message.clone())),
                None => Ok(()),
            }
        }

        async fn progress(&self) -> Result<RunReport, EngineError> {
            let mut inner = self.inner.lock();
            inner.calls.push(EngineCall::Progress);
            Ok(inner.report.clone())
        }

        async fn read_artifact(&self, step: &str) -> Result<Vec<u8>, EngineError> {
            let mut inner = self.inner.lock();
            inner.calls.push(EngineCall::ReadArtifact(step.to_string()));
            inner
                .artifacts
                .get(step)
                .cloned()
                .ok_or_else(|| EngineError::MissingArtifact(step.to_string()))
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{EngineCall, FakeEngine};

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
