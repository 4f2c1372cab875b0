// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run orchestration.
//!
//! ```text
//! Idle -> [Invalidating] -> Running -> Evaluating -> Failed
//!                                                 -> SkippedNoop
//!                                                 -> Uploading -> Notifying -> Done
//! ```
//!
//! Every collaborator call is awaited before the next one starts.

use crate::dispatch::{DispatchError, DispatchOutcome, Dispatcher};
use herald_adapters::{
    ChannelTransport, Directory, EngineError, ExecutionEngine, StorageAdapter, StorageError,
};
use herald_core::{build_project_card, CardError, NotifyTarget, RunContext, RunReport, RunStatus};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Pause before cached results are discarded, so an accidental forced run
/// can still be interrupted.
pub const DEFAULT_INVALIDATE_GRACE: Duration = Duration::from_secs(5);

pub const DEFAULT_VALIDATION_DIR: &str = "validation";

#[derive(Debug, Error)]
pub enum RunError {
    #[error("invalidation failed: {0}")]
    Invalidate(#[source] EngineError),
    #[error("reading artifact of {step} failed: {source}")]
    Artifact {
        step: String,
        #[source]
        source: EngineError,
    },
    #[error("upload failed: {0}")]
    Upload(#[from] StorageError),
    #[error("report serialization failed: {0}")]
    Report(#[source] serde_json::Error),
    #[error(transparent)]
    Card(#[from] CardError),
    #[error("notification failed: {0}")]
    Notify(#[from] DispatchError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Invalidating,
    Running,
    Evaluating,
    Failed,
    SkippedNoop,
    Uploading,
    Notifying,
    Done,
}

herald_core::simple_display! {
    RunPhase {
        Idle => "idle",
        Invalidating => "invalidating",
        Running => "running",
        Evaluating => "evaluating",
        Failed => "failed",
        SkippedNoop => "skipped_noop",
        Uploading => "uploading",
        Notifying => "notifying",
        Done => "done",
    }
}

/// Terminal result of a run that did not raise.
#[derive(Debug)]
pub enum RunOutcome {
    /// The engine run or the progress query failed; nothing was uploaded.
    Failed { error: EngineError },
    /// Every step was skipped; nothing was uploaded.
    SkippedNoop,
    Done { status: RunStatus, dispatch: DispatchOutcome },
}

impl RunOutcome {
    pub fn phase(&self) -> RunPhase {
        match self {
            RunOutcome::Failed { .. } => RunPhase::Failed,
            RunOutcome::SkippedNoop => RunPhase::SkippedNoop,
            RunOutcome::Done { .. } => RunPhase::Done,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub notify: NotifyTarget,
    /// Local folder uploaded as `{project}/{run}/validation`
    pub validation_dir: PathBuf,
    pub invalidate_grace: Duration,
}

impl RunnerConfig {
    pub fn new(notify: NotifyTarget) -> Self {
        Self {
            notify,
            validation_dir: PathBuf::from(DEFAULT_VALIDATION_DIR),
            invalidate_grace: DEFAULT_INVALIDATE_GRACE,
        }
    }

    herald_core::setters! {
        into {
            validation_dir: PathBuf,
        }
        set {
            invalidate_grace: Duration,
        }
    }
}

/// Drives one run through the engine, storage and the channel.
pub struct Runner<E, S, D, T> {
    engine: E,
    storage: S,
    dispatcher: Dispatcher<D, T>,
    config: RunnerConfig,
}

impl<E, S, D, T> Runner<E, S, D, T>
where
    E: ExecutionEngine,
    S: StorageAdapter,
    D: Directory,
    T: ChannelTransport,
{
    pub fn new(engine: E, storage: S, dispatcher: Dispatcher<D, T>, config: RunnerConfig) -> Self {
        Self { engine, storage, dispatcher, config }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Run the graph, persist its outputs and post the status card.
    ///
    /// Engine failures end the run as [`RunOutcome::Failed`]. Invalidation,
    /// upload and lookup failures are returned as errors.
    pub async fn run_targets(&self, ctx: &RunContext) -> Result<RunOutcome, RunError> {
        enter(ctx, RunPhase::Idle);

        if ctx.should_invalidate() {
            enter(ctx, RunPhase::Invalidating);
            tracing::warn!(
                run = %ctx.run_name,
                grace = ?self.config.invalidate_grace,
                "all cached steps will be invalidated; interrupt now to keep them"
            );
            tokio::time::sleep(self.config.invalidate_grace).await;
            self.engine.invalidate_all().await.map_err(RunError::Invalidate)?;
        }

        enter(ctx, RunPhase::Running);
        let result = self.execute().await;

        enter(ctx, RunPhase::Evaluating);
        let report = match result {
            Ok(report) => report,
            Err(error) => {
                enter(ctx, RunPhase::Failed);
                tracing::error!(run = %ctx.run_name, project = %ctx.project_name, %error, "run failed");
                return Ok(RunOutcome::Failed { error });
            }
        };

        if report.all_skipped() {
            enter(ctx, RunPhase::SkippedNoop);
            tracing::warn!(
                run = %ctx.run_name,
                steps = report.len(),
                "every step was skipped, nothing to upload; re-run with --invalidate to rebuild"
            );
            return Ok(RunOutcome::SkippedNoop);
        }

        enter(ctx, RunPhase::Uploading);
        self.upload(ctx, &report).await?;

        enter(ctx, RunPhase::Notifying);
        let status = RunStatus::classify(&report);
        let payload = build_project_card(&ctx.run_name, &ctx.project_name, &report)?;
        let dispatch = self.dispatcher.send_to(payload, &self.config.notify).await?;

        enter(ctx, RunPhase::Done);
        tracing::info!(
            run = %ctx.run_name,
            project = %ctx.project_name,
            %status,
            delivered = dispatch.is_delivered(),
            "run complete"
        );
        Ok(RunOutcome::Done { status, dispatch })
    }

    async fn execute(&self) -> Result<RunReport, EngineError> {
        self.engine.run().await?;
        self.engine.progress().await
    }

    /// Targets in order, then the validation folder, then the report.
    async fn upload(&self, ctx: &RunContext, report: &RunReport) -> Result<(), RunError> {
        for step in &ctx.upload_targets {
            let bytes = self
                .engine
                .read_artifact(step)
                .await
                .map_err(|source| RunError::Artifact { step: step.clone(), source })?;
            self.storage
                .store_object(bytes, &ctx.output_path(step), &ctx.container_url, ctx.forced)
                .await?;
        }

        self.storage
            .store_folder(
                &self.config.validation_dir,
                &ctx.output_path("validation"),
                &ctx.container_url,
                ctx.forced,
            )
            .await?;

        let report_json = report.to_json_bytes().map_err(RunError::Report)?;
        self.storage
            .store_object(report_json, &ctx.output_path("run_report"), &ctx.container_url, ctx.forced)
            .await?;
        Ok(())
    }
}

fn enter(ctx: &RunContext, phase: RunPhase) {
    tracing::info!(run = %ctx.run_name, project = %ctx.project_name, %phase, "phase");
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
