// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `herald run`: run the graph, persist outputs, post the status card

use anyhow::{Context, Result};
use clap::Args;
use herald_adapters::{BlobStorage, GraphDirectory, HttpTransport, Session, TargetsEngine};
use herald_core::{NotifyTarget, RunContext};
use herald_engine::{Dispatcher, RunOutcome, Runner, RunnerConfig};
use std::path::Path;

use crate::env;
use crate::exit_error::{ExitError, EXIT_RUN_FAILED};

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Run name, used in storage paths and the card title
    pub run: String,

    #[arg(long)]
    pub project: String,

    /// Blob container outputs are written to
    #[arg(long = "container-url")]
    pub container_url: String,

    /// Step whose stored value is uploaded (repeatable, kept in order)
    #[arg(long = "upload", value_name = "STEP")]
    pub upload: Vec<String>,

    /// Request invalidation (recorded; only --forced wipes the cache)
    #[arg(long)]
    pub invalidate: bool,

    /// Invalidate and overwrite previously uploaded outputs
    #[arg(long)]
    pub forced: bool,

    /// Team to notify [env: HERALD_TEAM]
    #[arg(long)]
    pub team: Option<String>,

    /// Channel to notify [env: HERALD_CHANNEL]
    #[arg(long)]
    pub channel: Option<String>,

    /// Member email to mention (repeatable) [env: HERALD_PINGS]
    #[arg(long = "ping", value_name = "EMAIL")]
    pub ping: Vec<String>,
}

impl RunArgs {
    pub fn context(&self) -> RunContext {
        RunContext::builder(&self.run, &self.project, &self.container_url)
            .upload_targets(&self.upload)
            .invalidate(self.invalidate)
            .forced(self.forced)
            .build()
    }

    /// Flags first, then `HERALD_*` variables.
    pub fn notify_target(&self) -> Result<NotifyTarget> {
        let team = self.team.clone().or_else(env::team).context("no team: pass --team or set HERALD_TEAM")?;
        let channel = self
            .channel
            .clone()
            .or_else(env::channel)
            .context("no channel: pass --channel or set HERALD_CHANNEL")?;
        let pings = if self.ping.is_empty() { env::pings() } else { self.ping.clone() };
        Ok(NotifyTarget::new(team, channel).pings(pings))
    }
}

/// Engine over the store in `workdir`, with command overrides from the environment.
pub fn engine(workdir: &Path) -> TargetsEngine {
    let mut engine = TargetsEngine::new(workdir, env::store_dir());
    if let Some(command) = env::run_command() {
        engine = engine.run_command(command);
    }
    if let Some(command) = env::invalidate_command() {
        engine = engine.invalidate_command(command);
    }
    engine
}

pub async fn handle(args: RunArgs, workdir: &Path) -> Result<()> {
    let token = env::token().context("no bearer token: set HERALD_TOKEN")?;
    let notify = args.notify_target()?;
    let api_url = env::api_url();

    let dispatcher = Dispatcher::new(
        GraphDirectory::new(api_url.clone(), Session::new(token)),
        HttpTransport::new(),
        api_url,
    );
    let config = RunnerConfig::new(notify)
        .validation_dir(workdir.join(env::validation_dir()))
        .invalidate_grace(env::invalidate_grace());
    let runner = Runner::new(engine(workdir), BlobStorage::new(env::storage_sas()), dispatcher, config);

    let ctx = args.context();
    let outcome = runner
        .run_targets(&ctx)
        .await
        .with_context(|| format!("run {}/{} aborted", ctx.project_name, ctx.run_name))?;

    match outcome {
        RunOutcome::Failed { error } => {
            Err(ExitError::new(EXIT_RUN_FAILED, format!("run failed: {error}")).into())
        }
        RunOutcome::SkippedNoop => {
            println!("{}/{}: nothing to do, every step was skipped", ctx.project_name, ctx.run_name);
            Ok(())
        }
        RunOutcome::Done { status, dispatch } => {
            println!("{}/{}: {status} ({dispatch:?})", ctx.project_name, ctx.run_name);
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
