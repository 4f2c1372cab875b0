// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-invocation run parameters.

use serde::{Deserialize, Serialize};

/// Parameters of one orchestrated run. Immutable for the run's duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunContext {
    pub run_name: String,
    pub project_name: String,
    /// Base URL of the blob container outputs are written to
    pub container_url: String,
    /// Steps whose artifacts are persisted, in upload order
    pub upload_targets: Vec<String>,
    /// Discard cached step results before running
    pub invalidate: bool,
    /// Invalidate and allow overwriting previously persisted artifacts
    pub forced: bool,
}

impl RunContext {
    pub fn builder(
        run_name: impl Into<String>,
        project_name: impl Into<String>,
        container_url: impl Into<String>,
    ) -> RunContextBuilder {
        RunContextBuilder {
            run_name: run_name.into(),
            project_name: project_name.into(),
            container_url: container_url.into(),
            upload_targets: Vec::new(),
            invalidate: false,
            forced: false,
        }
    }

    /// Whether cached results are discarded before running.
    ///
    /// Only a forced run invalidates. `invalidate` alone is recorded but
    /// does not wipe the cache.
    pub fn should_invalidate(&self) -> bool {
        self.forced
    }

    /// Storage path of an output under this run: `{project}/{run}/{name}`.
    pub fn output_path(&self, name: &str) -> String {
        format!("{}/{}/{}", self.project_name, self.run_name, name)
    }
}

pub struct RunContextBuilder {
    run_name: String,
    project_name: String,
    container_url: String,
    upload_targets: Vec<String>,
    invalidate: bool,
    forced: bool,
}

impl RunContextBuilder {
    crate::setters! {
        set {
            invalidate: bool,
            forced: bool,
        }
    }

    pub fn upload_targets<I, S>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.upload_targets = targets.into_iter().map(Into::into).collect();
        self
    }

    pub fn build(self) -> RunContext {
        RunContext {
            run_name: self.run_name,
            project_name: self.project_name,
            container_url: self.container_url,
            upload_targets: self.upload_targets,
            invalidate: self.invalidate,
            forced: self.forced,
        }
    }
}

/// Channel a run's status card is posted to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifyTarget {
    pub team: String,
    pub channel: String,
    /// Member emails to mention, in order
    #[serde(default)]
    pub pings: Vec<String>,
}

impl NotifyTarget {
    pub fn new(team: impl Into<String>, channel: impl Into<String>) -> Self {
        Self { team: team.into(), channel: channel.into(), pings: Vec::new() }
    }

    pub fn pings<I, S>(mut self, pings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pings = pings.into_iter().map(Into::into).collect();
        self
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
