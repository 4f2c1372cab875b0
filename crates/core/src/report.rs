// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-step execution report produced by the execution engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder rendered for values the engine did not report.
pub const NOT_AVAILABLE: &str = "-";

/// Progress of a single step as reported by the engine.
///
/// Unknown engine states are kept verbatim in [`StepProgress::Other`] so they
/// can still be displayed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StepProgress {
    Completed,
    Errored,
    Skipped,
    Other(String),
}

impl StepProgress {
    pub fn as_str(&self) -> &str {
        match self {
            StepProgress::Completed => "completed",
            StepProgress::Errored => "errored",
            StepProgress::Skipped => "skipped",
            StepProgress::Other(raw) => raw,
        }
    }

    pub fn is_errored(&self) -> bool {
        matches!(self, StepProgress::Errored)
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, StepProgress::Skipped)
    }
}

impl From<&str> for StepProgress {
    fn from(raw: &str) -> Self {
        match raw {
            // "built" is the engine's pre-1.0 spelling of "completed"
            "completed" | "built" => StepProgress::Completed,
            "errored" => StepProgress::Errored,
            "skipped" => StepProgress::Skipped,
            other => StepProgress::Other(other.to_string()),
        }
    }
}

impl From<String> for StepProgress {
    fn from(raw: String) -> Self {
        StepProgress::from(raw.as_str())
    }
}

impl From<StepProgress> for String {
    fn from(progress: StepProgress) -> Self {
        match progress {
            StepProgress::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for StepProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of a run report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    pub name: String,
    pub progress: StepProgress,
    /// Wall time in seconds; only reported for completed steps
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seconds: Option<f64>,
}

impl StepResult {
    pub fn new(name: impl Into<String>, progress: impl Into<StepProgress>) -> Self {
        Self { name: name.into(), progress: progress.into(), seconds: None }
    }

    pub fn completed(name: impl Into<String>, seconds: f64) -> Self {
        Self { name: name.into(), progress: StepProgress::Completed, seconds: Some(seconds) }
    }

    /// Duration in minutes, rounded to one decimal place.
    pub fn minutes(&self) -> Option<f64> {
        self.seconds.map(|s| (s / 60.0 * 10.0).round() / 10.0)
    }

    /// Raw value of `field` for this row, `None` when not available.
    pub fn value(&self, field: ReportField) -> Option<String> {
        match field {
            ReportField::Name => Some(self.name.clone()),
            ReportField::Progress => Some(self.progress.to_string()),
            ReportField::Minutes => self.minutes().map(|m| format!("{m:.1}")),
        }
    }

    /// Display text of `field`, with [`NOT_AVAILABLE`] substituted for missing values.
    pub fn display(&self, field: ReportField) -> String {
        self.value(field).unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }
}

/// Columns of the report that can be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportField {
    Name,
    Progress,
    Minutes,
}

crate::simple_display! {
    ReportField {
        Name => "name",
        Progress => "progress",
        Minutes => "minutes",
    }
}

/// Ordered step outcomes for one run, in engine order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunReport {
    steps: Vec<StepResult>,
}

/// Persisted shape of a report row (adds the derived minutes column).
#[derive(Serialize)]
struct PersistedRow<'a> {
    name: &'a str,
    progress: &'a StepProgress,
    seconds: Option<f64>,
    minutes: Option<f64>,
}

impl RunReport {
    pub fn new(steps: Vec<StepResult>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[StepResult] {
        &self.steps
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StepResult> {
        self.steps.iter()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step(&self, name: &str) -> Option<&StepResult> {
        self.steps.iter().find(|s| s.name == name)
    }

    pub fn any_errored(&self) -> bool {
        self.steps.iter().any(|s| s.progress.is_errored())
    }

    /// True when the report is non-empty and every step was skipped.
    pub fn all_skipped(&self) -> bool {
        !self.steps.is_empty() && self.steps.iter().all(|s| s.progress.is_skipped())
    }

    /// Serialize for persistence, including the derived `minutes` column.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        let rows: Vec<PersistedRow<'_>> = self
            .steps
            .iter()
            .map(|s| PersistedRow {
                name: &s.name,
                progress: &s.progress,
                seconds: s.seconds,
                minutes: s.minutes(),
            })
            .collect();
        serde_json::to_vec_pretty(&rows)
    }
}

impl FromIterator<StepResult> for RunReport {
    fn from_iter<I: IntoIterator<Item = StepResult>>(iter: I) -> Self {
        Self { steps: iter.into_iter().collect() }
    }
}

impl<'a> IntoIterator for &'a RunReport {
    type Item = &'a StepResult;
    type IntoIter = std::slice::Iter<'a, StepResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
