// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Overall run status derived from a [`RunReport`].

use crate::card::Color;
use crate::report::RunReport;
use serde::{Deserialize, Serialize};

/// Headline shown on the status card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusLabel {
    Failed,
    Skipped,
    Success,
}

crate::simple_display! {
    StatusLabel {
        Failed => "FAILED",
        Skipped => "Skipped",
        Success => "SUCCESS",
    }
}

/// Classified outcome of a run. Never stored; recompute from the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStatus {
    pub label: StatusLabel,
    pub color: Color,
}

impl RunStatus {
    /// Classify a report. First match wins:
    /// any errored step, then all steps skipped, then success.
    ///
    /// An empty report is a success.
    pub fn classify(report: &RunReport) -> Self {
        if report.any_errored() {
            Self { label: StatusLabel::Failed, color: Color::Attention }
        } else if report.all_skipped() {
            Self { label: StatusLabel::Skipped, color: Color::Warning }
        } else {
            Self { label: StatusLabel::Success, color: Color::Good }
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.label.fmt(f)
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
