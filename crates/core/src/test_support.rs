// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::report::{RunReport, StepProgress, StepResult};

// ── Proptest strategies ─────────────────────────────────────────────────

/// Proptest strategies for report types.
pub mod strategies {
    use crate::report::{StepProgress, StepResult};
    use proptest::prelude::*;

    pub fn arb_step_progress() -> impl Strategy<Value = StepProgress> {
        prop_oneof![
            Just(StepProgress::Completed),
            Just(StepProgress::Errored),
            Just(StepProgress::Skipped),
            "[a-z]{3,10}".prop_map(StepProgress::from),
        ]
    }

    pub fn arb_step_result() -> impl Strategy<Value = StepResult> {
        ("[a-z_]{1,12}", arb_step_progress(), 0.0f64..7200.0).prop_map(
            |(name, progress, seconds)| {
                let seconds = matches!(progress, StepProgress::Completed).then_some(seconds);
                StepResult { name, progress, seconds }
            },
        )
    }
}

// ── Report fixtures ─────────────────────────────────────────────────────

/// Build a report from `(name, progress)` pairs. Completed rows take 60s.
pub fn report(rows: &[(&str, &str)]) -> RunReport {
    rows.iter()
        .map(|(name, progress)| match StepProgress::from(*progress) {
            StepProgress::Completed => StepResult::completed(*name, 60.0),
            other => StepResult::new(*name, other),
        })
        .collect()
}
