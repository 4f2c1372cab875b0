// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn builder_defaults() {
    let ctx = RunContext::builder("nightly", "forecast", "https://acct.blob/outputs").build();
    assert_eq!(ctx.run_name, "nightly");
    assert_eq!(ctx.project_name, "forecast");
    assert_eq!(ctx.container_url, "https://acct.blob/outputs");
    assert!(ctx.upload_targets.is_empty());
    assert!(!ctx.invalidate);
    assert!(!ctx.forced);
}

#[test]
fn builder_keeps_upload_order() {
    let ctx = RunContext::builder("r", "p", "u").upload_targets(["model", "data", "plot"]).build();
    assert_eq!(ctx.upload_targets, vec!["model", "data", "plot"]);
}

#[yare::parameterized(
    neither         = { false, false, false },
    invalidate_only = { true,  false, false },
    forced_only     = { false, true,  true },
    both            = { true,  true,  true },
)]
fn invalidation_flags(invalidate: bool, forced: bool, expected: bool) {
    let ctx = RunContext::builder("r", "p", "u").invalidate(invalidate).forced(forced).build();
    assert_eq!(ctx.should_invalidate(), expected);
}

#[test]
fn output_path_is_project_run_name() {
    let ctx = RunContext::builder("2026-10", "forecast", "u").build();
    assert_eq!(ctx.output_path("model"), "forecast/2026-10/model");
    assert_eq!(ctx.output_path("run_report"), "forecast/2026-10/run_report");
}

#[test]
fn notify_target_pings() {
    let target = NotifyTarget::new("Data", "runs").pings(["a@x.com", "b@x.com"]);
    assert_eq!(target.team, "Data");
    assert_eq!(target.channel, "runs");
    assert_eq!(target.pings, vec!["a@x.com", "b@x.com"]);
}
