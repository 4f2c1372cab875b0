// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    completed = { "completed",  StepProgress::Completed },
    built     = { "built",      StepProgress::Completed },
    errored   = { "errored",    StepProgress::Errored },
    skipped   = { "skipped",    StepProgress::Skipped },
    canceled  = { "canceled",   StepProgress::Other("canceled".to_string()) },
    empty     = { "",           StepProgress::Other(String::new()) },
)]
fn progress_from_engine_text(raw: &str, expected: StepProgress) {
    assert_eq!(StepProgress::from(raw), expected);
}

#[test]
fn other_progress_keeps_raw_text() {
    let progress = StepProgress::from("dispatched");
    assert_eq!(progress.to_string(), "dispatched");
    assert_eq!(String::from(progress), "dispatched");
}

#[test]
fn step_result_serde_uses_plain_strings() {
    let json = r#"{"name":"fit","progress":"errored"}"#;
    let step: StepResult = serde_json::from_str(json).unwrap();
    assert_eq!(step, StepResult::new("fit", StepProgress::Errored));
    assert_eq!(serde_json::to_string(&step).unwrap(), json);
}

#[yare::parameterized(
    one_minute      = { 60.0,   "1.0" },
    rounds_down     = { 62.0,   "1.0" },
    rounds_up       = { 58.0,   "1.0" },
    ninety_seconds  = { 90.0,   "1.5" },
    sub_second      = { 0.4,    "0.0" },
    long_run        = { 3720.0, "62.0" },
)]
fn minutes_has_one_decimal(seconds: f64, expected: &str) {
    let step = StepResult::completed("a", seconds);
    assert_eq!(step.display(ReportField::Minutes), expected);
}

#[test]
fn missing_seconds_render_as_dash() {
    let step = StepResult::new("b", "errored");
    assert_eq!(step.minutes(), None);
    assert_eq!(step.value(ReportField::Minutes), None);
    assert_eq!(step.display(ReportField::Minutes), NOT_AVAILABLE);
}

#[test]
fn field_values_follow_row() {
    let step = StepResult::completed("load", 120.0);
    assert_eq!(step.display(ReportField::Name), "load");
    assert_eq!(step.display(ReportField::Progress), "completed");
    assert_eq!(step.display(ReportField::Minutes), "2.0");
}

#[test]
fn field_headers() {
    assert_eq!(ReportField::Name.to_string(), "name");
    assert_eq!(ReportField::Progress.to_string(), "progress");
    assert_eq!(ReportField::Minutes.to_string(), "minutes");
}

#[test]
fn all_skipped_requires_rows() {
    assert!(!RunReport::default().all_skipped());
    let report: RunReport =
        vec![StepResult::new("a", "skipped"), StepResult::new("b", "skipped")].into_iter().collect();
    assert!(report.all_skipped());
}

#[test]
fn all_skipped_false_with_any_other_progress() {
    let report = RunReport::new(vec![
        StepResult::new("a", "skipped"),
        StepResult::completed("b", 1.0),
    ]);
    assert!(!report.all_skipped());
    assert!(!report.any_errored());
}

#[test]
fn step_lookup_by_name() {
    let report = RunReport::new(vec![StepResult::completed("a", 1.0), StepResult::new("b", "errored")]);
    assert_eq!(report.step("b").map(|s| &s.progress), Some(&StepProgress::Errored));
    assert!(report.step("c").is_none());
    assert!(report.any_errored());
}

#[test]
fn persisted_report_includes_minutes() {
    let report = RunReport::new(vec![StepResult::completed("a", 90.0), StepResult::new("b", "skipped")]);
    let bytes = report.to_json_bytes().unwrap();
    let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(
        value,
        serde_json::json!([
            {"name": "a", "progress": "completed", "seconds": 90.0, "minutes": 1.5},
            {"name": "b", "progress": "skipped", "seconds": null, "minutes": null},
        ])
    );
}

#[test]
fn report_deserializes_from_row_array() {
    let json = r#"[{"name":"a","progress":"completed","seconds":60},{"name":"b","progress":"skipped"}]"#;
    let report: RunReport = serde_json::from_str(json).unwrap();
    assert_eq!(report.len(), 2);
    assert_eq!(report.steps()[0], StepResult::completed("a", 60.0));
}
