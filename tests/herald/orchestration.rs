// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run orchestration over fake collaborators.

use crate::prelude::*;

#[tokio::test]
async fn errored_step_uploads_then_posts_failed_card() {
    let engine = FakeEngine::new()
        .with_report(report(&[("a", "completed"), ("b", "errored")]))
        .with_artifact("a", b"value-a");
    let pipeline = Pipeline::new(engine);

    let outcome = pipeline.runner.run_targets(&context().upload_targets(["a"]).build()).await.unwrap();

    assert!(matches!(
        outcome,
        RunOutcome::Done { status, dispatch: DispatchOutcome::Delivered { .. } }
            if status.label == StatusLabel::Failed
    ));
    assert_eq!(pipeline.storage.paths(), vec!["pk/nightly/a", "pk/nightly/validation", "pk/nightly/run_report"]);

    let document = pipeline.posted().card_document().unwrap().unwrap();
    let expected = [
        "pk/nightly", "FAILED",
        "name", "a", "b",
        "progress", "completed", "errored",
        "minutes", "1.0", "-",
    ];
    similar_asserts::assert_eq!(card_texts(&document), expected.map(String::from).to_vec());
}

#[tokio::test]
async fn all_skipped_run_is_a_noop() {
    let pipeline = Pipeline::new(FakeEngine::new().with_report(report(&[("a", "skipped")])));

    let outcome = pipeline.runner.run_targets(&context().upload_targets(["a"]).build()).await.unwrap();

    assert_eq!(outcome.phase(), RunPhase::SkippedNoop);
    assert!(pipeline.storage.calls().is_empty());
    assert!(pipeline.transport.calls().is_empty());
}

#[tokio::test]
async fn rejected_post_does_not_fail_the_run() {
    let pipeline = Pipeline::new(FakeEngine::new().with_report(report(&[("a", "completed")])));
    pipeline.transport.reply_with(403, "{\"error\":{\"code\":\"Forbidden\"}}");

    let outcome = pipeline.runner.run_targets(&context().build()).await.unwrap();

    assert!(matches!(
        outcome,
        RunOutcome::Done { dispatch: DispatchOutcome::Rejected { status: 403, .. }, .. }
    ));
}

#[tokio::test]
async fn unreachable_channel_does_not_fail_the_run() {
    let pipeline = Pipeline::new(FakeEngine::new().with_report(report(&[("a", "completed")])));
    pipeline.transport.set_unreachable("dns error");

    let outcome = pipeline.runner.run_targets(&context().build()).await.unwrap();

    assert_eq!(outcome.phase(), RunPhase::Done);
}

#[tokio::test]
async fn pings_are_mentioned_in_order() {
    let engine = FakeEngine::new().with_report(report(&[("a", "completed")]));
    let pipeline = Pipeline::with_pings(engine, &["bob@x.com", "ada@x.com"]);

    pipeline.runner.run_targets(&context().build()).await.unwrap();

    let payload = pipeline.posted();
    let mentions: Vec<_> = payload.mentions.iter().map(|m| (m.sequence_id, m.user_id.as_str())).collect();
    assert_eq!(mentions, vec![(1, "uid-bob"), (2, "uid-ada")]);
    assert!(payload
        .body
        .content
        .starts_with("<p>Ping <at id=\"1\">Bob</at>, <at id=\"2\">Ada Lovelace</at></p><br><p>"));
    // the card survives the rewrite of the body
    assert!(payload.card_document().unwrap().is_some());
}

#[tokio::test]
async fn unknown_ping_aborts_notification_after_uploads() {
    let engine = FakeEngine::new().with_report(report(&[("a", "completed")]));
    let pipeline = Pipeline::with_pings(engine, &["ghost@x.com"]);

    let err = pipeline.runner.run_targets(&context().build()).await.unwrap_err();

    assert!(err.to_string().contains("user not found: ghost@x.com"));
    assert_eq!(pipeline.storage.paths().len(), 2);
    assert!(pipeline.transport.calls().is_empty());
}

#[tokio::test]
async fn engine_failure_skips_uploads_and_notification() {
    let pipeline = Pipeline::new(FakeEngine::new().failing_run("target model errored"));

    let outcome = pipeline.runner.run_targets(&context().forced(true).build()).await.unwrap();

    assert_eq!(outcome.phase(), RunPhase::Failed);
    assert!(pipeline.storage.calls().is_empty());
    assert!(pipeline.transport.calls().is_empty());
}
