// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The production adapters wired together against a loopback HTTP stub.

use crate::prelude::*;
use herald_adapters::stub_http::{RecordedRequest, StubResponse, StubServer};
use herald_adapters::{
    BlobStorage, GraphDirectory, HttpTransport, Session, StorageError, TargetsEngine,
};
use herald_engine::RunError;
use serde_json::json;
use std::path::Path;

type LiveRunner = Runner<TargetsEngine, BlobStorage, GraphDirectory, HttpTransport>;

fn graph(request: &RecordedRequest) -> StubResponse {
    let path = request.target.split('?').next().unwrap_or_default();
    match (request.method.as_str(), path) {
        ("GET", "/v1.0/me/joinedTeams") => {
            StubResponse::json(200, json!({ "value": [{ "id": "t1", "displayName": TEAM }] }))
        }
        ("GET", "/v1.0/teams/t1/channels") => StubResponse::json(
            200,
            json!({ "value": [
                { "id": "c0", "displayName": "general" },
                { "id": "c1", "displayName": CHANNEL },
            ] }),
        ),
        ("GET", "/v1.0/teams/t1/members") => StubResponse::json(
            200,
            json!({ "value": [{ "displayName": "Ada", "userId": "u1", "email": "ada@x.com" }] }),
        ),
        ("POST", "/v1.0/teams/t1/channels/c1/messages") => StubResponse::json(201, json!({ "id": "m1" })),
        ("PUT", _) => StubResponse::new(201, ""),
        _ => StubResponse::new(404, "not found"),
    }
}

fn workdir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("_targets");
    std::fs::create_dir_all(store.join("meta")).unwrap();
    std::fs::create_dir_all(store.join("objects")).unwrap();
    std::fs::create_dir_all(dir.path().join("validation")).unwrap();
    std::fs::write(
        store.join("meta/progress"),
        "name|type|progress\nmodel|stem|dispatched\nmodel|stem|completed\nreport|stem|skipped\n",
    )
    .unwrap();
    std::fs::write(store.join("meta/meta"), "name|type|seconds\nmodel|stem|90\n").unwrap();
    std::fs::write(store.join("objects/model"), b"fitted").unwrap();
    std::fs::write(dir.path().join("validation/summary.csv"), "rmse\n0.1\n").unwrap();
    dir
}

fn runner(dir: &Path, server: &StubServer, run_command: &str) -> LiveRunner {
    let api = format!("{}/v1.0", server.url());
    let config = RunnerConfig::new(NotifyTarget::new(TEAM, CHANNEL).pings(["ada@x.com"]))
        .validation_dir(dir.join("validation"))
        .invalidate_grace(Duration::ZERO);
    Runner::new(
        TargetsEngine::new(dir, "_targets").run_command(run_command),
        BlobStorage::new(Some("sig=x".into())),
        Dispatcher::new(GraphDirectory::new(api.clone(), Session::new("tok")), HttpTransport::new(), api),
        config,
    )
}

fn live_context(server: &StubServer) -> RunContext {
    RunContext::builder("nightly", "pk", format!("{}/outputs", server.url()))
        .upload_targets(["model"])
        .build()
}

#[tokio::test]
async fn full_run_uploads_and_posts_in_order() {
    let dir = workdir();
    let server = StubServer::start(graph).await.unwrap();

    let outcome = runner(dir.path(), &server, "true").run_targets(&live_context(&server)).await.unwrap();

    assert!(matches!(
        outcome,
        RunOutcome::Done { status, dispatch: DispatchOutcome::Delivered { status: 201 } }
            if status.label == StatusLabel::Success
    ));

    let requests = server.requests();
    let lines: Vec<_> = requests.iter().map(|r| format!("{} {}", r.method, r.target)).collect();
    similar_asserts::assert_eq!(
        lines,
        [
            "PUT /outputs/pk/nightly/model?sig=x",
            "PUT /outputs/pk/nightly/validation/summary.csv?sig=x",
            "PUT /outputs/pk/nightly/run_report?sig=x",
            "GET /v1.0/me/joinedTeams",
            "GET /v1.0/teams/t1/channels",
            "GET /v1.0/teams/t1/members",
            "POST /v1.0/teams/t1/channels/c1/messages",
        ]
        .map(String::from)
        .to_vec()
    );

    assert_eq!(requests[0].body, "fitted");
    assert_eq!(requests[0].header("if-none-match"), Some("*"));

    let report: serde_json::Value = serde_json::from_str(&requests[2].body).unwrap();
    assert_eq!(report[0]["name"], "model");
    assert_eq!(report[0]["minutes"], 1.5);
    assert_eq!(report[1]["progress"], "skipped");

    let post = &requests[6];
    assert_eq!(post.header("authorization"), Some("Bearer tok"));
    let payload: Payload = serde_json::from_str(&post.body).unwrap();
    assert_eq!(payload.mentions[0].user_id, "u1");
    assert!(payload.body.content.contains("<at id=\"1\">Ada</at>"));
}

#[tokio::test]
async fn existing_blob_aborts_before_notification() {
    let dir = workdir();
    let server = StubServer::start(|request| {
        if request.method == "PUT" {
            StubResponse::new(409, "BlobAlreadyExists")
        } else {
            graph(request)
        }
    })
    .await
    .unwrap();

    let err =
        runner(dir.path(), &server, "true").run_targets(&live_context(&server)).await.unwrap_err();

    assert!(matches!(err, RunError::Upload(StorageError::AlreadyExists(ref path)) if path == "pk/nightly/model"));
    assert_eq!(server.requests().len(), 1);
}

#[tokio::test]
async fn failing_engine_command_touches_nothing_remote() {
    let dir = workdir();
    let server = StubServer::start(graph).await.unwrap();

    let outcome = runner(dir.path(), &server, "echo 'target model errored' >&2; exit 1")
        .run_targets(&live_context(&server))
        .await
        .unwrap();

    match outcome {
        RunOutcome::Failed { error } => assert!(error.to_string().contains("target model errored")),
        other => panic!("unexpected outcome {other:?}"),
    }
    assert!(server.requests().is_empty());
}
