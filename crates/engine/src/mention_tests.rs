// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use herald_adapters::FakeDirectory;
use herald_core::{BodyContentType, MessageBody};

fn directory() -> FakeDirectory {
    FakeDirectory::new()
        .with_channel("Data", "runs")
        .with_member("Data", "a@x.com", "Ada", "uid-a")
        .with_member("Data", "b@x.com", "Bob", "uid-b")
}

async fn team(directory: &FakeDirectory) -> Team {
    directory.team("Data").await.unwrap()
}

fn pings(emails: &[&str]) -> Vec<String> {
    emails.iter().map(|e| e.to_string()).collect()
}

fn payload() -> Payload {
    Payload::new(MessageBody::html("<attachment id=\"1\"></attachment>"))
}

#[tokio::test]
async fn mentions_follow_ping_order() {
    let directory = directory();
    let team = team(&directory).await;

    let resolved =
        resolve_mentions(payload(), &pings(&["b@x.com", "a@x.com"]), &directory, &team).await.unwrap();

    let ids: Vec<_> =
        resolved.mentions.iter().map(|m| (m.sequence_id, m.display_name.as_str())).collect();
    assert_eq!(ids, vec![(1, "Bob"), (2, "Ada")]);
    assert_eq!(resolved.body.content_type, BodyContentType::Html);
    assert_eq!(
        resolved.body.content,
        "<p>Ping <at id=\"1\">Bob</at>, <at id=\"2\">Ada</at></p><br>\
         <p><attachment id=\"1\"></attachment></p>"
    );
    assert_eq!(directory.member_lookups(), pings(&["b@x.com", "a@x.com"]));
}

#[tokio::test]
async fn no_pings_leaves_payload_untouched() {
    let directory = directory();
    let team = team(&directory).await;
    let original = Payload::new(MessageBody::text("plain"));

    let resolved = resolve_mentions(original.clone(), &[], &directory, &team).await.unwrap();

    assert_eq!(resolved, original);
    assert!(directory.member_lookups().is_empty());
}

#[tokio::test]
async fn unknown_member_fails_whole_resolution() {
    let directory = directory();
    let team = team(&directory).await;

    let err = resolve_mentions(payload(), &pings(&["a@x.com", "zed@x.com", "b@x.com"]), &directory, &team)
        .await
        .unwrap_err();

    assert!(matches!(&err, MentionError::UserNotFound(email) if email == "zed@x.com"));
    assert_eq!(err.to_string(), "user not found: zed@x.com");
    // lookups stop at the first miss
    assert_eq!(directory.member_lookups(), pings(&["a@x.com", "zed@x.com"]));
}

#[yare::parameterized(
    upper_case = { "A@x.com" },
    padded     = { " a@x.com" },
)]
fn lookup_is_exact(email: &str) {
    tokio::runtime::Runtime::new().unwrap().block_on(async {
        let directory = directory();
        let team = team(&directory).await;
        let err = resolve_mentions(payload(), &pings(&[email]), &directory, &team).await.unwrap_err();
        assert!(matches!(err, MentionError::UserNotFound(_)));
    });
}
