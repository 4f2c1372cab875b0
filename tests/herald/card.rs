// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status card wire shape.

use crate::prelude::*;
use herald_core::{build_project_card, Color, ContainerStyle};

#[test]
fn project_card_round_trips_through_its_attachment() {
    let payload =
        build_project_card("nightly", "pk", &report(&[("a", "completed"), ("b", "skipped")])).unwrap();

    let wire: Payload = serde_json::from_str(&payload.to_json().unwrap()).unwrap();
    similar_asserts::assert_eq!(wire, payload);
    let document = wire.card_document().unwrap().unwrap();

    assert_eq!(document.kind, "AdaptiveCard");
    assert_eq!(document.body.len(), 1);
    let CardItem::Container(container) = &document.body[0] else {
        panic!("top-level item is not a container: {:?}", document.body[0]);
    };
    assert_eq!(container.style, Some(ContainerStyle::Accent));
    assert!(container.bleed);

    let kinds: Vec<_> = container
        .items
        .iter()
        .map(|item| match item {
            CardItem::TextBlock(block) => format!("text:{}", block.text),
            CardItem::ColumnSet(set) => format!("columns:{}", set.columns.len()),
            other => format!("{other:?}"),
        })
        .collect();
    assert_eq!(kinds, vec!["text:pk/nightly", "text:SUCCESS", "columns:3"]);

    let CardItem::TextBlock(status) = &container.items[1] else { unreachable!() };
    assert_eq!(status.color, Some(Color::Good));
}

#[test]
fn payload_body_references_the_attachment() {
    let payload = build_project_card("r", "p", &report(&[])).unwrap();
    let value: serde_json::Value = serde_json::from_str(&payload.to_json().unwrap()).unwrap();

    assert_eq!(value["body"]["contentType"], "html");
    assert_eq!(value["body"]["content"], "<attachment id=\"1\"></attachment>");
    assert_eq!(value["attachments"][0]["id"], "1");
    assert_eq!(value["attachments"][0]["contentType"], "application/vnd.microsoft.card.adaptive");
    // card is embedded as a string, not as an object
    assert!(value["attachments"][0]["content"].is_string());
    assert!(value.get("mentions").is_none());
}
