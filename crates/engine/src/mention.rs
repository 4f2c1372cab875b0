// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Member mentions for channel messages.

use herald_adapters::{Directory, DirectoryError, Team};
use herald_core::{Mention, Payload};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MentionError {
    #[error("user not found: {0}")]
    UserNotFound(String),
    #[error("member lookup failed: {0}")]
    Directory(#[source] DirectoryError),
}

/// Resolve `pings` (member emails) against `team` and mention them in `payload`.
///
/// Sequence ids follow the order of `pings`, starting at 1. Resolution is
/// all-or-nothing: the first unknown email fails the call and no mention is
/// added. With no pings the payload comes back unchanged.
pub async fn resolve_mentions<D: Directory>(
    payload: Payload,
    pings: &[String],
    directory: &D,
    team: &Team,
) -> Result<Payload, MentionError> {
    if pings.is_empty() {
        return Ok(payload);
    }

    let mut mentions = Vec::with_capacity(pings.len());
    for (sequence_id, email) in (1u32..).zip(pings) {
        let member = directory.member(team, email).await.map_err(|e| {
            if e.is_not_found() {
                MentionError::UserNotFound(email.clone())
            } else {
                MentionError::Directory(e)
            }
        })?;
        mentions.push(Mention {
            sequence_id,
            display_name: member.display_name,
            user_id: member.user_id,
        });
    }

    tracing::debug!(team = %team.display_name, count = mentions.len(), "resolved mentions");
    Ok(payload.with_mentions(mentions))
}

#[cfg(test)]
#[path = "mention_tests.rs"]
mod tests;
