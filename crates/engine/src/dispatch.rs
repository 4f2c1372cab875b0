// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Posting payloads to a channel.
//!
//! Lookup and mention failures abort the send and are returned as
//! [`DispatchError`]. Once the message is posted, a non-2xx answer or a
//! transport failure is logged and reported as a [`DispatchOutcome`] value.

use crate::mention::{resolve_mentions, MentionError};
use herald_adapters::{Channel, ChannelTransport, Directory, DirectoryError};
use herald_core::{CardError, NotifyTarget, Payload};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    #[error(transparent)]
    Mention(#[from] MentionError),
    #[error(transparent)]
    Card(#[from] CardError),
}

/// What happened to a posted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Delivered { status: u16 },
    Rejected { status: u16, body: String },
    Unreachable { error: String },
}

impl DispatchOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DispatchOutcome::Delivered { .. })
    }
}

/// Sends payloads through a directory and a transport.
#[derive(Clone)]
pub struct Dispatcher<D, T> {
    directory: D,
    transport: T,
    api_url: String,
}

impl<D, T> Dispatcher<D, T>
where
    D: Directory,
    T: ChannelTransport,
{
    pub fn new(directory: D, transport: T, api_url: impl Into<String>) -> Self {
        Self { directory, transport, api_url: api_url.into() }
    }

    /// `{api}/teams/{team_id}/channels/{channel_id}/messages`
    pub fn message_url(&self, channel: &Channel) -> String {
        format!(
            "{}/teams/{}/channels/{}/messages",
            self.api_url.trim_end_matches('/'),
            channel.team_id,
            channel.channel_id
        )
    }

    /// Post `payload` to `channel_name` of `team_name`, mentioning `pings`.
    pub async fn send(
        &self,
        payload: Payload,
        channel_name: &str,
        team_name: &str,
        pings: &[String],
    ) -> Result<DispatchOutcome, DispatchError> {
        let team = self.directory.team(team_name).await?;
        let channel = self.directory.channel(&team, channel_name).await?;
        let payload = resolve_mentions(payload, pings, &self.directory, &team).await?;
        let body = payload.to_json()?;
        let url = self.message_url(&channel);

        let outcome = match self.transport.post_json(&url, &channel.bearer_token, body).await {
            Ok(reply) if reply.is_delivered() => DispatchOutcome::Delivered { status: reply.status },
            Ok(reply) => {
                tracing::error!(
                    team = team_name,
                    channel = channel_name,
                    status = reply.status,
                    body = %reply.body,
                    "message rejected"
                );
                DispatchOutcome::Rejected { status: reply.status, body: reply.body }
            }
            Err(e) => {
                tracing::error!(team = team_name, channel = channel_name, error = %e, "message not sent");
                DispatchOutcome::Unreachable { error: e.to_string() }
            }
        };
        if outcome.is_delivered() {
            tracing::info!(team = team_name, channel = channel_name, mentions = pings.len(), "message posted");
        }
        Ok(outcome)
    }

    /// [`send`](Self::send) to a configured target.
    pub async fn send_to(
        &self,
        payload: Payload,
        target: &NotifyTarget,
    ) -> Result<DispatchOutcome, DispatchError> {
        self.send(payload, &target.channel, &target.team, &target.pings).await
    }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
