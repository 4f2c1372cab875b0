// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Directory service: teams, channels, and members of the messaging platform.
//!
//! Lookups run as the acting user through an explicit [`Session`]; the
//! directory never mints or refreshes tokens.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

/// Errors from directory lookups
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("team not found: {0}")]
    TeamNotFound(String),
    #[error("channel {channel} not found in team {team}")]
    ChannelNotFound { team: String, channel: String },
    #[error("member {email} not found in team {team}")]
    MemberNotFound { team: String, email: String },
    #[error("directory request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("directory request to {url} returned {status}: {body}")]
    Status { url: String, status: u16, body: String },
}

impl DirectoryError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DirectoryError::TeamNotFound(_)
                | DirectoryError::ChannelNotFound { .. }
                | DirectoryError::MemberNotFound { .. }
        )
    }
}

/// Bearer credential of the acting user.
#[derive(Clone)]
pub struct Session {
    token: String,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session").field("token", &"<redacted>").finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub id: String,
    pub display_name: String,
}

/// A channel plus the token used to post into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub team_id: String,
    pub channel_id: String,
    pub bearer_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub display_name: String,
    pub user_id: String,
}

/// Adapter for directory lookups
#[async_trait]
pub trait Directory: Clone + Send + Sync + 'static {
    /// Find a team the acting user belongs to, by display name
    async fn team(&self, name: &str) -> Result<Team, DirectoryError>;

    /// Find a channel of `team` by display name
    async fn channel(&self, team: &Team, name: &str) -> Result<Channel, DirectoryError>;

    /// Find a member of `team` by email (case-sensitive)
    async fn member(&self, team: &Team, email: &str) -> Result<Member, DirectoryError>;
}

/// Directory backed by the Graph REST API.
#[derive(Clone, Debug)]
pub struct GraphDirectory {
    client: reqwest::Client,
    api_url: String,
    session: Session,
}

#[derive(Deserialize)]
struct ListResponse<T> {
    value: Vec<T>,
    #[serde(rename = "@odata.nextLink", default)]
    next_link: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphNamed {
    id: String,
    display_name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphMember {
    display_name: String,
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

impl GraphDirectory {
    pub fn new(api_url: impl Into<String>, session: Session) -> Self {
        Self::with_client(reqwest::Client::new(), api_url, session)
    }

    pub fn with_client(client: reqwest::Client, api_url: impl Into<String>, session: Session) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self { client, api_url, session }
    }

    /// GET a collection, following `@odata.nextLink` pages.
    async fn list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, DirectoryError> {
        let mut items = Vec::new();
        let mut next = Some(format!("{}{}", self.api_url, path));
        while let Some(url) = next.take() {
            let response = self
                .client
                .get(&url)
                .bearer_auth(self.session.token())
                .send()
                .await
                .map_err(|source| DirectoryError::Http { url: url.clone(), source })?;
            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(DirectoryError::Status { url, status: status.as_u16(), body });
            }
            let page: ListResponse<T> = response
                .json()
                .await
                .map_err(|source| DirectoryError::Http { url: url.clone(), source })?;
            items.extend(page.value);
            next = page.next_link;
        }
        Ok(items)
    }
}

#[async_trait]
impl Directory for GraphDirectory {
    async fn team(&self, name: &str) -> Result<Team, DirectoryError> {
        let teams: Vec<GraphNamed> = self.list("/me/joinedTeams").await?;
        teams
            .into_iter()
            .find(|t| t.display_name == name)
            .map(|t| Team { id: t.id, display_name: t.display_name })
            .ok_or_else(|| DirectoryError::TeamNotFound(name.to_string()))
    }

    async fn channel(&self, team: &Team, name: &str) -> Result<Channel, DirectoryError> {
        let channels: Vec<GraphNamed> = self.list(&format!("/teams/{}/channels", team.id)).await?;
        channels
            .into_iter()
            .find(|c| c.display_name == name)
            .map(|c| Channel {
                team_id: team.id.clone(),
                channel_id: c.id,
                bearer_token: self.session.token().to_string(),
            })
            .ok_or_else(|| DirectoryError::ChannelNotFound {
                team: team.display_name.clone(),
                channel: name.to_string(),
            })
    }

    async fn member(&self, team: &Team, email: &str) -> Result<Member, DirectoryError> {
        let members: Vec<GraphMember> = self.list(&format!("/teams/{}/members", team.id)).await?;
        members
            .into_iter()
            .find(|m| m.email.as_deref() == Some(email))
            .and_then(|m| {
                let user_id = m.user_id?;
                Some(Member { display_name: m.display_name, user_id })
            })
            .ok_or_else(|| DirectoryError::MemberNotFound {
                team: team.display_name.clone(),
                email: email.to_string(),
            })
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{Channel, Directory, DirectoryError, Member, Team};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::Arc;

    struct FakeTeam {
        id: String,
        channels: HashMap<String, String>,
        members: HashMap<String, Member>,
    }

    struct FakeDirectoryState {
        token: String,
        teams: HashMap<String, FakeTeam>,
        member_lookups: Vec<String>,
    }

    /// In-memory directory for testing
    #[derive(Clone)]
    pub struct FakeDirectory {
        inner: Arc<Mutex<FakeDirectoryState>>,
    }

    impl Default for FakeDirectory {
        fn default() -> Self {
            Self {
                inner: Arc::new(Mutex::new(FakeDirectoryState {
                    token: "fake-token".to_string(),
                    teams: HashMap::new(),
                    member_lookups: Vec::new(),
                })),
            }
        }
    }

    impl FakeDirectory {
        pub fn new() -> Self {
            Self::default()
        }

        /// Add a team (id `team-{name}`) with one channel (id `chan-{channel}`)
        pub fn with_channel(self, team: &str, channel: &str) -> Self {
            {
                let mut inner = self.inner.lock();
                let entry = inner.teams.entry(team.to_string()).or_insert_with(|| FakeTeam {
                    id: format!("team-{team}"),
                    channels: HashMap::new(),
                    members: HashMap::new(),
                });
                entry.channels.insert(channel.to_string(), format!("chan-{channel}"));
            }
            self
        }

        /// Add a member to an existing team
        pub fn with_member(self, team: &str, email: &str, display_name: &str, user_id: &str) -> Self {
            if let Some(entry) = self.inner.lock().teams.get_mut(team) {
                entry.members.insert(
                    email.to_string(),
                    Member { display_name: display_name.to_string(), user_id: user_id.to_string() },
                );
            }
            self
        }

        pub fn with_token(self, token: &str) -> Self {
            self.inner.lock().token = token.to_string();
            self
        }

        /// Emails looked up so far, in order
        pub fn member_lookups(&self) -> Vec<String> {
            self.inner.lock().member_lookups.clone()
        }
    }

    #[async_trait]
    impl Directory for FakeDirectory {
        async fn team(&self, name: &str) -> Result<Team, DirectoryError> {
            let inner = self.inner.lock();
            inner
                .teams
                .get(name)
                .map(|t| Team { id: t.id.clone(), display_name: name.to_string() })
                .ok_or_else(|| DirectoryError::TeamNotFound(name.to_string()))
        }

        async fn channel(&self, team: &Team, name: &str) -> Result<Channel, DirectoryError> {
            let inner = self.inner.lock();
            inner
                .teams
                .get(&team.display_name)
                .and_then(|t| t.channels.get(name))
                .map(|channel_id| Channel {
                    team_id: team.id.clone(),
                    channel_id: channel_id.clone(),
                    bearer_token: inner.token.clone(),
                })
                .ok_or_else(|| DirectoryError::ChannelNotFound {
                    team: team.display_name.clone(),
                    channel: name.to_string(),
                })
        }

        async fn member(&self, team: &Team, email: &str) -> Result<Member, DirectoryError> {
            let mut inner = self.inner.lock();
            inner.member_lookups.push(email.to_string());
            inner
                .teams
                .get(&team.display_name)
                .and_then(|t| t.members.get(email))
                .cloned()
                .ok_or_else(|| DirectoryError::MemberNotFound {
                    team: team.display_name.clone(),
                    email: email.to_string(),
                })
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeDirectory;

#[cfg(test)]
#[path = "directory_tests.rs"]
mod tests;
