// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Outbound HTTP transport for channel messages.

use async_trait::async_trait;
use thiserror::Error;

/// Errors from the transport itself (no HTTP response was received)
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("send failed: {0}")]
    SendFailed(String),
}

/// Status and body of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    /// The messaging API answers 200 or 201 on a posted message.
    pub fn is_delivered(&self) -> bool {
        matches!(self.status, 200 | 201)
    }
}

/// Adapter for posting JSON to the messaging platform
#[async_trait]
pub trait ChannelTransport: Clone + Send + Sync + 'static {
    /// POST `body` as JSON to `url` with a bearer token.
    ///
    /// Any HTTP status is returned as a reply; only transport failures are errors.
    async fn post_json(&self, url: &str, token: &str, body: String)
        -> Result<HttpReply, TransportError>;
}

/// Transport backed by a shared reqwest client.
#[derive(Clone, Debug, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ChannelTransport for HttpTransport {
    async fn post_json(
        &self,
        url: &str,
        token: &str,
        body: String,
    ) -> Result<HttpReply, TransportError> {
        tracing::debug!(%url, bytes = body.len(), "posting message");
        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| TransportError::SendFailed(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Ok(HttpReply { status, body })
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{ChannelTransport, HttpReply, TransportError};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Recorded post
    #[derive(Debug, Clone)]
    pub struct PostCall {
        pub url: String,
        pub token: String,
        pub body: String,
    }

    struct FakeTransportState {
        calls: Vec<PostCall>,
        reply: HttpReply,
        unreachable: Option<String>,
    }

    /// Fake transport for testing; answers every post with a fixed reply
    #[derive(Clone)]
    pub struct FakeTransport {
        inner: Arc<Mutex<FakeTransportState>>,
    }

    impl Default for FakeTransport {
        fn default() -> Self {
            Self {
                inner: Arc::new(Mutex::new(FakeTransportState {
                    calls: Vec::new(),
                    reply: HttpReply { status: 201, body: "{}".to_string() },
                    unreachable: None,
                })),
            }
        }
    }

    impl FakeTransport {
        pub fn new() -> Self {
            Self::default()
        }

        /// Answer posts with `status` and `body`
        pub fn reply_with(&self, status: u16, body: &str) {
            self.inner.lock().reply = HttpReply { status, body: body.to_string() };
        }

        /// Fail posts as if the host could not be reached
        pub fn set_unreachable(&self, error: &str) {
            self.inner.lock().unreachable = Some(error.to_string());
        }

        /// Get all recorded posts
        pub fn calls(&self) -> Vec<PostCall> {
            self.inner.lock().calls.clone()
        }
    }

    #[async_trait]
    impl ChannelTransport for FakeTransport {
        async fn post_json(
            &self,
            url: &str,
            token: &str,
            body: String,
        ) -> Result<HttpReply, TransportError> {
            let mut inner = self.inner.lock();
            inner.calls.push(PostCall { url: url.to_string(), token: token.to_string(), body });
            match &inner.unreachable {
                Some(error) => Err(TransportError::SendFailed(error.clone())),
                None => Ok(inner.reply.clone()),
            }
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeTransport, PostCall};

#[cfg(test)]
#[path = "transport_tests.rs"]
mod tests;
