// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Blob storage for run outputs.

use async_trait::async_trait;
use reqwest::StatusCode;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{0} already exists (re-run with forced to overwrite)")]
    AlreadyExists(String),
    #[error("upload of {path} returned {status}: {body}")]
    Rejected { path: String, status: u16, body: String },
    #[error("upload of {path} failed: {source}")]
    Http {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Adapter for persisting run outputs
#[async_trait]
pub trait StorageAdapter: Clone + Send + Sync + 'static {
    /// Store `object` at `path` inside the container.
    ///
    /// Without `forced`, an existing object at `path` is an error.
    async fn store_object(
        &self,
        object: Vec<u8>,
        path: &str,
        container_url: &str,
        forced: bool,
    ) -> Result<(), StorageError>;

    /// Store every file under `local` beneath `remote`, keeping relative paths.
    async fn store_folder(
        &self,
        local: &Path,
        remote: &str,
        container_url: &str,
        forced: bool,
    ) -> Result<(), StorageError>;
}

/// Block-blob storage over HTTP, authorized by an optional SAS query string.
#[derive(Clone, Debug, Default)]
pub struct BlobStorage {
    client: reqwest::Client,
    sas: Option<String>,
}

impl BlobStorage {
    pub fn new(sas: Option<String>) -> Self {
        Self { client: reqwest::Client::new(), sas }
    }

    pub fn with_client(client: reqwest::Client, sas: Option<String>) -> Self {
        Self { client, sas }
    }

    fn blob_url(&self, container_url: &str, path: &str) -> String {
        let base = format!("{}/{}", container_url.trim_end_matches('/'), path.trim_start_matches('/'));
        match self.sas.as_deref().map(|s| s.trim_start_matches('?')) {
            Some(sas) if !sas.is_empty() => format!("{base}?{sas}"),
            _ => base,
        }
    }
}

#[async_trait]
impl StorageAdapter for BlobStorage {
    async fn store_object(
        &self,
        object: Vec<u8>,
        path: &str,
        container_url: &str,
        forced: bool,
    ) -> Result<(), StorageError> {
        let url = self.blob_url(container_url, path);
        tracing::info!(%path, bytes = object.len(), forced, "uploading blob");

        let mut request = self
            .client
            .put(&url)
            .header("x-ms-blob-type", "BlockBlob")
            .header("x-ms-version", "2021-08-06")
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(object);
        if !forced {
            request = request.header(reqwest::header::IF_NONE_MATCH, "*");
        }

        let response = request
            .send()
            .await
            .map_err(|source| StorageError::Http { path: path.to_string(), source })?;
        let status = response.status();
        match status {
            s if s.is_success() => Ok(()),
            StatusCode::CONFLICT | StatusCode::PRECONDITION_FAILED => {
                Err(StorageError::AlreadyExists(path.to_string()))
            }
            _ => Err(StorageError::Rejected {
                path: path.to_string(),
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            }),
        }
    }

    async fn store_folder(
        &self,
        local: &Path,
        remote: &str,
        container_url: &str,
        forced: bool,
    ) -> Result<(), StorageError> {
        let files = list_files(local).await?;
        tracing::info!(local = %local.display(), %remote, files = files.len(), "uploading folder");
        for (relative, file) in files {
            let bytes = tokio::fs::read(&file)
                .await
                .map_err(|source| StorageError::Io { path: file.clone(), source })?;
            let path = format!("{}/{}", remote.trim_end_matches('/'), relative);
            self.store_object(bytes, &path, container_url, forced).await?;
        }
        Ok(())
    }
}

/// Every file under `root` as `(slash-separated relative path, absolute path)`,
/// sorted by relative path.
pub async fn list_files(root: &Path) -> Result<Vec<(String, PathBuf)>, StorageError> {
    let mut files = Vec::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let io_err = |source| StorageError::Io { path: dir.clone(), source };
        let mut entries = tokio::fs::read_dir(&dir).await.map_err(io_err)?;
        while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
            let path = entry.path();
            if entry.file_type().await.map_err(io_err)?.is_dir() {
                pending.push(path);
                continue;
            }
            let relative = path
                .strip_prefix(root)
                .unwrap_or(&path)
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            files.push((relative, path));
        }
    }
    files.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(files)
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{StorageAdapter, StorageError};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    /// Recorded storage call
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum StoreCall {
        Object { path: String, bytes: Vec<u8>, container_url: String, forced: bool },
        Folder { local: PathBuf, remote: String, container_url: String, forced: bool },
    }

    impl StoreCall {
        /// Remote path written by this call
        pub fn path(&self) -> &str {
            match self {
                StoreCall::Object { path, .. } => path,
                StoreCall::Folder { remote, .. } => remote,
            }
        }
    }

    #[derive(Default)]
    struct FakeStorageState {
        calls: Vec<StoreCall>,
        fail_on: Option<String>,
    }

    /// Fake storage for testing
    #[derive(Clone, Default)]
    pub struct FakeStorage {
        inner: Arc<Mutex<FakeStorageState>>,
    }

    impl FakeStorage {
        pub fn new() -> Self {
            Self::default()
        }

        /// Reject the upload whose remote path is `path`
        pub fn fail_on(self, path: &str) -> Self {
            self.inner.lock().fail_on = Some(path.to_string());
            self
        }

        /// Get all recorded calls, including the rejected one
        pub fn calls(&self) -> Vec<StoreCall> {
            self.inner.lock().calls.clone()
        }

        /// Remote paths written, in order
        pub fn paths(&self) -> Vec<String> {
            self.inner.lock().calls.iter().map(|c| c.path().to_string()).collect()
        }

        fn record(&self, call: StoreCall) -> Result<(), StorageError> {
            let mut inner = self.inner.lock();
            let path = call.path().to_string();
            inner.calls.push(call);
            if inner.fail_on.as_deref() == Some(path.as_str()) {
                return Err(StorageError::Rejected { path, status: 500, body: "injected".into() });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl StorageAdapter for FakeStorage {
        async fn store_object(
            &self,
            object: Vec<u8>,
            path: &str,
            container_url: &str,
            forced: bool,
        ) -> Result<(), StorageError> {
            self.record(StoreCall::Object {
                path: path.to_string(),
                bytes: object,
                container_url: container_url.to_string(),
                forced,
            })
        }

        async fn store_folder(
            &self,
            local: &Path,
            remote: &str,
            container_url: &str,
            forced: bool,
        ) -> Result<(), StorageError> {
            self.record(StoreCall::Folder {
                local: local.to_path_buf(),
                remote: remote.to_string(),
                container_url: container_url.to_string(),
                forced,
            })
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeStorage, StoreCall};

#[cfg(test)]
#[path = "storage_tests.rs"]
mod tests;
