//! Artifact fetcher
//!
//! Makes sure a model artifact is present on local disk, downloading it once
//! when it is missing. Presence is the only check: an existing file is never
//! re-validated or refreshed.

use crate::error::FetchError;
use std::path::{Path, PathBuf};
use tracing::info;

/// Outcome of [`ArtifactFetcher::ensure`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fetched {
    /// The destination existed already; nothing was requested.
    AlreadyPresent,
    /// The artifact was downloaded and written to the destination.
    Downloaded { bytes: u64 },
}

/// Downloads artifacts over HTTP(S).
#[derive(Debug, Clone, Default)]
pub struct ArtifactFetcher {
    client: reqwest::Client,
}

impl ArtifactFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured client (proxies, timeouts, custom roots).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Ensure `dest` holds the artifact served at `url`.
    ///
    /// The body is written to a sibling `.part` file first and renamed into
    /// place, so a failed download never leaves a file at `dest`.
    pub async fn ensure(&self, url: &str, dest: &Path) -> Result<Fetched, FetchError> {
        if dest.exists() {
            info!("Artifact {} already present, skipping download", dest.display());
            return Ok(Fetched::AlreadyPresent);
        }

        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| FetchError::Io(parent.to_path_buf(), e))?;
        }

        info!("Downloading {} -> {}", url, dest.display());
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Http {
                url: url.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|source| FetchError::Http {
            url: url.to_string(),
            source,
        })?;

        let partial = partial_path(dest);
        tokio::fs::write(&partial, &body)
            .await
            .map_err(|e| FetchError::Io(partial.clone(), e))?;
        tokio::fs::rename(&partial, dest)
            .await
            .map_err(|e| FetchError::Io(dest.to_path_buf(), e))?;

        let bytes = body.len() as u64;
        info!("Downloaded {} bytes to {}", bytes, dest.display());
        Ok(Fetched::Downloaded { bytes })
    }
}

fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    dest.with_file_name(name)
}
