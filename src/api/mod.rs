//! HTTP client for the transcoding service.
//!
//! Three endpoints under `{base_url}/api/v1/videos`:
//!
//! - `POST /hls-upload` - multipart upload (`video`, `userId`), returns a
//!   playback source
//! - `GET /` - list the caller's uploaded videos
//! - `GET /delete/{id}` - delete one video (a GET, as the service expects)
//!
//! Every request carries the caller's identity as a bearer token. A response
//! with `success: false` becomes [`Error::ServerRejected`] carrying the
//! server's message; anything that prevents reading a response becomes
//! [`Error::Transport`].

mod types;

pub use types::*;

use std::fmt;
use std::time::Duration;

use hlsdeck_common::{CatalogEntry, Error, PlaybackSource, Result};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::config::ApiConfig;
use crate::upload::SelectedFile;

const API_PREFIX: &str = "/api/v1/videos";

/// Bearer identity supplied by the authentication provider.
#[derive(Clone, PartialEq, Eq)]
pub struct Identity(String);

impl Identity {
    /// `None` for blank input.
    pub fn new<S: Into<String>>(token: S) -> Option<Self> {
        let token = token.into().trim().to_string();
        (!token.is_empty()).then_some(Self(token))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Keep tokens out of logs.
impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Identity(***)")
    }
}

/// Client for the transcoding service.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build HTTP client with timeout: {}", e);
                Client::new()
            });

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, path)
    }

    /// Upload `file` for transcoding. Resolves once the service has produced
    /// the HLS renditions.
    pub async fn upload(&self, file: &SelectedFile, identity: &Identity) -> Result<PlaybackSource> {
        let bytes = tokio::fs::read(&file.path).await?;
        tracing::info!(
            file = %file.name,
            size_bytes = file.size_bytes,
            media_type = %file.media_type,
            "Uploading video"
        );

        let part = Part::bytes(bytes)
            .file_name(file.name.clone())
            .mime_str(&file.media_type)
            .map_err(|e| Error::validation(format!("Invalid media type: {}", e)))?;
        let form = Form::new()
            .part("video", part)
            .text("userId", identity.as_str().to_string());

        let response = self
            .client
            .post(self.url("/hls-upload"))
            .bearer_auth(identity.as_str())
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;

        let body: UploadResponse = decode(response).await?;
        if !body.success {
            return Err(Error::rejected(
                body.message.unwrap_or_else(|| "Upload failed".to_string()),
            ));
        }

        body.data.ok_or_else(|| {
            Error::rejected(
                body.message
                    .unwrap_or_else(|| "Upload response contained no video data".to_string()),
            )
        })
    }

    /// List every video uploaded by `identity`.
    pub async fn list_videos(&self, identity: &Identity) -> Result<Vec<CatalogEntry>> {
        let response = self
            .client
            .get(self.url("/"))
            .bearer_auth(identity.as_str())
            .send()
            .await
            .map_err(transport)?;

        let body: CatalogResponse = decode(response).await?;
        if !body.success {
            return Err(Error::rejected(
                body.message
                    .unwrap_or_else(|| "Failed to load videos".to_string()),
            ));
        }

        Ok(body.videos.unwrap_or_default())
    }

    /// Delete the video `id`.
    pub async fn delete_video(&self, id: &str, identity: &Identity) -> Result<()> {
        // TODO: switch to DELETE once the service accepts it; it only routes GET today.
        let response = self
            .client
            .get(self.url(&format!("/delete/{}", id)))
            .bearer_auth(identity.as_str())
            .send()
            .await
            .map_err(transport)?;

        let body: DeleteResponse = decode(response).await?;
        if !body.success {
            return Err(Error::rejected(
                body.message
                    .unwrap_or_else(|| "Failed to delete video".to_string()),
            ));
        }

        Ok(())
    }
}

fn transport(e: reqwest::Error) -> Error {
    Error::transport(e.to_string())
}

/// Decode a JSON envelope. Error statuses are still decoded when the body is
/// JSON, so the server's own message reaches the user.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let text = response.text().await.map_err(transport)?;

    serde_json::from_str(&text).map_err(|e| {
        tracing::debug!(%status, "Undecodable response body: {}", e);
        if status.is_success() {
            Error::transport(format!("invalid response from server: {}", e))
        } else {
            Error::transport(format!("server returned {}", status))
        }
    })
}
