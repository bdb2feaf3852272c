use hlsdeck_common::{CatalogEntry, PlaybackSource};
use serde::{Deserialize, Serialize};

/// Response of `POST /hls-upload`. Also the shape accepted from a pasted
/// developer response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Option<PlaybackSource>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Response of `GET /`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogResponse {
    pub success: bool,
    #[serde(default)]
    pub videos: Option<Vec<CatalogEntry>>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Response of `GET /delete/{id}`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}
