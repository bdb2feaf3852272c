use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub player: PlayerConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Base URL of the transcoding service (without the `/api/v1` prefix)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds. Uploads wait for transcoding to finish,
    /// so this is generous by default.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_timeout() -> u64 {
    600
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Bearer identity issued by the authentication provider
    #[serde(default)]
    pub token: Option<String>,

    /// Environment variable consulted before `token`
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

fn default_token_env() -> String {
    "HLSDECK_TOKEN".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token: None,
            token_env: default_token_env(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayerConfig {
    /// Player program; searched on PATH (mpv, ffplay, vlc) when unset
    #[serde(default)]
    pub program: Option<PathBuf>,

    /// Extra arguments passed before the player's own arguments
    #[serde(default)]
    pub args: Vec<String>,

    #[serde(default = "default_width")]
    pub width: u32,

    #[serde(default = "default_height")]
    pub height: u32,

    #[serde(default = "default_playback_rates")]
    pub playback_rates: Vec<f64>,
}

fn default_width() -> u32 {
    1280
}

fn default_height() -> u32 {
    720
}

fn default_playback_rates() -> Vec<f64> {
    vec![0.5, 1.0, 1.5, 2.0]
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            program: None,
            args: Vec::new(),
            width: default_width(),
            height: default_height(),
            playback_rates: default_playback_rates(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// Quality labels matched against catalog file URLs, in selector order
    #[serde(default = "default_quality_labels")]
    pub quality_labels: Vec<String>,
}

fn default_quality_labels() -> Vec<String> {
    hlsdeck_common::DEFAULT_QUALITY_LABELS
        .iter()
        .map(|l| l.to_string())
        .collect()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            quality_labels: default_quality_labels(),
        }
    }
}
