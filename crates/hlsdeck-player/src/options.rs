//! Player construction options and media source descriptors.

use serde::{Deserialize, Serialize};

/// MIME type for HLS playlists.
pub const HLS_MIME_TYPE: &str = "application/x-mpegURL";

/// Playback rates offered by every player.
pub const DEFAULT_PLAYBACK_RATES: &[f64] = &[0.5, 1.0, 1.5, 2.0];

/// The surface a player renders into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Surface {
    pub id: String,
    pub width: u32,
    pub height: u32,
}

impl Surface {
    pub fn new<S: Into<String>>(id: S, width: u32, height: u32) -> Self {
        Self {
            id: id.into(),
            width,
            height,
        }
    }
}

impl Default for Surface {
    fn default() -> Self {
        Self::new("main", 1280, 720)
    }
}

/// Fixed configuration applied to every player at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerOptions {
    /// Show the player's own transport controls.
    pub controls: bool,
    /// Resize with the surface.
    pub responsive: bool,
    /// Keep the aspect ratio while filling the surface width.
    pub fluid: bool,
    /// Playback rates the user may pick from.
    pub playback_rates: Vec<f64>,
}

impl PlayerOptions {
    pub fn allows_rate(&self, rate: f64) -> bool {
        self.playback_rates
            .iter()
            .any(|r| (r - rate).abs() < f64::EPSILON)
    }
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self {
            controls: true,
            responsive: true,
            fluid: true,
            playback_rates: DEFAULT_PLAYBACK_RATES.to_vec(),
        }
    }
}

/// A URL plus the MIME type the player should treat it as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaSource {
    pub url: String,
    pub mime: String,
}

impl MediaSource {
    /// An adaptive-bitrate (HLS) stream.
    pub fn hls<S: Into<String>>(url: S) -> Self {
        Self {
            url: url.into(),
            mime: HLS_MIME_TYPE.to_string(),
        }
    }
}
