//! Developer helpers: play a pasted API response or a built-in sample
//! without uploading anything.

use hlsdeck_common::{Error, PlaybackSource, Result};

use crate::api::UploadResponse;

const SAMPLE_BASE: &str = "https://demo.unified-streaming.com/k8s/features/stable/video/tears-of-steel";

/// The public tears-of-steel demo stream with three variants.
pub fn sample_source() -> PlaybackSource {
    PlaybackSource::new(
        format!("{}/tears-of-steel.ism/.m3u8", SAMPLE_BASE),
        "sample-test-video-id-12345",
        "test_videos/sample-video-path",
    )
    .with_variant("360p", format!("{}/tears-of-steel-360p.ism/.m3u8", SAMPLE_BASE))
    .with_variant("480p", format!("{}/tears-of-steel-480p.ism/.m3u8", SAMPLE_BASE))
    .with_variant("720p", format!("{}/tears-of-steel-720p.ism/.m3u8", SAMPLE_BASE))
}

/// Parse a pasted upload response of the form
/// `{"success": true, "data": {...}}`.
pub fn parse_pasted_response(text: &str) -> Result<PlaybackSource> {
    if text.trim().is_empty() {
        return Err(Error::validation("Please paste a response first"));
    }

    // Syntax first, so malformed JSON and a wrong shape report differently.
    serde_json::from_str::<serde::de::IgnoredAny>(text)
        .map_err(|_| Error::validation("Invalid JSON format"))?;

    let response: UploadResponse =
        serde_json::from_str(text).map_err(|_| Error::validation("Invalid response format"))?;

    match response.data {
        Some(source) if response.success && source.is_playable() => Ok(source),
        _ => Err(Error::validation("Invalid response format")),
    }
}
