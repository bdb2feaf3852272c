//! Path utilities for deriving a file's declared media type.
//!
//! The upload workflow only accepts files whose media type is `video/*`. A
//! local file carries no declared type of its own, so it is derived from the
//! extension here.

use std::path::Path;

/// Media type prefix shared by every video type.
pub const VIDEO_MEDIA_PREFIX: &str = "video/";

/// Known extensions and the media type they declare.
const MEDIA_TYPES: &[(&str, &str)] = &[
    ("mp4", "video/mp4"),
    ("m4v", "video/x-m4v"),
    ("mov", "video/quicktime"),
    ("mkv", "video/x-matroska"),
    ("webm", "video/webm"),
    ("avi", "video/x-msvideo"),
    ("wmv", "video/x-ms-wmv"),
    ("flv", "video/x-flv"),
    ("ts", "video/mp2t"),
    ("m2ts", "video/mp2t"),
    ("mpg", "video/mpeg"),
    ("mpeg", "video/mpeg"),
    ("3gp", "video/3gpp"),
    ("ogv", "video/ogg"),
    ("mp3", "audio/mpeg"),
    ("m4a", "audio/mp4"),
    ("wav", "audio/wav"),
    ("flac", "audio/flac"),
    ("srt", "application/x-subrip"),
    ("vtt", "text/vtt"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("txt", "text/plain"),
    ("json", "application/json"),
    ("pdf", "application/pdf"),
    ("m3u8", "application/x-mpegURL"),
];

/// Fallback for unknown extensions.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Media type declared by a path's extension, if the extension is known.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use hlsdeck_common::paths::media_type_for_path;
///
/// assert_eq!(media_type_for_path(Path::new("movie.MKV")), Some("video/x-matroska"));
/// assert_eq!(media_type_for_path(Path::new("notes.txt")), Some("text/plain"));
/// assert_eq!(media_type_for_path(Path::new("unknown.xyz")), None);
/// ```
pub fn media_type_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    MEDIA_TYPES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, media_type)| *media_type)
}

/// Whether a declared media type denotes a video.
///
/// # Examples
///
/// ```
/// use hlsdeck_common::paths::is_video_media_type;
///
/// assert!(is_video_media_type("video/mp4"));
/// assert!(!is_video_media_type("audio/mpeg"));
/// ```
pub fn is_video_media_type(media_type: &str) -> bool {
    media_type.starts_with(VIDEO_MEDIA_PREFIX)
}
