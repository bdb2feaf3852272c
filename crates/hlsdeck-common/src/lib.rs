//! Hlsdeck-Common: Shared types, errors, and utilities.
//!
//! This crate provides common functionality used across hlsdeck:
//!
//! - **Core Types**: Playback sources, quality labels, and catalog entries as
//!   exchanged with the transcoding service
//! - **Path Utilities**: Functions to derive a declared media type from a file
//! - **Error Handling**: The error kinds surfaced to users and a result alias
//!
//! # Examples
//!
//! ```
//! use hlsdeck_common::{Error, PlaybackSource, QualityLabel, Result};
//! use hlsdeck_common::paths::media_type_for_path;
//! use std::path::Path;
//!
//! let source = PlaybackSource::new("https://cdn.example/a/master.m3u8", "a", "a");
//! assert!(source.variant_urls.is_empty());
//!
//! assert_eq!(media_type_for_path(Path::new("clip.mp4")), Some("video/mp4"));
//! assert_eq!(QualityLabel::from("720p").as_str(), "720p");
//!
//! fn example() -> Result<()> {
//!     Err(Error::validation("Please select a video file first"))
//! }
//! assert!(example().is_err());
//! ```

pub mod error;
pub mod paths;
pub mod types;

pub use error::{Error, Result};
pub use types::*;
