//! Hlsdeck - upload, browse and play back HLS-transcoded videos
//!
//! This library crate exposes the core functionality for integration testing.

pub mod api;
pub mod app;
pub mod catalog;
pub mod config;
pub mod devmode;
pub mod upload;
