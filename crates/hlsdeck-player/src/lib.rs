//! Hlsdeck-Player: adaptive HLS playback with a manual quality selector.
//!
//! This crate owns the lifecycle of the single active player session:
//!
//! - **Backends**: [`PlayerBackend`] abstracts the HLS-capable player. The
//!   backend must report readiness ([`PlayerController::load`]) before any
//!   player is constructed.
//! - **Controller**: [`PlayerController`] binds one [`PlaybackSource`] to one
//!   player at a time and switches quality without losing the playback
//!   position.
//! - **Selector**: [`QualitySelector`] is the declarative model of the
//!   "Auto / 360p / 720p ..." control, laid out by [`OverlayStyle`].
//!
//! # Examples
//!
//! ```
//! use hlsdeck_common::PlaybackSource;
//! use hlsdeck_player::{HeadlessBackend, PlayerController, PlayerState, Surface};
//! use std::sync::Arc;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let backend = Arc::new(HeadlessBackend::new());
//! let mut controller = PlayerController::load(backend).await.unwrap();
//!
//! let source = PlaybackSource::new("https://cdn.example/v/master.m3u8", "v", "v")
//!     .with_variant("720p", "https://cdn.example/v/720p.m3u8");
//! controller.initialize(Surface::default(), source).await.unwrap();
//! assert_eq!(controller.state(), PlayerState::Ready);
//!
//! controller.switch_quality("720p").await.unwrap();
//! controller.teardown();
//! assert_eq!(controller.state(), PlayerState::Empty);
//! # });
//! ```
//!
//! [`PlaybackSource`]: hlsdeck_common::PlaybackSource

pub mod backend;
pub mod controller;
pub mod headless;
pub mod options;
pub mod process;
pub mod selector;

pub use backend::{Player, PlayerBackend};
pub use controller::{PlayerController, PlayerState, PlayerStatus, SessionId};
pub use headless::{HeadlessBackend, PlayerEvent};
pub use options::{MediaSource, PlayerOptions, Surface, HLS_MIME_TYPE};
pub use process::ProcessBackend;
pub use selector::{OverlayStyle, QualityOption, QualitySelector, AUTO_LABEL};
