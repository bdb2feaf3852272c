//! Trait definitions for player backends.
//!
//! A [`PlayerBackend`] stands in for the third-party HLS player library. It
//! must finish [`PlayerBackend::load`] before [`PlayerBackend::create`] is
//! called; [`crate::PlayerController::load`] enforces that ordering.

use async_trait::async_trait;
use hlsdeck_common::Result;

use crate::options::{MediaSource, PlayerOptions, Surface};

/// One player instance bound to a surface.
///
/// Times are in seconds.
#[async_trait]
pub trait Player: Send {
    /// Replace the current source. Playback of the old source stops.
    fn set_source(&mut self, source: MediaSource) -> Result<()>;

    /// Resolve once the current source is ready to seek and play.
    async fn ready(&mut self) -> Result<()>;

    /// Current playback position.
    fn current_time(&self) -> f64;

    /// Move the playback position.
    fn seek(&mut self, position: f64) -> Result<()>;

    fn paused(&self) -> bool;

    fn play(&mut self) -> Result<()>;

    fn pause(&mut self);

    fn set_playback_rate(&mut self, rate: f64) -> Result<()>;

    /// Release everything the player holds. Must be idempotent.
    fn dispose(&mut self);

    fn is_disposed(&self) -> bool;
}

/// Factory for [`Player`] instances.
#[async_trait]
pub trait PlayerBackend: Send + Sync {
    /// Short, lowercase identifier for this backend (e.g. `"mpv"`).
    fn name(&self) -> &str;

    /// Make the backend's dependencies available. Resolves exactly once the
    /// backend can construct players.
    async fn load(&self) -> Result<()>;

    /// Construct a player bound to `surface`.
    fn create(&self, surface: &Surface, options: &PlayerOptions) -> Result<Box<dyn Player>>;
}
