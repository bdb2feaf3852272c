//! Player session lifecycle and quality switching.
//!
//! The controller owns at most one [`PlayerSession`]. Every operation that
//! creates a session disposes the previous one first, so two players never
//! coexist.
//!
//! State per source: `Empty -> Loading(master) -> Ready`; a quality change is
//! `Ready -> Loading(variant) -> Ready` with the position carried over; a
//! teardown returns to `Empty` from anywhere.

use std::fmt;
use std::sync::Arc;

use hlsdeck_common::{Error, PlaybackSource, Result};
use serde::Serialize;
use uuid::Uuid;

use crate::backend::{Player, PlayerBackend};
use crate::options::{MediaSource, PlayerOptions, Surface};
use crate::selector::{QualityOption, QualitySelector, AUTO_LABEL};

/// Unique identifier for a player session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Coarse state of the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "url", rename_all = "snake_case")]
pub enum PlayerState {
    /// No session.
    Empty,
    /// A source was set and the player has not signalled readiness yet.
    Loading(String),
    /// The player is ready to seek and play.
    Ready,
}

/// Snapshot of the active session for display.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerStatus {
    pub session_id: SessionId,
    pub surface: Surface,
    pub source: PlaybackSource,
    pub quality: String,
    pub position: f64,
    pub paused: bool,
}

/// One live player bound to one playback source.
///
/// Dropping the session disposes its player.
struct PlayerSession {
    id: SessionId,
    surface: Surface,
    source: PlaybackSource,
    player: Box<dyn Player>,
    selector: Option<QualitySelector>,
    state: PlayerState,
}

impl PlayerSession {
    fn dispose(&mut self) {
        if !self.player.is_disposed() {
            self.player.dispose();
            tracing::debug!(session_id = %self.id, "Disposed player session");
        }
        self.state = PlayerState::Empty;
    }

    fn current_quality(&self) -> String {
        self.selector
            .as_ref()
            .map(|s| s.selected().label.clone())
            .unwrap_or_else(|| AUTO_LABEL.to_string())
    }
}

impl Drop for PlayerSession {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Presents one [`PlaybackSource`] as a playable, quality-switchable stream.
pub struct PlayerController {
    backend: Arc<dyn PlayerBackend>,
    options: PlayerOptions,
    session: Option<PlayerSession>,
}

impl PlayerController {
    /// Wait for `backend` to become ready, then build a controller on it.
    ///
    /// This is the only way to obtain a controller, so no player can be
    /// constructed before its backend has loaded.
    pub async fn load(backend: Arc<dyn PlayerBackend>) -> Result<Self> {
        Self::load_with_options(backend, PlayerOptions::default()).await
    }

    pub async fn load_with_options(
        backend: Arc<dyn PlayerBackend>,
        options: PlayerOptions,
    ) -> Result<Self> {
        backend.load().await?;
        tracing::info!(backend = backend.name(), "Player backend loaded");

        Ok(Self {
            backend,
            options,
            session: None,
        })
    }

    pub fn options(&self) -> &PlayerOptions {
        &self.options
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Bind a new player on `surface` to `source`.
    ///
    /// Any existing session is disposed before the new player is created.
    /// When the player fails to become ready the new session is discarded and
    /// the controller is left `Empty`.
    pub async fn initialize(
        &mut self,
        surface: Surface,
        source: PlaybackSource,
    ) -> Result<SessionId> {
        if !source.is_playable() {
            return Err(Error::validation("Playback source has no master playlist"));
        }

        self.teardown();

        let mut player = self.backend.create(&surface, &self.options)?;
        player.set_source(MediaSource::hls(source.master_url.clone()))?;

        let id = SessionId::new();
        tracing::info!(
            session_id = %id,
            surface = %surface.id,
            video_id = %source.video_id,
            master_url = %source.master_url,
            "Loading playback source"
        );

        self.session = Some(PlayerSession {
            id,
            state: PlayerState::Loading(source.master_url.clone()),
            selector: None,
            surface,
            source,
            player,
        });

        let ready = match self.session.as_mut() {
            Some(session) => session.player.ready().await,
            None => Ok(()),
        };
        if let Err(e) = ready {
            tracing::warn!(session_id = %id, "Player failed to load source: {}", e);
            self.teardown();
            return Err(e);
        }

        if let Some(session) = self.session.as_mut() {
            session.state = PlayerState::Ready;
            session.selector = QualitySelector::for_source(&session.source, &session.surface);
            if let Some(ref selector) = session.selector {
                tracing::debug!(
                    session_id = %id,
                    options = selector.options().len(),
                    "Attached quality selector"
                );
            }
        }

        Ok(id)
    }

    /// Switch to the option named `label` ("Auto" or a quality label) while
    /// keeping the playback position and play/pause state.
    pub async fn switch_quality(&mut self, label: &str) -> Result<QualityOption> {
        let session = self
            .session
            .as_mut()
            .ok_or_else(|| Error::validation("No video is loaded"))?;

        let url = match session.selector.as_ref() {
            Some(selector) => selector
                .resolve(label)
                .map(|(_, option)| option.url.clone())
                .ok_or_else(|| Error::validation(format!("Unknown quality: {}", label)))?,
            None => {
                return Err(Error::validation(
                    "This video only supports automatic quality",
                ))
            }
        };

        let id = session.id;
        let position = session.player.current_time();
        let was_playing = !session.player.paused();

        session.player.set_source(MediaSource::hls(url.clone()))?;
        session.state = PlayerState::Loading(url);

        if let Err(e) = session.player.ready().await {
            tracing::warn!(session_id = %id, quality = label, "Quality switch failed: {}", e);
            self.teardown();
            return Err(e);
        }

        let session = self
            .session
            .as_mut()
            .ok_or_else(|| Error::validation("No video is loaded"))?;

        session.player.seek(position)?;
        if was_playing {
            session.player.play()?;
        }
        session.state = PlayerState::Ready;

        tracing::info!(
            session_id = %id,
            quality = label,
            position,
            resumed = was_playing,
            "Switched quality"
        );

        match session.selector.as_mut() {
            Some(selector) => selector.select(label).cloned(),
            None => Err(Error::validation(format!("Unknown quality: {}", label))),
        }
    }

    /// Dispose the active session. Safe to call without one.
    pub fn teardown(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.dispose();
            tracing::info!(session_id = %session.id, "Playback stopped");
        }
    }

    pub fn play(&mut self) -> Result<()> {
        self.ready_player()?.play()
    }

    pub fn pause(&mut self) -> Result<()> {
        self.ready_player()?.pause();
        Ok(())
    }

    pub fn seek(&mut self, position: f64) -> Result<()> {
        if position < 0.0 || !position.is_finite() {
            return Err(Error::validation(format!("Invalid position: {}", position)));
        }
        self.ready_player()?.seek(position)
    }

    pub fn set_playback_rate(&mut self, rate: f64) -> Result<()> {
        if !self.options.allows_rate(rate) {
            return Err(Error::validation(format!(
                "Unsupported playback rate: {}",
                rate
            )));
        }
        self.ready_player()?.set_playback_rate(rate)
    }

    /// Re-layout the quality selector for a resized surface.
    pub fn resize(&mut self, width: u32, height: u32) {
        if let Some(session) = self.session.as_mut() {
            session.surface.width = width;
            session.surface.height = height;
            if let Some(selector) = session.selector.as_mut() {
                selector.relayout(&session.surface);
            }
        }
    }

    pub fn state(&self) -> PlayerState {
        self.session
            .as_ref()
            .map(|s| s.state.clone())
            .unwrap_or(PlayerState::Empty)
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session_id(&self) -> Option<SessionId> {
        self.session.as_ref().map(|s| s.id)
    }

    pub fn source(&self) -> Option<&PlaybackSource> {
        self.session.as_ref().map(|s| &s.source)
    }

    /// Whether the active source belongs to the asset `video_id`.
    pub fn is_playing_video(&self, video_id: &str) -> bool {
        self.source().map(|s| s.video_id == video_id).unwrap_or(false)
    }

    pub fn selector(&self) -> Option<&QualitySelector> {
        self.session.as_ref().and_then(|s| s.selector.as_ref())
    }

    pub fn status(&self) -> Option<PlayerStatus> {
        self.session.as_ref().map(|s| PlayerStatus {
            session_id: s.id,
            surface: s.surface.clone(),
            source: s.source.clone(),
            quality: s.current_quality(),
            position: s.player.current_time(),
            paused: s.player.paused(),
        })
    }

    fn ready_player(&mut self) -> Result<&mut Box<dyn Player>> {
        match self.session.as_mut() {
            Some(session) if session.state == PlayerState::Ready => Ok(&mut session.player),
            Some(_) => Err(Error::validation("The video is still loading")),
            None => Err(Error::validation("No video is loaded")),
        }
    }
}
