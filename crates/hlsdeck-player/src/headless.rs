//! Headless player backend.
//!
//! Simulates a player without rendering anything: sources, seeks and play
//! state are tracked in memory and every call is recorded as a
//! [`PlayerEvent`]. Used by `hlsdeck play --headless` and by tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use hlsdeck_common::{Error, Result};
use parking_lot::Mutex;

use crate::backend::{Player, PlayerBackend};
use crate::options::{MediaSource, PlayerOptions, Surface};

/// A call observed by a headless player.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    Created {
        surface: String,
        options: PlayerOptions,
    },
    SetSource(MediaSource),
    Ready,
    Seek(f64),
    Play,
    Pause,
    PlaybackRate(f64),
    Disposed,
}

#[derive(Debug, Default)]
struct Shared {
    events: Mutex<Vec<PlayerEvent>>,
    created: AtomicUsize,
    live: AtomicUsize,
}

impl Shared {
    fn record(&self, event: PlayerEvent) {
        self.events.lock().push(event);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Failure {
    None,
    Load,
    Ready,
}

/// In-memory [`PlayerBackend`].
pub struct HeadlessBackend {
    shared: Arc<Shared>,
    loaded: AtomicBool,
    failure: Failure,
    failure_message: String,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared::default()),
            loaded: AtomicBool::new(false),
            failure: Failure::None,
            failure_message: String::new(),
        }
    }

    /// A backend whose `load` fails with `message`.
    pub fn failing_load<S: Into<String>>(message: S) -> Self {
        Self {
            failure: Failure::Load,
            failure_message: message.into(),
            ..Self::new()
        }
    }

    /// A backend whose players never become ready.
    pub fn failing_ready() -> Self {
        Self {
            failure: Failure::Ready,
            failure_message: "stream could not be loaded".to_string(),
            ..Self::new()
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::SeqCst)
    }

    /// Number of players created so far.
    pub fn created(&self) -> usize {
        self.shared.created.load(Ordering::SeqCst)
    }

    /// Number of players created and not yet disposed.
    pub fn live(&self) -> usize {
        self.shared.live.load(Ordering::SeqCst)
    }

    /// Every event recorded by every player of this backend, in order.
    pub fn events(&self) -> Vec<PlayerEvent> {
        self.shared.events.lock().clone()
    }
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlayerBackend for HeadlessBackend {
    fn name(&self) -> &str {
        "headless"
    }

    async fn load(&self) -> Result<()> {
        if self.failure == Failure::Load {
            return Err(Error::player(self.failure_message.clone()));
        }
        self.loaded.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn create(&self, surface: &Surface, options: &PlayerOptions) -> Result<Box<dyn Player>> {
        if !self.is_loaded() {
            return Err(Error::player("headless backend used before it was loaded"));
        }

        self.shared.created.fetch_add(1, Ordering::SeqCst);
        self.shared.live.fetch_add(1, Ordering::SeqCst);
        self.shared.record(PlayerEvent::Created {
            surface: surface.id.clone(),
            options: options.clone(),
        });

        Ok(Box::new(HeadlessPlayer {
            shared: self.shared.clone(),
            fail_ready: (self.failure == Failure::Ready).then(|| self.failure_message.clone()),
            source: None,
            position: 0.0,
            playing: false,
            rate: 1.0,
            disposed: false,
        }))
    }
}

struct HeadlessPlayer {
    shared: Arc<Shared>,
    fail_ready: Option<String>,
    source: Option<MediaSource>,
    position: f64,
    playing: bool,
    rate: f64,
    disposed: bool,
}

impl HeadlessPlayer {
    fn ensure_live(&self) -> Result<()> {
        if self.disposed {
            Err(Error::player("player has been disposed"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Player for HeadlessPlayer {
    fn set_source(&mut self, source: MediaSource) -> Result<()> {
        self.ensure_live()?;
        // A new source starts from the beginning, paused.
        self.position = 0.0;
        self.playing = false;
        self.shared.record(PlayerEvent::SetSource(source.clone()));
        self.source = Some(source);
        Ok(())
    }

    async fn ready(&mut self) -> Result<()> {
        self.ensure_live()?;
        if let Some(ref message) = self.fail_ready {
            return Err(Error::player(message.clone()));
        }
        if self.source.is_none() {
            return Err(Error::player("no source set"));
        }
        self.shared.record(PlayerEvent::Ready);
        Ok(())
    }

    fn current_time(&self) -> f64 {
        self.position
    }

    fn seek(&mut self, position: f64) -> Result<()> {
        self.ensure_live()?;
        self.position = position;
        self.shared.record(PlayerEvent::Seek(position));
        Ok(())
    }

    fn paused(&self) -> bool {
        !self.playing
    }

    fn play(&mut self) -> Result<()> {
        self.ensure_live()?;
        self.playing = true;
        self.shared.record(PlayerEvent::Play);
        Ok(())
    }

    fn pause(&mut self) {
        if !self.disposed {
            self.playing = false;
            self.shared.record(PlayerEvent::Pause);
        }
    }

    fn set_playback_rate(&mut self, rate: f64) -> Result<()> {
        self.ensure_live()?;
        self.rate = rate;
        self.shared.record(PlayerEvent::PlaybackRate(rate));
        Ok(())
    }

    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.playing = false;
        self.source = None;
        self.shared.live.fetch_sub(1, Ordering::SeqCst);
        self.shared.record(PlayerEvent::Disposed);
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }
}
