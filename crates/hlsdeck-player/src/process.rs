//! External player program backend.
//!
//! Plays HLS streams by spawning an installed player (mpv, ffplay or VLC).
//! The program is located once during [`PlayerBackend::load`]; a configured
//! path wins over a `PATH` lookup.
//!
//! The child process only runs while playing. Pausing stops it and remembers
//! the position; playing again respawns it with a start offset, which is also
//! how seeks and source switches take effect. A child that exits on its own
//! counts as paused at the position where the exit was noticed.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::OnceLock;
use std::time::Instant;

use async_trait::async_trait;
use hlsdeck_common::{Error, Result};
use parking_lot::Mutex;
use tokio::process::{Child, Command};

use crate::backend::{Player, PlayerBackend};
use crate::options::{MediaSource, PlayerOptions, Surface};

/// Programs tried in order when none is configured.
pub const DEFAULT_PROGRAMS: &[&str] = &["mpv", "ffplay", "vlc"];

/// Command line dialect of a player program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flavor {
    Mpv,
    Ffplay,
    Vlc,
}

impl Flavor {
    fn detect(program: &Path) -> Self {
        let stem = program
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_lowercase();
        if stem.contains("ffplay") {
            Self::Ffplay
        } else if stem.contains("vlc") {
            Self::Vlc
        } else {
            Self::Mpv
        }
    }

    fn args(
        self,
        url: &str,
        start: f64,
        rate: f64,
        surface: &Surface,
        options: &PlayerOptions,
    ) -> Vec<String> {
        let mut args = Vec::new();
        match self {
            Self::Mpv => {
                args.push(format!("--start={:.3}", start));
                args.push(format!("--speed={}", rate));
                args.push(format!("--geometry={}x{}", surface.width, surface.height));
                args.push(format!("--title=hlsdeck: {}", surface.id));
                if !options.controls {
                    args.push("--osc=no".to_string());
                }
                if options.fluid {
                    args.push("--keepaspect=yes".to_string());
                }
            }
            Self::Ffplay => {
                args.push("-ss".to_string());
                args.push(format!("{:.3}", start));
                args.push("-x".to_string());
                args.push(surface.width.to_string());
                args.push("-y".to_string());
                args.push(surface.height.to_string());
                args.push("-window_title".to_string());
                args.push(format!("hlsdeck: {}", surface.id));
                args.push("-autoexit".to_string());
            }
            Self::Vlc => {
                args.push(format!("--start-time={:.3}", start));
                args.push(format!("--rate={}", rate));
                args.push("--play-and-exit".to_string());
            }
        }
        args.push(url.to_string());
        args
    }
}

/// [`PlayerBackend`] that drives an external player program.
pub struct ProcessBackend {
    configured: Option<PathBuf>,
    extra_args: Vec<String>,
    program: OnceLock<PathBuf>,
}

impl ProcessBackend {
    /// `configured` overrides the `PATH` search when it exists on disk.
    pub fn new(configured: Option<PathBuf>, extra_args: Vec<String>) -> Self {
        Self {
            configured,
            extra_args,
            program: OnceLock::new(),
        }
    }

    /// The resolved program, once loaded.
    pub fn program(&self) -> Option<&Path> {
        self.program.get().map(PathBuf::as_path)
    }

    fn locate(&self) -> Result<PathBuf> {
        if let Some(ref path) = self.configured {
            if path.exists() {
                return Ok(path.clone());
            }
            if let Ok(found) = which::which(path) {
                return Ok(found);
            }
            return Err(Error::player(format!(
                "Configured player not found: {}",
                path.display()
            )));
        }

        DEFAULT_PROGRAMS
            .iter()
            .find_map(|name| which::which(name).ok())
            .ok_or_else(|| {
                Error::player(format!(
                    "No HLS player found on PATH (tried {})",
                    DEFAULT_PROGRAMS.join(", ")
                ))
            })
    }
}

#[async_trait]
impl PlayerBackend for ProcessBackend {
    fn name(&self) -> &str {
        self.program()
            .and_then(|p| p.file_stem())
            .and_then(|s| s.to_str())
            .unwrap_or("process")
    }

    async fn load(&self) -> Result<()> {
        if self.program.get().is_some() {
            return Ok(());
        }
        let program = self.locate()?;
        tracing::debug!(program = %program.display(), "Located player program");
        let _ = self.program.set(program);
        Ok(())
    }

    fn create(&self, surface: &Surface, options: &PlayerOptions) -> Result<Box<dyn Player>> {
        let program = self
            .program
            .get()
            .cloned()
            .ok_or_else(|| Error::player("player program used before it was loaded"))?;

        Ok(Box::new(ProcessPlayer {
            flavor: Flavor::detect(&program),
            program,
            extra_args: self.extra_args.clone(),
            surface: surface.clone(),
            options: options.clone(),
            source: None,
            run: Mutex::new(Run::default()),
            rate: 1.0,
            disposed: false,
        }))
    }
}

/// The running child and the clock it is measured against.
#[derive(Default)]
struct Run {
    child: Option<Child>,
    /// Position at the moment the current child was started (or stopped).
    position: f64,
    started_at: Option<Instant>,
}

impl Run {
    fn current_time(&self, rate: f64) -> f64 {
        match self.started_at {
            Some(start) => self.position + start.elapsed().as_secs_f64() * rate,
            None => self.position,
        }
    }

    /// Fold a child that exited on its own (end of stream, window closed)
    /// into the stopped state.
    fn reap(&mut self, rate: f64) {
        let exited = match self.child.as_mut().map(Child::try_wait) {
            Some(Ok(Some(status))) => {
                tracing::debug!(%status, "Player process exited");
                true
            }
            Some(Err(e)) => {
                tracing::debug!("Failed to poll player process: {}", e);
                true
            }
            Some(Ok(None)) | None => false,
        };
        if exited {
            self.position = self.current_time(rate);
            self.started_at = None;
            self.child = None;
        }
    }

    /// Stop the child, folding elapsed playback time into `position`.
    fn stop(&mut self, rate: f64) {
        self.position = self.current_time(rate);
        self.started_at = None;
        if let Some(mut child) = self.child.take() {
            if let Err(e) = child.start_kill() {
                tracing::debug!("Player process already exited: {}", e);
            }
        }
    }

    fn is_running(&mut self, rate: f64) -> bool {
        self.reap(rate);
        self.child.is_some()
    }
}

struct ProcessPlayer {
    program: PathBuf,
    flavor: Flavor,
    extra_args: Vec<String>,
    surface: Surface,
    options: PlayerOptions,
    source: Option<MediaSource>,
    run: Mutex<Run>,
    rate: f64,
    disposed: bool,
}

impl ProcessPlayer {
    fn ensure_live(&self) -> Result<()> {
        if self.disposed {
            Err(Error::player("player has been disposed"))
        } else {
            Ok(())
        }
    }

    fn stop(&mut self) {
        self.run.get_mut().stop(self.rate);
    }

    fn is_running(&mut self) -> bool {
        self.run.get_mut().is_running(self.rate)
    }

    fn spawn(&mut self) -> Result<()> {
        let source = self
            .source
            .as_ref()
            .ok_or_else(|| Error::player("no source set"))?;
        let run = self.run.get_mut();

        let mut args = self.flavor.args(
            &source.url,
            run.position,
            self.rate,
            &self.surface,
            &self.options,
        );
        args.splice(0..0, self.extra_args.iter().cloned());

        tracing::debug!(program = %self.program.display(), ?args, "Spawning player");
        let child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                Error::player(format!("failed to start {}: {}", self.program.display(), e))
            })?;

        run.child = Some(child);
        run.started_at = Some(Instant::now());
        Ok(())
    }
}

#[async_trait]
impl Player for ProcessPlayer {
    fn set_source(&mut self, source: MediaSource) -> Result<()> {
        self.ensure_live()?;
        self.stop();
        self.run.get_mut().position = 0.0;
        self.source = Some(source);
        Ok(())
    }

    async fn ready(&mut self) -> Result<()> {
        self.ensure_live()?;
        // Stream resolution happens inside the child; a set source is all
        // the process needs to start.
        match self.source {
            Some(_) => Ok(()),
            None => Err(Error::player("no source set")),
        }
    }

    fn current_time(&self) -> f64 {
        let mut run = self.run.lock();
        run.reap(self.rate);
        run.current_time(self.rate)
    }

    fn seek(&mut self, position: f64) -> Result<()> {
        self.ensure_live()?;
        let playing = self.is_running();
        self.stop();
        self.run.get_mut().position = position;
        if playing {
            self.spawn()?;
        }
        Ok(())
    }

    fn paused(&self) -> bool {
        !self.run.lock().is_running(self.rate)
    }

    fn play(&mut self) -> Result<()> {
        self.ensure_live()?;
        if !self.is_running() {
            self.spawn()?;
        }
        Ok(())
    }

    fn pause(&mut self) {
        self.stop();
    }

    fn set_playback_rate(&mut self, rate: f64) -> Result<()> {
        self.ensure_live()?;
        let playing = self.is_running();
        self.stop();
        self.rate = rate;
        if playing {
            self.spawn()?;
        }
        Ok(())
    }

    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.stop();
        self.source = None;
        self.disposed = true;
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }
}
