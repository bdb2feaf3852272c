//! Application coordinator.
//!
//! Ties the upload workflow, the catalog and the player controller together
//! and keeps a single-slot [`Notice`]: every operation replaces it with its
//! own outcome.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use hlsdeck_common::{PlaybackSource, QualityLabel, Result, SourceOrigin};
use hlsdeck_player::{PlayerController, PlayerStatus, SessionId, Surface};
use parking_lot::RwLock;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::api::{ApiClient, Identity};
use crate::catalog::Catalog;
use crate::config::Config;
use crate::devmode;
use crate::upload::{SelectedFile, UploadWorkflow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
}

/// The one message currently shown to the user.
#[derive(Debug, Clone, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub at: DateTime<Utc>,
}

impl Notice {
    fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            at: Utc::now(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}

pub struct App {
    upload: UploadWorkflow,
    catalog: Catalog,
    player: Mutex<PlayerController>,
    surface: Surface,
    identity: RwLock<Option<Identity>>,
    origin: RwLock<Option<SourceOrigin>>,
    notice: RwLock<Option<Notice>>,
    dev_panel_open: AtomicBool,
}

impl App {
    pub fn new(config: &Config, player: PlayerController, identity: Option<Identity>) -> Self {
        let api = ApiClient::new(&config.api);
        let labels = config
            .catalog
            .quality_labels
            .iter()
            .map(|l| QualityLabel::new(l.trim()))
            .collect();

        Self {
            upload: UploadWorkflow::new(api.clone()),
            catalog: Catalog::new(api, labels),
            player: Mutex::new(player),
            surface: Surface::new("main", config.player.width, config.player.height),
            identity: RwLock::new(identity),
            origin: RwLock::new(None),
            notice: RwLock::new(None),
            dev_panel_open: AtomicBool::new(false),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn upload_workflow(&self) -> &UploadWorkflow {
        &self.upload
    }

    /// Exclusive access to the player controller.
    pub async fn player(&self) -> tokio::sync::MutexGuard<'_, PlayerController> {
        self.player.lock().await
    }

    pub fn set_identity(&self, identity: Option<Identity>) {
        *self.identity.write() = identity;
    }

    fn identity(&self) -> Option<Identity> {
        self.identity.read().clone()
    }

    // ------------------------------------------------------------------
    // Notice
    // ------------------------------------------------------------------

    pub fn notice(&self) -> Option<Notice> {
        self.notice.read().clone()
    }

    pub fn dismiss_notice(&self) {
        *self.notice.write() = None;
    }

    fn succeed(&self, message: impl Into<String>) {
        let notice = Notice::new(NoticeKind::Success, message);
        tracing::info!("{}", notice.message);
        *self.notice.write() = Some(notice);
    }

    /// Record `result`'s error, if any, and pass the result through.
    fn report<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(ref e) = result {
            if e.is_local() {
                tracing::debug!("{}", e);
            } else {
                tracing::warn!("{}", e);
            }
            *self.notice.write() = Some(Notice::new(NoticeKind::Error, e.to_string()));
        }
        result
    }

    // ------------------------------------------------------------------
    // Upload
    // ------------------------------------------------------------------

    pub fn select_file(&self, path: &Path) -> Result<SelectedFile> {
        let result = self.upload.select_file(path);
        if result.is_ok() {
            self.dismiss_notice();
        }
        self.report(result)
    }

    pub fn clear_selection(&self) {
        self.upload.clear_selection();
    }

    /// Upload the selected file and start playing the result.
    ///
    /// A processed upload is returned even when the player then fails; the
    /// notice names the uploaded video alongside the player error.
    pub async fn upload(&self) -> Result<PlaybackSource> {
        if !self.upload.is_busy() {
            self.dismiss_notice();
        }
        let identity = self.identity();
        let result = self.upload.submit(identity.as_ref()).await;
        let source = self.report(result)?;

        match self.play_source(source.clone(), SourceOrigin::Uploaded).await {
            Ok(_) => self.succeed("Video uploaded and processed successfully!"),
            Err(e) => {
                *self.notice.write() = Some(Notice::new(
                    NoticeKind::Error,
                    format!(
                        "Video uploaded as {}, but playback could not start: {}",
                        source.video_id, e
                    ),
                ));
            }
        }
        Ok(source)
    }

    // ------------------------------------------------------------------
    // Catalog
    // ------------------------------------------------------------------

    pub async fn refresh_catalog(&self) -> Result<usize> {
        let identity = self.identity();
        let result = self.catalog.refresh(identity.as_ref()).await;
        self.report(result)
    }

    /// Play the catalog entry `id`.
    pub async fn play_entry(&self, id: &str) -> Result<SessionId> {
        let source = self.report(self.catalog.source_for(id))?;
        let session = self.play_source(source, SourceOrigin::Catalog).await?;
        self.succeed(format!("Playing {}", id));
        Ok(session)
    }

    /// Delete the catalog entry `id`, stopping playback if it is the active
    /// video.
    pub async fn delete_entry(&self, id: &str) -> Result<()> {
        let identity = self.identity();
        let result = self.catalog.delete(id, identity.as_ref()).await;
        self.report(result)?;

        let mut player = self.player.lock().await;
        if player.is_playing_video(id) {
            player.teardown();
            *self.origin.write() = None;
        }
        drop(player);

        self.succeed("Video deleted successfully");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Developer tools
    // ------------------------------------------------------------------

    pub fn open_dev_panel(&self) {
        self.dev_panel_open.store(true, Ordering::Relaxed);
    }

    pub fn close_dev_panel(&self) {
        self.dev_panel_open.store(false, Ordering::Relaxed);
    }

    pub fn is_dev_panel_open(&self) -> bool {
        self.dev_panel_open.load(Ordering::Relaxed)
    }

    /// Play a pasted upload response. Invalid input never reaches the player.
    pub async fn load_pasted(&self, text: &str) -> Result<SessionId> {
        let source = self.report(devmode::parse_pasted_response(text))?;
        let session = self.play_source(source, SourceOrigin::Pasted).await?;
        self.close_dev_panel();
        self.succeed("Response loaded successfully!");
        Ok(session)
    }

    pub async fn load_sample(&self) -> Result<SessionId> {
        let session = self
            .play_source(devmode::sample_source(), SourceOrigin::Sample)
            .await?;
        self.close_dev_panel();
        self.succeed("Test video loaded successfully!");
        Ok(session)
    }

    // ------------------------------------------------------------------
    // Playback
    // ------------------------------------------------------------------

    async fn play_source(&self, source: PlaybackSource, origin: SourceOrigin) -> Result<SessionId> {
        let mut player = self.player.lock().await;
        let result = player.initialize(self.surface.clone(), source).await;
        *self.origin.write() = result.is_ok().then_some(origin);
        self.report(result)
    }

    pub async fn switch_quality(&self, label: &str) -> Result<String> {
        let mut player = self.player.lock().await;
        let result = player
            .switch_quality(label)
            .await
            .map(|option| option.label.clone());
        self.report(result)
    }

    pub async fn clear_video(&self) {
        self.player.lock().await.teardown();
        *self.origin.write() = None;
        self.dismiss_notice();
    }

    pub fn origin(&self) -> Option<SourceOrigin> {
        *self.origin.read()
    }

    pub async fn active_source(&self) -> Option<PlaybackSource> {
        self.player.lock().await.source().cloned()
    }

    pub async fn status(&self) -> Option<PlayerStatus> {
        self.player.lock().await.status()
    }

    /// Stop playback when the app goes away.
    pub async fn shutdown(&self) {
        self.player.lock().await.teardown();
    }
}
