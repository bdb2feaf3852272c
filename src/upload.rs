//! Upload workflow: file selection, validation and submission.
//!
//! Only files whose declared media type is `video/*` can be selected. One
//! submission may be in flight at a time; a second attempt fails with
//! [`Error::Busy`] until the first settles.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use hlsdeck_common::paths::{is_video_media_type, media_type_for_path, OCTET_STREAM};
use hlsdeck_common::{Error, PlaybackSource, Result};
use parking_lot::Mutex;
use serde::Serialize;

use crate::api::{ApiClient, Identity};

/// A local file chosen for upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: String,
    pub size_bytes: u64,
    /// Media type declared by the file's extension.
    pub media_type: String,
}

impl SelectedFile {
    /// Inspect `path`. Fails when it is not a readable regular file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let metadata = std::fs::metadata(path)
            .map_err(|_| Error::validation(format!("File does not exist: {}", path.display())))?;
        if !metadata.is_file() {
            return Err(Error::validation(format!(
                "Not a regular file: {}",
                path.display()
            )));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            path: path.to_path_buf(),
            name,
            size_bytes: metadata.len(),
            media_type: media_type_for_path(path).unwrap_or(OCTET_STREAM).to_string(),
        })
    }

    /// Size in mebibytes, for display.
    pub fn size_mb(&self) -> f64 {
        self.size_bytes as f64 / 1024.0 / 1024.0
    }

    pub fn is_video(&self) -> bool {
        is_video_media_type(&self.media_type)
    }
}

/// Clears the busy flag when the submission settles, however it ends.
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct UploadWorkflow {
    api: ApiClient,
    selection: Mutex<Option<SelectedFile>>,
    busy: AtomicBool,
}

impl UploadWorkflow {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            selection: Mutex::new(None),
            busy: AtomicBool::new(false),
        }
    }

    /// Select `path` for upload. A rejected file leaves the previous
    /// selection in place.
    pub fn select_file(&self, path: &Path) -> Result<SelectedFile> {
        let file = SelectedFile::from_path(path)?;
        if !file.is_video() {
            tracing::debug!(file = %file.name, media_type = %file.media_type, "Rejected non-video file");
            return Err(Error::validation("Please select a valid video file"));
        }

        tracing::debug!(file = %file.name, size_bytes = file.size_bytes, "Selected file");
        *self.selection.lock() = Some(file.clone());
        Ok(file)
    }

    pub fn clear_selection(&self) {
        *self.selection.lock() = None;
    }

    pub fn selected(&self) -> Option<SelectedFile> {
        self.selection.lock().clone()
    }

    /// Whether a submission is in flight.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Upload the selected file. On success the selection is cleared and the
    /// returned source is ready to play.
    pub async fn submit(&self, identity: Option<&Identity>) -> Result<PlaybackSource> {
        let file = self
            .selected()
            .ok_or_else(|| Error::validation("Please select a video file first"))?;
        let identity = identity.ok_or(Error::AuthRequired)?;
        let _guard = BusyGuard::acquire(&self.busy).ok_or_else(|| Error::busy("Upload"))?;

        let source = self.api.upload(&file, identity).await?;
        tracing::info!(
            file = %file.name,
            video_id = %source.video_id,
            variants = source.variant_urls.len(),
            "Upload processed"
        );

        // A different file may have been selected while uploading.
        let mut selection = self.selection.lock();
        if selection.as_ref() == Some(&file) {
            *selection = None;
        }

        Ok(source)
    }
}
