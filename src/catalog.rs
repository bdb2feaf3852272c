//! The caller's uploaded videos.
//!
//! Holds the last successfully fetched list, maps entries to playable
//! sources, and deletes entries. Deletions of different entries may overlap;
//! a second deletion of the same entry while the first is in flight fails
//! with [`Error::Busy`].

use dashmap::DashSet;
use hlsdeck_common::{CatalogEntry, Error, PlaybackSource, QualityLabel, Result, VariantUrls};
use parking_lot::RwLock;

use crate::api::{ApiClient, Identity};

/// Marker present in every HLS playlist URL.
pub const HLS_MARKER: &str = ".m3u8";

/// Tokens identifying the master playlist among an entry's playlists.
const MASTER_HINTS: &[&str] = &["master", "playlist"];

/// Build a playback source from a catalog entry's raw URL list.
///
/// The master playlist is the first HLS URL carrying a master hint, falling
/// back to the first HLS URL of any kind. Each label maps to the first URL
/// containing it; labels without a match are left out.
pub fn map_entry_to_source(entry: &CatalogEntry, labels: &[QualityLabel]) -> Result<PlaybackSource> {
    let is_hls = |url: &&String| url.contains(HLS_MARKER);

    let master_url = entry
        .url
        .iter()
        .filter(is_hls)
        .find(|url| MASTER_HINTS.iter().any(|hint| url.contains(hint)))
        .or_else(|| entry.url.iter().find(is_hls))
        .ok_or_else(|| Error::not_in_catalog(entry.id()))?;

    let variant_urls: VariantUrls = labels
        .iter()
        .filter_map(|label| {
            entry
                .url
                .iter()
                .find(|url| url.contains(label.as_str()))
                .map(|url| (label.clone(), url.clone()))
        })
        .collect();

    Ok(PlaybackSource {
        master_url: master_url.clone(),
        variant_urls,
        video_id: entry.folder.clone(),
        video_path: entry.folder.clone(),
    })
}

/// Removes the in-flight marker when a deletion settles.
struct DeleteGuard<'a> {
    in_flight: &'a DashSet<String>,
    id: String,
}

impl<'a> DeleteGuard<'a> {
    fn acquire(in_flight: &'a DashSet<String>, id: &str) -> Option<Self> {
        in_flight.insert(id.to_string()).then(|| Self {
            in_flight,
            id: id.to_string(),
        })
    }
}

impl Drop for DeleteGuard<'_> {
    fn drop(&mut self) {
        self.in_flight.remove(&self.id);
    }
}

pub struct Catalog {
    api: ApiClient,
    labels: Vec<QualityLabel>,
    entries: RwLock<Vec<CatalogEntry>>,
    deleting: DashSet<String>,
}

impl Catalog {
    pub fn new(api: ApiClient, labels: Vec<QualityLabel>) -> Self {
        Self {
            api,
            labels,
            entries: RwLock::new(Vec::new()),
            deleting: DashSet::new(),
        }
    }

    pub fn labels(&self) -> &[QualityLabel] {
        &self.labels
    }

    /// Replace the list with the server's. On failure the previous list is
    /// kept.
    pub async fn refresh(&self, identity: Option<&Identity>) -> Result<usize> {
        let identity = identity.ok_or(Error::AuthRequired)?;
        let videos = self.api.list_videos(identity).await?;
        let count = videos.len();
        *self.entries.write() = videos;
        tracing::info!(count, "Catalog refreshed");
        Ok(count)
    }

    pub fn entries(&self) -> Vec<CatalogEntry> {
        self.entries.read().clone()
    }

    pub fn get(&self, id: &str) -> Option<CatalogEntry> {
        self.entries.read().iter().find(|e| e.folder == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Map the entry `id` to a playback source using the configured labels.
    pub fn source_for(&self, id: &str) -> Result<PlaybackSource> {
        let entry = self
            .get(id)
            .ok_or_else(|| Error::validation(format!("Unknown video: {}", id)))?;
        map_entry_to_source(&entry, &self.labels)
    }

    pub fn is_deleting(&self, id: &str) -> bool {
        self.deleting.contains(id)
    }

    /// Delete `id` on the server, then drop it from the list.
    pub async fn delete(&self, id: &str, identity: Option<&Identity>) -> Result<()> {
        let identity = identity.ok_or(Error::AuthRequired)?;
        let _guard = DeleteGuard::acquire(&self.deleting, id)
            .ok_or_else(|| Error::busy(format!("Deletion of {}", id)))?;

        self.api.delete_video(id, identity).await?;
        self.entries.write().retain(|e| e.folder != id);
        tracing::info!(video_id = id, "Video deleted");
        Ok(())
    }
}
