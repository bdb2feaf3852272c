//! Core type definitions for playback sources and catalog entries.
//!
//! Field names follow the transcoding service's JSON (camelCase for playback
//! sources, the raw `folder`/`url` pair for catalog entries), so these types
//! deserialize straight from API responses.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Quality labels recognised out of the box.
pub const DEFAULT_QUALITY_LABELS: &[&str] = &["360p", "480p", "720p", "1080p"];

/// A quality level name such as `"720p"`.
///
/// Labels form an open set: they are used verbatim as display text and as a
/// substring when matching catalog file URLs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QualityLabel(String);

impl QualityLabel {
    /// Create a label from any string-like value.
    pub fn new<S: Into<String>>(label: S) -> Self {
        Self(label.into())
    }

    /// Borrow the label text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The built-in label set, in ascending quality order.
    pub fn defaults() -> Vec<QualityLabel> {
        DEFAULT_QUALITY_LABELS.iter().map(|l| Self::new(*l)).collect()
    }
}

impl fmt::Display for QualityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QualityLabel {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for QualityLabel {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Ordered mapping from quality label to variant playlist URL.
///
/// Serialized as a JSON object. Entries keep the order in which they were
/// inserted (or appeared in the document), and that order is the order the
/// quality selector lists them in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantUrls(Vec<(QualityLabel, String)>);

impl VariantUrls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the URL for `label`. A replaced label keeps its
    /// original position.
    pub fn insert<L: Into<QualityLabel>, U: Into<String>>(&mut self, label: L, url: U) {
        let label = label.into();
        let url = url.into();
        match self.0.iter_mut().find(|(l, _)| *l == label) {
            Some(slot) => slot.1 = url,
            None => self.0.push((label, url)),
        }
    }

    /// URL for `label`, if present.
    pub fn get(&self, label: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(l, _)| l.as_str() == label)
            .map(|(_, u)| u.as_str())
    }

    pub fn contains(&self, label: &str) -> bool {
        self.get(label).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QualityLabel, &str)> {
        self.0.iter().map(|(l, u)| (l, u.as_str()))
    }

    pub fn labels(&self) -> impl Iterator<Item = &QualityLabel> {
        self.0.iter().map(|(l, _)| l)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<L: Into<QualityLabel>, U: Into<String>> FromIterator<(L, U)> for VariantUrls {
    fn from_iter<I: IntoIterator<Item = (L, U)>>(iter: I) -> Self {
        let mut variants = Self::new();
        for (label, url) in iter {
            variants.insert(label, url);
        }
        variants
    }
}

impl Serialize for VariantUrls {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (label, url) in &self.0 {
            map.serialize_entry(label.as_str(), url)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for VariantUrls {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct VariantUrlsVisitor;

        impl<'de> Visitor<'de> for VariantUrlsVisitor {
            type Value = VariantUrls;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of quality label to URL")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut variants = VariantUrls::new();
                while let Some((label, url)) = access.next_entry::<String, String>()? {
                    variants.insert(label, url);
                }
                Ok(variants)
            }
        }

        deserializer.deserialize_map(VariantUrlsVisitor)
    }
}

/// Everything needed to play one transcoded video.
///
/// Produced by an upload response, a pasted response, a catalog entry, or the
/// built-in sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackSource {
    /// Master playlist URL; the adaptive ("Auto") entry point.
    pub master_url: String,
    /// Per-quality variant playlists. May be empty (auto quality only).
    #[serde(default)]
    pub variant_urls: VariantUrls,
    /// Identifier of the uploaded asset on the server.
    pub video_id: String,
    /// Storage path of the asset on the server.
    pub video_path: String,
}

impl PlaybackSource {
    /// Create a source with no variants.
    pub fn new<M, I, P>(master_url: M, video_id: I, video_path: P) -> Self
    where
        M: Into<String>,
        I: Into<String>,
        P: Into<String>,
    {
        Self {
            master_url: master_url.into(),
            variant_urls: VariantUrls::new(),
            video_id: video_id.into(),
            video_path: video_path.into(),
        }
    }

    /// Builder-style variant insertion.
    pub fn with_variant<L: Into<QualityLabel>, U: Into<String>>(mut self, label: L, url: U) -> Self {
        self.variant_urls.insert(label, url);
        self
    }

    /// A source is playable when it has a master playlist to load.
    pub fn is_playable(&self) -> bool {
        !self.master_url.trim().is_empty()
    }

    pub fn has_variants(&self) -> bool {
        !self.variant_urls.is_empty()
    }
}

/// One previously uploaded asset as returned by the listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Unique id of the asset (its storage folder).
    pub folder: String,
    /// Every file URL belonging to the asset, in server order.
    #[serde(default)]
    pub url: Vec<String>,
}

impl CatalogEntry {
    pub fn new<S: Into<String>>(folder: S, urls: Vec<String>) -> Self {
        Self {
            folder: folder.into(),
            url: urls,
        }
    }

    pub fn id(&self) -> &str {
        &self.folder
    }
}

/// Where the active playback source came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceOrigin {
    /// Returned by a successful upload.
    Uploaded,
    /// Mapped from a catalog entry.
    Catalog,
    /// Parsed from a pasted API response.
    Pasted,
    /// The built-in demonstration stream.
    Sample,
}

impl fmt::Display for SourceOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uploaded => write!(f, "uploaded"),
            Self::Catalog => write!(f, "catalog"),
            Self::Pasted => write!(f, "pasted"),
            Self::Sample => write!(f, "test video"),
        }
    }
}
