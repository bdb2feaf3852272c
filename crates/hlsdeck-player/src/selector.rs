//! Declarative model of the quality selector overlay.
//!
//! The selector lists "Auto" (the master playlist) followed by every variant
//! in the source's mapping order. Its layout scales with the player surface
//! and is clamped so it stays legible on tiny and huge players alike.

use hlsdeck_common::{Error, PlaybackSource, QualityLabel, Result};
use serde::Serialize;

use crate::options::Surface;

/// Label of the adaptive option.
pub const AUTO_LABEL: &str = "Auto";

/// Which corner of the surface the overlay is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    TopRight,
}

/// Pixel layout for the overlay, derived from the surface size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayStyle {
    pub anchor: Anchor,
    pub top: f64,
    pub right: f64,
    pub z_index: u32,
    pub font_size: f64,
    pub padding: f64,
    pub border_radius: f64,
    /// Padding of the container around the dropdown.
    pub container_padding: f64,
    /// Vertical padding inside the dropdown.
    pub select_padding_y: f64,
    /// Horizontal padding inside the dropdown.
    pub select_padding_x: f64,
    pub select_radius: f64,
    pub min_width: f64,
}

fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

impl OverlayStyle {
    /// Compute the layout for a surface of `width` x `height` pixels.
    pub fn for_size(width: f64, height: f64) -> Self {
        let font_size = clamp(width * 0.015, 12.0, 18.0);
        let padding = clamp(width * 0.01, 6.0, 12.0);
        let border_radius = clamp(width * 0.005, 4.0, 8.0);

        Self {
            anchor: Anchor::TopRight,
            top: (height * 0.02).max(8.0),
            right: (width * 0.015).max(8.0),
            z_index: 1000,
            font_size,
            padding,
            border_radius,
            container_padding: padding * 0.8,
            select_padding_y: padding * 0.5,
            select_padding_x: padding,
            select_radius: border_radius * 0.8,
            min_width: (width * 0.08).max(70.0),
        }
    }

    pub fn for_surface(surface: &Surface) -> Self {
        Self::for_size(f64::from(surface.width), f64::from(surface.height))
    }
}

/// One entry of the selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QualityOption {
    /// Display text ("Auto" or the quality label).
    pub label: String,
    /// Playlist loaded when the option is chosen.
    pub url: String,
    /// `None` for the adaptive option.
    pub quality: Option<QualityLabel>,
}

impl QualityOption {
    pub fn is_auto(&self) -> bool {
        self.quality.is_none()
    }
}

/// The selector control: its options, current choice, and layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualitySelector {
    options: Vec<QualityOption>,
    selected: usize,
    style: OverlayStyle,
}

impl QualitySelector {
    /// Build the selector for `source`, or `None` when the source has no
    /// variants and only adaptive playback is possible.
    pub fn for_source(source: &PlaybackSource, surface: &Surface) -> Option<Self> {
        if !source.has_variants() {
            return None;
        }

        let mut options = Vec::with_capacity(source.variant_urls.len() + 1);
        options.push(QualityOption {
            label: AUTO_LABEL.to_string(),
            url: source.master_url.clone(),
            quality: None,
        });
        options.extend(source.variant_urls.iter().map(|(label, url)| QualityOption {
            label: label.to_string(),
            url: url.to_string(),
            quality: Some(label.clone()),
        }));

        Some(Self {
            options,
            selected: 0,
            style: OverlayStyle::for_surface(surface),
        })
    }

    pub fn options(&self) -> &[QualityOption] {
        &self.options
    }

    pub fn selected(&self) -> &QualityOption {
        &self.options[self.selected]
    }

    pub fn style(&self) -> &OverlayStyle {
        &self.style
    }

    /// Find the option named `label`. "Auto" matches case-insensitively.
    pub fn resolve(&self, label: &str) -> Option<(usize, &QualityOption)> {
        self.options.iter().enumerate().find(|(_, o)| {
            if o.is_auto() {
                o.label.eq_ignore_ascii_case(label)
            } else {
                o.label == label
            }
        })
    }

    /// Mark `label` as the current choice.
    pub fn select(&mut self, label: &str) -> Result<&QualityOption> {
        let (index, _) = self
            .resolve(label)
            .ok_or_else(|| Error::validation(format!("Unknown quality: {}", label)))?;
        self.selected = index;
        Ok(&self.options[index])
    }

    /// Re-layout after the surface was resized.
    pub fn relayout(&mut self, surface: &Surface) {
        self.style = OverlayStyle::for_surface(surface);
    }
}
