use std::path::Path;

use crate::foundation::error::{FcpxError, FcpxResult};
use crate::model::resources::{Asset, Format, MediaKind};

/// Uniform scale that fills a vertical frame with landscape content.
pub const VERTICAL_FILL_SCALE: &str = "3.27127 3.27127";
/// Content at least this wide relative to its height is scaled in vertical projects.
pub const SCALING_ASPECT_THRESHOLD: f64 = 0.75;
/// Source start of still clips, in frames (`86399313/24000s` at 23.976).
pub const STILL_START_FRAMES: u64 = 86_313;
/// Generator start of titles, in frames (`86486400/24000s` at 23.976).
pub const TITLE_START_FRAMES: u64 = 86_400;

const IMAGE_EXTENSIONS: [&str; 9] = ["png", "jpg", "jpeg", "gif", "bmp", "tif", "tiff", "heic", "webp"];
const VIDEO_EXTENSIONS: [&str; 5] = ["mp4", "mov", "m4v", "avi", "mkv"];

/// Media properties reported by a [`MediaProbe`].
#[derive(Clone, Debug, PartialEq)]
pub struct MediaProbeResult {
    /// Length in seconds; ignored for stills.
    pub duration_seconds: f64,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Frames per second.
    pub frame_rate: f64,
    /// Whether at least one audio stream exists.
    pub has_audio: bool,
    /// Width divided by height.
    pub aspect_ratio: f64,
}

impl MediaProbeResult {
    /// Conservative record used when probing fails: 10s of silent 1080p at 23.976.
    pub fn fallback() -> Self {
        Self {
            duration_seconds: 10.0,
            width: 1920,
            height: 1080,
            frame_rate: 24000.0 / 1001.0,
            has_audio: false,
            aspect_ratio: 16.0 / 9.0,
        }
    }
}

/// Resources registered for one media file, with the aspect its probe reported.
#[derive(Clone, Debug, PartialEq)]
pub struct AttachedMedia {
    /// Registered asset.
    pub asset: Asset,
    /// Format the asset points at.
    pub format: Format,
    /// Probed width divided by height.
    pub aspect_ratio: f64,
}

impl AttachedMedia {
    /// Aspect used for the scaling decision: the probed value, else the
    /// format geometry, else 16:9.
    pub fn scaling_aspect(&self) -> f64 {
        if self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0 {
            self.aspect_ratio
        } else {
            self.format.aspect_ratio().unwrap_or(16.0 / 9.0)
        }
    }
}

/// Capability that inspects a media file. The library never shells out itself.
pub trait MediaProbe {
    /// Probe `path`; an `Err` makes the caller fall back to [`MediaProbeResult::fallback`].
    fn probe(&self, path: &Path) -> Result<MediaProbeResult, String>;
}

impl<F> MediaProbe for F
where
    F: Fn(&Path) -> Result<MediaProbeResult, String>,
{
    fn probe(&self, path: &Path) -> Result<MediaProbeResult, String> {
        self(path)
    }
}

/// Classify `path` by extension, case-insensitively.
pub fn classify(path: &Path) -> FcpxResult<MediaKind> {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        Ok(MediaKind::Image)
    } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
        Ok(MediaKind::Video)
    } else {
        Err(FcpxError::unsupported_media(format!(
            "'{}' is neither a supported image nor video",
            path.display()
        )))
    }
}

/// Whether content of `aspect_ratio` needs [`VERTICAL_FILL_SCALE`] in a vertical project.
///
/// Stills and video share the threshold; only strictly tall content is exempt.
pub fn needs_scaling(aspect_ratio: f64, _is_image: bool) -> bool {
    aspect_ratio >= SCALING_ASPECT_THRESHOLD
}

#[cfg(test)]
#[path = "../../tests/unit/assemble/media.rs"]
mod tests;
