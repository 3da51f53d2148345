use std::path::Path;

use crate::foundation::config::Profile;
use crate::foundation::error::{FcpxError, FcpxResult};
use crate::foundation::ids::hash_hex;
use crate::timing::clock::ZERO_TIME;

/// Format name the editor uses for stills, which have no frame rate.
pub const RATE_UNDEFINED_FORMAT: &str = "FFVideoFormatRateUndefined";
/// Color space for motion video and project formats.
pub const REC709_COLOR_SPACE: &str = "1-1-1 (Rec. 709)";
/// Narrow color space the editor expects on still formats.
pub const STILL_COLOR_SPACE: &str = "1-13-1";

/// Media classification derived from the file extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Still image; rendered as `<video>` on the timeline.
    Image,
    /// Motion video; rendered as `<asset-clip>` on the timeline.
    Video,
}

/// Frame geometry and rate definition (`<format>`).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Format {
    /// Resource id.
    pub id: String,
    /// Optional editor format name.
    #[serde(default)]
    pub name: Option<String>,
    /// Duration of one frame; absent for stills.
    #[serde(default)]
    pub frame_duration: Option<String>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Color space label.
    #[serde(default)]
    pub color_space: Option<String>,
}

impl Format {
    /// Project or motion-video format: one frame at the profile rate, Rec. 709, no name.
    pub fn video(profile: &Profile, id: impl Into<String>, width: u32, height: u32) -> FcpxResult<Self> {
        let f = Self {
            id: id.into(),
            name: None,
            frame_duration: Some(profile.clock().frame_duration_string()),
            width,
            height,
            color_space: Some(REC709_COLOR_SPACE.to_owned()),
        };
        f.validate(profile)?;
        Ok(f)
    }

    /// Still-image format: rate-undefined name, no frame duration, narrow color space.
    pub fn still(profile: &Profile, id: impl Into<String>, width: u32, height: u32) -> FcpxResult<Self> {
        let f = Self {
            id: id.into(),
            name: Some(RATE_UNDEFINED_FORMAT.to_owned()),
            frame_duration: None,
            width,
            height,
            color_space: Some(STILL_COLOR_SPACE.to_owned()),
        };
        f.validate(profile)?;
        Ok(f)
    }

    /// Set the editor format name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Whether the frame is taller than it is wide.
    pub fn is_portrait(&self) -> bool {
        self.height > self.width
    }

    /// Width divided by height; `None` for degenerate geometry.
    pub fn aspect_ratio(&self) -> Option<f64> {
        (self.width > 0 && self.height > 0).then(|| f64::from(self.width) / f64::from(self.height))
    }

    /// Check id shape, geometry and frame alignment.
    pub fn validate(&self, profile: &Profile) -> FcpxResult<()> {
        profile.require_resource_id("format id", &self.id)?;
        if self.width == 0 || self.height == 0 {
            return Err(FcpxError::validation(format!(
                "format '{}': width/height must be > 0",
                self.id
            )));
        }
        if let Some(fd) = &self.frame_duration {
            let frames = profile.require_aligned(&format!("format '{}' frameDuration", self.id), fd)?;
            if frames == 0 {
                return Err(FcpxError::validation(format!(
                    "format '{}': frameDuration must be non-zero",
                    self.id
                )));
            }
        }
        Ok(())
    }
}

/// File locator for an asset (`<media-rep>`).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MediaRep {
    /// Representation kind, normally `original-media`.
    pub kind: String,
    /// Content signature.
    pub sig: String,
    /// Absolute `file://` URL.
    pub src: String,
}

impl MediaRep {
    /// Locate `path` as original media. Relative paths are made absolute
    /// lexically; the file system is not consulted.
    pub fn original(path: &Path) -> FcpxResult<Self> {
        let abs = std::path::absolute(path).map_err(|e| {
            FcpxError::validation(format!("resolve absolute path for '{}': {e}", path.display()))
        })?;
        let src = file_url(&abs);
        Ok(Self {
            kind: "original-media".to_owned(),
            sig: hash_hex(&format!("sig-{src}")),
            src,
        })
    }

    /// Check that `src` is an absolute file URL.
    pub fn validate(&self) -> FcpxResult<()> {
        if !self.src.starts_with("file:///") {
            return Err(FcpxError::validation(format!(
                "media-rep src '{}' must be an absolute file:// URL",
                self.src
            )));
        }
        if self.kind.trim().is_empty() {
            return Err(FcpxError::validation("media-rep kind must be non-empty"));
        }
        Ok(())
    }
}

fn file_url(abs: &Path) -> String {
    let s = abs.to_string_lossy().replace('\\', "/");
    if s.starts_with('/') {
        format!("file://{s}")
    } else {
        format!("file:///{s}")
    }
}

/// Reference to a media file (`<asset>`).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Asset {
    /// Resource id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Media identity.
    pub uid: String,
    /// Source start.
    pub start: String,
    /// Source duration; always `"0s"` for stills.
    pub duration: String,
    /// Still or motion.
    pub kind: MediaKind,
    /// Whether the media carries video.
    pub has_video: bool,
    /// Whether the media carries audio.
    pub has_audio: bool,
    /// Id of the `<format>` describing the media.
    pub format: String,
    /// Number of video sources; present when `has_video`.
    #[serde(default)]
    pub video_sources: Option<u32>,
    /// Number of audio sources; present only when `has_audio`.
    #[serde(default)]
    pub audio_sources: Option<u32>,
    /// Audio channel count; present only when `has_audio`.
    #[serde(default)]
    pub audio_channels: Option<u32>,
    /// Audio sample rate in Hz; present only when `has_audio`.
    #[serde(default)]
    pub audio_rate: Option<u32>,
    /// File locator.
    pub media_rep: MediaRep,
}

impl Asset {
    /// Still image asset. Duration is fixed at `"0s"`.
    pub fn image(
        profile: &Profile,
        id: impl Into<String>,
        name: impl Into<String>,
        format: impl Into<String>,
        media_rep: MediaRep,
    ) -> FcpxResult<Self> {
        let a = Self {
            id: id.into(),
            name: name.into(),
            uid: hash_hex(&media_rep.src),
            start: ZERO_TIME.to_owned(),
            duration: ZERO_TIME.to_owned(),
            kind: MediaKind::Image,
            has_video: true,
            has_audio: false,
            format: format.into(),
            video_sources: Some(1),
            audio_sources: None,
            audio_channels: None,
            audio_rate: None,
            media_rep,
        };
        a.validate(profile)?;
        Ok(a)
    }

    /// Motion video asset with its probed duration. Audio attributes are only
    /// populated when `has_audio` is set.
    pub fn video(
        profile: &Profile,
        id: impl Into<String>,
        name: impl Into<String>,
        format: impl Into<String>,
        duration: impl Into<String>,
        has_audio: bool,
        media_rep: MediaRep,
    ) -> FcpxResult<Self> {
        let a = Self {
            id: id.into(),
            name: name.into(),
            uid: hash_hex(&media_rep.src),
            start: ZERO_TIME.to_owned(),
            duration: duration.into(),
            kind: MediaKind::Video,
            has_video: true,
            has_audio,
            format: format.into(),
            video_sources: Some(1),
            audio_sources: has_audio.then_some(1),
            audio_channels: has_audio.then_some(2),
            audio_rate: has_audio.then_some(48_000),
            media_rep,
        };
        a.validate(profile)?;
        Ok(a)
    }

    /// Check ids, timing and media-kind invariants.
    pub fn validate(&self, profile: &Profile) -> FcpxResult<()> {
        profile.require_resource_id("asset id", &self.id)?;
        profile.require_resource_id(&format!("asset '{}' format", self.id), &self.format)?;
        profile.require_aligned(&format!("asset '{}' start", self.id), &self.start)?;
        profile.require_aligned(&format!("asset '{}' duration", self.id), &self.duration)?;
        if self.kind == MediaKind::Image && self.duration != ZERO_TIME {
            return Err(FcpxError::validation(format!(
                "image asset '{}' must have duration \"0s\", got '{}'",
                self.id, self.duration
            )));
        }
        if !self.has_audio
            && (self.audio_sources.is_some()
                || self.audio_channels.is_some()
                || self.audio_rate.is_some())
        {
            return Err(FcpxError::validation(format!(
                "asset '{}' has audio attributes but has_audio is false",
                self.id
            )));
        }
        self.media_rep.validate()
    }
}

/// Effect or title generator definition (`<effect>`).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Effect {
    /// Resource id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Motion template path inside the editor bundle.
    pub uid: String,
}

impl Effect {
    /// Build an effect definition.
    pub fn new(
        profile: &Profile,
        id: impl Into<String>,
        name: impl Into<String>,
        uid: impl Into<String>,
    ) -> FcpxResult<Self> {
        let e = Self {
            id: id.into(),
            name: name.into(),
            uid: uid.into(),
        };
        e.validate(profile)?;
        Ok(e)
    }

    /// Check id shape and uid presence.
    pub fn validate(&self, profile: &Profile) -> FcpxResult<()> {
        profile.require_resource_id("effect id", &self.id)?;
        if self.uid.trim().is_empty() {
            return Err(FcpxError::validation(format!(
                "effect '{}': uid must be non-empty",
                self.id
            )));
        }
        Ok(())
    }
}

/// Resource table (`<resources>`): formats, then assets, then effects.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Resources {
    /// Format definitions.
    #[serde(default)]
    pub formats: Vec<Format>,
    /// Media assets.
    #[serde(default)]
    pub assets: Vec<Asset>,
    /// Effect and title generator definitions.
    #[serde(default)]
    pub effects: Vec<Effect>,
}

impl Resources {
    /// Look up a format by id.
    pub fn format(&self, id: &str) -> Option<&Format> {
        self.formats.iter().find(|f| f.id == id)
    }

    /// Look up an asset by id.
    pub fn asset(&self, id: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.id == id)
    }

    /// Look up an effect by its template uid.
    pub fn effect_by_uid(&self, uid: &str) -> Option<&Effect> {
        self.effects.iter().find(|e| e.uid == uid)
    }

    /// Every declared resource id, in render order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.formats
            .iter()
            .map(|f| f.id.as_str())
            .chain(self.assets.iter().map(|a| a.id.as_str()))
            .chain(self.effects.iter().map(|e| e.id.as_str()))
    }

    /// Validate every entry.
    pub fn validate(&self, profile: &Profile) -> FcpxResult<()> {
        for f in &self.formats {
            f.validate(profile)?;
        }
        for a in &self.assets {
            a.validate(profile)?;
        }
        for e in &self.effects {
            e.validate(profile)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/resources.rs"]
mod tests;
