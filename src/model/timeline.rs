use crate::foundation::config::Profile;
use crate::foundation::error::{FcpxError, FcpxResult};
use crate::model::animation::{AdjustTransform, Param};

/// Timeline element placed on a spine or nested inside another element.
///
/// Every variant carries its own ordered list of children, so multi-lane
/// compositions of any depth share one representation and one serializer.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum TimelineNode {
    /// Still-image content (`<video>`).
    Video(Video),
    /// Motion video content (`<asset-clip>`).
    AssetClip(AssetClip),
    /// Text overlay (`<title>`).
    Title(Title),
    /// Compound container (`<clip>`).
    Clip(Clip),
}

impl TimelineNode {
    /// Position in the parent timeline.
    pub fn offset(&self) -> &str {
        match self {
            Self::Video(v) => &v.offset,
            Self::AssetClip(a) => &a.offset,
            Self::Title(t) => &t.offset,
            Self::Clip(c) => &c.offset,
        }
    }

    /// Length on the timeline.
    pub fn duration(&self) -> &str {
        match self {
            Self::Video(v) => &v.duration,
            Self::AssetClip(a) => &a.duration,
            Self::Title(t) => &t.duration,
            Self::Clip(c) => &c.duration,
        }
    }

    /// Compositing lane, if any.
    pub fn lane(&self) -> Option<i32> {
        match self {
            Self::Video(v) => v.lane,
            Self::AssetClip(a) => a.lane,
            Self::Title(t) => t.lane,
            Self::Clip(c) => c.lane,
        }
    }

    /// Nested elements; titles have none.
    pub fn children(&self) -> &[TimelineNode] {
        match self {
            Self::Video(v) => &v.children,
            Self::AssetClip(a) => &a.children,
            Self::Title(_) => &[],
            Self::Clip(c) => &c.children,
        }
    }

    /// Resource this element points at, if any.
    pub fn resource_ref(&self) -> Option<&str> {
        match self {
            Self::Video(v) => Some(&v.ref_id),
            Self::AssetClip(a) => Some(&a.ref_id),
            Self::Title(t) => Some(&t.ref_id),
            Self::Clip(_) => None,
        }
    }

    /// Offset plus duration, in frames.
    pub fn end_frames(&self, profile: &Profile) -> FcpxResult<u64> {
        let offset = profile.require_aligned("offset", self.offset())?;
        let duration = profile.require_aligned("duration", self.duration())?;
        offset.checked_add(duration).ok_or_else(|| {
            FcpxError::validation(format!(
                "end of element at '{}' overflows the timebase",
                self.offset()
            ))
        })
    }

    /// Recursively check ids and timing.
    pub fn validate(&self, profile: &Profile) -> FcpxResult<()> {
        match self {
            Self::Video(v) => v.validate(profile),
            Self::AssetClip(a) => a.validate(profile),
            Self::Title(t) => t.validate(profile),
            Self::Clip(c) => c.validate(profile),
        }
    }
}

/// Still-image element. Stills must carry a source `start`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Video {
    /// Asset id.
    #[serde(rename = "ref")]
    pub ref_id: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Position in the parent timeline.
    pub offset: String,
    /// Length on the timeline.
    pub duration: String,
    /// Source start.
    pub start: String,
    /// Compositing lane.
    #[serde(default)]
    pub lane: Option<i32>,
    /// Spatial transform.
    #[serde(default)]
    pub transform: Option<AdjustTransform>,
    /// Nested elements.
    #[serde(default)]
    pub children: Vec<TimelineNode>,
}

impl Video {
    /// Build a still element.
    pub fn new(
        profile: &Profile,
        ref_id: impl Into<String>,
        offset: impl Into<String>,
        duration: impl Into<String>,
        start: impl Into<String>,
    ) -> FcpxResult<Self> {
        let v = Self {
            ref_id: ref_id.into(),
            name: None,
            offset: offset.into(),
            duration: duration.into(),
            start: start.into(),
            lane: None,
            transform: None,
            children: Vec::new(),
        };
        v.validate(profile)?;
        Ok(v)
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Place on `lane`.
    pub fn with_lane(mut self, lane: i32) -> Self {
        self.lane = Some(lane);
        self
    }

    /// Attach a transform.
    pub fn with_transform(mut self, transform: AdjustTransform) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Nest `child` inside this element.
    pub fn with_child(mut self, child: TimelineNode) -> Self {
        self.children.push(child);
        self
    }

    /// Check ids, timing and nested elements.
    pub fn validate(&self, profile: &Profile) -> FcpxResult<()> {
        profile.require_resource_id("video ref", &self.ref_id)?;
        check_timing(profile, "video", &self.offset, &self.duration)?;
        profile.require_aligned("video start", &self.start)?;
        check_nested(profile, self.transform.as_ref(), &self.children)
    }
}

/// Motion video element. Asset clips never carry a `start`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AssetClip {
    /// Asset id.
    #[serde(rename = "ref")]
    pub ref_id: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Position in the parent timeline.
    pub offset: String,
    /// Length on the timeline.
    pub duration: String,
    /// Format id of the underlying media.
    #[serde(default)]
    pub format: Option<String>,
    /// Timecode format, e.g. `NDF`.
    #[serde(default)]
    pub tc_format: Option<String>,
    /// Audio role, only meaningful when the asset has audio.
    #[serde(default)]
    pub audio_role: Option<String>,
    /// Compositing lane.
    #[serde(default)]
    pub lane: Option<i32>,
    /// Spatial transform.
    #[serde(default)]
    pub transform: Option<AdjustTransform>,
    /// Nested elements.
    #[serde(default)]
    pub children: Vec<TimelineNode>,
}

impl AssetClip {
    /// Build a motion video element.
    pub fn new(
        profile: &Profile,
        ref_id: impl Into<String>,
        offset: impl Into<String>,
        duration: impl Into<String>,
    ) -> FcpxResult<Self> {
        let a = Self {
            ref_id: ref_id.into(),
            name: None,
            offset: offset.into(),
            duration: duration.into(),
            format: None,
            tc_format: None,
            audio_role: None,
            lane: None,
            transform: None,
            children: Vec::new(),
        };
        a.validate(profile)?;
        Ok(a)
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the media format reference (validated later with the node).
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Set the timecode format.
    pub fn with_tc_format(mut self, tc_format: impl Into<String>) -> Self {
        self.tc_format = Some(tc_format.into());
        self
    }

    /// Set the audio role.
    pub fn with_audio_role(mut self, role: impl Into<String>) -> Self {
        self.audio_role = Some(role.into());
        self
    }

    /// Place on `lane`.
    pub fn with_lane(mut self, lane: i32) -> Self {
        self.lane = Some(lane);
        self
    }

    /// Attach a transform.
    pub fn with_transform(mut self, transform: AdjustTransform) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Nest `child` inside this element.
    pub fn with_child(mut self, child: TimelineNode) -> Self {
        self.children.push(child);
        self
    }

    /// Check ids, timing and nested elements.
    pub fn validate(&self, profile: &Profile) -> FcpxResult<()> {
        profile.require_resource_id("asset-clip ref", &self.ref_id)?;
        if let Some(format) = &self.format {
            profile.require_resource_id("asset-clip format", format)?;
        }
        check_timing(profile, "asset-clip", &self.offset, &self.duration)?;
        check_nested(profile, self.transform.as_ref(), &self.children)
    }
}

/// Text style carried by a title.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextStyle {
    /// Text style id (`ts<n>`), shared by `<text-style ref>` and `<text-style-def id>`.
    pub id: String,
    /// Font family.
    pub font: String,
    /// Point size.
    pub font_size: u32,
    /// `"r g b a"` color, components in `0..=1`.
    pub font_color: String,
    /// Bold weight; never rendered on nested titles.
    #[serde(default)]
    pub bold: bool,
}

impl TextStyle {
    /// White, 196pt Helvetica Neue.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            font: "Helvetica Neue".to_owned(),
            font_size: 196,
            font_color: "1 1 1 1".to_owned(),
            bold: false,
        }
    }

    /// Check id shape and font fields.
    pub fn validate(&self) -> FcpxResult<()> {
        let ok = self
            .id
            .strip_prefix("ts")
            .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()));
        if !ok {
            return Err(FcpxError::validation(format!(
                "text style id '{}' must look like ts<n>",
                self.id
            )));
        }
        if self.font.trim().is_empty() || self.font_size == 0 {
            return Err(FcpxError::validation(format!(
                "text style '{}' needs a font and a non-zero size",
                self.id
            )));
        }
        Ok(())
    }
}

/// Text overlay element referencing a title effect.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Title {
    /// Effect id of the title generator.
    #[serde(rename = "ref")]
    pub ref_id: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Position in the parent timeline.
    pub offset: String,
    /// Length on the timeline.
    pub duration: String,
    /// Generator start.
    #[serde(default)]
    pub start: Option<String>,
    /// Compositing lane.
    #[serde(default)]
    pub lane: Option<i32>,
    /// Text content.
    pub text: String,
    /// Text style.
    pub style: TextStyle,
    /// Generator parameters.
    #[serde(default)]
    pub params: Vec<Param>,
    /// Spatial transform.
    #[serde(default)]
    pub transform: Option<AdjustTransform>,
}

impl Title {
    /// Build a title element.
    pub fn new(
        profile: &Profile,
        ref_id: impl Into<String>,
        offset: impl Into<String>,
        duration: impl Into<String>,
        text: impl Into<String>,
        style: TextStyle,
    ) -> FcpxResult<Self> {
        let t = Self {
            ref_id: ref_id.into(),
            name: None,
            offset: offset.into(),
            duration: duration.into(),
            start: None,
            lane: None,
            text: text.into(),
            style,
            params: Vec::new(),
            transform: None,
        };
        t.validate(profile)?;
        Ok(t)
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the generator start (validated later with the node).
    pub fn with_start(mut self, start: impl Into<String>) -> Self {
        self.start = Some(start.into());
        self
    }

    /// Place on `lane`.
    pub fn with_lane(mut self, lane: i32) -> Self {
        self.lane = Some(lane);
        self
    }

    /// Add a generator parameter.
    pub fn with_param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    /// Attach a transform.
    pub fn with_transform(mut self, transform: AdjustTransform) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Check ids, timing, style and parameters.
    pub fn validate(&self, profile: &Profile) -> FcpxResult<()> {
        profile.require_resource_id("title ref", &self.ref_id)?;
        check_timing(profile, "title", &self.offset, &self.duration)?;
        if let Some(start) = &self.start {
            profile.require_aligned("title start", start)?;
        }
        self.style.validate()?;
        for p in &self.params {
            p.validate(profile)?;
        }
        if let Some(t) = &self.transform {
            t.validate(profile)?;
        }
        Ok(())
    }
}

/// Compound container element (`<clip>`).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Clip {
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Position in the parent timeline.
    pub offset: String,
    /// Length on the timeline.
    pub duration: String,
    /// Local start.
    #[serde(default)]
    pub start: Option<String>,
    /// Format id.
    #[serde(default)]
    pub format: Option<String>,
    /// Timecode format, e.g. `NDF`.
    #[serde(default)]
    pub tc_format: Option<String>,
    /// Compositing lane.
    #[serde(default)]
    pub lane: Option<i32>,
    /// Spatial transform.
    #[serde(default)]
    pub transform: Option<AdjustTransform>,
    /// Nested elements.
    #[serde(default)]
    pub children: Vec<TimelineNode>,
}

impl Clip {
    /// Build an empty container.
    pub fn new(profile: &Profile, offset: impl Into<String>, duration: impl Into<String>) -> FcpxResult<Self> {
        let c = Self {
            name: None,
            offset: offset.into(),
            duration: duration.into(),
            start: None,
            format: None,
            tc_format: None,
            lane: None,
            transform: None,
            children: Vec::new(),
        };
        c.validate(profile)?;
        Ok(c)
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the format reference (validated later with the node).
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Place on `lane`.
    pub fn with_lane(mut self, lane: i32) -> Self {
        self.lane = Some(lane);
        self
    }

    /// Attach a transform.
    pub fn with_transform(mut self, transform: AdjustTransform) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Nest `child` inside this container.
    pub fn with_child(mut self, child: TimelineNode) -> Self {
        self.children.push(child);
        self
    }

    /// Check ids, timing and nested elements.
    pub fn validate(&self, profile: &Profile) -> FcpxResult<()> {
        if let Some(format) = &self.format {
            profile.require_resource_id("clip format", format)?;
        }
        check_timing(profile, "clip", &self.offset, &self.duration)?;
        if let Some(start) = &self.start {
            profile.require_aligned("clip start", start)?;
        }
        check_nested(profile, self.transform.as_ref(), &self.children)
    }
}

impl From<Video> for TimelineNode {
    fn from(v: Video) -> Self {
        Self::Video(v)
    }
}

impl From<AssetClip> for TimelineNode {
    fn from(a: AssetClip) -> Self {
        Self::AssetClip(a)
    }
}

impl From<Title> for TimelineNode {
    fn from(t: Title) -> Self {
        Self::Title(t)
    }
}

impl From<Clip> for TimelineNode {
    fn from(c: Clip) -> Self {
        Self::Clip(c)
    }
}

/// Ordered top-level container of a sequence (`<spine>`).
///
/// `elements` is the render order; consumers require it to be ordered by offset.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Spine {
    /// Top-level elements in render order.
    #[serde(default)]
    pub elements: Vec<TimelineNode>,
}

impl Spine {
    /// Check every element and that offsets never decrease.
    pub fn validate(&self, profile: &Profile) -> FcpxResult<()> {
        let mut prev = 0u64;
        for (i, node) in self.elements.iter().enumerate() {
            node.validate(profile)?;
            let offset = profile.require_aligned("spine offset", node.offset())?;
            if offset < prev {
                return Err(FcpxError::validation(format!(
                    "spine element {i} at '{}' starts before its predecessor",
                    node.offset()
                )));
            }
            prev = offset;
        }
        Ok(())
    }

    /// Latest end point of any top-level element, in frames.
    pub fn end_frames(&self, profile: &Profile) -> FcpxResult<u64> {
        self.elements
            .iter()
            .try_fold(0u64, |acc, n| -> FcpxResult<u64> {
                Ok(acc.max(n.end_frames(profile)?))
            })
    }
}

fn check_timing(profile: &Profile, what: &str, offset: &str, duration: &str) -> FcpxResult<()> {
    profile.require_aligned(&format!("{what} offset"), offset)?;
    profile.require_aligned(&format!("{what} duration"), duration)?;
    Ok(())
}

fn check_nested(
    profile: &Profile,
    transform: Option<&AdjustTransform>,
    children: &[TimelineNode],
) -> FcpxResult<()> {
    if let Some(t) = transform {
        t.validate(profile)?;
    }
    for c in children {
        c.validate(profile)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/model/timeline.rs"]
mod tests;
