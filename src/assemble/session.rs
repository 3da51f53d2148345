use std::path::Path;

use anyhow::Context as _;

use crate::assemble::media::{
    AttachedMedia, MediaProbe, MediaProbeResult, STILL_START_FRAMES, TITLE_START_FRAMES, VERTICAL_FILL_SCALE,
    classify, needs_scaling,
};
use crate::foundation::config::Profile;
use crate::foundation::error::{FcpxError, FcpxResult};
use crate::foundation::ids::IdGenerator;
use crate::model::animation::AdjustTransform;
use crate::model::library::{Document, Event, Library, Project, Sequence};
use crate::model::resources::{Asset, Effect, Format, MediaKind, MediaRep, Resources};
use crate::model::timeline::{AssetClip, TextStyle, TimelineNode, Title, Video};
use crate::serialize::fcpxml::to_xml_string;
use crate::validate::checks::{ValidationReport, WellFormednessChecker, validate_file};

/// Format id every new document reserves for its project format.
pub const PROJECT_FORMAT_ID: &str = "r1";
/// Display name of the built-in title generator.
pub const BASIC_TITLE_NAME: &str = "Basic Title";
/// Motion template of the built-in title generator.
pub const BASIC_TITLE_UID: &str =
    ".../Titles.localized/Bumper:Opener.localized/Basic Title.localized/Basic Title.moti";

const MOD_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// One document-build session: a profile plus the id counters it owns.
///
/// Independent sessions never share counters, so two documents built in the
/// same process cannot collide on ids.
#[derive(Debug)]
pub struct Session {
    profile: Profile,
    ids: IdGenerator,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Profile::default())
    }
}

impl Session {
    /// Session over `profile` with fresh counters.
    pub fn new(profile: Profile) -> Self {
        Self {
            profile,
            ids: IdGenerator::new(),
        }
    }

    /// Timing and schema profile.
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Id counters.
    pub fn ids(&self) -> &IdGenerator {
        &self.ids
    }

    /// Minimal valid document: one project format `r1`, one empty sequence,
    /// one project, one event and the five required smart collections.
    ///
    /// Rebases the resource counter so the next id is `r2`.
    pub fn new_document(&self, width: u32, height: u32) -> FcpxResult<Document> {
        let format = Format::video(&self.profile, PROJECT_FORMAT_ID, width, height)?;
        self.ids.reset_counter(1);
        self.ids.reset_text_style_counter(0);

        let now = chrono::Local::now();
        let project = Project {
            name: "Untitled Project".to_owned(),
            uid: self.ids.unique_id("project"),
            mod_date: Some(now.format(MOD_DATE_FORMAT).to_string()),
            sequence: Sequence::new(&self.profile, PROJECT_FORMAT_ID)?,
        };
        let event = Event {
            name: now.format("%Y-%m-%d").to_string(),
            uid: self.ids.unique_id("event"),
            projects: vec![project],
        };

        tracing::debug!(width, height, "created document");
        Ok(Document {
            version: self.profile.version().to_owned(),
            resources: Resources {
                formats: vec![format],
                ..Default::default()
            },
            library: Library::new(vec![event]),
        })
    }

    /// Register `path` as an asset with an explicit asset and format id.
    ///
    /// Stills get duration `"0s"` and a rate-undefined format; video gets its
    /// probed duration and a Rec. 709 format. A failed probe falls back to
    /// [`MediaProbeResult::fallback`].
    pub fn attach_media(
        &self,
        doc: &mut Document,
        path: &Path,
        asset_id: &str,
        format_id: &str,
        probe: &dyn MediaProbe,
    ) -> FcpxResult<AttachedMedia> {
        let kind = classify(path)?;
        for id in [asset_id, format_id] {
            if doc.resources.ids().any(|declared| declared == id) {
                return Err(FcpxError::validation(format!(
                    "resource id '{id}' is already declared"
                )));
            }
        }

        let info = probe.probe(path).unwrap_or_else(|err| {
            tracing::warn!(path = %path.display(), %err, "media probe failed, using fallback");
            MediaProbeResult::fallback()
        });
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| asset_id.to_owned());
        let rep = MediaRep::original(path)?;

        let (asset, format) = match kind {
            MediaKind::Image => {
                let format = Format::still(&self.profile, format_id, info.width, info.height)?;
                let asset = Asset::image(&self.profile, asset_id, name, format_id, rep)?;
                (asset, format)
            }
            MediaKind::Video => {
                // Formats share the document timebase; the probed rate is not carried.
                if (info.frame_rate - self.profile.clock().frame_rate).abs() > 1e-3 {
                    tracing::debug!(
                        path = %path.display(),
                        probed = info.frame_rate,
                        profile = self.profile.clock().frame_rate,
                        "source rate differs from profile rate"
                    );
                }
                let format = Format::video(&self.profile, format_id, info.width, info.height)?;
                let duration = self.profile.clock().seconds_to_duration(info.duration_seconds)?;
                let asset = Asset::video(
                    &self.profile,
                    asset_id,
                    name,
                    format_id,
                    duration,
                    info.has_audio,
                    rep,
                )?;
                (asset, format)
            }
        };

        tracing::debug!(
            path = %path.display(),
            asset = %asset.id,
            format = %format.id,
            kind = ?kind,
            "attached media"
        );
        doc.resources.formats.push(format.clone());
        doc.resources.assets.push(asset.clone());
        Ok(AttachedMedia {
            asset,
            format,
            aspect_ratio: info.aspect_ratio,
        })
    }

    /// [`Self::attach_media`] with ids drawn from the session counter.
    pub fn attach(
        &self,
        doc: &mut Document,
        path: &Path,
        probe: &dyn MediaProbe,
    ) -> FcpxResult<AttachedMedia> {
        classify(path)?;
        let asset_id = self.ids.next_resource_id();
        let format_id = self.ids.next_resource_id();
        self.attach_media(doc, path, &asset_id, &format_id, probe)
    }

    /// Timeline node for an attached asset: `<video>` for stills, `<asset-clip>`
    /// for motion video. In a portrait project, content whose
    /// [`AttachedMedia::scaling_aspect`] passes [`needs_scaling`] gets
    /// [`VERTICAL_FILL_SCALE`].
    pub fn media_node(
        &self,
        doc: &Document,
        media: &AttachedMedia,
        offset: &str,
        duration_seconds: f64,
    ) -> FcpxResult<TimelineNode> {
        let AttachedMedia { asset, format, .. } = media;
        let clock = self.profile.clock();
        let duration = clock.seconds_to_duration(duration_seconds)?;
        let is_image = asset.kind == MediaKind::Image;

        let portrait = doc
            .sequence()
            .and_then(|s| doc.resources.format(&s.format))
            .is_some_and(Format::is_portrait);
        let transform = (portrait && needs_scaling(media.scaling_aspect(), is_image))
            .then(|| AdjustTransform::scaled(VERTICAL_FILL_SCALE));

        let node: TimelineNode = if is_image {
            let start = clock.frames_to_duration(STILL_START_FRAMES)?;
            let mut v = Video::new(&self.profile, &asset.id, offset, duration, start)?
                .with_name(&asset.name);
            v.transform = transform;
            v.into()
        } else {
            let mut a = AssetClip::new(&self.profile, &asset.id, offset, duration)?
                .with_name(&asset.name)
                .with_format(&format.id)
                .with_tc_format("NDF");
            if asset.has_audio {
                a = a.with_audio_role("dialogue");
            }
            a.transform = transform;
            a.into()
        };
        node.validate(&self.profile)?;
        Ok(node)
    }

    /// Title node showing `text`. Registers the Basic Title effect on first use.
    pub fn title_node(
        &self,
        doc: &mut Document,
        text: &str,
        offset: &str,
        duration_seconds: f64,
        lane: Option<i32>,
    ) -> FcpxResult<TimelineNode> {
        let effect_id = match doc.resources.effect_by_uid(BASIC_TITLE_UID) {
            Some(e) => e.id.clone(),
            None => {
                let effect = Effect::new(
                    &self.profile,
                    self.ids.next_resource_id(),
                    BASIC_TITLE_NAME,
                    BASIC_TITLE_UID,
                )?;
                let id = effect.id.clone();
                doc.resources.effects.push(effect);
                id
            }
        };

        let clock = self.profile.clock();
        let duration = clock.seconds_to_duration(duration_seconds)?;
        let style = TextStyle::new(self.ids.next_text_style_id());
        let mut title = Title::new(&self.profile, effect_id, offset, duration, text, style)?
            .with_name(text)
            .with_start(clock.frames_to_duration(TITLE_START_FRAMES)?);
        if let Some(lane) = lane {
            title = title.with_lane(lane);
        }
        title.validate(&self.profile)?;
        Ok(title.into())
    }

    /// Append `elements` to the first sequence's spine, ordered by `key`.
    ///
    /// The batch is stably sorted by `key`; the merged spine must still have
    /// non-decreasing offsets or nothing is appended. The sequence duration
    /// becomes the latest end point on the spine.
    pub fn append_timeline_elements<K, F>(
        &self,
        doc: &mut Document,
        mut elements: Vec<TimelineNode>,
        key: F,
    ) -> FcpxResult<()>
    where
        K: Ord,
        F: FnMut(&TimelineNode) -> K,
    {
        for node in &elements {
            node.validate(&self.profile)?;
        }
        elements.sort_by_key(key);

        let seq = doc.sequence_mut()?;
        let mut prev = 0u64;
        for node in seq.spine.elements.iter().chain(elements.iter()) {
            let offset = self.profile.require_aligned("spine offset", node.offset())?;
            if offset < prev {
                return Err(FcpxError::validation(format!(
                    "spine element at '{}' would precede an earlier element; spine offsets must not decrease",
                    node.offset()
                )));
            }
            prev = offset;
        }

        let appended = elements.len();
        seq.spine.elements.extend(elements);
        let end = seq.spine.end_frames(&self.profile)?;
        let current = self.profile.require_aligned("sequence duration", &seq.duration)?;
        seq.duration = self.profile.clock().frames_to_duration(end.max(current))?;

        tracing::debug!(appended, duration = %seq.duration, "appended spine elements");
        Ok(())
    }

    /// [`Self::append_timeline_elements`] keyed on each element's offset.
    pub fn append_by_offset(&self, doc: &mut Document, elements: Vec<TimelineNode>) -> FcpxResult<()> {
        let clock = self.profile.clock();
        self.append_timeline_elements(doc, elements, |n| clock.duration_frames(n.offset()))
    }

    /// Check, serialize and write `doc` to `path`, then validate the file.
    ///
    /// The file is kept whatever the report says.
    #[tracing::instrument(skip(self, doc, checker))]
    pub fn save(
        &self,
        doc: &Document,
        path: &Path,
        checker: &dyn WellFormednessChecker,
    ) -> FcpxResult<ValidationReport> {
        doc.validate(&self.profile)?;
        let xml = to_xml_string(doc)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output directory '{}'", parent.display()))?;
        }
        std::fs::write(path, xml).with_context(|| format!("write '{}'", path.display()))?;

        let report = validate_file(path, checker);
        if report.is_ok() {
            tracing::info!("saved valid fcpxml");
        } else {
            tracing::warn!(reason = %report.reason(), "saved fcpxml failed validation");
        }
        Ok(report)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assemble/session.rs"]
mod tests;
