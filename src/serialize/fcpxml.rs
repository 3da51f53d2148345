//! Lowering of a [`Document`] into the FCPXML element tree.
//!
//! Layout rules the editor's importer enforces:
//!
//! - the root carries only `version`;
//! - resources render formats, then assets, then effects;
//! - absent optional attributes are omitted, never written empty;
//! - stills render as `<video>` with `start`, motion video as `<asset-clip>` without it;
//! - `<adjust-transform>` is the first child of any element that carries one;
//! - nested titles get a fixed text style (`Regular`, centered, `-19` line spacing, no bold);
//! - the library always ends with the five required smart collections.

use crate::foundation::error::FcpxResult;
use crate::model::animation::{AdjustTransform, KeyframeAnimation, Param, ParamValue};
use crate::model::library::{Document, Event, Library, MatchRule, Project, Sequence, SmartCollection};
use crate::model::resources::{Asset, Effect, Format, Resources};
use crate::model::timeline::{AssetClip, Clip, TextStyle, TimelineNode, Title, Video};
use crate::serialize::xml::{XmlElement, write_pretty};

/// Declaration and doctype prepended to the serialized fragment.
pub const XML_PROLOG: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!DOCTYPE fcpxml>\n";

const TEXT_FONT_FACE: &str = "Regular";
const TEXT_ALIGNMENT: &str = "center";
const TEXT_LINE_SPACING: &str = "-19";

/// Serialize `doc` as a pretty-printed fragment without the XML declaration.
pub fn serialize(doc: &Document) -> FcpxResult<String> {
    write_pretty(&document_element(doc))
}

/// Serialize `doc` as a complete file body: prolog, fragment, trailing newline.
pub fn to_xml_string(doc: &Document) -> FcpxResult<String> {
    let body = serialize(doc)?;
    Ok(format!("{XML_PROLOG}{body}\n"))
}

/// Build the element tree for `doc`.
pub fn document_element(doc: &Document) -> XmlElement {
    XmlElement::new("fcpxml")
        .attr("version", doc.version.as_str())
        .child(resources_element(&doc.resources))
        .child(library_element(&doc.library))
}

fn resources_element(res: &Resources) -> XmlElement {
    XmlElement::new("resources")
        .children(res.formats.iter().map(format_element))
        .children(res.assets.iter().map(asset_element))
        .children(res.effects.iter().map(effect_element))
}

fn format_element(f: &Format) -> XmlElement {
    XmlElement::new("format")
        .attr("id", f.id.as_str())
        .opt_attr("name", f.name.as_deref())
        .opt_attr("frameDuration", f.frame_duration.as_deref())
        .attr("width", f.width.to_string())
        .attr("height", f.height.to_string())
        .opt_attr("colorSpace", f.color_space.as_deref())
}

fn asset_element(a: &Asset) -> XmlElement {
    let audio = |v: Option<u32>| v.filter(|_| a.has_audio).map(|n| n.to_string());
    XmlElement::new("asset")
        .attr("id", a.id.as_str())
        .attr("name", a.name.as_str())
        .attr("uid", a.uid.as_str())
        .attr("start", a.start.as_str())
        .attr("duration", a.duration.as_str())
        .opt_attr("hasVideo", a.has_video.then_some("1"))
        .attr("format", a.format.as_str())
        .opt_attr(
            "videoSources",
            a.video_sources.filter(|_| a.has_video).map(|n| n.to_string()),
        )
        .opt_attr("hasAudio", a.has_audio.then_some("1"))
        .opt_attr("audioSources", audio(a.audio_sources))
        .opt_attr("audioChannels", audio(a.audio_channels))
        .opt_attr("audioRate", audio(a.audio_rate))
        .child(
            XmlElement::new("media-rep")
                .attr("kind", a.media_rep.kind.as_str())
                .attr("sig", a.media_rep.sig.as_str())
                .attr("src", a.media_rep.src.as_str()),
        )
}

fn effect_element(e: &Effect) -> XmlElement {
    XmlElement::new("effect")
        .attr("id", e.id.as_str())
        .attr("name", e.name.as_str())
        .attr("uid", e.uid.as_str())
}

fn library_element(lib: &Library) -> XmlElement {
    XmlElement::new("library")
        .opt_attr("location", lib.location.as_deref())
        .children(lib.events.iter().map(event_element))
        .children(lib.smart_collections.iter().map(smart_collection_element))
}

fn event_element(e: &Event) -> XmlElement {
    XmlElement::new("event")
        .attr("name", e.name.as_str())
        .attr("uid", e.uid.as_str())
        .children(e.projects.iter().map(project_element))
}

fn project_element(p: &Project) -> XmlElement {
    XmlElement::new("project")
        .attr("name", p.name.as_str())
        .attr("uid", p.uid.as_str())
        .opt_attr("modDate", p.mod_date.as_deref())
        .child(sequence_element(&p.sequence))
}

fn sequence_element(s: &Sequence) -> XmlElement {
    let spine = XmlElement::new("spine")
        .children(s.spine.elements.iter().map(|n| node_element(n, false)));
    XmlElement::new("sequence")
        .attr("format", s.format.as_str())
        .attr("duration", s.duration.as_str())
        .attr("tcStart", s.tc_start.as_str())
        .attr("tcFormat", s.tc_format.as_str())
        .attr("audioLayout", s.audio_layout.as_str())
        .attr("audioRate", s.audio_rate.as_str())
        .child(spine)
}

fn smart_collection_element(c: &SmartCollection) -> XmlElement {
    XmlElement::new("smart-collection")
        .attr("name", c.name.as_str())
        .attr("match", c.match_mode.as_str())
        .children(c.rules.iter().map(|r| match r {
            MatchRule::Clip { rule, r#type } => XmlElement::new("match-clip")
                .attr("rule", rule.as_str())
                .attr("type", r#type.as_str()),
            MatchRule::Media { rule, r#type } => XmlElement::new("match-media")
                .attr("rule", rule.as_str())
                .attr("type", r#type.as_str()),
            MatchRule::Ratings { value } => {
                XmlElement::new("match-ratings").attr("value", value.as_str())
            }
        }))
}

/// Lower one timeline node; `nested` is true below the spine.
fn node_element(node: &TimelineNode, nested: bool) -> XmlElement {
    match node {
        TimelineNode::Video(v) => video_element(v),
        TimelineNode::AssetClip(a) => asset_clip_element(a),
        TimelineNode::Title(t) => title_element(t, nested),
        TimelineNode::Clip(c) => clip_element(c),
    }
}

fn video_element(v: &Video) -> XmlElement {
    XmlElement::new("video")
        .attr("ref", v.ref_id.as_str())
        .opt_attr("lane", v.lane.map(|l| l.to_string()))
        .attr("offset", v.offset.as_str())
        .opt_attr("name", v.name.as_deref())
        .attr("start", v.start.as_str())
        .attr("duration", v.duration.as_str())
        .children(v.transform.as_ref().map(transform_element))
        .children(v.children.iter().map(|c| node_element(c, true)))
}

fn asset_clip_element(a: &AssetClip) -> XmlElement {
    XmlElement::new("asset-clip")
        .attr("ref", a.ref_id.as_str())
        .opt_attr("lane", a.lane.map(|l| l.to_string()))
        .attr("offset", a.offset.as_str())
        .opt_attr("name", a.name.as_deref())
        .attr("duration", a.duration.as_str())
        .opt_attr("format", a.format.as_deref())
        .opt_attr("tcFormat", a.tc_format.as_deref())
        .opt_attr("audioRole", a.audio_role.as_deref())
        .children(a.transform.as_ref().map(transform_element))
        .children(a.children.iter().map(|c| node_element(c, true)))
}

fn clip_element(c: &Clip) -> XmlElement {
    XmlElement::new("clip")
        .opt_attr("lane", c.lane.map(|l| l.to_string()))
        .attr("offset", c.offset.as_str())
        .opt_attr("name", c.name.as_deref())
        .opt_attr("start", c.start.as_deref())
        .attr("duration", c.duration.as_str())
        .opt_attr("format", c.format.as_deref())
        .opt_attr("tcFormat", c.tc_format.as_deref())
        .children(c.transform.as_ref().map(transform_element))
        .children(c.children.iter().map(|n| node_element(n, true)))
}

fn title_element(t: &Title, nested: bool) -> XmlElement {
    let text = XmlElement::new("text").child(
        XmlElement::new("text-style")
            .attr("ref", t.style.id.as_str())
            .text(t.text.as_str()),
    );
    XmlElement::new("title")
        .attr("ref", t.ref_id.as_str())
        .opt_attr("lane", t.lane.map(|l| l.to_string()))
        .attr("offset", t.offset.as_str())
        .opt_attr("name", t.name.as_deref())
        .opt_attr("start", t.start.as_deref())
        .attr("duration", t.duration.as_str())
        .children(t.transform.as_ref().map(transform_element))
        .children(t.params.iter().map(param_element))
        .child(text)
        .child(text_style_def_element(&t.style, nested))
}

fn text_style_def_element(style: &TextStyle, nested: bool) -> XmlElement {
    let bold = (style.bold && !nested).then_some("1");
    XmlElement::new("text-style-def")
        .attr("id", style.id.as_str())
        .child(
            XmlElement::new("text-style")
                .attr("font", style.font.as_str())
                .attr("fontSize", style.font_size.to_string())
                .attr("fontFace", TEXT_FONT_FACE)
                .attr("fontColor", style.font_color.as_str())
                .opt_attr("bold", bold)
                .attr("alignment", TEXT_ALIGNMENT)
                .attr("lineSpacing", TEXT_LINE_SPACING),
        )
}

fn transform_element(t: &AdjustTransform) -> XmlElement {
    XmlElement::new("adjust-transform")
        .opt_attr("position", t.position.as_deref())
        .opt_attr("scale", t.scale.as_deref())
        .opt_attr("rotation", t.rotation.as_deref())
        .children(t.params.iter().map(param_element))
}

fn param_element(p: &Param) -> XmlElement {
    let el = XmlElement::new("param")
        .attr("name", p.name.as_str())
        .opt_attr("key", p.key.as_deref());
    match &p.value {
        ParamValue::Static(v) => el.attr("value", v.as_str()),
        ParamValue::Animated(a) => el.child(keyframe_animation_element(a)),
    }
}

fn keyframe_animation_element(a: &KeyframeAnimation) -> XmlElement {
    XmlElement::new("keyframeAnimation").children(a.keyframes.iter().map(|k| {
        XmlElement::new("keyframe")
            .attr("time", k.time.as_str())
            .attr("value", k.value.as_str())
            .opt_attr("curve", k.curve.map(|c| c.as_str()))
    }))
}

#[cfg(test)]
#[path = "../../tests/unit/serialize/fcpxml.rs"]
mod tests;
