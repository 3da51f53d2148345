//! fcpxgen builds Final Cut Pro interchange (FCPXML) files from typed data.
//!
//! String templates make it easy to emit files that the editor crashes on. fcpxgen instead
//! builds a validated document model and renders it through one structured serializer.
//!
//! # Pipeline overview
//!
//! 1. **Model**: typed entities (formats, assets, timeline nodes, library) validate their own
//!    invariants at construction against a [`Profile`] (frame alignment, id shape, audio rates).
//! 2. **Assemble**: a [`Session`] creates the minimal document skeleton, attaches media through
//!    an injected [`MediaProbe`], and appends timeline nodes in spine order.
//! 3. **Serialize**: [`serialize`] lowers the document into an ordered element tree and
//!    pretty-prints it; [`to_xml_string`] adds the declaration and doctype.
//! 4. **Validate**: [`validate_file`] runs an injected [`WellFormednessChecker`] plus reference,
//!    duplicate-id, smart-collection and nesting checks, and reports without touching the file.
//!
//! The design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Exact timing**: seconds become `"N/<timebase>s"` strings only inside [`FrameClock`].
//! - **No IO in the model**: probing and well-formedness checks are capabilities supplied by the
//!   caller; only [`Session::save`] writes to disk.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assemble;
mod foundation;
mod model;
mod serialize;
mod timing;
mod validate;

pub use assemble::media::{
    AttachedMedia, MediaProbe, MediaProbeResult, SCALING_ASPECT_THRESHOLD, STILL_START_FRAMES,
    TITLE_START_FRAMES, VERTICAL_FILL_SCALE, classify, needs_scaling,
};
pub use assemble::session::{BASIC_TITLE_NAME, BASIC_TITLE_UID, PROJECT_FORMAT_ID, Session};
pub use foundation::config::{DEFAULT_AUDIO_RATES, FcpxConfig, Profile, validate_version};
pub use foundation::error::{FcpxError, FcpxResult};
pub use foundation::ids::{IdGenerator, hash_hex};
pub use model::animation::{
    AdjustTransform, Curve, Keyframe, KeyframeAnimation, Param, ParamValue,
};
pub use model::library::{
    Document, Event, Library, MatchMode, MatchRule, Project, REQUIRED_COLLECTIONS, Sequence,
    SmartCollection,
};
pub use model::resources::{
    Asset, Effect, Format, MediaKind, MediaRep, RATE_UNDEFINED_FORMAT, REC709_COLOR_SPACE,
    Resources, STILL_COLOR_SPACE,
};
pub use model::timeline::{AssetClip, Clip, Spine, TextStyle, TimelineNode, Title, Video};
pub use serialize::fcpxml::{XML_PROLOG, document_element, serialize, to_xml_string};
pub use serialize::xml::{XmlElement, parse as parse_xml, write_pretty};
pub use timing::clock::{FrameClock, ZERO_TIME};
pub use validate::checks::{
    MAX_NESTED_VIDEOS, MAX_VIDEO_DEPTH, QuickXmlChecker, ValidationIssue, ValidationReport,
    WellFormednessChecker, check_tree, validate_file, validate_xml,
};
