use crate::foundation::config::{Profile, validate_version};
use crate::foundation::error::{FcpxError, FcpxResult};
use crate::model::resources::Resources;
use crate::model::timeline::Spine;
use crate::timing::clock::ZERO_TIME;

/// Smart collection names the editor requires in every library.
pub const REQUIRED_COLLECTIONS: [&str; 5] =
    ["Projects", "All Video", "Audio Only", "Stills", "Favorites"];

/// One timeline (`<sequence>`).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Sequence {
    /// Format id.
    pub format: String,
    /// Total length.
    pub duration: String,
    /// Starting timecode.
    pub tc_start: String,
    /// Timecode format, `NDF` or `DF`.
    pub tc_format: String,
    /// Audio channel layout.
    pub audio_layout: String,
    /// Audio rate; must be one of the profile's allowed rates.
    pub audio_rate: String,
    /// Top-level timeline.
    #[serde(default)]
    pub spine: Spine,
}

impl Sequence {
    /// Empty stereo 48k sequence on `format`.
    pub fn new(profile: &Profile, format: impl Into<String>) -> FcpxResult<Self> {
        let s = Self {
            format: format.into(),
            duration: ZERO_TIME.to_owned(),
            tc_start: ZERO_TIME.to_owned(),
            tc_format: "NDF".to_owned(),
            audio_layout: "stereo".to_owned(),
            audio_rate: "48k".to_owned(),
            spine: Spine::default(),
        };
        s.validate(profile)?;
        Ok(s)
    }

    /// Change the audio rate, rejecting values outside the allowed set.
    pub fn with_audio_rate(mut self, profile: &Profile, rate: impl Into<String>) -> FcpxResult<Self> {
        self.audio_rate = rate.into();
        check_audio_rate(profile, &self.audio_rate)?;
        Ok(self)
    }

    /// Check ids, timing, audio rate and the spine.
    pub fn validate(&self, profile: &Profile) -> FcpxResult<()> {
        profile.require_resource_id("sequence format", &self.format)?;
        profile.require_aligned("sequence duration", &self.duration)?;
        profile.require_aligned("sequence tcStart", &self.tc_start)?;
        check_audio_rate(profile, &self.audio_rate)?;
        self.spine.validate(profile)
    }
}

fn check_audio_rate(profile: &Profile, rate: &str) -> FcpxResult<()> {
    if profile.audio_rates().iter().any(|r| r == rate) {
        return Ok(());
    }
    Err(FcpxError::validation(format!(
        "sequence audioRate '{rate}' must be one of {}",
        profile.audio_rates().join(", ")
    )))
}

/// Project wrapping one sequence.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Project {
    /// Display name.
    pub name: String,
    /// Identity.
    pub uid: String,
    /// Last modification timestamp, `YYYY-MM-DD HH:MM:SS +ZZZZ`.
    #[serde(default)]
    pub mod_date: Option<String>,
    /// The project's timeline.
    pub sequence: Sequence,
}

/// Event grouping projects.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Event {
    /// Display name.
    pub name: String,
    /// Identity.
    pub uid: String,
    /// Projects in this event.
    #[serde(default)]
    pub projects: Vec<Project>,
}

/// How a smart collection combines its rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Every rule must match.
    All,
    /// Any rule may match.
    Any,
}

impl MatchMode {
    /// Attribute value for `match="..."`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Any => "any",
        }
    }
}

/// One smart collection rule.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum MatchRule {
    /// `<match-clip rule type/>`.
    Clip {
        /// Comparison, e.g. `is`.
        rule: String,
        /// Clip type, e.g. `project`.
        r#type: String,
    },
    /// `<match-media rule type/>`.
    Media {
        /// Comparison, e.g. `is`.
        rule: String,
        /// Media type, e.g. `stills`.
        r#type: String,
    },
    /// `<match-ratings value/>`.
    Ratings {
        /// Rating, e.g. `favorites`.
        value: String,
    },
}

impl MatchRule {
    fn clip_is(kind: &str) -> Self {
        Self::Clip {
            rule: "is".to_owned(),
            r#type: kind.to_owned(),
        }
    }

    fn media_is(kind: &str) -> Self {
        Self::Media {
            rule: "is".to_owned(),
            r#type: kind.to_owned(),
        }
    }
}

/// Rule-based library folder (`<smart-collection>`).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SmartCollection {
    /// Collection name.
    pub name: String,
    /// Rule combination.
    pub match_mode: MatchMode,
    /// Rules.
    pub rules: Vec<MatchRule>,
}

impl SmartCollection {
    /// The five collections every library must carry, in their fixed shape.
    pub fn required() -> Vec<Self> {
        vec![
            Self {
                name: "Projects".to_owned(),
                match_mode: MatchMode::All,
                rules: vec![MatchRule::clip_is("project")],
            },
            Self {
                name: "All Video".to_owned(),
                match_mode: MatchMode::Any,
                rules: vec![
                    MatchRule::media_is("videoOnly"),
                    MatchRule::media_is("videoWithAudio"),
                ],
            },
            Self {
                name: "Audio Only".to_owned(),
                match_mode: MatchMode::All,
                rules: vec![MatchRule::media_is("audioOnly")],
            },
            Self {
                name: "Stills".to_owned(),
                match_mode: MatchMode::All,
                rules: vec![MatchRule::media_is("stills")],
            },
            Self {
                name: "Favorites".to_owned(),
                match_mode: MatchMode::All,
                rules: vec![MatchRule::Ratings {
                    value: "favorites".to_owned(),
                }],
            },
        ]
    }
}

/// Library root (`<library>`).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Library {
    /// Library bundle location URL.
    #[serde(default)]
    pub location: Option<String>,
    /// Events.
    #[serde(default)]
    pub events: Vec<Event>,
    /// Smart collections.
    #[serde(default = "SmartCollection::required")]
    pub smart_collections: Vec<SmartCollection>,
}

impl Library {
    /// Library holding `events` and the five required smart collections.
    pub fn new(events: Vec<Event>) -> Self {
        Self {
            location: None,
            events,
            smart_collections: SmartCollection::required(),
        }
    }

    /// Required collection names not present in this library.
    pub fn missing_collections(&self) -> Vec<&'static str> {
        REQUIRED_COLLECTIONS
            .iter()
            .copied()
            .filter(|name| !self.smart_collections.iter().any(|c| c.name == *name))
            .collect()
    }
}

/// A whole FCPXML document: resources plus library.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Document {
    /// `major.minor` version on the root element.
    pub version: String,
    /// Resource table.
    pub resources: Resources,
    /// Library subtree.
    pub library: Library,
}

impl Document {
    /// First sequence in the library.
    pub fn sequence(&self) -> Option<&Sequence> {
        self.library
            .events
            .first()
            .and_then(|e| e.projects.first())
            .map(|p| &p.sequence)
    }

    /// Mutable first sequence in the library.
    pub fn sequence_mut(&mut self) -> FcpxResult<&mut Sequence> {
        self.library
            .events
            .first_mut()
            .and_then(|e| e.projects.first_mut())
            .map(|p| &mut p.sequence)
            .ok_or_else(|| FcpxError::validation("document has no project sequence"))
    }

    /// Re-run every construction invariant over the whole tree.
    ///
    /// Reference integrity and duplicate ids are not model invariants; the
    /// post-write validator reports those.
    pub fn validate(&self, profile: &Profile) -> FcpxResult<()> {
        validate_version(&self.version)?;
        self.resources.validate(profile)?;
        for event in &self.library.events {
            for project in &event.projects {
                project.sequence.validate(profile)?;
            }
        }
        let missing = self.library.missing_collections();
        if !missing.is_empty() {
            return Err(FcpxError::validation(format!(
                "library is missing smart collections: {}",
                missing.join(", ")
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/library.rs"]
mod tests;
