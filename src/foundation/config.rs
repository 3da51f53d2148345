use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use regex::Regex;

use crate::foundation::error::{FcpxError, FcpxResult};
use crate::timing::clock::FrameClock;

/// Audio rates accepted by the consuming editor on a `<sequence>`.
pub const DEFAULT_AUDIO_RATES: [&str; 7] = ["32k", "44.1k", "48k", "88.2k", "96k", "176.4k", "192k"];

/// Raw timing and schema constants, as loaded from a configuration file.
///
/// Every key is optional; missing keys fall back to the 23.976 fps profile.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FcpxConfig {
    /// Frames per second.
    pub frame_rate: f64,
    /// Ticks per second; the denominator of every time value.
    pub timebase: u64,
    /// Ticks per frame.
    #[serde(alias = "frame_duration_numerator")]
    pub frame_duration: u64,
    /// Allowed `audioRate` values on sequences.
    pub valid_audio_rates: Vec<String>,
    /// Pattern every resource id must match.
    pub resource_id_pattern: String,
    /// Document version, `major.minor`.
    pub version: String,
}

impl Default for FcpxConfig {
    fn default() -> Self {
        Self {
            frame_rate: 24000.0 / 1001.0,
            timebase: 24000,
            frame_duration: 1001,
            valid_audio_rates: DEFAULT_AUDIO_RATES.iter().map(|s| s.to_string()).collect(),
            resource_id_pattern: "^r[0-9]+$".to_owned(),
            version: "1.13".to_owned(),
        }
    }
}

impl FcpxConfig {
    /// Parse constants from a JSON string.
    pub fn from_json_str(s: &str) -> FcpxResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| FcpxError::validation(format!("parse fcpxgen config JSON: {e}")))
    }

    /// Parse constants from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> FcpxResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            FcpxError::validation(format!("open fcpxgen config '{}': {e}", path.display()))
        })?;
        serde_json::from_reader(BufReader::new(f)).map_err(|e| {
            FcpxError::validation(format!("parse fcpxgen config '{}': {e}", path.display()))
        })
    }
}

/// Validated, compiled form of [`FcpxConfig`].
///
/// Built once at startup and threaded through every constructor, the timing
/// codec and the validator.
#[derive(Clone, Debug)]
pub struct Profile {
    clock: FrameClock,
    audio_rates: Vec<String>,
    resource_id: Regex,
    version: String,
}

impl Profile {
    /// Validate and compile `config`.
    pub fn new(config: FcpxConfig) -> FcpxResult<Self> {
        let clock = FrameClock::new(config.frame_rate, config.timebase, config.frame_duration)?;
        if config.valid_audio_rates.is_empty() {
            return Err(FcpxError::validation("valid_audio_rates must be non-empty"));
        }
        let resource_id = Regex::new(&config.resource_id_pattern).map_err(|e| {
            FcpxError::validation(format!(
                "resource_id_pattern '{}' is not a valid regex: {e}",
                config.resource_id_pattern
            ))
        })?;
        validate_version(&config.version)?;
        Ok(Self {
            clock,
            audio_rates: config.valid_audio_rates,
            resource_id,
            version: config.version,
        })
    }

    /// Frame clock used for every time value.
    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// Document version written on the root element.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Allowed sequence audio rates.
    pub fn audio_rates(&self) -> &[String] {
        &self.audio_rates
    }

    /// Whether `id` has resource-id shape (`r<n>` by default).
    pub fn is_resource_id(&self, id: &str) -> bool {
        self.resource_id.is_match(id)
    }

    /// Fail unless `id` has resource-id shape.
    pub fn require_resource_id(&self, field: &str, id: &str) -> FcpxResult<()> {
        if self.is_resource_id(id) {
            Ok(())
        } else {
            Err(FcpxError::validation(format!(
                "{field} '{id}' does not match resource id pattern '{}'",
                self.resource_id.as_str()
            )))
        }
    }

    /// Fail unless `value` is frame-aligned; returns the frame count.
    pub fn require_aligned(&self, field: &str, value: &str) -> FcpxResult<u64> {
        self.clock.require_frames(field, value)
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::new(FcpxConfig::default()).expect("built-in 23.976 profile is valid")
    }
}

/// Fail unless `version` has the `major.minor` shape.
pub fn validate_version(version: &str) -> FcpxResult<()> {
    let ok = version
        .split_once('.')
        .is_some_and(|(major, minor)| is_digits(major) && is_digits(minor));
    if ok {
        Ok(())
    } else {
        Err(FcpxError::validation(format!(
            "version '{version}' must be major.minor"
        )))
    }
}

/// Non-empty and ASCII digits only.
pub(crate) fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
