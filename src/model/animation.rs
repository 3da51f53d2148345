use crate::foundation::config::Profile;
use crate::foundation::error::{FcpxError, FcpxResult};

/// Interpolation curve toward the next keyframe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Curve {
    /// Straight-line interpolation.
    Linear,
    /// Eased interpolation.
    Smooth,
}

impl Curve {
    /// Attribute value written on `<keyframe curve="..">`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Smooth => "smooth",
        }
    }
}

/// One animation sample.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Keyframe {
    /// Frame-aligned time relative to the owning clip.
    pub time: String,
    /// Parameter value at `time`, e.g. `"0 0"` for a position.
    pub value: String,
    /// Optional curve toward the next keyframe.
    #[serde(default)]
    pub curve: Option<Curve>,
}

impl Keyframe {
    /// Build a keyframe, rejecting a misaligned `time`.
    pub fn new(profile: &Profile, time: impl Into<String>, value: impl Into<String>) -> FcpxResult<Self> {
        let k = Self {
            time: time.into(),
            value: value.into(),
            curve: None,
        };
        k.validate(profile)?;
        Ok(k)
    }

    /// Set the interpolation curve.
    pub fn with_curve(mut self, curve: Curve) -> Self {
        self.curve = Some(curve);
        self
    }

    /// Check time alignment.
    pub fn validate(&self, profile: &Profile) -> FcpxResult<()> {
        profile.require_aligned("keyframe time", &self.time)?;
        if self.value.trim().is_empty() {
            return Err(FcpxError::validation(format!(
                "keyframe at '{}' has an empty value",
                self.time
            )));
        }
        Ok(())
    }
}

/// Time-ordered keyframes for one parameter.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct KeyframeAnimation {
    /// Keyframes sorted by time.
    pub keyframes: Vec<Keyframe>,
}

impl KeyframeAnimation {
    /// Build an animation; keyframes must be non-empty and sorted by time.
    pub fn new(profile: &Profile, keyframes: Vec<Keyframe>) -> FcpxResult<Self> {
        let a = Self { keyframes };
        a.validate(profile)?;
        Ok(a)
    }

    /// Check non-emptiness, alignment and ordering.
    pub fn validate(&self, profile: &Profile) -> FcpxResult<()> {
        if self.keyframes.is_empty() {
            return Err(FcpxError::validation(
                "keyframe animation must have at least one keyframe",
            ));
        }
        let mut prev = None;
        for k in &self.keyframes {
            k.validate(profile)?;
            let frames = profile.require_aligned("keyframe time", &k.time)?;
            if prev.is_some_and(|p| frames < p) {
                return Err(FcpxError::validation(
                    "keyframes must be sorted by time",
                ));
            }
            prev = Some(frames);
        }
        Ok(())
    }
}

/// Value carried by a [`Param`]: exactly one of a static value or an animation.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamValue {
    /// Fixed value.
    Static(String),
    /// Keyframed value.
    Animated(KeyframeAnimation),
}

/// Named parameter (`<param>`).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Param {
    /// Parameter name.
    pub name: String,
    /// Optional effect parameter key path.
    #[serde(default)]
    pub key: Option<String>,
    /// Static or animated value.
    pub value: ParamValue,
}

impl Param {
    /// Parameter with a fixed value.
    pub fn fixed(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: None,
            value: ParamValue::Static(value.into()),
        }
    }

    /// Parameter driven by keyframes.
    pub fn animated(name: impl Into<String>, animation: KeyframeAnimation) -> Self {
        Self {
            name: name.into(),
            key: None,
            value: ParamValue::Animated(animation),
        }
    }

    /// Set the effect parameter key path.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Check name and animation invariants.
    pub fn validate(&self, profile: &Profile) -> FcpxResult<()> {
        if self.name.trim().is_empty() {
            return Err(FcpxError::validation("param name must be non-empty"));
        }
        match &self.value {
            ParamValue::Static(_) => Ok(()),
            ParamValue::Animated(a) => a.validate(profile),
        }
    }
}

/// Spatial transform on a clip (`<adjust-transform>`).
///
/// Static components render as attributes; animated components render as
/// `<param>` children. A component may not be both.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AdjustTransform {
    /// `"x y"` position.
    #[serde(default)]
    pub position: Option<String>,
    /// `"x y"` scale factors.
    #[serde(default)]
    pub scale: Option<String>,
    /// Rotation in degrees.
    #[serde(default)]
    pub rotation: Option<String>,
    /// Keyframed components.
    #[serde(default)]
    pub params: Vec<Param>,
}

impl AdjustTransform {
    /// Uniform static scale, e.g. `"3.27127 3.27127"`.
    pub fn scaled(scale: impl Into<String>) -> Self {
        Self {
            scale: Some(scale.into()),
            ..Self::default()
        }
    }

    /// Set a static position.
    pub fn with_position(mut self, position: impl Into<String>) -> Self {
        self.position = Some(position.into());
        self
    }

    /// Set a static rotation.
    pub fn with_rotation(mut self, rotation: impl Into<String>) -> Self {
        self.rotation = Some(rotation.into());
        self
    }

    /// Attach an animated component (`position`, `scale`, `rotation`, ...).
    pub fn with_param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    /// Check value shapes and that no component is both static and animated.
    pub fn validate(&self, profile: &Profile) -> FcpxResult<()> {
        check_numbers("position", self.position.as_deref(), 2)?;
        check_numbers("scale", self.scale.as_deref(), 2)?;
        check_numbers("rotation", self.rotation.as_deref(), 1)?;
        for p in &self.params {
            p.validate(profile)?;
            let clash = match p.name.as_str() {
                "position" => self.position.is_some(),
                "scale" => self.scale.is_some(),
                "rotation" => self.rotation.is_some(),
                _ => false,
            };
            if clash {
                return Err(FcpxError::validation(format!(
                    "adjust-transform '{}' is both static and animated",
                    p.name
                )));
            }
        }
        Ok(())
    }
}

fn check_numbers(field: &str, value: Option<&str>, count: usize) -> FcpxResult<()> {
    let Some(value) = value else {
        return Ok(());
    };
    let parts: Vec<&str> = value.split_whitespace().collect();
    if parts.len() != count || parts.iter().any(|p| p.parse::<f64>().is_err()) {
        return Err(FcpxError::validation(format!(
            "adjust-transform {field} '{value}' must be {count} number(s)"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/model/animation.rs"]
mod tests;
