use crate::foundation::config::is_digits;
use crate::foundation::error::{FcpxError, FcpxResult};

/// Literal used for zero durations, offsets and starts.
pub const ZERO_TIME: &str = "0s";

/// Frame-aligned rational time codec.
///
/// Every duration, offset and start in a document is a string of the form
/// `"<integer>/<timebase>s"` (or `"0s"`). The clock is the only place where
/// floating-point seconds are converted into that form; past this boundary all
/// timing is exact.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FrameClock {
    /// Frames per second used when snapping seconds to frames.
    pub frame_rate: f64,
    /// Denominator of every rendered time value (ticks per second).
    pub timebase: u64,
    /// Ticks per frame (numerator of one frame duration).
    pub frame_duration: u64,
}

impl FrameClock {
    /// Build a clock, rejecting zero or inconsistent rate parameters.
    pub fn new(frame_rate: f64, timebase: u64, frame_duration: u64) -> FcpxResult<Self> {
        if timebase == 0 {
            return Err(FcpxError::validation("timebase must be > 0"));
        }
        if frame_duration == 0 {
            return Err(FcpxError::validation("frame_duration must be > 0"));
        }
        if !frame_rate.is_finite() || frame_rate <= 0.0 {
            return Err(FcpxError::validation("frame_rate must be finite and > 0"));
        }
        let exact = timebase as f64 / frame_duration as f64;
        if (exact - frame_rate).abs() > 1e-3 {
            return Err(FcpxError::validation(format!(
                "frame_rate {frame_rate} does not match timebase/frame_duration ({timebase}/{frame_duration} = {exact:.6})"
            )));
        }
        Ok(Self {
            frame_rate,
            timebase,
            frame_duration,
        })
    }

    /// 23.976 fps (`1001/24000s` per frame).
    pub fn ntsc_23_976() -> Self {
        Self {
            frame_rate: 24000.0 / 1001.0,
            timebase: 24000,
            frame_duration: 1001,
        }
    }

    /// One frame as a duration string, e.g. `"1001/24000s"`.
    pub fn frame_duration_string(&self) -> String {
        format!("{}/{}s", self.frame_duration, self.timebase)
    }

    /// Snap `seconds` to the nearest frame (round half up).
    pub fn seconds_to_frames(&self, seconds: f64) -> FcpxResult<u64> {
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(FcpxError::validation(format!(
                "seconds must be finite and >= 0, got {seconds}"
            )));
        }
        let frames = (seconds * self.frame_rate + 0.5).floor();
        if frames > self.max_frames() as f64 {
            return Err(FcpxError::validation(format!(
                "{seconds}s overflows the timebase ({} frames max)",
                self.max_frames()
            )));
        }
        Ok(frames as u64)
    }

    /// Largest frame count whose tick numerator still fits in a `u64`.
    pub fn max_frames(&self) -> u64 {
        u64::MAX / self.frame_duration
    }

    /// Convert seconds into a frame-aligned duration string.
    ///
    /// Sub-frame values snap to the nearest frame; anything that snaps to zero
    /// frames renders as `"0s"`.
    pub fn seconds_to_duration(&self, seconds: f64) -> FcpxResult<String> {
        if seconds == 0.0 {
            return Ok(ZERO_TIME.to_owned());
        }
        let frames = self.seconds_to_frames(seconds)?;
        self.frames_to_duration(frames)
    }

    /// Render a whole number of frames.
    pub fn frames_to_duration(&self, frames: u64) -> FcpxResult<String> {
        if frames == 0 {
            return Ok(ZERO_TIME.to_owned());
        }
        let ticks = frames.checked_mul(self.frame_duration).ok_or_else(|| {
            FcpxError::validation(format!("{frames} frames overflows the timebase"))
        })?;
        Ok(format!("{ticks}/{}s", self.timebase))
    }

    /// Approximate seconds for a frame count.
    pub fn frames_to_seconds(&self, frames: u64) -> f64 {
        frames as f64 / self.frame_rate
    }

    /// Parse a frame-aligned duration back into a frame count.
    ///
    /// Returns `None` for anything that is not exactly `"0s"` or
    /// `"<digits>/<timebase>s"` with a numerator divisible by the frame duration.
    pub fn duration_frames(&self, duration: &str) -> Option<u64> {
        if duration == ZERO_TIME {
            return Some(0);
        }
        let body = duration.strip_suffix('s')?;
        let (num, den) = body.split_once('/')?;
        if !is_digits(num) || !is_digits(den) {
            return None;
        }
        let den: u64 = den.parse().ok()?;
        if den != self.timebase {
            return None;
        }
        let num: u64 = num.parse().ok()?;
        if num % self.frame_duration != 0 {
            return None;
        }
        Some(num / self.frame_duration)
    }

    /// Whether `duration` is an exact multiple of one frame at this rate.
    pub fn is_frame_aligned(&self, duration: &str) -> bool {
        self.duration_frames(duration).is_some()
    }

    /// Sum two frame-aligned time values.
    pub fn add(&self, a: &str, b: &str) -> FcpxResult<String> {
        let fa = self.require_frames("lhs", a)?;
        let fb = self.require_frames("rhs", b)?;
        let sum = fa.checked_add(fb).ok_or_else(|| {
            FcpxError::validation(format!("'{a}' + '{b}' overflows the timebase"))
        })?;
        self.frames_to_duration(sum)
    }

    /// Parse `value` or fail with a field-level validation error.
    pub fn require_frames(&self, field: &str, value: &str) -> FcpxResult<u64> {
        self.duration_frames(value).ok_or_else(|| {
            FcpxError::validation(format!(
                "{field} '{value}' is not frame-aligned (expected \"0s\" or N*{}/{}s)",
                self.frame_duration, self.timebase
            ))
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timing/clock.rs"]
mod tests;
