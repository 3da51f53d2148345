use super::*;

fn clock() -> FrameClock {
    FrameClock::ntsc_23_976()
}

#[test]
fn zero_seconds_is_literal_zero() {
    assert_eq!(clock().seconds_to_duration(0.0).unwrap(), "0s");
}

#[test]
fn whole_seconds_snap_to_frames() {
    // 10s * 23.976 = 239.76 -> 240 frames.
    assert_eq!(
        clock().seconds_to_duration(10.0).unwrap(),
        "240240/24000s"
    );
    // 1s -> 23.976 -> 24 frames.
    assert_eq!(clock().seconds_to_duration(1.0).unwrap(), "24024/24000s");
}

#[test]
fn rounding_is_half_up() {
    let c = FrameClock::new(24.0, 24, 1).unwrap();
    assert_eq!(c.seconds_to_frames(1.5 / 24.0).unwrap(), 2);
    assert_eq!(c.seconds_to_frames(1.49 / 24.0).unwrap(), 1);
}

#[test]
fn negative_and_nan_seconds_are_rejected() {
    assert!(clock().seconds_to_duration(-1.0).is_err());
    assert!(clock().seconds_to_duration(f64::NAN).is_err());
}

#[test]
fn alignment_accepts_multiples_of_frame_duration() {
    let c = clock();
    assert!(c.is_frame_aligned("0s"));
    assert!(c.is_frame_aligned("1001/24000s"));
    assert!(c.is_frame_aligned("86399313/24000s"));
    assert!(!c.is_frame_aligned("1000/24000s"));
}

#[test]
fn alignment_rejects_malformed_strings_without_panicking() {
    let c = clock();
    for bad in [
        "", "s", "0", "1001", "1001/24000", "/24000s", "1001/s", "abc/24000s", "1001/30000s",
        "-1001/24000s", "+1001/24000s", "1001/24000ss", "1001 /24000s",
    ] {
        assert!(!c.is_frame_aligned(bad), "{bad:?} should not be aligned");
    }
}

#[test]
fn duration_frames_inverts_frames_to_duration() {
    let c = clock();
    assert_eq!(c.duration_frames(&c.frames_to_duration(86_313).unwrap()), Some(86_313));
    assert_eq!(c.duration_frames("0s"), Some(0));
}

#[test]
fn add_sums_frames() {
    let c = clock();
    assert_eq!(c.add("1001/24000s", "2002/24000s").unwrap(), "3003/24000s");
    assert_eq!(c.add("0s", "0s").unwrap(), "0s");
    assert!(c.add("1000/24000s", "0s").is_err());
}

#[test]
fn new_rejects_inconsistent_rates() {
    assert!(FrameClock::new(30.0, 24000, 1001).is_err());
    assert!(FrameClock::new(23.976, 0, 1001).is_err());
    assert!(FrameClock::new(23.976, 24000, 0).is_err());
    assert!(FrameClock::new(23.976, 24000, 1001).is_ok());
}

#[test]
fn huge_values_overflow_into_errors() {
    let c = clock();
    let err = c.seconds_to_duration(1e16).unwrap_err();
    assert!(err.to_string().contains("overflows the timebase"), "{err}");
    assert!(c.seconds_to_frames(f64::MAX).is_err());

    let max = c.max_frames();
    let top = c.frames_to_duration(max).unwrap();
    assert_eq!(c.duration_frames(&top), Some(max));
    assert!(c.frames_to_duration(max + 1).is_err());
    assert!(c.add(&top, "1001/24000s").is_err());
}
