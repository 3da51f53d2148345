use super::*;

#[test]
fn classify_by_extension_ignoring_case() {
    for name in ["a.png", "b.JPG", "c.jpeg", "d.heic", "e.WebP"] {
        assert_eq!(classify(Path::new(name)).unwrap(), MediaKind::Image, "{name}");
    }
    for name in ["a.mp4", "b.MOV", "c.m4v", "d.mkv"] {
        assert_eq!(classify(Path::new(name)).unwrap(), MediaKind::Video, "{name}");
    }
}

#[test]
fn classify_rejects_unknown_and_missing_extensions() {
    for name in ["song.mp3", "notes.txt", "README"] {
        let err = classify(Path::new(name)).unwrap_err();
        assert!(matches!(err, FcpxError::UnsupportedMedia(_)), "{name}");
    }
}

#[test]
fn scaling_threshold_is_inclusive() {
    assert!(needs_scaling(16.0 / 9.0, false));
    assert!(needs_scaling(1.0, true));
    assert!(needs_scaling(0.75, true));
    assert!(!needs_scaling(0.7499, true));
    assert!(!needs_scaling(9.0 / 16.0, false));
}

#[test]
fn fallback_is_silent_landscape_ten_seconds() {
    let f = MediaProbeResult::fallback();
    assert_eq!((f.width, f.height), (1920, 1080));
    assert_eq!(f.duration_seconds, 10.0);
    assert!(!f.has_audio);
    assert!((f.aspect_ratio - 16.0 / 9.0).abs() < 1e-9);
}

#[test]
fn closures_are_probes() {
    let probe = |p: &Path| {
        if p.ends_with("ok.mp4") {
            Ok(MediaProbeResult::fallback())
        } else {
            Err("no such file".to_owned())
        }
    };
    let dyn_probe: &dyn MediaProbe = &probe;
    assert!(dyn_probe.probe(Path::new("/x/ok.mp4")).is_ok());
    assert!(dyn_probe.probe(Path::new("/x/missing.mp4")).is_err());
}
