use super::*;

fn rep() -> MediaRep {
    MediaRep::original(Path::new("/media/clip.mp4")).unwrap()
}

#[test]
fn media_rep_src_is_absolute_file_url() {
    let r = rep();
    assert_eq!(r.src, "file:///media/clip.mp4");
    assert_eq!(r.kind, "original-media");

    let rel = MediaRep::original(Path::new("relative/photo.png")).unwrap();
    assert!(rel.src.starts_with("file:///"));
    assert!(rel.src.ends_with("relative/photo.png"));
}

#[test]
fn still_format_has_no_frame_duration() {
    let f = Format::still(&Profile::default(), "r2", 1920, 1080).unwrap();
    assert_eq!(f.frame_duration, None);
    assert_eq!(f.name.as_deref(), Some(RATE_UNDEFINED_FORMAT));
    assert_eq!(f.color_space.as_deref(), Some(STILL_COLOR_SPACE));
}

#[test]
fn video_format_carries_one_frame() {
    let f = Format::video(&Profile::default(), "r1", 1080, 1920).unwrap();
    assert_eq!(f.frame_duration.as_deref(), Some("1001/24000s"));
    assert_eq!(f.name, None);
    assert!(f.is_portrait());
}

#[test]
fn format_rejects_bad_id_and_misaligned_frame_duration() {
    let p = Profile::default();
    assert!(Format::video(&p, "fmt1", 1920, 1080).is_err());
    assert!(Format::video(&p, "r1", 0, 1080).is_err());

    let mut f = Format::video(&p, "r1", 1920, 1080).unwrap();
    f.frame_duration = Some("1000/24000s".to_owned());
    assert!(f.validate(&p).is_err());
}

#[test]
fn image_asset_duration_is_zero() {
    let a = Asset::image(&Profile::default(), "r2", "photo", "r3", rep()).unwrap();
    assert_eq!(a.duration, "0s");
    assert_eq!(a.kind, MediaKind::Image);

    let mut bad = a.clone();
    bad.duration = "1001/24000s".to_owned();
    assert!(bad.validate(&Profile::default()).is_err());
}

#[test]
fn silent_video_asset_has_no_audio_attributes() {
    let a = Asset::video(&Profile::default(), "r2", "clip", "r3", "240240/24000s", false, rep())
        .unwrap();
    assert!(!a.has_audio);
    assert_eq!(a.audio_sources, None);
    assert_eq!(a.audio_rate, None);

    let loud = Asset::video(&Profile::default(), "r4", "clip", "r5", "240240/24000s", true, rep())
        .unwrap();
    assert_eq!(loud.audio_sources, Some(1));
    assert_eq!(loud.audio_channels, Some(2));
}

#[test]
fn video_asset_rejects_misaligned_duration() {
    let err = Asset::video(&Profile::default(), "r2", "clip", "r3", "12345/24000s", false, rep())
        .unwrap_err();
    assert!(err.to_string().contains("duration"));
}

#[test]
fn resources_ids_follow_render_order() {
    let p = Profile::default();
    let res = Resources {
        formats: vec![Format::video(&p, "r1", 1920, 1080).unwrap()],
        assets: vec![Asset::image(&p, "r2", "photo", "r1", rep()).unwrap()],
        effects: vec![Effect::new(&p, "r3", "Text", "x.moti").unwrap()],
    };
    assert_eq!(res.ids().collect::<Vec<_>>(), ["r1", "r2", "r3"]);
    assert!(res.asset("r2").is_some());
    assert!(res.format("r2").is_none());
    assert!(res.effect_by_uid("x.moti").is_some());
}
