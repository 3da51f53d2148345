use super::*;
use crate::validate::checks::{QuickXmlChecker, ValidationIssue};

fn probe_with(width: u32, height: u32, seconds: f64, has_audio: bool) -> impl Fn(&Path) -> Result<MediaProbeResult, String> {
    move |_: &Path| {
        Ok(MediaProbeResult {
            duration_seconds: seconds,
            width,
            height,
            frame_rate: 24000.0 / 1001.0,
            has_audio,
            aspect_ratio: f64::from(width) / f64::from(height),
        })
    }
}

fn failing_probe(_: &Path) -> Result<MediaProbeResult, String> {
    Err("ffprobe not found".to_owned())
}

#[test]
fn new_document_is_minimal_and_rebases_counter() {
    let s = Session::default();
    let doc = s.new_document(1080, 1920).unwrap();
    assert_eq!(doc.resources.formats.len(), 1);
    assert_eq!(doc.resources.formats[0].id, "r1");
    assert!(doc.resources.assets.is_empty());
    assert_eq!(doc.sequence().unwrap().duration, "0s");
    assert_eq!(doc.library.smart_collections.len(), 5);
    assert!(doc.library.events[0].projects[0].mod_date.is_some());
    assert_eq!(s.ids().next_resource_id(), "r2");
}

#[test]
fn attach_image_has_zero_duration_and_still_format() {
    let s = Session::default();
    let mut doc = s.new_document(1080, 1920).unwrap();
    let AttachedMedia { asset, format, .. } = s
        .attach(&mut doc, Path::new("/m/photo.PNG"), &probe_with(1920, 1080, 99.0, true))
        .unwrap();
    assert_eq!((asset.id.as_str(), format.id.as_str()), ("r2", "r3"));
    assert_eq!(asset.duration, "0s");
    assert!(!asset.has_audio);
    assert_eq!(asset.name, "photo");
    assert_eq!(format.frame_duration, None);
    assert_eq!(format.name.as_deref(), Some("FFVideoFormatRateUndefined"));
    assert_eq!(doc.resources.assets.len(), 1);
    assert_eq!(doc.resources.formats.len(), 2);
}

#[test]
fn attach_video_uses_probed_duration() {
    let s = Session::default();
    let mut doc = s.new_document(1920, 1080).unwrap();
    let AttachedMedia { asset, format, .. } = s
        .attach(&mut doc, Path::new("/m/clip.mov"), &probe_with(1920, 1080, 5.0, false))
        .unwrap();
    assert_eq!(asset.duration, s.profile().clock().seconds_to_duration(5.0).unwrap());
    assert_eq!(asset.audio_rate, None);
    assert_eq!(format.name, None);
    assert_eq!(format.frame_duration.as_deref(), Some("1001/24000s"));
}

#[test]
fn failed_probe_falls_back() {
    let s = Session::default();
    let mut doc = s.new_document(1080, 1920).unwrap();
    let AttachedMedia { asset, format, .. } = s
        .attach(&mut doc, Path::new("/m/clip.mp4"), &failing_probe)
        .unwrap();
    assert_eq!(asset.duration, "240240/24000s");
    assert!(!asset.has_audio);
    assert_eq!((format.width, format.height), (1920, 1080));
}

#[test]
fn attach_rejects_unsupported_without_consuming_ids() {
    let s = Session::default();
    let mut doc = s.new_document(1080, 1920).unwrap();
    let err = s
        .attach(&mut doc, Path::new("/m/notes.txt"), &failing_probe)
        .unwrap_err();
    assert!(matches!(err, FcpxError::UnsupportedMedia(_)));
    assert_eq!(s.ids().next_resource_id(), "r2");
}

#[test]
fn attach_media_rejects_declared_ids() {
    let s = Session::default();
    let mut doc = s.new_document(1080, 1920).unwrap();
    let err = s
        .attach_media(&mut doc, Path::new("/m/a.png"), "r1", "r9", &failing_probe)
        .unwrap_err();
    assert!(err.to_string().contains("'r1'"));
}

#[test]
fn landscape_still_in_vertical_project_is_scaled() {
    let s = Session::default();
    let mut doc = s.new_document(1080, 1920).unwrap();
    let media = s
        .attach(&mut doc, Path::new("/m/wide.png"), &probe_with(1920, 1080, 0.0, false))
        .unwrap();
    let node = s.media_node(&doc, &media, "0s", 5.0).unwrap();
    let TimelineNode::Video(v) = node else {
        panic!("still should render as video");
    };
    assert_eq!(v.start, "86399313/24000s");
    assert_eq!(
        v.transform.and_then(|t| t.scale).as_deref(),
        Some(VERTICAL_FILL_SCALE)
    );
}

#[test]
fn tall_content_and_landscape_projects_are_not_scaled() {
    let s = Session::default();
    let mut doc = s.new_document(1080, 1920).unwrap();
    let media = s
        .attach(&mut doc, Path::new("/m/tall.mp4"), &probe_with(1080, 1920, 3.0, true))
        .unwrap();
    let TimelineNode::AssetClip(a) = s.media_node(&doc, &media, "0s", 3.0).unwrap() else {
        panic!("video should render as asset-clip");
    };
    assert!(a.transform.is_none());
    assert_eq!(a.audio_role.as_deref(), Some("dialogue"));
    assert_eq!(a.format.as_deref(), Some(media.format.id.as_str()));

    let mut wide = s.new_document(1920, 1080).unwrap();
    let media = s
        .attach(&mut wide, Path::new("/m/wide.mp4"), &probe_with(1920, 1080, 3.0, false))
        .unwrap();
    let node = s.media_node(&wide, &media, "0s", 3.0).unwrap();
    assert!(matches!(node, TimelineNode::AssetClip(AssetClip { transform: None, .. })));
}

#[test]
fn title_effect_is_registered_once() {
    let s = Session::default();
    let mut doc = s.new_document(1080, 1920).unwrap();
    let a = s.title_node(&mut doc, "One", "0s", 2.0, Some(1)).unwrap();
    let b = s.title_node(&mut doc, "Two", "0s", 2.0, None).unwrap();
    assert_eq!(doc.resources.effects.len(), 1);
    let (TimelineNode::Title(a), TimelineNode::Title(b)) = (a, b) else {
        panic!("expected titles");
    };
    assert_eq!(a.ref_id, b.ref_id);
    assert_eq!(a.lane, Some(1));
    assert_eq!((a.style.id.as_str(), b.style.id.as_str()), ("ts1", "ts2"));
    assert_eq!(a.start.as_deref(), Some("86486400/24000s"));
}

#[test]
fn append_sorts_batch_and_updates_duration() {
    let s = Session::default();
    let mut doc = s.new_document(1080, 1920).unwrap();
    let media = s
        .attach(&mut doc, Path::new("/m/a.png"), &probe_with(1080, 1920, 0.0, false))
        .unwrap();
    let later = s.media_node(&doc, &media, "120120/24000s", 2.0).unwrap();
    let first = s.media_node(&doc, &media, "0s", 5.0).unwrap();

    s.append_by_offset(&mut doc, vec![later, first]).unwrap();
    let seq = doc.sequence().unwrap();
    let offsets: Vec<_> = seq.spine.elements.iter().map(TimelineNode::offset).collect();
    assert_eq!(offsets, ["0s", "120120/24000s"]);
    // 120 + 48 frames
    assert_eq!(seq.duration, "168168/24000s");
}

#[test]
fn append_refuses_to_break_spine_order() {
    let s = Session::default();
    let mut doc = s.new_document(1080, 1920).unwrap();
    let media = s
        .attach(&mut doc, Path::new("/m/a.png"), &probe_with(1080, 1920, 0.0, false))
        .unwrap();
    let late = s.media_node(&doc, &media, "120120/24000s", 1.0).unwrap();
    s.append_by_offset(&mut doc, vec![late]).unwrap();

    let early = s.media_node(&doc, &media, "0s", 1.0).unwrap();
    let err = s.append_by_offset(&mut doc, vec![early]).unwrap_err();
    assert!(err.to_string().contains("must not decrease"));
    assert_eq!(doc.sequence().unwrap().spine.elements.len(), 1);
}

#[test]
fn save_writes_file_and_reports() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("out.fcpxml");
    let s = Session::default();
    let mut doc = s.new_document(1080, 1920).unwrap();
    let media = s
        .attach(&mut doc, Path::new("/m/a.jpg"), &probe_with(1920, 1080, 0.0, false))
        .unwrap();
    let node = s.media_node(&doc, &media, "0s", 3.0).unwrap();
    s.append_by_offset(&mut doc, vec![node]).unwrap();

    let report = s.save(&doc, &path, &QuickXmlChecker).unwrap();
    assert!(report.is_ok(), "{}", report.reason());
    let body = std::fs::read_to_string(&path).unwrap();
    assert!(body.contains(r#"scale="3.27127 3.27127""#));

    doc.resources.assets[0].id = "r50".to_owned();
    doc.resources.formats[1].id = "r51".to_owned();
    doc.resources.assets[0].format = "r51".to_owned();
    let report = s.save(&doc, &path, &QuickXmlChecker).unwrap();
    assert_eq!(
        report.issues,
        vec![ValidationIssue::MissingReferences(vec!["r2".to_owned()])]
    );
    assert!(path.exists());
}

#[test]
fn scaling_follows_probed_aspect_over_geometry() {
    let s = Session::default();
    let mut doc = s.new_document(1080, 1920).unwrap();
    let wide_but_tall_pixels = |_: &Path| -> Result<MediaProbeResult, String> {
        Ok(MediaProbeResult {
            width: 1080,
            height: 1920,
            aspect_ratio: 16.0 / 9.0,
            ..MediaProbeResult::fallback()
        })
    };
    let media = s
        .attach(&mut doc, Path::new("/m/a.png"), &wide_but_tall_pixels)
        .unwrap();
    assert_eq!((media.format.width, media.format.height), (1080, 1920));

    let TimelineNode::Video(v) = s.media_node(&doc, &media, "0s", 2.0).unwrap() else {
        panic!("still should render as video");
    };
    assert_eq!(
        v.transform.and_then(|t| t.scale).as_deref(),
        Some(VERTICAL_FILL_SCALE)
    );
}

#[test]
fn unusable_probed_aspect_falls_back_to_geometry() {
    let s = Session::default();
    let mut doc = s.new_document(1080, 1920).unwrap();
    let mut media = s
        .attach(&mut doc, Path::new("/m/tall.png"), &probe_with(1080, 1920, 0.0, false))
        .unwrap();
    media.aspect_ratio = f64::NAN;
    assert_eq!(media.scaling_aspect(), 1080.0 / 1920.0);

    let TimelineNode::Video(v) = s.media_node(&doc, &media, "0s", 2.0).unwrap() else {
        panic!("still should render as video");
    };
    assert!(v.transform.is_none());
}

#[test]
fn video_formats_keep_profile_rate_for_other_source_rates() {
    let s = Session::default();
    let mut doc = s.new_document(1920, 1080).unwrap();
    let pal = |_: &Path| -> Result<MediaProbeResult, String> {
        Ok(MediaProbeResult {
            duration_seconds: 4.0,
            frame_rate: 25.0,
            ..MediaProbeResult::fallback()
        })
    };
    let media = s.attach(&mut doc, Path::new("/m/pal.mov"), &pal).unwrap();
    assert_eq!(media.format.frame_duration.as_deref(), Some("1001/24000s"));
    assert!(s.profile().clock().is_frame_aligned(&media.asset.duration));
}
