use super::*;

fn p() -> Profile {
    Profile::default()
}

#[test]
fn sequence_defaults_are_valid() {
    let s = Sequence::new(&p(), "r1").unwrap();
    assert_eq!(s.duration, "0s");
    assert_eq!(s.audio_rate, "48k");
    assert!(s.spine.elements.is_empty());
}

#[test]
fn sequence_accepts_only_enumerated_audio_rates() {
    for rate in ["32k", "44.1k", "48k", "88.2k", "96k", "176.4k", "192k"] {
        assert!(Sequence::new(&p(), "r1").unwrap().with_audio_rate(&p(), rate).is_ok());
    }
    for rate in ["48000", "22.05k", "48K", ""] {
        let err = Sequence::new(&p(), "r1")
            .unwrap()
            .with_audio_rate(&p(), rate)
            .unwrap_err();
        assert!(err.to_string().contains("audioRate"), "{rate}");
    }
}

#[test]
fn sequence_rejects_misaligned_duration() {
    let mut s = Sequence::new(&p(), "r1").unwrap();
    s.duration = "100/24000s".to_owned();
    assert!(s.validate(&p()).is_err());
}

#[test]
fn required_collections_have_fixed_shape() {
    let cols = SmartCollection::required();
    let names: Vec<_> = cols.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, REQUIRED_COLLECTIONS);
    assert_eq!(cols[1].match_mode, MatchMode::Any);
    assert_eq!(cols[1].rules.len(), 2);
    assert!(matches!(cols[4].rules[0], MatchRule::Ratings { .. }));
}

#[test]
fn document_validate_reports_missing_collections() {
    let project = Project {
        name: "p".to_owned(),
        uid: "U".to_owned(),
        mod_date: None,
        sequence: Sequence::new(&p(), "r1").unwrap(),
    };
    let mut doc = Document {
        version: "1.13".to_owned(),
        resources: Resources::default(),
        library: Library::new(vec![Event {
            name: "e".to_owned(),
            uid: "E".to_owned(),
            projects: vec![project],
        }]),
    };
    doc.validate(&p()).unwrap();
    assert!(doc.sequence().is_some());

    doc.library.smart_collections.retain(|c| c.name != "Stills");
    assert_eq!(doc.library.missing_collections(), ["Stills"]);
    assert!(doc.validate(&p()).is_err());

    doc.library.smart_collections = SmartCollection::required();
    doc.version = "13".to_owned();
    assert!(doc.validate(&p()).is_err());
}
