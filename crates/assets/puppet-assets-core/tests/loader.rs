use puppet_assets_core::settings::HOTKEY_MOTION_GROUP;
use puppet_assets_core::{is_puppet_container, load_bundle, LoadError, MemorySource};
use puppet_test_fixtures::{png, puppets, zip_entries};

fn loose(name: &str) -> MemorySource {
    puppets::files(name).expect("fixture files").into_iter().collect()
}

#[test]
fn loose_bundle_resolves_relative_to_settings() {
    let source = loose("sample");
    let reference = puppets::settings_ref("sample").expect("settings ref");
    let bundle = load_bundle(&source, &reference).expect("load");

    assert!(bundle.topology.starts_with(b"MOC3"));
    assert_eq!(bundle.textures.len(), 1);
    assert_eq!((bundle.textures[0].width, bundle.textures[0].height), (16, 16));
    assert_eq!(bundle.expressions.len(), 2);
    assert!(bundle.physics.is_some());
    assert!(bundle.pose.is_some());
    assert!(bundle.user_data.is_none());

    let tap = bundle.motion_group("TapBody").expect("TapBody group");
    assert_eq!(tap.clips.len(), 2);
    assert!(tap.voice.is_some());
    assert!(bundle.motion_group("Idle").expect("Idle").voice.is_none());
    assert!(bundle.size_bytes() > 16 * 16 * 4);
}

#[test]
fn container_and_loose_forms_are_equivalent() {
    let reference = puppets::settings_ref("sample").unwrap();
    let from_loose = load_bundle(&loose("sample"), &reference).unwrap();

    let mut source = MemorySource::new();
    source.insert("sample.zip", puppets::zip("sample").unwrap());
    let from_zip = load_bundle(&source, "sample.zip").expect("container load");

    assert_eq!(from_zip.topology, from_loose.topology);
    assert_eq!(from_zip.textures, from_loose.textures);
    assert_eq!(from_zip.expressions, from_loose.expressions);
    assert_eq!(from_zip.motion_groups, from_loose.motion_groups);
    assert_eq!(from_zip.physics, from_loose.physics);
    assert_eq!(from_zip.settings, from_loose.settings);
}

#[test]
fn missing_optional_physics_still_loads() {
    let source: MemorySource = puppets::files_without("sample", ".physics3.json")
        .unwrap()
        .into_iter()
        .collect();
    let bundle = load_bundle(&source, &puppets::settings_ref("sample").unwrap()).expect("load");
    assert!(bundle.physics.is_none());
    assert!(bundle.pose.is_some());
}

#[test]
fn missing_required_artifacts_fail() {
    let reference = puppets::settings_ref("sample").unwrap();
    for suffix in [".moc3", "texture_00.png", "smile.exp3.json", "tap_01.motion3.json"] {
        let source: MemorySource = puppets::files_without("sample", suffix)
            .unwrap()
            .into_iter()
            .collect();
        match load_bundle(&source, &reference) {
            Err(LoadError::MissingAsset { path }) => assert!(path.ends_with(suffix), "{path}"),
            other => panic!("expected MissingAsset for {suffix}, got {other:?}"),
        }
    }
}

#[test]
fn empty_container_entries_count_as_missing() {
    let mut files = puppets::files("sample").unwrap();
    for (key, bytes) in files.iter_mut() {
        if key.ends_with(".moc3") || key.ends_with(".physics3.json") {
            bytes.clear();
        }
    }
    let mut source = MemorySource::new();
    source.insert("sample.zip", zip_entries(&files).unwrap());
    match load_bundle(&source, "sample.zip") {
        Err(LoadError::MissingAsset { path }) => assert!(path.ends_with(".moc3"), "{path}"),
        other => panic!("expected MissingAsset for the topology, got {other:?}"),
    }

    let files: Vec<_> = files
        .into_iter()
        .map(|(key, bytes)| {
            if key.ends_with(".moc3") {
                (key, b"MOC3 fixture topology".to_vec())
            } else {
                (key, bytes)
            }
        })
        .collect();
    source.insert("sample.zip", zip_entries(&files).unwrap());
    let bundle = load_bundle(&source, "sample.zip").expect("empty physics is optional");
    assert!(bundle.physics.is_none());
}

#[test]
fn unreachable_reference_is_a_fetch_error() {
    let err = load_bundle(&MemorySource::new(), "nowhere.model3.json").unwrap_err();
    assert!(matches!(err, LoadError::Fetch { .. }));
}

#[test]
fn malformed_settings_are_rejected() {
    let mut source = MemorySource::new();
    source.insert("bad.model3.json", b"{ \"FileReferences\": 7 }".to_vec());
    let err = load_bundle(&source, "bad.model3.json").unwrap_err();
    assert!(matches!(err, LoadError::InvalidSettings { .. }));
}

#[test]
fn undecodable_texture_fails_the_load() {
    let mut files = puppets::files("sample").unwrap();
    for (key, bytes) in files.iter_mut() {
        if key.ends_with(".png") {
            *bytes = b"not an image".to_vec();
        }
    }
    let source: MemorySource = files.into_iter().collect();
    let err = load_bundle(&source, &puppets::settings_ref("sample").unwrap()).unwrap_err();
    assert!(matches!(err, LoadError::DecodeFailure { .. }));
}

#[test]
fn hotkey_document_fills_missing_tables() {
    let bundle = load_bundle(&loose("minimal"), &puppets::settings_ref("minimal").unwrap())
        .expect("load");
    assert_eq!(bundle.settings.expression_names().collect::<Vec<_>>(), vec!["Blush"]);
    assert_eq!(bundle.motion_group(HOTKEY_MOTION_GROUP).unwrap().clips.len(), 1);

    let mut source = MemorySource::new();
    source.insert("minimal.zip", puppets::zip("minimal").unwrap());
    let zipped = load_bundle(&source, "minimal.zip").expect("container load");
    assert_eq!(zipped.expressions.len(), 1);
}

#[test]
fn container_detection() {
    assert!(is_puppet_container(&puppets::zip("sample").unwrap()));

    let no_texture = zip_entries(&puppets::files_without("sample", ".png").unwrap()).unwrap();
    assert!(!is_puppet_container(&no_texture));

    let macos_only = zip_entries(&[
        ("__MACOSX/a/a.model3.json".to_string(), b"{}".to_vec()),
        ("__MACOSX/a/a.moc3".to_string(), b"MOC3".to_vec()),
        ("__MACOSX/a/t.png".to_string(), png(1, 1, [0, 0, 0, 255]).unwrap()),
    ])
    .unwrap();
    assert!(!is_puppet_container(&macos_only));
    assert!(!is_puppet_container(b"{}"));
}
