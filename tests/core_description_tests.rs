use std::fs;

use flowtab::core::{BlockDescription, PortSpec, PortTag};

fn example_description() -> BlockDescription {
    BlockDescription {
        display_name: "Embedded Block".to_string(),
        class_id: "blk".to_string(),
        params: vec![
            ("example_param".to_string(), "1.0".to_string()),
            ("vlen".to_string(), "1".to_string()),
        ],
        sinks: vec![
            PortSpec::stream(0, PortTag::Complex, 1),
            PortSpec::message("command"),
        ],
        sources: vec![PortSpec::stream(0, PortTag::Float, 8)],
        doc: "Example block".to_string(),
        callbacks: vec!["example_param".to_string()],
    }
}

#[test]
fn test_cache_round_trip() {
    let description = example_description();
    let blob = description.to_cache_string();
    let restored = BlockDescription::from_cache_str(&blob).unwrap();
    assert_eq!(restored, description);
}

#[test]
fn test_legacy_blob_without_callbacks() {
    // caches written before the callbacks field carried 6 positional
    // fields; they must still load, with empty callbacks
    let blob = r#"["Old Block","blk",[["gain","2.0"]],[["0","complex",1]],[["0","complex",1]],"old doc"]"#;
    let restored = BlockDescription::from_cache_str(blob).unwrap();
    assert_eq!(restored.display_name, "Old Block");
    assert_eq!(restored.params, vec![("gain".to_string(), "2.0".to_string())]);
    assert_eq!(restored.sinks, vec![PortSpec::stream(0, PortTag::Complex, 1)]);
    assert!(restored.callbacks.is_empty());
}

#[test]
fn test_malformed_blobs_fail() {
    let blobs = [
        "",
        "not json",
        "{}",
        "[]",
        r#"["name","cls",[],[],[]]"#,
        r#"["name","cls",[],[["0","voltage",1]],[],"doc",[]]"#,
        r#"["name","cls",[],[["0","complex",0]],[],"doc",[]]"#,
        r#"["name","cls",[["only_id"]],[],[],"doc",[]]"#,
    ];
    for blob in blobs {
        assert!(
            BlockDescription::from_cache_str(blob).is_err(),
            "blob should fail: {}",
            blob
        );
    }
}

#[test]
fn test_blob_survives_file_round_trip() {
    // the host's save/load subsystem stores the blob verbatim
    let description = example_description();
    let blob = description.to_cache_string();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("io_cache.json");
    fs::write(&path, &blob).unwrap();
    let loaded = fs::read_to_string(&path).unwrap();

    assert_eq!(loaded, blob);
    assert_eq!(BlockDescription::from_cache_str(&loaded).unwrap(), description);
}

#[test]
fn test_positional_keys() {
    assert!(PortSpec::stream(0, PortTag::Complex, 1).is_positional());
    assert!(PortSpec::stream(12, PortTag::Byte, 4).is_positional());
    assert!(!PortSpec::message("command").is_positional());
    assert!(!PortSpec::message("msg2").is_positional());
}
