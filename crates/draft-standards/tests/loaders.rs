//! Tests for loading standards from the embedded defaults and config dirs.

use std::fs;

use draft_model::Position;
use draft_standards::{
    ALIASES_FILE, StandardsError, StandardsSource, WEIGHTS_FILE, load_embedded_standards,
    load_standards_from_dir,
};

#[test]
fn loads_embedded_defaults() {
    let standards = load_embedded_standards().expect("load embedded standards");
    assert_eq!(standards.weights_source, StandardsSource::Embedded);
    assert_eq!(standards.grading.round_map.len(), 7);
    assert_eq!(standards.grading.round_map[0].label, "Round 1");
    assert_eq!(standards.aliases.resolve("SAF").unwrap(), Position::S);
    assert_eq!(standards.aliases.resolve("olb-edge").unwrap(), Position::Edge);
    assert_eq!(standards.aliases.resolve("IOLG").unwrap(), Position::Iol);
    assert_eq!(standards.aliases.resolve("NT").unwrap(), Position::Dt);
    assert_eq!(standards.grading.comps.k, 3);
}

#[test]
fn every_position_has_weights_and_thresholds() {
    let standards = load_embedded_standards().expect("load embedded standards");
    for position in Position::ALL {
        assert!(standards.grading.weights_for(position).is_some());
        assert!(standards.grading.threshold_for(position).is_some());
    }
}

#[test]
fn config_dir_overrides_aliases_only() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(
        dir.path().join(ALIASES_FILE),
        "alias,position\nSAF,S\nSTAR,CB\n",
    )
    .expect("write aliases");

    let standards = load_standards_from_dir(dir.path()).expect("load from dir");
    assert_eq!(standards.weights_source, StandardsSource::Embedded);
    assert!(matches!(standards.aliases_source, StandardsSource::File(_)));
    assert_eq!(standards.aliases.resolve("star").unwrap(), Position::Cb);
    assert!(standards.aliases.resolve("NT").is_err());
}

#[test]
fn invalid_weights_file_fails_at_load() {
    let dir = tempfile::tempdir().expect("tempdir");
    let embedded = include_str!("../../../standards/weights.toml");
    let broken = embedded.replacen("trait = 0.40", "trait = 0.45", 1);
    fs::write(dir.path().join(WEIGHTS_FILE), broken).expect("write weights");

    let err = load_standards_from_dir(dir.path()).unwrap_err();
    assert!(matches!(
        err,
        StandardsError::WeightSum {
            position: Position::Qb,
            ..
        }
    ));
}

#[test]
fn missing_config_dir_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("nope");
    assert!(matches!(
        load_standards_from_dir(&missing),
        Err(StandardsError::Io { .. })
    ));
}
