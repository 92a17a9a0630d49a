//! Build ingestion and validation against files on disk.

use std::fs;

use rotasim::combat::ability::AbilityId;
use rotasim::data::build::{load_build, sample_build, BuildError};
use rotasim::data::validate::validate_build;

fn temp_path(name: &str) -> std::path::PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("rotasim-test-{}-{name}", std::process::id()));
    path
}

#[test]
fn load_round_trips_a_written_build() {
    let path = temp_path("roundtrip.json");
    let build = sample_build();
    fs::write(&path, serde_json::to_string_pretty(&build).unwrap()).unwrap();

    let loaded = load_build(&path).unwrap();
    assert_eq!(loaded, build);
    assert_eq!(loaded.queue.first(), Some(&AbilityId::Enchant));

    fs::remove_file(&path).ok();
}

#[test]
fn missing_file_is_an_io_error_naming_the_path() {
    let err = load_build("does-not-exist.json").unwrap_err();
    match err {
        BuildError::Io(message) => assert!(message.contains("does-not-exist.json")),
        other => panic!("expected io error, got {other:?}"),
    }
}

#[test]
fn malformed_json_is_a_parse_error() {
    let path = temp_path("malformed.json");
    fs::write(&path, "{ not json").unwrap();
    let err = load_build(&path).unwrap_err();
    assert!(matches!(err, BuildError::Parse(_)));
    fs::remove_file(&path).ok();
}

#[test]
fn loaded_build_validates_cleanly() {
    let path = temp_path("valid.json");
    fs::write(&path, serde_json::to_string(&sample_build()).unwrap()).unwrap();
    let build = load_build(&path).unwrap();
    assert!(!validate_build(&build).has_errors());
    fs::remove_file(&path).ok();
}
