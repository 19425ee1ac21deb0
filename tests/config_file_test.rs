// ABOUTME: Config loading tests - JSON files, defaults, canonicalization
// ABOUTME: Uses temp files so each test owns its config on disk

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::io::Write;

use repcoach::config::{CoachConfig, ConfigError};

fn write_config(json: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

#[test]
fn test_partial_file_overrides_only_named_fields() {
    let file = write_config(
        r#"{
            "rep_ranges": {
                "Bench  Press": {"min_reps": 6, "max_reps": 8},
                "LAT PULLDOWN": {"min_reps": 8, "max_reps": 10}
            },
            "equipment_increment_kg": 1.25
        }"#,
    );
    let config = CoachConfig::from_file(file.path()).unwrap();

    // Keys are canonicalized on load.
    assert!(config.rule_for("bench press").is_some());
    assert!(config.rule_for("lat pulldown").is_some());
    assert_eq!(config.equipment_increment_kg, 1.25);
    // Unnamed fields keep their documented defaults.
    assert_eq!(config.rpe.increase_below, 7.5);
    assert_eq!(config.rpe.decrease_above, 9.0);
    assert!(config.is_excluded("treadmill"));
}

#[test]
fn test_assisted_and_excluded_lists_load_canonicalized() {
    let file = write_config(
        r#"{
            "assisted_exercises": ["Assisted  Dip"],
            "excluded_exercises": ["Rowing Machine"]
        }"#,
    );
    let config = CoachConfig::from_file(file.path()).unwrap();
    assert!(config.is_assisted("assisted dip"));
    assert!(config.is_excluded("rowing machine"));
    // Overriding the exclusion list replaces the defaults.
    assert!(!config.is_excluded("treadmill"));
}

#[test]
fn test_routine_cycle_loads_from_file() {
    let file = write_config(
        r#"{
            "routine": {
                "days": [
                    {"label": "Day 1 - Push", "exercises": ["Bench Press"]},
                    {"label": "Day 2 - Rest", "is_rest": true}
                ]
            }
        }"#,
    );
    let config = CoachConfig::from_file(file.path()).unwrap();
    let routine = config.routine.as_ref().unwrap();
    assert_eq!(routine.len(), 2);
    assert!(routine.days[1].is_rest);
    assert!(config.validate().is_empty());
}

#[test]
fn test_unreadable_file_is_an_io_error() {
    let err = CoachConfig::from_file(std::path::Path::new("/nonexistent/coach.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn test_malformed_json_is_a_parse_error() {
    let file = write_config("{not valid json");
    let err = CoachConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn test_validation_flags_bad_entries_without_failing_load() {
    let file = write_config(
        r#"{
            "rep_ranges": {"Squat": {"min_reps": 12, "max_reps": 8}},
            "equipment_increment_kg": 0.0,
            "routine": {"days": []}
        }"#,
    );
    let config = CoachConfig::from_file(file.path()).unwrap();
    let issues = config.validate();
    assert_eq!(issues.len(), 3);
    assert!(issues
        .iter()
        .any(|i| matches!(i, ConfigError::MalformedRepRange { .. })));
    assert!(issues.iter().any(|i| matches!(i, ConfigError::EmptyCycle)));
    assert!(issues
        .iter()
        .any(|i| matches!(i, ConfigError::NonPositiveIncrement(_))));
}
