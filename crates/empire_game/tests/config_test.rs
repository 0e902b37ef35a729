//! Tests for loading game rules from TOML.

use empire_game::GameConfig;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write config");
    file
}

#[test]
fn test_empty_file_uses_classic_rules() {
    let file = write_config("");
    let config = GameConfig::from_file(file.path()).expect("Failed to load config");

    assert_eq!(config, GameConfig::default());
    assert_eq!(*config.max_players(), 15);
    assert_eq!(*config.min_players(), 2);
    assert_eq!(config.alias_deadline(), Duration::from_secs(60));
    assert_eq!(config.turn_deadline(), Duration::from_secs(60));
    assert_eq!(*config.missed_turn_limit(), 2);
    assert!(config.seed().is_none());
}

#[test]
fn test_overrides_are_applied() {
    let file = write_config(
        r#"
max_players = 6
alias_deadline_secs = 30
turn_deadline_secs = 20
missed_turn_limit = 3
seed = 7
"#,
    );
    let config = GameConfig::from_file(file.path()).expect("Failed to load config");

    assert_eq!(*config.max_players(), 6);
    assert_eq!(*config.min_players(), 2);
    assert_eq!(config.alias_deadline(), Duration::from_secs(30));
    assert_eq!(config.turn_deadline(), Duration::from_secs(20));
    assert_eq!(*config.missed_turn_limit(), 3);
    assert_eq!(*config.seed(), Some(7));
}

#[test]
fn test_unplayable_rules_rejected() {
    for content in [
        "min_players = 1",
        "max_players = 3\nmin_players = 4",
        "turn_deadline_secs = 0",
        "missed_turn_limit = 0",
    ] {
        let err = GameConfig::from_toml(content).expect_err(content);
        assert!(err.message.contains("must be") || err.message.contains("below"));
    }
}

#[test]
fn test_parse_error_reports_location() {
    let err = GameConfig::from_toml("max_players = \"many\"").expect_err("bad type");
    assert!(err.message.contains("Failed to parse config"));
    assert!(err.file.ends_with("config.rs"));
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let err = GameConfig::from_file(dir.path().join("absent.toml")).expect_err("missing file");
    assert!(err.message.contains("Failed to read config file"));
}

#[test]
fn test_builders_keep_other_rules() {
    let config = GameConfig::default()
        .with_seed(9)
        .with_deadlines(Duration::from_secs(5), Duration::from_secs(3))
        .expect("whole-second deadlines should be accepted");
    assert_eq!(*config.seed(), Some(9));
    assert_eq!(config.alias_deadline(), Duration::from_secs(5));
    assert_eq!(config.turn_deadline(), Duration::from_secs(3));
    assert_eq!(*config.max_players(), 15);
    assert!(config.validate().is_ok());
}

#[test]
fn test_sub_second_deadlines_rejected() {
    let err = GameConfig::default()
        .with_deadlines(Duration::from_millis(500), Duration::from_millis(500))
        .expect_err("sub-second deadline");
    assert!(err.message.contains("whole seconds"));

    let err = GameConfig::default()
        .with_deadlines(Duration::from_secs(30), Duration::from_millis(1500))
        .expect_err("fractional turn deadline");
    assert!(err.message.contains("whole seconds"));
}

#[test]
fn test_zero_deadline_builder_rejected() {
    let err = GameConfig::default()
        .with_deadlines(Duration::ZERO, Duration::from_secs(10))
        .expect_err("zero deadline");
    assert!(err.message.contains("at least one second"));
}
