use std::path::{Path, PathBuf};

use pixel_arcade::config::*;
use pixel_arcade::error::ConfigError;

use pretty_assertions::assert_eq;
use tempfile::TempDir;

#[test]
fn defaults_are_playable() {
    let c = ArcadeConfig::default();
    assert_eq!(c.display, DisplayConfig { width: 128, height: 128 });
    assert_eq!(c.timing.frame_ms, 16);
    assert_eq!(c.timing.render_ms, 16);
    assert_eq!(c.timing.snake_step_ms, 150);
    assert_eq!(c.store.size, 16);
    assert_eq!(c.log.filter, "info");
}

#[test]
fn empty_file_gives_defaults() {
    let c = ArcadeConfig::from_toml("", Path::new("empty.toml")).unwrap();
    assert_eq!(c, ArcadeConfig::default());
}

#[test]
fn partial_table_keeps_other_defaults() {
    let text = r#"
[timing]
snake_step_ms = 200

[store]
path = "/tmp/arcade.bin"
"#;
    let c = ArcadeConfig::from_toml(text, Path::new("partial.toml")).unwrap();
    assert_eq!(c.timing.snake_step_ms, 200);
    assert_eq!(c.timing.frame_ms, 16);
    assert_eq!(c.store.score_path(), PathBuf::from("/tmp/arcade.bin"));
    assert_eq!(c.display, DisplayConfig::default());
}

#[test]
fn bad_value_is_a_parse_error() {
    let err = ArcadeConfig::from_toml("[display]\nwidth = \"wide\"\n", Path::new("bad.toml"))
        .unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("bad.toml"));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let err = ArcadeConfig::from_file(&dir.path().join("nope.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn load_reads_explicit_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("arcade.toml");
    std::fs::write(&path, "[log]\nfilter = \"debug\"\n").unwrap();

    let c = ArcadeConfig::load(Some(path.as_path())).unwrap();
    assert_eq!(c.log.filter, "debug");
}

#[test]
fn default_score_path_lives_in_home() {
    let c = StoreConfig::default();
    assert!(c.score_path().ends_with(DEFAULT_SCORE_FILE));
}
