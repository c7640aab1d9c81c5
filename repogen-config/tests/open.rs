//! Filesystem-facing configuration tests.

use std::fs;

use repogen_config::{CONFIG_FILE_NAME, Config, Error};
use repogen_core::DatabaseType;
use tempfile::TempDir;

#[test]
fn test_open_reads_and_validates() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(CONFIG_FILE_NAME);
    fs::write(&path, "[database]\nbackend = \"mysql\"\n").unwrap();

    let config = Config::open(&path).unwrap();

    assert_eq!(config.database.backend, DatabaseType::Mysql);
}

#[test]
fn test_open_missing_file_is_io_error() {
    let temp = TempDir::new().unwrap();
    let err = Config::open(temp.path().join("nope.toml")).unwrap_err();

    assert!(matches!(*err, Error::Io { .. }));
}

#[test]
fn test_parse_error_names_the_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(CONFIG_FILE_NAME);
    fs::write(&path, "[generator\n").unwrap();

    let err = Config::open(&path).unwrap_err();

    assert!(err.to_string().starts_with("configuration: failed to parse"));
    assert!(err.to_string().ends_with(CONFIG_FILE_NAME));
}

#[test]
fn test_discover_finds_sibling_config() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("user.rs");
    fs::write(&source, "pub struct User;").unwrap();

    assert_eq!(Config::discover(&source), None);

    fs::write(temp.path().join(CONFIG_FILE_NAME), "").unwrap();
    assert_eq!(
        Config::discover(&source),
        Some(temp.path().join(CONFIG_FILE_NAME))
    );
}
