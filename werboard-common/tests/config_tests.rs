//! Unit tests for configuration loading and root folder resolution
//!
//! Tests that touch WERBOARD_ROOT_FOLDER are marked #[serial] so they never
//! race on the process environment.

use serial_test::serial;
use std::env;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use werboard_common::config::{
    default_root_folder, resolve_root_folder, Config, ConfigOverrides, TomlConfig, DATABASE_FILE,
    ROOT_FOLDER_ENV,
};
use werboard_common::Error;

#[tokio::test]
async fn test_missing_config_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let config = TomlConfig::load(&dir.path().join("absent.toml"))
        .await
        .expect("Missing file should not be an error");
    assert_eq!(config.port, 5790);
    assert!(config.root_folder.is_none());
}

#[tokio::test]
async fn test_invalid_config_file_is_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "port = \"not a number\"").unwrap();

    let result = TomlConfig::load(&path).await;
    assert!(matches!(result, Err(Error::Config(_))));
}

#[tokio::test]
async fn test_full_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
root_folder = "/srv/werboard"
bind_address = "0.0.0.0"
port = 9000
max_upload_bytes = 2048

[scoring]
baseline_username = "reference-system"
max_points = 20.0
top_n = 5

[logging]
level = "debug"
"#,
    )
    .unwrap();

    let config = TomlConfig::load(&path).await.unwrap();
    assert_eq!(config.root_folder, Some(PathBuf::from("/srv/werboard")));
    assert_eq!(config.bind_address, "0.0.0.0");
    assert_eq!(config.port, 9000);
    assert_eq!(config.max_upload_bytes, 2048);
    assert_eq!(config.scoring.baseline_username, "reference-system");
    assert_eq!(config.scoring.max_points, 20.0);
    assert_eq!(config.scoring.top_n, 5);
    assert_eq!(config.logging.level, "debug");
}

#[test]
#[serial]
fn test_resolver_with_no_overrides_uses_default() {
    env::remove_var(ROOT_FOLDER_ENV);
    let root = resolve_root_folder(None, ROOT_FOLDER_ENV, None);
    assert_eq!(root, default_root_folder());
}

#[test]
#[serial]
fn test_resolver_priority_order() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/werboard-env");

    // CLI beats environment
    let root = resolve_root_folder(
        Some(Path::new("/tmp/werboard-cli")),
        ROOT_FOLDER_ENV,
        Some(Path::new("/tmp/werboard-toml")),
    );
    assert_eq!(root, PathBuf::from("/tmp/werboard-cli"));

    // Environment beats TOML
    let root = resolve_root_folder(None, ROOT_FOLDER_ENV, Some(Path::new("/tmp/werboard-toml")));
    assert_eq!(root, PathBuf::from("/tmp/werboard-env"));

    env::remove_var(ROOT_FOLDER_ENV);

    // TOML beats compiled default
    let root = resolve_root_folder(None, ROOT_FOLDER_ENV, Some(Path::new("/tmp/werboard-toml")));
    assert_eq!(root, PathBuf::from("/tmp/werboard-toml"));
}

#[test]
#[serial]
fn test_database_path_defaults_into_root_folder() {
    env::remove_var(ROOT_FOLDER_ENV);
    let overrides = ConfigOverrides {
        root_folder: Some(PathBuf::from("/tmp/werboard-root")),
        ..Default::default()
    };
    let config = Config::resolve(TomlConfig::default(), overrides).unwrap();
    assert_eq!(
        config.database_path,
        PathBuf::from("/tmp/werboard-root").join(DATABASE_FILE)
    );
}

#[test]
#[serial]
fn test_cli_overrides_win() {
    env::remove_var(ROOT_FOLDER_ENV);
    let toml_config = TomlConfig::parse("port = 9000\nbind_address = \"0.0.0.0\"\ndatabase_path = \"/tmp/a.db\"").unwrap();
    let overrides = ConfigOverrides {
        database_path: Some(PathBuf::from("/tmp/b.db")),
        port: Some(9100),
        bind_address: Some("127.0.0.1".to_string()),
        ..Default::default()
    };
    let config = Config::resolve(toml_config, overrides).unwrap();
    assert_eq!(config.database_path, PathBuf::from("/tmp/b.db"));
    assert_eq!(config.port, 9100);
    assert_eq!(config.bind_address, "127.0.0.1");
}

#[test]
#[serial]
fn test_resolve_rejects_invalid_scoring() {
    env::remove_var(ROOT_FOLDER_ENV);
    let toml_config = TomlConfig::parse("[scoring]\ntop_n = 0\n").unwrap();
    let result = Config::resolve(toml_config, ConfigOverrides::default());
    assert!(matches!(result, Err(Error::Config(_))));
}
