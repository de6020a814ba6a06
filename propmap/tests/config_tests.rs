use pretty_assertions::assert_eq;
use propmap::{DEFAULT_COMMENT, PropmapConfig, PropmapError};

fn write_config(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("propmap.toml");
    std::fs::write(&path, contents).unwrap();
    (dir, path)
}

#[test]
fn missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = PropmapConfig::load_from(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(config, PropmapConfig::default());
    assert_eq!(config.comment, DEFAULT_COMMENT);
}

#[test]
fn load_marshaller_table() {
    let (_dir, path) = write_config(
        r#"
[marshaller]
comment = "Customer directory"
timestamp = false
"#,
    );
    let config = PropmapConfig::load_from(&path).unwrap();
    assert_eq!(config.comment, "Customer directory");
    assert!(!config.timestamp);
    assert!(!config.store_options().timestamp);
}

#[test]
fn unrelated_tables_are_ignored() {
    let (_dir, path) = write_config("[other]\nkey = 1\n");
    assert_eq!(PropmapConfig::load_from(&path).unwrap(), PropmapConfig::default());
}

#[test]
fn malformed_file_is_a_config_error() {
    let (_dir, path) = write_config("[marshaller\ncomment = ");
    let err = PropmapConfig::load_from(&path).unwrap_err();
    assert!(matches!(err, PropmapError::Config(_)));
    assert!(err.to_string().starts_with("invalid configuration"));
}
