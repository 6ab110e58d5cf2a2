use relir::config::{ConfigError, TranslatorConfig};
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_config_from_yaml_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "join_key_suffix: _key").unwrap();
    writeln!(file, "sub_select_prefix: inner").unwrap();

    let config = TranslatorConfig::from_yaml_file(file.path()).unwrap();
    assert_eq!(config.join_key_suffix, "_key");
    assert_eq!(config.sub_select_prefix, "inner");
    assert!(!config.legacy_greater_than_or_equal);
}

#[test]
fn test_config_fixture_file() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/translator.yaml");
    let config = TranslatorConfig::from_yaml_file(path).unwrap();
    assert_eq!(config.sub_select_prefix, "inner");
}

#[test]
fn test_config_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = TranslatorConfig::from_yaml_file(dir.path().join("absent.yaml")).unwrap_err();
    match err {
        ConfigError::Parse { field, .. } => assert_eq!(field, "yaml_file"),
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_config_rejects_bad_prefix_in_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "sub_select_prefix: \"9sq\"").unwrap();

    let err = TranslatorConfig::from_yaml_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));
}

#[test]
fn test_config_from_env() {
    std::env::set_var("RELIR_JOIN_KEY_SUFFIX", "_fk");
    std::env::set_var("RELIR_LEGACY_GTE", "true");
    let config = TranslatorConfig::from_env();
    std::env::remove_var("RELIR_JOIN_KEY_SUFFIX");
    std::env::remove_var("RELIR_LEGACY_GTE");

    let config = config.unwrap();
    assert_eq!(config.join_key_suffix, "_fk");
    assert_eq!(config.sub_select_prefix, "sq");
    assert!(config.legacy_greater_than_or_equal);
}
