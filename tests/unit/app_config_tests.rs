/*!
 * Tests for application configuration and validation
 */

use std::str::FromStr;

use rwmodtrans::app_config::{Config, LogLevel, MergeMode, TranslationConfig};

/// Test that the default configuration is a valid en -> fr setup
#[test]
fn test_default_config_shouldBeValid() {
    let config = Config::default();

    assert_eq!(config.source_language, "en");
    assert_eq!(config.target_language, "fr");
    assert_eq!(config.merge_mode, MergeMode::Add);
    assert_eq!(config.log_level, LogLevel::Info);
    assert_eq!(config.translation.timeout_secs, 30);
    assert_eq!(config.translation.retry_count, 3);
    assert!(config.validate().is_ok());
}

/// Test that equal source and target languages fail validation
#[test]
fn test_validate_withSameLanguages_shouldFail() {
    let config = Config {
        target_language: "en".to_string(),
        ..Config::default()
    };

    assert!(config.validate().is_err());
}

/// Test that an unknown language code fails validation
#[test]
fn test_validate_withUnknownLanguage_shouldFail() {
    let config = Config {
        source_language: "zz".to_string(),
        ..Config::default()
    };

    assert!(config.validate().is_err());
}

/// Test that an empty endpoint fails validation
#[test]
fn test_validate_withEmptyEndpoint_shouldFail() {
    let config = Config {
        translation: TranslationConfig {
            endpoint: String::new(),
            ..TranslationConfig::default()
        },
        ..Config::default()
    };

    assert!(config.validate().is_err());
}

/// Test that zero concurrent files fails validation
#[test]
fn test_validate_withZeroConcurrency_shouldFail() {
    let config = Config {
        translation: TranslationConfig {
            concurrent_files: 0,
            ..TranslationConfig::default()
        },
        ..Config::default()
    };

    assert!(config.validate().is_err());
}

/// Test merge mode string conversions in both directions
#[test]
fn test_merge_mode_conversions_shouldRoundTrip() {
    assert_eq!(MergeMode::from_str("add").unwrap(), MergeMode::Add);
    assert_eq!(MergeMode::from_str("Replace").unwrap(), MergeMode::Replace);
    assert!(MergeMode::from_str("merge").is_err());

    assert_eq!(MergeMode::Add.to_string(), "add");
    assert_eq!(MergeMode::Replace.to_string(), "replace");
}

/// Test JSON serialization round trip including serde defaults
#[test]
fn test_config_json_shouldRoundTripWithDefaults() {
    let json = r#"{
        "source_language": "en",
        "target_language": "de",
        "merge_mode": "replace",
        "translation": {}
    }"#;

    let config: Config = serde_json::from_str(json).unwrap();
    assert_eq!(config.target_language, "de");
    assert_eq!(config.merge_mode, MergeMode::Replace);
    assert_eq!(
        config.translation.endpoint,
        "https://translate.googleapis.com"
    );
    assert_eq!(config.log_level, LogLevel::Info);

    let serialized = serde_json::to_string(&config).unwrap();
    let reparsed: Config = serde_json::from_str(&serialized).unwrap();
    assert_eq!(reparsed.merge_mode, MergeMode::Replace);
    assert_eq!(reparsed.translation.timeout_secs, config.translation.timeout_secs);
}
