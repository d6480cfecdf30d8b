//! Configuration loading and startup validation.

use blobtext::{ConfigGroup, ContentExtractProcessor, ErrorCode, StageConfig, validate};
use std::fs;
use tempfile::tempdir;

mod helpers;
use helpers::{content_of, file_record};

#[test]
fn test_default_config_has_no_issues() {
    let processor = ContentExtractProcessor::new(StageConfig::default()).unwrap();
    assert!(processor.init().is_empty());
}

#[test]
fn test_invalid_value_reported_once() {
    let config = StageConfig {
        config: "invalidValue".to_string(),
        ..StageConfig::default()
    };
    let processor = ContentExtractProcessor::new(config).unwrap();

    let issues = processor.init();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].config_field, "config");
    assert_eq!(issues[0].group, ConfigGroup::Extraction);
    assert_eq!(issues[0].error_code, ErrorCode::ConfigInvalid);
    assert!(issues[0].to_string().starts_with("CONTENT_00 [EXTRACTION.config]"));

    assert_eq!(processor.init(), issues);
}

#[test]
fn test_issue_serialization() {
    let config = StageConfig {
        config: "invalidValue".to_string(),
        ..StageConfig::default()
    };
    let issues = validate(&config);
    let json = serde_json::to_value(&issues[0]).unwrap();

    assert_eq!(json["group"], "EXTRACTION");
    assert_eq!(json["config_field"], "config");
    assert_eq!(json["error_code"], "CONTENT_00");
}

#[test]
fn test_limits_from_toml_apply_to_processing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("blobtext.toml");
    fs::write(&path, "max_content_chars = 4\n").unwrap();

    let config = StageConfig::from_file(&path).unwrap();
    assert!(validate(&config).is_empty());

    let processor = ContentExtractProcessor::new(config).unwrap();
    assert!(processor.process_record(&file_record("a", "a.txt", b"abcd")).is_ok());

    let err = processor
        .process_record(&file_record("b", "b.txt", b"abcde"))
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::ContentTooLarge);
}

#[test]
fn test_zero_limits_flagged_in_limits_group() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("stage.yaml");
    fs::write(&path, "max_input_bytes: 0\ntimeout_secs: 0\nmax_archive_depth: 64\n").unwrap();

    let config = StageConfig::from_file(&path).unwrap();
    let issues = validate(&config);

    let fields: Vec<&str> = issues.iter().map(|issue| issue.config_field.as_str()).collect();
    assert_eq!(fields, vec!["max_input_bytes", "timeout_secs", "max_archive_depth"]);
    assert!(issues.iter().all(|issue| issue.group == ConfigGroup::Limits));
}

#[test]
fn test_malformed_config_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("stage.json");
    fs::write(&path, "{\"max_content_chars\": \"lots\"}").unwrap();

    assert!(matches!(
        StageConfig::from_file(&path),
        Err(blobtext::BlobtextError::Validation { .. })
    ));
}

#[test]
fn test_invalid_config_does_not_block_records() {
    let config = StageConfig {
        config: "invalidValue".to_string(),
        ..StageConfig::default()
    };
    let processor = ContentExtractProcessor::new(config).unwrap();
    assert_eq!(processor.init().len(), 1);

    let output = processor.process_record(&file_record("r", "r.txt", b"still flows")).unwrap();
    assert_eq!(content_of(&output), "still flows");
}
