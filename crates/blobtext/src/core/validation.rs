//! Startup validation of `StageConfig`.
//!
//! Validation never fails and never aborts: it walks every rule once and
//! returns the full list of issues so the host can show them together.

use super::classify::ErrorCode;
use super::config::StageConfig;
use serde::Serialize;
use std::fmt;

/// Value of `config` that is rejected at startup.
pub const RESERVED_INVALID_VALUE: &str = "invalidValue";

/// Largest accepted `max_archive_depth`.
pub const MAX_ARCHIVE_DEPTH_CEILING: usize = 16;

/// Configuration group an issue belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfigGroup {
    Extraction,
    Limits,
}

impl ConfigGroup {
    pub fn id(&self) -> &'static str {
        match self {
            ConfigGroup::Extraction => "EXTRACTION",
            ConfigGroup::Limits => "LIMITS",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConfigGroup::Extraction => "Content Extraction",
            ConfigGroup::Limits => "Resource Limits",
        }
    }
}

/// A single semantic problem found in the stage configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigIssue {
    pub group: ConfigGroup,
    pub config_field: String,
    pub error_code: ErrorCode,
    pub message: String,
}

impl ConfigIssue {
    fn new(group: ConfigGroup, config_field: &str, message: impl Into<String>) -> Self {
        Self {
            group,
            config_field: config_field.to_string(),
            error_code: ErrorCode::ConfigInvalid,
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}.{}]: {}",
            self.error_code,
            self.group.id(),
            self.config_field,
            self.message
        )
    }
}

/// Check `config` and return every issue found, in field order.
///
/// The function is pure: the same config always yields the same list, and an
/// empty list means the stage may start.
///
/// # Example
///
/// ```rust
/// use blobtext::{StageConfig, validate};
///
/// let config = StageConfig {
///     config: "invalidValue".to_string(),
///     ..StageConfig::default()
/// };
/// let issues = validate(&config);
/// assert_eq!(issues.len(), 1);
/// assert_eq!(issues[0].config_field, "config");
/// ```
pub fn validate(config: &StageConfig) -> Vec<ConfigIssue> {
    let mut issues = Vec::new();

    if config.config == RESERVED_INVALID_VALUE {
        issues.push(ConfigIssue::new(
            ConfigGroup::Extraction,
            "config",
            format!("'{}' is not an accepted value", RESERVED_INVALID_VALUE),
        ));
    }

    if config.max_content_chars == Some(0) {
        issues.push(ConfigIssue::new(
            ConfigGroup::Limits,
            "max_content_chars",
            "must be greater than 0 when set",
        ));
    }

    if config.max_input_bytes == Some(0) {
        issues.push(ConfigIssue::new(
            ConfigGroup::Limits,
            "max_input_bytes",
            "must be greater than 0 when set",
        ));
    }

    if config.timeout_secs == Some(0) {
        issues.push(ConfigIssue::new(
            ConfigGroup::Limits,
            "timeout_secs",
            "must be greater than 0 when set",
        ));
    }

    if config.max_archive_depth > MAX_ARCHIVE_DEPTH_CEILING {
        issues.push(ConfigIssue::new(
            ConfigGroup::Limits,
            "max_archive_depth",
            format!(
                "must be at most {}, got {}",
                MAX_ARCHIVE_DEPTH_CEILING, config.max_archive_depth
            ),
        ));
    }

    issues
}
