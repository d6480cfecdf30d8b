//! Stage configuration loading.
//!
//! `StageConfig` is read once before the stage starts and treated as
//! immutable afterwards. It can be built programmatically or loaded from
//! TOML, YAML or JSON; `discover` looks for `blobtext.toml` in the current
//! directory and its parents.

use crate::{BlobtextError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Name of the file [`StageConfig::discover`] searches for.
pub const CONFIG_FILE_NAME: &str = "blobtext.toml";

/// Configuration values of the content extraction stage.
///
/// # Example
///
/// ```rust
/// use blobtext::StageConfig;
///
/// let config = StageConfig::default();
/// assert_eq!(config.config, "default");
/// assert!(config.max_content_chars.is_none());
///
/// // let config = StageConfig::from_toml_file("blobtext.toml")?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageConfig {
    /// Free-form stage setting; the value `"invalidValue"` is rejected at startup.
    #[serde(default = "default_config_value")]
    pub config: String,

    /// Maximum characters of extracted text per record (None = unbounded)
    #[serde(default)]
    pub max_content_chars: Option<usize>,

    /// Maximum bytes read from a record's stream (None = unbounded)
    #[serde(default)]
    pub max_input_bytes: Option<u64>,

    /// Wall-clock budget per record in seconds (None = no deadline)
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// How many levels of nested archives are opened.
    #[serde(default = "default_max_archive_depth")]
    pub max_archive_depth: usize,
}

/// Resource limits applied to a single extraction pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionLimits {
    pub max_content_chars: Option<usize>,
    pub max_input_bytes: Option<u64>,
    pub timeout: Option<Duration>,
    pub max_archive_depth: usize,
}

fn default_config_value() -> String {
    "default".to_string()
}

fn default_max_archive_depth() -> usize {
    4
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            config: default_config_value(),
            max_content_chars: None,
            max_input_bytes: None,
            timeout_secs: None,
            max_archive_depth: default_max_archive_depth(),
        }
    }
}

impl Default for ExtractionLimits {
    fn default() -> Self {
        Self {
            max_content_chars: None,
            max_input_bytes: None,
            timeout: None,
            max_archive_depth: default_max_archive_depth(),
        }
    }
}

impl StageConfig {
    /// Limits to hand to the extraction engine.
    pub fn limits(&self) -> ExtractionLimits {
        ExtractionLimits {
            max_content_chars: self.max_content_chars,
            max_input_bytes: self.max_input_bytes,
            timeout: self.timeout_secs.map(Duration::from_secs),
            max_archive_depth: self.max_archive_depth,
        }
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `BlobtextError::Validation` if the file can't be read or is invalid TOML.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = read_config(path.as_ref())?;
        toml::from_str(&content)
            .map_err(|e| BlobtextError::validation(format!("Invalid TOML in {}: {}", path.as_ref().display(), e)))
    }

    /// Load configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = read_config(path.as_ref())?;
        serde_yaml_ng::from_str(&content)
            .map_err(|e| BlobtextError::validation(format!("Invalid YAML in {}: {}", path.as_ref().display(), e)))
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = read_config(path.as_ref())?;
        serde_json::from_str(&content)
            .map_err(|e| BlobtextError::validation(format!("Invalid JSON in {}: {}", path.as_ref().display(), e)))
    }

    /// Load configuration, picking the format from the file extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path.extension().and_then(|ext| ext.to_str()).map(|s| s.to_lowercase());
        match extension.as_deref() {
            Some("toml") => Self::from_toml_file(path),
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(BlobtextError::validation(format!(
                "Unsupported config file format: {}",
                path.display()
            ))),
        }
    }

    /// Search for `blobtext.toml` in the current directory and its parents.
    ///
    /// # Returns
    ///
    /// - `Some(config)` if found
    /// - `None` if no config file found
    pub fn discover() -> Result<Option<Self>> {
        let mut current = std::env::current_dir().map_err(BlobtextError::Io)?;

        loop {
            let candidate = current.join(CONFIG_FILE_NAME);
            if candidate.exists() {
                return Ok(Some(Self::from_toml_file(candidate)?));
            }

            if let Some(parent) = current.parent() {
                current = parent.to_path_buf();
            } else {
                break;
            }
        }

        Ok(None)
    }
}

fn read_config(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| BlobtextError::validation(format!("Failed to read config file {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = StageConfig::default();
        assert_eq!(config.config, "default");
        assert_eq!(config.max_archive_depth, 4);
        assert_eq!(config.limits(), ExtractionLimits::default());
    }

    #[test]
    fn test_limits_conversion() {
        let config = StageConfig {
            max_content_chars: Some(100),
            max_input_bytes: Some(4096),
            timeout_secs: Some(5),
            max_archive_depth: 2,
            ..StageConfig::default()
        };
        let limits = config.limits();
        assert_eq!(limits.max_content_chars, Some(100));
        assert_eq!(limits.max_input_bytes, Some(4096));
        assert_eq!(limits.timeout, Some(Duration::from_secs(5)));
        assert_eq!(limits.max_archive_depth, 2);
    }

    #[test]
    fn test_from_toml_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("blobtext.toml");

        fs::write(
            &config_path,
            r#"
config = "custom"
max_content_chars = 1000
        "#,
        )
        .unwrap();

        let config = StageConfig::from_toml_file(&config_path).unwrap();
        assert_eq!(config.config, "custom");
        assert_eq!(config.max_content_chars, Some(1000));
        assert_eq!(config.max_archive_depth, 4);
    }

    #[test]
    fn test_from_yaml_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("stage.yaml");
        fs::write(&config_path, "config: fromyaml\ntimeout_secs: 30\n").unwrap();

        let config = StageConfig::from_yaml_file(&config_path).unwrap();
        assert_eq!(config.config, "fromyaml");
        assert_eq!(config.timeout_secs, Some(30));
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("stage.json");
        fs::write(&config_path, r#"{"max_input_bytes": 2048}"#).unwrap();

        let config = StageConfig::from_json_file(&config_path).unwrap();
        assert_eq!(config.config, "default");
        assert_eq!(config.max_input_bytes, Some(2048));
    }

    #[test]
    fn test_from_file_dispatches_on_extension() {
        let dir = tempdir().unwrap();
        let yml = dir.path().join("stage.yml");
        fs::write(&yml, "config: dispatched\n").unwrap();
        assert_eq!(StageConfig::from_file(&yml).unwrap().config, "dispatched");

        let ini = dir.path().join("stage.ini");
        fs::write(&ini, "config=x").unwrap();
        assert!(matches!(
            StageConfig::from_file(&ini),
            Err(BlobtextError::Validation { .. })
        ));
    }

    #[test]
    fn test_invalid_toml_is_validation_error() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("broken.toml");
        fs::write(&config_path, "config = [unterminated").unwrap();

        let err = StageConfig::from_toml_file(&config_path).unwrap_err();
        assert!(matches!(err, BlobtextError::Validation { .. }));
        assert!(err.to_string().contains("Invalid TOML"));
    }

    #[test]
    fn test_missing_file_is_validation_error() {
        let err = StageConfig::from_toml_file("/nonexistent/blobtext.toml").unwrap_err();
        assert!(matches!(err, BlobtextError::Validation { .. }));
    }

    #[test]
    fn test_discover_blobtext_toml() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "config = \"discovered\"\n").unwrap();

        let original_dir = std::env::current_dir().unwrap();
        std::env::set_current_dir(&dir).unwrap();

        let result = std::panic::catch_unwind(|| {
            let config = StageConfig::discover().unwrap();
            assert_eq!(config.unwrap().config, "discovered");
        });

        std::env::set_current_dir(&original_dir).unwrap();

        if let Err(e) = result {
            std::panic::resume_unwind(e);
        }
    }
}
