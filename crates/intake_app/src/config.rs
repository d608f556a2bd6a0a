use std::fs;
use std::path::Path;

use intake_core::SelectionRules;
use intake_engine::UploadSettings;
use intake_logging::intake_warn;
use serde::{Deserialize, Serialize};

pub(crate) const CONFIG_FILENAME: &str = "intake.ron";

/// Optional overrides loaded from the RON config file. Anything absent falls
/// back to the built-in defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub(crate) struct AppConfig {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub bearer_token: Option<String>,
    #[serde(default)]
    pub allowed_extensions: Option<Vec<String>>,
    #[serde(default)]
    pub max_file_bytes: Option<u64>,
    #[serde(default)]
    pub max_files: Option<usize>,
    #[serde(default)]
    pub batch_size: Option<usize>,
}

/// Load the config file. A missing file is normal; a malformed one is a
/// warning. Neither aborts the run.
pub(crate) fn load_config(path: &Path) -> AppConfig {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return AppConfig::default();
        }
        Err(err) => {
            intake_warn!("Failed to read config from {:?}: {}", path, err);
            return AppConfig::default();
        }
    };

    match ron::from_str(&content) {
        Ok(config) => config,
        Err(err) => {
            intake_warn!("Failed to parse config from {:?}: {}", path, err);
            AppConfig::default()
        }
    }
}

impl AppConfig {
    pub(crate) fn selection_rules(&self) -> SelectionRules {
        let defaults = SelectionRules::default();
        SelectionRules {
            allowed_extensions: self
                .allowed_extensions
                .clone()
                .unwrap_or(defaults.allowed_extensions),
            max_file_bytes: self.max_file_bytes.unwrap_or(defaults.max_file_bytes),
            max_files: self.max_files.unwrap_or(defaults.max_files),
            batch_size: self.batch_size.unwrap_or(defaults.batch_size),
        }
    }

    pub(crate) fn upload_settings(&self) -> UploadSettings {
        let defaults = UploadSettings::default();
        UploadSettings {
            base_url: self.base_url.clone().unwrap_or(defaults.base_url),
            bearer_token: self.bearer_token.clone(),
            ..defaults
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = load_config(&dir.path().join("absent.ron"));

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.selection_rules(), SelectionRules::default());
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "(batch_size: oops").expect("write");

        assert_eq!(load_config(&path), AppConfig::default());
    }

    #[test]
    fn partial_config_overlays_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(
            &path,
            "(base_url: Some(\"https://hire.example.com/api/v1\"), batch_size: Some(10))",
        )
        .expect("write");

        let config = load_config(&path);
        let rules = config.selection_rules();
        assert_eq!(rules.batch_size, 10);
        assert_eq!(rules.max_files, 50);

        let settings = config.upload_settings();
        assert_eq!(settings.base_url, "https://hire.example.com/api/v1");
        assert_eq!(settings.bearer_token, None);
    }
}
