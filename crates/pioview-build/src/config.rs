use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Settings for launching and watching builds, read from `pioview.json`.
///
/// Every field is optional in the file; missing ones take the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// PlatformIO executable.
    pub program: String,
    /// Directory the tool runs in (the project root).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<PathBuf>,
    /// How often the viewer polls the render queue.
    pub poll_interval_ms: u64,
    /// Board shown in the build trailer when the request does not name one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub board_name: Option<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            program: "platformio".to_string(),
            working_dir: None,
            poll_interval_ms: 10,
            board_name: None,
        }
    }
}

impl BuildConfig {
    pub const FILE_NAME: &'static str = "pioview.json";

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        Ok(config)
    }

    /// Loads `pioview.json` from `dir` if it exists, otherwise the defaults.
    pub fn load_or_default(dir: &Path) -> anyhow::Result<Self> {
        let path = dir.join(Self::FILE_NAME);
        if path.exists() {
            log::debug!("loading config from {}", path.display());
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config {}", path.display()))?;
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: BuildConfig = serde_json::from_str(r#"{ "board_name": "BOARD_RAMPS_14_EFB" }"#).unwrap();
        assert_eq!(config.program, "platformio");
        assert_eq!(config.poll_interval_ms, 10);
        assert_eq!(config.board_name.as_deref(), Some("BOARD_RAMPS_14_EFB"));
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let config = BuildConfig {
            program: "/opt/pio/bin/pio".to_string(),
            working_dir: Some(PathBuf::from("/src/Marlin")),
            poll_interval_ms: 50,
            board_name: None,
        };
        let path = dir.path().join(BuildConfig::FILE_NAME);
        config.save(&path).unwrap();

        assert_eq!(BuildConfig::load_or_default(dir.path()).unwrap(), config);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            BuildConfig::load_or_default(dir.path()).unwrap(),
            BuildConfig::default()
        );
    }

    #[test]
    fn test_invalid_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(BuildConfig::FILE_NAME);
        std::fs::write(&path, "{ not json").unwrap();
        let err = BuildConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid config"));
    }

    #[test]
    fn test_zero_poll_interval_is_clamped() {
        let config = BuildConfig {
            poll_interval_ms: 0,
            ..BuildConfig::default()
        };
        assert_eq!(config.poll_interval(), Duration::from_millis(1));
    }
}
