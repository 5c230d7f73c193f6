use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::channel::CHANNEL_NAME;
use crate::hardware::flash::LED_CLASS_ROOT;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read{path: PathBuf, source: std::io::Error},
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unknown log level {0:?}")]
    LogLevel(String),
}

/// Host settings. Every field has a default so an empty JSON object is a
/// valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Method channel the shell sends flashlight commands on.
    pub channel: String,
    pub log_level: Option<String>,
    /// LED class directory for the sysfs torch backend.
    pub led_root: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config{
            channel: CHANNEL_NAME.to_string(),
            log_level: None,
            led_root: PathBuf::from(LED_CLASS_ROOT),
        }
    }
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.level()?;
        Ok(config)
    }

    /// Reads `path` if given, otherwise starts from the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .map_err(|source| ConfigError::Read{path: path.to_path_buf(), source})?;
                Self::from_json(&json)
            }
            None => Ok(Config::default()),
        }
    }

    /// Replaces file values with the ones given on the command line.
    pub fn merge(mut self, log_level: Option<String>, led_root: Option<PathBuf>) -> Result<Self, ConfigError> {
        if let Some(level) = log_level {
            self.log_level = Some(level);
        }
        if let Some(root) = led_root {
            self.led_root = root;
        }
        self.level()?;
        Ok(self)
    }

    pub fn level(&self) -> Result<Option<log::Level>, ConfigError> {
        self.log_level.as_deref()
            .map(|level| log::Level::from_str(level).map_err(|_| ConfigError::LogLevel(level.to_string())))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_default() {
        assert_eq!(Config::from_json("{}").unwrap(), Config::default());
        assert_eq!(Config::default().channel, "samples.flutter.dev/flashlight");
    }

    #[test]
    fn parses_fields() {
        let config = Config::from_json(r#"{"log_level": "debug", "led_root": "/tmp/leds"}"#).unwrap();
        assert_eq!(config.level().unwrap(), Some(log::Level::Debug));
        assert_eq!(config.led_root, PathBuf::from("/tmp/leds"));
    }

    #[test]
    fn rejects_bad_level() {
        assert!(matches!(Config::from_json(r#"{"log_level": "loud"}"#), Err(ConfigError::LogLevel(_))));
        assert!(matches!(Config::from_json("42"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn overrides_replace_file_values() {
        let config = Config::from_json(r#"{"log_level": "warn", "channel": "demo/torch"}"#).unwrap()
            .merge(Some("trace".into()), Some(PathBuf::from("/run/leds")))
            .unwrap();
        assert_eq!(config.level().unwrap(), Some(log::Level::Trace));
        assert_eq!(config.led_root, PathBuf::from("/run/leds"));
        assert_eq!(config.channel, "demo/torch");
    }

    #[test]
    fn missing_overrides_keep_file_values() {
        let config = Config::from_json(r#"{"log_level": "warn"}"#).unwrap().merge(None, None).unwrap();
        assert_eq!(config.level().unwrap(), Some(log::Level::Warn));
        assert_eq!(config.led_root, PathBuf::from(LED_CLASS_ROOT));
        assert!(matches!(config.merge(Some("loud".into()), None), Err(ConfigError::LogLevel(_))));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flashlight.json");
        std::fs::write(&path, r#"{"channel": "demo/torch"}"#).unwrap();
        assert_eq!(Config::load(Some(&path)).unwrap().channel, "demo/torch");
        assert!(matches!(Config::load(Some(&dir.path().join("missing.json"))), Err(ConfigError::Read{..})));
    }
}
