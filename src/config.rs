use directories::ProjectDirs;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::word_source::WordSourceMode;

/// Durations offered in the idle screen, in seconds.
pub const DURATION_PRESETS: [u64; 4] = [15, 30, 60, 120];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("duration must be a positive number of seconds, got {0}")]
    InvalidDuration(u64),
    #[error("number of words must be positive")]
    NoWords,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub duration_secs: u64,
    pub mode: WordSourceMode,
    pub number_of_words: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            duration_secs: 30,
            mode: WordSourceMode::RandomWords,
            number_of_words: 90,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.duration_secs == 0 {
            return Err(ConfigError::InvalidDuration(self.duration_secs));
        }
        if self.number_of_words == 0 {
            return Err(ConfigError::NoWords);
        }
        Ok(())
    }

    /// Next preset after the current duration, wrapping around.
    pub fn next_duration(&self) -> u64 {
        DURATION_PRESETS
            .iter()
            .copied()
            .find(|&d| d > self.duration_secs)
            .unwrap_or(DURATION_PRESETS[0])
    }

    /// Previous preset before the current duration, wrapping around.
    pub fn prev_duration(&self) -> u64 {
        DURATION_PRESETS
            .iter()
            .rev()
            .copied()
            .find(|&d| d < self.duration_secs)
            .unwrap_or(DURATION_PRESETS[DURATION_PRESETS.len() - 1])
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "typeflow") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("typeflow_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let Ok(bytes) = fs::read(&self.path) else {
            return Config::default();
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) if cfg.validate().is_ok() => cfg,
            Ok(cfg) => {
                warn!("ignoring invalid config {:?}: {:?}", self.path, cfg.validate());
                Config::default()
            }
            Err(e) => {
                warn!("ignoring unreadable config {:?}: {}", self.path, e);
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config::default();
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn save_and_load_custom_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config {
            duration_secs: 60,
            mode: WordSourceMode::Quote,
            number_of_words: 40,
        };
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn missing_file_loads_default() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("absent.json"));
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "mode": "quote" }"#).unwrap();

        let loaded = FileConfigStore::with_path(&path).load();

        assert_eq!(loaded.mode, WordSourceMode::Quote);
        assert_eq!(loaded.duration_secs, 30);
    }

    #[test]
    fn invalid_duration_in_file_falls_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "duration_secs": 0 }"#).unwrap();

        assert_eq!(FileConfigStore::with_path(&path).load(), Config::default());
    }

    #[test]
    fn validate_rejects_zero_duration_and_words() {
        let cfg = Config {
            duration_secs: 0,
            ..Config::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::InvalidDuration(0)));

        let cfg = Config {
            number_of_words: 0,
            ..Config::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::NoWords));

        assert_eq!(Config::default().validate(), Ok(()));
    }

    #[test]
    fn duration_presets_cycle() {
        let cfg = Config::default();
        assert_eq!(cfg.next_duration(), 60);
        assert_eq!(cfg.prev_duration(), 15);

        let cfg = Config {
            duration_secs: 120,
            ..Config::default()
        };
        assert_eq!(cfg.next_duration(), 15);

        let cfg = Config {
            duration_secs: 15,
            ..Config::default()
        };
        assert_eq!(cfg.prev_duration(), 120);
    }
}
