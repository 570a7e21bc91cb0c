//! Loading and saving the settings file.
//!
//! Saves go through a staging file in the same directory followed by a
//! rename, so a crash mid-write never leaves a truncated config behind.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::settings::Settings;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("could not serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("no config file at {0}")]
    Missing(PathBuf),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Owns the settings file: where it lives and what it currently says.
pub struct ConfigManager {
    config_path: PathBuf,
    settings: Settings,
}

impl ConfigManager {
    /// Point the manager at a settings file. Nothing is read until
    /// `load()` or `load_or_create()`.
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            settings: Settings::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Edit settings in memory. Call `save()` to persist.
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Read the settings file, failing with `Missing` when it does not
    /// exist. Fields absent from the file keep their defaults.
    pub fn load(&mut self) -> ConfigResult<()> {
        let content = match fs::read_to_string(&self.config_path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ConfigError::Missing(self.config_path.clone()));
            }
            Err(e) => return Err(e.into()),
        };
        self.settings = toml::from_str(&content)?;
        Ok(())
    }

    /// Like `load()`, but a missing file is written out with defaults
    /// instead of failing.
    pub fn load_or_create(&mut self) -> ConfigResult<()> {
        match self.load() {
            Err(ConfigError::Missing(_)) => {
                self.settings = Settings::default();
                self.save()
            }
            result => result,
        }
    }

    /// Persist the in-memory settings.
    pub fn save(&self) -> ConfigResult<()> {
        let content = toml::to_string_pretty(&self.settings)?;

        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Staging file next to the target keeps the rename atomic.
        let mut staging = self.config_path.clone();
        staging.as_mut_os_string().push(".tmp");

        let mut file = fs::File::create(&staging)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
        drop(file);

        fs::rename(&staging, &self.config_path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn creates_defaults_when_the_file_is_absent() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("nested").join("settings.toml");

        let mut manager = ConfigManager::new(&config_path);
        manager.load_or_create().unwrap();

        assert!(config_path.exists());
        assert_eq!(manager.settings().defaults.width, 420);
        assert_eq!(manager.settings().defaults.frame_rate, 24);
    }

    #[test]
    fn partial_file_keeps_custom_values() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("settings.toml");
        fs::write(&config_path, "[defaults]\nwidth = 854\n").unwrap();

        let mut manager = ConfigManager::new(&config_path);
        manager.load_or_create().unwrap();

        assert_eq!(manager.settings().defaults.width, 854);
        // Everything the file leaves out stays at its default.
        assert_eq!(manager.settings().defaults.height, 333);
        assert_eq!(manager.settings().tools.ffmpeg_path, "");
    }

    #[test]
    fn edits_survive_a_save_and_reload() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("settings.toml");

        let mut manager = ConfigManager::new(&config_path);
        manager.load_or_create().unwrap();
        manager.settings_mut().defaults.width = 854;
        manager.settings_mut().tools.ffprobe_path = "/usr/bin/ffprobe".to_string();
        manager.save().unwrap();

        let mut fresh = ConfigManager::new(&config_path);
        fresh.load().unwrap();
        assert_eq!(fresh.settings().defaults.width, 854);
        assert_eq!(fresh.settings().tools.ffprobe_path, "/usr/bin/ffprobe");
    }

    #[test]
    fn load_reports_a_missing_file() {
        let dir = tempdir().unwrap();
        let mut manager = ConfigManager::new(dir.path().join("missing.toml"));
        assert!(matches!(
            manager.load().unwrap_err(),
            ConfigError::Missing(_)
        ));
    }

    #[test]
    fn save_leaves_no_staging_file() {
        let dir = tempdir().unwrap();
        let mut manager = ConfigManager::new(dir.path().join("settings.toml"));
        manager.load_or_create().unwrap();

        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
