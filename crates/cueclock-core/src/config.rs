//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Default run duration and cue selection
//! - Sound directory, volume, and the cue -> file mapping
//!
//! Configuration is stored at `~/.config/cueclock/config.toml`. Unknown or
//! missing fields fall back to per-field defaults, so old config files keep
//! loading across releases.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Returns `~/.config/cueclock[-dev]/` based on CUECLOCK_ENV.
///
/// Set CUECLOCK_ENV=dev to use a development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("CUECLOCK_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("cueclock-dev")
    } else {
        base_dir.join("cueclock")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Run defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Countdown length used when the caller does not pass one.
    #[serde(default = "default_minutes")]
    pub default_minutes: u32,
}

/// Cue selection defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CuesConfig {
    /// Cue ids preselected for a new run.
    #[serde(default = "default_selection")]
    pub default_selection: Vec<String>,
}

/// Sound resolution settings for the notification sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundsConfig {
    /// Directory holding cue sound files. Defaults to `<data_dir>/sounds`.
    #[serde(default)]
    pub dir: Option<PathBuf>,
    #[serde(default = "default_volume")]
    pub volume: u32,
    /// Overrides: cue id -> file name. Unmapped cues use `<id>.mp3`.
    #[serde(default)]
    pub map: HashMap<String, String>,
}

impl SoundsConfig {
    /// The directory sounds are resolved against.
    pub fn resolved_dir(&self) -> PathBuf {
        match &self.dir {
            Some(dir) => dir.clone(),
            None => data_dir()
                .map(|d| d.join("sounds"))
                .unwrap_or_else(|_| PathBuf::from("sounds")),
        }
    }
}

fn default_minutes() -> u32 {
    60
}
fn default_selection() -> Vec<String> {
    vec!["5min".into(), "1min".into(), "gameover".into()]
}
fn default_volume() -> u32 {
    50
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            default_minutes: default_minutes(),
        }
    }
}

impl Default for CuesConfig {
    fn default() -> Self {
        Self {
            default_selection: default_selection(),
        }
    }
}

impl Default for SoundsConfig {
    fn default() -> Self {
        Self {
            dir: None,
            volume: default_volume(),
            map: HashMap::new(),
        }
    }
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/cueclock/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub cues: CuesConfig,
    #[serde(default)]
    pub sounds: SoundsConfig,
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                        serde_json::Value::Number(n.into())
                    }
                    serde_json::Value::Array(_) => serde_json::Value::Array(
                        value
                            .split(',')
                            .map(str::trim)
                            .filter(|s| !s.is_empty())
                            .map(|s| serde_json::Value::String(s.to_string()))
                            .collect(),
                    ),
                    serde_json::Value::Object(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/cueclock"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from disk, or defaults if no config file exists yet.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path.
    pub fn load_from(path: &std::path::Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(_) => Ok(Self::default()),
        }
    }

    /// Load from disk, returning defaults on any error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Persist to disk.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to an explicit path.
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key. List values take comma-separated input.
    ///
    /// # Errors
    /// Returns an error if the key is unknown or the value cannot be parsed.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.run.default_minutes, 60);
        assert_eq!(parsed.sounds.volume, 50);
    }

    #[test]
    fn empty_file_loads_defaults() {
        let parsed: Config = toml::from_str("").unwrap();
        assert_eq!(parsed.run.default_minutes, 60);
        assert_eq!(
            parsed.cues.default_selection,
            vec!["5min", "1min", "gameover"]
        );
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("run.default_minutes").as_deref(), Some("60"));
        assert_eq!(cfg.get("sounds.volume").as_deref(), Some("50"));
        assert!(cfg.get("run.missing_key").is_none());
    }

    #[test]
    fn set_updates_number() {
        let mut cfg = Config::default();
        cfg.set("run.default_minutes", "90").unwrap();
        assert_eq!(cfg.run.default_minutes, 90);
    }

    #[test]
    fn set_updates_selection_from_comma_list() {
        let mut cfg = Config::default();
        cfg.set("cues.default_selection", "blackout, 10min").unwrap();
        assert_eq!(cfg.cues.default_selection, vec!["blackout", "10min"]);
    }

    #[test]
    fn set_unknown_key_errors() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("run.bogus", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = Config::default();
        cfg.set("run.default_minutes", "45").unwrap();
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.run.default_minutes, 45);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(loaded.run.default_minutes, 60);
    }
}
