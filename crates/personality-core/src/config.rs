//! TOML-based configuration.
//!
//! Tunes the parts of the test flow that are policy rather than formula:
//! - the same-trait run limit used when drawing an order
//! - the profile-code rule (plain midpoint or deadzone)
//! - how long idle progress survives
//! - the bands used for low / medium / high labels
//!
//! Configuration is stored at `~/.config/personality/config.toml`.

use std::path::{Path, PathBuf};

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::display::LevelThresholds;
use crate::error::{ConfigError, Result};
use crate::scoring::{ProfileRule, Scorer};
use crate::session::DEFAULT_PROGRESS_TTL_MINUTES;
use crate::shuffle::DEFAULT_MAX_SAME_TRAIT_IN_ROW;

/// Returns `~/.config/personality[-dev]/` based on PERSONALITY_ENV.
///
/// Set PERSONALITY_ENV=dev to use the development directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn config_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("PERSONALITY_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("personality-dev")
    } else {
        base_dir.join("personality")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Question ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShuffleConfig {
    /// Longest allowed run of one trait; 0 disables the check.
    #[serde(default = "default_max_same_trait_in_row")]
    pub max_same_trait_in_row: usize,
}

/// Profile-code rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(default)]
    pub deadzone: bool,
    #[serde(default = "default_deadzone_lower")]
    pub deadzone_lower: f64,
    #[serde(default = "default_deadzone_upper")]
    pub deadzone_upper: f64,
}

/// In-progress session handling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_progress_ttl_minutes")]
    pub progress_ttl_minutes: i64,
}

/// Level labels on the result page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_low_max")]
    pub low_max: u8,
    #[serde(default = "default_medium_max")]
    pub medium_max: u8,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/personality/config.toml`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub shuffle: ShuffleConfig,
    #[serde(default)]
    pub profile: ProfileConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

fn default_max_same_trait_in_row() -> usize {
    DEFAULT_MAX_SAME_TRAIT_IN_ROW
}
fn default_deadzone_lower() -> f64 {
    45.0
}
fn default_deadzone_upper() -> f64 {
    55.0
}
fn default_progress_ttl_minutes() -> i64 {
    DEFAULT_PROGRESS_TTL_MINUTES
}
fn default_low_max() -> u8 {
    LevelThresholds::default().low_max
}
fn default_medium_max() -> u8 {
    LevelThresholds::default().medium_max
}

impl Default for ShuffleConfig {
    fn default() -> Self {
        Self {
            max_same_trait_in_row: default_max_same_trait_in_row(),
        }
    }
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            deadzone: false,
            deadzone_lower: default_deadzone_lower(),
            deadzone_upper: default_deadzone_upper(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            progress_ttl_minutes: default_progress_ttl_minutes(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            low_max: default_low_max(),
            medium_max: default_medium_max(),
        }
    }
}

impl ProfileConfig {
    pub fn rule(&self) -> ProfileRule {
        if self.deadzone {
            ProfileRule::Deadzone {
                lower: self.deadzone_lower,
                upper: self.deadzone_upper,
            }
        } else {
            ProfileRule::Midpoint
        }
    }
}

impl SessionConfig {
    pub fn ttl(&self) -> Duration {
        Duration::minutes(self.progress_ttl_minutes)
    }
}

impl DisplayConfig {
    pub fn thresholds(&self) -> LevelThresholds {
        LevelThresholds {
            low_max: self.low_max,
            medium_max: self.medium_max,
        }
    }
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
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;

            let new_value = match existing {
                serde_json::Value::Bool(_) => value
                    .parse::<bool>()
                    .map(serde_json::Value::Bool)
                    .map_err(|e| invalid(e.to_string()))?,
                serde_json::Value::Number(_) => {
                    if let Ok(n) = value.parse::<i64>() {
                        serde_json::Value::Number(n.into())
                    } else if let Ok(n) = value.parse::<f64>() {
                        serde_json::Number::from_f64(n)
                            .map(serde_json::Value::Number)
                            .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                    } else {
                        return Err(invalid(format!("cannot parse '{value}' as number")));
                    }
                }
                serde_json::Value::Object(_) => return Err(unknown()),
                _ => serde_json::Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    /// Default config file location.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be created.
    pub fn path() -> Result<PathBuf> {
        Ok(config_dir()?.join("config.toml"))
    }

    /// Load from the default location, or defaults when no file exists yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, or defaults when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, parsed, or
    /// holds inconsistent values.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
                .into())
            }
        };
        let cfg: Config = toml::from_str(&content).map_err(ConfigError::from)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Persist to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key. The change is validated but not saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the resulting config is inconsistent. The config is left
    /// unchanged on error.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Check cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.profile;
        if !(0.0..=100.0).contains(&p.deadzone_lower) || !(0.0..=100.0).contains(&p.deadzone_upper)
        {
            return Err(ConfigError::InvalidValue {
                key: "profile".to_string(),
                message: "deadzone bounds must be within 0-100".to_string(),
            });
        }
        if p.deadzone_lower > p.deadzone_upper {
            return Err(ConfigError::InvalidValue {
                key: "profile.deadzone_lower".to_string(),
                message: format!(
                    "lower bound {} is above upper bound {}",
                    p.deadzone_lower, p.deadzone_upper
                ),
            });
        }
        if self.session.progress_ttl_minutes <= 0 {
            return Err(ConfigError::InvalidValue {
                key: "session.progress_ttl_minutes".to_string(),
                message: "must be positive".to_string(),
            });
        }
        let d = &self.display;
        if d.low_max > d.medium_max || d.medium_max > 100 {
            return Err(ConfigError::InvalidValue {
                key: "display".to_string(),
                message: "expected low_max <= medium_max <= 100".to_string(),
            });
        }
        Ok(())
    }

    /// Scorer using the configured profile rule.
    pub fn scorer(&self) -> Scorer {
        Scorer::with_rule(self.profile.rule())
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
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[profile]\ndeadzone = true\n").unwrap();
        assert!(parsed.profile.deadzone);
        assert_eq!(parsed.profile.deadzone_upper, 55.0);
        assert_eq!(parsed.shuffle.max_same_trait_in_row, 2);
        assert_eq!(parsed.session.progress_ttl_minutes, 30);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("profile.deadzone").as_deref(), Some("false"));
        assert_eq!(cfg.get("shuffle.max_same_trait_in_row").as_deref(), Some("2"));
        assert_eq!(cfg.get("display.low_max").as_deref(), Some("33"));
        assert!(cfg.get("profile.missing_key").is_none());
        assert!(cfg.get("profile").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_updates_nested_values() {
        let mut cfg = Config::default();
        cfg.set("profile.deadzone", "true").unwrap();
        cfg.set("profile.deadzone_lower", "40").unwrap();
        cfg.set("session.progress_ttl_minutes", "45").unwrap();
        assert!(cfg.profile.deadzone);
        assert_eq!(cfg.profile.deadzone_lower, 40.0);
        assert_eq!(cfg.session.ttl(), Duration::minutes(45));
        assert_eq!(
            cfg.profile.rule(),
            ProfileRule::Deadzone {
                lower: 40.0,
                upper: 55.0
            }
        );
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(cfg.set("profile.nonexistent_key", "1").is_err());
        assert!(cfg.set("profile", "1").is_err());
        assert!(cfg.set("", "1").is_err());
    }

    #[test]
    fn set_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(cfg.set("profile.deadzone", "not_a_bool").is_err());
        assert!(cfg.set("shuffle.max_same_trait_in_row", "2.5").is_err());
        assert!(cfg.set("shuffle.max_same_trait_in_row", "-1").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn set_rejects_inconsistent_values() {
        let mut cfg = Config::default();
        assert!(cfg.set("profile.deadzone_lower", "60").is_err());
        assert!(cfg.set("display.low_max", "80").is_err());
        assert!(cfg.set("session.progress_ttl_minutes", "0").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn scorer_follows_profile_rule() {
        let mut cfg = Config::default();
        assert_eq!(cfg.scorer().rule(), ProfileRule::Midpoint);
        cfg.profile.deadzone = true;
        assert_eq!(cfg.scorer().rule(), ProfileRule::standard_deadzone());
    }

    #[test]
    fn save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        assert_eq!(Config::load_from(&path).unwrap(), Config::default());

        let mut cfg = Config::default();
        cfg.set("display.medium_max", "70").unwrap();
        cfg.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.display.thresholds().medium_max, 70);
    }

    #[test]
    fn load_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "shuffle = [").unwrap();
        assert!(Config::load_from(&path).is_err());

        std::fs::write(&path, "[profile]\ndeadzone_lower = 70.0\ndeadzone_upper = 30.0\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
