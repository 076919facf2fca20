//! Keyed editor configuration
//!
//! A flat map from slash-separated keys (`editor/sketch/node/color`) to typed
//! values, stored as RON (Rusty Object Notation):
//!
//! ```text
//! {
//!     "editor/sketch/node/color": Color((r: 200, g: 200, b: 210)),
//!     "editor/tool/sketch-resize/step": Float(1.1),
//! }
//! ```
//!
//! User files only need the keys they override; everything else comes from
//! `Config::with_defaults`.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::rasterizer::{Color, Vec3};

/// Error type for configuration loading and lookup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("Serialize error: {0}")]
    Serialize(#[from] ron::Error),
    #[error("missing config key {0:?}")]
    Missing(String),
    #[error("config key {key:?} is not a {expected}")]
    Type { key: String, expected: &'static str },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// A single configuration value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConfigValue {
    Bool(bool),
    Int(i64),
    Float(f32),
    Color(Color),
    Vec3(Vec3),
    Text(String),
}

/// Types that can be read out of a `ConfigValue`
pub trait FromConfigValue: Sized {
    /// Human-readable type name for error messages
    const EXPECTED: &'static str;

    fn from_config_value(value: &ConfigValue) -> Option<Self>;
}

impl FromConfigValue for bool {
    const EXPECTED: &'static str = "bool";
    fn from_config_value(value: &ConfigValue) -> Option<Self> {
        match value {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl FromConfigValue for i64 {
    const EXPECTED: &'static str = "integer";
    fn from_config_value(value: &ConfigValue) -> Option<Self> {
        match value {
            ConfigValue::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl FromConfigValue for f32 {
    const EXPECTED: &'static str = "number";
    fn from_config_value(value: &ConfigValue) -> Option<Self> {
        match value {
            ConfigValue::Float(f) => Some(*f),
            ConfigValue::Int(i) => Some(*i as f32),
            _ => None,
        }
    }
}

impl FromConfigValue for Color {
    const EXPECTED: &'static str = "color";
    fn from_config_value(value: &ConfigValue) -> Option<Self> {
        match value {
            ConfigValue::Color(c) => Some(*c),
            _ => None,
        }
    }
}

impl FromConfigValue for Vec3 {
    const EXPECTED: &'static str = "vector";
    fn from_config_value(value: &ConfigValue) -> Option<Self> {
        match value {
            ConfigValue::Vec3(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromConfigValue for String {
    const EXPECTED: &'static str = "string";
    fn from_config_value(value: &ConfigValue) -> Option<Self> {
        match value {
            ConfigValue::Text(s) => Some(s.clone()),
            _ => None,
        }
    }
}

/// Keyed configuration store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Config {
    values: BTreeMap<String, ConfigValue>,
}

impl Config {
    /// Empty configuration (every lookup misses)
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in values for every key the editor reads
    pub fn with_defaults() -> Self {
        let mut config = Self::new();
        config.set("editor/sketch/node/color", ConfigValue::Color(Color::new(200, 200, 210)));
        config.set("editor/sketch/bubble/color", ConfigValue::Color(Color::new(120, 160, 220)));
        config.set("editor/axis/length", ConfigValue::Float(1.0));
        config.set("editor/background/color", ConfigValue::Color(Color::new(40, 40, 48)));
        config.set("editor/grid/color", ConfigValue::Color(Color::new(70, 70, 80)));
        config.set("editor/camera/distance", ConfigValue::Float(12.0));
        config.set("editor/tool/sketch-resize/step", ConfigValue::Float(1.1));
        config.set("editor/tool/sketch-resize/min-radius", ConfigValue::Float(0.05));
        config
    }

    pub fn set(&mut self, key: impl Into<String>, value: ConfigValue) {
        self.values.insert(key.into(), value);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Typed lookup
    pub fn get<T: FromConfigValue>(&self, key: &str) -> ConfigResult<T> {
        let value = self.values.get(key).ok_or_else(|| ConfigError::Missing(key.to_string()))?;
        T::from_config_value(value).ok_or_else(|| ConfigError::Type {
            key: key.to_string(),
            expected: T::EXPECTED,
        })
    }

    /// Typed lookup that falls back to `default` (and logs) on any error
    pub fn get_or<T: FromConfigValue>(&self, key: &str, default: T) -> T {
        match self.get(key) {
            Ok(v) => v,
            Err(e) => {
                warn!("{}; using default", e);
                default
            }
        }
    }

    /// Overwrite this config's values with everything in `other`
    pub fn merge(&mut self, other: Config) {
        self.values.extend(other.values);
    }

    /// Lookups relative to `prefix`
    pub fn proxy(&self, prefix: impl Into<String>) -> ConfigProxy<'_> {
        ConfigProxy { config: self, prefix: prefix.into() }
    }

    /// Parse a RON document and layer it over the defaults
    pub fn load_from_str(s: &str) -> ConfigResult<Self> {
        let user: Config = ron::from_str(s)?;
        let mut config = Self::with_defaults();
        config.merge(user);
        Ok(config)
    }

    /// Load a RON file and layer it over the defaults
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = Self::load_from_str(&contents)?;
        info!("loaded config from {} ({} keys)", path.display(), config.len());
        Ok(config)
    }

    /// Save all values to a RON file
    pub fn save_to_file(&self, path: &Path) -> ConfigResult<()> {
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .indentor("  ".to_string());
        let contents = ron::ser::to_string_pretty(self, pretty)?;
        std::fs::write(path, contents)?;
        info!("saved config to {}", path.display());
        Ok(())
    }
}

/// View of a `Config` that prepends a key prefix to every lookup
#[derive(Debug, Clone)]
pub struct ConfigProxy<'a> {
    config: &'a Config,
    prefix: String,
}

impl<'a> ConfigProxy<'a> {
    /// Full key for a relative one
    pub fn key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    pub fn get<T: FromConfigValue>(&self, key: &str) -> ConfigResult<T> {
        self.config.get(&self.key(key))
    }

    pub fn get_or<T: FromConfigValue>(&self, key: &str, default: T) -> T {
        self.config.get_or(&self.key(key), default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_have_sketch_colors() {
        let config = Config::with_defaults();
        assert!(config.get::<Color>("editor/sketch/node/color").is_ok());
        assert!(config.get::<Color>("editor/sketch/bubble/color").is_ok());
    }

    #[test]
    fn test_missing_key() {
        let config = Config::new();
        let err = config.get::<Color>("editor/sketch/node/color").unwrap_err();
        assert!(matches!(err, ConfigError::Missing(ref k) if k == "editor/sketch/node/color"));
    }

    #[test]
    fn test_wrong_type() {
        let mut config = Config::new();
        config.set("a", ConfigValue::Bool(true));
        let err = config.get::<Color>("a").unwrap_err();
        assert!(matches!(err, ConfigError::Type { expected: "color", .. }));
        assert!(err.to_string().contains("color"));
    }

    #[test]
    fn test_int_reads_as_float() {
        let mut config = Config::new();
        config.set("n", ConfigValue::Int(3));
        assert_eq!(config.get::<f32>("n").unwrap(), 3.0);
    }

    #[test]
    fn test_get_or_falls_back() {
        let config = Config::new();
        assert_eq!(config.get_or("nope", 2.5f32), 2.5);
    }

    #[test]
    fn test_load_overrides_defaults() {
        let config = Config::load_from_str(
            r#"{ "editor/sketch/node/color": Color((r: 1, g: 2, b: 3)) }"#,
        ).unwrap();
        assert_eq!(config.get::<Color>("editor/sketch/node/color").unwrap(), Color::new(1, 2, 3));
        // Untouched keys keep their defaults
        assert_eq!(
            config.get::<Color>("editor/sketch/bubble/color").unwrap(),
            Config::with_defaults().get::<Color>("editor/sketch/bubble/color").unwrap(),
        );
    }

    #[test]
    fn test_load_rejects_garbage() {
        assert!(matches!(Config::load_from_str("{ oops"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_proxy_prefixes_keys() {
        let config = Config::with_defaults();
        let proxy = config.proxy("editor/tool/sketch-resize/");
        assert_eq!(proxy.key("step"), "editor/tool/sketch-resize/step");
        assert!((proxy.get::<f32>("step").unwrap() - 1.1).abs() < 0.0001);
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ron");

        let mut config = Config::with_defaults();
        config.set("editor/sketch/bubble/color", ConfigValue::Color(Color::new(9, 8, 7)));
        config.save_to_file(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load_from_file(&dir.path().join("absent.ron"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
