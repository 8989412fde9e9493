//! Session configuration resource.
//!
//! Settings for a simulated session, loaded from an INI file. Provides
//! defaults so a session starts without any file at all.
//!
//! # Configuration File Format
//!
//! ```ini
//! [session]
//! content_pack_url = https://account.altvr.com/api/content_packs/{id}/raw.json
//!
//! [simulation]
//! tick_hz = 60
//! duration = 20
//!
//! [params]
//! height = 3
//! moveUpSound = artifact:1
//! ```
//!
//! Keys in `[params]` are case-sensitive and form the local parameter set the
//! scene descriptor is resolved from.

use std::path::PathBuf;

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::{info, warn};

use crate::descriptor::{DEFAULT_CONTENT_PACK_URL, ParameterSet};

const DEFAULT_TICK_HZ: u32 = 60;
const DEFAULT_DURATION: f32 = 20.0;
const DEFAULT_CONFIG_PATH: &str = "./elevator.ini";

/// Session configuration resource.
#[derive(Resource, Debug, Clone)]
pub struct SessionConfig {
    /// URL template for content pack documents; `{id}` is replaced.
    pub content_pack_url: String,
    /// Simulation steps per second.
    pub tick_hz: u32,
    /// Simulated seconds to run.
    pub duration: f32,
    /// Local scene parameters.
    pub params: ParameterSet,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            content_pack_url: DEFAULT_CONTENT_PACK_URL.to_string(),
            tick_hz: DEFAULT_TICK_HZ,
            duration: DEFAULT_DURATION,
            params: ParameterSet::default(),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current values. Returns an error if the
    /// file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new_cs();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        // [session] section
        if let Some(url) = config.get("session", "content_pack_url") {
            self.content_pack_url = url;
        }

        // [simulation] section
        if let Some(tick_hz) = config.getuint("simulation", "tick_hz").ok().flatten() {
            match u32::try_from(tick_hz) {
                Ok(tick_hz) => self.tick_hz = tick_hz.max(1),
                Err(_) => warn!("Ignoring out of range tick_hz {}", tick_hz),
            }
        }
        if let Some(duration) = config.getfloat("simulation", "duration").ok().flatten() {
            self.duration = duration as f32;
        }

        // [params] section
        if let Some(params) = config.get_map_ref().get("params") {
            for (key, value) in params {
                self.params
                    .insert(key.clone(), value.clone().unwrap_or_default());
            }
        }

        info!(
            "Loaded session config: tick_hz={}, duration={}s, {} parameter(s)",
            self.tick_hz,
            self.duration,
            self.params.len()
        );

        Ok(())
    }

    /// Seconds per simulation step.
    pub fn tick_seconds(&self) -> f32 {
        1.0 / self.tick_hz.max(1) as f32
    }

    /// Override a single scene parameter.
    pub fn set_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.insert(key.into(), value.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const EPSILON: f32 = 1e-6;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn write_ini(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = SessionConfig::new();
        assert_eq!(config.tick_hz, 60);
        assert!(approx_eq(config.duration, 20.0));
        assert_eq!(config.content_pack_url, DEFAULT_CONTENT_PACK_URL);
        assert!(config.params.is_empty());
    }

    #[test]
    fn test_load_sections() {
        let file = write_ini(
            "[session]\n\
             content_pack_url = http://localhost/packs/{id}.json\n\
             [simulation]\n\
             tick_hz = 10\n\
             duration = 12.5\n\
             [params]\n\
             height = 3\n\
             moveUpSound = artifact:1\n",
        );
        let mut config = SessionConfig::with_path(file.path());
        config.load_from_file().unwrap();

        assert_eq!(config.content_pack_url, "http://localhost/packs/{id}.json");
        assert_eq!(config.tick_hz, 10);
        assert!(approx_eq(config.duration, 12.5));
        assert!(approx_eq(config.tick_seconds(), 0.1));
        assert_eq!(config.params.get("height").map(String::as_str), Some("3"));
        // Keys keep their case.
        assert_eq!(
            config.params.get("moveUpSound").map(String::as_str),
            Some("artifact:1")
        );
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = write_ini("[simulation]\nduration = 4\n");
        let mut config = SessionConfig::with_path(file.path());
        config.load_from_file().unwrap();
        assert_eq!(config.tick_hz, 60);
        assert!(approx_eq(config.duration, 4.0));
    }

    #[test]
    fn test_out_of_range_tick_hz_keeps_current() {
        let file = write_ini("[simulation]\ntick_hz = 4294967296\n");
        let mut config = SessionConfig::with_path(file.path());
        config.load_from_file().unwrap();
        assert_eq!(config.tick_hz, 60);
    }

    #[test]
    fn test_zero_tick_hz_is_raised_to_one() {
        let file = write_ini("[simulation]\ntick_hz = 0\n");
        let mut config = SessionConfig::with_path(file.path());
        config.load_from_file().unwrap();
        assert_eq!(config.tick_hz, 1);
    }

    #[test]
    fn test_missing_file_is_error() {
        let mut config = SessionConfig::with_path("/nonexistent/elevator.ini");
        let err = config.load_from_file().unwrap_err();
        assert!(err.contains("Failed to load config file"));
        assert_eq!(config.tick_hz, 60);
    }

    #[test]
    fn test_set_param_overrides_file() {
        let file = write_ini("[params]\nheight = 3\n");
        let mut config = SessionConfig::with_path(file.path());
        config.load_from_file().unwrap();
        config.set_param("height", "7");
        assert_eq!(config.params.get("height").map(String::as_str), Some("7"));
    }
}
