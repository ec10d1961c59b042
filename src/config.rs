//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the sampler-config.toml file.
//! Every value has a built-in default, so the face runs unconfigured; the file only
//! exists to pick a variant, force a clock style or resize the simulated screen.

use crate::error::FaceError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default config file name, looked up in the working directory
pub const CONFIG_FILE: &str = "sampler-config.toml";

/// Application configuration loaded from sampler-config.toml
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Watch face behavior
    pub face: FaceConfig,
    /// Simulated screen
    pub display: DisplayConfig,
}

/// Largest accepted screen width or height in pixels
pub const MAX_DIMENSION: u32 = 4096;

/// Which face runs and how it reads the clock
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FaceConfig {
    pub variant: Variant,
    /// Forces 12h or 24h rendering, or defers to the platform preference
    pub clock_style: ClockStyle,
    /// How often the battery level is polled for change notifications
    pub battery_poll_seconds: u64,
}

/// Screen geometry
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DisplayConfig {
    /// Screen width in pixels
    pub width: u32,
    /// Screen height in pixels
    pub height: u32,
}

impl DisplayConfig {
    /// True if both dimensions are within `1..=MAX_DIMENSION`.
    pub fn is_valid(&self) -> bool {
        (1..=MAX_DIMENSION).contains(&self.width) && (1..=MAX_DIMENSION).contains(&self.height)
    }
}

/// The three watch faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    /// Date around commute and evening hours, battery at night, rotation otherwise
    HourBand,
    /// Weekday, date and battery in strict minute rotation
    Rotation,
    /// Every field at once, in four shuffled lines
    Scatter,
}

impl Variant {
    /// True when the battery text is cached at load and refreshed only by
    /// battery-change events instead of being sampled every tick.
    pub fn caches_battery(self) -> bool {
        matches!(self, Variant::HourBand)
    }

    /// Parse the command-line spelling of a variant.
    pub fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "hour-band" | "a" | "A" => Some(Variant::HourBand),
            "rotation" | "b" | "B" => Some(Variant::Rotation),
            "scatter" | "c" | "C" => Some(Variant::Scatter),
            _ => None,
        }
    }
}

/// Source of the 12h/24h preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClockStyle {
    /// Ask the platform on every tick
    Platform,
    #[serde(rename = "24h")]
    TwentyFourHour,
    #[serde(rename = "12h")]
    TwelveHour,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            face: FaceConfig {
                variant: Variant::HourBand,
                clock_style: ClockStyle::Platform,
                battery_poll_seconds: 30,
            },
            display: DisplayConfig {
                width: 144,  // Pebble-class screen
                height: 168, // Pebble-class screen
            },
        }
    }
}

impl Config {
    /// Load configuration from sampler-config.toml file
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_FILE)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) if !config.display.is_valid() => {
                    log::warn!(
                        "Screen size {}x{} outside 1..={} pixels",
                        config.display.width,
                        config.display.height,
                        MAX_DIMENSION
                    );
                    log::warn!("Using default configuration (hour-band face)");
                    Self::default()
                }
                Ok(config) => {
                    log::info!("Loaded configuration for {:?} face", config.face.variant);
                    config
                }
                Err(e) => {
                    log::warn!("Invalid config file format: {}", e);
                    log::warn!("Using default configuration (hour-band face)");
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("No config file found, using default configuration (hour-band face)");
                Self::default()
            }
        }
    }

    /// Save current configuration to the given path
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), FaceError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(&path, contents)?;
        log::info!("Configuration saved to {}", path.as_ref().display());
        Ok(())
    }

    /// Save current configuration to sampler-config.toml
    pub fn save(&self) -> Result<(), FaceError> {
        self.save_to_path(CONFIG_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.face.variant, Variant::HourBand);
        assert_eq!(config.face.clock_style, ClockStyle::Platform);
        assert_eq!(config.face.battery_poll_seconds, 30);
        assert_eq!(config.display.width, 144);
        assert_eq!(config.display.height, 168);
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.face.variant = Variant::Scatter;
        config.face.clock_style = ClockStyle::TwelveHour;
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_parses_hand_written_file() {
        let parsed: Config = toml::from_str(
            r#"
[face]
variant = "rotation"
clock_style = "24h"
battery_poll_seconds = 10

[display]
width = 200
height = 228
"#,
        )
        .unwrap();
        assert_eq!(parsed.face.variant, Variant::Rotation);
        assert_eq!(parsed.face.clock_style, ClockStyle::TwentyFourHour);
        assert_eq!(parsed.display.width, 200);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let config = Config::load_from_path("/nonexistent/path");
        // Should fallback to default
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_invalid_file_falls_back() {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), "[face]\nvariant = \"sundial\"\n").unwrap();
        assert_eq!(Config::load_from_path(file.path()), Config::default());
    }

    #[test]
    fn test_oversized_screen_falls_back() {
        let file = NamedTempFile::new().unwrap();
        let mut config = Config::default();
        config.face.variant = Variant::Scatter;
        config.display.width = 70_000;
        config.display.height = 70_000;
        config.save_to_path(file.path()).unwrap();
        assert_eq!(Config::load_from_path(file.path()), Config::default());

        config.display.width = 0;
        config.display.height = 168;
        assert!(!config.display.is_valid());
        config.display.width = MAX_DIMENSION;
        assert!(config.display.is_valid());
    }

    #[test]
    fn test_save_then_load() {
        let file = NamedTempFile::new().unwrap();
        let mut config = Config::default();
        config.face.variant = Variant::Rotation;
        config.save_to_path(file.path()).unwrap();
        assert_eq!(Config::load_from_path(file.path()), config);
    }

    #[test]
    fn test_variant_args() {
        assert_eq!(Variant::from_arg("scatter"), Some(Variant::Scatter));
        assert_eq!(Variant::from_arg("B"), Some(Variant::Rotation));
        assert_eq!(Variant::from_arg("analog"), None);
        assert!(Variant::HourBand.caches_battery());
        assert!(!Variant::Rotation.caches_battery());
    }
}
