//! Configuration for GCodeForge
//!
//! Supports JSON and TOML files, chosen by extension. The default location is
//! `<config dir>/gcodeforge/config.toml`.
//!
//! Configuration is organized into sections:
//! - Engine limits (input size, repetition ceiling)
//! - Output preferences (timestamp banner, clipboard copy)
//! - Per-mode parameter defaults

use gcodeforge_core::ConversionMode;
use gcodeforge_engine::{EngineLimits, RawParameters};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{SettingsError, SettingsResult};

/// Engine size ceilings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitSettings {
    /// Largest accepted input, in lines
    pub max_input_lines: usize,
    /// Largest accepted `repetitions` value
    pub max_repetitions: u32,
    /// Largest accepted repeated output, in lines
    pub max_output_lines: usize,
}

impl Default for LimitSettings {
    fn default() -> Self {
        let limits = EngineLimits::default();
        Self {
            max_input_lines: limits.max_input_lines,
            max_repetitions: limits.max_repetitions,
            max_output_lines: limits.max_output_lines,
        }
    }
}

impl From<LimitSettings> for EngineLimits {
    fn from(settings: LimitSettings) -> Self {
        Self {
            max_input_lines: settings.max_input_lines,
            max_repetitions: settings.max_repetitions,
            max_output_lines: settings.max_output_lines,
        }
    }
}

/// Output preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Add a "Generated on" line to banners that support one
    pub timestamp_banner: bool,
    /// Copy every result to the clipboard
    pub copy_to_clipboard: bool,
}

/// Parameter text keyed by mode identifier, then by parameter name
pub type ModeDefaults = BTreeMap<String, BTreeMap<String, String>>;

fn builtin_defaults() -> ModeDefaults {
    let entries: [(ConversionMode, &[(&str, &str)]); 3] = [
        (
            ConversionMode::PatternRepeat,
            &[("repetitions", "40"), ("offset", "5.715")],
        ),
        (
            ConversionMode::TwoAxis,
            &[
                ("repetitions", "2"),
                ("offset", "8.16"),
                ("rapid_feedrate", "10000"),
                ("engraving_feedrate", "1500"),
            ],
        ),
        (
            ConversionMode::MirrorRepeat,
            &[("repetitions", "2"), ("offset", "10")],
        ),
    ];

    entries
        .into_iter()
        .map(|(mode, pairs)| {
            let params = pairs
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect();
            (mode.id().to_string(), params)
        })
        .collect()
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Engine limits
    pub limits: LimitSettings,
    /// Output preferences
    pub output: OutputSettings,
    /// Per-mode parameter defaults
    pub defaults: ModeDefaults,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            limits: LimitSettings::default(),
            output: OutputSettings::default(),
            defaults: builtin_defaults(),
        }
    }
}

enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> SettingsResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(SettingsError::UnsupportedFormat(
            other.unwrap_or("<none>").to_string(),
        )),
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config file location
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("gcodeforge").join("config.toml"))
            .ok_or_else(|| {
                SettingsError::LoadError("could not determine the config directory".to_string())
            })
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path)?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Load config from `path`, or the defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::debug!(path = %path.display(), "no configuration file; using defaults");
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| SettingsError::SaveError(format!("{}: {}", parent.display(), e)))?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        if self.limits.max_input_lines == 0 {
            return Err(SettingsError::InvalidSetting {
                key: "limits.max_input_lines".to_string(),
                reason: "must be > 0".to_string(),
            });
        }

        if self.limits.max_repetitions == 0 {
            return Err(SettingsError::InvalidSetting {
                key: "limits.max_repetitions".to_string(),
                reason: "must be > 0".to_string(),
            });
        }

        if self.limits.max_output_lines == 0 {
            return Err(SettingsError::InvalidSetting {
                key: "limits.max_output_lines".to_string(),
                reason: "must be > 0".to_string(),
            });
        }

        if let Some(name) = self
            .defaults
            .keys()
            .find(|name| name.parse::<ConversionMode>().is_err())
        {
            return Err(SettingsError::InvalidSetting {
                key: format!("defaults.{}", name),
                reason: "unknown conversion mode".to_string(),
            });
        }

        Ok(())
    }

    /// Engine limits from the `limits` section
    pub fn engine_limits(&self) -> EngineLimits {
        self.limits.into()
    }

    /// Configured defaults for `mode` with `overrides` applied on top
    pub fn parameters_for(
        &self,
        mode: ConversionMode,
        overrides: &RawParameters,
    ) -> RawParameters {
        let mut params = self
            .defaults
            .iter()
            .find(|(name, _)| name.parse::<ConversionMode>() == Ok(mode))
            .map(|(_, params)| params.clone())
            .unwrap_or_default();
        params.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
        params
    }
}
