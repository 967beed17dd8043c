//! GCodeForge Settings Crate
//!
//! Handles configuration files: engine limits, output preferences, and
//! per-mode parameter defaults.

pub mod config;
pub mod error;

pub use config::{Config, LimitSettings, ModeDefaults, OutputSettings};
pub use error::{SettingsError, SettingsResult};
