//! # GCodeForge
//!
//! Rewrites previously authored G-code toolpaths without going back to CAM:
//! - Axis remapping (drop `Z0`, lift `Z4` by the last Y, swap X/Y, zero X)
//! - Pattern repetition along Y with a per-copy preamble
//! - Two-axis conversion with a growing B value per copy
//! - Mirroring one axis and repeating along X
//!
//! ## Architecture
//!
//! GCodeForge is organized as a workspace with multiple crates:
//!
//! 1. **gcodeforge-core** - Axis and mode identifiers, `Program`, errors, number formatting
//! 2. **gcodeforge-engine** - Line classifier, segmenter, rule pipeline, repeater, assembler
//! 3. **gcodeforge-settings** - Configuration files and per-mode defaults
//! 4. **gcodeforge** - Logging setup and the command-line front end

pub mod cli;

pub use gcodeforge_core::{
    format_fixed, Axis, ConversionError, ConversionMode, ConversionResult, ParameterError,
    Program, StructuralError,
};
pub use gcodeforge_engine::{
    convert, parameters, ConversionPlan, ConvertOptions, EngineLimits, OutputDocument,
    RawParameters,
};
pub use gcodeforge_settings::{Config, SettingsError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Log output style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable, multi-line
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// Initialize logging
///
/// Sets up structured logging with:
/// - Output on stderr, so stdout carries only G-code
/// - RUST_LOG environment variable support (default `info`)
/// - Pretty or JSON formatting
pub fn init_logging(format: LogFormat) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match format {
        LogFormat::Pretty => {
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true)
                .with_line_number(true)
                .pretty();

            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
        LogFormat::Json => {
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .json();

            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
    }

    Ok(())
}
