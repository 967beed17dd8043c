//! Subcommands and their arguments

use clap::{Args, Subcommand};
use gcodeforge_core::ConversionMode;
use std::path::PathBuf;

/// Top-level subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a G-code program
    Convert(ConvertArgs),

    /// List conversion modes, their parameters, and their rules
    Modes(ModesArgs),
}

/// Arguments for `convert`
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Conversion mode: axis-remap, pattern-repeat, two-axis, or mirror-repeat
    #[arg(long, short)]
    pub mode: ConversionMode,

    /// Input file; `-` or absent reads stdin
    #[arg(long, short)]
    pub input: Option<PathBuf>,

    /// Output file; absent writes stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Mode parameter as name=value; repeatable, overrides config defaults
    #[arg(long = "param", short = 'p', value_parser = parse_param)]
    pub params: Vec<(String, String)>,

    /// Config file (.toml or .json); defaults to the user config location
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Add a "Generated on" line to the banner
    #[arg(long)]
    pub timestamp: bool,

    /// Copy the result to the system clipboard
    #[arg(long)]
    pub copy: bool,
}

/// Arguments for `modes`
#[derive(Args, Debug)]
pub struct ModesArgs {
    /// Config file whose defaults are used to show each mode's rules
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Parse `name=value`.
pub fn parse_param(text: &str) -> Result<(String, String), String> {
    let (name, value) = text
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{}'", text))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing parameter name in '{}'", text));
    }
    Ok((name.to_string(), value.trim().to_string()))
}
