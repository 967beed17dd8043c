//! Command-line front end
//!
//! Reads a program, hands it to the engine with the merged parameters, and
//! writes the result. Conversion logic lives entirely in the engine.

pub mod commands;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use gcodeforge_core::ConversionMode;
use gcodeforge_engine::{
    convert, parameters, BoundParameters, ConversionPlan, ConvertOptions, OutputDocument,
    RawParameters,
};
use gcodeforge_settings::Config;
use std::io::{Read, Write};
use std::path::Path;

use crate::LogFormat;
pub use commands::{Commands, ConvertArgs, ModesArgs};

/// The `gcodeforge` command line
#[derive(Parser, Debug)]
#[command(
    name = "gcodeforge",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_DATE"), ")"),
    about = "Rewrite G-code toolpaths: axis remapping, mirroring, and repetition"
)]
pub struct Cli {
    /// Log output style (logs go to stderr)
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, global = true)]
    pub log_format: LogFormat,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Dispatch to the selected subcommand.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Convert(args) => run_convert(args),
            Commands::Modes(args) => run_modes(args),
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => match Config::default_path() {
            Ok(path) => Config::load_or_default(&path)
                .with_context(|| format!("Failed to load config from {}", path.display())),
            Err(e) => {
                tracing::debug!(error = %e, "using built-in defaults");
                Ok(Config::default())
            }
        },
    }
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file {}", path.display())),
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

fn write_output(path: Option<&Path>, document: &OutputDocument) -> Result<()> {
    let mut text = document.text();
    text.push('\n');

    match path {
        Some(path) => std::fs::write(path, text)
            .with_context(|| format!("Failed to write output file {}", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(text.as_bytes())
                .and_then(|_| stdout.flush())
                .context("Failed to write stdout")
        }
    }
}

fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new().context("Clipboard unavailable")?;
    clipboard
        .set_text(text.to_string())
        .context("Failed to copy to clipboard")
}

fn run_convert(args: ConvertArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let input = read_input(args.input.as_deref())?;

    let overrides: RawParameters = args.params.into_iter().collect();
    let params = config.parameters_for(args.mode, &overrides);
    let options = ConvertOptions {
        generated_at: (args.timestamp || config.output.timestamp_banner).then(Local::now),
        limits: config.engine_limits(),
    };

    let document = convert(args.mode, &input, &params, &options).inspect_err(|e| {
        tracing::error!(kind = e.kind(), mode = %args.mode, "conversion failed");
    })?;

    write_output(args.output.as_deref(), &document)?;

    if args.copy || config.output.copy_to_clipboard {
        match copy_to_clipboard(&document.text()) {
            Ok(()) => tracing::info!(lines = document.line_count(), "copied to clipboard"),
            Err(e) => tracing::warn!(error = %format!("{:#}", e), "clipboard copy failed"),
        }
    }

    Ok(())
}

/// Render the `modes` listing.
pub fn describe_modes(config: &Config) -> String {
    let mut out = String::new();

    for mode in ConversionMode::ALL {
        out.push_str(&format!("{} ({})\n", mode.id(), mode.title()));

        let specs = parameters(mode);
        if specs.is_empty() {
            out.push_str("  parameters: none\n");
        } else {
            out.push_str("  parameters:\n");
            for spec in specs {
                let presence = match spec.default {
                    Some(default) => format!("default {}", default),
                    None => "required".to_string(),
                };
                out.push_str(&format!(
                    "    {:<20} {:<9} {:<15} {}\n",
                    spec.name,
                    spec.kind.label(),
                    presence,
                    spec.description
                ));
            }
        }

        let raw = config.parameters_for(mode, &RawParameters::new());
        let limits = config.engine_limits();
        let plan = BoundParameters::bind(mode, specs, &raw, limits.max_repetitions)
            .and_then(|params| ConversionPlan::build(mode, &params, None));
        match plan {
            Ok(plan) => {
                out.push_str("  rules:\n");
                for (stage, name, description) in plan.describe_rules() {
                    out.push_str(&format!("    [{}] {}: {}\n", stage, name, description));
                }
            }
            Err(e) => out.push_str(&format!("  rules: unavailable ({})\n", e)),
        }
        out.push('\n');
    }

    out
}

fn run_modes(args: ModesArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    print!("{}", describe_modes(&config));
    Ok(())
}
