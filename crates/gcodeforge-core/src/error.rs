//! Error handling for GCodeForge
//!
//! Conversions fail in exactly two ways that matter to the caller:
//! - Structural errors (the segmenter cannot find a required boundary)
//! - Parameter errors (a supplied value is missing, malformed, or out of range)
//!
//! Both abort the whole conversion and carry one human-readable message.
//! Lines that merely fail to parse inside a rule are not errors at all; they
//! pass through unchanged.

use thiserror::Error;

/// Top-level conversion error
///
/// Exactly one of these is produced for a failed conversion; no partial output
/// accompanies it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    /// The program could not be split into header, body, and footer.
    #[error(transparent)]
    Structural(#[from] StructuralError),

    /// A conversion parameter was rejected before the pipeline ran.
    #[error(transparent)]
    Parameter(#[from] ParameterError),

    /// The input exceeds the configured line ceiling.
    #[error("Input has {lines} lines, which exceeds the limit of {limit}")]
    InputTooLarge {
        /// Number of lines in the rejected input.
        lines: usize,
        /// The configured maximum.
        limit: usize,
    },

    /// Repeating the body would produce more lines than the configured ceiling.
    #[error("Output would have {lines} repeated lines, which exceeds the limit of {limit}")]
    OutputTooLarge {
        /// Body lines times repetitions.
        lines: usize,
        /// The configured maximum.
        limit: usize,
    },
}

impl ConversionError {
    /// Short category name, used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Structural(_) => "structural",
            Self::Parameter(_) => "parameter",
            Self::InputTooLarge { .. } => "input_too_large",
            Self::OutputTooLarge { .. } => "output_too_large",
        }
    }
}

/// Segmentation failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuralError {
    /// The header end marker never appears on a line of its own.
    #[error("Could not find header end marker ({marker}). The header should end with {marker} on its own line.")]
    MissingHeaderMarker {
        /// The marker that was searched for, e.g. `M3`.
        marker: String,
    },

    /// No coordinate-bearing line follows the header.
    #[error("No repeatable block found: the program has no coordinate lines after the header")]
    EmptyPattern,
}

/// Parameter validation failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    /// A required parameter was not supplied.
    #[error("Missing required parameter: {0}")]
    Missing(String),

    /// A parameter could not be parsed.
    #[error("Invalid value for '{name}': '{value}' ({reason})")]
    InvalidValue {
        /// Parameter name.
        name: String,
        /// The offending text.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A parameter parsed but lies outside its domain.
    #[error("Parameter '{name}' out of range: {value} (valid: {min}..={max})")]
    OutOfRange {
        /// Parameter name.
        name: String,
        /// The parsed value.
        value: f64,
        /// Smallest accepted value.
        min: f64,
        /// Largest accepted value.
        max: f64,
    },

    /// The parameter is not declared by the selected mode.
    #[error("Unrecognized parameter '{name}' for mode {mode}")]
    Unrecognized {
        /// Parameter name as supplied.
        name: String,
        /// Mode identifier.
        mode: String,
    },
}

/// Result type alias for conversions.
pub type ConversionResult<T> = Result<T, ConversionError>;

/// Result type alias for parameter binding.
pub type ParameterResult<T> = Result<T, ParameterError>;
