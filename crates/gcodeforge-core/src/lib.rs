//! # GCodeForge Core
//!
//! Core types shared by every GCodeForge crate:
//! - Axis letters and conversion mode identifiers
//! - The `Program` value (an ordered list of raw G-code lines)
//! - The conversion error taxonomy
//! - Fixed-point number formatting used for every rewritten coordinate

pub mod error;
pub mod format;
pub mod types;

pub use error::{
    ConversionError, ConversionResult, ParameterError, ParameterResult, StructuralError,
};
pub use format::{format_field, format_fixed, FIXED_DECIMALS};
pub use types::{Axis, ConversionMode, Program};
