//! Core value types
//!
//! Axis letters, conversion mode identifiers, and the `Program` text value.

pub mod axis;
pub mod mode;
pub mod program;

pub use axis::Axis;
pub use mode::ConversionMode;
pub use program::Program;
