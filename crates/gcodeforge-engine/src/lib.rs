//! # GCodeForge Engine
//!
//! The G-code transformation engine. Data flows one way:
//!
//! raw text → line classifier → segmenter → rule pipeline → repeater → assembler
//!
//! Each conversion mode is a [`ConversionPlan`]; [`convert`] binds parameters,
//! builds the plan, and runs it.

pub mod assembler;
pub mod convert;
pub mod line;
pub mod modes;
pub mod params;
pub mod pipeline;
pub mod repeater;
pub mod rules;
pub mod segmenter;

pub use assembler::{Assembler, OutputDocument};
pub use convert::{convert, run_plan, ConvertOptions, EngineLimits};
pub use line::{classify, parse_fields, AxisField, Line, LineKind, Marker};
pub use modes::{parameters, ConversionPlan, Repetition, Segmentation};
pub use params::{
    BoundParameters, ParameterKind, ParameterSpec, ParameterValue, RawParameters, MAX_FEEDRATE,
};
pub use pipeline::{LineRule, RuleHandle, RulePipeline, RuleState};
pub use repeater::{InstanceTemplate, OffsetStyle, RepetitionPlan, Repeater, TemplateLine};
pub use rules::{
    AxisAugmentRule, AxisSwapRule, AxisZeroRule, DeleteMarkerRule, FeedOrdinalRule,
    PatternTransformRule, SignInversionRule,
};
pub use segmenter::{HeaderBoundary, Segmenter, Segments};
