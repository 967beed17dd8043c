//! Conversion entry point
//!
//! `convert` checks the input size, binds parameters, builds the mode's plan,
//! and runs it: segment, rewrite, repeat, assemble. Every call starts from
//! scratch; nothing is kept between calls.

use chrono::{DateTime, Local};
use gcodeforge_core::{ConversionError, ConversionMode, ConversionResult, Program};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::assembler::{Assembler, OutputDocument};
use super::modes::{parameters, ConversionPlan, Segmentation};
use super::params::{BoundParameters, RawParameters};
use super::repeater::Repeater;
use super::segmenter::Segmenter;

/// Size ceilings checked before a conversion runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineLimits {
    /// Largest accepted input, in lines
    pub max_input_lines: usize,
    /// Largest accepted `repetitions` value
    pub max_repetitions: u32,
    /// Largest accepted repeated output (body lines times repetitions)
    pub max_output_lines: usize,
}

impl Default for EngineLimits {
    fn default() -> Self {
        Self {
            max_input_lines: 100_000,
            max_repetitions: 10_000,
            max_output_lines: 10_000_000,
        }
    }
}

/// Per-call options
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Timestamp for banners that carry one; `None` keeps output deterministic
    pub generated_at: Option<DateTime<Local>>,
    /// Size ceilings
    pub limits: EngineLimits,
}

/// Convert `input` with `mode`.
///
/// # Errors
/// - `InputTooLarge` when the input exceeds `max_input_lines`
/// - `Parameter` when a parameter is missing, malformed, or out of range
/// - `Structural` when the program cannot be segmented
/// - `OutputTooLarge` when the repeated body would exceed `max_output_lines`
pub fn convert(
    mode: ConversionMode,
    input: &str,
    raw: &RawParameters,
    options: &ConvertOptions,
) -> ConversionResult<OutputDocument> {
    let started = Instant::now();
    let program = Program::from_text(input);

    if program.len() > options.limits.max_input_lines {
        return Err(ConversionError::InputTooLarge {
            lines: program.len(),
            limit: options.limits.max_input_lines,
        });
    }

    let params = BoundParameters::bind(
        mode,
        parameters(mode),
        raw,
        options.limits.max_repetitions,
    )?;
    let plan = ConversionPlan::build(mode, &params, options.generated_at)?;
    let document = run_plan(&plan, &program, options.limits.max_output_lines)?;

    tracing::info!(
        mode = %mode,
        lines_in = program.len(),
        lines_out = document.line_count(),
        elapsed = ?started.elapsed(),
        "conversion complete"
    );
    Ok(document)
}

/// Run an already-built plan over `program`.
///
/// # Errors
/// - `Structural` when the plan segments and the program has no usable boundary
/// - `OutputTooLarge` when body lines times repetitions exceeds `max_output_lines`
pub fn run_plan(
    plan: &ConversionPlan,
    program: &Program,
    max_output_lines: usize,
) -> ConversionResult<OutputDocument> {
    let assembler = Assembler::new().with_banner(plan.banner.clone());

    let (boundary, compact) = match &plan.segmentation {
        Segmentation::WholeDocument => {
            return Ok(assembler.single(plan.body_rules.apply(program)));
        }
        Segmentation::Segmented { boundary, compact } => (boundary, *compact),
    };

    let mut segments = Segmenter::new(boundary.clone()).segment(program)?;
    if compact {
        segments = segments.compacted();
    }

    if let Some(repetition) = &plan.repetition {
        let lines = segments.body.len().saturating_mul(repetition.plan.count as usize);
        if lines > max_output_lines {
            return Err(ConversionError::OutputTooLarge {
                lines,
                limit: max_output_lines,
            });
        }
    }

    let body = plan.body_rules.apply(&segments.body);
    let footer = plan.footer_rules.apply(&segments.footer);
    let instances = match &plan.repetition {
        Some(repetition) => {
            Repeater::new(repetition.plan, repetition.template.clone()).repeat(&body)
        }
        None => body,
    };

    Ok(assembler.assemble(&segments.header, &instances, &footer))
}
