//! Body repetition with a cumulative per-instance offset
//!
//! Instance `i` (0-based) uses `offset = i * step`, computed directly from the
//! index so long runs do not accumulate rounding drift.

use gcodeforge_core::{format_field, format_fixed, Axis, Program};
use serde::{Deserialize, Serialize};

use super::line::{splice, Line};

/// How many copies to emit and how far apart
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RepetitionPlan {
    /// Number of instances (at least 1)
    pub count: u32,
    /// Offset added per instance
    pub axis_offset_per_step: f64,
    /// Axis that receives the offset
    pub target_axis: Axis,
}

impl RepetitionPlan {
    /// Create a plan
    pub fn new(count: u32, axis_offset_per_step: f64, target_axis: Axis) -> Self {
        Self {
            count,
            axis_offset_per_step,
            target_axis,
        }
    }

    /// Offset of instance `index`
    pub fn offset(&self, index: u32) -> f64 {
        f64::from(index) * self.axis_offset_per_step
    }
}

/// How body lines receive the instance offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OffsetStyle {
    /// Add the offset to the target field when present
    #[default]
    Shift,
    /// As `Shift`, and append `<axis><offset>` to X/Y motion lines lacking the target
    Append,
}

/// One fixed line of a preamble or postamble
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateLine {
    /// Emitted verbatim
    Literal(String),
    /// `<prefix> <axis><base + offset>`; the axis comes from the plan
    Position {
        /// Text before the positioned field (may be empty)
        prefix: String,
        /// Value for instance 0
        base: f64,
    },
}

impl TemplateLine {
    /// A verbatim line
    pub fn literal(text: impl Into<String>) -> Self {
        Self::Literal(text.into())
    }

    /// A positioning line
    pub fn position(prefix: impl Into<String>, base: f64) -> Self {
        Self::Position {
            prefix: prefix.into(),
            base,
        }
    }

    fn render(&self, axis: Axis, offset: f64) -> String {
        match self {
            Self::Literal(text) => text.clone(),
            Self::Position { prefix, base } if prefix.is_empty() => {
                format_field(axis, base + offset)
            }
            Self::Position { prefix, base } => {
                format!("{} {}", prefix, format_field(axis, base + offset))
            }
        }
    }
}

/// Fixed lines wrapped around every instance
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InstanceTemplate {
    /// Preamble for instance 0 only; falls back to `preamble` when absent
    pub first_preamble: Option<Vec<TemplateLine>>,
    /// Preamble for every other instance
    pub preamble: Vec<TemplateLine>,
    /// Lines after the body
    pub postamble: Vec<TemplateLine>,
    /// Emit a `; --- Repetition n ---` comment before each instance
    pub heading: bool,
    /// How the body receives the offset
    pub style: OffsetStyle,
}

/// Emits offset copies of a body
#[derive(Debug, Clone)]
pub struct Repeater {
    plan: RepetitionPlan,
    template: InstanceTemplate,
}

impl Repeater {
    /// Create a repeater
    pub fn new(plan: RepetitionPlan, template: InstanceTemplate) -> Self {
        Self { plan, template }
    }

    /// The repetition plan
    pub fn plan(&self) -> &RepetitionPlan {
        &self.plan
    }

    /// Build instance `index` of `body`.
    pub fn instance(&self, index: u32, body: &Program) -> Vec<String> {
        let axis = self.plan.target_axis;
        let offset = self.plan.offset(index);
        let mut lines = Vec::with_capacity(body.len() + 8);

        if self.template.heading {
            lines.push(format!(
                "; --- Repetition {} ({}-offset: {}) ---",
                index + 1,
                axis,
                format_fixed(offset)
            ));
        }

        let preamble = match (&self.template.first_preamble, index) {
            (Some(first), 0) => first,
            _ => &self.template.preamble,
        };
        lines.extend(preamble.iter().map(|t| t.render(axis, offset)));
        lines.extend(body.iter().map(|l| self.offset_line(l, offset)));
        lines.extend(self.template.postamble.iter().map(|t| t.render(axis, offset)));
        lines
    }

    /// Concatenate `count` instances, separated by one blank line.
    pub fn repeat(&self, body: &Program) -> Program {
        let mut lines = Vec::new();
        for index in 0..self.plan.count {
            if index > 0 {
                lines.push(String::new());
            }
            lines.extend(self.instance(index, body));
        }
        tracing::debug!(
            instances = self.plan.count,
            axis = %self.plan.target_axis,
            step = self.plan.axis_offset_per_step,
            lines = lines.len(),
            "repeated body"
        );
        Program::new(lines)
    }

    fn offset_line(&self, line: &str, offset: f64) -> String {
        let axis = self.plan.target_axis;
        let parsed = Line::parse(line);
        if !parsed.is_motion() {
            return line.to_string();
        }

        match parsed.field(axis) {
            Some(field) => match field.value {
                Some(value) => splice(
                    line,
                    &[(field.span.clone(), format_field(axis, value + offset))],
                ),
                None => {
                    tracing::debug!(line, axis = %axis, "field did not parse; line left unchanged");
                    line.to_string()
                }
            },
            None if self.template.style == OffsetStyle::Append
                && parsed.has(Axis::X)
                && parsed.has(Axis::Y) =>
            {
                format!("{} {}", line, format_field(axis, offset))
            }
            None => line.to_string(),
        }
    }
}
