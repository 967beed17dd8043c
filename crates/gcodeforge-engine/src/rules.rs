//! Rewrite rule implementations
//!
//! Coordinate rules only touch motion lines; markers, comments, and opaque
//! lines pass through. Axis zeroing is the exception and rewrites every line. When a rule matches a line but one of the fields it
//! needs does not parse, the line is kept as-is and the anomaly is logged at
//! debug level.

use gcodeforge_core::{format_field, format_fixed, Axis};
use regex::Regex;
use std::sync::OnceLock;

use super::line::{parse_fields, parse_number, splice, Line};
use super::pipeline::{LineRule, RuleState};

fn log_anomaly(rule: &str, line: &str, axis: Axis) {
    tracing::debug!(rule, line, axis = %axis, "field did not parse; line left unchanged");
}

// ============================================================================
// Line filters
// ============================================================================

/// Removes every line whose trimmed text equals a literal token
#[derive(Debug, Clone)]
pub struct DeleteMarkerRule {
    token: String,
}

impl DeleteMarkerRule {
    /// Create a rule that deletes lines equal to `token`
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl LineRule for DeleteMarkerRule {
    fn name(&self) -> &str {
        "delete_marker"
    }

    fn description(&self) -> String {
        format!("Delete every line equal to {}", self.token)
    }

    fn apply(&self, line: &str, state: RuleState) -> (Option<String>, RuleState) {
        if line.trim() == self.token {
            (None, state)
        } else {
            (Some(line.to_string()), state)
        }
    }
}

// ============================================================================
// Coordinate rules
// ============================================================================

/// Adds the last seen value of one axis to a constant leading field
///
/// Lines that open with `<target><constant>` (for example `Z4` or `Z4.000000`)
/// get that field replaced by `constant + last_value`. Any motion line carrying
/// the source axis updates `last_value` first, including the line being
/// rewritten.
#[derive(Debug, Clone)]
pub struct AxisAugmentRule {
    source: Axis,
    target: Axis,
    constant: f64,
}

impl AxisAugmentRule {
    /// Create an augmentation of `target<constant>` lines by the running `source` value
    pub fn new(source: Axis, target: Axis, constant: f64) -> Self {
        Self {
            source,
            target,
            constant,
        }
    }
}

impl LineRule for AxisAugmentRule {
    fn name(&self) -> &str {
        "axis_augment"
    }

    fn description(&self) -> String {
        format!(
            "Add the last {} value to lines starting with {}{}",
            self.source, self.target, self.constant
        )
    }

    fn apply(&self, line: &str, mut state: RuleState) -> (Option<String>, RuleState) {
        let parsed = Line::parse(line);
        if !parsed.is_motion() {
            return (Some(line.to_string()), state);
        }

        if let Some(field) = parsed.field(self.source) {
            match field.value {
                Some(value) => state.last_value = value,
                None => log_anomaly(self.name(), line, self.source),
            }
        }

        let rewritten = parsed
            .leading_field()
            .filter(|f| f.axis == self.target && f.value == Some(self.constant))
            .map(|f| {
                let replacement = format_field(self.target, self.constant + state.last_value);
                splice(line, &[(f.span.clone(), replacement)])
            });

        (Some(rewritten.unwrap_or_else(|| line.to_string())), state)
    }
}

/// Exchanges the values of two axes on lines that carry both
///
/// The exchange is textual: each letter keeps its position and receives the
/// other field's number exactly as written.
#[derive(Debug, Clone)]
pub struct AxisSwapRule {
    first: Axis,
    second: Axis,
}

impl AxisSwapRule {
    /// Create a swap between two axes
    pub fn new(first: Axis, second: Axis) -> Self {
        Self { first, second }
    }
}

impl LineRule for AxisSwapRule {
    fn name(&self) -> &str {
        "axis_swap"
    }

    fn description(&self) -> String {
        format!("Exchange the {} and {} values", self.first, self.second)
    }

    fn apply(&self, line: &str, state: RuleState) -> (Option<String>, RuleState) {
        let parsed = Line::parse(line);
        let (Some(a), Some(b)) = (parsed.field(self.first), parsed.field(self.second)) else {
            return (Some(line.to_string()), state);
        };

        for field in [a, b] {
            if field.value.is_none() {
                log_anomaly(self.name(), line, field.axis);
                return (Some(line.to_string()), state);
            }
        }

        let mut edits = vec![
            (a.span.clone(), format!("{}{}", a.axis, b.number_text(line))),
            (b.span.clone(), format!("{}{}", b.axis, a.number_text(line))),
        ];
        edits.sort_by_key(|(range, _)| range.start);

        (Some(splice(line, &edits)), state)
    }
}

/// Sets every occurrence of one axis to the literal value `0`, on any line
#[derive(Debug, Clone)]
pub struct AxisZeroRule {
    axis: Axis,
}

impl AxisZeroRule {
    /// Create a rule that zeroes `axis`
    pub fn new(axis: Axis) -> Self {
        Self { axis }
    }
}

impl LineRule for AxisZeroRule {
    fn name(&self) -> &str {
        "axis_zero"
    }

    fn description(&self) -> String {
        format!("Set every {} value to 0", self.axis)
    }

    // Applies to every line, comments included, so no non-zero value survives.
    fn apply(&self, line: &str, state: RuleState) -> (Option<String>, RuleState) {
        let edits: Vec<_> = parse_fields(line)
            .into_iter()
            .filter(|f| f.axis == self.axis)
            .map(|f| (f.span.clone(), format!("{}0", self.axis)))
            .collect();

        if edits.is_empty() {
            (Some(line.to_string()), state)
        } else {
            (Some(splice(line, &edits)), state)
        }
    }
}

/// Negates one axis value in place
///
/// Lines whose trimmed text exactly matches an entry of the skip list are
/// left alone, which lets callers protect fixed positioning literals.
#[derive(Debug, Clone)]
pub struct SignInversionRule {
    axis: Axis,
    skip: Vec<String>,
}

impl SignInversionRule {
    /// Create a sign inversion for `axis`
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            skip: Vec::new(),
        }
    }

    /// Protect lines equal to `literal`
    pub fn skipping(mut self, literal: impl Into<String>) -> Self {
        self.skip.push(literal.into());
        self
    }
}

impl LineRule for SignInversionRule {
    fn name(&self) -> &str {
        "sign_inversion"
    }

    fn description(&self) -> String {
        if self.skip.is_empty() {
            format!("Negate the {} value", self.axis)
        } else {
            format!(
                "Negate the {} value (except on: {})",
                self.axis,
                self.skip.join(", ")
            )
        }
    }

    fn apply(&self, line: &str, state: RuleState) -> (Option<String>, RuleState) {
        let trimmed = line.trim();
        if self.skip.iter().any(|s| s == trimmed) {
            return (Some(line.to_string()), state);
        }

        let parsed = Line::parse(line);
        let Some(field) = parsed.field(self.axis) else {
            return (Some(line.to_string()), state);
        };

        match field.value {
            Some(value) => {
                let replacement = format_field(self.axis, -value);
                (Some(splice(line, &[(field.span.clone(), replacement)])), state)
            }
            None => {
                log_anomaly(self.name(), line, self.axis);
                (Some(line.to_string()), state)
            }
        }
    }
}

fn pattern_regex() -> &'static Regex {
    static PATTERN_REGEX: OnceLock<Regex> = OnceLock::new();
    PATTERN_REGEX.get_or_init(|| {
        Regex::new(r"^Z(\S+)\s+X(\S+)\s+Y(\S+)$").expect("invalid regex pattern")
    })
}

/// Remaps canonical `Z<c> X<x> Y<y>` lines to `Z<y> X<-x> Y<x>`
///
/// A fixed quarter-turn relabeling combined with a mirror. Lines of any other
/// shape pass through.
#[derive(Debug, Clone, Default)]
pub struct PatternTransformRule;

impl PatternTransformRule {
    /// Create the pattern remap
    pub fn new() -> Self {
        Self
    }
}

impl LineRule for PatternTransformRule {
    fn name(&self) -> &str {
        "pattern_transform"
    }

    fn description(&self) -> String {
        "Rewrite Z<c> X<x> Y<y> as Z<y> X<-x> Y<x>".to_string()
    }

    fn apply(&self, line: &str, state: RuleState) -> (Option<String>, RuleState) {
        let trimmed = line.trim();
        let Some(caps) = pattern_regex().captures(trimmed) else {
            return (Some(line.to_string()), state);
        };

        let z = parse_number(&caps[1]);
        let x = parse_number(&caps[2]);
        let y = parse_number(&caps[3]);

        match (z, x, y) {
            (Some(_), Some(x), Some(y)) => {
                let rewritten = format!(
                    "Z{} X{} Y{}",
                    format_fixed(y),
                    format_fixed(-x),
                    format_fixed(x)
                );
                (Some(rewritten), state)
            }
            (z, x, _) => {
                let axis = if z.is_none() {
                    Axis::Z
                } else if x.is_none() {
                    Axis::X
                } else {
                    Axis::Y
                };
                log_anomaly(self.name(), line, axis);
                (Some(line.to_string()), state)
            }
        }
    }
}

// ============================================================================
// Feed rules
// ============================================================================

/// Rewrites feed commands by ordinal
///
/// The first line starting with `F` becomes `F<first>`, every later one
/// becomes `F<rest>`.
#[derive(Debug, Clone)]
pub struct FeedOrdinalRule {
    first: u32,
    rest: u32,
}

impl FeedOrdinalRule {
    /// Create a feed rewrite
    pub fn new(first: u32, rest: u32) -> Self {
        Self { first, rest }
    }
}

impl LineRule for FeedOrdinalRule {
    fn name(&self) -> &str {
        "feed_ordinal"
    }

    fn description(&self) -> String {
        format!(
            "Set the first feed to F{} and later feeds to F{}",
            self.first, self.rest
        )
    }

    fn apply(&self, line: &str, mut state: RuleState) -> (Option<String>, RuleState) {
        if !line.trim_start().starts_with('F') {
            return (Some(line.to_string()), state);
        }

        state.feed_ordinal += 1;
        let feed = if state.feed_ordinal == 1 {
            self.first
        } else {
            self.rest
        };
        (Some(format!("F{}", feed)), state)
    }
}
