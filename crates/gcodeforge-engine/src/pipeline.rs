//! Rewrite rule trait and the ordered rule pipeline

use gcodeforge_core::Program;
use std::sync::Arc;

/// Running state threaded through one rule's pass over a document
///
/// Each rule starts every pass from `RuleState::default()`. Nothing is carried
/// between rules or between conversions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RuleState {
    /// Last value seen for a tracked axis (0 until one is seen)
    pub last_value: f64,
    /// Number of feed commands seen so far in this pass
    pub feed_ordinal: u32,
}

/// A line rewrite rule
///
/// `apply` maps one line and the incoming state to zero or one output lines
/// and the outgoing state. Rules must not fail: a line the rule cannot parse
/// passes through unchanged.
///
/// # Examples
/// - Delete every `Z0` line
/// - Swap the X and Y values
/// - Negate one axis
pub trait LineRule: Send + Sync {
    /// Get the name/identifier of this rule
    fn name(&self) -> &str;

    /// Get a description of what this rule does
    fn description(&self) -> String;

    /// Rewrite one line
    fn apply(&self, line: &str, state: RuleState) -> (Option<String>, RuleState);
}

/// Arc-wrapped rule for sharing between plans
pub type RuleHandle = Arc<dyn LineRule>;

/// Ordered list of rewrite rules
///
/// Rules run one after another over the whole document: rule 1 sees every
/// line before rule 2 sees any.
///
/// # Example
/// ```ignore
/// let mut pipeline = RulePipeline::new();
/// pipeline.register(Arc::new(DeleteMarkerRule::new("Z0")));
/// pipeline.register(Arc::new(AxisSwapRule::new(Axis::X, Axis::Y)));
///
/// let output = pipeline.apply(&program);
/// ```
#[derive(Clone, Default)]
pub struct RulePipeline {
    rules: Vec<RuleHandle>,
}

impl RulePipeline {
    /// Create a new empty pipeline
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Register a rule. Rules run in registration order.
    pub fn register(&mut self, rule: RuleHandle) -> &mut Self {
        self.rules.push(rule);
        self
    }

    /// Builder-style variant of [`register`](Self::register)
    pub fn with(mut self, rule: RuleHandle) -> Self {
        self.rules.push(rule);
        self
    }

    /// Number of registered rules
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Whether the pipeline has no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// List the registered rules as `(name, description)`
    pub fn list_rules(&self) -> Vec<(&str, String)> {
        self.rules
            .iter()
            .map(|r| (r.name(), r.description()))
            .collect()
    }

    /// Run one rule over every line, folding the state through the pass.
    pub fn apply_rule(rule: &dyn LineRule, program: &Program) -> Program {
        let (lines, _) = program.iter().fold(
            (Vec::with_capacity(program.len()), RuleState::default()),
            |(mut lines, state), line| {
                let (output, state) = rule.apply(line, state);
                lines.extend(output);
                (lines, state)
            },
        );
        Program::new(lines)
    }

    /// Run every rule, in order, producing a new program.
    pub fn apply(&self, program: &Program) -> Program {
        self.rules.iter().fold(program.clone(), |current, rule| {
            let next = Self::apply_rule(rule.as_ref(), &current);
            tracing::trace!(
                rule = rule.name(),
                lines_in = current.len(),
                lines_out = next.len(),
                "rule pass complete"
            );
            next
        })
    }
}

impl std::fmt::Debug for RulePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.rules.iter().map(|r| r.name()))
            .finish()
    }
}
