//! Built-in conversion modes
//!
//! Every mode is data: a [`ConversionPlan`] naming the segmentation policy, the
//! ordered rule lists, and an optional repetition. The conversion driver runs
//! any plan the same way.

use chrono::{DateTime, Local};
use gcodeforge_core::{Axis, ConversionMode, ParameterResult};
use std::sync::Arc;

use super::params::{BoundParameters, ParameterKind, ParameterSpec};
use super::pipeline::RulePipeline;
use super::repeater::{InstanceTemplate, OffsetStyle, RepetitionPlan, TemplateLine};
use super::rules::{
    AxisAugmentRule, AxisSwapRule, AxisZeroRule, DeleteMarkerRule, FeedOrdinalRule,
    PatternTransformRule, SignInversionRule,
};
use super::segmenter::HeaderBoundary;

const REPETITIONS: ParameterSpec =
    ParameterSpec::required("repetitions", ParameterKind::Count, "Number of copies of the body");
const RAPID_FEEDRATE: ParameterSpec = ParameterSpec::optional(
    "rapid_feedrate",
    ParameterKind::Feedrate,
    "10000",
    "Feed rate for positioning moves",
);
const ENGRAVING_FEEDRATE: ParameterSpec = ParameterSpec::optional(
    "engraving_feedrate",
    ParameterKind::Feedrate,
    "1500",
    "Feed rate while cutting",
);

const PATTERN_REPEAT_PARAMS: &[ParameterSpec] = &[
    REPETITIONS,
    ParameterSpec::required("offset", ParameterKind::Decimal, "Y distance between copies"),
    RAPID_FEEDRATE,
    ENGRAVING_FEEDRATE,
];

const TWO_AXIS_PARAMS: &[ParameterSpec] = &[
    REPETITIONS,
    ParameterSpec::required("offset", ParameterKind::Decimal, "B increment between copies"),
    RAPID_FEEDRATE,
    ENGRAVING_FEEDRATE,
];

const MIRROR_REPEAT_PARAMS: &[ParameterSpec] = &[
    REPETITIONS,
    ParameterSpec::required("offset", ParameterKind::Decimal, "X distance between copies"),
    ParameterSpec::optional("mirror_axis", ParameterKind::Axis, "X", "Axis whose sign is inverted"),
];

/// Parameters accepted by `mode`.
pub fn parameters(mode: ConversionMode) -> &'static [ParameterSpec] {
    match mode {
        ConversionMode::AxisRemap => &[],
        ConversionMode::PatternRepeat => PATTERN_REPEAT_PARAMS,
        ConversionMode::TwoAxis => TWO_AXIS_PARAMS,
        ConversionMode::MirrorRepeat => MIRROR_REPEAT_PARAMS,
    }
}

/// How the input is split before rules run
#[derive(Debug, Clone, PartialEq)]
pub enum Segmentation {
    /// Rules run over the whole document; nothing is repeated
    WholeDocument,
    /// Split at `boundary`; `compact` trims header and footer and drops their blanks
    Segmented {
        /// Where the header stops
        boundary: HeaderBoundary,
        /// Whether to compact header and footer
        compact: bool,
    },
}

/// Repetition settings for a segmented plan
#[derive(Debug, Clone, PartialEq)]
pub struct Repetition {
    /// Count, step, and axis
    pub plan: RepetitionPlan,
    /// Lines around each instance
    pub template: InstanceTemplate,
}

/// A complete recipe for one conversion
#[derive(Debug, Clone)]
pub struct ConversionPlan {
    /// Mode the plan was built for
    pub mode: ConversionMode,
    /// Segmentation policy
    pub segmentation: Segmentation,
    /// Rules over the body (or the whole document)
    pub body_rules: RulePipeline,
    /// Rules over the footer
    pub footer_rules: RulePipeline,
    /// Repetition of the transformed body
    pub repetition: Option<Repetition>,
    /// Comment lines placed before the output
    pub banner: Vec<String>,
}

impl ConversionPlan {
    /// Build the plan for `mode` from bound parameters.
    ///
    /// `generated_at` adds a timestamp line to banners that carry one.
    pub fn build(
        mode: ConversionMode,
        params: &BoundParameters,
        generated_at: Option<DateTime<Local>>,
    ) -> ParameterResult<Self> {
        let plan = match mode {
            ConversionMode::AxisRemap => axis_remap(),
            ConversionMode::PatternRepeat => pattern_repeat(params, generated_at)?,
            ConversionMode::TwoAxis => two_axis(params)?,
            ConversionMode::MirrorRepeat => mirror_repeat(params)?,
        };
        Ok(plan)
    }

    /// `(stage, rule name, description)` for every rule in the plan.
    pub fn describe_rules(&self) -> Vec<(&'static str, String, String)> {
        let stage = |name: &'static str, pipeline: &RulePipeline| {
            pipeline
                .list_rules()
                .into_iter()
                .map(move |(rule, description)| (name, rule.to_string(), description))
                .collect::<Vec<_>>()
        };
        let mut rules = stage("body", &self.body_rules);
        rules.extend(stage("footer", &self.footer_rules));
        rules
    }
}

fn axis_remap() -> ConversionPlan {
    let body_rules = RulePipeline::new()
        .with(Arc::new(DeleteMarkerRule::new("Z0")))
        .with(Arc::new(AxisAugmentRule::new(Axis::Y, Axis::Z, 4.0)))
        .with(Arc::new(AxisSwapRule::new(Axis::X, Axis::Y)))
        .with(Arc::new(AxisZeroRule::new(Axis::X)));

    ConversionPlan {
        mode: ConversionMode::AxisRemap,
        segmentation: Segmentation::WholeDocument,
        body_rules,
        footer_rules: RulePipeline::new(),
        repetition: None,
        banner: Vec::new(),
    }
}

fn pattern_repeat(
    params: &BoundParameters,
    generated_at: Option<DateTime<Local>>,
) -> ParameterResult<ConversionPlan> {
    let count = params.count("repetitions")?;
    let offset = params.decimal("offset")?;
    let rapid = params.feedrate("rapid_feedrate")?;
    let engraving = params.feedrate("engraving_feedrate")?;

    let template = InstanceTemplate {
        first_preamble: None,
        preamble: vec![
            TemplateLine::literal(format!("F{}", rapid)),
            TemplateLine::literal("Z-4"),
            TemplateLine::position("X-6.000000", 6.0),
            TemplateLine::literal(format!("F{}", engraving)),
        ],
        postamble: vec![TemplateLine::literal("Z-4")],
        heading: true,
        style: OffsetStyle::Shift,
    };

    let mut banner = vec!["; --- Transformed G-code Description ---".to_string()];
    if let Some(at) = generated_at {
        banner.push(format!("; Generated on: {}", at.format("%Y-%m-%d %H:%M:%S")));
    }
    banner.extend([
        ";".to_string(),
        format!(
            "; - Repetition with Y-Offset Applied (Offset: {:.3}, Count: {})",
            offset, count
        ),
        format!(
            ";   - Each repetition includes a custom preamble (F{}, Z-4, X-6.000000 Y<offset>, F{})",
            rapid, engraving
        ),
        ";   - Y-coordinates in the pattern and preamble are adjusted by cumulative Y-offset"
            .to_string(),
        ";   - Z-values in the pattern are taken from the original Y values".to_string(),
        ";   - Each repetition ends with Z-4".to_string(),
        "; ---------------------------------------".to_string(),
    ]);

    Ok(ConversionPlan {
        mode: ConversionMode::PatternRepeat,
        segmentation: Segmentation::Segmented {
            boundary: HeaderBoundary::FirstMotion {
                leading: Some(Axis::Z),
            },
            compact: true,
        },
        body_rules: RulePipeline::new().with(Arc::new(PatternTransformRule::new())),
        footer_rules: RulePipeline::new().with(Arc::new(DeleteMarkerRule::new("Z0"))),
        repetition: Some(Repetition {
            plan: RepetitionPlan::new(count, offset, Axis::Y),
            template,
        }),
        banner,
    })
}

fn two_axis(params: &BoundParameters) -> ParameterResult<ConversionPlan> {
    let count = params.count("repetitions")?;
    let increment = params.decimal("offset")?;
    let rapid = params.feedrate("rapid_feedrate")?;
    let engraving = params.feedrate("engraving_feedrate")?;

    Ok(ConversionPlan {
        mode: ConversionMode::TwoAxis,
        segmentation: Segmentation::Segmented {
            boundary: HeaderBoundary::spindle_start(),
            compact: false,
        },
        body_rules: RulePipeline::new().with(Arc::new(FeedOrdinalRule::new(rapid, engraving))),
        footer_rules: RulePipeline::new(),
        repetition: Some(Repetition {
            plan: RepetitionPlan::new(count, increment, Axis::B),
            template: InstanceTemplate {
                style: OffsetStyle::Append,
                ..InstanceTemplate::default()
            },
        }),
        banner: Vec::new(),
    })
}

fn mirror_repeat(params: &BoundParameters) -> ParameterResult<ConversionPlan> {
    let count = params.count("repetitions")?;
    let offset = params.decimal("offset")?;
    let mirror = params.axis("mirror_axis")?;

    let template = InstanceTemplate {
        first_preamble: Some(vec![
            TemplateLine::literal("G90"),
            TemplateLine::position("G0", 0.0),
        ]),
        preamble: vec![TemplateLine::position("G0", 0.0)],
        postamble: vec![TemplateLine::literal("Z4")],
        heading: false,
        style: OffsetStyle::Shift,
    };

    let inversion = SignInversionRule::new(mirror)
        .skipping("X0")
        .skipping("Y0");

    Ok(ConversionPlan {
        mode: ConversionMode::MirrorRepeat,
        segmentation: Segmentation::Segmented {
            boundary: HeaderBoundary::spindle_start(),
            compact: false,
        },
        body_rules: RulePipeline::new().with(Arc::new(inversion)),
        footer_rules: RulePipeline::new(),
        repetition: Some(Repetition {
            plan: RepetitionPlan::new(count, offset, Axis::X),
            template,
        }),
        banner: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::RawParameters;

    fn bound(mode: ConversionMode, pairs: &[(&str, &str)]) -> BoundParameters {
        let raw: RawParameters = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        BoundParameters::bind(mode, parameters(mode), &raw, 10_000).unwrap()
    }

    #[test]
    fn test_axis_remap_rule_order() {
        let plan = ConversionPlan::build(
            ConversionMode::AxisRemap,
            &BoundParameters::default(),
            None,
        )
        .unwrap();
        let names: Vec<_> = plan
            .describe_rules()
            .into_iter()
            .map(|(_, name, _)| name)
            .collect();
        assert_eq!(names, ["delete_marker", "axis_augment", "axis_swap", "axis_zero"]);
        assert_eq!(plan.segmentation, Segmentation::WholeDocument);
        assert!(plan.repetition.is_none());
    }

    #[test]
    fn test_pattern_repeat_banner() {
        let params = bound(
            ConversionMode::PatternRepeat,
            &[("repetitions", "40"), ("offset", "5.715")],
        );
        let plan = ConversionPlan::build(ConversionMode::PatternRepeat, &params, None).unwrap();
        assert_eq!(plan.banner[0], "; --- Transformed G-code Description ---");
        assert_eq!(
            plan.banner[2],
            "; - Repetition with Y-Offset Applied (Offset: 5.715, Count: 40)"
        );
        assert!(!plan.banner.iter().any(|l| l.starts_with("; Generated on")));

        let plan =
            ConversionPlan::build(ConversionMode::PatternRepeat, &params, Some(Local::now()))
                .unwrap();
        assert!(plan.banner[1].starts_with("; Generated on: "));
    }

    #[test]
    fn test_two_axis_plan() {
        let params = bound(ConversionMode::TwoAxis, &[("repetitions", "2"), ("offset", "8.16")]);
        let plan = ConversionPlan::build(ConversionMode::TwoAxis, &params, None).unwrap();
        let repetition = plan.repetition.unwrap();
        assert_eq!(repetition.plan.target_axis, Axis::B);
        assert_eq!(repetition.template.style, OffsetStyle::Append);
        assert_eq!(
            plan.body_rules.list_rules()[0].1,
            "Set the first feed to F10000 and later feeds to F1500"
        );
    }

    #[test]
    fn test_every_mode_declares_parameters() {
        assert!(parameters(ConversionMode::AxisRemap).is_empty());
        for mode in [
            ConversionMode::PatternRepeat,
            ConversionMode::TwoAxis,
            ConversionMode::MirrorRepeat,
        ] {
            let names: Vec<_> = parameters(mode).iter().map(|p| p.name).collect();
            assert!(names.contains(&"repetitions"));
            assert!(names.contains(&"offset"));
        }
    }
}
