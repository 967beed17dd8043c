//! Parameter declaration and binding
//!
//! Callers hand the engine a `name -> text` map. Each mode declares the
//! parameters it accepts; binding parses and range-checks every value before
//! any pipeline stage runs.

use gcodeforge_core::{Axis, ConversionMode, ParameterError, ParameterResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw parameter text keyed by name
pub type RawParameters = BTreeMap<String, String>;

/// Highest accepted feed rate
pub const MAX_FEEDRATE: u32 = 1_000_000;

/// What kind of value a parameter holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    /// Whole number, at least 1
    Count,
    /// Finite decimal
    Decimal,
    /// Whole number, 0 to [`MAX_FEEDRATE`]
    Feedrate,
    /// One of the coordinate axis letters
    Axis,
}

impl ParameterKind {
    /// Short label used in listings.
    pub fn label(self) -> &'static str {
        match self {
            Self::Count => "count",
            Self::Decimal => "decimal",
            Self::Feedrate => "feedrate",
            Self::Axis => "axis",
        }
    }
}

/// Declaration of one parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParameterSpec {
    /// Name as given on the command line or in config
    pub name: &'static str,
    /// Value kind
    pub kind: ParameterKind,
    /// Whether binding fails when absent
    pub required: bool,
    /// Text used when absent and not required
    pub default: Option<&'static str>,
    /// One-line description
    pub description: &'static str,
}

impl ParameterSpec {
    /// A required parameter
    pub const fn required(
        name: &'static str,
        kind: ParameterKind,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            kind,
            required: true,
            default: None,
            description,
        }
    }

    /// An optional parameter with a default
    pub const fn optional(
        name: &'static str,
        kind: ParameterKind,
        default: &'static str,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            kind,
            required: false,
            default: Some(default),
            description,
        }
    }
}

/// A parsed parameter value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParameterValue {
    /// Parsed count
    Count(u32),
    /// Parsed decimal
    Decimal(f64),
    /// Parsed feed rate
    Feedrate(u32),
    /// Parsed axis
    Axis(Axis),
}

/// Validated parameters for one conversion
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundParameters {
    values: BTreeMap<&'static str, ParameterValue>,
}

impl BoundParameters {
    /// Parse `raw` against `specs`.
    ///
    /// # Errors
    /// - `Unrecognized` for a name no spec declares
    /// - `Missing` for an absent required parameter
    /// - `InvalidValue` for text that does not parse as the declared kind
    /// - `OutOfRange` for counts outside `1..=max_repetitions` and feed rates
    ///   outside `0..=MAX_FEEDRATE`
    pub fn bind(
        mode: ConversionMode,
        specs: &[ParameterSpec],
        raw: &RawParameters,
        max_repetitions: u32,
    ) -> ParameterResult<Self> {
        let declared = |name: &str| specs.iter().any(|s| s.name == name);
        if let Some(name) = raw.keys().find(|k| !declared(k.as_str())) {
            return Err(ParameterError::Unrecognized {
                name: name.clone(),
                mode: mode.id().to_string(),
            });
        }

        let mut values = BTreeMap::new();
        for spec in specs {
            let text = match (raw.get(spec.name), spec.default) {
                (Some(text), _) => text.as_str(),
                (None, Some(default)) if !spec.required => default,
                _ => return Err(ParameterError::Missing(spec.name.to_string())),
            };
            let value = parse_value(spec, text.trim(), max_repetitions)?;
            values.insert(spec.name, value);
        }

        Ok(Self { values })
    }

    /// Raw access to a bound value.
    pub fn get(&self, name: &str) -> Option<ParameterValue> {
        self.values.get(name).copied()
    }

    /// A bound count.
    pub fn count(&self, name: &str) -> ParameterResult<u32> {
        match self.get(name) {
            Some(ParameterValue::Count(value)) => Ok(value),
            _ => Err(ParameterError::Missing(name.to_string())),
        }
    }

    /// A bound decimal.
    pub fn decimal(&self, name: &str) -> ParameterResult<f64> {
        match self.get(name) {
            Some(ParameterValue::Decimal(value)) => Ok(value),
            _ => Err(ParameterError::Missing(name.to_string())),
        }
    }

    /// A bound feed rate.
    pub fn feedrate(&self, name: &str) -> ParameterResult<u32> {
        match self.get(name) {
            Some(ParameterValue::Feedrate(value)) => Ok(value),
            _ => Err(ParameterError::Missing(name.to_string())),
        }
    }

    /// A bound axis.
    pub fn axis(&self, name: &str) -> ParameterResult<Axis> {
        match self.get(name) {
            Some(ParameterValue::Axis(value)) => Ok(value),
            _ => Err(ParameterError::Missing(name.to_string())),
        }
    }

    /// Number of bound values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing is bound
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn invalid(spec: &ParameterSpec, text: &str, reason: &str) -> ParameterError {
    ParameterError::InvalidValue {
        name: spec.name.to_string(),
        value: text.to_string(),
        reason: reason.to_string(),
    }
}

fn bounded_integer(
    spec: &ParameterSpec,
    text: &str,
    min: u32,
    max: u32,
) -> ParameterResult<u32> {
    let value: i64 = text
        .parse()
        .map_err(|_| invalid(spec, text, "expected a whole number"))?;
    if value < i64::from(min) || value > i64::from(max) {
        return Err(ParameterError::OutOfRange {
            name: spec.name.to_string(),
            value: value as f64,
            min: f64::from(min),
            max: f64::from(max),
        });
    }
    u32::try_from(value).map_err(|_| invalid(spec, text, "expected a whole number"))
}

fn parse_value(
    spec: &ParameterSpec,
    text: &str,
    max_repetitions: u32,
) -> ParameterResult<ParameterValue> {
    match spec.kind {
        ParameterKind::Count => {
            bounded_integer(spec, text, 1, max_repetitions).map(ParameterValue::Count)
        }
        ParameterKind::Feedrate => {
            bounded_integer(spec, text, 0, MAX_FEEDRATE).map(ParameterValue::Feedrate)
        }
        ParameterKind::Decimal => {
            let value: f64 = text
                .parse()
                .map_err(|_| invalid(spec, text, "expected a number"))?;
            if !value.is_finite() {
                return Err(invalid(spec, text, "expected a finite number"));
            }
            Ok(ParameterValue::Decimal(value))
        }
        ParameterKind::Axis => {
            let axis: Axis = text.parse().map_err(|e: String| invalid(spec, text, &e))?;
            if !axis.is_coordinate() {
                return Err(invalid(spec, text, "expected one of X, Y, Z, B"));
            }
            Ok(ParameterValue::Axis(axis))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPECS: &[ParameterSpec] = &[
        ParameterSpec::required("repetitions", ParameterKind::Count, "Number of copies"),
        ParameterSpec::required("offset", ParameterKind::Decimal, "Offset per copy"),
        ParameterSpec::optional("rapid_feedrate", ParameterKind::Feedrate, "10000", "Rapid feed"),
        ParameterSpec::optional("mirror_axis", ParameterKind::Axis, "X", "Axis to mirror"),
    ];

    fn raw(pairs: &[(&str, &str)]) -> RawParameters {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn bind(pairs: &[(&str, &str)]) -> ParameterResult<BoundParameters> {
        BoundParameters::bind(ConversionMode::PatternRepeat, SPECS, &raw(pairs), 10_000)
    }

    #[test]
    fn test_bind_with_defaults() {
        let params = bind(&[("repetitions", "3"), ("offset", " 5.715 ")]).unwrap();
        assert_eq!(params.count("repetitions"), Ok(3));
        assert_eq!(params.decimal("offset"), Ok(5.715));
        assert_eq!(params.feedrate("rapid_feedrate"), Ok(10000));
        assert_eq!(params.axis("mirror_axis"), Ok(Axis::X));
        assert_eq!(params.len(), 4);
    }

    #[test]
    fn test_missing_required() {
        assert_eq!(
            bind(&[("repetitions", "3")]),
            Err(ParameterError::Missing("offset".to_string()))
        );
    }

    #[test]
    fn test_zero_repetitions_is_out_of_range() {
        let err = bind(&[("repetitions", "0"), ("offset", "1")]).unwrap_err();
        assert!(matches!(err, ParameterError::OutOfRange { ref name, .. } if name == "repetitions"));

        let err = bind(&[("repetitions", "10001"), ("offset", "1")]).unwrap_err();
        assert!(matches!(err, ParameterError::OutOfRange { .. }));
    }

    #[test]
    fn test_non_numeric_values() {
        let err = bind(&[("repetitions", "three"), ("offset", "1")]).unwrap_err();
        assert!(matches!(err, ParameterError::InvalidValue { .. }));

        let err = bind(&[("repetitions", "2"), ("offset", "abc")]).unwrap_err();
        assert!(matches!(err, ParameterError::InvalidValue { .. }));

        let err = bind(&[("repetitions", "2"), ("offset", "NaN")]).unwrap_err();
        assert!(matches!(err, ParameterError::InvalidValue { .. }));

        let err = bind(&[("repetitions", "2.5"), ("offset", "1")]).unwrap_err();
        assert!(matches!(err, ParameterError::InvalidValue { .. }));
    }

    #[test]
    fn test_negative_feedrate() {
        let err = bind(&[("repetitions", "2"), ("offset", "1"), ("rapid_feedrate", "-5")])
            .unwrap_err();
        assert!(matches!(err, ParameterError::OutOfRange { .. }));
    }

    #[test]
    fn test_axis_parameter() {
        let params = bind(&[("repetitions", "2"), ("offset", "1"), ("mirror_axis", "y")]).unwrap();
        assert_eq!(params.axis("mirror_axis"), Ok(Axis::Y));

        let err = bind(&[("repetitions", "2"), ("offset", "1"), ("mirror_axis", "F")]).unwrap_err();
        assert!(matches!(err, ParameterError::InvalidValue { .. }));
    }

    #[test]
    fn test_unrecognized() {
        let err = bind(&[("repetitions", "2"), ("offset", "1"), ("speed", "9")]).unwrap_err();
        assert_eq!(
            err,
            ParameterError::Unrecognized {
                name: "speed".to_string(),
                mode: "pattern-repeat".to_string()
            }
        );
    }

    #[test]
    fn test_accessor_kind_mismatch() {
        let params = bind(&[("repetitions", "2"), ("offset", "1")]).unwrap();
        assert!(params.decimal("repetitions").is_err());
        assert!(params.count("unknown").is_err());
    }
}
