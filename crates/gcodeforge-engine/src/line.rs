//! Line classification and axis field parsing
//!
//! A line is classified from its trimmed text into one of four kinds:
//! - Blank
//! - Marker (a fixed token such as `M3`, `Z0`, `F10000`, or a comment)
//! - Motion (carries at least one X/Y/Z/B field)
//! - Opaque (anything else; never rewritten)
//!
//! Marker tokens are checked first, so `Z0` and `X0` on their own are markers
//! rather than motion.

use gcodeforge_core::Axis;
use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;

fn field_regex() -> &'static Regex {
    static FIELD_REGEX: OnceLock<Regex> = OnceLock::new();
    FIELD_REGEX.get_or_init(|| Regex::new(r"([XYZBF])([-+]?[0-9.]+)").expect("invalid regex pattern"))
}

fn number_regex() -> &'static Regex {
    static NUMBER_REGEX: OnceLock<Regex> = OnceLock::new();
    NUMBER_REGEX
        .get_or_init(|| Regex::new(r"^[-+]?[0-9]+(\.[0-9]+)?$").expect("invalid regex pattern"))
}

fn feed_marker_regex() -> &'static Regex {
    static FEED_MARKER_REGEX: OnceLock<Regex> = OnceLock::new();
    FEED_MARKER_REGEX.get_or_init(|| Regex::new(r"^F[0-9]+$").expect("invalid regex pattern"))
}

/// Parse a decimal in the strict field grammar: optional sign, digits, and at
/// most one fractional part. Returns `None` for anything else.
pub fn parse_number(text: &str) -> Option<f64> {
    if number_regex().is_match(text) {
        text.parse::<f64>().ok()
    } else {
        None
    }
}

/// Fixed marker tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// `M3`
    SpindleStart,
    /// `M5`
    SpindleStop,
    /// `M30`
    ProgramEnd,
    /// `Z0` on its own
    ZeroZ,
    /// `X0` on its own
    ZeroX,
    /// `F` followed only by digits
    Feed,
    /// A line starting with `%`, `;`, or `(`
    Comment,
}

impl Marker {
    /// Recognize a marker from trimmed text.
    pub fn from_trimmed(trimmed: &str) -> Option<Self> {
        match trimmed {
            "M3" => Some(Self::SpindleStart),
            "M5" => Some(Self::SpindleStop),
            "M30" => Some(Self::ProgramEnd),
            "Z0" => Some(Self::ZeroZ),
            "X0" => Some(Self::ZeroX),
            _ if trimmed.starts_with(['%', ';', '(']) => Some(Self::Comment),
            _ if feed_marker_regex().is_match(trimmed) => Some(Self::Feed),
            _ => None,
        }
    }
}

/// Classification of one line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Empty after trimming
    Blank,
    /// One of the fixed marker tokens
    Marker(Marker),
    /// Carries at least one coordinate field
    Motion,
    /// Passed through untouched by every rule
    Opaque,
}

/// One `<letter><number>` occurrence on a line
#[derive(Debug, Clone, PartialEq)]
pub struct AxisField {
    /// Field letter
    pub axis: Axis,
    /// Byte range of the whole field (letter and number) within the line
    pub span: Range<usize>,
    /// Parsed value, or `None` when the number text is malformed
    pub value: Option<f64>,
}

impl AxisField {
    /// The number text as written, without the letter.
    pub fn number_text<'a>(&self, line: &'a str) -> &'a str {
        &line[self.span.start + 1..self.span.end]
    }

    /// The whole field as written, e.g. `Y-3.25`.
    pub fn raw<'a>(&self, line: &'a str) -> &'a str {
        &line[self.span.clone()]
    }
}

/// Find every axis field on a line, in order of appearance.
pub fn parse_fields(text: &str) -> Vec<AxisField> {
    field_regex()
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let letter = caps.get(1)?.as_str().chars().next()?;
            let axis = Axis::from_letter(letter)?;
            let value = parse_number(caps.get(2)?.as_str());
            Some(AxisField {
                axis,
                span: whole.range(),
                value,
            })
        })
        .collect()
}

/// Classify a line. Leading and trailing whitespace is ignored.
pub fn classify(text: &str) -> LineKind {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return LineKind::Blank;
    }
    if let Some(marker) = Marker::from_trimmed(trimmed) {
        return LineKind::Marker(marker);
    }
    if parse_fields(trimmed).iter().any(|f| f.axis.is_coordinate()) {
        LineKind::Motion
    } else {
        LineKind::Opaque
    }
}

/// A classified view of one line
///
/// Derived from text on demand; nothing about it is stored between stages.
/// Fields are only parsed for motion lines.
#[derive(Debug, Clone)]
pub struct Line<'a> {
    text: &'a str,
    kind: LineKind,
    fields: Vec<AxisField>,
}

impl<'a> Line<'a> {
    /// Classify `text` and, for motion lines, parse its fields.
    pub fn parse(text: &'a str) -> Self {
        let kind = classify(text);
        let fields = if kind == LineKind::Motion {
            parse_fields(text)
        } else {
            Vec::new()
        };
        Self { text, kind, fields }
    }

    /// The raw text.
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// The trimmed text.
    pub fn trimmed(&self) -> &'a str {
        self.text.trim()
    }

    /// The classification.
    pub fn kind(&self) -> LineKind {
        self.kind
    }

    /// Whether this is a motion line.
    pub fn is_motion(&self) -> bool {
        self.kind == LineKind::Motion
    }

    /// Whether this line is blank.
    pub fn is_blank(&self) -> bool {
        self.kind == LineKind::Blank
    }

    /// The marker, if this line is one.
    pub fn marker(&self) -> Option<Marker> {
        match self.kind {
            LineKind::Marker(marker) => Some(marker),
            _ => None,
        }
    }

    /// All fields in order of appearance (empty unless motion).
    pub fn fields(&self) -> &[AxisField] {
        &self.fields
    }

    /// The first occurrence of `axis`.
    pub fn field(&self, axis: Axis) -> Option<&AxisField> {
        self.fields.iter().find(|f| f.axis == axis)
    }

    /// Whether the line carries `axis`.
    pub fn has(&self, axis: Axis) -> bool {
        self.field(axis).is_some()
    }

    /// Parsed value of the first occurrence of `axis`.
    pub fn value(&self, axis: Axis) -> Option<f64> {
        self.field(axis).and_then(|f| f.value)
    }

    /// The field that opens the line, if the first token is a field.
    pub fn leading_field(&self) -> Option<&AxisField> {
        let offset = self.text.len() - self.text.trim_start().len();
        self.fields.first().filter(|f| f.span.start == offset)
    }
}

/// Replace byte ranges of `text`, which must be sorted and non-overlapping.
pub(crate) fn splice(text: &str, edits: &[(Range<usize>, String)]) -> String {
    let mut result = String::with_capacity(text.len() + 16);
    let mut cursor = 0;
    for (range, replacement) in edits {
        result.push_str(&text[cursor..range.start]);
        result.push_str(replacement);
        cursor = range.end;
    }
    result.push_str(&text[cursor..]);
    result
}
