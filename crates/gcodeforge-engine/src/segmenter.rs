//! Header / body / footer segmentation
//!
//! The header ends at a mode-specific boundary. The footer is everything after
//! the last motion line, which in practice is the `Z0` / `X0` / `M5` / `M30`
//! shutdown sequence. The body is what lies between; its blank lines are
//! dropped and its lines are trimmed.

use gcodeforge_core::{Axis, Program, StructuralError};
use serde::{Deserialize, Serialize};

use super::line::Line;

/// Where the header stops
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderBoundary {
    /// The header runs through the first line equal to this marker (inclusive)
    Marker(String),
    /// The header stops before the first motion line carrying both X and Y,
    /// optionally required to open with a given axis
    FirstMotion {
        /// Axis the line must start with, if any
        leading: Option<Axis>,
    },
}

impl HeaderBoundary {
    /// The spindle-start boundary (`M3`, inclusive)
    pub fn spindle_start() -> Self {
        Self::Marker("M3".to_string())
    }

    fn starts_body(&self, line: &Line<'_>) -> bool {
        match self {
            Self::Marker(_) => false,
            Self::FirstMotion { leading } => {
                line.is_motion()
                    && line.has(Axis::X)
                    && line.has(Axis::Y)
                    && leading.is_none_or(|axis| {
                        line.leading_field().map(|f| f.axis) == Some(axis)
                    })
            }
        }
    }
}

/// A program split into its three segments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segments {
    /// Setup lines, verbatim
    pub header: Program,
    /// Repeatable lines: trimmed, no blanks
    pub body: Program,
    /// Shutdown lines, verbatim
    pub footer: Program,
}

impl Segments {
    /// Trim header and footer lines and drop their blank lines.
    pub fn compacted(self) -> Self {
        let compact = |program: Program| -> Program {
            program
                .into_iter()
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty())
                .collect()
        };
        Self {
            header: compact(self.header),
            body: self.body,
            footer: compact(self.footer),
        }
    }
}

/// Splits programs at a fixed header boundary
#[derive(Debug, Clone)]
pub struct Segmenter {
    boundary: HeaderBoundary,
}

impl Segmenter {
    /// Create a segmenter for `boundary`
    pub fn new(boundary: HeaderBoundary) -> Self {
        Self { boundary }
    }

    /// The configured boundary
    pub fn boundary(&self) -> &HeaderBoundary {
        &self.boundary
    }

    /// Split `program` into header, body, and footer.
    ///
    /// # Errors
    /// - `MissingHeaderMarker` when a marker boundary never appears
    /// - `EmptyPattern` when no motion line follows the header
    pub fn segment(&self, program: &Program) -> Result<Segments, StructuralError> {
        let lines = program.lines();
        let header_end = self.header_end(lines)?;

        let last_motion = lines[header_end..]
            .iter()
            .rposition(|l| Line::parse(l).is_motion())
            .map(|i| header_end + i)
            .ok_or(StructuralError::EmptyPattern)?;

        let header = Program::new(lines[..header_end].to_vec());
        let body: Program = lines[header_end..=last_motion]
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();
        let footer = Program::new(lines[last_motion + 1..].to_vec());

        tracing::debug!(
            header = header.len(),
            body = body.len(),
            footer = footer.len(),
            "segmented program"
        );

        Ok(Segments {
            header,
            body,
            footer,
        })
    }

    fn header_end(&self, lines: &[String]) -> Result<usize, StructuralError> {
        match &self.boundary {
            HeaderBoundary::Marker(marker) => lines
                .iter()
                .position(|l| l.trim() == marker)
                .map(|i| i + 1)
                .ok_or_else(|| StructuralError::MissingHeaderMarker {
                    marker: marker.clone(),
                }),
            HeaderBoundary::FirstMotion { .. } => lines
                .iter()
                .position(|l| self.boundary.starts_body(&Line::parse(l)))
                .ok_or(StructuralError::EmptyPattern),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROGRAM: &str = "% 0 Holes\n\nG1 F10000\nM3\n\nF10000\nZ0\nX0.000000 Y2.000000\nF1500\n\nZ4 X0.000000 Y2.000000\nZ4 X0.103710 Y1.997356\n\nZ0\nX0\n\nM5\nM30";

    #[test]
    fn test_spindle_start_boundary() {
        let segments = Segmenter::new(HeaderBoundary::spindle_start())
            .segment(&Program::from_text(PROGRAM))
            .unwrap();

        assert_eq!(
            segments.header.lines(),
            &["% 0 Holes", "", "G1 F10000", "M3"]
        );
        assert_eq!(
            segments.body.lines(),
            &[
                "F10000",
                "Z0",
                "X0.000000 Y2.000000",
                "F1500",
                "Z4 X0.000000 Y2.000000",
                "Z4 X0.103710 Y1.997356"
            ]
        );
        assert_eq!(segments.footer.lines(), &["", "Z0", "X0", "", "M5", "M30"]);
    }

    #[test]
    fn test_first_motion_boundary_with_leading_axis() {
        let segments = Segmenter::new(HeaderBoundary::FirstMotion {
            leading: Some(Axis::Z),
        })
        .segment(&Program::from_text(PROGRAM))
        .unwrap();

        assert_eq!(segments.header.len(), 10);
        assert_eq!(segments.header.lines()[7], "X0.000000 Y2.000000");
        assert_eq!(
            segments.body.lines(),
            &["Z4 X0.000000 Y2.000000", "Z4 X0.103710 Y1.997356"]
        );
    }

    #[test]
    fn test_first_motion_boundary_without_leading_axis() {
        let segments = Segmenter::new(HeaderBoundary::FirstMotion { leading: None })
            .segment(&Program::from_text(PROGRAM))
            .unwrap();
        assert_eq!(segments.body.lines()[0], "X0.000000 Y2.000000");
    }

    #[test]
    fn test_missing_marker() {
        let err = Segmenter::new(HeaderBoundary::spindle_start())
            .segment(&Program::from_text("G1 F10000\nX1 Y2\nM5"))
            .unwrap_err();
        assert_eq!(
            err,
            StructuralError::MissingHeaderMarker {
                marker: "M3".to_string()
            }
        );
    }

    #[test]
    fn test_empty_pattern() {
        let err = Segmenter::new(HeaderBoundary::spindle_start())
            .segment(&Program::from_text("G1 F10000\nM3\n\nZ0\nX0\nM5\nM30"))
            .unwrap_err();
        assert_eq!(err, StructuralError::EmptyPattern);

        let err = Segmenter::new(HeaderBoundary::FirstMotion {
            leading: Some(Axis::Z),
        })
        .segment(&Program::from_text("M3\nX1 Y2\nM5"))
        .unwrap_err();
        assert_eq!(err, StructuralError::EmptyPattern);
    }

    #[test]
    fn test_compacted() {
        let segments = Segmenter::new(HeaderBoundary::spindle_start())
            .segment(&Program::from_text(PROGRAM))
            .unwrap()
            .compacted();
        assert_eq!(segments.header.lines(), &["% 0 Holes", "G1 F10000", "M3"]);
        assert_eq!(segments.footer.lines(), &["Z0", "X0", "M5", "M30"]);
    }
}
