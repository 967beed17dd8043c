//! Conversion mode identifiers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A named conversion recipe
///
/// The recipe itself (rules, segmentation, repetition) lives in the engine;
/// this type is only the stable identifier shared with settings and the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConversionMode {
    /// Drop `Z0`, lift `Z4` by the last Y, swap X/Y, then zero X
    AxisRemap,
    /// Remap the pattern block and repeat it along Y
    PatternRepeat,
    /// Rewrite feeds and repeat the block with a growing B value
    TwoAxis,
    /// Mirror one axis and repeat the block along X
    MirrorRepeat,
}

impl ConversionMode {
    /// Every built-in mode.
    pub const ALL: [ConversionMode; 4] = [
        ConversionMode::AxisRemap,
        ConversionMode::PatternRepeat,
        ConversionMode::TwoAxis,
        ConversionMode::MirrorRepeat,
    ];

    /// Stable identifier used on the command line and in config files.
    pub fn id(self) -> &'static str {
        match self {
            Self::AxisRemap => "axis-remap",
            Self::PatternRepeat => "pattern-repeat",
            Self::TwoAxis => "two-axis",
            Self::MirrorRepeat => "mirror-repeat",
        }
    }

    /// Human-readable title.
    pub fn title(self) -> &'static str {
        match self {
            Self::AxisRemap => "Axis Remap",
            Self::PatternRepeat => "Pattern Repeater",
            Self::TwoAxis => "Two-Axis Converter",
            Self::MirrorRepeat => "Mirror Repeater",
        }
    }
}

impl fmt::Display for ConversionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for ConversionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|mode| mode.id() == wanted)
            .ok_or_else(|| format!("Unknown conversion mode: {}", s))
    }
}
