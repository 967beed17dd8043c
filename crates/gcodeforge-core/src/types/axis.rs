//! Axis letters recognized on a G-code line

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A field letter that carries a numeric value
///
/// `F` is included because feed commands share the `<letter><number>` shape,
/// but it is not a coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Axis {
    /// Linear X axis
    X,
    /// Linear Y axis
    Y,
    /// Linear Z axis
    Z,
    /// Rotary B axis
    B,
    /// Feed rate
    F,
}

impl Axis {
    /// All field letters, in the order they are usually written.
    pub const ALL: [Axis; 5] = [Axis::X, Axis::Y, Axis::Z, Axis::B, Axis::F];

    /// The letter that introduces this field.
    pub fn letter(self) -> char {
        match self {
            Self::X => 'X',
            Self::Y => 'Y',
            Self::Z => 'Z',
            Self::B => 'B',
            Self::F => 'F',
        }
    }

    /// Map an upper-case field letter back to its axis.
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'X' => Some(Self::X),
            'Y' => Some(Self::Y),
            'Z' => Some(Self::Z),
            'B' => Some(Self::B),
            'F' => Some(Self::F),
            _ => None,
        }
    }

    /// Whether this field is a machine coordinate (everything except `F`).
    pub fn is_coordinate(self) -> bool {
        !matches!(self, Self::F)
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl FromStr for Axis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_letter(c.to_ascii_uppercase())
                .ok_or_else(|| format!("Unknown axis letter: {}", s)),
            _ => Err(format!("Unknown axis letter: {}", s)),
        }
    }
}
