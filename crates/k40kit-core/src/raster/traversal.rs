//! Raster scan direction flags.

use crate::error::PropertyError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Scan traversal bit-flags: major axis, start corner and return mode.
///
/// The zero-valued flags (`X_AXIS`, `TOP`, `LEFT`) name the defaults and
/// cannot be tested with [`Traversal::contains`]; use the predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Traversal(u8);

impl Traversal {
    pub const X_AXIS: Self = Self(0);
    pub const TOP: Self = Self(0);
    pub const LEFT: Self = Self(0);
    pub const Y_AXIS: Self = Self(1);
    pub const BOTTOM: Self = Self(2);
    pub const RIGHT: Self = Self(4);
    pub const UNIDIRECTIONAL: Self = Self(8);

    const MASK: u8 = 0x0f;

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Build from raw bits, dropping unknown ones.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::MASK)
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Flags for a raster direction setting.
    pub fn from_direction(direction: RasterDirection, unidirectional: bool) -> Self {
        let base = match direction {
            RasterDirection::TopToBottom => Self::X_AXIS | Self::TOP,
            RasterDirection::BottomToTop => Self::X_AXIS | Self::BOTTOM,
            RasterDirection::RightToLeft => Self::Y_AXIS | Self::RIGHT,
            RasterDirection::LeftToRight => Self::Y_AXIS | Self::LEFT,
        };
        if unidirectional {
            base | Self::UNIDIRECTIONAL
        } else {
            base
        }
    }

    /// Scan lines run along Y.
    pub const fn is_y_major(self) -> bool {
        self.contains(Self::Y_AXIS)
    }

    pub const fn starts_bottom(self) -> bool {
        self.contains(Self::BOTTOM)
    }

    pub const fn starts_right(self) -> bool {
        self.contains(Self::RIGHT)
    }

    pub const fn is_unidirectional(self) -> bool {
        self.contains(Self::UNIDIRECTIONAL)
    }

    /// Direction tuple announced to the interpreter before scanning.
    pub fn direction(self) -> ScanDirection {
        ScanDirection {
            top: self.starts_bottom(),
            left: self.starts_right(),
            x_major: !self.is_y_major(),
            y_major: self.is_y_major(),
        }
    }
}

impl BitOr for Traversal {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Traversal {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Head direction flags carried by `SetDirection`.
///
/// `top` means the head travels toward the top of the bed, `left` that it
/// travels toward the left edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ScanDirection {
    pub top: bool,
    pub left: bool,
    pub x_major: bool,
    pub y_major: bool,
}

/// Raster direction setting of a raster operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum RasterDirection {
    #[default]
    TopToBottom,
    BottomToTop,
    RightToLeft,
    LeftToRight,
}

impl RasterDirection {
    pub fn index(self) -> i64 {
        match self {
            Self::TopToBottom => 0,
            Self::BottomToTop => 1,
            Self::RightToLeft => 2,
            Self::LeftToRight => 3,
        }
    }
}

impl TryFrom<i64> for RasterDirection {
    type Error = PropertyError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::TopToBottom),
            1 => Ok(Self::BottomToTop),
            2 => Ok(Self::RightToLeft),
            3 => Ok(Self::LeftToRight),
            other => Err(PropertyError::OutOfRange {
                key: "raster_direction".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

impl From<RasterDirection> for i64 {
    fn from(direction: RasterDirection) -> Self {
        direction.index()
    }
}

impl fmt::Display for RasterDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_flags() {
        let t = Traversal::from_direction(RasterDirection::TopToBottom, false);
        assert_eq!(t.bits(), 0);
        assert!(!t.is_y_major() && !t.starts_bottom());

        let t = Traversal::from_direction(RasterDirection::BottomToTop, false);
        assert_eq!(t, Traversal::BOTTOM);

        let t = Traversal::from_direction(RasterDirection::RightToLeft, false);
        assert_eq!(t.bits(), 5);
        assert!(t.is_y_major() && t.starts_right());

        let t = Traversal::from_direction(RasterDirection::LeftToRight, true);
        assert_eq!(t.bits(), 9);
        assert!(t.is_unidirectional() && !t.starts_right());
    }

    #[test]
    fn test_direction_tuple() {
        let dir = Traversal::from_direction(RasterDirection::BottomToTop, false).direction();
        assert_eq!(
            dir,
            ScanDirection {
                top: true,
                left: false,
                x_major: true,
                y_major: false
            }
        );
    }

    #[test]
    fn test_raster_direction_conversion() {
        assert_eq!(RasterDirection::try_from(2), Ok(RasterDirection::RightToLeft));
        assert!(RasterDirection::try_from(4).is_err());
        assert!(RasterDirection::try_from(-1).is_err());
        assert_eq!(serde_json::to_string(&RasterDirection::LeftToRight).unwrap(), "3");
    }

    #[test]
    fn test_from_bits_masks_unknown() {
        assert_eq!(Traversal::from_bits(0xf5).bits(), 5);
    }
}
