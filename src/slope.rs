use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::SlopeError;
use crate::narrowphase::ConvexPolygon;
use crate::types::{Edges, Line};

macro_rules! slope_kinds {
    ($($variant:ident = $id:literal => $name:literal,)*) => {
        /// Shape of a sloped tile.
        ///
        /// Numeric ids match the tileset conventions the mapping presets are
        /// written against.
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum SlopeKind {
            $($variant,)*
        }

        impl SlopeKind {
            pub const ALL: &'static [SlopeKind] = &[$(SlopeKind::$variant,)*];

            pub fn id(self) -> i32 {
                match self {
                    $(SlopeKind::$variant => $id,)*
                }
            }

            pub fn name(self) -> &'static str {
                match self {
                    $(SlopeKind::$variant => $name,)*
                }
            }

            pub fn from_id(id: i32) -> Option<SlopeKind> {
                match id {
                    $($id => Some(SlopeKind::$variant),)*
                    _ => None,
                }
            }

            fn from_name(name: &str) -> Option<SlopeKind> {
                match name {
                    $($name => Some(SlopeKind::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

slope_kinds! {
    Full = 0 => "FULL",
    HalfBottomLeft = 1 => "HALF_BOTTOM_LEFT",
    HalfBottomRight = 2 => "HALF_BOTTOM_RIGHT",
    HalfTopLeft = 3 => "HALF_TOP_LEFT",
    HalfTopRight = 4 => "HALF_TOP_RIGHT",
    QuarterBottomLeftLow = 5 => "QUARTER_BOTTOM_LEFT_LOW",
    QuarterBottomLeftHigh = 6 => "QUARTER_BOTTOM_LEFT_HIGH",
    QuarterBottomRightLow = 7 => "QUARTER_BOTTOM_RIGHT_LOW",
    QuarterBottomRightHigh = 8 => "QUARTER_BOTTOM_RIGHT_HIGH",
    QuarterLeftBottomLow = 9 => "QUARTER_LEFT_BOTTOM_LOW",
    QuarterLeftBottomHigh = 10 => "QUARTER_LEFT_BOTTOM_HIGH",
    QuarterRightBottomLow = 11 => "QUARTER_RIGHT_BOTTOM_LOW",
    QuarterRightBottomHigh = 12 => "QUARTER_RIGHT_BOTTOM_HIGH",
    QuarterLeftTopLow = 13 => "QUARTER_LEFT_TOP_LOW",
    QuarterLeftTopHigh = 14 => "QUARTER_LEFT_TOP_HIGH",
    QuarterRightTopLow = 15 => "QUARTER_RIGHT_TOP_LOW",
    QuarterRightTopHigh = 16 => "QUARTER_RIGHT_TOP_HIGH",
    QuarterTopLeftLow = 17 => "QUARTER_TOP_LEFT_LOW",
    QuarterTopLeftHigh = 18 => "QUARTER_TOP_LEFT_HIGH",
    QuarterTopRightLow = 19 => "QUARTER_TOP_RIGHT_LOW",
    QuarterTopRightHigh = 20 => "QUARTER_TOP_RIGHT_HIGH",
    HalfBottom = 21 => "HALF_BOTTOM",
    HalfTop = 22 => "HALF_TOP",
    HalfLeft = 23 => "HALF_LEFT",
    HalfRight = 24 => "HALF_RIGHT",
}

impl fmt::Display for SlopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for SlopeKind {
    type Err = SlopeError;

    /// Accepts a case-insensitive name (`"half_top"`) or a numeric id (`"22"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let found = match trimmed.parse::<i32>() {
            Ok(id) => SlopeKind::from_id(id),
            Err(_) => SlopeKind::from_name(&trimmed.to_ascii_uppercase()),
        };
        found.ok_or_else(|| SlopeError::UnknownSlopeType(s.to_string()))
    }
}

impl Serialize for SlopeKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for SlopeKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Id(i64),
            Name(String),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Id(id) => i32::try_from(id)
                .ok()
                .and_then(SlopeKind::from_id)
                .ok_or_else(|| serde::de::Error::custom(SlopeError::UnknownSlopeType(id.to_string()))),
            Raw::Name(name) => name.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// Anything that names a slope kind: the enum itself, a name or an id.
pub trait IntoSlopeKind {
    fn into_slope_kind(self) -> Result<SlopeKind, SlopeError>;
}

impl IntoSlopeKind for SlopeKind {
    fn into_slope_kind(self) -> Result<SlopeKind, SlopeError> {
        Ok(self)
    }
}

impl IntoSlopeKind for &str {
    fn into_slope_kind(self) -> Result<SlopeKind, SlopeError> {
        self.parse()
    }
}

impl IntoSlopeKind for &String {
    fn into_slope_kind(self) -> Result<SlopeKind, SlopeError> {
        self.parse()
    }
}

impl IntoSlopeKind for i32 {
    fn into_slope_kind(self) -> Result<SlopeKind, SlopeError> {
        SlopeKind::from_id(self).ok_or_else(|| SlopeError::UnknownSlopeType(self.to_string()))
    }
}

/// Slope attached to a single tile.
#[derive(Clone, Debug, PartialEq)]
pub struct TileSlope {
    pub kind: SlopeKind,
    /// Shape in tile-local coordinates.
    pub polygon: ConvexPolygon,
    /// World-space line along the sloped face, if any.
    pub line: Option<Line>,
    pub edges: Edges,
    /// Preferred separation axis for diagonal shapes.
    pub axis: Option<Vec2>,
    /// Name of a solver to use instead of the default one.
    pub solver: Option<String>,
    pub friction: Vec2,
}

impl TileSlope {
    pub fn new(kind: SlopeKind, polygon: ConvexPolygon, line: Option<Line>, edges: Edges, axis: Option<Vec2>) -> Self {
        Self { kind, polygon, line, edges, axis, solver: None, friction: Vec2::ZERO }
    }

    /// Gradient of the representative line; 0 for flat shapes.
    pub fn slope(&self) -> f32 {
        match self.line {
            Some(line) => (line.start.y - line.end.y) / (line.start.x - line.end.x),
            None => 0.0,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.kind.name()
    }
}
