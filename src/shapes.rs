//! Catalogue of tile shapes.
//!
//! Every constructor is a pure function of the tile rectangle. Polygons are
//! expressed in tile-local coordinates, wound clockwise (y down). Representative
//! lines are in world coordinates.

use std::collections::HashMap;

use glam::Vec2;

use crate::narrowphase::ConvexPolygon;
use crate::slope::{SlopeKind, TileSlope};
use crate::types::{EdgeFlag, Edges, Line, TileRect};

/// Builds the slope of one kind for a tile rectangle.
pub type ShapeFn = fn(SlopeKind, &TileRect) -> TileSlope;

const S: EdgeFlag = EdgeFlag::Solid;
const I: EdgeFlag = EdgeFlag::Interesting;

const HALF_DIAG: f32 = std::f32::consts::FRAC_1_SQRT_2;
const QUARTER_SHORT: f32 = 0.447_213_6;
const QUARTER_LONG: f32 = 0.894_427_2;

fn poly(points: &[(f32, f32)]) -> ConvexPolygon {
    ConvexPolygon::new(points.iter().map(|&(x, y)| Vec2::new(x, y)).collect())
}

fn edges(top: EdgeFlag, bottom: EdgeFlag, left: EdgeFlag, right: EdgeFlag) -> Edges {
    Edges { top, bottom, left, right }
}

pub fn full(kind: SlopeKind, r: &TileRect) -> TileSlope {
    TileSlope::new(kind, ConvexPolygon::from_box(r.width(), r.height()), None, Edges::SOLID, None)
}

pub fn half_bottom(kind: SlopeKind, r: &TileRect) -> TileSlope {
    let (w, h) = (r.width(), r.height());
    let p = poly(&[(0.0, h / 2.0), (w, h / 2.0), (w, h), (0.0, h)]);
    let line = Line::new(r.left(), r.top() + h / 2.0, r.right(), r.top() + h / 2.0);
    TileSlope::new(kind, p, Some(line), edges(I, S, I, I), None)
}

pub fn half_top(kind: SlopeKind, r: &TileRect) -> TileSlope {
    let (w, h) = (r.width(), r.height());
    let p = poly(&[(0.0, 0.0), (w, 0.0), (w, h / 2.0), (0.0, h / 2.0)]);
    let line = Line::new(r.left(), r.top(), r.right(), r.top());
    TileSlope::new(kind, p, Some(line), edges(S, I, I, I), None)
}

pub fn half_left(kind: SlopeKind, r: &TileRect) -> TileSlope {
    let (w, h) = (r.width(), r.height());
    let p = poly(&[(0.0, 0.0), (w / 2.0, 0.0), (w / 2.0, h), (0.0, h)]);
    let line = Line::new(r.left() + w / 2.0, r.top(), r.left() + w / 2.0, r.bottom());
    TileSlope::new(kind, p, Some(line), edges(I, I, S, I), None)
}

pub fn half_right(kind: SlopeKind, r: &TileRect) -> TileSlope {
    let (w, h) = (r.width(), r.height());
    let p = poly(&[(w / 2.0, 0.0), (w, 0.0), (w, h), (w / 2.0, h)]);
    let line = Line::new(r.left() + w / 2.0, r.top(), r.left() + w / 2.0, r.bottom());
    TileSlope::new(kind, p, Some(line), edges(I, I, I, S), None)
}

pub fn half_bottom_left(kind: SlopeKind, r: &TileRect) -> TileSlope {
    let (w, h) = (r.width(), r.height());
    let p = poly(&[(0.0, 0.0), (w, h), (0.0, h)]);
    let line = Line::new(r.left(), r.top(), r.right(), r.bottom());
    let axis = Vec2::new(HALF_DIAG, -HALF_DIAG);
    TileSlope::new(kind, p, Some(line), edges(I, S, S, I), Some(axis))
}

pub fn half_bottom_right(kind: SlopeKind, r: &TileRect) -> TileSlope {
    let (w, h) = (r.width(), r.height());
    let p = poly(&[(w, 0.0), (w, h), (0.0, h)]);
    let line = Line::new(r.left(), r.bottom(), r.right(), r.top());
    let axis = Vec2::new(-HALF_DIAG, -HALF_DIAG);
    TileSlope::new(kind, p, Some(line), edges(I, S, I, S), Some(axis))
}

pub fn half_top_left(kind: SlopeKind, r: &TileRect) -> TileSlope {
    let (w, h) = (r.width(), r.height());
    let p = poly(&[(0.0, 0.0), (w, 0.0), (0.0, h)]);
    let line = Line::new(r.right(), r.top(), r.left(), r.bottom());
    let axis = Vec2::new(HALF_DIAG, HALF_DIAG);
    TileSlope::new(kind, p, Some(line), edges(S, I, S, I), Some(axis))
}

pub fn half_top_right(kind: SlopeKind, r: &TileRect) -> TileSlope {
    let (w, h) = (r.width(), r.height());
    let p = poly(&[(0.0, 0.0), (w, 0.0), (w, h)]);
    let line = Line::new(r.right(), r.bottom(), r.left(), r.top());
    let axis = Vec2::new(-HALF_DIAG, HALF_DIAG);
    TileSlope::new(kind, p, Some(line), edges(S, I, I, S), Some(axis))
}

pub fn quarter_bottom_left_low(kind: SlopeKind, r: &TileRect) -> TileSlope {
    let (w, h) = (r.width(), r.height());
    let p = poly(&[(0.0, h / 2.0), (w, h), (0.0, h)]);
    let line = Line::new(r.left(), r.top() + h / 2.0, r.right(), r.bottom());
    let axis = Vec2::new(QUARTER_SHORT, -QUARTER_LONG);
    TileSlope::new(kind, p, Some(line), edges(I, S, I, I), Some(axis))
}

pub fn quarter_bottom_left_high(kind: SlopeKind, r: &TileRect) -> TileSlope {
    let (w, h) = (r.width(), r.height());
    let p = poly(&[(0.0, 0.0), (w, h / 2.0), (w, h), (0.0, h)]);
    let line = Line::new(r.left(), r.top(), r.right(), r.top() + h / 2.0);
    let axis = Vec2::new(QUARTER_SHORT, -QUARTER_LONG);
    TileSlope::new(kind, p, Some(line), edges(I, S, S, I), Some(axis))
}

pub fn quarter_bottom_right_low(kind: SlopeKind, r: &TileRect) -> TileSlope {
    let (w, h) = (r.width(), r.height());
    let p = poly(&[(w, h / 2.0), (w, h), (0.0, h)]);
    let line = Line::new(r.left(), r.bottom(), r.right(), r.top() + h / 2.0);
    let axis = Vec2::new(-QUARTER_SHORT, -QUARTER_LONG);
    TileSlope::new(kind, p, Some(line), edges(I, S, I, I), Some(axis))
}

pub fn quarter_bottom_right_high(kind: SlopeKind, r: &TileRect) -> TileSlope {
    let (w, h) = (r.width(), r.height());
    let p = poly(&[(0.0, h / 2.0), (w, 0.0), (w, h), (0.0, h)]);
    let line = Line::new(r.left(), r.top() + h / 2.0, r.right(), r.top());
    let axis = Vec2::new(-QUARTER_SHORT, -QUARTER_LONG);
    TileSlope::new(kind, p, Some(line), edges(I, S, I, S), Some(axis))
}

pub fn quarter_left_bottom_low(kind: SlopeKind, r: &TileRect) -> TileSlope {
    let (w, h) = (r.width(), r.height());
    let p = poly(&[(0.0, 0.0), (w / 2.0, 0.0), (w, h), (0.0, h)]);
    let line = Line::new(r.left() + w / 2.0, r.top(), r.right(), r.bottom());
    let axis = Vec2::new(QUARTER_LONG, -QUARTER_SHORT);
    TileSlope::new(kind, p, Some(line), edges(I, S, S, I), Some(axis))
}

pub fn quarter_left_bottom_high(kind: SlopeKind, r: &TileRect) -> TileSlope {
    let (w, h) = (r.width(), r.height());
    let p = poly(&[(0.0, 0.0), (w / 2.0, h), (0.0, h)]);
    let line = Line::new(r.left(), r.top(), r.left() + w / 2.0, r.bottom());
    let axis = Vec2::new(QUARTER_LONG, -QUARTER_SHORT);
    TileSlope::new(kind, p, Some(line), edges(I, I, S, I), Some(axis))
}

pub fn quarter_right_bottom_low(kind: SlopeKind, r: &TileRect) -> TileSlope {
    let (w, h) = (r.width(), r.height());
    let p = poly(&[(w / 2.0, 0.0), (w, 0.0), (w, h), (0.0, h)]);
    let line = Line::new(r.left(), r.bottom(), r.left() + w / 2.0, r.top());
    let axis = Vec2::new(-QUARTER_LONG, -QUARTER_SHORT);
    TileSlope::new(kind, p, Some(line), edges(I, S, I, S), Some(axis))
}

pub fn quarter_right_bottom_high(kind: SlopeKind, r: &TileRect) -> TileSlope {
    let (w, h) = (r.width(), r.height());
    let p = poly(&[(w, 0.0), (w, h), (w / 2.0, h)]);
    let line = Line::new(r.left() + w / 2.0, r.bottom(), r.right(), r.top());
    let axis = Vec2::new(-QUARTER_LONG, -QUARTER_SHORT);
    TileSlope::new(kind, p, Some(line), edges(I, I, I, S), Some(axis))
}

pub fn quarter_left_top_low(kind: SlopeKind, r: &TileRect) -> TileSlope {
    let (w, h) = (r.width(), r.height());
    let p = poly(&[(0.0, 0.0), (w / 2.0, 0.0), (0.0, h)]);
    let line = Line::new(r.left(), r.bottom(), r.left() + w / 2.0, r.top());
    let axis = Vec2::new(QUARTER_LONG, QUARTER_SHORT);
    TileSlope::new(kind, p, Some(line), edges(I, I, S, I), Some(axis))
}

pub fn quarter_left_top_high(kind: SlopeKind, r: &TileRect) -> TileSlope {
    let (w, h) = (r.width(), r.height());
    let p = poly(&[(0.0, 0.0), (w, 0.0), (w / 2.0, h), (0.0, h)]);
    let line = Line::new(r.left() + w / 2.0, r.bottom(), r.right(), r.top());
    let axis = Vec2::new(QUARTER_LONG, QUARTER_SHORT);
    TileSlope::new(kind, p, Some(line), edges(S, I, S, I), Some(axis))
}

pub fn quarter_right_top_low(kind: SlopeKind, r: &TileRect) -> TileSlope {
    let (w, h) = (r.width(), r.height());
    let p = poly(&[(w / 2.0, 0.0), (w, 0.0), (w, h)]);
    let line = Line::new(r.left() + w / 2.0, r.top(), r.right(), r.bottom());
    let axis = Vec2::new(-QUARTER_LONG, QUARTER_SHORT);
    TileSlope::new(kind, p, Some(line), edges(I, I, S, I), Some(axis))
}

pub fn quarter_right_top_high(kind: SlopeKind, r: &TileRect) -> TileSlope {
    let (w, h) = (r.width(), r.height());
    let p = poly(&[(0.0, 0.0), (w, 0.0), (w, h), (w / 2.0, h)]);
    let line = Line::new(r.left(), r.top(), r.left() + w / 2.0, r.bottom());
    let axis = Vec2::new(-QUARTER_LONG, QUARTER_SHORT);
    TileSlope::new(kind, p, Some(line), edges(S, I, S, I), Some(axis))
}

pub fn quarter_top_left_low(kind: SlopeKind, r: &TileRect) -> TileSlope {
    let (w, h) = (r.width(), r.height());
    let p = poly(&[(0.0, 0.0), (w, 0.0), (0.0, h / 2.0)]);
    let line = Line::new(r.left(), r.top() + h / 2.0, r.right(), r.top());
    let axis = Vec2::new(QUARTER_SHORT, QUARTER_LONG);
    TileSlope::new(kind, p, Some(line), edges(S, I, I, I), Some(axis))
}

pub fn quarter_top_left_high(kind: SlopeKind, r: &TileRect) -> TileSlope {
    let (w, h) = (r.width(), r.height());
    let p = poly(&[(0.0, 0.0), (w, 0.0), (w, h / 2.0), (0.0, h)]);
    let line = Line::new(r.left(), r.bottom(), r.right(), r.top() + h / 2.0);
    let axis = Vec2::new(QUARTER_SHORT, QUARTER_LONG);
    TileSlope::new(kind, p, Some(line), edges(S, I, S, I), Some(axis))
}

pub fn quarter_top_right_low(kind: SlopeKind, r: &TileRect) -> TileSlope {
    let (w, h) = (r.width(), r.height());
    let p = poly(&[(0.0, 0.0), (w, 0.0), (w, h / 2.0)]);
    let line = Line::new(r.left(), r.top(), r.right(), r.top() + h / 2.0);
    let axis = Vec2::new(-QUARTER_SHORT, QUARTER_LONG);
    TileSlope::new(kind, p, Some(line), edges(S, I, I, I), Some(axis))
}

pub fn quarter_top_right_high(kind: SlopeKind, r: &TileRect) -> TileSlope {
    let (w, h) = (r.width(), r.height());
    let p = poly(&[(0.0, 0.0), (w, 0.0), (w, h), (0.0, h / 2.0)]);
    let line = Line::new(r.left(), r.top() + h / 2.0, r.right(), r.bottom());
    let axis = Vec2::new(-QUARTER_SHORT, QUARTER_LONG);
    TileSlope::new(kind, p, Some(line), edges(S, I, I, S), Some(axis))
}

/// Immutable mapping from slope kind to constructor.
#[derive(Clone, Debug)]
pub struct ShapeRegistry {
    definitions: HashMap<SlopeKind, ShapeFn>,
}

impl Default for ShapeRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl ShapeRegistry {
    pub fn empty() -> Self {
        Self { definitions: HashMap::new() }
    }

    /// Registry holding every built-in shape.
    pub fn standard() -> Self {
        use SlopeKind::*;
        let table: [(SlopeKind, ShapeFn); 25] = [
            (Full, full),
            (HalfBottom, half_bottom),
            (HalfTop, half_top),
            (HalfLeft, half_left),
            (HalfRight, half_right),
            (HalfBottomLeft, half_bottom_left),
            (HalfBottomRight, half_bottom_right),
            (HalfTopLeft, half_top_left),
            (HalfTopRight, half_top_right),
            (QuarterBottomLeftLow, quarter_bottom_left_low),
            (QuarterBottomLeftHigh, quarter_bottom_left_high),
            (QuarterBottomRightLow, quarter_bottom_right_low),
            (QuarterBottomRightHigh, quarter_bottom_right_high),
            (QuarterLeftBottomLow, quarter_left_bottom_low),
            (QuarterLeftBottomHigh, quarter_left_bottom_high),
            (QuarterRightBottomLow, quarter_right_bottom_low),
            (QuarterRightBottomHigh, quarter_right_bottom_high),
            (QuarterLeftTopLow, quarter_left_top_low),
            (QuarterLeftTopHigh, quarter_left_top_high),
            (QuarterRightTopLow, quarter_right_top_low),
            (QuarterRightTopHigh, quarter_right_top_high),
            (QuarterTopLeftLow, quarter_top_left_low),
            (QuarterTopLeftHigh, quarter_top_left_high),
            (QuarterTopRightLow, quarter_top_right_low),
            (QuarterTopRightHigh, quarter_top_right_high),
        ];
        Self { definitions: table.into_iter().collect() }
    }

    /// Returns a registry with `kind` built by `definition` instead.
    pub fn with(mut self, kind: SlopeKind, definition: ShapeFn) -> Self {
        self.insert(kind, definition);
        self
    }

    pub fn insert(&mut self, kind: SlopeKind, definition: ShapeFn) {
        self.definitions.insert(kind, definition);
    }

    pub fn get(&self, kind: SlopeKind) -> Option<ShapeFn> {
        self.definitions.get(&kind).copied()
    }

    pub fn contains(&self, kind: SlopeKind) -> bool {
        self.definitions.contains_key(&kind)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
