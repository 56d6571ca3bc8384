//! Seam suppression for adjacent sloped tiles.
//!
//! A body crossing the boundary between two slopes that form a continuous
//! surface can still overlap the internal vertex between them. The rules here
//! recognise those overlaps from the tile's kind, a neighbour's kind and the
//! overlap normal, and either drop the separation or redirect it onto the
//! tile's preferred axis.

use std::collections::HashMap;
use std::str::FromStr;

use glam::Vec2;
use log::warn;

use crate::api::Restrainer;
use crate::body::Body;
use crate::error::SlopeError;
use crate::slope::SlopeKind;
use crate::solver::SatSolver;
use crate::tilemap::{Tile, TileLayer};
use crate::types::{Neighbour, Response};

/// Condition on one component of the overlap normal.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Match {
    Any,
    Exact(f32),
    /// Inclusive range.
    Between(f32, f32),
}

impl Match {
    pub fn matches(self, value: f32) -> bool {
        match self {
            Match::Any => true,
            Match::Exact(v) => value == v,
            Match::Between(lo, hi) => value >= lo && value <= hi,
        }
    }
}

/// What to do once a rule matches.
#[derive(Copy, Clone, Debug)]
pub enum Separate {
    /// Separate along the tile's preferred axis.
    Always,
    /// Drop the collision.
    Never,
    /// Decide from the body and tile positions.
    When(fn(&Body, &Tile) -> bool),
}

impl Separate {
    pub fn resolve(self, body: &Body, tile: &Tile) -> bool {
        match self {
            Separate::Always => true,
            Separate::Never => false,
            Separate::When(predicate) => predicate(body, tile),
        }
    }
}

/// Shorthand for the overlap normal of a blocked movement.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Normal conditions as (x, y).
    pub fn resolve_overlaps(self) -> (Match, Match) {
        match self {
            Direction::Up => (Match::Exact(0.0), Match::Between(-1.0, 0.0)),
            Direction::Down => (Match::Exact(0.0), Match::Between(0.0, 1.0)),
            Direction::Left => (Match::Between(-1.0, 0.0), Match::Exact(0.0)),
            Direction::Right => (Match::Between(0.0, 1.0), Match::Exact(0.0)),
        }
    }
}

impl FromStr for Direction {
    type Err = SlopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(SlopeError::UnknownDirection(s.to_string())),
        }
    }
}

/// A point on the tile boundary.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum VertexLocation {
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl FromStr for VertexLocation {
    type Err = SlopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s.chars().filter(|c| *c != '_' && *c != '-').collect::<String>().to_ascii_lowercase();
        match normalized.as_str() {
            "top" => Ok(VertexLocation::Top),
            "bottom" => Ok(VertexLocation::Bottom),
            "left" => Ok(VertexLocation::Left),
            "right" => Ok(VertexLocation::Right),
            "topleft" => Ok(VertexLocation::TopLeft),
            "topright" => Ok(VertexLocation::TopRight),
            "bottomleft" => Ok(VertexLocation::BottomLeft),
            "bottomright" => Ok(VertexLocation::BottomRight),
            _ => Err(SlopeError::UnknownVertexLocation(s.to_string())),
        }
    }
}

impl VertexLocation {
    /// Kinds with a polygon vertex at this location.
    pub fn kinds(self) -> &'static [SlopeKind] {
        use SlopeKind::*;
        match self {
            VertexLocation::Top => &[
                HalfLeft, HalfRight, QuarterLeftTopLow, QuarterRightTopLow, QuarterLeftBottomLow,
                QuarterRightBottomLow,
            ],
            VertexLocation::Bottom => &[
                HalfLeft, HalfRight, QuarterLeftTopHigh, QuarterLeftBottomHigh, QuarterRightTopHigh,
                QuarterRightBottomHigh,
            ],
            VertexLocation::Left => &[
                HalfTop, HalfBottom, QuarterTopLeftLow, QuarterTopRightHigh, QuarterBottomLeftLow,
                QuarterBottomRightHigh,
            ],
            VertexLocation::Right => &[
                HalfTop, HalfBottom, QuarterTopLeftHigh, QuarterTopRightLow, QuarterBottomLeftHigh,
                QuarterBottomRightLow,
            ],
            VertexLocation::TopLeft => &[
                Full, HalfTop, HalfLeft, HalfTopLeft, HalfTopRight, HalfBottomLeft, QuarterTopLeftLow,
                QuarterTopLeftHigh, QuarterTopRightHigh, QuarterBottomLeftHigh, QuarterLeftTopLow,
                QuarterLeftTopHigh, QuarterLeftBottomLow, QuarterLeftBottomHigh, QuarterRightTopHigh,
            ],
            VertexLocation::TopRight => &[
                Full, HalfTop, HalfRight, HalfTopLeft, HalfTopRight, HalfBottomRight, QuarterTopLeftLow,
                QuarterTopLeftHigh, QuarterTopRightLow, QuarterTopRightHigh, QuarterBottomRightHigh,
                QuarterLeftTopHigh, QuarterRightTopLow, QuarterRightTopHigh, QuarterRightBottomLow,
                QuarterRightBottomHigh,
            ],
            VertexLocation::BottomLeft => &[
                Full, HalfLeft, HalfBottom, HalfTopLeft, HalfBottomLeft, HalfBottomRight, QuarterTopLeftHigh,
                QuarterBottomLeftLow, QuarterBottomLeftHigh, QuarterBottomRightLow, QuarterBottomRightHigh,
                QuarterLeftTopHigh, QuarterLeftBottomLow, QuarterLeftBottomHigh, QuarterRightBottomLow,
            ],
            VertexLocation::BottomRight => &[
                Full, HalfRight, HalfBottom, HalfTopRight, HalfBottomLeft, HalfBottomRight, QuarterTopRightHigh,
                QuarterBottomLeftLow, QuarterBottomLeftHigh, QuarterBottomRightLow, QuarterBottomRightHigh,
                QuarterLeftBottomLow, QuarterRightTopHigh, QuarterRightBottomLow, QuarterRightBottomHigh,
            ],
        }
    }
}

/// Kinds with a vertex at every one of `locations`, in the order of the
/// first list. An empty running intersection restarts from the next list.
pub fn resolve(locations: &[VertexLocation]) -> Vec<SlopeKind> {
    if let [single] = locations {
        return single.kinds().to_vec();
    }
    let mut kinds: Vec<SlopeKind> = Vec::new();
    for location in locations {
        let map = location.kinds();
        if kinds.is_empty() {
            kinds = map.to_vec();
        } else {
            kinds.retain(|k| map.contains(k));
        }
    }
    kinds
}

/// Like [`resolve`] from location names, skipping unknown ones with a warning.
pub fn resolve_names(names: &[&str]) -> Vec<SlopeKind> {
    let locations: Vec<VertexLocation> = names
        .iter()
        .filter_map(|name| match name.parse() {
            Ok(location) => Some(location),
            Err(err) => {
                warn!("{err}");
                None
            }
        })
        .collect();
    resolve(&locations)
}

/// One entry of a kind's rule list.
#[derive(Clone, Debug)]
pub struct RestraintRule {
    pub neighbour: Neighbour,
    pub overlap_x: Match,
    pub overlap_y: Match,
    /// Neighbour kinds that trigger the rule; `None` means the tile's own kind.
    pub types: Option<Vec<SlopeKind>>,
    pub separate: Separate,
}

impl RestraintRule {
    pub fn new(direction: Direction, neighbour: Neighbour) -> Self {
        let (overlap_x, overlap_y) = direction.resolve_overlaps();
        Self { neighbour, overlap_x, overlap_y, types: None, separate: Separate::Always }
    }

    /// Rule from a direction name; unknown names are logged and skipped.
    pub fn parse(direction: &str, neighbour: Neighbour) -> Option<Self> {
        match direction.parse::<Direction>() {
            Ok(direction) => Some(Self::new(direction, neighbour)),
            Err(err) => {
                warn!("{err}");
                None
            }
        }
    }

    pub fn with_types(mut self, types: Vec<SlopeKind>) -> Self {
        self.types = Some(types);
        self
    }

    pub fn at(self, locations: &[VertexLocation]) -> Self {
        self.with_types(resolve(locations))
    }

    pub fn separate(mut self, separate: Separate) -> Self {
        self.separate = separate;
        self
    }

    pub fn matches(&self, subject: SlopeKind, neighbour: SlopeKind, normal: Vec2) -> bool {
        let kind_matches = match &self.types {
            Some(types) => types.contains(&neighbour),
            None => neighbour == subject,
        };
        kind_matches && self.overlap_x.matches(normal.x) && self.overlap_y.matches(normal.y)
    }
}

/// Rule tables keyed by the colliding tile's kind.
#[derive(Clone, Debug)]
pub struct SatRestrainer {
    rules: HashMap<SlopeKind, Vec<RestraintRule>>,
}

impl Default for SatRestrainer {
    fn default() -> Self {
        Self { rules: default_rules() }
    }
}

impl SatRestrainer {
    pub fn empty() -> Self {
        Self { rules: HashMap::new() }
    }

    pub fn rules(&self, kind: SlopeKind) -> &[RestraintRule] {
        self.rules.get(&kind).map_or(&[], Vec::as_slice)
    }

    pub fn set_rules(&mut self, kind: SlopeKind, rules: Vec<RestraintRule>) {
        self.rules.insert(kind, rules);
    }
}

impl Restrainer for SatRestrainer {
    fn restrain(
        &self,
        solver: &SatSolver,
        body: &mut Body,
        layer: &TileLayer,
        tile: &Tile,
        response: &Response,
    ) -> bool {
        if response.overlap == 0.0 {
            return true;
        }
        let Some(slope) = tile.slope.as_ref() else { return true };
        let Some(rules) = self.rules.get(&slope.kind) else { return true };

        for rule in rules {
            let Some(neighbour) = layer.neighbour(tile.x, tile.y, rule.neighbour) else { continue };
            let Some(neighbour_slope) = neighbour.slope.as_ref() else { continue };
            if !rule.matches(slope.kind, neighbour_slope.kind, response.overlap_n) {
                continue;
            }
            if rule.separate.resolve(body, tile) {
                if let Some(axis) = slope.axis {
                    solver.collide_on_axis(body, layer, tile, axis);
                }
            }
            return false;
        }
        true
    }
}

fn body_above_tile_bottom(body: &Body, tile: &Tile) -> bool {
    body.bottom() < tile.bottom()
}

fn body_right_of_tile_left(body: &Body, tile: &Tile) -> bool {
    body.left() > tile.left()
}

fn body_left_of_tile_right(body: &Body, tile: &Tile) -> bool {
    body.right() < tile.right()
}

fn body_below_tile_top(body: &Body, tile: &Tile) -> bool {
    body.top() > tile.top()
}

/// The tuned rule set for smooth travel over slope seams.
pub fn default_rules() -> HashMap<SlopeKind, Vec<RestraintRule>> {
    use Direction as D;
    use Neighbour as N;
    use SlopeKind::*;
    use VertexLocation as V;

    let rule = RestraintRule::new;
    let mut t = HashMap::new();

    t.insert(HalfTop, vec![
        rule(D::Left, N::Left).at(&[V::TopRight, V::Right]).separate(Separate::Never),
        rule(D::Right, N::Right).at(&[V::TopLeft, V::Left]).separate(Separate::Never),
    ]);
    t.insert(HalfBottom, vec![
        rule(D::Left, N::Left).at(&[V::Right, V::BottomRight]).separate(Separate::Never),
        rule(D::Right, N::Right).at(&[V::Left, V::BottomLeft]).separate(Separate::Never),
    ]);
    t.insert(HalfLeft, vec![
        rule(D::Up, N::Above).at(&[V::BottomLeft, V::Bottom]).separate(Separate::Never),
        rule(D::Down, N::Below).at(&[V::TopLeft, V::Top]).separate(Separate::Never),
    ]);
    t.insert(HalfRight, vec![
        rule(D::Up, N::Above).at(&[V::Bottom, V::BottomRight]).separate(Separate::Never),
        rule(D::Down, N::Below).at(&[V::Top, V::TopRight]).separate(Separate::Never),
    ]);

    t.insert(HalfBottomLeft, vec![
        rule(D::Right, N::BottomRight).at(&[V::TopLeft]),
        rule(D::Up, N::TopLeft).at(&[V::BottomRight]),
    ]);
    t.insert(HalfBottomRight, vec![
        rule(D::Left, N::BottomLeft).at(&[V::TopRight]),
        rule(D::Up, N::TopRight).at(&[V::BottomLeft]),
    ]);
    t.insert(HalfTopLeft, vec![
        rule(D::Right, N::TopRight).at(&[V::BottomLeft]),
        rule(D::Down, N::BottomLeft).at(&[V::TopRight]),
    ]);
    t.insert(HalfTopRight, vec![
        rule(D::Left, N::TopLeft).at(&[V::BottomRight]),
        rule(D::Down, N::BottomRight).at(&[V::TopLeft]),
    ]);

    t.insert(QuarterBottomLeftLow, vec![
        rule(D::Right, N::BottomRight).at(&[V::TopLeft]),
        rule(D::Up, N::Left).at(&[V::TopLeft, V::Right, V::BottomRight]),
        rule(D::Left, N::Left).at(&[V::Right, V::BottomRight]).separate(Separate::Never),
    ]);
    t.insert(QuarterBottomLeftHigh, vec![
        rule(D::Right, N::Right).at(&[V::Left, V::BottomLeft]).separate(Separate::When(body_above_tile_bottom)),
        rule(D::Up, N::TopLeft).at(&[V::BottomRight]),
    ]);
    t.insert(QuarterBottomRightLow, vec![
        rule(D::Left, N::BottomLeft).at(&[V::TopRight]),
        rule(D::Up, N::Right).at(&[V::TopRight, V::Left, V::BottomLeft]),
        rule(D::Right, N::Right).at(&[V::Left, V::BottomLeft]).separate(Separate::Never),
    ]);
    t.insert(QuarterBottomRightHigh, vec![
        rule(D::Left, N::Left).at(&[V::Right, V::BottomRight]).separate(Separate::When(body_above_tile_bottom)),
        rule(D::Up, N::TopRight).at(&[V::BottomLeft]),
    ]);

    t.insert(QuarterLeftBottomLow, vec![
        rule(D::Up, N::Above).at(&[V::TopLeft, V::Left]).separate(Separate::When(body_right_of_tile_left)),
        rule(D::Right, N::BottomRight).at(&[V::TopLeft]),
    ]);
    t.insert(QuarterLeftBottomHigh, vec![
        rule(D::Up, N::TopLeft).at(&[V::BottomRight]),
        rule(D::Down, N::Below).at(&[V::TopLeft, V::Top]).separate(Separate::Never),
        rule(D::Right, N::Below).at(&[V::TopLeft, V::Top, V::BottomRight]),
    ]);
    t.insert(QuarterRightBottomLow, vec![
        rule(D::Up, N::Above).at(&[V::Bottom, V::BottomRight]).separate(Separate::When(body_left_of_tile_right)),
        rule(D::Left, N::BottomLeft).at(&[V::TopRight]),
    ]);
    t.insert(QuarterRightBottomHigh, vec![
        rule(D::Up, N::TopRight).at(&[V::BottomLeft]),
        rule(D::Down, N::Below).at(&[V::Top, V::TopRight]).separate(Separate::Never),
        rule(D::Left, N::Below).at(&[V::Top, V::TopRight, V::BottomLeft]),
    ]);

    t.insert(QuarterLeftTopLow, vec![
        rule(D::Up, N::Above).at(&[V::BottomLeft, V::Bottom]),
        rule(D::Right, N::Above).at(&[V::BottomLeft, V::Bottom]).separate(Separate::Never),
        rule(D::Down, N::BottomLeft).at(&[V::TopRight]),
    ]);
    t.insert(QuarterLeftTopHigh, vec![
        rule(D::Right, N::TopRight).at(&[V::BottomLeft]),
        rule(D::Down, N::Below).at(&[V::TopLeft, V::Top]).separate(Separate::When(body_right_of_tile_left)),
    ]);
    t.insert(QuarterRightTopLow, vec![
        rule(D::Up, N::Above).at(&[V::Bottom, V::BottomRight]),
        rule(D::Left, N::Above).at(&[V::Bottom, V::BottomRight]).separate(Separate::Never),
        rule(D::Down, N::BottomRight).at(&[V::TopLeft]),
    ]);
    t.insert(QuarterRightTopHigh, vec![
        rule(D::Left, N::TopLeft).at(&[V::BottomRight]),
        rule(D::Down, N::Below).at(&[V::Top, V::TopRight]).separate(Separate::When(body_left_of_tile_right)),
    ]);

    t.insert(QuarterTopLeftLow, vec![
        rule(D::Right, N::TopRight).at(&[V::BottomLeft]),
        rule(D::Left, N::Left).at(&[V::TopRight, V::Right]).separate(Separate::Never),
        rule(D::Down, N::Left).at(&[V::BottomLeft, V::TopRight, V::Right]),
    ]);
    t.insert(QuarterTopLeftHigh, vec![
        rule(D::Right, N::Right).at(&[V::TopLeft, V::Left]).separate(Separate::When(body_below_tile_top)),
        rule(D::Down, N::BottomLeft).at(&[V::TopRight]),
    ]);
    t.insert(QuarterTopRightLow, vec![
        rule(D::Left, N::TopLeft).at(&[V::BottomRight]),
        rule(D::Right, N::Right).at(&[V::TopLeft, V::Left]).separate(Separate::Never),
        rule(D::Down, N::Right).at(&[V::BottomRight, V::TopLeft, V::Left]),
    ]);
    t.insert(QuarterTopRightHigh, vec![
        rule(D::Left, N::Left).at(&[V::TopRight, V::Right]).separate(Separate::When(body_below_tile_top)),
        rule(D::Down, N::BottomRight).at(&[V::TopLeft]),
    ]);

    t
}
