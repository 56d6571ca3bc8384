use glam::Vec2;

use crate::body::Body;
use crate::narrowphase::ConvexPolygon;
use crate::solver::SatSolver;
use crate::tilemap::{Tile, TileLayer};
use crate::types::*;

/// Pluggable tile collision resolver handed candidate tiles by the broad phase.
pub trait TileSolver {
    /// Resolve one body against one sloped tile. Returns whether a collision
    /// was resolved (or, with `overlap_only`, merely detected).
    fn collide(&self, body: &mut Body, layer: &TileLayer, tile: &Tile, overlap_only: bool) -> bool;

    /// Speculatively move the body towards nearby tiles to keep it in contact.
    fn snap(&self, body: &mut Body, layer: &TileLayer, tiles: &[&Tile]) -> bool;
}

/// Veto hook consulted before a SAT separation is applied.
pub trait Restrainer {
    /// Returns true to let the solver separate normally, false when the
    /// restrainer handled or suppressed the collision itself.
    fn restrain(
        &self,
        solver: &SatSolver,
        body: &mut Body,
        layer: &TileLayer,
        tile: &Tile,
        response: &Response,
    ) -> bool;
}

/// Separating axis primitives.
pub trait NarrowphaseApi {
    // Projection -------------------------------------------------------------

    fn flatten_points(points: &[Vec2], axis: Vec2) -> (f32, f32);

    fn is_separating_range(
        range_a: (f32, f32),
        range_b: (f32, f32),
        axis: Vec2,
        response: Option<&mut Response>,
    ) -> bool;

    fn is_separating_axis(
        a_pos: Vec2,
        a_points: &[Vec2],
        b_pos: Vec2,
        b_points: &[Vec2],
        axis: Vec2,
        response: Option<&mut Response>,
    ) -> bool;

    // Shape tests ------------------------------------------------------------

    fn test_polygon_polygon(a_pos: Vec2, a: &ConvexPolygon, b_pos: Vec2, b: &ConvexPolygon) -> Option<Response>;
    fn test_polygon_circle(poly_pos: Vec2, polygon: &ConvexPolygon, center: Vec2, radius: f32) -> Option<Response>;
    fn test_circle_polygon(center: Vec2, radius: f32, poly_pos: Vec2, polygon: &ConvexPolygon) -> Option<Response>;
}
