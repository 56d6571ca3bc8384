use glam::Vec2;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::api::{NarrowphaseApi, Restrainer, TileSolver};
use crate::body::{Body, BodyShape};
use crate::narrowphase::Narrowphase;
use crate::restrainer::SatRestrainer;
use crate::tilemap::{Tile, TileLayer};
use crate::types::{EdgeFlag, Response};

/// Solver-wide switches.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SatOptions {
    /// Log every snap response.
    pub debug: bool,
    /// Separate along Y only when possible, for every body.
    pub prefer_y: bool,
    /// Consult restrainers before separating.
    pub restrain: bool,
}

impl Default for SatOptions {
    fn default() -> Self {
        Self { debug: false, prefer_y: false, restrain: true }
    }
}

/// Horizontal offset that clears an overlap `v` without moving vertically.
pub fn min_offset_x(v: Vec2) -> f32 {
    v.y * v.y / v.x + v.x
}

/// Vertical offset that clears an overlap `v` without moving horizontally.
pub fn min_offset_y(v: Vec2) -> f32 {
    v.x * v.x / v.y + v.y
}

/// Separating axis solver for sloped tiles.
///
/// Every response handled here faces out of the tile: `overlap_v` is added to
/// the body's position to separate it.
pub struct SatSolver {
    pub options: SatOptions,
    restrainers: Vec<Box<dyn Restrainer>>,
}

impl Default for SatSolver {
    fn default() -> Self {
        Self::new(SatOptions::default())
    }
}

impl SatSolver {
    pub fn new(options: SatOptions) -> Self {
        Self { options, restrainers: vec![Box::new(SatRestrainer::default())] }
    }

    /// Solver without any restrainer.
    pub fn unrestrained(options: SatOptions) -> Self {
        Self { options, restrainers: Vec::new() }
    }

    pub fn add_restrainer(&mut self, restrainer: impl Restrainer + 'static) {
        self.restrainers.push(Box::new(restrainer));
    }

    pub fn restrainers(&self) -> usize {
        self.restrainers.len()
    }

    fn update_values(body: &mut Body) {
        let velocity = body.velocity;
        if let Some(slopes) = body.slopes.as_mut() {
            slopes.velocity = velocity;
        }
    }

    fn should_collide(body: &Body, tile: &Tile) -> bool {
        body.enable && body.slopes.is_some() && tile.collides && tile.slope.is_some()
    }

    fn test(body: &Body, tile: &Tile) -> Option<Response> {
        let shape = &body.slopes.as_ref()?.shape;
        let polygon = &tile.slope.as_ref()?.polygon;
        match shape {
            BodyShape::Circle { radius } => {
                Narrowphase::test_circle_polygon(body.center(), *radius, tile.world_pos(), polygon)
            }
            BodyShape::Polygon(shape) => {
                Narrowphase::test_polygon_polygon(body.position, shape, tile.world_pos(), polygon)
            }
        }
    }

    fn moving_against_y(body: &Body, response: &Response) -> bool {
        let ov = response.overlap_v;
        let velocity = body.velocity;
        (ov.y < 0.0 && velocity.y > 0.0) || (ov.y > 0.0 && velocity.y < 0.0)
    }

    fn should_prefer_y(&self, body: &Body, response: &Response) -> bool {
        let body_prefers = body.config().is_some_and(|c| c.prefer_y);
        (self.options.prefer_y || body_prefers)
            && response.overlap_v.y != 0.0
            && response.overlap_v.x != 0.0
            && Self::moving_against_y(body, response)
    }

    fn restrain(&self, body: &mut Body, layer: &TileLayer, tile: &Tile, response: &Response) -> bool {
        self.restrainers.iter().any(|r| !r.restrain(self, body, layer, tile, response))
    }

    fn should_separate(&self, body: &mut Body, layer: &TileLayer, tile: &Tile, response: &Response) -> bool {
        if !body.enable || response.overlap == 0.0 {
            return false;
        }
        let Some(slope) = tile.slope.as_ref() else { return false };
        let n = response.overlap_n;
        let edges = slope.edges;
        if (edges.top == EdgeFlag::Empty && n.y < 0.0 && n.x == 0.0)
            || (edges.bottom == EdgeFlag::Empty && n.y > 0.0 && n.x == 0.0)
            || (edges.left == EdgeFlag::Empty && n.x < 0.0 && n.y == 0.0)
            || (edges.right == EdgeFlag::Empty && n.x > 0.0 && n.y == 0.0)
        {
            return false;
        }

        let cached = body.slopes.as_ref().map_or(Vec2::ZERO, |s| s.velocity);
        if (-response.overlap_v).dot(cached) < 0.0 {
            return false;
        }

        if !self.options.restrain || body.is_circle() {
            return true;
        }
        !self.restrain(body, layer, tile, response)
    }

    fn separate(&self, body: &mut Body, layer: &TileLayer, tile: &Tile, response: &Response, force: bool) -> bool {
        if !force && !self.should_separate(body, layer, tile, response) {
            return false;
        }
        if let Some(callback) = layer.tile_callback(tile.x, tile.y) {
            if !callback(body, tile) {
                return false;
            }
        }
        if let Some(callback) = layer.index_callback(tile.index) {
            if !callback(body, tile) {
                return false;
            }
        }

        if self.should_prefer_y(body, response) {
            body.position.y += min_offset_y(response.overlap_v);
        } else {
            body.position += response.overlap_v;
        }
        true
    }

    fn apply_velocity(body: &mut Body, tile: &Tile, response: &Response) {
        let Some(slopes) = body.slopes.as_ref() else { return };
        let velocity = slopes.velocity;
        let body_friction = slopes.config.friction;
        let tile_friction = tile.slope.as_ref().map_or(Vec2::ZERO, |s| s.friction);

        let projection = velocity.project_onto_normalized(response.overlap_n);
        let bounce = projection * -body.bounce;
        let friction = (velocity - projection) * (Vec2::ONE - body_friction - tile_friction);

        body.velocity = bounce + friction;
        Self::pull(body, response);
    }

    /// Adds the first configured pull whose direction faces into the contact.
    fn pull(body: &mut Body, response: &Response) {
        let Some(config) = body.config() else { return };
        if !config.has_pull() {
            return;
        }
        let f = -response.overlap_n;
        let candidates = [
            (config.pull_up, f.y < 0.0),
            (config.pull_down, f.y > 0.0),
            (config.pull_left, f.x < 0.0),
            (config.pull_right, f.x > 0.0),
            (config.pull_top_left, f.x < 0.0 && f.y < 0.0),
            (config.pull_top_right, f.x > 0.0 && f.y < 0.0),
            (config.pull_bottom_left, f.x < 0.0 && f.y > 0.0),
            (config.pull_bottom_right, f.x > 0.0 && f.y > 0.0),
        ];
        if let Some((coefficient, _)) = candidates.into_iter().find(|(c, hit)| *c != 0.0 && *hit) {
            body.velocity += f * coefficient;
        }
    }

    fn update_flags(body: &mut Body, response: &Response) {
        let ov = response.overlap_v;
        body.was_touching = body.touching;

        let touching = &mut body.touching;
        touching.up |= ov.y > 0.0;
        touching.down |= ov.y < 0.0;
        touching.left |= ov.x > 0.0;
        touching.right |= ov.x < 0.0;
        touching.none = !(touching.up || touching.down || touching.left || touching.right);

        let blocked = &mut body.blocked;
        blocked.up |= ov.x == 0.0 && ov.y > 0.0;
        blocked.down |= ov.x == 0.0 && ov.y < 0.0;
        blocked.left |= ov.y == 0.0 && ov.x > 0.0;
        blocked.right |= ov.y == 0.0 && ov.x < 0.0;
        blocked.none = !(blocked.up || blocked.down || blocked.left || blocked.right);
    }

    /// Separates the body from the tile along one given axis, bypassing the
    /// separation checks. Returns false when the shapes don't overlap on it
    /// or a collision callback vetoes the separation.
    pub fn collide_on_axis(&self, body: &mut Body, layer: &TileLayer, tile: &Tile, axis: Vec2) -> bool {
        Self::update_values(body);
        if !Self::should_collide(body, tile) {
            return false;
        }
        let (Some(slopes), Some(slope)) = (body.slopes.as_ref(), tile.slope.as_ref()) else { return false };

        let mut response = Response::default();
        let tile_points = slope.polygon.points();
        let separated = match &slopes.shape {
            BodyShape::Polygon(shape) => Narrowphase::is_separating_axis(
                body.position,
                shape.points(),
                tile.world_pos(),
                tile_points,
                axis,
                Some(&mut response),
            ),
            BodyShape::Circle { radius } => {
                let c = body.center().dot(axis);
                let (min, max) = Narrowphase::flatten_points(tile_points, axis);
                let offset = tile.world_pos().dot(axis);
                Narrowphase::is_separating_range(
                    (c - radius, c + radius),
                    (min + offset, max + offset),
                    axis,
                    Some(&mut response),
                )
            }
        };
        if separated {
            return false;
        }

        response.overlap_v = response.overlap_n * response.overlap;
        let response = response.inverted();
        if !self.separate(body, layer, tile, &response, true) {
            return false;
        }
        Self::apply_velocity(body, tile, &response);
        Self::update_flags(body, &response);
        true
    }
}

impl TileSolver for SatSolver {
    fn collide(&self, body: &mut Body, layer: &TileLayer, tile: &Tile, overlap_only: bool) -> bool {
        Self::update_values(body);
        if !Self::should_collide(body, tile) {
            return false;
        }
        let Some(raw) = Self::test(body, tile) else { return false };
        if overlap_only {
            return true;
        }

        let response = raw.inverted();
        body.overlap = raw.overlap_v;
        if let Some(slopes) = body.slopes.as_mut() {
            slopes.response = Some(response);
        }

        if !self.separate(body, layer, tile, &response, false) {
            return false;
        }
        Self::apply_velocity(body, tile, &response);
        Self::update_flags(body, &response);
        true
    }

    fn snap(&self, body: &mut Body, layer: &TileLayer, tiles: &[&Tile]) -> bool {
        let Some(config) = body.config() else { return false };
        if !config.has_snap() {
            return false;
        }
        let offsets = [
            Vec2::new(0.0, -config.snap_up),
            Vec2::new(0.0, config.snap_down),
            Vec2::new(-config.snap_left, 0.0),
            Vec2::new(config.snap_right, 0.0),
        ];

        let current = body.position;
        for tile in tiles.iter().filter(|t| t.slope.is_some()) {
            for offset in offsets.iter().filter(|o| **o != Vec2::ZERO) {
                body.position = current + *offset;
                if self.collide(body, layer, tile, false) {
                    if self.options.debug {
                        debug!("snapped to tile ({}, {}): {:?}", tile.x, tile.y, body.slopes.as_ref().and_then(|s| s.response));
                    }
                    return true;
                }
                body.position = current;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{BodySlopes, SlopesConfig};
    use crate::factory::{SlopeMapping, TileSlopeFactory};
    use crate::narrowphase::ConvexPolygon;
    use crate::slope::SlopeKind;

    const EPS: f32 = 1e-3;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).abs().max_element() < EPS
    }

    fn enabled(mut body: Body, config: SlopesConfig) -> Body {
        let shape = match body.radius {
            Some(radius) => BodyShape::Circle { radius },
            None => BodyShape::Polygon(ConvexPolygon::from_box(body.size.x, body.size.y)),
        };
        body.slopes = Some(BodySlopes::new(config, shape));
        body
    }

    fn layer(tile_size: f32, rows: &[Vec<i32>], kinds: &[(u32, SlopeKind)]) -> TileLayer {
        let mut layer = TileLayer::from_rows(tile_size, tile_size, rows);
        let mapping: SlopeMapping = kinds.iter().copied().collect();
        TileSlopeFactory::new().convert_layer(&mut layer, &mapping);
        layer
    }

    fn full_floor() -> TileLayer {
        layer(24.0, &[vec![1]], &[(1, SlopeKind::Full)])
    }

    fn faller(bounce: f32) -> Body {
        let body = Body::new(Vec2::new(0.0, -19.0), Vec2::new(16.0, 24.0))
            .with_velocity(Vec2::new(0.0, 200.0))
            .with_bounce(Vec2::new(0.0, bounce));
        enabled(body, SlopesConfig::default())
    }

    #[test]
    fn test_min_offsets() {
        assert!((min_offset_y(Vec2::new(-3.0, -3.0)) + 6.0).abs() < EPS);
        assert!((min_offset_x(Vec2::new(2.0, 2.0)) - 4.0).abs() < EPS);
    }

    #[test]
    fn test_landing_on_full_tile() {
        let solver = SatSolver::default();
        let layer = full_floor();
        let tile = layer.tile(0, 0).unwrap();
        let mut body = faller(0.5);

        assert!(solver.collide(&mut body, &layer, tile, false));
        assert!(close(body.position, Vec2::new(0.0, -24.0)));
        assert!(close(body.velocity, Vec2::new(0.0, -100.0)));
        assert!(close(body.overlap, Vec2::new(0.0, 5.0)));
        assert!(body.touching.down && !body.touching.none);
        assert!(body.blocked.down);
        assert!(!body.touching.up && !body.touching.left && !body.touching.right);
        let stored = body.slopes.as_ref().unwrap().response.unwrap();
        assert!(close(stored.overlap_n, Vec2::new(0.0, -1.0)));
    }

    #[test]
    fn test_elastic_bounce_reverses_velocity() {
        let solver = SatSolver::default();
        let layer = full_floor();
        let mut body = faller(1.0).with_velocity(Vec2::new(30.0, 200.0));
        body.bounce = Vec2::ONE;
        assert!(solver.collide(&mut body, &layer, layer.tile(0, 0).unwrap(), false));
        assert!(close(body.velocity, Vec2::new(30.0, -200.0)));
    }

    #[test]
    fn test_resolved_contact_is_stable() {
        let solver = SatSolver::default();
        let layer = full_floor();
        let tile = layer.tile(0, 0).unwrap();
        let mut body = faller(0.0);
        assert!(solver.collide(&mut body, &layer, tile, false));
        let settled = body.position;
        assert!(!solver.collide(&mut body, &layer, tile, false));
        assert_eq!(body.position, settled);
    }

    #[test]
    fn test_no_overlap_and_overlap_only() {
        let solver = SatSolver::default();
        let layer = full_floor();
        let tile = layer.tile(0, 0).unwrap();

        let mut far = faller(0.0);
        far.position.y = -40.0;
        assert!(!solver.collide(&mut far, &layer, tile, false));
        assert!(far.touching.none);

        let mut body = faller(0.0);
        assert!(solver.collide(&mut body, &layer, tile, true));
        assert_eq!(body.position, Vec2::new(0.0, -19.0));
        assert_eq!(body.velocity, Vec2::new(0.0, 200.0));
    }

    #[test]
    fn test_requires_enabled_body_and_colliding_tile() {
        let solver = SatSolver::default();
        let mut layer = full_floor();
        let mut plain = Body::new(Vec2::new(0.0, -19.0), Vec2::new(16.0, 24.0));
        assert!(!solver.collide(&mut plain, &layer, layer.tile(0, 0).unwrap(), false));

        layer.set_collision(&[1], false);
        let mut body = faller(0.0);
        assert!(!solver.collide(&mut body, &layer, layer.tile(0, 0).unwrap(), false));
    }

    #[test]
    fn test_moving_away_is_not_separated() {
        let solver = SatSolver::default();
        let layer = full_floor();
        let mut body = faller(0.0).with_velocity(Vec2::new(0.0, -50.0));
        assert!(!solver.collide(&mut body, &layer, layer.tile(0, 0).unwrap(), false));
        assert_eq!(body.position, Vec2::new(0.0, -19.0));
    }

    #[test]
    fn test_callback_veto() {
        let solver = SatSolver::default();
        let mut layer = full_floor();
        layer.set_index_callback(1, |_, _| false);
        let mut body = faller(0.0);
        assert!(!solver.collide(&mut body, &layer, layer.tile(0, 0).unwrap(), false));
        assert_eq!(body.position, Vec2::new(0.0, -19.0));

        let mut layer = full_floor();
        layer.set_tile_callback(0, 0, |b, _| b.velocity.y < 0.0);
        let mut body = faller(0.0);
        assert!(!solver.collide(&mut body, &layer, layer.tile(0, 0).unwrap(), false));
    }

    #[test]
    fn test_circle_body_lands() {
        let solver = SatSolver::default();
        let layer = full_floor();
        let body = Body::circle(Vec2::new(8.0, -7.0), 4.0).with_velocity(Vec2::new(0.0, 50.0));
        let mut body = enabled(body, SlopesConfig::default());
        assert!(solver.collide(&mut body, &layer, layer.tile(0, 0).unwrap(), false));
        assert!(close(body.position, Vec2::new(8.0, -8.0)));
        assert!(body.touching.down);
    }

    #[test]
    fn test_pull_adds_velocity_into_contact() {
        let solver = SatSolver::default();
        let layer = full_floor();
        let config = SlopesConfig { pull_down: 10.0, pull_up: 30.0, ..SlopesConfig::default() };
        let body = Body::new(Vec2::new(0.0, -19.0), Vec2::new(16.0, 24.0)).with_velocity(Vec2::new(0.0, 200.0));
        let mut body = enabled(body, config);
        assert!(solver.collide(&mut body, &layer, layer.tile(0, 0).unwrap(), false));
        assert!(close(body.velocity, Vec2::new(0.0, 10.0)));
    }

    #[test]
    fn test_prefer_y_on_diagonal() {
        let layer = layer(16.0, &[vec![1]], &[(1, SlopeKind::HalfBottomRight)]);
        let tile = layer.tile(0, 0).unwrap();
        let start = Body::new(Vec2::new(8.0, 6.0), Vec2::new(4.0, 4.0)).with_velocity(Vec2::new(0.0, 100.0));

        let solver = SatSolver::default();
        let mut body = enabled(start.clone(), SlopesConfig::default());
        assert!(solver.collide(&mut body, &layer, tile, false));
        assert!(close(body.position, Vec2::new(5.0, 3.0)));

        let solver = SatSolver::new(SatOptions { prefer_y: true, ..SatOptions::default() });
        let mut body = enabled(start, SlopesConfig::default());
        assert!(solver.collide(&mut body, &layer, tile, false));
        assert!(close(body.position, Vec2::new(8.0, 0.0)));
    }

    #[test]
    fn test_restrainer_vetoes_flat_seam() {
        let layer = layer(16.0, &[vec![1, 1]], &[(1, SlopeKind::HalfTop)]);
        let tile = layer.tile(1, 0).unwrap();
        let start = Body::new(Vec2::new(10.0, 2.0), Vec2::new(7.0, 4.0)).with_velocity(Vec2::new(100.0, 0.0));

        let solver = SatSolver::default();
        let mut body = enabled(start.clone(), SlopesConfig::default());
        assert!(!solver.collide(&mut body, &layer, tile, false));
        assert_eq!(body.position, Vec2::new(10.0, 2.0));

        let solver = SatSolver::new(SatOptions { restrain: false, ..SatOptions::default() });
        let mut body = enabled(start, SlopesConfig::default());
        assert!(solver.collide(&mut body, &layer, tile, false));
        assert!(close(body.position, Vec2::new(9.0, 2.0)));
        assert!(body.touching.right && body.blocked.right);
    }

    #[test]
    fn test_restrainer_redirects_onto_axis() {
        let layer = layer(16.0, &[vec![-1, 2], vec![2, -1]], &[(2, SlopeKind::HalfBottomRight)]);
        let tile = layer.tile(1, 0).unwrap();
        let body = Body::new(Vec2::new(14.0, 13.5), Vec2::new(4.0, 4.0)).with_velocity(Vec2::new(100.0, 0.0));
        let mut body = enabled(body, SlopesConfig::default());

        let solver = SatSolver::default();
        assert!(!solver.collide(&mut body, &layer, tile, false));
        assert!(close(body.position, Vec2::new(12.25, 11.75)));
        assert!(close(body.velocity, Vec2::new(50.0, -50.0)));
        assert!(body.touching.down && body.touching.right);
    }

    #[test]
    fn test_redirect_respects_callback_veto() {
        let mut layer = layer(16.0, &[vec![-1, 2], vec![2, -1]], &[(2, SlopeKind::HalfBottomRight)]);
        layer.set_tile_callback(1, 0, |_, _| false);
        let tile = layer.tile(1, 0).unwrap();
        let body = Body::new(Vec2::new(14.0, 13.5), Vec2::new(4.0, 4.0)).with_velocity(Vec2::new(100.0, 0.0));
        let mut body = enabled(body, SlopesConfig::default());

        let solver = SatSolver::default();
        assert!(!solver.collide(&mut body, &layer, tile, false));
        assert_eq!(body.position, Vec2::new(14.0, 13.5));
        assert_eq!(body.velocity, Vec2::new(100.0, 0.0));
        assert!(body.touching.none);
        assert!(!body.touching.down && !body.touching.right);
    }

    #[test]
    fn test_collide_on_axis_respects_callback_veto() {
        let solver = SatSolver::default();
        let mut layer = full_floor();
        layer.set_tile_callback(0, 0, |_, _| false);
        let mut body = faller(0.0);
        assert!(!solver.collide_on_axis(&mut body, &layer, layer.tile(0, 0).unwrap(), Vec2::Y));
        assert_eq!(body.position, Vec2::new(0.0, -19.0));
        assert_eq!(body.velocity, Vec2::new(0.0, 200.0));
        assert!(body.touching.none && !body.blocked.down);
    }

    #[test]
    fn test_friction_body_plus_tile_can_reverse() {
        let solver = SatSolver::default();
        let mut layer = full_floor();
        if let Some(slope) = layer.tile_mut(0, 0).and_then(|t| t.slope.as_mut()) {
            slope.friction = Vec2::new(0.25, 0.0);
        }
        let config = SlopesConfig { friction: Vec2::new(1.0, 0.0), ..SlopesConfig::default() };
        let body = Body::new(Vec2::new(0.0, -19.0), Vec2::new(16.0, 24.0)).with_velocity(Vec2::new(40.0, 200.0));
        let mut body = enabled(body, config);

        assert!(solver.collide(&mut body, &layer, layer.tile(0, 0).unwrap(), false));
        // tangential speed scaled by 1 - 1.0 - 0.25
        assert!(close(body.velocity, Vec2::new(-10.0, 0.0)));
    }

    fn onto_diagonal(config: SlopesConfig) -> Body {
        let layer = layer(16.0, &[vec![1]], &[(1, SlopeKind::HalfBottomRight)]);
        let body = Body::new(Vec2::new(8.0, 6.0), Vec2::new(4.0, 4.0)).with_velocity(Vec2::new(0.0, 100.0));
        let mut body = enabled(body, config);
        assert!(SatSolver::default().collide(&mut body, &layer, layer.tile(0, 0).unwrap(), false));
        body
    }

    #[test]
    fn test_pull_cardinal_beats_diagonal() {
        let d = std::f32::consts::FRAC_1_SQRT_2;
        // without pull the diagonal contact leaves (-50, 50)
        let plain = onto_diagonal(SlopesConfig::default());
        assert!(close(plain.velocity, Vec2::new(-50.0, 50.0)));

        let config = SlopesConfig { pull_down: 10.0, pull_bottom_right: 20.0, ..SlopesConfig::default() };
        let body = onto_diagonal(config);
        assert!(close(body.velocity, Vec2::new(-50.0 + 10.0 * d, 50.0 + 10.0 * d)));
    }

    #[test]
    fn test_pull_diagonal_only() {
        let d = std::f32::consts::FRAC_1_SQRT_2;
        let config = SlopesConfig { pull_top_left: 99.0, pull_bottom_right: 20.0, ..SlopesConfig::default() };
        let body = onto_diagonal(config);
        assert!(close(body.velocity, Vec2::new(-50.0 + 20.0 * d, 50.0 + 20.0 * d)));
    }

    #[test]
    fn test_conditional_rule_depends_on_body_position() {
        // high quarter slope with its low continuation to the right
        let layer = layer(16.0, &[vec![1, 2]], &[
            (1, SlopeKind::QuarterBottomLeftHigh),
            (2, SlopeKind::QuarterBottomLeftLow),
        ]);
        let tile = layer.tile(0, 0).unwrap();
        let solver = SatSolver::default();

        // above the tile bottom: pushed out along the slope axis
        let body = Body::new(Vec2::new(15.0, 10.0), Vec2::new(4.0, 4.0)).with_velocity(Vec2::new(-50.0, 0.0));
        let mut body = enabled(body, SlopesConfig::default());
        assert!(!solver.collide(&mut body, &layer, tile, false));
        assert!(close(body.position, Vec2::new(17.6, 4.8)));
        assert!(body.touching.down && body.touching.left);

        // level with the tile bottom: the seam overlap is dropped
        let body = Body::new(Vec2::new(15.0, 12.0), Vec2::new(4.0, 4.0)).with_velocity(Vec2::new(-50.0, 0.0));
        let mut body = enabled(body, SlopesConfig::default());
        assert!(!solver.collide(&mut body, &layer, tile, false));
        assert_eq!(body.position, Vec2::new(15.0, 12.0));
        assert_eq!(body.velocity, Vec2::new(-50.0, 0.0));
        assert!(body.touching.none);
    }

    #[test]
    fn test_collide_on_axis_separated() {
        let solver = SatSolver::default();
        let layer = full_floor();
        let mut body = faller(0.0);
        body.position.y = -30.0;
        assert!(!solver.collide_on_axis(&mut body, &layer, layer.tile(0, 0).unwrap(), Vec2::Y));
        assert!(solver.collide_on_axis(&mut faller(0.0), &layer, layer.tile(0, 0).unwrap(), Vec2::Y));
    }

    #[test]
    fn test_snap_down_to_floor() {
        let solver = SatSolver::default();
        let layer = layer(16.0, &[vec![-1], vec![1]], &[(1, SlopeKind::Full)]);
        let config = SlopesConfig { snap_down: 4.0, ..SlopesConfig::default() };
        let mut body = enabled(Body::new(Vec2::new(0.0, -2.0), Vec2::new(16.0, 16.0)), config);

        let tiles: Vec<&Tile> = layer.tiles().collect();
        assert!(solver.snap(&mut body, &layer, &tiles));
        assert!(close(body.position, Vec2::ZERO));
        assert!(body.touching.down);
    }

    #[test]
    fn test_snap_without_target_restores_position() {
        let solver = SatSolver::default();
        let layer = layer(16.0, &[vec![-1], vec![1]], &[(1, SlopeKind::Full)]);
        let config = SlopesConfig { snap_down: 4.0, ..SlopesConfig::default() };
        let mut body = enabled(Body::new(Vec2::new(0.0, -10.0), Vec2::new(16.0, 16.0)), config);

        let tiles: Vec<&Tile> = layer.tiles().collect();
        assert!(!solver.snap(&mut body, &layer, &tiles));
        assert_eq!(body.position, Vec2::new(0.0, -10.0));
        assert!(!solver.snap(&mut body, &layer, &[]));

        let mut plain = enabled(Body::new(Vec2::new(0.0, -2.0), Vec2::new(16.0, 16.0)), SlopesConfig::default());
        assert!(!solver.snap(&mut plain, &layer, &tiles));
    }

    struct Deny;

    impl Restrainer for Deny {
        fn restrain(&self, _: &SatSolver, _: &mut Body, _: &TileLayer, _: &Tile, _: &Response) -> bool {
            false
        }
    }

    #[test]
    fn test_extra_restrainer_can_veto() {
        let mut solver = SatSolver::unrestrained(SatOptions::default());
        assert_eq!(solver.restrainers(), 0);
        solver.add_restrainer(Deny);
        let layer = full_floor();
        let mut body = faller(0.0);
        assert!(!solver.collide(&mut body, &layer, layer.tile(0, 0).unwrap(), false));
    }
}
