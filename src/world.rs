use std::collections::HashMap;

use log::warn;

use crate::api::TileSolver;
use crate::body::{Body, BodyShape, BodySlopes, SlopesConfig};
use crate::factory::{SlopeMapping, TileSlopeFactory};
use crate::narrowphase::ConvexPolygon;
use crate::solver::{SatOptions, SatSolver};
use crate::tilemap::{Tile, TileLayer};

/// Name of the built-in separating axis solver.
pub const SAT: &str = "sat";

/// Entry point tying the factory and the solvers together.
pub struct Slopes {
    pub factory: TileSlopeFactory,
    solvers: HashMap<String, Box<dyn TileSolver>>,
    default_solver: String,
}

impl Default for Slopes {
    fn default() -> Self {
        Self::new(SatOptions::default())
    }
}

impl Slopes {
    pub fn new(options: SatOptions) -> Self {
        let mut solvers: HashMap<String, Box<dyn TileSolver>> = HashMap::new();
        solvers.insert(SAT.to_string(), Box::new(SatSolver::new(options)));
        Self { factory: TileSlopeFactory::new(), solvers, default_solver: SAT.to_string() }
    }

    pub fn register_solver(&mut self, name: impl Into<String>, solver: impl TileSolver + 'static) {
        self.solvers.insert(name.into(), Box::new(solver));
    }

    /// Makes `name` the fallback solver; unknown names are ignored.
    pub fn set_default_solver(&mut self, name: &str) {
        if self.solvers.contains_key(name) {
            self.default_solver = name.to_string();
        } else {
            warn!("unknown solver '{name}', keeping '{}'", self.default_solver);
        }
    }

    pub fn default_solver(&self) -> &str {
        &self.default_solver
    }

    pub fn solver(&self, name: &str) -> Option<&dyn TileSolver> {
        self.solvers.get(name).map(|s| s.as_ref())
    }

    /// Solver for `tile`: its own override when registered, else the default.
    fn solver_for(&self, tile: &Tile) -> Option<&dyn TileSolver> {
        tile.slope
            .as_ref()
            .and_then(|s| s.solver.as_deref())
            .and_then(|name| self.solver(name))
            .or_else(|| self.solver(&self.default_solver))
    }

    /// Gives the body a collision shape and, unless it has one, a default config.
    pub fn enable_body(&self, body: &mut Body) {
        self.enable_body_with(body, None);
    }

    pub fn enable_body_with(&self, body: &mut Body, config: Option<SlopesConfig>) {
        let shape = match body.radius {
            Some(radius) => BodyShape::Circle { radius },
            None => BodyShape::Polygon(ConvexPolygon::from_box(body.size.x, body.size.y)),
        };
        let config = config
            .or_else(|| body.slopes.take().map(|s| s.config))
            .unwrap_or_default();
        body.slopes = Some(BodySlopes::new(config, shape));
    }

    pub fn convert_layer(&self, layer: &mut TileLayer, mapping: &SlopeMapping) {
        self.factory.convert_layer(layer, mapping);
    }

    pub fn convert_layer_with_preset(&self, layer: &mut TileLayer, preset: &str, first_gid: Option<u32>) {
        self.factory.convert_layer_with_preset(layer, preset, first_gid);
    }

    /// Resolves the body against every sloped tile it touches in `layer`.
    pub fn collide_layer(&self, body: &mut Body, layer: &TileLayer, overlap_only: bool) -> bool {
        collide_body_vs_layer(self, body, layer, overlap_only)
    }
}

impl TileSolver for Slopes {
    fn collide(&self, body: &mut Body, layer: &TileLayer, tile: &Tile, overlap_only: bool) -> bool {
        match self.solver_for(tile) {
            Some(solver) => solver.collide(body, layer, tile, overlap_only),
            None => false,
        }
    }

    fn snap(&self, body: &mut Body, layer: &TileLayer, tiles: &[&Tile]) -> bool {
        match self.solver(&self.default_solver) {
            Some(solver) => solver.snap(body, layer, tiles),
            None => false,
        }
    }
}

/// Broad phase: gathers the tiles under the body (grown up and left by its
/// tile padding; the far edge stays where it is),
/// collides it with each sloped one and snaps when nothing was hit.
///
/// Tiles without a slope are left to the host engine.
pub fn collide_body_vs_layer(solver: &dyn TileSolver, body: &mut Body, layer: &TileLayer, overlap_only: bool) -> bool {
    let tiles = layer.tiles_in_rect(body.position - body.tile_padding, body.size + body.tile_padding);

    let mut collided = false;
    for tile in tiles.iter().filter(|t| t.slope.is_some()) {
        collided |= solver.collide(body, layer, tile, overlap_only);
    }

    if !collided && !overlap_only {
        solver.snap(body, layer, &tiles);
    }
    collided
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::slope::SlopeKind;
    use crate::types::Response;

    fn ground(slopes: &Slopes) -> TileLayer {
        // ninja ids: 2 = FULL, 3 = HALF_BOTTOM_LEFT
        let mut layer = TileLayer::from_rows(16.0, 16.0, &[
            vec![-1, -1, -1],
            vec![-1, -1, 3],
            vec![2, 2, 2],
        ]);
        slopes.convert_layer_with_preset(&mut layer, "ninja", None);
        layer
    }

    #[test]
    fn test_enable_body_shapes() {
        let slopes = Slopes::default();
        let mut boxy = Body::new(Vec2::ZERO, Vec2::new(8.0, 12.0));
        slopes.enable_body(&mut boxy);
        assert!(matches!(boxy.slopes.as_ref().unwrap().shape, BodyShape::Polygon(_)));

        let mut ball = Body::circle(Vec2::ZERO, 3.0);
        slopes.enable_body(&mut ball);
        assert!(ball.slopes.as_ref().unwrap().is_circle());
    }

    #[test]
    fn test_enable_body_keeps_config() {
        let slopes = Slopes::default();
        let mut body = Body::new(Vec2::ZERO, Vec2::ONE);
        let config = SlopesConfig { snap_down: 2.0, ..SlopesConfig::default() };
        slopes.enable_body_with(&mut body, Some(config.clone()));
        slopes.enable_body(&mut body);
        assert_eq!(body.config(), Some(&config));
    }

    #[test]
    fn test_layer_conversion_via_preset() {
        let slopes = Slopes::default();
        let layer = ground(&slopes);
        assert_eq!(layer.tile(2, 1).unwrap().slope.as_ref().unwrap().kind, SlopeKind::HalfBottomLeft);
        assert_eq!(layer.tile(0, 2).unwrap().slope.as_ref().unwrap().kind, SlopeKind::Full);

        let mut untouched = TileLayer::from_rows(16.0, 16.0, &[vec![2]]);
        slopes.convert_layer_with_preset(&mut untouched, "mario", None);
        assert!(untouched.tile(0, 0).unwrap().slope.is_none());
    }

    #[test]
    fn test_collide_layer_lands_body() {
        let slopes = Slopes::default();
        let layer = ground(&slopes);
        let mut body = Body::new(Vec2::new(2.0, 20.0), Vec2::new(8.0, 14.0)).with_velocity(Vec2::new(0.0, 120.0));
        slopes.enable_body(&mut body);

        assert!(slopes.collide_layer(&mut body, &layer, false));
        assert!((body.bottom() - 32.0).abs() < 1e-3);
        assert!(body.touching.down);
        assert!(body.velocity.y.abs() < 1e-3);
    }

    #[test]
    fn test_overlap_only_leaves_body() {
        let slopes = Slopes::default();
        let layer = ground(&slopes);
        let mut body = Body::new(Vec2::new(2.0, 20.0), Vec2::new(8.0, 14.0)).with_velocity(Vec2::new(0.0, 120.0));
        slopes.enable_body(&mut body);
        assert!(slopes.collide_layer(&mut body, &layer, true));
        assert_eq!(body.position, Vec2::new(2.0, 20.0));
    }

    #[test]
    fn test_snap_keeps_resting_body() {
        let slopes = Slopes::default();
        let layer = ground(&slopes);
        // resting exactly on the floor: no overlap, so the snap pass runs
        let mut body = Body::new(Vec2::new(2.0, 18.0), Vec2::new(8.0, 14.0));
        let config = SlopesConfig { snap_down: 4.0, ..SlopesConfig::default() };
        slopes.enable_body_with(&mut body, Some(config));
        assert!(!body.touching.down);

        assert!(!slopes.collide_layer(&mut body, &layer, false));
        assert!((body.bottom() - 32.0).abs() < 1e-3);
        assert!(body.touching.down);
    }

    struct Sticky;

    impl TileSolver for Sticky {
        fn collide(&self, body: &mut Body, _: &TileLayer, _: &Tile, _: bool) -> bool {
            body.velocity = Vec2::ZERO;
            true
        }

        fn snap(&self, _: &mut Body, _: &TileLayer, _: &[&Tile]) -> bool {
            false
        }
    }

    #[test]
    fn test_tile_solver_override() {
        let mut slopes = Slopes::default();
        slopes.register_solver("sticky", Sticky);
        let mut layer = ground(&slopes);
        if let Some(slope) = layer.tile_mut(0, 2).and_then(|t| t.slope.as_mut()) {
            slope.solver = Some("sticky".to_string());
        }

        let mut body = Body::new(Vec2::new(-20.0, 40.0), Vec2::new(8.0, 8.0)).with_velocity(Vec2::new(3.0, 0.0));
        slopes.enable_body(&mut body);
        assert!(slopes.collide(&mut body, &layer, layer.tile(0, 2).unwrap(), false));
        assert_eq!(body.velocity, Vec2::ZERO);

        slopes.set_default_solver("missing");
        assert_eq!(slopes.default_solver(), SAT);
        assert!(slopes.solver("sticky").is_some());
    }

    #[test]
    fn test_response_stored_after_layer_pass() {
        let slopes = Slopes::default();
        let layer = ground(&slopes);
        let mut body = Body::new(Vec2::new(2.0, 20.0), Vec2::new(8.0, 14.0)).with_velocity(Vec2::new(0.0, 120.0));
        slopes.enable_body(&mut body);
        slopes.collide_layer(&mut body, &layer, false);
        let response: Response = body.slopes.as_ref().and_then(|s| s.response).unwrap();
        assert!((response.overlap_n - Vec2::new(0.0, -1.0)).length() < 1e-4);
    }
}
