use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::narrowphase::ConvexPolygon;
use crate::types::{Contacts, Response};

/// Per-body tuning for slope interaction.
///
/// Zero means "off" for every pull and snap value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlopesConfig {
    /// Subtracted from the tangential velocity retained after a contact.
    pub friction: Vec2,
    /// Separate along Y only when possible.
    pub prefer_y: bool,
    pub pull_up: f32,
    pub pull_down: f32,
    pub pull_left: f32,
    pub pull_right: f32,
    pub pull_top_left: f32,
    pub pull_top_right: f32,
    pub pull_bottom_left: f32,
    pub pull_bottom_right: f32,
    pub snap_up: f32,
    pub snap_down: f32,
    pub snap_left: f32,
    pub snap_right: f32,
}

impl Default for SlopesConfig {
    fn default() -> Self {
        Self {
            friction: Vec2::ZERO,
            prefer_y: false,
            pull_up: 0.0,
            pull_down: 0.0,
            pull_left: 0.0,
            pull_right: 0.0,
            pull_top_left: 0.0,
            pull_top_right: 0.0,
            pull_bottom_left: 0.0,
            pull_bottom_right: 0.0,
            snap_up: 0.0,
            snap_down: 0.0,
            snap_left: 0.0,
            snap_right: 0.0,
        }
    }
}

impl SlopesConfig {
    pub fn has_pull(&self) -> bool {
        [
            self.pull_up,
            self.pull_down,
            self.pull_left,
            self.pull_right,
            self.pull_top_left,
            self.pull_top_right,
            self.pull_bottom_left,
            self.pull_bottom_right,
        ]
        .iter()
        .any(|p| *p != 0.0)
    }

    pub fn has_snap(&self) -> bool {
        self.snap_up != 0.0 || self.snap_down != 0.0 || self.snap_left != 0.0 || self.snap_right != 0.0
    }
}

/// Collision shape of a body, relative to its top-left corner.
#[derive(Clone, Debug, PartialEq)]
pub enum BodyShape {
    Polygon(ConvexPolygon),
    /// Circle centred on the body's half extents.
    Circle { radius: f32 },
}

/// Slope state owned by a body once it has been enabled.
#[derive(Clone, Debug, PartialEq)]
pub struct BodySlopes {
    pub config: SlopesConfig,
    pub shape: BodyShape,
    /// Velocity cached at the start of each collision check.
    pub velocity: Vec2,
    /// Outward-facing response of the last resolved overlap.
    pub response: Option<Response>,
}

impl BodySlopes {
    pub fn new(config: SlopesConfig, shape: BodyShape) -> Self {
        Self { config, shape, velocity: Vec2::ZERO, response: None }
    }

    pub fn is_circle(&self) -> bool {
        matches!(self.shape, BodyShape::Circle { .. })
    }
}

/// Physics body as seen by the slope solver.
///
/// Integration (gravity, drag, moving by velocity) belongs to the host; the
/// solver only corrects `position` and `velocity` and updates contact flags.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    /// Top-left corner.
    pub position: Vec2,
    pub size: Vec2,
    pub radius: Option<f32>,
    pub velocity: Vec2,
    pub bounce: Vec2,
    pub enable: bool,
    /// Extra margin used when gathering candidate tiles.
    pub tile_padding: Vec2,
    /// Raw overlap vector of the last resolved contact.
    pub overlap: Vec2,
    pub touching: Contacts,
    pub was_touching: Contacts,
    pub blocked: Contacts,
    pub slopes: Option<BodySlopes>,
}

impl Body {
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            size,
            radius: None,
            velocity: Vec2::ZERO,
            bounce: Vec2::ZERO,
            enable: true,
            tile_padding: Vec2::ZERO,
            overlap: Vec2::ZERO,
            touching: Contacts::default(),
            was_touching: Contacts::default(),
            blocked: Contacts::default(),
            slopes: None,
        }
    }

    /// Circular body whose bounding square starts at `position`.
    pub fn circle(position: Vec2, radius: f32) -> Self {
        let mut body = Self::new(position, Vec2::splat(radius * 2.0));
        body.radius = Some(radius);
        body
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_bounce(mut self, bounce: Vec2) -> Self {
        self.bounce = bounce;
        self
    }

    pub fn is_circle(&self) -> bool {
        self.radius.is_some()
    }

    pub fn left(&self) -> f32 {
        self.position.x
    }

    pub fn right(&self) -> f32 {
        self.position.x + self.size.x
    }

    pub fn top(&self) -> f32 {
        self.position.y
    }

    pub fn bottom(&self) -> f32 {
        self.position.y + self.size.y
    }

    pub fn half_size(&self) -> Vec2 {
        self.size * 0.5
    }

    pub fn center(&self) -> Vec2 {
        self.position + self.half_size()
    }

    pub fn config(&self) -> Option<&SlopesConfig> {
        self.slopes.as_ref().map(|s| &s.config)
    }

    pub fn config_mut(&mut self) -> Option<&mut SlopesConfig> {
        self.slopes.as_mut().map(|s| &mut s.config)
    }

    /// Clears contact flags; the host calls this once per physics step.
    pub fn reset_contacts(&mut self) {
        self.was_touching = self.touching;
        self.touching = Contacts::default();
        self.blocked = Contacts::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        let b = Body::new(Vec2::new(10.0, 20.0), Vec2::new(16.0, 24.0));
        assert_eq!(b.left(), 10.0);
        assert_eq!(b.right(), 26.0);
        assert_eq!(b.top(), 20.0);
        assert_eq!(b.bottom(), 44.0);
        assert_eq!(b.center(), Vec2::new(18.0, 32.0));
        assert!(b.enable);
        assert!(b.touching.none);
    }

    #[test]
    fn test_circle_body_size() {
        let b = Body::circle(Vec2::ZERO, 5.0);
        assert!(b.is_circle());
        assert_eq!(b.size, Vec2::splat(10.0));
        assert_eq!(b.center(), Vec2::splat(5.0));
    }

    #[test]
    fn test_config_defaults_from_json() {
        let cfg: SlopesConfig = serde_json::from_str(r#"{ "pull_down": 3.0, "snap_down": 2.0 }"#).unwrap();
        assert_eq!(cfg.pull_down, 3.0);
        assert_eq!(cfg.snap_down, 2.0);
        assert_eq!(cfg.friction, Vec2::ZERO);
        assert!(cfg.has_pull());
        assert!(cfg.has_snap());
        assert!(!SlopesConfig::default().has_pull());
    }

    #[test]
    fn test_reset_contacts_keeps_previous() {
        let mut b = Body::new(Vec2::ZERO, Vec2::ONE);
        b.touching.down = true;
        b.touching.none = false;
        b.blocked.down = true;
        b.reset_contacts();
        assert!(b.was_touching.down);
        assert!(!b.touching.down);
        assert!(b.touching.none);
        assert!(!b.blocked.down);
    }
}
