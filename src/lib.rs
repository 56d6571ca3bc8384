//! slopes: sloped-tile collision for arcade platformers (SAT narrow phase,
//! seam restraint, snap and pull; integration stays with the host)

pub mod types;
pub mod api;
pub mod error;
pub mod narrowphase;
pub mod slope;
pub mod shapes;
pub mod factory;
pub mod tilemap;
pub mod body;
pub mod solver;
pub mod restrainer;
pub mod world;

pub use crate::types::*;
pub use crate::api::*;
pub use crate::error::SlopeError;
pub use crate::slope::{SlopeKind, TileSlope};
pub use crate::factory::{MappingPreset, SlopeMapping, TileSlopeFactory};
pub use crate::tilemap::{Tile, TileLayer};
pub use crate::body::{Body, BodyShape, BodySlopes, SlopesConfig};
pub use crate::solver::{SatOptions, SatSolver};
pub use crate::restrainer::SatRestrainer;
pub use crate::world::{Slopes, collide_body_vs_layer};
