use std::collections::HashMap;
use std::str::FromStr;

use glam::Vec2;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::SlopeError;
use crate::shapes::{ShapeFn, ShapeRegistry};
use crate::slope::{IntoSlopeKind, SlopeKind, TileSlope};
use crate::tilemap::TileLayer;
use crate::types::{EdgeFlag, Side, TileRect};

/// Named tileset conventions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MappingPreset {
    /// The Ninja Physics debug tileset.
    Ninja,
}

impl FromStr for MappingPreset {
    type Err = SlopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NINJA" | "1" => Ok(MappingPreset::Ninja),
            _ => Err(SlopeError::UnknownMapping(s.to_string())),
        }
    }
}

const NINJA: [(i64, SlopeKind); 25] = [
    (2, SlopeKind::Full),
    (3, SlopeKind::HalfBottomLeft),
    (4, SlopeKind::HalfBottomRight),
    (6, SlopeKind::HalfTopLeft),
    (5, SlopeKind::HalfTopRight),
    (15, SlopeKind::QuarterBottomLeftLow),
    (16, SlopeKind::QuarterBottomRightLow),
    (17, SlopeKind::QuarterTopRightLow),
    (18, SlopeKind::QuarterTopLeftLow),
    (19, SlopeKind::QuarterBottomLeftHigh),
    (20, SlopeKind::QuarterBottomRightHigh),
    (21, SlopeKind::QuarterTopRightHigh),
    (22, SlopeKind::QuarterTopLeftHigh),
    (23, SlopeKind::QuarterLeftBottomHigh),
    (24, SlopeKind::QuarterRightBottomHigh),
    (25, SlopeKind::QuarterRightTopLow),
    (26, SlopeKind::QuarterLeftTopLow),
    (27, SlopeKind::QuarterLeftBottomLow),
    (28, SlopeKind::QuarterRightBottomLow),
    (29, SlopeKind::QuarterRightTopHigh),
    (30, SlopeKind::QuarterLeftTopHigh),
    (31, SlopeKind::HalfBottom),
    (32, SlopeKind::HalfRight),
    (33, SlopeKind::HalfTop),
    (34, SlopeKind::HalfLeft),
];

/// Tile index to slope kind.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlopeMapping {
    entries: HashMap<u32, SlopeKind>,
}

impl SlopeMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, index: u32, kind: SlopeKind) -> &mut Self {
        self.entries.insert(index, kind);
        self
    }

    pub fn get(&self, index: u32) -> Option<SlopeKind> {
        self.entries.get(&index).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Mapping for a preset tileset whose first tile has index `first_gid`.
    pub fn preset(preset: MappingPreset, first_gid: Option<u32>) -> Self {
        let offset = first_gid.map_or(0, |gid| i64::from(gid) - 1);
        let mut mapping = Self::new();
        match preset {
            MappingPreset::Ninja => {
                for &(local, kind) in NINJA.iter() {
                    if let Ok(index) = u32::try_from(offset + local) {
                        mapping.insert(index, kind);
                    }
                }
            }
        }
        mapping
    }

    /// Parses a JSON object such as `{"2": "FULL", "3": 1}`.
    pub fn from_json(json: &str) -> Result<Self, SlopeError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl FromIterator<(u32, SlopeKind)> for SlopeMapping {
    fn from_iter<I: IntoIterator<Item = (u32, SlopeKind)>>(iter: I) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}

/// Builds tile slopes and classifies the edges of converted layers.
#[derive(Clone, Debug, Default)]
pub struct TileSlopeFactory {
    registry: ShapeRegistry,
}

impl TileSlopeFactory {
    pub fn new() -> Self {
        Self::with_registry(ShapeRegistry::standard())
    }

    pub fn with_registry(registry: ShapeRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ShapeRegistry {
        &self.registry
    }

    /// Replaces the constructor used for `kind`.
    pub fn define(&mut self, kind: SlopeKind, definition: ShapeFn) {
        self.registry.insert(kind, definition);
    }

    /// Builds the slope for a tile rectangle.
    pub fn try_create(&self, kind: impl IntoSlopeKind, rect: &TileRect) -> Result<TileSlope, SlopeError> {
        let kind = kind.into_slope_kind()?;
        let definition = self.registry.get(kind).ok_or(SlopeError::UndefinedSlope(kind))?;
        Ok(definition(kind, rect))
    }

    /// Like [`try_create`](Self::try_create), logging failures instead.
    pub fn create(&self, kind: impl IntoSlopeKind, rect: &TileRect) -> Option<TileSlope> {
        match self.try_create(kind, rect) {
            Ok(slope) => Some(slope),
            Err(err) => {
                warn!("{err}");
                None
            }
        }
    }

    /// Attaches slopes to every mapped tile, then classifies edges.
    pub fn convert_layer(&self, layer: &mut TileLayer, mapping: &SlopeMapping) {
        let mut converted = 0usize;
        for tile in layer.tiles_mut() {
            let Some(kind) = mapping.get(tile.index) else { continue };
            if let Some(slope) = self.create(kind, &tile.rect) {
                tile.slope = Some(slope);
                converted += 1;
            }
        }
        debug!("converted {converted} tiles to slopes");
        self.calculate_edges(layer);
    }

    /// Converts with a named preset; unknown presets leave the layer as is.
    pub fn convert_layer_with_preset(&self, layer: &mut TileLayer, preset: &str, first_gid: Option<u32>) {
        match preset.parse::<MappingPreset>() {
            Ok(preset) => self.convert_layer(layer, &SlopeMapping::preset(preset, first_gid)),
            Err(err) => warn!("tilemap could not be converted: {err}"),
        }
    }

    /// Single row-major pass comparing each side with the opposing side of
    /// its neighbour. Tiles already visited are compared with their updated
    /// flags.
    pub fn calculate_edges(&self, layer: &mut TileLayer) {
        for y in 0..layer.height() {
            for x in 0..layer.width() {
                if layer.tile(x, y).is_none_or(|t| t.slope.is_none()) {
                    continue;
                }
                for side in Side::ALL {
                    let Some(other) = layer.neighbour(x, y, side.neighbour()) else { continue };
                    let Some(other_slope) = other.slope.as_ref() else { continue };
                    let other_edge = other_slope.edges.get(side.opposite());
                    let (ox, oy) = (other.x, other.y);
                    if let Some(tile) = layer.tile_mut(x, y) {
                        if let Some(slope) = tile.slope.as_mut() {
                            let updated = compare_edges(slope.edges.get(side), other_edge);
                            slope.edges.set(side, updated);
                            tile.faces.set(side, updated != EdgeFlag::Empty);
                        }
                    }
                    flag_internal_vertices(layer, (x, y), (ox, oy));
                }
            }
        }
    }
}

/// Merged flag for `first` given the opposing `second` edge.
pub fn compare_edges(first: EdgeFlag, second: EdgeFlag) -> EdgeFlag {
    match (first, second) {
        (EdgeFlag::Solid, EdgeFlag::Solid) | (EdgeFlag::Solid, EdgeFlag::Empty) => EdgeFlag::Empty,
        _ => first,
    }
}

fn world_edges(pos: Vec2, slope: &TileSlope) -> Vec<(Vec2, Vec2)> {
    (0..slope.polygon.len()).map(|i| slope.polygon.world_edge(pos, i)).collect()
}

/// Flags the first vertex of every polygon edge the two tiles share exactly.
pub fn flag_internal_vertices(layer: &mut TileLayer, first: (usize, usize), second: (usize, usize)) {
    let (Some(a), Some(b)) = (layer.tile(first.0, first.1), layer.tile(second.0, second.1)) else { return };
    let (Some(sa), Some(sb)) = (a.slope.as_ref(), b.slope.as_ref()) else { return };
    let edges_a = world_edges(a.world_pos(), sa);
    let edges_b = world_edges(b.world_pos(), sb);

    let mut hits = Vec::new();
    for (i, &(a1, a2)) in edges_a.iter().enumerate() {
        for (j, &(b1, b2)) in edges_b.iter().enumerate() {
            if (a1 == b1 && a2 == b2) || (a1 == b2 && a2 == b1) {
                hits.push((i, j));
            }
        }
    }
    if hits.is_empty() {
        return;
    }

    for &(i, j) in &hits {
        if let Some(slope) = layer.tile_mut(first.0, first.1).and_then(|t| t.slope.as_mut()) {
            slope.polygon.set_internal(i);
        }
        if let Some(slope) = layer.tile_mut(second.0, second.1).and_then(|t| t.slope.as_mut()) {
            slope.polygon.set_internal(j);
        }
    }
}
