use std::collections::HashMap;
use std::fmt;

use glam::Vec2;

use crate::body::Body;
use crate::slope::TileSlope;
use crate::types::{Faces, Neighbour, TileRect};

/// Collision callback; returning false vetoes separation.
pub type TileCallback = Box<dyn Fn(&Body, &Tile) -> bool>;

/// One cell of a tile layer.
#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    /// Tileset index.
    pub index: u32,
    /// Grid column.
    pub x: usize,
    /// Grid row.
    pub y: usize,
    pub rect: TileRect,
    pub collides: bool,
    /// Per-side collision; sides facing a merged seam are switched off when
    /// the layer is converted.
    pub faces: Faces,
    pub slope: Option<TileSlope>,
}

impl Tile {
    pub fn world_pos(&self) -> Vec2 {
        self.rect.pos
    }

    pub fn left(&self) -> f32 {
        self.rect.left()
    }

    pub fn right(&self) -> f32 {
        self.rect.right()
    }

    pub fn top(&self) -> f32 {
        self.rect.top()
    }

    pub fn bottom(&self) -> f32 {
        self.rect.bottom()
    }
}

/// Grid of tiles owned in a flat arena.
///
/// Neighbours are found by index arithmetic, so tiles never hold references to
/// each other. Callbacks live beside the grid: per tile index (layer level)
/// and per cell (tile level).
pub struct TileLayer {
    width: usize,
    height: usize,
    tile_size: Vec2,
    origin: Vec2,
    tiles: Vec<Option<Tile>>,
    index_callbacks: HashMap<u32, TileCallback>,
    tile_callbacks: HashMap<(usize, usize), TileCallback>,
}

impl fmt::Debug for TileLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TileLayer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("tile_size", &self.tile_size)
            .field("origin", &self.origin)
            .field("tiles", &self.tiles.iter().flatten().count())
            .field("index_callbacks", &self.index_callbacks.len())
            .field("tile_callbacks", &self.tile_callbacks.len())
            .finish()
    }
}

impl TileLayer {
    pub fn new(width: usize, height: usize, tile_width: f32, tile_height: f32) -> Self {
        Self {
            width,
            height,
            tile_size: Vec2::new(tile_width, tile_height),
            origin: Vec2::ZERO,
            tiles: vec![None; width * height],
            index_callbacks: HashMap::new(),
            tile_callbacks: HashMap::new(),
        }
    }

    /// Builds a layer from rows of tile indices; negative entries are empty.
    pub fn from_rows(tile_width: f32, tile_height: f32, rows: &[Vec<i32>]) -> Self {
        let height = rows.len();
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut layer = Self::new(width, height, tile_width, tile_height);
        for (y, row) in rows.iter().enumerate() {
            for (x, &index) in row.iter().enumerate() {
                if let Ok(index) = u32::try_from(index) {
                    layer.put_tile(x, y, index);
                }
            }
        }
        layer
    }

    /// Moves the layer's top-left corner; existing tiles follow.
    pub fn with_origin(mut self, origin: Vec2) -> Self {
        let delta = origin - self.origin;
        self.origin = origin;
        for tile in self.tiles.iter_mut().flatten() {
            tile.rect.pos += delta;
        }
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tile_size(&self) -> Vec2 {
        self.tile_size
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    fn slot(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    /// Places a colliding tile, replacing whatever was in the cell.
    pub fn put_tile(&mut self, x: usize, y: usize, index: u32) -> Option<&mut Tile> {
        let slot = self.slot(x, y)?;
        let pos = self.origin + Vec2::new(x as f32, y as f32) * self.tile_size;
        let rect = TileRect { pos, size: self.tile_size };
        self.tiles[slot] = Some(Tile { index, x, y, rect, collides: true, faces: Faces::all(true), slope: None });
        self.tiles[slot].as_mut()
    }

    pub fn remove_tile(&mut self, x: usize, y: usize) -> Option<Tile> {
        let slot = self.slot(x, y)?;
        self.tile_callbacks.remove(&(x, y));
        self.tiles[slot].take()
    }

    pub fn tile(&self, x: usize, y: usize) -> Option<&Tile> {
        self.slot(x, y).and_then(|s| self.tiles[s].as_ref())
    }

    pub fn tile_mut(&mut self, x: usize, y: usize) -> Option<&mut Tile> {
        self.slot(x, y).and_then(|s| self.tiles[s].as_mut())
    }

    /// Adjacent tile in `direction`; `None` off the grid or for empty cells.
    pub fn neighbour(&self, x: usize, y: usize, direction: Neighbour) -> Option<&Tile> {
        let (dx, dy) = direction.offset();
        let nx = x.checked_add_signed(dx as isize)?;
        let ny = y.checked_add_signed(dy as isize)?;
        self.tile(nx, ny)
    }

    /// All tiles in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().flatten()
    }

    pub fn tiles_mut(&mut self) -> impl Iterator<Item = &mut Tile> {
        self.tiles.iter_mut().flatten()
    }

    /// Tiles whose cells touch the world rectangle at `pos` with `size`.
    pub fn tiles_in_rect(&self, pos: Vec2, size: Vec2) -> Vec<&Tile> {
        if self.width == 0 || self.height == 0 {
            return Vec::new();
        }
        let local_min = (pos - self.origin) / self.tile_size;
        let local_max = (pos + size - self.origin) / self.tile_size;
        if local_max.x < 0.0 || local_max.y < 0.0 {
            return Vec::new();
        }
        let x0 = local_min.x.floor().max(0.0) as usize;
        let y0 = local_min.y.floor().max(0.0) as usize;
        let x1 = (local_max.x.floor() as usize).min(self.width - 1);
        let y1 = (local_max.y.floor() as usize).min(self.height - 1);
        let mut out = Vec::new();
        for y in y0..=y1 {
            for x in x0..=x1 {
                if let Some(tile) = self.tile(x, y) {
                    out.push(tile);
                }
            }
        }
        out
    }

    /// Sets the `collides` flag and all faces of every tile with one of `indices`.
    pub fn set_collision(&mut self, indices: &[u32], collides: bool) {
        for tile in self.tiles_mut() {
            if indices.contains(&tile.index) {
                tile.collides = collides;
                tile.faces = Faces::all(collides);
            }
        }
    }

    /// Layer-level callback for every tile with `index`.
    pub fn set_index_callback(&mut self, index: u32, callback: impl Fn(&Body, &Tile) -> bool + 'static) {
        self.index_callbacks.insert(index, Box::new(callback));
    }

    /// Callback for the single tile at (`x`, `y`).
    pub fn set_tile_callback(&mut self, x: usize, y: usize, callback: impl Fn(&Body, &Tile) -> bool + 'static) {
        self.tile_callbacks.insert((x, y), Box::new(callback));
    }

    pub fn index_callback(&self, index: u32) -> Option<&TileCallback> {
        self.index_callbacks.get(&index)
    }

    pub fn tile_callback(&self, x: usize, y: usize) -> Option<&TileCallback> {
        self.tile_callbacks.get(&(x, y))
    }
}
