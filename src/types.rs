use glam::Vec2;

/// Classification of one axis-aligned side of a tile.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum EdgeFlag {
    /// Internal seam: shares a boundary with another solid tile.
    Empty,
    /// Full flat side.
    #[default]
    Solid,
    /// Partial or sloped side; never merged away by the neighbour pass.
    Interesting,
}

/// Edge flags for the four sides of a tile.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Edges {
    pub top: EdgeFlag,
    pub bottom: EdgeFlag,
    pub left: EdgeFlag,
    pub right: EdgeFlag,
}

impl Edges {
    /// All four sides solid.
    pub const SOLID: Edges = Edges {
        top: EdgeFlag::Solid,
        bottom: EdgeFlag::Solid,
        left: EdgeFlag::Solid,
        right: EdgeFlag::Solid,
    };

    pub fn get(&self, side: Side) -> EdgeFlag {
        match side {
            Side::Top => self.top,
            Side::Bottom => self.bottom,
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub fn set(&mut self, side: Side, flag: EdgeFlag) {
        match side {
            Side::Top => self.top = flag,
            Side::Bottom => self.bottom = flag,
            Side::Left => self.left = flag,
            Side::Right => self.right = flag,
        }
    }
}

/// Which sides of a tile a body may collide with.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Faces {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Faces {
    pub fn all(collides: bool) -> Self {
        Self { up: collides, down: collides, left: collides, right: collides }
    }

    pub fn get(&self, side: Side) -> bool {
        match side {
            Side::Top => self.up,
            Side::Bottom => self.down,
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub fn set(&mut self, side: Side, collides: bool) {
        match side {
            Side::Top => self.up = collides,
            Side::Bottom => self.down = collides,
            Side::Left => self.left = collides,
            Side::Right => self.right = collides,
        }
    }
}

/// One of the four axis-aligned sides of a tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Top, Side::Bottom, Side::Left, Side::Right];

    pub fn opposite(self) -> Side {
        match self {
            Side::Top => Side::Bottom,
            Side::Bottom => Side::Top,
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Neighbour that shares this side.
    pub fn neighbour(self) -> Neighbour {
        match self {
            Side::Top => Neighbour::Above,
            Side::Bottom => Neighbour::Below,
            Side::Left => Neighbour::Left,
            Side::Right => Neighbour::Right,
        }
    }
}

/// The eight cells around a tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Neighbour {
    Above,
    Below,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Neighbour {
    pub const ALL: [Neighbour; 8] = [
        Neighbour::Above,
        Neighbour::Below,
        Neighbour::Left,
        Neighbour::Right,
        Neighbour::TopLeft,
        Neighbour::TopRight,
        Neighbour::BottomLeft,
        Neighbour::BottomRight,
    ];

    /// Grid offset (dx, dy) with y growing downwards.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Neighbour::Above => (0, -1),
            Neighbour::Below => (0, 1),
            Neighbour::Left => (-1, 0),
            Neighbour::Right => (1, 0),
            Neighbour::TopLeft => (-1, -1),
            Neighbour::TopRight => (1, -1),
            Neighbour::BottomLeft => (-1, 1),
            Neighbour::BottomRight => (1, 1),
        }
    }
}

/// World-space rectangle of a tile (top-left origin, y down).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TileRect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl TileRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { pos: Vec2::new(x, y), size: Vec2::new(width, height) }
    }

    pub fn left(&self) -> f32 {
        self.pos.x
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    pub fn top(&self) -> f32 {
        self.pos.y
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn width(&self) -> f32 {
        self.size.x
    }

    pub fn height(&self) -> f32 {
        self.size.y
    }
}

/// Representative line of a slope, in world coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Line {
    pub start: Vec2,
    pub end: Vec2,
}

impl Line {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { start: Vec2::new(x1, y1), end: Vec2::new(x2, y2) }
    }
}

/// Directional contact flags of a body.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Contacts {
    pub none: bool,
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Default for Contacts {
    fn default() -> Self {
        Self { none: true, up: false, down: false, left: false, right: false }
    }
}

/// Outcome of a SAT test between shape A and shape B.
///
/// `overlap_v` is the vector to subtract from A to separate it from B. The
/// solver inverts both vectors so that they point out of the tile.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Response {
    /// Penetration depth along `overlap_n` (>= 0 once resolved).
    pub overlap: f32,
    /// Unit axis of minimum penetration.
    pub overlap_n: Vec2,
    /// `overlap_n * overlap`.
    pub overlap_v: Vec2,
    /// A is fully contained in B.
    pub a_in_b: bool,
    /// B is fully contained in A.
    pub b_in_a: bool,
}

impl Default for Response {
    fn default() -> Self {
        Self {
            overlap: f32::MAX,
            overlap_n: Vec2::ZERO,
            overlap_v: Vec2::ZERO,
            a_in_b: true,
            b_in_a: true,
        }
    }
}

impl Response {
    /// Flip the overlap vectors so they face out of B.
    pub fn inverted(mut self) -> Self {
        self.overlap_n = -self.overlap_n;
        self.overlap_v = -self.overlap_v;
        self
    }
}
