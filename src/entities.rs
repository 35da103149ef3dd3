//! All simulated actor types — pure data, no logic.

use crate::collision::Rect;

// ── Geometry primitives ──────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Per-tick displacement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Vec2 {
    pub dx: i32,
    pub dy: i32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { dx: 0, dy: 0 };

    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Size {
    pub w: i32,
    pub h: i32,
}

// ── Actor kinds ──────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActorKind {
    PlayerShip,
    PlayerBullet,
    AlienBullet,
    Alien,
    Shield,
    Bird,
    /// Position is (left edge, gap centre); the two boxes are derived from
    /// the screen height. See `compute::pipe_bounds`.
    Pipe,
    SnakeCell,
    Food,
    Ball,
    Paddle,
    Brick,
}

impl ActorKind {
    /// Bounding-box extent, constant per kind.
    ///
    /// Grid kinds (`SnakeCell`, `Food`) are one cell; `Pipe` reports its
    /// width and a zero height because its boxes depend on the playfield.
    pub const fn size(self) -> Size {
        match self {
            ActorKind::PlayerShip => Size { w: 11, h: 8 },
            ActorKind::PlayerBullet | ActorKind::AlienBullet => Size { w: 2, h: 5 },
            ActorKind::Alien => Size { w: 8, h: 8 },
            ActorKind::Shield => Size { w: 16, h: 8 },
            ActorKind::Bird => Size { w: 8, h: 8 },
            ActorKind::Pipe => Size { w: 15, h: 0 },
            ActorKind::SnakeCell | ActorKind::Food => Size { w: 1, h: 1 },
            ActorKind::Ball => Size { w: 2, h: 2 },
            ActorKind::Paddle => Size { w: 20, h: 2 },
            ActorKind::Brick => Size { w: 11, h: 5 },
        }
    }

    pub const fn is_projectile(self) -> bool {
        matches!(
            self,
            ActorKind::PlayerBullet | ActorKind::AlienBullet | ActorKind::Ball
        )
    }
}

// ── Actor ────────────────────────────────────────────────────────────────────

/// One simulated game object living in a pool slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Actor {
    pub pos: Point,
    pub vel: Vec2,
    pub active: bool,
    pub kind: ActorKind,
    /// Remaining hits. Only shields take more than one.
    pub health: u8,
}

impl Actor {
    pub const fn new(kind: ActorKind, pos: Point, vel: Vec2) -> Self {
        Self {
            pos,
            vel,
            active: true,
            kind,
            health: 1,
        }
    }

    /// An inactive placeholder used to fill empty pool slots.
    pub const fn dormant(kind: ActorKind) -> Self {
        Self {
            pos: Point::new(0, 0),
            vel: Vec2::ZERO,
            active: false,
            kind,
            health: 0,
        }
    }

    pub const fn with_health(mut self, health: u8) -> Self {
        self.health = health;
        self
    }

    pub fn bounds(&self) -> Rect {
        let size = self.kind.size();
        Rect::new(self.pos.x, self.pos.y, size.w, size.h)
    }
}
