//! Axis-aligned bounding-box tests and the per-pair resolution table.

use crate::entities::{Actor, ActorKind};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub const fn right(&self) -> i32 {
        self.x + self.w
    }

    pub const fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub const fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Half-open intersection test. Rectangles that only share an edge do
    /// not overlap.
    pub const fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }

    /// Clip against another rectangle; `None` when the two do not overlap.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.overlaps(other) {
            return None;
        }
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Some(Rect::new(x, y, right - x, bottom - y))
    }
}

/// Index of the first active slot (in slot order) whose box overlaps
/// `probe`. Pool order is the tie-break when a projectile touches several
/// targets in one tick.
pub fn first_hit<'a, I>(probe: &Rect, slots: I) -> Option<usize>
where
    I: IntoIterator<Item = &'a Actor>,
{
    first_hit_by(probe, slots, Actor::bounds)
}

/// Like [`first_hit`] for kinds whose box is not `pos + kind.size()`.
pub fn first_hit_by<'a, I, F>(probe: &Rect, slots: I, bounds: F) -> Option<usize>
where
    I: IntoIterator<Item = &'a Actor>,
    F: Fn(&Actor) -> Rect,
{
    slots
        .into_iter()
        .position(|actor| actor.active && bounds(actor).overlaps(probe))
}

// ── Resolution policy ────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Obstacle and projectile both deactivated, score credited.
    Destroy { reward: u32 },
    /// Barrier loses one health, projectile deactivated.
    Erode,
    /// Obstacle destroyed and the moving actor bounces off it.
    Bounce { reward: u32, axis: Axis },
    /// Invert one velocity component of the moving actor.
    Reflect(Axis),
    LoseLife,
    RoundOver,
    Ignore,
}

pub const ALIEN_REWARD: u32 = 10;
pub const BRICK_REWARD: u32 = 10;
pub const FOOD_REWARD: u32 = 10;
pub const PIPE_REWARD: u32 = 1;

impl Resolution {
    /// What happens when `mover` overlaps `target`.
    pub const fn for_pair(mover: ActorKind, target: ActorKind) -> Resolution {
        use ActorKind::*;
        match (mover, target) {
            (PlayerBullet, Alien) => Resolution::Destroy {
                reward: ALIEN_REWARD,
            },
            (PlayerBullet, Brick) => Resolution::Destroy {
                reward: BRICK_REWARD,
            },
            (PlayerBullet | AlienBullet, Shield) => Resolution::Erode,
            (AlienBullet, PlayerShip) => Resolution::LoseLife,
            (Ball, Paddle) => Resolution::Reflect(Axis::Vertical),
            (Ball, Brick) => Resolution::Bounce {
                reward: BRICK_REWARD,
                axis: Axis::Vertical,
            },
            (Bird, Pipe) => Resolution::RoundOver,
            (SnakeCell, SnakeCell) => Resolution::RoundOver,
            (SnakeCell, Food) => Resolution::Destroy {
                reward: FOOD_REWARD,
            },
            _ => Resolution::Ignore,
        }
    }
}

/// What a resolved hit leaves for the game to act on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Ignored,
    Deflected,
    Eroded,
    Scored(u32),
    LifeLost,
    RoundOver,
}

/// Carry out `resolution` on the two actors. Projectile movers are spent by
/// anything that stops them; other movers (a snake head) keep going.
pub fn apply(
    resolution: Resolution,
    mover: &mut Actor,
    target: &mut Actor,
    score: &mut u32,
) -> Outcome {
    let spend = |mover: &mut Actor| {
        if mover.kind.is_projectile() {
            mover.active = false;
        }
    };
    match resolution {
        Resolution::Destroy { reward } => {
            target.active = false;
            spend(mover);
            *score = score.saturating_add(reward);
            Outcome::Scored(reward)
        }
        Resolution::Erode => {
            erode(target);
            spend(mover);
            Outcome::Eroded
        }
        Resolution::Bounce { reward, axis } => {
            target.active = false;
            reflect(mover, axis);
            *score = score.saturating_add(reward);
            Outcome::Scored(reward)
        }
        Resolution::Reflect(axis) => {
            reflect(mover, axis);
            Outcome::Deflected
        }
        Resolution::LoseLife => {
            spend(mover);
            Outcome::LifeLost
        }
        Resolution::RoundOver => Outcome::RoundOver,
        Resolution::Ignore => Outcome::Ignored,
    }
}

/// Look up and apply the policy for `mover` hitting `target`.
pub fn resolve(mover: &mut Actor, target: &mut Actor, score: &mut u32) -> Outcome {
    apply(Resolution::for_pair(mover.kind, target.kind), mover, target, score)
}

/// Resolve `mover` against the first target (in slot order) it overlaps.
pub fn strike_first(
    mover: &mut Actor,
    targets: &mut [Actor],
    score: &mut u32,
) -> Option<Outcome> {
    let hit = first_hit(&mover.bounds(), targets.iter())?;
    let target = targets.get_mut(hit)?;
    Some(resolve(mover, target, score))
}

/// Take one hit off a barrier; at zero health it goes inactive.
pub fn erode(actor: &mut Actor) {
    actor.health = actor.health.saturating_sub(1);
    if actor.health == 0 {
        actor.active = false;
    }
}

/// Flip one velocity component of `actor`.
pub fn reflect(actor: &mut Actor, axis: Axis) {
    match axis {
        Axis::Horizontal => actor.vel.dx = -actor.vel.dx,
        Axis::Vertical => actor.vel.dy = -actor.vel.dy,
    }
}
