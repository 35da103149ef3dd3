//! Pure movement rules shared by the games.
//!
//! Functions here mutate plain actors or slot slices and report what
//! happened; they never draw, buzz or score. Randomness comes in through an
//! injected `Rng` so callers control determinism.

use rand::Rng;

use crate::collision::Rect;
use crate::entities::{Actor, Point, Vec2};

// ── Free projectiles ─────────────────────────────────────────────────────────

/// Move `actor` by its velocity. Once its origin leaves `bounds` it is
/// deactivated. Returns whether the actor is still active.
pub fn step_projectile(actor: &mut Actor, bounds: &Rect) -> bool {
    if !actor.active {
        return false;
    }
    actor.pos.x += actor.vel.dx;
    actor.pos.y += actor.vel.dy;
    let p = actor.pos;
    if p.x < bounds.x || p.x > bounds.right() || p.y < bounds.y || p.y > bounds.bottom() {
        actor.active = false;
    }
    actor.active
}

// ── Wrapping ─────────────────────────────────────────────────────────────────

/// One step on a `cols × rows` torus.
pub fn wrap_step(head: Point, dir: Vec2, cols: i32, rows: i32) -> Point {
    Point::new(
        (head.x + dir.dx).rem_euclid(cols.max(1)),
        (head.y + dir.dy).rem_euclid(rows.max(1)),
    )
}

// ── Gravity ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GravityStep {
    Free,
    /// Hit the ceiling: pinned there with zero velocity.
    ClampedTop,
    /// Fell past the floor.
    Landed,
}

/// Vertical position and velocity of a falling body, in pixels and pixels
/// per tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GravityBody {
    pub y: f32,
    pub velocity: f32,
}

impl GravityBody {
    pub const fn new(y: f32) -> Self {
        Self { y, velocity: 0.0 }
    }

    pub fn accelerate(&mut self, gravity: f32) {
        self.velocity += gravity;
    }

    /// Replace the current velocity with an upward impulse.
    pub fn flap(&mut self, impulse: f32) {
        self.velocity = -impulse;
    }

    /// Move by the current velocity, clamping at `top` and reporting a
    /// crossing of `bottom`.
    pub fn advance(&mut self, top: f32, bottom: f32) -> GravityStep {
        let next = self.y + self.velocity;
        if next < top {
            self.y = top;
            self.velocity = 0.0;
            GravityStep::ClampedTop
        } else if next > bottom {
            self.y = bottom;
            GravityStep::Landed
        } else {
            self.y = next;
            GravityStep::Free
        }
    }

    pub fn step(&mut self, gravity: f32, top: f32, bottom: f32) -> GravityStep {
        self.accelerate(gravity);
        self.advance(top, bottom)
    }
}

// ── Lock-step formation ──────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormationStep {
    Marched,
    Dropped,
    ReachedFloor,
}

/// A group of actors that moves sideways together and steps down at the
/// edges, like an invader fleet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Formation {
    /// Horizontal pixels per step; the sign is the heading.
    pub direction: i32,
}

impl Default for Formation {
    fn default() -> Self {
        Self { direction: 1 }
    }
}

impl Formation {
    /// Advance every active member one step. When the leading edge has
    /// reached `left` or `right` the whole formation drops by `drop` instead
    /// and reverses, once for the whole sweep.
    pub fn step(
        &mut self,
        members: &mut [Actor],
        left: i32,
        right: i32,
        drop: i32,
        floor: i32,
    ) -> FormationStep {
        let extent = members
            .iter()
            .filter(|a| a.active)
            .map(Actor::bounds)
            .fold(None, |acc: Option<(i32, i32)>, b| {
                Some(acc.map_or((b.x, b.right()), |(l, r)| (l.min(b.x), r.max(b.right()))))
            });
        let Some((min_x, max_x)) = extent else {
            return FormationStep::Marched;
        };

        let at_edge = (max_x >= right && self.direction > 0) || (min_x <= left && self.direction < 0);
        for member in members.iter_mut().filter(|a| a.active) {
            if at_edge {
                member.pos.y += drop;
            } else {
                member.pos.x += self.direction;
            }
        }
        if at_edge {
            self.direction = -self.direction;
        }

        if members.iter().any(|a| a.active && a.bounds().bottom() >= floor) {
            FormationStep::ReachedFloor
        } else if at_edge {
            FormationStep::Dropped
        } else {
            FormationStep::Marched
        }
    }
}

// ── Respawn placement ────────────────────────────────────────────────────────

pub const MAX_RESAMPLE_ATTEMPTS: usize = 64;

/// Draw candidates from `sample` until one is not `forbidden`. After
/// `max_attempts` misses, ask `fallback` for a deterministic answer; `None`
/// means no valid value exists.
pub fn resample<T, R, S, F, B>(
    rng: &mut R,
    max_attempts: usize,
    mut sample: S,
    forbidden: F,
    fallback: B,
) -> Option<T>
where
    R: Rng + ?Sized,
    S: FnMut(&mut R) -> T,
    F: Fn(&T) -> bool,
    B: FnOnce() -> Option<T>,
{
    for _ in 0..max_attempts {
        let candidate = sample(rng);
        if !forbidden(&candidate) {
            return Some(candidate);
        }
    }
    fallback().filter(|candidate| !forbidden(candidate))
}

// ── Pipes ────────────────────────────────────────────────────────────────────

/// Upper and lower boxes of a pipe whose position is `(left, gap centre)`.
pub fn pipe_bounds(pipe: &Actor, gap: i32, screen_h: i32) -> [Rect; 2] {
    let width = pipe.kind.size().w;
    let half = gap / 2;
    let top_h = pipe.pos.y - half;
    let bottom_y = pipe.pos.y + half;
    [
        Rect::new(pipe.pos.x, 0, width, top_h),
        Rect::new(pipe.pos.x, bottom_y, width, screen_h - bottom_y),
    ]
}
