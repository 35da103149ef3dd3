//! Endless flyer: flap through an endless stream of pipe gaps.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::collision::{resolve, Outcome, PIPE_REWARD, Rect};
use crate::compute::{pipe_bounds, resample, GravityBody, GravityStep, MAX_RESAMPLE_ATTEMPTS};
use crate::engine::{Game, TickContext};
use crate::entities::{Actor, ActorKind, Point, Vec2};
use crate::feedback::Cue;
use crate::pool::Pool;
use crate::render::{Scene, SceneLayout, Sprite};
use crate::surface::Color;

pub const TITLE: &str = "FLAPPY BIRD";

pub const BIRD_X: i32 = 30;
pub const GRAVITY: f32 = 0.6;
pub const JUMP_IMPULSE: f32 = 5.0;
pub const PIPE_GAP: i32 = 35;
pub const PIPE_SPEED: i32 = 2;
pub const PIPE_COUNT: usize = 3;

const SLOT_PIPES: usize = 0;
const SLOT_BIRD: usize = SLOT_PIPES + 2 * PIPE_COUNT;
const SLOT_SCORE: usize = SLOT_BIRD + 1;
const SLOT_COUNT: usize = SLOT_SCORE + 1;

const K: Color = Color::BLACK;
const Y: Color = Color::YELLOW;

static BIRD_PIXELS: [Color; 64] = [
    K, Y, Y, Y, Y, Y, K, K,
    Y, Y, Y, Y, Y, Y, Y, K,
    Y, Y, Y, Y, Y, Y, Y, Y,
    Y, Y, Y, Y, Y, Y, Y, Y,
    Y, Y, Y, Y, Y, Y, Y, Y,
    Y, Y, Y, Y, Y, Y, Y, K,
    K, Y, Y, Y, Y, Y, K, K,
    K, K, Y, K, K, K, K, K,
];

pub struct Flyer {
    width: i32,
    height: i32,
    rng: StdRng,
    bird: GravityBody,
    pipes: Pool<PIPE_COUNT>,
    passed: [bool; PIPE_COUNT],
    score: u32,
    round_over: bool,
}

impl Flyer {
    pub fn new(seed: u64, width: i32, height: i32) -> Self {
        let mut game = Self {
            width,
            height,
            rng: StdRng::seed_from_u64(seed),
            bird: GravityBody::new(0.0),
            pipes: Pool::new(ActorKind::Pipe),
            passed: [false; PIPE_COUNT],
            score: 0,
            round_over: false,
        };
        game.init();
        game
    }

    fn bird_size() -> i32 {
        ActorKind::Bird.size().h
    }

    pub fn bird_bounds(&self) -> Rect {
        let size = ActorKind::Bird.size();
        Rect::new(BIRD_X, self.bird.y as i32, size.w, size.h)
    }

    /// Valid gap centres lie in `[PIPE_GAP, height - PIPE_GAP)`.
    fn gap_range(&self) -> (i32, i32) {
        let lo = PIPE_GAP;
        let hi = (self.height - PIPE_GAP).max(lo + 1);
        (lo, hi)
    }

    /// A gap centre drawn uniformly from the valid range.
    fn next_gap(&mut self) -> i32 {
        let (lo, hi) = self.gap_range();
        resample(
            &mut self.rng,
            MAX_RESAMPLE_ATTEMPTS,
            |rng| rng.gen_range(lo..hi),
            |gap| !(lo..hi).contains(gap),
            || Some((lo + hi) / 2),
        )
        .unwrap_or(lo)
    }

    fn rightmost_pipe(&self) -> Option<&Actor> {
        self.pipes.iter_active().map(|(_, p)| p).max_by_key(|p| p.pos.x)
    }

    fn move_pipes(&mut self, ctx: &mut TickContext) {
        let pipe_w = ActorKind::Pipe.size().w;
        let bird = self.bird_bounds();
        for i in 0..PIPE_COUNT {
            let Some(pipe) = self.pipes.get_mut(i) else {
                continue;
            };
            pipe.pos.x += pipe.vel.dx;

            if pipe.pos.x < -pipe_w {
                let max_x = self.rightmost_pipe().map_or(0, |p| p.pos.x);
                let x = (max_x.max(0) + self.width / 2).max(self.width);
                let gap = self.next_gap();
                if let Some(pipe) = self.pipes.get_mut(i) {
                    pipe.pos = Point::new(x, gap);
                }
                self.passed[i] = false;
            }

            let Some(pipe) = self.pipes.get_mut(i) else {
                continue;
            };
            let hit = pipe_bounds(pipe, PIPE_GAP, self.height)
                .iter()
                .any(|r| r.overlaps(&bird));
            if hit {
                let origin = Point::new(bird.x, bird.y);
                let mut flyer = Actor::new(ActorKind::Bird, origin, Vec2::ZERO);
                if resolve(&mut flyer, pipe, &mut self.score) == Outcome::RoundOver {
                    self.crash(ctx);
                    return;
                }
            }
            let Some(pipe) = self.pipes.get(i) else {
                continue;
            };
            if !self.passed[i] && bird.x > pipe.pos.x + pipe_w {
                self.passed[i] = true;
                self.score += PIPE_REWARD;
            }
        }
    }

    fn crash(&mut self, ctx: &mut TickContext) {
        self.round_over = true;
        ctx.cue(Cue::Crash);
    }

    // ── Inspection ───────────────────────────────────────────────────────────

    pub fn bird(&self) -> &GravityBody {
        &self.bird
    }

    pub fn bird_mut(&mut self) -> &mut GravityBody {
        &mut self.bird
    }

    pub fn pipes(&self) -> &Pool<PIPE_COUNT> {
        &self.pipes
    }

    pub fn pipes_mut(&mut self) -> &mut Pool<PIPE_COUNT> {
        &mut self.pipes
    }
}

impl Game for Flyer {
    fn title(&self) -> &'static str {
        TITLE
    }

    fn scene_layout(&self) -> SceneLayout {
        SceneLayout {
            sprite_slots: SLOT_COUNT,
            grid: None,
        }
    }

    fn init(&mut self) {
        self.bird = GravityBody::new((self.height / 2) as f32);
        self.score = 0;
        self.round_over = false;
        self.passed = [false; PIPE_COUNT];

        for i in 0..PIPE_COUNT {
            let gap = self.next_gap();
            let pos = Point::new(self.width + i as i32 * (self.width / 2), gap);
            self.pipes
                .place(i, Actor::new(ActorKind::Pipe, pos, Vec2::new(-PIPE_SPEED, 0)));
        }
    }

    fn on_update_tick(&mut self, ctx: &mut TickContext) {
        if self.round_over {
            return;
        }

        self.bird.accelerate(GRAVITY);
        if ctx.controls.pressed {
            self.bird.flap(JUMP_IMPULSE);
        }
        let floor = (self.height - Self::bird_size()) as f32;
        if self.bird.advance(0.0, floor) == GravityStep::Landed {
            self.crash(ctx);
            return;
        }

        self.move_pipes(ctx);
    }

    fn on_render_tick(&self, scene: &mut Scene) {
        for (i, pipe) in self.pipes.iter_active() {
            let [top, bottom] = pipe_bounds(pipe, PIPE_GAP, self.height);
            if !top.is_empty() {
                scene.set(SLOT_PIPES + 2 * i, Sprite::outline(top, Color::GREEN));
            }
            if !bottom.is_empty() {
                scene.set(SLOT_PIPES + 2 * i + 1, Sprite::outline(bottom, Color::GREEN));
            }
        }
        let bird = self.bird_bounds();
        scene.set(SLOT_BIRD, Sprite::pixmap(bird.x, bird.y, bird.w, &BIRD_PIXELS));
        scene.set(
            SLOT_SCORE,
            Sprite::text(5, 5, format!("Score: {}", self.score), Color::WHITE, 1),
        );
    }

    fn is_round_over(&self) -> bool {
        self.round_over
    }

    fn score(&self) -> u32 {
        self.score
    }
}
