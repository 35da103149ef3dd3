//! Paddle and ball against a wall of bricks.

use crate::collision::{reflect, resolve, strike_first, Axis, Outcome};
use crate::engine::{Game, TickContext};
use crate::entities::{Actor, ActorKind, Point, Vec2};
use crate::feedback::Cue;
use crate::pool::Pool;
use crate::render::{Scene, SceneLayout, Sprite};
use crate::surface::Color;

use super::LEVEL_PAUSE_MS;

pub const TITLE: &str = "BREAKOUT";

pub const PADDLE_SPEED: i32 = 2;
pub const BRICK_ROWS: usize = 5;
pub const BRICK_COLS: usize = 10;
pub const BRICK_PITCH_X: i32 = 12;
pub const BRICK_PITCH_Y: i32 = 7;
pub const BRICK_LEFT: i32 = 4;
pub const BRICK_TOP: i32 = 12;

const BRICK_COUNT: usize = BRICK_ROWS * BRICK_COLS;

const ROW_COLORS: [Color; BRICK_ROWS] = [
    Color::RED,
    Color::MAGENTA,
    Color::YELLOW,
    Color::GREEN,
    Color::CYAN,
];

const SLOT_BRICKS: usize = 0;
const SLOT_PADDLE: usize = SLOT_BRICKS + BRICK_COUNT;
const SLOT_BALL: usize = SLOT_PADDLE + 1;
const SLOT_SCORE: usize = SLOT_BALL + 1;
const SLOT_BANNER: usize = SLOT_SCORE + 1;
const SLOT_COUNT: usize = SLOT_BANNER + 1;

pub struct Breakout {
    width: i32,
    height: i32,
    paddle: Actor,
    ball: Actor,
    bricks: Pool<BRICK_COUNT>,
    score: u32,
    round_over: bool,
    wave_cleared: bool,
}

impl Breakout {
    pub fn new(width: i32, height: i32) -> Self {
        let mut game = Self {
            width,
            height,
            paddle: Actor::dormant(ActorKind::Paddle),
            ball: Actor::dormant(ActorKind::Ball),
            bricks: Pool::new(ActorKind::Brick),
            score: 0,
            round_over: false,
            wave_cleared: false,
        };
        game.init();
        game
    }

    pub fn paddle_y(&self) -> i32 {
        self.height - 10
    }

    fn serve(&mut self) {
        self.ball = Actor::new(
            ActorKind::Ball,
            Point::new(self.width / 2, self.height / 2),
            Vec2::new(1, -1),
        );
    }

    fn build_wall(&mut self) {
        for row in 0..BRICK_ROWS {
            for col in 0..BRICK_COLS {
                let pos = Point::new(
                    BRICK_LEFT + col as i32 * BRICK_PITCH_X,
                    BRICK_TOP + row as i32 * BRICK_PITCH_Y,
                );
                self.bricks
                    .place(row * BRICK_COLS + col, Actor::new(ActorKind::Brick, pos, Vec2::ZERO));
            }
        }
        self.wave_cleared = false;
    }

    fn move_paddle(&mut self, ctx: &TickContext) {
        let max_x = self.width - ActorKind::Paddle.size().w;
        if ctx.controls.left {
            self.paddle.pos.x = (self.paddle.pos.x - PADDLE_SPEED).max(0);
        }
        if ctx.controls.right {
            self.paddle.pos.x = (self.paddle.pos.x + PADDLE_SPEED).min(max_x);
        }
    }

    fn move_ball(&mut self, ctx: &mut TickContext) {
        let ball = &mut self.ball;
        ball.pos.x += ball.vel.dx;
        ball.pos.y += ball.vel.dy;

        let ball_w = ActorKind::Ball.size().w;
        if ball.pos.x <= 0 || ball.pos.x >= self.width - ball_w {
            reflect(ball, Axis::Horizontal);
        }
        if ball.pos.y <= 0 {
            reflect(ball, Axis::Vertical);
        }

        if self.ball.vel.dy > 0 && self.ball.bounds().overlaps(&self.paddle.bounds()) {
            resolve(&mut self.ball, &mut self.paddle, &mut self.score);
        }

        if let Some(Outcome::Scored(_)) =
            strike_first(&mut self.ball, self.bricks.slots_mut(), &mut self.score)
        {
            ctx.cue(Cue::Hit);
        }

        if self.ball.pos.y >= self.height {
            self.round_over = true;
            ctx.cue(Cue::GameOver);
        }
    }

    // ── Inspection ───────────────────────────────────────────────────────────

    pub fn ball(&self) -> &Actor {
        &self.ball
    }

    pub fn ball_mut(&mut self) -> &mut Actor {
        &mut self.ball
    }

    pub fn paddle(&self) -> &Actor {
        &self.paddle
    }

    pub fn paddle_mut(&mut self) -> &mut Actor {
        &mut self.paddle
    }

    pub fn bricks(&self) -> &Pool<BRICK_COUNT> {
        &self.bricks
    }

    pub fn bricks_mut(&mut self) -> &mut Pool<BRICK_COUNT> {
        &mut self.bricks
    }

    pub fn is_wave_cleared(&self) -> bool {
        self.wave_cleared
    }
}

impl Game for Breakout {
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
        let paddle_w = ActorKind::Paddle.size().w;
        self.paddle = Actor::new(
            ActorKind::Paddle,
            Point::new(self.width / 2 - paddle_w / 2, self.paddle_y()),
            Vec2::ZERO,
        );
        self.serve();
        self.build_wall();
        self.score = 0;
        self.round_over = false;
    }

    fn on_update_tick(&mut self, ctx: &mut TickContext) {
        if self.round_over {
            return;
        }
        if self.wave_cleared {
            self.build_wall();
            self.serve();
            return;
        }

        self.move_paddle(ctx);
        self.move_ball(ctx);
        if self.round_over {
            return;
        }

        if !self.bricks.any_active() {
            self.wave_cleared = true;
            ctx.cue(Cue::LevelComplete);
            ctx.hold(LEVEL_PAUSE_MS);
        }
    }

    fn on_render_tick(&self, scene: &mut Scene) {
        for (i, brick) in self.bricks.iter_active() {
            let color = ROW_COLORS[(i / BRICK_COLS) % BRICK_ROWS];
            scene.set(SLOT_BRICKS + i, Sprite::fill(brick.bounds(), color));
        }
        scene.set(SLOT_PADDLE, Sprite::fill(self.paddle.bounds(), Color::WHITE));
        scene.set(SLOT_BALL, Sprite::fill(self.ball.bounds(), Color::WHITE));
        scene.set(
            SLOT_SCORE,
            Sprite::text(2, 2, format!("Score: {}", self.score), Color::WHITE, 1),
        );
        if self.wave_cleared {
            scene.set(
                SLOT_BANNER,
                Sprite::text(20, 55, "LEVEL COMPLETE!", Color::GREEN, 1),
            );
        }
    }

    fn is_round_over(&self) -> bool {
        self.round_over
    }

    fn score(&self) -> u32 {
        self.score
    }
}
