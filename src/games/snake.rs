//! Grid snake on a wrapping 12×12 board.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::collision::{resolve, Outcome};
use crate::compute::{resample, wrap_step, MAX_RESAMPLE_ATTEMPTS};
use crate::engine::{Game, TickContext};
use crate::entities::{Actor, ActorKind, Point, Vec2};
use crate::pool::Pool;
use crate::render::{CellPaint, GridLayout, Scene, SceneLayout, Sprite};
use crate::surface::Color;

pub const TITLE: &str = "SNAKE";

pub const GRID_SIZE: i32 = 12;
pub const MAX_LENGTH: usize = 64;
pub const INITIAL_LENGTH: usize = 3;

pub const CELL_EMPTY: u8 = 0;
pub const CELL_BODY: u8 = 1;
pub const CELL_FOOD: u8 = 2;

static PALETTE: [CellPaint; 3] = [
    CellPaint {
        color: Color::BLACK,
        inset: 0,
    },
    CellPaint {
        color: Color::GREEN,
        inset: 1,
    },
    CellPaint {
        color: Color::RED,
        inset: 2,
    },
];

const SLOT_SCORE: usize = 0;
const SLOT_COUNT: usize = 1;

pub struct Snake {
    width: i32,
    height: i32,
    rng: StdRng,
    /// Slots `0..len` hold the body, head first.
    body: Pool<MAX_LENGTH>,
    len: usize,
    direction: Vec2,
    food: Option<Point>,
    score: u32,
    round_over: bool,
}

impl Snake {
    pub fn new(seed: u64, width: i32, height: i32) -> Self {
        let mut game = Self {
            width,
            height,
            rng: StdRng::seed_from_u64(seed),
            body: Pool::new(ActorKind::SnakeCell),
            len: 0,
            direction: Vec2::new(1, 0),
            food: None,
            score: 0,
            round_over: false,
        };
        game.init();
        game
    }

    pub fn grid_layout(&self) -> GridLayout {
        let cell = ((self.width - 4) / GRID_SIZE).min((self.height - 24) / GRID_SIZE).max(1);
        GridLayout {
            origin_x: (self.width - GRID_SIZE * cell) / 2,
            origin_y: 4,
            cell_w: cell,
            cell_h: cell,
            cols: GRID_SIZE as usize,
            rows: GRID_SIZE as usize,
            palette: &PALETTE,
        }
    }

    /// Body cells, head first.
    pub fn cells(&self) -> impl Iterator<Item = Point> + '_ {
        self.body.slots()[..self.len].iter().map(|a| a.pos)
    }

    pub fn head(&self) -> Point {
        self.body.slots()[0].pos
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn food(&self) -> Option<Point> {
        self.food
    }

    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    /// Replace the body, head first. Extra cells beyond `MAX_LENGTH` are
    /// ignored.
    pub fn set_body(&mut self, cells: &[Point], direction: Vec2) {
        self.body.clear();
        self.len = cells.len().min(MAX_LENGTH);
        for (i, &pos) in cells.iter().take(MAX_LENGTH).enumerate() {
            self.body.place(i, Actor::new(ActorKind::SnakeCell, pos, Vec2::ZERO));
        }
        self.direction = direction;
    }

    pub fn set_food(&mut self, food: Option<Point>) {
        self.food = food;
    }

    fn occupied(&self, p: &Point) -> bool {
        self.cells().any(|c| c == *p)
    }

    /// A free cell, or `None` when the snake covers the whole board.
    pub fn spawn_food(&mut self) -> Option<Point> {
        let occupied: Vec<Point> = self.cells().collect();
        let forbidden = |p: &Point| occupied.contains(p);
        resample(
            &mut self.rng,
            MAX_RESAMPLE_ATTEMPTS,
            |rng| Point::new(rng.gen_range(0..GRID_SIZE), rng.gen_range(0..GRID_SIZE)),
            forbidden,
            || {
                (0..GRID_SIZE)
                    .flat_map(|y| (0..GRID_SIZE).map(move |x| Point::new(x, y)))
                    .find(|p| !occupied.contains(p))
            },
        )
    }

    fn steer(&mut self, ctx: &TickContext) {
        let c = ctx.controls;
        let d = self.direction;
        if c.left && d.dx != 1 {
            self.direction = Vec2::new(-1, 0);
        } else if c.right && d.dx != -1 {
            self.direction = Vec2::new(1, 0);
        } else if c.up && d.dy != 1 {
            self.direction = Vec2::new(0, -1);
        } else if c.down && d.dy != -1 {
            self.direction = Vec2::new(0, 1);
        }
    }
}

impl Game for Snake {
    fn title(&self) -> &'static str {
        TITLE
    }

    fn scene_layout(&self) -> SceneLayout {
        SceneLayout {
            sprite_slots: SLOT_COUNT,
            grid: Some(self.grid_layout()),
        }
    }

    fn init(&mut self) {
        let start = GRID_SIZE / 2;
        let cells: Vec<Point> = (0..INITIAL_LENGTH as i32)
            .map(|i| Point::new(start - i, start))
            .collect();
        self.set_body(&cells, Vec2::new(1, 0));
        self.score = 0;
        self.round_over = false;
        self.food = self.spawn_food();
    }

    fn on_update_tick(&mut self, ctx: &mut TickContext) {
        if self.round_over {
            return;
        }
        self.steer(ctx);

        let head = wrap_step(self.head(), self.direction, GRID_SIZE, GRID_SIZE);
        let mut mover = Actor::new(ActorKind::SnakeCell, head, Vec2::ZERO);
        let bitten = self
            .body
            .slots()
            .iter()
            .take(self.len)
            .skip(1)
            .find(|cell| cell.pos == head)
            .copied();
        if let Some(mut body) = bitten {
            if resolve(&mut mover, &mut body, &mut self.score) == Outcome::RoundOver {
                self.round_over = true;
                return;
            }
        }

        let mut ate = false;
        if let Some(food) = self.food.filter(|&food| food == head) {
            let mut target = Actor::new(ActorKind::Food, food, Vec2::ZERO);
            ate = matches!(
                resolve(&mut mover, &mut target, &mut self.score),
                Outcome::Scored(_)
            );
        }

        let grows = ate && self.len < MAX_LENGTH;
        let new_len = if grows { self.len + 1 } else { self.len };
        let slots = self.body.slots_mut();
        for i in (1..new_len).rev() {
            slots[i] = slots[i - 1];
        }
        slots[0] = mover;
        self.len = new_len;

        if ate {
            self.food = self.spawn_food();
        }
    }

    fn on_render_tick(&self, scene: &mut Scene) {
        if let Some(grid) = scene.grid_mut() {
            for cell in self.cells() {
                grid.set(cell.x as usize, cell.y as usize, CELL_BODY);
            }
            if let Some(food) = self.food {
                if !self.occupied(&food) {
                    grid.set(food.x as usize, food.y as usize, CELL_FOOD);
                }
            }
        }
        scene.set(
            SLOT_SCORE,
            Sprite::text(2, self.height - 10, format!("Score: {}", self.score), Color::WHITE, 1),
        );
    }

    fn is_round_over(&self) -> bool {
        self.round_over
    }

    fn score(&self) -> u32 {
        self.score
    }
}
