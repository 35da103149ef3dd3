//! Fixed-shooter: a marching alien fleet, three shields and a cannon.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::collision::{resolve, strike_first, Outcome, Rect};
use crate::compute::{step_projectile, Formation, FormationStep};
use crate::engine::{Game, TickContext};
use crate::entities::{Actor, ActorKind, Point, Vec2};
use crate::feedback::Cue;
use crate::pool::Pool;
use crate::render::{Scene, SceneLayout, Sprite};
use crate::surface::{Bitmap, Color};

use super::LEVEL_PAUSE_MS;

pub const TITLE: &str = "SPACE INVADERS";

pub const PLAYER_SPEED: i32 = 2;
pub const BULLET_SPEED: i32 = 3;
pub const ALIEN_ROWS: usize = 3;
pub const ALIEN_COLS: usize = 6;
pub const ALIEN_SPACING: i32 = 12;
pub const ALIEN_DROP: i32 = 8;
/// Gap kept between the fleet and the side walls.
pub const EDGE_MARGIN: i32 = 2;
pub const START_LIVES: u8 = 3;
pub const SHIELD_HEALTH: u8 = 3;

pub const FORMATION_STEP_MS: u64 = 500;
pub const SHOT_DEBOUNCE_MS: u64 = 200;
pub const ALIEN_SHOT_COOLDOWN_MS: u64 = 800;
/// Percent chance of an alien shot on each formation step.
pub const ALIEN_SHOT_CHANCE: u32 = 30;

const ALIEN_COUNT: usize = ALIEN_ROWS * ALIEN_COLS;
const SHIELD_COUNT: usize = 3;
const PLAYER_BULLETS: usize = 3;
const ALIEN_BULLETS: usize = 2;

// Scene slots, back to front.
const SLOT_PLAYER: usize = 0;
const SLOT_SHIELDS: usize = 1;
const SLOT_ALIENS: usize = SLOT_SHIELDS + SHIELD_COUNT;
const SLOT_BULLETS: usize = SLOT_ALIENS + ALIEN_COUNT;
const SLOT_ALIEN_BULLETS: usize = SLOT_BULLETS + PLAYER_BULLETS;
const SLOT_SCORE: usize = SLOT_ALIEN_BULLETS + ALIEN_BULLETS;
const SLOT_LIVES: usize = SLOT_SCORE + 1;
const SLOT_BANNER: usize = SLOT_LIVES + 1;
const SLOT_COUNT: usize = SLOT_BANNER + 1;

static PLAYER_BITMAP: Bitmap = Bitmap {
    width: 11,
    height: 8,
    data: &[
        0b0000_1000, 0b0000_0000,
        0b0001_1100, 0b0000_0000,
        0b0011_1110, 0b0000_0000,
        0b0111_1111, 0b0000_0000,
        0b1111_1111, 0b1000_0000,
        0b1111_1111, 0b1000_0000,
        0b1111_1111, 0b1000_0000,
        0b1111_1111, 0b1000_0000,
    ],
};

static ALIEN_BITMAP: Bitmap = Bitmap {
    width: 8,
    height: 8,
    data: &[
        0b0001_1000,
        0b0011_1100,
        0b0111_1110,
        0b1101_1011,
        0b1111_1111,
        0b0010_0100,
        0b0101_1010,
        0b1000_0001,
    ],
};

/// Shield colour by remaining health.
pub fn shield_color(health: u8) -> Option<Color> {
    match health {
        0 => None,
        1 => Some(Color::RED),
        2 => Some(Color::YELLOW),
        _ => Some(Color::GREEN),
    }
}

pub struct Invaders {
    width: i32,
    height: i32,
    rng: StdRng,
    player: Actor,
    bullets: Pool<PLAYER_BULLETS>,
    alien_bullets: Pool<ALIEN_BULLETS>,
    aliens: Pool<ALIEN_COUNT>,
    shields: Pool<SHIELD_COUNT>,
    formation: Formation,
    score: u32,
    lives: u8,
    round_over: bool,
    wave_cleared: bool,
    last_step_ms: Option<u64>,
    last_shot_ms: Option<u64>,
    last_alien_shot_ms: Option<u64>,
}

impl Invaders {
    pub fn new(seed: u64, width: i32, height: i32) -> Self {
        let mut game = Self {
            width,
            height,
            rng: StdRng::seed_from_u64(seed),
            player: Actor::new(ActorKind::PlayerShip, Point::default(), Vec2::ZERO),
            bullets: Pool::new(ActorKind::PlayerBullet),
            alien_bullets: Pool::new(ActorKind::AlienBullet),
            aliens: Pool::new(ActorKind::Alien),
            shields: Pool::new(ActorKind::Shield),
            formation: Formation::default(),
            score: 0,
            lives: START_LIVES,
            round_over: false,
            wave_cleared: false,
            last_step_ms: None,
            last_shot_ms: None,
            last_alien_shot_ms: None,
        };
        game.init();
        game
    }

    /// Top edge of the cannon.
    pub fn player_y(&self) -> i32 {
        self.height - ActorKind::PlayerShip.size().h - 10
    }

    fn reset_wave(&mut self) {
        for row in 0..ALIEN_ROWS {
            for col in 0..ALIEN_COLS {
                let pos = Point::new(
                    10 + col as i32 * ALIEN_SPACING,
                    15 + row as i32 * ALIEN_SPACING,
                );
                self.aliens
                    .place(row * ALIEN_COLS + col, Actor::new(ActorKind::Alien, pos, Vec2::ZERO));
            }
        }
        let shield_w = ActorKind::Shield.size().w;
        let spacing = (self.width - 40) / (SHIELD_COUNT as i32 - 1);
        for i in 0..SHIELD_COUNT {
            let centre = 20 + i as i32 * spacing;
            let pos = Point::new(centre - shield_w / 2, self.height - 30);
            self.shields.place(
                i,
                Actor::new(ActorKind::Shield, pos, Vec2::ZERO).with_health(SHIELD_HEALTH),
            );
        }
        self.bullets.clear();
        self.alien_bullets.clear();
        self.formation = Formation::default();
        self.last_step_ms = None;
        self.wave_cleared = false;
    }

    fn move_player(&mut self, ctx: &TickContext) {
        let max_x = self.width - ActorKind::PlayerShip.size().w;
        if ctx.controls.left {
            self.player.pos.x = (self.player.pos.x - PLAYER_SPEED).max(0);
        }
        if ctx.controls.right {
            self.player.pos.x = (self.player.pos.x + PLAYER_SPEED).min(max_x);
        }
    }

    fn fire(&mut self, ctx: &mut TickContext) {
        let ready = self
            .last_shot_ms
            .map_or(true, |last| ctx.now_ms.saturating_sub(last) > SHOT_DEBOUNCE_MS);
        if !ctx.controls.pressed || !ready {
            return;
        }
        let ship_w = ActorKind::PlayerShip.size().w;
        let bullet_w = ActorKind::PlayerBullet.size().w;
        let pos = Point::new(self.player.pos.x + ship_w / 2 - bullet_w / 2, self.player.pos.y);
        let bullet = Actor::new(ActorKind::PlayerBullet, pos, Vec2::new(0, -BULLET_SPEED));
        if self.bullets.spawn(bullet).is_some() {
            self.last_shot_ms = Some(ctx.now_ms);
            ctx.cue(Cue::Shot);
        }
    }

    fn playfield(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    fn update_player_bullets(&mut self, ctx: &mut TickContext) {
        let field = self.playfield();
        for i in 0..PLAYER_BULLETS {
            let Some(bullet) = self.bullets.get_mut(i) else {
                continue;
            };
            if !step_projectile(bullet, &field) {
                continue;
            }
            let outcome = match strike_first(bullet, self.aliens.slots_mut(), &mut self.score) {
                Some(outcome) => Some(outcome),
                None => strike_first(bullet, self.shields.slots_mut(), &mut self.score),
            };
            if let Some(Outcome::Scored(_)) = outcome {
                ctx.cue(Cue::Hit);
            }
        }
    }

    fn update_alien_bullets(&mut self, ctx: &mut TickContext) {
        let field = self.playfield();
        for i in 0..ALIEN_BULLETS {
            let Some(bullet) = self.alien_bullets.get_mut(i) else {
                continue;
            };
            if !step_projectile(bullet, &field) {
                continue;
            }
            let outcome = if bullet.bounds().overlaps(&self.player.bounds()) {
                Some(resolve(bullet, &mut self.player, &mut self.score))
            } else {
                strike_first(bullet, self.shields.slots_mut(), &mut self.score)
            };
            if outcome == Some(Outcome::LifeLost) {
                self.lose_life(ctx);
            }
        }
    }

    fn lose_life(&mut self, ctx: &mut TickContext) {
        self.lives = self.lives.saturating_sub(1);
        ctx.cue(Cue::PlayerHit);
        if self.lives == 0 {
            self.end_round(ctx);
        }
    }

    fn end_round(&mut self, ctx: &mut TickContext) {
        if !self.round_over {
            self.round_over = true;
            ctx.cue(Cue::GameOver);
        }
    }

    fn march(&mut self, ctx: &mut TickContext) {
        let last = *self.last_step_ms.get_or_insert(ctx.now_ms);
        if ctx.now_ms.saturating_sub(last) <= FORMATION_STEP_MS {
            return;
        }
        self.last_step_ms = Some(ctx.now_ms);

        let player_y = self.player_y();
        let step = self.formation.step(
            self.aliens.slots_mut(),
            EDGE_MARGIN,
            self.width - EDGE_MARGIN,
            ALIEN_DROP,
            player_y,
        );
        if step == FormationStep::ReachedFloor {
            self.end_round(ctx);
            return;
        }

        let cooled = self.last_alien_shot_ms.map_or(true, |last| {
            ctx.now_ms.saturating_sub(last) > ALIEN_SHOT_COOLDOWN_MS
        });
        if self.rng.gen_range(0..100) < ALIEN_SHOT_CHANCE && cooled {
            self.alien_fire();
            self.last_alien_shot_ms = Some(ctx.now_ms);
        }
    }

    fn alien_fire(&mut self) {
        let alive: Vec<usize> = self.aliens.iter_active().map(|(i, _)| i).collect();
        if alive.is_empty() {
            return;
        }
        let shooter = alive[self.rng.gen_range(0..alive.len())];
        let Some(alien) = self.aliens.get(shooter) else {
            return;
        };
        let alien_size = ActorKind::Alien.size();
        let bullet_w = ActorKind::AlienBullet.size().w;
        let pos = Point::new(
            alien.pos.x + alien_size.w / 2 - bullet_w / 2,
            alien.pos.y + alien_size.h,
        );
        self.alien_bullets
            .spawn(Actor::new(ActorKind::AlienBullet, pos, Vec2::new(0, BULLET_SPEED)));
    }

    // ── Inspection ───────────────────────────────────────────────────────────

    pub fn lives(&self) -> u8 {
        self.lives
    }

    pub fn player(&self) -> &Actor {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Actor {
        &mut self.player
    }

    pub fn aliens(&self) -> &Pool<ALIEN_COUNT> {
        &self.aliens
    }

    pub fn aliens_mut(&mut self) -> &mut Pool<ALIEN_COUNT> {
        &mut self.aliens
    }

    pub fn shields(&self) -> &Pool<SHIELD_COUNT> {
        &self.shields
    }

    pub fn bullets(&self) -> &Pool<PLAYER_BULLETS> {
        &self.bullets
    }

    pub fn bullets_mut(&mut self) -> &mut Pool<PLAYER_BULLETS> {
        &mut self.bullets
    }

    pub fn alien_bullets_mut(&mut self) -> &mut Pool<ALIEN_BULLETS> {
        &mut self.alien_bullets
    }

    pub fn formation(&self) -> &Formation {
        &self.formation
    }

    pub fn is_wave_cleared(&self) -> bool {
        self.wave_cleared
    }
}

impl Game for Invaders {
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
        let ship_w = ActorKind::PlayerShip.size().w;
        self.player = Actor::new(
            ActorKind::PlayerShip,
            Point::new((self.width - ship_w) / 2, self.player_y()),
            Vec2::ZERO,
        );
        self.reset_wave();
        self.score = 0;
        self.lives = START_LIVES;
        self.round_over = false;
        self.last_shot_ms = None;
        self.last_alien_shot_ms = None;
    }

    fn on_update_tick(&mut self, ctx: &mut TickContext) {
        if self.round_over {
            return;
        }
        if self.wave_cleared {
            // The pause is over; score and lives carry into the next wave.
            self.reset_wave();
            return;
        }

        self.move_player(ctx);
        self.fire(ctx);
        self.update_player_bullets(ctx);
        self.update_alien_bullets(ctx);
        if self.round_over {
            return;
        }
        self.march(ctx);
        if self.round_over {
            return;
        }

        if !self.aliens.any_active() {
            self.wave_cleared = true;
            ctx.cue(Cue::LevelComplete);
            ctx.hold(LEVEL_PAUSE_MS);
        }
    }

    fn on_render_tick(&self, scene: &mut Scene) {
        let p = self.player.pos;
        scene.set(SLOT_PLAYER, Sprite::bitmap(p.x, p.y, &PLAYER_BITMAP, Color::GREEN));

        for (i, shield) in self.shields.iter_active() {
            if let Some(color) = shield_color(shield.health) {
                scene.set(SLOT_SHIELDS + i, Sprite::fill(shield.bounds(), color));
            }
        }
        for (i, alien) in self.aliens.iter_active() {
            scene.set(
                SLOT_ALIENS + i,
                Sprite::bitmap(alien.pos.x, alien.pos.y, &ALIEN_BITMAP, Color::WHITE),
            );
        }
        for (i, bullet) in self.bullets.iter_active() {
            scene.set(SLOT_BULLETS + i, Sprite::fill(bullet.bounds(), Color::GREEN));
        }
        for (i, bullet) in self.alien_bullets.iter_active() {
            scene.set(SLOT_ALIEN_BULLETS + i, Sprite::fill(bullet.bounds(), Color::RED));
        }

        scene.set(
            SLOT_SCORE,
            Sprite::text(0, 0, format!("Score:{}", self.score), Color::WHITE, 1),
        );
        scene.set(
            SLOT_LIVES,
            Sprite::text(self.width - 40, 0, format!("Lives:{}", self.lives), Color::WHITE, 1),
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
