use pixel_arcade::config::TimingConfig;
use pixel_arcade::engine::{Game, TickContext};
use pixel_arcade::entities::*;
use pixel_arcade::feedback::Cue;
use pixel_arcade::games::invaders::{shield_color, START_LIVES};
use pixel_arcade::games::snake::{GRID_SIZE, MAX_LENGTH};
use pixel_arcade::games::*;
use pixel_arcade::input::Controls;
use pixel_arcade::surface::Color;

use pretty_assertions::assert_eq;

fn still() -> Controls {
    Controls::default()
}

fn fire() -> Controls {
    Controls {
        pressed: true,
        held: true,
        ..Controls::default()
    }
}

fn tick<G: Game>(game: &mut G, now_ms: u64, controls: Controls) -> TickContext {
    let mut ctx = TickContext::new(now_ms, controls);
    game.on_update_tick(&mut ctx);
    ctx
}

// ── GameKind ──────────────────────────────────────────────────────────────────

#[test]
fn game_kind_parses_names() {
    assert_eq!("snake".parse::<GameKind>(), Ok(GameKind::Snake));
    assert_eq!("Breakout".parse::<GameKind>(), Ok(GameKind::Breakout));
    assert!("pong".parse::<GameKind>().is_err());
    for kind in GameKind::ALL {
        assert_eq!(kind.to_string().parse::<GameKind>(), Ok(kind));
    }
}

#[test]
fn score_records_do_not_overlap() {
    let mut bases: Vec<usize> = GameKind::ALL.iter().map(|k| k.store_base()).collect();
    bases.sort_unstable();
    for pair in bases.windows(2) {
        assert!(pair[1] - pair[0] >= 4);
    }
    assert!(bases.iter().all(|&b| b + 4 <= SCORE_STORE_SIZE));
}

#[test]
fn snake_uses_its_own_step() {
    let timing = TimingConfig::default();
    assert_eq!(GameKind::Snake.scheduler(&timing).update_interval_ms(), 150);
    assert_eq!(GameKind::Invaders.scheduler(&timing).update_interval_ms(), 16);
}

// ── Breakout ──────────────────────────────────────────────────────────────────

#[test]
fn ball_bounces_off_paddle() {
    let mut game = Breakout::new(128, 128);
    *game.ball_mut() = Actor::new(ActorKind::Ball, Point::new(63, 117), Vec2::new(1, 1));
    tick(&mut game, 0, still());
    assert_eq!(game.ball().vel, Vec2::new(1, -1));
    assert_eq!(game.ball().pos, Point::new(64, 118));
}

#[test]
fn ball_breaks_first_brick() {
    let mut game = Breakout::new(128, 128);
    // Just under the bottom-left brick, moving up
    *game.ball_mut() = Actor::new(ActorKind::Ball, Point::new(5, 45), Vec2::new(1, -1));
    let ctx = tick(&mut game, 0, still());

    assert_eq!(game.score(), 10);
    assert_eq!(game.bricks().active_count(), 49);
    assert!(!game.bricks().slots()[40].active);
    assert_eq!(game.ball().vel.dy, 1);
    assert_eq!(ctx.cues(), &[Cue::Hit]);
}

#[test]
fn ball_bounces_off_side_wall() {
    let mut game = Breakout::new(128, 128);
    *game.ball_mut() = Actor::new(ActorKind::Ball, Point::new(1, 80), Vec2::new(-1, -1));
    tick(&mut game, 0, still());
    assert_eq!(game.ball().vel, Vec2::new(1, -1));
}

#[test]
fn lost_ball_ends_round() {
    let mut game = Breakout::new(128, 128);
    *game.ball_mut() = Actor::new(ActorKind::Ball, Point::new(10, 127), Vec2::new(1, 1));
    let ctx = tick(&mut game, 0, still());
    assert!(game.is_round_over());
    assert_eq!(ctx.cues(), &[Cue::GameOver]);
}

#[test]
fn paddle_clamps_to_screen() {
    let mut game = Breakout::new(128, 128);
    let left = Controls {
        left: true,
        ..Controls::default()
    };
    for t in 0..100 {
        tick(&mut game, t, left);
    }
    assert_eq!(game.paddle().pos.x, 0);
}

#[test]
fn cleared_wall_pauses_then_rebuilds() {
    let mut game = Breakout::new(128, 128);
    game.bricks_mut().clear();
    let ctx = tick(&mut game, 0, still());
    assert!(game.is_wave_cleared());
    assert!(ctx.cues().contains(&Cue::LevelComplete));
    assert_eq!(ctx.hold_ms(), Some(LEVEL_PAUSE_MS));

    tick(&mut game, 2000, still());
    assert!(!game.is_wave_cleared());
    assert_eq!(game.bricks().active_count(), 50);
}

// ── Invaders ──────────────────────────────────────────────────────────────────

#[test]
fn bullet_destroys_lowest_slot_alien() {
    let mut game = Invaders::new(42, 128, 128);
    // Stack a second alien on top of slot 0
    let twin = game.aliens().slots()[0];
    game.aliens_mut().place(1, twin);
    game.bullets_mut()
        .spawn(Actor::new(ActorKind::PlayerBullet, Point::new(13, 24), Vec2::new(0, -3)));

    let ctx = tick(&mut game, 0, still());
    assert!(!game.aliens().slots()[0].active);
    assert!(game.aliens().slots()[1].active);
    assert_eq!(game.score(), 10);
    assert!(!game.bullets().any_active());
    assert_eq!(ctx.cues(), &[Cue::Hit]);
}

#[test]
fn shield_erodes_through_colours() {
    assert_eq!(shield_color(3), Some(Color::GREEN));
    assert_eq!(shield_color(2), Some(Color::YELLOW));
    assert_eq!(shield_color(1), Some(Color::RED));
    assert_eq!(shield_color(0), None);

    let mut game = Invaders::new(42, 128, 128);
    let shield = game.shields().slots()[0];
    assert_eq!(shield.health, 3);

    for expected in [2, 1, 0] {
        game.bullets_mut().spawn(Actor::new(
            ActorKind::PlayerBullet,
            Point::new(shield.pos.x + 2, shield.pos.y + 6),
            Vec2::new(0, -3),
        ));
        tick(&mut game, 0, still());
        assert_eq!(game.shields().slots()[0].health, expected);
        assert!(!game.bullets().any_active());
    }
    assert!(!game.shields().slots()[0].active);
}

#[test]
fn alien_bullet_erodes_shield() {
    let mut game = Invaders::new(42, 128, 128);
    let shield = game.shields().slots()[0];
    game.alien_bullets_mut().spawn(Actor::new(
        ActorKind::AlienBullet,
        Point::new(shield.pos.x + 2, shield.pos.y - 6),
        Vec2::new(0, 3),
    ));

    let ctx = tick(&mut game, 0, still());
    assert_eq!(game.shields().slots()[0].health, 2);
    assert!(!game.alien_bullets_mut().any_active());
    assert_eq!(game.lives(), START_LIVES);
    assert!(ctx.cues().is_empty());
}

#[test]
fn alien_bullet_costs_a_life() {
    let mut game = Invaders::new(42, 128, 128);
    let p = game.player().pos;
    game.alien_bullets_mut()
        .spawn(Actor::new(ActorKind::AlienBullet, Point::new(p.x + 2, p.y - 4), Vec2::new(0, 3)));

    let ctx = tick(&mut game, 0, still());
    assert_eq!(game.lives(), START_LIVES - 1);
    assert_eq!(ctx.cues(), &[Cue::PlayerHit]);
    assert!(!game.alien_bullets_mut().any_active());
    assert!(!game.is_round_over());
}

#[test]
fn last_life_ends_round_once() {
    let mut game = Invaders::new(42, 128, 128);
    let mut cues = Vec::new();
    for _ in 0..START_LIVES {
        let p = game.player().pos;
        game.alien_bullets_mut().spawn(Actor::new(
            ActorKind::AlienBullet,
            Point::new(p.x + 2, p.y - 4),
            Vec2::new(0, 3),
        ));
        cues.extend_from_slice(tick(&mut game, 0, still()).cues());
    }
    assert!(game.is_round_over());
    assert_eq!(cues.iter().filter(|&&c| c == Cue::GameOver).count(), 1);
}

#[test]
fn fire_is_debounced() {
    let mut game = Invaders::new(42, 128, 128);
    assert_eq!(tick(&mut game, 0, fire()).cues(), &[Cue::Shot]);
    assert!(tick(&mut game, 100, fire()).cues().is_empty());
    assert_eq!(tick(&mut game, 300, fire()).cues(), &[Cue::Shot]);
}

#[test]
fn formation_marches_on_its_own_clock() {
    let mut game = Invaders::new(42, 128, 128);
    let start = game.aliens().slots()[0].pos;
    tick(&mut game, 0, still());
    tick(&mut game, 400, still());
    assert_eq!(game.aliens().slots()[0].pos, start);
    tick(&mut game, 501, still());
    assert_eq!(game.aliens().slots()[0].pos, Point::new(start.x + 1, start.y));
}

#[test]
fn cleared_wave_pauses_then_resets() {
    let mut game = Invaders::new(42, 128, 128);
    game.aliens_mut().clear();
    let ctx = tick(&mut game, 0, still());
    assert!(game.is_wave_cleared());
    assert!(ctx.cues().contains(&Cue::LevelComplete));
    assert_eq!(ctx.hold_ms(), Some(LEVEL_PAUSE_MS));

    tick(&mut game, 2000, still());
    assert_eq!(game.aliens().active_count(), 18);
    assert_eq!(game.lives(), START_LIVES);
}

// ── Snake ─────────────────────────────────────────────────────────────────────

fn snake_with(body: &[(i32, i32)], dir: Vec2) -> Snake {
    let mut game = Snake::new(42, 128, 128);
    let cells: Vec<Point> = body.iter().map(|&(x, y)| Point::new(x, y)).collect();
    game.set_body(&cells, dir);
    game.set_food(Some(Point::new(0, 11)));
    game
}

#[test]
fn snake_ignores_reversal() {
    let mut game = snake_with(&[(5, 5), (4, 5), (3, 5)], Vec2::new(1, 0));
    let left = Controls {
        left: true,
        ..Controls::default()
    };
    tick(&mut game, 0, left);
    assert_eq!(game.direction(), Vec2::new(1, 0));
    assert_eq!(game.head(), Point::new(6, 5));
}

#[test]
fn snake_turns() {
    let mut game = snake_with(&[(5, 5), (4, 5), (3, 5)], Vec2::new(1, 0));
    let up = Controls {
        up: true,
        ..Controls::default()
    };
    tick(&mut game, 0, up);
    assert_eq!(game.head(), Point::new(5, 4));
    assert_eq!(game.len(), 3);
}

#[test]
fn snake_wraps_at_edge() {
    let mut game = snake_with(&[(11, 5), (10, 5), (9, 5)], Vec2::new(1, 0));
    tick(&mut game, 0, still());
    assert_eq!(game.head(), Point::new(0, 5));
    assert!(!game.is_round_over());
}

#[test]
fn snake_grows_on_food() {
    let mut game = snake_with(&[(5, 5), (4, 5), (3, 5)], Vec2::new(1, 0));
    game.set_food(Some(Point::new(6, 5)));
    tick(&mut game, 0, still());

    assert_eq!(game.len(), 4);
    assert_eq!(game.score(), 10);
    let food = game.food().unwrap();
    assert!(game.cells().all(|c| c != food));
}

#[test]
fn snake_dies_biting_itself() {
    let mut game = snake_with(&[(5, 5), (6, 5), (6, 6), (5, 6), (4, 6)], Vec2::new(0, 1));
    tick(&mut game, 0, still());
    assert!(game.is_round_over());
}

#[test]
fn food_never_lands_on_body() {
    let mut game = Snake::new(42, 128, 128);
    // Fill the top rows with the longest body allowed
    let cells: Vec<Point> = (0..MAX_LENGTH as i32)
        .map(|i| Point::new(i % GRID_SIZE, i / GRID_SIZE))
        .collect();
    game.set_body(&cells, Vec2::new(1, 0));
    for _ in 0..200 {
        let food = game.spawn_food().unwrap();
        assert!(!cells.contains(&food), "food at {food:?}");
        assert!((0..GRID_SIZE).contains(&food.x) && (0..GRID_SIZE).contains(&food.y));
    }
}

#[test]
fn full_length_snake_eats_without_growing() {
    let mut game = Snake::new(42, 128, 128);
    let cells: Vec<Point> = (0..MAX_LENGTH as i32)
        .map(|i| Point::new(i % GRID_SIZE, i / GRID_SIZE))
        .collect();
    // Head at (0, 0) heading up wraps into the empty bottom row
    game.set_body(&cells, Vec2::new(0, -1));
    game.set_food(Some(Point::new(0, GRID_SIZE - 1)));

    tick(&mut game, 0, still());
    assert!(!game.is_round_over());
    assert_eq!(game.len(), MAX_LENGTH);
    assert_eq!(game.score(), 10);
    assert_eq!(game.head(), Point::new(0, GRID_SIZE - 1));
}

// ── Flyer ─────────────────────────────────────────────────────────────────────

fn park_pipes(game: &mut Flyer) {
    // Move every pipe far right so tests control the one they care about
    for (i, pipe) in game.pipes_mut().slots_mut().iter_mut().enumerate() {
        pipe.pos = Point::new(400 + i as i32 * 64, 64);
    }
}

#[test]
fn flap_lifts_bird() {
    let mut game = Flyer::new(42, 128, 128);
    park_pipes(&mut game);
    game.bird_mut().y = 60.0;
    tick(&mut game, 0, fire());
    assert!(game.bird().velocity < 0.0);
    assert!(game.bird().y < 60.0);
}

#[test]
fn bird_crashes_on_floor() {
    let mut game = Flyer::new(42, 128, 128);
    park_pipes(&mut game);
    game.bird_mut().y = 119.0;
    game.bird_mut().velocity = 5.0;
    let ctx = tick(&mut game, 0, still());
    assert!(game.is_round_over());
    assert_eq!(ctx.cues(), &[Cue::Crash]);
}

#[test]
fn passing_a_pipe_scores_once() {
    let mut game = Flyer::new(42, 128, 128);
    park_pipes(&mut game);
    game.bird_mut().y = 60.0;
    game.pipes_mut().slots_mut()[0].pos = Point::new(14, 64);

    tick(&mut game, 0, still());
    assert_eq!(game.score(), 1);
    tick(&mut game, 16, still());
    assert_eq!(game.score(), 1);
}

#[test]
fn hitting_a_pipe_crashes() {
    let mut game = Flyer::new(42, 128, 128);
    park_pipes(&mut game);
    game.bird_mut().y = 60.0;
    // Gap well below the bird
    game.pipes_mut().slots_mut()[0].pos = Point::new(28, 100);

    let ctx = tick(&mut game, 0, still());
    assert!(game.is_round_over());
    assert_eq!(ctx.cues(), &[Cue::Crash]);
}

#[test]
fn pipe_respawns_ahead_with_valid_gap() {
    let mut game = Flyer::new(42, 128, 128);
    park_pipes(&mut game);
    game.bird_mut().y = 60.0;
    game.pipes_mut().slots_mut()[0].pos = Point::new(-16, 64);

    tick(&mut game, 0, still());
    let pipe = game.pipes().slots()[0];
    assert!(pipe.pos.x >= 128);
    assert!((35..93).contains(&pipe.pos.y));
}

#[test]
fn respawned_gaps_span_the_whole_range() {
    let mut game = Flyer::new(42, 128, 128);
    let mut gaps = Vec::new();
    for t in 0..100u64 {
        park_pipes(&mut game);
        // Neighbouring gaps hug the top so any coupling would show
        for pipe in game.pipes_mut().slots_mut().iter_mut() {
            pipe.pos.y = 35;
        }
        game.bird_mut().y = 60.0;
        game.bird_mut().velocity = 0.0;
        game.pipes_mut().slots_mut()[0].pos = Point::new(-16, 35);

        tick(&mut game, t * 16, still());
        assert!(!game.is_round_over());
        gaps.push(game.pipes().slots()[0].pos.y);
    }
    assert!(gaps.iter().all(|gap| (35..93).contains(gap)), "{gaps:?}");
    assert!(gaps.iter().any(|&gap| gap > 75), "{gaps:?}");
    assert!(gaps.iter().any(|&gap| gap < 50), "{gaps:?}");
}
