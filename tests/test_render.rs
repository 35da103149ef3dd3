use pixel_arcade::collision::Rect;
use pixel_arcade::engine::{Game, TickContext};
use pixel_arcade::games::{Breakout, Flyer, Invaders, Snake};
use pixel_arcade::input::Controls;
use pixel_arcade::render::*;
use pixel_arcade::surface::{Canvas, Color};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const W: i32 = 64;
const H: i32 = 64;
const SLOTS: usize = 8;

static PALETTE: [CellPaint; 3] = [
    CellPaint { color: Color::BLACK, inset: 0 },
    CellPaint { color: Color::GREEN, inset: 1 },
    CellPaint { color: Color::RED, inset: 2 },
];

fn grid_layout() -> GridLayout {
    GridLayout {
        origin_x: 4,
        origin_y: 4,
        cell_w: 6,
        cell_h: 6,
        cols: 8,
        rows: 8,
        palette: &PALETTE,
    }
}

fn layout(with_grid: bool) -> SceneLayout {
    SceneLayout {
        sprite_slots: SLOTS,
        grid: with_grid.then(grid_layout),
    }
}

const COLORS: [Color; 4] = [Color::WHITE, Color::RED, Color::YELLOW, Color::CYAN];

fn random_sprite(rng: &mut StdRng) -> Option<Sprite> {
    let x = rng.gen_range(-4..W);
    let y = rng.gen_range(-4..H);
    let color = COLORS[rng.gen_range(0..COLORS.len())];
    match rng.gen_range(0..5) {
        0 => None,
        1 => Some(Sprite::fill(
            Rect::new(x, y, rng.gen_range(1..16), rng.gen_range(1..16)),
            color,
        )),
        2 => Some(Sprite::outline(
            Rect::new(x, y, rng.gen_range(1..20), rng.gen_range(1..20)),
            color,
        )),
        3 => Some(Sprite::text(x, y, format!("{}", rng.gen_range(0..1000)), color, 1)),
        _ => Some(Sprite::fill(Rect::new(x, y, 2, 5), color)),
    }
}

/// Mutate a few slots of `scene`, leaving the rest as they were.
fn perturb(rng: &mut StdRng, scene: &mut Scene, slots: &mut [Option<Sprite>]) {
    for slot in slots.iter_mut() {
        if rng.gen_bool(0.3) {
            *slot = random_sprite(rng);
        }
    }
    scene.clear();
    for (i, slot) in slots.iter().enumerate() {
        if let Some(sprite) = slot {
            scene.set(i, sprite.clone());
        }
    }
    if let Some(grid) = scene.grid_mut() {
        for row in 0..8 {
            for col in 0..8 {
                // Mostly stable cells
                let content = ((row * 3 + col) % 7 == 0) as u8 + rng.gen_bool(0.1) as u8;
                grid.set(col, row, content);
            }
        }
    }
}

/// What a full clear-and-redraw of `scene` looks like.
fn reference(scene: &Scene, layout: &SceneLayout) -> Canvas {
    let mut canvas = Canvas::new(W, H);
    Renderer::new(layout, Color::BLACK).repaint(scene, &mut canvas);
    canvas
}

fn assert_equivalent(with_grid: bool, seed: u64) {
    let layout = layout(with_grid);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut scene = Scene::new(&layout);
    let mut slots = vec![None; SLOTS];
    let mut renderer = Renderer::new(&layout, Color::BLACK);
    let mut canvas = Canvas::new(W, H);

    for frame in 0..200 {
        perturb(&mut rng, &mut scene, &mut slots);
        renderer.reconcile(&scene, &mut canvas);
        let expected = reference(&scene, &layout);
        assert!(
            canvas.pixels() == expected.pixels(),
            "frame {frame} diverged from full redraw (seed {seed})"
        );
    }
}

// ── Incremental vs full redraw ────────────────────────────────────────────────

#[test]
fn random_sprite_scenes_match_full_redraw() {
    for seed in [42, 7, 1234] {
        assert_equivalent(false, seed);
    }
}

#[test]
fn random_grid_scenes_match_full_redraw() {
    for seed in [42, 99] {
        assert_equivalent(true, seed);
    }
}

#[test]
fn unchanged_scene_is_idle() {
    let layout = layout(true);
    let mut rng = StdRng::seed_from_u64(42);
    let mut scene = Scene::new(&layout);
    let mut slots = vec![None; SLOTS];
    perturb(&mut rng, &mut scene, &mut slots);

    let mut renderer = Renderer::new(&layout, Color::BLACK);
    let mut canvas = Canvas::new(W, H);
    let first = renderer.reconcile(&scene, &mut canvas);
    assert!(!first.is_idle());

    let ops = canvas.op_count();
    let second = renderer.reconcile(&scene, &mut canvas);
    assert!(second.is_idle());
    assert_eq!(canvas.op_count(), ops);
}

#[test]
fn moved_sprite_erases_old_spot() {
    let layout = layout(false);
    let mut scene = Scene::new(&layout);
    let mut renderer = Renderer::new(&layout, Color::BLACK);
    let mut canvas = Canvas::new(W, H);

    scene.set(0, Sprite::fill(Rect::new(0, 0, 4, 4), Color::WHITE));
    renderer.reconcile(&scene, &mut canvas);
    scene.clear();
    scene.set(0, Sprite::fill(Rect::new(10, 0, 4, 4), Color::WHITE));
    let stats = renderer.reconcile(&scene, &mut canvas);

    assert_eq!(stats.erased, 1);
    assert_eq!(stats.sprites_drawn, 1);
    assert_eq!(canvas.pixel(0, 0), Some(Color::BLACK));
    assert_eq!(canvas.pixel(10, 0), Some(Color::WHITE));
}

#[test]
fn erase_uses_renderer_background() {
    let layout = layout(false);
    let mut scene = Scene::new(&layout);
    let mut renderer = Renderer::new(&layout, Color::CYAN);
    assert_eq!(renderer.background(), Color::CYAN);
    let mut canvas = Canvas::new(W, H);

    scene.set(0, Sprite::fill(Rect::new(0, 0, 4, 4), Color::WHITE));
    renderer.reconcile(&scene, &mut canvas);
    scene.clear();
    renderer.reconcile(&scene, &mut canvas);

    assert_eq!(canvas.pixel(0, 0), Some(renderer.background()));
    // Never-touched pixels keep whatever the surface held
    assert_eq!(canvas.pixel(20, 20), Some(Color::BLACK));
}

#[test]
fn untouched_neighbour_is_redrawn_after_erase() {
    let layout = layout(false);
    let mut scene = Scene::new(&layout);
    let mut renderer = Renderer::new(&layout, Color::BLACK);
    let mut canvas = Canvas::new(W, H);

    // slot 1 sits under slot 0's old position
    scene.set(0, Sprite::fill(Rect::new(0, 0, 8, 8), Color::WHITE));
    scene.set(1, Sprite::fill(Rect::new(4, 4, 8, 8), Color::RED));
    renderer.reconcile(&scene, &mut canvas);

    scene.clear();
    scene.set(0, Sprite::fill(Rect::new(30, 30, 8, 8), Color::WHITE));
    scene.set(1, Sprite::fill(Rect::new(4, 4, 8, 8), Color::RED));
    let stats = renderer.reconcile(&scene, &mut canvas);

    assert_eq!(stats.sprites_drawn, 2);
    assert_eq!(canvas.pixel(5, 5), Some(Color::RED));
    assert_eq!(canvas.pixel(1, 1), Some(Color::BLACK));
}

#[test]
fn only_changed_cells_are_repainted() {
    let layout = layout(true);
    let mut scene = Scene::new(&layout);
    let mut renderer = Renderer::new(&layout, Color::BLACK);
    let mut canvas = Canvas::new(W, H);

    let first = renderer.reconcile(&scene, &mut canvas);
    assert_eq!(first.cells_drawn, 64);

    if let Some(grid) = scene.grid_mut() {
        grid.set(2, 3, 1);
    }
    let second = renderer.reconcile(&scene, &mut canvas);
    assert_eq!(second.cells_drawn, 1);
    assert_eq!(renderer.grid_snapshot().map(|g| g[3 * 8 + 2]), Some(1));

    let cell = grid_layout().cell_rect(2, 3);
    assert_eq!(canvas.pixel(cell.x, cell.y), Some(Color::BLACK));
    assert_eq!(canvas.pixel(cell.x + 1, cell.y + 1), Some(Color::GREEN));
}

#[test]
fn invalidate_forces_full_redraw() {
    let layout = layout(false);
    let mut scene = Scene::new(&layout);
    scene.set(0, Sprite::fill(Rect::new(0, 0, 4, 4), Color::WHITE));
    let mut renderer = Renderer::new(&layout, Color::BLACK);
    let mut canvas = Canvas::new(W, H);
    renderer.reconcile(&scene, &mut canvas);

    renderer.invalidate();
    assert!(renderer.snapshot().iter().all(Option::is_none));
    let stats = renderer.reconcile(&scene, &mut canvas);
    assert_eq!(stats.sprites_drawn, 1);
    assert_eq!(stats.erased, 0);
}

#[test]
fn screen_latch_fires_once_per_reset() {
    let mut latch = ScreenLatch::default();
    assert!(latch.first_draw());
    assert!(!latch.first_draw());
    assert!(latch.is_drawn());
    latch.reset();
    assert!(latch.first_draw());
}

// ── Real games ────────────────────────────────────────────────────────────────

fn random_controls(rng: &mut StdRng) -> Controls {
    Controls {
        pressed: rng.gen_bool(0.2),
        released: false,
        held: false,
        left: rng.gen_bool(0.3),
        right: rng.gen_bool(0.3),
        up: rng.gen_bool(0.1),
        down: rng.gen_bool(0.1),
    }
}

fn run_game<G: Game>(mut game: G, width: i32, height: i32, ticks: u64) {
    let layout = game.scene_layout();
    let mut rng = StdRng::seed_from_u64(42);
    let mut scene = Scene::new(&layout);
    let mut renderer = Renderer::new(&layout, Color::BLACK);
    let mut canvas = Canvas::new(width, height);

    for tick in 0..ticks {
        let mut ctx = TickContext::new(tick * 16, random_controls(&mut rng));
        game.on_update_tick(&mut ctx);

        scene.clear();
        game.on_render_tick(&mut scene);
        renderer.reconcile(&scene, &mut canvas);

        let mut expected = Canvas::new(width, height);
        Renderer::new(&layout, Color::BLACK).repaint(&scene, &mut expected);
        assert!(
            canvas.pixels() == expected.pixels(),
            "{} diverged at tick {tick}",
            game.title()
        );
    }
}

#[test]
fn invaders_frames_match_full_redraw() {
    run_game(Invaders::new(42, 128, 128), 128, 128, 300);
}

#[test]
fn flyer_frames_match_full_redraw() {
    run_game(Flyer::new(42, 128, 128), 128, 128, 200);
}

#[test]
fn snake_frames_match_full_redraw() {
    run_game(Snake::new(42, 128, 128), 128, 128, 200);
}

#[test]
fn breakout_frames_match_full_redraw() {
    run_game(Breakout::new(128, 128), 128, 128, 300);
}
