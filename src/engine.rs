//! The shared game loop: frame gating, phase transitions, high-score
//! bookkeeping and incremental rendering around a pluggable [`Game`].

use tracing::{debug, warn};

use crate::feedback::{Cue, Haptic};
use crate::input::{ButtonLatch, Controls, InputSnapshot};
use crate::render::{RenderStats, Renderer, Scene, SceneLayout, ScreenLatch};
use crate::scheduler::{Admission, FrameScheduler};
use crate::store::{ByteStore, ScoreStore};
use crate::surface::{centred_x, Color, DrawSurface};

pub const BACKGROUND: Color = Color::BLACK;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Intro,
    Playing,
    GameOver,
}

/// Everything a game sees, and may request, during one update pass.
#[derive(Debug)]
pub struct TickContext {
    pub now_ms: u64,
    pub controls: Controls,
    cues: Vec<Cue>,
    hold_ms: Option<u64>,
}

impl TickContext {
    pub fn new(now_ms: u64, controls: Controls) -> Self {
        Self {
            now_ms,
            controls,
            cues: Vec::new(),
            hold_ms: None,
        }
    }

    /// Ask for a haptic pattern. Played after the update returns.
    pub fn cue(&mut self, cue: Cue) {
        self.cues.push(cue);
    }

    /// Pause further updates for `ms`. Rendering continues.
    pub fn hold(&mut self, ms: u64) {
        self.hold_ms = Some(self.hold_ms.map_or(ms, |held| held.max(ms)));
    }

    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    pub fn hold_ms(&self) -> Option<u64> {
        self.hold_ms
    }
}

/// One arcade game plugged into the [`Engine`].
pub trait Game {
    fn title(&self) -> &'static str;

    /// Slot count and optional cell grid of the scenes this game composes.
    fn scene_layout(&self) -> SceneLayout;

    /// Reset entities and score for a new round.
    fn init(&mut self);

    fn on_update_tick(&mut self, ctx: &mut TickContext);

    /// Describe the playfield. `scene` arrives empty.
    fn on_render_tick(&self, scene: &mut Scene);

    fn is_round_over(&self) -> bool;

    fn score(&self) -> u32;
}

pub struct Engine<G, S> {
    game: G,
    scheduler: FrameScheduler,
    phase: Phase,
    button: ButtonLatch,
    scores: ScoreStore<S>,
    renderer: Renderer,
    scene: Scene,
    intro_screen: ScreenLatch,
    game_over_screen: ScreenLatch,
    clear_pending: bool,
    new_best: bool,
    last_stats: RenderStats,
}

impl<G: Game, S: ByteStore> Engine<G, S> {
    pub fn new(game: G, scheduler: FrameScheduler, scores: ScoreStore<S>) -> Self {
        let layout = game.scene_layout();
        Self {
            renderer: Renderer::new(&layout, BACKGROUND),
            scene: Scene::new(&layout),
            game,
            scheduler,
            phase: Phase::Intro,
            button: ButtonLatch::new(),
            scores,
            intro_screen: ScreenLatch::default(),
            game_over_screen: ScreenLatch::default(),
            clear_pending: false,
            new_best: false,
            last_stats: RenderStats::default(),
        }
    }

    /// Run whatever the scheduler admits at `now_ms`: first an update pass,
    /// then a render pass.
    pub fn poll<D, H>(
        &mut self,
        now_ms: u64,
        input: &InputSnapshot,
        surface: &mut D,
        haptic: &mut H,
    ) -> Admission
    where
        D: DrawSurface + ?Sized,
        H: Haptic + ?Sized,
    {
        let admission = self.scheduler.tick(now_ms);
        if admission.update {
            let controls = self.button.sample(input);
            self.update(now_ms, controls, haptic);
        }
        if admission.render {
            self.render(surface);
        }
        admission
    }

    fn update<H: Haptic + ?Sized>(&mut self, now_ms: u64, controls: Controls, haptic: &mut H) {
        match self.phase {
            Phase::Intro => {
                if controls.pressed {
                    self.start_round();
                }
            }
            Phase::Playing => {
                let mut ctx = TickContext::new(now_ms, controls);
                self.game.on_update_tick(&mut ctx);
                for &cue in ctx.cues() {
                    haptic.request(cue, cue.pattern());
                }
                if let Some(ms) = ctx.hold_ms() {
                    self.scheduler.hold(now_ms, ms);
                }
                if self.game.is_round_over() {
                    self.finish_round();
                }
            }
            Phase::GameOver => {
                if controls.pressed {
                    self.set_phase(Phase::Intro);
                    self.intro_screen.reset();
                    self.game_over_screen.reset();
                    self.renderer.invalidate();
                }
            }
        }
    }

    fn start_round(&mut self) {
        self.game.init();
        self.new_best = false;
        self.renderer.invalidate();
        self.clear_pending = true;
        self.set_phase(Phase::Playing);
    }

    fn finish_round(&mut self) {
        let score = self.game.score();
        self.new_best = match self.scores.save(score) {
            Ok(saved) => saved,
            Err(e) => {
                warn!(game = self.game.title(), score, error = %e, "could not save high score");
                false
            }
        };
        self.set_phase(Phase::GameOver);
    }

    fn set_phase(&mut self, next: Phase) {
        debug!(game = self.game.title(), from = ?self.phase, to = ?next, "phase change");
        self.phase = next;
    }

    fn render<D: DrawSurface + ?Sized>(&mut self, surface: &mut D) {
        match self.phase {
            Phase::Intro => {
                if self.intro_screen.first_draw() {
                    self.draw_intro(surface);
                }
            }
            Phase::Playing => {
                self.scene.clear();
                self.game.on_render_tick(&mut self.scene);
                if std::mem::take(&mut self.clear_pending) {
                    surface.fill_screen(self.renderer.background());
                }
                self.last_stats = self.renderer.reconcile(&self.scene, surface);
            }
            Phase::GameOver => {
                if self.game_over_screen.first_draw() {
                    self.draw_game_over(surface);
                }
            }
        }
    }

    // ── One-shot screens ─────────────────────────────────────────────────────

    fn draw_intro<D: DrawSurface + ?Sized>(&self, surface: &mut D) {
        let (w, h) = surface.size();
        surface.fill_screen(self.renderer.background());
        let top = h / 3;
        centered_text(surface, w, top, self.game.title(), Color::WHITE, 1);
        centered_text(surface, w, top + 20, "Press button", Color::WHITE, 1);
        centered_text(surface, w, top + 30, "to start", Color::WHITE, 1);
        let best = format!("Best: {}", self.scores.high());
        centered_text(surface, w, top + 50, &best, Color::YELLOW, 1);
    }

    fn draw_game_over<D: DrawSurface + ?Sized>(&self, surface: &mut D) {
        let (w, h) = surface.size();
        surface.fill_screen(self.renderer.background());
        let top = h / 4;
        centered_text(surface, w, top, "GAME OVER", Color::RED, 1);
        let score = format!("Score: {}", self.game.score());
        centered_text(surface, w, top + 20, &score, Color::WHITE, 1);
        if self.new_best {
            centered_text(surface, w, top + 30, "NEW BEST!", Color::YELLOW, 1);
        } else {
            let best = format!("Best: {}", self.scores.high());
            centered_text(surface, w, top + 30, &best, Color::WHITE, 1);
        }
        centered_text(surface, w, top + 50, "Press button", Color::WHITE, 1);
        centered_text(surface, w, top + 60, "to play again", Color::WHITE, 1);
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }

    pub fn high_score(&self) -> u16 {
        self.scores.high()
    }

    /// Whether the round that just ended set a new high score.
    pub fn is_new_best(&self) -> bool {
        self.new_best
    }

    pub fn scores(&self) -> &ScoreStore<S> {
        &self.scores
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// The scene composed by the most recent playing render pass.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn last_render_stats(&self) -> RenderStats {
        self.last_stats
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }
}

fn centered_text<D: DrawSurface + ?Sized>(
    surface: &mut D,
    width: i32,
    y: i32,
    text: &str,
    color: Color,
    scale: u8,
) {
    surface.draw_text(centred_x(width, text, scale), y.max(0), text, color, scale);
}
