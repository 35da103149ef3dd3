mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Print},
    terminal, ExecutableCommand, QueueableCommand,
};
use rand::Rng;
use tracing::{debug, info};
use tracing_subscriber::filter::EnvFilter;

use pixel_arcade::config::{ArcadeConfig, LogConfig};
use pixel_arcade::engine::{Engine, Game};
use pixel_arcade::feedback::{Cue, Haptic, PulsePattern};
use pixel_arcade::games::{Breakout, Flyer, GameKind, Invaders, Snake, SCORE_STORE_SIZE};
use pixel_arcade::input::{InputSnapshot, AXIS_CENTRE, AXIS_MAX};
use pixel_arcade::scheduler::{Clock, MonotonicClock};
use pixel_arcade::store::{FileStore, ScoreStore};

use display::TerminalSurface;

/// Idle time between engine polls; the scheduler does the real pacing.
const POLL_SLEEP: Duration = Duration::from_millis(2);

/// A key counts as held if its last press/repeat event arrived within this
/// window. Covers terminals that never report key releases: OS key-repeat
/// refreshes the timestamp well before it expires.
const HOLD_WINDOW: Duration = Duration::from_millis(150);

#[derive(Parser, Debug)]
#[command(name = "pixel_arcade", version, about = "Four tiny arcade games in the terminal")]
struct Cli {
    /// Game to start straight away: invaders, flyer, snake or breakout
    #[arg(long)]
    game: Option<GameKind>,

    /// TOML config file (defaults to ~/.pixel_arcade.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for the games' random number generators
    #[arg(long)]
    seed: Option<u64>,
}

// ── Logging ───────────────────────────────────────────────────────────────────

/// stdout is the game screen, so events go to a file.
fn init_logging(log: &LogConfig) -> Result<()> {
    let file = File::create(&log.file)
        .with_context(|| format!("creating log file {}", log.file.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

// ── Haptics ───────────────────────────────────────────────────────────────────

/// There is no motor on a terminal; cues are logged instead.
struct LogHaptic;

impl Haptic for LogHaptic {
    fn request(&mut self, cue: Cue, pattern: PulsePattern) {
        let steps: Vec<String> = pattern
            .steps()
            .map(|(on, ms)| format!("{}{ms}", if on { "+" } else { "-" }))
            .collect();
        debug!(?cue, total_ms = pattern.total_ms(), steps = %steps.join(" "), "haptic cue");
    }
}

// ── Keyboard → joystick ──────────────────────────────────────────────────────

fn is_held(seen: &HashMap<KeyCode, Instant>, keys: &[KeyCode], now: Instant) -> bool {
    keys.iter().any(|key| {
        seen.get(key)
            .is_some_and(|&last| now.saturating_duration_since(last) <= HOLD_WINDOW)
    })
}

/// Turn held keys into the raw levels a button and analog stick would give.
fn sample_input(seen: &HashMap<KeyCode, Instant>, now: Instant) -> InputSnapshot {
    let button = is_held(seen, &[KeyCode::Char(' '), KeyCode::Enter], now);
    let left = is_held(seen, &[KeyCode::Left, KeyCode::Char('a')], now);
    let right = is_held(seen, &[KeyCode::Right, KeyCode::Char('d')], now);
    let up = is_held(seen, &[KeyCode::Up, KeyCode::Char('w')], now);
    let down = is_held(seen, &[KeyCode::Down, KeyCode::Char('s')], now);

    let axis = |low: bool, high: bool| match (low, high) {
        (true, false) => 0,
        (false, true) => AXIS_MAX,
        _ => AXIS_CENTRE,
    };
    InputSnapshot::from_raw(button, axis(left, right), axis(down, up))
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start(GameKind),
    Quit,
}

fn best_scores(config: &ArcadeConfig) -> Result<Vec<u16>> {
    let path = config.store.score_path();
    let size = config.store.size.max(SCORE_STORE_SIZE);
    let mut scores = Vec::with_capacity(GameKind::ALL.len());
    for kind in GameKind::ALL {
        let store = FileStore::open(&path, size)
            .with_context(|| format!("opening score file {}", path.display()))?;
        scores.push(ScoreStore::new(store, kind.store_base()).high());
    }
    Ok(scores)
}

fn show_menu<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &ArcadeConfig,
) -> Result<MenuResult> {
    let best = best_scores(config)?;
    let mut selected = 0usize;

    loop {
        out.queue(style::ResetColor)?;
        out.queue(terminal::Clear(terminal::ClearType::All))?;

        let (width, height) = terminal::size()?;
        let cx = width / 2;
        let top = (height / 2).saturating_sub(5);

        let title = "★  PIXEL  ARCADE  ★";
        out.queue(cursor::MoveTo(cx.saturating_sub(title.chars().count() as u16 / 2), top))?;
        out.queue(style::SetForegroundColor(style::Color::Cyan))?;
        out.queue(Print(title))?;

        for (i, kind) in GameKind::ALL.iter().enumerate() {
            let row = top + 2 + i as u16;
            let (marker, color) = if i == selected {
                ("▶ ", style::Color::Yellow)
            } else {
                ("  ", style::Color::White)
            };
            out.queue(cursor::MoveTo(cx.saturating_sub(14), row))?;
            out.queue(style::SetForegroundColor(color))?;
            out.queue(Print(format!("{marker}{:<16}", kind.title())))?;
            out.queue(style::SetForegroundColor(style::Color::DarkGrey))?;
            out.queue(Print(format!("best {:>5}", best[i])))?;
        }

        let hint = "↑/↓ choose   Enter play   q quit";
        out.queue(cursor::MoveTo(
            cx.saturating_sub(hint.chars().count() as u16 / 2),
            top + 3 + GameKind::ALL.len() as u16,
        ))?;
        out.queue(style::SetForegroundColor(style::Color::DarkGrey))?;
        out.queue(Print(hint))?;
        out.queue(style::ResetColor)?;
        out.flush()?;

        // Block until the user does something
        let (code, kind) = match rx.recv() {
            Ok(Event::Key(KeyEvent { code, kind, .. })) => (code, kind),
            Ok(_) => continue,
            Err(_) => return Ok(MenuResult::Quit),
        };
        if kind == KeyEventKind::Release {
            continue;
        }
        match code {
            KeyCode::Up | KeyCode::Char('w') => {
                selected = (selected + GameKind::ALL.len() - 1) % GameKind::ALL.len();
            }
            KeyCode::Down | KeyCode::Char('s') => {
                selected = (selected + 1) % GameKind::ALL.len();
            }
            KeyCode::Char(c @ '1'..='4') => {
                let index = c as usize - '1' as usize;
                return Ok(MenuResult::Start(GameKind::ALL[index]));
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                return Ok(MenuResult::Start(GameKind::ALL[selected]));
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                return Ok(MenuResult::Quit);
            }
            _ => {}
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

enum Exit {
    Menu,
    Quit,
}

/// Drive one game until the player leaves it.
///
/// `q` quits the program, `m` goes back to the menu. Every other key only
/// refreshes the held-key table that `sample_input` reads.
fn play<G: Game, W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &ArcadeConfig,
    kind: GameKind,
    game: G,
) -> Result<Exit> {
    let path = config.store.score_path();
    let store = FileStore::open(&path, config.store.size.max(SCORE_STORE_SIZE))
        .with_context(|| format!("opening score file {}", path.display()))?;
    let scores = ScoreStore::new(store, kind.store_base());
    let mut engine = Engine::new(game, kind.scheduler(&config.timing), scores);
    info!(game = %kind, high = engine.high_score(), "starting game");

    out.queue(style::ResetColor)?;
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let mut surface = TerminalSurface::new(&mut *out, config.display.width, config.display.height);
    surface.invalidate();

    let clock = MonotonicClock::new();
    let mut haptic = LogHaptic;
    let mut seen: HashMap<KeyCode, Instant> = HashMap::new();

    loop {
        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) = ev
            else {
                continue;
            };
            match kind {
                KeyEventKind::Press => {
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(Exit::Quit),
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(Exit::Quit);
                        }
                        KeyCode::Char('m') | KeyCode::Esc => return Ok(Exit::Menu),
                        _ => {}
                    }
                    seen.insert(code, Instant::now());
                }
                KeyEventKind::Repeat => {
                    seen.insert(code, Instant::now());
                }
                KeyEventKind::Release => {
                    seen.remove(&code);
                }
            }
        }

        let input = sample_input(&seen, Instant::now());
        let admission = engine.poll(clock.now_ms(), &input, &mut surface, &mut haptic);
        if admission.render {
            surface.present()?;
        }

        thread::sleep(POLL_SLEEP);
    }
}

fn launch<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &ArcadeConfig,
    kind: GameKind,
    seed: u64,
) -> Result<Exit> {
    let (w, h) = (config.display.width, config.display.height);
    match kind {
        GameKind::Invaders => play(out, rx, config, kind, Invaders::new(seed, w, h)),
        GameKind::Flyer => play(out, rx, config, kind, Flyer::new(seed, w, h)),
        GameKind::Snake => play(out, rx, config, kind, Snake::new(seed, w, h)),
        GameKind::Breakout => play(out, rx, config, kind, Breakout::new(w, h)),
    }
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &ArcadeConfig,
    first: Option<GameKind>,
    seed: u64,
) -> Result<()> {
    let mut next = first;
    loop {
        let kind = match next.take() {
            Some(kind) => kind,
            None => match show_menu(out, rx, config)? {
                MenuResult::Start(kind) => kind,
                MenuResult::Quit => return Ok(()),
            },
        };
        match launch(out, rx, config, kind, seed)? {
            Exit::Menu => continue,
            Exit::Quit => return Ok(()),
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = ArcadeConfig::load(cli.config.as_deref())?;
    init_logging(&config.log)?;

    let seed = cli.seed.unwrap_or_else(|| rand::thread_rng().gen());
    info!(seed, ?config, "pixel_arcade starting");

    // Two pixels per terminal row.
    let need_cols = config.display.width.max(0) as u16;
    let need_rows = ((config.display.height.max(0) + 1) / 2) as u16;
    let (cols, rows) = terminal::size()?;
    if cols < need_cols || rows < need_rows {
        bail!(
            "terminal is {cols}x{rows}, need at least {need_cols}x{need_rows} for a {}x{} display",
            config.display.width,
            config.display.height
        );
    }

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Ask for key-release events; terminals without the protocol fall back
    // to the hold window.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread to blocking event reads so the game loop never
    // blocks on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = run(&mut out, &rx, &config, cli.game, seed);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(style::ResetColor);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}
