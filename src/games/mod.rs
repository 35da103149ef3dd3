//! The four bundled games and the bits shared between them.

pub mod breakout;
pub mod flyer;
pub mod invaders;
pub mod snake;

use std::fmt;
use std::str::FromStr;

use crate::config::TimingConfig;
use crate::scheduler::FrameScheduler;

pub use breakout::Breakout;
pub use flyer::Flyer;
pub use invaders::Invaders;
pub use snake::Snake;

/// Bytes of persistent store needed for every game's score record.
pub const SCORE_STORE_SIZE: usize = 16;

/// Pause after a cleared wave before the next one starts.
pub const LEVEL_PAUSE_MS: u64 = 2000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameKind {
    Invaders,
    Flyer,
    Snake,
    Breakout,
}

impl GameKind {
    pub const ALL: [GameKind; 4] = [
        GameKind::Invaders,
        GameKind::Flyer,
        GameKind::Snake,
        GameKind::Breakout,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            GameKind::Invaders => "invaders",
            GameKind::Flyer => "flyer",
            GameKind::Snake => "snake",
            GameKind::Breakout => "breakout",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            GameKind::Invaders => invaders::TITLE,
            GameKind::Flyer => flyer::TITLE,
            GameKind::Snake => snake::TITLE,
            GameKind::Breakout => breakout::TITLE,
        }
    }

    /// Where this game's score record lives in the shared store.
    pub const fn store_base(self) -> usize {
        match self {
            GameKind::Invaders => 0,
            GameKind::Flyer => 4,
            GameKind::Snake => 8,
            GameKind::Breakout => 12,
        }
    }

    pub fn scheduler(self, timing: &TimingConfig) -> FrameScheduler {
        let update_ms = match self {
            GameKind::Snake => timing.snake_step_ms,
            _ => timing.frame_ms,
        };
        FrameScheduler::new(update_ms, timing.render_ms)
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GameKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GameKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let names: Vec<_> = GameKind::ALL.iter().map(|k| k.name()).collect();
                format!("unknown game `{s}` (expected one of: {})", names.join(", "))
            })
    }
}
