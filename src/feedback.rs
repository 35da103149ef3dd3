//! Fire-and-forget haptic cues.
//!
//! Games name *what* happened; the actuator driver decides how to play the
//! pattern. Nothing here waits on the motor.

/// Gameplay events that warrant a buzz.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    Shot,
    Hit,
    PlayerHit,
    /// Long buzz when a shooter round ends.
    GameOver,
    /// Shorter buzz when a flyer crashes.
    Crash,
    LevelComplete,
}

/// Alternating on/off durations in milliseconds, starting with "on".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PulsePattern(pub &'static [u16]);

impl PulsePattern {
    pub fn total_ms(&self) -> u32 {
        self.0.iter().map(|&step| u32::from(step)).sum()
    }

    /// `(on, duration_ms)` steps.
    pub fn steps(&self) -> impl Iterator<Item = (bool, u16)> + '_ {
        self.0
            .iter()
            .enumerate()
            .map(|(i, &ms)| (i % 2 == 0, ms))
    }
}

impl Cue {
    pub const fn pattern(self) -> PulsePattern {
        match self {
            Cue::Shot => PulsePattern(&[50]),
            Cue::Hit => PulsePattern(&[30]),
            Cue::PlayerHit => PulsePattern(&[200]),
            Cue::GameOver => PulsePattern(&[500]),
            Cue::Crash => PulsePattern(&[200]),
            Cue::LevelComplete => PulsePattern(&[100, 100, 100]),
        }
    }
}

/// The vibration actuator capability.
pub trait Haptic {
    /// Queue a pattern and return immediately.
    fn request(&mut self, cue: Cue, pattern: PulsePattern);
}

#[derive(Debug, Default)]
pub struct NullHaptic;

impl Haptic for NullHaptic {
    fn request(&mut self, _cue: Cue, _pattern: PulsePattern) {}
}

/// Keeps every request; handy in tests and for a log-only frontend.
#[derive(Debug, Default)]
pub struct RecordingHaptic {
    pub cues: Vec<Cue>,
}

impl Haptic for RecordingHaptic {
    fn request(&mut self, cue: Cue, _pattern: PulsePattern) {
        self.cues.push(cue);
    }
}
