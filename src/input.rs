//! Input snapshot and edge detection.
//!
//! The caller samples the hardware and hands the engine plain levels; edges
//! are derived here, once per admitted update tick, from the remembered
//! previous button level.

/// Analog samples below this map to the low end of an axis.
pub const AXIS_LOW_THRESHOLD: u16 = 1600;
/// Analog samples above this map to the high end of an axis.
pub const AXIS_HIGH_THRESHOLD: u16 = 1700;
pub const AXIS_MAX: u16 = 4095;
pub const AXIS_CENTRE: u16 = 2048;

/// Instantaneous input levels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub button: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl InputSnapshot {
    /// Derive directions from two 0–4095 joystick samples. The band between
    /// the thresholds is neutral on both axes.
    pub fn from_raw(button: bool, x: u16, y: u16) -> Self {
        Self {
            button,
            left: x < AXIS_LOW_THRESHOLD,
            right: x > AXIS_HIGH_THRESHOLD,
            down: y < AXIS_LOW_THRESHOLD,
            up: y > AXIS_HIGH_THRESHOLD,
        }
    }

    pub const fn idle() -> Self {
        Self {
            button: false,
            left: false,
            right: false,
            up: false,
            down: false,
        }
    }

    pub const fn pressing() -> Self {
        Self {
            button: true,
            ..Self::idle()
        }
    }
}

/// What a game sees on one update tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Controls {
    /// Button went down since the previous admitted tick.
    pub pressed: bool,
    /// Button went up since the previous admitted tick.
    pub released: bool,
    pub held: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ButtonLatch {
    previous: bool,
}

impl ButtonLatch {
    pub const fn new() -> Self {
        Self { previous: false }
    }

    pub fn sample(&mut self, input: &InputSnapshot) -> Controls {
        let pressed = input.button && !self.previous;
        let released = !input.button && self.previous;
        self.previous = input.button;
        Controls {
            pressed,
            released,
            held: input.button,
            left: input.left,
            right: input.right,
            up: input.up,
            down: input.down,
        }
    }
}
