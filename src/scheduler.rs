//! Frame gating.
//!
//! Two independent timers decide whether an update pass and a render pass
//! may run for a given timestamp. Early calls are skipped, never queued, and
//! a long stall does not produce catch-up ticks.

use std::cell::Cell;
use std::time::Instant;

/// Milliseconds from an arbitrary fixed origin. Must never go backwards.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Hand-driven clock for deterministic runs.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get().saturating_add(ms));
    }

    pub fn set(&self, ms: u64) {
        // monotonic: ignore attempts to rewind
        if ms > self.now.get() {
            self.now.set(ms);
        }
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

// ── Timers ───────────────────────────────────────────────────────────────────

/// Admits at most once per `interval_ms`.
#[derive(Clone, Copy, Debug)]
pub struct FrameTimer {
    interval_ms: u64,
    last_ms: Option<u64>,
}

impl FrameTimer {
    pub const fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_ms: None,
        }
    }

    pub const fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// The first call always admits.
    pub fn admit(&mut self, now_ms: u64) -> bool {
        match self.last_ms {
            Some(last) if now_ms.saturating_sub(last) < self.interval_ms => false,
            _ => {
                self.last_ms = Some(now_ms);
                true
            }
        }
    }

    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Admission {
    pub update: bool,
    pub render: bool,
}

#[derive(Clone, Copy, Debug)]
pub struct FrameScheduler {
    update: FrameTimer,
    render: FrameTimer,
    hold_until_ms: Option<u64>,
}

impl FrameScheduler {
    pub const fn new(update_interval_ms: u64, render_interval_ms: u64) -> Self {
        Self {
            update: FrameTimer::new(update_interval_ms),
            render: FrameTimer::new(render_interval_ms),
            hold_until_ms: None,
        }
    }

    pub fn tick(&mut self, now_ms: u64) -> Admission {
        let held = match self.hold_until_ms {
            Some(until) if now_ms < until => true,
            Some(_) => {
                self.hold_until_ms = None;
                false
            }
            None => false,
        };
        Admission {
            update: !held && self.update.admit(now_ms),
            render: self.render.admit(now_ms),
        }
    }

    /// Suspend update admission for `duration_ms`. Rendering keeps its
    /// cadence. A second hold extends, never shortens, the current one.
    pub fn hold(&mut self, now_ms: u64, duration_ms: u64) {
        let until = now_ms.saturating_add(duration_ms);
        self.hold_until_ms = Some(self.hold_until_ms.map_or(until, |u| u.max(until)));
    }

    pub fn is_holding(&self, now_ms: u64) -> bool {
        self.hold_until_ms.is_some_and(|until| now_ms < until)
    }

    pub const fn update_interval_ms(&self) -> u64 {
        self.update.interval_ms()
    }

    pub const fn render_interval_ms(&self) -> u64 {
        self.render.interval_ms()
    }
}
