//! The boundary between the engine and whatever draws it: input events coming in,
//! read-only snapshots and telemetry going out.

use crate::particle::Particle;

/// Which collections are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayMode {
    pub show_aggregate: bool,
    pub show_walkers: bool,
}

impl Default for DisplayMode {
    fn default() -> Self {
        Self {
            show_aggregate: true,
            show_walkers: true,
        }
    }
}

impl DisplayMode {
    /// Both -> neither -> aggregate only -> walkers only -> both.
    pub fn cycle(self) -> Self {
        let (show_aggregate, show_walkers) = match (self.show_aggregate, self.show_walkers) {
            (true, true) => (false, false),
            (false, false) => (true, false),
            (true, false) => (false, true),
            (false, true) => (true, true),
        };
        Self {
            show_aggregate,
            show_walkers,
        }
    }
}

/// Discrete and continuous events a front end forwards to the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    ToggleDisplayMode,
    ClearWalkers,
    /// Pointer held down at this position, in grid coordinates.
    PointerHeld { x: f64, y: f64 },
    TogglePause,
    Restart,
    AdjustAttempts { increase: bool },
}

/// Plain counters for on-screen or log display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Telemetry {
    pub iteration: u64,
    pub aggregate_len: usize,
    pub walker_len: usize,
    pub spawned: u64,
    pub cleared: u64,
    pub attempts_per_tick: u32,
    pub paused: bool,
}

/// Borrowed snapshot of the engine for one frame.
#[derive(Debug, Clone, Copy)]
pub struct RenderView<'a> {
    pub aggregate: &'a [Particle],
    pub walkers: &'a [Particle],
    pub mode: DisplayMode,
}

impl<'a> RenderView<'a> {
    /// Particles to draw this frame, aggregate first.
    pub fn visible(&self) -> impl Iterator<Item = &'a Particle> + 'a {
        let aggregate: &'a [Particle] = if self.mode.show_aggregate {
            self.aggregate
        } else {
            &[]
        };
        let walkers: &'a [Particle] = if self.mode.show_walkers {
            self.walkers
        } else {
            &[]
        };
        aggregate.iter().chain(walkers.iter())
    }

    pub fn visible_len(&self) -> usize {
        let mut count = 0;
        if self.mode.show_aggregate {
            count += self.aggregate.len();
        }
        if self.mode.show_walkers {
            count += self.walkers.len();
        }
        count
    }
}
