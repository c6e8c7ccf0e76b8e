//! Level countdown
//!
//! The countdown is owned by the game and driven from outside, either by
//! one-second ticks from a scheduler or by feeding elapsed milliseconds.
//! Every arm, suspend and cancel bumps a generation counter; a tick carries the
//! handle it was scheduled with and is dropped if the generation moved on, so a
//! ticker left over from a paused or finished level can never touch the next one.

use crate::types::TICK_MS;

/// Identifies one armed period of the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle {
    generation: u64,
}

impl TimerHandle {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Countdown {
    generation: u64,
    armed: bool,
    /// Milliseconds fed in but not yet a whole tick.
    carry_ms: u32,
}

impl Countdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm for a new level, discarding any partial tick.
    pub fn start(&mut self) -> TimerHandle {
        self.carry_ms = 0;
        self.arm()
    }

    /// Re-arm after a pause, keeping the partial tick.
    pub fn resume(&mut self) -> TimerHandle {
        self.arm()
    }

    fn arm(&mut self) -> TimerHandle {
        self.generation = self.generation.wrapping_add(1);
        self.armed = true;
        TimerHandle {
            generation: self.generation,
        }
    }

    /// Stop ticking but remember the partial tick.
    pub fn suspend(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.armed = false;
    }

    /// Stop ticking for good.
    pub fn cancel(&mut self) {
        self.suspend();
        self.carry_ms = 0;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Handle of the current armed period.
    pub fn handle(&self) -> Option<TimerHandle> {
        self.armed.then_some(TimerHandle {
            generation: self.generation,
        })
    }

    /// A tick scheduled with `handle` still belongs to this period.
    pub fn accepts(&self, handle: TimerHandle) -> bool {
        self.armed && handle.generation == self.generation
    }

    /// Feed elapsed time; returns the number of whole ticks that passed.
    pub fn advance(&mut self, elapsed_ms: u32) -> u32 {
        if !self.armed {
            return 0;
        }
        let total = self.carry_ms.saturating_add(elapsed_ms);
        self.carry_ms = total % TICK_MS;
        total / TICK_MS
    }
}
