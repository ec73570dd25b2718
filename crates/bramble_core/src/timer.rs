//! Millisecond countdown timers for cooldowns, lifetimes and spawn cadence.
//!
//! Timers do not read a global clock. The owner passes the current
//! simulation time (`now_ms`) into every call, which keeps them deterministic
//! under the fixed-step loop and trivially testable.
//!
//! `update` returns `true` on the tick the timer completes; that return value
//! takes the place of a completion callback; the owner reacts to it (remove a
//! sprite, spawn a bee, ...).

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timer {
    duration_ms: u64,
    start_ms: Option<u64>,
    active: bool,
    repeat: bool,
}

impl Timer {
    pub fn new(duration_ms: u64) -> Self {
        Self {
            duration_ms,
            start_ms: None,
            active: false,
            repeat: false,
        }
    }

    /// A timer that re-arms itself every time it completes.
    pub fn repeating(duration_ms: u64) -> Self {
        Self {
            repeat: true,
            ..Self::new(duration_ms)
        }
    }

    /// Start immediately on construction.
    pub fn autostart(mut self, now_ms: u64) -> Self {
        self.activate(now_ms);
        self
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn start_ms(&self) -> Option<u64> {
        self.start_ms
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_repeating(&self) -> bool {
        self.repeat
    }

    /// Start (or restart) the countdown from `now_ms`.
    pub fn activate(&mut self, now_ms: u64) {
        self.active = true;
        self.start_ms = Some(now_ms);
    }

    /// Stop the countdown. A repeating timer immediately re-arms from `now_ms`.
    pub fn deactivate(&mut self, now_ms: u64) {
        self.active = false;
        self.start_ms = None;
        if self.repeat {
            self.activate(now_ms);
        }
    }

    /// Advance to `now_ms`. Returns `true` when the timer completed on this call.
    pub fn update(&mut self, now_ms: u64) -> bool {
        if !self.active {
            return false;
        }
        let Some(start) = self.start_ms else {
            return false;
        };
        if now_ms.saturating_sub(start) < self.duration_ms {
            return false;
        }
        self.deactivate(now_ms);
        true
    }
}
