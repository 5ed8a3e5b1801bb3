//! Logical simulation clock.
//!
//! Time is a single monotonic counter in nanoseconds. Nothing blocks or
//! sleeps: every modeled operation advances the counter by its fixed latency,
//! and the value doubles as the LRU timestamp for the TLB levels. Identical
//! operation sequences therefore produce identical timestamps and identical
//! replacement decisions.

/// Logical time in nanoseconds.
pub type Nanos = u64;

/// Monotonic logical clock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Clock {
    now: Nanos,
}

impl Clock {
    /// Creates a clock at time zero.
    pub const fn new() -> Self {
        Self { now: 0 }
    }

    /// Rewinds the clock to zero. Only valid between runs.
    pub const fn reset(&mut self) {
        self.now = 0;
    }

    /// Current logical time.
    #[inline(always)]
    pub const fn now(&self) -> Nanos {
        self.now
    }

    /// Advances the clock by `dt`.
    ///
    /// Saturates instead of wrapping so time never moves backwards.
    #[inline(always)]
    pub const fn advance(&mut self, dt: Nanos) {
        self.now = self.now.saturating_add(dt);
    }
}
