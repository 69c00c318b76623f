use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

// ============================================================================
// Clocks
// ============================================================================

/// Monotonic time source, measured from an arbitrary origin.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Wall-clock time since construction.
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
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Time that only moves when told to. Clones share the same reading, so a
/// test can keep one handle and give another to the driver.
#[derive(Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn set(&self, to: Duration) {
        self.now.set(to);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

// ============================================================================
// Scheduler
// ============================================================================

/// Identifies one scheduled tick. Stale once that tick fires or is cancelled.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TimerHandle(u64);

#[derive(Clone, Copy, Debug)]
struct Pending {
    at: Duration,
    handle: TimerHandle,
}

/// Holds at most one pending tick.
///
/// Scheduling replaces whatever was pending. Cancelling discards it, and every
/// handle issued before the cancel stops being live.
#[derive(Debug, Default)]
pub struct Scheduler {
    pending: Option<Pending>,
    next_id: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, at: Duration) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.pending = Some(Pending { at, handle });
        handle
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_live(&self, handle: TimerHandle) -> bool {
        self.pending.is_some_and(|p| p.handle == handle)
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.pending.map(|p| p.at)
    }

    /// Takes the pending tick if its time has come.
    pub fn take_due(&mut self, now: Duration) -> Option<TimerHandle> {
        match self.pending {
            Some(p) if p.at <= now => {
                self.pending = None;
                Some(p.handle)
            }
            _ => None,
        }
    }
}
