//! Monotonic clock sources
//!
//! Operations read time through the `Clock` trait so tests can drive
//! elapsed time deterministically (including backwards jumps).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

/// A monotonic clock reading, in nanoseconds since an arbitrary origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tick(u64);

impl Tick {
    pub const fn from_nanos(nanos: u64) -> Self {
        Self(nanos)
    }

    pub const fn as_nanos(&self) -> u64 {
        self.0
    }

    /// Time from `earlier` to `self`, or zero when `earlier` is later.
    pub fn saturating_since(&self, earlier: Tick) -> Duration {
        Duration::from_nanos(self.0.saturating_sub(earlier.0))
    }
}

/// Source of monotonic ticks
pub trait Clock: Send + Sync {
    fn now(&self) -> Tick;
}

static ORIGIN: OnceLock<Instant> = OnceLock::new();

/// Clock backed by `std::time::Instant`, anchored to a process-wide origin
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    fn now(&self) -> Tick {
        let origin = ORIGIN.get_or_init(Instant::now);
        let nanos = origin.elapsed().as_nanos();
        Tick(u64::try_from(nanos).unwrap_or(u64::MAX))
    }
}

/// Hand-driven clock for tests
///
/// The reading only changes through `set`/`advance`, and may be moved
/// backwards to simulate clock anomalies.
#[derive(Debug, Default)]
pub struct ManualClock {
    nanos: AtomicU64,
}

impl ManualClock {
    pub fn new(start: Tick) -> Self {
        Self {
            nanos: AtomicU64::new(start.0),
        }
    }

    pub fn set(&self, tick: Tick) {
        self.nanos.store(tick.0, Ordering::SeqCst);
    }

    pub fn advance(&self, by: Duration) {
        let by = u64::try_from(by.as_nanos()).unwrap_or(u64::MAX);
        self.nanos.fetch_add(by, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Tick {
        Tick(self.nanos.load(Ordering::SeqCst))
    }
}
