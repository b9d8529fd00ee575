/// Per-actor nonce allocation.
///
/// Each signing actor (wallet identity or trading session) owns one
/// [`NonceAllocator`]. Within one wall-clock second it hands out `0, 1, 2, ...`;
/// the first call in a new second resets to `0`. This orders actions for
/// liveness only; uniqueness is enforced by the backend.
///
/// The allocator takes `&mut self`. Sharing an actor across tasks requires
/// wrapping it in a lock; unsynchronized concurrent use would hand out
/// duplicate nonces.
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of the current Unix time in seconds.
pub trait Clock: Send + Sync {
    fn now_secs(&self) -> i64;
}

/// Wall-clock time from the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_secs(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0)
    }
}

/// A clock moved by hand. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    secs: Arc<AtomicI64>,
}

impl ManualClock {
    pub fn new(start_secs: i64) -> Self {
        Self {
            secs: Arc::new(AtomicI64::new(start_secs)),
        }
    }

    pub fn set(&self, secs: i64) {
        self.secs.store(secs, Ordering::SeqCst);
    }

    pub fn advance(&self, secs: i64) {
        self.secs.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_secs(&self) -> i64 {
        self.secs.load(Ordering::SeqCst)
    }
}

/// The `(current_timestamp, nonce)` pair stamped on one envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NonceStamp {
    pub timestamp: i64,
    pub nonce: u64,
}

/// Monotonic `(epoch_second, counter)` nonce generator owned by one actor.
#[derive(Debug, Clone)]
pub struct NonceAllocator<C: Clock = SystemClock> {
    clock: C,
    last_epoch_second: Option<i64>,
    counter: u64,
}

impl NonceAllocator<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for NonceAllocator<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> NonceAllocator<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            last_epoch_second: None,
            counter: 0,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Allocate the next nonce together with the second it belongs to.
    pub fn next_stamp(&mut self) -> NonceStamp {
        let now = self.clock.now_secs();
        if self.last_epoch_second == Some(now) {
            self.counter += 1;
        } else {
            self.last_epoch_second = Some(now);
            self.counter = 0;
        }
        NonceStamp {
            timestamp: now,
            nonce: self.counter,
        }
    }

    /// Allocate the next nonce.
    pub fn next_nonce(&mut self) -> u64 {
        self.next_stamp().nonce
    }

    /// The `(last_epoch_second, counter)` state, if any nonce was allocated.
    pub fn state(&self) -> Option<(i64, u64)> {
        self.last_epoch_second.map(|second| (second, self.counter))
    }
}
