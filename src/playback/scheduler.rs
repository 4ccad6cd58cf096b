use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

/// Suspension point between frames.
///
/// The player checks [`Scheduler::is_available`] once before starting playback and awaits
/// [`Scheduler::sleep`] after every painted frame.
pub trait Scheduler {
    /// Whether the scheduler can currently suspend (for example, a timer runtime is running).
    fn is_available(&self) -> bool;

    /// Complete after at least `duration` has elapsed on this scheduler's clock.
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()>;
}

/// Wall-clock scheduler backed by the tokio timer.
///
/// Available only when called from inside a tokio runtime whose time driver is enabled.
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioScheduler;

impl Scheduler for TokioScheduler {
    fn is_available(&self) -> bool {
        if tokio::runtime::Handle::try_current().is_err() {
            return false;
        }
        // tokio exposes no query for the time driver; building a timer panics when it is off.
        std::panic::catch_unwind(|| drop(tokio::time::sleep(Duration::ZERO))).is_ok()
    }

    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> {
        tokio::time::sleep(duration)
    }
}

/// Fake clock: every sleep completes immediately and advances a virtual clock instead.
///
/// Clones share the same clock, so a test can keep one handle and give the other to a player.
#[derive(Clone, Debug)]
pub struct ManualScheduler {
    clock: Rc<ManualClock>,
}

#[derive(Debug)]
struct ManualClock {
    available: Cell<bool>,
    elapsed: Cell<Duration>,
    sleeps: RefCell<Vec<Duration>>,
}

impl ManualScheduler {
    /// A fake clock at zero that reports itself available.
    pub fn new() -> Self {
        Self {
            clock: Rc::new(ManualClock {
                available: Cell::new(true),
                elapsed: Cell::new(Duration::ZERO),
                sleeps: RefCell::new(Vec::new()),
            }),
        }
    }

    /// A fake clock that reports itself unavailable.
    pub fn unavailable() -> Self {
        let s = Self::new();
        s.set_available(false);
        s
    }

    /// Toggle availability.
    pub fn set_available(&self, available: bool) {
        self.clock.available.set(available);
    }

    /// Total virtual time slept so far.
    pub fn elapsed(&self) -> Duration {
        self.clock.elapsed.get()
    }

    /// Every requested sleep, in order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.clock.sleeps.borrow().clone()
    }
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for ManualScheduler {
    fn is_available(&self) -> bool {
        self.clock.available.get()
    }

    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> {
        self.clock.sleeps.borrow_mut().push(duration);
        self.clock.elapsed.set(self.clock.elapsed.get() + duration);
        std::future::ready(())
    }
}
