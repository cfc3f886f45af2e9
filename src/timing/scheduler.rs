// ============================================================================
// frp-signals - Scheduler
// The timer collaborator used by `every`, `delay`, `since`, and by derived
// signals announcing their seed
// ============================================================================

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

/// A unit of deferred work.
pub type Task = Box<dyn FnOnce()>;

/// Handle to a scheduled task, accepted by [`Scheduler::cancel`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    pub fn new(raw: u64) -> Self {
        TimerId(raw)
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// "Invoke this after N time units."
///
/// Implementations are single-threaded and run tasks one at a time, never
/// re-entrantly from inside `schedule`. Tasks with equal deadlines must run
/// in the order they were scheduled.
pub trait Scheduler {
    /// Logical time elapsed since the scheduler started.
    fn now(&self) -> Duration;

    /// Run `task` once `delay` has elapsed.
    fn schedule(&self, delay: Duration, task: Task) -> TimerId;

    /// Drop a pending task. Returns false if it already ran or was unknown.
    fn cancel(&self, id: TimerId) -> bool;
}

// =============================================================================
// CANCEL TOKEN
// =============================================================================

/// Shared stop flag for timer-backed sources.
///
/// `every` and `delay` keep firing for as long as the scheduler lives. The
/// `*_with_token` variants check a token before every fire; once it is
/// cancelled they stop rescheduling and pending fires do nothing.
#[derive(Clone, Default)]
pub struct CancelToken {
    cancelled: Rc<Cell<bool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

impl fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_clones_share_state() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());

        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn timer_id_display() {
        assert_eq!(TimerId::new(4).to_string(), "timer#4");
        assert!(TimerId::new(1) < TimerId::new(2));
    }
}
