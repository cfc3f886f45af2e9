// ============================================================================
// frp-signals - Event Loop
// A single-threaded timer queue implementing `Scheduler`
// ============================================================================
//
// Timers live in a min-heap keyed by (deadline, id). Ids grow monotonically,
// so timers sharing a deadline fire in the order they were scheduled.
// Cancelling removes the task from the task map; its heap entry is skipped
// lazily when it reaches the top.
//
// Time is logical. When a timer fires, `now()` reads exactly its deadline,
// which keeps fixed-period sources free of drift. In real-time mode the
// loop sleeps until each deadline before firing; in virtual mode it jumps.
// ============================================================================

use std::cell::{Cell, RefCell};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::fmt;
use std::rc::Rc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, trace, warn};

use super::scheduler::{Scheduler, Task, TimerId};
use crate::core::constants::DEFAULT_MAX_FIRES_PER_RUN;

// =============================================================================
// CONFIGURATION
// =============================================================================

/// How an `EventLoop` relates logical time to the wall clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ClockMode {
    /// Sleep until each deadline; `now()` follows the wall clock between runs.
    #[default]
    Realtime,
    /// Never sleep; time only moves when the loop is driven.
    Virtual,
}

/// Settings for an [`EventLoop`].
#[derive(Clone, Debug)]
pub struct LoopConfig {
    pub clock: ClockMode,
    /// Cap on timers fired by one drive call (`run_pending`, `run_for`,
    /// `run_until_idle`).
    pub max_fires_per_run: usize,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            clock: ClockMode::Realtime,
            max_fires_per_run: DEFAULT_MAX_FIRES_PER_RUN,
        }
    }
}

impl LoopConfig {
    /// Default settings with a virtual clock.
    pub fn virtual_time() -> Self {
        Self::default().with_clock(ClockMode::Virtual)
    }

    pub fn with_clock(mut self, clock: ClockMode) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_max_fires_per_run(mut self, max: usize) -> Self {
        self.max_fires_per_run = max;
        self
    }
}

// =============================================================================
// EVENT LOOP
// =============================================================================

/// Single-threaded timer queue.
///
/// # Example
///
/// ```
/// use frp_signals::{EventLoop, Scheduler};
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use std::time::Duration;
///
/// let rt = EventLoop::virtual_time();
/// let log = Rc::new(RefCell::new(Vec::new()));
///
/// for (ms, tag) in [(20, "b"), (10, "a"), (20, "c")] {
///     let log = log.clone();
///     rt.schedule(Duration::from_millis(ms), Box::new(move || log.borrow_mut().push(tag)));
/// }
///
/// rt.run_for(Duration::from_millis(25));
/// assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
/// assert_eq!(rt.now(), Duration::from_millis(25));
/// ```
pub struct EventLoop {
    config: LoopConfig,
    started: Instant,

    /// Logical time
    now: Cell<Duration>,

    /// True while a task is running; pins `now()` to its deadline
    firing: Cell<bool>,

    next_id: Cell<u64>,
    queue: RefCell<BinaryHeap<Reverse<(Duration, u64)>>>,
    tasks: RefCell<HashMap<u64, Task>>,
}

impl EventLoop {
    /// A real-time loop with default settings.
    pub fn new() -> Rc<Self> {
        Self::with_config(LoopConfig::default())
    }

    /// A loop whose clock only moves when it is driven. Deterministic; what
    /// tests should use.
    pub fn virtual_time() -> Rc<Self> {
        Self::with_config(LoopConfig::virtual_time())
    }

    pub fn with_config(config: LoopConfig) -> Rc<Self> {
        Rc::new(Self {
            config,
            started: Instant::now(),
            now: Cell::new(Duration::ZERO),
            firing: Cell::new(false),
            next_id: Cell::new(1),
            queue: RefCell::new(BinaryHeap::new()),
            tasks: RefCell::new(HashMap::new()),
        })
    }

    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    /// Number of tasks still waiting to fire.
    pub fn pending(&self) -> usize {
        self.tasks.borrow().len()
    }

    pub fn is_idle(&self) -> bool {
        self.pending() == 0
    }

    /// Deadline of the earliest pending task.
    pub fn next_deadline(&self) -> Option<Duration> {
        let mut queue = self.queue.borrow_mut();
        let tasks = self.tasks.borrow();
        while let Some(&Reverse((deadline, id))) = queue.peek() {
            if tasks.contains_key(&id) {
                return Some(deadline);
            }
            queue.pop();
        }
        None
    }

    // =========================================================================
    // DRIVING
    // =========================================================================

    /// Fire every task that is already due. Returns the number fired.
    pub fn run_pending(&self) -> usize {
        let limit = self.clock_now();
        let fired = self.fire_until(limit);
        trace!(fired, now = ?self.now.get(), "run_pending finished");
        fired
    }

    /// Fire every task due within the next `span`, in deadline order, and
    /// leave the clock at `now + span`. Returns the number fired.
    ///
    /// Tasks scheduled while running are included if they fall inside the
    /// window.
    pub fn run_for(&self, span: Duration) -> usize {
        let target = self.clock_now().saturating_add(span);
        let fired = self.fire_until(target);
        self.wait_until(target);
        if target > self.now.get() {
            self.now.set(target);
        }
        debug!(fired, now = ?self.now.get(), "run_for finished");
        fired
    }

    /// Same as [`EventLoop::run_for`]; reads better with a virtual clock.
    pub fn advance(&self, span: Duration) -> usize {
        self.run_for(span)
    }

    /// Fire tasks until none are left. Returns the number fired.
    ///
    /// A periodic source (`every`) never lets the loop go idle; the run then
    /// stops at `max_fires_per_run`.
    pub fn run_until_idle(&self) -> usize {
        let fired = self.fire_until(Duration::MAX);
        debug!(fired, now = ?self.now.get(), "run_until_idle finished");
        fired
    }

    fn fire_until(&self, limit: Duration) -> usize {
        let mut fired = 0;
        while fired < self.config.max_fires_per_run {
            if !self.fire_next(limit) {
                return fired;
            }
            fired += 1;
        }
        warn!(
            max = self.config.max_fires_per_run,
            "event loop hit its fire limit for one run"
        );
        fired
    }

    /// Pop and run the earliest task due at or before `limit`.
    fn fire_next(&self, limit: Duration) -> bool {
        let Some(deadline) = self.next_deadline() else {
            return false;
        };
        if deadline > limit {
            return false;
        }
        self.wait_until(deadline);

        let Some(Reverse((deadline, id))) = self.queue.borrow_mut().pop() else {
            return false;
        };
        let Some(task) = self.tasks.borrow_mut().remove(&id) else {
            return true;
        };

        if deadline > self.now.get() {
            self.now.set(deadline);
        }
        trace!(timer = id, at = ?deadline, "firing");

        let _firing = FiringGuard::enter(&self.firing);
        task();
        true
    }

    fn clock_now(&self) -> Duration {
        match self.config.clock {
            ClockMode::Virtual => self.now.get(),
            ClockMode::Realtime if self.firing.get() => self.now.get(),
            ClockMode::Realtime => {
                let now = self.now.get().max(self.started.elapsed());
                self.now.set(now);
                now
            }
        }
    }

    fn wait_until(&self, deadline: Duration) {
        if self.config.clock == ClockMode::Virtual {
            return;
        }
        let target = self.started + deadline;
        let now = Instant::now();
        if target > now {
            thread::sleep(target - now);
        }
    }
}

impl Scheduler for EventLoop {
    fn now(&self) -> Duration {
        self.clock_now()
    }

    fn schedule(&self, delay: Duration, task: Task) -> TimerId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let deadline = self.clock_now().saturating_add(delay);
        self.queue.borrow_mut().push(Reverse((deadline, id)));
        self.tasks.borrow_mut().insert(id, task);

        trace!(timer = id, ?delay, ?deadline, "scheduled");
        TimerId::new(id)
    }

    fn cancel(&self, id: TimerId) -> bool {
        let task = self.tasks.borrow_mut().remove(&id.as_u64());
        let removed = task.is_some();
        // Drop the task outside the borrow; it may own signals
        drop(task);
        if removed {
            debug!(timer = %id, "cancelled");
        }
        removed
    }
}

impl fmt::Debug for EventLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventLoop")
            .field("clock", &self.config.clock)
            .field("now", &self.now.get())
            .field("pending", &self.pending())
            .finish()
    }
}

/// Sets a flag for the duration of a task, restoring it on unwind too.
struct FiringGuard<'a> {
    flag: &'a Cell<bool>,
    previous: bool,
}

impl<'a> FiringGuard<'a> {
    fn enter(flag: &'a Cell<bool>) -> Self {
        let previous = flag.replace(true);
        Self { flag, previous }
    }
}

impl Drop for FiringGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(self.previous);
    }
}

// =============================================================================
// TESTS
// =============================================================================
