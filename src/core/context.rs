// ============================================================================
// frp-signals - Runtime Context
// Thread-local state shared by every signal on the current thread
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::timing::event_loop::EventLoop;
use crate::timing::scheduler::Scheduler;

// =============================================================================
// RUNTIME CONTEXT
// =============================================================================

/// Thread-local runtime context.
///
/// Signals are `Rc`-based and never cross threads, so all global state
/// lives here: id allocation, the depth of nested propagation passes, and
/// the scheduler that timed combinators hand their work to.
pub struct RuntimeContext {
    /// Next id handed out to a new signal node
    next_signal_id: Cell<u64>,

    /// Number of propagation passes currently on the stack
    propagation_depth: Cell<u32>,

    /// Explicitly installed scheduler, if any
    scheduler: RefCell<Option<Rc<dyn Scheduler>>>,

    /// Real-time event loop used when nothing was installed
    default_loop: RefCell<Option<Rc<EventLoop>>>,
}

impl RuntimeContext {
    pub fn new() -> Self {
        Self {
            next_signal_id: Cell::new(1),
            propagation_depth: Cell::new(0),
            scheduler: RefCell::new(None),
            default_loop: RefCell::new(None),
        }
    }

    // =========================================================================
    // IDS
    // =========================================================================

    pub fn allocate_signal_id(&self) -> u64 {
        let id = self.next_signal_id.get();
        self.next_signal_id.set(id + 1);
        id
    }

    // =========================================================================
    // PROPAGATION DEPTH
    // =========================================================================

    /// Enter a propagation pass, returns the new depth
    pub fn enter_pass(&self) -> u32 {
        let depth = self.propagation_depth.get() + 1;
        self.propagation_depth.set(depth);
        depth
    }

    /// Leave a propagation pass, returns the new depth
    pub fn exit_pass(&self) -> u32 {
        let depth = self.propagation_depth.get().saturating_sub(1);
        self.propagation_depth.set(depth);
        depth
    }

    pub fn propagation_depth(&self) -> u32 {
        self.propagation_depth.get()
    }

    // =========================================================================
    // SCHEDULER
    // =========================================================================

    /// The thread's default event loop, created on first use.
    pub fn default_loop(&self) -> Rc<EventLoop> {
        self.default_loop
            .borrow_mut()
            .get_or_insert_with(EventLoop::new)
            .clone()
    }

    /// The installed scheduler, falling back to the default event loop.
    pub fn scheduler(&self) -> Rc<dyn Scheduler> {
        if let Some(scheduler) = self.scheduler.borrow().as_ref() {
            return scheduler.clone();
        }
        self.default_loop()
    }

    /// Replace the installed scheduler, returning the previous one.
    pub fn replace_scheduler(
        &self,
        scheduler: Option<Rc<dyn Scheduler>>,
    ) -> Option<Rc<dyn Scheduler>> {
        self.scheduler.replace(scheduler)
    }
}

impl Default for RuntimeContext {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// THREAD-LOCAL ACCESS
// =============================================================================

thread_local! {
    static CONTEXT: RuntimeContext = RuntimeContext::new();
}

/// Access the thread-local runtime context.
pub fn with_context<R>(f: impl FnOnce(&RuntimeContext) -> R) -> R {
    CONTEXT.with(f)
}

// =============================================================================
// CONVENIENCE FUNCTIONS
// =============================================================================

/// Scheduler used by timed combinators built on this thread right now.
pub fn current_scheduler() -> Rc<dyn Scheduler> {
    with_context(|ctx| ctx.scheduler())
}

/// The thread's default real-time event loop.
///
/// Drive it with [`EventLoop::run_for`] or [`EventLoop::run_until_idle`]
/// when no other scheduler has been installed.
pub fn event_loop() -> Rc<EventLoop> {
    with_context(|ctx| ctx.default_loop())
}

/// Install `scheduler` for this thread, returning the previously installed one.
pub fn set_scheduler(scheduler: Rc<dyn Scheduler>) -> Option<Rc<dyn Scheduler>> {
    with_context(|ctx| ctx.replace_scheduler(Some(scheduler)))
}

/// Install `scheduler` until the returned guard is dropped.
///
/// # Example
///
/// ```
/// use frp_signals::{install_scheduler, every, EventLoop};
/// use std::time::Duration;
///
/// let rt = EventLoop::virtual_time();
/// let _guard = install_scheduler(rt.clone());
///
/// let ticks = every(Duration::from_millis(10));
/// rt.run_for(Duration::from_millis(30));
/// assert_eq!(ticks.get(), Duration::from_millis(30));
/// ```
pub fn install_scheduler(scheduler: Rc<dyn Scheduler>) -> SchedulerGuard {
    let previous = with_context(|ctx| ctx.replace_scheduler(Some(scheduler)));
    SchedulerGuard { previous }
}

/// Restores the previously installed scheduler when dropped.
#[must_use = "the scheduler is uninstalled as soon as the guard is dropped"]
pub struct SchedulerGuard {
    previous: Option<Rc<dyn Scheduler>>,
}

impl Drop for SchedulerGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        with_context(|ctx| ctx.replace_scheduler(previous));
    }
}

/// Depth of nested propagation passes at this point of the call stack.
pub fn propagation_depth() -> u32 {
    with_context(|ctx| ctx.propagation_depth())
}

// =============================================================================
// TESTS
// =============================================================================
