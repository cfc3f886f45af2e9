// ============================================================================
// frp-signals - Timed Sources
// every, delay, since: signals driven by the scheduler
// ============================================================================

use std::cell::Cell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use tracing::trace;

use super::scheduler::{CancelToken, Scheduler, TimerId};
use crate::combinators::{announce, announce_after};
use crate::core::context::current_scheduler;
use crate::primitives::signal::{make, Signal};

// =============================================================================
// EVERY
// =============================================================================

/// A signal that updates every `period` with the scheduler's current time.
///
/// The initial value is the time at construction. The timer keeps firing
/// for as long as the scheduler lives; see [`every_with_token`] to stop it.
///
/// # Example
///
/// ```
/// use frp_signals::{every, install_scheduler, EventLoop};
/// use std::time::Duration;
///
/// let rt = EventLoop::virtual_time();
/// let _guard = install_scheduler(rt.clone());
///
/// let clock = every(Duration::from_secs(1));
/// rt.run_for(Duration::from_millis(3500));
/// assert_eq!(clock.get(), Duration::from_secs(3));
/// ```
pub fn every(period: Duration) -> Signal<Duration> {
    every_with_token(period, &CancelToken::new())
}

/// [`every`] that stops once `token` is cancelled.
pub fn every_with_token(period: Duration, token: &CancelToken) -> Signal<Duration> {
    let scheduler = current_scheduler();
    let out = make(scheduler.now());
    arm_tick(&scheduler, period, out.clone(), token.clone());
    out
}

fn arm_tick(
    scheduler: &Rc<dyn Scheduler>,
    period: Duration,
    out: Signal<Duration>,
    token: CancelToken,
) {
    if token.is_cancelled() {
        return;
    }
    let weak = Rc::downgrade(scheduler);
    scheduler.schedule(
        period,
        Box::new(move || {
            if token.is_cancelled() {
                trace!(signal = %out.id(), "every: cancelled");
                return;
            }
            let Some(scheduler) = weak.upgrade() else {
                return;
            };
            // Re-arm before writing so a panicking subscriber does not stop
            // the clock
            arm_tick(&scheduler, period, out.clone(), token);
            out.set(scheduler.now());
        }),
    );
}

// =============================================================================
// DELAY
// =============================================================================

/// Replays every update of `source` after `wait`.
///
/// Each update gets its own timer; nothing is coalesced. Updates arrive in
/// the order they were made. The seed is announced after `wait` as well.
///
/// # Example
///
/// ```
/// use frp_signals::{delay, install_scheduler, make, EventLoop};
/// use std::time::Duration;
///
/// let rt = EventLoop::virtual_time();
/// let _guard = install_scheduler(rt.clone());
///
/// let input = make(0);
/// let late = delay(Duration::from_millis(50), &input);
///
/// input.set(1);
/// rt.run_for(Duration::from_millis(49));
/// assert_eq!(late.get(), 0);
/// rt.run_for(Duration::from_millis(1));
/// assert_eq!(late.get(), 1);
/// ```
pub fn delay<T: Clone + 'static>(wait: Duration, source: &Signal<T>) -> Signal<T> {
    delay_with_token(wait, source, &CancelToken::new())
}

/// [`delay`] whose pending and future replays are dropped once `token` is
/// cancelled.
pub fn delay_with_token<T: Clone + 'static>(
    wait: Duration,
    source: &Signal<T>,
    token: &CancelToken,
) -> Signal<T> {
    let scheduler = current_scheduler();
    let out = make(source.get());
    let weak: Weak<dyn Scheduler> = Rc::downgrade(&scheduler);

    source.attach({
        let out = out.clone();
        let token = token.clone();
        move |value: &T| {
            if token.is_cancelled() {
                return;
            }
            let Some(scheduler) = weak.upgrade() else {
                return;
            };
            let out = out.clone();
            let value = value.clone();
            let token = token.clone();
            scheduler.schedule(
                wait,
                Box::new(move || {
                    if !token.is_cancelled() {
                        out.set(value);
                    }
                }),
            );
        }
    });

    announce_after(&out, wait, |out| out.announce(out.get()));
    out
}

// =============================================================================
// SINCE
// =============================================================================

/// `true` while `source` has updated within the last `window`.
///
/// Two states: idle (`false`) and armed (`true` with a pending reset). Every
/// source update arms or re-arms the reset timer; only the idle → armed edge
/// emits `true`. The reset emits `false` when `window` passes without a new
/// update.
///
/// # Example
///
/// ```
/// use frp_signals::{install_scheduler, make, since, EventLoop};
/// use std::time::Duration;
///
/// let rt = EventLoop::virtual_time();
/// let _guard = install_scheduler(rt.clone());
///
/// let keystrokes = make('a');
/// let typing = since(Duration::from_millis(300), &keystrokes);
///
/// keystrokes.set('b');
/// assert!(typing.get());
/// rt.run_for(Duration::from_millis(300));
/// assert!(!typing.get());
/// ```
pub fn since<T: 'static>(window: Duration, source: &Signal<T>) -> Signal<bool> {
    let scheduler = current_scheduler();
    let out = make(false);
    let reset: Rc<Cell<Option<TimerId>>> = Rc::new(Cell::new(None));
    let weak: Weak<dyn Scheduler> = Rc::downgrade(&scheduler);

    source.attach({
        let out = out.clone();
        move |_: &T| {
            let Some(scheduler) = weak.upgrade() else {
                return;
            };

            let was_armed = match reset.take() {
                Some(id) => {
                    scheduler.cancel(id);
                    true
                }
                None => false,
            };

            let expire = {
                let out = out.clone();
                let reset = reset.clone();
                move || {
                    reset.set(None);
                    out.set(false);
                }
            };
            reset.set(Some(scheduler.schedule(window, Box::new(expire))));

            if !was_armed {
                out.set(true);
            }
        }
    });

    announce(&out);
    out
}

// =============================================================================
// TESTS
// =============================================================================
