// ============================================================================
// frp-signals - Combinators Module
// Constructors that derive a new signal from existing ones
// ============================================================================
//
// Every combinator follows the same shape:
//   1. compute the initial value eagerly from the sources' current values
//   2. attach glue to the source(s) that writes the result signal
//   3. announce the initial value to the result's observers
//
// Step 3 lets code that builds a graph and then subscribes to its outputs
// observe the seed, the way it observes later updates. The announcement is
// scheduled when the first observer subscribes and fires on the next turn;
// it is skipped if the result was written in the meantime. Glue attached by
// downstream combinators never sees it, so a seed is counted once.
//
// Scheduled announcements hold the signal weakly. A result nobody observes
// schedules nothing.
// ============================================================================

use std::time::Duration;

use tracing::trace;

use crate::core::constants::SEED_ANNOUNCE_DELAY;
use crate::core::context::current_scheduler;
use crate::primitives::signal::{Signal, WeakSignal};

pub mod routing;
pub mod stateful;
pub mod transform;

pub use routing::{merge, sample_on};
pub use stateful::{drop_repeats, drop_repeats_by, filter, flatten, foldp};
pub use transform::{apply, flat_map, map, on, run, unwrap};

/// Announce the current value of `signal` to its observers.
pub(crate) fn announce<T: Clone + 'static>(signal: &Signal<T>) {
    announce_after(signal, SEED_ANNOUNCE_DELAY, |target| {
        target.announce(target.get())
    });
}

/// Once `signal` has an observer, run `emit` against it after `wait`,
/// unless it was written first.
pub(crate) fn announce_after<T, F>(signal: &Signal<T>, wait: Duration, emit: F)
where
    T: 'static,
    F: FnOnce(&Signal<T>) + 'static,
{
    let version = signal.version();
    let target = signal.downgrade();
    signal.on_first_observer(move || schedule_seed(target, version, wait, emit));
}

/// Like [`announce_after`], scheduled right away whether or not anyone
/// observes `signal`. For announcements with effects of their own.
pub(crate) fn announce_eagerly<T, F>(signal: &Signal<T>, wait: Duration, emit: F)
where
    T: 'static,
    F: FnOnce(&Signal<T>) + 'static,
{
    schedule_seed(signal.downgrade(), signal.version(), wait, emit);
}

fn schedule_seed<T, F>(target: WeakSignal<T>, version: u64, wait: Duration, emit: F)
where
    T: 'static,
    F: FnOnce(&Signal<T>) + 'static,
{
    match target.upgrade() {
        Some(signal) if signal.version() == version => {}
        _ => return,
    }

    current_scheduler().schedule(
        wait,
        Box::new(move || {
            let Some(target) = target.upgrade() else {
                return;
            };
            if target.version() != version {
                trace!(signal = %target.id(), "seed superseded; not announcing");
                return;
            }
            trace!(signal = %target.id(), "announcing seed");
            emit(&target);
        }),
    );
}
