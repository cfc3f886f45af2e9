// ============================================================================
// frp-signals - Stateful Combinators
// foldp, drop_repeats, filter, flatten: outputs that depend on history or
// may skip updates
// ============================================================================

use std::cell::RefCell;

use super::{announce, announce_after};
use crate::core::constants::SEED_ANNOUNCE_DELAY;
use crate::primitives::signal::{make, Signal};
use crate::reactivity::equality::equals;

// =============================================================================
// FOLDP
// =============================================================================

/// Folds every value of `source` into an accumulator ("fold from the past").
///
/// The current value of `source` is folded into `seed` at construction, so
/// the raw seed is never emitted.
///
/// # Example
///
/// ```
/// use frp_signals::{foldp, make};
///
/// let deposits = make(10);
/// let balance = foldp(|amount: &i32, total: i32| total + amount, 100, &deposits);
/// assert_eq!(balance.get(), 110);
///
/// deposits.set(5);
/// assert_eq!(balance.get(), 115);
/// ```
pub fn foldp<A, B, F>(step: F, seed: B, source: &Signal<A>) -> Signal<B>
where
    A: 'static,
    B: Clone + 'static,
    F: Fn(&A, B) -> B + 'static,
{
    let initial = source.with(|value| step(value, seed));
    let acc = RefCell::new(initial.clone());
    let out = make(initial);

    source.attach({
        let out = out.clone();
        move |value: &A| {
            // Clone out of the cell so `step` runs without a live borrow
            let previous = acc.borrow().clone();
            let next = step(value, previous);
            *acc.borrow_mut() = next.clone();
            out.set(next);
        }
    });
    announce(&out);
    out
}

// =============================================================================
// DROP REPEATS
// =============================================================================

/// Forwards an update only if it differs from the last value forwarded.
///
/// # Example
///
/// ```
/// use frp_signals::{drop_repeats, make};
///
/// let mode = make("idle");
/// let changes = drop_repeats(&mode);
/// let count = std::rc::Rc::new(std::cell::Cell::new(0));
/// let counter = count.clone();
/// changes.subscribe(move |_| counter.set(counter.get() + 1));
///
/// mode.set("idle");
/// mode.set("busy");
/// mode.set("busy");
/// assert_eq!(count.get(), 1);
/// ```
pub fn drop_repeats<T: Clone + PartialEq + 'static>(source: &Signal<T>) -> Signal<T> {
    drop_repeats_by(equals, source)
}

/// [`drop_repeats`] with an explicit equality.
pub fn drop_repeats_by<T, E>(eq: E, source: &Signal<T>) -> Signal<T>
where
    T: Clone + 'static,
    E: Fn(&T, &T) -> bool + 'static,
{
    let initial = source.get();
    let last = RefCell::new(initial.clone());
    let out = make(initial);

    source.attach({
        let out = out.clone();
        move |value: &T| {
            let repeat = eq(&*last.borrow(), value);
            if repeat {
                return;
            }
            *last.borrow_mut() = value.clone();
            out.set(value.clone());
        }
    });
    announce(&out);
    out
}

// =============================================================================
// FILTER
// =============================================================================

/// Forwards only the updates that satisfy `keep`.
///
/// If the current value of `source` is rejected at construction, the
/// signal starts at `default`. Rejected updates produce nothing.
///
/// # Example
///
/// ```
/// use frp_signals::{filter, make};
///
/// let readings = make(-3);
/// let positive = filter(|n: &i32| *n > 0, 0, &readings);
/// assert_eq!(positive.get(), 0);
///
/// readings.set(7);
/// readings.set(-1);
/// assert_eq!(positive.get(), 7);
/// ```
pub fn filter<T, P>(keep: P, default: T, source: &Signal<T>) -> Signal<T>
where
    T: Clone + 'static,
    P: Fn(&T) -> bool + 'static,
{
    let initial = source.with(|value| if keep(value) { value.clone() } else { default });
    let out = make(initial);

    source.attach({
        let out = out.clone();
        move |value: &T| {
            if keep(value) {
                out.set(value.clone());
            }
        }
    });
    announce(&out);
    out
}

// =============================================================================
// FLATTEN
// =============================================================================

/// Emits the elements of each vector written to `source`, one at a time.
///
/// Each element is a separate write on the result, all within the pass of
/// the source update. An empty vector emits nothing. The elements of the
/// initial vector are announced to the first observers on the next
/// scheduler turn; if it is empty, `seed` is announced instead.
///
/// # Example
///
/// ```
/// use frp_signals::{flatten, make};
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// let batches = make(Vec::<u32>::new());
/// let items = flatten(0, &batches);
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let sink = seen.clone();
/// items.subscribe(move |n| sink.borrow_mut().push(*n));
///
/// batches.set(vec![1, 2]);
/// batches.set(vec![]);
/// batches.set(vec![3]);
/// assert_eq!(*seen.borrow(), vec![1, 2, 3]);
/// ```
pub fn flatten<T: Clone + 'static>(seed: T, source: &Signal<Vec<T>>) -> Signal<T> {
    let initial = source.get();
    let out = make(initial.last().cloned().unwrap_or_else(|| seed.clone()));

    source.attach({
        let out = out.clone();
        move |values: &Vec<T>| {
            for value in values {
                out.set(value.clone());
            }
        }
    });

    announce_after(&out, SEED_ANNOUNCE_DELAY, move |out| {
        if initial.is_empty() {
            out.announce(seed);
        } else {
            for value in initial {
                out.announce(value);
            }
        }
    });
    out
}

// =============================================================================
// TESTS
// =============================================================================
