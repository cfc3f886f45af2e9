// ============================================================================
// frp-signals - Transform Combinators
// map, apply, flat_map, on, and the thunk runners
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use super::{announce, announce_eagerly};
use crate::core::constants::SEED_ANNOUNCE_DELAY;
use crate::core::types::Thunk;
use crate::primitives::signal::{make, Signal};

// =============================================================================
// MAP
// =============================================================================

/// A signal holding `f` applied to every value of `source`.
///
/// # Example
///
/// ```
/// use frp_signals::{make, map};
///
/// let celsius = make(100.0);
/// let fahrenheit = map(|c: &f64| c * 9.0 / 5.0 + 32.0, &celsius);
/// assert_eq!(fahrenheit.get(), 212.0);
///
/// celsius.set(0.0);
/// assert_eq!(fahrenheit.get(), 32.0);
/// ```
pub fn map<A, B, F>(f: F, source: &Signal<A>) -> Signal<B>
where
    A: 'static,
    B: Clone + 'static,
    F: Fn(&A) -> B + 'static,
{
    let out = make(source.with(&f));
    source.attach({
        let out = out.clone();
        move |value: &A| out.set(f(value))
    });
    announce(&out);
    out
}

// =============================================================================
// APPLY
// =============================================================================

/// Applies the function held by `functions` to the value held by `values`.
///
/// Recomputes whenever either side updates, using the other side's latest
/// value. Updates are not joined: writing both sources produces two results.
///
/// # Example
///
/// ```
/// use frp_signals::{apply, make};
/// use std::rc::Rc;
///
/// let op: Rc<dyn Fn(&i32) -> i32> = Rc::new(|n: &i32| n + 1);
/// let ops = make(op);
/// let input = make(10);
/// let result = apply(&ops, &input);
/// assert_eq!(result.get(), 11);
///
/// ops.set(Rc::new(|n: &i32| n * 10));
/// assert_eq!(result.get(), 100);
/// input.set(3);
/// assert_eq!(result.get(), 30);
/// ```
pub fn apply<A, B>(
    functions: &Signal<Rc<dyn Fn(&A) -> B>>,
    values: &Signal<A>,
) -> Signal<B>
where
    A: Clone + 'static,
    B: Clone + 'static,
{
    // Latest value of each side; the glue never holds the other signal, so
    // the two sources do not keep each other alive.
    let latest_fn = Rc::new(RefCell::new(functions.get()));
    let latest_value = Rc::new(RefCell::new(values.get()));

    let initial = {
        let f = latest_fn.borrow().clone();
        f(&*latest_value.borrow())
    };
    let out = make(initial);

    functions.attach({
        let out = out.clone();
        let latest_fn = latest_fn.clone();
        let latest_value = latest_value.clone();
        move |f: &Rc<dyn Fn(&A) -> B>| {
            *latest_fn.borrow_mut() = f.clone();
            let value = latest_value.borrow().clone();
            out.set(f(&value));
        }
    });

    values.attach({
        let out = out.clone();
        move |value: &A| {
            *latest_value.borrow_mut() = value.clone();
            let f = latest_fn.borrow().clone();
            out.set(f(value));
        }
    });

    announce(&out);
    out
}

// =============================================================================
// FLAT MAP
// =============================================================================

/// Calls `f` for the current value and every update of `source`, sampling
/// the signal it returns.
///
/// This does not follow the returned signals over time; each call is
/// sampled once. Its main use is running a signal-producing computation
/// (often one with side effects) per event.
///
/// # Example
///
/// ```
/// use frp_signals::{constant, flat_map, make};
///
/// let ids = make(1);
/// let labels = flat_map(|id: &i32| constant(format!("item-{id}")), &ids);
/// assert_eq!(labels.get(), "item-1");
///
/// ids.set(2);
/// assert_eq!(labels.get(), "item-2");
/// ```
pub fn flat_map<A, B, F>(f: F, source: &Signal<A>) -> Signal<B>
where
    A: 'static,
    B: Clone + 'static,
    F: Fn(&A) -> Signal<B> + 'static,
{
    let out = make(source.with(&f).get());
    source.attach({
        let out = out.clone();
        move |value: &A| out.set(f(value).get())
    });
    announce(&out);
    out
}

// =============================================================================
// ON
// =============================================================================

/// Passthrough that runs `effect` on each value before forwarding it.
///
/// The effect sees the value mutably, so it can adjust the payload on its
/// way through. It runs for the current value at construction, once per
/// update, and once more on the next scheduler turn to announce the seed,
/// whether or not anyone observes the result. Every run gets its own clone;
/// the source's value is not modified.
///
/// # Example
///
/// ```
/// use frp_signals::{make, on};
///
/// let raw = make(vec![3, 1, 2]);
/// let sorted = on(|v: &mut Vec<i32>| v.sort(), &raw);
/// assert_eq!(sorted.get(), vec![1, 2, 3]);
/// assert_eq!(raw.get(), vec![3, 1, 2]);
/// ```
pub fn on<A, F>(effect: F, source: &Signal<A>) -> Signal<A>
where
    A: Clone + 'static,
    F: Fn(&mut A) + 'static,
{
    let effect = Rc::new(effect);
    let mut initial = source.get();
    effect(&mut initial);
    let out = make(initial);

    source.attach({
        let out = out.clone();
        let effect = effect.clone();
        move |value: &A| {
            let mut value = value.clone();
            effect(&mut value);
            out.set(value);
        }
    });

    // The effect is part of the announcement, so it is scheduled even with
    // no observers
    let source = source.downgrade();
    announce_eagerly(&out, SEED_ANNOUNCE_DELAY, move |out| {
        let Some(source) = source.upgrade() else {
            return;
        };
        let mut value = source.get();
        effect(&mut value);
        out.announce(value);
    });
    out
}

// =============================================================================
// RUN / UNWRAP
// =============================================================================

/// Invokes the thunk currently held by `thunks`, then every thunk written
/// to it later.
pub fn run(thunks: &Signal<Thunk>) {
    thunks.with(|thunk| thunk());
    thunks.attach(|thunk: &Thunk| thunk());
}

/// Like [`run`] for thunks that return a value; results are discarded.
pub fn unwrap<R: 'static>(thunks: &Signal<Thunk<R>>) {
    thunks.with(|thunk| {
        let _ = thunk();
    });
    thunks.attach(|thunk: &Thunk<R>| {
        let _ = thunk();
    });
}

// =============================================================================
// TESTS
// =============================================================================
