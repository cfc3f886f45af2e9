// ============================================================================
// frp-signals - Routing Combinators
// merge and sample_on: choosing which source drives the output
// ============================================================================

use super::announce;
use crate::primitives::signal::{make, Signal};

/// Forwards updates from both `a` and `b`.
///
/// Starts with `b`'s value. `a` is subscribed first, so when one write
/// reaches both sources in the same pass, `a`'s update lands first and
/// `b`'s wins.
///
/// # Example
///
/// ```
/// use frp_signals::{constant, merge};
///
/// let merged = merge(&constant("bar"), &constant("foo"));
/// assert_eq!(merged.get(), "foo");
/// ```
pub fn merge<T: Clone + 'static>(a: &Signal<T>, b: &Signal<T>) -> Signal<T> {
    let out = make(b.get());
    for source in [a, b] {
        let out = out.clone();
        source.attach(move |value: &T| out.set(value.clone()));
    }
    announce(&out);
    out
}

/// The value of `values`, re-read every time `trigger` updates.
///
/// Updates to `values` alone are never forwarded.
///
/// # Example
///
/// ```
/// use frp_signals::{make, sample_on};
///
/// let position = make((0, 0));
/// let clicks = make(());
/// let clicked_at = sample_on(&position, &clicks);
///
/// position.set((3, 4));
/// assert_eq!(clicked_at.get(), (0, 0));
///
/// clicks.set(());
/// assert_eq!(clicked_at.get(), (3, 4));
/// ```
pub fn sample_on<T, U>(values: &Signal<T>, trigger: &Signal<U>) -> Signal<T>
where
    T: Clone + 'static,
    U: 'static,
{
    let out = make(values.get());
    trigger.attach({
        let out = out.clone();
        let values = values.clone();
        move |_: &U| out.set(values.get())
    });
    announce(&out);
    out
}
