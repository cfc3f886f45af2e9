// ============================================================================
// frp-signals - Channel
// The sanctioned entry point for values produced outside the graph
// ============================================================================

use crate::core::error::PropagationResult;
use crate::primitives::signal::Signal;

/// Wraps a signal that external code writes into.
///
/// Combinators never write to a channel; only `send` does. Keeping the
/// write side behind this type makes the boundary between "events from the
/// outside world" and internal wiring visible in the code.
///
/// # Example
///
/// ```
/// use frp_signals::{channel, map};
///
/// let clicks = channel(0u32);
/// let doubled = map(|n: &u32| n * 2, &clicks.signal());
///
/// clicks.send(21);
/// assert_eq!(doubled.get(), 42);
/// ```
pub struct Channel<T> {
    signal: Signal<T>,
}

impl<T> Clone for Channel<T> {
    fn clone(&self) -> Self {
        Self {
            signal: self.signal.clone(),
        }
    }
}

impl<T> Channel<T> {
    pub fn new(initial: T) -> Self {
        Self {
            signal: Signal::new(initial),
        }
    }

    /// The wrapped signal, for composing with combinators.
    pub fn signal(&self) -> Signal<T> {
        self.signal.clone()
    }
}

impl<T: Clone + 'static> Channel<T> {
    /// Push `value` into the graph. Same semantics as [`Signal::set`].
    pub fn send(&self, value: T) {
        self.signal.set(value)
    }

    /// Push `value`, reporting subscriber panics as an error.
    pub fn try_send(&self, value: T) -> PropagationResult<()> {
        self.signal.try_set(value)
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Channel<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Channel").field("signal", &self.signal).finish()
    }
}

/// Create a channel whose signal starts at `initial`.
pub fn channel<T>(initial: T) -> Channel<T> {
    Channel::new(initial)
}

/// Push `value` into `chan`.
pub fn send<T: Clone + 'static>(value: T, chan: &Channel<T>) {
    chan.send(value)
}

/// The signal wrapped by `chan`.
pub fn signal<T>(chan: &Channel<T>) -> Signal<T> {
    chan.signal()
}
