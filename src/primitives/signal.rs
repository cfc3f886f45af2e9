// ============================================================================
// frp-signals - Signal Primitive
// The mutable reactive cell every combinator is built from
// ============================================================================

use std::fmt;
use std::rc::{Rc, Weak};

use crate::core::error::PropagationResult;
use crate::core::types::{SignalId, SignalInner, SubscriberKind};
use crate::reactivity::propagation;

// =============================================================================
// SIGNAL<T> - The public signal handle
// =============================================================================

/// A time-varying value.
///
/// A signal always holds a value. Writing with [`Signal::set`] stores the
/// new value and synchronously calls every subscriber, in registration
/// order, before returning. Cloning the handle shares the same cell.
///
/// # Example
///
/// ```
/// use frp_signals::make;
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// let count = make(0);
/// let seen = Rc::new(RefCell::new(Vec::new()));
///
/// let sink = seen.clone();
/// count.subscribe(move |n| sink.borrow_mut().push(*n));
///
/// count.set(1);
/// count.set(2);
/// assert_eq!(count.get(), 2);
/// assert_eq!(*seen.borrow(), vec![1, 2]);
/// ```
pub struct Signal<T> {
    inner: Rc<SignalInner<T>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Signal<T> {
    /// Create a new signal with the given initial value.
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(SignalInner::new(value)),
        }
    }

    /// Access the current value with a closure (avoids cloning).
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.inner.with(f)
    }

    /// Identifier used in logs and errors.
    pub fn id(&self) -> SignalId {
        self.inner.id()
    }

    /// Number of writes stored so far.
    pub fn version(&self) -> u64 {
        self.inner.version()
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscriber_count()
    }

    /// True while this signal's subscribers are being notified.
    pub fn is_notifying(&self) -> bool {
        self.inner.is_notifying()
    }

    /// True if both handles point at the same cell.
    pub fn ptr_eq(&self, other: &Signal<T>) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn downgrade(&self) -> WeakSignal<T> {
        WeakSignal {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Run `arm` when the first observer subscribes.
    pub(crate) fn on_first_observer(&self, arm: impl FnOnce() + 'static) {
        self.inner.set_seed_announcer(Box::new(arm));
    }
}

impl<T: 'static> Signal<T> {
    /// Register a callback for every future write.
    ///
    /// The callback is not invoked with the current value. A signal built
    /// by a combinator announces its initial value to its observers once,
    /// on the scheduler turn after the first one subscribes, unless it was
    /// written first.
    ///
    /// There is no way to unsubscribe; a subscriber lives as long as the
    /// signal.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) {
        self.inner
            .add_subscriber(SubscriberKind::Observer, Rc::new(callback));
        if let Some(arm) = self.inner.take_seed_announcer() {
            arm();
        }
    }

    /// Subscribe combinator glue. Glue never sees seed announcements.
    pub(crate) fn attach(&self, callback: impl Fn(&T) + 'static) {
        self.inner
            .add_subscriber(SubscriberKind::Derived, Rc::new(callback));
    }
}

impl<T: Clone + 'static> Signal<T> {
    /// Get the current value (cloning).
    pub fn get(&self) -> T {
        self.inner.get()
    }

    /// Store `value` and notify subscribers.
    ///
    /// A write issued from inside this signal's own notification pass is
    /// queued and applied after the pass, in submission order.
    ///
    /// If a subscriber panics, the remaining subscribers still run and the
    /// first panic is resumed on the caller once the pass is complete. Use
    /// [`Signal::try_set`] to receive it as an error instead.
    pub fn set(&self, value: T) {
        propagation::write(&self.inner, value).resume();
    }

    /// Like [`Signal::set`], reporting subscriber panics as an error.
    ///
    /// # Example
    ///
    /// ```
    /// use frp_signals::{make, PropagationError};
    ///
    /// let s = make(0);
    /// s.subscribe(|n| if *n < 0 { panic!("negative") });
    ///
    /// assert!(s.try_set(1).is_ok());
    /// assert!(matches!(
    ///     s.try_set(-1),
    ///     Err(PropagationError::SubscriberPanicked { failures: 1, .. })
    /// ));
    /// assert_eq!(s.get(), -1);
    /// ```
    pub fn try_set(&self, value: T) -> PropagationResult<()> {
        propagation::write(&self.inner, value).into_result(&self.inner)
    }

    /// Re-emit `value` as this signal's seed, to observers only.
    pub(crate) fn announce(&self, value: T) {
        propagation::announce(&self.inner, value).resume();
    }
}

/// Non-owning handle, held by scheduled tasks so they do not keep a signal
/// alive.
pub(crate) struct WeakSignal<T> {
    inner: Weak<SignalInner<T>>,
}

impl<T> WeakSignal<T> {
    pub(crate) fn upgrade(&self) -> Option<Signal<T>> {
        self.inner.upgrade().map(|inner| Signal { inner })
    }
}

impl<T: fmt::Debug> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with(|value| {
            f.debug_struct("Signal")
                .field("id", &self.id())
                .field("value", value)
                .finish()
        })
    }
}

// =============================================================================
// FREE FUNCTIONS (function-first API)
// =============================================================================

/// Create a signal holding `initial`.
pub fn make<T>(initial: T) -> Signal<T> {
    Signal::new(initial)
}

/// A signal that is never written to by the library.
///
/// Nothing stops a caller from `set`ting it; test tickers rely on that.
pub fn constant<T>(value: T) -> Signal<T> {
    Signal::new(value)
}

/// Current value of `signal`.
pub fn get<T: Clone + 'static>(signal: &Signal<T>) -> T {
    signal.get()
}

/// Write `value` to `signal`. See [`Signal::set`].
pub fn set<T: Clone + 'static>(value: T, signal: &Signal<T>) {
    signal.set(value)
}

/// Append `callback` to the subscribers of `signal`. See [`Signal::subscribe`].
pub fn subscribe<T: 'static>(callback: impl Fn(&T) + 'static, signal: &Signal<T>) {
    signal.subscribe(callback)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::PropagationError;
    use std::cell::RefCell;
    use std::panic::{self, AssertUnwindSafe};

    fn record<T: Clone + 'static>(signal: &Signal<T>) -> Rc<RefCell<Vec<T>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        signal.subscribe(move |v: &T| sink.borrow_mut().push(v.clone()));
        seen
    }

    #[test]
    fn make_then_get() {
        assert_eq!(make(42).get(), 42);
        assert_eq!(get(&make("x")), "x");
    }

    #[test]
    fn set_then_get() {
        let s = make(1);
        set(2, &s);
        assert_eq!(s.get(), 2);
    }

    #[test]
    fn subscribe_does_not_fire_immediately() {
        let s = make(1);
        let seen = record(&s);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn late_subscriber_misses_earlier_values() {
        let s = make(0);
        s.set(1);
        s.set(2);

        let seen = record(&s);
        s.set(3);
        assert_eq!(*seen.borrow(), vec![3]);
    }

    #[test]
    fn set_same_value_still_notifies() {
        let s = make(5);
        let seen = record(&s);
        s.set(5);
        s.set(5);
        assert_eq!(*seen.borrow(), vec![5, 5]);
    }

    #[test]
    fn subscribe_free_function() {
        let s = make(0);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        subscribe(move |v: &i32| sink.borrow_mut().push(*v), &s);
        s.set(9);
        assert_eq!(*seen.borrow(), vec![9]);
    }

    #[test]
    fn clones_share_the_cell() {
        let a = make(String::from("hello"));
        let b = a.clone();
        b.set(String::from("world"));
        assert_eq!(a.get(), "world");
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&make(String::new())));
    }

    #[test]
    fn version_counts_writes() {
        let s = make(0);
        assert_eq!(s.version(), 0);
        s.set(1);
        s.set(1);
        assert_eq!(s.version(), 2);
    }

    #[test]
    fn subscriber_added_during_pass_waits_for_next_write() {
        let s = make(0);
        let late = Rc::new(RefCell::new(Vec::new()));

        let handle = s.clone();
        let sink = late.clone();
        s.subscribe(move |v| {
            if *v == 1 {
                let sink = sink.clone();
                handle.subscribe(move |v: &i32| sink.borrow_mut().push(*v));
            }
        });

        s.set(1);
        assert!(late.borrow().is_empty());
        s.set(2);
        assert_eq!(*late.borrow(), vec![2]);
    }

    #[test]
    fn set_resumes_subscriber_panic_after_pass() {
        let s = make(0);
        s.subscribe(|_| panic!("bad subscriber"));
        let seen = record(&s);

        let result = panic::catch_unwind(AssertUnwindSafe(|| s.set(1)));
        assert!(result.is_err());
        assert_eq!(*seen.borrow(), vec![1]);
        assert!(!s.is_notifying());

        // The signal stays usable afterwards
        let _ = panic::catch_unwind(AssertUnwindSafe(|| s.set(2)));
        assert_eq!(*seen.borrow(), vec![1, 2]);
    }

    #[test]
    fn try_set_reports_panics() {
        let s = make(0);
        s.subscribe(|_| panic!("one"));
        s.subscribe(|_| panic!("two"));

        match s.try_set(1) {
            Err(PropagationError::SubscriberPanicked {
                signal,
                failures,
                message,
            }) => {
                assert_eq!(signal, s.id());
                assert_eq!(failures, 2);
                assert_eq!(message, "one");
            }
            Ok(()) => panic!("expected an error"),
        }
    }

    #[test]
    fn signal_debug() {
        let s = make(42);
        let text = format!("{:?}", s);
        assert!(text.contains("Signal"));
        assert!(text.contains("42"));
    }

    #[test]
    fn signal_without_clone_payload() {
        struct Opaque(u8);
        let s = make(Opaque(3));
        assert_eq!(s.with(|o| o.0), 3);
        s.subscribe(|_| {});
        assert_eq!(s.subscriber_count(), 1);
    }

    #[test]
    fn weak_handle_does_not_keep_signal_alive() {
        let s = make(1);
        let weak = s.downgrade();
        assert!(weak.upgrade().is_some_and(|again| again.ptr_eq(&s)));

        drop(s);
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn first_observer_arms_once() {
        let s = make(0);
        let armed = Rc::new(std::cell::Cell::new(0));
        let counter = armed.clone();
        s.on_first_observer(move || counter.set(counter.get() + 1));

        s.attach(|_: &i32| {});
        assert_eq!(armed.get(), 0);

        s.subscribe(|_: &i32| {});
        s.subscribe(|_: &i32| {});
        assert_eq!(armed.get(), 1);
    }
}
