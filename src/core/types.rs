// ============================================================================
// frp-signals - Type Definitions
// The node behind every Signal<T> and the identifiers used to name it
// ============================================================================

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use super::context::with_context;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Process-unique (per thread) identifier of a signal node.
///
/// Used in log output and error reports; it carries no semantics of its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SignalId(u64);

impl SignalId {
    pub(crate) fn next() -> Self {
        SignalId(with_context(|ctx| ctx.allocate_signal_id()))
    }

    /// Raw numeric value of the id.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SignalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =============================================================================
// CALLBACK TYPES
// =============================================================================

/// A subscriber callback. Receives every value written to the signal.
pub type Subscriber<T> = Rc<dyn Fn(&T)>;

/// A zero-argument callback carried as a signal payload (see `run`/`unwrap`).
pub type Thunk<R = ()> = Rc<dyn Fn() -> R>;

/// Who registered a subscriber.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubscriberKind {
    /// Attached through `subscribe`; receives seed announcements.
    Observer,
    /// Combinator glue. It read the current value when it was built, so
    /// seed announcements skip it.
    Derived,
}

// =============================================================================
// SIGNAL INNER (the data behind Signal<T>)
// =============================================================================

/// The shared node behind a `Signal<T>` handle.
///
/// Holds the current value, the append-only subscriber list, and the
/// bookkeeping the propagation pass needs to serialize re-entrant writes.
pub struct SignalInner<T> {
    id: SignalId,

    /// The current value. Only replaced by the propagation pass.
    value: RefCell<T>,

    /// Subscribers in registration order.
    subscribers: RefCell<Vec<(SubscriberKind, Subscriber<T>)>>,

    /// True while a notification pass for this node is running.
    notifying: Cell<bool>,

    /// Writes issued while `notifying` was set, in submission order.
    pending: RefCell<VecDeque<T>>,

    /// Incremented on every stored write.
    version: Cell<u64>,

    /// Schedules the seed announcement; taken by the first observer.
    seed_announcer: RefCell<Option<Box<dyn FnOnce()>>>,
}

impl<T> SignalInner<T> {
    pub fn new(value: T) -> Self {
        Self {
            id: SignalId::next(),
            value: RefCell::new(value),
            subscribers: RefCell::new(Vec::new()),
            notifying: Cell::new(false),
            pending: RefCell::new(VecDeque::new()),
            version: Cell::new(0),
            seed_announcer: RefCell::new(None),
        }
    }

    pub fn id(&self) -> SignalId {
        self.id
    }

    pub fn version(&self) -> u64 {
        self.version.get()
    }

    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.value.borrow().clone()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.value.borrow())
    }

    /// Store a new value and bump the version. Does not notify.
    pub fn store(&self, value: T) {
        *self.value.borrow_mut() = value;
        self.version.set(self.version.get() + 1);
    }

    /// Replace the value without counting a write. Used to re-emit a seed.
    pub fn refresh(&self, value: T) {
        *self.value.borrow_mut() = value;
    }

    pub fn add_subscriber(&self, kind: SubscriberKind, subscriber: Subscriber<T>) {
        self.subscribers.borrow_mut().push((kind, subscriber));
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    /// Copy of the subscriber list, so callbacks can run without holding
    /// the borrow (they may subscribe to this very node).
    pub fn subscriber_snapshot(&self) -> Vec<Subscriber<T>> {
        self.subscribers
            .borrow()
            .iter()
            .map(|(_, subscriber)| subscriber.clone())
            .collect()
    }

    /// Like [`SignalInner::subscriber_snapshot`], observers only.
    pub fn observer_snapshot(&self) -> Vec<Subscriber<T>> {
        self.subscribers
            .borrow()
            .iter()
            .filter(|(kind, _)| *kind == SubscriberKind::Observer)
            .map(|(_, subscriber)| subscriber.clone())
            .collect()
    }

    pub fn set_seed_announcer(&self, announcer: Box<dyn FnOnce()>) {
        *self.seed_announcer.borrow_mut() = Some(announcer);
    }

    pub fn take_seed_announcer(&self) -> Option<Box<dyn FnOnce()>> {
        self.seed_announcer.borrow_mut().take()
    }

    pub fn is_notifying(&self) -> bool {
        self.notifying.get()
    }

    pub fn set_notifying(&self, value: bool) -> bool {
        self.notifying.replace(value)
    }

    pub fn enqueue(&self, value: T) {
        self.pending.borrow_mut().push_back(value);
    }

    pub fn dequeue(&self) -> Option<T> {
        self.pending.borrow_mut().pop_front()
    }

    pub fn clear_pending(&self) {
        self.pending.borrow_mut().clear();
    }

    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let a = SignalInner::new(1);
        let b = SignalInner::new(1);
        assert_ne!(a.id(), b.id());
        assert!(b.id() > a.id());
    }

    #[test]
    fn store_bumps_version() {
        let inner = SignalInner::new("a");
        assert_eq!(inner.version(), 0);

        inner.store("b");
        inner.store("c");
        assert_eq!(inner.version(), 2);
        assert_eq!(inner.get(), "c");
    }

    #[test]
    fn pending_queue_is_fifo() {
        let inner = SignalInner::new(0);
        inner.enqueue(1);
        inner.enqueue(2);
        assert_eq!(inner.pending_count(), 2);
        assert_eq!(inner.dequeue(), Some(1));
        assert_eq!(inner.dequeue(), Some(2));
        assert_eq!(inner.dequeue(), None);
    }

    #[test]
    fn snapshot_is_detached_from_list() {
        let inner = SignalInner::new(0);
        inner.add_subscriber(SubscriberKind::Observer, Rc::new(|_: &i32| {}));

        let snapshot = inner.subscriber_snapshot();
        inner.add_subscriber(SubscriberKind::Observer, Rc::new(|_: &i32| {}));

        assert_eq!(snapshot.len(), 1);
        assert_eq!(inner.subscriber_count(), 2);
    }

    #[test]
    fn observer_snapshot_skips_derived() {
        let inner = SignalInner::new(0);
        inner.add_subscriber(SubscriberKind::Derived, Rc::new(|_: &i32| {}));
        inner.add_subscriber(SubscriberKind::Observer, Rc::new(|_: &i32| {}));

        assert_eq!(inner.subscriber_snapshot().len(), 2);
        assert_eq!(inner.observer_snapshot().len(), 1);
    }

    #[test]
    fn refresh_does_not_count_as_write() {
        let inner = SignalInner::new(1);
        inner.refresh(2);
        assert_eq!(inner.get(), 2);
        assert_eq!(inner.version(), 0);
    }

    #[test]
    fn seed_announcer_is_taken_once() {
        let inner = SignalInner::new(());
        inner.set_seed_announcer(Box::new(|| {}));
        assert!(inner.take_seed_announcer().is_some());
        assert!(inner.take_seed_announcer().is_none());
    }

    #[test]
    fn display_id() {
        let inner = SignalInner::new(());
        assert_eq!(inner.id().to_string(), format!("#{}", inner.id().as_u64()));
    }
}
