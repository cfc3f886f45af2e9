// ============================================================================
// frp-signals - Propagation
// The synchronous, depth-first notification pass behind every write
// ============================================================================
//
// A write to a node stores the value and calls each subscriber in
// registration order. Subscribers are usually combinator glue that writes
// to another node, so one external write walks the whole dependent subgraph
// depth-first before returning.
//
// Re-entrant writes to a node that is already notifying are queued on that
// node and applied, each with its own full pass, once the current pass ends.
//
// A seed announcement is a pass that reaches observers only and does not
// count as a write; combinator glue already consumed that value when it was
// built.
//
// Each subscriber call is isolated with catch_unwind: a panicking subscriber
// does not stop its siblings or the queue drain. Captured panics are handed
// back to the caller as a PassOutcome.
// ============================================================================

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tracing::{trace, warn};

use crate::core::context::with_context;
use crate::core::error::{panic_message, PropagationError, PropagationResult};
use crate::core::types::{SignalInner, Subscriber};

// =============================================================================
// PASS OUTCOME
// =============================================================================

/// What happened during a write: the panics captured from subscribers.
#[derive(Default)]
pub struct PassOutcome {
    failures: Vec<Box<dyn Any + Send>>,
}

impl PassOutcome {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Re-raise the first captured panic on the caller, if any.
    pub fn resume(self) {
        if let Some(payload) = self.failures.into_iter().next() {
            panic::resume_unwind(payload);
        }
    }

    /// Convert captured panics into a `PropagationError`.
    pub fn into_result<T>(self, inner: &SignalInner<T>) -> PropagationResult<()> {
        let failures = self.failures.len();
        match self.failures.into_iter().next() {
            None => Ok(()),
            Some(first) => Err(PropagationError::SubscriberPanicked {
                signal: inner.id(),
                failures,
                message: panic_message(first.as_ref()),
            }),
        }
    }
}

// =============================================================================
// PASS GUARD
// =============================================================================

/// Marks a node as notifying for the lifetime of the guard.
///
/// Dropping the guard (normally or while unwinding) clears the flag and any
/// writes still queued, so a node never stays stuck in the notifying state.
struct PassGuard<'a, T> {
    inner: &'a SignalInner<T>,
}

impl<'a, T> PassGuard<'a, T> {
    fn enter(inner: &'a SignalInner<T>) -> Self {
        inner.set_notifying(true);
        with_context(|ctx| ctx.enter_pass());
        Self { inner }
    }
}

impl<T> Drop for PassGuard<'_, T> {
    fn drop(&mut self) {
        self.inner.clear_pending();
        self.inner.set_notifying(false);
        with_context(|ctx| ctx.exit_pass());
    }
}

// =============================================================================
// WRITE
// =============================================================================

/// Store `value` on `inner` and notify its subscribers.
///
/// If `inner` is already notifying, the value is queued and this returns
/// immediately with a clean outcome; the running pass applies it later.
pub fn write<T: Clone + 'static>(inner: &SignalInner<T>, value: T) -> PassOutcome {
    if inner.is_notifying() {
        inner.enqueue(value);
        trace!(
            signal = %inner.id(),
            queued = inner.pending_count(),
            "queued re-entrant write"
        );
        return PassOutcome::default();
    }

    run_pass(inner, value, Delivery::Write)
}

/// Re-emit `value` as the node's seed to its observers.
///
/// The value is kept without bumping the version. Writes queued by the
/// observers are drained as ordinary writes afterwards. An announcement
/// that arrives while the node is notifying is dropped.
pub fn announce<T: Clone + 'static>(inner: &SignalInner<T>, value: T) -> PassOutcome {
    if inner.is_notifying() {
        trace!(signal = %inner.id(), "announcement during a pass; dropped");
        return PassOutcome::default();
    }
    run_pass(inner, value, Delivery::Seed)
}

#[derive(Clone, Copy)]
enum Delivery {
    Write,
    Seed,
}

fn run_pass<T: Clone + 'static>(
    inner: &SignalInner<T>,
    value: T,
    delivery: Delivery,
) -> PassOutcome {
    let _pass = PassGuard::enter(inner);
    let mut outcome = PassOutcome::default();
    let mut next = Some((value, delivery));

    while let Some((value, delivery)) = next {
        let subscribers = match delivery {
            Delivery::Write => {
                inner.store(value.clone());
                inner.subscriber_snapshot()
            }
            Delivery::Seed => {
                inner.refresh(value.clone());
                inner.observer_snapshot()
            }
        };
        notify(inner, subscribers, &value, &mut outcome);
        next = inner.dequeue().map(|queued| (queued, Delivery::Write));
    }

    outcome
}

/// Call `subscribers` with `value`, isolating each call.
fn notify<T: 'static>(
    inner: &SignalInner<T>,
    subscribers: Vec<Subscriber<T>>,
    value: &T,
    outcome: &mut PassOutcome,
) {
    if subscribers.is_empty() {
        return;
    }

    trace!(
        signal = %inner.id(),
        subscribers = subscribers.len(),
        depth = with_context(|ctx| ctx.propagation_depth()),
        "propagating"
    );

    for subscriber in subscribers {
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| subscriber(value))) {
            warn!(
                signal = %inner.id(),
                message = %panic_message(payload.as_ref()),
                "subscriber panicked; continuing pass"
            );
            outcome.failures.push(payload);
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
