#![allow(dead_code)]

use frp_signals::{
    current_scheduler, install_scheduler, make, EventLoop, Scheduler, SchedulerGuard, Signal,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Route `tracing` output through the test harness; safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

/// A fresh virtual-time loop installed for the current test.
pub fn virtual_loop() -> (Rc<EventLoop>, SchedulerGuard) {
    init_tracing();
    let rt = EventLoop::virtual_time();
    let guard = install_scheduler(rt.clone());
    (rt, guard)
}

/// Starts at `values[0]`, then writes the rest: the first after `initial`,
/// each following one `interval` later.
pub fn tick<T: Clone + 'static>(initial: u64, interval: u64, values: Vec<T>) -> Signal<T> {
    let mut values = values.into_iter();
    let out = make(values.next().expect("tick needs at least one value"));
    schedule_rest(out.clone(), values.collect(), initial, interval);
    out
}

fn schedule_rest<T: Clone + 'static>(out: Signal<T>, rest: Vec<T>, after: u64, interval: u64) {
    let mut rest = rest.into_iter();
    let Some(next) = rest.next() else {
        return;
    };
    let rest: Vec<T> = rest.collect();
    current_scheduler().schedule(
        Duration::from_millis(after),
        Box::new(move || {
            out.set(next);
            schedule_rest(out, rest, interval, interval);
        }),
    );
}

/// Every value `signal` emits from now on.
pub fn record<T: Clone + 'static>(signal: &Signal<T>) -> Rc<RefCell<Vec<T>>> {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let sink = calls.clone();
    signal.subscribe(move |value: &T| sink.borrow_mut().push(value.clone()));
    calls
}

pub fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}
