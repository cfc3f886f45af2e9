mod common;

use common::{init_tracing, ms, record, tick, virtual_loop};
use frp_signals::{
    delay, delay_with_token, event_loop, every, every_with_token, install_scheduler, make, map,
    since, CancelToken, ClockMode, EventLoop, LoopConfig, Scheduler,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

#[test]
fn test_every_emits_scheduler_time() {
    let (rt, _guard) = virtual_loop();
    let clock = every(ms(25));
    let calls = record(&clock);

    rt.run_for(ms(100));
    assert_eq!(*calls.borrow(), vec![ms(25), ms(50), ms(75), ms(100)]);
}

#[test]
fn test_every_does_not_drift() {
    let (rt, _guard) = virtual_loop();
    let clock = every(ms(3));

    for _ in 0..10 {
        rt.advance(ms(7));
    }
    assert_eq!(clock.get(), ms(69));
    assert_eq!(rt.next_deadline(), Some(ms(72)));
}

#[test]
fn test_every_with_token_stops() {
    let (rt, _guard) = virtual_loop();
    let token = CancelToken::new();
    let clock = every_with_token(ms(10), &token);
    let calls = record(&clock);

    rt.run_for(ms(30));
    token.cancel();
    rt.run_until_idle();

    assert_eq!(calls.borrow().len(), 3);
    assert!(rt.is_idle());
}

#[test]
fn test_delay_replays_each_update_in_order() {
    let (rt, _guard) = virtual_loop();
    let ticker = tick(1, 1, vec![0, 1, 2, 3]);
    let late = delay(ms(40), &ticker);
    let calls = record(&late);

    rt.run_for(ms(40));
    // seed, announced once the wait has passed
    assert_eq!(*calls.borrow(), vec![0]);

    rt.run_for(ms(3));
    assert_eq!(*calls.borrow(), vec![0, 1, 2, 3]);
}

#[test]
fn test_delay_records_wait() {
    let (rt, _guard) = virtual_loop();
    let source = make(0);
    let late = delay(ms(40), &source);

    let stamps = Rc::new(RefCell::new(Vec::new()));
    {
        let stamps = stamps.clone();
        let rt = rt.clone();
        late.subscribe(move |v: &i32| stamps.borrow_mut().push((*v, rt.now())));
    }

    rt.run_for(ms(40));
    source.set(7);
    rt.run_for(ms(5));
    source.set(8);
    rt.run_until_idle();

    assert_eq!(
        *stamps.borrow(),
        vec![(0, ms(40)), (7, ms(80)), (8, ms(85))]
    );
}

#[test]
fn test_delay_token_cancels_pending() {
    let (rt, _guard) = virtual_loop();
    let token = CancelToken::new();
    let source = make(0);
    let late = delay_with_token(ms(10), &source, &token);

    source.set(1);
    rt.run_for(ms(10));
    assert_eq!(late.get(), 1);

    source.set(2);
    token.cancel();
    rt.run_until_idle();
    assert_eq!(late.get(), 1);
}

#[test]
fn test_since_goes_true_then_false() {
    let (rt, _guard) = virtual_loop();
    let source = make(());
    let active = since(ms(50), &source);
    let edges = record(&active);

    rt.run_pending();
    for _ in 0..5 {
        source.set(());
        rt.run_for(ms(20));
    }
    assert!(active.get());
    rt.run_for(ms(30));
    assert!(!active.get());

    assert_eq!(*edges.borrow(), vec![false, true, false]);
}

#[test]
fn test_since_rearms_after_reset() {
    let (rt, _guard) = virtual_loop();
    let source = make(0);
    let active = since(ms(10), &source);
    let edges = record(&active);

    source.set(1);
    rt.run_for(ms(10));
    source.set(2);
    rt.run_for(ms(10));

    assert_eq!(*edges.borrow(), vec![true, false, true, false]);
}

#[test]
fn test_installed_scheduler_restored_by_guard() {
    init_tracing();
    let outer = EventLoop::virtual_time();
    let _outer_guard = install_scheduler(outer.clone());
    {
        let inner = EventLoop::virtual_time();
        let _inner_guard = install_scheduler(inner.clone());
        let _clock = every(ms(10));
        assert_eq!(inner.pending(), 1);
    }
    let _clock = every(ms(10));
    assert_eq!(outer.pending(), 1);
}

#[test]
fn test_fire_limit_caps_a_run() {
    init_tracing();
    let rt = EventLoop::with_config(LoopConfig::virtual_time().with_max_fires_per_run(5));
    let _guard = install_scheduler(rt.clone());

    let _clock = every(ms(1));
    assert_eq!(rt.run_until_idle(), 5);
    assert_eq!(rt.now(), ms(5));
}

#[test]
fn test_realtime_loop_waits_for_deadlines() {
    init_tracing();
    let started = Instant::now();
    let rt = EventLoop::with_config(LoopConfig::default().with_clock(ClockMode::Realtime));
    let _guard = install_scheduler(rt.clone());

    let source = make(1);
    let late = delay(ms(20), &map(|n: &i32| n + 1, &source));
    let calls = record(&late);
    rt.run_until_idle();

    assert!(started.elapsed() >= ms(20));
    assert_eq!(*calls.borrow(), vec![2]);
}

#[test]
fn test_default_loop_is_realtime() {
    let rt = event_loop();
    assert_eq!(rt.config().clock, ClockMode::Realtime);
    assert!(Rc::ptr_eq(&rt, &event_loop()));
}
