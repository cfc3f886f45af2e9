mod common;

use common::{ms, record, tick, virtual_loop};
use frp_signals::{channel, map, on, send, signal, subscribe, Channel};
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn test_channel_yields_sent_values() {
    let (rt, _guard) = virtual_loop();
    let chan = channel(1);
    let ticker = tick(1, 1, vec![2, 3, 4]);

    on(
        {
            let chan = chan.clone();
            move |v: &mut i32| send(*v, &chan)
        },
        &ticker,
    );

    let calls = Rc::new(RefCell::new(Vec::new()));
    let sink = calls.clone();
    subscribe(move |v: &i32| sink.borrow_mut().push(*v), &signal(&chan));

    rt.run_for(ms(50));
    assert_eq!(*calls.borrow(), vec![2, 3, 4]);
}

#[test]
fn test_channel_signal_is_shared() {
    let chan = Channel::new("idle");
    let first = chan.signal();
    let second = signal(&chan);
    assert!(first.ptr_eq(&second));

    chan.send("busy");
    assert_eq!(first.get(), "busy");
    assert_eq!(second.get(), "busy");
}

#[test]
fn test_channel_feeds_derived_signals() {
    let (_rt, _guard) = virtual_loop();
    let chan = channel(0u32);
    let squares = map(|n: &u32| n * n, &chan.signal());
    let calls = record(&squares);

    for n in 1..=3 {
        send(n, &chan);
    }
    assert_eq!(*calls.borrow(), vec![1, 4, 9]);
}

#[test]
fn test_try_send_reports_panicking_subscriber() {
    let chan = channel(0);
    chan.signal().subscribe(|n: &i32| assert!(*n < 10, "too large"));

    assert!(chan.try_send(5).is_ok());
    let err = chan.try_send(50).unwrap_err();
    assert!(err.to_string().contains("too large"));
    assert_eq!(chan.signal().get(), 50);
}
