//! Fan-out through the middleware chain.

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::mpsc::channel;
use std::time::Duration;
use std::sync::{Arc, Mutex};

use typed_notifier::{ExecutionContext, Notifier, NotifierConfig};

use crate::support::{assert_quiet, collect, inline_notifier};

#[test]
fn middleware_runs_once_per_handler_chain() {
    let notifier = Notifier::new();
    let counter = Arc::new(AtomicI32::new(0));
    let (done_tx, done_rx) = channel();
    let done_tx = Arc::new(Mutex::new(done_tx));

    let middleware_counter = Arc::clone(&counter);
    notifier
        .register_middleware(move |ctx: &mut ExecutionContext| {
            middleware_counter.fetch_add(1, Ordering::SeqCst);
            ctx.next();
        })
        .unwrap();
    for _ in 0..2 {
        let counter = Arc::clone(&counter);
        let done_tx = Arc::clone(&done_tx);
        notifier
            .register_handler(move |value: i32| {
                counter.fetch_add(value, Ordering::SeqCst);
                done_tx.lock().unwrap().send(()).unwrap();
            })
            .unwrap();
    }

    notifier.publish(1i32);
    collect(&done_rx, 2);

    // Two chains of middleware(+1) then handler(+1).
    assert_eq!(counter.load(Ordering::SeqCst), 4);
}

#[test]
fn middleware_without_next_skips_handler() {
    let notifier = Notifier::new();
    let counter = Arc::new(AtomicI32::new(0));
    let (done_tx, done_rx) = channel();
    let (handler_tx, handler_rx) = channel();
    let done_tx = Mutex::new(done_tx);
    let handler_tx = Mutex::new(handler_tx);

    let first = Arc::clone(&counter);
    notifier
        .register_middleware(move |ctx: &mut ExecutionContext| {
            first.store(5, Ordering::SeqCst);
            ctx.next();
        })
        .unwrap();
    notifier
        .register_middleware(move |_: &mut ExecutionContext| {
            done_tx.lock().unwrap().send(()).unwrap();
        })
        .unwrap();
    let handler_counter = Arc::clone(&counter);
    notifier
        .register_handler(move |value: i32| {
            handler_counter.fetch_add(value, Ordering::SeqCst);
            handler_tx.lock().unwrap().send(()).unwrap();
        })
        .unwrap();

    notifier.publish(1i32);
    collect(&done_rx, 1);

    assert_eq!(counter.load(Ordering::SeqCst), 5);
    assert_quiet(&handler_rx);
}

#[test]
fn publish_returns_before_handler_finishes() {
    let notifier = Notifier::new();
    let (gate_tx, gate_rx) = channel::<()>();
    let (events_tx, events_rx) = channel();
    let gate_rx = Mutex::new(gate_rx);
    let events_tx = Arc::new(Mutex::new(events_tx));

    let handler_events = Arc::clone(&events_tx);
    notifier
        .register_handler(move |_: i32| {
            // Gives up after a while so a blocking publish fails instead of hanging.
            let released = gate_rx
                .lock()
                .unwrap()
                .recv_timeout(Duration::from_secs(5))
                .is_ok();
            handler_events
                .lock()
                .unwrap()
                .send(if released { "handled" } else { "timed out" })
                .unwrap();
        })
        .unwrap();

    notifier.publish(1i32);
    events_tx.lock().unwrap().send("published").unwrap();
    gate_tx.send(()).unwrap();

    assert_eq!(collect(&events_rx, 2), vec!["published", "handled"]);
}

#[test]
fn middlewares_run_in_registration_order() {
    let notifier = inline_notifier();
    let trace = Arc::new(Mutex::new(Vec::new()));

    for name in ["auth", "audit", "metrics"] {
        let trace = Arc::clone(&trace);
        notifier
            .register_middleware(move |ctx: &mut ExecutionContext| {
                trace.lock().unwrap().push(name.to_string());
                ctx.next();
            })
            .unwrap();
    }
    let handler_trace = Arc::clone(&trace);
    notifier
        .register_handler(move |value: String| handler_trace.lock().unwrap().push(value))
        .unwrap();

    notifier.publish("handler".to_string());

    assert_eq!(
        *trace.lock().unwrap(),
        vec!["auth", "audit", "metrics", "handler"]
    );
}

#[test]
fn middleware_sees_parameter_type() {
    let notifier = inline_notifier();
    let names = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&names);
    notifier
        .register_middleware(move |ctx: &mut ExecutionContext| {
            sink.lock().unwrap().push(ctx.type_name());
            ctx.next();
        })
        .unwrap();
    notifier.register_handler(|_: u16| {}).unwrap();
    notifier.register_handler(|_: bool| {}).unwrap();

    notifier.publish(3u16);
    notifier.publish(true);

    assert_eq!(*names.lock().unwrap(), vec!["u16", "bool"]);
}

#[test]
fn shared_reference_parameter_is_seen_by_all_handlers() {
    let notifier = Notifier::new();
    let (done_tx, done_rx) = channel();
    let done_tx = Arc::new(Mutex::new(done_tx));

    for _ in 0..3 {
        let done_tx = Arc::clone(&done_tx);
        notifier
            .register_handler(move |shared: Arc<AtomicI32>| {
                shared.fetch_add(1, Ordering::SeqCst);
                done_tx.lock().unwrap().send(()).unwrap();
            })
            .unwrap();
    }

    let shared = Arc::new(AtomicI32::new(0));
    notifier.publish(Arc::clone(&shared));
    collect(&done_rx, 3);

    assert_eq!(shared.load(Ordering::SeqCst), 3);
}

#[test]
fn panicking_handler_does_not_stop_siblings() {
    let notifier = Notifier::with_config(NotifierConfig::default().with_thread_name("panicky").unwrap());
    let (tx, rx) = channel();
    let tx = Arc::new(Mutex::new(tx));

    notifier
        .register_handler(|_: u32| panic!("handler failed"))
        .unwrap();
    let sibling_tx = Arc::clone(&tx);
    notifier
        .register_handler(move |value: u32| sibling_tx.lock().unwrap().send(value).unwrap())
        .unwrap();

    notifier.publish(1u32);
    assert_eq!(collect(&rx, 1), vec![1]);

    // Registry is still usable after the panic.
    let late_tx = Arc::clone(&tx);
    notifier
        .register_handler(move |value: u32| late_tx.lock().unwrap().send(value * 10).unwrap())
        .unwrap();
    notifier.publish(2u32);

    let mut received = collect(&rx, 2);
    received.sort();
    assert_eq!(received, vec![2, 20]);
}

#[test]
fn publish_with_no_handlers_is_a_noop() {
    let notifier = inline_notifier();
    let calls = Arc::new(AtomicI32::new(0));
    let counter = Arc::clone(&calls);
    notifier
        .register_middleware(move |ctx: &mut ExecutionContext| {
            counter.fetch_add(1, Ordering::SeqCst);
            ctx.next();
        })
        .unwrap();

    notifier.publish("nobody listens");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}
