//! Tests for `unregister`, `unregister_all` and registry queries.

use emit_listener::{EventEmitter, Listener};
use std::sync::{Arc, Mutex};

fn make_log() -> Arc<Mutex<Vec<String>>> {
    Arc::new(Mutex::new(Vec::new()))
}

fn logging(log: &Arc<Mutex<Vec<String>>>, label: &'static str) -> Listener<i32> {
    let log = Arc::clone(log);
    Listener::infallible(move |ev| log.lock().unwrap().push(format!("{label}:{}", ev.detail)))
}

// ============================================================================
// unregister
// ============================================================================

#[test]
fn unregister_without_handler_removes_every_listener() {
    let emitter: EventEmitter<i32> = EventEmitter::new();
    let h1 = Listener::infallible(|_| {});
    let h2 = Listener::infallible(|_| {});
    emitter.on("x", &h1);
    emitter.on("x", &h2);

    assert_eq!(emitter.unregister("x", None), 2);

    assert_eq!(emitter.listener_count("x"), 0);
    assert!(!emitter.has_listener("x", &h1));
    assert!(!emitter.has_listener("x", &h2));
}

#[test]
fn unregister_with_handler_preserves_order_of_the_rest() {
    let emitter: EventEmitter<i32> = EventEmitter::new();
    let log = make_log();
    let h1 = logging(&log, "h1");
    let h2 = logging(&log, "h2");
    let h3 = logging(&log, "h3");
    emitter.on("x", &h1);
    emitter.on("x", &h2);
    emitter.on("x", &h3);

    assert_eq!(emitter.off("x", Some(&h2)), 1);
    emitter.emit("x", 0).unwrap();

    assert_eq!(*log.lock().unwrap(), vec!["h1:0", "h3:0"]);
}

#[test]
fn unregister_unknown_handler_is_a_no_op() {
    let emitter: EventEmitter<i32> = EventEmitter::new();
    let registered = Listener::infallible(|_| {});
    let stranger = Listener::infallible(|_| {});
    emitter.on("x", &registered);

    assert_eq!(emitter.unregister("x", Some(&stranger)), 0);
    assert_eq!(emitter.listener_count("x"), 1);
}

#[test]
fn unregister_on_absent_event_is_a_no_op() {
    let emitter: EventEmitter<i32> = EventEmitter::new();
    let handler = Listener::infallible(|_| {});

    assert_eq!(emitter.unregister("missing", Some(&handler)), 0);
    assert_eq!(emitter.unregister("missing", None), 0);
}

#[test]
fn unregister_by_content_key_removes_lookalike() {
    let emitter: EventEmitter<i32> = EventEmitter::new();
    emitter.on("x", &Listener::with_source("body", |_| Ok(())));

    let lookalike = Listener::with_source("body", |_| Ok(()));
    assert_eq!(emitter.unregister("x", Some(&lookalike)), 1);
    assert_eq!(emitter.listener_count("x"), 0);
}

#[test]
fn removing_last_listener_drops_the_event() {
    let emitter: EventEmitter<i32> = EventEmitter::new();
    let handler = Listener::infallible(|_| {});
    emitter.on("x", &handler);

    emitter.off("x", Some(&handler));

    assert!(emitter.is_empty());
    assert!(emitter.event_names().is_empty());
}

// ============================================================================
// unregister_all
// ============================================================================

#[test]
fn unregister_all_clears_every_event() {
    let emitter: EventEmitter<i32> = EventEmitter::new();
    for name in ["a", "b", "c"] {
        emitter.on(name, &Listener::infallible(|_| {}));
    }

    emitter.unregister_all();

    for name in ["a", "b", "c", "never"] {
        assert_eq!(emitter.listener_count(name), 0);
    }
    assert!(emitter.is_empty());
}

// ============================================================================
// Queries
// ============================================================================

#[test]
fn listener_count_is_zero_for_unknown_event() {
    let emitter: EventEmitter<i32> = EventEmitter::new();
    assert_eq!(emitter.listener_count("x"), 0);
}

#[test]
fn event_names_follow_first_registration_order() {
    let emitter: EventEmitter<i32> = EventEmitter::new();
    emitter.on("b", &Listener::infallible(|_| {}));
    emitter.on("a", &Listener::infallible(|_| {}));
    emitter.on("c", &Listener::infallible(|_| {}));
    emitter.on("a", &Listener::infallible(|_| {}));

    emitter.off("c", None);

    assert_eq!(emitter.event_names(), vec!["b".to_string(), "a".to_string()]);
}
