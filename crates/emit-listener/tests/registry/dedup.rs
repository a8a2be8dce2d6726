//! Tests for listener identity: reference and content-key deduplication.

use emit_listener::{EventEmitter, Listener};

// ============================================================================
// Reference identity
// ============================================================================

#[test]
fn registering_same_listener_twice_keeps_one_entry() {
    let emitter: EventEmitter<i32> = EventEmitter::new();
    let handler = Listener::infallible(|_| {});

    assert!(emitter.register("x", &handler));
    assert!(!emitter.register("x", &handler));

    assert_eq!(emitter.listener_count("x"), 1);
}

#[test]
fn clone_of_listener_is_a_duplicate() {
    let emitter: EventEmitter<i32> = EventEmitter::new();
    let handler = Listener::infallible(|_| {});

    emitter.on("x", &handler);
    emitter.on("x", &handler.clone());

    assert_eq!(emitter.listener_count("x"), 1);
    assert!(emitter.has_listener("x", &handler.clone()));
}

#[test]
fn distinct_anonymous_listeners_are_not_duplicates() {
    let emitter: EventEmitter<i32> = EventEmitter::new();

    emitter.on("x", &Listener::infallible(|_| {}));
    emitter.on("x", &Listener::infallible(|_| {}));

    assert_eq!(emitter.listener_count("x"), 2);
}

#[test]
fn same_listener_under_different_events_is_kept_for_each() {
    let emitter: EventEmitter<i32> = EventEmitter::new();
    let handler = Listener::infallible(|_| {});

    emitter.on("a", &handler);
    emitter.on("b", &handler);

    assert_eq!(emitter.listener_count("a"), 1);
    assert_eq!(emitter.listener_count("b"), 1);
}

// ============================================================================
// Content identity
// ============================================================================

#[test]
fn listeners_with_identical_source_are_deduplicated() {
    let emitter: EventEmitter<i32> = EventEmitter::new();
    let source = "|ev| results.push(ev.detail)";

    let first = Listener::with_source(source, |_| Ok(()));
    let second = Listener::with_source(source, |_| Ok(()));
    assert!(!first.is_same(&second));

    emitter.on("x", &first);
    emitter.on("x", &second);

    assert_eq!(emitter.listener_count("x"), 1);
}

#[test]
fn has_listener_falls_back_to_content_key() {
    let emitter: EventEmitter<i32> = EventEmitter::new();
    emitter.on("x", &Listener::with_source("body", |_| Ok(())));

    let lookalike = Listener::with_source("body", |_| Ok(()));
    let other = Listener::with_source("other body", |_| Ok(()));

    assert!(emitter.has_listener("x", &lookalike));
    assert!(!emitter.has_listener("x", &other));
}

#[test]
fn has_listener_is_false_for_unknown_event() {
    let emitter: EventEmitter<i32> = EventEmitter::new();
    let handler = Listener::infallible(|_| {});
    emitter.on("x", &handler);

    assert!(!emitter.has_listener("y", &handler));
}
