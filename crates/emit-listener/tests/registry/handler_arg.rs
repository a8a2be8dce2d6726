//! Tests for the argument object handed to listeners.

use emit_listener::{EventEmitter, HandlerArg, Listener};
use serde_json::json;
use std::sync::{Arc, Mutex};

#[test]
fn handler_arg_serializes_with_type_field() {
    let arg = HandlerArg {
        detail: json!({ "user": "ada" }),
        event_type: "login".to_string(),
        timestamp: 1_700_000_000_000,
    };

    let value = serde_json::to_value(&arg).unwrap();

    assert_eq!(
        value,
        json!({
            "detail": { "user": "ada" },
            "type": "login",
            "timestamp": 1_700_000_000_000_i64,
        })
    );
}

#[test]
fn emitted_arg_carries_current_epoch_millis() {
    let emitter: EventEmitter<()> = EventEmitter::new();
    let seen = Arc::new(Mutex::new(None));

    {
        let seen = Arc::clone(&seen);
        emitter.on(
            "tick",
            &Listener::infallible(move |ev| *seen.lock().unwrap() = Some(ev.timestamp)),
        );
    }

    let before = now_millis();
    emitter.emit("tick", ()).unwrap();
    let after = now_millis();

    let ts = seen.lock().unwrap().expect("listener ran");
    assert!(ts >= before && ts <= after, "{before} <= {ts} <= {after}");
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
