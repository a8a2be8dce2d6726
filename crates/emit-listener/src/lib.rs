//! In-process named-event listener registry.
//!
//! # Overview
//!
//! [`EventEmitter`] keeps, per event name, an ordered list of [`Listener`]s
//! and dispatches emitted payloads to them synchronously, in registration
//! order. Emitting a name with no listeners is an error.
//!
//! ```
//! use std::sync::{Arc, Mutex};
//! use emit_listener::{EventEmitter, HandlerArg, Listener};
//!
//! let emitter: EventEmitter<String> = EventEmitter::new();
//! let results = Arc::new(Mutex::new(Vec::new()));
//!
//! let sink = Arc::clone(&results);
//! emitter.on("greet", &Listener::infallible(move |ev: &HandlerArg<String>| {
//!     sink.lock().unwrap().push(ev.detail.clone());
//! }));
//!
//! emitter.emit("greet", "hi".to_string()).unwrap();
//! assert_eq!(*results.lock().unwrap(), vec!["hi".to_string()]);
//! assert!(emitter.emit("part", String::new()).is_err());
//! ```
//!
//! # Modules
//!
//! - [`registry`] — [`EventEmitter<T>`] itself.
//! - [`listener`] — [`Listener<T>`], [`HandlerArg<T>`], [`ListenerSpec<T>`].
//! - [`key`] — event and listener key derivation.
//! - [`config`] — [`RegistryConfig`] and its policies.
//! - [`error`] — [`EmitError`] and [`ConfigError`].

pub mod config;
pub mod error;
pub mod key;
pub mod listener;
pub mod registry;

pub use config::{ErrorPolicy, OnceEviction, RegistryConfig};
pub use error::{BoxError, ConfigError, EmitError, Result};
pub use key::{EventKey, HandlerKey};
pub use listener::{HandlerArg, Listener, ListenerFn, ListenerResult, ListenerSpec};
pub use registry::{EventEmitter, ListenerRegistry};
