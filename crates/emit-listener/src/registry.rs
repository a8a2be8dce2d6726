//! EventEmitter<T> — a named-event listener registry with synchronous dispatch.
//!
//! Listeners are grouped by a key derived from the event name and kept in
//! registration order, which is also the dispatch order.
//!
//! `emit` dispatches over the entry list as it stood when the call began.
//! Registry changes made by a listener show up on the next emit: an entry
//! it unregisters still runs this round, one it registers does not.
//!
//! Once listeners: `register_once` replaces whatever was registered under the
//! name. When a once entry has run, the whole event is dropped from the
//! registry (see [`OnceEviction`] for the narrower alternative), yet the
//! entries captured behind it in the same emit are still invoked before they
//! disappear with it.
//!
//! A listener returning `Err` stops the dispatch and the error is handed back
//! unchanged. Panics inside a listener unwind through `emit`.
//!
//! State sits behind a `parking_lot::Mutex` so every method takes `&self`.
//! `emit` drops the guard before invoking anything, which is what lets a
//! listener call `register()` or `unregister()` on the emitter it was
//! dispatched from.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::{
    config::{ErrorPolicy, OnceEviction, RegistryConfig},
    error::{ConfigError, EmitError, Result},
    key::{EventKey, HandlerKey},
    listener::{HandlerArg, Listener, ListenerSpec},
};

/// The registry under its descriptive name.
pub type ListenerRegistry<T> = EventEmitter<T>;

struct ListenerEntry<T> {
    key: HandlerKey,
    handler: Listener<T>,
    once: bool,
}

impl<T> ListenerEntry<T> {
    fn new(handler: &Listener<T>, once: bool) -> Self {
        Self {
            key: handler.key(),
            handler: handler.clone(),
            once,
        }
    }
}

impl<T> Clone for ListenerEntry<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key,
            handler: self.handler.clone(),
            once: self.once,
        }
    }
}

/// Listeners registered under one event key.
struct EventSlot<T> {
    /// Raw name as first registered, reported by `event_names()`.
    name: String,
    /// Creation order among slots.
    seq: u64,
    entries: Vec<ListenerEntry<T>>,
}

struct RegistryState<T> {
    events: HashMap<EventKey, EventSlot<T>>,
    next_seq: u64,
}

impl<T> RegistryState<T> {
    fn new() -> Self {
        Self {
            events: HashMap::new(),
            next_seq: 0,
        }
    }

    fn slot_mut(&mut self, key: EventKey, name: &str) -> &mut EventSlot<T> {
        let seq = &mut self.next_seq;
        self.events.entry(key).or_insert_with(|| {
            let slot = EventSlot {
                name: name.to_string(),
                seq: *seq,
                entries: Vec::new(),
            };
            *seq += 1;
            slot
        })
    }

    /// Entries for `key`, or `None` when nothing is registered.
    fn entries(&self, key: &EventKey) -> Option<&[ListenerEntry<T>]> {
        self.events
            .get(key)
            .map(|slot| slot.entries.as_slice())
            .filter(|entries| !entries.is_empty())
    }
}

/// Named-event emitter with ordered, deduplicated listeners.
///
/// `T` is the payload type. Each listener receives a [`HandlerArg<T>`]
/// carrying the payload, the event name and the emit timestamp.
pub struct EventEmitter<T> {
    state: Mutex<RegistryState<T>>,
    config: RegistryConfig,
}

impl<T> EventEmitter<T> {
    /// Create a new, empty emitter with the default config.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(RegistryState::new()),
            config: RegistryConfig::default(),
        }
    }

    /// Create a new, empty emitter after validating `config`.
    pub fn with_config(config: RegistryConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            state: Mutex::new(RegistryState::new()),
            config,
        })
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    fn event_key(&self, name: &str) -> EventKey {
        EventKey::with_prefix(&self.config.key_prefix, name)
    }

    /// `handler`'s key rendered with this emitter's prefix, as it appears in
    /// log fields.
    pub fn handler_key(&self, handler: &Listener<T>) -> String {
        handler.key().render(&self.config.key_prefix)
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Append `handler` to the listeners of `name`.
    ///
    /// Returns `false` without changing anything when an equal listener (same
    /// closure, or same [`HandlerKey`]) is already registered for `name`.
    pub fn register(&self, name: &str, handler: &Listener<T>) -> bool {
        let key = self.event_key(name);
        let mut state = self.state.lock();
        let slot = state.slot_mut(key, name);
        if slot.entries.iter().any(|entry| entry.handler.matches(handler)) {
            tracing::trace!(event = name, handler_key = %self.handler_key(handler), "duplicate listener ignored");
            return false;
        }
        slot.entries.push(ListenerEntry::new(handler, false));
        tracing::debug!(
            event = name,
            handler_key = %self.handler_key(handler),
            listeners = slot.entries.len(),
            "listener registered"
        );
        true
    }

    /// Alias for [`register`](Self::register).
    pub fn on(&self, name: &str, handler: &Listener<T>) -> bool {
        self.register(name, handler)
    }

    /// Register `handler` to run on the next emit of `name` only.
    ///
    /// **Note**: this replaces every listener currently registered for
    /// `name`, once or persistent. Registering two once listeners in a row
    /// leaves only the latter.
    pub fn register_once(&self, name: &str, handler: &Listener<T>) {
        let key = self.event_key(name);
        let mut state = self.state.lock();
        let slot = state.slot_mut(key, name);
        let replaced = slot.entries.len();
        slot.entries = vec![ListenerEntry::new(handler, true)];
        tracing::debug!(
            event = name,
            handler_key = %self.handler_key(handler),
            replaced,
            "once listener registered"
        );
    }

    /// Alias for [`register_once`](Self::register_once).
    pub fn once(&self, name: &str, handler: &Listener<T>) {
        self.register_once(name, handler)
    }

    /// Register several listeners, in order. Each spec goes through
    /// [`register`](Self::register) or [`register_once`](Self::register_once)
    /// depending on its `once` flag.
    pub fn register_batch<I>(&self, specs: I)
    where
        I: IntoIterator<Item = ListenerSpec<T>>,
    {
        for spec in specs {
            if spec.once {
                self.register_once(&spec.name, &spec.handler);
            } else {
                self.register(&spec.name, &spec.handler);
            }
        }
    }

    // ========================================================================
    // Removal
    // ========================================================================

    /// Remove listeners of `name` and return how many were removed.
    ///
    /// With `None`, every listener of `name` goes. With `Some(handler)`, the
    /// first entry whose key equals the handler's key goes. Absent events and
    /// unknown handlers are no-ops.
    pub fn unregister(&self, name: &str, handler: Option<&Listener<T>>) -> usize {
        let key = self.event_key(name);
        let mut state = self.state.lock();
        if state.entries(&key).is_none() {
            return 0;
        }
        let removed = match handler {
            None => state.events.remove(&key).map_or(0, |slot| slot.entries.len()),
            Some(handler) => {
                let target = handler.key();
                let Some(slot) = state.events.get_mut(&key) else {
                    return 0;
                };
                let Some(index) = slot.entries.iter().position(|entry| entry.key == target) else {
                    return 0;
                };
                slot.entries.remove(index);
                if slot.entries.is_empty() {
                    state.events.remove(&key);
                }
                1
            }
        };
        tracing::debug!(event = name, removed, "listeners removed");
        removed
    }

    /// Alias for [`unregister`](Self::unregister).
    pub fn off(&self, name: &str, handler: Option<&Listener<T>>) -> usize {
        self.unregister(name, handler)
    }

    /// Remove every listener of every event.
    pub fn unregister_all(&self) {
        let mut state = self.state.lock();
        let events = state.events.len();
        state.events.clear();
        tracing::debug!(events, "all listeners removed");
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Whether `handler` is registered for `name`, first by reference and
    /// then by key.
    pub fn has_listener(&self, name: &str, handler: &Listener<T>) -> bool {
        let key = self.event_key(name);
        let state = self.state.lock();
        let Some(entries) = state.entries(&key) else {
            return false;
        };
        if entries.iter().any(|entry| entry.handler.is_same(handler)) {
            return true;
        }
        let target = handler.key();
        entries.iter().any(|entry| entry.key == target)
    }

    /// Number of listeners registered for `name`.
    pub fn listener_count(&self, name: &str) -> usize {
        let key = self.event_key(name);
        self.state.lock().entries(&key).map_or(0, <[_]>::len)
    }

    /// Names of events that currently have listeners, oldest first.
    pub fn event_names(&self) -> Vec<String> {
        let state = self.state.lock();
        let mut slots: Vec<&EventSlot<T>> =
            state.events.values().filter(|slot| !slot.entries.is_empty()).collect();
        slots.sort_by_key(|slot| slot.seq);
        slots.into_iter().map(|slot| slot.name.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().events.values().all(|slot| slot.entries.is_empty())
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    /// Emit `name` with `payload` to its listeners, in registration order.
    ///
    /// Fails with [`EmitError::Unregistered`] when `name` has no listeners.
    /// Under [`ErrorPolicy::FailFast`] the first listener error ends the
    /// dispatch and is returned as [`EmitError::Listener`].
    pub fn emit(&self, name: &str, payload: T) -> Result<()> {
        let key = self.event_key(name);

        // Snapshot under the lock; it is released before any listener runs.
        let snapshot: Vec<ListenerEntry<T>> = {
            let state = self.state.lock();
            match state.entries(&key) {
                Some(entries) => entries.to_vec(),
                None => {
                    return Err(EmitError::Unregistered {
                        event: name.to_string(),
                    })
                }
            }
        };

        let arg = HandlerArg {
            detail: payload,
            event_type: name.to_string(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        };
        tracing::trace!(event = name, listeners = snapshot.len(), "emitting");

        let mut failures = Vec::new();
        for entry in &snapshot {
            if let Err(source) = entry.handler.call(&arg) {
                match self.config.error_policy {
                    ErrorPolicy::FailFast => {
                        return Err(EmitError::Listener {
                            event: name.to_string(),
                            source,
                        })
                    }
                    ErrorPolicy::ContinueOnError => {
                        tracing::warn!(
                            event = name,
                            handler_key = %entry.key.render(&self.config.key_prefix),
                            error = %source,
                            "listener failed, continuing dispatch"
                        );
                        failures.push(source);
                    }
                }
            }
            if entry.once {
                self.evict_once(&key, name, entry);
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(EmitError::Listeners {
                event: name.to_string(),
                errors: failures,
            })
        }
    }

    /// Alias for [`emit`](Self::emit).
    pub fn trigger(&self, name: &str, payload: T) -> Result<()> {
        self.emit(name, payload)
    }

    fn evict_once(&self, key: &EventKey, name: &str, fired: &ListenerEntry<T>) {
        let mut state = self.state.lock();
        match self.config.once_eviction {
            OnceEviction::WholeEvent => {
                if let Some(slot) = state.events.remove(key) {
                    tracing::debug!(event = name, evicted = slot.entries.len(), "once listener fired");
                }
            }
            OnceEviction::EntryOnly => {
                let Some(slot) = state.events.get_mut(key) else {
                    return;
                };
                if let Some(index) = slot
                    .entries
                    .iter()
                    .position(|entry| entry.once && entry.handler.is_same(&fired.handler))
                {
                    slot.entries.remove(index);
                    tracing::debug!(
                        event = name,
                        handler_key = %fired.key.render(&self.config.key_prefix),
                        "once listener fired"
                    );
                }
                if slot.entries.is_empty() {
                    state.events.remove(key);
                }
            }
        }
    }
}

impl<T> Default for EventEmitter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for EventEmitter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("EventEmitter")
            .field("events", &state.events.len())
            .field("config", &self.config)
            .finish()
    }
}
