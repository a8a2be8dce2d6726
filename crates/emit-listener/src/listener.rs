//! Listener handles and the argument they receive.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::error::BoxError;
use crate::key::HandlerKey;

/// What a listener returns. An `Err` stops the dispatch under the default
/// error policy and is handed back to the caller of `emit`.
pub type ListenerResult = Result<(), BoxError>;

/// Closure type for listeners.
pub type ListenerFn<T> = dyn Fn(&HandlerArg<T>) -> ListenerResult + Send + Sync;

/// The single argument passed to every listener.
///
/// One `HandlerArg` is built per `emit` call and shared by reference, so
/// every listener in a dispatch sees the same `timestamp`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HandlerArg<T> {
    /// The payload given to `emit`.
    pub detail: T,
    /// The event name given to `emit`.
    #[serde(rename = "type")]
    pub event_type: String,
    /// Milliseconds since the Unix epoch, captured when `emit` started.
    pub timestamp: i64,
}

/// A registered (or registrable) listener.
///
/// Cloning is cheap and the clone is the same listener: it shares both the
/// underlying closure and the [`HandlerKey`].
pub struct Listener<T> {
    key: HandlerKey,
    handler: Arc<ListenerFn<T>>,
}

impl<T> Listener<T> {
    /// Wrap `handler` with a key unique to this listener and its clones.
    pub fn new(handler: impl Fn(&HandlerArg<T>) -> ListenerResult + Send + Sync + 'static) -> Self {
        Self {
            key: HandlerKey::unique(),
            handler: Arc::new(handler),
        }
    }

    /// Wrap `handler` with a key derived from `source`, its textual form.
    ///
    /// Listeners built from the same source are treated as the same listener
    /// even when the closures are distinct: the registry deduplicates them
    /// and `unregister` removes one with the other.
    pub fn with_source(
        source: &str,
        handler: impl Fn(&HandlerArg<T>) -> ListenerResult + Send + Sync + 'static,
    ) -> Self {
        Self {
            key: HandlerKey::of_source(source),
            handler: Arc::new(handler),
        }
    }

    /// Wrap a listener that cannot fail.
    pub fn infallible(handler: impl Fn(&HandlerArg<T>) + Send + Sync + 'static) -> Self {
        Self::new(move |arg| {
            handler(arg);
            Ok(())
        })
    }

    pub fn key(&self) -> HandlerKey {
        self.key
    }

    /// Reference equality: both handles point at the same closure.
    pub fn is_same(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.handler, &other.handler)
    }

    /// Identity used by the registry: reference equality, then key equality.
    pub fn matches(&self, other: &Self) -> bool {
        self.is_same(other) || self.key == other.key
    }

    pub(crate) fn call(&self, arg: &HandlerArg<T>) -> ListenerResult {
        (self.handler)(arg)
    }
}

impl<T> Clone for Listener<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key,
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<T> fmt::Debug for Listener<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener").field("key", &self.key).finish_non_exhaustive()
    }
}

/// One entry of a batch registration.
pub struct ListenerSpec<T> {
    pub name: String,
    pub handler: Listener<T>,
    pub once: bool,
}

impl<T> Clone for ListenerSpec<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            handler: self.handler.clone(),
            once: self.once,
        }
    }
}

impl<T> fmt::Debug for ListenerSpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerSpec")
            .field("name", &self.name)
            .field("handler", &self.handler)
            .field("once", &self.once)
            .finish()
    }
}

impl<T> ListenerSpec<T> {
    /// A persistent listener for `name`.
    pub fn on(name: impl Into<String>, handler: Listener<T>) -> Self {
        Self {
            name: name.into(),
            handler,
            once: false,
        }
    }

    /// A once listener for `name`.
    pub fn once(name: impl Into<String>, handler: Listener<T>) -> Self {
        Self {
            name: name.into(),
            handler,
            once: true,
        }
    }
}
