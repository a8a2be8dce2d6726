//! Key derivation for event names and listener identity.
//!
//! Event names are never used as map keys directly. Both event names and
//! listener source text go through a deterministic xxh3-64 digest rendered
//! as `<prefix><16 hex digits>`. Two event names whose digests collide alias
//! the same listener list.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use xxhash_rust::xxh3::xxh3_64;

/// Prefix used when no [`RegistryConfig`](crate::RegistryConfig) overrides it.
pub const DEFAULT_KEY_PREFIX: &str = "m";

static NEXT_UNIQUE: AtomicU64 = AtomicU64::new(1);

/// Map key derived from an event name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventKey(String);

impl EventKey {
    /// Derive the key for `name` using `prefix`.
    pub fn with_prefix(prefix: &str, name: &str) -> Self {
        Self(render(prefix, xxh3_64(name.as_bytes())))
    }

    /// Derive the key for `name` using [`DEFAULT_KEY_PREFIX`].
    pub fn of(name: &str) -> Self {
        Self::with_prefix(DEFAULT_KEY_PREFIX, name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of a listener, used for deduplication and removal.
///
/// A `Source` key is a digest of the listener's textual form, so two
/// separately built listeners with the same source compare equal. A `Unique`
/// key is minted once per [`Listener::new`](crate::Listener::new) and is only
/// shared by clones of that listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerKey {
    Source(u64),
    Unique(u64),
}

impl HandlerKey {
    /// Content key for a listener's textual form.
    pub fn of_source(source: &str) -> Self {
        Self::Source(xxh3_64(source.as_bytes()))
    }

    /// A fresh key that no other call returns within this process.
    pub fn unique() -> Self {
        Self::Unique(NEXT_UNIQUE.fetch_add(1, Ordering::Relaxed))
    }

    pub fn is_content_derived(&self) -> bool {
        matches!(self, Self::Source(_))
    }

    /// Render as a prefixed string, e.g. `m2f1c...`. Unique keys carry a
    /// `#` marker so they can never be mistaken for a digest.
    pub fn render(&self, prefix: &str) -> String {
        match self {
            Self::Source(digest) => render(prefix, *digest),
            Self::Unique(id) => format!("{prefix}#{id}"),
        }
    }
}

/// Renders with [`DEFAULT_KEY_PREFIX`]. An emitter with a custom prefix
/// renders through [`EventEmitter::handler_key`](crate::EventEmitter::handler_key).
impl fmt::Display for HandlerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(DEFAULT_KEY_PREFIX))
    }
}

fn render(prefix: &str, digest: u64) -> String {
    format!("{prefix}{digest:016x}")
}
