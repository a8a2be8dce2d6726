use thiserror::Error;

/// Error type listeners return. Propagated out of `emit` without wrapping
/// its message.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

// ---------------------------------------------------------------------------
// EmitError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum EmitError {
    #[error("The event '{event}' is not registered, please sure register it before emitting it.")]
    Unregistered { event: String },

    /// A listener failed; dispatch stopped at that listener.
    #[error("{source}")]
    Listener {
        event: String,
        #[source]
        source: BoxError,
    },

    /// One or more listeners failed under `ErrorPolicy::ContinueOnError`.
    #[error("{} listener(s) failed while emitting '{event}'", .errors.len())]
    Listeners { event: String, errors: Vec<BoxError> },
}

impl EmitError {
    /// The event name the failing `emit` was called with.
    pub fn event(&self) -> &str {
        match self {
            Self::Unregistered { event } => event,
            Self::Listener { event, .. } => event,
            Self::Listeners { event, .. } => event,
        }
    }

    pub fn is_unregistered(&self) -> bool {
        matches!(self, Self::Unregistered { .. })
    }

    /// Unwrap the error a listener returned. `None` for anything else.
    pub fn into_listener_error(self) -> Option<BoxError> {
        match self {
            Self::Listener { source, .. } => Some(source),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("key_prefix must not be empty")]
    EmptyKeyPrefix,

    #[error("Invalid registry config: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T, E = EmitError> = std::result::Result<T, E>;
