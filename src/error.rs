//! SDK error types with severity mapping.
//!
//! [`SdkError`] is the central error type for the SDK. Per-message variants
//! are recoverable: the session logs them at the level returned by
//! [`SdkError::severity`] and drops the message. Startup variants are fatal
//! and surface to the caller.

use tokio_tungstenite::tungstenite;
use tracing::Level;

use crate::domain::RouteScope;

/// Error enum for every failure the SDK can report.
///
/// # Categories
///
/// | Group       | Variants                                                        | Policy            |
/// |-------------|-----------------------------------------------------------------|-------------------|
/// | Per-message | `MalformedMessage`, `UnknownEvent`, `MissingActionField`,       | log, drop message |
/// |             | `ScopeMismatch`, `UnregisteredTarget`                           |                   |
/// | Startup     | `MissingActionIdentifier`, `DuplicateActionIdentifier`,         | fatal             |
/// |             | `InvalidLaunchArgs`, `InvalidRegistrationInfo`, `Logging`       |                   |
/// | Transport   | `Transport`, `ChannelClosed`, `Serialize`                       | returned          |
#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    /// Inbound text is not valid JSON or does not match the event schema.
    #[error("malformed message: {0}")]
    MalformedMessage(String),

    /// Inbound message has no `event` field, or no routing entry exists for it.
    #[error("unknown event: {0}")]
    UnknownEvent(String),

    /// An action route was taken for an event that carries no `action` field.
    #[error("event {event} has no action field")]
    MissingActionField {
        /// Wire name of the offending event.
        event: String,
    },

    /// The event cannot be delivered through the requested scope.
    #[error("event {event} cannot be routed as {scope:?}")]
    ScopeMismatch {
        /// Wire name of the offending event.
        event: String,
        /// Scope the route attempted.
        scope: RouteScope,
    },

    /// No action instance is registered for the event's action kind.
    #[error("action {0} not registered")]
    UnregisteredTarget(String),

    /// A declared action returned an empty identifier.
    #[error("action at position {0} has no identifier")]
    MissingActionIdentifier(usize),

    /// Two declared actions share the same identifier.
    #[error("action {0} declared more than once")]
    DuplicateActionIdentifier(String),

    /// Launch arguments could not be parsed.
    #[error("invalid launch arguments: {0}")]
    InvalidLaunchArgs(#[from] clap::Error),

    /// The `-info` argument is not valid registration JSON.
    #[error("invalid registration info: {0}")]
    InvalidRegistrationInfo(#[source] serde_json::Error),

    /// Outbound value could not be serialized to JSON.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The outbound queue has no writer left.
    #[error("connection closed")]
    ChannelClosed,

    /// WebSocket connect or write failure.
    #[error("transport error: {0}")]
    Transport(#[source] Box<tungstenite::Error>),

    /// Log subscriber setup failed.
    #[error("logging setup failed: {0}")]
    Logging(String),
}

impl SdkError {
    /// Returns `true` for errors that must abort startup.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::MissingActionIdentifier(_)
                | Self::DuplicateActionIdentifier(_)
                | Self::InvalidLaunchArgs(_)
                | Self::InvalidRegistrationInfo(_)
                | Self::Logging(_)
        )
    }

    /// Returns the log level a dropped message is reported at.
    #[must_use]
    pub const fn severity(&self) -> Level {
        match self {
            Self::UnregisteredTarget(_) => Level::INFO,
            Self::UnknownEvent(_) => Level::WARN,
            _ => Level::ERROR,
        }
    }
}

impl From<tungstenite::Error> for SdkError {
    fn from(err: tungstenite::Error) -> Self {
        Self::Transport(Box::new(err))
    }
}
