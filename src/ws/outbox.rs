//! Outbound frame queue shared by the session and every handler.

use serde::Serialize;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

use crate::error::SdkError;

/// Cloneable send handle for the single host connection.
///
/// Frames are queued on an unbounded channel and written by the session's
/// writer task in queue order. Sending never blocks and has no
/// acknowledgement.
#[derive(Debug, Clone)]
pub struct Outbox {
    tx: mpsc::UnboundedSender<Message>,
}

impl Outbox {
    /// Creates an outbox and the receiver the writer task drains.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Message>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Serializes `value` to JSON and queues it as a text frame.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Serialize`] if `value` cannot be serialized, or
    /// [`SdkError::ChannelClosed`] once the session has stopped.
    pub fn send<T: Serialize + ?Sized>(&self, value: &T) -> Result<(), SdkError> {
        let text = serde_json::to_string(value)?;
        self.send_text(text)
    }

    /// Queues pre-built text verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::ChannelClosed`] once the session has stopped.
    pub fn send_text(&self, text: impl Into<String>) -> Result<(), SdkError> {
        let text: String = text.into();
        tracing::trace!(frame = %text, "queue outbound frame");
        self.tx
            .send(Message::text(text))
            .map_err(|_| SdkError::ChannelClosed)
    }

    /// Queues a close frame. The writer stops after writing it, and frames
    /// queued later are never sent.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::ChannelClosed`] once the session has stopped.
    pub fn close(&self) -> Result<(), SdkError> {
        tracing::trace!("queue close frame");
        self.tx
            .send(Message::Close(None))
            .map_err(|_| SdkError::ChannelClosed)
    }

    /// Returns `true` once the receiving side has been dropped.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
