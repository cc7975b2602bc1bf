//! WebSocket session: handshake, read loop, decode and route.
//!
//! The session is the only component that reads from the host connection.
//! Inbound text frames are handled one at a time, to completion, on the task
//! running [`Session::serve`]. Outbound frames go through the shared
//! [`Outbox`] and are written by a separate writer task in queue order.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use futures_util::{Sink, SinkExt, Stream, StreamExt};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::{self, Message};
use tracing::Level;

use super::dispatcher::Dispatcher;
use super::outbox::Outbox;
use crate::config::LaunchArgs;
use crate::domain::routing;
use crate::error::SdkError;
use crate::handler::{Action, ActionRegistry, Plugin, PluginContext};
use crate::plugin_state::PluginState;

/// How long the writer gets to flush queued frames and the close frame.
const CLOSE_GRACE: Duration = Duration::from_secs(2);

/// A plugin's connection to the host.
pub struct Session<P: Plugin> {
    state: PluginState,
    plugin: P,
    dispatcher: Dispatcher,
    outgoing: Option<mpsc::UnboundedReceiver<Message>>,
}

impl<P: Plugin> Session<P> {
    /// Creates a session and wires the declared actions.
    ///
    /// No connection is opened until [`Self::run`]. Commands sent before
    /// then are queued and written right after the registration handshake.
    ///
    /// # Errors
    ///
    /// Returns the wiring errors of [`ActionRegistry::wire`].
    pub fn new(state: PluginState, plugin: P, actions: Vec<Box<dyn Action>>) -> Result<Self, SdkError> {
        let (outbox, outgoing) = Outbox::channel();
        let cx = PluginContext::new(outbox, state.plugin_uuid.as_str(), Arc::clone(&state.info));
        let registry = ActionRegistry::wire(actions, &cx)?;
        tracing::info!(
            plugin_uuid = %state.plugin_uuid,
            actions = registry.len(),
            "session created"
        );
        Ok(Self {
            state,
            plugin,
            dispatcher: Dispatcher::new(registry, cx),
            outgoing: Some(outgoing),
        })
    }

    /// Parses the process launch arguments and creates a session.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::InvalidLaunchArgs`] or
    /// [`SdkError::InvalidRegistrationInfo`] for bad arguments, and the
    /// wiring errors of [`Self::new`].
    pub fn from_env(plugin: P, actions: Vec<Box<dyn Action>>) -> Result<Self, SdkError> {
        let args = LaunchArgs::from_env()?;
        let state = PluginState::from_args(&args)?;
        Self::new(state, plugin, actions)
    }

    /// Launch state this session registers with.
    #[must_use]
    pub fn state(&self) -> &PluginState {
        &self.state
    }

    /// The plugin-wide context, for sending outside handlers.
    #[must_use]
    pub fn context(&self) -> &PluginContext {
        self.dispatcher.context()
    }

    /// The plugin-level handler.
    #[must_use]
    pub fn plugin(&self) -> &P {
        &self.plugin
    }

    /// Connects to `ws://localhost:<port>` and serves until the host closes.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Transport`] if the connection or the handshake
    /// fails.
    pub async fn run(self) -> Result<(), SdkError> {
        let url = self.state.websocket_url();
        self.run_url(&url).await
    }

    /// Connects to `url` and serves until the host closes.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Transport`] if the connection or the handshake
    /// fails.
    pub async fn run_url(self, url: &str) -> Result<(), SdkError> {
        let (stream, _response) = connect_async(url).await?;
        tracing::info!(url, "websocket opened");
        self.serve(stream).await
    }

    /// Serves an already-open WebSocket stream.
    ///
    /// Sends the registration message first, then handles inbound frames
    /// until the host closes the connection or the stream fails. Frames
    /// already queued are written before the close frame that ends the
    /// connection.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Transport`] if the handshake cannot be written,
    /// or [`SdkError::ChannelClosed`] if the session was already served.
    pub async fn serve<S>(mut self, stream: S) -> Result<(), SdkError>
    where
        S: Stream<Item = Result<Message, tungstenite::Error>>
            + Sink<Message, Error = tungstenite::Error>
            + Send
            + 'static,
    {
        let Some(mut outgoing) = self.outgoing.take() else {
            return Err(SdkError::ChannelClosed);
        };
        let (mut sink, mut source) = stream.split();

        let registration = serde_json::to_string(&self.state.registration_message())?;
        sink.send(Message::text(registration)).await?;
        tracing::info!(event = %self.state.register_event, "registration sent");

        let writer = tokio::spawn(async move {
            while let Some(frame) = outgoing.recv().await {
                let closing = frame.is_close();
                if let Err(err) = sink.send(frame).await {
                    if closing {
                        tracing::debug!(error = %err, "close frame not written");
                    } else {
                        tracing::error!(error = %err, "failed to write frame");
                    }
                    break;
                }
                if closing {
                    break;
                }
            }
            if let Err(err) = sink.close().await {
                tracing::debug!(error = %err, "sink close failed");
            }
        });

        loop {
            match source.next().await {
                Some(Ok(Message::Text(text))) => self.on_message(text.as_str()),
                Some(Ok(Message::Close(frame))) => {
                    match frame {
                        Some(frame) => self.on_close(Some(u16::from(frame.code)), frame.reason.as_str()),
                        None => self.on_close(None, ""),
                    }
                    break;
                }
                Some(Ok(Message::Binary(data))) => {
                    tracing::debug!(len = data.len(), "ignoring binary frame");
                }
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    if self.on_error(&err) {
                        break;
                    }
                }
                None => {
                    self.on_close(None, "stream ended");
                    break;
                }
            }
        }

        // Writing the close frame also flushes tungstenite's queued reply
        // to a host-initiated close.
        if let Err(err) = self.context().outbox().close() {
            tracing::debug!(error = %err, "writer already stopped");
        }
        let abort = writer.abort_handle();
        match tokio::time::timeout(CLOSE_GRACE, writer).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => tracing::error!(error = %err, "writer task failed"),
            Err(_) => {
                tracing::warn!(grace = ?CLOSE_GRACE, "writer did not finish, dropping connection");
                abort.abort();
            }
        }
        Ok(())
    }

    /// Handles one inbound text frame. Failures are logged and the message
    /// is dropped; the session stays usable.
    pub fn on_message(&mut self, raw: &str) {
        match self.process(raw) {
            Ok(invoked) => tracing::debug!(invoked, "message routed"),
            Err(err) => {
                let severity = err.severity();
                if severity == Level::INFO {
                    tracing::info!(error = %err, "message dropped");
                } else if severity == Level::WARN {
                    tracing::warn!(error = %err, "message dropped");
                } else {
                    tracing::error!(error = %err, "message dropped");
                }
            }
        }
    }

    /// Decodes and routes one inbound message.
    ///
    /// Returns the number of handler methods invoked.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::MalformedMessage`] for invalid JSON or a payload
    /// that does not match the event schema, [`SdkError::UnknownEvent`] for
    /// a missing or unrouted `event` field, and the dispatcher's routing
    /// errors. The plugin-level handler has run when a routing error is
    /// returned.
    pub fn process(&mut self, raw: &str) -> Result<usize, SdkError> {
        let message: Value =
            serde_json::from_str(raw).map_err(|e| SdkError::MalformedMessage(e.to_string()))?;
        tracing::trace!(%message, "inbound message");

        let route = {
            let Some(name) = message.get("event").and_then(Value::as_str) else {
                return Err(SdkError::UnknownEvent("missing event field".to_string()));
            };
            routing::lookup(name).ok_or_else(|| SdkError::UnknownEvent(name.to_string()))?
        };

        let event = route
            .decode(message)
            .map_err(|e| SdkError::MalformedMessage(format!("{}: {e}", route.event_name)))?;
        tracing::debug!(event = route.event_name, scope = ?route.scope, "event decoded");

        self.dispatcher.dispatch(&mut self.plugin, route, &event)
    }

    /// Records a close from the host. No reconnect is attempted.
    pub fn on_close(&self, code: Option<u16>, reason: &str) {
        tracing::info!(?code, reason, "websocket closed");
    }

    /// Records a transport error. Returns `true` when the connection is
    /// gone and the read loop must stop.
    pub fn on_error(&self, err: &tungstenite::Error) -> bool {
        tracing::error!(error = %err, "websocket error");
        matches!(
            err,
            tungstenite::Error::ConnectionClosed
                | tungstenite::Error::AlreadyClosed
                | tungstenite::Error::Io(_)
        )
    }
}

impl<P: Plugin> fmt::Debug for Session<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("dispatcher", &self.dispatcher)
            .field("served", &self.outgoing.is_none())
            .finish_non_exhaustive()
    }
}
