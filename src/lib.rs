//! # streamdeck-sdk
//!
//! Client SDK for Stream Deck plugins.
//!
//! A plugin is a separate process the Stream Deck host launches with a
//! port, a plugin UUID, a registration event name and a JSON blob of
//! registration metadata. The plugin connects to the host's WebSocket
//! server on localhost, registers, and then receives JSON events for the
//! actions it declared. This crate owns that lifecycle: launch argument
//! parsing, the registration handshake, decoding every event into a typed
//! value, and routing it to the plugin and to the right action handler.
//!
//! ## Architecture
//!
//! ```text
//! Stream Deck host (ws://localhost:<port>)
//!     │
//!     ├── Session (ws/)            handshake, read loop, writer task
//!     │       │
//!     │       ├── routing table (domain/)   event name → scope + decoder
//!     │       └── Dispatcher (ws/)          plugin first, then actions
//!     │               │
//!     │               ├── Plugin (handler/)
//!     │               └── ActionRegistry (handler/) → Action instances
//!     │
//!     └── Outbox (ws/) ← PluginContext / ActionContext (handler/)
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use streamdeck_sdk::domain::events::KeyDown;
//! use streamdeck_sdk::handler::{Action, ActionContext, HandlerResult, NoopPlugin};
//! use streamdeck_sdk::ws::Session;
//!
//! struct Hello;
//!
//! impl Action for Hello {
//!     fn uuid(&self) -> &str {
//!         "com.example.hello"
//!     }
//!
//!     fn on_key_down(&mut self, cx: &ActionContext, _event: &KeyDown) -> HandlerResult {
//!         cx.show_ok()?;
//!         Ok(())
//!     }
//! }
//!
//! # async fn run() -> Result<(), streamdeck_sdk::SdkError> {
//! Session::from_env(NoopPlugin, vec![Box::new(Hello)])?.run().await
//! # }
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod handler;
pub mod logging;
pub mod plugin_state;
pub mod ws;

pub use error::SdkError;
pub use handler::{Action, ActionContext, HandlerResult, NoopPlugin, Plugin, PluginContext};
pub use plugin_state::PluginState;
pub use ws::Session;
