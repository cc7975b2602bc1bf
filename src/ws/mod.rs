//! WebSocket layer: session, dispatcher and outbound queue.
//!
//! The session owns the single connection to the host, performs the
//! registration handshake and feeds every inbound message through the
//! dispatcher.

pub mod dispatcher;
pub mod outbox;
pub mod session;

pub use dispatcher::Dispatcher;
pub use outbox::Outbox;
pub use session::Session;
