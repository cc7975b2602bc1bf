//! Domain layer: wire event types, outbound commands, registration data and
//! the routing table.
//!
//! This module describes the host protocol itself. It has no knowledge of
//! the socket or of handler objects; the session and dispatcher in
//! [`crate::ws`] build on it.

pub mod commands;
pub mod events;
pub mod registration;
pub mod routing;

pub use commands::{Command, SetImagePayload, SetTitlePayload, Target};
pub use events::{ActionEvent, InboundEvent, PluginEvent};
pub use registration::{RegistrationInfo, RegistrationMessage};
pub use routing::{EventRoute, ROUTES, RouteScope, lookup};
