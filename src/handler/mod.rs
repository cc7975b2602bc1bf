//! Handler layer: the traits plugin authors implement, the contexts they
//! send commands through, and the registry of declared actions.

pub mod context;
pub mod registry;
pub mod traits;

pub use context::{ActionContext, PluginContext};
pub use registry::ActionRegistry;
pub use traits::{Action, HandlerResult, NoopPlugin, Plugin};
