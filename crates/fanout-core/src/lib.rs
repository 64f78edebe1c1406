pub mod check;
pub mod event;

// Re-export key public types for easier use by downstream crates.
pub use check::InvalidArgument;
pub use event::args::{EmptyArgs, EventArgs, Handled, HandledState, UnhandledErrorArgs};
pub use event::describe::ListenerInfo;
pub use event::dispatcher::{ListenerSet, dispatch, dispatch_simple};
pub use event::error::DispatchError;
pub use event::hub::{ErrorHub, hub, report};
pub use event::{ArgsUsage, ListenerFault, ListenerId, ListenerResult, SenderRef};
