pub mod args;
pub mod describe;
pub mod dispatcher;
pub mod error;
pub mod hub;

use std::any::Any;
use std::error::Error as StdError;

use thiserror::Error;

/// Type for listener identifiers, allocated per [`ListenerSet`](dispatcher::ListenerSet).
pub type ListenerId = u64;

/// The untyped originator of an event, passed through to every listener.
pub type SenderRef<'a> = Option<&'a (dyn Any + Send + Sync)>;

/// How the argument factory is used when an event is dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArgsUsage {
    /// Usage has not been specified (dispatching with this value is an error).
    #[default]
    Unknown,
    /// The factory is called once and the same payload instance is passed to
    /// every listener.
    Shared,
    /// The factory is called separately for each listener, immediately before
    /// it runs.
    UniquePerListener,
}

/// What a single listener reports back to the dispatch loop.
///
/// `Ok(())` lets the dispatch carry on to the next listener (subject to the
/// payload's handled state).
pub type ListenerResult = Result<(), ListenerFault>;

/// The two ways a listener can cut its invocation short.
#[derive(Debug, Error)]
pub enum ListenerFault {
    /// The listener asks for the remainder of the dispatch to be abandoned.
    ///
    /// This terminates the loop immediately and is never reported to the
    /// unhandled-error hub, nor surfaced to the dispatching caller.
    #[error("dispatch interrupted by a listener")]
    Interrupted,

    /// The listener failed. The failure is isolated from the other listeners
    /// and from the caller, routed to the unhandled-error hub, and the
    /// dispatch continues with the next listener.
    #[error(transparent)]
    Failed(#[from] Box<dyn StdError + Send + Sync>),
}

impl ListenerFault {
    /// Wraps an arbitrary error as a [`ListenerFault::Failed`].
    pub fn failed<E: StdError + Send + Sync + 'static>(error: E) -> Self {
        ListenerFault::Failed(Box::new(error))
    }
}

/// Re-export important types
pub use args::{EmptyArgs, EventArgs, Handled, HandledState, UnhandledErrorArgs};
pub use describe::ListenerInfo;
pub use dispatcher::{ListenerSet, dispatch, dispatch_simple};
pub use error::DispatchError;
pub use hub::{ErrorHub, hub, report};
