//! # Fanout Core Event System Errors
//!
//! Defines error types specific to the dispatch surface.
//!
//! These cover the programmer-error tier only: failures raised by listeners
//! are never surfaced through this type — they are isolated per listener and
//! routed to the unhandled-error hub instead.

use thiserror::Error;

use crate::check::InvalidArgument;
use crate::event::ArgsUsage;

#[derive(Debug, Error)]
pub enum DispatchError {
    /// An argument failed a precondition check before any listener ran.
    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgument),

    /// Dispatch was requested with an unrecognized argument-usage value.
    #[error("'usage' argument contains invalid value: {0:?}")]
    UnknownArgsUsage(ArgsUsage),
}
