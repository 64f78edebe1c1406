//! # Fanout Core Argument Guards
//!
//! Precondition checks applied to arguments of the public dispatch surface.
//!
//! Guards fail fast, returning [`InvalidArgument`] before any listener is
//! invoked, and have no other side effects. Required values that the original
//! design had to null-check are owned values or references here, so only the
//! string-content guard survives.

use thiserror::Error;

/// An argument passed to a public operation failed a precondition check.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("'{argument}' must not be empty or contain only white space")]
pub struct InvalidArgument {
    /// Name of the offending argument, as it appears in the signature.
    pub argument: &'static str,
}

/// Asserts that `value` is neither empty nor made up entirely of white space.
pub fn non_blank(value: &str, argument: &'static str) -> Result<(), InvalidArgument> {
    if value.trim().is_empty() {
        return Err(InvalidArgument { argument });
    }
    Ok(())
}
