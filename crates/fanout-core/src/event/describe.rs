//! Diagnostic descriptions of registered listeners.
//!
//! Rust offers no reflection over closures, so the identity is captured at
//! subscribe time: the owning type from [`std::any::type_name`] plus an
//! optional caller-supplied label naming the method or purpose. Descriptions
//! feed diagnostics only and never affect control flow.

use std::any::type_name;
use std::borrow::Cow;
use std::fmt;

/// Diagnostic identity of a registered listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerInfo {
    owner: Option<Cow<'static, str>>,
    label: Option<Cow<'static, str>>,
}

impl ListenerInfo {
    /// Identity derived from the callback's type alone.
    pub fn of<F: ?Sized>() -> Self {
        Self {
            owner: Some(Cow::Borrowed(type_name::<F>())),
            label: None,
        }
    }

    /// Identity derived from the callback's type plus a label naming the
    /// method or purpose.
    pub fn labeled<F: ?Sized>(label: impl Into<Cow<'static, str>>) -> Self {
        Self {
            owner: Some(Cow::Borrowed(type_name::<F>())),
            label: Some(label.into()),
        }
    }

    /// Fully caller-supplied identity.
    pub fn named(
        owner: impl Into<Cow<'static, str>>,
        label: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            owner: Some(owner.into()),
            label: Some(label.into()),
        }
    }

    /// Identity for a callback whose owner could not be determined.
    pub fn method(label: impl Into<Cow<'static, str>>) -> Self {
        Self {
            owner: None,
            label: Some(label.into()),
        }
    }

    /// Identity for a callback about which nothing is known.
    pub fn unknown() -> Self {
        Self {
            owner: None,
            label: None,
        }
    }

    /// Renders the description. Always returns a value:
    /// `[owner].label`, `[owner]`, `[unknown].label` or `[null]` depending on
    /// what was captured.
    pub fn description(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ListenerInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.owner.as_deref(), self.label.as_deref()) {
            (None, None) => write!(f, "[null]"),
            (None, Some(label)) => write!(f, "[unknown].{label}"),
            (Some(owner), None) => write!(f, "[{owner}]"),
            (Some(owner), Some(label)) => write!(f, "[{owner}].{label}"),
        }
    }
}
