//! Argument payload contracts for dispatched events.
//!
//! Every dispatch hands its listeners a payload implementing [`EventArgs`].
//! Payloads may opt in to cooperative cancellation by embedding a [`Handled`]
//! carrier and surfacing it through [`EventArgs::handled_state`]; payloads
//! that do not are always iterated to the end of the snapshot.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

/// The state of an event that can be handled whilst it is being raised.
///
/// The state is meant to move forward only within one dispatch
/// (`Unhandled` → `HandledButContinueToNotify` → `HandledAndCeaseRaising`).
/// Moving it backward, or re-declaring `Unhandled` after progress, is
/// undefined behavior for this contract: nothing enforces it and callers must
/// not rely on any particular outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandledState {
    /// The event has not been handled and will continue to be raised to
    /// consumers.
    #[default]
    Unhandled,
    /// The event has been handled but can continue to be raised to consumers.
    HandledButContinueToNotify,
    /// The event has been handled and no further consumers should be
    /// notified.
    HandledAndCeaseRaising,
}

/// Mutable tri-state carried by payloads that opt in to cooperative
/// cancellation. Embed it in a payload type and surface it through
/// [`EventArgs::handled_state`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Handled {
    state: HandledState,
}

impl Handled {
    /// Current state of the event being raised.
    pub fn state(&self) -> HandledState {
        self.state
    }

    /// Records how the listener handled the event. The dispatcher reads the
    /// state after every listener call.
    pub fn set_state(&mut self, state: HandledState) {
        self.state = state;
    }
}

/// Contract for argument payloads passed to listeners.
pub trait EventArgs: fmt::Debug + Send + 'static {
    /// Payloads supporting cooperative cancellation return their current
    /// state here; the default opts out.
    fn handled_state(&self) -> Option<HandledState> {
        None
    }
}

/// Payload for events that carry no data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmptyArgs;

impl EventArgs for EmptyArgs {}

/// The payload delivered to subscribers of the unhandled-error hub.
///
/// One instance is shared across all subscribers of a single report. The
/// handled-state capability is structurally available (a subscriber may cease
/// further notification) but no cancellation semantics are expected of it.
#[derive(Debug, Clone)]
pub struct UnhandledErrorArgs {
    error: Option<Arc<dyn StdError + Send + Sync>>,
    activity: Option<String>,
    handled: Handled,
}

impl UnhandledErrorArgs {
    /// Creates the payload for one report. Both parts are advisory and may be
    /// absent.
    pub fn new(
        error: Option<Arc<dyn StdError + Send + Sync>>,
        activity: Option<String>,
    ) -> Self {
        Self {
            error,
            activity,
            handled: Handled::default(),
        }
    }

    /// The unhandled error that was detected, if one was captured.
    pub fn error(&self) -> Option<&Arc<dyn StdError + Send + Sync>> {
        self.error.as_ref()
    }

    /// A short description of the activity taking place when the error
    /// occurred (a sentence fragment with no initial capital or terminal
    /// punctuation, e.g. "loading tasks"). May be absent, empty or blank.
    pub fn activity(&self) -> Option<&str> {
        self.activity.as_deref()
    }

    /// The handled-state carrier for this report.
    pub fn handled(&self) -> &Handled {
        &self.handled
    }

    /// Mutable access so a subscriber can cease further notification.
    pub fn handled_mut(&mut self) -> &mut Handled {
        &mut self.handled
    }
}

impl EventArgs for UnhandledErrorArgs {
    fn handled_state(&self) -> Option<HandledState> {
        Some(self.handled.state())
    }
}
