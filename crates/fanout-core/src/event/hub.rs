//! Process-wide hub through which all unhandled errors are routed.
//!
//! The dispatcher sends every failure it isolates here; application code may
//! report its own. Subscribers are notified through the same multicast
//! dispatch as any other event, with one shared payload per report. A
//! failure raised by a subscriber while a report is being delivered is
//! dropped by the dispatcher's recursion guard, so a failure can never spawn
//! reports of itself.

use std::error::Error as StdError;
use std::sync::{Arc, LazyLock};

use crate::event::args::UnhandledErrorArgs;
use crate::event::dispatcher::{ListenerSet, dispatch};
use crate::event::{ArgsUsage, ListenerId, ListenerResult, SenderRef};

/// Name of the event delivered to hub subscribers.
pub const UNHANDLED_ERROR_EVENT: &str = "error.unhandled";

static HUB: LazyLock<ErrorHub> = LazyLock::new(ErrorHub::new);

/// The process-wide hub instance.
pub fn hub() -> &'static ErrorHub {
    &HUB
}

/// Reports an unhandled error to the process-wide hub.
///
/// `activity` describes what was taking place at the time (a sentence
/// fragment with no initial capital or terminal punctuation, e.g. "loading
/// tasks"). Both arguments are advisory and may be absent or blank.
pub fn report(error: Option<Arc<dyn StdError + Send + Sync>>, activity: Option<&str>) {
    HUB.report(error, activity);
}

/// A sink for errors not otherwise caught by application code.
///
/// Separate instances can be created for tests; production code goes through
/// [`hub`]. Subscribe, unsubscribe and report may race freely from multiple
/// threads: the listener set is copy-on-write and each report delivers to the
/// snapshot it took at entry.
#[derive(Debug, Default)]
pub struct ErrorHub {
    listeners: ListenerSet<UnhandledErrorArgs>,
}

impl ErrorHub {
    pub fn new() -> Self {
        Self {
            listeners: ListenerSet::new(),
        }
    }

    /// Registers a subscriber to be notified of every report.
    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: for<'a> Fn(SenderRef<'a>, &mut UnhandledErrorArgs) -> ListenerResult
            + Send
            + Sync
            + 'static,
    {
        self.listeners.subscribe(listener)
    }

    /// Registers a subscriber with a diagnostic label.
    pub fn subscribe_labeled<F>(
        &self,
        label: impl Into<std::borrow::Cow<'static, str>>,
        listener: F,
    ) -> ListenerId
    where
        F: for<'a> Fn(SenderRef<'a>, &mut UnhandledErrorArgs) -> ListenerResult
            + Send
            + Sync
            + 'static,
    {
        self.listeners.subscribe_labeled(label, listener)
    }

    /// Removes a subscriber. Returns `false` when the id is not registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Delivers one report to all current subscribers, sharing a single
    /// payload instance between them.
    pub fn report(&self, error: Option<Arc<dyn StdError + Send + Sync>>, activity: Option<&str>) {
        let activity = activity.map(str::to_owned);
        let delivered = dispatch(
            Some(&self.listeners),
            UNHANDLED_ERROR_EVENT,
            None,
            ArgsUsage::Shared,
            || UnhandledErrorArgs::new(error.clone(), activity.clone()),
        );
        if let Err(precondition) = delivered {
            // Unreachable with the constant event name and shared usage above.
            log::error!("unhandled-error report was not delivered: {precondition}");
        }
    }
}
