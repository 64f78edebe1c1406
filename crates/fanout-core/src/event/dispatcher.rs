//! Resilient multicast dispatch.
//!
//! [`ListenerSet`] holds an ordered, copy-on-write collection of listeners;
//! [`dispatch`] notifies a point-in-time snapshot of it, isolating each
//! listener's failure from the others and from the caller, honoring the
//! payload's cooperative handled state, and routing failures it cannot
//! suppress to the unhandled-error hub.

use std::any::TypeId;
use std::error::Error as StdError;
use std::fmt;
use std::ops::ControlFlow;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, PoisonError, RwLock};

use thiserror::Error;

use crate::check;
use crate::event::args::{EmptyArgs, EventArgs, HandledState, UnhandledErrorArgs};
use crate::event::describe::ListenerInfo;
use crate::event::error::DispatchError;
use crate::event::{ArgsUsage, ListenerFault, ListenerId, SenderRef, hub};

/// The callback shape stored in a [`ListenerSet`].
pub type Callback<A> =
    dyn for<'a> Fn(SenderRef<'a>, &mut A) -> crate::event::ListenerResult + Send + Sync;

/// A panic that escaped a listener, contained at the dispatch boundary and
/// reported like any other listener failure.
#[derive(Debug, Error)]
#[error("listener panicked: {0}")]
pub struct ListenerPanic(pub String);

struct Listener<A: EventArgs> {
    id: ListenerId,
    info: ListenerInfo,
    callback: Arc<Callback<A>>,
}

impl<A: EventArgs> Clone for Listener<A> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            info: self.info.clone(),
            callback: Arc::clone(&self.callback),
        }
    }
}

struct Inner<A: EventArgs> {
    // Swapped wholesale on every mutation so an in-flight dispatch keeps
    // iterating the snapshot it took at entry.
    listeners: Arc<Vec<Listener<A>>>,
    next_id: ListenerId,
}

/// An ordered set of listeners for one event, insertion order preserved,
/// duplicates permitted.
///
/// Registration and removal may race with an in-flight dispatch from other
/// threads; dispatch reads an immutable snapshot, so a concurrent mutation is
/// never observed mid-iteration.
pub struct ListenerSet<A: EventArgs> {
    inner: RwLock<Inner<A>>,
}

impl<A: EventArgs> fmt::Debug for ListenerSet<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerSet")
            .field("listener_count", &self.len())
            .finish()
    }
}

impl<A: EventArgs> ListenerSet<A> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                listeners: Arc::new(Vec::new()),
                next_id: 1,
            }),
        }
    }

    /// Appends a listener, deriving its diagnostic identity from the
    /// callback's type.
    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: for<'a> Fn(SenderRef<'a>, &mut A) -> crate::event::ListenerResult
            + Send
            + Sync
            + 'static,
    {
        self.subscribe_with_info(ListenerInfo::of::<F>(), listener)
    }

    /// Appends a listener with a label naming the method or purpose, for
    /// diagnostics.
    pub fn subscribe_labeled<F>(
        &self,
        label: impl Into<std::borrow::Cow<'static, str>>,
        listener: F,
    ) -> ListenerId
    where
        F: for<'a> Fn(SenderRef<'a>, &mut A) -> crate::event::ListenerResult
            + Send
            + Sync
            + 'static,
    {
        self.subscribe_with_info(ListenerInfo::labeled::<F>(label), listener)
    }

    /// Appends a listener with a fully caller-supplied diagnostic identity.
    pub fn subscribe_with_info<F>(&self, info: ListenerInfo, listener: F) -> ListenerId
    where
        F: for<'a> Fn(SenderRef<'a>, &mut A) -> crate::event::ListenerResult
            + Send
            + Sync
            + 'static,
    {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let id = inner.next_id;
        inner.next_id += 1;
        let mut listeners: Vec<Listener<A>> = inner.listeners.as_ref().clone();
        listeners.push(Listener {
            id,
            info,
            callback: Arc::new(listener),
        });
        inner.listeners = Arc::new(listeners);
        id
    }

    /// Removes the listener registered under `id`. Returns `false` when no
    /// such registration exists (it may already have been removed).
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if !inner.listeners.iter().any(|l| l.id == id) {
            return false;
        }
        let remaining: Vec<Listener<A>> = inner
            .listeners
            .iter()
            .filter(|l| l.id != id)
            .cloned()
            .collect();
        inner.listeners = Arc::new(remaining);
        true
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    /// Raises an event to this set; see [`dispatch`].
    pub fn raise<F>(
        &self,
        event_name: &str,
        sender: SenderRef<'_>,
        usage: ArgsUsage,
        args_factory: F,
    ) -> Result<bool, DispatchError>
    where
        F: FnMut() -> A,
    {
        dispatch(Some(self), event_name, sender, usage, args_factory)
    }

    fn snapshot(&self) -> Arc<Vec<Listener<A>>> {
        Arc::clone(
            &self
                .inner
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .listeners,
        )
    }
}

impl ListenerSet<EmptyArgs> {
    /// Raises a data-free event with a shared [`EmptyArgs`] payload.
    pub fn raise_simple(
        &self,
        event_name: &str,
        sender: SenderRef<'_>,
    ) -> Result<bool, DispatchError> {
        dispatch_simple(Some(self), event_name, sender)
    }
}

impl<A: EventArgs> Default for ListenerSet<A> {
    fn default() -> Self {
        Self::new()
    }
}

/// Notifies every listener in `listeners` of the `event_name` event, in
/// registration order, with protection against failures raised by the
/// listeners themselves.
///
/// `usage` selects how `args_factory` produces the payload: called once up
/// front and shared ([`ArgsUsage::Shared`]) or called afresh immediately
/// before each listener ([`ArgsUsage::UniquePerListener`]).
///
/// A listener failure (an `Err` fault or an escaped panic) never reaches the
/// caller: it is reported to the unhandled-error hub, with an activity
/// description built from the event name and the failing listener's
/// diagnostic identity, and the remaining listeners still run. The one
/// exception is a dispatch whose payload is itself the failure-report type,
/// where anything a subscriber raises is dropped to keep a failure from
/// spawning reports of itself.
///
/// Returns `Ok(true)` iff at least one listener was invoked before any early
/// termination; an absent or empty set yields `Ok(false)` without calling the
/// factory. The only errors surfaced are the caller's own: a blank
/// `event_name` or an [`ArgsUsage::Unknown`] usage value.
pub fn dispatch<A, F>(
    listeners: Option<&ListenerSet<A>>,
    event_name: &str,
    sender: SenderRef<'_>,
    usage: ArgsUsage,
    mut args_factory: F,
) -> Result<bool, DispatchError>
where
    A: EventArgs,
    F: FnMut() -> A,
{
    check::non_blank(event_name, "event_name")?;

    // An absent or empty listener set means there is nothing to notify.
    let snapshot = match listeners {
        Some(set) => set.snapshot(),
        None => return Ok(false),
    };
    if snapshot.is_empty() {
        return Ok(false);
    }

    let mut invoked = false;
    match usage {
        ArgsUsage::Unknown => return Err(DispatchError::UnknownArgsUsage(usage)),
        ArgsUsage::Shared => {
            let mut args = args_factory();
            for listener in snapshot.iter() {
                invoked = true;
                if notify_one(listener, event_name, sender, &mut args).is_break() {
                    break;
                }
            }
        }
        ArgsUsage::UniquePerListener => {
            for listener in snapshot.iter() {
                let mut args = args_factory();
                invoked = true;
                if notify_one(listener, event_name, sender, &mut args).is_break() {
                    break;
                }
            }
        }
    }

    Ok(invoked)
}

/// Notifies `listeners` of a data-free event: shared usage, [`EmptyArgs`]
/// payload.
pub fn dispatch_simple(
    listeners: Option<&ListenerSet<EmptyArgs>>,
    event_name: &str,
    sender: SenderRef<'_>,
) -> Result<bool, DispatchError> {
    dispatch(listeners, event_name, sender, ArgsUsage::Shared, || EmptyArgs)
}

/// Invokes one listener and decides whether the loop carries on.
fn notify_one<A: EventArgs>(
    listener: &Listener<A>,
    event_name: &str,
    sender: SenderRef<'_>,
    args: &mut A,
) -> ControlFlow<()> {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| (listener.callback)(sender, args)));

    let fault: Box<dyn StdError + Send + Sync> = match outcome {
        Ok(Ok(())) => {
            if args.handled_state() == Some(HandledState::HandledAndCeaseRaising) {
                return ControlFlow::Break(());
            }
            return ControlFlow::Continue(());
        }
        Ok(Err(ListenerFault::Interrupted)) => {
            // Cooperative stop: not a reportable failure, not an error.
            log::trace!(
                "'{event_name}' dispatch interrupted by listener {}",
                listener.info
            );
            return ControlFlow::Break(());
        }
        Ok(Err(ListenerFault::Failed(error))) => error,
        Err(panic_obj) => {
            let panic_msg = if let Some(s_ref) = panic_obj.downcast_ref::<&'static str>() {
                (*s_ref).to_string()
            } else if let Some(s_obj) = panic_obj.downcast_ref::<String>() {
                s_obj.clone()
            } else {
                "unknown panic payload".to_string()
            };
            Box::new(ListenerPanic(panic_msg))
        }
    };

    if TypeId::of::<A>() == TypeId::of::<UnhandledErrorArgs>() {
        // Already in the process of reporting an unhandled error: anything
        // further a subscriber raises is dropped rather than re-entering the
        // hub.
        log::debug!(
            "dropping failure raised by hub subscriber {}: {fault}",
            listener.info
        );
    } else {
        // A listener failure is reported, but the dispatch carries on.
        log::warn!(
            "listener {} failed whilst handling '{event_name}': {fault}",
            listener.info
        );
        hub::report(
            Some(Arc::from(fault)),
            Some(&format!(
                "'{event_name}' event was being handled by {}",
                listener.info
            )),
        );
    }

    ControlFlow::Continue(())
}
