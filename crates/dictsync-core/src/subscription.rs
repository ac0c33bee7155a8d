//! Listener registry and notification dispatcher.
//!
//! The registry owns the ordered list of active subscriptions; insertion
//! order is dispatch order. Each subscription holds *non-owning* references
//! to its callback and execution context: the caller keeps both alive for
//! as long as the subscription is active, and removal (or registry
//! teardown) must happen no later than the context's own teardown.
//!
//! Everything here is single-threaded and synchronous. The registry is
//! interior-mutable so a callback running inside [`notify`] may re-enter
//! `subscribe` / `remove_subscription` / `unsubscribe_all` through a shared
//! `Rc<SubscriptionRegistry>` without corrupting the in-progress dispatch.
//!
//! # Mid-dispatch mutation
//!
//! [`notify`] snapshots the active list before invoking anything, and the
//! snapshot is authoritative for that dispatch: a subscription removed by
//! a callback still receives the in-flight changeset, and a subscription
//! added by a callback only sees subsequent changesets.
//!
//! [`notify`]: SubscriptionRegistry::notify

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::changeset::Changeset;
use crate::error::Error;

/// An externally-invocable change callback.
///
/// Implementations receive the changeset for every mutation of the
/// collection they are subscribed to. Failures are isolated per
/// subscription: an `Err` is reported to the owning context's error
/// channel and never stops dispatch to later subscriptions.
pub trait Subscriber {
    /// Handle one changeset.
    fn on_change(&self, changeset: &Changeset) -> Result<(), Error>;
}

impl fmt::Debug for dyn Subscriber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscriber").finish_non_exhaustive()
    }
}

/// The execution context owning a callback.
///
/// The registry only uses its error channel; lifetime and teardown of the
/// context itself are the caller's responsibility.
pub trait HostContext {
    /// Deliver a dispatch-time failure to the host's error channel.
    fn report_error(&self, error: &Error);
}

/// Opaque handle identifying one subscription.
///
/// Returned by [`SubscriptionRegistry::subscribe`]; usable with
/// [`SubscriptionRegistry::remove_by_id`] instead of identity-matching the
/// original callback value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}

/// Lifecycle state of a subscription. `Removed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionState {
    /// Receiving changesets.
    Active,
    /// Tombstoned; will never fire again.
    Removed,
}

/// One registered callback bound to its execution context.
struct Subscription {
    id: SubscriptionId,
    callback: Weak<dyn Subscriber>,
    context: Weak<dyn HostContext>,
    state: SubscriptionState,
}

impl Subscription {
    fn matches(&self, callback: &Rc<dyn Subscriber>, context: &Rc<dyn HostContext>) -> bool {
        // Identity is the host runtime's: the allocation behind the Rc,
        // not structural equality of some wrapper.
        self.callback.as_ptr().cast::<()>() == Rc::as_ptr(callback).cast::<()>()
            && self.context.as_ptr().cast::<()>() == Rc::as_ptr(context).cast::<()>()
    }
}

/// Ordered registry of change-notification subscriptions.
pub struct SubscriptionRegistry {
    subscriptions: RefCell<Vec<Subscription>>,
    next_id: Cell<u64>,
}

impl SubscriptionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            subscriptions: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
        }
    }

    /// Registers `callback` bound to `context` and returns its handle.
    ///
    /// The registry holds only weak references; the caller keeps both
    /// values alive while the subscription is active. Duplicate
    /// registrations of the same pair are permitted and fire
    /// independently, in their own positions.
    pub fn subscribe(
        &self,
        callback: &Rc<dyn Subscriber>,
        context: &Rc<dyn HostContext>,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        self.subscriptions.borrow_mut().push(Subscription {
            id,
            callback: Rc::downgrade(callback),
            context: Rc::downgrade(context),
            state: SubscriptionState::Active,
        });
        tracing::debug!(%id, "listener subscribed");
        id
    }

    /// Removes the first active subscription whose `(callback, context)`
    /// identity matches. Silent no-op when nothing matches.
    ///
    /// The record is tombstoned rather than dropped so [`state`] keeps
    /// reporting the terminal state for its handle.
    ///
    /// [`state`]: SubscriptionRegistry::state
    pub fn remove_subscription(
        &self,
        callback: &Rc<dyn Subscriber>,
        context: &Rc<dyn HostContext>,
    ) -> bool {
        let mut subs = self.subscriptions.borrow_mut();
        if let Some(sub) = subs
            .iter_mut()
            .find(|s| s.state == SubscriptionState::Active && s.matches(callback, context))
        {
            sub.state = SubscriptionState::Removed;
            tracing::debug!(id = %sub.id, "listener removed");
            true
        } else {
            false
        }
    }

    /// Removes the subscription identified by `id`. Silent no-op when the
    /// handle is unknown or already removed.
    pub fn remove_by_id(&self, id: SubscriptionId) -> bool {
        let mut subs = self.subscriptions.borrow_mut();
        match subs.iter_mut().find(|s| s.id == id) {
            Some(sub) if sub.state == SubscriptionState::Active => {
                sub.state = SubscriptionState::Removed;
                tracing::debug!(%id, "listener removed");
                true
            }
            _ => false,
        }
    }

    /// Drops every subscription record, tombstones included, and releases
    /// all held references. Idempotent.
    pub fn unsubscribe_all(&self) {
        self.subscriptions.borrow_mut().clear();
    }

    /// Dispatches `changeset` to every subscription active at the start of
    /// the call, in insertion order, exactly once each.
    ///
    /// A callback failure is reported to that subscription's context error
    /// channel and logged; later subscriptions are still invoked. Dangling
    /// callbacks (caller dropped the value without unsubscribing) are
    /// logged and pruned.
    pub fn notify(&self, changeset: &Changeset) {
        let snapshot: Vec<(SubscriptionId, Weak<dyn Subscriber>, Weak<dyn HostContext>)> = self
            .subscriptions
            .borrow()
            .iter()
            .filter(|s| s.state == SubscriptionState::Active)
            .map(|s| (s.id, s.callback.clone(), s.context.clone()))
            .collect();
        // The borrow is released before any callback runs, so callbacks
        // may re-enter the registry.

        tracing::trace!(listeners = snapshot.len(), changes = changeset.len(), "dispatching changeset");

        let mut dangling = Vec::new();
        for (id, callback, context) in snapshot {
            let Some(callback) = callback.upgrade() else {
                tracing::warn!(%id, "listener callback dropped without removal; pruning");
                dangling.push(id);
                continue;
            };

            if let Err(err) = callback.on_change(changeset) {
                tracing::warn!(%id, error = %err, "listener callback failed");
                if let Some(context) = context.upgrade() {
                    context.report_error(&err);
                }
            }
        }

        if !dangling.is_empty() {
            self.subscriptions
                .borrow_mut()
                .retain(|s| !dangling.contains(&s.id));
        }
    }

    /// State of the subscription behind `id`, or `None` for an unknown
    /// handle. Removal is terminal: the tombstoned record keeps answering
    /// `Removed` until [`unsubscribe_all`] drops it.
    ///
    /// [`unsubscribe_all`]: SubscriptionRegistry::unsubscribe_all
    pub fn state(&self, id: SubscriptionId) -> Option<SubscriptionState> {
        self.subscriptions
            .borrow()
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.state)
    }

    /// Number of subscription records, tombstones included.
    pub fn len(&self) -> usize {
        self.subscriptions.borrow().len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.subscriptions.borrow().is_empty()
    }

    /// Number of active subscriptions.
    pub fn active_count(&self) -> usize {
        self.subscriptions
            .borrow()
            .iter()
            .filter(|s| s.state == SubscriptionState::Active)
            .count()
    }
}

impl Default for SubscriptionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
