//! The host-visible dictionary object and its method table.
//!
//! [`Dictionary`] owns the native collection and the listener registry and
//! exposes the five named methods the host runtime binds on the dictionary
//! object: `addListener`, `removeListener`, `removeAllListeners`, `put`,
//! and `remove`. Mutations accumulate in the collection's change tracker;
//! [`dispatch_changes`] is the delivery pump that drains them into the
//! notification dispatcher.
//!
//! [`dispatch_changes`]: Dictionary::dispatch_changes

use std::rc::Rc;

use dictsync_core::subscription::SubscriptionRegistry;
use dictsync_core::{ChangeSource, Collection, Error, SubscriptionId};

use crate::args::{
    validated_callback, validated_object, Args, CALLBACK_REQUIRED, METHOD_CANNOT_BE_EMPTY,
};
use crate::convert::to_host;
use crate::gateway;

/// The five method names bound on the host-visible dictionary object.
pub const METHOD_NAMES: [&str; 5] = [
    "addListener",
    "removeListener",
    "removeAllListeners",
    "put",
    "remove",
];

/// A native dictionary bound into the host runtime.
pub struct Dictionary<C> {
    collection: C,
    observer: Rc<SubscriptionRegistry>,
}

impl<C> Dictionary<C>
where
    C: Collection + ChangeSource,
{
    /// Wraps `collection` with a fresh listener registry.
    pub fn new(collection: C) -> Self {
        Self {
            collection,
            observer: Rc::new(SubscriptionRegistry::new()),
        }
    }

    /// The listener registry. Shared so callbacks may hold it and re-enter
    /// subscription management mid-dispatch.
    pub fn observer(&self) -> &Rc<SubscriptionRegistry> {
        &self.observer
    }

    /// The underlying collection.
    pub fn collection(&self) -> &C {
        &self.collection
    }

    /// Mutable access for mutations originating outside the gateway.
    pub fn collection_mut(&mut self) -> &mut C {
        &mut self.collection
    }

    /// Host-facing read: the value stored at `key`, marshaled into the
    /// host's representation.
    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        self.collection.get(key).map(to_host)
    }

    /// `addListener(callback)` — registers a change listener and returns
    /// its opaque handle.
    pub fn add_listener(&self, args: &Args<'_>) -> Result<SubscriptionId, Error> {
        let callback = validated_callback(args.get(0, CALLBACK_REQUIRED)?)?;
        Ok(self.observer.subscribe(&callback, args.context()))
    }

    /// `removeListener(callback)` — unregisters the first subscription
    /// matching the callback's identity. Silent no-op without a match.
    pub fn remove_listener(&self, args: &Args<'_>) -> Result<(), Error> {
        let callback = validated_callback(args.get(0, CALLBACK_REQUIRED)?)?;
        self.observer.remove_subscription(&callback, args.context());
        Ok(())
    }

    /// `removeAllListeners()` — clears every subscription.
    pub fn remove_all_listeners(&self) {
        self.observer.unsubscribe_all();
    }

    /// `put(object)` — applies the object's `(key, value)` pairs to the
    /// collection through the mutation gateway.
    pub fn put(&mut self, args: &Args<'_>) -> Result<(), Error> {
        let object = validated_object(args.get(0, METHOD_CANNOT_BE_EMPTY)?)?;
        gateway::put(&mut self.collection, object)
    }

    /// `remove(object)` — removes the keys named by the object's property
    /// values from the collection.
    pub fn remove(&mut self, args: &Args<'_>) -> Result<(), Error> {
        let object = validated_object(args.get(0, METHOD_CANNOT_BE_EMPTY)?)?;
        gateway::remove(&mut self.collection, object)
    }

    /// String dispatch over the bound method table.
    ///
    /// Returns the new handle for `addListener`, `None` for everything
    /// else.
    pub fn call(&mut self, method: &str, args: &Args<'_>) -> Result<Option<SubscriptionId>, Error> {
        match method {
            "addListener" => self.add_listener(args).map(Some),
            "removeListener" => self.remove_listener(args).map(|()| None),
            "removeAllListeners" => {
                self.remove_all_listeners();
                Ok(None)
            }
            "put" => self.put(args).map(|()| None),
            "remove" => self.remove(args).map(|()| None),
            other => Err(Error::UnknownMethod(other.to_string())),
        }
    }

    /// Drains the collection's pending changeset into the dispatcher.
    ///
    /// In a full embedding the storage engine's own change tracking drives
    /// this; here it is the explicit delivery pump.
    pub fn dispatch_changes(&mut self) {
        if let Some(changeset) = self.collection.take_changeset() {
            self.observer.notify(&changeset);
        }
    }
}
