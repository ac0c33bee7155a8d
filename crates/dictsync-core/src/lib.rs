//! dictsync core - native collection, change tracking, and listener registry.
//!
//! This crate is the native side of a key/value collection shared with a
//! dynamically-typed host runtime. It provides the collection seam, the
//! changeset model produced by mutations, and the subscription registry
//! that dispatches change notifications to host callbacks. The host-facing
//! binding layer lives in `dictsync-gateway`.

pub mod changeset;
pub mod collection;
pub mod error;
pub mod subscription;
pub mod value;

pub use changeset::{ChangeTracker, Changeset};
pub use collection::{ChangeSource, Collection, MemoryCollection};
pub use error::Error;
pub use subscription::{
    HostContext, Subscriber, SubscriptionId, SubscriptionRegistry, SubscriptionState,
};
pub use value::Value;
